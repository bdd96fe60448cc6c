extern crate env_logger;
#[macro_use]
extern crate log;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;

mod alignment;
mod cli;
mod io;
mod mutate;

use cli::Cli;
use mutate::{MutationParams, Mutator};

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    info!("mutatiN v{}", cli::VERSION);

    // negative seeds are reinterpreted bit for bit
    let params = MutationParams::new(cli.freq, cli.seed as u64, cli.gaps.0)?;
    let output = cli.output_path().context("Could not resolve output path")?;

    // the input is fully read and closed before the output is created
    info!("Reading alignment from {}", cli.infile.display());
    let mut alignment = io::read_alignment(&cli.infile)?;
    info!(
        "Read {} sequences ({} positions)",
        alignment.len(),
        alignment.total_len()
    );
    if alignment.is_empty() {
        warn!("No sequences found in {}", cli.infile.display());
    }

    let mut mutator = Mutator::new(params);
    info!(
        "Masking with frequency {}, seed {}, preserving gaps: {}",
        mutator.params().frequency,
        mutator.params().seed,
        mutator.params().preserve_gaps
    );
    let summary = mutator.mutate_alignment(&mut alignment)?;
    info!(
        "Masked {} of {} eligible positions across {} sequences",
        summary.mutated, summary.positions, summary.records
    );

    let mut writer = io::get_writer(&output)?;
    io::write_alignment(&mut writer, &alignment)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Unable to write to {}", output.display()))?;

    info!("Completed successfully, written to {}", output.display());
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
