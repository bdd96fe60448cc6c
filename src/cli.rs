use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::Parser;
use std::path::PathBuf;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
mutatiN version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   mask random alignment positions with N";

/// Default output file name, created in the current working directory
pub const DEFAULT_OUTFILE: &str = "mutated_output";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser, Debug)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    styles = STYLES
)]
pub struct Cli {
    /// input file containing aligned sequences in FASTA format
    #[arg(short, long)]
    pub infile: PathBuf,

    /// output file name. defaults to `mutated_output` in the current directory.
    /// use `-` to write to standard output
    #[arg(short, long, verbatim_doc_comment)]
    pub outfile: Option<PathBuf>,

    /// frequency of Ns in each sequence, within [0,1]
    #[arg(short, long, default_value_t = 0.1, value_parser = parse_frequency)]
    pub freq: f64,

    /// random number generator seed (any integer, negative values included)
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub seed: i64,

    /// preserve existing gap characters in the alignment? (T/F)
    #[arg(
        short,
        long,
        value_parser = |x: &str| LogicalFlag::try_from(x),
        default_value = "F"
    )]
    pub gaps: LogicalFlag,
}

impl Cli {
    /// Resolves the output path, falling back to `mutated_output` in the current directory.
    pub fn output_path(&self) -> std::io::Result<PathBuf> {
        match &self.outfile {
            Some(path) => Ok(path.clone()),
            None => Ok(std::env::current_dir()?.join(DEFAULT_OUTFILE)),
        }
    }
}

/// Parses a mutation frequency, which must be a finite float within [0,1].
pub fn parse_frequency(arg: &str) -> Result<f64, String> {
    let v = arg
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid frequency: '{arg}' (should be a float within [0,1])"))?;

    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(format!("Frequency {v} is outside of [0,1]"));
    }
    Ok(v)
}

/// A `T`/`F` command line switch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LogicalFlag(pub bool);

/// Error type for parsing a logical flag.
#[derive(Debug)]
pub struct ParseLogicalErr(String);

impl std::fmt::Display for ParseLogicalErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid logical value: {}", self.0)
    }
}

impl std::error::Error for ParseLogicalErr {}

impl<'a> TryFrom<&'a str> for LogicalFlag {
    type Error = ParseLogicalErr;

    fn try_from(arg: &'a str) -> Result<LogicalFlag, Self::Error> {
        match arg {
            "T" => Ok(LogicalFlag(true)),
            "F" => Ok(LogicalFlag(false)),
            _ => Err(ParseLogicalErr(indoc::formatdoc! {"
            expected `T` or `F`, got '{arg}'. For example:
              --gaps T
              --gaps F
            "})),
        }
    }
}
