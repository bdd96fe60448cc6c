use crate::alignment::Alignment;
use rand::seq::index;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use thiserror::Error;

/// Symbol written over every sampled position.
pub const MASK: u8 = b'N';

/// Alignment gap symbol, left untouched when gaps are preserved.
pub const GAP: u8 = b'-';

#[derive(Error, Debug, PartialEq)]
pub enum MutationError {
    #[error("mutation frequency must be within [0, 1], got {0}")]
    FrequencyOutOfRange(f64),

    #[error(
        "cannot mutate {count} positions of `{name}`:
only {pool} positions are eligible"
    )]
    SampleTooLarge {
        name: String,
        count: usize,
        pool: usize,
    },
}

/// Settings controlling a mutation run.
///
/// # Fields
///
/// * `frequency` - Fraction of eligible positions in each sequence to replace with `N`.
/// * `seed` - Seed for the random number generator.
/// * `preserve_gaps` - If set, `-` characters are never replaced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MutationParams {
    pub frequency: f64,
    pub seed: u64,
    pub preserve_gaps: bool,
}

impl MutationParams {
    pub fn new(frequency: f64, seed: u64, preserve_gaps: bool) -> Result<Self, MutationError> {
        if !frequency.is_finite() || !(0.0..=1.0).contains(&frequency) {
            return Err(MutationError::FrequencyOutOfRange(frequency));
        }

        Ok(MutationParams {
            frequency,
            seed,
            preserve_gaps,
        })
    }
}

/// Totals gathered over a whole alignment.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MutationSummary {
    /// Number of records visited
    pub records: usize,
    /// Number of eligible positions across all records
    pub positions: usize,
    /// Number of positions overwritten with `N`
    pub mutated: usize,
}

/// Replaces randomly sampled positions with `N`.
///
/// A single generator is seeded at construction and shared by every record that passes
/// through, so the result depends on the order in which records are mutated.
pub struct Mutator {
    params: MutationParams,
    rng: Xoshiro256StarStar,
}

impl Mutator {
    pub fn new(params: MutationParams) -> Self {
        Mutator {
            params,
            rng: SeedableRng::seed_from_u64(params.seed),
        }
    }

    pub fn params(&self) -> &MutationParams {
        &self.params
    }

    /// Returns the indices of `seq` that may be mutated.
    pub fn candidate_positions(&self, seq: &[u8]) -> Vec<usize> {
        if self.params.preserve_gaps {
            seq.iter()
                .enumerate()
                .filter(|&(_, &c)| c != GAP)
                .map(|(i, _)| i)
                .collect()
        } else {
            (0..seq.len()).collect()
        }
    }

    /// Number of positions to mutate out of a pool of `pool` candidates, rounding halves away
    /// from zero.
    pub fn mutation_count(&self, pool: usize) -> usize {
        (self.params.frequency * pool as f64).round() as usize
    }

    /// Mutates a single sequence in place.
    ///
    /// # Arguments
    ///
    /// * `name` - The record name, used for error reporting only.
    /// * `seq` - The sequence to mutate.
    ///
    /// # Returns
    ///
    /// The number of positions which were overwritten.
    ///
    /// # Errors
    ///
    /// `MutationError::SampleTooLarge` if more positions are requested than are eligible. The
    /// sequence and the generator are left untouched in that case.
    pub fn mutate_sequence(&mut self, name: &str, seq: &mut [u8]) -> Result<usize, MutationError> {
        let pool = self.candidate_positions(seq);
        self.mutate_pool(name, seq, &pool)
    }

    /// Overwrites a sample of the positions listed in `pool`.
    fn mutate_pool(
        &mut self,
        name: &str,
        seq: &mut [u8],
        pool: &[usize],
    ) -> Result<usize, MutationError> {
        let count = self.mutation_count(pool.len());

        if count > pool.len() {
            return Err(MutationError::SampleTooLarge {
                name: name.to_string(),
                count,
                pool: pool.len(),
            });
        }

        for i in index::sample(&mut self.rng, pool.len(), count) {
            seq[pool[i]] = MASK;
        }

        debug!("{name}: mutated {count} of {} positions", pool.len());
        Ok(count)
    }

    /// Mutates every record of `alignment` in order, stopping at the first failure. Records
    /// visited before the failure stay mutated.
    pub fn mutate_alignment(
        &mut self,
        alignment: &mut Alignment,
    ) -> Result<MutationSummary, MutationError> {
        let mut summary = MutationSummary::default();

        for (name, seq) in alignment.iter_mut() {
            let pool = self.candidate_positions(seq);
            summary.mutated += self.mutate_pool(name, seq, &pool)?;
            summary.positions += pool.len();
            summary.records += 1;
        }

        Ok(summary)
    }
}
