// config.rs — Compile-time defaults and the per-run fuzzing configuration.
//
// Every value here can be overridden from the command line; see cli/args.rs.

use crate::cli::constants::MB;

// Bytes of random input generated for each iteration.
// Overridden by `-l/--max-len`.
pub const MAX_FUZZ_LEN: usize = 2 * MB;

// Iteration bound when none is given: run until the process is killed.
pub const ITERATIONS_DEFAULT: Option<u64> = None;

/// Settings for one [`crate::fuzz::Fuzzer`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzConfig {
    /// Length of the random input fed to the decoder each iteration.
    pub max_len: usize,
    /// Number of iterations to run; `None` loops forever.
    pub iterations: Option<u64>,
    /// Seed for the input generator, applied once per run.
    pub seed: u64,
}

impl FuzzConfig {
    /// Defaults with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        FuzzConfig { max_len: MAX_FUZZ_LEN, iterations: ITERATIONS_DEFAULT, seed }
    }
}
