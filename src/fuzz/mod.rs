//! The fuzz driver: repeated random-input iterations against one decoder.
//!
//! [`iteration`] runs a single generate → init → read → release cycle;
//! [`Fuzzer`] wraps it in a counting loop with a seeded generator and the
//! progress output.

pub mod iteration;

use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::FuzzConfig;
use crate::decoder::DecoderDescriptor;
use crate::displaylevel;
use crate::error::HarnessError;
use crate::timefn::{clock_span_ns, get_time};

pub use iteration::{fuzz_block, fuzz_test, run_fuzz_test, IterationReport, RunOutcome};

/// Counting loop over [`fuzz_test`] for one decoder.
///
/// The generator is seeded once in [`Fuzzer::new`] and never re-seeded, so a
/// run is fully determined by its decoder and [`FuzzConfig`].
pub struct Fuzzer {
    desc: &'static DecoderDescriptor,
    config: FuzzConfig,
    rng: StdRng,
    iteration: u64,
}

impl Fuzzer {
    pub fn new(desc: &'static DecoderDescriptor, config: FuzzConfig) -> Self {
        Fuzzer {
            desc,
            config,
            rng: StdRng::seed_from_u64(config.seed),
            iteration: 0,
        }
    }

    /// Index of the next iteration to run.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Run one iteration without printing anything.
    pub fn run_iteration(&mut self) -> Result<IterationReport, HarnessError> {
        let report = fuzz_test(self.desc, &mut self.rng, self.config.max_len)?;
        self.iteration += 1;
        Ok(report)
    }

    /// Run iterations until the configured bound, writing the
    /// `Iteration N:` line and the completion line for each to `out`.
    ///
    /// With no bound this only returns on error.  Returns the number of
    /// iterations completed.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<u64, HarnessError> {
        loop {
            if let Some(limit) = self.config.iterations {
                if self.iteration >= limit {
                    return Ok(self.iteration);
                }
            }

            writeln!(out, "Iteration {}:", self.iteration)?;
            out.flush()?;

            let start = get_time();
            let report = self.run_iteration()?;
            let elapsed_ns = clock_span_ns(start);

            writeln!(out, "{}", report.completion_line())?;
            out.flush()?;

            displaylevel!(
                3,
                "\t{} read calls, {} bytes produced, digest {:016x}, {:.3} ms\n",
                report.outcome.read_calls,
                report.outcome.produced,
                report.outcome.digest,
                elapsed_ns as f64 / 1e6
            );
        }
    }
}
