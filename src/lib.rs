// lha-fuzz — random-input memory-safety harness for streaming decompressors

pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod fuzz;
pub mod guard;
pub mod source;
pub mod timefn;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use config::{FuzzConfig, MAX_FUZZ_LEN};
pub use decoder::{decoder_for_name, decoder_names, Decoder, DecoderDescriptor};
pub use error::{BlockKind, HarnessError};
pub use fuzz::{fuzz_block, fuzz_test, run_fuzz_test, Fuzzer, IterationReport, RunOutcome};
pub use guard::{GuardViolation, GuardedBlock, CANARY};
pub use source::{PullSource, StreamCursor};
