//! One fuzz iteration: generate, initialise, read until done, tear down.
//!
//! ```text
//! GENERATE ──► INIT ──► READING ──► DONE
//!                        │  ▲
//!                        └──┘  read returned > 0
//! ```
//!
//! Canaries on the output buffer are checked after every single read call,
//! so a violation is pinned to the call that caused it.  The decoder-state
//! block is checked once, after the decoder has been released.

use rand::RngCore;
use xxhash_rust::xxh64::Xxh64;

use crate::decoder::DecoderDescriptor;
use crate::error::{BlockKind, HarnessError};
use crate::guard::{self, GuardedBlock};
use crate::source::StreamCursor;

/// Fill `data` with uniformly random bytes.
pub fn fuzz_block<R: RngCore + ?Sized>(rng: &mut R, data: &mut [u8]) {
    rng.fill_bytes(data);
}

/// What a decoder did with one input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Input bytes pulled by the decoder before it stopped producing output.
    pub consumed: usize,
    /// Read calls made, including the final one that returned 0.
    pub read_calls: u64,
    /// Total output bytes produced.
    pub produced: u64,
    /// XXH64 of all produced output.
    pub digest: u64,
}

/// Drive `desc` over `data` from initialisation to release.
///
/// Returns the first decoder fault encountered; the caller decides whether
/// that is fatal.
pub fn run_fuzz_test(desc: &DecoderDescriptor, data: &[u8]) -> Result<RunOutcome, HarnessError> {
    let mut state = GuardedBlock::allocate(desc.state_size);
    let mut output = GuardedBlock::allocate(desc.max_output_chunk);
    let mut cursor = StreamCursor::new(data);

    let mut hasher = Xxh64::new(0);
    let mut read_calls: u64 = 0;
    let mut produced: u64 = 0;

    {
        let mut decoder = (desc.init)(state.as_mut_slice(), &mut cursor)
            .ok_or(HarnessError::InitFailed { decoder: desc.name })?;

        loop {
            output.zero();
            let n = decoder.read(output.as_mut_slice());
            read_calls += 1;

            output.verify().map_err(|violation| HarnessError::GuardViolation {
                decoder: desc.name,
                block: BlockKind::Output,
                read_call: read_calls,
                violation,
            })?;

            if n > desc.max_output_chunk {
                return Err(HarnessError::OversizedRead {
                    decoder: desc.name,
                    read_call: read_calls,
                    reported: n,
                    max: desc.max_output_chunk,
                });
            }
            if n == 0 {
                break;
            }

            hasher.update(&output.as_slice()[..n]);
            produced += n as u64;
        }

        decoder.release();
    }

    state.verify().map_err(|violation| HarnessError::GuardViolation {
        decoder: desc.name,
        block: BlockKind::DecoderState,
        read_call: read_calls,
        violation,
    })?;
    guard::release(Some(state));
    guard::release(Some(output));

    Ok(RunOutcome {
        consumed: cursor.read_offset(),
        read_calls,
        produced,
        digest: hasher.digest(),
    })
}

/// Result of one generated-input iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    /// Length of the random input.
    pub input_len: usize,
    pub outcome: RunOutcome,
}

impl IterationReport {
    /// `true` when the decoder pulled the whole input.
    pub fn reached_eof(&self) -> bool {
        self.outcome.consumed >= self.input_len
    }

    /// The per-iteration completion line (no trailing newline).
    pub fn completion_line(&self) -> String {
        if self.reached_eof() {
            format!("\tTest complete (end of file, read {} bytes)", self.outcome.consumed)
        } else {
            format!("\tTest complete (read {} bytes)", self.outcome.consumed)
        }
    }
}

/// Generate `len` random bytes and run `desc` over them.
pub fn fuzz_test<R: RngCore + ?Sized>(
    desc: &DecoderDescriptor,
    rng: &mut R,
    len: usize,
) -> Result<IterationReport, HarnessError> {
    let mut data = vec![0u8; len];
    fuzz_block(rng, &mut data);
    let outcome = run_fuzz_test(desc, &data)?;
    Ok(IterationReport { input_len: len, outcome })
}
