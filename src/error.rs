//! Errors surfaced by the fuzz driver.

use std::fmt;
use std::io;

use crate::guard::GuardViolation;

/// Which guarded block a violation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// The `state_size` region handed to the decoder at initialisation.
    DecoderState,
    /// The `max_output_chunk` buffer handed to every read call.
    Output,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlockKind::DecoderState => "decoder state",
            BlockKind::Output => "output buffer",
        })
    }
}

/// Everything that stops a fuzz iteration.
///
/// All variants except [`HarnessError::Io`] describe a fault in the decoder
/// under test; the binary aborts on them.
#[derive(Debug)]
pub enum HarnessError {
    /// The decoder refused to initialise.
    InitFailed { decoder: &'static str },
    /// A canary or size record was damaged.  `read_call` is the 1-based
    /// number of the read call after which it was detected; for the state
    /// block it is the total number of calls made.
    GuardViolation {
        decoder: &'static str,
        block: BlockKind,
        read_call: u64,
        violation: GuardViolation,
    },
    /// A read call claimed to produce more than `max_output_chunk` bytes.
    OversizedRead {
        decoder: &'static str,
        read_call: u64,
        reported: usize,
        max: usize,
    },
    /// Writing progress output failed.
    Io(io::Error),
}

impl HarnessError {
    /// `true` for decoder faults, `false` for environment errors.
    pub fn is_decoder_fault(&self) -> bool {
        !matches!(self, HarnessError::Io(_))
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::InitFailed { decoder } => {
                write!(f, "decoder '{}' failed to initialise", decoder)
            }
            HarnessError::GuardViolation { decoder, block, read_call, violation } => write!(
                f,
                "decoder '{}' corrupted its {} (detected after read call {}): {}",
                decoder, block, read_call, violation
            ),
            HarnessError::OversizedRead { decoder, read_call, reported, max } => write!(
                f,
                "decoder '{}' reported {} bytes from read call {} (maximum {})",
                decoder, reported, read_call, max
            ),
            HarnessError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::GuardViolation { violation, .. } => Some(violation),
            HarnessError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HarnessError {
    fn from(e: io::Error) -> Self {
        HarnessError::Io(e)
    }
}
