//! Command-line model for the `fuzzer` binary.
//!
//! [`parse_args`] reads `std::env::args()`; [`parse_args_from`] takes an
//! explicit list (argv[0] included) and is what the tests call.  Both return
//! a [`ParsedArgs`] whose [`ParsedArgs::fuzz_config`] resolves the defaults.
//!
//! The decoder name is optional at the clap level so that its absence can be
//! reported with the program's own usage text and exit status instead of
//! clap's.

use clap::{ArgAction, Parser};

use crate::cli::constants::DISPLAY_LEVEL_DEFAULT;
use crate::config::{FuzzConfig, MAX_FUZZ_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "fuzzer",
    version,
    about = "Feed random byte streams to a decompressor and check it never writes outside its buffers"
)]
pub struct ParsedArgs {
    /// Decoder to fuzz (see --list).
    ///
    /// Archive method IDs such as `-lz5-` begin with a hyphen and are still
    /// taken as the positional name.
    #[arg(allow_hyphen_values = true)]
    pub decoder: Option<String>,

    /// Stop after this many iterations (default: run until killed).
    #[arg(short = 'n', long, value_name = "N")]
    pub iterations: Option<u64>,

    /// Seed for the input generator (default: current time).
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Random input length per iteration, in bytes.
    #[arg(short = 'l', long, value_name = "BYTES", default_value_t = MAX_FUZZ_LEN)]
    pub max_len: usize,

    /// List the registered decoder names and exit.
    #[arg(long)]
    pub list: bool,

    /// More diagnostics on stderr (repeatable).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Fewer diagnostics on stderr (repeatable).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

impl ParsedArgs {
    /// Display level implied by `-v` / `-q`.
    pub fn display_level(&self) -> u32 {
        (DISPLAY_LEVEL_DEFAULT + self.verbose as u32).saturating_sub(self.quiet as u32)
    }

    /// Resolve the run configuration, using `clock_seed` when no seed was
    /// given.
    pub fn fuzz_config(&self, clock_seed: impl FnOnce() -> u64) -> FuzzConfig {
        FuzzConfig {
            max_len: self.max_len,
            iterations: self.iterations,
            seed: self.seed.unwrap_or_else(clock_seed),
        }
    }
}

/// Parse the process arguments.
pub fn parse_args() -> Result<ParsedArgs, clap::Error> {
    ParsedArgs::try_parse()
}

/// Parse an explicit argument list; `argv[0]` is the program name.
pub fn parse_args_from<I, T>(argv: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    ParsedArgs::try_parse_from(argv)
}
