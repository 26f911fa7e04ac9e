//! Command-line interface for the `fuzzer` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|----------------|
//! | [`constants`] | Program identity, exit status, the display-level atomic, and the `display*` / `fatal` macros. |
//! | [`args`]      | `ParsedArgs`, the clap model of the options and the positional decoder name. |
//! | [`help`]      | Usage text, decoder listing, and the usage-error exits. |

pub mod constants;
pub mod args;
pub mod help;
