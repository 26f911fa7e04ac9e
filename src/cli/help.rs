// cli/help.rs — usage text and the listing printed by --list.

use crate::cli::constants::EXIT_USAGE;
use crate::decoder::decoder_names;
use crate::{display, displayout};

/// Print the one-line usage to stdout.
pub fn print_usage(program: &str) {
    displayout!("Usage: {} <decoder-type>\n", program);
}

/// Print every registered decoder name, one per line, to stdout.
pub fn print_decoder_list() {
    for name in decoder_names() {
        displayout!("{}\n", name);
    }
}

/// Print usage and exit with the usage status.
pub fn bad_usage(program: &str) -> ! {
    print_usage(program);
    std::process::exit(EXIT_USAGE);
}

/// Report an unknown decoder name on stderr and exit with the usage status.
pub fn unknown_decoder(name: &str) -> ! {
    display!("Unknown decoder type '{}'\n", name);
    std::process::exit(EXIT_USAGE);
}
