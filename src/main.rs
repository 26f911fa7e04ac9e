//! Binary entry point for the `fuzzer` tool.
//!
//! Resolves the decoder named on the command line, seeds the input generator
//! once, then runs fuzz iterations until the configured bound (or forever).
//!
//! # Exit behaviour
//!
//! * no decoder name     → usage on stdout, exit -1
//! * unknown decoder     → message on stderr, exit -1
//! * decoder fault       → diagnostic on stderr, abort
//! * progress I/O error  → message on stderr, exit 1

use std::io;

use lhafuzz::cli::args::{parse_args, ParsedArgs};
use lhafuzz::cli::constants::{set_display_level, PROGRAM_NAME};
use lhafuzz::cli::help::{bad_usage, print_decoder_list, unknown_decoder};
use lhafuzz::decoder::decoder_for_name;
use lhafuzz::fuzz::Fuzzer;
use lhafuzz::timefn::seed_from_clock;
use lhafuzz::{displaylevel, fatal};

fn run(args: ParsedArgs) -> anyhow::Result<()> {
    set_display_level(args.display_level());

    if args.list {
        print_decoder_list();
        return Ok(());
    }

    let program = std::env::args().next().unwrap_or_else(|| PROGRAM_NAME.to_owned());
    let name = match args.decoder.as_deref() {
        Some(name) => name,
        None => bad_usage(&program),
    };
    let desc = match decoder_for_name(name) {
        Some(desc) => desc,
        None => unknown_decoder(name),
    };

    let config = args.fuzz_config(seed_from_clock);
    displaylevel!(2, "Fuzzing '{}' with seed {}\n", desc.name, config.seed);
    displaylevel!(
        4,
        "state_size={} max_output_chunk={} input_len={} iterations={}\n",
        desc.state_size,
        desc.max_output_chunk,
        config.max_len,
        config.iterations.map_or_else(|| "unbounded".to_owned(), |n| n.to_string())
    );

    let mut fuzzer = Fuzzer::new(desc, config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match fuzzer.run(&mut out) {
        Ok(_) => Ok(()),
        Err(e) if e.is_decoder_fault() => {
            fatal!("Iteration {}: {} (seed {})", fuzzer.iteration(), e, config.seed)
        }
        Err(e) => Err(e.into()),
    }
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => e.exit(),
    };

    if let Err(e) = run(args) {
        eprintln!("{}: {:#}", PROGRAM_NAME, e);
        std::process::exit(1);
    }
}
