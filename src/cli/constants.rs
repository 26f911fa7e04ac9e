// cli/constants.rs — program identity, display level, and output macros.

use std::sync::atomic::{AtomicU32, Ordering};

// ── Identity ──────────────────────────────────────────────────────────────────
pub const PROGRAM_NAME: &str = "fuzzer";

/// Exit status used for usage errors and unknown decoder names.
pub const EXIT_USAGE: i32 = -1;

// ── Size multipliers ──────────────────────────────────────────────────────────
pub const MB: usize = 1 << 20;

// ── Display level ─────────────────────────────────────────────────────────────
//
// 0 = no diagnostics; 1 = errors only; 2 = normal (seed banner);
// 3 = per-iteration statistics; 4 = verbose (decoder descriptor details)
pub const DISPLAY_LEVEL_DEFAULT: u32 = 2;

pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(DISPLAY_LEVEL_DEFAULT);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

// ── Display helpers ───────────────────────────────────────────────────────────
//
// Progress text belongs on stdout; everything diagnostic goes to stderr and is
// filtered by the display level.

/// Print to stdout.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Print to stderr unconditionally.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Print to stderr when the display level is at least `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}

/// Print a diagnostic and abort the process.
///
/// Reserved for harness-detected decoder faults (canary damage, failed
/// initialization). Never returns.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        eprint!("Fatal error in {}, line {} : \n", file!(), line!());
        eprint!($($arg)*);
        eprint!("\n");
        std::process::abort()
    }};
}
