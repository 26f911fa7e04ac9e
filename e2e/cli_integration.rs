// e2e/cli_integration.rs — black-box tests of the `fuzzer` binary
//
// Runs the built binary with std::process::Command and checks exit codes,
// which stream each message lands on, and the progress text of bounded runs.

use std::path::PathBuf;
use std::process::{Command, Output};

/// Locate the `fuzzer` binary produced by Cargo.
fn fuzzer_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_fuzzer") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop(); // remove test binary filename
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("fuzzer");
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(fuzzer_bin())
        .args(args)
        .output()
        .expect("failed to run fuzzer")
}

fn stdout_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ── Usage errors ─────────────────────────────────────────────────────────────

#[test]
fn test_missing_decoder_prints_usage_to_stdout() {
    let out = run(&[]);
    assert!(!out.status.success());
    #[cfg(unix)]
    assert_eq!(out.status.code(), Some(255), "exit(-1) is 255 on Unix");
    assert!(stdout_of(&out).contains("Usage:"), "stdout: {}", stdout_of(&out));
}

#[test]
fn test_unknown_decoder_reports_on_stderr() {
    let out = run(&["-n", "1", "no-such-decoder"]);
    assert!(!out.status.success());
    #[cfg(unix)]
    assert_eq!(out.status.code(), Some(255));
    assert!(
        stderr_of(&out).contains("Unknown decoder type 'no-such-decoder'"),
        "stderr: {}",
        stderr_of(&out)
    );
    assert!(!stdout_of(&out).contains("Iteration"));
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[test]
fn test_list_prints_registered_decoders() {
    let out = run(&["--list"]);
    assert!(out.status.success());
    let text = stdout_of(&out);
    for name in ["null-pass-through", "-lz4-", "-lz5-"] {
        assert!(text.lines().any(|l| l == name), "missing {} in {}", name, text);
    }
}

// ── Bounded runs ─────────────────────────────────────────────────────────────

#[test]
fn test_null_pass_through_reads_64_bytes() {
    let out = run(&["-n", "2", "-l", "64", "-s", "1", "null-pass-through"]);
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    let text = stdout_of(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "Iteration 0:",
            "\tTest complete (end of file, read 64 bytes)",
            "Iteration 1:",
            "\tTest complete (end of file, read 64 bytes)",
        ]
    );
}

#[test]
fn test_hyphenated_decoder_name_is_accepted() {
    let out = run(&["-n", "3", "-l", "4096", "-s", "2", "-lz5-"]);
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    let text = stdout_of(&out);
    assert_eq!(text.matches("Test complete").count(), 3);
}

#[test]
fn test_same_seed_same_output() {
    let args = ["-n", "4", "-l", "2048", "-s", "77", "-lz5-"];
    let a = run(&args);
    let b = run(&args);
    assert!(a.status.success() && b.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn test_seed_banner_on_stderr() {
    let out = run(&["-n", "1", "-l", "16", "-s", "5", "null-pass-through"]);
    assert!(out.status.success());
    assert!(stderr_of(&out).contains("seed 5"), "stderr: {}", stderr_of(&out));
    let quiet = run(&["-q", "-n", "1", "-l", "16", "-s", "5", "null-pass-through"]);
    assert!(!stderr_of(&quiet).contains("seed"));
}
