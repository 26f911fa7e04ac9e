// Integration tests for fuzz/ — the driver loop
//
// Covers:
// - every registered decoder terminates cleanly on 1,000 zero bytes and on
//   1,000 0xFF bytes, consuming no more than the input
// - null-pass-through on 64 random bytes reads all 64
// - identical seeds give identical iterations
// - init failure and oversized reads surface as HarnessError
// - writes past the output buffer are pinned to the read call that made them
// - writes before the decoder state during release are caught afterwards
// - the bounded Fuzzer loop prints one pair of lines per iteration

use rand::rngs::StdRng;
use rand::SeedableRng;

use lhafuzz::config::FuzzConfig;
use lhafuzz::decoder::{decoder_for_name, decoder_names, Decoder, DecoderDescriptor};
use lhafuzz::error::{BlockKind, HarnessError};
use lhafuzz::fuzz::{fuzz_block, fuzz_test, run_fuzz_test, Fuzzer};
use lhafuzz::guard::{GuardViolation, CANARY};
use lhafuzz::source::PullSource;

// ─────────────────────────────────────────────────────────────────────────────
// Test decoders
// ─────────────────────────────────────────────────────────────────────────────

fn refuse_init<'a>(_: &'a mut [u8], _: &'a mut dyn PullSource) -> Option<Box<dyn Decoder + 'a>> {
    None
}

static REFUSES: DecoderDescriptor = DecoderDescriptor {
    name: "refuses",
    state_size: 16,
    max_output_chunk: 16,
    init: refuse_init,
};

/// Claims one byte more than the buffer holds, without writing it.
struct Boastful;

impl Decoder for Boastful {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        buf.len() + 1
    }
}

fn boastful_init<'a>(_: &'a mut [u8], _: &'a mut dyn PullSource) -> Option<Box<dyn Decoder + 'a>> {
    Some(Box::new(Boastful))
}

static BOASTFUL: DecoderDescriptor = DecoderDescriptor {
    name: "boastful",
    state_size: 0,
    max_output_chunk: 8,
    init: boastful_init,
};

/// Fills the output on every read, then on read number `OVERRUN_CALL` also
/// writes one byte just past the end of it.
struct Overrunner {
    reads: u64,
}

const OVERRUN_CALL: u64 = 3;

impl Decoder for Overrunner {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        self.reads += 1;
        buf.fill(0x55);
        if self.reads == OVERRUN_CALL {
            // SAFETY: the output buffer sits inside a guarded block, so the
            // byte after it is the first trailing canary byte.
            unsafe { *buf.as_mut_ptr().add(buf.len()) = 0 };
        }
        buf.len()
    }
}

fn overrunner_init<'a>(_: &'a mut [u8], _: &'a mut dyn PullSource) -> Option<Box<dyn Decoder + 'a>> {
    Some(Box::new(Overrunner { reads: 0 }))
}

static OVERRUNNER: DecoderDescriptor = DecoderDescriptor {
    name: "overrunner",
    state_size: 0,
    max_output_chunk: 12,
    init: overrunner_init,
};

/// Produces nothing, then clobbers the byte before its state on release.
struct Underrunner<'a> {
    state: &'a mut [u8],
}

impl Decoder for Underrunner<'_> {
    fn read(&mut self, _: &mut [u8]) -> usize {
        0
    }

    fn release(&mut self) {
        // SAFETY: the state sits inside a guarded block, so the byte before
        // it is the last leading canary byte.
        unsafe { *self.state.as_mut_ptr().sub(1) = 0 };
    }
}

fn underrunner_init<'a>(
    state: &'a mut [u8],
    _: &'a mut dyn PullSource,
) -> Option<Box<dyn Decoder + 'a>> {
    Some(Box::new(Underrunner { state }))
}

static UNDERRUNNER: DecoderDescriptor = DecoderDescriptor {
    name: "underrunner",
    state_size: 8,
    max_output_chunk: 4,
    init: underrunner_init,
};

/// Fills its whole state region and output buffer on every read, one read
/// per input byte.
struct Scribbler<'a> {
    state: &'a mut [u8],
    source: &'a mut dyn PullSource,
}

impl Decoder for Scribbler<'_> {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut b = [0u8; 1];
        if self.source.pull(&mut b) == 0 {
            return 0;
        }
        buf.fill(b[0]);
        self.state.fill(b[0]);
        buf.len()
    }

    fn release(&mut self) {
        self.state.fill(0xEE);
    }
}

fn scribbler_init<'a>(
    state: &'a mut [u8],
    source: &'a mut dyn PullSource,
) -> Option<Box<dyn Decoder + 'a>> {
    Some(Box::new(Scribbler { state, source }))
}

static SCRIBBLER: DecoderDescriptor = DecoderDescriptor {
    name: "scribbler",
    state_size: 33,
    max_output_chunk: 17,
    init: scribbler_init,
};

// ─────────────────────────────────────────────────────────────────────────────
// Robustness on fixed inputs
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn all_decoders_terminate_on_zero_bytes() {
    let data = vec![0u8; 1000];
    for name in decoder_names() {
        let desc = decoder_for_name(name).unwrap();
        let outcome = run_fuzz_test(desc, &data)
            .unwrap_or_else(|e| panic!("{} failed on zeros: {}", name, e));
        assert!(outcome.consumed <= data.len());
        assert!(outcome.read_calls >= 1);
    }
}

#[test]
fn all_decoders_terminate_on_ff_bytes() {
    let data = vec![0xFFu8; 1000];
    for name in decoder_names() {
        let desc = decoder_for_name(name).unwrap();
        let outcome = run_fuzz_test(desc, &data)
            .unwrap_or_else(|e| panic!("{} failed on 0xFF: {}", name, e));
        assert!(outcome.consumed <= data.len());
    }
}

#[test]
fn lz5_on_ff_bytes_is_all_literals() {
    // Every ninth byte is a flag; the other 8 are literals copied through.
    let data = vec![0xFFu8; 1000];
    let outcome = run_fuzz_test(decoder_for_name("-lz5-").unwrap(), &data).unwrap();
    assert_eq!(outcome.consumed, 1000);
    assert_eq!(outcome.produced, 1000 - (1000 + 8) / 9);
}

#[test]
fn empty_input_finishes_in_one_read() {
    for name in decoder_names() {
        let outcome = run_fuzz_test(decoder_for_name(name).unwrap(), &[]).unwrap();
        assert_eq!(outcome.consumed, 0);
        assert_eq!(outcome.read_calls, 1);
        assert_eq!(outcome.produced, 0);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generated inputs
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn null_pass_through_reads_all_64_random_bytes() {
    let desc = decoder_for_name("null-pass-through").unwrap();
    let mut rng = StdRng::seed_from_u64(64);
    let report = fuzz_test(desc, &mut rng, 64).unwrap();
    assert_eq!(report.outcome.consumed, 64);
    assert_eq!(report.outcome.produced, 64);
    assert!(report.reached_eof());
    assert!(report.completion_line().contains("read 64 bytes"));
}

#[test]
fn random_inputs_never_trip_the_guards() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for name in decoder_names() {
        let desc = decoder_for_name(name).unwrap();
        for _ in 0..20 {
            let report = fuzz_test(desc, &mut rng, 4096)
                .unwrap_or_else(|e| panic!("{}: {}", name, e));
            assert!(report.outcome.consumed <= 4096);
        }
    }
}

#[test]
fn fuzz_block_is_deterministic_per_seed() {
    let mut a = vec![0u8; 256];
    let mut b = vec![0u8; 256];
    fuzz_block(&mut StdRng::seed_from_u64(5), &mut a);
    fuzz_block(&mut StdRng::seed_from_u64(5), &mut b);
    assert_eq!(a, b);
    let mut c = vec![0u8; 256];
    fuzz_block(&mut StdRng::seed_from_u64(6), &mut c);
    assert_ne!(a, c);
}

#[test]
fn same_seed_gives_same_iterations() {
    let desc = decoder_for_name("-lz5-").unwrap();
    let config = FuzzConfig { max_len: 8192, iterations: None, seed: 1234 };

    let mut first = Fuzzer::new(desc, config);
    let mut second = Fuzzer::new(desc, config);
    for _ in 0..5 {
        let a = first.run_iteration().unwrap();
        let b = second.run_iteration().unwrap();
        assert_eq!(a, b);
    }
    assert_eq!(first.iteration(), 5);
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder faults
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn init_failure_is_reported() {
    match run_fuzz_test(&REFUSES, &[1, 2, 3]) {
        Err(HarnessError::InitFailed { decoder }) => assert_eq!(decoder, "refuses"),
        other => panic!("expected InitFailed, got {:?}", other),
    }
}

#[test]
fn oversized_read_is_reported() {
    let err = run_fuzz_test(&BOASTFUL, &[0u8; 4]).unwrap_err();
    assert!(err.is_decoder_fault());
    match err {
        HarnessError::OversizedRead { reported, max, read_call, .. } => {
            assert_eq!(reported, 9);
            assert_eq!(max, 8);
            assert_eq!(read_call, 1);
        }
        other => panic!("expected OversizedRead, got {:?}", other),
    }
}

#[test]
fn output_overrun_is_pinned_to_its_read_call() {
    let err = run_fuzz_test(&OVERRUNNER, &[0u8; 16]).unwrap_err();
    assert!(err.is_decoder_fault());
    match err {
        HarnessError::GuardViolation { decoder, block, read_call, violation } => {
            assert_eq!(decoder, "overrunner");
            assert_eq!(block, BlockKind::Output);
            assert_eq!(read_call, OVERRUN_CALL);
            assert_eq!(violation, GuardViolation::Trailing { offset: 0, found: 0 });
        }
        other => panic!("expected GuardViolation, got {:?}", other),
    }
}

#[test]
fn state_underrun_in_release_is_reported() {
    let err = run_fuzz_test(&UNDERRUNNER, &[1, 2, 3]).unwrap_err();
    assert!(err.is_decoder_fault());
    match err {
        HarnessError::GuardViolation { decoder, block, read_call, violation } => {
            assert_eq!(decoder, "underrunner");
            assert_eq!(block, BlockKind::DecoderState);
            assert_eq!(read_call, 1);
            assert_eq!(
                violation,
                GuardViolation::Leading { offset: CANARY.len() - 1, found: 0 }
            );
        }
        other => panic!("expected GuardViolation, got {:?}", other),
    }
}

#[test]
fn full_in_bounds_writes_are_clean() {
    let data = [3u8; 10];
    let outcome = run_fuzz_test(&SCRIBBLER, &data).unwrap();
    assert_eq!(outcome.consumed, 10);
    assert_eq!(outcome.read_calls, 11);
    assert_eq!(outcome.produced, 170);
}

// ─────────────────────────────────────────────────────────────────────────────
// Bounded loop output
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn bounded_run_prints_progress_lines() {
    let desc = decoder_for_name("null-pass-through").unwrap();
    let config = FuzzConfig { max_len: 100, iterations: Some(3), seed: 7 };
    let mut fuzzer = Fuzzer::new(desc, config);
    let mut out = Vec::new();

    let done = fuzzer.run(&mut out).unwrap();
    assert_eq!(done, 3);

    let text = String::from_utf8(out).unwrap();
    let expected = "Iteration 0:\n\tTest complete (end of file, read 100 bytes)\n\
                    Iteration 1:\n\tTest complete (end of file, read 100 bytes)\n\
                    Iteration 2:\n\tTest complete (end of file, read 100 bytes)\n";
    assert_eq!(text, expected);
}

#[test]
fn zero_iteration_bound_prints_nothing() {
    let desc = decoder_for_name("-lz5-").unwrap();
    let config = FuzzConfig { max_len: 100, iterations: Some(0), seed: 7 };
    let mut out = Vec::new();
    assert_eq!(Fuzzer::new(desc, config).run(&mut out).unwrap(), 0);
    assert!(out.is_empty());
}
