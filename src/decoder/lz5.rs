//! LArc `-lz5-` decoder: LZSS over a 4 KiB history window.
//!
//! The compressed stream is a sequence of groups, each introduced by one flag
//! byte whose bits (least significant first) describe the next eight
//! commands:
//!
//! * bit set: one literal byte follows.
//! * bit clear: two bytes `lo, hi` follow, encoding a window position
//!   `lo | (hi & 0xf0) << 4` and a copy length `(hi & 0x0f) + 3`.
//!
//! Positions are absolute indices into the ring buffer, which starts out
//! pre-filled with a fixed pattern so that early copies have something to
//! reference.  One `read` call decodes exactly one group.

use super::{Decoder, DecoderDescriptor};
use crate::source::PullSource;

pub const NAME: &str = "-lz5-";

pub const RING_BUFFER_SIZE: usize = 4096;
const RING_MASK: usize = RING_BUFFER_SIZE - 1;

/// Shortest copy a command can encode.
const COPY_THRESHOLD: usize = 3;
/// Longest copy a command can encode.
const MAX_COPY: usize = 0x0f + COPY_THRESHOLD;
/// Commands per flag byte.
const COMMANDS_PER_GROUP: usize = 8;

/// One group can emit at most eight maximal copies.
pub const OUTPUT_BUFFER_SIZE: usize = COMMANDS_PER_GROUP * MAX_COPY;

/// Write position after the initial fill.
const INITIAL_POSITION: usize = RING_BUFFER_SIZE - MAX_COPY;

pub static DESCRIPTOR: DecoderDescriptor = DecoderDescriptor {
    name: NAME,
    state_size: RING_BUFFER_SIZE,
    max_output_chunk: OUTPUT_BUFFER_SIZE,
    init,
};

struct Lz5Decoder<'a> {
    ringbuf: &'a mut [u8],
    ringbuf_pos: usize,
    source: &'a mut dyn PullSource,
}

/// Fill the history window with the LArc start-up pattern.
///
/// 13 copies of every byte value, an ascending run, a descending run, 128
/// zeroes, then spaces up to the initial write position.  The last 18 bytes
/// keep their zeroed state.
fn fill_ring_buffer(ringbuf: &mut [u8]) -> usize {
    let mut p = 0;
    for b in 0..=255u8 {
        ringbuf[p..p + 13].fill(b);
        p += 13;
    }
    for b in 0..=255u8 {
        ringbuf[p] = b;
        p += 1;
    }
    for b in (0..=255u8).rev() {
        ringbuf[p] = b;
        p += 1;
    }
    ringbuf[p..p + 128].fill(0);
    p += 128;
    ringbuf[p..INITIAL_POSITION].fill(b' ');
    INITIAL_POSITION
}

fn init<'a>(state: &'a mut [u8], source: &'a mut dyn PullSource) -> Option<Box<dyn Decoder + 'a>> {
    let ringbuf = state.get_mut(..RING_BUFFER_SIZE)?;
    let ringbuf_pos = fill_ring_buffer(ringbuf);
    Some(Box::new(Lz5Decoder { ringbuf, ringbuf_pos, source }))
}

impl Lz5Decoder<'_> {
    fn read_byte(&mut self) -> Option<u8> {
        let mut b = [0u8; 1];
        match self.source.pull(&mut b) {
            0 => None,
            _ => Some(b[0]),
        }
    }

    #[inline]
    fn output_byte(&mut self, buf: &mut [u8], filled: &mut usize, b: u8) {
        buf[*filled] = b;
        *filled += 1;
        self.ringbuf[self.ringbuf_pos] = b;
        self.ringbuf_pos = (self.ringbuf_pos + 1) & RING_MASK;
    }

    /// Decode one command.  `None` means the input ended mid-command.
    fn command(&mut self, literal: bool, buf: &mut [u8], filled: &mut usize) -> Option<()> {
        if literal {
            let b = self.read_byte()?;
            self.output_byte(buf, filled, b);
            return Some(());
        }

        let lo = self.read_byte()? as usize;
        let hi = self.read_byte()? as usize;
        let start = lo | ((hi & 0xf0) << 4);
        let count = (hi & 0x0f) + COPY_THRESHOLD;

        // Byte-at-a-time so that overlapping copies repeat recent output.
        for i in 0..count {
            let b = self.ringbuf[(start + i) & RING_MASK];
            self.output_byte(buf, filled, b);
        }
        Some(())
    }
}

impl Decoder for Lz5Decoder<'_> {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let Some(flags) = self.read_byte() else {
            return 0;
        };

        let mut filled = 0;
        for bit in 0..COMMANDS_PER_GROUP {
            let literal = flags & (1 << bit) != 0;
            if self.command(literal, buf, &mut filled).is_none() {
                break;
            }
        }
        filled
    }
}
