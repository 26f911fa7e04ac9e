//! Pass-through "decoder" for stored (uncompressed) archive members.
//!
//! Copies input to output until the source runs dry.  Also registered under
//! LArc's stored-method ID `-lz4-`.

use super::{Decoder, DecoderDescriptor};
use crate::source::PullSource;

pub const NAME: &str = "null-pass-through";

/// Bytes copied per read call.
pub const OUTPUT_BUFFER_SIZE: usize = 4096;

pub static DESCRIPTOR: DecoderDescriptor = DecoderDescriptor {
    name: NAME,
    state_size: 0,
    max_output_chunk: OUTPUT_BUFFER_SIZE,
    init,
};

struct NullDecoder<'a> {
    source: &'a mut dyn PullSource,
}

fn init<'a>(_state: &'a mut [u8], source: &'a mut dyn PullSource) -> Option<Box<dyn Decoder + 'a>> {
    Some(Box::new(NullDecoder { source }))
}

impl Decoder for NullDecoder<'_> {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.source.pull(&mut buf[filled..]);
            if n == 0 {
                break;
            }
            filled += n;
        }
        filled
    }
}
