//! Decoder capability descriptors and the name registry.
//!
//! The harness drives every decompressor through the same three operations:
//!
//! | Operation  | Entry point                      |
//! |------------|----------------------------------|
//! | initialize | [`DecoderDescriptor::init`]      |
//! | read       | [`Decoder::read`]                |
//! | release    | [`Decoder::release`] (optional)  |
//!
//! A descriptor also declares how much private state the decoder needs
//! (`state_size`, handed to `init` as a guarded byte region) and the most
//! bytes a single `read` may produce (`max_output_chunk`, the exact size of
//! the guarded output buffer).  The harness never looks past these fields.

pub mod lz5;
pub mod null;

use crate::source::PullSource;

/// A decoder instance bound to its state region and input source.
pub trait Decoder {
    /// Decode the next chunk into `buf`, returning the number of bytes
    /// written.  `buf.len()` is the descriptor's `max_output_chunk`.
    /// Returns 0 once no further output can be produced.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Tear down decoder-private resources.  Most decoders have none.
    fn release(&mut self) {}
}

/// Constructor stored in a [`DecoderDescriptor`].
///
/// `state` is exactly `state_size` zeroed bytes the decoder may use as its
/// working memory.  Returns `None` when the decoder cannot start.
pub type InitFn =
    for<'a> fn(state: &'a mut [u8], source: &'a mut dyn PullSource) -> Option<Box<dyn Decoder + 'a>>;

/// Static capability record for one decoder variant.
#[derive(Clone, Copy)]
pub struct DecoderDescriptor {
    /// Canonical name.
    pub name: &'static str,
    /// Bytes of decoder-private state the harness must reserve.
    pub state_size: usize,
    /// Upper bound on bytes produced by one `read` call.
    pub max_output_chunk: usize,
    pub init: InitFn,
}

impl std::fmt::Debug for DecoderDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderDescriptor")
            .field("name", &self.name)
            .field("state_size", &self.state_size)
            .field("max_output_chunk", &self.max_output_chunk)
            .finish()
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Lookup table from every accepted name (canonical names and archive method
/// IDs) to its descriptor.
static DECODERS: &[(&str, &DecoderDescriptor)] = &[
    (null::NAME, &null::DESCRIPTOR),
    ("-lz4-", &null::DESCRIPTOR),
    (lz5::NAME, &lz5::DESCRIPTOR),
];

/// Find the descriptor registered under `name`.
pub fn decoder_for_name(name: &str) -> Option<&'static DecoderDescriptor> {
    DECODERS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, desc)| desc)
}

/// Every name accepted by [`decoder_for_name`], in registration order.
pub fn decoder_names() -> impl Iterator<Item = &'static str> {
    DECODERS.iter().map(|&(n, _)| n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in decoder_names() {
            assert!(decoder_for_name(name).is_some(), "{} should resolve", name);
        }
    }

    #[test]
    fn aliases_share_a_descriptor() {
        let a = decoder_for_name("-lz4-").unwrap();
        let b = decoder_for_name(null::NAME).unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.name, null::NAME);
    }
}
