//! Pull-based input for decoders under test.
//!
//! Decoders never see the fuzz buffer directly; they ask a [`PullSource`] for
//! more bytes whenever they run dry.  [`StreamCursor`] answers every request
//! with at most one byte, whatever the capacity offered, so that every
//! refill path and every partially-filled state in the decoder is taken as
//! often as possible.

/// Input callback handed to a decoder at initialisation.
///
/// `pull` writes up to `buf.len()` bytes into `buf` and returns how many it
/// wrote.  For a non-empty `buf`, a return of 0 means the stream has ended.
///
/// An empty `buf` always gets 0 and must not be read as end of stream;
/// callers that need to tell the two apart pass at least one byte of room.
pub trait PullSource {
    fn pull(&mut self, buf: &mut [u8]) -> usize;
}

impl<F> PullSource for F
where
    F: FnMut(&mut [u8]) -> usize,
{
    #[inline]
    fn pull(&mut self, buf: &mut [u8]) -> usize {
        self(buf)
    }
}

/// Read position over a borrowed, immutable input buffer.
///
/// Invariant: `read_offset <= data.len()`.
#[derive(Debug, Clone)]
pub struct StreamCursor<'a> {
    data: &'a [u8],
    read_offset: usize,
}

impl<'a> StreamCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        StreamCursor { data, read_offset: 0 }
    }

    /// Bytes handed out so far.
    #[inline]
    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    /// Total length of the underlying buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.read_offset
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.read_offset >= self.data.len()
    }
}

impl PullSource for StreamCursor<'_> {
    /// Deliver a single byte, or 0 at end of data.
    ///
    /// A zero-capacity `buf` gets nothing and consumes nothing.
    fn pull(&mut self, buf: &mut [u8]) -> usize {
        if self.is_eof() || buf.is_empty() {
            return 0;
        }
        buf[0] = self.data[self.read_offset];
        self.read_offset += 1;
        1
    }
}
