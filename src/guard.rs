//! Canary-guarded heap blocks.
//!
//! A [`GuardedBlock`] is a single system allocation laid out as
//!
//! ```text
//! [ size record: usize ][ leading canary: 16 ][ usable: n ][ trailing canary: 16 ]
//! ```
//!
//! The usable region is what a decoder under test is handed.  Any write that
//! strays past either end of it lands in a canary, and [`GuardedBlock::verify`]
//! reports the first damaged byte.  The size record lives inside the
//! allocation and is checked against the block's own length first.
//!
//! [`GuardedBlock::as_mut_ptr`] derives its pointer from the allocation base,
//! so unsafe or foreign decoders that overrun through it corrupt the canaries
//! instead of unrelated heap memory.

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::{self, NonNull};

/// Fixed pattern written on both sides of every usable region.
pub const CANARY: [u8; 16] = [
    0xdf, 0xba, 0x18, 0xa0, 0x51, 0x91, 0x3c, 0xd6,
    0x03, 0xfb, 0x2c, 0xa6, 0xd6, 0x88, 0xa5, 0x75,
];

const SIZE_RECORD: usize = core::mem::size_of::<usize>();
const USABLE_OFFSET: usize = SIZE_RECORD + CANARY.len();
const ALIGN: usize = core::mem::align_of::<usize>();

// ─────────────────────────────────────────────────────────────────────────────
// Violation report
// ─────────────────────────────────────────────────────────────────────────────

/// First mismatch found by [`GuardedBlock::verify`].
///
/// Offsets are relative to the start of the canary they were found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardViolation {
    /// The stored size record no longer matches the allocation size.
    SizeRecord { expected: usize, found: usize },
    /// A byte immediately before the usable region was overwritten.
    Leading { offset: usize, found: u8 },
    /// A byte immediately after the usable region was overwritten.
    Trailing { offset: usize, found: u8 },
}

impl fmt::Display for GuardViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            GuardViolation::SizeRecord { expected, found } => write!(
                f,
                "size record overwritten (expected {}, found {})",
                expected, found
            ),
            GuardViolation::Leading { offset, found } => write!(
                f,
                "leading canary damaged at byte {} (expected 0x{:02x}, found 0x{:02x})",
                offset, CANARY[offset], found
            ),
            GuardViolation::Trailing { offset, found } => write!(
                f,
                "trailing canary damaged at byte {} (expected 0x{:02x}, found 0x{:02x})",
                offset, CANARY[offset], found
            ),
        }
    }
}

impl std::error::Error for GuardViolation {}

// ─────────────────────────────────────────────────────────────────────────────
// GuardedBlock
// ─────────────────────────────────────────────────────────────────────────────

/// Heap block of `len` zero-initialised bytes flanked by [`CANARY`] copies.
pub struct GuardedBlock {
    base: NonNull<u8>,
    len: usize,
}

/// Total allocation layout for a usable region of `n` bytes.
///
/// Aborts when the size computation overflows.
fn layout_for(n: usize) -> Layout {
    let total = n
        .checked_add(USABLE_OFFSET + CANARY.len())
        .and_then(|t| Layout::from_size_align(t, ALIGN).ok());
    match total {
        Some(layout) => layout,
        None => crate::fatal!("guarded allocation of {} bytes overflows the address space", n),
    }
}

impl GuardedBlock {
    /// Allocate a block with `n` usable bytes, all zero.
    ///
    /// Aborts the process via [`alloc::handle_alloc_error`] if the system
    /// allocator cannot satisfy the request.
    pub fn allocate(n: usize) -> Self {
        let layout = layout_for(n);
        // SAFETY: `layout` always has a non-zero size (two canaries plus the
        // size record).
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let base = match NonNull::new(raw) {
            Some(p) => p,
            None => alloc::handle_alloc_error(layout),
        };

        // SAFETY: every write below stays inside the `layout.size()` bytes
        // just allocated: [0, SIZE_RECORD) for the record, then the two
        // canaries at USABLE_OFFSET - 16 and USABLE_OFFSET + n.
        unsafe {
            ptr::write_unaligned(base.as_ptr() as *mut usize, n);
            ptr::copy_nonoverlapping(
                CANARY.as_ptr(),
                base.as_ptr().add(SIZE_RECORD),
                CANARY.len(),
            );
            ptr::copy_nonoverlapping(
                CANARY.as_ptr(),
                base.as_ptr().add(USABLE_OFFSET + n),
                CANARY.len(),
            );
        }

        GuardedBlock { base, len: n }
    }

    /// Number of usable bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pointer to the first usable byte.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        // SAFETY: USABLE_OFFSET is within the allocation.
        unsafe { self.base.as_ptr().add(USABLE_OFFSET) }
    }

    /// Mutable pointer to the first usable byte.
    ///
    /// The pointer is derived from the allocation base, so it is valid (if
    /// wrong) to write through it into the canaries; `verify` will then
    /// report the damage.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        // SAFETY: USABLE_OFFSET is within the allocation.
        unsafe { self.base.as_ptr().add(USABLE_OFFSET) }
    }

    /// The usable region.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the usable region is `len` initialised bytes owned by self.
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// The usable region, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let len = self.len;
        // SAFETY: as above, and `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }

    /// Reset the usable region to all zeroes.
    #[inline]
    pub fn zero(&mut self) {
        self.as_mut_slice().fill(0);
    }

    /// Check the size record and both canaries.
    pub fn verify(&self) -> Result<(), GuardViolation> {
        let base = self.base.as_ptr();

        // SAFETY: the record occupies the first SIZE_RECORD bytes.
        let stored = unsafe { ptr::read_unaligned(base as *const usize) };
        if stored != self.len {
            return Err(GuardViolation::SizeRecord { expected: self.len, found: stored });
        }

        // SAFETY: both canaries lie inside the allocation for `self.len`.
        let (leading, trailing) = unsafe {
            (
                std::slice::from_raw_parts(base.add(SIZE_RECORD), CANARY.len()),
                std::slice::from_raw_parts(base.add(USABLE_OFFSET + self.len), CANARY.len()),
            )
        };

        if let Some(offset) = first_mismatch(leading) {
            return Err(GuardViolation::Leading { offset, found: leading[offset] });
        }
        if let Some(offset) = first_mismatch(trailing) {
            return Err(GuardViolation::Trailing { offset, found: trailing[offset] });
        }
        Ok(())
    }
}

fn first_mismatch(region: &[u8]) -> Option<usize> {
    region.iter().zip(CANARY.iter()).position(|(a, b)| a != b)
}

impl Drop for GuardedBlock {
    fn drop(&mut self) {
        // SAFETY: `base` was returned by `alloc_zeroed` with exactly this
        // layout and is freed only here.
        unsafe { alloc::dealloc(self.base.as_ptr(), layout_for(self.len)) }
    }
}

impl fmt::Debug for GuardedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedBlock")
            .field("len", &self.len)
            .field("intact", &self.verify().is_ok())
            .finish()
    }
}

/// Free a block, canaries and size record included.  `None` is a no-op.
///
/// The canaries are not checked; call [`GuardedBlock::verify`] first when
/// that matters.
pub fn release(block: Option<GuardedBlock>) {
    drop(block);
}
