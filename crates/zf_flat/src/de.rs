use core::mem;
use core::ptr;

use thiserror::Error;

use crate::{Flatten, NULL_OFFSET, Offset};

// -----------------------------------------------------------------------------
// Error

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeserializeError {
    /// A stored offset points outside the loaded buffer.
    ///
    /// Only produced when an upper bound was supplied; the whole
    /// deserialize call is aborted, never just the offending subtree.
    #[error("stored offset {offset} out of range for a buffer of {len} bytes")]
    OffsetOutOfRange { offset: Offset, len: u64 },
}

// -----------------------------------------------------------------------------
// DeserializeContext

/// The loaded buffer's address range, used to re-base stored offsets.
///
/// `to` is optional: without it, [`rebase_ptr`](Self::rebase_ptr) skips
/// the range check entirely — the unsafe fast path for trusted buffers.
pub struct DeserializeContext {
    from: *mut u8,
    /// One past the end of the buffer; null disables bounds checking.
    to: *mut u8,
}

impl DeserializeContext {
    /// Creates a context for the region starting at `from`.
    pub fn new(from: *mut u8, to: Option<*mut u8>) -> Self {
        Self {
            from,
            to: to.unwrap_or(ptr::null_mut()),
        }
    }

    /// Turns a stored offset (smuggled in pointer bits) into a live pointer.
    ///
    /// The sentinel becomes null; everything else becomes `from + offset`,
    /// verified against the upper bound when one was supplied. `stored`
    /// must hold offset bits written by the serializer, not a real
    /// pointer; the returned pointer is only useful if `from` is the start
    /// of the live buffer those offsets were written for.
    pub fn rebase_ptr<T>(&self, stored: *const T) -> Result<*mut T, DeserializeError> {
        let offset = stored as usize as Offset;
        if offset == NULL_OFFSET {
            return Ok(ptr::null_mut());
        }

        if !self.to.is_null() {
            let len = self.to as u64 - self.from as u64;
            if offset >= len {
                return Err(DeserializeError::OffsetOutOfRange { offset, len });
            }
        }

        Ok(self.from.wrapping_add(offset as usize).cast())
    }
}

// -----------------------------------------------------------------------------
// Entry points

/// Reconstitutes a `T` serialized into `bytes`, in place, with bounds
/// checking.
///
/// No allocation happens; pointer-bearing fields of the buffer are
/// mutated and a typed view into the same memory is returned. Every
/// stored offset is verified against the buffer length.
///
/// # Safety
///
/// - `bytes` must have been produced by serializing a `T` (same build:
///   layouts are not portable), starting at its first byte.
/// - `bytes` must be aligned for `T`; buffers produced by
///   [`serialize`](crate::serialize) into a [`Buf`](crate::Buf) are.
/// - The buffer must not have been deserialized before: the pass is
///   one-shot, re-basing twice corrupts every pointer.
pub unsafe fn deserialize<T: Flatten>(bytes: &mut [u8]) -> Result<&mut T, DeserializeError> {
    if (bytes.len() as u64) < mem::size_of::<T>() as u64 {
        return Err(DeserializeError::OffsetOutOfRange {
            offset: mem::size_of::<T>() as Offset,
            len: bytes.len() as u64,
        });
    }

    let range = bytes.as_mut_ptr_range();
    let ctx = DeserializeContext::new(range.start, Some(range.end));

    debug_assert!(range.start as usize % mem::align_of::<T>() == 0, "buffer misaligned for root type");

    // SAFETY: caller guarantees the buffer holds a serialized `T` at
    // offset zero, aligned; the size was checked above.
    let root = unsafe { &mut *range.start.cast::<T>() };
    // SAFETY: first pass over a buffer produced for `T`, per the caller.
    unsafe { root.rebase(&ctx)? };
    Ok(root)
}

/// Reconstitutes a `T` at `from`, in place, without bounds checking.
///
/// The documented unsafe fast path: no upper bound is known, so corrupted
/// offsets are applied blindly instead of failing. The returned `Result`
/// is always `Ok`; it only mirrors [`deserialize`] so the two entry
/// points are interchangeable.
///
/// # Safety
///
/// As [`deserialize`], plus: `from` must point at a buffer whose stored
/// offsets are all in range, since nothing verifies them here.
pub unsafe fn deserialize_unchecked<'a, T: Flatten>(
    from: *mut u8,
) -> Result<&'a mut T, DeserializeError> {
    let ctx = DeserializeContext::new(from, None);

    debug_assert!(from as usize % mem::align_of::<T>() == 0, "buffer misaligned for root type");

    // SAFETY: caller guarantees a serialized `T` at `from`, aligned.
    let root = unsafe { &mut *from.cast::<T>() };
    // SAFETY: first pass over a buffer produced for `T`, per the caller.
    unsafe { root.rebase(&ctx)? };
    Ok(root)
}

// -----------------------------------------------------------------------------
// Tests
