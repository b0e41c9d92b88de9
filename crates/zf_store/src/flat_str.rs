use alloc::alloc as malloc;
use core::alloc::Layout;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem;
use core::ops::Deref;
use core::ptr::{self, NonNull};
use core::slice;
use core::str;

// -----------------------------------------------------------------------------
// Representation
//
// Both variants are exactly 16 bytes. The last byte discriminates: values
// `0..=15` are the inline length, `0xFF` marks the heap form.

/// Maximum number of bytes stored inline in the header.
const INLINE_CAPACITY: usize = 15;

/// Last-byte value marking the heap representation.
const HEAP_MARKER: u8 = 0xFF;

#[repr(C)]
#[derive(Clone, Copy)]
struct HeapRepr {
    data: *mut u8,
    size: u32,
    self_allocated: bool,
    _pad: [u8; 2],
    marker: u8,
}

#[repr(C)]
#[derive(Clone, Copy)]
struct InlineRepr {
    bytes: [u8; INLINE_CAPACITY],
    len: u8,
}

#[repr(C)]
union Repr {
    heap: HeapRepr,
    inline: InlineRepr,
}

const _: () = {
    assert!(mem::size_of::<HeapRepr>() == 16);
    assert!(mem::size_of::<InlineRepr>() == 16);
    assert!(mem::size_of::<Repr>() == 16);
    // The discriminating byte must be the same byte in both variants.
    assert!(mem::offset_of!(HeapRepr, marker) == mem::offset_of!(InlineRepr, len));
};

/// Layout for `len` heap bytes; `len` fits in `u32`, so this cannot fail.
fn byte_layout(len: usize) -> Layout {
    match Layout::array::<u8>(len) {
        Ok(layout) => layout,
        Err(_) => unreachable!("string length exceeds isize::MAX"),
    }
}

// -----------------------------------------------------------------------------
// FlatStr

/// A 16-byte string with a small-string optimization.
///
/// Contents of up to 15 bytes are stored inline in the header and never
/// touch the serialization buffer; longer contents live behind a heap
/// pointer with an ownership flag, exactly like [`FlatVec`] storage.
///
/// [`FlatVec`]: crate::FlatVec
///
/// # Examples
///
/// ```
/// use zf_store::FlatStr;
///
/// let short = FlatStr::from("checksum");
/// let long = FlatStr::from("a string longer than fifteen bytes");
///
/// assert!(short.is_inline());
/// assert!(!long.is_inline());
/// assert_eq!(&*long, "a string longer than fifteen bytes");
/// ```
#[repr(C)]
pub struct FlatStr {
    repr: Repr,
}

impl FlatStr {
    /// Creates an empty (inline) string.
    #[inline]
    pub const fn new() -> Self {
        Self {
            repr: Repr {
                inline: InlineRepr {
                    bytes: [0; INLINE_CAPACITY],
                    len: 0,
                },
            },
        }
    }

    /// Returns `true` if the contents are stored inline in the header.
    #[inline]
    pub const fn is_inline(&self) -> bool {
        // SAFETY: the last byte is initialized in both representations.
        unsafe { self.repr.inline.len != HEAP_MARKER }
    }

    /// Returns the length in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        if self.is_inline() {
            // SAFETY: inline representation checked above.
            unsafe { self.repr.inline.len as usize }
        } else {
            // SAFETY: heap representation.
            unsafe { self.repr.heap.size as usize }
        }
    }

    /// Returns `true` if the string is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the contents as bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        if self.is_inline() {
            // SAFETY: inline representation; `len <= INLINE_CAPACITY`.
            unsafe { &self.repr.inline.bytes[..self.repr.inline.len as usize] }
        } else {
            // SAFETY: the heap pointer refers to `size` initialized bytes
            // (invariant of `from` and of `rebase`).
            unsafe { slice::from_raw_parts(self.repr.heap.data, self.repr.heap.size as usize) }
        }
    }

    /// Returns the contents as `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: every constructor copies from a valid `&str`.
        unsafe { str::from_utf8_unchecked(self.as_bytes()) }
    }
}

// -----------------------------------------------------------------------------
// Engine support
//
// Layout knowledge shared with `zf_flat`. Not stable API.

impl FlatStr {
    #[doc(hidden)]
    pub const DATA_OFFSET: usize = mem::offset_of!(HeapRepr, data);

    #[doc(hidden)]
    pub const SELF_ALLOCATED_OFFSET: usize = mem::offset_of!(HeapRepr, self_allocated);

    /// Returns the heap data pointer.
    ///
    /// Must only be called on the heap representation.
    #[doc(hidden)]
    pub fn heap_data(&self) -> *mut u8 {
        debug_assert!(!self.is_inline());
        // SAFETY: heap representation per the caller contract.
        unsafe { self.repr.heap.data }
    }

    /// Replaces the heap data pointer without touching size or ownership.
    ///
    /// # Safety
    /// `self` must be the heap representation, must not own its current
    /// storage, and `data` must point to `len()` bytes outliving `self`.
    #[doc(hidden)]
    pub unsafe fn set_heap_data(&mut self, data: *mut u8) {
        debug_assert!(!self.is_inline());
        // SAFETY: heap representation per the caller contract.
        let mut heap = unsafe { self.repr.heap };
        heap.data = data;
        self.repr.heap = heap;
    }
}

// -----------------------------------------------------------------------------
// Std traits

impl From<&str> for FlatStr {
    fn from(s: &str) -> Self {
        if s.len() <= INLINE_CAPACITY {
            let mut inline = InlineRepr {
                bytes: [0; INLINE_CAPACITY],
                len: s.len() as u8,
            };
            inline.bytes[..s.len()].copy_from_slice(s.as_bytes());
            return Self {
                repr: Repr { inline },
            };
        }

        assert!(s.len() <= u32::MAX as usize, "string length overflows the header");
        let layout = byte_layout(s.len());
        // SAFETY: `layout` has non-zero size (`len > INLINE_CAPACITY`).
        let data = NonNull::new(unsafe { malloc::alloc(layout) })
            .unwrap_or_else(|| malloc::handle_alloc_error(layout))
            .as_ptr();
        // SAFETY: `data` is valid for `len` bytes, the source is a `&str`.
        unsafe {
            ptr::copy_nonoverlapping(s.as_ptr(), data, s.len());
        }

        Self {
            repr: Repr {
                heap: HeapRepr {
                    data,
                    size: s.len() as u32,
                    self_allocated: true,
                    _pad: [0; 2],
                    marker: HEAP_MARKER,
                },
            },
        }
    }
}

impl Drop for FlatStr {
    fn drop(&mut self) {
        if self.is_inline() {
            return;
        }
        // SAFETY: heap representation checked above.
        let heap = unsafe { self.repr.heap };
        if heap.self_allocated && !heap.data.is_null() {
            // SAFETY: self-allocated heap data was allocated in `from`
            // with the layout for `size` bytes.
            unsafe {
                malloc::dealloc(heap.data, byte_layout(heap.size as usize));
            }
        }
    }
}

impl Clone for FlatStr {
    fn clone(&self) -> Self {
        Self::from(self.as_str())
    }
}

impl Default for FlatStr {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for FlatStr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for FlatStr {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for FlatStr {}

impl PartialEq<str> for FlatStr {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for FlatStr {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Hash for FlatStr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Debug for FlatStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for FlatStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FlatStr, INLINE_CAPACITY};

    #[test]
    fn empty_is_inline() {
        let s = FlatStr::new();
        assert!(s.is_inline());
        assert!(s.is_empty());
        assert_eq!(s.as_str(), "");
    }

    #[test]
    fn inline_boundary() {
        let at = FlatStr::from("exactly15bytes!");
        assert_eq!(at.len(), INLINE_CAPACITY);
        assert!(at.is_inline());

        let over = FlatStr::from("exactly16bytes!!");
        assert_eq!(over.len(), INLINE_CAPACITY + 1);
        assert!(!over.is_inline());
    }

    #[test]
    fn round_trips_content() {
        for input in ["", "a", "hello", "something considerably longer than the header"] {
            let s = FlatStr::from(input);
            assert_eq!(s, input);
            assert_eq!(s.len(), input.len());
        }
    }

    #[test]
    fn clone_is_deep() {
        let a = FlatStr::from("a heap-allocated string value");
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a.heap_data(), b.heap_data());
    }

    #[test]
    fn layout() {
        assert_eq!(core::mem::size_of::<FlatStr>(), 16);
        assert_eq!(FlatStr::DATA_OFFSET, 0);
        assert_eq!(FlatStr::SELF_ALLOCATED_OFFSET, 12);
    }
}
