use core::mem;
use core::slice;

use zf_utils::hash::HashMap;

use crate::{Buf, Flatten, Offset, Target};

// -----------------------------------------------------------------------------
// Raw bytes

/// The raw in-memory bytes of `value`.
///
/// This is what lands in the buffer for root values, owned pointees, and
/// array blocks; pointer-bearing slots inside it are patched afterwards by
/// [`Flatten::flatten`]. Padding bytes are copied as-is.
pub(crate) fn raw_bytes_of<T>(value: &T) -> &[u8] {
    // SAFETY: any `&T` is readable as `size_of::<T>()` bytes.
    unsafe { slice::from_raw_parts((value as *const T).cast::<u8>(), mem::size_of::<T>()) }
}

// -----------------------------------------------------------------------------
// Report

/// A raw reference whose target was never registered as an ownership edge.
///
/// The slot keeps whatever bytes were copied with its containing block —
/// the stale address — so the buffer is syntactically valid but that one
/// reference is garbage on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DanglingRef {
    /// The unresolvable target address in the original graph.
    pub address: usize,
    /// The buffer offset of the slot that wanted to reference it.
    pub slot: Offset,
}

/// Diagnostics returned by [`serialize`] and [`serialize_into`].
///
/// Dangling references are recoverable by design: they are reported here
/// (and as `log::warn!`), never panicked on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeReport {
    /// One entry per unresolved reference, in fixup-queue order.
    pub dangling: Vec<DanglingRef>,
}

impl SerializeReport {
    /// Returns `true` if every reference in the graph was resolved.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
    }
}

// -----------------------------------------------------------------------------
// SerializeContext

/// A reference slot whose target had not been written when the reference
/// was encountered.
struct PendingFixup {
    /// Original in-memory address of the referenced object.
    target: usize,
    /// Buffer offset of the pointer-sized slot to patch.
    slot: Offset,
}

/// State of one in-flight serialize call.
///
/// Owns the identity→offset map and the pending-fixup queue and drives all
/// writes into the target. Created fresh per call; nothing carries over.
pub struct SerializeContext<'t> {
    target: &'t mut dyn Target,
    offsets: HashMap<usize, Offset>,
    pending: Vec<PendingFixup>,
}

impl<'t> SerializeContext<'t> {
    /// Creates a context writing into `target`.
    pub fn new(target: &'t mut dyn Target) -> Self {
        Self {
            target,
            offsets: HashMap::default(),
            pending: Vec::new(),
        }
    }

    /// Appends `bytes` at the next offset satisfying `align`.
    #[inline]
    pub fn write(&mut self, bytes: &[u8], align: usize) -> Offset {
        self.target.write(bytes, align)
    }

    /// Overwrites the slot at `pos` with the raw bytes of `value`.
    ///
    /// `V` must be a plain fixed-width value without padding (offsets,
    /// counts, flags).
    #[inline]
    pub fn patch<V: Copy>(&mut self, pos: Offset, value: V) {
        self.target.patch(pos, raw_bytes_of(&value));
    }

    /// Registers `address` as written at `offset` — an ownership edge.
    ///
    /// Exactly one owner may claim an address; a second registration is a
    /// precondition violation by the caller.
    pub fn register(&mut self, address: usize, offset: Offset) {
        let previous = self.offsets.insert(address, offset);
        debug_assert!(
            previous.is_none(),
            "double ownership: address {address:#x} registered twice",
        );
    }

    /// Looks up the offset a registered address was written at.
    #[inline]
    pub fn resolve(&self, address: usize) -> Option<Offset> {
        self.offsets.get(&address).copied()
    }

    /// Queues `slot` to be patched once `address` gets registered.
    ///
    /// The reference is optimistically assumed resolvable; if the owning
    /// edge never shows up in the traversal, the flush in
    /// [`serialize_into`] reports it as dangling.
    #[inline]
    pub fn defer(&mut self, address: usize, slot: Offset) {
        self.pending.push(PendingFixup {
            target: address,
            slot,
        });
    }

    /// Flushes the pending fixups, in the order they were enqueued.
    fn finish(mut self) -> SerializeReport {
        let pending = mem::take(&mut self.pending);
        let mut dangling = Vec::new();

        for fixup in pending {
            match self.offsets.get(&fixup.target) {
                Some(&offset) => self.target.patch(fixup.slot, raw_bytes_of(&offset)),
                None => {
                    log::warn!(
                        "dangling reference: address {:#x} serialized at offset {}",
                        fixup.target,
                        fixup.slot,
                    );
                    dangling.push(DanglingRef {
                        address: fixup.target,
                        slot: fixup.slot,
                    });
                }
            }
        }

        SerializeReport { dangling }
    }
}

// -----------------------------------------------------------------------------
// Entry points

/// Flattens `value` and everything it references into `target`.
///
/// The root's raw bytes land first (at offset zero plus any leading
/// alignment padding), followed by referenced blocks in traversal order.
/// The root's own address is registered, so weak references back at the
/// root resolve.
///
/// Dangling references are reported, not failed on; see
/// [`SerializeReport`].
pub fn serialize_into<T: Flatten>(target: &mut dyn Target, value: &T) -> SerializeReport {
    let mut ctx = SerializeContext::new(target);

    let root = ctx.write(raw_bytes_of(value), mem::align_of::<T>());
    ctx.register(value as *const T as usize, root);
    value.flatten(&mut ctx, root);

    ctx.finish()
}

/// Flattens `value` into a fresh aligned in-memory buffer.
///
/// # Examples
///
/// ```
/// use zf_flat::{derive::Flatten, serialize};
///
/// #[repr(C)]
/// #[derive(Flatten)]
/// struct Pair {
///     a: u32,
///     b: u32,
/// }
///
/// let (buf, report) = serialize(&Pair { a: 1, b: 2 });
/// assert!(report.is_clean());
/// assert_eq!(buf.len(), 8);
/// ```
pub fn serialize<T: Flatten>(value: &T) -> (Buf, SerializeReport) {
    let mut buf = Buf::new();
    let report = serialize_into(&mut buf, value);
    (buf, report)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::mem::offset_of;
    use core::ptr;

    use crate::derive::Flatten;
    use crate::{NULL_OFFSET, Offset, serialize};

    use zf_store::Unique;

    #[repr(C)]
    #[derive(Flatten)]
    struct WeakOnly {
        value: u64,
        stray: *const u64,
    }

    #[test]
    fn null_reference_writes_sentinel() {
        let (buf, report) = serialize(&WeakOnly {
            value: 5,
            stray: ptr::null(),
        });

        assert!(report.is_clean());
        assert_eq!(buf.len(), size_of::<WeakOnly>());

        let slot = offset_of!(WeakOnly, stray);
        let stored = Offset::from_ne_bytes(buf[slot..slot + 8].try_into().unwrap());
        assert_eq!(stored, NULL_OFFSET);
    }

    #[test]
    fn dangling_reference_is_reported_once() {
        let orphan = 3u64;
        let (buf, report) = serialize(&WeakOnly {
            value: 5,
            stray: &orphan,
        });

        // The unresolved fixup adds no bytes, only a report entry.
        assert_eq!(buf.len(), size_of::<WeakOnly>());
        assert_eq!(report.dangling.len(), 1);
        assert_eq!(report.dangling[0].address, &orphan as *const u64 as usize);
        assert_eq!(report.dangling[0].slot, offset_of!(WeakOnly, stray) as Offset);
    }

    #[repr(C)]
    #[derive(Flatten)]
    struct ForwardRef {
        // Declared (and therefore visited) before its target is written.
        early: *const u64,
        owner: Unique<u64>,
    }

    #[test]
    fn forward_reference_resolves_via_fixup() {
        let owner = Unique::new(11u64);
        let value = ForwardRef {
            early: owner.as_ptr(),
            owner,
        };
        let (buf, report) = serialize(&value);

        assert!(report.is_clean());

        // The weak slot holds the same offset the owner's data slot got.
        let weak_slot = offset_of!(ForwardRef, early);
        let data_slot = offset_of!(ForwardRef, owner) + Unique::<u64>::DATA_OFFSET;
        assert_eq!(buf[weak_slot..weak_slot + 8], buf[data_slot..data_slot + 8]);
    }

    #[test]
    fn shared_target_is_written_once() {
        #[repr(C)]
        #[derive(Flatten)]
        struct Shared {
            owner: Unique<u64>,
            weak_a: *const u64,
            weak_b: *const u64,
        }

        let owner = Unique::new(7u64);
        let value = Shared {
            weak_a: owner.as_ptr(),
            weak_b: owner.as_ptr(),
            owner,
        };
        let (buf, report) = serialize(&value);

        assert!(report.is_clean());
        // Header + exactly one copy of the pointee.
        assert_eq!(buf.len(), size_of::<Shared>() + size_of::<u64>());
    }

    #[test]
    fn weak_reference_to_root_resolves() {
        #[repr(C)]
        #[derive(Flatten)]
        struct SelfRef {
            value: u64,
            me: *const SelfRef,
        }

        let mut value = SelfRef {
            value: 9,
            me: ptr::null(),
        };
        value.me = &raw const value;

        let (buf, report) = serialize(&value);
        assert!(report.is_clean());

        // Root lives at offset zero, so the back-reference stores zero.
        let slot = offset_of!(SelfRef, me);
        let stored = Offset::from_ne_bytes(buf[slot..slot + 8].try_into().unwrap());
        assert_eq!(stored, 0);
    }
}
