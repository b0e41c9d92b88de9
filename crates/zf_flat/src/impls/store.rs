use core::mem;
use core::slice;

use zf_store::{FlatStr, FlatVec, Unique};

use crate::ser::raw_bytes_of;
use crate::{DeserializeContext, DeserializeError, Flatten, NULL_OFFSET, Offset, SerializeContext};

// -----------------------------------------------------------------------------
// FlatVec
//
// The element block is appended verbatim, then each element is visited at
// its now-known offset. Elements are owned by the array exclusively and
// are never registered as identities: a raw reference aimed at one stays
// an unresolved fixup.

// SAFETY: header slots are patched at the offsets `zf_store` exports for
// exactly this purpose; elements are visited densely.
unsafe impl<T: Flatten> Flatten for FlatVec<T> {
    fn flatten(&self, ctx: &mut SerializeContext<'_>, pos: Offset) {
        let start = if self.as_ptr().is_null() {
            NULL_OFFSET
        } else {
            // SAFETY: a non-null vector stores `len` initialized elements.
            let block = unsafe {
                slice::from_raw_parts(
                    self.as_ptr().cast::<u8>(),
                    self.len() * mem::size_of::<T>(),
                )
            };
            ctx.write(block, mem::align_of::<T>())
        };

        ctx.patch(pos + Self::DATA_OFFSET as Offset, start);
        ctx.patch(pos + Self::ALLOCATED_OFFSET as Offset, self.len() as u32);
        ctx.patch(pos + Self::SELF_ALLOCATED_OFFSET as Offset, false);

        if !self.as_ptr().is_null() {
            for (index, element) in self.iter().enumerate() {
                element.flatten(ctx, start + (index * mem::size_of::<T>()) as Offset);
            }
        }
    }

    unsafe fn rebase(&mut self, ctx: &DeserializeContext) -> Result<(), DeserializeError> {
        let data = ctx.rebase_ptr(self.as_ptr())?;
        // SAFETY: `data` re-bases the stored offset into the loaded buffer,
        // which holds this vector's `len` elements and outlives it.
        unsafe {
            self.set_data_ptr(data);
        }

        for element in self.as_mut_slice() {
            // SAFETY: forwarded caller contract, element-wise.
            unsafe {
                element.rebase(ctx)?;
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// FlatStr
//
// The inline form lives entirely in the header bytes that were already
// copied; only the heap form touches the buffer.

// SAFETY: the heap slots are patched at the offsets `zf_store` exports.
unsafe impl Flatten for FlatStr {
    fn flatten(&self, ctx: &mut SerializeContext<'_>, pos: Offset) {
        if self.is_inline() {
            return;
        }

        let start = ctx.write(self.as_bytes(), 1);
        ctx.patch(pos + Self::DATA_OFFSET as Offset, start);
        ctx.patch(pos + Self::SELF_ALLOCATED_OFFSET as Offset, false);
    }

    unsafe fn rebase(&mut self, ctx: &DeserializeContext) -> Result<(), DeserializeError> {
        if self.is_inline() {
            return Ok(());
        }

        let data = ctx.rebase_ptr(self.heap_data())?;
        // SAFETY: `data` re-bases the stored offset into the loaded buffer,
        // which holds this string's bytes and outlives it.
        unsafe {
            self.set_heap_data(data);
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Unique
//
// The ownership edge. Writing the pointee registers its original address
// in the identity map, which is what every raw reference to it — before
// or after this point in the traversal — resolves against.

// SAFETY: header slots are patched at the offsets `zf_store` exports; the
// pointee is visited at its own block.
unsafe impl<T: Flatten> Flatten for Unique<T> {
    fn flatten(&self, ctx: &mut SerializeContext<'_>, pos: Offset) {
        let start = if self.is_null() {
            NULL_OFFSET
        } else {
            // SAFETY: a non-null `Unique` points at a live pointee.
            let pointee = unsafe { &*self.as_ptr() };
            ctx.write(raw_bytes_of(pointee), mem::align_of::<T>())
        };

        ctx.patch(pos + Self::DATA_OFFSET as Offset, start);
        ctx.patch(pos + Self::SELF_ALLOCATED_OFFSET as Offset, false);

        if !self.is_null() {
            ctx.register(self.as_ptr() as usize, start);
            // SAFETY: as above.
            let pointee = unsafe { &*self.as_ptr() };
            pointee.flatten(ctx, start);
        }
    }

    unsafe fn rebase(&mut self, ctx: &DeserializeContext) -> Result<(), DeserializeError> {
        let el = ctx.rebase_ptr(self.as_ptr())?;
        // SAFETY: `el` re-bases the stored offset into the loaded buffer,
        // which holds the pointee and outlives this header.
        unsafe {
            self.set_data_ptr(el);
        }

        if let Some(pointee) = self.as_mut() {
            // SAFETY: forwarded caller contract for the pointee block.
            unsafe {
                pointee.rebase(ctx)?;
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::mem::offset_of;

    use crate::derive::Flatten;
    use crate::{NULL_OFFSET, Offset, serialize};

    use zf_store::{FlatStr, FlatVec, Unique};

    #[repr(C)]
    #[derive(Flatten)]
    struct Holder {
        items: FlatVec<u16>,
    }

    #[test]
    fn vec_header_is_rewritten_for_the_buffer() {
        let value = Holder {
            items: [10u16, 20, 30].into_iter().collect(),
        };
        let (buf, report) = serialize(&value);
        assert!(report.is_clean());

        let base = offset_of!(Holder, items);

        // Data offset points just past the header (u16 needs no padding
        // at that position).
        let data_slot = base + FlatVec::<u16>::DATA_OFFSET;
        let stored = Offset::from_ne_bytes(buf[data_slot..data_slot + 8].try_into().unwrap());
        assert_eq!(stored as usize, size_of::<Holder>());

        // The allocated slot now holds the used count.
        let allocated_slot = base + FlatVec::<u16>::ALLOCATED_OFFSET;
        let allocated = u32::from_ne_bytes(buf[allocated_slot..allocated_slot + 4].try_into().unwrap());
        assert_eq!(allocated, 3);

        // Buffer-owned, not heap-owned.
        assert_eq!(buf[base + FlatVec::<u16>::SELF_ALLOCATED_OFFSET], 0);

        // The element block is the last thing in the buffer.
        assert_eq!(buf.len(), size_of::<Holder>() + 3 * size_of::<u16>());
    }

    #[test]
    fn null_vec_writes_sentinel_and_nothing_else() {
        let value = Holder {
            items: FlatVec::new(),
        };
        let (buf, report) = serialize(&value);
        assert!(report.is_clean());
        assert_eq!(buf.len(), size_of::<Holder>());

        let data_slot = offset_of!(Holder, items) + FlatVec::<u16>::DATA_OFFSET;
        let stored = Offset::from_ne_bytes(buf[data_slot..data_slot + 8].try_into().unwrap());
        assert_eq!(stored, NULL_OFFSET);
    }

    #[test]
    fn inline_string_leaves_the_buffer_untouched() {
        #[repr(C)]
        #[derive(Flatten)]
        struct Named {
            name: FlatStr,
        }

        let value = Named {
            name: FlatStr::from("short"),
        };
        let (buf, report) = serialize(&value);
        assert!(report.is_clean());
        assert_eq!(buf.len(), size_of::<Named>());

        // The inline header round-trips bit for bit.
        assert_eq!(&buf[..5], b"short");
    }

    #[test]
    fn array_elements_are_not_identities() {
        #[repr(C)]
        #[derive(Flatten)]
        struct Aliased {
            items: FlatVec<u64>,
            into_items: *const u64,
        }

        let items: FlatVec<u64> = [1u64, 2, 3].into_iter().collect();
        let value = Aliased {
            into_items: &items[1],
            items,
        };
        let (_, report) = serialize(&value);

        // A reference into an array body never resolves.
        assert_eq!(report.dangling.len(), 1);
    }

    #[test]
    fn nested_uniques_register_each_level() {
        #[repr(C)]
        #[derive(Flatten)]
        struct Inner {
            value: u32,
        }

        #[repr(C)]
        #[derive(Flatten)]
        struct Outer {
            inner: Unique<Inner>,
            weak_inner: *const Inner,
        }

        let inner = Unique::new(Inner { value: 77 });
        let value = Outer {
            weak_inner: inner.as_ptr(),
            inner,
        };
        let (_, report) = serialize(&value);
        assert!(report.is_clean());
    }
}
