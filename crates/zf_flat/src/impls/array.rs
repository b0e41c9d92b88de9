use core::mem;

use crate::{DeserializeContext, DeserializeError, Flatten, Offset, SerializeContext};

// -----------------------------------------------------------------------------
// Fixed-size arrays

// SAFETY: elements sit densely at multiples of the element size.
unsafe impl<T: Flatten, const N: usize> Flatten for [T; N] {
    fn flatten(&self, ctx: &mut SerializeContext<'_>, pos: Offset) {
        for (index, element) in self.iter().enumerate() {
            element.flatten(ctx, pos + (index * mem::size_of::<T>()) as Offset);
        }
    }

    unsafe fn rebase(&mut self, ctx: &DeserializeContext) -> Result<(), DeserializeError> {
        for element in self {
            // SAFETY: forwarded caller contract, element-wise.
            unsafe {
                element.rebase(ctx)?;
            }
        }
        Ok(())
    }
}
