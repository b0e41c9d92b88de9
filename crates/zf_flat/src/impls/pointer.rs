use crate::{DeserializeContext, DeserializeError, Flatten, NULL_OFFSET, Offset, SerializeContext};

// -----------------------------------------------------------------------------
// Raw pointers
//
// A raw pointer is a weak reference: it never writes its target, it only
// names it. Null gets the sentinel; a target already registered by its
// owner resolves immediately; anything else becomes a pending fixup,
// optimistically assumed resolvable once the owner is reached later in
// the traversal.

macro_rules! impl_flatten_pointer {
    ($($ptr:ty),* $(,)?) => {
        $(
            // SAFETY: the single slot at `pos` is the pointer itself.
            unsafe impl<T> Flatten for $ptr {
                fn flatten(&self, ctx: &mut SerializeContext<'_>, pos: Offset) {
                    if self.is_null() {
                        ctx.patch(pos, NULL_OFFSET);
                        return;
                    }

                    let address = *self as usize;
                    match ctx.resolve(address) {
                        Some(offset) => ctx.patch(pos, offset),
                        None => ctx.defer(address, pos),
                    }
                }

                unsafe fn rebase(
                    &mut self,
                    ctx: &DeserializeContext,
                ) -> Result<(), DeserializeError> {
                    let live = ctx.rebase_ptr(*self as *const T)?;
                    *self = live as $ptr;
                    Ok(())
                }
            }
        )*
    };
}

impl_flatten_pointer!(*const T, *mut T);
