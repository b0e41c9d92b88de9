use core::marker::PhantomData;

use crate::{DeserializeContext, DeserializeError, Flatten, Offset, SerializeContext};

// -----------------------------------------------------------------------------
// Scalars

/// Non-pointer scalars need no action in either direction: their bytes
/// were copied verbatim with the enclosing block and mean the same thing
/// at any load address.
macro_rules! impl_flatten_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            // SAFETY: no pointer-bearing fields to visit.
            unsafe impl Flatten for $ty {
                #[inline(always)]
                fn flatten(&self, _ctx: &mut SerializeContext<'_>, _pos: Offset) {}

                #[inline(always)]
                unsafe fn rebase(&mut self, _ctx: &DeserializeContext) -> Result<(), DeserializeError> {
                    Ok(())
                }
            }
        )*
    };
}

impl_flatten_scalar!(
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    f32, f64,
    bool, char,
);

// -----------------------------------------------------------------------------
// PhantomData

// SAFETY: zero-sized, nothing to visit.
unsafe impl<T: ?Sized> Flatten for PhantomData<T> {
    #[inline(always)]
    fn flatten(&self, _ctx: &mut SerializeContext<'_>, _pos: Offset) {}

    #[inline(always)]
    unsafe fn rebase(&mut self, _ctx: &DeserializeContext) -> Result<(), DeserializeError> {
        Ok(())
    }
}
