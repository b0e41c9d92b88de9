use crate::{DeserializeContext, DeserializeError, Offset, SerializeContext};

// -----------------------------------------------------------------------------
// Flatten

/// The foundational trait of the engine: a type that can be written into a
/// flat buffer and re-based in place after loading.
///
/// Serialization copies a value's raw bytes into the buffer first (the root
/// by the entry point, owned pointees and array blocks by their containers)
/// and then calls [`flatten`](Flatten::flatten) to fix up everything those
/// bytes got wrong: every pointer-bearing slot is patched to hold a
/// buffer-relative [`Offset`] or the null sentinel. Deserialization is the
/// mirror image — [`rebase`](Flatten::rebase) turns stored offsets back
/// into live pointers against the load address.
///
/// # Recommendations
///
/// Use [the derive macro](crate::derive::Flatten) rather than implementing
/// this trait manually. It covers `#[repr(C)]` structs by recursing into
/// each field at its byte offset; together with the built-in
/// implementations (scalars, raw pointers, fixed-size arrays, and the
/// `zf_store` containers) that is the entire dispatch table of the engine:
///
/// | category | `flatten` | `rebase` |
/// |---|---|---|
/// | composite | recurse per field at `pos + field offset` | recurse per field |
/// | scalar | nothing | nothing |
/// | raw pointer | sentinel / resolved offset / pending fixup | offset → `from + offset` |
/// | `FlatVec<T>` | append element block, patch header, recurse elements | re-base data, recurse elements |
/// | `FlatStr` | nothing if inline, else append bytes and patch | re-base unless inline |
/// | `Unique<T>` | append pointee, patch, **register identity**, recurse | re-base data, recurse pointee |
///
/// # Safety
///
/// Implementations are trusted by unsafe code in the engine:
///
/// - `Self` must have a defined, stable layout (`#[repr(C)]`), because its
///   raw bytes are what lands in the buffer.
/// - `flatten` must visit every pointer-bearing field of `Self` exactly
///   once, at that field's true byte offset relative to `pos`.
/// - `rebase` must visit exactly the fields `flatten` visited.
pub unsafe trait Flatten {
    /// Patches this value's pointer-bearing slots in the buffer.
    ///
    /// `pos` is the offset at which `self`'s raw bytes were already
    /// written. Implementations write referenced payloads through `ctx`
    /// and patch their own header slots relative to `pos`; they never
    /// re-write `self`'s own bytes.
    fn flatten(&self, ctx: &mut SerializeContext<'_>, pos: Offset);

    /// Re-bases this value's stored offsets into live pointers, in place.
    ///
    /// # Safety
    ///
    /// `self` must sit inside the loaded buffer described by `ctx`, its
    /// bytes must have been produced by a `flatten` of the same type, and
    /// this must be the first rebase pass over it: re-basing twice applies
    /// the load address twice and corrupts every pointer.
    unsafe fn rebase(&mut self, ctx: &DeserializeContext) -> Result<(), DeserializeError>;
}
