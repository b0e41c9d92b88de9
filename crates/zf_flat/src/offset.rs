// -----------------------------------------------------------------------------
// Offset

/// A byte offset relative to the start of a serialization buffer.
///
/// Every pointer-bearing slot in a flattened buffer stores either an
/// `Offset` strictly smaller than the buffer length or [`NULL_OFFSET`].
pub type Offset = u64;

/// The distinguished maximum offset value representing a null reference.
///
/// Chosen over zero because zero is a valid offset: the root value itself
/// lives at the start of the buffer.
pub const NULL_OFFSET: Offset = Offset::MAX;
