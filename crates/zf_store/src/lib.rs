//! This crate provides the layout-stable containers the ZeroFlat engine
//! serializes: every type here is `#[repr(C)]`, stores its payload behind a
//! raw pointer, and carries a `self_allocated` flag that records whether
//! the payload lives on the heap (owned, freed on drop) or inside a loaded
//! buffer (borrowed, never freed).
//!
//! **FlatVec**
//!
//! [`FlatVec<T>`] is a growable array with a fixed four-field header
//! (data pointer, used count, allocated count, ownership flag). It derefs
//! to `[T]`.
//!
//! **FlatStr**
//!
//! [`FlatStr`] is a 16-byte string. Contents of up to 15 bytes are stored
//! inline in the header; longer contents live behind a heap pointer. The
//! inline form never touches the serialization buffer.
//!
//! **Unique**
//!
//! [`Unique<T>`] is an owning single-value box (data pointer + ownership
//! flag). It is the one container whose pointee identity participates in
//! reference resolution during serialization, so every shared target must
//! be owned by exactly one `Unique` — which its safe constructors already
//! guarantee.
//!
//! The exact byte layout of each header is part of this crate's contract
//! with `zf_flat`; the `#[doc(hidden)]` offset constants and accessors
//! exist for that engine and are not stable API.
#![expect(unsafe_code, reason = "Pointer-bearing containers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod flat_str;
mod flat_vec;
mod unique;

// -----------------------------------------------------------------------------
// Top-level exports

pub use flat_str::FlatStr;
pub use flat_vec::FlatVec;
pub use unique::Unique;
