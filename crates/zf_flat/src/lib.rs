#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![expect(unsafe_code, reason = "Reinterpreting pointers as offsets is the point of this crate.")]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro emits absolute `::zf_flat::` paths. `extern self` makes
// those paths valid inside this crate as well, so the derive can be used in
// our own tests and doctests.
extern crate self as zf_flat;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod de;
mod flatten;
mod impls;
mod offset;
mod ser;
mod target;

// -----------------------------------------------------------------------------
// Top-level exports

pub use de::{DeserializeContext, DeserializeError, deserialize, deserialize_unchecked};
pub use flatten::Flatten;
pub use offset::{NULL_OFFSET, Offset};
pub use ser::{DanglingRef, SerializeContext, SerializeReport, serialize, serialize_into};
pub use target::{BUF_ALIGNMENT, Buf, FileTarget, Target};

pub use zf_flat_derive as derive;
