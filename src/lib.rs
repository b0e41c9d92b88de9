#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Re-exports
//
// `zf_core` is the umbrella crate users import; every member is also
// published individually for selective use.

pub use zf_flat::{
    BUF_ALIGNMENT, Buf, DanglingRef, DeserializeContext, DeserializeError, FileTarget, Flatten,
    NULL_OFFSET, Offset, SerializeContext, SerializeReport, Target, derive, deserialize,
    deserialize_unchecked, serialize, serialize_into,
};

pub use zf_store::{FlatStr, FlatVec, Unique};

pub use zf_utils as utils;
