//! See the [`Flatten`] derive macro.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// -----------------------------------------------------------------------------
// Modules

mod flatten;

// -----------------------------------------------------------------------------
// Macros

/// # Composite Flattening Derivation
///
/// `#[derive(Flatten)]` implements the `Flatten` trait for a struct by
/// recursing into every field at its byte offset within the struct:
///
/// - on serialization, each field is visited at
///   `structure offset + offset_of!(Self, field)`, so pointer-bearing
///   fields patch exactly their own slot in the output buffer;
/// - on deserialization, each field is re-based in place, in declaration
///   order.
///
/// ```rust, ignore
/// #[repr(C)]
/// #[derive(Flatten)]
/// struct Node {
///     value: u64,
///     next: Unique<Node>,
/// }
/// ```
///
/// ## Requirements
///
/// The struct must be `#[repr(C)]` (or `#[repr(transparent)]`): the
/// serialized form is the struct's own in-memory bytes, so the field
/// layout has to be defined. The macro rejects types without such a
/// `repr`, as well as enums and unions, whose layouts the engine cannot
/// walk field by field.
///
/// Every field type must itself implement `Flatten`. Generic type
/// parameters receive a `Flatten` bound automatically.
#[proc_macro_derive(Flatten)]
pub fn derive_flatten(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    flatten::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
