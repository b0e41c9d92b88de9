#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
pub mod scan;
pub mod zip;

// -----------------------------------------------------------------------------
// Top-level exports

pub use zip::{zip, zip3};
