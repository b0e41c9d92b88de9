//! Re-export [`HashSet`] from the [hashbrown] crate.
//!
//! The default hasher is [`FixedHashState`](crate::hash::FixedHashState).

use hashbrown::hash_set as hb;

use crate::hash::FixedHashState;

/// A [`hashbrown::HashSet`] with a fixed-seed hasher.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

pub use hb::{Difference, Drain, ExtractIf, Intersection, IntoIter, Iter};
pub use hb::{SymmetricDifference, Union};
