//! Re-export [`HashMap`] from the [hashbrown] crate.
//!
//! The default hasher is [`FixedHashState`](crate::hash::FixedHashState).

use hashbrown::hash_map as hb;

use crate::hash::FixedHashState;

/// A [`hashbrown::HashMap`] with a fixed-seed hasher.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

pub use hb::{Entry, EntryRef, OccupiedEntry, VacantEntry};
pub use hb::{Drain, ExtractIf, IntoIter, IntoKeys, IntoValues};
pub use hb::{Iter, IterMut, Keys, Values, ValuesMut};
