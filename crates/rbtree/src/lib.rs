//! Red-black tree engine with pluggable key extraction, ordering and node
//! storage, plus the ordered containers built on it.

pub mod alloc;
pub mod compare;
pub mod error;
pub mod extract;
pub mod map;
pub mod multimap;
pub mod multiset;
pub mod set;
pub mod std_btree;
pub mod tree;

/// Ordered map interface.
///
/// - Keys are unique.
/// - `insert` overwrites the existing value and returns the old one.
/// - `lower_bound` returns the smallest `(k, v)` with `k >= key`.
pub trait OrderedMap {
    type Key: Ord;
    type Value;

    fn new() -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn insert(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value>;

    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;

    fn lower_bound(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)>;
}

pub use alloc::{Arena, Counting, Limited, NodeAllocator};
pub use compare::{Compare, Natural, Reverse};
pub use error::{AllocError, Error};
pub use extract::{First, Identity, KeyOfValue};
pub use map::Map;
pub use multimap::MultiMap;
pub use multiset::MultiSet;
pub use set::Set;
pub use std_btree::StdBTreeMap;
pub use tree::{Pos, RbTree};
