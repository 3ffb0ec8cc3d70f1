use std::fmt;

use crate::compare::{Compare, Natural};
use crate::error::handle_alloc_error;
use crate::extract::First;
use crate::tree::RbTree;

/// Ordered map that keeps every inserted entry. Entries with equivalent keys
/// iterate in insertion order.
pub struct MultiMap<K, V, C = Natural> {
    tree: RbTree<(K, V), First, C>,
}

impl<K, V, C: Compare<K>> MultiMap<K, V, C> {
    pub fn new() -> Self
    where
        C: Default,
    {
        Self {
            tree: RbTree::new(),
        }
    }

    pub fn with_comparator(comp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(comp),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.tree
            .insert_equal((key, value))
            .unwrap_or_else(|err| handle_alloc_error(err));
    }

    /// Values stored under `key`, oldest first.
    pub fn get_all(&self, key: &K) -> impl DoubleEndedIterator<Item = &V> + '_ {
        let (lo, hi) = self.tree.equal_range(key);
        self.tree.range_pos(lo, hi).map(|(_, v)| v)
    }

    pub fn count(&self, key: &K) -> usize {
        self.tree.count(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Removes every entry under `key` and returns how many there were.
    pub fn remove_all(&mut self, key: &K) -> usize {
        self.tree.erase_key(key)
    }

    /// Removes the oldest entry under `key`.
    pub fn remove_one(&mut self, key: &K) -> Option<V> {
        let pos = self.tree.find(key);
        if pos.is_end() {
            return None;
        }
        Some(self.tree.remove(pos).1)
    }

    pub fn lower_bound(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.get(self.tree.lower_bound(key)).map(|(k, v)| (k, v))
    }

    pub fn upper_bound(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.get(self.tree.upper_bound(key)).map(|(k, v)| (k, v))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + '_ {
        self.tree.iter().map(|(k, v)| (k, v))
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }
}

impl<K, V, C: Compare<K> + Default> Default for MultiMap<K, V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for MultiMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for MultiMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for MultiMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.tree.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for MultiMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for MultiMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}
