use std::fmt;

use crate::OrderedMap;
use crate::compare::{Compare, Natural};
use crate::error::handle_alloc_error;
use crate::extract::First;
use crate::tree::{self, RbTree};

/// Ordered map with unique keys.
pub struct Map<K, V, C = Natural> {
    tree: RbTree<(K, V), First, C>,
}

impl<K, V, C: Compare<K>> Map<K, V, C> {
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

    /// Inserts or overwrites. Returns the previous value of `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hint = self.tree.lower_bound(&key);
        let occupied = self
            .tree
            .get(hint)
            .is_some_and(|(k, _)| !self.tree.key_comp().less(&key, k));
        if occupied && let Some((_, slot)) = self.tree.get_mut(hint) {
            return Some(std::mem::replace(slot, value));
        }
        self.tree
            .insert_unique_hint(hint, (key, value))
            .unwrap_or_else(|err| handle_alloc_error(err));
        None
    }

    /// Inserts only if `key` is absent. Returns whether it was inserted.
    pub fn try_insert(&mut self, key: K, value: V) -> bool {
        let (_, inserted) = self
            .tree
            .insert_unique((key, value))
            .unwrap_or_else(|err| handle_alloc_error(err));
        inserted
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(self.tree.find(key)).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let pos = self.tree.find(key);
        self.tree.get_mut(pos).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let pos = self.tree.find(key);
        if pos.is_end() {
            return None;
        }
        Some(self.tree.remove(pos).1)
    }

    /// Smallest entry with a key not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.get(self.tree.lower_bound(key)).map(|(k, v)| (k, v))
    }

    /// Smallest entry with a key greater than `key`.
    pub fn upper_bound(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.get(self.tree.upper_bound(key)).map(|(k, v)| (k, v))
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(k, v)| (k, v))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|(k, v)| (k, v))
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + '_ {
        self.tree.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.tree.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.tree.iter().map(|(_, v)| v)
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    pub fn key_comp(&self) -> &C {
        self.tree.key_comp()
    }

    /// Orders entries by key.
    pub fn value_comp(&self) -> impl Fn(&(K, V), &(K, V)) -> bool + '_ {
        move |a, b| self.tree.key_comp().less(&a.0, &b.0)
    }
}

impl<K, V, C: Compare<K> + Default> Default for Map<K, V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for Map<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for Map<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for Map<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Map<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.tree.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for Map<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for Map<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> IntoIterator for Map<K, V, C> {
    type Item = (K, V);
    type IntoIter = tree::IntoIter<(K, V), First, C, crate::alloc::Arena<(K, V)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<K: Ord, V> OrderedMap for Map<K, V> {
    type Key = K;
    type Value = V;

    fn new() -> Self {
        Map::new()
    }

    fn len(&self) -> usize {
        Map::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        Map::get(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        Map::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        Map::remove(self, key)
    }

    fn lower_bound(&self, key: &K) -> Option<(&K, &V)> {
        Map::lower_bound(self, key)
    }
}
