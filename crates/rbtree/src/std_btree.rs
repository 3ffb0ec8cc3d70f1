use std::collections::BTreeMap;

use crate::OrderedMap;

/// [`OrderedMap`] over `std`'s B-tree, the baseline for benches and oracle
/// tests.
pub struct StdBTreeMap<K: Ord, V> {
    inner: BTreeMap<K, V>,
}

impl<K: Ord, V> StdBTreeMap<K, V> {
    pub fn into_inner(self) -> BTreeMap<K, V> {
        self.inner
    }
}

impl<K: Ord, V> OrderedMap for StdBTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.inner.insert(key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.inner.remove(key)
    }

    fn lower_bound(&self, key: &K) -> Option<(&K, &V)> {
        self.inner.range(key..).next()
    }
}
