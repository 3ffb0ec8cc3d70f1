use std::fmt;

use crate::alloc::Arena;
use crate::compare::{Compare, Natural};
use crate::error::handle_alloc_error;
use crate::extract::Identity;
use crate::tree::{self, RbTree};

/// Ordered set.
pub struct Set<T, C = Natural> {
    tree: RbTree<T, Identity, C>,
}

impl<T, C: Compare<T>> Set<T, C> {
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

    /// Returns `false`, dropping `value`, if an equivalent element is present.
    pub fn insert(&mut self, value: T) -> bool {
        let (_, inserted) = self
            .tree
            .insert_unique(value)
            .unwrap_or_else(|err| handle_alloc_error(err));
        inserted
    }

    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// The stored element equivalent to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.find(value))
    }

    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    pub fn take(&mut self, value: &T) -> Option<T> {
        let pos = self.tree.find(value);
        if pos.is_end() {
            return None;
        }
        Some(self.tree.remove(pos))
    }

    pub fn lower_bound(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.lower_bound(value))
    }

    pub fn upper_bound(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.upper_bound(value))
    }

    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first()
    }

    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last()
    }

    pub fn iter(&self) -> tree::Iter<'_, T, Identity, C, Arena<T>> {
        self.tree.iter()
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
}

impl<T, C: Compare<T> + Default> Default for Set<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Clone> Clone for Set<T, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T: PartialEq, C> PartialEq for Set<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq, C> Eq for Set<T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for Set<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tree.iter()).finish()
    }
}

impl<T, C: Compare<T>> Extend<T> for Set<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for Set<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a, T, C> IntoIterator for &'a Set<T, C> {
    type Item = &'a T;
    type IntoIter = tree::Iter<'a, T, Identity, C, Arena<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.iter()
    }
}

impl<T, C> IntoIterator for Set<T, C> {
    type Item = T;
    type IntoIter = tree::IntoIter<T, Identity, C, Arena<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}
