use std::fmt;

use crate::alloc::Arena;
use crate::compare::{Compare, Natural};
use crate::error::handle_alloc_error;
use crate::extract::Identity;
use crate::tree::{self, RbTree};

/// Ordered bag. Equivalent elements are kept in insertion order.
pub struct MultiSet<T, C = Natural> {
    tree: RbTree<T, Identity, C>,
}

impl<T, C: Compare<T>> MultiSet<T, C> {
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

    pub fn insert(&mut self, value: T) {
        self.tree
            .insert_equal(value)
            .unwrap_or_else(|err| handle_alloc_error(err));
    }

    pub fn count(&self, value: &T) -> usize {
        self.tree.count(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    pub fn remove_all(&mut self, value: &T) -> usize {
        self.tree.erase_key(value)
    }

    /// Removes and returns the oldest element equivalent to `value`.
    pub fn remove_one(&mut self, value: &T) -> Option<T> {
        let pos = self.tree.find(value);
        if pos.is_end() {
            return None;
        }
        Some(self.tree.remove(pos))
    }

    /// Elements equivalent to `value`, oldest first.
    pub fn equal_range(&self, value: &T) -> tree::Iter<'_, T, Identity, C, Arena<T>> {
        let (lo, hi) = self.tree.equal_range(value);
        self.tree.range_pos(lo, hi)
    }

    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.tree.last()
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
}

impl<T, C: Compare<T> + Default> Default for MultiSet<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Clone> Clone for MultiSet<T, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T: PartialEq, C> PartialEq for MultiSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: fmt::Debug, C> fmt::Debug for MultiSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tree.iter()).finish()
    }
}

impl<T, C: Compare<T>> Extend<T> for MultiSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for MultiSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, C> IntoIterator for MultiSet<T, C> {
    type Item = T;
    type IntoIter = tree::IntoIter<T, Identity, C, Arena<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}
