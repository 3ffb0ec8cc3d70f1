use std::iter::FusedIterator;

use super::{Id, Pos, RbTree};
use crate::alloc::NodeAllocator;

impl<T, X, C, A> RbTree<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    /// In-order successor; the maximum steps to the header.
    pub(super) fn increment(&self, x: Id) -> Id {
        debug_assert!(!x.is_header(), "advancing past the end");
        if !self.right(x).is_nil() {
            return self.minimum(self.right(x));
        }
        let mut x = x;
        let mut y = self.parent(x);
        while !y.is_header() && x == self.right(y) {
            x = y;
            y = self.parent(y);
        }
        y
    }

    /// In-order predecessor; the header steps to the maximum.
    pub(super) fn decrement(&self, x: Id) -> Id {
        if x.is_header() {
            debug_assert!(!self.is_empty(), "stepping back from the end of an empty tree");
            return self.header.rightmost;
        }
        if !self.left(x).is_nil() {
            return self.maximum(self.left(x));
        }
        let mut x = x;
        let mut y = self.parent(x);
        while !y.is_header() && x == self.left(y) {
            x = y;
            y = self.parent(y);
        }
        debug_assert!(!y.is_header(), "stepping back from the first element");
        y
    }

    pub fn iter(&self) -> Iter<'_, T, X, C, A> {
        Iter {
            tree: self,
            front: self.header.leftmost,
            back: Id::HEADER,
            remaining: Some(self.len),
        }
    }

    /// Iterates over `[first, last)`.
    pub fn range_pos(&self, first: Pos, last: Pos) -> Iter<'_, T, X, C, A> {
        self.check_pos(first);
        self.check_pos(last);
        Iter {
            tree: self,
            front: first.id,
            back: last.id,
            remaining: None,
        }
    }
}

/// Borrowing in-order iterator between two positions.
pub struct Iter<'a, T, X, C, A>
where
    A: NodeAllocator<T>,
{
    tree: &'a RbTree<T, X, C, A>,
    front: Id,
    back: Id,
    remaining: Option<usize>,
}

impl<T, X, C, A> Clone for Iter<'_, T, X, C, A>
where
    A: NodeAllocator<T>,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T, X, C, A> Iterator for Iter<'a, T, X, C, A>
where
    A: NodeAllocator<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let tree = self.tree;
        let cur = self.front;
        self.front = tree.increment(cur);
        if let Some(n) = self.remaining.as_mut() {
            *n -= 1;
        }
        Some(&tree.node(cur).value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(n) => (n, Some(n)),
            None if self.front == self.back => (0, Some(0)),
            None => (1, Some(self.tree.len)),
        }
    }
}

impl<'a, T, X, C, A> DoubleEndedIterator for Iter<'a, T, X, C, A>
where
    A: NodeAllocator<T>,
{
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let tree = self.tree;
        self.back = tree.decrement(self.back);
        if let Some(n) = self.remaining.as_mut() {
            *n -= 1;
        }
        Some(&tree.node(self.back).value)
    }
}

impl<T, X, C, A> FusedIterator for Iter<'_, T, X, C, A> where A: NodeAllocator<T> {}

impl<'a, T, X, C, A> IntoIterator for &'a RbTree<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, X, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning in-order iterator. Each step unlinks one extreme of the tree.
pub struct IntoIter<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    tree: RbTree<T, X, C, A>,
}

impl<T, X, C, A> Iterator for IntoIter<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len, Some(self.tree.len))
    }
}

impl<T, X, C, A> DoubleEndedIterator for IntoIter<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    fn next_back(&mut self) -> Option<T> {
        self.tree.pop_last()
    }
}

impl<T, X, C, A> ExactSizeIterator for IntoIter<T, X, C, A> where A: NodeAllocator<T> {}

impl<T, X, C, A> FusedIterator for IntoIter<T, X, C, A> where A: NodeAllocator<T> {}

impl<T, X, C, A> IntoIterator for RbTree<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    type Item = T;
    type IntoIter = IntoIter<T, X, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { tree: self }
    }
}
