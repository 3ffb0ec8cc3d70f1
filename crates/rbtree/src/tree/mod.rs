//! Red-black tree engine shared by every ordered container of the crate.
//!
//! Nodes live in a [`NodeAllocator`] and link to each other by [`Id`]. The
//! header is a field of the tree: it holds the root and caches the extremes, so
//! `begin`, `end`, `first` and `last` are O(1). The header's handle,
//! [`Id::HEADER`], doubles as the end position.

mod copy;
mod erase;
mod insert;
mod iter;
mod node;
mod rotate;

#[cfg(test)]
pub(crate) mod check;

use std::fmt;
use std::marker::PhantomData;

use crate::alloc::{Arena, NodeAllocator};
use crate::compare::{Compare, Natural};
use crate::extract::KeyOfValue;

pub use iter::{IntoIter, Iter};
pub use node::{Color, Id, Node};

pub(crate) use node::Header;

#[cfg(debug_assertions)]
fn next_tag() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_TAG: AtomicU64 = AtomicU64::new(1);
    NEXT_TAG.fetch_add(1, Ordering::Relaxed)
}

/// A position in a tree: a data node or the end.
///
/// Positions do not borrow the tree. They stay valid until the node they name
/// is erased; using a stale position, or a position of another tree, is a
/// contract violation caught only by debug assertions.
#[derive(Clone, Copy, Debug)]
pub struct Pos {
    id: Id,
    #[cfg(debug_assertions)]
    tag: u64,
}

impl Pos {
    pub fn id(self) -> Id {
        self.id
    }

    pub fn is_end(self) -> bool {
        self.id.is_header()
    }
}

impl PartialEq for Pos {
    fn eq(&self, other: &Self) -> bool {
        #[cfg(debug_assertions)]
        debug_assert_eq!(self.tag, other.tag, "comparing positions of different trees");
        self.id == other.id
    }
}

impl Eq for Pos {}

/// Red-black tree over values `T` ordered by the key `X` extracts.
///
/// `insert_unique*` rejects values whose key is equivalent to a stored one,
/// `insert_equal*` keeps duplicates in insertion order.
pub struct RbTree<T, X, C = Natural, A = Arena<T>>
where
    A: NodeAllocator<T>,
{
    header: Header,
    len: usize,
    comp: C,
    alloc: A,
    #[cfg(debug_assertions)]
    tag: u64,
    _marker: PhantomData<(fn() -> X, T)>,
}

impl<T, X, C, A> RbTree<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    pub fn with_parts(comp: C, alloc: A) -> Self {
        Self {
            header: Header::EMPTY,
            len: 0,
            comp,
            alloc,
            #[cfg(debug_assertions)]
            tag: next_tag(),
            _marker: PhantomData,
        }
    }

    pub fn with_comparator(comp: C) -> Self
    where
        A: Default,
    {
        Self::with_parts(comp, A::default())
    }

    pub fn with_allocator(alloc: A) -> Self
    where
        C: Default,
    {
        Self::with_parts(C::default(), alloc)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn key_comp(&self) -> &C {
        &self.comp
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub fn begin(&self) -> Pos {
        self.pos(self.header.leftmost)
    }

    #[inline]
    pub fn end(&self) -> Pos {
        self.pos(Id::HEADER)
    }

    pub fn first(&self) -> Option<&T> {
        self.get(self.begin())
    }

    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        Some(&self.node(self.header.rightmost).value)
    }

    /// The value at `pos`, or `None` at the end.
    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.check_pos(pos);
        if pos.is_end() {
            return None;
        }
        Some(&self.node(pos.id).value)
    }

    /// Mutable access to a stored value. The caller must not change its key.
    pub(crate) fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
        self.check_pos(pos);
        if pos.is_end() {
            return None;
        }
        Some(&mut self.node_mut(pos.id).value)
    }

    pub fn next(&self, pos: Pos) -> Pos {
        self.check_pos(pos);
        self.pos(self.increment(pos.id))
    }

    pub fn prev(&self, pos: Pos) -> Pos {
        self.check_pos(pos);
        self.pos(self.decrement(pos.id))
    }

    /// Exchanges the contents of two trees. No node is touched; positions
    /// follow their nodes into the other tree.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    #[inline(always)]
    fn pos(&self, id: Id) -> Pos {
        Pos {
            id,
            #[cfg(debug_assertions)]
            tag: self.tag,
        }
    }

    #[inline(always)]
    fn check_pos(&self, _pos: Pos) {
        #[cfg(debug_assertions)]
        debug_assert_eq!(_pos.tag, self.tag, "position belongs to another tree");
    }

    #[inline(always)]
    fn node(&self, x: Id) -> &Node<T> {
        debug_assert!(x.is_node(), "dereferencing {x:?}");
        self.alloc.node(x)
    }

    #[inline(always)]
    fn node_mut(&mut self, x: Id) -> &mut Node<T> {
        debug_assert!(x.is_node(), "dereferencing {x:?}");
        self.alloc.node_mut(x)
    }
}

impl<T, X, C, A> RbTree<T, X, C, A>
where
    X: KeyOfValue<T>,
    C: Compare<X::Key>,
    A: NodeAllocator<T>,
{
    pub fn new() -> Self
    where
        C: Default,
        A: Default,
    {
        Self::with_parts(C::default(), A::default())
    }

    #[inline(always)]
    fn key(&self, x: Id) -> &X::Key {
        X::key(&self.node(x).value)
    }

    #[inline(always)]
    fn less(&self, a: &X::Key, b: &X::Key) -> bool {
        self.comp.less(a, b)
    }

    fn lower_bound_id(&self, k: &X::Key) -> Id {
        let mut x = self.header.root;
        let mut y = Id::HEADER;
        while !x.is_nil() {
            if !self.less(self.key(x), k) {
                y = x;
                x = self.node(x).left;
            } else {
                x = self.node(x).right;
            }
        }
        y
    }

    fn upper_bound_id(&self, k: &X::Key) -> Id {
        let mut x = self.header.root;
        let mut y = Id::HEADER;
        while !x.is_nil() {
            if self.less(k, self.key(x)) {
                y = x;
                x = self.node(x).left;
            } else {
                x = self.node(x).right;
            }
        }
        y
    }

    /// First element whose key is not less than `k`.
    pub fn lower_bound(&self, k: &X::Key) -> Pos {
        self.pos(self.lower_bound_id(k))
    }

    /// First element whose key is greater than `k`.
    pub fn upper_bound(&self, k: &X::Key) -> Pos {
        self.pos(self.upper_bound_id(k))
    }

    pub fn equal_range(&self, k: &X::Key) -> (Pos, Pos) {
        (self.lower_bound(k), self.upper_bound(k))
    }

    /// Some element with a key equivalent to `k`, or the end. With duplicates,
    /// the first of them.
    pub fn find(&self, k: &X::Key) -> Pos {
        let j = self.lower_bound_id(k);
        if j.is_header() || self.less(k, self.key(j)) {
            self.end()
        } else {
            self.pos(j)
        }
    }

    pub fn contains(&self, k: &X::Key) -> bool {
        !self.find(k).is_end()
    }

    pub fn count(&self, k: &X::Key) -> usize {
        let (lo, hi) = self.equal_range(k);
        self.range_pos(lo, hi).count()
    }
}

impl<T, X, C, A> Default for RbTree<T, X, C, A>
where
    X: KeyOfValue<T>,
    C: Compare<X::Key> + Default,
    A: NodeAllocator<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, X, C, A> Drop for RbTree<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    fn drop(&mut self) {
        self.destroy_subtree(self.header.root);
    }
}

impl<T, X, C, A> PartialEq for RbTree<T, X, C, A>
where
    T: PartialEq,
    A: NodeAllocator<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, X, C, A> Eq for RbTree<T, X, C, A>
where
    T: Eq,
    A: NodeAllocator<T>,
{
}

impl<T, X, C, A> fmt::Debug for RbTree<T, X, C, A>
where
    T: fmt::Debug,
    A: NodeAllocator<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
