//! Node storage.
//!
//! A tree never owns raw memory directly: it asks its [`NodeAllocator`] for a
//! slot, fills it, and hands it back on erase. Slots are named by [`Id`], so the
//! parent/child graph is a set of plain indices and parent links carry no
//! ownership.

use crate::error::AllocError;
use crate::tree::{Id, Node};

/// Allocate-one / deallocate-one storage for tree nodes.
///
/// A slot goes through `allocate` → `construct` → `deallocate`. A slot may
/// also be deallocated straight after `allocate`, when building the value
/// failed; `deallocate` then returns `None`.
pub trait NodeAllocator<T> {
    /// Reserves one slot.
    fn allocate(&mut self) -> Result<Id, AllocError>;

    /// Stores `node` in a slot returned by [`allocate`](Self::allocate).
    fn construct(&mut self, id: Id, node: Node<T>);

    /// Releases a slot, returning its node if one was constructed.
    fn deallocate(&mut self, id: Id) -> Option<Node<T>>;

    fn node(&self, id: Id) -> &Node<T>;

    fn node_mut(&mut self, id: Id) -> &mut Node<T>;
}

/// Lends an allocator to a tree while the caller keeps hold of it.
impl<T, A: NodeAllocator<T> + ?Sized> NodeAllocator<T> for &mut A {
    fn allocate(&mut self) -> Result<Id, AllocError> {
        (**self).allocate()
    }

    fn construct(&mut self, id: Id, node: Node<T>) {
        (**self).construct(id, node);
    }

    fn deallocate(&mut self, id: Id) -> Option<Node<T>> {
        (**self).deallocate(id)
    }

    fn node(&self, id: Id) -> &Node<T> {
        (**self).node(id)
    }

    fn node_mut(&mut self, id: Id) -> &mut Node<T> {
        (**self).node_mut(id)
    }
}

enum Slot<T> {
    Built(Node<T>),
    Reserved,
    Free { next: Id },
}

/// Vec-backed arena with an intrusive free list.
///
/// Only fails once the index space of [`Id`] is exhausted.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Id,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Id::NIL,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Id::NIL,
        }
    }

    /// Number of slots ever handed out, free ones included.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeAllocator<T> for Arena<T> {
    fn allocate(&mut self) -> Result<Id, AllocError> {
        if !self.free.is_nil() {
            let id = self.free;
            let Slot::Free { next } = self.slots[id.index()] else {
                unreachable!("free list points at a live slot");
            };
            self.free = next;
            self.slots[id.index()] = Slot::Reserved;
            return Ok(id);
        }
        if self.slots.len() >= Id::MAX_SLOTS {
            return Err(AllocError);
        }
        let id = Id::from_index(self.slots.len());
        self.slots.push(Slot::Reserved);
        Ok(id)
    }

    fn construct(&mut self, id: Id, node: Node<T>) {
        let slot = &mut self.slots[id.index()];
        debug_assert!(matches!(slot, Slot::Reserved), "construct into unreserved slot");
        *slot = Slot::Built(node);
    }

    fn deallocate(&mut self, id: Id) -> Option<Node<T>> {
        let slot = std::mem::replace(&mut self.slots[id.index()], Slot::Free { next: self.free });
        self.free = id;
        match slot {
            Slot::Built(node) => Some(node),
            Slot::Reserved => None,
            Slot::Free { .. } => unreachable!("double free of slot {id:?}"),
        }
    }

    #[inline(always)]
    fn node(&self, id: Id) -> &Node<T> {
        match &self.slots[id.index()] {
            Slot::Built(node) => node,
            _ => unreachable!("slot {id:?} holds no node"),
        }
    }

    #[inline(always)]
    fn node_mut(&mut self, id: Id) -> &mut Node<T> {
        match &mut self.slots[id.index()] {
            Slot::Built(node) => node,
            _ => unreachable!("slot {id:?} holds no node"),
        }
    }
}

/// Wraps an allocator and counts calls.
#[derive(Default)]
pub struct Counting<A> {
    inner: A,
    allocations: usize,
    deallocations: usize,
}

impl<A> Counting<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            allocations: 0,
            deallocations: 0,
        }
    }

    /// Successful `allocate` calls.
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    pub fn deallocations(&self) -> usize {
        self.deallocations
    }

    pub fn live(&self) -> usize {
        self.allocations - self.deallocations
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<T, A: NodeAllocator<T>> NodeAllocator<T> for Counting<A> {
    fn allocate(&mut self) -> Result<Id, AllocError> {
        let id = self.inner.allocate()?;
        self.allocations += 1;
        Ok(id)
    }

    fn construct(&mut self, id: Id, node: Node<T>) {
        self.inner.construct(id, node);
    }

    fn deallocate(&mut self, id: Id) -> Option<Node<T>> {
        self.deallocations += 1;
        self.inner.deallocate(id)
    }

    #[inline(always)]
    fn node(&self, id: Id) -> &Node<T> {
        self.inner.node(id)
    }

    #[inline(always)]
    fn node_mut(&mut self, id: Id) -> &mut Node<T> {
        self.inner.node_mut(id)
    }
}

/// Wraps an allocator and refuses every allocation past a budget.
pub struct Limited<A> {
    inner: A,
    remaining: usize,
}

impl<A> Limited<A> {
    pub fn new(inner: A, budget: usize) -> Self {
        Self {
            inner,
            remaining: budget,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn set_budget(&mut self, budget: usize) {
        self.remaining = budget;
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Default> Default for Limited<A> {
    fn default() -> Self {
        Self::new(A::default(), usize::MAX)
    }
}

impl<T, A: NodeAllocator<T>> NodeAllocator<T> for Limited<A> {
    fn allocate(&mut self) -> Result<Id, AllocError> {
        if self.remaining == 0 {
            return Err(AllocError);
        }
        let id = self.inner.allocate()?;
        self.remaining -= 1;
        Ok(id)
    }

    fn construct(&mut self, id: Id, node: Node<T>) {
        self.inner.construct(id, node);
    }

    fn deallocate(&mut self, id: Id) -> Option<Node<T>> {
        self.inner.deallocate(id)
    }

    #[inline(always)]
    fn node(&self, id: Id) -> &Node<T> {
        self.inner.node(id)
    }

    #[inline(always)]
    fn node_mut(&mut self, id: Id) -> &mut Node<T> {
        self.inner.node_mut(id)
    }
}
