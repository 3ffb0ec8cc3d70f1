use std::convert::Infallible;

use super::{Id, Node, RbTree};
use crate::alloc::NodeAllocator;
use crate::error::{AllocError, Error, handle_alloc_error};

impl<T, X, C, A> RbTree<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    /// Frees `x` and everything below it. Recurses only into right subtrees
    /// and walks the left spine, so the depth is bounded by the tree height.
    pub(super) fn destroy_subtree(&mut self, mut x: Id) {
        while !x.is_nil() {
            let right = self.right(x);
            self.destroy_subtree(right);
            let left = self.left(x);
            self.drop_node(x);
            x = left;
        }
    }

    /// Copies one node of `src` (value and color) into a fresh unlinked slot.
    fn clone_node<S, F, E>(&mut self, src: &S, x: Id, f: &mut F) -> Result<Id, Error<E>>
    where
        S: NodeAllocator<T>,
        F: FnMut(&T) -> Result<T, E>,
    {
        let id = self.alloc.allocate()?;
        let from = src.node(x);
        match f(&from.value) {
            Ok(value) => {
                let mut node = Node::new(value);
                node.color = from.color;
                self.alloc.construct(id, node);
                Ok(id)
            }
            Err(err) => {
                self.alloc.deallocate(id);
                Err(Error::Construct(err))
            }
        }
    }

    /// Clones the subtree of `src` rooted at `x` under `parent`. On failure
    /// nothing of the partial copy remains allocated.
    fn copy_subtree<S, F, E>(
        &mut self,
        src: &S,
        x: Id,
        parent: Id,
        f: &mut F,
    ) -> Result<Id, Error<E>>
    where
        S: NodeAllocator<T>,
        F: FnMut(&T) -> Result<T, E>,
    {
        let top = self.clone_node(src, x, f)?;
        self.node_mut(top).parent = parent;
        if let Err(err) = self.copy_spine(src, x, top, f) {
            self.destroy_subtree(top);
            return Err(err);
        }
        Ok(top)
    }

    fn copy_spine<S, F, E>(&mut self, src: &S, mut x: Id, top: Id, f: &mut F) -> Result<(), Error<E>>
    where
        S: NodeAllocator<T>,
        F: FnMut(&T) -> Result<T, E>,
    {
        let right = src.node(x).right;
        if !right.is_nil() {
            let copied = self.copy_subtree(src, right, top, f)?;
            self.set_right(top, copied);
        }

        let mut p = top;
        x = src.node(x).left;
        while !x.is_nil() {
            let y = self.clone_node(src, x, f)?;
            self.set_left(p, y);
            self.node_mut(y).parent = p;
            let right = src.node(x).right;
            if !right.is_nil() {
                let copied = self.copy_subtree(src, right, y, f)?;
                self.set_right(y, copied);
            }
            p = y;
            x = src.node(x).left;
        }
        Ok(())
    }

    /// Deep copy into `alloc`, building each value with `f`. Colors and shape
    /// are copied as they are.
    ///
    /// If an allocation or a call to `f` fails, every node built so far is
    /// released and the error is returned.
    pub fn try_clone_with<B, F, E>(&self, alloc: B, mut f: F) -> Result<RbTree<T, X, C, B>, Error<E>>
    where
        B: NodeAllocator<T>,
        C: Clone,
        F: FnMut(&T) -> Result<T, E>,
    {
        let mut out = RbTree::with_parts(self.comp.clone(), alloc);
        let root = self.header.root;
        if root.is_nil() {
            return Ok(out);
        }

        let copied = match out.copy_subtree(&self.alloc, root, Id::HEADER, &mut f) {
            Ok(copied) => copied,
            Err(err) => {
                log::debug!("clone of {} nodes failed; partial copy released", self.len);
                return Err(err);
            }
        };
        out.header.root = copied;
        out.header.leftmost = out.minimum(copied);
        out.header.rightmost = out.maximum(copied);
        out.len = self.len;
        Ok(out)
    }

    pub fn try_clone_in<B>(&self, alloc: B) -> Result<RbTree<T, X, C, B>, AllocError>
    where
        B: NodeAllocator<T>,
        C: Clone,
        T: Clone,
    {
        self.try_clone_with(alloc, |value| Ok::<_, Infallible>(value.clone()))
            .map_err(|err| match err {
                Error::Alloc(err) => err,
                Error::Construct(never) => match never {},
            })
    }
}

impl<T, X, C, A> Clone for RbTree<T, X, C, A>
where
    T: Clone,
    C: Clone,
    A: NodeAllocator<T> + Default,
{
    fn clone(&self) -> Self {
        self.try_clone_in(A::default())
            .unwrap_or_else(|err| handle_alloc_error(err))
    }
}

#[cfg(test)]
mod tests {
    use crate::alloc::{Arena, Counting, Limited};
    use crate::error::{AllocError, Error};
    use crate::extract::{First, Identity};
    use crate::tree::RbTree;
    use crate::tree::check::{check, shape};

    fn sample(n: u32) -> RbTree<(u32, String), First> {
        let mut tree = RbTree::new();
        for k in 0..n {
            tree.insert_unique(((k * 7919) % n, format!("v{k}"))).unwrap();
        }
        tree
    }

    #[test]
    fn clone_is_equal_and_independent() {
        let source = sample(300);
        let mut copy = source.clone();
        assert_eq!(copy, source);
        check(&copy);

        copy.erase_key(&10);
        copy.insert_unique((1000, "new".to_string())).unwrap();
        let pos = copy.find(&20);
        copy.get_mut(pos).unwrap().1.push('!');

        assert_eq!(source.len(), 300);
        assert!(source.contains(&10));
        assert!(!source.contains(&1000));
        let (_, value) = source.get(source.find(&20)).unwrap();
        assert!(!value.ends_with('!'));
        assert_ne!(copy, source);
        check(&source);
        check(&copy);
    }

    #[test]
    fn clone_of_empty_tree() {
        let tree = RbTree::<u8, Identity>::new();
        let copy = tree.clone();
        assert!(copy.is_empty());
        assert_eq!(copy.begin(), copy.end());
        check(&copy);
    }

    #[test]
    fn clone_preserves_shape() {
        let source = sample(64);
        let copy = source.try_clone_in(Counting::new(Arena::new())).unwrap();
        assert_eq!(copy.allocator().allocations(), 64);
        assert_eq!(shape(&copy), shape(&source));
        assert_eq!(copy.first(), source.first());
        assert_eq!(copy.last(), source.last());
    }

    #[test]
    fn failed_allocation_releases_partial_copy() {
        let source = sample(100);
        for budget in [0, 1, 17, 50, 99] {
            let mut counting = Counting::new(Arena::new());
            let err = source
                .try_clone_in(Limited::new(&mut counting, budget))
                .err();
            assert_eq!(err, Some(AllocError));
            assert_eq!(counting.allocations(), budget);
            assert_eq!(counting.deallocations(), budget);
        }
    }

    #[test]
    fn failed_construction_releases_partial_copy() {
        let source = sample(100);
        for fail_at in [0_usize, 1, 42, 99] {
            let mut calls = 0;
            let mut counting = Counting::new(Arena::new());
            let result = source.try_clone_with(&mut counting, |value| {
                calls += 1;
                if calls > fail_at {
                    Err("copy failed")
                } else {
                    Ok(value.clone())
                }
            });
            assert_eq!(result.err(), Some(Error::Construct("copy failed")));
            assert_eq!(counting.allocations(), fail_at + 1);
            assert_eq!(counting.deallocations(), fail_at + 1);
        }
    }
}
