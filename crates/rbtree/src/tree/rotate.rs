use super::{Color, Id, RbTree};
use crate::alloc::NodeAllocator;

impl<T, X, C, A> RbTree<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    #[inline(always)]
    pub(super) fn left(&self, x: Id) -> Id {
        self.node(x).left
    }

    #[inline(always)]
    pub(super) fn right(&self, x: Id) -> Id {
        self.node(x).right
    }

    #[inline(always)]
    pub(super) fn parent(&self, x: Id) -> Id {
        self.node(x).parent
    }

    /// `NIL` and the header count as black.
    #[inline(always)]
    pub(super) fn color(&self, x: Id) -> Color {
        if x.is_node() {
            self.node(x).color
        } else {
            Color::Black
        }
    }

    #[inline(always)]
    pub(super) fn is_red(&self, x: Id) -> bool {
        self.color(x) == Color::Red
    }

    #[inline(always)]
    pub(super) fn set_color(&mut self, x: Id, color: Color) {
        self.node_mut(x).color = color;
    }

    #[inline(always)]
    pub(super) fn set_parent(&mut self, x: Id, parent: Id) {
        if !x.is_nil() {
            self.node_mut(x).parent = parent;
        }
    }

    #[inline(always)]
    pub(super) fn set_left(&mut self, x: Id, left: Id) {
        self.node_mut(x).left = left;
    }

    #[inline(always)]
    pub(super) fn set_right(&mut self, x: Id, right: Id) {
        self.node_mut(x).right = right;
    }

    #[inline(always)]
    pub(super) fn root(&self) -> Id {
        self.header.root
    }

    /// Points the slot of `parent` that held `old` at `new`. The header's slot
    /// is the root.
    pub(super) fn replace_child(&mut self, parent: Id, old: Id, new: Id) {
        if parent.is_header() {
            self.header.root = new;
        } else if self.left(parent) == old {
            self.set_left(parent, new);
        } else {
            debug_assert_eq!(self.right(parent), old);
            self.set_right(parent, new);
        }
    }

    pub(super) fn minimum(&self, mut x: Id) -> Id {
        while !self.left(x).is_nil() {
            x = self.left(x);
        }
        x
    }

    pub(super) fn maximum(&self, mut x: Id) -> Id {
        while !self.right(x).is_nil() {
            x = self.right(x);
        }
        x
    }

    /// Promotes the right child of `x` into its place.
    pub(super) fn rotate_left(&mut self, x: Id) {
        let y = self.right(x);
        debug_assert!(!y.is_nil(), "rotate_left requires a right child");
        let inner = self.left(y);
        self.set_right(x, inner);
        self.set_parent(inner, x);

        let p = self.parent(x);
        self.node_mut(y).parent = p;
        self.replace_child(p, x, y);

        self.set_left(y, x);
        self.node_mut(x).parent = y;
    }

    /// Promotes the left child of `x` into its place.
    pub(super) fn rotate_right(&mut self, x: Id) {
        let y = self.left(x);
        debug_assert!(!y.is_nil(), "rotate_right requires a left child");
        let inner = self.right(y);
        self.set_left(x, inner);
        self.set_parent(inner, x);

        let p = self.parent(x);
        self.node_mut(y).parent = p;
        self.replace_child(p, x, y);

        self.set_right(y, x);
        self.node_mut(x).parent = y;
    }
}
