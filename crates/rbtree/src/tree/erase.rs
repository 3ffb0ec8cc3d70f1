use super::{Color, Id, Pos, RbTree};
use crate::alloc::NodeAllocator;
use crate::compare::Compare;
use crate::extract::KeyOfValue;

impl<T, X, C, A> RbTree<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    /// Releases the slot of an unlinked node and returns its value.
    pub(super) fn drop_node(&mut self, z: Id) -> T {
        match self.alloc.deallocate(z) {
            Some(node) => node.into_value(),
            None => unreachable!("slot {z:?} was never constructed"),
        }
    }

    /// Unlinks `z` and restores the red-black invariants. `z` stays allocated.
    fn unlink(&mut self, z: Id) {
        let mut y = z;
        let x;
        let x_parent;

        if self.left(y).is_nil() {
            x = self.right(y);
        } else if self.right(y).is_nil() {
            x = self.left(y);
        } else {
            y = self.minimum(self.right(y));
            x = self.right(y);
        }

        let removed_color;
        if y != z {
            // Two children: splice the successor `y` into z's place.
            let zl = self.left(z);
            self.node_mut(zl).parent = y;
            self.set_left(y, zl);
            if y != self.right(z) {
                x_parent = self.parent(y);
                self.set_parent(x, x_parent);
                self.set_left(x_parent, x);
                let zr = self.right(z);
                self.set_right(y, zr);
                self.node_mut(zr).parent = y;
            } else {
                x_parent = y;
            }
            let zp = self.parent(z);
            self.replace_child(zp, z, y);
            self.node_mut(y).parent = zp;

            let (zc, yc) = (self.color(z), self.color(y));
            self.set_color(y, zc);
            self.set_color(z, yc);
            removed_color = yc;
        } else {
            x_parent = self.parent(z);
            self.set_parent(x, x_parent);
            self.replace_child(x_parent, z, x);

            if self.header.leftmost == z {
                // z has no left child here.
                self.header.leftmost = if self.right(z).is_nil() {
                    x_parent
                } else {
                    self.minimum(x)
                };
            }
            if self.header.rightmost == z {
                self.header.rightmost = if self.left(z).is_nil() {
                    x_parent
                } else {
                    self.maximum(x)
                };
            }
            removed_color = self.color(z);
        }

        if removed_color == Color::Black {
            self.erase_fixup(x, x_parent);
        }
    }

    fn erase_fixup(&mut self, mut x: Id, mut x_parent: Id) {
        while x != self.root() && !self.is_red(x) {
            if x == self.left(x_parent) {
                let mut w = self.right(x_parent);
                if self.is_red(w) {
                    self.set_color(w, Color::Black);
                    self.set_color(x_parent, Color::Red);
                    self.rotate_left(x_parent);
                    w = self.right(x_parent);
                }
                if !self.is_red(self.left(w)) && !self.is_red(self.right(w)) {
                    self.set_color(w, Color::Red);
                    x = x_parent;
                    x_parent = self.parent(x_parent);
                } else {
                    if !self.is_red(self.right(w)) {
                        let near = self.left(w);
                        self.set_color(near, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_right(w);
                        w = self.right(x_parent);
                    }
                    let pc = self.color(x_parent);
                    self.set_color(w, pc);
                    self.set_color(x_parent, Color::Black);
                    let far = self.right(w);
                    self.set_color(far, Color::Black);
                    self.rotate_left(x_parent);
                    break;
                }
            } else {
                let mut w = self.left(x_parent);
                if self.is_red(w) {
                    self.set_color(w, Color::Black);
                    self.set_color(x_parent, Color::Red);
                    self.rotate_right(x_parent);
                    w = self.left(x_parent);
                }
                if !self.is_red(self.right(w)) && !self.is_red(self.left(w)) {
                    self.set_color(w, Color::Red);
                    x = x_parent;
                    x_parent = self.parent(x_parent);
                } else {
                    if !self.is_red(self.left(w)) {
                        let near = self.right(w);
                        self.set_color(near, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_left(w);
                        w = self.left(x_parent);
                    }
                    let pc = self.color(x_parent);
                    self.set_color(w, pc);
                    self.set_color(x_parent, Color::Black);
                    let far = self.left(w);
                    self.set_color(far, Color::Black);
                    self.rotate_right(x_parent);
                    break;
                }
            }
        }
        if !x.is_nil() {
            self.set_color(x, Color::Black);
        }
    }

    fn erase_id(&mut self, z: Id) -> T {
        self.unlink(z);
        self.len -= 1;
        self.drop_node(z)
    }

    /// Removes the element at `pos`, returning it and the position that
    /// followed it.
    pub fn erase(&mut self, pos: Pos) -> (T, Pos) {
        self.check_pos(pos);
        debug_assert!(!pos.is_end(), "erasing the end position");
        let next = self.increment(pos.id);
        let value = self.erase_id(pos.id);
        (value, self.pos(next))
    }

    pub fn remove(&mut self, pos: Pos) -> T {
        self.erase(pos).0
    }

    /// Removes `[first, last)` and returns `last`. The whole-tree range is
    /// torn down without rebalancing.
    pub fn erase_range(&mut self, first: Pos, last: Pos) -> Pos {
        self.check_pos(first);
        self.check_pos(last);
        if first == self.begin() && last.is_end() {
            self.clear();
            return self.end();
        }
        let mut cur = first.id;
        while cur != last.id {
            debug_assert!(!cur.is_header(), "range end precedes its start");
            let next = self.increment(cur);
            self.erase_id(cur);
            cur = next;
        }
        last
    }

    pub fn pop_first(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.erase_id(self.header.leftmost))
    }

    pub fn pop_last(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.erase_id(self.header.rightmost))
    }

    pub fn clear(&mut self) {
        if self.len > 0 {
            log::trace!("tearing down red-black tree of {} nodes", self.len);
        }
        self.destroy_subtree(self.header.root);
        self.header.reset();
        self.len = 0;
    }
}

impl<T, X, C, A> RbTree<T, X, C, A>
where
    X: KeyOfValue<T>,
    C: Compare<X::Key>,
    A: NodeAllocator<T>,
{
    /// Removes every element equivalent to `k` and returns how many there were.
    pub fn erase_key(&mut self, k: &X::Key) -> usize {
        let (first, last) = self.equal_range(k);
        let before = self.len;
        self.erase_range(first, last);
        before - self.len
    }
}
