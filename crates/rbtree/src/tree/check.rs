//! Structural checker for tests. Reads the raw links and colors without going
//! through the tree's own navigation helpers.

use super::{Color, Id, RbTree};
use crate::alloc::NodeAllocator;
use crate::compare::Compare;
use crate::extract::KeyOfValue;

fn is_red<T, A: NodeAllocator<T>>(alloc: &A, x: Id) -> bool {
    !x.is_nil() && alloc.node(x).color == Color::Red
}

/// Returns `(black height, height)` of the subtree at `x` and appends its
/// nodes to `order` in key order.
fn walk<T, A: NodeAllocator<T>>(alloc: &A, x: Id, parent: Id, order: &mut Vec<Id>) -> (usize, usize) {
    if x.is_nil() {
        return (1, 0);
    }
    let node = alloc.node(x);
    assert_eq!(node.parent, parent, "broken parent link at {x:?}");
    if node.color == Color::Red {
        assert!(!is_red::<T, A>(alloc, node.left), "red node {x:?} has a red left child");
        assert!(!is_red::<T, A>(alloc, node.right), "red node {x:?} has a red right child");
    }
    let (lb, lh) = walk::<T, A>(alloc, node.left, x, order);
    order.push(x);
    let (rb, rh) = walk::<T, A>(alloc, node.right, x, order);
    assert_eq!(lb, rb, "black height differs below {x:?}");
    let own = usize::from(node.color == Color::Black);
    (lb + own, 1 + lh.max(rh))
}

/// Asserts every red-black and bookkeeping invariant; returns the height.
pub(crate) fn check<T, X, C, A>(tree: &RbTree<T, X, C, A>) -> usize
where
    X: KeyOfValue<T>,
    C: Compare<X::Key>,
    A: NodeAllocator<T>,
{
    let alloc = &tree.alloc;
    let root = tree.header.root;
    if root.is_nil() {
        assert_eq!(tree.len, 0);
        assert_eq!(tree.header.leftmost, Id::HEADER);
        assert_eq!(tree.header.rightmost, Id::HEADER);
        return 0;
    }
    assert_eq!(alloc.node(root).color, Color::Black, "red root");

    let mut order = Vec::with_capacity(tree.len);
    let (_, height) = walk::<T, A>(alloc, root, Id::HEADER, &mut order);
    assert_eq!(order.len(), tree.len, "len disagrees with reachable nodes");
    assert_eq!(tree.header.leftmost, order[0], "stale leftmost");
    assert_eq!(tree.header.rightmost, order[order.len() - 1], "stale rightmost");

    for pair in order.windows(2) {
        let a = X::key(&alloc.node(pair[0]).value);
        let b = X::key(&alloc.node(pair[1]).value);
        assert!(!tree.comp.less(b, a), "keys out of order");
    }

    let bound = 2.0 * ((tree.len + 1) as f64).log2();
    assert!(height as f64 <= bound, "height {height} exceeds {bound}");
    height
}

/// In-order `(color, depth)` of every node.
pub(crate) fn shape<T, X, C, A>(tree: &RbTree<T, X, C, A>) -> Vec<(Color, usize)>
where
    A: NodeAllocator<T>,
{
    fn go<T, A: NodeAllocator<T>>(alloc: &A, x: Id, depth: usize, out: &mut Vec<(Color, usize)>) {
        if x.is_nil() {
            return;
        }
        let node = alloc.node(x);
        go::<T, A>(alloc, node.left, depth + 1, out);
        out.push((node.color, depth));
        go::<T, A>(alloc, node.right, depth + 1, out);
    }

    let mut out = Vec::with_capacity(tree.len);
    go::<T, A>(&tree.alloc, tree.header.root, 0, &mut out);
    out
}
