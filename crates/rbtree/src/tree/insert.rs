use super::{Color, Id, Node, Pos, RbTree};
use crate::alloc::NodeAllocator;
use crate::compare::Compare;
use crate::error::{AllocError, Error};
use crate::extract::KeyOfValue;

/// Where a new node goes: under `parent`, on the given side.
#[derive(Clone, Copy, Debug)]
pub(super) struct Attach {
    parent: Id,
    left: bool,
}

impl Attach {
    fn left_of(parent: Id) -> Self {
        Self { parent, left: true }
    }

    fn right_of(parent: Id) -> Self {
        Self {
            parent,
            left: false,
        }
    }
}

pub(super) enum UniquePos {
    Vacant(Attach),
    Occupied(Id),
}

impl<T, X, C, A> RbTree<T, X, C, A>
where
    A: NodeAllocator<T>,
{
    pub(super) fn alloc_node(&mut self, value: T) -> Result<Id, AllocError> {
        let id = self.alloc.allocate()?;
        self.alloc.construct(id, Node::new(value));
        Ok(id)
    }

    /// Allocates first, then builds the value. A failed build releases the
    /// slot before the error is returned.
    pub(super) fn create_node<F, E>(&mut self, f: F) -> Result<Id, Error<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let id = self.alloc.allocate()?;
        match f() {
            Ok(value) => {
                self.alloc.construct(id, Node::new(value));
                Ok(id)
            }
            Err(err) => {
                self.alloc.deallocate(id);
                Err(Error::Construct(err))
            }
        }
    }

    /// Links the fresh red node `z` at `at` and rebalances.
    pub(super) fn attach(&mut self, z: Id, at: Attach) {
        let p = at.parent;
        {
            let node = self.node_mut(z);
            node.parent = p;
            node.left = Id::NIL;
            node.right = Id::NIL;
            node.color = Color::Red;
        }

        if p.is_header() {
            debug_assert!(self.header.root.is_nil());
            self.header.root = z;
            self.header.leftmost = z;
            self.header.rightmost = z;
        } else if at.left {
            debug_assert!(self.left(p).is_nil());
            self.set_left(p, z);
            if p == self.header.leftmost {
                self.header.leftmost = z;
            }
        } else {
            debug_assert!(self.right(p).is_nil());
            self.set_right(p, z);
            if p == self.header.rightmost {
                self.header.rightmost = z;
            }
        }
        self.len += 1;
        self.insert_fixup(z);
    }

    fn insert_fixup(&mut self, mut x: Id) {
        while x != self.root() && self.is_red(self.parent(x)) {
            let xp = self.parent(x);
            let xpp = self.parent(xp);
            if xp == self.left(xpp) {
                let uncle = self.right(xpp);
                if self.is_red(uncle) {
                    self.set_color(xp, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(xpp, Color::Red);
                    x = xpp;
                } else {
                    if x == self.right(xp) {
                        x = xp;
                        self.rotate_left(x);
                    }
                    let xp = self.parent(x);
                    let xpp = self.parent(xp);
                    self.set_color(xp, Color::Black);
                    self.set_color(xpp, Color::Red);
                    self.rotate_right(xpp);
                    break;
                }
            } else {
                let uncle = self.left(xpp);
                if self.is_red(uncle) {
                    self.set_color(xp, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(xpp, Color::Red);
                    x = xpp;
                } else {
                    if x == self.left(xp) {
                        x = xp;
                        self.rotate_right(x);
                    }
                    let xp = self.parent(x);
                    let xpp = self.parent(xp);
                    self.set_color(xp, Color::Black);
                    self.set_color(xpp, Color::Red);
                    self.rotate_left(xpp);
                    break;
                }
            }
        }
        let root = self.root();
        self.set_color(root, Color::Black);
    }
}

impl<T, X, C, A> RbTree<T, X, C, A>
where
    X: KeyOfValue<T>,
    C: Compare<X::Key>,
    A: NodeAllocator<T>,
{
    pub(super) fn unique_pos(&self, k: &X::Key) -> UniquePos {
        let mut x = self.root();
        let mut y = Id::HEADER;
        let mut went_left = true;
        while !x.is_nil() {
            y = x;
            went_left = self.less(k, self.key(x));
            x = if went_left { self.left(x) } else { self.right(x) };
        }

        let mut j = y;
        if went_left {
            if j == self.header.leftmost {
                return UniquePos::Vacant(Attach::left_of(y));
            }
            j = self.decrement(j);
        }
        if self.less(self.key(j), k) {
            UniquePos::Vacant(Attach { parent: y, left: went_left })
        } else {
            UniquePos::Occupied(j)
        }
    }

    /// Descends left only on strictly-less, so a new key lands after every
    /// equivalent one.
    fn equal_pos(&self, k: &X::Key) -> Attach {
        let mut x = self.root();
        let mut y = Id::HEADER;
        while !x.is_nil() {
            y = x;
            x = if self.less(k, self.key(x)) {
                self.left(x)
            } else {
                self.right(x)
            };
        }
        Attach {
            parent: y,
            left: y.is_header() || self.less(k, self.key(y)),
        }
    }

    /// Like [`equal_pos`](Self::equal_pos) but lands before every equivalent key.
    fn equal_lower_pos(&self, k: &X::Key) -> Attach {
        let mut x = self.root();
        let mut y = Id::HEADER;
        while !x.is_nil() {
            y = x;
            x = if !self.less(self.key(x), k) {
                self.left(x)
            } else {
                self.right(x)
            };
        }
        Attach {
            parent: y,
            left: y.is_header() || !self.less(self.key(y), k),
        }
    }

    fn hint_unique_pos(&self, hint: Id, k: &X::Key) -> UniquePos {
        if hint.is_header() {
            if self.len > 0 && self.less(self.key(self.header.rightmost), k) {
                return UniquePos::Vacant(Attach::right_of(self.header.rightmost));
            }
            return self.unique_pos(k);
        }

        if self.less(k, self.key(hint)) {
            if hint == self.header.leftmost {
                return UniquePos::Vacant(Attach::left_of(hint));
            }
            let before = self.decrement(hint);
            if self.less(self.key(before), k) {
                return UniquePos::Vacant(if self.right(before).is_nil() {
                    Attach::right_of(before)
                } else {
                    Attach::left_of(hint)
                });
            }
            return self.unique_pos(k);
        }

        if self.less(self.key(hint), k) {
            if hint == self.header.rightmost {
                return UniquePos::Vacant(Attach::right_of(hint));
            }
            let after = self.increment(hint);
            if self.less(k, self.key(after)) {
                return UniquePos::Vacant(if self.right(hint).is_nil() {
                    Attach::right_of(hint)
                } else {
                    Attach::left_of(after)
                });
            }
            return self.unique_pos(k);
        }

        UniquePos::Occupied(hint)
    }

    fn hint_equal_pos(&self, hint: Id, k: &X::Key) -> Attach {
        if hint.is_header() {
            if self.len > 0 && !self.less(k, self.key(self.header.rightmost)) {
                return Attach::right_of(self.header.rightmost);
            }
            return self.equal_pos(k);
        }

        if !self.less(self.key(hint), k) {
            if hint == self.header.leftmost {
                return Attach::left_of(hint);
            }
            let before = self.decrement(hint);
            if !self.less(k, self.key(before)) {
                return if self.right(before).is_nil() {
                    Attach::right_of(before)
                } else {
                    Attach::left_of(hint)
                };
            }
            return self.equal_pos(k);
        }

        if hint == self.header.rightmost {
            return Attach::right_of(hint);
        }
        let after = self.increment(hint);
        if !self.less(self.key(after), k) {
            return if self.right(hint).is_nil() {
                Attach::right_of(hint)
            } else {
                Attach::left_of(after)
            };
        }
        self.equal_lower_pos(k)
    }

    /// Inserts `value` unless an equivalent key is stored. Returns the position
    /// of the new or the blocking element, and whether an insertion happened.
    pub fn insert_unique(&mut self, value: T) -> Result<(Pos, bool), AllocError> {
        match self.unique_pos(X::key(&value)) {
            UniquePos::Occupied(j) => Ok((self.pos(j), false)),
            UniquePos::Vacant(at) => {
                let z = self.alloc_node(value)?;
                self.attach(z, at);
                Ok((self.pos(z), true))
            }
        }
    }

    /// Inserts `value` after every element with an equivalent key.
    pub fn insert_equal(&mut self, value: T) -> Result<Pos, AllocError> {
        let at = self.equal_pos(X::key(&value));
        let z = self.alloc_node(value)?;
        self.attach(z, at);
        Ok(self.pos(z))
    }

    /// [`insert_unique`](Self::insert_unique) that tries to place the value
    /// right before `hint` in O(1), falling back to a full descent when the
    /// neighbors of `hint` do not bracket the key.
    pub fn insert_unique_hint(&mut self, hint: Pos, value: T) -> Result<(Pos, bool), AllocError> {
        self.check_pos(hint);
        match self.hint_unique_pos(hint.id, X::key(&value)) {
            UniquePos::Occupied(j) => Ok((self.pos(j), false)),
            UniquePos::Vacant(at) => {
                let z = self.alloc_node(value)?;
                self.attach(z, at);
                Ok((self.pos(z), true))
            }
        }
    }

    pub fn insert_equal_hint(&mut self, hint: Pos, value: T) -> Result<Pos, AllocError> {
        self.check_pos(hint);
        let at = self.hint_equal_pos(hint.id, X::key(&value));
        let z = self.alloc_node(value)?;
        self.attach(z, at);
        Ok(self.pos(z))
    }

    /// Builds the value in a freshly allocated node, then inserts it unless an
    /// equivalent key is stored, in which case the node is released again.
    pub fn emplace_unique_with<F, E>(&mut self, f: F) -> Result<(Pos, bool), Error<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let z = self.create_node(f)?;
        match self.unique_pos(self.key(z)) {
            UniquePos::Occupied(j) => {
                self.drop_node(z);
                Ok((self.pos(j), false))
            }
            UniquePos::Vacant(at) => {
                self.attach(z, at);
                Ok((self.pos(z), true))
            }
        }
    }

    pub fn emplace_equal_with<F, E>(&mut self, f: F) -> Result<Pos, Error<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let z = self.create_node(f)?;
        let at = self.equal_pos(self.key(z));
        self.attach(z, at);
        Ok(self.pos(z))
    }

    pub fn emplace_hint_unique_with<F, E>(&mut self, hint: Pos, f: F) -> Result<(Pos, bool), Error<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.check_pos(hint);
        let z = self.create_node(f)?;
        match self.hint_unique_pos(hint.id, self.key(z)) {
            UniquePos::Occupied(j) => {
                self.drop_node(z);
                Ok((self.pos(j), false))
            }
            UniquePos::Vacant(at) => {
                self.attach(z, at);
                Ok((self.pos(z), true))
            }
        }
    }

    pub fn emplace_hint_equal_with<F, E>(&mut self, hint: Pos, f: F) -> Result<Pos, Error<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.check_pos(hint);
        let z = self.create_node(f)?;
        let at = self.hint_equal_pos(hint.id, self.key(z));
        self.attach(z, at);
        Ok(self.pos(z))
    }
}

#[cfg(test)]
mod tests {
    use crate::alloc::{Arena, Counting, Limited};
    use crate::compare::Natural;
    use crate::error::{AllocError, Error};
    use crate::extract::{First, Identity};
    use crate::tree::RbTree;
    use crate::tree::check::check;

    type Pairs = RbTree<(u32, u32), First>;

    #[test]
    fn unique_rejects_equivalent_keys() {
        let mut tree = Pairs::new();
        let (first, inserted) = tree.insert_unique((5, 0)).unwrap();
        assert!(inserted);
        let (again, inserted) = tree.insert_unique((5, 1)).unwrap();
        assert!(!inserted);
        assert_eq!(first, again);
        assert_eq!(tree.get(again), Some(&(5, 0)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn equal_keeps_insertion_order() {
        let mut tree = Pairs::new();
        let mut rng = 0x2545_F491_u32;
        for seq in 0..300 {
            rng ^= rng << 13;
            rng ^= rng >> 17;
            rng ^= rng << 5;
            tree.insert_equal((rng % 7, seq)).unwrap();
            check(&tree);
        }
        let items: Vec<_> = tree.iter().copied().collect();
        for pair in items.windows(2) {
            let ((ka, sa), (kb, sb)) = (pair[0], pair[1]);
            assert!(ka < kb || (ka == kb && sa < sb), "{:?}", pair);
        }
    }

    #[test]
    fn emplace_failure_leaves_tree_untouched() {
        let mut tree = RbTree::<u32, Identity, Natural, Counting<Arena<u32>>>::new();
        for k in [4, 2, 6] {
            tree.insert_unique(k).unwrap();
        }
        let before: Vec<_> = tree.iter().copied().collect();

        let res = tree.emplace_unique_with(|| Err::<u32, _>("boom"));
        assert_eq!(res, Err(Error::Construct("boom")));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), before);
        assert_eq!(tree.allocator().allocations(), 4);
        assert_eq!(tree.allocator().deallocations(), 1);
        check(&tree);

        let (pos, inserted) = tree.emplace_unique_with(|| Ok::<_, ()>(4)).unwrap();
        assert!(!inserted);
        assert_eq!(tree.get(pos), Some(&4));
        assert_eq!(tree.allocator().live(), 3);

        let pos = tree.emplace_equal_with(|| Ok::<_, ()>(4)).unwrap();
        assert_eq!(tree.next(pos), tree.find(&6));
        assert_eq!(tree.count(&4), 2);
    }

    #[test]
    fn allocation_failure_leaves_tree_untouched() {
        let mut tree =
            RbTree::<u32, Identity, Natural, Limited<Arena<u32>>>::with_allocator(Limited::new(Arena::new(), 2));
        tree.insert_unique(1).unwrap();
        tree.insert_unique(2).unwrap();
        assert_eq!(tree.insert_unique(3), Err(AllocError));
        assert_eq!(tree.insert_equal(0), Err(AllocError));
        assert_eq!(
            tree.emplace_equal_with(|| Ok::<_, ()>(9)),
            Err(Error::Alloc(AllocError))
        );
        // Duplicates are detected before any allocation.
        assert_eq!(tree.insert_unique(2).map(|(_, inserted)| inserted), Ok(false));
        assert_eq!(tree.len(), 2);
        check(&tree);
    }

    #[test]
    fn unique_hints() {
        let mut tree = RbTree::<u32, Identity>::new();
        // Ascending run through the end hint.
        for k in (0..64).map(|k| k * 2) {
            let end = tree.end();
            assert!(tree.insert_unique_hint(end, k).unwrap().1);
        }
        check(&tree);

        // Correct hint: the successor of the new key.
        for k in (0..64).map(|k| k * 2 + 1) {
            let hint = tree.lower_bound(&k);
            let (pos, inserted) = tree.insert_unique_hint(hint, k).unwrap();
            assert!(inserted);
            assert_eq!(tree.next(pos), hint);
        }
        check(&tree);

        // Wrong hints fall back to a full descent.
        let begin = tree.begin();
        assert!(tree.insert_unique_hint(begin, 1000).unwrap().1);
        let end = tree.end();
        assert!(tree.insert_unique_hint(end, 500).unwrap().1);

        // Equivalent key at or around the hint.
        let hint = tree.find(&10);
        let (pos, inserted) = tree.insert_unique_hint(hint, 10).unwrap();
        assert!(!inserted);
        assert_eq!(pos, hint);
        let begin = tree.begin();
        assert!(!tree.insert_unique_hint(begin, 77).unwrap().1);

        assert_eq!(tree.len(), 130);
        assert!(tree.iter().copied().eq((0..128_u32).chain([500, 1000])));
        check(&tree);
    }

    #[test]
    fn equal_hints() {
        let mut tree = Pairs::new();
        for seq in 0..10 {
            let end = tree.end();
            tree.insert_equal_hint(end, (1, seq)).unwrap();
        }
        // A hint at the first `1` places the new one in front of it.
        let hint = tree.lower_bound(&1);
        let pos = tree.insert_equal_hint(hint, (1, 100)).unwrap();
        assert_eq!(tree.begin(), pos);

        // Misleading hints still yield a sorted tree.
        let begin = tree.begin();
        tree.insert_equal_hint(begin, (5, 0)).unwrap();
        let end = tree.end();
        tree.insert_equal_hint(end, (0, 0)).unwrap();
        let hint = tree.find(&0);
        tree.insert_equal_hint(hint, (3, 0)).unwrap();

        let keys: Vec<_> = tree.iter().map(|&(k, _)| k).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(tree.count(&1), 11);
        check(&tree);
    }

    #[test]
    fn emplace_hint_variants() {
        let mut tree = RbTree::<u32, Identity>::new();
        for k in [10, 20, 30] {
            tree.insert_unique(k).unwrap();
        }
        let hint = tree.find(&20);
        let (pos, inserted) = tree.emplace_hint_unique_with(hint, || Ok::<_, ()>(15)).unwrap();
        assert!(inserted);
        assert_eq!(tree.next(pos), hint);
        let (_, inserted) = tree.emplace_hint_unique_with(hint, || Ok::<_, ()>(20)).unwrap();
        assert!(!inserted);
        assert_eq!(
            tree.emplace_hint_equal_with(hint, || Err::<u32, _>(7)),
            Err(Error::Construct(7))
        );
        let pos = tree.emplace_hint_equal_with(hint, || Ok::<_, ()>(20)).unwrap();
        assert_eq!(tree.next(pos), hint);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [10, 15, 20, 20, 30]);
        check(&tree);
    }
}
