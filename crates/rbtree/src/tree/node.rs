/// Handle of a node slot in the tree's allocator.
///
/// Two values are reserved: [`Id::NIL`] is a missing child, and [`Id::HEADER`]
/// names the per-tree sentinel, which is never stored in the allocator.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Id(u32);

impl Id {
    pub const NIL: Self = Self(u32::MAX);
    pub const HEADER: Self = Self(u32::MAX - 1);

    /// Largest number of slots an allocator may hand out.
    pub const MAX_SLOTS: usize = (u32::MAX - 1) as usize;

    #[inline(always)]
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < Self::MAX_SLOTS);
        Self(index as u32)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        debug_assert!(self.is_node());
        self.0 as usize
    }

    #[inline(always)]
    pub fn is_nil(self) -> bool {
        self == Self::NIL
    }

    #[inline(always)]
    pub fn is_header(self) -> bool {
        self == Self::HEADER
    }

    /// `true` for handles that refer to an allocator slot.
    #[inline(always)]
    pub fn is_node(self) -> bool {
        self.0 < u32::MAX - 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// A data node: color, links and the stored value.
///
/// Parent links are plain back-references; the tree owns every node through
/// its allocator.
#[derive(Debug)]
pub struct Node<T> {
    pub(crate) color: Color,
    pub(crate) parent: Id,
    pub(crate) left: Id,
    pub(crate) right: Id,
    pub(crate) value: T,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            color: Color::Red,
            parent: Id::NIL,
            left: Id::NIL,
            right: Id::NIL,
            value,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// The sentinel. `root` is `NIL` for an empty tree; `leftmost` and `rightmost`
/// then point back at [`Id::HEADER`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Header {
    pub(crate) root: Id,
    pub(crate) leftmost: Id,
    pub(crate) rightmost: Id,
}

impl Header {
    pub(crate) const EMPTY: Self = Self {
        root: Id::NIL,
        leftmost: Id::HEADER,
        rightmost: Id::HEADER,
    };

    pub(crate) fn reset(&mut self) {
        *self = Self::EMPTY;
    }
}
