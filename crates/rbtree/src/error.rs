use std::fmt;

/// The allocator could not provide a node slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("node allocation failed")
    }
}

impl std::error::Error for AllocError {}

/// Failure of an operation that both allocates and builds a value.
///
/// `E` is the error of the user-supplied constructor.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    Alloc(AllocError),
    Construct(E),
}

impl<E> From<AllocError> for Error<E> {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(err) => fmt::Display::fmt(err, f),
            Self::Construct(err) => write!(f, "value construction failed: {err}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Error<E> {}

/// Allocation failure on a path that cannot report it, handled the way `std`
/// collections handle it.
#[cold]
pub(crate) fn handle_alloc_error(err: AllocError) -> ! {
    panic!("{err}")
}
