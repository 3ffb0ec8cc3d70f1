/// Obtains the comparison key from a stored value.
pub trait KeyOfValue<T> {
    type Key: ?Sized;

    fn key(value: &T) -> &Self::Key;
}

/// The value is its own key (sets).
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl<T> KeyOfValue<T> for Identity {
    type Key = T;

    #[inline(always)]
    fn key(value: &T) -> &T {
        value
    }
}

/// The key is the first field of a pair (maps).
#[derive(Clone, Copy, Debug, Default)]
pub struct First;

impl<K, V> KeyOfValue<(K, V)> for First {
    type Key = K;

    #[inline(always)]
    fn key(value: &(K, V)) -> &K {
        &value.0
    }
}
