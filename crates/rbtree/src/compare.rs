/// Strict weak ordering on keys, in the `less-than` form.
///
/// Two keys are equivalent when neither is less than the other.
pub trait Compare<K: ?Sized> {
    fn less(&self, a: &K, b: &K) -> bool;

    #[inline]
    fn equivalent(&self, a: &K, b: &K) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

/// Ascending order through [`Ord`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// Descending order through [`Ord`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Reverse;

impl<K: Ord + ?Sized> Compare<K> for Reverse {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        b < a
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::{Compare, Natural, Reverse};

    #[test]
    fn equivalence_follows_less() {
        assert!(Natural.less(&1, &2));
        assert!(Reverse.less(&2, &1));
        assert!(Natural.equivalent(&3, &3));
        assert!(!Reverse.equivalent(&3, &4));

        let by_len = |a: &&str, b: &&str| a.len() < b.len();
        assert!(by_len.equivalent(&"ab", &"cd"));
        assert!(!by_len.equivalent(&"a", &"cd"));
    }
}
