use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::error::Error;
use crate::hash_table::HashTable;
use crate::ops::OrdOps;

/// A fixed-capacity hash set backed by [`HashTable`].
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements
/// `Hash + Ord`, hashing them with the builder `S` and resolving collisions
/// with `Ord`. Because placement is decided by value order, two sets holding
/// the same values with the same hasher have identical layouts, whatever
/// sequence of insertions and removals produced them.
///
/// The capacity is fixed when the set is created; [`insert`](Self::insert)
/// fails with [`Error::TableFull`] once it is reached.
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T, OrdOps<S>>,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Ord,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Ord,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> HashSet<T, S> {
    /// Creates an empty set holding at most `capacity` values, using the
    /// given hasher builder.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::hash::RandomState;
    ///
    /// use hi_hash::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_capacity_and_hasher(100, RandomState::new());
    /// assert_eq!(set.capacity(), 100);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_ops(OrdOps::new(hash_builder), capacity),
        }
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns `true` if no further values can be inserted.
    pub fn is_full(&self) -> bool {
        self.table.is_full()
    }

    /// Returns the fixed capacity of the set.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        self.table.ops().hasher()
    }

    /// Removes all elements from the set.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the values of the set, in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator that removes and yields all values from the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use hi_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::with_capacity(4);
    /// set.insert(1).unwrap();
    /// set.insert(2).unwrap();
    ///
    /// let values: Vec<_> = set.drain().collect();
    /// assert!(set.is_empty());
    /// assert_eq!(values.len(), 2);
    /// # }
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns the underlying table, e.g. to inspect its slots.
    pub fn as_table(&self) -> &HashTable<T, OrdOps<S>> {
        &self.table
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Ord,
    S: BuildHasher,
{
    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain this value, `Ok(true)` is
    ///   returned.
    /// - If the set already contained this value, `Ok(false)` is returned and
    ///   the stored value is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableFull`] if the set is at capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use hi_hash::Error;
    /// use hi_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::with_capacity(1);
    /// assert_eq!(set.insert(37), Ok(true));
    /// assert_eq!(set.insert(37), Ok(false));
    /// assert_eq!(set.insert(38), Err(Error::TableFull { capacity: 1 }));
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> Result<bool, Error> {
        self.table.insert(value)
    }

    /// Returns `true` if the set contains a value.
    pub fn contains(&self, value: &T) -> bool {
        self.table.contains(value)
    }

    /// Returns a reference to the value in the set, if any, that is equal to
    /// the given value.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.table.get(value)
    }

    /// Removes a value from the set. Returns whether the value was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use hi_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::with_capacity(8);
    /// set.insert(1).unwrap();
    /// assert_eq!(set.remove(&1), true);
    /// assert_eq!(set.remove(&1), false);
    /// # }
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.table.remove(value).is_ok()
    }

    /// Removes and returns the value in the set, if any, that is equal to the
    /// given one.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.table.remove(value).ok()
    }

    /// Returns `true` if the set is a subset of another.
    pub fn is_subset(&self, other: &HashSet<T, S>) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> HashSet<T, S>
where
    S: Default,
{
    /// Creates an empty set holding at most `capacity` values, using the
    /// default hasher builder.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use hi_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::with_capacity(100);
    /// assert_eq!(set.capacity(), 100);
    /// # }
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the values of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            Self {
                k1: OsRng.try_next_u64().unwrap_or(0),
                k2: OsRng.try_next_u64().unwrap_or(0),
            }
        }
    }

    #[test]
    fn test_with_capacity() {
        let set: HashSet<i32, SipHashBuilder> = HashSet::with_capacity(12);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.capacity(), 12);
    }

    #[test]
    fn test_insert_contains_remove() {
        let mut set: HashSet<String, SipHashBuilder> = HashSet::with_capacity(16);
        for word in ["alpha", "beta", "gamma", "delta"] {
            assert_eq!(set.insert(word.to_string()), Ok(true));
        }
        assert_eq!(set.insert("beta".to_string()), Ok(false));
        assert_eq!(set.len(), 4);

        assert!(set.contains(&"gamma".to_string()));
        assert!(!set.contains(&"epsilon".to_string()));
        assert_eq!(set.get(&"alpha".to_string()).map(String::as_str), Some("alpha"));

        assert!(set.remove(&"alpha".to_string()));
        assert!(!set.remove(&"alpha".to_string()));
        assert_eq!(set.take(&"delta".to_string()), Some("delta".to_string()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_full_set() {
        let mut set: HashSet<u32, SipHashBuilder> = HashSet::with_capacity(8);
        for v in 0..8 {
            assert_eq!(set.insert(v), Ok(true));
        }
        assert!(set.is_full());
        assert_eq!(set.insert(8), Err(Error::TableFull { capacity: 8 }));
        for v in 0..8 {
            assert!(set.contains(&v));
        }

        assert!(set.remove(&3));
        assert_eq!(set.insert(8), Ok(true));
        assert!(!set.contains(&3));
    }

    #[test]
    fn test_same_contents_same_layout() {
        let hasher = SipHashBuilder::default();
        let mut a: HashSet<u64, _> = HashSet::with_capacity_and_hasher(32, hasher.clone());
        let mut b: HashSet<u64, _> = HashSet::with_capacity_and_hasher(32, hasher);

        for v in 0..24u64 {
            a.insert(v).unwrap();
        }
        for v in (0..30u64).rev() {
            b.insert(v).unwrap();
        }
        for v in 24..30u64 {
            assert!(b.remove(&v));
        }

        assert_eq!(a, b);
        assert_eq!(a.as_table().slots(), b.as_table().slots());
    }

    #[test]
    fn test_iter_drain_clear() {
        let mut set: HashSet<i32, SipHashBuilder> = HashSet::with_capacity(10);
        for v in 1..=5 {
            set.insert(v).unwrap();
        }

        let mut values: Vec<_> = set.iter().copied().collect();
        values.sort();
        assert_eq!(values, [1, 2, 3, 4, 5]);
        assert_eq!((&set).into_iter().count(), 5);

        let mut drained: Vec<_> = set.drain().collect();
        drained.sort();
        assert_eq!(drained, [1, 2, 3, 4, 5]);
        assert!(set.is_empty());

        set.insert(9).unwrap();
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(&9));
    }

    #[test]
    fn test_subset_and_eq() {
        let mut a: HashSet<i32, SipHashBuilder> = HashSet::with_capacity(8);
        let mut b: HashSet<i32, SipHashBuilder> = HashSet::with_capacity(8);
        a.insert(1).unwrap();
        a.insert(2).unwrap();
        b.insert(1).unwrap();
        b.insert(2).unwrap();
        b.insert(3).unwrap();

        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
        assert_ne!(a, b);
        b.remove(&3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_debug() {
        let mut set: HashSet<i32, SipHashBuilder> = HashSet::with_capacity(4);
        set.insert(7).unwrap();
        assert_eq!(alloc::format!("{:?}", set), "{7}");
    }
}
