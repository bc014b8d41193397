use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::mem;

use crate::DefaultHashBuilder;
use crate::error::Error;
use crate::hash_table::HashTable;
use crate::ops::KeyOps;
use crate::ops::KeyedOps;

/// A fixed-capacity hash map backed by [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Ord`. Entries are hashed with the builder `S` and ordered by key,
/// so the slot layout depends only on the set of keys, never on the values or
/// on the order of operations.
///
/// The capacity is fixed when the map is created. Inserting a new key into a
/// full map fails with [`Error::TableFull`]; updating an existing key always
/// succeeds.
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V), KeyedOps<S>>,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates an empty map holding at most `capacity` entries, using the
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
    /// use hi_hash::HashMap;
    ///
    /// let map: HashMap<&str, i32, _> = HashMap::with_capacity_and_hasher(10, RandomState::new());
    /// assert_eq!(map.capacity(), 10);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_ops(KeyedOps::new(hash_builder), capacity),
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns `true` if no further keys can be added.
    pub fn is_full(&self) -> bool {
        self.table.is_full()
    }

    /// Returns the fixed capacity of the map.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        self.table.ops().hasher()
    }

    /// Removes all entries, keeping the capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the entries, in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys, in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over the values, in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Ord,
    S: BuildHasher,
{
    fn find_key(&self, key: &K) -> Option<usize> {
        let ops = self.table.ops().key_ops();
        self.table.find_by(
            ops.hash(key),
            |entry| ops.equals(key, &entry.0),
            |entry| ops.greater(key, &entry.0),
        )
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was already present its value is replaced and the old value
    /// returned; the stored key is kept. Otherwise `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableFull`] if the key is new and the map is at
    /// capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use hi_hash::Error;
    /// use hi_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::with_capacity(1);
    /// assert_eq!(map.insert("a", 1), Ok(None));
    /// assert_eq!(map.insert("a", 2), Ok(Some(1)));
    /// assert_eq!(map.insert("b", 3), Err(Error::TableFull { capacity: 1 }));
    /// assert_eq!(map.get(&"a"), Some(&2));
    /// # }
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if let Some(loc) = self.find_key(&key)
            && let Some(entry) = self.table.get_at_mut(loc)
        {
            return Ok(Some(mem::replace(&mut entry.1, value)));
        }

        self.table.insert((key, value)).map(|_| None)
    }

    /// Returns a reference to the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find_key(key)
            .and_then(|loc| self.table.get_at(loc))
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let loc = self.find_key(key)?;
        self.table.get_at_mut(loc).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_key(key).is_some()
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use hi_hash::HashMap;
    ///
    /// let mut map: HashMap<u32, &str> = HashMap::with_capacity(4);
    /// map.insert(1, "one").unwrap();
    /// assert_eq!(map.remove(&1), Some("one"));
    /// assert_eq!(map.remove(&1), None);
    /// # }
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` from the map, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let loc = self.find_key(key)?;
        self.table.remove_at(loc)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    S: Default,
{
    /// Creates an empty map holding at most `capacity` entries, using the
    /// default hasher builder.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

/// An iterator over the entries of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
