//! The fixed-capacity table at the core of the crate.
//!
//! Elements live in a single array of [`Slot`]s and are located by linear
//! probing from their home slot, `hash % capacity`. When two elements compete
//! for a slot, the one that is greater under [`KeyOps::greater`] keeps it and
//! the other moves on, so every probe chain is sorted in descending order. A
//! lookup can therefore stop at the first element it outranks, and the layout
//! of the table is a function of the stored set alone: inserting or removing
//! the same elements in any order produces the same slots.
//!
//! Removal does not leave tombstones. Successors that were pushed past the
//! vacated slot are shifted back one chain link at a time until the gap
//! reaches a slot nothing needs to move into.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use log::debug;
use log::trace;

use crate::error::Error;
use crate::ops::FnOps;
use crate::ops::KeyOps;

/// A single cell of a [`HashTable`].
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Slot<V> {
    /// Nothing is stored here. Probes stop at empty slots.
    #[default]
    Empty,
    /// Holds an element together with its displacement from its home slot.
    Occupied {
        /// The stored element.
        value: V,
        /// Number of probe steps between the element's home slot and this
        /// one. Always `(index - hash % capacity) mod capacity`.
        rank: usize,
    },
}

impl<V> Slot<V> {
    /// Returns `true` if the slot holds an element.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    /// Returns the stored element, if any.
    #[inline]
    pub fn element(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty => None,
        }
    }

    /// Returns the displacement of the stored element, if any.
    #[inline]
    pub fn rank(&self) -> Option<usize> {
        match self {
            Slot::Occupied { rank, .. } => Some(*rank),
            Slot::Empty => None,
        }
    }

    #[inline]
    fn take(&mut self) -> Option<(V, usize)> {
        match mem::take(self) {
            Slot::Occupied { value, rank } => Some((value, rank)),
            Slot::Empty => None,
        }
    }
}

/// Probe-length distribution of a table.
///
/// Test-only unless the `stats` feature is enabled.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// `bins[r]` is the number of elements stored `r` slots past their home.
    pub bins: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Pretty-prints the histogram as a horizontal bar chart.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!(
            "probe histogram ({} entries):",
            self.bins.iter().sum::<usize>()
        );

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = match units % 8 {
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                7 => Some('▉'),
                _ => None,
            };
            bar.extend(partial);
            bar
        };

        for (rank, &count) in self.bins.iter().enumerate() {
            println!("{:>4} | {} ({})", rank, make_bar(count), count);
        }
    }
}

/// Utilization statistics for debugging.
///
/// Test-only unless the `stats` feature is enabled.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Fixed number of slots
    pub capacity: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Largest displacement of any stored element
    pub max_rank: usize,
    /// Mean displacement over stored elements
    pub mean_rank: f64,
    /// Length of the longest run of consecutive occupied slots
    pub longest_run: usize,
    /// Bytes used by the slot array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Displacement: max {}, mean {:.3}",
            self.max_rank, self.mean_rank
        );
        println!("Longest occupied run: {} slots", self.longest_run);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// A fixed-capacity hash table with ordered linear probing.
///
/// `HashTable<V, O>` stores values of type `V` and uses the primitives in `O`
/// (see [`KeyOps`]) to hash, compare and order them. The capacity is chosen
/// at construction and never changes; inserting into a full table fails with
/// [`Error::TableFull`].
///
/// Within each probe chain elements are kept in descending order, which lets
/// lookups of absent keys stop early and makes the slot layout independent of
/// the order in which elements were inserted or removed.
///
/// ## Example
///
/// ```rust
/// use hi_hash::HashTable;
///
/// let mut table = HashTable::new(
///     |v: &u32| *v as u64,
///     |a: &u32, b: &u32| a == b,
///     |a: &u32, b: &u32| a > b,
///     10,
/// );
///
/// for v in [19, 9, 39, 29] {
///     table.insert(v).unwrap();
/// }
///
/// // Everything hashes to slot 9; the largest element keeps it and the rest
/// // wrap around in descending order.
/// let layout: Vec<Option<u32>> = table.slots().iter().map(|s| s.element().copied()).collect();
/// assert_eq!(
///     layout,
///     [Some(29), Some(19), Some(9), None, None, None, None, None, None, Some(39)]
/// );
///
/// assert_eq!(table.find(&9), Some(2));
/// assert_eq!(table.remove(&39), Ok(39));
/// assert_eq!(table.find(&39), None);
/// assert_eq!(table.size(), (3, 10));
/// ```
#[derive(Clone)]
pub struct HashTable<V, O> {
    slots: Box<[Slot<V>]>,
    ops: O,
    populated: usize,
}

impl<V: Debug, O> Debug for HashTable<V, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;

        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.slots.len())
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .map(|slot| match slot {
                        Slot::Occupied { value, rank } => format!("{value:?}@{rank}"),
                        Slot::Empty => String::from("..."),
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<V, H, E, G> HashTable<V, FnOps<H, E, G>>
where
    H: Fn(&V) -> u64,
    E: Fn(&V, &V) -> bool,
    G: Fn(&V, &V) -> bool,
{
    /// Creates an empty table from a hash function, an equality predicate, a
    /// greater-than predicate and a fixed capacity.
    ///
    /// The predicates must satisfy the requirements documented on
    /// [`KeyOps`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(hash: H, equals: E, greater: G, capacity: usize) -> Self {
        Self::with_ops(FnOps::new(hash, equals, greater), capacity)
    }
}

impl<V, O> HashTable<V, O> {
    /// Creates an empty table with room for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hi_hash::HashTable;
    /// use hi_hash::OrdOps;
    /// use std::hash::RandomState;
    ///
    /// let table: HashTable<String, _> = HashTable::with_ops(OrdOps::new(RandomState::new()), 16);
    /// assert_eq!(table.capacity(), 16);
    /// assert!(table.is_empty());
    /// ```
    pub fn with_ops(ops: O, capacity: usize) -> Self {
        assert!(capacity > 0, "hash table capacity must be non-zero");

        let slots = (0..capacity)
            .map(|_| Slot::Empty)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            ops,
            populated: 0,
        }
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns `true` if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.populated == self.slots.len()
    }

    /// Returns the fixed number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `(len, capacity)`.
    pub fn size(&self) -> (usize, usize) {
        (self.populated, self.slots.len())
    }

    /// Returns the comparison primitives the table was built with.
    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Exposes the raw slot array, for diagnostics.
    ///
    /// ```rust
    /// use hi_hash::HashTable;
    ///
    /// let mut table = HashTable::new(
    ///     |v: &u8| *v as u64,
    ///     |a: &u8, b: &u8| a == b,
    ///     |a: &u8, b: &u8| a > b,
    ///     4,
    /// );
    /// table.insert(1).unwrap();
    /// table.insert(5).unwrap();
    ///
    /// for (index, slot) in table.slots().iter().enumerate() {
    ///     match slot.element() {
    ///         Some(v) => println!("{index}: {v} (rank {})", slot.rank().unwrap()),
    ///         None => println!("{index}: ---"),
    ///     }
    /// }
    /// assert_eq!(table.slots()[2].rank(), Some(1));
    /// ```
    pub fn slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    /// Returns an iterator over the stored values in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values in slot order.
    ///
    /// The table is empty once the iterator is dropped, even if it was not
    /// fully consumed.
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            slots: self.slots.iter_mut(),
            populated: &mut self.populated,
        }
    }

    /// Removes all elements, keeping the capacity.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::Empty);
        self.populated = 0;
    }
}

impl<V, O> HashTable<V, O>
where
    O: KeyOps<V>,
{
    #[inline(always)]
    fn home_of_hash(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    #[inline(always)]
    fn probe_from(&self, home: usize, i: usize) -> usize {
        (home + i) % self.slots.len()
    }

    /// Returns the `i`-th slot index in `value`'s probe sequence.
    #[inline]
    pub fn probe(&self, value: &V, i: usize) -> usize {
        self.probe_from(self.home_of_hash(self.ops.hash(value)), i)
    }

    /// Returns how many probe steps `value` would be from its home slot if it
    /// were stored at `loc`.
    #[inline]
    pub fn rank_at(&self, value: &V, loc: usize) -> usize {
        let capacity = self.slots.len();
        (loc % capacity + capacity - self.home_of_hash(self.ops.hash(value))) % capacity
    }

    /// Inserts a value.
    ///
    /// Returns `Ok(true)` if the value was added and `Ok(false)` if an equal
    /// value was already present, in which case the table is left untouched
    /// and `value` is dropped.
    ///
    /// Placing a value may move several stored elements one slot further
    /// along their probe chains.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableFull`] if every slot is occupied. The table is
    /// left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hi_hash::Error;
    /// use hi_hash::HashTable;
    ///
    /// let mut table = HashTable::new(
    ///     |v: &u32| *v as u64,
    ///     |a: &u32, b: &u32| a == b,
    ///     |a: &u32, b: &u32| a > b,
    ///     2,
    /// );
    ///
    /// assert_eq!(table.insert(7), Ok(true));
    /// assert_eq!(table.insert(7), Ok(false));
    /// assert_eq!(table.insert(8), Ok(true));
    /// assert_eq!(table.insert(9), Err(Error::TableFull { capacity: 2 }));
    /// ```
    pub fn insert(&mut self, value: V) -> Result<bool, Error> {
        let capacity = self.slots.len();
        if self.populated >= capacity {
            debug!("rejecting insert: all {capacity} slots are occupied");
            return Err(Error::TableFull { capacity });
        }

        let mut candidate = value;
        let mut i = 0;
        let mut loc = self.probe(&candidate, 0);
        let mut displaced = false;

        // Each step moves `loc` forward by exactly one slot, and at least one
        // slot is empty, so this terminates within `capacity` steps.
        while let Slot::Occupied {
            value: incumbent,
            rank,
        } = &mut self.slots[loc]
        {
            if self.ops.equals(incumbent, &candidate) {
                debug_assert!(!displaced, "displaced element collided with an equal key");
                return Ok(false);
            }

            if self.ops.greater(incumbent, &candidate) {
                i += 1;
            } else {
                mem::swap(incumbent, &mut candidate);
                let displaced_rank = mem::replace(rank, i);
                trace!("slot {loc}: displaced element at rank {displaced_rank}, new rank {i}");
                displaced = true;
                i = displaced_rank + 1;
            }

            loc = self.probe(&candidate, i);
        }

        self.slots[loc] = Slot::Occupied {
            value: candidate,
            rank: i,
        };
        self.populated += 1;
        Ok(true)
    }

    /// Returns the slot index holding a value equal to `key`, or `None`.
    ///
    /// The search stops at the first empty slot, or at the first stored
    /// element `key` is greater than, since the ordered placement would have
    /// put `key` in front of it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hi_hash::HashTable;
    ///
    /// let mut table = HashTable::new(
    ///     |v: &u32| (*v % 4) as u64,
    ///     |a: &u32, b: &u32| a == b,
    ///     |a: &u32, b: &u32| a > b,
    ///     4,
    /// );
    /// table.insert(1).unwrap();
    /// table.insert(5).unwrap();
    ///
    /// assert_eq!(table.find(&5), Some(1));
    /// assert_eq!(table.find(&1), Some(2));
    /// assert_eq!(table.find(&9), None);
    /// ```
    #[inline]
    pub fn find(&self, key: &V) -> Option<usize> {
        self.find_by(
            self.ops.hash(key),
            |v| self.ops.equals(key, v),
            |v| self.ops.greater(key, v),
        )
    }

    /// Probe search driven by a precomputed hash and two predicates over the
    /// stored values: `is_match` identifies the key and `outranks` returns
    /// `true` for stored values the key is greater than.
    pub(crate) fn find_by(
        &self,
        hash: u64,
        is_match: impl Fn(&V) -> bool,
        outranks: impl Fn(&V) -> bool,
    ) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }

        let home = self.home_of_hash(hash);
        for i in 0..self.slots.len() {
            let loc = self.probe_from(home, i);
            let Slot::Occupied { value, .. } = &self.slots[loc] else {
                return None;
            };

            if outranks(value) {
                return None;
            }

            if is_match(value) {
                return Some(loc);
            }
        }

        None
    }

    /// Returns `true` if the table contains a value equal to `key`.
    #[inline]
    pub fn contains(&self, key: &V) -> bool {
        self.find(key).is_some()
    }

    /// Returns a reference to the stored value equal to `key`.
    #[inline]
    pub fn get(&self, key: &V) -> Option<&V> {
        self.find(key).and_then(|loc| self.get_at(loc))
    }

    #[inline]
    pub(crate) fn get_at(&self, loc: usize) -> Option<&V> {
        self.slots.get(loc).and_then(Slot::element)
    }

    /// Mutable access to a stored value. Callers must not change anything
    /// that affects hashing or ordering.
    #[inline]
    pub(crate) fn get_at_mut(&mut self, loc: usize) -> Option<&mut V> {
        match self.slots.get_mut(loc) {
            Some(Slot::Occupied { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Returns the first slot after `loc` whose element would sit closer to
    /// its home slot if it were moved to `loc`.
    ///
    /// The scan ends at the first empty slot.
    fn successor_candidate(&self, loc: usize) -> Option<usize> {
        let capacity = self.slots.len();
        for step in 1..capacity {
            let oloc = (loc + step) % capacity;
            let Slot::Occupied { value, rank } = &self.slots[oloc] else {
                return None;
            };

            debug_assert_eq!(*rank, self.rank_at(value, oloc));
            if self.rank_at(value, loc) < *rank {
                return Some(oloc);
            }
        }

        None
    }

    /// Removes the value equal to `key` and returns it.
    ///
    /// Elements later in the probe chain are shifted back to close the gap,
    /// so no tombstone is left behind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] if no equal value is stored. The table
    /// is left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hi_hash::Error;
    /// use hi_hash::HashTable;
    ///
    /// let mut table = HashTable::new(
    ///     |v: &u32| (*v % 8) as u64,
    ///     |a: &u32, b: &u32| a == b,
    ///     |a: &u32, b: &u32| a > b,
    ///     8,
    /// );
    /// table.insert(3).unwrap();
    /// table.insert(11).unwrap();
    ///
    /// assert_eq!(table.remove(&11), Ok(11));
    /// assert_eq!(table.find(&3), Some(3));
    /// assert_eq!(table.remove(&11), Err(Error::EntryNotFound));
    /// ```
    pub fn remove(&mut self, key: &V) -> Result<V, Error> {
        self.find(key)
            .and_then(|loc| self.remove_at(loc))
            .ok_or(Error::EntryNotFound)
    }

    /// Empties slot `loc` and backward-shifts its successors.
    pub(crate) fn remove_at(&mut self, mut loc: usize) -> Option<V> {
        let (removed, _) = self.slots.get_mut(loc)?.take()?;

        while let Some(next) = self.successor_candidate(loc) {
            if let Some((value, old_rank)) = self.slots[next].take() {
                let rank = self.rank_at(&value, loc);
                trace!("shifting slot {next} back to {loc}: rank {old_rank} -> {rank}");
                self.slots[loc] = Slot::Occupied { value, rank };
            }
            loc = next;
        }

        self.populated -= 1;
        Some(removed)
    }

    /// Computes a histogram of element displacements.
    ///
    /// Test-only unless the `stats` feature is enabled.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let max_rank = self.slots.iter().filter_map(Slot::rank).max();
        let mut bins = alloc::vec![0usize; max_rank.map_or(0, |r| r + 1)];
        for rank in self.slots.iter().filter_map(Slot::rank) {
            bins[rank] += 1;
        }
        ProbeHistogram { bins }
    }

    /// Returns utilization statistics for debugging.
    ///
    /// Test-only unless the `stats` feature is enabled.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.slots.len();
        let ranks = || self.slots.iter().filter_map(Slot::rank);

        let mut longest_run = 0;
        let mut run = 0;
        // Walk twice around so a run that wraps past the end is counted whole.
        for index in 0..capacity * 2 {
            if self.slots[index % capacity].is_occupied() {
                run += 1;
                longest_run = core::cmp::max(longest_run, core::cmp::min(run, capacity));
            } else {
                run = 0;
            }
        }

        DebugStats {
            populated: self.populated,
            capacity,
            load_factor: self.populated as f64 / capacity as f64,
            max_rank: ranks().max().unwrap_or(0),
            mean_rank: if self.populated == 0 {
                0.0
            } else {
                ranks().sum::<usize>() as f64 / self.populated as f64
            },
            longest_run,
            total_bytes: capacity * mem::size_of::<Slot<V>>(),
        }
    }
}

/// An iterator over the values of a [`HashTable`], in slot order.
///
/// This struct is created by [`HashTable::iter`].
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let value = self.slots.find_map(Slot::element)?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V, O> IntoIterator for &'a HashTable<V, O> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A draining iterator over the values of a [`HashTable`].
///
/// This struct is created by [`HashTable::drain`].
pub struct Drain<'a, V> {
    slots: core::slice::IterMut<'a, Slot<V>>,
    populated: &'a mut usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if *self.populated == 0 {
            return None;
        }

        let (value, _) = self.slots.find_map(Slot::take)?;
        *self.populated -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (*self.populated, Some(*self.populated))
    }
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}
