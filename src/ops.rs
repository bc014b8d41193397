use core::cmp::Ordering;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

/// The three comparison primitives a [`HashTable`] is built on.
///
/// `hash` picks an element's home slot, `equals` identifies duplicates, and
/// `greater` decides which of two colliding elements keeps a contested slot.
///
/// # Consistency requirements
///
/// Placement and lookup both rely on `greater`: an insertion only passes over
/// slots holding elements that are not lesser than the one being placed, so a
/// lookup may stop as soon as it meets an element the key is greater than.
/// That early exit is only sound when:
///
/// - `greater` is a strict total order over distinct elements (irreflexive,
///   transitive, and exactly one of `greater(a, b)`, `greater(b, a)` holds
///   whenever `!equals(a, b)`),
/// - `equals(a, b)` implies `hash(a) == hash(b)`,
/// - the results never change for elements while they are stored.
///
/// An ordering that violates these rules does not cause undefined behavior,
/// but lookups and removals may report stored elements as missing.
///
/// [`HashTable`]: crate::HashTable
pub trait KeyOps<V> {
    /// Hashes an element. Only the residue modulo the table capacity matters.
    fn hash(&self, value: &V) -> u64;

    /// Returns `true` if both elements denote the same key.
    fn equals(&self, a: &V, b: &V) -> bool;

    /// Returns `true` if `a` outranks `b`.
    fn greater(&self, a: &V, b: &V) -> bool;
}

/// Adapts three closures into a [`KeyOps`] implementation.
///
/// This is what [`HashTable::new`](crate::HashTable::new) builds from its
/// arguments.
#[derive(Clone, Copy)]
pub struct FnOps<H, E, G> {
    hash: H,
    equals: E,
    greater: G,
}

impl<H, E, G> FnOps<H, E, G> {
    /// Bundles a hash function, an equality predicate and a greater-than
    /// predicate.
    pub fn new(hash: H, equals: E, greater: G) -> Self {
        Self {
            hash,
            equals,
            greater,
        }
    }
}

impl<H, E, G> Debug for FnOps<H, E, G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnOps").finish_non_exhaustive()
    }
}

impl<V, H, E, G> KeyOps<V> for FnOps<H, E, G>
where
    H: Fn(&V) -> u64,
    E: Fn(&V, &V) -> bool,
    G: Fn(&V, &V) -> bool,
{
    #[inline]
    fn hash(&self, value: &V) -> u64 {
        (self.hash)(value)
    }

    #[inline]
    fn equals(&self, a: &V, b: &V) -> bool {
        (self.equals)(a, b)
    }

    #[inline]
    fn greater(&self, a: &V, b: &V) -> bool {
        (self.greater)(a, b)
    }
}

/// [`KeyOps`] for elements that are `Hash + Ord`, hashing through a
/// [`BuildHasher`] and ordering with [`Ord`].
///
/// Used by [`HashSet`](crate::HashSet).
#[derive(Clone, Debug, Default)]
pub struct OrdOps<S> {
    hash_builder: S,
}

impl<S> OrdOps<S> {
    /// Creates the primitives from a hasher builder.
    pub fn new(hash_builder: S) -> Self {
        Self { hash_builder }
    }

    /// Returns a reference to the hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<T, S> KeyOps<T> for OrdOps<S>
where
    T: Hash + Ord,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, value: &T) -> u64 {
        self.hash_builder.hash_one(value)
    }

    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    #[inline]
    fn greater(&self, a: &T, b: &T) -> bool {
        a.cmp(b) == Ordering::Greater
    }
}

/// [`KeyOps`] for `(key, value)` pairs that only looks at the key.
///
/// Used by [`HashMap`](crate::HashMap).
#[derive(Clone, Debug, Default)]
pub struct KeyedOps<S> {
    inner: OrdOps<S>,
}

impl<S> KeyedOps<S> {
    /// Creates the primitives from a hasher builder.
    pub fn new(hash_builder: S) -> Self {
        Self {
            inner: OrdOps::new(hash_builder),
        }
    }

    /// Returns a reference to the hasher builder.
    pub fn hasher(&self) -> &S {
        self.inner.hasher()
    }

    /// Returns the key-level primitives.
    pub fn key_ops(&self) -> &OrdOps<S> {
        &self.inner
    }
}

impl<K, V, S> KeyOps<(K, V)> for KeyedOps<S>
where
    K: Hash + Ord,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, entry: &(K, V)) -> u64 {
        self.inner.hash_builder.hash_one(&entry.0)
    }

    #[inline]
    fn equals(&self, a: &(K, V), b: &(K, V)) -> bool {
        self.inner.equals(&a.0, &b.0)
    }

    #[inline]
    fn greater(&self, a: &(K, V), b: &(K, V)) -> bool {
        self.inner.greater(&a.0, &b.0)
    }
}
