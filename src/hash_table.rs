use core::fmt::Debug;
#[cfg(any(feature = "foldhash", feature = "std"))]
use core::hash::Hash;
use core::ops::Index;

use crate::chained::ChainedIter;
use crate::chained::ChainedTable;
use crate::config::CollisionStrategy;
use crate::config::TableConfig;
use crate::error::Error;
use crate::error::Result;
use crate::open::OpenIter;
use crate::open::OpenTable;
#[cfg(any(feature = "foldhash", feature = "std"))]
use crate::strategy::DefaultHashBuilder;
use crate::strategy::DefaultKeyEquality;
use crate::strategy::KeyEquality;
use crate::strategy::KeyHasher;

/// Statistics describing the internal state of a table.
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    /// Collision strategy of the table
    pub strategy: CollisionStrategy,
    /// Number of live entries
    pub len: usize,
    /// Number of slots (buckets for chaining)
    pub capacity: usize,
    /// Occupied slots an insertion stepped past since the last growth or
    /// clear (always 0 for chaining)
    pub collisions: usize,
    /// Vacated slots still marked as probed (always 0 for chaining)
    pub tombstones: usize,
    /// Longest chain, or most slots visited to reach any live entry
    pub longest_run: usize,
    /// Occupancy (len / capacity)
    pub load_factor: f64,
}

#[cfg(any(test, feature = "stats"))]
impl TableStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Statistics ({:?}) ===", self.strategy);
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.len,
            self.capacity,
            self.load_factor * 100.0
        );
        println!("Collisions: {}", self.collisions);
        println!("Tombstones: {}", self.tombstones);
        println!("Longest run: {}", self.longest_run);
    }
}

#[derive(Clone)]
enum Storage<K, V, H, E> {
    Chained(ChainedTable<K, V, H, E>),
    Open(OpenTable<K, V, H, E>),
}

/// An associative container with pluggable hashing and key equality.
///
/// `HashTable<K, V, H, E>` hands every storage decision to the bucket table
/// selected by its [`CollisionStrategy`]:
///
/// - [`CollisionStrategy::SeparateChaining`]: a fixed number of buckets,
///   each holding all entries that map to it. The table never resizes.
/// - [`CollisionStrategy::DoubleHashing`]: one entry per slot over a prime
///   number of slots, growing to the next prime once `len >= capacity *
///   load_factor`.
///
/// Keys are hashed with `H` and compared with `E`. Keys that `E` considers
/// equal must hash equally under `H`.
///
/// Key arguments accept `Option`, with `None` standing in for an absent key.
/// Every operation rejects it with [`Error::NullKey`].
///
/// The table performs no internal synchronization. Concurrent access needs
/// external locking around each operation.
///
/// ## Example
///
/// ```rust
/// use prime_hash::CollisionStrategy;
/// use prime_hash::Error;
/// use prime_hash::HashTable;
///
/// let mut table = HashTable::with_capacity(CollisionStrategy::DoubleHashing, 3)?;
/// table.add("one", 1)?;
/// table.add("two", 2)?;
///
/// assert_eq!(table.get(&"one")?, &1);
/// assert_eq!(table.add("one", 11), Err(Error::DuplicateKey));
/// assert_eq!(table.get(None), Err(Error::NullKey));
///
/// table.remove(&"one")?;
/// assert_eq!(table.get(&"one"), Err(Error::KeyNotFound));
/// # Ok::<(), Error>(())
/// ```
#[derive(Clone)]
pub struct HashTable<K, V, H, E = DefaultKeyEquality> {
    storage: Storage<K, V, H, E>,
}

impl<K, V, H, E> Debug for HashTable<K, V, H, E>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> HashTable<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Creates an open-addressing table with the default size (4049), load
    /// factor (0.72) and strategies.
    pub fn new() -> Self {
        Self::from_validated(
            TableConfig::default(),
            DefaultHashBuilder::default(),
            DefaultKeyEquality,
        )
    }

    /// Creates a table of the given strategy and initial size with the
    /// default hashing and equality strategies.
    ///
    /// Fails with [`Error::InvalidConfiguration`] unless
    /// `0 < capacity <= MAX_CAPACITY`.
    pub fn with_capacity(strategy: CollisionStrategy, capacity: usize) -> Result<Self> {
        Self::with_config(TableConfig::new(strategy).with_capacity(capacity))
    }

    /// Creates a table from `config` with the default hashing and equality
    /// strategies.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_strategies(config, DefaultHashBuilder::default(), DefaultKeyEquality)
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> Default for HashTable<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H, E> HashTable<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEquality<K>,
{
    /// Creates a table from `config` using the given strategies.
    ///
    /// ```rust
    /// use prime_hash::CollisionStrategy;
    /// use prime_hash::HashTable;
    /// use prime_hash::KeyHasher;
    /// use prime_hash::TableConfig;
    ///
    /// struct LenHasher;
    ///
    /// impl KeyHasher<String> for LenHasher {
    ///     fn hash(&self, key: &String) -> i32 {
    ///         key.len() as i32
    ///     }
    /// }
    ///
    /// let config = TableConfig::new(CollisionStrategy::SeparateChaining).with_capacity(8);
    /// let eq = |a: &String, b: &String| a.eq_ignore_ascii_case(b);
    /// let mut table = HashTable::with_config_and_strategies(config, LenHasher, eq)?;
    ///
    /// table.add("Key".to_string(), 1)?;
    /// assert!(table.contains_key(&"KEY".to_string())?);
    /// # Ok::<(), prime_hash::Error>(())
    /// ```
    pub fn with_config_and_strategies(config: TableConfig, hasher: H, equality: E) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config, hasher, equality))
    }

    pub(crate) fn from_validated(config: TableConfig, hasher: H, equality: E) -> Self {
        let storage = match config.strategy {
            CollisionStrategy::SeparateChaining => {
                Storage::Chained(ChainedTable::new(config.slot_count(), hasher, equality))
            }
            CollisionStrategy::DoubleHashing => Storage::Open(OpenTable::new(
                config.slot_count(),
                config.load_factor,
                hasher,
                equality,
            )),
        };

        Self { storage }
    }

    /// Inserts `value` under `key`.
    ///
    /// Fails with [`Error::NullKey`] for `None`, [`Error::DuplicateKey`] if
    /// the key is already present, and [`Error::CapacityExhausted`] if the
    /// table must grow past the largest prime capacity. The table is
    /// unchanged on failure.
    pub fn add(&mut self, key: impl Into<Option<K>>, value: V) -> Result<()> {
        let key = key.into().ok_or(Error::NullKey)?;
        match &mut self.storage {
            Storage::Chained(table) => table.add(key, value),
            Storage::Open(table) => table.add(key, value),
        }
    }

    /// Returns the value stored under `key`.
    ///
    /// Fails with [`Error::NullKey`] for `None` and [`Error::KeyNotFound`] if
    /// the key is absent.
    pub fn get<'k>(&self, key: impl Into<Option<&'k K>>) -> Result<&V>
    where
        K: 'k,
    {
        let key = key.into().ok_or(Error::NullKey)?;
        let found = match &self.storage {
            Storage::Chained(table) => table.get(key),
            Storage::Open(table) => table.get(key),
        };
        found.ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut<'k>(&mut self, key: impl Into<Option<&'k K>>) -> Result<&mut V>
    where
        K: 'k,
    {
        let key = key.into().ok_or(Error::NullKey)?;
        let found = match &mut self.storage {
            Storage::Chained(table) => table.get_mut(key),
            Storage::Open(table) => table.get_mut(key),
        };
        found.ok_or(Error::KeyNotFound)
    }

    /// Whether `key` is present. Fails only with [`Error::NullKey`].
    pub fn contains_key<'k>(&self, key: impl Into<Option<&'k K>>) -> Result<bool>
    where
        K: 'k,
    {
        let key = key.into().ok_or(Error::NullKey)?;
        Ok(match &self.storage {
            Storage::Chained(table) => table.contains_key(key),
            Storage::Open(table) => table.contains_key(key),
        })
    }

    /// Removes `key` and returns its value.
    ///
    /// Fails with [`Error::NullKey`] for `None` and [`Error::KeyNotFound`] if
    /// the key is absent.
    pub fn remove<'k>(&mut self, key: impl Into<Option<&'k K>>) -> Result<V>
    where
        K: 'k,
    {
        let key = key.into().ok_or(Error::NullKey)?;
        match &mut self.storage {
            Storage::Chained(table) => table.remove(key),
            Storage::Open(table) => table.remove(key),
        }
    }
}

impl<K, V, H, E> HashTable<K, V, H, E> {
    /// Removes every entry. The capacity is unchanged.
    pub fn clear(&mut self) {
        match &mut self.storage {
            Storage::Chained(table) => table.clear(),
            Storage::Open(table) => table.clear(),
        }
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Chained(table) => table.len(),
            Storage::Open(table) => table.len(),
        }
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of buckets (chaining) or slots (open addressing).
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Chained(table) => table.capacity(),
            Storage::Open(table) => table.capacity(),
        }
    }

    /// The collision strategy this table was built with.
    pub fn strategy(&self) -> CollisionStrategy {
        match &self.storage {
            Storage::Chained(_) => CollisionStrategy::SeparateChaining,
            Storage::Open(_) => CollisionStrategy::DoubleHashing,
        }
    }

    /// Growth threshold, or `None` for chaining tables, which never grow.
    pub fn load_factor(&self) -> Option<f32> {
        match &self.storage {
            Storage::Chained(_) => None,
            Storage::Open(table) => Some(table.load_factor()),
        }
    }

    /// Occupied slots that insertions have stepped past since the last
    /// growth or clear. Always 0 for chaining tables.
    pub fn collisions(&self) -> usize {
        match &self.storage {
            Storage::Chained(_) => 0,
            Storage::Open(table) => table.collisions(),
        }
    }

    /// Iterates over all entries in unspecified order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let inner = match &self.storage {
            Storage::Chained(table) => IterInner::Chained(table.iter()),
            Storage::Open(table) => IterInner::Open(table.iter()),
        };
        Iter { inner }
    }

    /// Returns statistics about the table's internal state.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> TableStats {
        let (tombstones, longest_run) = match &self.storage {
            Storage::Chained(table) => (0, table.longest_chain()),
            Storage::Open(table) => (table.tombstones(), table.longest_probe()),
        };

        TableStats {
            strategy: self.strategy(),
            len: self.len(),
            capacity: self.capacity(),
            collisions: self.collisions(),
            tombstones,
            longest_run,
            load_factor: self.len() as f64 / self.capacity() as f64,
        }
    }
}

/// Reads the value under `key`, panicking if it is absent.
///
/// Use [`HashTable::get`] for a fallible lookup and [`HashTable::add`] to
/// insert.
impl<K, V, H, E> Index<&K> for HashTable<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEquality<K>,
{
    type Output = V;

    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, K, V, H, E> IntoIterator for &'a HashTable<K, V, H, E> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

enum IterInner<'a, K, V> {
    Chained(ChainedIter<'a, K, V>),
    Open(OpenIter<'a, K, V>),
}

/// Iterator over the entries of a [`HashTable`], created by
/// [`HashTable::iter`].
pub struct Iter<'a, K, V> {
    inner: IterInner<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Chained(iter) => iter.next(),
            IterInner::Open(iter) => iter.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::error::InvalidConfiguration;
    use crate::primes::MAX_CAPACITY;

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
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    const STRATEGIES: [CollisionStrategy; 2] = [
        CollisionStrategy::SeparateChaining,
        CollisionStrategy::DoubleHashing,
    ];

    fn sip_table<K, V>(
        strategy: CollisionStrategy,
        capacity: usize,
    ) -> HashTable<K, V, SipHashBuilder>
    where
        K: core::hash::Hash + Eq,
    {
        let config = TableConfig::new(strategy).with_capacity(capacity);
        HashTable::with_config_and_strategies(config, SipHashBuilder::default(), DefaultKeyEquality)
            .unwrap()
    }

    #[test]
    fn add_then_get_round_trips() {
        for strategy in STRATEGIES {
            for capacity in [1, 4049] {
                let mut table = sip_table(strategy, capacity);
                for k in 0..200u64 {
                    table.add(k, k.to_string()).unwrap();
                }
                assert_eq!(table.len(), 200);
                for k in 0..200u64 {
                    assert_eq!(table.get(&k), Ok(&k.to_string()), "{strategy:?} {capacity}");
                }
            }
        }
    }

    #[test]
    fn null_keys_are_rejected() {
        for strategy in STRATEGIES {
            let mut table: HashTable<u64, u64, _> = sip_table(strategy, 7);
            assert_eq!(table.add(None, 1), Err(Error::NullKey));
            assert_eq!(table.get(None), Err(Error::NullKey));
            assert_eq!(table.get_mut(None), Err(Error::NullKey));
            assert_eq!(table.remove(None), Err(Error::NullKey));
            assert_eq!(table.contains_key(None), Err(Error::NullKey));
            assert!(table.is_empty());
        }
    }

    #[test]
    fn duplicate_add_keeps_first_value() {
        for strategy in STRATEGIES {
            let mut table = sip_table(strategy, 3);
            table.add("k", 1).unwrap();
            assert_eq!(table.add("k", 2), Err(Error::DuplicateKey));
            assert_eq!(table.get(&"k"), Ok(&1));
            assert_eq!(table.len(), 1);
        }
    }

    #[test]
    fn remove_then_miss() {
        for strategy in STRATEGIES {
            let mut table = sip_table(strategy, 1);
            table.add(1u32, "one").unwrap();
            table.add(50u32, "fifty").unwrap();
            assert_eq!(table.remove(&50), Ok("fifty"));
            assert_eq!(table.get(&50), Err(Error::KeyNotFound));
            assert_eq!(table.contains_key(&50), Ok(false));
            assert_eq!(table.remove(&50), Err(Error::KeyNotFound));
            assert_eq!(table.get(&1), Ok(&"one"));
        }
    }

    #[test]
    fn missing_key_in_fresh_table() {
        for strategy in STRATEGIES {
            let mut table: HashTable<u64, u64, _> = sip_table(strategy, 4049);
            assert_eq!(table.get(&1), Err(Error::KeyNotFound));
            assert_eq!(table.remove(&1), Err(Error::KeyNotFound));
            assert_eq!(table.contains_key(&1), Ok(false));
        }
    }

    #[test]
    fn clear_resets_entries() {
        for strategy in STRATEGIES {
            let mut table = sip_table(strategy, 1);
            for k in 0..10u64 {
                table.add(k, k).unwrap();
            }
            let capacity = table.capacity();
            table.clear();
            assert_eq!(table.len(), 0);
            assert_eq!(table.capacity(), capacity);
            for k in 0..10u64 {
                assert_eq!(table.get(&k), Err(Error::KeyNotFound));
            }
        }
    }

    #[test]
    fn open_addressing_grows_through_primes() {
        let mut table = sip_table(CollisionStrategy::DoubleHashing, 3);
        assert_eq!(table.capacity(), 3);
        assert_eq!(table.load_factor(), Some(0.72));
        for k in 0..3u64 {
            table.add(k, k).unwrap();
        }
        assert_eq!(table.capacity(), 3);
        table.add(3, 3).unwrap();
        assert_eq!(table.capacity(), 7);
        for k in 0..4u64 {
            assert_eq!(table.get(&k), Ok(&k));
        }
    }

    #[test]
    fn chaining_never_grows() {
        let mut table = sip_table(CollisionStrategy::SeparateChaining, 3);
        for k in 0..100u64 {
            table.add(k, k).unwrap();
        }
        assert_eq!(table.capacity(), 3);
        assert_eq!(table.load_factor(), None);
        assert_eq!(table.collisions(), 0);
        assert!(table.debug_stats().longest_run >= 34);
    }

    #[test]
    fn size_bounds_are_enforced() {
        for strategy in STRATEGIES {
            for size in [0, MAX_CAPACITY + 1] {
                let config = TableConfig::new(strategy).with_capacity(size);
                let result = HashTable::<u64, u64, _>::with_config_and_strategies(
                    config,
                    SipHashBuilder::default(),
                    DefaultKeyEquality,
                );
                assert_eq!(
                    result.err(),
                    Some(Error::InvalidConfiguration(
                        InvalidConfiguration::CapacityOutOfRange { requested: size }
                    ))
                );
            }
        }
    }

    #[test]
    fn get_mut_and_index() {
        for strategy in STRATEGIES {
            let mut table = sip_table(strategy, 11);
            table.add("a".to_string(), 1).unwrap();
            *table.get_mut(&"a".to_string()).unwrap() += 1;
            assert_eq!(table[&"a".to_string()], 2);
            assert_eq!(table.get_mut(&"b".to_string()), Err(Error::KeyNotFound));
        }
    }

    #[test]
    #[should_panic(expected = "key does not exist")]
    fn index_panics_on_missing_key() {
        let table: HashTable<u64, u64, _> = sip_table(CollisionStrategy::DoubleHashing, 3);
        let _ = table[&7];
    }

    #[test]
    fn iter_and_debug() {
        for strategy in STRATEGIES {
            let mut table = sip_table(strategy, 5);
            for k in 0..20u64 {
                table.add(k, k * 2).unwrap();
            }
            let mut pairs: Vec<(u64, u64)> = table.iter().map(|(k, v)| (*k, *v)).collect();
            pairs.sort_unstable();
            assert_eq!(pairs, (0..20u64).map(|k| (k, k * 2)).collect::<Vec<_>>());
            assert_eq!((&table).into_iter().count(), 20);

            let mut single = sip_table(strategy, 5);
            single.add(1u8, 'x').unwrap();
            assert_eq!(format!("{single:?}"), "{1: 'x'}");
        }
    }

    #[test]
    fn clone_is_independent() {
        for strategy in STRATEGIES {
            let mut table = sip_table(strategy, 7);
            table.add(1u64, String::from("one")).unwrap();
            let mut copy = table.clone();
            copy.add(2, String::from("two")).unwrap();
            copy.remove(&1).unwrap();
            assert_eq!(table.get(&1), Ok(&String::from("one")));
            assert_eq!(table.get(&2), Err(Error::KeyNotFound));
            assert_eq!(copy.len(), 1);
        }
    }

    #[test]
    fn custom_equality_strategy() {
        struct FirstCharHasher;

        impl KeyHasher<String> for FirstCharHasher {
            fn hash(&self, key: &String) -> i32 {
                key.bytes()
                    .next()
                    .map(|b| b.to_ascii_lowercase() as i32)
                    .unwrap_or(0)
            }
        }

        let eq = |a: &String, b: &String| a.eq_ignore_ascii_case(b);
        for strategy in STRATEGIES {
            let config = TableConfig::new(strategy).with_capacity(3);
            let mut table =
                HashTable::with_config_and_strategies(config, FirstCharHasher, eq).unwrap();
            table.add("Alpha".to_string(), 1).unwrap();
            assert_eq!(
                table.add("ALPHA".to_string(), 2),
                Err(Error::DuplicateKey)
            );
            assert_eq!(table.get(&"alpha".to_string()), Ok(&1));
        }
    }

    #[test]
    fn debug_stats_for_open_addressing() {
        let mut table = sip_table(CollisionStrategy::DoubleHashing, 7);
        for k in 0..5u64 {
            table.add(k, ()).unwrap();
        }
        table.remove(&0).unwrap();
        let stats = table.debug_stats();
        assert_eq!(stats.strategy, CollisionStrategy::DoubleHashing);
        assert_eq!(stats.len, 4);
        assert_eq!(stats.capacity, 7);
        assert_eq!(stats.collisions, table.collisions());
        assert!(stats.longest_run >= 1);
        assert!((stats.load_factor - 4.0 / 7.0).abs() < 1e-9);
    }

    #[cfg(any(feature = "foldhash", feature = "std"))]
    #[test]
    fn default_strategies() {
        let mut table: HashTable<&str, i32, _> = HashTable::new();
        assert_eq!(table.capacity(), 4049);
        assert_eq!(table.strategy(), CollisionStrategy::DoubleHashing);
        table.add("x", 1).unwrap();
        assert_eq!(table[&"x"], 1);

        let chained: HashTable<u8, u8, _> =
            HashTable::with_capacity(CollisionStrategy::SeparateChaining, 1).unwrap();
        assert_eq!(chained.capacity(), 1);

        let zero = HashTable::<u8, u8, _>::with_capacity(CollisionStrategy::SeparateChaining, 0);
        assert!(zero.is_err());
        let defaulted: HashTable<u8, u8, _> = HashTable::default();
        assert!(defaulted.is_empty());
    }
}
