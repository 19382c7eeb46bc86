//! Table construction settings.

use core::marker::PhantomData;

use crate::error::InvalidConfiguration;
use crate::error::Result;
use crate::hash_table::HashTable;
use crate::open::DEFAULT_LOAD_FACTOR;
use crate::primes;
use crate::primes::DEFAULT_CAPACITY;
use crate::primes::MAX_CAPACITY;
use crate::strategy::KeyEquality;
use crate::strategy::KeyHasher;

/// How a table resolves keys that map to the same slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionStrategy {
    /// A fixed array of buckets, each holding every entry that maps to it.
    /// Never resizes.
    SeparateChaining,
    /// One entry per slot, with collisions resolved by a double-hashing
    /// probe sequence. Grows through a table of primes once the load factor
    /// is reached.
    #[default]
    DoubleHashing,
}

/// Settings a [`HashTable`] is constructed from.
///
/// ```rust
/// use prime_hash::CollisionStrategy;
/// use prime_hash::TableConfig;
///
/// let config = TableConfig::new(CollisionStrategy::DoubleHashing)
///     .with_capacity(3)
///     .with_load_factor(0.5);
/// assert!(config.validate().is_ok());
/// assert!(config.with_capacity(0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Collision resolution scheme.
    pub strategy: CollisionStrategy,
    /// Requested initial size, `0 < capacity <= MAX_CAPACITY`.
    pub capacity: usize,
    /// Occupancy ratio that triggers growth. Only consulted by
    /// [`CollisionStrategy::DoubleHashing`].
    pub load_factor: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(CollisionStrategy::default())
    }
}

impl TableConfig {
    /// Default size and load factor for `strategy`.
    pub const fn new(strategy: CollisionStrategy) -> Self {
        Self {
            strategy,
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Sets the requested initial size.
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the growth threshold.
    pub const fn with_load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Checks the size and load factor ranges.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(InvalidConfiguration::CapacityOutOfRange {
                requested: self.capacity,
            }
            .into());
        }

        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(InvalidConfiguration::LoadFactorOutOfRange.into());
        }

        Ok(())
    }

    /// Number of slots the table starts with. Chaining uses the requested
    /// size as-is; open addressing needs a prime of at least 3, so the size
    /// is rounded up through the prime table.
    pub(crate) fn slot_count(&self) -> usize {
        match self.strategy {
            CollisionStrategy::SeparateChaining => self.capacity,
            CollisionStrategy::DoubleHashing => {
                primes::smallest_prime_at_least(self.capacity).unwrap_or(MAX_CAPACITY)
            }
        }
    }
}

/// Assembles a [`HashTable`] from a configuration and explicitly supplied
/// strategies.
///
/// `build` fails if either strategy was never supplied.
///
/// ```rust
/// use prime_hash::CollisionStrategy;
/// use prime_hash::DefaultKeyEquality;
/// use prime_hash::HashTable;
/// use prime_hash::HashTableBuilder;
/// use prime_hash::KeyHasher;
///
/// struct ModHasher;
///
/// impl KeyHasher<u32> for ModHasher {
///     fn hash(&self, key: &u32) -> i32 {
///         (*key % 16) as i32
///     }
/// }
///
/// let mut table: HashTable<u32, &str, ModHasher> = HashTableBuilder::new()
///     .strategy(CollisionStrategy::SeparateChaining)
///     .capacity(4)
///     .hasher(ModHasher)
///     .equality(DefaultKeyEquality)
///     .build()?;
///
/// table.add(17, "seventeen")?;
/// assert_eq!(table.get(&17)?, &"seventeen");
/// # Ok::<(), prime_hash::Error>(())
/// ```
pub struct HashTableBuilder<K, V, H, E> {
    config: TableConfig,
    hasher: Option<H>,
    equality: Option<E>,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V, H, E> Default for HashTableBuilder<K, V, H, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H, E> HashTableBuilder<K, V, H, E> {
    /// A builder with the default configuration and no strategies.
    pub fn new() -> Self {
        Self {
            config: TableConfig::default(),
            hasher: None,
            equality: None,
            _marker: PhantomData,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the collision strategy.
    pub fn strategy(mut self, strategy: CollisionStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Sets the requested initial size.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Sets the growth threshold.
    pub fn load_factor(mut self, load_factor: f32) -> Self {
        self.config.load_factor = load_factor;
        self
    }

    /// Sets the hashing strategy.
    pub fn hasher(mut self, hasher: H) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Sets the key equality strategy.
    pub fn equality(mut self, equality: E) -> Self {
        self.equality = Some(equality);
        self
    }

    /// Validates the configuration and builds an empty table.
    pub fn build(self) -> Result<HashTable<K, V, H, E>>
    where
        H: KeyHasher<K>,
        E: KeyEquality<K>,
    {
        self.config.validate()?;
        let hasher = self.hasher.ok_or(InvalidConfiguration::MissingHasher)?;
        let equality = self.equality.ok_or(InvalidConfiguration::MissingEquality)?;
        Ok(HashTable::from_validated(self.config, hasher, equality))
    }
}
