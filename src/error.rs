//! Error types returned by every fallible table operation.

use thiserror::Error;

/// Errors reported by [`HashTable`](crate::HashTable) and the bucket tables
/// behind it.
///
/// Every variant is raised at the call site that detected it and none are
/// retried internally. A failing operation leaves the table unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The key argument was absent (`None`).
    #[error("key cannot be null")]
    NullKey,

    /// `add` was called with a key that is already present.
    #[error("cannot place duplicate key in hashtable")]
    DuplicateKey,

    /// `get` or `remove` was called with a key that is not present.
    #[error("key does not exist")]
    KeyNotFound,

    /// The table could not be constructed from the supplied settings.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] InvalidConfiguration),

    /// Growth was required but no larger prime capacity is available.
    #[error("hashtable cannot grow any larger than {capacity} slots")]
    CapacityExhausted {
        /// Capacity of the table when growth was refused
        capacity: usize,
    },
}

/// The specific reason a table configuration was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidConfiguration {
    /// Initial size outside `0 < size <= MAX_CAPACITY`.
    #[error("initial size must be within range 0 < size <= {max}, got {requested}", max = crate::primes::MAX_CAPACITY)]
    CapacityOutOfRange {
        /// The rejected size
        requested: usize,
    },

    /// Load factor outside `(0, 1]` or not finite.
    #[error("load factor must be within range 0 < load_factor <= 1")]
    LoadFactorOutOfRange,

    /// No hashing strategy was supplied.
    #[error("key hash implementation cannot be null")]
    MissingHasher,

    /// No key equality strategy was supplied.
    #[error("key comparer implementation cannot be null")]
    MissingEquality,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
