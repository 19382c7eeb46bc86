#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bucket;
mod chained;
mod open;
mod primes;

/// Construction settings and the table builder.
pub mod config;

/// Error types for table construction and operations.
pub mod error;

/// The `HashTable` facade over the two bucket tables.
///
/// This module provides a `HashTable` that owns either a separate-chaining or
/// a double-hashing bucket table and forwards every operation to it.
pub mod hash_table;

/// Hashing and key-equality strategies.
pub mod strategy;

pub use config::CollisionStrategy;
pub use config::HashTableBuilder;
pub use config::TableConfig;
pub use error::Error;
pub use error::InvalidConfiguration;
pub use error::Result;
pub use hash_table::HashTable;
pub use hash_table::Iter;
#[cfg(feature = "stats")]
pub use hash_table::TableStats;
pub use open::DEFAULT_LOAD_FACTOR;
pub use open::ProbeSequence;
pub use primes::DEFAULT_CAPACITY;
pub use primes::MAX_CAPACITY;
#[cfg(any(feature = "foldhash", feature = "std"))]
pub use strategy::DefaultHashBuilder;
pub use strategy::DefaultKeyEquality;
pub use strategy::KeyEquality;
pub use strategy::KeyHasher;
