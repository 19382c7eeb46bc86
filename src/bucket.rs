//! Slot types for the two bucket tables.

use alloc::vec::Vec;

use crate::error::Error;
use crate::error::Result;
use crate::strategy::KeyEquality;

/// Builds a fresh slot array of `len` empty slots. `make` receives the slot
/// index.
pub(crate) fn fresh_slots<B>(len: usize, make: impl FnMut(usize) -> B) -> Vec<B> {
    (0..len).map(make).collect()
}

/// A separate-chaining slot: every entry whose key maps to this index, in
/// insertion order. Keys within a bucket are unique.
#[derive(Debug, Clone)]
pub(crate) struct ChainedBucket<K, V> {
    /// The slot index this bucket was created for.
    pub(crate) hash_code: i32,
    pub(crate) entries: Vec<(K, V)>,
}

impl<K, V> ChainedBucket<K, V> {
    pub(crate) fn empty(index: usize) -> Self {
        Self {
            hash_code: index as i32,
            entries: Vec::new(),
        }
    }

    fn position(&self, eq: &impl KeyEquality<K>, key: &K) -> Option<usize> {
        self.entries.iter().position(|(k, _)| eq.equal(k, key))
    }

    pub(crate) fn contains_key(&self, eq: &impl KeyEquality<K>, key: &K) -> bool {
        self.position(eq, key).is_some()
    }

    pub(crate) fn get(&self, eq: &impl KeyEquality<K>, key: &K) -> Option<&V> {
        self.position(eq, key).map(|idx| &self.entries[idx].1)
    }

    pub(crate) fn get_mut(&mut self, eq: &impl KeyEquality<K>, key: &K) -> Option<&mut V> {
        self.position(eq, key).map(|idx| &mut self.entries[idx].1)
    }

    pub(crate) fn add(&mut self, eq: &impl KeyEquality<K>, key: K, value: V) -> Result<()> {
        if self.contains_key(eq, &key) {
            return Err(Error::DuplicateKey);
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Removes the matching entry, keeping the remaining entries in insertion
    /// order.
    pub(crate) fn remove(&mut self, eq: &impl KeyEquality<K>, key: &K) -> Result<V> {
        let idx = self.position(eq, key).ok_or(Error::KeyNotFound)?;
        Ok(self.entries.remove(idx).1)
    }
}

/// An open-addressing slot holding at most one entry.
///
/// `probed` records that some probe sequence stepped past this slot while it
/// was occupied. It survives removal, which turns a vacated probed slot into
/// a tombstone: lookups continue through it instead of stopping. Only a
/// vacant, unprobed slot ends a probe sequence.
#[derive(Debug, Clone)]
pub(crate) struct OpenBucket<K, V> {
    pub(crate) entry: Option<(K, V)>,
    pub(crate) hash_code: i32,
    pub(crate) probed: bool,
}

impl<K, V> OpenBucket<K, V> {
    pub(crate) fn empty(_index: usize) -> Self {
        Self {
            entry: None,
            hash_code: 0,
            probed: false,
        }
    }

    #[inline]
    pub(crate) fn is_vacant(&self) -> bool {
        self.entry.is_none()
    }

    /// Vacant and never probed through.
    #[inline]
    pub(crate) fn ends_probe(&self) -> bool {
        self.entry.is_none() && !self.probed
    }

    #[inline]
    pub(crate) fn is_tombstone(&self) -> bool {
        self.entry.is_none() && self.probed
    }

    /// Whether this slot holds `key`. The stored hash is compared first so
    /// the equality strategy only runs on likely matches.
    #[inline]
    pub(crate) fn holds(&self, eq: &impl KeyEquality<K>, hash: i32, key: &K) -> bool {
        match &self.entry {
            Some((k, _)) => self.hash_code == hash && eq.equal(k, key),
            None => false,
        }
    }

    pub(crate) fn fill(&mut self, hash: i32, key: K, value: V) {
        debug_assert!(self.is_vacant());
        self.entry = Some((key, value));
        self.hash_code = hash;
    }

    /// Empties the slot in place, leaving `probed` untouched.
    pub(crate) fn vacate(&mut self) -> Option<(K, V)> {
        self.entry.take()
    }
}
