//! Fixed-capacity bucket table resolving collisions by separate chaining.
//!
//! Every key maps to exactly one bucket and each bucket keeps all entries
//! that land there, so the table never resizes. Heavy collision degrades the
//! affected bucket to a linear scan.

use alloc::vec::Vec;
use core::slice;

use crate::bucket::ChainedBucket;
use crate::bucket::fresh_slots;
use crate::error::Result;
use crate::strategy::KeyEquality;
use crate::strategy::KeyHasher;

#[derive(Clone)]
pub(crate) struct ChainedTable<K, V, H, E> {
    slots: Vec<ChainedBucket<K, V>>,
    count: usize,
    hasher: H,
    equality: E,
}

impl<K, V, H, E> ChainedTable<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEquality<K>,
{
    /// `capacity` must already be validated to lie in `1..=MAX_CAPACITY`.
    pub(crate) fn new(capacity: usize, hasher: H, equality: E) -> Self {
        debug_assert!(capacity > 0);
        Self {
            slots: fresh_slots(capacity, ChainedBucket::empty),
            count: 0,
            hasher,
            equality,
        }
    }

    #[inline]
    fn bucket_index(&self, key: &K) -> usize {
        let index = (self.hasher.hash(key) & 0x7FFF_FFFF) as usize % self.slots.len();
        debug_assert_eq!(self.slots[index].hash_code as usize, index);
        index
    }

    pub(crate) fn add(&mut self, key: K, value: V) -> Result<()> {
        let index = self.bucket_index(&key);
        self.slots[index].add(&self.equality, key, value)?;
        self.count += 1;
        Ok(())
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.slots[self.bucket_index(key)].get(&self.equality, key)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_index(key);
        self.slots[index].get_mut(&self.equality, key)
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.slots[self.bucket_index(key)].contains_key(&self.equality, key)
    }

    pub(crate) fn remove(&mut self, key: &K) -> Result<V> {
        let index = self.bucket_index(key);
        let value = self.slots[index].remove(&self.equality, key)?;
        self.count -= 1;
        Ok(value)
    }
}

impl<K, V, H, E> ChainedTable<K, V, H, E> {
    /// Reinitializes every bucket at the current capacity.
    pub(crate) fn clear(&mut self) {
        self.slots = fresh_slots(self.slots.len(), ChainedBucket::empty);
        self.count = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn iter(&self) -> ChainedIter<'_, K, V> {
        ChainedIter {
            slots: self.slots.iter(),
            current: Default::default(),
        }
    }

    /// Length of the longest chain.
    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn longest_chain(&self) -> usize {
        self.slots
            .iter()
            .map(|b| b.entries.len())
            .max()
            .unwrap_or(0)
    }
}

pub(crate) struct ChainedIter<'a, K, V> {
    slots: slice::Iter<'a, ChainedBucket<K, V>>,
    current: slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for ChainedIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((k, v)) = self.current.next() {
                return Some((k, v));
            }
            self.current = self.slots.next()?.entries.iter();
        }
    }
}
