//! Resizable bucket table using open addressing with double hashing.
//!
//! Each slot holds at most one entry. A key's probe sequence starts at
//! `h % len` and steps by `((h * 101) % (len - 1)) + 1`, where `h` is the
//! key's hash with the sign bit cleared. The slot array length is always a
//! prime from [`crate::primes`], so every step size is coprime with it and a
//! sequence reaches every slot exactly once before it would repeat.
//!
//! Removal cannot simply empty a slot: another key's probe sequence may have
//! passed through it on the way to that key's home. Slots therefore carry a
//! `probed` flag, set the first time an insertion steps past them while they
//! are occupied. A vacated slot keeps the flag, and lookups only stop at
//! slots that are both vacant and unprobed. Growth rebuilds the array from
//! live entries alone, which discards all tombstones.

use alloc::vec::Vec;
use core::iter::FusedIterator;

use log::debug;
use log::trace;
use log::warn;

use crate::bucket::OpenBucket;
use crate::bucket::fresh_slots;
use crate::error::Error;
use crate::error::Result;
use crate::primes;
use crate::strategy::KeyEquality;
use crate::strategy::KeyHasher;

/// Load factor used when none is configured.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.72;

const SKIP_PRIME: u64 = 101;

/// The double-hashing probe sequence of one hash over a slot array of
/// length `len`.
///
/// Yields at most `len` slot indices. When `len` is prime the indices are
/// all distinct, so exhausting the iterator means every slot was visited.
///
/// ```rust
/// use prime_hash::ProbeSequence;
///
/// let visited: Vec<usize> = ProbeSequence::new(12, 7).collect();
/// assert_eq!(visited.len(), 7);
/// assert_eq!(visited[0], 12 % 7);
/// ```
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    index: usize,
    step: usize,
    len: usize,
    remaining: usize,
}

impl ProbeSequence {
    /// Starts the sequence for `hash`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is less than 2.
    pub fn new(hash: i32, len: usize) -> Self {
        assert!(len >= 2, "probe sequence needs at least 2 slots, got {len}");
        let h = (hash & 0x7FFF_FFFF) as u64;
        let n = len as u64;
        let step = (h * SKIP_PRIME) % (n - 1) + 1;
        Self {
            index: (h % n) as usize,
            step: step as usize,
            len,
            remaining: len,
        }
    }

    /// Step size between consecutive indices, always in `1..len`.
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.index;
        // Both operands are below `len <= MAX_CAPACITY`, so the sum fits in
        // 32 bits.
        self.index = (self.index + self.step) % self.len;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

impl FusedIterator for ProbeSequence {}

/// Finds the first vacant slot on `hash`'s probe sequence. Every occupied
/// slot stepped past is marked probed, counting one collision the first
/// time it is marked.
fn place<K, V>(
    slots: &mut [OpenBucket<K, V>],
    collisions: &mut usize,
    hash: i32,
) -> Option<usize> {
    for index in ProbeSequence::new(hash, slots.len()) {
        let slot = &mut slots[index];
        if slot.is_vacant() {
            return Some(index);
        }
        if !slot.probed {
            slot.probed = true;
            *collisions += 1;
        }
    }

    None
}

/// The capacity to grow to from `capacity`.
fn growth_target(capacity: usize) -> Result<usize> {
    primes::next_prime_after(capacity).ok_or_else(|| {
        warn!("refusing to grow open-addressing table past {capacity} slots");
        Error::CapacityExhausted { capacity }
    })
}

#[derive(Clone)]
pub(crate) struct OpenTable<K, V, H, E> {
    slots: Vec<OpenBucket<K, V>>,
    load_factor: f32,
    count: usize,
    collisions: usize,
    hasher: H,
    equality: E,
}

impl<K, V, H, E> OpenTable<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEquality<K>,
{
    /// `capacity` must be a table prime and `load_factor` must lie in
    /// `(0, 1]`; both are validated by the configuration layer.
    pub(crate) fn new(capacity: usize, load_factor: f32, hasher: H, equality: E) -> Self {
        debug_assert_eq!(primes::smallest_prime_at_least(capacity), Some(capacity));
        debug_assert!(load_factor > 0.0 && load_factor <= 1.0);
        Self {
            slots: fresh_slots(capacity, OpenBucket::empty),
            load_factor,
            count: 0,
            collisions: 0,
            hasher,
            equality,
        }
    }

    /// Replays `key`'s probe sequence. A vacant, unprobed slot ends the
    /// search; tombstones are stepped through.
    fn find_index(&self, hash: i32, key: &K) -> Option<usize> {
        for index in ProbeSequence::new(hash, self.slots.len()) {
            let slot = &self.slots[index];
            if slot.ends_probe() {
                return None;
            }
            if slot.holds(&self.equality, hash, key) {
                return Some(index);
            }
        }

        None
    }

    #[inline]
    fn needs_growth(&self) -> bool {
        self.count as f64 >= self.slots.len() as f64 * self.load_factor as f64
    }

    pub(crate) fn add(&mut self, key: K, value: V) -> Result<()> {
        self.add_with(key, value, growth_target)
    }

    /// Inserts with `next_capacity` deciding the size to grow to, or
    /// refusing growth.
    fn add_with(
        &mut self,
        key: K,
        value: V,
        next_capacity: impl FnOnce(usize) -> Result<usize>,
    ) -> Result<()> {
        let hash = self.hasher.hash(&key);
        // The full lookup also finds keys sitting past tombstones, which the
        // placement walk below would not compare against.
        if self.find_index(hash, &key).is_some() {
            return Err(Error::DuplicateKey);
        }

        if self.needs_growth() {
            let capacity = next_capacity(self.slots.len())?;
            self.grow_to(capacity)?;
        }

        let index = place(&mut self.slots, &mut self.collisions, hash).ok_or(
            Error::CapacityExhausted {
                capacity: self.slots.len(),
            },
        )?;
        self.slots[index].fill(hash, key, value);
        self.count += 1;
        Ok(())
    }

    /// Rehashes every live entry into `capacity` slots.
    ///
    /// Placement is planned over an entry-less array first, so the table is
    /// untouched if any entry fails to find a slot.
    #[cold]
    fn grow_to(&mut self, capacity: usize) -> Result<()> {
        debug!(
            "growing open-addressing table from {} to {} slots ({} live entries, {} collisions)",
            self.slots.len(),
            capacity,
            self.count,
            self.collisions
        );

        let mut plan = fresh_slots(capacity, OpenBucket::<(), ()>::empty);
        let mut collisions = 0;
        let mut targets = Vec::with_capacity(self.count);
        for slot in self.slots.iter().filter(|s| !s.is_vacant()) {
            let index = place(&mut plan, &mut collisions, slot.hash_code)
                .ok_or(Error::CapacityExhausted { capacity })?;
            plan[index].fill(slot.hash_code, (), ());
            targets.push(index);
        }

        let mut slots: Vec<OpenBucket<K, V>> = plan
            .into_iter()
            .map(|p| OpenBucket {
                entry: None,
                hash_code: 0,
                probed: p.probed,
            })
            .collect();
        let live = self.slots.iter_mut().filter_map(|s| {
            let hash = s.hash_code;
            s.vacate().map(|(k, v)| (hash, k, v))
        });
        for ((hash, key, value), index) in live.zip(targets) {
            slots[index].fill(hash, key, value);
        }

        self.slots = slots;
        self.collisions = collisions;
        Ok(())
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hasher.hash(key);
        let index = self.find_index(hash, key)?;
        self.slots[index].entry.as_ref().map(|(_, v)| v)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hasher.hash(key);
        let index = self.find_index(hash, key)?;
        self.slots[index].entry.as_mut().map(|(_, v)| v)
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        let hash = self.hasher.hash(key);
        self.find_index(hash, key).is_some()
    }

    pub(crate) fn remove(&mut self, key: &K) -> Result<V> {
        let hash = self.hasher.hash(key);
        let index = self.find_index(hash, key).ok_or(Error::KeyNotFound)?;
        let (_, value) = self.slots[index].vacate().ok_or(Error::KeyNotFound)?;
        self.count -= 1;
        Ok(value)
    }
}

impl<K, V, H, E> OpenTable<K, V, H, E> {
    /// Reallocates every slot empty at the current capacity.
    pub(crate) fn clear(&mut self) {
        trace!(
            "clearing open-addressing table ({} slots, {} live entries)",
            self.slots.len(),
            self.count
        );
        self.slots = fresh_slots(self.slots.len(), OpenBucket::empty);
        self.count = 0;
        self.collisions = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn collisions(&self) -> usize {
        self.collisions
    }

    pub(crate) fn load_factor(&self) -> f32 {
        self.load_factor
    }

    pub(crate) fn iter(&self) -> OpenIter<'_, K, V> {
        OpenIter {
            slots: self.slots.iter(),
        }
    }

    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn tombstones(&self) -> usize {
        self.slots.iter().filter(|s| s.is_tombstone()).count()
    }

    /// Largest number of slots any live entry's probe sequence visits to
    /// reach it.
    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn longest_probe(&self) -> usize {
        let len = self.slots.len();
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_vacant())
            .filter_map(|(index, s)| {
                ProbeSequence::new(s.hash_code, len)
                    .position(|i| i == index)
                    .map(|steps| steps + 1)
            })
            .max()
            .unwrap_or(0)
    }
}

pub(crate) struct OpenIter<'a, K, V> {
    slots: core::slice::Iter<'a, OpenBucket<K, V>>,
}

impl<'a, K, V> Iterator for OpenIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .by_ref()
            .find_map(|slot| slot.entry.as_ref().map(|(k, v)| (k, v)))
    }
}
