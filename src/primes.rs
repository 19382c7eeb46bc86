//! Prime capacities used for bucket arrays.
//!
//! Open addressing relies on the array length being prime: any step size in
//! `1..len` is then coprime with the length, so a double-hashing probe
//! sequence visits every slot before repeating.

/// The largest prime that is still a valid array length, and the upper bound
/// for a requested table size.
pub const MAX_CAPACITY: usize = 0x7FEFFFFD;

/// Initial size used when none is requested.
pub const DEFAULT_CAPACITY: usize = 4049;

/// Ascending growth table. Each step is roughly 1.2x the previous one up to
/// ~7.2M, then roughly 2x.
const PRIMES: [usize; 81] = [
    3, 7, 11, 17, 23, 29, 37, 47, 59, 71, 89, 107, 131, 163, 197, 239, 293, 353, 431, 521, 631,
    761, 919, 1103, 1327, 1597, 1931, 2333, 2801, 3371, 4049, 4861, 5839, 7013, 8419, 10103,
    12143, 14591, 17519, 21023, 25229, 30293, 36353, 43627, 52361, 62851, 75431, 90523, 108631,
    130363, 156437, 187751, 225307, 270371, 324449, 389357, 467237, 560689, 672827, 807403,
    968897, 1162687, 1395263, 1674319, 2009191, 2411033, 2893249, 3471899, 4166287, 4999559,
    5999471, 7199369, 8175383, 16601593, 33712729, 68460391, 139022417, 282312799, 573292817,
    1164186217, 2146435069,
];

/// Smallest table prime `>= size`, or `None` when `size` exceeds
/// [`MAX_CAPACITY`].
pub(crate) fn smallest_prime_at_least(size: usize) -> Option<usize> {
    let idx = PRIMES.partition_point(|&p| p < size);
    PRIMES.get(idx).copied()
}

/// Smallest table prime strictly greater than `capacity`.
pub(crate) fn next_prime_after(capacity: usize) -> Option<usize> {
    let idx = PRIMES.partition_point(|&p| p <= capacity);
    PRIMES.get(idx).copied()
}
