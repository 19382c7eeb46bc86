//! Pluggable hashing and key-equality strategies.
//!
//! A table never hashes or compares keys itself. It asks a [`KeyHasher`] for
//! a 32-bit hash and a [`KeyEquality`] whether two keys are the same entry.
//! The two must agree: keys that compare equal must hash identically, or
//! lookups silently miss. The table cannot check this.

use core::hash::BuildHasher;
use core::hash::Hash;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hash builder used by tables constructed without an explicit hasher.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hash builder used by tables constructed without an explicit hasher.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    }
}

/// Maps a key to a 32-bit hash.
///
/// Implementations must be deterministic for the lifetime of the table that
/// owns them.
pub trait KeyHasher<K: ?Sized> {
    /// Hash `key`. Only the low 31 bits are used for slot selection.
    fn hash(&self, key: &K) -> i32;
}

/// Every [`BuildHasher`] is a key hasher over `Hash` keys. The 64-bit output
/// is folded so both halves contribute to the 32-bit result.
impl<K, S> KeyHasher<K> for S
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> i32 {
        let h = self.hash_one(key);
        (h ^ (h >> 32)) as u32 as i32
    }
}

/// Decides whether two keys denote the same entry.
pub trait KeyEquality<K: ?Sized> {
    /// Returns `true` when `a` and `b` are the same key.
    fn equal(&self, a: &K, b: &K) -> bool;
}

/// Identity first, then [`PartialEq`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultKeyEquality;

impl<K> KeyEquality<K> for DefaultKeyEquality
where
    K: PartialEq + ?Sized,
{
    #[inline]
    fn equal(&self, a: &K, b: &K) -> bool {
        core::ptr::eq(a, b) || a == b
    }
}

impl<K, F> KeyEquality<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn equal(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;

    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct FixedSip;

    impl BuildHasher for FixedSip {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(7, 11)
        }
    }

    #[test]
    fn build_hasher_is_deterministic() {
        let hasher = FixedSip;
        let a = KeyHasher::<str>::hash(&hasher, "alpha");
        let b = KeyHasher::<str>::hash(&hasher, "alpha");
        assert_eq!(a, b);
        assert_ne!(a, KeyHasher::<str>::hash(&hasher, "beta"));
    }

    #[test]
    fn equal_keys_hash_equal_across_owned_and_borrowed() {
        let hasher = FixedSip;
        let owned: String = "key".to_string();
        assert_eq!(
            KeyHasher::<String>::hash(&hasher, &owned),
            KeyHasher::<str>::hash(&hasher, "key")
        );
    }

    #[test]
    fn default_equality_uses_identity_then_value() {
        let eq = DefaultKeyEquality;
        let a = 5u64;
        assert!(eq.equal(&a, &a));
        assert!(eq.equal(&a, &5));
        assert!(!eq.equal(&a, &6));
        assert!(KeyEquality::<str>::equal(&eq, "x", "x"));
    }

    #[test]
    fn closures_are_equality_strategies() {
        let case_insensitive = |a: &String, b: &String| a.eq_ignore_ascii_case(b);
        assert!(case_insensitive.equal(&"Key".to_string(), &"kEY".to_string()));
        assert!(!case_insensitive.equal(&"Key".to_string(), &"Kay".to_string()));
    }
}
