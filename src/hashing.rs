//! Hashing contract: how a key is turned into the cached `u64` stored in a node.

use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Marker error: the key does not support hashing under the active contract.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, thiserror::Error)]
#[error("key does not support hashing")]
pub struct Unhashable;

/// The environment's hashing function.
///
/// Every `u64` returned in `Ok` is a legitimate hash; failure is reported
/// out of band, never through a reserved value.
pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> Result<u64, Unhashable>;
}

/// Default contract: hash any `K: Hash` through a `BuildHasher`. Never fails.
#[derive(Clone, Debug, Default)]
pub struct StdKeyHasher<S = RandomState> {
    build: S,
}

impl<S> StdKeyHasher<S> {
    pub fn new(build: S) -> Self {
        Self { build }
    }
}

impl<K, S> KeyHasher<K> for StdKeyHasher<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> Result<u64, Unhashable> {
        Ok(self.build.hash_one(key))
    }
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> Result<u64, Unhashable>,
{
    #[inline]
    fn hash_key(&self, key: &K) -> Result<u64, Unhashable> {
        self(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_hasher_is_deterministic_per_instance() {
        let h: StdKeyHasher = StdKeyHasher::default();
        assert_eq!(h.hash_key("a").unwrap(), h.hash_key("a").unwrap());
        assert_eq!(h.hash_key(&7u32).unwrap(), h.hash_key(&7u32).unwrap());
    }

    #[test]
    fn closure_contract_can_refuse_keys() {
        let h = |k: &i32| if *k < 0 { Err(Unhashable) } else { Ok(*k as u64) };
        assert_eq!(h.hash_key(&3), Ok(3));
        assert_eq!(h.hash_key(&-1), Err(Unhashable));
    }
}
