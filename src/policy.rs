/// The hashing/equality capability bound standing in for the source's
/// `hash_fn`/`equal_fn` pair.
///
/// Two implementations are provided: [`StdPolicy`], a zero-ceremony default
/// for `K: Hash + Eq` that inlines through a `BuildHasher`, and [`FnPolicy`],
/// a closure-backed variant satisfying the literal `new(hash_fn, equal_fn)`
/// contract for keys that aren't `Hash + Eq`.
use std::hash::{BuildHasher, Hash, Hasher};
use std::marker::PhantomData;

use ahash::RandomState;

pub trait KeyPolicy<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
    fn keys_equal(&self, a: &K, b: &K) -> bool;
}

/// Default policy for ordinary `Hash + Eq` keys, parameterized over the
/// `BuildHasher` the way `std::collections::HashMap` and the pack's
/// `StampedeMap<K, V, S: BuildHasher>` are.
pub struct StdPolicy<K, S = RandomState> {
    build_hasher: S,
    _marker: PhantomData<fn(&K)>,
}

impl<K> StdPolicy<K, RandomState> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K> Default for StdPolicy<K, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> StdPolicy<K, S> {
    pub fn with_hasher(build_hasher: S) -> Self {
        StdPolicy {
            build_hasher,
            _marker: PhantomData,
        }
    }
}

impl<K, S> KeyPolicy<K> for StdPolicy<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        let mut hasher = self.build_hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Closure-backed policy for opaque keys, mirroring the C source's
/// `hs_hash_map_new(hash_func, equal_func)` contract directly.
pub struct FnPolicy<K, HF, EF> {
    hash_fn: HF,
    equal_fn: EF,
    _marker: PhantomData<fn(&K)>,
}

impl<K, HF, EF> FnPolicy<K, HF, EF>
where
    HF: Fn(&K) -> u64,
    EF: Fn(&K, &K) -> bool,
{
    pub fn new(hash_fn: HF, equal_fn: EF) -> Self {
        FnPolicy {
            hash_fn,
            equal_fn,
            _marker: PhantomData,
        }
    }
}

impl<K, HF, EF> KeyPolicy<K> for FnPolicy<K, HF, EF>
where
    HF: Fn(&K) -> u64,
    EF: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        (self.hash_fn)(key)
    }

    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        (self.equal_fn)(a, b)
    }
}
