/// The hopscotch table engine.
///
/// `HopscotchMap<K, V, P>` owns a contiguous power-of-two bucket array and
/// keeps every entry within [`crate::H`] slots of its home index, per the
/// neighborhood invariant. `P` is the key policy (hash + equality
/// capability bound, see [`crate::policy`]); it defaults to [`StdPolicy`]
/// for ordinary `Hash + Eq` keys.
use std::hash::{BuildHasher, Hash};

use crate::bucket::Bucket;
use crate::policy::{FnPolicy, KeyPolicy, StdPolicy};
use crate::{H, INITIAL_CAPACITY, MAX_RESIZE_ATTEMPTS};

enum InsertOutcome<V> {
    Inserted,
    Overwrote(V),
}

pub struct HopscotchMap<K, V, P = StdPolicy<K>> {
    policy: P,
    buckets: Vec<Bucket<K, V>>,
    capacity: usize,
    size: usize,
    key_removed: Option<Box<dyn FnMut(K)>>,
    value_removed: Option<Box<dyn FnMut(V)>>,
}

impl<K, V> HopscotchMap<K, V, StdPolicy<K>>
where
    K: Hash + Eq,
{
    /// New table using the default `Hash`/`Eq`-backed key policy.
    pub fn new() -> Self {
        Self::with_policy_impl(StdPolicy::new())
    }
}

impl<K, V> Default for HopscotchMap<K, V, StdPolicy<K>>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HopscotchMap<K, V, StdPolicy<K, S>>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// New table using a caller-supplied `BuildHasher`.
    pub fn with_hasher(build_hasher: S) -> Self {
        Self::with_policy_impl(StdPolicy::with_hasher(build_hasher))
    }
}

impl<K, V, HF, EF> HopscotchMap<K, V, FnPolicy<K, HF, EF>>
where
    HF: Fn(&K) -> u64,
    EF: Fn(&K, &K) -> bool,
{
    /// New table backed by explicit hash/equality closures — the literal
    /// `hs_hash_map_new(hash_func, equal_func)` contract, for keys that
    /// aren't `Hash + Eq`.
    pub fn with_policy(hash_fn: HF, equal_fn: EF) -> Self {
        Self::with_policy_impl(FnPolicy::new(hash_fn, equal_fn))
    }
}

impl<K, V, P> HopscotchMap<K, V, P> {
    fn with_policy_impl(policy: P) -> Self {
        HopscotchMap {
            policy,
            buckets: (0..INITIAL_CAPACITY).map(|_| Bucket::empty()).collect(),
            capacity: INITIAL_CAPACITY,
            size: 0,
            key_removed: None,
            value_removed: None,
        }
    }

    /// Attach both notify hooks at once — stands in for `new_extended`.
    pub fn with_notify(
        mut self,
        key_removed: impl FnMut(K) + 'static,
        value_removed: impl FnMut(V) + 'static,
    ) -> Self {
        self.key_removed = Some(Box::new(key_removed));
        self.value_removed = Some(Box::new(value_removed));
        self
    }

    pub fn with_key_removed_notify(mut self, f: impl FnMut(K) + 'static) -> Self {
        self.key_removed = Some(Box::new(f));
        self
    }

    pub fn with_value_removed_notify(mut self, f: impl FnMut(V) + 'static) -> Self {
        self.value_removed = Some(Box::new(f));
        self
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .filter_map(|b| b.slot.as_ref().map(|(k, v)| (k, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.buckets
            .iter_mut()
            .filter_map(|b| b.slot.as_mut().map(|(k, v)| (&*k, v)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.iter_mut().map(|(_, v)| v)
    }

    pub fn for_each(&self, mut visitor: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            visitor(k, v);
        }
    }

    pub fn for_each_mut(&mut self, mut visitor: impl FnMut(&K, &mut V)) {
        for (k, v) in self.iter_mut() {
            visitor(k, v);
        }
    }
}

impl<K, V, P> HopscotchMap<K, V, P>
where
    P: KeyPolicy<K>,
{
    #[inline]
    fn home(&self, key: &K) -> usize {
        (self.policy.hash_key(key) as usize) & (self.capacity - 1)
    }

    fn find_index(&self, key: &K) -> Option<usize> {
        let h = self.home(key);
        for offset in self.buckets[h].hop_info.iter_set() {
            let idx = h + offset;
            if let Some((k, _)) = &self.buckets[idx].slot {
                if self.policy.keys_equal(k, key) {
                    return Some(idx);
                }
            }
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let idx = self.find_index(key)?;
        self.buckets[idx].slot.as_ref().map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find_index(key)?;
        self.buckets[idx].slot.as_mut().map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Inserts `key`/`value`, overwriting any existing value for `key`.
    /// Returns `false` only if the resize driver exhausts
    /// [`MAX_RESIZE_ATTEMPTS`] trying to make room — the table is left
    /// valid (at its pre-attempt capacity) in that case.
    pub fn put(&mut self, key: K, value: V) -> bool {
        let mut key = key;
        let mut value = value;
        loop {
            match Self::insert_into(&mut self.buckets, self.capacity, &self.policy, key, value) {
                Ok(InsertOutcome::Inserted) => {
                    self.size += 1;
                    return true;
                }
                Ok(InsertOutcome::Overwrote(old_value)) => {
                    if let Some(cb) = &mut self.value_removed {
                        cb(old_value);
                    }
                    return true;
                }
                Err((k, v)) => {
                    key = k;
                    value = v;
                    if !self.grow() {
                        return false;
                    }
                }
            }
        }
    }

    /// Removes the entry for `key`, if any, invoking the configured notify
    /// hooks (key-removed, then value-removed) with the departing pair.
    /// Returns whether an entry was present.
    pub fn remove(&mut self, key: &K) -> bool {
        let h = self.home(key);
        let mut found = None;
        for offset in self.buckets[h].hop_info.iter_set() {
            let idx = h + offset;
            if let Some((k, _)) = &self.buckets[idx].slot {
                if self.policy.keys_equal(k, key) {
                    found = Some((idx, offset));
                    break;
                }
            }
        }
        let Some((idx, offset)) = found else {
            return false;
        };
        self.buckets[h].hop_info.clear(offset);
        let (k, v) = self.buckets[idx].slot.take().expect("index came from an occupied slot");
        self.size -= 1;
        if let Some(cb) = &mut self.key_removed {
            cb(k);
        }
        if let Some(cb) = &mut self.value_removed {
            cb(v);
        }
        true
    }

    /// Insert primitive shared by `put` and the resize driver: overwrite
    /// path, then free-slot search, then hop displacement. Returns the
    /// key/value back to the caller on failure so the resize-and-retry
    /// driver can reinsert without requiring `Clone`.
    fn insert_into(
        buckets: &mut [Bucket<K, V>],
        capacity: usize,
        policy: &P,
        key: K,
        value: V,
    ) -> Result<InsertOutcome<V>, (K, V)> {
        let h = (policy.hash_key(&key) as usize) & (capacity - 1);

        for offset in buckets[h].hop_info.iter_set() {
            let idx = h + offset;
            let matches = buckets[idx]
                .slot
                .as_ref()
                .map_or(false, |(k, _)| policy.keys_equal(k, &key));
            if matches {
                let (_, slot_value) = buckets[idx].slot.as_mut().unwrap();
                let old = std::mem::replace(slot_value, value);
                return Ok(InsertOutcome::Overwrote(old));
            }
        }

        let mut e = h;
        while e < capacity && buckets[e].is_occupied() {
            e += 1;
        }
        if e >= capacity {
            return Err((key, value));
        }

        while e - h >= H {
            let window_start = e + 1 - H;
            let mut moved = false;
            for c in window_start..e {
                let c_key = &buckets[c]
                    .slot
                    .as_ref()
                    .expect("buckets between home and the empty slot are occupied")
                    .0;
                let h_c = (policy.hash_key(c_key) as usize) & (capacity - 1);
                if e - h_c < H {
                    let entry = buckets[c].slot.take().unwrap();
                    buckets[e].slot = Some(entry);
                    buckets[h_c].hop_info.clear(c - h_c);
                    buckets[h_c].hop_info.set(e - h_c);
                    e = c;
                    moved = true;
                    break;
                }
            }
            if !moved {
                return Err((key, value));
            }
        }

        buckets[h].hop_info.set(e - h);
        buckets[e].slot = Some((key, value));
        Ok(InsertOutcome::Inserted)
    }

    /// Doubles capacity and reinserts every live entry, retrying with
    /// further doublings if reinsertion hits a dead end. Bounded by
    /// [`MAX_RESIZE_ATTEMPTS`]; on exhaustion, the original entries are
    /// rebuilt at the original capacity (guaranteed to succeed, since they
    /// fit there before) and `false` is returned.
    fn grow(&mut self) -> bool {
        let original_capacity = self.capacity;
        let mut pending = self.drain_all_entries();
        let mut new_capacity = original_capacity * 2;

        for _attempt in 0..MAX_RESIZE_ATTEMPTS {
            let mut scratch: Vec<Bucket<K, V>> =
                (0..new_capacity).map(|_| Bucket::empty()).collect();
            let mut failed = false;

            while let Some((k, v)) = pending.pop() {
                match Self::insert_into(&mut scratch, new_capacity, &self.policy, k, v) {
                    Ok(_) => {}
                    Err((k, v)) => {
                        let mut reclaimed = Self::drain_buckets(&mut scratch);
                        reclaimed.push((k, v));
                        reclaimed.append(&mut pending);
                        pending = reclaimed;
                        failed = true;
                        break;
                    }
                }
            }

            if !failed {
                self.buckets = scratch;
                self.capacity = new_capacity;
                return true;
            }
            new_capacity *= 2;
        }

        self.rebuild_at_original_capacity(original_capacity, pending);
        false
    }

    fn drain_all_entries(&mut self) -> Vec<(K, V)> {
        Self::drain_buckets(&mut self.buckets)
    }

    fn drain_buckets(buckets: &mut [Bucket<K, V>]) -> Vec<(K, V)> {
        buckets.iter_mut().filter_map(|b| b.slot.take()).collect()
    }

    fn rebuild_at_original_capacity(&mut self, original_capacity: usize, entries: Vec<(K, V)>) {
        let mut buckets: Vec<Bucket<K, V>> =
            (0..original_capacity).map(|_| Bucket::empty()).collect();
        for (k, v) in entries {
            Self::insert_into(&mut buckets, original_capacity, &self.policy, k, v)
                .ok()
                .expect("entries fit at their original capacity before the failed resize");
        }
        self.buckets = buckets;
        self.capacity = original_capacity;
    }
}

impl<K, V, P> Drop for HopscotchMap<K, V, P> {
    fn drop(&mut self) {
        if self.key_removed.is_none() && self.value_removed.is_none() {
            return;
        }
        for bucket in &mut self.buckets {
            if let Some((k, v)) = bucket.slot.take() {
                if let Some(cb) = &mut self.key_removed {
                    cb(k);
                } else {
                    drop(k);
                }
                if let Some(cb) = &mut self.value_removed {
                    cb(v);
                } else {
                    drop(v);
                }
            }
        }
    }
}

impl<K, V, P> IntoIterator for HopscotchMap<K, V, P> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(mut self) -> Self::IntoIter {
        let entries: Vec<(K, V)> = self.buckets.iter_mut().filter_map(|b| b.slot.take()).collect();
        entries.into_iter()
    }
}
