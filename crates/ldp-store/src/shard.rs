//! Hash-partitioned concurrent map.
//!
//! [`ShardedMap`] splits its keys across a fixed number of `RwLock<HashMap>`
//! shards. Operations on keys in different shards never contend; operations
//! on the same key serialize on that key's shard lock, which makes every
//! single-key operation linearizable.

use std::collections::hash_map::{Entry, RandomState};
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A concurrent map made of independently locked shards.
pub struct ShardedMap<K, V> {
    shards: Box<[RwLock<HashMap<K, V>>]>,
    hasher: RandomState,
}

impl<K: Eq + Hash, V> ShardedMap<K, V> {
    /// Create a map with `shards` partitions (at least one).
    pub fn new(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_for(&self, key: &K) -> &RwLock<HashMap<K, V>> {
        let index = (self.hasher.hash_one(key) % self.shards.len() as u64) as usize;
        &self.shards[index]
    }

    fn read_shard(&self, key: &K) -> RwLockReadGuard<'_, HashMap<K, V>> {
        self.shard_for(key).read().expect("lock poisoned")
    }

    fn write_shard(&self, key: &K) -> RwLockWriteGuard<'_, HashMap<K, V>> {
        self.shard_for(key).write().expect("lock poisoned")
    }

    /// Run `f` against the current value under the shard's read lock.
    pub fn read<R>(&self, key: &K, f: impl FnOnce(Option<&V>) -> R) -> R {
        f(self.read_shard(key).get(key))
    }

    /// Clone of the current value.
    pub fn get_cloned(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.read(key, |v| v.cloned())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.read_shard(key).contains_key(key)
    }

    /// Insert or overwrite, returning the previous value.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.write_shard(&key).insert(key, value)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.write_shard(key).remove(key)
    }

    /// Mutate an existing value in place. Returns `None` if the key is absent.
    pub fn update<R>(&self, key: &K, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        self.write_shard(key).get_mut(key).map(f)
    }

    /// Mutate the value for `key`, inserting `default()` first if absent.
    pub fn upsert<R>(&self, key: K, default: impl FnOnce() -> V, f: impl FnOnce(&mut V) -> R) -> R {
        let mut shard = self.write_shard(&key);
        f(shard.entry(key).or_insert_with(default))
    }

    /// Mutate an existing value and drop the entry if `f` returns `false`.
    ///
    /// Returns `false` if the key was absent.
    pub fn update_or_remove(&self, key: &K, f: impl FnOnce(&mut V) -> bool) -> bool
    where
        K: Clone,
    {
        let mut shard = self.write_shard(key);
        match shard.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                if !f(entry.get_mut()) {
                    entry.remove();
                }
                true
            }
            Entry::Vacant(_) => false,
        }
    }

    /// Total number of entries across all shards.
    ///
    /// Shards are read one after another, so under concurrent writes the
    /// result is a snapshot of no single instant.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.read().expect("lock poisoned").len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards
            .iter()
            .all(|s| s.read().expect("lock poisoned").is_empty())
    }

    /// Fold over every value, one shard at a time.
    pub fn fold<A>(&self, init: A, mut f: impl FnMut(A, &K, &V) -> A) -> A {
        let mut acc = init;
        for shard in self.shards.iter() {
            let shard = shard.read().expect("lock poisoned");
            for (k, v) in shard.iter() {
                acc = f(acc, k, v);
            }
        }
        acc
    }

    /// Remove every entry.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.write().expect("lock poisoned").clear();
        }
    }
}

impl<K, V> std::fmt::Debug for ShardedMap<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedMap")
            .field("shards", &self.shards.len())
            .field("len", &self.len())
            .finish()
    }
}
