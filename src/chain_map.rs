//! ChainMap: fixed-capacity separate chaining over arena-backed chains.

use crate::chain::{Chain, NodeArena};
use crate::error::AllocError;
use crate::guard::CallbackGuard;
use crate::key_ops::{FnKeyOps, KeyOps, StdKeyOps};
use core::borrow::Borrow;
use core::fmt;

/// Smallest bucket count a map is ever built with.
pub const MIN_CAPACITY: usize = 16;

/// A key together with the value carried alongside it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pair<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Pair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    pair: Pair<K, V>,
    // Computed once on insert; rehash relinks by it without calling back.
    hash: u64,
}

#[inline]
fn bucket_for(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

// Borrowed-form lookups: only the `KeyOps<Q>` bound is in scope here.
#[inline]
fn hash_of<O, Q>(ops: &O, key: &Q) -> u64
where
    O: KeyOps<Q>,
    Q: ?Sized,
{
    ops.hash(key)
}

#[inline]
fn key_matches<K, Q, O>(ops: &O, stored: &K, key: &Q) -> bool
where
    K: Borrow<Q>,
    O: KeyOps<Q>,
    Q: ?Sized,
{
    ops.equals(stored.borrow(), key)
}

fn alloc_buckets(capacity: usize) -> Result<Vec<Chain>, AllocError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|source| AllocError::Buckets { capacity, source })?;
    buckets.resize_with(capacity, Chain::new);
    Ok(buckets)
}

/// Hash map with a fixed number of buckets, each a singly-linked chain.
///
/// `set` always prepends, so re-setting a key shadows the older entry
/// instead of replacing it; `get` sees the newest one. `delete` removes only
/// the newest entry, which lets an older shadow resurface. Use `replace` and
/// `delete_all` where shadows are unwanted.
pub struct ChainMap<K, V, O = StdKeyOps> {
    ops: O,
    buckets: Vec<Chain>,
    nodes: NodeArena<Entry<K, V>>,
    guard: CallbackGuard,
}

impl<K, V> ChainMap<K, V>
where
    K: Eq + core::hash::Hash,
{
    /// Map using the key's `Hash`/`Eq`. `capacity` below `MIN_CAPACITY` is
    /// raised to it.
    pub fn new(capacity: usize) -> Result<Self, AllocError> {
        Self::with_ops(capacity, StdKeyOps::default())
    }
}

impl<K, V, H, E> ChainMap<K, V, FnKeyOps<H, E>>
where
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    pub fn with_fns(capacity: usize, hash: H, equals: E) -> Result<Self, AllocError> {
        Self::with_ops(capacity, FnKeyOps::new(hash, equals))
    }
}

impl<K, V, O> ChainMap<K, V, O> {
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Stored entries, shadowed ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Entries in bucket `index`, or `None` if the index is out of range.
    pub fn chain_len(&self, index: usize) -> Option<usize> {
        self.buckets.get(index).map(Chain::len)
    }

    /// Every stored pair, shadowed ones included, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Pair<K, V>> + '_ {
        self.buckets
            .iter()
            .flat_map(move |chain| chain.iter(&self.nodes))
            .map(|e| &e.pair)
    }

    /// Free every chain; the bucket array and capacity stay.
    pub fn clear(&mut self) {
        for chain in self.buckets.iter_mut() {
            chain.free(&mut self.nodes);
        }
        debug_assert!(self.nodes.is_empty());
    }

    /// Rebuild the bucket array with `capacity` buckets (floored at
    /// `MIN_CAPACITY`) and relink every entry by its stored hash.
    ///
    /// No entry is copied and no callback runs. Entries of one key keep
    /// their newest-first order, so shadowing is unchanged.
    pub fn rehash(&mut self, capacity: usize) -> Result<(), AllocError> {
        let capacity = capacity.max(MIN_CAPACITY);
        let mut buckets = alloc_buckets(capacity)?;
        let mut moved = 0;
        for old in self.buckets.iter_mut() {
            // Oldest first: later relinks end up in front.
            for key in old.take_nodes(&self.nodes).into_iter().rev() {
                if let Some(hash) = self.nodes.get(key).map(|e| e.hash) {
                    buckets[bucket_for(hash, capacity)].relink_front(&mut self.nodes, key);
                    moved += 1;
                }
            }
        }
        debug_assert_eq!(moved, self.nodes.len());
        self.buckets = buckets;
        Ok(())
    }
}

impl<K, V, O> ChainMap<K, V, O>
where
    O: KeyOps<K>,
{
    pub fn with_ops(capacity: usize, ops: O) -> Result<Self, AllocError> {
        let capacity = capacity.max(MIN_CAPACITY);
        Ok(Self {
            ops,
            buckets: alloc_buckets(capacity)?,
            nodes: NodeArena::new(),
            guard: CallbackGuard::new(),
        })
    }

    /// Bucket that `key` hashes to.
    pub fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        O: KeyOps<Q>,
        Q: ?Sized,
    {
        let _g = self.guard.enter();
        bucket_for(hash_of(&self.ops, key), self.capacity())
    }

    /// Store `(key, value)` in front of its bucket. An existing entry for
    /// `key` is left in place, shadowed.
    pub fn set(&mut self, key: K, value: V) -> Result<(), AllocError> {
        let _g = self.guard.enter();
        let hash = self.ops.hash(&key);
        let idx = bucket_for(hash, self.buckets.len());
        let entry = Entry {
            pair: Pair { key, value },
            hash,
        };
        self.buckets[idx].prepend(&mut self.nodes, entry)?;
        Ok(())
    }

    /// Store a copy of `pair`; the caller keeps the original.
    pub fn set_pair(&mut self, pair: &Pair<K, V>) -> Result<(), AllocError>
    where
        K: Clone,
        V: Clone,
    {
        self.set(pair.key.clone(), pair.value.clone())
    }

    /// Newest stored pair whose key equals `key`. Values never take part in
    /// matching.
    ///
    /// `key` may be any borrowed form of `K`; `O` must hash and compare it
    /// the same way it does the owned key.
    pub fn get_pair<Q>(&self, key: &Q) -> Option<&Pair<K, V>>
    where
        K: Borrow<Q>,
        O: KeyOps<Q>,
        Q: ?Sized,
    {
        let _g = self.guard.enter();
        let idx = bucket_for(hash_of(&self.ops, key), self.buckets.len());
        let ops = &self.ops;
        self.buckets[idx]
            .find(&self.nodes, key, |e, k| key_matches(ops, &e.pair.key, k))
            .map(|e| &e.pair)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        O: KeyOps<Q>,
        Q: ?Sized,
    {
        self.get_pair(key).map(|p| &p.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        O: KeyOps<Q>,
        Q: ?Sized,
    {
        let _g = self.guard.enter();
        let idx = bucket_for(hash_of(&self.ops, key), self.buckets.len());
        let ops = &self.ops;
        self.buckets[idx]
            .find_mut(&mut self.nodes, key, |e, k| key_matches(ops, &e.pair.key, k))
            .map(|e| &mut e.pair.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        O: KeyOps<Q>,
        Q: ?Sized,
    {
        self.get_pair(key).is_some()
    }

    /// Remove the newest entry for `key` and return it. Older shadowed
    /// entries for the same key stay and become visible again.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<Pair<K, V>>
    where
        K: Borrow<Q>,
        O: KeyOps<Q>,
        Q: ?Sized,
    {
        let _g = self.guard.enter();
        let idx = bucket_for(hash_of(&self.ops, key), self.buckets.len());
        let ops = &self.ops;
        self.buckets[idx]
            .delete(&mut self.nodes, key, |e, k| key_matches(ops, &e.pair.key, k))
            .map(|e| e.pair)
    }

    /// Remove every entry for `key`, shadows included. Returns the count.
    pub fn delete_all<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        O: KeyOps<Q>,
        Q: ?Sized,
    {
        let _g = self.guard.enter();
        let idx = bucket_for(hash_of(&self.ops, key), self.buckets.len());
        let ops = &self.ops;
        self.buckets[idx].delete_all(&mut self.nodes, key, |e, k| key_matches(ops, &e.pair.key, k))
    }

    /// Overwrite the value of the visible entry for `key`, returning the old
    /// value, or store a new entry if there is none. Never adds a shadow.
    pub fn replace(&mut self, key: K, value: V) -> Result<Option<V>, AllocError> {
        let _g = self.guard.enter();
        let hash = self.ops.hash(&key);
        let idx = bucket_for(hash, self.buckets.len());
        let ops = &self.ops;
        let visible = self.buckets[idx].find_mut(&mut self.nodes, &key, |e, k| {
            ops.equals(&e.pair.key, k)
        });
        if let Some(e) = visible {
            return Ok(Some(core::mem::replace(&mut e.pair.value, value)));
        }
        let entry = Entry {
            pair: Pair { key, value },
            hash,
        };
        self.buckets[idx].prepend(&mut self.nodes, entry)?;
        Ok(None)
    }
}

impl<K, V, O> Drop for ChainMap<K, V, O> {
    fn drop(&mut self) {
        // Chains first, in bucket order; the bucket array goes with the fields.
        self.clear();
    }
}

impl<K, V, O> fmt::Debug for ChainMap<K, V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occupied = self.buckets.iter().filter(|c| !c.is_empty()).count();
        let longest = self.buckets.iter().map(Chain::len).max().unwrap_or(0);
        f.debug_struct("ChainMap")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("occupied_buckets", &occupied)
            .field("longest_chain", &longest)
            .finish_non_exhaustive()
    }
}
