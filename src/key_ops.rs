//! Hash and key-equality capabilities injected into a `ChainMap`.

use crate::bytes;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Hashing and equality over keys.
///
/// Contract: `equals` is an equivalence relation, and keys it considers
/// equal hash to the same value for the whole life of a map. Breaking it
/// does not cause memory unsafety, only missed lookups.
pub trait KeyOps<K: ?Sized> {
    fn hash(&self, key: &K) -> u64;
    fn equals(&self, a: &K, b: &K) -> bool;
}

impl<K: ?Sized, O: KeyOps<K> + ?Sized> KeyOps<K> for &O {
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        <O as KeyOps<K>>::hash(*self, key)
    }
    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        <O as KeyOps<K>>::equals(*self, a, b)
    }
}

/// Uses the key's own `Hash` and `Eq`, hashed through a `BuildHasher`.
#[derive(Clone, Debug, Default)]
pub struct StdKeyOps<S = RandomState> {
    hasher: S,
}

impl<S> StdKeyOps<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<K, S> KeyOps<K> for StdKeyOps<S>
where
    K: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.hasher.hash_one(key)
    }
    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Caller-supplied hash and equality functions (closures or plain `fn`s).
#[derive(Clone, Copy)]
pub struct FnKeyOps<H, E> {
    hash: H,
    equals: E,
}

impl<H, E> FnKeyOps<H, E> {
    pub fn new(hash: H, equals: E) -> Self {
        Self { hash, equals }
    }
}

impl<H, E> core::fmt::Debug for FnKeyOps<H, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnKeyOps").finish_non_exhaustive()
    }
}

impl<K, H, E> KeyOps<K> for FnKeyOps<H, E>
where
    K: ?Sized,
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (self.hash)(key)
    }
    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (self.equals)(a, b)
    }
}

/// Keys treated as nul-terminated byte strings.
///
/// The hash is the wrapping sum of the bytes before the terminator, so
/// anagrams collide by construction; equality compares up to and including
/// the terminator. Bytes after the first nul are ignored by both.
#[derive(Clone, Copy, Debug, Default)]
pub struct CStrKeyOps;

impl CStrKeyOps {
    pub fn byte_sum(s: &[u8]) -> u64 {
        s[..bytes::length(s)]
            .iter()
            .fold(0u64, |acc, &b| acc.wrapping_add(u64::from(b)))
    }
}

impl<K> KeyOps<K> for CStrKeyOps
where
    K: ?Sized + AsRef<[u8]>,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        Self::byte_sum(key.as_ref())
    }
    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        bytes::cstr_eq(a.as_ref(), b.as_ref())
    }
}
