//! chain-hashmap: a fixed-capacity hash map with separate chaining, where
//! every bucket is a singly-linked list of entries the map owns outright.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small key/value store whose behaviour is easy to predict:
//!   one hash, one modulo, one linear walk.
//! - Layers:
//!   - Chain + NodeArena: singly-linked lists whose nodes live in a
//!     `slotmap` arena and are addressed by generational keys. Prepend,
//!     find, delete and free; no hashing.
//!   - KeyOps: the hash/equality capability, injected at construction
//!     (`StdKeyOps` over `Hash + Eq`, `FnKeyOps` over plain functions,
//!     `CStrKeyOps` over nul-terminated byte strings).
//!   - ChainMap<K, V, O>: a bucket array of chain heads sharing one arena.
//!     Every operation computes `hash(key) % capacity` and forwards to the
//!     chain in that bucket.
//!
//! Constraints
//! - Single-threaded; no internal locking. Wrap the map in a lock to share.
//! - Capacity is fixed at construction (never below `MIN_CAPACITY`) and
//!   only changes through an explicit `rehash`.
//! - The map never aliases caller memory: keys and values are moved or
//!   cloned in and dropped by the map.
//! - Allocation failures surface as `AllocError`, never as a panic from
//!   the map's own code.
//!
//! Shadow entries
//! - `set` prepends without searching. Setting a key twice keeps both
//!   entries; lookups see the newest, so reads are last-write-wins while
//!   the older entry stays stored.
//! - `delete` removes only the newest entry for a key, so an older one
//!   becomes visible again. `replace` (overwrite in place) and
//!   `delete_all` (purge every copy) avoid shadows entirely.
//!
//! Hash storage and rehashing
//! - Each entry stores the `u64` hash computed on insert. `rehash` relinks
//!   nodes by that stored hash, so it never calls user code and never
//!   copies an entry.
//!
//! Reentrancy
//! - `KeyOps` callbacks run while a bucket may be partially walked. Debug
//!   builds panic if a callback re-enters the same map; release builds do
//!   not check.
//!
//! Notes and non-goals
//! - No automatic resizing or load-factor management.
//! - `iter` visits every stored entry, shadows included, in no particular
//!   order.
//! - No persistence format.

pub mod bytes;
pub mod chain;
mod chain_map;
mod chain_map_proptest;
mod error;
mod guard;
pub mod key_ops;

// Public surface
pub use chain_map::{ChainMap, Pair, MIN_CAPACITY};
pub use error::AllocError;
pub use key_ops::{CStrKeyOps, FnKeyOps, KeyOps, StdKeyOps};
