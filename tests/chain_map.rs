// ChainMap integration suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Capacity: requests below the floor are raised to MIN_CAPACITY.
// - Visibility: get returns the newest entry whose key is equal.
// - Shadowing: set never deduplicates; delete uncovers older copies.
// - Isolation: only KeyOps::equals decides a match, never the value.
// - Ownership: the map keeps its own copies and drops each exactly once.
use chain_hashmap::{
    AllocError, CStrKeyOps, ChainMap, FnKeyOps, KeyOps, Pair, StdKeyOps, MIN_CAPACITY,
};
use std::cell::RefCell;
use std::collections::hash_map::RandomState;
use std::error::Error;
use std::rc::Rc;

// Test: capacity floor.
// Assumes: MIN_CAPACITY is 16.
// Verifies: 0 and 5 become 16; 64 stays 64.
#[test]
fn capacity_floor() {
    assert_eq!(MIN_CAPACITY, 16);
    let m0: ChainMap<u32, u32> = ChainMap::new(0).unwrap();
    let m5: ChainMap<u32, u32> = ChainMap::new(5).unwrap();
    let m64: ChainMap<u32, u32> = ChainMap::new(64).unwrap();
    assert_eq!(m0.capacity(), 16);
    assert_eq!(m5.capacity(), 16);
    assert_eq!(m64.capacity(), 64);
}

// Test: string keys to integer values, using the byte-sum key ops.
// Assumes: "helloworld", "pair2", "pair3" are distinct keys.
// Verifies: each lookup returns the pair stored for that key.
#[test]
fn string_keys_round_trip() {
    let mut m = ChainMap::with_ops(64, CStrKeyOps).unwrap();
    m.set("helloworld", 123).unwrap();
    m.set("pair2", 321).unwrap();
    m.set("pair3", 456).unwrap();

    let found = m.get_pair(&"helloworld").expect("helloworld present");
    assert_eq!(found.key, "helloworld");
    assert_eq!(found.value, 123);
    assert_eq!(m.get(&"pair2"), Some(&321));
    assert_eq!(m.get(&"pair3"), Some(&456));
    assert_eq!(m.get(&"pair4"), None);
}

// Test: last-write-wins through prepend.
// Assumes: set never searches before inserting.
// Verifies: the newer value is visible; the older one is still stored.
#[test]
fn reinsert_newest_wins() {
    let mut m = ChainMap::with_ops(64, CStrKeyOps).unwrap();
    m.set_pair(&Pair::new("helloworld", 123)).unwrap();
    m.set_pair(&Pair::new("helloworld", 321)).unwrap();
    assert_eq!(m.get(&"helloworld"), Some(&321));
    assert_eq!(m.len(), 2);
}

// Test: open-question behavior around shadows.
// Assumes: delete removes only the newest copy.
// Verifies: the older copy resurfaces; delete_all leaves nothing.
#[test]
fn shadow_resurfaces_then_purged() {
    let mut m: ChainMap<String, i32> = ChainMap::new(16).unwrap();
    m.set("k".into(), 1).unwrap();
    m.set("k".into(), 2).unwrap();
    m.set("k".into(), 3).unwrap();

    let removed = m.delete("k").expect("newest present");
    assert_eq!(removed.into_parts(), ("k".to_string(), 3));
    assert_eq!(m.get("k"), Some(&2));

    assert_eq!(m.delete_all("k"), 2);
    assert_eq!(m.get("k"), None);
    assert!(m.is_empty());
}

// Test: replace as the deduplicating alternative to set.
// Assumes: replace overwrites the visible entry.
// Verifies: old value returned, len unchanged, delete leaves nothing behind.
#[test]
fn replace_is_true_last_write_wins() {
    let mut m: ChainMap<&str, Vec<u8>> = ChainMap::new(16).unwrap();
    assert_eq!(m.replace("blob", vec![1]).unwrap(), None);
    assert_eq!(m.replace("blob", vec![2, 2]).unwrap(), Some(vec![1]));
    assert_eq!(m.len(), 1);
    m.delete(&"blob");
    assert!(!m.contains_key(&"blob"));
}

// Test: equality isolation.
// Assumes: the key type carries extra bytes that equality ignores.
// Verifies: lookups match on the id alone and return the newest entry.
#[test]
fn equality_uses_only_the_key_portion() {
    #[derive(Clone, Debug)]
    struct Tagged {
        id: u32,
        _note: &'static str,
    }
    let mut m = ChainMap::with_fns(
        16,
        |k: &Tagged| u64::from(k.id),
        |a: &Tagged, b: &Tagged| a.id == b.id,
    )
    .unwrap();
    m.set(Tagged { id: 1, _note: "first" }, "old").unwrap();
    m.set(Tagged { id: 1, _note: "second" }, "new").unwrap();

    let probe = Tagged { id: 1, _note: "unrelated" };
    assert_eq!(m.get(&probe), Some(&"new"));
    assert_eq!(m.get_pair(&probe).map(|p| p.key._note), Some("second"));
}

// Test: plain functions as hash and equality.
// Assumes: FnKeyOps accepts fn pointers.
// Verifies: hash identity places keys by value modulo capacity.
#[test]
fn function_pointers_as_key_ops() {
    fn hash(k: &u64) -> u64 {
        *k
    }
    fn eq(a: &u64, b: &u64) -> bool {
        a == b
    }
    let ops = FnKeyOps::new(hash as fn(&u64) -> u64, eq as fn(&u64, &u64) -> bool);
    let mut m = ChainMap::with_ops(32, ops).unwrap();
    m.set(1, 'a').unwrap();
    m.set(33, 'b').unwrap();
    assert_eq!(m.bucket_index(&1), 1);
    assert_eq!(m.bucket_index(&33), 1);
    assert_eq!(m.chain_len(1), Some(2));
    assert_eq!(m.get(&1), Some(&'a'));
    assert_eq!(m.get(&33), Some(&'b'));
    assert_eq!(KeyOps::<u64>::hash(m.ops(), &7), 7);
}

// Test: explicit hasher through StdKeyOps.
// Assumes: StdKeyOps forwards to the BuildHasher.
// Verifies: a map built with a custom RandomState behaves like new().
#[test]
fn std_key_ops_with_explicit_hasher() {
    let ops = StdKeyOps::with_hasher(RandomState::new());
    let mut m: ChainMap<String, u8, _> = ChainMap::with_ops(0, ops).unwrap();
    for (i, k) in ["x", "y", "z"].iter().enumerate() {
        m.set(k.to_string(), i as u8).unwrap();
    }
    assert_eq!(m.get("y"), Some(&1));
    assert_eq!(m.iter().count(), 3);
}

// Test: lookups through a borrowed form of the key.
// Assumes: String keys hash and compare like their str slices.
// Verifies: every lookup accepts &str on a String-keyed map, for both the
// std and byte-string key ops.
#[test]
fn borrowed_key_lookups() {
    let mut m: ChainMap<String, u32> = ChainMap::new(16).unwrap();
    m.set("alpha".to_string(), 1).unwrap();
    m.set("alpha".to_string(), 2).unwrap();
    m.set("beta".to_string(), 3).unwrap();

    assert_eq!(m.bucket_index("alpha"), m.bucket_index(&"alpha".to_string()));
    assert!(m.contains_key("beta"));
    assert_eq!(m.get_pair("alpha").map(|p| p.value), Some(2));
    *m.get_mut("beta").unwrap() += 10;
    assert_eq!(m.get("beta"), Some(&13));
    assert_eq!(m.delete("alpha").map(Pair::into_parts), Some(("alpha".to_string(), 2)));
    assert_eq!(m.get("alpha"), Some(&1));
    assert_eq!(m.delete_all("alpha"), 1);
    assert!(!m.contains_key("alpha"));

    let mut c: ChainMap<String, u32, CStrKeyOps> = ChainMap::with_ops(16, CStrKeyOps).unwrap();
    c.set("abc".to_string(), 7).unwrap();
    c.set("bac".to_string(), 8).unwrap();
    assert_eq!(c.get("abc"), Some(&7));
    assert_eq!(c.get("bac"), Some(&8));
    assert_eq!(c.get("cab"), None);
}

// Test: drop and clear ownership.
// Assumes: values are dropped exactly once, whether cleared or dropped with the map.
// Verifies: outstanding Rc counts return to one.
#[test]
fn values_released_exactly_once() {
    let shared = Rc::new(RefCell::new(0u32));
    {
        let mut m: ChainMap<u32, Rc<RefCell<u32>>> = ChainMap::new(16).unwrap();
        for i in 0..50 {
            m.set(i % 7, shared.clone()).unwrap();
        }
        assert_eq!(Rc::strong_count(&shared), 51);
        m.delete(&3);
        assert_eq!(Rc::strong_count(&shared), 50);
        m.clear();
        assert_eq!(Rc::strong_count(&shared), 1);
        m.clear();
        m.set(1, shared.clone()).unwrap();
    }
    assert_eq!(Rc::strong_count(&shared), 1);
}

// Test: rehash keeps visibility across a capacity change.
// Assumes: collisions under the byte sum stay together after relinking.
// Verifies: every key still resolves; shadowing order is preserved.
#[test]
fn rehash_round_trip() {
    let mut m = ChainMap::with_ops(16, CStrKeyOps).unwrap();
    let keys = ["abc", "bac", "cab", "xyz", "yxz", "q"];
    for (i, k) in keys.iter().enumerate() {
        m.set(*k, i).unwrap();
    }
    m.set("abc", 100).unwrap();

    m.rehash(1024).unwrap();
    assert_eq!(m.capacity(), 1024);
    assert_eq!(m.get(&"abc"), Some(&100));
    for (i, k) in keys.iter().enumerate().skip(1) {
        assert_eq!(m.get(k), Some(&i));
    }
    m.delete(&"abc");
    assert_eq!(m.get(&"abc"), Some(&0));
}

// Test: error type surface.
// Assumes: AllocError is a std error with a readable message.
// Verifies: the bucket variant keeps its source.
#[test]
fn alloc_error_display_and_source() {
    let source = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
    let e = AllocError::Buckets { capacity: 7, source };
    assert_eq!(e.to_string(), "failed to allocate a bucket array of 7 buckets");
    assert!(e.source().is_some());

    let full = AllocError::ArenaFull { len: 3 };
    assert_eq!(full.to_string(), "node arena is full (3 live nodes)");
    assert!(full.source().is_none());
}

// Test: a bucket array that cannot be allocated.
// Assumes: an absurd capacity overflows the allocation size.
// Verifies: construction fails with AllocError::Buckets instead of aborting.
#[test]
fn huge_capacity_reports_alloc_error() {
    match ChainMap::<u8, u8>::new(usize::MAX) {
        Err(AllocError::Buckets { capacity, .. }) => assert_eq!(capacity, usize::MAX),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected allocation failure"),
    }
    let mut m: ChainMap<u8, u8> = ChainMap::new(16).unwrap();
    m.set(1, 1).unwrap();
    assert!(m.rehash(usize::MAX).is_err());
    assert_eq!(m.capacity(), 16, "failed rehash leaves the map untouched");
    assert_eq!(m.get(&1), Some(&1));
}
