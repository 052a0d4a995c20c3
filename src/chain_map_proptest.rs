#![cfg(test)]

// Property tests for ChainMap kept inside the crate so the model can compare
// per-bucket chain lengths as well as the public surface.

use crate::chain_map::{ChainMap, MIN_CAPACITY};
use crate::key_ops::CStrKeyOps;
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations shrink toward earlier keys and shorter scripts.
#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    Replace(usize, i32),
    Get(usize),
    Mutate(usize, i32),
    Delete(usize),
    DeleteAll(usize),
    Rehash(usize),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    // Short strings over a tiny alphabet collide a lot under the byte sum.
    proptest::collection::vec("[a-c]{0,3}", 1..=8).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Replace(i, v)),
            3 => idx.clone().prop_map(Op::Get),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            3 => idx.clone().prop_map(Op::Delete),
            1 => idx.clone().prop_map(Op::DeleteAll),
            1 => (0usize..64).prop_map(Op::Rehash),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: equivalence with a model where each key owns a stack of values
// (newest last).
// - set pushes; replace overwrites the top or pushes onto an empty stack.
// - get/get_mut see the top; delete pops it, exposing the previous value.
// - delete_all empties the stack and reports its depth.
// - rehash and clear keep/empty every stack; capacity respects the floor.
// - len equals the total stack depth; chain lengths sum to len.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_stack_model((pool, ops) in arb_scenario()) {
        let mut sut: ChainMap<String, i32, CStrKeyOps> = ChainMap::with_ops(0, CStrKeyOps).unwrap();
        let mut model: HashMap<String, Vec<i32>> = HashMap::new();

        for op in ops {
            match op {
                Op::Set(i, v) => {
                    let k = pool[i].clone();
                    sut.set(k.clone(), v).unwrap();
                    model.entry(k).or_default().push(v);
                }
                Op::Replace(i, v) => {
                    let k = pool[i].clone();
                    let stack = model.entry(k.clone()).or_default();
                    let expected = match stack.last_mut() {
                        Some(top) => Some(std::mem::replace(top, v)),
                        None => {
                            stack.push(v);
                            None
                        }
                    };
                    prop_assert_eq!(sut.replace(k, v).unwrap(), expected);
                }
                Op::Get(i) => {
                    let k = &pool[i];
                    let expected = model.get(k).and_then(|s| s.last());
                    prop_assert_eq!(sut.get(k), expected);
                    prop_assert_eq!(sut.contains_key(k), expected.is_some());
                }
                Op::Mutate(i, d) => {
                    let k = &pool[i];
                    let top = model.get_mut(k).and_then(|s| s.last_mut());
                    match (sut.get_mut(k), top) {
                        (Some(v), Some(t)) => {
                            *v = v.wrapping_add(d);
                            *t = t.wrapping_add(d);
                            prop_assert_eq!(*v, *t);
                        }
                        (None, None) => {}
                        (got, want) => {
                            prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", got, want)
                        }
                    }
                }
                Op::Delete(i) => {
                    let k = &pool[i];
                    let expected = model.get_mut(k).and_then(|s| s.pop());
                    let got = sut.delete(k);
                    prop_assert_eq!(got.as_ref().map(|p| p.value), expected);
                    if let Some(p) = got {
                        prop_assert_eq!(&p.key, k);
                    }
                }
                Op::DeleteAll(i) => {
                    let k = &pool[i];
                    let expected = model.get_mut(k).map(|s| std::mem::take(s).len()).unwrap_or(0);
                    prop_assert_eq!(sut.delete_all(k), expected);
                }
                Op::Rehash(cap) => {
                    sut.rehash(cap).unwrap();
                    prop_assert_eq!(sut.capacity(), cap.max(MIN_CAPACITY));
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            let depth: usize = model.values().map(Vec::len).sum();
            prop_assert_eq!(sut.len(), depth);
            prop_assert_eq!(sut.is_empty(), depth == 0);
            let chained: usize = (0..sut.capacity()).filter_map(|i| sut.chain_len(i)).sum();
            prop_assert_eq!(chained, depth);
        }

        for k in &pool {
            prop_assert_eq!(sut.get(k), model.get(k).and_then(|s| s.last()));
        }
    }
}
