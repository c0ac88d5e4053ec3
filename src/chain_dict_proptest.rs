#![cfg(test)]

// Property tests for ChainDict kept inside the crate so they can look at the
// node arena directly.

use crate::chain_dict::ChainDict;
use crate::error::DictError;
use crate::hashing::{StdKeyHasher, Unhashable};
use proptest::prelude::*;
use std::rc::Rc;

// Keys hash to their length, so short random strings collide a lot; keys
// starting with '#' are unhashable.
type LenHash = fn(&str) -> Result<u64, Unhashable>;

fn len_hash(k: &str) -> Result<u64, Unhashable> {
    if k.starts_with('#') {
        Err(Unhashable)
    } else {
        Ok(k.len() as u64)
    }
}

#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    Get(usize),
    Delete(usize),
    Contains(usize),
    Assign(usize, Option<i32>),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("#?[a-z]{0,4}", 1..=8).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            2 => idx.clone().prop_map(Op::Delete),
            1 => idx.clone().prop_map(Op::Contains),
            1 => (idx.clone(), proptest::option::of(any::<i32>()))
                .prop_map(|(i, v)| Op::Assign(i, v)),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Exact model of the chain: (hash, stored key, value share), front first.
#[derive(Default)]
struct Model {
    chain: Vec<(u64, Rc<str>, Rc<i32>)>,
}

impl Model {
    fn position(&self, hash: u64) -> Option<usize> {
        self.chain.iter().position(|(h, _, _)| *h == hash)
    }

    fn set(&mut self, hash: u64, key: Rc<str>, value: Rc<i32>) {
        match self.position(hash) {
            Some(i) => self.chain[i].2 = value,
            None => self.chain.insert(0, (hash, key, value)),
        }
    }

    fn delete(&mut self, hash: u64) -> bool {
        match self.position(hash) {
            Some(i) => {
                self.chain.remove(i);
                true
            }
            None => false,
        }
    }
}

// Property: ChainDict matches a front-pushed, hash-identified list model.
// Invariants exercised across random operation sequences:
// - Unhashable keys fail every operation and never change the chain.
// - `set` overwrites on hash match (keeping the stored key) or pushes at the head.
// - `get`/`contains` agree with the model; `delete` fails with `KeyNotFound` iff absent.
// - Iteration yields exactly the model chain, in order.
// - `len` equals the number of nodes in the arena and in the model.
// - Every stored value is shared by exactly the dictionary and the model.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_chain_model((pool, ops) in arb_scenario()) {
        let mut sut: ChainDict<str, i32, LenHash> = ChainDict::with_hasher(len_hash as LenHash);
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Set(i, v) | Op::Assign(i, Some(v)) => {
                    let key: Rc<str> = Rc::from(pool[i].as_str());
                    let value = Rc::new(v);
                    let res = if matches!(op, Op::Set(..)) {
                        sut.set(key.clone(), value.clone())
                    } else {
                        sut.assign(key.clone(), Some(value.clone()))
                    };
                    match len_hash(&key) {
                        Ok(h) => {
                            prop_assert!(res.is_ok());
                            model.set(h, key, value);
                        }
                        Err(Unhashable) => {
                            let e = res.unwrap_err();
                            prop_assert!(e.is_unhashable());
                            prop_assert!(Rc::ptr_eq(e.key().unwrap(), &key));
                        }
                    }
                }
                Op::Get(i) => {
                    let key: Rc<str> = Rc::from(pool[i].as_str());
                    match (sut.get(&key), len_hash(&key)) {
                        (Ok(v), Ok(h)) => {
                            let at = model.position(h);
                            prop_assert!(at.is_some());
                            prop_assert!(Rc::ptr_eq(&v, &model.chain[at.unwrap()].2));
                        }
                        (Err(DictError::KeyNotFound(_)), Ok(h)) => {
                            prop_assert!(model.position(h).is_none())
                        }
                        (Err(DictError::Unhashable(_)), Err(Unhashable)) => {}
                        (other, _) => prop_assert!(false, "unexpected get result: {:?}", other),
                    }
                }
                Op::Delete(i) | Op::Assign(i, None) => {
                    let key: Rc<str> = Rc::from(pool[i].as_str());
                    let res = if matches!(op, Op::Delete(_)) {
                        sut.delete(&key)
                    } else {
                        sut.assign(key.clone(), None)
                    };
                    match len_hash(&key) {
                        Ok(h) => {
                            let existed = model.delete(h);
                            match res {
                                Ok(()) => prop_assert!(existed),
                                Err(e) => {
                                    prop_assert!(!existed);
                                    prop_assert!(e.is_key_not_found());
                                }
                            }
                        }
                        Err(Unhashable) => prop_assert!(res.unwrap_err().is_unhashable()),
                    }
                }
                Op::Contains(i) => {
                    let key: Rc<str> = Rc::from(pool[i].as_str());
                    match len_hash(&key) {
                        Ok(h) => {
                            let found = sut.contains(&key).unwrap();
                            prop_assert_eq!(found, model.position(h).is_some());
                        }
                        Err(Unhashable) => {
                            prop_assert!(sut.contains(&key).unwrap_err().is_unhashable())
                        }
                    }
                }
                Op::Iterate => {
                    let seen: Vec<(&str, i32)> = sut.iter().map(|(k, v)| (&**k, **v)).collect();
                    let expected: Vec<(&str, i32)> =
                        model.chain.iter().map(|(_, k, v)| (&**k, **v)).collect();
                    prop_assert_eq!(seen, expected);
                }
            }

            // Post-conditions after each op
            prop_assert_eq!(sut.len(), model.chain.len());
            prop_assert_eq!(sut.len(), sut.nodes.len());
            prop_assert_eq!(sut.is_empty(), model.chain.is_empty());
            for ((k, v), (_, mk, mv)) in sut.iter().zip(model.chain.iter()) {
                prop_assert!(Rc::ptr_eq(k, mk));
                prop_assert!(Rc::ptr_eq(v, mv));
                prop_assert_eq!(Rc::strong_count(v), 2);
            }
        }

        // Teardown releases the dictionary's share of every value exactly once.
        drop(sut);
        for (_, k, v) in &model.chain {
            prop_assert_eq!(Rc::strong_count(k), 1);
            prop_assert_eq!(Rc::strong_count(v), 1);
        }
    }
}

// Property: with the default std hashing contract, distinct small integers
// never collide, so the dictionary behaves like a map with front insertion.
proptest! {
    #[test]
    fn prop_std_hasher_keeps_distinct_keys(keys in proptest::collection::vec(0u16..64, 0..80)) {
        let mut sut: ChainDict<u16, usize, StdKeyHasher> = ChainDict::new();
        let mut last: std::collections::HashMap<u16, usize> = std::collections::HashMap::new();
        for (i, k) in keys.iter().enumerate() {
            sut.set(Rc::new(*k), Rc::new(i)).unwrap();
            last.insert(*k, i);
        }
        prop_assert_eq!(sut.len(), last.len());
        for (k, i) in &last {
            prop_assert_eq!(*sut.get(&Rc::new(*k)).unwrap(), *i);
        }
    }
}
