#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can call
// the internal invariant check after every operation.

use crate::chained_hash_map::ChainedHashMap;
use crate::config::TableConfig;
use crate::error::Error;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Erase(usize),
    At(usize),
    Contains(String),
    Mutate(usize, i32),
    ApplyIfEven(i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=48).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            3 => idx.clone().prop_map(OpI::Erase),
            2 => idx.clone().prop_map(OpI::At),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (-3i32..=3).prop_map(OpI::ApplyIfEven),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_scenario<S>(
    mut sut: ChainedHashMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<Key, i32> = HashMap::new();
    let initial = sut.config().initial_capacity;
    for op in ops {
        let capacity_before = sut.capacity();
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let already = model.contains_key(&k);
                match sut.insert(k.clone(), v) {
                    Ok(()) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        model.insert(k, v);
                    }
                    Err(Error::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                        prop_assert_eq!(sut.capacity(), capacity_before);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                }
            }
            OpI::Erase(i) => {
                let k = key_from(&pool, i);
                match sut.erase(&k) {
                    Ok((kk, vv)) => {
                        prop_assert!(kk == k);
                        let mv = model.remove(&k).expect("present in model");
                        prop_assert_eq!(vv, mv);
                    }
                    Err(Error::NotFound) => {
                        prop_assert!(!model.contains_key(&k));
                        prop_assert_eq!(sut.capacity(), capacity_before);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                }
            }
            OpI::At(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.at(&k), model.get(&k));
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                if let Some(vr) = sut.at_mut(&k) {
                    *vr = vr.wrapping_add(d);
                    let mv = model.get_mut(&k).expect("present in model");
                    *mv = mv.wrapping_add(d);
                } else {
                    prop_assert!(!model.contains_key(&k));
                }
            }
            OpI::ApplyIfEven(d) => {
                let expected = model.keys().filter(|k| k.0.len() % 2 == 0).count();
                let n = sut.apply_if(|k| k.0.len() % 2 == 0, |v| *v = v.wrapping_add(d));
                prop_assert_eq!(n, expected);
                for (k, v) in model.iter_mut() {
                    if k.0.len() % 2 == 0 {
                        *v = v.wrapping_add(d);
                    }
                }
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.keys().cloned().collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                prop_assert_eq!(sut.iter().count(), model.len());
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), initial);
            }
        }

        // Post-conditions after each op
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let cfg = sut.config();
        prop_assert!(sut.load_factor() <= cfg.max_load_factor);
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - Duplicate inserts fail and leave capacity untouched.
// - Erase of an absent key fails and leaves capacity untouched.
// - `at`/`contains_key` parity, including borrowed `&str` lookups.
// - `apply_if` mutates exactly the matching entries and reports the count.
// - Structural invariants hold after every op (sizes, power-of-two
//   capacity, bucket placement, no empty buckets).
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(ChainedHashMap::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution
// inside a single bucket.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(ChainedHashMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Same model under a tight custom policy (tiny table, fast growth) so that
// resizes happen on almost every operation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_small_table((pool, ops) in arb_scenario()) {
        let cfg = TableConfig::default()
            .with_initial_capacity(2)
            .with_growth_factor(4)
            .with_load_factors(0.2, 0.9);
        let sut = ChainedHashMap::with_config(cfg).expect("valid config");
        run_scenario(sut, pool, ops)?;
    }
}
