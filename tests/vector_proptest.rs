// Vector property tests.
//
// Model: std::vec::Vec plus a shadow capacity computed by the documented
// rule (grow by x2 when (len + 1) / cap > 0.75, shrink by /2, floor 1, when
// (len - 1) / cap < 0.25).
// Invariants after every op: contents equal the model, len <= capacity,
// capacity equals the shadow capacity.
use chained_hashmap::{Error, Vector};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Push(u16),
    Erase(usize),
    Find(u16),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => any::<u16>().prop_map(|v| Op::Push(v % 32)),
        4 => (0usize..40).prop_map(Op::Erase),
        2 => (0u16..32).prop_map(Op::Find),
        1 => Just(Op::Clear),
    ]
}

fn shadow_erase(len: usize, cap: usize) -> usize {
    if ((len - 1) as f64 / cap as f64) < 0.25 {
        (cap / 2).max(1)
    } else {
        cap
    }
}

proptest! {
    #[test]
    fn prop_vector_matches_model(ops in proptest::collection::vec(arb_op(), 1..300)) {
        let mut sut: Vector<u16> = Vector::new();
        let mut model: Vec<u16> = Vec::new();
        let mut cap = 2usize;

        for op in ops {
            match op {
                Op::Push(v) => {
                    while (model.len() + 1) as f64 / cap as f64 > 0.75 {
                        cap *= 2;
                    }
                    sut.push_back(v).unwrap();
                    model.push(v);
                }
                Op::Erase(i) => {
                    match sut.erase(i) {
                        Ok(v) => {
                            prop_assert!(i < model.len());
                            cap = shadow_erase(model.len(), cap);
                            prop_assert_eq!(v, model.remove(i));
                        }
                        Err(Error::IndexOutOfBounds { index, len }) => {
                            prop_assert_eq!(index, i);
                            prop_assert_eq!(len, model.len());
                            prop_assert!(i >= model.len());
                        }
                        Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                    }
                }
                Op::Find(v) => {
                    prop_assert_eq!(sut.find(&v), model.iter().position(|x| *x == v));
                }
                Op::Clear => {
                    for len in (1..=model.len()).rev() {
                        cap = shadow_erase(len, cap);
                    }
                    sut.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(sut.as_slice(), model.as_slice());
            prop_assert!(sut.len() <= sut.capacity());
            prop_assert_eq!(sut.capacity(), cap);
        }
    }
}
