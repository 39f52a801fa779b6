// Vector integration suite: the capacity policy seen through the public API.
use chained_hashmap::{Error, Vector, VectorConfig};

// Test: growth sequence under the default policy (initial 2, x2, 0.75).
#[test]
fn growth_sequence() {
    let mut v = Vector::new();
    let mut caps = Vec::new();
    for i in 0..12 {
        v.push_back(i).unwrap();
        caps.push(v.capacity());
    }
    assert_eq!(caps, vec![2, 4, 4, 8, 8, 8, 16, 16, 16, 16, 16, 16]);
    assert_eq!(v.len(), 12);
    assert!(v.iter().copied().eq(0..12));
}

// Test: erase keeps relative order and reports out-of-range indices.
#[test]
fn erase_preserves_order() {
    let mut v = Vector::new();
    for c in "abcdef".chars() {
        v.push_back(c).unwrap();
    }
    assert_eq!(v.erase(2), Ok('c'));
    assert_eq!(v.erase(0), Ok('a'));
    assert_eq!(v.as_slice(), &['b', 'd', 'e', 'f']);
    assert_eq!(
        v.erase(4),
        Err(Error::IndexOutOfBounds { index: 4, len: 4 })
    );
}

// Test: find returns the lowest matching index.
#[test]
fn find_lowest_index() {
    let mut v = Vector::new();
    for n in [5, 3, 5, 9] {
        v.push_back(n).unwrap();
    }
    assert_eq!(v.find(&5), Some(0));
    assert_eq!(v.find(&9), Some(3));
    assert_eq!(v.find(&1), None);
}

// Test: clear empties and shrinks; the vector stays usable.
#[test]
fn clear_then_reuse() {
    let mut v = Vector::new();
    for i in 0..7 {
        v.push_back(i).unwrap();
    }
    assert_eq!(v.capacity(), 16);
    v.clear();
    assert!(v.is_empty());
    assert!(v.capacity() < 16);
    v.push_back(42).unwrap();
    assert_eq!(v.at(0), Some(&42));
}

// Test: a config rejected by validation cannot build a vector.
#[test]
fn invalid_config_rejected() {
    let cfg = VectorConfig::default().with_growth_factor(1);
    assert!(matches!(
        Vector::<i32>::with_config(cfg),
        Err(Error::InvalidConfig(_))
    ));
}

// Test: owned iteration yields elements in order.
#[test]
fn into_iter_in_order() {
    let mut v = Vector::new();
    for s in ["x", "y", "z"] {
        v.push_back(s.to_string()).unwrap();
    }
    for s in &mut v {
        s.push('!');
    }
    let out: Vec<String> = v.into_iter().collect();
    assert_eq!(out, vec!["x!", "y!", "z!"]);
}
