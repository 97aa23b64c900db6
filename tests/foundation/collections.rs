//! Integration tests for persistent collections

use levelkit_foundation::{LkMap, LkSet, LkVec};

#[test]
fn set_insert_is_persistent() {
    let a: LkSet<i64> = [1, 2].into();
    let b = a.insert(3);
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 3);
    assert!(!a.contains(&3));
}

#[test]
fn set_orders_elements() {
    let s: LkSet<i64> = [9, 1, 5].into_iter().collect();
    assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![1, 5, 9]);
    assert_eq!(s.first(), Some(&1));
    assert_eq!(s.last(), Some(&9));
}

#[test]
fn set_union() {
    let a: LkSet<i64> = [1, 2].into();
    let b: LkSet<i64> = [2, 3].into();
    assert_eq!(a.union(&b), LkSet::from([1, 2, 3]));
}

#[test]
fn map_orders_by_key() {
    let m: LkMap<i64, i64> = [(3, 4), (1, 2)].into();
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    let removed = m.remove(&1);
    assert_eq!(m.len(), 2);
    assert_eq!(removed.len(), 1);
}

#[test]
fn vec_keeps_order_and_repeats() {
    let v: LkVec<i64> = [4, 4, 1].into_iter().collect();
    let w = v.push_back(7);
    assert_eq!(v.len(), 3);
    assert_eq!(w.get(3), Some(&7));
    assert_eq!(w.iter().copied().collect::<Vec<_>>(), vec![4, 4, 1, 7]);
}
