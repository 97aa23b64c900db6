//! Integration tests for IdAllocator

use levelkit_foundation::{ErrorKind, Namespace, Value};
use levelkit_schema::builtin::{ids, props};
use levelkit_storage::{Entity, EntityBuilder, EntityList, IdAllocator, Mode};

fn in_groups(groups: &[i64]) -> Entity {
    let mut entity = EntityBuilder::builtin().construct(ids::BLOCK).unwrap();
    entity
        .set(props::GROUPS, Value::groups(groups.iter().copied()))
        .unwrap();
    entity
}

fn level(groups: &[i64]) -> EntityList {
    let mut list = EntityList::new(Mode::File);
    list.import_append(in_groups(groups));
    list
}

#[test]
fn next_skips_used_groups() {
    let list = level(&[1, 2, 3]);
    let mut alloc = IdAllocator::new();
    assert!(!alloc.is_active());
    assert_eq!(alloc.next(Namespace::Group, &list).unwrap(), 4);
    assert!(alloc.is_active());
}

#[test]
fn next_many_returns_in_order() {
    let list = level(&[1, 2, 3]);
    let mut alloc = IdAllocator::new();
    assert_eq!(
        alloc.next_many(Namespace::Group, 3, &list).unwrap(),
        vec![4, 5, 6]
    );
}

#[test]
fn reserved_ids_are_never_issued() {
    let list = level(&[1, 2, 3]);
    let mut alloc = IdAllocator::new();
    alloc.next(Namespace::Group, &list).unwrap();
    alloc.next(Namespace::Group, &list).unwrap();
    alloc.next(Namespace::Group, &list).unwrap();
    alloc.reserve(Namespace::Group, 7).unwrap();
    assert_eq!(alloc.next(Namespace::Group, &list).unwrap(), 8);
}

#[test]
fn reservation_before_scan_survives_it() {
    let list = level(&[1, 2, 3]);
    let mut alloc = IdAllocator::new();
    alloc.reserve(Namespace::Group, 4).unwrap();
    assert_eq!(alloc.next(Namespace::Group, &list).unwrap(), 5);
}

#[test]
fn reset_rescans() {
    let mut list = level(&[1, 2, 3]);
    let mut alloc = IdAllocator::new();
    assert_eq!(alloc.next(Namespace::Group, &list).unwrap(), 4);
    list.import_append(in_groups(&[4, 5]));
    alloc.reset();
    assert_eq!(alloc.next(Namespace::Group, &list).unwrap(), 6);
}

#[test]
fn namespaces_are_independent() {
    let mut list = level(&[1]);
    let mut pickup = EntityBuilder::builtin().construct(ids::PICKUP).unwrap();
    pickup.set(props::ITEM_ID, 1).unwrap();
    list.import_append(pickup);
    let mut alloc = IdAllocator::new();
    assert_eq!(alloc.next(Namespace::Item, &list).unwrap(), 2);
    assert_eq!(alloc.next(Namespace::Color, &list).unwrap(), 1);
    assert_eq!(alloc.next(Namespace::Group, &list).unwrap(), 2);
}

#[test]
fn exhaustion_is_an_error() {
    let all: Vec<i64> = (1..=9999).collect();
    let list = level(&all);
    let mut alloc = IdAllocator::new();
    let err = alloc.next(Namespace::Group, &list).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::AllocatorExhausted(Namespace::Group)
    ));
}

#[test]
fn reserve_out_of_range() {
    let mut alloc = IdAllocator::new();
    let err = alloc.reserve(Namespace::Group, 10_000).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IdOutOfRange { id: 10_000, .. }));
}

#[test]
fn journal_keeps_allocator_current() {
    let mut list = level(&[1]);
    list.watch_ids(true);
    let mut alloc = IdAllocator::new();
    assert_eq!(alloc.next(Namespace::Group, &list).unwrap(), 2);

    list.append(in_groups(&[3])).unwrap();
    alloc.sync(&mut list);
    assert_eq!(alloc.next(Namespace::Group, &list).unwrap(), 4);
}
