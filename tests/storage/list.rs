//! Integration tests for EntityList

use levelkit_foundation::{ErrorKind, Value};
use levelkit_schema::builtin::{ids, props};
use levelkit_storage::{Entity, EntityBuilder, EntityList, Mode, PartialMatch};

fn block(x: f64) -> Entity {
    let mut entity = EntityBuilder::builtin().construct(ids::BLOCK).unwrap();
    entity.set(props::X, x).unwrap();
    entity
}

fn trigger(target: i64) -> Entity {
    let mut entity = EntityBuilder::builtin().construct(ids::MOVE).unwrap();
    entity.set(props::TARGET, target).unwrap();
    entity
}

// =============================================================================
// Provenance
// =============================================================================

#[test]
fn appends_are_recorded_as_added() {
    let mut list = EntityList::new(Mode::File);
    list.append(block(0.0)).unwrap();
    list.append(block(1.0)).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.added_len(), 2);
}

#[test]
fn imports_are_not_recorded() {
    let mut list = EntityList::new(Mode::File);
    let count = list.import_extend((0..5).map(|i| block(f64::from(i))));
    assert_eq!(count, 5);
    assert_eq!(list.len(), 5);
    assert_eq!(list.added_len(), 0);
}

#[test]
fn added_yields_in_list_order() {
    let mut list = EntityList::new(Mode::File);
    list.import_append(block(0.0));
    list.append(block(1.0)).unwrap();
    list.insert(0, block(2.0)).unwrap();
    let xs: Vec<_> = list.added().map(|e| e.get(props::X).cloned()).collect();
    assert_eq!(xs, vec![Some(Value::Float(2.0)), Some(Value::Float(1.0))]);
    assert!(list.is_added(0));
    assert!(!list.is_added(1));
}

#[test]
fn extend_is_atomic() {
    let mut list = EntityList::new(Mode::File);
    let fields = block(0.0)
        .into_fields()
        .insert(props::GROUPS, Value::groups([0]));
    let bad = EntityBuilder::builtin()
        .from_fields_unchecked(fields)
        .unwrap();

    let err = list.extend([block(1.0), bad]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidFieldValue { .. }));
    assert_eq!(err.context.and_then(|c| c.index), Some(1));
    assert!(list.is_empty());
}

// =============================================================================
// Mode enforcement
// =============================================================================

#[test]
fn live_rejects_direct_edits() {
    let mut list = EntityList::new(Mode::Live);
    list.append(block(0.0)).unwrap();
    list.extend([block(1.0), block(2.0)]).unwrap();
    list.insert(0, block(3.0)).unwrap();

    let mode_violation = |kind: ErrorKind| matches!(kind, ErrorKind::ModeViolation { .. });
    assert!(mode_violation(list.set(0, block(9.0)).unwrap_err().kind));
    assert!(mode_violation(list.splice(0..1, []).unwrap_err().kind));
    assert!(mode_violation(list.remove(0).unwrap_err().kind));
    assert!(mode_violation(
        list.delete_where(&PartialMatch::new(), None).unwrap_err().kind
    ));
    assert_eq!(list.len(), 4);
}

#[test]
fn file_mode_allows_index_assignment() {
    let mut list = EntityList::new(Mode::File);
    list.import_append(block(0.0));
    let old = list.set(0, block(5.0)).unwrap();
    assert_eq!(old.get(props::X), Some(&Value::Float(0.0)));
    assert_eq!(list[0].get(props::X), Some(&Value::Float(5.0)));
    assert!(!list.is_added(0));
}

#[test]
fn out_of_bounds_set() {
    let mut list = EntityList::new(Mode::File);
    let err = list.set(3, block(0.0)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IndexOutOfBounds { index: 3, length: 0 }));
}

// =============================================================================
// delete_where
// =============================================================================

#[test]
fn delete_where_partial_match() {
    let mut list = EntityList::new(Mode::File);
    list.import_extend([trigger(1), block(0.0), trigger(2), trigger(1)]);
    let deleted = list
        .delete_where(&PartialMatch::new().with(props::TARGET, 1), None)
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(list.len(), 2);
}

#[test]
fn delete_where_presence_wildcard() {
    let mut list = EntityList::new(Mode::File);
    list.import_extend([trigger(1), block(0.0), trigger(2)]);
    let deleted = list
        .delete_where(&PartialMatch::new().present(props::TARGET), None)
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(list[0].entity_type(), ids::BLOCK);
}

#[test]
fn delete_where_limit_takes_from_the_end() {
    let mut list = EntityList::new(Mode::File);
    list.import_extend((0..4).map(|i| block(f64::from(i))));
    let deleted = list
        .delete_where(&|e: &Entity| e.entity_type() == ids::BLOCK, Some(3))
        .unwrap();
    assert_eq!(deleted, 3);
    assert_eq!(list[0].get(props::X), Some(&Value::Float(0.0)));
}

#[test]
fn delete_exact_entity() {
    let mut list = EntityList::new(Mode::File);
    list.import_extend([block(0.0), block(1.0)]);
    list.delete(&block(1.0)).unwrap();
    assert_eq!(list.len(), 1);
    let err = list.delete(&block(7.0)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EntityNotFound));
}

#[test]
fn modify_edits_in_place() {
    let mut list = EntityList::new(Mode::File);
    list.import_append(trigger(1));
    list.modify(0, |e| e.set(props::TARGET, 8)).unwrap();
    assert_eq!(list[0].get(props::TARGET), Some(&Value::Int(8)));
    assert!(list.modify(0, |e| e.set(props::TARGET, 0)).is_err());
    assert_eq!(list[0].get(props::TARGET), Some(&Value::Int(8)));
}
