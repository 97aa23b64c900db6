//! Integration tests for the compiled registry

use levelkit_foundation::{EntityType, ErrorKind, FieldKey, FieldType, Namespace, Value};
use levelkit_schema::builtin::{ids, props};
use levelkit_schema::table::FieldDef;
use levelkit_schema::{Coverage, Predicate, Registry, SchemaTable, TypeSchema};

// =============================================================================
// Allowed keys
// =============================================================================

#[test]
fn common_keys_allowed_everywhere() {
    let registry = Registry::builtin();
    for ty in ids::TRIGGERS {
        assert!(registry.allowed(ty, props::X));
        assert!(registry.allowed(ty, props::GROUPS));
    }
    assert!(registry.allowed(ids::BLOCK, props::GROUPS));
}

#[test]
fn type_keys_allowed_only_on_their_type() {
    let registry = Registry::builtin();
    assert!(registry.allowed(ids::MOVE, props::TARGET));
    assert!(!registry.allowed(ids::BLOCK, props::TARGET));
    assert!(registry.allowed(ids::SPAWN, props::REMAPS));
    assert!(!registry.allowed(ids::MOVE, props::REMAPS));
}

#[test]
fn unknown_types_get_common_keys() {
    let registry = Registry::builtin();
    let unknown = EntityType::of(4242);
    assert!(!registry.is_known(unknown));
    assert!(registry.allowed(unknown, props::X));
    assert!(!registry.allowed(unknown, props::TARGET));
}

#[test]
fn keys_are_sorted_and_include_identity() {
    let registry = Registry::builtin();
    let keys = registry.keys(ids::MOVE);
    assert_eq!(keys.first(), Some(&FieldKey::ID));
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    assert!(keys.contains(&props::DURATION));
}

#[test]
fn layout_names() {
    let registry = Registry::builtin();
    assert_eq!(registry.layout_name(ids::MOVE), Some("move"));
    assert_eq!(registry.layout_name(EntityType::of(4242)), None);
}

// =============================================================================
// Compiled predicates
// =============================================================================

#[test]
fn bool_predicate_rejects_ints() {
    let registry = Registry::builtin();
    let spec = registry.spec(ids::MOVE, props::TOUCH_TRIGGER).unwrap();
    let predicate = spec.predicate.as_ref().unwrap();
    assert!(predicate.test(&Value::Bool(true)));
    assert!(!predicate.test(&Value::Int(1)));
}

#[test]
fn int_predicate_rejects_bools() {
    let registry = Registry::builtin();
    let predicate = registry
        .spec(ids::MOVE, props::MOVE_X)
        .and_then(|spec| spec.predicate.as_ref())
        .unwrap();
    assert!(predicate.test(&Value::Int(10)));
    assert!(!predicate.test(&Value::Bool(true)));
}

#[test]
fn literal_predicate_is_membership() {
    let registry = Registry::builtin();
    let predicate = registry
        .spec(ids::BLOCK, props::Z_LAYER)
        .and_then(|spec| spec.predicate.as_ref())
        .unwrap();
    assert!(predicate.test(&Value::Int(-3)));
    assert!(!predicate.test(&Value::Int(2)));
}

#[test]
fn union_predicate_is_any_of() {
    let registry = Registry::builtin();
    let predicate = registry
        .spec(ids::TEXT, props::TEXT)
        .and_then(|spec| spec.predicate.as_ref())
        .unwrap();
    assert!(predicate.test(&Value::from("hello")));
    assert!(predicate.test(&Value::Int(5)));
    assert!(!predicate.test(&Value::Float(5.5)));
}

#[test]
fn any_predicate_accepts_everything() {
    let registry = Registry::builtin();
    let spec = registry.spec(ids::ADV_RANDOM, props::ACTIVATE_GROUP).unwrap();
    assert_eq!(spec.predicate, Some(Predicate::Any));
}

#[test]
fn composites_have_no_predicate() {
    let registry = Registry::builtin();
    let spec = registry.spec(ids::SPAWN, props::REMAPS).unwrap();
    assert!(spec.predicate.is_none());
    assert!(spec.composite.is_some());
}

// =============================================================================
// Id fields and coverage
// =============================================================================

#[test]
fn id_fields_cover_groups_and_refs() {
    let registry = Registry::builtin();
    let fields = registry.id_fields(ids::COLLISION);
    assert!(fields.contains(&(props::GROUPS, Namespace::Group)));
    assert!(fields.contains(&(props::PARENT_GROUPS, Namespace::Group)));
    assert!(fields.contains(&(props::TARGET, Namespace::Group)));
    assert!(fields.contains(&(props::ITEM_ID, Namespace::Collision)));
    assert!(fields.contains(&(props::CONTROL_ID, Namespace::Control)));
}

#[test]
fn item_edit_target_is_an_item() {
    let registry = Registry::builtin();
    let fields = registry.id_fields(ids::ITEM_EDIT);
    assert!(fields.contains(&(props::TARGET, Namespace::Item)));
}

#[test]
fn sequence_fields_are_unchecked() {
    let registry = Registry::builtin();
    assert_eq!(
        registry.coverage(ids::SEQUENCE, props::SEQUENCE),
        Some(Coverage::Unchecked)
    );
    assert_eq!(
        registry.coverage(ids::ADV_RANDOM, props::RANDOM_TARGETS),
        Some(Coverage::Unchecked)
    );
    assert_eq!(
        registry.coverage(ids::EVENT, props::EVENTS),
        Some(Coverage::Checked)
    );
    assert_eq!(registry.coverage(ids::BLOCK, props::TARGET), None);
}

#[test]
fn builtin_table_compiles_cleanly() {
    assert!(Registry::builtin().config_errors().is_empty());
}

// =============================================================================
// Configuration errors
// =============================================================================

fn broken_table() -> SchemaTable {
    SchemaTable::new(vec![FieldDef::new(1, "id", FieldType::Int)]).with_type(
        TypeSchema::new("broken", [EntityType::of(77)])
            .with_field(FieldDef::new(5, "empty_union", FieldType::union([])))
            .with_field(FieldDef::new(
                6,
                "nested",
                FieldType::union([FieldType::Int, FieldType::GroupSet]),
            ))
            .with_field(FieldDef::new(7, "fine", FieldType::Float)),
    )
}

#[test]
fn uncompilable_fields_are_reported_not_fatal() {
    let registry = Registry::build(&broken_table());
    let errors = registry.config_errors();
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e.kind, ErrorKind::SchemaConfig { .. }))
    );

    let ty = EntityType::of(77);
    assert!(registry.allowed(ty, FieldKey::new(5)));
    assert_eq!(
        registry.coverage(ty, FieldKey::new(5)),
        Some(Coverage::Unconstrained)
    );
    assert_eq!(
        registry.coverage(ty, FieldKey::new(7)),
        Some(Coverage::Checked)
    );
}
