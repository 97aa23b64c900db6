//! Integration tests for field validation

use std::sync::Arc;

use levelkit_foundation::{EntityType, ErrorKind, FieldKey, Fields, Value};
use levelkit_schema::builtin::{ids, props};
use levelkit_schema::{IdDomain, RangeTable, Registry, ValidationSettings, Validator};

fn validator() -> Validator {
    Validator::builtin()
}

fn rejected(result: levelkit_foundation::Result<()>) -> bool {
    matches!(
        result.map_err(|e| e.kind),
        Err(ErrorKind::InvalidFieldValue { .. })
    )
}

// =============================================================================
// Allowed keys
// =============================================================================

#[test]
fn allowed_keys_never_raise_field_not_allowed() {
    let v = validator();
    let registry = v.registry();
    for ty in ids::TRIGGERS {
        for key in registry.keys(ty) {
            let err = v.validate(ty, key, &Value::Bool(true), None).err();
            if let Some(err) = err {
                assert!(!matches!(err.kind, ErrorKind::FieldNotAllowed { .. }));
            }
        }
    }
}

#[test]
fn disallowed_key_rejected_for_every_value() {
    let v = validator();
    for value in [Value::Int(1), Value::Bool(true), Value::from("x")] {
        let err = v.validate(ids::BLOCK, props::TARGET, &value, None).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::FieldNotAllowed { .. }));
    }
}

#[test]
fn allowed_key_check_can_be_disabled() {
    let v = Validator::new(
        Arc::new(Registry::builtin()),
        ValidationSettings::default().with_allowed_keys(false),
    );
    assert!(v
        .validate(ids::BLOCK, FieldKey::new(9000), &Value::Int(1), None)
        .is_ok());
}

// =============================================================================
// Scalars
// =============================================================================

#[test]
fn float_fields_accept_ints() {
    let v = validator();
    assert!(v.validate(ids::MOVE, props::X, &Value::Int(30), None).is_ok());
    assert!(v.validate(ids::MOVE, props::X, &Value::Float(30.5), None).is_ok());
    assert!(rejected(v.validate(ids::MOVE, props::X, &Value::Bool(true), None)));
}

#[test]
fn bool_and_int_never_coerce() {
    let v = validator();
    assert!(rejected(v.validate(ids::MOVE, props::TOUCH_TRIGGER, &Value::Int(1), None)));
    assert!(rejected(v.validate(ids::MOVE, props::MOVE_X, &Value::Bool(false), None)));
}

#[test]
fn identity_must_match_type() {
    let v = validator();
    assert!(v.validate(ids::MOVE, FieldKey::ID, &Value::Int(901), None).is_ok());
    assert!(rejected(v.validate(ids::MOVE, FieldKey::ID, &Value::Int(1), None)));
}

// =============================================================================
// Reference ranges
// =============================================================================

#[test]
fn group_targets_in_domain() {
    let v = validator();
    assert!(v.validate(ids::MOVE, props::TARGET, &Value::Int(1), None).is_ok());
    assert!(v.validate(ids::MOVE, props::TARGET, &Value::Int(9999), None).is_ok());
    assert!(rejected(v.validate(ids::MOVE, props::TARGET, &Value::Int(0), None)));
    assert!(rejected(v.validate(ids::MOVE, props::TARGET, &Value::Int(10_000), None)));
}

#[test]
fn color_target_skips_reserved_channels() {
    let v = validator();
    let check = |id: i64| v.validate(ids::COLOR, props::TARGET_COLOR, &Value::Int(id), None);
    assert!(check(999).is_ok());
    assert!(rejected(check(1000)));
    assert!(rejected(check(1014)));
    assert!(check(1015).is_ok());
}

#[test]
fn object_color_channels_in_domain() {
    let v = validator();
    for key in [props::COLOR_1, props::COLOR_2] {
        let check = |id: i64| v.validate(ids::BLOCK, key, &Value::Int(id), None);
        assert!(check(1).is_ok());
        assert!(check(1004).is_ok());
        assert!(rejected(check(0)));
        assert!(rejected(check(50_000)));
    }
    assert!(rejected(v.validate(ids::BLOCK, props::COLOR_1, &Value::Bool(true), None)));
}

#[test]
fn range_overrides_are_configurable() {
    let ranges = RangeTable::standard().with_override(
        ids::MOVE,
        props::TARGET,
        IdDomain::new([1..=10]),
    );
    let v = Validator::new(
        Arc::new(Registry::builtin()),
        ValidationSettings::default().with_ranges(ranges),
    );
    assert!(v.validate(ids::MOVE, props::TARGET, &Value::Int(10), None).is_ok());
    assert!(rejected(v.validate(ids::MOVE, props::TARGET, &Value::Int(11), None)));
    // Other types keep the standard domain.
    assert!(v.validate(ids::ALPHA, props::TARGET, &Value::Int(11), None).is_ok());
}

// =============================================================================
// Composites
// =============================================================================

#[test]
fn group_sets() {
    let v = validator();
    let ok = Value::groups([1, 2, 3]);
    let bad = Value::groups([1, 2, 10_000]);
    assert!(v.validate(ids::BLOCK, props::GROUPS, &ok, None).is_ok());
    assert!(rejected(v.validate(ids::BLOCK, props::GROUPS, &bad, None)));
    assert!(rejected(v.validate(ids::BLOCK, props::GROUPS, &Value::from("1.1"), None)));
}

#[test]
fn group_strings_normalize() {
    let v = validator();
    let value = v
        .normalize(ids::BLOCK, props::GROUPS, Value::from("3.1.2"), None)
        .unwrap();
    assert_eq!(value, Value::groups([1, 2, 3]));
}

#[test]
fn remap_tables() {
    let v = validator();
    let ok = Value::remap([(1, 2), (3, 4)]);
    assert!(v.validate(ids::SPAWN, props::REMAPS, &ok, None).is_ok());
    assert!(rejected(v.validate(ids::SPAWN, props::REMAPS, &Value::remap([(1, 1)]), None)));
    assert!(rejected(v.validate(ids::SPAWN, props::REMAPS, &Value::from("1.2.1.3"), None)));
    assert!(rejected(v.validate(ids::SPAWN, props::REMAPS, &Value::remap([(0, 2)]), None)));
}

#[test]
fn event_sets() {
    let v = validator();
    assert!(v.validate(ids::EVENT, props::EVENTS, &Value::events([0, 80]), None).is_ok());
    assert!(rejected(v.validate(ids::EVENT, props::EVENTS, &Value::events([81]), None)));
    let value = v
        .normalize(ids::EVENT, props::EVENTS, Value::from("2.1.2"), None)
        .unwrap();
    assert_eq!(value, Value::events([1, 2]));
}

#[test]
fn unchecked_sequences_are_accepted() {
    let v = validator();
    let value = v
        .normalize(ids::SEQUENCE, props::SEQUENCE, Value::from("4.4.1"), None)
        .unwrap();
    assert_eq!(value, Value::sequence([4, 4, 1]));
    assert!(v
        .validate(ids::SEQUENCE, props::SEQUENCE, &Value::Int(-3), None)
        .is_ok());
}

// =============================================================================
// Rejection details
// =============================================================================

#[test]
fn rejection_carries_owner_snapshot() {
    let v = validator();
    let owner = Fields::new().insert(FieldKey::ID, Value::Int(901));
    let err = v
        .validate(ids::MOVE, props::TARGET, &Value::Int(0), Some(&owner))
        .unwrap_err();
    let ErrorKind::InvalidFieldValue {
        entity_type,
        key,
        value,
        owner: snapshot,
        ..
    } = err.kind
    else {
        panic!("expected InvalidFieldValue");
    };
    assert_eq!(entity_type, ids::MOVE);
    assert_eq!(key, props::TARGET);
    assert_eq!(value, Value::Int(0));
    assert_eq!(snapshot, Some(owner));
}

#[test]
fn validate_fields_requires_identity() {
    let v = validator();
    let fields = Fields::new().insert(props::X, Value::Float(1.0));
    let err = v.validate_fields(EntityType::of(1), &fields).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingIdentity));
}
