//! Integration tests for object strings and the object codec

use levelkit_foundation::{ErrorKind, FieldKey, FieldType, Value};
use levelkit_runtime::transcode::{decode_value, encode_value, parse_object_string};
use levelkit_runtime::{KeyTranscoder, ObjectCodec, TokenTranscoder, from_object_string};
use levelkit_schema::builtin::{ids, props};

#[test]
fn object_string_example() {
    let entity = from_object_string("1,1,2,50,3,45;").unwrap();
    assert_eq!(entity.entity_type(), ids::BLOCK);
    assert_eq!(entity.len(), 3);
}

#[test]
fn object_string_round_trip() {
    let codec = ObjectCodec::builtin();
    let mut trigger = codec.builder().construct(ids::SPAWN).unwrap();
    trigger.set(props::TARGET, 12).unwrap();
    trigger.set(props::REMAPS, Value::remap([(5, 6), (1, 2)])).unwrap();
    trigger.add_group(3).unwrap();

    let text = codec.to_object_string(&trigger);
    assert!(text.contains("442,1.2.5.6"));
    assert!(text.ends_with(';'));
    assert_eq!(codec.from_object_string(&text).unwrap(), trigger);
}

#[test]
fn invalid_values_rejected_on_decode() {
    let err = from_object_string("1,901,51,0;").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidFieldValue { .. }));
}

#[test]
fn trusted_decode_skips_validation() {
    let codec = ObjectCodec::builtin();
    let raw = parse_object_string("1,901,51,0;").unwrap();
    let entity = codec.decode_trusted(&raw).unwrap();
    assert_eq!(entity.get(props::TARGET), Some(&Value::Int(0)));
}

#[test]
fn values_follow_declared_types() {
    assert_eq!(
        decode_value(Some(&FieldType::Bool), "1").unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        decode_value(Some(&FieldType::Float), "2").unwrap(),
        Value::Float(2.0)
    );
    assert_eq!(
        decode_value(Some(&FieldType::EventSet), "3.1").unwrap(),
        Value::events([1, 3])
    );
    assert_eq!(
        decode_value(Some(&FieldType::Sequence), "3.1.3").unwrap(),
        Value::sequence([3, 1, 3])
    );
    assert!(decode_value(Some(&FieldType::Int), "1.5").is_err());
    assert!(decode_value(Some(&FieldType::Bool), "2").is_err());
}

#[test]
fn values_encode_to_wire_text() {
    assert_eq!(encode_value(&Value::Bool(false)), "0");
    assert_eq!(encode_value(&Value::Float(0.5)), "0.5");
    assert_eq!(encode_value(&Value::events([9, 2])), "2.9");
    assert_eq!(encode_value(&Value::sequence([9, 2])), "9.2");
}

#[test]
fn token_transcoder_is_identity_on_numbers() {
    let keys = TokenTranscoder;
    assert_eq!(keys.to_wire(FieldKey::new(57)), 57);
    assert_eq!(keys.from_wire(57).unwrap(), FieldKey::new(57));
    assert_eq!(keys.from_wire(57).unwrap().to_string(), "a57");
}
