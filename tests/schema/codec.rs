//! Integration tests for dot-delimited composite forms

use levelkit_foundation::{ErrorKind, LkMap, LkSet};
use levelkit_schema::codec;
use proptest::prelude::*;

#[test]
fn group_set_round_trip() {
    let groups: LkSet<i64> = [3, 1, 2].into();
    let text = codec::format_group_set(&groups);
    assert_eq!(text, "1.2.3");
    assert_eq!(codec::parse_group_set(&text).unwrap(), groups);
}

#[test]
fn repeated_group_rejected() {
    let err = codec::parse_group_set("1.2.1").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedComposite { .. }));
}

#[test]
fn remap_parse_and_format() {
    let remap = codec::parse_remap("3.4.1.2").unwrap();
    assert_eq!(remap, LkMap::from([(1, 2), (3, 4)]));
    assert_eq!(codec::format_remap(&remap), "1.2.3.4");
}

#[test]
fn remap_rejections() {
    for input in ["", "1.2.3", "1.1", "1.2.1.3", "1.x"] {
        assert!(codec::parse_remap(input).is_err(), "{input:?} accepted");
    }
}

#[test]
fn int_lists_keep_order_and_repeats() {
    let items = codec::parse_int_list("4.4.1").unwrap();
    assert_eq!(codec::format_int_list(items.iter()), "4.4.1");
    assert!(codec::parse_int_list("").unwrap().is_empty());
}

proptest! {
    #[test]
    fn any_group_set_round_trips(groups in prop::collection::btree_set(1i64..=9999, 0..40)) {
        let set: LkSet<i64> = groups.into_iter().collect();
        let text = codec::format_group_set(&set);
        prop_assert_eq!(codec::parse_group_set(&text).unwrap(), set);
    }
}
