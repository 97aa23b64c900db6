//! End-to-end file sessions: load, allocate, append, export, reload.

use std::fs;

use levelkit_foundation::{ErrorKind, Namespace, Value};
use levelkit_runtime::{ExportChecks, Session, SessionConfig};
use levelkit_schema::builtin::{ids, props};
use tempfile::tempdir;

const LEVEL: &str = "\
1,1,2,15,3,15,57,1.2;
1,1,2,45,3,15,57,3;
1,901,2,75,3,15,51,1,10,1;
1,1,2,105,3,15,57,9999;
";

#[test]
fn tag_filter_round_trip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("level.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, LEVEL).unwrap();

    let mut session = Session::open_file(&input, SessionConfig::default()).unwrap();
    let initial = session.list().len();
    assert_eq!(initial, 3);

    let groups = session.next_ids(Namespace::Group, 3).unwrap();
    assert!(!groups.contains(&9999));
    assert_eq!(groups, vec![4, 5, 6]);

    let mut trigger = session.construct(ids::MOVE).unwrap();
    trigger
        .update([
            (props::X, Value::Float(100.0)),
            (props::Y, Value::Float(100.0)),
            (props::DURATION, Value::Float(1.0)),
            (props::TARGET, Value::Int(1)),
        ])
        .unwrap();
    session.append(trigger).unwrap();
    assert_eq!(session.export_to_file(&output).unwrap(), initial + 1);

    let reloaded = Session::open_file(&output, SessionConfig::default()).unwrap();
    assert_eq!(reloaded.list().len(), initial);
}

#[test]
fn disabled_tag_keeps_everything() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("level.txt");
    fs::write(&input, LEVEL).unwrap();

    let config = SessionConfig::default().with_tag_group(None);
    let mut session = Session::open_file(&input, config.clone()).unwrap();
    assert_eq!(session.list().len(), 4);
    assert!(session.next_ids(Namespace::Group, 3).unwrap().iter().all(|id| *id < 9999));

    let block = session.construct(ids::BLOCK).unwrap();
    session.append(block).unwrap();
    session.export().unwrap();

    let reloaded = Session::open_file(&input, config).unwrap();
    assert_eq!(reloaded.list().len(), 5);
    assert!(!reloaded.list()[4].in_group(9999));
}

#[test]
fn export_overwrites_bound_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("level.txt");
    fs::write(&input, LEVEL).unwrap();

    let mut session = Session::open_file(&input, SessionConfig::default()).unwrap();
    let block = session.construct(ids::BLOCK).unwrap();
    session.append(block).unwrap();
    session.export().unwrap();

    let text = fs::read_to_string(&input).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().last().unwrap().contains("57,9999"));

    let reloaded = Session::open_file(&input, SessionConfig::default()).unwrap();
    assert_eq!(reloaded.list().len(), 3);
}

#[test]
fn allocator_resets_after_export() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("level.txt");
    fs::write(&input, LEVEL).unwrap();

    let mut session = Session::open_file(&input, SessionConfig::default()).unwrap();
    let group = session.next_id(Namespace::Group).unwrap();
    assert_eq!(group, 4);
    session.export().unwrap();

    // Nothing carries group 4, so a fresh scan offers it again.
    assert_eq!(session.next_id(Namespace::Group).unwrap(), 4);
}

#[test]
fn imported_invalid_entities_fail_revalidation() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("level.txt");
    fs::write(&input, "1,901,51,0;\n1,1,57,2;\n1,1268,51,10000;\n").unwrap();

    let mut session = Session::open_file(&input, SessionConfig::default()).unwrap();
    assert_eq!(session.list().len(), 3);

    let err = session.export().unwrap_err();
    let ErrorKind::ExportRejected(failures) = err.kind else {
        panic!("expected ExportRejected");
    };
    let indices: Vec<_> = failures
        .iter()
        .filter_map(|e| e.context.as_ref().and_then(|c| c.index))
        .collect();
    assert_eq!(indices, vec![0, 2]);

    let config = SessionConfig::default().with_export(ExportChecks::none());
    let mut lenient = Session::open_file(&input, config).unwrap();
    assert_eq!(lenient.export().unwrap(), 3);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let err = Session::open_file(dir.path().join("nope.txt"), SessionConfig::default())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Io(_)));
    assert!(err.context.and_then(|c| c.source).is_some());
}
