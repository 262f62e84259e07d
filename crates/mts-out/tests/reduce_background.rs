mod common;

use std::fs;

use mts_out::{
    copy_non_empty, hit_branches, reduce_background, write_tree, BranchDescriptor, BranchKind,
    Event, JsonlTreeReader, JsonlTreeWriter, TreeHeader, TreeReader, BRANCH_LIST,
};
use serde_json::json;
use tempfile::tempdir;

use common::{event, event_id, header};

fn read_all(reader: &mut JsonlTreeReader) -> Vec<Event> {
    (0..reader.entries())
        .map(|i| reader.read_event(i).expect("read event"))
        .collect()
}

#[test]
fn only_events_with_hits_survive_in_order() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("ship.MuonBack-TGeant4.root");
    let events = vec![event(0, 2, 0), event(1, 0, 0), event(2, 0, 5)];
    write_tree(&path, &header(), &events).expect("write tree");

    let report = reduce_background(&path, Vec::new()).expect("reduce");
    assert_eq!(report.scanned, 3);
    assert_eq!(report.retained, 2);
    assert_eq!(report.source, path);
    assert_eq!(report.hit_branches, vec!["vetoPoint", "strawtubesPoint"]);

    let mut reader = JsonlTreeReader::open(&path).expect("open reduced");
    let kept = read_all(&mut reader);
    assert_eq!(kept.iter().map(event_id).collect::<Vec<_>>(), vec![0, 2]);
    assert_eq!(kept[0], events[0]);
    assert_eq!(kept[1], events[2]);
    assert_eq!(reader.header().branches, header().branches);
    assert_eq!(reader.header().branch_list, BRANCH_LIST.to_vec());
    assert!(!dir.path().join("ship.MuonBack-TGeant4.roottmp").exists());
}

#[test]
fn reducing_a_reduced_file_keeps_everything() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("ship.reduced.root");
    let events = vec![event(4, 1, 0), event(7, 0, 1), event(9, 3, 3)];
    write_tree(&path, &header(), &events).expect("write tree");

    let first = reduce_background(&path, Vec::new()).expect("first pass");
    let second = reduce_background(&path, Vec::new()).expect("second pass");
    assert_eq!(first.retained, 3);
    assert_eq!(second.scanned, 3);
    assert_eq!(second.retained, 3);

    let mut reader = JsonlTreeReader::open(&path).expect("open");
    assert_eq!(read_all(&mut reader), events);
}

#[test]
fn open_handle_is_reused_when_names_match() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("ship.handles.root");
    let other = dir.path().join("other.root");
    write_tree(&path, &header(), &[event(0, 0, 0), event(1, 1, 0)]).expect("write tree");
    write_tree(&other, &header(), &[event(5, 1, 1)]).expect("write other");

    let handles = vec![
        JsonlTreeReader::open(&other).expect("open other"),
        JsonlTreeReader::open(&path).expect("open source"),
    ];
    let report = reduce_background(&path, handles).expect("reduce");
    assert_eq!(report.scanned, 2);
    assert_eq!(report.retained, 1);
    let mut untouched = JsonlTreeReader::open(&other).expect("reopen other");
    assert_eq!(untouched.entries(), 1);
    assert_eq!(event_id(&untouched.read_event(0).expect("event")), 5);
}

#[test]
fn same_named_handle_in_another_directory_is_not_the_source() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("ship.MuonBack-TGeant4.root");
    let previous_dir = dir.path().join("previous");
    fs::create_dir(&previous_dir).expect("previous dir");
    let previous = previous_dir.join("ship.MuonBack-TGeant4.root");
    write_tree(&path, &header(), &[event(0, 1, 0), event(1, 0, 0), event(2, 0, 1)])
        .expect("write tree");
    write_tree(&previous, &header(), &[event(99, 1, 1)]).expect("write previous");

    let handles = vec![JsonlTreeReader::open(&previous).expect("open previous")];
    let report = reduce_background(&path, handles).expect("reduce");
    assert_eq!(report.scanned, 3);
    assert_eq!(report.retained, 2);
    let mut reduced = JsonlTreeReader::open(&path).expect("reopen");
    let ids: Vec<u64> = read_all(&mut reduced).iter().map(event_id).collect();
    assert_eq!(ids, vec![0, 2]);
    let mut untouched = JsonlTreeReader::open(&previous).expect("reopen previous");
    assert_eq!(untouched.entries(), 1);
    assert_eq!(event_id(&untouched.read_event(0).expect("event")), 99);
}

#[test]
fn corrupt_event_leaves_original_intact() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("ship.corrupt.root");
    write_tree(&path, &header(), &[event(0, 1, 0)]).expect("write tree");
    let mut bytes = fs::read(&path).expect("read");
    bytes.extend_from_slice(b"{not json\n");
    fs::write(&path, &bytes).expect("corrupt");

    let err = reduce_background(&path, Vec::new()).expect_err("corrupt tree");
    assert_eq!(err.info().code, "mts_out.tree_parse");
    assert_eq!(err.exit_code(), 1);
    assert_eq!(fs::read(&path).expect("original"), bytes);
    assert!(!dir.path().join("ship.corrupt.roottmp").exists());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let err = reduce_background(&dir.path().join("absent.root"), Vec::new())
        .expect_err("missing");
    assert_eq!(err.info().code, "mts_out.tree_read");
}

#[test]
fn hit_branches_need_marker_and_entry_counts() {
    let header = TreeHeader::new(vec![
        BranchDescriptor::new("MCTrack", BranchKind::Collection),
        BranchDescriptor::new("vetoPoint", BranchKind::Collection),
        BranchDescriptor::new("PointSummary", BranchKind::Object),
        BranchDescriptor::new("sEcalPointLite", BranchKind::Collection),
    ]);
    let names = hit_branches(&header)
        .into_iter()
        .map(|branch| branch.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["vetoPoint", "sEcalPointLite"]);
}

#[test]
fn copy_counts_scanned_and_retained() {
    let dir = tempdir().expect("tempdir");
    let src = dir.path().join("src.root");
    let dst = dir.path().join("dst.root");
    let events = (0..10)
        .map(|i| event(i, (i % 3 == 0) as usize, 0))
        .collect::<Vec<_>>();
    write_tree(&src, &header(), &events).expect("write");

    let mut reader = JsonlTreeReader::open(&src).expect("open");
    let mut writer = JsonlTreeWriter::create(&dst, reader.header()).expect("create");
    let (scanned, retained) = copy_non_empty(&mut reader, &mut writer).expect("copy");
    assert_eq!((scanned, retained), (10, 4));
    assert_eq!(mts_out::TreeWriter::finish(writer).expect("finish"), 4);
}

#[test]
fn absent_hit_branch_counts_as_empty() {
    let branch = BranchDescriptor::new("TimeDetPoint", BranchKind::Collection);
    let event = Event::default().with("MCTrack", json!([1, 2]));
    assert_eq!(event.entry_count(&branch), Some(0));
    let header = BranchDescriptor::new("MCEventHeader", BranchKind::Object);
    assert_eq!(event.entry_count(&header), None);
}
