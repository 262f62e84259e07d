#![allow(dead_code)]

use mts_out::{BranchDescriptor, BranchKind, Event, TreeHeader};
use serde_json::{json, Value};

pub fn header() -> TreeHeader {
    TreeHeader::new(vec![
        BranchDescriptor::new("MCTrack", BranchKind::Collection),
        BranchDescriptor::new("vetoPoint", BranchKind::Collection),
        BranchDescriptor::new("strawtubesPoint", BranchKind::Collection),
        BranchDescriptor::new("MCEventHeader", BranchKind::Object),
    ])
}

fn hits(count: usize) -> Value {
    Value::Array((0..count).map(|i| json!({ "trackID": i, "z": 10.0 * i as f64 })).collect())
}

/// Event with `veto` and `straw` hit entries plus one track.
pub fn event(id: u64, veto: usize, straw: usize) -> Event {
    Event::default()
        .with("MCTrack", json!([{ "pdg": 13, "id": id }]))
        .with("vetoPoint", hits(veto))
        .with("strawtubesPoint", hits(straw))
        .with("MCEventHeader", json!({ "event": id }))
}

pub fn event_id(event: &Event) -> u64 {
    event.0["MCEventHeader"]["event"].as_u64().unwrap_or(u64::MAX)
}
