#![allow(dead_code)]

use std::cell::Cell;
use std::path::{Path, PathBuf};

use mts_config::{Geometry, GeometryOverlay, GeometryRegistry, RawOptions, YamlGeometryRegistry};
use mts_core::MtsError;
use mts_out::{
    write_tree, BranchDescriptor, BranchKind, Event, JsonlTreeReader, TreeHeader,
};
use mts_sim::{RunController, RunPlan, RunSummary};
use serde_json::json;

pub fn bundled_geometry() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("geometry/mts_config.yaml")
}

/// Registry that counts how often the geometry was requested.
pub struct SpyRegistry {
    inner: YamlGeometryRegistry,
    pub loads: Cell<usize>,
}

impl SpyRegistry {
    pub fn bundled() -> Self {
        Self {
            inner: YamlGeometryRegistry::new(bundled_geometry()),
            loads: Cell::new(0),
        }
    }
}

impl GeometryRegistry for SpyRegistry {
    fn load(&self, overlay: &GeometryOverlay) -> Result<Geometry, MtsError> {
        self.loads.set(self.loads.get() + 1);
        self.inner.load(overlay)
    }
}

/// In-process controller writing a canned event tree.
#[derive(Default)]
pub struct FakeController {
    pub inits: usize,
    pub runs: usize,
    pub events: Vec<Event>,
    pub keep_handle: bool,
    pub retries: Option<u64>,
    pub event_file: Option<PathBuf>,
}

impl RunController for FakeController {
    fn init(&mut self, plan: &RunPlan) -> Result<(), MtsError> {
        self.inits += 1;
        self.event_file = Some(plan.paths.event_file.clone());
        Ok(())
    }

    fn run(&mut self, plan: &RunPlan) -> Result<RunSummary, MtsError> {
        self.runs += 1;
        if !self.events.is_empty() {
            write_tree(&plan.paths.event_file, &header(), &self.events)?;
        }
        Ok(RunSummary {
            executed: true,
            retries: self.retries,
            dark_photons: None,
        })
    }

    fn open_handles(&mut self) -> Vec<JsonlTreeReader> {
        match (&self.event_file, self.keep_handle) {
            (Some(path), true) => JsonlTreeReader::open(path).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

pub fn header() -> TreeHeader {
    TreeHeader::new(vec![
        BranchDescriptor::new("MCTrack", BranchKind::Collection),
        BranchDescriptor::new("vetoPoint", BranchKind::Collection),
        BranchDescriptor::new("MCEventHeader", BranchKind::Object),
    ])
}

pub fn muon_event(id: u64, veto_hits: usize) -> Event {
    Event::default()
        .with("MCTrack", json!([{ "pdg": 13 }]))
        .with("vetoPoint", json!(vec![json!({ "z": -2400.0 }); veto_hits]))
        .with("MCEventHeader", json!({ "event": id }))
}

/// Pythia8 HNL run without an input sample writing into `out`.
pub fn raw(out: &Path) -> RawOptions {
    RawOptions {
        input_file: Some("none".into()),
        output_dir: out.to_path_buf(),
        ..RawOptions::default()
    }
}
