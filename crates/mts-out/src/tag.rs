use std::fmt;
use std::path::{Path, PathBuf};

use mts_config::{RunOptions, SimEngine};
use serde::{Deserialize, Serialize};

/// Tank designs above this value are conical and prefix the tag with `conical.`.
pub const CONICAL_TANK_THRESHOLD: u32 = 4;

/// Deterministic label shared by every artifact of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputTag(String);

impl OutputTag {
    pub fn from_options(options: &RunOptions) -> Self {
        let engine = options.engine.name();
        let mc = &options.mc_engine;
        let mut tag = if options.charm_only {
            format!("{engine}CharmOnly-{mc}")
        } else if options.engine == SimEngine::ParticleGun {
            format!("{engine}_{}-{mc}", options.particle_gun.pid)
        } else {
            format!("{engine}-{mc}")
        };
        if options.display {
            tag.push_str("_D");
        }
        if options.geometry.tank_design > CONICAL_TANK_THRESHOLD {
            tag.insert_str(0, "conical.");
        }
        Self(tag)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Artifact locations derived from the output directory and the tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub dir: PathBuf,
    /// Event file written by the run controller.
    pub event_file: PathBuf,
    pub param_file: PathBuf,
    pub geometry_file: PathBuf,
    pub basic_params_file: PathBuf,
    pub run_plan: PathBuf,
    pub log_file: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: &Path, tag: &OutputTag) -> Self {
        Self {
            dir: dir.to_path_buf(),
            event_file: dir.join(format!("ship.{tag}.root")),
            param_file: dir.join(format!("ship.params.{tag}.json")),
            geometry_file: dir.join(format!("geofile_full.{tag}.json")),
            basic_params_file: dir.join(format!("basic_params.{tag}.json")),
            run_plan: dir.join(format!("run_plan.{tag}.json")),
            log_file: dir.join(format!("mts-sim.{tag}.log")),
        }
    }
}
