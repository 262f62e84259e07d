//! Run defaults file and global design presets.

use std::fs;
use std::path::{Path, PathBuf};

use mts_core::{ErrorInfo, MtsError};
use serde::{Deserialize, Serialize};

/// Name of the preset used when `--design` is not given.
pub const DEFAULT_DESIGN: &str = "2023";

/// Defaults that are not exposed as individual flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDefaults {
    /// Transport engine name recorded in the output tag.
    #[serde(default = "default_mc_engine")]
    pub mc_engine: String,
    /// Heavy neutral lepton mass in GeV used when no mass is given.
    #[serde(default = "default_hnl_mass")]
    pub hnl_mass: f64,
    /// Dark photon mass in GeV used when no mass is given.
    #[serde(default = "default_dark_photon_mass")]
    pub dark_photon_mass: f64,
    /// Combined coupling triple used when `-c` is not given.
    #[serde(default = "default_couplings")]
    pub couplings: String,
    /// Dark photon kinetic mixing used when `-e` is not given.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Default physics samples per engine.
    #[serde(default)]
    pub catalog: InputCatalog,
    /// Which MC tracks the stack keeps.
    #[serde(default)]
    pub track_selection: TrackSelection,
}

fn default_mc_engine() -> String {
    "TGeant4".to_string()
}

fn default_hnl_mass() -> f64 {
    1.0
}

fn default_dark_photon_mass() -> f64 {
    0.2
}

fn default_couplings() -> String {
    "0.447e-9,7.15e-9,1.88e-9".to_string()
}

fn default_epsilon() -> f64 {
    0.000_000_08
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            mc_engine: default_mc_engine(),
            hnl_mass: default_hnl_mass(),
            dark_photon_mass: default_dark_photon_mass(),
            couplings: default_couplings(),
            epsilon: default_epsilon(),
            catalog: InputCatalog::default(),
            track_selection: TrackSelection::default(),
        }
    }
}

impl RunDefaults {
    /// Loads defaults from a YAML file; absent keys keep their built-in values.
    pub fn load(path: &Path) -> Result<Self, MtsError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            MtsError::Serde(
                ErrorInfo::new("mts_config.defaults_read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_yaml::from_str(&contents).map_err(|err| {
            MtsError::Serde(
                ErrorInfo::new("mts_config.defaults_parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Default physics sample locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputCatalog {
    pub charm: PathBuf,
    pub beauty: PathBuf,
    pub test: PathBuf,
    pub genie: PathBuf,
    pub nuage: PathBuf,
}

impl Default for InputCatalog {
    fn default() -> Self {
        Self {
            charm: "/eos/experiment/ship/data/Charm/Cascade-parp16-MSTP82-1-MSEL4-978Bpot.root"
                .into(),
            beauty:
                "/eos/experiment/ship/data/Beauty/Cascade-run0-19-parp16-MSTP82-1-MSEL5-5338Bpot.root"
                    .into(),
            test: "$FAIRSHIP/files/Cascade-parp16-MSTP82-1-MSEL4-76Mpot_1_5000.root".into(),
            genie: "/eos/experiment/ship/data/GenieEvents/genie-nu_mu.root".into(),
            nuage: "Numucc.root".into(),
        }
    }
}

/// MC track selection applied by the particle stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSelection {
    /// Keep tracks that left at least one hit.
    HitsOnly,
    /// Keep tracks above the energy cut.
    #[default]
    EnergyCutOnly,
    /// Keep tracks with a hit or above the energy cut.
    HitsOrEnergyCut,
    /// No selection policy; deep copy keeps everything when requested.
    Unfiltered,
}

/// Geometry defaults of one global design iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignPreset {
    /// Maximum height of the decay vessel in metres.
    pub tank_height: f64,
    pub tank_design: u32,
    pub shield_design: u32,
    pub target_design: u32,
    pub calo_design: u32,
    pub straw_design: u32,
}

/// Looks up a design preset by year label.
pub fn design_preset(name: &str) -> Option<DesignPreset> {
    let preset = |tank_height, tank_design, shield_design, target_design, calo, straw| DesignPreset {
        tank_height,
        tank_design,
        shield_design,
        target_design,
        calo_design: calo,
        straw_design: straw,
    };
    match name {
        "2016" => Some(preset(10.0, 5, 7, 1, 0, 4)),
        "2018" => Some(preset(10.0, 6, 9, 3, 3, 10)),
        "2022" => Some(preset(8.0, 6, 9, 3, 3, 10)),
        "2023" => Some(preset(6.0, 6, 8, 4, 3, 10)),
        _ => None,
    }
}
