use std::path::PathBuf;

use mts_config::{CouplingTriple, Production};
use serde::{Deserialize, Serialize};

use crate::window::FiducialWindow;

/// External event file read by a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalInput {
    pub path: PathBuf,
    pub first_event: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenLeptonParams {
    pub mass: f64,
    pub production_couplings: CouplingTriple,
    pub decay_couplings: CouplingTriple,
    pub production: Production,
    pub deep_copy: bool,
    pub external_input: Option<ExternalInput>,
    pub settings: Vec<String>,
    pub window: FiducialWindow,
    pub smear_beam: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpvSusyParams {
    pub mass: f64,
    /// Production and decay RPV couplings.
    pub couplings: [f64; 2],
    /// Stop mass in GeV.
    pub stop_mass: f64,
    pub benchmark: u32,
    pub production: Production,
    pub deep_copy: bool,
    pub external_input: Option<ExternalInput>,
    pub settings: Vec<String>,
    pub window: FiducialWindow,
    pub smear_beam: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkPhotonParams {
    pub mass: f64,
    pub epsilon: f64,
    /// Particle code the generator emits for the dark photon.
    pub pdg_id: i32,
    pub production: Production,
    pub mother_mode: bool,
    pub deep_copy: bool,
    pub window: FiducialWindow,
    pub smear_beam: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharmOnlyParams {
    pub input: ExternalInput,
    pub target_volume: String,
}

/// One generator graph; built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GeneratorSpec {
    #[serde(rename = "Pythia-HNL")]
    Hnl(HiddenLeptonParams),
    #[serde(rename = "Pythia-RPVSUSY")]
    RpvSusy(RpvSusyParams),
    #[serde(rename = "Pythia-DarkPhoton")]
    DarkPhoton(DarkPhotonParams),
    #[serde(rename = "Pythia-CharmOnly")]
    CharmOnly(CharmOnlyParams),
}

impl GeneratorSpec {
    /// Framework generator class instantiated for this variant. HNL and RPV-SUSY share one.
    pub fn generator_type(&self) -> &'static str {
        match self {
            GeneratorSpec::Hnl(_) | GeneratorSpec::RpvSusy(_) => "HNLPythia8Generator",
            GeneratorSpec::DarkPhoton(_) => "DPPythia8Generator",
            GeneratorSpec::CharmOnly(_) => "Pythia8Generator",
        }
    }

    pub fn window(&self) -> Option<FiducialWindow> {
        match self {
            GeneratorSpec::Hnl(params) => Some(params.window),
            GeneratorSpec::RpvSusy(params) => Some(params.window),
            GeneratorSpec::DarkPhoton(params) => Some(params.window),
            GeneratorSpec::CharmOnly(_) => None,
        }
    }
}
