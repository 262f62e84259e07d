use serde::{Deserialize, Serialize};

use crate::spec::GeneratorSpec;

/// Target position handed to the primary generator, in cm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPosition {
    pub z: f64,
    pub dz: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeamProfile {
    Gaussian,
    Flat,
}

/// Transverse vertex smearing of the primary beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamSpot {
    pub x: f64,
    pub y: f64,
    pub width_x: f64,
    pub width_y: f64,
    pub profile: BeamProfile,
}

/// Container owning the generators of a run. Ownership passes to the run controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryGenerator {
    pub target: Option<TargetPosition>,
    pub beam: Option<BeamSpot>,
    generators: Vec<GeneratorSpec>,
}

impl PrimaryGenerator {
    pub fn set_target(&mut self, z: f64, dz: f64) {
        self.target = Some(TargetPosition { z, dz });
    }

    pub fn add_generator(&mut self, spec: GeneratorSpec) {
        self.generators.push(spec);
    }

    pub fn generators(&self) -> &[GeneratorSpec] {
        &self.generators
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}
