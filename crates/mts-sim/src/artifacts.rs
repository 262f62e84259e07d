//! Parameter file, geometry snapshot and basic-parameters export.

use std::fs;
use std::path::Path;

use chrono::Utc;
use mts_config::{GeometryOverlay, RunOptions};
use mts_core::{stable_hash_string, to_canonical_json_bytes, MtsError};
use mts_gen::{FiducialWindow, PrimaryGenerator};
use mts_out::OutputTag;
use serde::{Deserialize, Serialize};

use crate::controller::RunSummary;
use crate::plan::RunPlan;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterFile {
    pub tag: OutputTag,
    pub created_at: String,
    /// SHA-256 of the canonical resolved options.
    pub options_hash: String,
    pub options: RunOptions,
    pub primary: PrimaryGenerator,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicParameters {
    pub tag: OutputTag,
    pub overlay: GeometryOverlay,
    pub target_z0: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay_window: Option<FiducialWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_map: Option<String>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), MtsError> {
    let bytes = to_canonical_json_bytes(value)?;
    fs::write(path, bytes)
        .map_err(|err| MtsError::io(MtsError::Output, "mts_sim.artifact_write", path, err))
}

/// Writes the three run artifacts next to the event file.
pub fn write_artifacts(
    plan: &RunPlan,
    overlay: &GeometryOverlay,
    summary: &RunSummary,
) -> Result<(), MtsError> {
    let params = ParameterFile {
        tag: plan.tag.clone(),
        created_at: Utc::now().to_rfc3339(),
        options_hash: stable_hash_string(&plan.options)?,
        options: plan.options.clone(),
        primary: plan.primary.clone(),
        summary: summary.clone(),
    };
    write_json(&plan.paths.param_file, &params)?;
    write_json(&plan.paths.geometry_file, &plan.geometry)?;
    let basic = BasicParameters {
        tag: plan.tag.clone(),
        overlay: overlay.clone(),
        target_z0: plan.geometry.target.z0,
        decay_window: FiducialWindow::from_geometry(&plan.geometry).ok(),
        field_map: plan.geometry.bfield.field_map.clone(),
    };
    write_json(&plan.paths.basic_params_file, &basic)
}
