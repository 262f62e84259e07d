//! Run plan handed to the run controller.

use mts_config::{Geometry, RunOptions, TrackSelection};
use mts_core::units::{GEV, M, MEV, MM};
use mts_gen::PrimaryGenerator;
use mts_out::{OutputPaths, OutputTag};
use serde::{Deserialize, Serialize};

/// Particle stack track selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackPolicy {
    /// Minimum number of detector points; -1 disables the requirement.
    pub min_points: i32,
    /// Energy cut in GeV; negative keeps everything with enough points.
    pub energy_cut: f64,
}

impl StackPolicy {
    /// Policy for the configured selection; deep copy only applies when no selection is set.
    pub fn select(selection: TrackSelection, deep_copy: bool) -> Option<Self> {
        match selection {
            TrackSelection::HitsOnly => Some(Self {
                min_points: 1,
                energy_cut: -100.0 * MEV,
            }),
            TrackSelection::EnergyCutOnly => Some(Self {
                min_points: -1,
                energy_cut: 100.0 * MEV,
            }),
            TrackSelection::HitsOrEnergyCut => Some(Self {
                min_points: 1,
                energy_cut: 100.0 * MEV,
            }),
            TrackSelection::Unfiltered if deep_copy => Some(Self {
                min_points: 0,
                energy_cut: 0.0,
            }),
            TrackSelection::Unfiltered => None,
        }
    }
}

/// Trajectory storage cuts for the event display, lengths in cm and energies in GeV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryFilter {
    pub step_size_cut: f64,
    pub vertex_min: [f64; 3],
    pub vertex_max: [f64; 3],
    pub momentum_cut: f64,
    pub energy_window: [f64; 2],
    pub store_primaries: bool,
    pub store_secondaries: bool,
}

impl TrajectoryFilter {
    pub fn for_target(target_z: f64) -> Self {
        Self {
            step_size_cut: 1.0 * MM,
            vertex_min: [-20.0 * M, -20.0 * M, target_z - 1.0 * M],
            vertex_max: [20.0 * M, 20.0 * M, 200.0 * M],
            momentum_cut: 0.1 * GEV,
            energy_window: [0.0, 400.0 * GEV],
            store_primaries: true,
            store_secondaries: true,
        }
    }
}

/// Diagnostics requested through `--debug`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugActions {
    pub field_dump: bool,
    pub overlap_check: bool,
}

impl DebugActions {
    pub fn from_level(level: u8) -> Self {
        Self {
            field_dump: level == 1,
            overlap_check: level == 2,
        }
    }
}

/// Everything the run controller needs to execute the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunPlan {
    pub tag: OutputTag,
    pub paths: OutputPaths,
    pub options: RunOptions,
    pub geometry: Geometry,
    pub primary: PrimaryGenerator,
    pub store_trajectories: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<StackPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory_filter: Option<TrajectoryFilter>,
    /// Field map to set up, when the geometry declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_map: Option<String>,
    pub debug: DebugActions,
}

impl RunPlan {
    pub fn new(
        options: RunOptions,
        geometry: Geometry,
        primary: PrimaryGenerator,
        tag: OutputTag,
        paths: OutputPaths,
    ) -> Self {
        let stack = StackPolicy::select(options.track_selection, options.deep_copy);
        let trajectory_filter = options
            .display
            .then(|| TrajectoryFilter::for_target(geometry.target.z0));
        Self {
            store_trajectories: options.display,
            field_map: geometry.bfield.field_map.clone(),
            debug: DebugActions::from_level(options.debug),
            stack,
            trajectory_filter,
            tag,
            paths,
            options,
            geometry,
            primary,
        }
    }

    pub fn n_events(&self) -> u64 {
        self.options.n_events
    }
}
