//! Run option resolution for the MTS simulation driver.
//!
//! Raw command line values enter as [`RawOptions`]; [`resolve`] turns them into an
//! immutable [`RunOptions`] or fails with a configuration error. The geometry side is
//! covered by [`GeometryOverlay`] and the [`GeometryRegistry`] loader.

pub mod couplings;
pub mod defaults;
pub mod engine;
pub mod geometry;
pub mod inputs;
pub mod options;
pub mod overlay;

pub use couplings::{CouplingSet, CouplingTriple};
pub use defaults::{design_preset, DesignPreset, InputCatalog, RunDefaults, TrackSelection};
pub use engine::{EngineFlags, SimEngine};
pub use geometry::{Geometry, GeometryRegistry, YamlGeometryRegistry};
pub use inputs::{check_file_exists, expand_env, InputSource};
pub use options::{
    resolve, DecayVolumeMedium, GeometryParams, HiddenSector, ParticleGun, Production,
    ProductionChannel, RawOptions, RunOptions,
};
pub use overlay::{GeometryOverlay, OverlayValue};
