//! Run driver for MTS detector simulations: command line, logging, run plan, external
//! run controller and artifact export on top of the `mts-config`, `mts-gen` and
//! `mts-out` crates.

pub mod artifacts;
pub mod cli;
pub mod controller;
pub mod logging;
pub mod plan;
pub mod run;

pub use artifacts::{write_artifacts, BasicParameters, ParameterFile};
pub use cli::{resolve_geometry, Cli, DEFAULT_GEOMETRY};
pub use controller::{ExternalKernel, RunController, RunSummary};
pub use logging::LogSink;
pub use plan::{DebugActions, RunPlan, StackPolicy, TrajectoryFilter};
pub use run::{execute, RunReport};
