use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use mts_core::{ErrorInfo, MtsError};
use mts_out::JsonlTreeReader;
use serde::{Deserialize, Serialize};

use crate::plan::RunPlan;

/// Counters reported by the run controller after the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// False when the controller only prepared the run.
    pub executed: bool,
    /// Retries of the hidden-sector generator (events without a hidden particle).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_photons: Option<u64>,
}

/// Framework side of a run: geometry construction, transport and event output.
pub trait RunController {
    /// Prepares the run. Nothing is simulated before [`RunController::run`].
    fn init(&mut self, plan: &RunPlan) -> Result<(), MtsError>;

    /// Simulates the planned events into the event file. Blocks until done.
    fn run(&mut self, plan: &RunPlan) -> Result<RunSummary, MtsError>;

    /// Tree handles still held after the run.
    fn open_handles(&mut self) -> Vec<JsonlTreeReader> {
        Vec::new()
    }
}

#[derive(Debug, Deserialize)]
struct KernelReport {
    #[serde(default)]
    retries: Option<u64>,
    #[serde(default)]
    dark_photons: Option<u64>,
}

/// Controller delegating the run to an external kernel program.
///
/// `init` writes the run plan as JSON; `run` invokes the kernel with the plan path as its
/// only argument. The last stdout line may carry a JSON summary with `retries` and
/// `dark_photons`. Without a kernel the run stops after the plan is written.
#[derive(Debug, Clone, Default)]
pub struct ExternalKernel {
    program: Option<PathBuf>,
}

impl ExternalKernel {
    pub fn new(program: Option<PathBuf>) -> Self {
        Self { program }
    }
}

fn kernel_error(code: &str, message: impl Into<String>, program: &Path) -> MtsError {
    MtsError::Output(
        ErrorInfo::new(code, message).with_context("kernel", program.display().to_string()),
    )
}

impl RunController for ExternalKernel {
    fn init(&mut self, plan: &RunPlan) -> Result<(), MtsError> {
        let path = &plan.paths.run_plan;
        let json = serde_json::to_vec_pretty(plan).map_err(|err| {
            MtsError::Serde(ErrorInfo::new("mts_sim.run_plan_encode", err.to_string()))
        })?;
        fs::write(path, json)
            .map_err(|err| MtsError::io(MtsError::Output, "mts_sim.run_plan_write", path, err))?;
        info!("run plan written to {}", path.display());
        Ok(())
    }

    fn run(&mut self, plan: &RunPlan) -> Result<RunSummary, MtsError> {
        let Some(program) = &self.program else {
            info!("no kernel configured, stopping after the run plan");
            return Ok(RunSummary::default());
        };
        info!("running {} events with {}", plan.n_events(), program.display());
        let output = Command::new(program)
            .arg(&plan.paths.run_plan)
            .output()
            .map_err(|err| kernel_error("mts_sim.kernel_spawn", err.to_string(), program))?;
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!("kernel: {line}");
        }
        if !output.status.success() {
            return Err(MtsError::Output(
                ErrorInfo::new("mts_sim.kernel_failed", "kernel exited unsuccessfully")
                    .with_context("kernel", program.display().to_string())
                    .with_context("status", output.status.to_string()),
            ));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let report = stdout
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| serde_json::from_str::<KernelReport>(line).ok());
        if report.is_none() {
            debug!("kernel printed no summary");
        }
        Ok(RunSummary {
            executed: true,
            retries: report.as_ref().and_then(|r| r.retries),
            dark_photons: report.as_ref().and_then(|r| r.dark_photons),
        })
    }
}
