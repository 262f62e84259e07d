//! End-to-end run sequence.

use std::path::PathBuf;
use std::time::Instant;

use log::info;
use mts_config::{
    resolve, GeometryOverlay, GeometryRegistry, HiddenSector, RawOptions, RunDefaults, SimEngine,
};
use mts_core::MtsError;
use mts_gen::{assemble, DarkPhotonCheck};
use mts_out::{purge_stale, reduce_background, OutputPaths, OutputTag, ReductionReport};
use serde::Serialize;

use crate::artifacts::write_artifacts;
use crate::controller::{RunController, RunSummary};
use crate::logging::LogSink;
use crate::plan::RunPlan;

/// What a finished invocation did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub tag: OutputTag,
    pub paths: OutputPaths,
    pub purged: Vec<PathBuf>,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction: Option<ReductionReport>,
    /// Wall-clock time of the whole invocation in seconds.
    pub real_time: f64,
}

/// Resolves options, loads the geometry, assembles the generator and drives the run.
///
/// Sequential: resolution, geometry, stale-file purge, assembly, controller init, an
/// optional dry-run exit, the run itself, artifact export and, for muon background
/// runs, the reduction pass. Every failure is terminal.
pub fn execute(
    raw: &RawOptions,
    defaults: &RunDefaults,
    registry: &dyn GeometryRegistry,
    controller: &mut dyn RunController,
    check: &dyn DarkPhotonCheck,
    log_sink: &LogSink,
) -> Result<RunReport, MtsError> {
    let started = Instant::now();
    let options = resolve(raw, defaults)?;
    let overlay = GeometryOverlay::from_options(&options);
    let geometry = registry.load(&overlay)?;

    let tag = OutputTag::from_options(&options);
    let paths = OutputPaths::new(&options.output_dir, &tag);
    let purged = purge_stale(&paths.dir, &tag)?;
    log_sink.attach(&paths.log_file)?;

    let primary = assemble(&options, &geometry, check)?;
    let plan = RunPlan::new(options, geometry, primary, tag, paths);
    controller.init(&plan)?;
    if plan.options.dry_run {
        info!("dry run, stopping after initialisation");
        return Ok(RunReport {
            tag: plan.tag,
            paths: plan.paths,
            purged,
            dry_run: true,
            summary: None,
            reduction: None,
            real_time: started.elapsed().as_secs_f64(),
        });
    }

    let summary = controller.run(&plan)?;
    write_artifacts(&plan, &overlay, &summary)?;
    let reduction = if plan.options.engine == SimEngine::MuonBack && summary.executed {
        Some(reduce_background(
            &plan.paths.event_file,
            controller.open_handles(),
        )?)
    } else {
        None
    };

    let real_time = started.elapsed().as_secs_f64();
    report_counters(&plan, &summary);
    info!("output file is {}", plan.paths.event_file.display());
    info!("parameter file is {}", plan.paths.param_file.display());
    info!("real time {real_time:.3} s");
    Ok(RunReport {
        tag: plan.tag,
        paths: plan.paths,
        purged,
        dry_run: false,
        summary: Some(summary),
        reduction,
        real_time,
    })
}

fn report_counters(plan: &RunPlan, summary: &RunSummary) {
    let Some(retries) = summary.retries else {
        return;
    };
    let options = &plan.options;
    if options.is_hidden_sector(HiddenSector::HeavyNeutralLepton) {
        info!("number of retries, events without HNL {retries}");
    } else if options.is_hidden_sector(HiddenSector::DarkPhoton) {
        info!("number of retries, events without dark photons {retries}");
        if let Some(count) = summary.dark_photons {
            info!(
                "total number of dark photons, including multiple meson decays per collision {count}"
            );
        }
    }
}
