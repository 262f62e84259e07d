use log::info;
use mts_config::{check_file_exists, Geometry, HiddenSector, RunOptions, SimEngine};
use mts_core::units::CM;
use mts_core::{ErrorInfo, MtsError};

use crate::dark_photon::{dark_photon_pdg, DarkPhotonCheck};
use crate::primary::{BeamProfile, BeamSpot, PrimaryGenerator};
use crate::spec::{
    CharmOnlyParams, DarkPhotonParams, ExternalInput, GeneratorSpec, HiddenLeptonParams,
    RpvSusyParams,
};
use crate::window::FiducialWindow;

/// Beam smearing radius applied to every hidden-sector generator.
pub const BEAM_SMEAR_RADIUS: f64 = 1.0 * CM;

/// Gaussian beam spot width used for charm-only sampling, in cm.
const GAUSSIAN_BEAM_WIDTH: f64 = 0.5;

/// Pythia process-level switch: events come from the external input file.
const PROCESS_LEVEL_OFF: &str = "ProcessLevel:all = off";

const CHARM_TARGET_VOLUME: &str = "volTarget_1";

/// Builds the primary generator for the run.
///
/// Only the Pythia8 engine is wired here; other engines leave the container empty and
/// the run controller selects their generator by engine name.
pub fn assemble(
    options: &RunOptions,
    geometry: &Geometry,
    check: &dyn DarkPhotonCheck,
) -> Result<PrimaryGenerator, MtsError> {
    let mut primary = PrimaryGenerator::default();
    if options.engine != SimEngine::Pythia8 {
        info!("{} events are generated by the run controller", options.engine);
        return Ok(primary);
    }
    primary.set_target(geometry.target.z0, 0.0);

    let spec = match options.hidden_sector {
        Some(HiddenSector::HeavyNeutralLepton) => hnl(options, geometry)?,
        Some(HiddenSector::RpvSusy) => rpvsusy(options, geometry)?,
        Some(HiddenSector::DarkPhoton) => dark_photon(options, geometry, check)?,
        None => charm_only(options, geometry, &mut primary)?,
    };
    info!("attached {} to the primary generator", spec.generator_type());
    primary.add_generator(spec);
    Ok(primary)
}

fn external_input(options: &RunOptions) -> Result<Option<ExternalInput>, MtsError> {
    options
        .input
        .path
        .as_deref()
        .map(|path| {
            Ok(ExternalInput {
                path: check_file_exists(path)?,
                first_event: options.first_event,
            })
        })
        .transpose()
}

fn hnl(options: &RunOptions, geometry: &Geometry) -> Result<GeneratorSpec, MtsError> {
    let production = options.couplings.production();
    let decay = options.couplings.decay();
    info!("generating HNL events of mass {:.3} GeV", options.mass);
    if production == decay {
        info!("and with couplings {production}");
    } else {
        info!("and with couplings {production} at production and {decay} at decay");
    }
    Ok(GeneratorSpec::Hnl(HiddenLeptonParams {
        mass: options.mass,
        production_couplings: production,
        decay_couplings: decay,
        production: options.production,
        deep_copy: options.deep_copy,
        external_input: external_input(options)?,
        settings: vec![PROCESS_LEVEL_OFF.to_string()],
        window: FiducialWindow::from_geometry(geometry)?,
        smear_beam: BEAM_SMEAR_RADIUS,
    }))
}

fn rpvsusy(options: &RunOptions, geometry: &Geometry) -> Result<GeneratorSpec, MtsError> {
    let [c0, c1, stop_mass] = options.combined_couplings.values();
    info!("generating RPVSUSY events of mass {:.3} GeV", options.mass);
    info!("and with couplings [{c0:.3e}, {c1:.3e}] and stop mass {stop_mass:.3} GeV");
    Ok(GeneratorSpec::RpvSusy(RpvSusyParams {
        mass: options.mass,
        couplings: [c0, c1],
        stop_mass,
        benchmark: options.susy_bench,
        production: options.production,
        deep_copy: options.deep_copy,
        external_input: external_input(options)?,
        settings: vec![PROCESS_LEVEL_OFF.to_string()],
        window: FiducialWindow::from_geometry(geometry)?,
        smear_beam: BEAM_SMEAR_RADIUS,
    }))
}

fn dark_photon(
    options: &RunOptions,
    geometry: &Geometry,
    check: &dyn DarkPhotonCheck,
) -> Result<GeneratorSpec, MtsError> {
    let params = DarkPhotonParams {
        mass: options.mass,
        epsilon: options.epsilon,
        pdg_id: dark_photon_pdg(options.production),
        production: options.production,
        mother_mode: options.mother_mode,
        deep_copy: options.deep_copy,
        window: FiducialWindow::from_geometry(geometry)?,
        smear_beam: BEAM_SMEAR_RADIUS,
    };
    check.check(&params).map_err(|reason| {
        MtsError::Generator(
            ErrorInfo::new("mts_gen.dark_photon_rejected", "dark photon configuration rejected")
                .with_context("mass", params.mass.to_string())
                .with_context("epsilon", params.epsilon.to_string())
                .with_context("reason", reason),
        )
    })?;
    info!(
        "generating dark photon events of mass {:.3} GeV with epsilon {:e}",
        params.mass, params.epsilon
    );
    Ok(GeneratorSpec::DarkPhoton(params))
}

fn charm_only(
    options: &RunOptions,
    geometry: &Geometry,
    primary: &mut PrimaryGenerator,
) -> Result<GeneratorSpec, MtsError> {
    primary.set_target(0.0, 0.0);
    let path = options.input.path.as_deref().ok_or_else(|| {
        MtsError::Input(
            ErrorInfo::new("mts_gen.charm_input_missing", "charm-only sampling needs an input file")
                .with_hint("drop `-f none` or pass a charm sample with -f"),
        )
    })?;
    let path = check_file_exists(path)?;
    let beam_box = &geometry.beam_box;
    primary.beam = Some(if beam_box.gausbeam {
        BeamSpot {
            x: 0.0,
            y: 0.0,
            width_x: GAUSSIAN_BEAM_WIDTH,
            width_y: GAUSSIAN_BEAM_WIDTH,
            profile: BeamProfile::Gaussian,
        }
    } else {
        BeamSpot {
            x: 0.0,
            y: 0.0,
            width_x: beam_box.tx - 1.0,
            width_y: beam_box.ty - 1.0,
            profile: BeamProfile::Flat,
        }
    });
    Ok(GeneratorSpec::CharmOnly(CharmOnlyParams {
        input: ExternalInput {
            path,
            first_event: options.first_event,
        },
        target_volume: CHARM_TARGET_VOLUME.to_string(),
    }))
}
