//! Parameter resolution: raw command line values into one consistent [`RunOptions`].

use std::path::PathBuf;

use log::{info, warn};
use mts_core::errors::CODE_HIDDEN_SECTOR_CONFLICT;
use mts_core::{ErrorInfo, MtsError};
use serde::{Deserialize, Serialize};

use crate::couplings::{CouplingSet, CouplingTriple};
use crate::defaults::{design_preset, RunDefaults, TrackSelection, DEFAULT_DESIGN};
use crate::engine::{EngineFlags, SimEngine};
use crate::inputs::{apply_engine_rules, initial_input, InputSource};

/// Values as they arrive from the command line, before any resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOptions {
    pub engines: EngineFlags,
    /// Upper energy option of the cosmic generator, present when `--Cosmics` was given.
    pub cosmics: Option<u32>,
    pub particle_gun: ParticleGun,
    /// Production channel selector (`-A`).
    pub production: String,
    pub follow_muon: bool,
    pub fast_muon: bool,
    pub phi_random: bool,
    pub rpvsusy: bool,
    pub dark_photon: bool,
    pub susy_bench: u32,
    pub mass: Option<f64>,
    pub couplings: Option<String>,
    pub production_couplings: Option<String>,
    pub decay_couplings: Option<String>,
    pub epsilon: Option<f64>,
    pub n_events: u64,
    pub first_event: u64,
    pub seed: u64,
    pub same_seed: u64,
    pub input_file: Option<String>,
    pub shield_geofile: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Design preset supplying the geometry defaults below.
    pub design: Option<String>,
    pub tank_height: Option<f64>,
    pub tank_design: Option<u32>,
    pub shield_design: Option<u32>,
    pub target_design: Option<u32>,
    pub calo_design: Option<u32>,
    pub straw_design: Option<u32>,
    pub deep_copy: bool,
    pub test: bool,
    pub dry_run: bool,
    pub display: bool,
    pub step_muon_shield: bool,
    pub cobalt_magnets: u32,
    pub sc_magnet: bool,
    pub sc_name: String,
    pub meson_mother: bool,
    pub debug: u8,
    pub decay_volume_medium: DecayVolumeMedium,
    pub snd: bool,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            engines: EngineFlags::default(),
            cosmics: None,
            particle_gun: ParticleGun::default(),
            production: "c".to_string(),
            follow_muon: false,
            fast_muon: false,
            phi_random: false,
            rpvsusy: false,
            dark_photon: false,
            susy_bench: 2,
            mass: None,
            couplings: None,
            production_couplings: None,
            decay_couplings: None,
            epsilon: None,
            n_events: 100,
            first_event: 0,
            seed: 0,
            same_seed: 0,
            input_file: None,
            shield_geofile: None,
            output_dir: PathBuf::from("."),
            design: None,
            tank_height: None,
            tank_design: None,
            shield_design: None,
            target_design: None,
            calo_design: None,
            straw_design: None,
            deep_copy: false,
            test: false,
            dry_run: false,
            display: false,
            step_muon_shield: false,
            cobalt_magnets: 0,
            sc_magnet: true,
            sc_name: "sc_v6".to_string(),
            meson_mother: true,
            debug: 0,
            decay_volume_medium: DecayVolumeMedium::Helium,
            snd: false,
        }
    }
}

/// Particle gun settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleGun {
    /// PDG code of the shot particle.
    pub pid: i32,
    /// Start energy in GeV.
    pub e_start: f64,
    /// End energy in GeV.
    pub e_end: f64,
}

impl Default for ParticleGun {
    fn default() -> Self {
        Self {
            pid: 22,
            e_start: 10.0,
            e_end: 10.0,
        }
    }
}

/// Medium filling the decay volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayVolumeMedium {
    Helium,
    Vacuums,
}

impl DecayVolumeMedium {
    pub fn as_str(self) -> &'static str {
        match self {
            DecayVolumeMedium::Helium => "helium",
            DecayVolumeMedium::Vacuums => "vacuums",
        }
    }
}

/// Named production channels accepted by `-A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionChannel {
    #[serde(rename = "c")]
    Charm,
    #[serde(rename = "b")]
    Beauty,
    #[serde(rename = "bc")]
    CharmBeauty,
    #[serde(rename = "meson")]
    Meson,
    #[serde(rename = "pbrem")]
    ProtonBrem,
    #[serde(rename = "qcd")]
    Qcd,
}

impl ProductionChannel {
    pub fn code(self) -> &'static str {
        match self {
            ProductionChannel::Charm => "c",
            ProductionChannel::Beauty => "b",
            ProductionChannel::CharmBeauty => "bc",
            ProductionChannel::Meson => "meson",
            ProductionChannel::ProtonBrem => "pbrem",
            ProductionChannel::Qcd => "qcd",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "c" => Some(ProductionChannel::Charm),
            "b" => Some(ProductionChannel::Beauty),
            "bc" => Some(ProductionChannel::CharmBeauty),
            "meson" => Some(ProductionChannel::Meson),
            "pbrem" => Some(ProductionChannel::ProtonBrem),
            "qcd" => Some(ProductionChannel::Qcd),
            _ => None,
        }
    }
}

/// Production mode handed to the generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Production {
    Channel(ProductionChannel),
    /// Any selector outside the named channels.
    FullyInclusive,
}

impl Production {
    /// Parses `-A`. Unknown selectors, `charmonly` included, are fully inclusive.
    pub fn parse(selector: &str) -> Self {
        ProductionChannel::from_code(selector)
            .map(Production::Channel)
            .unwrap_or(Production::FullyInclusive)
    }
}

/// Hidden-sector model simulated by the Pythia8 generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiddenSector {
    #[serde(rename = "HNL")]
    HeavyNeutralLepton,
    #[serde(rename = "RPVSUSY")]
    RpvSusy,
    DarkPhoton,
}

impl HiddenSector {
    /// Selects the model. Heavy neutral leptons are the implicit default unless
    /// charm-only sampling, RPV-SUSY or dark photons are requested.
    pub fn select(
        charm_only: bool,
        rpvsusy: bool,
        dark_photon: bool,
    ) -> Result<Option<Self>, MtsError> {
        let hnl = !(charm_only || rpvsusy || dark_photon);
        let active = [hnl, rpvsusy, dark_photon].iter().filter(|on| **on).count();
        if active > 1 {
            return Err(MtsError::Config(
                ErrorInfo::new(
                    CODE_HIDDEN_SECTOR_CONFLICT,
                    "cannot have HNL and SUSY or DP at the same time",
                )
                .with_context("hnl", hnl.to_string())
                .with_context("rpvsusy", rpvsusy.to_string())
                .with_context("dark_photon", dark_photon.to_string()),
            ));
        }
        if charm_only {
            if rpvsusy || dark_photon {
                warn!("charm-only sampling requested; hidden-sector generator flags are ignored");
            }
            return Ok(None);
        }
        Ok(Some(if rpvsusy {
            HiddenSector::RpvSusy
        } else if dark_photon {
            HiddenSector::DarkPhoton
        } else {
            HiddenSector::HeavyNeutralLepton
        }))
    }
}

/// Geometry-affecting scalars forwarded to the configuration overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryParams {
    pub tank_height: f64,
    pub tank_design: u32,
    pub shield_design: u32,
    pub target_design: u32,
    pub calo_design: u32,
    pub straw_design: u32,
    pub shield_geofile: Option<PathBuf>,
    pub step_muon_shield: bool,
    pub cobalt_magnets: u32,
    pub sc_magnet: bool,
    pub sc_name: String,
    pub decay_volume_medium: DecayVolumeMedium,
    pub snd: bool,
}

/// Fully resolved run configuration; read-only after [`resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    pub engine: SimEngine,
    pub mc_engine: String,
    pub production: Production,
    pub charm_only: bool,
    /// `None` when charm-only sampling replaces the hidden-sector generator.
    pub hidden_sector: Option<HiddenSector>,
    /// Hidden particle mass in GeV.
    pub mass: f64,
    /// Combined triple from `-c`; RPV-SUSY reads its couplings and stop mass from it.
    pub combined_couplings: CouplingTriple,
    pub couplings: CouplingSet,
    pub epsilon: f64,
    pub susy_bench: u32,
    pub mother_mode: bool,
    pub input: InputSource,
    pub particle_gun: ParticleGun,
    pub cosmics_high: Option<u32>,
    pub follow_muon: bool,
    pub fast_muon: bool,
    pub phi_random: bool,
    pub n_events: u64,
    pub first_event: u64,
    pub seed: u64,
    pub same_seed: u64,
    pub geometry: GeometryParams,
    pub output_dir: PathBuf,
    pub deep_copy: bool,
    pub display: bool,
    pub dry_run: bool,
    pub debug: u8,
    pub track_selection: TrackSelection,
}

impl RunOptions {
    pub fn is_hidden_sector(&self, sector: HiddenSector) -> bool {
        self.hidden_sector == Some(sector)
    }
}

/// Resolves raw options against the run defaults.
///
/// Fails on conflicting hidden-sector selections, partial or malformed coupling
/// specifications, unknown design presets and missing required inputs. Nothing is
/// allocated on disk before this returns.
pub fn resolve(raw: &RawOptions, defaults: &RunDefaults) -> Result<RunOptions, MtsError> {
    let engine = raw.engines.resolve();
    if raw.engines.count() > 1 {
        warn!(
            "{} generator flags given; {} wins by evaluation order",
            raw.engines.count(),
            engine
        );
    }

    let production = Production::parse(&raw.production);
    let charm_only = raw.production.eq_ignore_ascii_case("charmonly");
    let input = initial_input(
        &defaults.catalog,
        raw.production == "b",
        raw.input_file.as_deref(),
        raw.test,
    );

    let hidden_sector = HiddenSector::select(charm_only, raw.rpvsusy, raw.dark_photon)?;

    let mass = match raw.mass.filter(|mass| *mass != 0.0) {
        Some(mass) => mass,
        None if raw.dark_photon => defaults.dark_photon_mass,
        None => defaults.hnl_mass,
    };

    let combined = raw.couplings.as_deref().unwrap_or(&defaults.couplings);
    let combined_couplings = CouplingTriple::parse(combined)?;
    let couplings = CouplingSet::resolve(
        combined,
        raw.production_couplings.as_deref(),
        raw.decay_couplings.as_deref(),
    )?;

    let input = apply_engine_rules(engine, input, &defaults.catalog)?;
    let geometry = resolve_geometry(raw)?;

    info!(
        "setup for {} to produce {} events",
        engine.name(),
        raw.n_events
    );

    Ok(RunOptions {
        engine,
        mc_engine: defaults.mc_engine.clone(),
        production,
        charm_only,
        hidden_sector,
        mass,
        combined_couplings,
        couplings,
        epsilon: raw.epsilon.unwrap_or(defaults.epsilon),
        susy_bench: raw.susy_bench,
        mother_mode: raw.meson_mother,
        input,
        particle_gun: raw.particle_gun,
        cosmics_high: raw.cosmics,
        follow_muon: raw.follow_muon,
        fast_muon: raw.fast_muon,
        phi_random: raw.phi_random,
        n_events: raw.n_events,
        first_event: raw.first_event,
        seed: raw.seed,
        same_seed: raw.same_seed,
        geometry,
        output_dir: raw.output_dir.clone(),
        deep_copy: raw.deep_copy,
        display: raw.display,
        dry_run: raw.dry_run,
        debug: raw.debug,
        track_selection: defaults.track_selection,
    })
}

fn resolve_geometry(raw: &RawOptions) -> Result<GeometryParams, MtsError> {
    let design = raw.design.as_deref().unwrap_or(DEFAULT_DESIGN);
    let preset = design_preset(design).ok_or_else(|| {
        MtsError::Config(
            ErrorInfo::new("mts_config.unknown_design", "unknown global design")
                .with_context("design", design)
                .with_hint("use one of 2016, 2018, 2022, 2023"),
        )
    })?;
    Ok(GeometryParams {
        tank_height: raw.tank_height.unwrap_or(preset.tank_height),
        tank_design: raw.tank_design.unwrap_or(preset.tank_design),
        shield_design: raw.shield_design.unwrap_or(preset.shield_design),
        target_design: raw.target_design.unwrap_or(preset.target_design),
        calo_design: raw.calo_design.unwrap_or(preset.calo_design),
        straw_design: raw.straw_design.unwrap_or(preset.straw_design),
        shield_geofile: raw.shield_geofile.clone(),
        step_muon_shield: raw.step_muon_shield,
        cobalt_magnets: raw.cobalt_magnets,
        sc_magnet: raw.sc_magnet,
        sc_name: raw.sc_name.clone(),
        decay_volume_medium: raw.decay_volume_medium,
        snd: raw.snd,
    })
}
