use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use mts_config::{expand_env, DecayVolumeMedium, EngineFlags, ParticleGun, RawOptions};

/// Base geometry used when `--geometry` is not given.
pub const DEFAULT_GEOMETRY: &str = "$MTS/geometry/mts_config.yaml";

/// Command line of the run driver. Flag names follow the historical run script.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mts-sim",
    version,
    about = "Configure and launch an MTS detector simulation run"
)]
pub struct Cli {
    /// Use EventCalc.
    #[arg(long = "evtcalc")]
    pub evtcalc: bool,
    /// Use Pythia6.
    #[arg(long = "Pythia6")]
    pub pythia6: bool,
    /// Use Pythia8.
    #[arg(long = "Pythia8")]
    pub pythia8: bool,
    /// Use the particle gun.
    #[arg(long = "PG")]
    pub pg: bool,
    /// Particle gun PDG code.
    #[arg(long = "pID", default_value_t = 22, allow_negative_numbers = true)]
    pub pid: i32,
    /// Particle gun start energy in GeV.
    #[arg(long = "Estart", default_value_t = 10.0)]
    pub e_start: f64,
    /// Particle gun end energy in GeV.
    #[arg(long = "Eend", default_value_t = 10.0)]
    pub e_end: f64,
    /// Production channel: c, b, bc, meson, pbrem, qcd, charmonly; anything else is inclusive.
    #[arg(short = 'A', default_value = "c")]
    pub production: String,
    /// Use Genie.
    #[arg(long = "Genie")]
    pub genie: bool,
    /// Use neutrino radiography.
    #[arg(long = "NuRadio")]
    pub nu_radio: bool,
    /// Use an ntuple as input.
    #[arg(long = "Ntuple")]
    pub ntuple: bool,
    /// Use a muon background file.
    #[arg(long = "MuonBack")]
    pub muon_back: bool,
    /// Follow muons.
    #[arg(long = "FollowMuon")]
    pub follow_muon: bool,
    /// Fast muon only.
    #[arg(long = "FastMuon")]
    pub fast_muon: bool,
    /// Use Nuage.
    #[arg(long = "Nuage")]
    pub nuage: bool,
    /// Random phi.
    #[arg(long = "phiRandom")]
    pub phi_random: bool,
    /// Use the cosmic generator with the given upper energy option.
    #[arg(long = "Cosmics", value_name = "HIGH")]
    pub cosmics: Option<u32>,
    /// Use muon DIS.
    #[arg(long = "MuDIS")]
    pub muon_dis: bool,
    /// Generate RPV-SUSY events.
    #[arg(long = "RpvSusy")]
    pub rpvsusy: bool,
    /// Generate dark photon events.
    #[arg(long = "DarkPhoton")]
    pub dark_photon: bool,
    /// RPV-SUSY benchmark.
    #[arg(long = "SusyBench", default_value_t = 2)]
    pub susy_bench: u32,
    /// Mass of the hidden particle in GeV.
    #[arg(short = 'm', long = "mass")]
    pub mass: Option<f64>,
    /// Coupling triple used for production and decay.
    #[arg(short = 'c', long = "couplings")]
    pub couplings: Option<String>,
    /// Production coupling triple; requires --cd.
    #[arg(long = "cp", visible_alias = "production-couplings")]
    pub production_couplings: Option<String>,
    /// Decay coupling triple; requires --cp.
    #[arg(long = "cd", visible_alias = "decay-couplings")]
    pub decay_couplings: Option<String>,
    /// Dark photon kinetic mixing.
    #[arg(short = 'e', long = "epsilon")]
    pub epsilon: Option<f64>,
    /// Number of events.
    #[arg(short = 'n', long = "nEvents", default_value_t = 100)]
    pub n_events: u64,
    /// First event of the input file.
    #[arg(short = 'i', long = "firstEvent", default_value_t = 0)]
    pub first_event: u64,
    /// Random seed.
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    pub seed: u64,
    /// Same seed.
    #[arg(short = 'S', long = "sameSeed", default_value_t = 0)]
    pub same_seed: u64,
    /// Input file; `none` runs without one.
    #[arg(short = 'f')]
    pub input_file: Option<String>,
    /// Geometry file for the muon shield.
    #[arg(short = 'g')]
    pub shield_geofile: Option<PathBuf>,
    /// Output directory.
    #[arg(short = 'o', long = "output", default_value = ".")]
    pub output_dir: PathBuf,
    /// Design preset providing the geometry defaults.
    #[arg(long, value_parser = ["2016", "2018", "2022", "2023"])]
    pub design: Option<String>,
    /// Maximum height of the vacuum tank.
    #[arg(short = 'Y')]
    pub tank_height: Option<f64>,
    /// Tank design.
    #[arg(long = "tankDesign")]
    pub tank_design: Option<u32>,
    /// Muon shield design.
    #[arg(long = "muShieldDesign", value_parser = clap::value_parser!(u32).range(7..=10))]
    pub shield_design: Option<u32>,
    /// Neutrino target design.
    #[arg(long = "nuTauTargetDesign")]
    pub target_design: Option<u32>,
    /// Calorimeter design.
    #[arg(long = "caloDesign", value_parser = parse_calo_design)]
    pub calo_design: Option<u32>,
    /// Straw design.
    #[arg(long = "strawDesign")]
    pub straw_design: Option<u32>,
    /// Deep copy.
    #[arg(short = 'F')]
    pub deep_copy: bool,
    /// Quick test on the small sample.
    #[arg(short = 't', long = "test")]
    pub test: bool,
    /// Stop after initialisation.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    /// Store trajectories for the event display.
    #[arg(short = 'D', long = "display")]
    pub display: bool,
    /// Step geometry for the muon shield.
    #[arg(long = "stepMuonShield")]
    pub step_muon_shield: bool,
    /// Number of shield magnets replaced by cobalt.
    #[arg(long = "coMuonShield", default_value_t = 0)]
    pub cobalt_magnets: u32,
    /// Deactivate the superconducting muon shield.
    #[arg(long = "noSC")]
    pub no_sc: bool,
    /// Superconducting shield name.
    #[arg(long = "scName", default_value = "sc_v6")]
    pub sc_name: String,
    /// Meson production source.
    #[arg(long = "MesonMother", default_value_t = true, action = ArgAction::Set)]
    pub meson_mother: bool,
    /// Debug level: 1 dumps fields, 2 checks overlaps.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub debug: u8,
    /// Helium in the decay volume.
    #[arg(long, overrides_with = "vacuums")]
    pub helium: bool,
    /// Vacuum in the decay volume.
    #[arg(long, overrides_with = "helium")]
    pub vacuums: bool,
    /// Activate the SND.
    #[arg(long = "SND", overrides_with = "no_snd")]
    pub snd: bool,
    /// Deactivate the SND.
    #[arg(long = "noSND", overrides_with = "snd")]
    pub no_snd: bool,
    /// YAML file overriding run defaults.
    #[arg(long)]
    pub defaults: Option<PathBuf>,
    /// Base geometry description. A leading `$MTS` is replaced by the installation root
    /// from the environment; without `MTS` the path is taken relative to the working
    /// directory.
    #[arg(long, default_value = DEFAULT_GEOMETRY)]
    pub geometry: PathBuf,
    /// Kernel program executing the run plan.
    #[arg(long)]
    pub kernel: Option<PathBuf>,
}

fn parse_calo_design(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(design @ (0 | 2 | 3)) => Ok(design),
        Ok(other) => Err(format!("calorimeter design {other} is not one of 0, 2, 3")),
        Err(err) => Err(err.to_string()),
    }
}

impl Cli {
    /// Base geometry path with a leading `$MTS` resolved from the environment.
    pub fn geometry_path(&self) -> PathBuf {
        resolve_geometry(&self.geometry, env::var_os("MTS"))
    }

    pub fn raw_options(&self) -> RawOptions {
        RawOptions {
            engines: EngineFlags {
                evtcalc: self.evtcalc,
                pythia6: self.pythia6,
                pythia8: self.pythia8,
                particle_gun: self.pg,
                genie: self.genie,
                nu_radiography: self.nu_radio,
                ntuple: self.ntuple,
                muon_back: self.muon_back,
                nuage: self.nuage,
                muon_dis: self.muon_dis,
                cosmics: self.cosmics.is_some(),
            },
            cosmics: self.cosmics,
            particle_gun: ParticleGun {
                pid: self.pid,
                e_start: self.e_start,
                e_end: self.e_end,
            },
            production: self.production.clone(),
            follow_muon: self.follow_muon,
            fast_muon: self.fast_muon,
            phi_random: self.phi_random,
            rpvsusy: self.rpvsusy,
            dark_photon: self.dark_photon,
            susy_bench: self.susy_bench,
            mass: self.mass,
            couplings: self.couplings.clone(),
            production_couplings: self.production_couplings.clone(),
            decay_couplings: self.decay_couplings.clone(),
            epsilon: self.epsilon,
            n_events: self.n_events,
            first_event: self.first_event,
            seed: self.seed,
            same_seed: self.same_seed,
            input_file: self.input_file.clone(),
            shield_geofile: self.shield_geofile.clone(),
            output_dir: self.output_dir.clone(),
            design: self.design.clone(),
            tank_height: self.tank_height,
            tank_design: self.tank_design,
            shield_design: self.shield_design,
            target_design: self.target_design,
            calo_design: self.calo_design,
            straw_design: self.straw_design,
            deep_copy: self.deep_copy,
            test: self.test,
            dry_run: self.dry_run,
            display: self.display,
            step_muon_shield: self.step_muon_shield,
            cobalt_magnets: self.cobalt_magnets,
            sc_magnet: !self.no_sc,
            sc_name: self.sc_name.clone(),
            meson_mother: self.meson_mother,
            debug: self.debug,
            decay_volume_medium: if self.vacuums {
                DecayVolumeMedium::Vacuums
            } else {
                DecayVolumeMedium::Helium
            },
            snd: self.snd,
        }
    }
}

/// Replaces a leading `$MTS` component with `root`, or drops it when `root` is unset.
/// Other `$VAR` prefixes go through the usual input expansion.
pub fn resolve_geometry(path: &Path, root: Option<OsString>) -> PathBuf {
    match path.strip_prefix("$MTS") {
        Ok(rest) => match root {
            Some(root) if !root.is_empty() => PathBuf::from(root).join(rest),
            _ => rest.to_path_buf(),
        },
        Err(_) => expand_env(path),
    }
}
