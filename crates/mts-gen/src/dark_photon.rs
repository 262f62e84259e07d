//! Dark photon configuration checks.

use mts_config::{Production, ProductionChannel};

use crate::spec::DarkPhotonParams;

/// Particle code for dark photons produced through the QCD channel.
pub const QCD_DARK_PHOTON_PDG: i32 = 4_900_023;
/// Particle code used for every other production channel.
pub const DARK_PHOTON_PDG: i32 = 9_900_015;
/// Heaviest parent meson considered for meson decays (eta prime), in GeV.
pub const HEAVIEST_PARENT_MESON_MASS: f64 = 0.957_78;

pub fn dark_photon_pdg(production: Production) -> i32 {
    match production {
        Production::Channel(ProductionChannel::Qcd) => QCD_DARK_PHOTON_PDG,
        _ => DARK_PHOTON_PDG,
    }
}

/// Per-run validity check of a dark photon configuration. A rejection aborts the run.
pub trait DarkPhotonCheck {
    fn check(&self, params: &DarkPhotonParams) -> Result<(), String>;
}

/// Default check on production channel and kinematics.
#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicCheck;

impl DarkPhotonCheck for KinematicCheck {
    fn check(&self, params: &DarkPhotonParams) -> Result<(), String> {
        if params.mass.is_nan() || params.mass <= 0.0 {
            return Err(format!("mass must be positive, got {}", params.mass));
        }
        if params.epsilon.is_nan() || params.epsilon <= 0.0 {
            return Err(format!("epsilon must be positive, got {}", params.epsilon));
        }
        match params.production {
            Production::Channel(ProductionChannel::Meson) => {
                if params.mass >= HEAVIEST_PARENT_MESON_MASS {
                    return Err(format!(
                        "no meson can decay into a dark photon of mass {:.3} GeV",
                        params.mass
                    ));
                }
                Ok(())
            }
            Production::Channel(ProductionChannel::ProtonBrem)
            | Production::Channel(ProductionChannel::Qcd) => Ok(()),
            Production::Channel(other) => Err(format!(
                "production channel {} is not available for dark photons",
                other.code()
            )),
            Production::FullyInclusive => {
                Err("dark photons need one of the meson, pbrem or qcd channels".to_string())
            }
        }
    }
}
