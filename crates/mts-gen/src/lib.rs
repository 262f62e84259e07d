//! Primary generator assembly.
//!
//! [`assemble`] turns resolved run options and the loaded geometry into exactly one
//! generator graph attached to a [`PrimaryGenerator`] container.

pub mod assemble;
pub mod dark_photon;
pub mod primary;
pub mod spec;
pub mod window;

pub use assemble::{assemble, BEAM_SMEAR_RADIUS};
pub use dark_photon::{dark_photon_pdg, DarkPhotonCheck, KinematicCheck};
pub use primary::{BeamProfile, BeamSpot, PrimaryGenerator, TargetPosition};
pub use spec::{
    CharmOnlyParams, DarkPhotonParams, ExternalInput, GeneratorSpec, HiddenLeptonParams,
    RpvSusyParams,
};
pub use window::FiducialWindow;
