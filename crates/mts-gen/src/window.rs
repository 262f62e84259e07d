use mts_config::Geometry;
use mts_core::{ErrorInfo, MtsError};
use serde::{Deserialize, Serialize};

/// Decay window along z, measured from the target, in which hidden particles are
/// forced to decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiducialWindow {
    lmin: f64,
    lmax: f64,
}

impl FiducialWindow {
    /// Creates a window, rejecting empty or inverted ranges.
    pub fn new(lmin: f64, lmax: f64) -> Result<Self, MtsError> {
        if !(lmin.is_finite() && lmax.is_finite()) || lmin >= lmax {
            return Err(MtsError::Generator(
                ErrorInfo::new("mts_gen.inverted_window", "fiducial decay window is inverted")
                    .with_context("lmin", lmin.to_string())
                    .with_context("lmax", lmax.to_string())
                    .with_hint("check the Chamber1, chambers.Tub1length and TrackStation1 placements"),
            ));
        }
        Ok(Self { lmin, lmax })
    }

    /// Lower bound: upstream end of the first tracking chamber; upper bound: first
    /// track station. Both relative to the target.
    pub fn from_geometry(geometry: &Geometry) -> Result<Self, MtsError> {
        let target_z = geometry.target.z0;
        Self::new(
            (geometry.chamber1.z - geometry.chambers.tub1_length) - target_z,
            geometry.track_station1.z - target_z,
        )
    }

    pub fn lmin(&self) -> f64 {
        self.lmin
    }

    pub fn lmax(&self) -> f64 {
        self.lmax
    }
}
