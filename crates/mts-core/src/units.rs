//! Unit constants in the framework convention: lengths in cm, energies in GeV.

/// Centimetre, the base length unit.
pub const CM: f64 = 1.0;
/// Millimetre.
pub const MM: f64 = 0.1 * CM;
/// Metre.
pub const M: f64 = 100.0 * CM;

/// Giga electron volt, the base energy unit.
pub const GEV: f64 = 1.0;
/// Mega electron volt.
pub const MEV: f64 = 1.0e-3 * GEV;
