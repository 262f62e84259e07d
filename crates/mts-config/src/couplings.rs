//! Coupling triples for hidden-sector generators.

use std::fmt;

use mts_core::{ErrorInfo, MtsError};
use serde::{Deserialize, Serialize};

/// Three coupling strengths, one per interaction channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CouplingTriple(pub [f64; 3]);

impl CouplingTriple {
    /// Parses a comma separated list of exactly three numbers.
    pub fn parse(raw: &str) -> Result<Self, MtsError> {
        let mut values = [0.0; 3];
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(malformed(raw, format!("expected 3 values, found {}", parts.len())));
        }
        for (slot, part) in values.iter_mut().zip(parts) {
            *slot = part
                .parse::<f64>()
                .map_err(|err| malformed(raw, format!("{part:?}: {err}")))?;
            if !slot.is_finite() {
                return Err(malformed(raw, format!("{part:?} is not a finite number")));
            }
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> [f64; 3] {
        self.0
    }
}

impl fmt::Display for CouplingTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "[{a:e}, {b:e}, {c:e}]")
    }
}

fn malformed(raw: &str, detail: String) -> MtsError {
    MtsError::Config(
        ErrorInfo::new("mts_config.malformed_couplings", "malformed coupling specification")
            .with_context("value", raw)
            .with_context("detail", detail),
    )
}

/// Couplings used at production and at decay of the hidden particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CouplingSet {
    /// One triple shared by production and decay.
    Shared { couplings: CouplingTriple },
    /// Distinct production and decay triples.
    Split {
        production: CouplingTriple,
        decay: CouplingTriple,
    },
}

impl CouplingSet {
    /// Builds the set from the combined triple and the optional split triples.
    ///
    /// The split forms must be given together or not at all.
    pub fn resolve(
        combined: &str,
        production: Option<&str>,
        decay: Option<&str>,
    ) -> Result<Self, MtsError> {
        match (production, decay) {
            (None, None) => Ok(CouplingSet::Shared {
                couplings: CouplingTriple::parse(combined)?,
            }),
            (Some(production), Some(decay)) => Ok(CouplingSet::Split {
                production: CouplingTriple::parse(production)?,
                decay: CouplingTriple::parse(decay)?,
            }),
            (production, decay) => Err(MtsError::Config(
                ErrorInfo::new(
                    "mts_config.partial_couplings",
                    "either both production and decay couplings must be specified, or neither",
                )
                .with_context("production", production.unwrap_or("<unset>"))
                .with_context("decay", decay.unwrap_or("<unset>"))
                .with_hint("pass both -cp and -cd, or use -c for a shared triple"),
            )),
        }
    }

    pub fn production(&self) -> CouplingTriple {
        match self {
            CouplingSet::Shared { couplings } => *couplings,
            CouplingSet::Split { production, .. } => *production,
        }
    }

    pub fn decay(&self) -> CouplingTriple {
        match self {
            CouplingSet::Shared { couplings } => *couplings,
            CouplingSet::Split { decay, .. } => *decay,
        }
    }
}
