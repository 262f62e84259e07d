//! Structured error types shared across MTS crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exit code reported when mutually exclusive hidden-sector generators are requested.
pub const EXIT_HIDDEN_SECTOR_CONFLICT: u8 = 2;
/// Exit code reported for every other fatal error.
pub const EXIT_FAILURE: u8 = 1;

/// Error code attached to a hidden-sector conflict.
pub const CODE_HIDDEN_SECTOR_CONFLICT: &str = "mts_config.hidden_sector_conflict";

/// Structured payload attached to every [`MtsError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, flag values, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the operator fix the invocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the MTS run driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum MtsError {
    /// Conflicting or malformed command line selections.
    #[error("configuration error: {0}")]
    Config(ErrorInfo),
    /// Required input files that are missing or not resolvable.
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// Geometry description loading and overlay errors.
    #[error("geometry error: {0}")]
    Geometry(ErrorInfo),
    /// Generator assembly and delegated validation errors.
    #[error("generator error: {0}")]
    Generator(ErrorInfo),
    /// Output directory and artifact errors.
    #[error("output error: {0}")]
    Output(ErrorInfo),
    /// Background reduction pass errors.
    #[error("reduction error: {0}")]
    Reduce(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl MtsError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            MtsError::Config(info)
            | MtsError::Input(info)
            | MtsError::Geometry(info)
            | MtsError::Generator(info)
            | MtsError::Output(info)
            | MtsError::Reduce(info)
            | MtsError::Serde(info) => info,
        }
    }

    /// Process exit code the binary reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            MtsError::Config(info) if info.code == CODE_HIDDEN_SECTOR_CONFLICT => {
                EXIT_HIDDEN_SECTOR_CONFLICT
            }
            _ => EXIT_FAILURE,
        }
    }

    /// Wraps an I/O failure on `path` into the given family constructor.
    pub fn io(
        family: fn(ErrorInfo) -> MtsError,
        code: &str,
        path: &std::path::Path,
        err: std::io::Error,
    ) -> MtsError {
        family(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
    }
}
