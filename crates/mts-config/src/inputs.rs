//! Input sample resolution.

use std::env;
use std::path::{Path, PathBuf};

use mts_core::{ErrorInfo, MtsError};
use serde::{Deserialize, Serialize};

use crate::defaults::InputCatalog;
use crate::engine::SimEngine;

/// Literal `-f` value meaning "run without an input file".
pub const NO_INPUT_SENTINEL: &str = "none";

/// Resolved input sample for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSource {
    /// Input file, if any.
    pub path: Option<PathBuf>,
    /// True when the operator passed `-f`.
    pub explicit: bool,
}

/// Applies the input rules in order: catalog default, beauty sample, explicit `-f`,
/// test sample. Engine specific defaults and requirements are applied afterwards by
/// [`apply_engine_rules`].
pub fn initial_input(
    catalog: &InputCatalog,
    beauty: bool,
    explicit: Option<&str>,
    test: bool,
) -> InputSource {
    let mut source = InputSource {
        path: Some(catalog.charm.clone()),
        explicit: false,
    };
    if beauty {
        source.path = Some(catalog.beauty.clone());
    }
    if let Some(raw) = explicit.filter(|raw| !raw.is_empty()) {
        source.path = if raw == NO_INPUT_SENTINEL {
            None
        } else {
            Some(PathBuf::from(raw))
        };
        source.explicit = true;
    }
    // The test sample replaces the path but does not count as an explicit input.
    if test {
        source.path = Some(catalog.test.clone());
    }
    source
}

/// Engine specific defaults, then the "input required" checks.
pub fn apply_engine_rules(
    engine: SimEngine,
    mut source: InputSource,
    catalog: &InputCatalog,
) -> Result<InputSource, MtsError> {
    if matches!(engine, SimEngine::Genie | SimEngine::NuRadiography) && !source.explicit {
        source.path = Some(catalog.genie.clone());
    }
    if engine == SimEngine::Nuage && source.path.is_none() {
        source.path = Some(catalog.nuage.clone());
    }
    if engine.requires_explicit_input() && !source.explicit {
        return Err(MtsError::Input(
            ErrorInfo::new(
                "mts_config.input_required",
                format!("input file required if engine is {engine}"),
            )
            .with_context("engine", engine.name())
            .with_hint("pass the input sample with -f"),
        ));
    }
    Ok(source)
}

/// Expands a leading `$NAME` component from the environment. Unknown variables are
/// left in place so the subsequent existence check reports the literal path.
pub fn expand_env(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let Some(rest) = raw.strip_prefix('$') else {
        return path.to_path_buf();
    };
    let (name, tail) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    match env::var(name) {
        Ok(value) => PathBuf::from(format!("{value}{tail}")),
        Err(_) => path.to_path_buf(),
    }
}

/// Verifies that an input file exists after environment expansion.
pub fn check_file_exists(path: &Path) -> Result<PathBuf, MtsError> {
    let expanded = expand_env(path);
    if expanded.is_file() {
        Ok(expanded)
    } else {
        Err(MtsError::Input(
            ErrorInfo::new("mts_config.input_not_found", "input file not found")
                .with_context("path", expanded.display().to_string()),
        ))
    }
}
