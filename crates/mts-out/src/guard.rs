use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use mts_core::{ErrorInfo, MtsError};
use walkdir::WalkDir;

use crate::tag::OutputTag;

/// Creates `dir` if needed and deletes every file whose name contains the tag.
///
/// Destructive and unconfirmed. Directories matching the tag are left alone.
pub fn purge_stale(dir: &Path, tag: &OutputTag) -> Result<Vec<PathBuf>, MtsError> {
    fs::create_dir_all(dir)
        .map_err(|err| MtsError::io(MtsError::Output, "mts_out.create_dir", dir, err))?;
    let mut removed = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            MtsError::Output(
                ErrorInfo::new("mts_out.list_dir", err.to_string())
                    .with_context("path", dir.display().to_string()),
            )
        })?;
        if !entry.file_name().to_string_lossy().contains(tag.as_str()) {
            continue;
        }
        if entry.file_type().is_dir() {
            warn!("not removing directory {} matching tag {tag}", entry.path().display());
            continue;
        }
        fs::remove_file(entry.path())
            .map_err(|err| MtsError::io(MtsError::Output, "mts_out.remove_stale", entry.path(), err))?;
        info!("removed stale {}", entry.path().display());
        removed.push(entry.into_path());
    }
    Ok(removed)
}
