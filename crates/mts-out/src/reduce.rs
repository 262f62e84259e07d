//! Background event reduction.
//!
//! Muon-background runs produce mostly events without a single detector hit. The
//! reducer rewrites the event file keeping only events with at least one hit entry,
//! replaces the original in place and records the branch manifest downstream readers
//! should load.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use mts_core::{ErrorInfo, MtsError};
use serde::{Deserialize, Serialize};

use crate::tree::{
    BranchDescriptor, JsonlTreeReader, JsonlTreeWriter, TreeHeader, TreeReader, TreeWriter,
};

/// Substring identifying hit collections among the tree branches.
pub const POINT_MARKER: &str = "Point";

/// Branches activated for downstream readers of a reduced file.
pub const BRANCH_LIST: [&str; 13] = [
    "MCTrack",
    "vetoPoint",
    "ShipRpcPoint",
    "TargetPoint",
    "TTPoint",
    "ScoringPoint",
    "strawtubesPoint",
    "EcalPoint",
    "sEcalPointLite",
    "smuonPoint",
    "TimeDetPoint",
    "MCEventHeader",
    "sGeoTracks",
];

/// Outcome of a reduction pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionReport {
    pub source: PathBuf,
    pub scanned: usize,
    pub retained: usize,
    pub hit_branches: Vec<String>,
    pub branch_list: Vec<String>,
}

/// Hit branches of a tree: names containing [`POINT_MARKER`] that can report an entry count.
pub fn hit_branches(header: &TreeHeader) -> Vec<BranchDescriptor> {
    header
        .branches
        .iter()
        .filter(|branch| branch.name.contains(POINT_MARKER) && branch.supports_entry_count())
        .cloned()
        .collect()
}

/// Copies every event with at least one hit entry, preserving order.
///
/// Returns `(scanned, retained)`.
pub fn copy_non_empty<R, W>(reader: &mut R, writer: &mut W) -> Result<(usize, usize), MtsError>
where
    R: TreeReader,
    W: TreeWriter,
{
    let hits = hit_branches(reader.header());
    let scanned = reader.entries();
    let mut retained = 0;
    for index in 0..scanned {
        let event = reader.read_event(index)?;
        let total: usize = hits
            .iter()
            .filter_map(|branch| event.entry_count(branch))
            .sum();
        if total > 0 {
            writer.fill(&event)?;
            retained += 1;
        }
    }
    Ok((scanned, retained))
}

fn temp_path(event_file: &Path) -> PathBuf {
    let mut name = OsString::from(event_file.as_os_str());
    name.push("tmp");
    PathBuf::from(name)
}

fn reduce_io(path: &Path, err: std::io::Error) -> MtsError {
    MtsError::io(MtsError::Reduce, "mts_out.reduce_io", path, err)
}

/// Rewrites `event_file` keeping only events with at least one hit.
///
/// `open_handles` are the handles the run still holds; the one that resolves to the same
/// file as `event_file` is used as the source and every handle is released before the
/// original is replaced. On failure the temporary file is removed and the original is
/// left untouched.
pub fn reduce_background(
    event_file: &Path,
    open_handles: Vec<JsonlTreeReader>,
) -> Result<ReductionReport, MtsError> {
    let wanted = fs::canonicalize(event_file).ok();
    let mut source = None;
    for handle in open_handles {
        if source.is_none()
            && wanted.is_some()
            && fs::canonicalize(handle.path()).ok() == wanted
        {
            source = Some(handle);
        }
    }
    let mut reader = match source {
        Some(reader) => reader,
        None => JsonlTreeReader::open(event_file)?,
    };

    let tmp = temp_path(event_file);
    let mut header = reader.header().clone();
    header.branch_list = BRANCH_LIST.iter().map(|name| name.to_string()).collect();
    let hit_names = hit_branches(&header)
        .into_iter()
        .map(|branch| branch.name)
        .collect::<Vec<_>>();

    let copied = JsonlTreeWriter::create(&tmp, &header).and_then(|mut writer| {
        let counts = copy_non_empty(&mut reader, &mut writer)?;
        writer.finish()?;
        Ok(counts)
    });
    drop(reader);
    let (scanned, retained) = match copied {
        Ok(counts) => counts,
        Err(err) => {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!("could not remove {}: {cleanup}", tmp.display());
            }
            return Err(err);
        }
    };

    replace(&tmp, event_file)?;
    info!("removed empty events, left with: {retained}");
    Ok(ReductionReport {
        source: event_file.to_path_buf(),
        scanned,
        retained,
        hit_branches: hit_names,
        branch_list: header.branch_list,
    })
}

fn replace(tmp: &Path, target: &Path) -> Result<(), MtsError> {
    if fs::rename(tmp, target).is_ok() {
        return Ok(());
    }
    // Some filesystems refuse to rename over an existing file.
    fs::remove_file(target).map_err(|err| reduce_io(target, err))?;
    fs::rename(tmp, target).map_err(|err| {
        MtsError::Reduce(
            ErrorInfo::new("mts_out.reduce_io", err.to_string())
                .with_context("path", target.display().to_string())
                .with_context("temp", tmp.display().to_string())
                .with_hint("the reduced events remain in the temp file"),
        )
    })
}
