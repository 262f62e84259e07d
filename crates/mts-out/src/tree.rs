//! Event tree storage.
//!
//! A tree file is line-delimited JSON: the first line is the [`TreeHeader`], every
//! following non-empty line is one [`Event`] in fill order.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use mts_core::{ErrorInfo, MtsError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the simulation tree.
pub const TREE_NAME: &str = "cbmsim";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    /// Array of entries per event (tracks, hits).
    Collection,
    /// Single object per event (headers).
    Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchDescriptor {
    pub name: String,
    pub kind: BranchKind,
}

impl BranchDescriptor {
    pub fn new(name: impl Into<String>, kind: BranchKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Whether the branch answers per-event entry-count queries.
    pub fn supports_entry_count(&self) -> bool {
        self.kind == BranchKind::Collection
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeHeader {
    pub tree: String,
    pub branches: Vec<BranchDescriptor>,
    /// Branches downstream readers should load.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branch_list: Vec<String>,
}

impl TreeHeader {
    pub fn new(branches: Vec<BranchDescriptor>) -> Self {
        Self {
            tree: TREE_NAME.to_string(),
            branches,
            branch_list: Vec::new(),
        }
    }
}

/// One event: branch name to branch payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(pub BTreeMap<String, Value>);

impl Event {
    pub fn with(mut self, branch: impl Into<String>, value: Value) -> Self {
        self.0.insert(branch.into(), value);
        self
    }

    /// Entry count of a collection branch; `None` for branches without that capability.
    /// Absent or non-array payloads count as empty.
    pub fn entry_count(&self, branch: &BranchDescriptor) -> Option<usize> {
        if !branch.supports_entry_count() {
            return None;
        }
        Some(
            self.0
                .get(&branch.name)
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
        )
    }
}

/// Sequential reader over a tree.
pub trait TreeReader {
    fn header(&self) -> &TreeHeader;

    /// Number of events in the tree.
    fn entries(&self) -> usize;

    fn read_event(&mut self, index: usize) -> Result<Event, MtsError>;
}

/// Append-only writer of a tree.
pub trait TreeWriter {
    fn fill(&mut self, event: &Event) -> Result<(), MtsError>;

    /// Flushes buffered events to stable storage and returns the number written.
    fn finish(self) -> Result<usize, MtsError>;
}

fn read_error(path: &Path, err: impl ToString) -> MtsError {
    MtsError::Reduce(
        ErrorInfo::new("mts_out.tree_read", err.to_string())
            .with_context("path", path.display().to_string()),
    )
}

fn parse_error(path: &Path, line: usize, err: impl ToString) -> MtsError {
    MtsError::Reduce(
        ErrorInfo::new("mts_out.tree_parse", err.to_string())
            .with_context("path", path.display().to_string())
            .with_context("line", line.to_string()),
    )
}

fn write_error(path: &Path, err: impl ToString) -> MtsError {
    MtsError::Reduce(
        ErrorInfo::new("mts_out.tree_write", err.to_string())
            .with_context("path", path.display().to_string()),
    )
}

/// Line-delimited JSON tree reader.
#[derive(Debug)]
pub struct JsonlTreeReader {
    path: PathBuf,
    header: TreeHeader,
    entries: usize,
    lines: Lines<BufReader<File>>,
    position: usize,
}

impl JsonlTreeReader {
    pub fn open(path: &Path) -> Result<Self, MtsError> {
        let (header, mut lines) = Self::open_lines(path)?;
        let mut entries = 0;
        for line in lines.by_ref() {
            if !line.map_err(|err| read_error(path, err))?.trim().is_empty() {
                entries += 1;
            }
        }
        let (_, lines) = Self::open_lines(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            header,
            entries,
            lines,
            position: 0,
        })
    }

    fn open_lines(path: &Path) -> Result<(TreeHeader, Lines<BufReader<File>>), MtsError> {
        let file = File::open(path).map_err(|err| read_error(path, err))?;
        let mut lines = BufReader::new(file).lines();
        let first = lines
            .next()
            .ok_or_else(|| parse_error(path, 1, "missing tree header"))?
            .map_err(|err| read_error(path, err))?;
        let header = serde_json::from_str(&first).map_err(|err| parse_error(path, 1, err))?;
        Ok((header, lines))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn next_event(&mut self) -> Result<Event, MtsError> {
        loop {
            let line = self
                .lines
                .next()
                .ok_or_else(|| read_error(&self.path, "unexpected end of tree"))?
                .map_err(|err| read_error(&self.path, err))?;
            if line.trim().is_empty() {
                continue;
            }
            let event = serde_json::from_str(&line)
                .map_err(|err| parse_error(&self.path, self.position + 2, err))?;
            self.position += 1;
            return Ok(event);
        }
    }
}

impl TreeReader for JsonlTreeReader {
    fn header(&self) -> &TreeHeader {
        &self.header
    }

    fn entries(&self) -> usize {
        self.entries
    }

    fn read_event(&mut self, index: usize) -> Result<Event, MtsError> {
        if index >= self.entries {
            return Err(read_error(
                &self.path,
                format!("event {index} out of range ({} entries)", self.entries),
            ));
        }
        if index < self.position {
            let (_, lines) = Self::open_lines(&self.path)?;
            self.lines = lines;
            self.position = 0;
        }
        while self.position < index {
            self.next_event()?;
        }
        self.next_event()
    }
}

/// Line-delimited JSON tree writer.
#[derive(Debug)]
pub struct JsonlTreeWriter {
    path: PathBuf,
    out: BufWriter<File>,
    written: usize,
}

impl JsonlTreeWriter {
    /// Creates (or truncates) `path` and writes the header.
    pub fn create(path: &Path, header: &TreeHeader) -> Result<Self, MtsError> {
        let file = File::create(path).map_err(|err| write_error(path, err))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer(&mut out, header).map_err(|err| write_error(path, err))?;
        out.write_all(b"\n").map_err(|err| write_error(path, err))?;
        Ok(Self {
            path: path.to_path_buf(),
            out,
            written: 0,
        })
    }
}

impl TreeWriter for JsonlTreeWriter {
    fn fill(&mut self, event: &Event) -> Result<(), MtsError> {
        serde_json::to_writer(&mut self.out, event).map_err(|err| write_error(&self.path, err))?;
        self.out
            .write_all(b"\n")
            .map_err(|err| write_error(&self.path, err))?;
        self.written += 1;
        Ok(())
    }

    fn finish(self) -> Result<usize, MtsError> {
        let file = self
            .out
            .into_inner()
            .map_err(|err| write_error(&self.path, err.error()))?;
        file.sync_all().map_err(|err| write_error(&self.path, err))?;
        Ok(self.written)
    }
}

/// Writes a complete tree in one go.
pub fn write_tree(path: &Path, header: &TreeHeader, events: &[Event]) -> Result<usize, MtsError> {
    let mut writer = JsonlTreeWriter::create(path, header)?;
    for event in events {
        writer.fill(event)?;
    }
    writer.finish()
}
