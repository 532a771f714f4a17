//! Run outcome types: pipeline stages, error taxonomy and the load report.

use std::fmt;

use serde::Serialize;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ReadSources,
    BuildDimensions,
    Connect,
    LoadDimensions,
    ResolveKeys,
    BuildFacts,
    LoadFacts,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::ReadSources => "read sources",
            Stage::BuildDimensions => "build dimensions",
            Stage::Connect => "connect",
            Stage::LoadDimensions => "load dimensions",
            Stage::ResolveKeys => "resolve keys",
            Stage::BuildFacts => "build facts",
            Stage::LoadFacts => "load facts",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure categories reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An input file could not be found or read.
    Io,
    /// An expected column or table shape is missing.
    Schema,
    /// The database could not be reached.
    Connectivity,
    /// The database rejected a write.
    Write,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Io => "io",
            ErrorKind::Schema => "schema",
            ErrorKind::Connectivity => "connectivity",
            ErrorKind::Write => "write",
        };
        f.write_str(label)
    }
}

/// Rows appended to one warehouse table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLoad {
    pub table: String,
    pub rows: usize,
}

impl TableLoad {
    pub fn new(table: impl Into<String>, rows: usize) -> Self {
        Self {
            table: table.into(),
            rows,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Tables appended, in load order.
    pub loaded: Vec<TableLoad>,
    /// Result rows before unresolved keys were dropped.
    pub fact_candidates: usize,
    /// Result rows dropped because a surrogate key was missing.
    pub facts_dropped: usize,
    /// Races whose source `raceId` differs from the synthesized identifier.
    pub race_id_discrepancies: usize,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn total_rows(&self) -> usize {
        self.loaded.iter().map(|load| load.rows).sum()
    }

    pub fn rows_for(&self, table: &str) -> Option<usize> {
        self.loaded
            .iter()
            .find(|load| load.table == table)
            .map(|load| load.rows)
    }
}
