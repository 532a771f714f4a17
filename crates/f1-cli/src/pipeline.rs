//! Staged warehouse load.
//!
//! A run goes through the [`Stage`]s in order. Reading and dimension building
//! happen before any connection is opened, so bad input never reaches the
//! database. Every table append is its own transaction; a failure after some
//! tables were appended leaves them in place and the returned
//! [`PipelineError`] lists them.

use std::path::Path;
use std::time::Instant;

use f1_ingest::{IngestError, SourceTables, read_sources};
use f1_model::{Dimension, ErrorKind, FACT_RESULTS, RunReport, Stage, TableLoad, TableSpec};
use f1_store::{StoreError, WarehouseStore};
use f1_transform::{
    DimensionFrames, KeyLookups, TransformError, build_dimensions, build_fact_results,
    race_id_discrepancies,
};
use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};

/// Any failure a run can hit.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EtlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ingest(err) => err.kind(),
            Self::Transform(err) => err.kind(),
            Self::Store(err) => err.kind(),
        }
    }
}

/// A failed run: the stage that failed and the tables already appended.
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    pub loaded: Vec<TableLoad>,
    #[source]
    pub source: EtlError,
}

impl PipelineError {
    pub fn new(stage: Stage, loaded: &[TableLoad], source: impl Into<EtlError>) -> Self {
        Self {
            stage,
            loaded: loaded.to_vec(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    /// True when nothing reached the store before the failure.
    pub fn nothing_loaded(&self) -> bool {
        self.loaded.is_empty()
    }
}

/// Everything built from the sources before the store is touched.
#[derive(Debug, Clone)]
pub struct PreparedLoad {
    pub dimensions: DimensionFrames,
    pub status: DataFrame,
    pub results: DataFrame,
    pub race_id_discrepancies: usize,
}

/// Read the six source files from `dir`.
pub fn read_stage(dir: &Path) -> Result<SourceTables, PipelineError> {
    let span = info_span!("read_sources", dir = %dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let sources =
        read_sources(dir).map_err(|err| PipelineError::new(Stage::ReadSources, &[], err))?;
    info!(
        drivers = sources.drivers.height(),
        races = sources.races.height(),
        results = sources.results.height(),
        duration_ms = start.elapsed().as_millis(),
        "sources read"
    );
    Ok(sources)
}

/// Build the four dimensions and run the race identifier check.
pub fn prepare(sources: &SourceTables) -> Result<PreparedLoad, PipelineError> {
    let span = info_span!("build_dimensions");
    let _guard = span.enter();
    let start = Instant::now();
    let fail = |err: TransformError| PipelineError::new(Stage::BuildDimensions, &[], err);

    let dimensions = build_dimensions(
        &sources.drivers,
        &sources.constructors,
        &sources.status,
        &sources.races,
        &sources.circuits,
    )
    .map_err(fail)?;

    let discrepancies = race_id_discrepancies(&sources.races).map_err(fail)?;
    if discrepancies > 0 {
        warn!(
            races = discrepancies,
            "races carry a raceId that differs from season * 1000 + round; \
             their results will not resolve"
        );
    }

    info!(
        duration_ms = start.elapsed().as_millis(),
        "dimensions built"
    );
    Ok(PreparedLoad {
        dimensions,
        status: sources.status.clone(),
        results: sources.results.clone(),
        race_id_discrepancies: discrepancies,
    })
}

async fn append_table<S: WarehouseStore>(
    store: &mut S,
    table: &TableSpec,
    frame: &DataFrame,
) -> Result<usize, StoreError> {
    let start = Instant::now();
    let rows = store.append(table, frame).await?;
    info!(
        table = table.name,
        rows,
        duration_ms = start.elapsed().as_millis(),
        "table appended"
    );
    Ok(rows)
}

/// Append the dimensions, resolve keys, then build and append the facts.
pub async fn load<S: WarehouseStore>(
    store: &mut S,
    prepared: &PreparedLoad,
) -> Result<RunReport, PipelineError> {
    let start = Instant::now();
    let mut loaded: Vec<TableLoad> = Vec::new();

    for dimension in Dimension::ALL {
        let table = dimension.table();
        let frame = prepared.dimensions.get(dimension);
        let rows = append_table(store, table, frame)
            .instrument(info_span!("load_dimension", table = table.name))
            .await
            .map_err(|err| PipelineError::new(Stage::LoadDimensions, &loaded, err))?;
        loaded.push(TableLoad::new(table.name, rows));
    }

    let lookups = resolve_keys(store)
        .instrument(info_span!("resolve_keys"))
        .await
        .map_err(|err| PipelineError::new(Stage::ResolveKeys, &loaded, err))?;

    let facts = {
        let span = info_span!("build_facts");
        let _guard = span.enter();
        build_fact_results(&prepared.results, &prepared.status, &lookups)
            .map_err(|err| PipelineError::new(Stage::BuildFacts, &loaded, err))?
    };
    if facts.dropped_rows > 0 {
        warn!(
            dropped = facts.dropped_rows,
            candidates = facts.candidate_rows,
            "result rows dropped for unresolved keys"
        );
    }

    info!(rows = facts.frame.height(), "loading fact rows");
    let rows = append_table(store, &FACT_RESULTS, &facts.frame)
        .instrument(info_span!("load_facts"))
        .await
        .map_err(|err| PipelineError::new(Stage::LoadFacts, &loaded, err))?;
    loaded.push(TableLoad::new(FACT_RESULTS.name, rows));

    Ok(RunReport {
        loaded,
        fact_candidates: facts.candidate_rows,
        facts_dropped: facts.dropped_rows,
        race_id_discrepancies: prepared.race_id_discrepancies,
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

async fn resolve_keys<S: WarehouseStore>(store: &mut S) -> Result<KeyLookups, EtlError> {
    let mut lookups = KeyLookups::new();
    for dimension in Dimension::ALL {
        let frame = store.key_lookup(dimension).await?;
        debug!(table = dimension.table().name, keys = frame.height(), "keys read back");
        lookups.insert(dimension, frame)?;
    }
    Ok(lookups)
}

/// Prepare and load already-read sources into `store`.
pub async fn run_pipeline<S: WarehouseStore>(
    store: &mut S,
    sources: &SourceTables,
) -> Result<RunReport, PipelineError> {
    let prepared = prepare(sources)?;
    load(store, &prepared).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_follows_the_source() {
        let err = PipelineError::new(
            Stage::ReadSources,
            &[],
            IngestError::MissingColumn {
                column: "code".to_string(),
                table: "drivers".to_string(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.nothing_loaded());
        assert_eq!(
            err.to_string(),
            "read sources failed: required column 'code' not found in drivers"
        );
    }

    #[test]
    fn loaded_tables_are_kept_on_failure() {
        let loaded = vec![TableLoad::new("dim_drivers", 3)];
        let err = PipelineError::new(
            Stage::LoadDimensions,
            &loaded,
            StoreError::MissingColumn {
                table: "dim_constructors".to_string(),
                column: "constructor_name".to_string(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(!err.nothing_loaded());
        assert_eq!(err.loaded, loaded);
    }
}
