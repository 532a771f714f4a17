use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{Instrument, info, info_span};

use f1_cli::config::EtlConfig;
use f1_cli::pipeline::{PipelineError, load, prepare, read_stage};
use f1_model::{ErrorKind, RunReport, Stage, TableLoad};
use f1_store::PgWarehouse;

/// Read, prepare, connect, load. The pool is closed whether the load
/// succeeds or not.
pub async fn run_load(config: &EtlConfig) -> Result<RunReport, PipelineError> {
    let start = Instant::now();
    info!(
        input_dir = %config.input_dir.display(),
        database = %config.redacted_database_url(),
        batch_size = config.batch_size,
        "starting load"
    );

    let sources = read_stage(&config.input_dir)?;
    let prepared = prepare(&sources)?;

    let mut store = PgWarehouse::connect(&config.database_url, config.store_options())
        .instrument(info_span!("connect"))
        .await
        .map_err(|err| PipelineError::new(Stage::Connect, &[], err))?;

    let outcome = load(&mut store, &prepared).await;
    store.close().await;

    let mut report = outcome?;
    report.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(
        rows = report.total_rows(),
        duration_ms = report.duration_ms,
        "load complete"
    );
    Ok(report)
}

/// JSON document written by `--report`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportFile<'a> {
    Succeeded {
        #[serde(flatten)]
        report: &'a RunReport,
    },
    Failed {
        stage: Stage,
        kind: ErrorKind,
        error: String,
        loaded: &'a [TableLoad],
    },
}

impl<'a> ReportFile<'a> {
    pub fn from_outcome(outcome: &'a Result<RunReport, PipelineError>) -> Self {
        match outcome {
            Ok(report) => Self::Succeeded { report },
            Err(error) => Self::Failed {
                stage: error.stage,
                kind: error.kind(),
                error: error.to_string(),
                loaded: &error.loaded,
            },
        }
    }
}

pub fn write_report(path: &Path, report: &ReportFile<'_>) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("create report file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("write report file {}", path.display()))?;
    Ok(())
}
