//! Fact builder for `fact_results`.
//!
//! Result rows are keyed to the four dimensions in this order:
//!
//! 1. a race identifier is synthesized as `season * 1000 + round`,
//! 2. the status description is joined to the status table to recover
//!    `statusId` (exact text match),
//! 3. driver, constructor, status and race natural keys are joined to the
//!    key lookups to attach surrogate keys,
//! 4. the six measures are coerced to numbers, unparsable values becoming null,
//! 5. rows missing any surrogate key are dropped.

use f1_model::source_columns::{
    AVERAGE_SPEED, CONSTRUCTOR_ID, DRIVER_ID, FASTEST_LAP_RANK, GRID, LAPS, POINTS, POSITION,
    ROUND, SEASON, STATUS, STATUS_ID,
};
use f1_model::{Dimension, SourceFile, columns};
use polars::prelude::*;
use tracing::debug;

use crate::columns::{RESULT_RACE_ID, RESULT_STATUS_ID, STATUS_TEXT, require_columns};
use crate::dimensions::left_join_args;
use crate::error::Result;
use crate::keys::KeyLookups;
use crate::race_id::synthesized_race_id;

/// Outcome of the fact build.
#[derive(Debug, Clone)]
pub struct FactBuild {
    /// Fully resolved rows in `fact_results` column order.
    pub frame: DataFrame,
    /// Rows produced by the joins before unresolved ones were dropped.
    pub candidate_rows: usize,
    /// Rows dropped because at least one surrogate key was null.
    pub dropped_rows: usize,
}

/// Whole-number measure: parsed as a float first so `"3.0"` is accepted.
/// Values with a fractional part are not valid counts or ranks and become
/// null rather than being truncated.
fn integer_measure(source: &str) -> Expr {
    let value = col(source).cast(DataType::Float64);
    let whole = value.clone().cast(DataType::Int64);
    when(whole.clone().cast(DataType::Float64).eq(value))
        .then(whole)
        .otherwise(lit(NULL))
}

fn decimal_measure(source: &str) -> Expr {
    col(source).cast(DataType::Float64)
}

/// Results-side expression holding the natural key of `dimension`.
fn result_natural_key(dimension: Dimension) -> Expr {
    match dimension {
        Dimension::Drivers => col(DRIVER_ID),
        Dimension::Constructors => col(CONSTRUCTOR_ID),
        Dimension::Status => col(RESULT_STATUS_ID),
        Dimension::Races => col(RESULT_RACE_ID),
    }
}

fn lookup_join_column(dimension: Dimension) -> String {
    format!("__{}_lookup", dimension.natural_key())
}

fn all_keys_present() -> Expr {
    Dimension::ALL
        .iter()
        .map(|dimension| col(dimension.surrogate_key()).is_not_null())
        .reduce(|all, key| all.and(key))
        .unwrap_or_else(|| lit(true))
}

/// Build the fact table from the source results, the source status table and
/// the key lookups read back from the store.
pub fn build_fact_results(
    results: &DataFrame,
    status: &DataFrame,
    lookups: &KeyLookups,
) -> Result<FactBuild> {
    require_columns(
        results,
        SourceFile::RaceResults.table_name(),
        SourceFile::RaceResults.required_columns(),
    )?;
    require_columns(
        status,
        SourceFile::Status.table_name(),
        SourceFile::Status.required_columns(),
    )?;

    let status_ids = status.clone().lazy().select([
        col(STATUS).cast(DataType::String).alias(STATUS_TEXT),
        col(STATUS_ID).alias(RESULT_STATUS_ID),
    ]);

    let mut lf = results
        .clone()
        .lazy()
        .with_column(synthesized_race_id(col(SEASON), col(ROUND)).alias(RESULT_RACE_ID))
        .join(
            status_ids,
            [col(STATUS).cast(DataType::String)],
            [col(STATUS_TEXT)],
            left_join_args(),
        );

    for dimension in Dimension::ALL {
        let join_column = lookup_join_column(dimension);
        let lookup = lookups.join_frame(dimension, &join_column)?;
        lf = lf.join(
            lookup,
            [result_natural_key(dimension).cast(DataType::String)],
            [col(join_column.as_str())],
            left_join_args(),
        );
    }

    let candidates = lf
        .select([
            col(columns::RACE_KEY),
            col(columns::DRIVER_KEY),
            col(columns::CONSTRUCTOR_KEY),
            col(columns::STATUS_KEY),
            integer_measure(GRID).alias(columns::GRID_POSITION),
            integer_measure(POSITION).alias(columns::FINAL_POSITION),
            decimal_measure(POINTS).alias(columns::POINTS_EARNED),
            integer_measure(LAPS).alias(columns::LAPS_COMPLETED),
            integer_measure(FASTEST_LAP_RANK).alias(columns::FASTEST_LAP_RANK),
            decimal_measure(AVERAGE_SPEED).alias(columns::AVERAGE_SPEED),
        ])
        .collect()?;

    let candidate_rows = candidates.height();
    let frame = candidates.lazy().filter(all_keys_present()).collect()?;
    let dropped_rows = candidate_rows - frame.height();

    debug!(
        candidate_rows,
        resolved_rows = frame.height(),
        dropped_rows,
        "fact rows built"
    );

    Ok(FactBuild {
        frame,
        candidate_rows,
        dropped_rows,
    })
}
