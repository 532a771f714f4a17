//! Column checks and the internal working-column names used during joins.

use f1_common::missing_columns;
use polars::prelude::DataFrame;

use crate::error::{Result, TransformError};

/// Synthesized race identifier on the results side.
pub(crate) const RESULT_RACE_ID: &str = "__race_id";
/// Status description pulled from the status table for the description join.
pub(crate) const STATUS_TEXT: &str = "__status_text";
/// Status identifier recovered from the description join.
pub(crate) const RESULT_STATUS_ID: &str = "__status_id";
/// Circuit attributes carried over from the circuits table.
pub(crate) const CIRCUIT_NAME: &str = "__circuit_name";
pub(crate) const CIRCUIT_COUNTRY: &str = "__circuit_country";

/// Fail with [`TransformError::MissingColumn`] for the first absent column.
pub fn require_columns(df: &DataFrame, table: &str, required: &[&str]) -> Result<()> {
    match missing_columns(df, required).into_iter().next() {
        Some(column) => Err(TransformError::MissingColumn {
            column,
            table: table.to_string(),
        }),
        None => Ok(()),
    }
}
