//! Race identifier synthesis.
//!
//! Races without a source identifier are keyed as `season * 1000 + round`.
//! The result side of the fact build always uses this formula, even when the
//! races file carries its own `raceId`; [`race_id_discrepancies`] counts the
//! races for which the two disagree.

use f1_common::has_column;
use f1_model::source_columns::{RACE_ID, ROUND, SEASON};
use polars::prelude::*;

use crate::error::Result;

/// Multiplier applied to the season. Identifiers stay unique while rounds are
/// below this value.
pub const RACE_ID_SEASON_FACTOR: i64 = 1000;

/// `season * 1000 + round` for scalar values.
///
/// ```
/// use f1_transform::race_id::synthesize_race_id;
///
/// assert_eq!(synthesize_race_id(2021, 1), 2021001);
/// ```
pub fn synthesize_race_id(season: i64, round: i64) -> i64 {
    season * RACE_ID_SEASON_FACTOR + round
}

/// `season * 1000 + round` as a Polars expression; null when either input is
/// null or not numeric.
pub fn synthesized_race_id(season: Expr, round: Expr) -> Expr {
    season.cast(DataType::Int64) * lit(RACE_ID_SEASON_FACTOR) + round.cast(DataType::Int64)
}

/// Count races whose explicit `raceId` differs from the synthesized value.
///
/// Returns zero when the table has no `raceId` column. Rows where either side
/// is null are not counted.
pub fn race_id_discrepancies(races: &DataFrame) -> Result<usize> {
    if !has_column(races, RACE_ID) {
        return Ok(0);
    }
    let mismatched = races
        .clone()
        .lazy()
        .filter(
            col(RACE_ID)
                .cast(DataType::Int64)
                .neq(synthesized_race_id(col(SEASON), col(ROUND))),
        )
        .collect()?;
    Ok(mismatched.height())
}
