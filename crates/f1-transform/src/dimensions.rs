//! Dimension builders.
//!
//! Each builder projects one source table onto the columns of its warehouse
//! dimension. Surrogate keys are not produced here; the database assigns them
//! when the rows are appended.

use f1_common::has_column;
use f1_model::columns;
use f1_model::source_columns::{
    CIRCUIT_ID, CIRCUIT_NAME, CODE, CONSTRUCTOR_ID, CONSTRUCTOR_NAME, COUNTRY, DATE,
    DATE_OF_BIRTH, DRIVER_ID, FAMILY_NAME, GIVEN_NAME, NATIONALITY, RACE_ID, RACE_NAME, ROUND,
    SEASON, STATUS, STATUS_ID,
};
use f1_model::{Dimension, SourceFile};
use polars::prelude::*;
use tracing::debug;

use crate::columns::{self as work, require_columns};
use crate::error::Result;
use crate::race_id::synthesized_race_id;

/// Date layout used by the source export.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a text column as a date; values that do not parse become null.
pub fn parse_date(expr: Expr) -> Expr {
    expr.cast(DataType::String).str().to_date(StrptimeOptions {
        format: Some(DATE_FORMAT.into()),
        strict: false,
        ..Default::default()
    })
}

/// Left join that keeps the row order of the left frame.
pub(crate) fn left_join_args() -> JoinArgs {
    JoinArgs {
        maintain_order: MaintainOrderJoin::Left,
        ..JoinArgs::new(JoinType::Left)
    }
}

/// The four dimension frames of one run, ready to append.
#[derive(Debug, Clone)]
pub struct DimensionFrames {
    pub drivers: DataFrame,
    pub constructors: DataFrame,
    pub status: DataFrame,
    pub races: DataFrame,
}

impl DimensionFrames {
    pub fn get(&self, dimension: Dimension) -> &DataFrame {
        match dimension {
            Dimension::Drivers => &self.drivers,
            Dimension::Constructors => &self.constructors,
            Dimension::Status => &self.status,
            Dimension::Races => &self.races,
        }
    }
}

/// Build all four dimensions.
pub fn build_dimensions(
    drivers: &DataFrame,
    constructors: &DataFrame,
    status: &DataFrame,
    races: &DataFrame,
    circuits: &DataFrame,
) -> Result<DimensionFrames> {
    let frames = DimensionFrames {
        drivers: build_dim_drivers(drivers)?,
        constructors: build_dim_constructors(constructors)?,
        status: build_dim_status(status)?,
        races: build_dim_races(races, circuits)?,
    };
    for dimension in Dimension::ALL {
        debug!(
            table = dimension.table().name,
            rows = frames.get(dimension).height(),
            "dimension built"
        );
    }
    Ok(frames)
}

/// `driver_id, full_name, driver_code, nationality, date_of_birth`.
///
/// `full_name` is the given and family names joined by one space; it is null
/// when either part is null.
pub fn build_dim_drivers(drivers: &DataFrame) -> Result<DataFrame> {
    let source = SourceFile::Drivers;
    require_columns(drivers, source.table_name(), source.required_columns())?;

    let frame = drivers
        .clone()
        .lazy()
        .select([
            col(DRIVER_ID).alias(columns::DRIVER_ID),
            concat_str([col(GIVEN_NAME), col(FAMILY_NAME)], " ", false)
                .alias(columns::FULL_NAME),
            col(CODE).alias(columns::DRIVER_CODE),
            col(NATIONALITY).alias(columns::NATIONALITY),
            parse_date(col(DATE_OF_BIRTH)).alias(columns::DATE_OF_BIRTH),
        ])
        .collect()?;
    Ok(frame)
}

/// `constructor_id, constructor_name, nationality`.
pub fn build_dim_constructors(constructors: &DataFrame) -> Result<DataFrame> {
    let source = SourceFile::Constructors;
    require_columns(constructors, source.table_name(), source.required_columns())?;

    let frame = constructors
        .clone()
        .lazy()
        .select([
            col(CONSTRUCTOR_ID).alias(columns::CONSTRUCTOR_ID),
            col(CONSTRUCTOR_NAME).alias(columns::CONSTRUCTOR_NAME),
            col(NATIONALITY).alias(columns::NATIONALITY),
        ])
        .collect()?;
    Ok(frame)
}

/// `status_id, status_description`.
pub fn build_dim_status(status: &DataFrame) -> Result<DataFrame> {
    let source = SourceFile::Status;
    require_columns(status, source.table_name(), source.required_columns())?;

    let frame = status
        .clone()
        .lazy()
        .select([
            col(STATUS_ID).alias(columns::STATUS_ID),
            col(STATUS).alias(columns::STATUS_DESCRIPTION),
        ])
        .collect()?;
    Ok(frame)
}

/// `race_id, race_name, season, round, race_date, circuit_name, circuit_country`.
///
/// Races are left-joined to circuits on `circuitId`, so a race with an
/// unknown circuit keeps its row with null circuit attributes. A
/// `circuitName` column in the races file takes precedence over the one from
/// circuits. Without a `raceId` column every race gets `season * 1000 + round`.
pub fn build_dim_races(races: &DataFrame, circuits: &DataFrame) -> Result<DataFrame> {
    require_columns(
        races,
        SourceFile::Races.table_name(),
        SourceFile::Races.required_columns(),
    )?;
    require_columns(
        circuits,
        SourceFile::Circuits.table_name(),
        SourceFile::Circuits.required_columns(),
    )?;

    let circuit_attributes = circuits.clone().lazy().select([
        col(CIRCUIT_ID).cast(DataType::String),
        col(CIRCUIT_NAME).alias(work::CIRCUIT_NAME),
        col(COUNTRY).alias(work::CIRCUIT_COUNTRY),
    ]);

    let race_id = if has_column(races, RACE_ID) {
        col(RACE_ID)
    } else {
        synthesized_race_id(col(SEASON), col(ROUND))
    };
    let circuit_name = if has_column(races, CIRCUIT_NAME) {
        col(CIRCUIT_NAME)
    } else {
        col(work::CIRCUIT_NAME)
    };

    let frame = races
        .clone()
        .lazy()
        .join(
            circuit_attributes,
            [col(CIRCUIT_ID).cast(DataType::String)],
            [col(CIRCUIT_ID)],
            left_join_args(),
        )
        .select([
            race_id.alias(columns::RACE_ID),
            col(RACE_NAME).alias(columns::RACE_NAME),
            col(SEASON).cast(DataType::Int64).alias(columns::SEASON),
            col(ROUND).cast(DataType::Int64).alias(columns::ROUND),
            parse_date(col(DATE)).alias(columns::RACE_DATE),
            circuit_name.alias(columns::CIRCUIT_NAME),
            col(work::CIRCUIT_COUNTRY).alias(columns::CIRCUIT_COUNTRY),
        ])
        .collect()?;
    Ok(frame)
}
