//! Frame-to-SQL binding.
//!
//! Each table column is materialised once per append into a [`BoundColumn`]
//! matching its frame dtype, then bound row by row into multi-row `INSERT`
//! statements.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use f1_model::{Dimension, TableSpec};
use polars::prelude::*;
use sqlx::Postgres;
use sqlx::query_builder::Separated;

use crate::error::{Result, StoreError};

/// PostgreSQL caps one statement at this many bind parameters.
const MAX_BIND_PARAMS: usize = u16::MAX as usize;

/// One frame column converted to the Rust type it binds as.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundColumn {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Date(Vec<Option<NaiveDate>>),
    Bool(Vec<Option<bool>>),
}

impl BoundColumn {
    /// Convert `column` by dtype. All-null columns bind as text.
    pub fn from_column(table: &str, column: &Column) -> Result<Self> {
        let bound = match column.dtype() {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => {
                let ints = column.cast(&DataType::Int64)?;
                Self::Int(ints.i64()?.into_iter().collect())
            }
            DataType::Float32 | DataType::Float64 => {
                let floats = column.cast(&DataType::Float64)?;
                Self::Float(floats.f64()?.into_iter().collect())
            }
            DataType::String => Self::Text(
                column
                    .str()?
                    .into_iter()
                    .map(|value| value.map(str::to_string))
                    .collect(),
            ),
            DataType::Date => {
                let days = column.cast(&DataType::Int32)?;
                Self::Date(
                    days.i32()?
                        .into_iter()
                        .map(|value| value.and_then(days_to_date))
                        .collect(),
                )
            }
            DataType::Boolean => Self::Bool(column.bool()?.into_iter().collect()),
            DataType::Null => Self::Text(vec![None; column.len()]),
            other => {
                return Err(StoreError::UnsupportedType {
                    table: table.to_string(),
                    column: column.name().to_string(),
                    dtype: other.to_string(),
                });
            }
        };
        Ok(bound)
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int(values) => values.len(),
            Self::Float(values) => values.len(),
            Self::Text(values) => values.len(),
            Self::Date(values) => values.len(),
            Self::Bool(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind the value at `row` as the next tuple element.
    pub fn push_bind<Sep: std::fmt::Display>(
        &self,
        row: usize,
        tuple: &mut Separated<'_, '_, Postgres, Sep>,
    ) {
        match self {
            Self::Int(values) => tuple.push_bind(values[row]),
            Self::Float(values) => tuple.push_bind(values[row]),
            Self::Text(values) => tuple.push_bind(values[row].clone()),
            Self::Date(values) => tuple.push_bind(values[row]),
            Self::Bool(values) => tuple.push_bind(values[row]),
        };
    }
}

fn days_to_date(days: i32) -> Option<NaiveDate> {
    DateTime::<Utc>::UNIX_EPOCH
        .date_naive()
        .checked_add_signed(TimeDelta::try_days(i64::from(days))?)
}

/// Bind every column `table` writes, in table order.
pub fn bind_columns(table: &TableSpec, frame: &DataFrame) -> Result<Vec<BoundColumn>> {
    table
        .columns
        .iter()
        .map(|name| {
            let column = frame
                .column(name)
                .map_err(|_| StoreError::MissingColumn {
                    table: table.name.to_string(),
                    column: (*name).to_string(),
                })?;
            BoundColumn::from_column(table.name, column)
        })
        .collect()
}

/// `INSERT INTO <table> (<columns>)`, without the `VALUES` clause.
pub fn insert_into(table: &TableSpec) -> String {
    format!(
        "INSERT INTO {} ({})",
        table.name,
        table.columns.join(", ")
    )
}

/// Query returning `(surrogate key, natural key as text)` for every row.
pub fn key_query(dimension: Dimension) -> String {
    format!(
        "SELECT {}::bigint, {}::text FROM {}",
        dimension.surrogate_key(),
        dimension.natural_key(),
        dimension.table().name
    )
}

/// Rows per `INSERT`, reduced so one statement stays under the bind limit.
pub fn rows_per_statement(batch_size: usize, columns: usize) -> usize {
    let limit = MAX_BIND_PARAMS / columns.max(1);
    batch_size.clamp(1, limit.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1_model::{DIM_STATUS, FACT_RESULTS};

    #[test]
    fn insert_statement_lists_table_columns() {
        insta::assert_snapshot!(
            insert_into(&DIM_STATUS),
            @"INSERT INTO dim_status (status_id, status_description)"
        );
    }

    #[test]
    fn key_query_casts_natural_key_to_text() {
        insta::assert_snapshot!(
            key_query(Dimension::Races),
            @"SELECT race_key::bigint, race_id::text FROM dim_races"
        );
    }

    #[test]
    fn batches_respect_bind_limit() {
        assert_eq!(rows_per_statement(1000, FACT_RESULTS.columns.len()), 1000);
        assert_eq!(rows_per_statement(100_000, 10), 6553);
        assert_eq!(rows_per_statement(0, 10), 1);
    }

    #[test]
    fn date_columns_bind_as_calendar_dates() {
        let dates = Series::new("race_date".into(), vec![Some(0i32), Some(18_714), None])
            .cast(&DataType::Date)
            .unwrap()
            .into_column();
        let bound = BoundColumn::from_column("dim_races", &dates).unwrap();
        assert_eq!(
            bound,
            BoundColumn::Date(vec![
                NaiveDate::from_ymd_opt(1970, 1, 1),
                NaiveDate::from_ymd_opt(2021, 3, 28),
                None,
            ])
        );
    }

    #[test]
    fn integer_widths_bind_as_bigint() {
        let column = Series::new("season".into(), vec![2021i32, 2022]).into_column();
        let bound = BoundColumn::from_column("dim_races", &column).unwrap();
        assert_eq!(bound, BoundColumn::Int(vec![Some(2021), Some(2022)]));
    }

    #[test]
    fn all_null_column_binds_as_text() {
        let column = Column::full_null("driver_code".into(), 2, &DataType::Null);
        let bound = BoundColumn::from_column("dim_drivers", &column).unwrap();
        assert_eq!(bound, BoundColumn::Text(vec![None, None]));
    }

    #[test]
    fn missing_table_column_is_reported() {
        let frame = DataFrame::new(vec![
            Series::new("status_id".into(), vec![1i64]).into_column(),
        ])
        .unwrap();
        let err = bind_columns(&DIM_STATUS, &frame).unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingColumn { ref column, .. } if column == "status_description"
        ));
    }
}
