//! PostgreSQL warehouse writer.

use std::time::Duration;

use async_trait::async_trait;
use f1_model::{Dimension, TableSpec};
use polars::prelude::*;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use tracing::debug;

use crate::bind::{bind_columns, insert_into, key_query, rows_per_statement};
use crate::error::{Result, StoreError};
use crate::store::WarehouseStore;

/// Connection settings for [`PgWarehouse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarehouseOptions {
    /// Rows per multi-row `INSERT`.
    pub batch_size: usize,
    /// How long to wait for the connection before giving up.
    pub connect_timeout: Duration,
}

impl Default for WarehouseOptions {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Appends frames to pre-existing PostgreSQL tables over a single connection.
pub struct PgWarehouse {
    pool: PgPool,
    batch_size: usize,
}

impl PgWarehouse {
    /// Open the pool and establish its one connection.
    pub async fn connect(database_url: &str, options: WarehouseOptions) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(options.connect_timeout)
            .connect(database_url)
            .await
            .map_err(StoreError::Connect)?;
        Ok(Self {
            pool,
            batch_size: options.batch_size,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Close the pool, waiting for the connection to be released.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl WarehouseStore for PgWarehouse {
    async fn append(&mut self, table: &TableSpec, frame: &DataFrame) -> Result<usize> {
        let columns = bind_columns(table, frame)?;
        let rows = frame.height();
        if rows == 0 {
            return Ok(0);
        }

        let write_error = |source: sqlx::Error| StoreError::Write {
            table: table.name.to_string(),
            source,
        };
        let batch = rows_per_statement(self.batch_size, columns.len());

        let mut tx = self.pool.begin().await.map_err(write_error)?;
        for start in (0..rows).step_by(batch) {
            let end = (start + batch).min(rows);
            let mut builder = QueryBuilder::<Postgres>::new(insert_into(table));
            builder.push(" ");
            builder.push_values(start..end, |mut tuple, row| {
                for column in &columns {
                    column.push_bind(row, &mut tuple);
                }
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(write_error)?;
            debug!(table = table.name, start, end, "batch inserted");
        }
        tx.commit().await.map_err(write_error)?;

        Ok(rows)
    }

    async fn key_lookup(&mut self, dimension: Dimension) -> Result<DataFrame> {
        let sql = key_query(dimension);
        let rows: Vec<(i64, Option<String>)> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|source| StoreError::Query {
                table: dimension.table().name.to_string(),
                source,
            })?;

        let (keys, naturals): (Vec<i64>, Vec<Option<String>>) = rows.into_iter().unzip();
        let frame = DataFrame::new(vec![
            Series::new(dimension.surrogate_key().into(), keys).into_column(),
            Series::new(dimension.natural_key().into(), naturals).into_column(),
        ])?;
        Ok(frame)
    }
}
