//! In-memory warehouse used by tests and dry runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use f1_common::any_to_string;
use f1_model::{Dimension, TableSpec};
use polars::prelude::*;

use crate::bind::bind_columns;
use crate::error::{Result, StoreError};
use crate::store::WarehouseStore;

#[derive(Debug)]
struct StoredTable {
    chunks: Vec<DataFrame>,
    next_key: i64,
}

/// A [`WarehouseStore`] holding appended frames in memory.
///
/// Dimension tables get sequential surrogate keys starting at 1, the way a
/// database identity column would; keys keep counting across appends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: BTreeMap<&'static str, StoredTable>,
    failing_table: Option<&'static str>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every append to `table` with a write error.
    pub fn failing_on(mut self, table: &'static str) -> Self {
        self.failing_table = Some(table);
        self
    }

    /// Rows currently stored in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .get(table)
            .map_or(0, |stored| stored.chunks.iter().map(DataFrame::height).sum())
    }

    /// All rows of `table`, appends stacked in order.
    pub fn table(&self, table: &str) -> Result<Option<DataFrame>> {
        let Some(stored) = self.tables.get(table) else {
            return Ok(None);
        };
        let mut chunks = stored.chunks.iter();
        let Some(first) = chunks.next() else {
            return Ok(None);
        };
        let mut stacked = first.clone();
        for chunk in chunks {
            stacked.vstack_mut(chunk)?;
        }
        Ok(Some(stacked))
    }
}

#[async_trait]
impl WarehouseStore for MemoryStore {
    async fn append(&mut self, table: &TableSpec, frame: &DataFrame) -> Result<usize> {
        if self.failing_table == Some(table.name) {
            return Err(StoreError::Write {
                table: table.name.to_string(),
                source: sqlx::Error::Protocol(format!("{} rejected the append", table.name)),
            });
        }

        bind_columns(table, frame)?;
        let mut chunk = frame.select(table.columns.iter().copied())?;
        let rows = chunk.height();

        let stored = self.tables.entry(table.name).or_insert_with(|| StoredTable {
            chunks: Vec::new(),
            next_key: 1,
        });
        if let Some(dimension) = Dimension::from_table_name(table.name) {
            let first = stored.next_key;
            let keys: Vec<i64> = (first..).take(rows).collect();
            stored.next_key = first + keys.len() as i64;
            chunk.insert_column(0, Series::new(dimension.surrogate_key().into(), keys))?;
        }
        stored.chunks.push(chunk);
        Ok(rows)
    }

    async fn key_lookup(&mut self, dimension: Dimension) -> Result<DataFrame> {
        let key_name = dimension.surrogate_key();
        let natural_name = dimension.natural_key();
        let mut keys: Vec<i64> = Vec::new();
        let mut naturals: Vec<Option<String>> = Vec::new();

        if let Some(stored) = self.tables.get(dimension.table().name) {
            for chunk in &stored.chunks {
                keys.extend(chunk.column(key_name)?.i64()?.into_iter().flatten());
                let natural = chunk.column(natural_name)?;
                for idx in 0..natural.len() {
                    naturals.push(match natural.get(idx)? {
                        AnyValue::Null => None,
                        value => Some(any_to_string(value)),
                    });
                }
            }
        }

        let frame = DataFrame::new(vec![
            Series::new(key_name.into(), keys).into_column(),
            Series::new(natural_name.into(), naturals).into_column(),
        ])?;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1_model::{DIM_STATUS, FACT_RESULTS};

    fn status_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("status_id".into(), vec![1i64, 2]).into_column(),
            Series::new("status_description".into(), vec!["Finished", "Retired"]).into_column(),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn dimension_appends_get_sequential_keys() {
        let mut store = MemoryStore::new();
        store.append(&DIM_STATUS, &status_frame()).await.unwrap();
        store.append(&DIM_STATUS, &status_frame()).await.unwrap();

        let lookup = store.key_lookup(Dimension::Status).await.unwrap();
        let keys: Vec<Option<i64>> = lookup
            .column("status_key")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(keys, vec![Some(1), Some(2), Some(3), Some(4)]);
        let naturals = lookup.column("status_id").unwrap().str().unwrap();
        assert_eq!(naturals.get(0), Some("1"));
        assert_eq!(naturals.get(3), Some("2"));
    }

    #[tokio::test]
    async fn lookup_of_empty_table_is_empty() {
        let mut store = MemoryStore::new();
        let lookup = store.key_lookup(Dimension::Drivers).await.unwrap();
        assert_eq!(lookup.height(), 0);
        assert_eq!(lookup.width(), 2);
    }

    #[tokio::test]
    async fn fact_table_has_no_generated_key() {
        let mut store = MemoryStore::new();
        let facts = DataFrame::new(
            FACT_RESULTS
                .columns
                .iter()
                .map(|name| Series::new((*name).into(), vec![1i64]).into_column())
                .collect(),
        )
        .unwrap();
        assert_eq!(store.append(&FACT_RESULTS, &facts).await.unwrap(), 1);
        let stored = store.table("fact_results").unwrap().unwrap();
        assert_eq!(stored.width(), FACT_RESULTS.columns.len());
    }

    #[tokio::test]
    async fn failing_table_rejects_appends() {
        let mut store = MemoryStore::new().failing_on("dim_status");
        let err = store.append(&DIM_STATUS, &status_frame()).await.unwrap_err();
        assert_eq!(err.kind(), f1_model::ErrorKind::Write);
        assert_eq!(store.row_count("dim_status"), 0);
    }
}
