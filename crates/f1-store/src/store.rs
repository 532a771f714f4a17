use async_trait::async_trait;
use f1_model::{Dimension, TableSpec};
use polars::prelude::DataFrame;

use crate::error::Result;

/// Destination of a warehouse load.
///
/// Appends never truncate or overwrite; a table written twice holds both
/// copies. Surrogate keys are assigned by the store and read back through
/// [`key_lookup`](WarehouseStore::key_lookup).
#[async_trait]
pub trait WarehouseStore: Send {
    /// Append the columns `table` lists from `frame`. Returns rows written.
    async fn append(&mut self, table: &TableSpec, frame: &DataFrame) -> Result<usize>;

    /// Two-column frame: surrogate key (Int64) and natural key (String).
    async fn key_lookup(&mut self, dimension: Dimension) -> Result<DataFrame>;
}
