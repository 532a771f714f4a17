//! Natural-key to surrogate-key lookup tables.
//!
//! After the dimensions are appended, the store is read back for every
//! `(surrogate key, natural key)` pair. The fact builder joins result rows to
//! these lookups; natural keys are compared as text on both sides so integer
//! and string identifiers resolve alike.

use std::collections::BTreeMap;

use f1_model::Dimension;
use polars::prelude::*;

use crate::columns::require_columns;
use crate::error::{Result, TransformError};

/// One lookup frame per dimension, each with the dimension's surrogate-key
/// column and natural-key column.
#[derive(Debug, Clone, Default)]
pub struct KeyLookups {
    frames: BTreeMap<Dimension, DataFrame>,
}

impl KeyLookups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the lookup for `dimension`, replacing any previous one.
    pub fn insert(&mut self, dimension: Dimension, frame: DataFrame) -> Result<()> {
        require_columns(
            &frame,
            dimension.table().name,
            &[dimension.surrogate_key(), dimension.natural_key()],
        )?;
        self.frames.insert(dimension, frame);
        Ok(())
    }

    pub fn get(&self, dimension: Dimension) -> Result<&DataFrame> {
        self.frames
            .get(&dimension)
            .ok_or(TransformError::MissingLookup(dimension))
    }

    /// Number of key pairs held for `dimension`.
    pub fn len(&self, dimension: Dimension) -> usize {
        self.frames.get(&dimension).map_or(0, DataFrame::height)
    }

    pub fn is_complete(&self) -> bool {
        Dimension::ALL
            .iter()
            .all(|dimension| self.frames.contains_key(dimension))
    }

    /// The lookup as a lazy frame of `(surrogate key, natural key as text)`,
    /// with the natural key renamed to `join_column`.
    pub(crate) fn join_frame(&self, dimension: Dimension, join_column: &str) -> Result<LazyFrame> {
        let frame = self.get(dimension)?;
        Ok(frame.clone().lazy().select([
            col(dimension.surrogate_key()).cast(DataType::Int64),
            col(dimension.natural_key())
                .cast(DataType::String)
                .alias(join_column),
        ]))
    }
}
