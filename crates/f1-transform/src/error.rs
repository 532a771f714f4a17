use f1_model::{Dimension, ErrorKind};
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("required column '{column}' not found in {table}")]
    MissingColumn { column: String, table: String },
    #[error("no key lookup loaded for {0}")]
    MissingLookup(Dimension),
    #[error("dataframe error: {0}")]
    DataFrame(#[from] PolarsError),
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Schema
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
