//! Source reader for the F1 warehouse load.
//!
//! Reads the six fixed CSV exports into Polars DataFrames, turning the `\N`
//! marker into nulls and checking that each file carries the columns the
//! transforms rely on.

pub mod error;
pub mod reader;

pub use error::{IngestError, Result};
pub use reader::{
    SourceTables, read_source_table, read_sources, require_columns, validate_encoding,
};
