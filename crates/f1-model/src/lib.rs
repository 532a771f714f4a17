//! Core types for the F1 results warehouse.
//!
//! - **schema**: the four dimension tables and the fact table, with their
//!   surrogate and natural keys
//! - **source**: the six source CSV files and the columns each must carry
//! - **report**: pipeline stages, the error taxonomy and the run report

pub mod report;
pub mod schema;
pub mod source;

pub use report::{ErrorKind, RunReport, Stage, TableLoad};
pub use schema::{
    DIM_CONSTRUCTORS, DIM_DRIVERS, DIM_RACES, DIM_STATUS, Dimension, FACT_RESULTS, TableSpec,
    columns,
};
pub use source::{NULL_MARKER, SourceFile, source_columns};
