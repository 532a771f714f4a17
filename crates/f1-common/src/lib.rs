//! Shared utilities for the F1 warehouse crates.
//!
//! This crate provides the Polars helpers used across the workspace: column
//! presence checks and `AnyValue` text rendering for natural keys.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{any_to_string, format_numeric, has_column, missing_columns};
