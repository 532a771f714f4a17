//! Error types for source ingestion.

use std::path::PathBuf;

use f1_model::ErrorKind;
use thiserror::Error;

/// Errors that can occur while reading the source files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input directory not found.
    #[error("input directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File uses an encoding the reader does not handle.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    // === Schema Errors ===
    /// Required column not found in a source file.
    #[error("required column '{column}' not found in {table}")]
    MissingColumn { column: String, table: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DirectoryNotFound { .. }
            | Self::FileNotFound { .. }
            | Self::FileRead { .. }
            | Self::UnsupportedEncoding { .. }
            | Self::CsvParse { .. } => ErrorKind::Io,
            Self::MissingColumn { .. } | Self::DataFrame { .. } => ErrorKind::Schema,
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/drivers.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /data/drivers.csv");
    }

    #[test]
    fn test_error_kind() {
        let missing = IngestError::MissingColumn {
            column: "driverId".to_string(),
            table: "drivers".to_string(),
        };
        assert_eq!(missing.kind(), ErrorKind::Schema);
        let not_found = IngestError::FileNotFound {
            path: PathBuf::from("status.csv"),
        };
        assert_eq!(not_found.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
