//! Error types for warehouse writes and key reads.

use f1_model::ErrorKind;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by a [`WarehouseStore`](crate::WarehouseStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be reached.
    #[error("failed to connect to the warehouse: {0}")]
    Connect(#[source] sqlx::Error),

    /// An append was rejected; the table's transaction was rolled back.
    #[error("failed to append to {table}: {source}")]
    Write {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    /// Reading surrogate keys back failed.
    #[error("failed to read keys from {table}: {source}")]
    Query {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    /// The frame does not carry a column the table expects.
    #[error("column '{column}' missing from frame for {table}")]
    MissingColumn { table: String, column: String },

    /// A frame column has a dtype the writer cannot bind.
    #[error("column '{column}' of {table} has unsupported type {dtype}")]
    UnsupportedType {
        table: String,
        column: String,
        dtype: String,
    },

    #[error("dataframe error: {0}")]
    Frame(#[from] PolarsError),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connect(_) => ErrorKind::Connectivity,
            Self::Write { source, .. } if is_connectivity(source) => ErrorKind::Connectivity,
            Self::Write { .. } => ErrorKind::Write,
            Self::Query { source, .. } if is_connectivity(source) => ErrorKind::Connectivity,
            Self::Query { .. }
            | Self::MissingColumn { .. }
            | Self::UnsupportedType { .. }
            | Self::Frame(_) => ErrorKind::Schema,
        }
    }
}

/// Errors that mean the connection went away rather than the statement failing.
fn is_connectivity(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn write(source: sqlx::Error) -> StoreError {
        StoreError::Write {
            table: "dim_drivers".to_string(),
            source,
        }
    }

    #[test]
    fn connect_errors_are_connectivity() {
        let err = StoreError::Connect(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), ErrorKind::Connectivity);
    }

    #[test]
    fn dropped_connection_during_write_is_connectivity() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert_eq!(write(sqlx::Error::Io(io)).kind(), ErrorKind::Connectivity);
        assert_eq!(write(sqlx::Error::PoolClosed).kind(), ErrorKind::Connectivity);
    }

    #[test]
    fn rejected_statement_is_a_write_error() {
        let err = write(sqlx::Error::Protocol("relation does not exist".to_string()));
        assert_eq!(err.kind(), ErrorKind::Write);
        assert!(err.to_string().contains("dim_drivers"));
    }

    #[test]
    fn failed_key_read_is_a_schema_error() {
        let err = StoreError::Query {
            table: "dim_status".to_string(),
            source: sqlx::Error::RowNotFound,
        };
        assert_eq!(err.kind(), ErrorKind::Schema);
    }
}
