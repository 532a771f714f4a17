//! CSV file reading with the source export's null marker.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use f1_common::missing_columns;
use f1_model::{NULL_MARKER, SourceFile};
use polars::prelude::*;
use tracing::{debug, info_span, warn};

use crate::error::{IngestError, Result};

/// Open a file, mapping a missing path to [`IngestError::FileNotFound`].
fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = open_source(path)?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Trim whitespace and byte-order marks from column names in place.
fn normalize_headers(df: &mut DataFrame) -> Result<()> {
    let current: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let normalized: Vec<String> = current.iter().map(|name| normalize_header(name)).collect();
    if normalized != current {
        df.set_column_names(normalized)?;
    }
    Ok(())
}

/// Reads one source CSV into a DataFrame.
///
/// The whole file is used for schema inference and every `\N` cell becomes
/// null, so numeric columns with missing values still load as numbers.
pub fn read_source_table(path: &Path) -> Result<DataFrame> {
    validate_encoding(path)?;

    let parse_error = |e: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|options| {
            options.with_null_values(Some(NullValues::AllColumnsSingle(NULL_MARKER.into())))
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)?;

    normalize_headers(&mut df)?;

    if df.height() == 0 {
        warn!(path = %path.display(), "source file has no data rows");
    }

    Ok(df)
}

/// Fail with [`IngestError::MissingColumn`] for the first absent column.
pub fn require_columns(df: &DataFrame, table: &str, required: &[&str]) -> Result<()> {
    match missing_columns(df, required).into_iter().next() {
        Some(column) => Err(IngestError::MissingColumn {
            column,
            table: table.to_string(),
        }),
        None => Ok(()),
    }
}

/// The six source tables of one snapshot.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub drivers: DataFrame,
    pub constructors: DataFrame,
    pub status: DataFrame,
    pub races: DataFrame,
    pub circuits: DataFrame,
    pub results: DataFrame,
}

impl SourceTables {
    pub fn get(&self, source: SourceFile) -> &DataFrame {
        match source {
            SourceFile::Drivers => &self.drivers,
            SourceFile::Constructors => &self.constructors,
            SourceFile::Status => &self.status,
            SourceFile::Races => &self.races,
            SourceFile::Circuits => &self.circuits,
            SourceFile::RaceResults => &self.results,
        }
    }

    /// Check every table against its required column list.
    pub fn validate(&self) -> Result<()> {
        for source in SourceFile::ALL {
            require_columns(
                self.get(source),
                source.table_name(),
                source.required_columns(),
            )?;
        }
        Ok(())
    }
}

/// Read and validate all six source files from `dir`.
///
/// Nothing is written anywhere until every file has been read, so a missing
/// or malformed file aborts the run before the database is touched.
pub fn read_sources(dir: &Path) -> Result<SourceTables> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let read = |source: SourceFile| -> Result<DataFrame> {
        let path = dir.join(source.file_name());
        info_span!("read_source", file = source.file_name()).in_scope(|| -> Result<DataFrame> {
            let start = Instant::now();
            let df = read_source_table(&path)?;
            debug!(
                path = %path.display(),
                rows = df.height(),
                columns = df.width(),
                duration_ms = start.elapsed().as_millis(),
                "source loaded"
            );
            Ok(df)
        })
    };

    let tables = SourceTables {
        drivers: read(SourceFile::Drivers)?,
        constructors: read(SourceFile::Constructors)?,
        status: read(SourceFile::Status)?,
        races: read(SourceFile::Races)?,
        circuits: read(SourceFile::Circuits)?,
        results: read(SourceFile::RaceResults)?,
    };
    tables.validate()?;
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  driverId "), "driverId");
        assert_eq!(normalize_header("\u{feff}driverId"), "driverId");
    }

    #[test]
    fn test_validate_encoding_rejects_utf16() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'a', 0x00]);
        let err = validate_encoding(file.path()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_encoding_accepts_utf8() {
        let file = create_temp_csv(b"statusId,status\n1,Finished\n");
        assert!(validate_encoding(file.path()).is_ok());
    }

    #[test]
    fn test_require_columns_reports_first_missing() {
        let file = create_temp_csv(b"statusId\n1\n");
        let df = read_source_table(file.path()).unwrap();
        let err = require_columns(&df, "status", &["statusId", "status"]).unwrap_err();
        match err {
            IngestError::MissingColumn { column, table } => {
                assert_eq!(column, "status");
                assert_eq!(table, "status");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
