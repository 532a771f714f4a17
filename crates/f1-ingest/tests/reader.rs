use std::fs;
use std::path::Path;

use f1_ingest::{IngestError, read_source_table, read_sources};
use f1_model::{ErrorKind, SourceFile};
use polars::prelude::DataType;
use tempfile::TempDir;

const DRIVERS: &str = "driverId,givenName,familyName,code,nationality,dateOfBirth\n\
1,Lewis,Hamilton,HAM,British,1985-01-07\n\
2,Nico,Rosberg,\\N,German,1985-06-27\n";
const CONSTRUCTORS: &str = "constructorId,constructorName,nationality\n1,McLaren,British\n";
const STATUS: &str = "statusId,status\n1,Finished\n2,Disqualified\n";
const RACES: &str = "season,round,raceName,circuitId,date\n2021,1,Bahrain GP,bahrain,2021-03-28\n";
const CIRCUITS: &str = "circuitId,circuitName,country\nbahrain,Bahrain International Circuit,Bahrain\n";
const RESULTS: &str = "season,round,status,driverId,constructorId,grid,position,points,laps,fastestLapRank,averageSpeed\n\
2021,1,Finished,1,1,2,1,25,56,4,208.2\n\
2021,1,Finished,2,1,1,2,18,56,\\N,\\N\n";

fn write_snapshot(dir: &Path) {
    let files = [
        (SourceFile::Drivers, DRIVERS),
        (SourceFile::Constructors, CONSTRUCTORS),
        (SourceFile::Status, STATUS),
        (SourceFile::Races, RACES),
        (SourceFile::Circuits, CIRCUITS),
        (SourceFile::RaceResults, RESULTS),
    ];
    for (source, contents) in files {
        fs::write(dir.join(source.file_name()), contents).expect("write source file");
    }
}

#[test]
fn reads_all_sources_and_maps_null_marker() {
    let dir = TempDir::new().expect("temp dir");
    write_snapshot(dir.path());

    let tables = read_sources(dir.path()).expect("read sources");
    assert_eq!(tables.drivers.height(), 2);
    assert_eq!(tables.results.height(), 2);

    let code = tables.drivers.column("code").unwrap();
    assert_eq!(code.null_count(), 1);
    assert_eq!(code.str().unwrap().get(0), Some("HAM"));
    assert_eq!(code.str().unwrap().get(1), None);

    let rank = tables.results.column("fastestLapRank").unwrap();
    assert_eq!(rank.dtype(), &DataType::Int64);
    assert_eq!(rank.null_count(), 1);
}

#[test]
fn missing_file_aborts_the_read() {
    let dir = TempDir::new().expect("temp dir");
    write_snapshot(dir.path());
    fs::remove_file(dir.path().join("circuits.csv")).expect("remove circuits");

    let err = read_sources(dir.path()).unwrap_err();
    match &err {
        IngestError::FileNotFound { path } => assert!(path.ends_with("circuits.csv")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn missing_column_is_a_schema_error() {
    let dir = TempDir::new().expect("temp dir");
    write_snapshot(dir.path());
    fs::write(
        dir.path().join("status.csv"),
        "statusId,description\n1,Finished\n",
    )
    .expect("rewrite status");

    let err = read_sources(dir.path()).unwrap_err();
    match &err {
        IngestError::MissingColumn { column, table } => {
            assert_eq!(column, "status");
            assert_eq!(table, "status");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn missing_directory_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let err = read_sources(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
}

#[test]
fn headers_are_trimmed() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("status.csv");
    fs::write(&path, "\u{feff}statusId , status\n1,Finished\n").expect("write status");

    let df = read_source_table(&path).expect("read status");
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["statusId", "status"]);
}

#[test]
fn races_may_omit_race_id() {
    let dir = TempDir::new().expect("temp dir");
    write_snapshot(dir.path());

    let tables = read_sources(dir.path()).expect("read sources");
    assert!(tables.races.column("raceId").is_err());
    assert_eq!(
        tables.races.column("season").unwrap().dtype(),
        &DataType::Int64
    );
}
