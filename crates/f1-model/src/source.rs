//! Catalog of the source CSV files and the columns each must provide.

use std::fmt;

/// Column names as they appear in the source CSV headers.
pub mod source_columns {
    pub const DRIVER_ID: &str = "driverId";
    pub const GIVEN_NAME: &str = "givenName";
    pub const FAMILY_NAME: &str = "familyName";
    pub const CODE: &str = "code";
    pub const NATIONALITY: &str = "nationality";
    pub const DATE_OF_BIRTH: &str = "dateOfBirth";

    pub const CONSTRUCTOR_ID: &str = "constructorId";
    pub const CONSTRUCTOR_NAME: &str = "constructorName";

    pub const STATUS_ID: &str = "statusId";
    pub const STATUS: &str = "status";

    pub const RACE_ID: &str = "raceId";
    pub const CIRCUIT_ID: &str = "circuitId";
    pub const RACE_NAME: &str = "raceName";
    pub const SEASON: &str = "season";
    pub const ROUND: &str = "round";
    pub const DATE: &str = "date";

    pub const CIRCUIT_NAME: &str = "circuitName";
    pub const COUNTRY: &str = "country";

    pub const GRID: &str = "grid";
    pub const POSITION: &str = "position";
    pub const POINTS: &str = "points";
    pub const LAPS: &str = "laps";
    pub const FASTEST_LAP_RANK: &str = "fastestLapRank";
    pub const AVERAGE_SPEED: &str = "averageSpeed";
}

use source_columns::{
    AVERAGE_SPEED, CIRCUIT_ID, CIRCUIT_NAME, CODE, CONSTRUCTOR_ID, CONSTRUCTOR_NAME, COUNTRY,
    DATE, DATE_OF_BIRTH, DRIVER_ID, FAMILY_NAME, FASTEST_LAP_RANK, GIVEN_NAME, GRID, LAPS,
    NATIONALITY, POINTS, POSITION, RACE_NAME, ROUND, SEASON, STATUS, STATUS_ID,
};

/// Literal used by the source export for missing values.
pub const NULL_MARKER: &str = "\\N";

/// One of the six fixed input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceFile {
    Drivers,
    Constructors,
    Status,
    Races,
    Circuits,
    RaceResults,
}

impl SourceFile {
    pub const ALL: [SourceFile; 6] = [
        SourceFile::Drivers,
        SourceFile::Constructors,
        SourceFile::Status,
        SourceFile::Races,
        SourceFile::Circuits,
        SourceFile::RaceResults,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SourceFile::Drivers => "drivers.csv",
            SourceFile::Constructors => "constructors.csv",
            SourceFile::Status => "status.csv",
            SourceFile::Races => "races.csv",
            SourceFile::Circuits => "circuits.csv",
            SourceFile::RaceResults => "race_results.csv",
        }
    }

    /// Short name used in logs and error messages.
    pub fn table_name(self) -> &'static str {
        self.file_name().trim_end_matches(".csv")
    }

    /// Columns that must be present. `raceId` and `circuitName` are optional
    /// in the races file and therefore not listed.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            SourceFile::Drivers => &[
                DRIVER_ID,
                GIVEN_NAME,
                FAMILY_NAME,
                CODE,
                NATIONALITY,
                DATE_OF_BIRTH,
            ],
            SourceFile::Constructors => &[CONSTRUCTOR_ID, CONSTRUCTOR_NAME, NATIONALITY],
            SourceFile::Status => &[STATUS_ID, STATUS],
            SourceFile::Races => &[CIRCUIT_ID, RACE_NAME, SEASON, ROUND, DATE],
            SourceFile::Circuits => &[CIRCUIT_ID, CIRCUIT_NAME, COUNTRY],
            SourceFile::RaceResults => &[
                SEASON,
                ROUND,
                STATUS,
                DRIVER_ID,
                CONSTRUCTOR_ID,
                GRID,
                POSITION,
                POINTS,
                LAPS,
                FASTEST_LAP_RANK,
                AVERAGE_SPEED,
            ],
        }
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_strips_extension() {
        assert_eq!(SourceFile::RaceResults.table_name(), "race_results");
        assert_eq!(SourceFile::Drivers.table_name(), "drivers");
    }

    #[test]
    fn races_do_not_require_an_identifier() {
        assert!(!SourceFile::Races
            .required_columns()
            .contains(&source_columns::RACE_ID));
    }
}
