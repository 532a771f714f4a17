//! Target star-schema definitions.
//!
//! The warehouse has four dimension tables, each keyed by a surrogate key
//! generated by the database on insert, and one fact table that references
//! the dimensions by those keys. [`TableSpec::columns`] lists the columns the
//! loader writes; generated key columns are never part of it.

use std::fmt;

use serde::Serialize;

/// Output column names shared by the builders, the loader and the resolver.
pub mod columns {
    pub const DRIVER_KEY: &str = "driver_key";
    pub const DRIVER_ID: &str = "driver_id";
    pub const FULL_NAME: &str = "full_name";
    pub const DRIVER_CODE: &str = "driver_code";
    pub const NATIONALITY: &str = "nationality";
    pub const DATE_OF_BIRTH: &str = "date_of_birth";

    pub const CONSTRUCTOR_KEY: &str = "constructor_key";
    pub const CONSTRUCTOR_ID: &str = "constructor_id";
    pub const CONSTRUCTOR_NAME: &str = "constructor_name";

    pub const STATUS_KEY: &str = "status_key";
    pub const STATUS_ID: &str = "status_id";
    pub const STATUS_DESCRIPTION: &str = "status_description";

    pub const RACE_KEY: &str = "race_key";
    pub const RACE_ID: &str = "race_id";
    pub const RACE_NAME: &str = "race_name";
    pub const SEASON: &str = "season";
    pub const ROUND: &str = "round";
    pub const RACE_DATE: &str = "race_date";
    pub const CIRCUIT_NAME: &str = "circuit_name";
    pub const CIRCUIT_COUNTRY: &str = "circuit_country";

    pub const GRID_POSITION: &str = "grid_position";
    pub const FINAL_POSITION: &str = "final_position";
    pub const POINTS_EARNED: &str = "points_earned";
    pub const LAPS_COMPLETED: &str = "laps_completed";
    pub const FASTEST_LAP_RANK: &str = "fastest_lap_rank";
    pub const AVERAGE_SPEED: &str = "average_speed";
}

use columns::{
    AVERAGE_SPEED, CIRCUIT_COUNTRY, CIRCUIT_NAME, CONSTRUCTOR_ID, CONSTRUCTOR_KEY,
    CONSTRUCTOR_NAME, DATE_OF_BIRTH, DRIVER_CODE, DRIVER_ID, DRIVER_KEY, FASTEST_LAP_RANK,
    FINAL_POSITION, FULL_NAME, GRID_POSITION, LAPS_COMPLETED, NATIONALITY, POINTS_EARNED,
    RACE_DATE, RACE_ID, RACE_KEY, RACE_NAME, ROUND, SEASON, STATUS_DESCRIPTION, STATUS_ID,
    STATUS_KEY,
};

/// A warehouse table and the columns the loader writes into it, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl fmt::Display for TableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub const DIM_DRIVERS: TableSpec = TableSpec {
    name: "dim_drivers",
    columns: &[DRIVER_ID, FULL_NAME, DRIVER_CODE, NATIONALITY, DATE_OF_BIRTH],
};

pub const DIM_CONSTRUCTORS: TableSpec = TableSpec {
    name: "dim_constructors",
    columns: &[CONSTRUCTOR_ID, CONSTRUCTOR_NAME, NATIONALITY],
};

pub const DIM_STATUS: TableSpec = TableSpec {
    name: "dim_status",
    columns: &[STATUS_ID, STATUS_DESCRIPTION],
};

pub const DIM_RACES: TableSpec = TableSpec {
    name: "dim_races",
    columns: &[
        RACE_ID,
        RACE_NAME,
        SEASON,
        ROUND,
        RACE_DATE,
        CIRCUIT_NAME,
        CIRCUIT_COUNTRY,
    ],
};

pub const FACT_RESULTS: TableSpec = TableSpec {
    name: "fact_results",
    columns: &[
        RACE_KEY,
        DRIVER_KEY,
        CONSTRUCTOR_KEY,
        STATUS_KEY,
        GRID_POSITION,
        FINAL_POSITION,
        POINTS_EARNED,
        LAPS_COMPLETED,
        FASTEST_LAP_RANK,
        AVERAGE_SPEED,
    ],
};

/// The four dimensions of the results star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Drivers,
    Constructors,
    Status,
    Races,
}

impl Dimension {
    /// Load order; also the order in which fact rows are joined.
    pub const ALL: [Dimension; 4] = [
        Dimension::Drivers,
        Dimension::Constructors,
        Dimension::Status,
        Dimension::Races,
    ];

    pub fn table(self) -> &'static TableSpec {
        match self {
            Dimension::Drivers => &DIM_DRIVERS,
            Dimension::Constructors => &DIM_CONSTRUCTORS,
            Dimension::Status => &DIM_STATUS,
            Dimension::Races => &DIM_RACES,
        }
    }

    /// Column holding the store-generated surrogate key.
    pub fn surrogate_key(self) -> &'static str {
        match self {
            Dimension::Drivers => DRIVER_KEY,
            Dimension::Constructors => CONSTRUCTOR_KEY,
            Dimension::Status => STATUS_KEY,
            Dimension::Races => RACE_KEY,
        }
    }

    /// Column holding the source identifier.
    pub fn natural_key(self) -> &'static str {
        match self {
            Dimension::Drivers => DRIVER_ID,
            Dimension::Constructors => CONSTRUCTOR_ID,
            Dimension::Status => STATUS_ID,
            Dimension::Races => RACE_ID,
        }
    }

    /// Resolve a dimension from its table name.
    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dimension| dimension.table().name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table().name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_tables_do_not_write_generated_keys() {
        for dimension in Dimension::ALL {
            let table = dimension.table();
            assert!(!table.columns.contains(&dimension.surrogate_key()));
            assert_eq!(table.columns[0], dimension.natural_key());
        }
    }

    #[test]
    fn fact_table_references_every_dimension_key() {
        for dimension in Dimension::ALL {
            assert!(FACT_RESULTS.columns.contains(&dimension.surrogate_key()));
        }
        assert_eq!(FACT_RESULTS.columns.len(), 10);
    }

    #[test]
    fn dimension_from_table_name() {
        assert_eq!(
            Dimension::from_table_name("dim_races"),
            Some(Dimension::Races)
        );
        assert_eq!(
            Dimension::from_table_name("DIM_STATUS"),
            Some(Dimension::Status)
        );
        assert_eq!(Dimension::from_table_name("fact_results"), None);
    }
}
