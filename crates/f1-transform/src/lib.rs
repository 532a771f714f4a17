//! Transformations for the F1 results star schema.
//!
//! - **dimensions**: driver, constructor, status and race dimension builders
//! - **race_id**: `season * 1000 + round` identifiers and the discrepancy check
//! - **keys**: natural-key to surrogate-key lookups read back from the store
//! - **facts**: the `fact_results` builder

mod columns;
pub mod dimensions;
pub mod error;
pub mod facts;
pub mod keys;
pub mod race_id;

pub use columns::require_columns;
pub use dimensions::{
    DimensionFrames, build_dim_constructors, build_dim_drivers, build_dim_races,
    build_dim_status, build_dimensions, parse_date,
};
pub use error::{Result, TransformError};
pub use facts::{FactBuild, build_fact_results};
pub use keys::KeyLookups;
pub use race_id::{
    RACE_ID_SEASON_FACTOR, race_id_discrepancies, synthesize_race_id, synthesized_race_id,
};
