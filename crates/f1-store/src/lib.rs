//! Warehouse writers for the F1 star schema.
//!
//! [`WarehouseStore`] is the seam between the pipeline and the database:
//! [`PgWarehouse`] appends to PostgreSQL in batched transactions and
//! [`MemoryStore`] keeps everything in memory for tests.

pub mod bind;
pub mod error;
pub mod memory;
pub mod postgres;
mod store;

pub use bind::BoundColumn;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::{PgWarehouse, WarehouseOptions};
pub use store::WarehouseStore;
