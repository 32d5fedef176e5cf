//! Core domain types and storage for the UN/LOCODE dataset.
//!
//! The crate models the three entity kinds published by UNECE (countries,
//! subdivisions, locations) and, with the `store-sqlite` feature, persists
//! them in a SQLite database that backs the lookup operations.

pub mod alias;
mod coordinate;
mod country;
mod function;
mod location;
mod nearest;
mod status;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use coordinate::{UNKNOWN_COORDINATE, decode_coordinates, from_columns, to_columns};
pub use country::{Country, Subdivision};
pub use function::{Function, Functions};
pub use location::{Location, LocationKey};
pub use nearest::{nearest_location, weighted_squared_distance};
pub use status::Status;
pub use store::DatasetSink;
#[cfg(feature = "store-sqlite")]
pub use store::{
    DatasetStats, LocodeDatabase, QueryError, Rebuild, SCHEMA_VERSION, SchemaError, StoreError,
    initialise_schema,
};
