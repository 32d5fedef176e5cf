//! Facade crate for the UN/LOCODE database.
//!
//! This crate re-exports the core domain types and exposes the SQLite store and
//! the release-file loader behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use unlocode_core::{
    Country, DatasetSink, Function, Functions, Location, LocationKey, Status, Subdivision,
    UNKNOWN_COORDINATE, alias, decode_coordinates, nearest_location,
};

#[cfg(feature = "store-sqlite")]
pub use unlocode_core::{DatasetStats, LocodeDatabase, QueryError, Rebuild, StoreError};

#[cfg(feature = "store-sqlite")]
pub use unlocode_data::{
    IngestError, IngestReport, LoaderOptions, SourceEncoding, ingest_dir, rebuild_from_dir,
};
