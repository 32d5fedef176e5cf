//! Storage boundary for the UN/LOCODE dataset.
//!
//! The [`DatasetSink`] trait is the write-side contract the loader depends
//! on: whole-row upserts keyed by each entity's primary key. With the
//! `store-sqlite` feature, [`LocodeDatabase`] provides the SQLite
//! implementation together with the read-only query operations.

use crate::{Country, Location, Subdivision};

#[cfg(feature = "store-sqlite")]
mod query;
#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use query::{DatasetStats, QueryError};
#[cfg(feature = "store-sqlite")]
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{LocodeDatabase, Rebuild, StoreError};

/// Receives decoded records during a rebuild.
///
/// Each upsert replaces any existing row under the same primary key in its
/// entirety; implementations must not merge fields.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use std::convert::Infallible;
/// use unlocode_core::{Country, DatasetSink, Location, Subdivision};
///
/// #[derive(Default)]
/// struct CountryNames(BTreeMap<String, String>);
///
/// impl DatasetSink for CountryNames {
///     type Error = Infallible;
///
///     fn upsert_country(&mut self, country: &Country) -> Result<(), Infallible> {
///         self.0.insert(country.code.clone(), country.name.clone());
///         Ok(())
///     }
///
///     fn upsert_subdivision(&mut self, _: &Subdivision) -> Result<(), Infallible> {
///         Ok(())
///     }
///
///     fn upsert_location(&mut self, _: &Location) -> Result<(), Infallible> {
///         Ok(())
///     }
/// }
///
/// let mut sink = CountryNames::default();
/// sink.upsert_country(&Country::new("RU", "RUSSIA")).unwrap();
/// sink.upsert_country(&Country::new("RU", "RUSSIAN FEDERATION")).unwrap();
/// assert_eq!(sink.0["RU"], "RUSSIAN FEDERATION");
/// ```
pub trait DatasetSink {
    /// Error raised when a write fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert or replace a country keyed by its code.
    fn upsert_country(&mut self, country: &Country) -> Result<(), Self::Error>;

    /// Insert or replace a subdivision keyed by `(country, subdivision)`.
    fn upsert_subdivision(&mut self, subdivision: &Subdivision) -> Result<(), Self::Error>;

    /// Insert or replace a location keyed by `(country, location)`.
    fn upsert_location(&mut self, location: &Location) -> Result<(), Self::Error>;
}
