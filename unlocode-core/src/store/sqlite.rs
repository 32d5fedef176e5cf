//! SQLite-backed storage for the UN/LOCODE dataset.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use rusqlite::{Connection, Error as SqliteError, Row, Transaction};
use thiserror::Error;

use crate::coordinate::{from_columns, to_columns};
use crate::{Country, Functions, Location, Subdivision};

use super::DatasetSink;
use super::schema::{SchemaError, initialise_schema};

/// Column list matching [`location_from_row`].
pub(crate) const LOCATION_COLUMNS: &str = "country_code, location_code, name, \
    subdivision_code, status_code, iata_code, longitude, latitude, remark, is_port, \
    is_airport, is_road_terminal, is_rail_terminal, is_postal_exchange_office, \
    is_border_cross";

/// Errors raised by the SQLite store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the parent directory for the database file.
    #[error("failed to create parent directory for {path:?}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Schema initialisation failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The handle was used after [`LocodeDatabase::close`].
    #[error("the UN/LOCODE database has been closed")]
    Closed,
    /// A statement failed.
    #[error("failed to {operation}")]
    Sqlite {
        /// What the store was doing.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Handle to a UN/LOCODE SQLite database.
///
/// The connection is opened once and held until [`close`](Self::close) is
/// called. Closing is idempotent; operations on a closed handle fail with
/// [`StoreError::Closed`].
///
/// # Examples
/// ```
/// use unlocode_core::{Country, DatasetSink, LocodeDatabase};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut db = LocodeDatabase::open_in_memory()?;
/// let mut rebuild = db.rebuild()?;
/// rebuild.upsert_country(&Country::new("TW", "TAIWAN, PROVINCE OF CHINA"))?;
/// rebuild.commit()?;
///
/// assert_eq!(
///     db.country_name("TW")?.as_deref(),
///     Some("TAIWAN, PROVINCE OF CHINA")
/// );
/// db.close()?;
/// db.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LocodeDatabase {
    connection: Option<Connection>,
    location: Option<Utf8PathBuf>,
}

impl LocodeDatabase {
    /// Open (or create) the database at `path` and initialise its schema.
    ///
    /// Parent directories are created when missing.
    pub fn open(path: &Utf8Path) -> Result<Self, StoreError> {
        unlocode_fs::ensure_parent_dir(path).map_err(|source| StoreError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| StoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_connection(connection, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: Utf8PathBuf::from(":memory:"),
            source,
        })?;
        Self::with_connection(connection, None)
    }

    fn with_connection(
        mut connection: Connection,
        location: Option<Utf8PathBuf>,
    ) -> Result<Self, StoreError> {
        initialise_schema(&mut connection)?;
        Ok(Self {
            connection: Some(connection),
            location,
        })
    }

    /// Path of the database file, or `None` for in-memory databases.
    pub fn path(&self) -> Option<&Utf8Path> {
        self.location.as_deref()
    }

    /// Whether the connection is still held.
    pub const fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Release the connection. Safe to call repeatedly.
    ///
    /// If SQLite refuses to close, the connection is kept and the error is
    /// returned so the caller may retry.
    pub fn close(&mut self) -> Result<(), StoreError> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };
        connection.close().map_err(|(connection, source)| {
            self.connection = Some(connection);
            StoreError::Sqlite {
                operation: "close database",
                source,
            }
        })
    }

    /// Begin a rebuild transaction.
    ///
    /// Nothing written through the returned [`Rebuild`] becomes visible until
    /// [`Rebuild::commit`]; dropping it rolls everything back.
    pub fn rebuild(&mut self) -> Result<Rebuild<'_>, StoreError> {
        let connection = self.connection.as_mut().ok_or(StoreError::Closed)?;
        let transaction = connection
            .transaction()
            .map_err(|source| StoreError::Sqlite {
                operation: "begin rebuild transaction",
                source,
            })?;
        Ok(Rebuild { transaction })
    }

    pub(crate) fn connection(&self) -> Result<&Connection, StoreError> {
        self.connection.as_ref().ok_or(StoreError::Closed)
    }
}

/// An open rebuild transaction.
#[derive(Debug)]
pub struct Rebuild<'db> {
    transaction: Transaction<'db>,
}

impl Rebuild<'_> {
    /// Delete every country, subdivision and location row.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        for (table, operation) in [
            ("location", "clear location table"),
            ("subdivision", "clear subdivision table"),
            ("country", "clear country table"),
        ] {
            self.transaction
                .execute(&format!("DELETE FROM {table}"), [])
                .map_err(|source| StoreError::Sqlite { operation, source })?;
        }
        Ok(())
    }

    /// Make every write of this rebuild visible.
    pub fn commit(self) -> Result<(), StoreError> {
        self.transaction
            .commit()
            .map_err(|source| StoreError::Sqlite {
                operation: "commit rebuild transaction",
                source,
            })?;
        debug!("committed UN/LOCODE rebuild");
        Ok(())
    }

    /// Discard every write of this rebuild.
    pub fn rollback(self) -> Result<(), StoreError> {
        self.transaction
            .rollback()
            .map_err(|source| StoreError::Sqlite {
                operation: "roll back rebuild transaction",
                source,
            })
    }
}

impl DatasetSink for Rebuild<'_> {
    type Error = StoreError;

    fn upsert_country(&mut self, country: &Country) -> Result<(), StoreError> {
        let mut statement = self
            .transaction
            .prepare_cached("INSERT OR REPLACE INTO country (code, name) VALUES (?1, ?2)")
            .map_err(|source| StoreError::Sqlite {
                operation: "prepare country upsert",
                source,
            })?;
        statement
            .execute((country.code.as_str(), country.name.as_str()))
            .map(|_| ())
            .map_err(|source| StoreError::Sqlite {
                operation: "upsert country",
                source,
            })
    }

    fn upsert_subdivision(&mut self, subdivision: &Subdivision) -> Result<(), StoreError> {
        let mut statement = self
            .transaction
            .prepare_cached(
                "INSERT OR REPLACE INTO subdivision (country_code, subdivision_code, name)
                 VALUES (?1, ?2, ?3)",
            )
            .map_err(|source| StoreError::Sqlite {
                operation: "prepare subdivision upsert",
                source,
            })?;
        statement
            .execute((
                subdivision.country_code.as_str(),
                subdivision.subdivision_code.as_str(),
                subdivision.name.as_str(),
            ))
            .map(|_| ())
            .map_err(|source| StoreError::Sqlite {
                operation: "upsert subdivision",
                source,
            })
    }

    fn upsert_location(&mut self, location: &Location) -> Result<(), StoreError> {
        let mut statement = self
            .transaction
            .prepare_cached(&format!(
                "INSERT OR REPLACE INTO location ({LOCATION_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ))
            .map_err(|source| StoreError::Sqlite {
                operation: "prepare location upsert",
                source,
            })?;
        let (longitude, latitude) = to_columns(location.position);
        let functions = location.functions;
        statement
            .execute((
                location.country_code.as_str(),
                location.location_code.as_str(),
                location.name.as_str(),
                location.subdivision_code.as_deref(),
                location.status_code.as_str(),
                location.iata_code.as_deref(),
                longitude,
                latitude,
                location.remark.as_deref(),
                functions.port,
                functions.airport,
                functions.road_terminal,
                functions.rail_terminal,
                functions.postal_exchange_office,
                functions.border_crossing,
            ))
            .map(|_| ())
            .map_err(|source| StoreError::Sqlite {
                operation: "upsert location",
                source,
            })
    }
}

pub(crate) fn country_from_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        code: row.get(0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn subdivision_from_row(row: &Row<'_>) -> rusqlite::Result<Subdivision> {
    Ok(Subdivision {
        country_code: row.get(0)?,
        subdivision_code: row.get(1)?,
        name: row.get(2)?,
    })
}

/// Decode a row selected with [`LOCATION_COLUMNS`].
pub(crate) fn location_from_row(row: &Row<'_>) -> rusqlite::Result<Location> {
    let longitude: f64 = row.get(6)?;
    let latitude: f64 = row.get(7)?;
    Ok(Location {
        country_code: row.get(0)?,
        location_code: row.get(1)?,
        name: row.get(2)?,
        subdivision_code: row.get(3)?,
        status_code: row.get(4)?,
        iata_code: row.get(5)?,
        position: from_columns(longitude, latitude),
        remark: row.get(8)?,
        functions: Functions {
            port: row.get(9)?,
            airport: row.get(10)?,
            road_terminal: row.get(11)?,
            rail_terminal: row.get(12)?,
            postal_exchange_office: row.get(13)?,
            border_crossing: row.get(14)?,
        },
    })
}
