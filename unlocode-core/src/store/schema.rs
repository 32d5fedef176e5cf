#![forbid(unsafe_code)]

use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

pub const SCHEMA_VERSION: i64 = 1;

/// Initialise the UN/LOCODE schema inside an existing SQLite database.
///
/// Creates the `country`, `subdivision` and `location` tables with their
/// primary keys, the lookup indexes, and records the schema version.
/// Existing databases must already match the expected version; mismatches
/// are rejected so migrations can be applied explicitly.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use unlocode_core::store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
///
/// let version: i64 = conn
///     .query_row(
///         "SELECT version FROM unlocode_schema_version LIMIT 1",
///         [],
///         |row| row.get(0),
///     )
///     .expect("read schema version");
/// assert_eq!(version, 1);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })?;

    Ok(())
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create country",
        "CREATE TABLE IF NOT EXISTS country (
            code TEXT NOT NULL PRIMARY KEY,
            name TEXT NOT NULL
        ) WITHOUT ROWID",
    )?;
    run_migration_step(
        transaction,
        "create subdivision",
        "CREATE TABLE IF NOT EXISTS subdivision (
            country_code TEXT NOT NULL,
            subdivision_code TEXT NOT NULL,
            name TEXT NOT NULL,
            PRIMARY KEY (country_code, subdivision_code)
        ) WITHOUT ROWID",
    )?;
    run_migration_step(
        transaction,
        "create location",
        "CREATE TABLE IF NOT EXISTS location (
            country_code TEXT NOT NULL,
            location_code TEXT NOT NULL CHECK (length(location_code) > 0),
            name TEXT NOT NULL,
            subdivision_code TEXT,
            status_code TEXT NOT NULL,
            iata_code TEXT,
            longitude REAL NOT NULL,
            latitude REAL NOT NULL,
            remark TEXT,
            is_port INTEGER NOT NULL,
            is_airport INTEGER NOT NULL,
            is_road_terminal INTEGER NOT NULL,
            is_rail_terminal INTEGER NOT NULL,
            is_postal_exchange_office INTEGER NOT NULL,
            is_border_cross INTEGER NOT NULL,
            PRIMARY KEY (country_code, location_code)
        ) WITHOUT ROWID",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index location iata",
        "CREATE INDEX IF NOT EXISTS idx_location_iata ON location(iata_code)",
    )?;
    run_migration_step(
        transaction,
        "index location name",
        "CREATE INDEX IF NOT EXISTS idx_location_name ON location(name)",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS unlocode_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row(
            "SELECT version FROM unlocode_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(SchemaError::VersionMismatch {
                expected: SCHEMA_VERSION,
                found,
            });
        }
        None => {
            transaction
                .execute(
                    "INSERT INTO unlocode_schema_version (version) VALUES (?1)",
                    [SCHEMA_VERSION],
                )
                .map_err(|source| SchemaError::Migration {
                    step: "record schema version",
                    source,
                })?;
        }
    }

    Ok(())
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when initialising the UN/LOCODE schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to execute migration step '{step}'")]
    Migration {
        step: &'static str,
        #[source]
        source: SqliteError,
    },
    #[error(
        "expected UN/LOCODE schema version {expected} but found {found}; apply migrations before retrying"
    )]
    VersionMismatch { expected: i64, found: i64 },
}
