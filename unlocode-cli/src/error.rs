//! Error types emitted by the UN/LOCODE CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use unlocode_core::{QueryError, StoreError};
use unlocode_data::IngestError;

/// Errors emitted by the UN/LOCODE CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A source directory does not exist.
    #[error("{field} path {path:?} does not exist or is not a directory")]
    MissingSourceDirectory {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// The database to query does not exist.
    #[error("database {path:?} does not exist; run `unlocode build` first")]
    MissingDatabase { path: Utf8PathBuf },
    /// The database path exists but is not a file.
    #[error("database path {path:?} exists but is not a file")]
    DatabaseNotFile { path: Utf8PathBuf },
    /// The database path could not be inspected due to an IO error.
    #[error("failed to inspect database path {path:?}: {source}")]
    InspectDatabase {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the database failed.
    #[error("failed to open database {path:?}: {source}")]
    OpenDatabase {
        path: Utf8PathBuf,
        #[source]
        source: StoreError,
    },
    /// Rebuilding the database failed.
    #[error("failed to rebuild database: {0}")]
    Ingest(#[from] IngestError),
    /// A query failed.
    #[error("query failed: {0}")]
    Query(#[from] QueryError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
