//! Report command: dataset statistics.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use unlocode_core::{DatasetStats, LocodeDatabase};

use crate::{ARG_COUNTRY, ARG_DATABASE, CliError, ENV_REPORT_DATABASE, write_json};

/// CLI arguments for the `report` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Print row counts for the whole dataset or a single country")]
#[ortho_config(prefix = "UNLOCODE")]
pub(crate) struct ReportArgs {
    /// Path of the SQLite database to read.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Restrict the counts to one two-letter country code.
    #[arg(long = ARG_COUNTRY, value_name = "code")]
    #[serde(default)]
    pub(crate) country: Option<String>,
}

/// Resolved `report` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReportConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) country: Option<String>,
}

impl TryFrom<ReportArgs> for ReportConfig {
    type Error = CliError;

    fn try_from(args: ReportArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_REPORT_DATABASE,
        })?;
        Ok(Self {
            database,
            country: args.country.map(|code| code.to_uppercase()),
        })
    }
}

pub(crate) fn run_report(args: ReportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ReportConfig::try_from(merged)?;
    let stats = execute_report(&config)?;
    write_json(writer, &stats)
}

pub(crate) fn execute_report(config: &ReportConfig) -> Result<DatasetStats, CliError> {
    let db = open_existing(&config.database)?;
    Ok(db.analytics(config.country.as_deref())?)
}

/// Open a database that must already exist.
pub(crate) fn open_existing(path: &Utf8Path) -> Result<LocodeDatabase, CliError> {
    match unlocode_fs::file_is_file(path) {
        Ok(true) => {}
        Ok(false) => {
            return Err(CliError::DatabaseNotFile {
                path: path.to_path_buf(),
            });
        }
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(CliError::MissingDatabase {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(CliError::InspectDatabase {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    LocodeDatabase::open(path).map_err(|source| CliError::OpenDatabase {
        path: path.to_path_buf(),
        source,
    })
}
