//! Build command: rebuild the database from release CSV files.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use unlocode_core::LocodeDatabase;
use unlocode_data::{IngestReport, LoaderOptions, SourceEncoding, rebuild_from_dir};

use crate::{
    ARG_CSV_DIR, ARG_DATABASE, ARG_ENCODING, CliError, ENV_BUILD_CSV_DIR, ENV_BUILD_DATABASE,
    write_json,
};

/// CLI arguments for the `build` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rebuild the SQLite database from a directory of UN/LOCODE \
                 release CSV files. Existing rows are replaced in a single \
                 transaction; on failure the previous dataset is kept. Paths \
                 can come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Rebuild the database from release CSV files"
)]
#[ortho_config(prefix = "UNLOCODE")]
pub(crate) struct BuildArgs {
    /// Directory containing the release CSV files.
    #[arg(long = ARG_CSV_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) csv_dir: Option<Utf8PathBuf>,
    /// Path of the SQLite database to create or replace.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Character encoding of the CSV files (latin1 or utf8).
    #[arg(long = ARG_ENCODING, value_name = "encoding")]
    #[serde(default)]
    pub(crate) encoding: Option<SourceEncoding>,
}

impl BuildArgs {
    fn into_config(self) -> Result<BuildConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        BuildConfig::try_from(merged)
    }
}

/// Resolved `build` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BuildConfig {
    pub(crate) csv_dir: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
    pub(crate) encoding: SourceEncoding,
}

impl BuildConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_directory(&self.csv_dir, ARG_CSV_DIR)
    }

    fn require_directory(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        if unlocode_fs::dir_exists(path) {
            Ok(())
        } else {
            Err(CliError::MissingSourceDirectory {
                field,
                path: path.to_path_buf(),
            })
        }
    }
}

impl TryFrom<BuildArgs> for BuildConfig {
    type Error = CliError;

    fn try_from(args: BuildArgs) -> Result<Self, Self::Error> {
        let csv_dir = args.csv_dir.ok_or(CliError::MissingArgument {
            field: ARG_CSV_DIR,
            env: ENV_BUILD_CSV_DIR,
        })?;
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_BUILD_DATABASE,
        })?;
        Ok(Self {
            csv_dir,
            database,
            encoding: args.encoding.unwrap_or_default(),
        })
    }
}

pub(crate) fn run_build(args: BuildArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_build(&config)?;
    write_json(writer, &report)
}

pub(crate) fn execute_build(config: &BuildConfig) -> Result<IngestReport, CliError> {
    config.validate_sources()?;
    let mut db =
        LocodeDatabase::open(&config.database).map_err(|source| CliError::OpenDatabase {
            path: config.database.clone(),
            source,
        })?;
    info!(
        "rebuilding {} from {} ({} encoding)",
        config.database, config.csv_dir, config.encoding
    );
    let options = LoaderOptions {
        encoding: config.encoding,
    };
    let report = rebuild_from_dir(&mut db, &config.csv_dir, options)?;
    db.close().map_err(|source| CliError::OpenDatabase {
        path: config.database.clone(),
        source,
    })?;
    Ok(report)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<BuildConfig, CliError> {
    let merged = BuildArgs::merge_from_layers(layers).map_err(CliError::from)?;
    BuildConfig::try_from(merged)
}
