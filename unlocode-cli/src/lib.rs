//! Command-line interface for building and querying a UN/LOCODE database.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod build;
mod error;
mod lookup;
mod report;

pub use error::CliError;

use build::BuildArgs;
use lookup::LookupArgs;
use report::ReportArgs;

pub(crate) const ARG_CSV_DIR: &str = "csv-dir";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_ENCODING: &str = "encoding";
pub(crate) const ARG_COUNTRY: &str = "country";
pub(crate) const ENV_BUILD_CSV_DIR: &str = "UNLOCODE_CMDS_BUILD_CSV_DIR";
pub(crate) const ENV_BUILD_DATABASE: &str = "UNLOCODE_CMDS_BUILD_DATABASE";
pub(crate) const ENV_REPORT_DATABASE: &str = "UNLOCODE_CMDS_REPORT_DATABASE";

/// Run the CLI with the current process arguments, writing results to stdout.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Build(args) => build::run_build(args, writer),
        Command::Report(args) => report::run_report(args, writer),
        Command::Lookup(args) => lookup::run_lookup(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "unlocode",
    about = "Build and query a SQLite copy of the UN/LOCODE code list",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rebuild the database from a directory of release CSV files.
    Build(BuildArgs),
    /// Print row counts for the whole dataset or one country.
    Report(ReportArgs),
    /// Run a single lookup against the database.
    Lookup(LookupArgs),
}

/// Write `value` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
