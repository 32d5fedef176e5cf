//! Lookup command: run one query against the database.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Args, Subcommand, ValueEnum};
use serde_json::Value;
use unlocode_core::{Function, LocodeDatabase};

use crate::report::open_existing;
use crate::{ARG_DATABASE, CliError, write_json};

/// CLI arguments for the `lookup` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct LookupArgs {
    /// Path of the SQLite database to read.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    pub(crate) database: Utf8PathBuf,
    #[command(subcommand)]
    pub(crate) query: LookupQuery,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum LookupQuery {
    /// Look up a country by its two-letter code.
    Country {
        /// Two-letter country code.
        code: String,
    },
    /// Look up a location by country and location code.
    Location {
        /// Two-letter country code.
        country: String,
        /// Three-character location code.
        location: String,
    },
    /// Find countries by name.
    SearchCountry {
        /// Name or name fragment.
        name: String,
        /// Match the whole name after correcting common misspellings.
        #[arg(long)]
        exact: bool,
    },
    /// Find locations whose name contains the given text.
    SearchLocation {
        /// Name fragment.
        name: String,
        /// Only return ports.
        #[arg(long)]
        ports: bool,
    },
    /// Resolve an IATA code to a UN/LOCODE such as `tw-tpe`.
    Iata {
        /// Three-character IATA code.
        code: String,
        /// Restrict the match to one country.
        #[arg(long)]
        country: Option<String>,
    },
    /// Find the location nearest to a coordinate.
    #[command(allow_negative_numbers = true)]
    Nearest {
        /// Latitude in decimal degrees.
        latitude: f64,
        /// Longitude in decimal degrees.
        longitude: f64,
        /// Restrict the search to one country.
        #[arg(long)]
        country: Option<String>,
        /// Function the location must have.
        #[arg(long, value_enum, default_value_t = NearestKind::Airport)]
        kind: NearestKind,
    },
}

/// Location function filter for `lookup nearest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum NearestKind {
    Airport,
    Port,
    PostalOffice,
    Any,
}

impl NearestKind {
    const fn function(self) -> Option<Function> {
        match self {
            Self::Airport => Some(Function::Airport),
            Self::Port => Some(Function::Port),
            Self::PostalOffice => Some(Function::PostalExchangeOffice),
            Self::Any => None,
        }
    }
}

pub(crate) fn run_lookup(args: LookupArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let db = open_existing(&args.database)?;
    let value = execute_lookup(&db, &args.query)?;
    write_json(writer, &value)
}

pub(crate) fn execute_lookup(db: &LocodeDatabase, query: &LookupQuery) -> Result<Value, CliError> {
    let value = match query {
        LookupQuery::Country { code } => to_value(&db.country(&code.to_uppercase())?)?,
        LookupQuery::Location { country, location } => {
            to_value(&db.location(&country.to_uppercase(), &location.to_uppercase())?)?
        }
        LookupQuery::SearchCountry { name, exact: true } => {
            to_value(&db.search_country_exact(name)?)?
        }
        LookupQuery::SearchCountry { name, exact: false } => {
            to_value(&db.search_country_by_name(name)?)?
        }
        LookupQuery::SearchLocation { name, ports: true } => {
            to_value(&db.search_port_by_name(name)?)?
        }
        LookupQuery::SearchLocation { name, ports: false } => {
            to_value(&db.search_location_by_name(name)?)?
        }
        LookupQuery::Iata { code, country } => {
            to_value(&db.iata_to_locode(code, country.as_deref())?)?
        }
        LookupQuery::Nearest {
            latitude,
            longitude,
            country,
            kind,
        } => {
            let country = country.as_deref().map(str::to_uppercase);
            to_value(&db.nearest(*latitude, *longitude, country.as_deref(), kind.function())?)?
        }
    };
    Ok(value)
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(CliError::SerialiseOutput)
}
