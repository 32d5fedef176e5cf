//! Dataset loader: rebuilds the store from a directory of release files.

use std::collections::{BTreeMap, HashSet};
use std::error::Error as StdError;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ByteRecord, ReaderBuilder};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unlocode_core::{DatasetSink, LocationKey, LocodeDatabase, StoreError};

use crate::decode::{DecodeError, DecodedRow, FileKind, RecordDecoder, SkipReason, SourceEncoding};

#[cfg(test)]
mod tests;

const CODE_LIST_MARKER: &str = "UNLOCODE";
const SUBDIVISION_MARKER: &str = "Subdivision";
const SOURCE_EXTENSION: &str = "csv";

/// Loader settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    /// Encoding of every source file.
    pub encoding: SourceEncoding,
}

/// Summary of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Files that were decoded, in processing order.
    pub files_processed: Vec<Utf8PathBuf>,
    /// `.csv` files whose name matched neither file kind.
    pub files_skipped: Vec<Utf8PathBuf>,
    /// Country upserts.
    pub countries: u64,
    /// Subdivision upserts.
    pub subdivisions: u64,
    /// Location upserts.
    pub locations: u64,
    /// Location upserts that replaced a key written earlier in the same load.
    pub superseded_locations: u64,
    /// Rows that produced no record, by reason.
    pub skipped_rows: BTreeMap<SkipReason, u64>,
}

impl IngestReport {
    /// Total number of skipped rows.
    pub fn skipped_row_count(&self) -> u64 {
        self.skipped_rows.values().sum()
    }
}

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source directory could not be listed.
    #[error("failed to list source directory {path}: {source}")]
    ListDirectory {
        /// Directory being listed.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A source file could not be read.
    #[error("failed to read source file {path}: {source}")]
    ReadFile {
        /// File being read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A source file is not well-formed CSV.
    #[error("malformed CSV in {path} at line {line}: {source}")]
    Csv {
        /// File being parsed.
        path: Utf8PathBuf,
        /// One-based line of the offending record.
        line: u64,
        /// Underlying parser failure.
        #[source]
        source: csv::Error,
    },
    /// A row could not be decoded.
    #[error("invalid row in {path} at line {line}: {source}")]
    Decode {
        /// File being decoded.
        path: Utf8PathBuf,
        /// One-based line of the offending row.
        line: u64,
        /// Decoder failure.
        #[source]
        source: DecodeError,
    },
    /// The sink rejected a record.
    #[error("failed to store row from {path} at line {line}: {source}")]
    Sink {
        /// File the record came from.
        path: Utf8PathBuf,
        /// One-based line of the record.
        line: u64,
        /// Sink failure.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// The rebuild transaction failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Classify a release file by name.
///
/// Returns `None` for files that belong to neither kind.
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use unlocode_data::{FileKind, classify_file};
///
/// assert_eq!(
///     classify_file(Utf8Path::new("2024-1 UNLOCODE CodeListPart1.csv")),
///     Some(FileKind::CodeList)
/// );
/// assert_eq!(
///     classify_file(Utf8Path::new("2024-1 SubdivisionCodes.csv")),
///     Some(FileKind::Subdivision)
/// );
/// assert_eq!(classify_file(Utf8Path::new("notes.csv")), None);
/// ```
pub fn classify_file(path: &Utf8Path) -> Option<FileKind> {
    let name = path.file_name()?;
    if name.contains(CODE_LIST_MARKER) {
        Some(FileKind::CodeList)
    } else if name.contains(SUBDIVISION_MARKER) {
        Some(FileKind::Subdivision)
    } else {
        None
    }
}

/// Decode every release file in `dir` into `sink`.
///
/// Files are visited in file name order. Any error stops the load; callers
/// that need atomicity must discard what the sink received.
pub fn ingest_dir<S>(
    dir: &Utf8Path,
    sink: &mut S,
    options: LoaderOptions,
) -> Result<IngestReport, IngestError>
where
    S: DatasetSink,
{
    let files = unlocode_fs::list_files_with_extension(dir, SOURCE_EXTENSION).map_err(
        |source| IngestError::ListDirectory {
            path: dir.to_path_buf(),
            source,
        },
    )?;

    let mut loader = Loader {
        decoder: RecordDecoder::new(options.encoding),
        seen: HashSet::new(),
        report: IngestReport::default(),
    };
    for path in files {
        let Some(kind) = classify_file(&path) else {
            warn!("skipping unrecognised source file {path}");
            loader.report.files_skipped.push(path);
            continue;
        };
        loader.load_file(&path, kind, sink)?;
        loader.report.files_processed.push(path);
    }
    Ok(loader.report)
}

/// Replace the contents of `db` with the release files in `dir`.
///
/// All tables are cleared and repopulated in one transaction. On any error
/// the transaction is rolled back and the previous dataset stays visible.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use unlocode_core::LocodeDatabase;
/// use unlocode_data::{LoaderOptions, rebuild_from_dir};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut db = LocodeDatabase::open(Utf8Path::new("unlocode.db"))?;
/// let report = rebuild_from_dir(&mut db, Utf8Path::new("csv"), LoaderOptions::default())?;
/// println!("loaded {} locations", report.locations);
/// # Ok(())
/// # }
/// ```
pub fn rebuild_from_dir(
    db: &mut LocodeDatabase,
    dir: &Utf8Path,
    options: LoaderOptions,
) -> Result<IngestReport, IngestError> {
    let mut rebuild = db.rebuild()?;
    rebuild.clear()?;
    let report = ingest_dir(dir, &mut rebuild, options)?;
    rebuild.commit()?;
    info!(
        "rebuilt UN/LOCODE dataset from {dir}: {} countries, {} subdivisions, {} locations, {} rows skipped",
        report.countries,
        report.subdivisions,
        report.locations,
        report.skipped_row_count()
    );
    Ok(report)
}

struct Loader {
    decoder: RecordDecoder,
    seen: HashSet<LocationKey>,
    report: IngestReport,
}

impl Loader {
    fn load_file<S>(
        &mut self,
        path: &Utf8Path,
        kind: FileKind,
        sink: &mut S,
    ) -> Result<(), IngestError>
    where
        S: DatasetSink,
    {
        let bytes = unlocode_fs::read_bytes(path).map_err(|source| IngestError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut record = ByteRecord::new();
        let mut rows = 0_u64;
        loop {
            let more = reader
                .read_byte_record(&mut record)
                .map_err(|source| IngestError::Csv {
                    path: path.to_path_buf(),
                    line: source.position().map_or(rows + 1, |p| p.line()),
                    source,
                })?;
            if !more {
                break;
            }
            rows += 1;
            let line = record.position().map_or(rows, |p| p.line());
            let decoded = self
                .decoder
                .decode(kind, &record)
                .map_err(|source| IngestError::Decode {
                    path: path.to_path_buf(),
                    line,
                    source,
                })?;
            self.apply(decoded, sink)
                .map_err(|source| IngestError::Sink {
                    path: path.to_path_buf(),
                    line,
                    source: Box::new(source),
                })?;
        }
        info!("decoded {rows} {kind} rows from {path}");
        Ok(())
    }

    fn apply<S>(&mut self, row: DecodedRow, sink: &mut S) -> Result<(), S::Error>
    where
        S: DatasetSink,
    {
        match row {
            DecodedRow::Country(country) => {
                sink.upsert_country(&country)?;
                self.report.countries += 1;
            }
            DecodedRow::Subdivision(subdivision) => {
                sink.upsert_subdivision(&subdivision)?;
                self.report.subdivisions += 1;
            }
            DecodedRow::Location(location) => {
                sink.upsert_location(&location)?;
                self.report.locations += 1;
                let key = location.key();
                if !self.seen.insert(key.clone()) {
                    debug!("location {key} superseded by a later row");
                    self.report.superseded_locations += 1;
                }
            }
            DecodedRow::Skipped(reason) => {
                match reason {
                    SkipReason::MissingLocationCode | SkipReason::IncompleteCode => {
                        warn!("skipping row: {reason}");
                    }
                    SkipReason::Removed | SkipReason::ReferenceEntry | SkipReason::NonLocation => {
                        debug!("skipping row: {reason}");
                    }
                }
                *self.report.skipped_rows.entry(reason).or_insert(0) += 1;
            }
        }
        Ok(())
    }
}
