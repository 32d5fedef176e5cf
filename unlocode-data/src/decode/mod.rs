//! Record decoder for UN/LOCODE CSV rows.
//!
//! A code-list row yields a [`Country`] when its name starts with a dot, a
//! [`Location`] otherwise, or a [`SkipReason`] when the row is filtered.
//! Subdivision rows always yield a [`Subdivision`]. Only a wrong field count
//! is an error.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use csv::ByteRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unlocode_core::{Country, Functions, Location, Subdivision, decode_coordinates};


/// Fields in a code-list row.
pub const CODE_LIST_FIELDS: usize = 12;
/// Fields in a subdivision row.
pub const SUBDIVISION_FIELDS: usize = 4;

const NON_LOCATION_MARKER: &str = "\u{a6}";
const REMOVED_MARKER: &str = "X";
const REFERENCE_MARKER: &str = "=";
const COUNTRY_NAME_PREFIX: char = '.';

/// Layout of a release file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    /// Countries and locations (`UNLOCODE CodeListPart*.csv`).
    CodeList,
    /// Subdivisions (`SubdivisionCodes.csv`).
    Subdivision,
}

impl FileKind {
    /// Number of fields every row of this kind carries.
    pub const fn field_count(self) -> usize {
        match self {
            Self::CodeList => CODE_LIST_FIELDS,
            Self::Subdivision => SUBDIVISION_FIELDS,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeList => f.write_str("code list"),
            Self::Subdivision => f.write_str("subdivision"),
        }
    }
}

/// Character encoding of the source files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceEncoding {
    /// ISO-8859-1, the encoding of the published release.
    #[default]
    Latin1,
    /// UTF-8; invalid sequences are replaced.
    Utf8,
}

impl SourceEncoding {
    /// Decode raw field bytes.
    ///
    /// # Examples
    /// ```
    /// use unlocode_data::SourceEncoding;
    ///
    /// assert_eq!(SourceEncoding::Latin1.decode(b"C\xf4te"), "Côte");
    /// assert_eq!(SourceEncoding::Utf8.decode("Côte".as_bytes()), "Côte");
    /// ```
    pub fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        match self {
            Self::Latin1 => encoding_rs::mem::decode_latin1(bytes),
            Self::Utf8 => String::from_utf8_lossy(bytes),
        }
    }
}

/// Error returned when parsing a [`SourceEncoding`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown source encoding {0:?}; expected latin1 or utf8")]
pub struct UnknownEncoding(pub String);

impl FromStr for SourceEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Self::Latin1),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            _ => Err(UnknownEncoding(s.to_owned())),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latin1 => f.write_str("latin1"),
            Self::Utf8 => f.write_str("utf8"),
        }
    }
}

/// Why a row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Change marker `X`: the entry is scheduled for removal.
    Removed,
    /// Change marker `=`: the entry points at another name.
    ReferenceEntry,
    /// Change marker `¦`: the entry is not a location.
    NonLocation,
    /// The location code field is empty.
    MissingLocationCode,
    /// Country and location code together are too short to form a code.
    IncompleteCode,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Removed => "entry marked as removed",
            Self::ReferenceEntry => "reference entry",
            Self::NonLocation => "non-location entry",
            Self::MissingLocationCode => "missing location code",
            Self::IncompleteCode => "incomplete UN/LOCODE",
        };
        f.write_str(text)
    }
}

/// Outcome of decoding one row.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedRow {
    /// A country definition.
    Country(Country),
    /// A subdivision.
    Subdivision(Subdivision),
    /// A location.
    Location(Location),
    /// The row was filtered.
    Skipped(SkipReason),
}

/// Errors raised while decoding a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The row does not have the field count its file kind requires.
    #[error("{kind} row has {found} fields; expected {expected}")]
    FieldCount {
        /// Kind of file the row came from.
        kind: FileKind,
        /// Required number of fields.
        expected: usize,
        /// Number of fields present.
        found: usize,
    },
}

/// Stateless decoder turning raw CSV records into domain records.
///
/// # Examples
/// ```
/// use csv::ByteRecord;
/// use unlocode_data::{DecodedRow, FileKind, RecordDecoder};
///
/// let row = ByteRecord::from(vec![
///     "", "US", "LEB", "Lebanon", "Lebanon", "NH", "--34----", "AI", "0307", "",
///     "4338N 07215W", "",
/// ]);
/// let decoded = RecordDecoder::default().decode(FileKind::CodeList, &row)?;
/// let DecodedRow::Location(location) = decoded else {
///     panic!("expected a location");
/// };
/// assert!(location.functions.airport);
/// # Ok::<(), unlocode_data::DecodeError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordDecoder {
    encoding: SourceEncoding,
}

impl RecordDecoder {
    /// Create a decoder for `encoding`.
    pub const fn new(encoding: SourceEncoding) -> Self {
        Self { encoding }
    }

    /// Encoding applied to every field.
    pub const fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    /// Decode a single row of a file of `kind`.
    ///
    /// Change markers are honoured before the field count is checked, so a
    /// removed or reference row is skipped whatever its shape.
    pub fn decode(&self, kind: FileKind, record: &ByteRecord) -> Result<DecodedRow, DecodeError> {
        let fields = Fields {
            record,
            encoding: self.encoding,
        };
        if kind == FileKind::CodeList
            && let Some(reason) = marker_skip(fields.text(0).trim())
        {
            return Ok(DecodedRow::Skipped(reason));
        }
        let expected = kind.field_count();
        if record.len() != expected {
            return Err(DecodeError::FieldCount {
                kind,
                expected,
                found: record.len(),
            });
        }
        Ok(match kind {
            FileKind::CodeList => decode_code_list(&fields),
            FileKind::Subdivision => decode_subdivision(&fields),
        })
    }
}

struct Fields<'r> {
    record: &'r ByteRecord,
    encoding: SourceEncoding,
}

impl Fields<'_> {
    fn text(&self, index: usize) -> String {
        self.record
            .get(index)
            .map(|bytes| self.encoding.decode(bytes).into_owned())
            .unwrap_or_default()
    }

    fn optional(&self, index: usize) -> Option<String> {
        let text = self.text(index);
        (!text.trim().is_empty()).then_some(text)
    }
}

fn decode_subdivision(fields: &Fields<'_>) -> DecodedRow {
    DecodedRow::Subdivision(Subdivision::new(
        fields.text(0),
        fields.text(1),
        fields.text(2),
    ))
}

fn decode_code_list(fields: &Fields<'_>) -> DecodedRow {
    let country_code = fields.text(1);
    let location_code = fields.text(2);
    let name = fields.text(3);

    if let Some(country_name) = name.strip_prefix(COUNTRY_NAME_PREFIX) {
        return DecodedRow::Country(Country::new(country_code, country_name));
    }

    if location_code.is_empty() {
        return DecodedRow::Skipped(SkipReason::MissingLocationCode);
    }
    if country_code.len() + location_code.len() <= 2 {
        return DecodedRow::Skipped(SkipReason::IncompleteCode);
    }

    let plain_name = fields.optional(4).unwrap_or(name);
    let mut location = Location::new(country_code, location_code, plain_name)
        .with_functions(Functions::from_code(&fields.text(6)))
        .with_status(fields.text(7));
    location.subdivision_code = fields.optional(5);
    location.iata_code = fields.optional(9);
    location.position = decode_coordinates(&fields.text(10));
    location.remark = fields.optional(11);
    DecodedRow::Location(location)
}

fn marker_skip(marker: &str) -> Option<SkipReason> {
    match marker {
        REMOVED_MARKER => Some(SkipReason::Removed),
        REFERENCE_MARKER => Some(SkipReason::ReferenceEntry),
        NON_LOCATION_MARKER => Some(SkipReason::NonLocation),
        _ => None,
    }
}
