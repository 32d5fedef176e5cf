//! Trade locations: ports, airports, terminals and other coded places.

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Function, Functions, Status};

/// Composite primary key of a location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationKey {
    /// Two-letter country code.
    pub country_code: String,
    /// Three-character location code within the country.
    pub location_code: String,
}

impl LocationKey {
    /// Construct a key from its parts.
    pub fn new(country_code: impl Into<String>, location_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            location_code: location_code.into(),
        }
    }

    /// Five-character UN/LOCODE, e.g. `USLEB`.
    pub fn locode(&self) -> String {
        format!("{}{}", self.country_code, self.location_code)
    }

    /// Lower-case hyphenated code, e.g. `tw-tpe`.
    pub fn hyphenated(&self) -> String {
        format!("{}-{}", self.country_code, self.location_code).to_lowercase()
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.country_code, self.location_code)
    }
}

/// A location row of the code list.
///
/// `name` holds the name without diacritics so lookups stay ASCII-safe.
/// `position` is `None` when the source carried no usable coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use unlocode_core::{Functions, Location};
///
/// let location = Location::new("TW", "TPE", "Taipei")
///     .with_functions(Functions::from_code("1-345---"))
///     .with_position(Coord { x: 121.31, y: 25.03 });
/// assert!(location.functions.airport);
/// assert_eq!(location.key().locode(), "TWTPE");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// Two-letter country code.
    pub country_code: String,
    /// Location code within the country.
    pub location_code: String,
    /// Name without diacritics.
    pub name: String,
    /// Subdivision (region) code, when published.
    pub subdivision_code: Option<String>,
    /// Two-letter entry status code.
    pub status_code: String,
    /// IATA code, published only where it differs from the location code.
    pub iata_code: Option<String>,
    /// Position with `x = longitude`, `y = latitude`.
    pub position: Option<Coord<f64>>,
    /// Free-text remark.
    pub remark: Option<String>,
    /// Function flags.
    pub functions: Functions,
}

impl Location {
    /// Construct a location with no optional attributes set.
    pub fn new(
        country_code: impl Into<String>,
        location_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            location_code: location_code.into(),
            name: name.into(),
            subdivision_code: None,
            status_code: String::new(),
            iata_code: None,
            position: None,
            remark: None,
            functions: Functions::default(),
        }
    }

    /// Set the function flags.
    #[must_use]
    pub const fn with_functions(mut self, functions: Functions) -> Self {
        self.functions = functions;
        self
    }

    /// Set a known position.
    #[must_use]
    pub const fn with_position(mut self, position: Coord<f64>) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the subdivision code.
    #[must_use]
    pub fn with_subdivision(mut self, subdivision_code: impl Into<String>) -> Self {
        self.subdivision_code = Some(subdivision_code.into());
        self
    }

    /// Set the IATA code.
    #[must_use]
    pub fn with_iata(mut self, iata_code: impl Into<String>) -> Self {
        self.iata_code = Some(iata_code.into());
        self
    }

    /// Set the status code.
    #[must_use]
    pub fn with_status(mut self, status_code: impl Into<String>) -> Self {
        self.status_code = status_code.into();
        self
    }

    /// Composite key of this location.
    pub fn key(&self) -> LocationKey {
        LocationKey::new(self.country_code.clone(), self.location_code.clone())
    }

    /// Decoded entry status.
    pub fn status(&self) -> Status {
        Status::from_code(&self.status_code)
    }

    /// Whether the location carries `function`.
    pub const fn has(&self, function: Function) -> bool {
        self.functions.contains(function)
    }
}
