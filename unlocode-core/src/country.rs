//! Countries and their subdivisions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A country defined by a dot-prefixed row of the code list.
///
/// # Examples
/// ```
/// use unlocode_core::Country;
///
/// let country = Country::new("TW", "TAIWAN, PROVINCE OF CHINA");
/// assert_eq!(country.code, "TW");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Country {
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    /// Country name as published, without the leading dot.
    pub name: String,
}

impl Country {
    /// Construct a `Country` from its code and name.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// A region, state or province within a country.
///
/// # Examples
/// ```
/// use unlocode_core::Subdivision;
///
/// let region = Subdivision::new("US", "NH", "New Hampshire");
/// assert_eq!(region.key(), ("US", "NH"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Subdivision {
    /// Owning country code.
    pub country_code: String,
    /// Subdivision code, unique within the country.
    pub subdivision_code: String,
    /// Subdivision name.
    pub name: String,
}

impl Subdivision {
    /// Construct a `Subdivision`.
    pub fn new(
        country_code: impl Into<String>,
        subdivision_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            subdivision_code: subdivision_code.into(),
            name: name.into(),
        }
    }

    /// Composite primary key `(country_code, subdivision_code)`.
    pub fn key(&self) -> (&str, &str) {
        (&self.country_code, &self.subdivision_code)
    }
}
