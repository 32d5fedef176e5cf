//! Corrections for names users commonly type that differ from the
//! published spelling.
//!
//! The tables are immutable process-wide configuration. Keys are matched
//! after the input has been uppercased.

/// An immutable mapping from a common misspelling to the published name.
#[derive(Debug, Clone, Copy)]
pub struct AliasTable {
    entries: &'static [(&'static str, &'static str)],
}

impl AliasTable {
    /// Wrap a static list of `(alias, published name)` pairs.
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Return the published name for `name`, or `name` itself.
    ///
    /// # Examples
    /// ```
    /// use unlocode_core::alias::COMMON_COUNTRY_ERRORS;
    ///
    /// assert_eq!(COMMON_COUNTRY_ERRORS.correct("RUSSIA"), "RUSSIAN FEDERATION");
    /// assert_eq!(COMMON_COUNTRY_ERRORS.correct("FRANCE"), "FRANCE");
    /// ```
    pub fn correct<'a>(&self, name: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, published)| published)
    }

    /// Uppercase `name` and apply the table.
    pub fn normalise(&self, name: &str) -> String {
        let upper = name.to_uppercase();
        self.correct(&upper).to_owned()
    }

    /// Number of entries.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Country names users commonly type instead of the published name.
pub static COMMON_COUNTRY_ERRORS: AliasTable = AliasTable::new(&[
    ("COTE D'IVOIRE", "C\u{d4}TE D'IVOIRE"),
    ("ENGLAND", "UNITED KINGDOM"),
    ("RUSSIA", "RUSSIAN FEDERATION"),
    ("REUNION", "R\u{c9}UNION"),
    ("PEOPLE'S REPUBLIC OF CHINA", "CHINA"),
    ("FEDERATED STATES OF MICRONESIA", "MICRONESIA, FEDERATED STATES OF"),
    ("SOUTH KOREA", "KOREA, REPUBLIC OF"),
    ("BOLIVIA", "BOLIVIA, PLURINATIONAL STATE OF"),
    ("TANZANIA", "TANZANIA, UNITED REPUBLIC OF"),
]);

/// Subdivision name corrections. Currently empty.
pub static COMMON_REGION_ERRORS: AliasTable = AliasTable::new(&[]);

/// Location name corrections. Currently empty.
pub static COMMON_LOCATION_ERRORS: AliasTable = AliasTable::new(&[]);
