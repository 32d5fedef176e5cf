//! Read-only lookups over a committed dataset.
//!
//! Every "not found" outcome is an empty result. Text searches bind user
//! input as parameters and escape `LIKE` wildcards, so quotes and wildcard
//! characters in the input only ever match literally.
//!
//! `LIKE` and `COLLATE NOCASE` comparisons in SQLite fold ASCII case only, so
//! substring and prefix searches are case-insensitive for ASCII letters.

use geo::Coord;
use rusqlite::{OptionalExtension, Params, Row};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alias::{COMMON_COUNTRY_ERRORS, COMMON_LOCATION_ERRORS, COMMON_REGION_ERRORS};
use crate::nearest::nearest_location;
use crate::{Country, Function, Location, LocationKey, Subdivision};

use super::sqlite::{
    LOCATION_COLUMNS, LocodeDatabase, StoreError, country_from_row, location_from_row,
    subdivision_from_row,
};

/// Errors returned by query operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A caller-supplied argument violated a documented precondition.
    #[error("invalid {argument} {value:?}: expected {expected}")]
    InvalidArgument {
        /// Parameter name.
        argument: &'static str,
        /// Offending value.
        value: String,
        /// Description of the accepted input.
        expected: &'static str,
    },
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Row counts per entity and per function flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DatasetStats {
    /// Country the counts are scoped to, if any.
    pub country: Option<String>,
    /// Number of countries.
    pub countries: u64,
    /// Number of subdivisions.
    pub subdivisions: u64,
    /// Number of locations.
    pub locations: u64,
    /// Locations flagged as ports.
    pub ports: u64,
    /// Locations flagged as airports.
    pub airports: u64,
    /// Locations flagged as road terminals.
    pub road_terminals: u64,
    /// Locations flagged as rail terminals.
    pub rail_terminals: u64,
    /// Locations flagged as postal exchange offices.
    pub postal_exchange_offices: u64,
    /// Locations flagged as border crossings.
    pub border_crossings: u64,
}

const IATA_EXPECTATION: &str = "exactly three characters";

impl LocodeDatabase {
    /// Name of the country with `code`.
    pub fn country_name(&self, code: &str) -> Result<Option<String>, QueryError> {
        self.query_optional(
            "look up country name",
            "SELECT name FROM country WHERE code = ?1",
            [code],
            |row| row.get(0),
        )
    }

    /// The country with `code`.
    pub fn country(&self, code: &str) -> Result<Option<Country>, QueryError> {
        self.query_optional(
            "look up country",
            "SELECT code, name FROM country WHERE code = ?1",
            [code],
            country_from_row,
        )
    }

    /// Name of the subdivision `(country_code, subdivision_code)`.
    pub fn subdivision_name(
        &self,
        country_code: &str,
        subdivision_code: &str,
    ) -> Result<Option<String>, QueryError> {
        self.query_optional(
            "look up subdivision name",
            "SELECT name FROM subdivision WHERE country_code = ?1 AND subdivision_code = ?2",
            [country_code, subdivision_code],
            |row| row.get(0),
        )
    }

    /// Name of the location `(country_code, location_code)`.
    pub fn location_name(
        &self,
        country_code: &str,
        location_code: &str,
    ) -> Result<Option<String>, QueryError> {
        self.query_optional(
            "look up location name",
            "SELECT name FROM location WHERE country_code = ?1 AND location_code = ?2",
            [country_code, location_code],
            |row| row.get(0),
        )
    }

    /// The location `(country_code, location_code)`.
    pub fn location(
        &self,
        country_code: &str,
        location_code: &str,
    ) -> Result<Option<Location>, QueryError> {
        self.query_optional(
            "look up location",
            &format!(
                "SELECT {LOCATION_COLUMNS} FROM location
                 WHERE country_code = ?1 AND location_code = ?2"
            ),
            [country_code, location_code],
            location_from_row,
        )
    }

    /// Every country, ordered by code.
    pub fn all_countries(&self) -> Result<Vec<Country>, QueryError> {
        self.query_all(
            "list countries",
            "SELECT code, name FROM country ORDER BY code",
            [],
            country_from_row,
        )
    }

    /// Every subdivision, ordered by key.
    pub fn all_subdivisions(&self) -> Result<Vec<Subdivision>, QueryError> {
        self.query_all(
            "list subdivisions",
            "SELECT country_code, subdivision_code, name FROM subdivision
             ORDER BY country_code, subdivision_code",
            [],
            subdivision_from_row,
        )
    }

    /// Every location, ordered by key.
    pub fn all_locations(&self) -> Result<Vec<Location>, QueryError> {
        self.query_all(
            "list locations",
            &format!(
                "SELECT {LOCATION_COLUMNS} FROM location ORDER BY country_code, location_code"
            ),
            [],
            location_from_row,
        )
    }

    /// Countries whose name contains `substring`.
    pub fn search_country_by_name(&self, substring: &str) -> Result<Vec<Country>, QueryError> {
        self.query_all(
            "search countries by name",
            "SELECT code, name FROM country WHERE name LIKE ?1 ESCAPE '\\' ORDER BY code",
            [contains_pattern(substring)],
            country_from_row,
        )
    }

    /// Countries whose name equals `name` after uppercasing and applying
    /// [`COMMON_COUNTRY_ERRORS`].
    ///
    /// # Examples
    /// ```
    /// use unlocode_core::{Country, DatasetSink, LocodeDatabase};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut db = LocodeDatabase::open_in_memory()?;
    /// let mut rebuild = db.rebuild()?;
    /// rebuild.upsert_country(&Country::new("RU", "RUSSIAN FEDERATION"))?;
    /// rebuild.commit()?;
    ///
    /// let found = db.search_country_exact("Russia")?;
    /// assert_eq!(found, vec![Country::new("RU", "RUSSIAN FEDERATION")]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn search_country_exact(&self, name: &str) -> Result<Vec<Country>, QueryError> {
        let published = COMMON_COUNTRY_ERRORS.normalise(name);
        self.query_all(
            "search countries by exact name",
            "SELECT code, name FROM country WHERE name = ?1 ORDER BY code",
            [published.as_str()],
            country_from_row,
        )
    }

    /// Subdivisions of `country_code` whose name equals `name`, ignoring
    /// ASCII case, after applying [`COMMON_REGION_ERRORS`].
    pub fn search_subdivision_by_name(
        &self,
        country_code: &str,
        name: &str,
    ) -> Result<Vec<Subdivision>, QueryError> {
        let published = COMMON_REGION_ERRORS.normalise(name);
        self.query_all(
            "search subdivisions by name",
            "SELECT country_code, subdivision_code, name FROM subdivision
             WHERE country_code = ?1 AND name = ?2 COLLATE NOCASE
             ORDER BY subdivision_code",
            [country_code, published.as_str()],
            subdivision_from_row,
        )
    }

    /// Locations whose name contains `substring`.
    pub fn search_location_by_name(&self, substring: &str) -> Result<Vec<Location>, QueryError> {
        self.query_all(
            "search locations by name",
            &format!(
                "SELECT {LOCATION_COLUMNS} FROM location
                 WHERE name LIKE ?1 ESCAPE '\\'
                 ORDER BY country_code, location_code"
            ),
            [contains_pattern(substring)],
            location_from_row,
        )
    }

    /// Ports whose name contains `substring`.
    pub fn search_port_by_name(&self, substring: &str) -> Result<Vec<Location>, QueryError> {
        self.query_all(
            "search ports by name",
            &format!(
                "SELECT {LOCATION_COLUMNS} FROM location
                 WHERE name LIKE ?1 ESCAPE '\\' AND is_port = 1
                 ORDER BY country_code, location_code"
            ),
            [contains_pattern(substring)],
            location_from_row,
        )
    }

    /// Locations of `country_code` (and `region_code`, when given) whose name
    /// starts with `name` after applying [`COMMON_LOCATION_ERRORS`].
    pub fn search_location_by_region_name(
        &self,
        country_code: &str,
        region_code: Option<&str>,
        name: &str,
    ) -> Result<Vec<Location>, QueryError> {
        let published = COMMON_LOCATION_ERRORS.normalise(name);
        self.query_all(
            "search locations by region and name",
            &format!(
                "SELECT {LOCATION_COLUMNS} FROM location
                 WHERE country_code = ?1
                   AND (?2 IS NULL OR subdivision_code = ?2)
                   AND name LIKE ?3 ESCAPE '\\'
                 ORDER BY country_code, location_code"
            ),
            (country_code, region_code, prefix_pattern(&published)),
            location_from_row,
        )
    }

    /// Airports whose location code or IATA code equals `iata_code`.
    pub fn iata_airports(&self, iata_code: &str) -> Result<Vec<Location>, QueryError> {
        let code = validate_iata(iata_code)?;
        self.query_all(
            "search airports by IATA code",
            &format!(
                "SELECT {LOCATION_COLUMNS} FROM location
                 WHERE is_airport = 1 AND (location_code = ?1 OR iata_code = ?1)
                 ORDER BY country_code, location_code"
            ),
            [code.as_str()],
            location_from_row,
        )
    }

    /// Resolve an IATA code to a lower-case hyphenated UN/LOCODE such as
    /// `tw-tpe`, optionally restricted to `country_code`.
    ///
    /// A location matches when its IATA code equals the input, or when it
    /// publishes no IATA code and its location code equals the input.
    /// Airports win over other locations, explicit IATA matches over implicit
    /// ones.
    pub fn iata_to_locode(
        &self,
        iata_code: &str,
        country_code: Option<&str>,
    ) -> Result<Option<String>, QueryError> {
        let code = validate_iata(iata_code)?;
        let country = country_code.map(str::to_uppercase);
        self.query_optional(
            "resolve IATA code",
            "SELECT country_code, location_code FROM location
             WHERE (iata_code = ?1 OR (iata_code IS NULL AND location_code = ?1))
               AND (?2 IS NULL OR country_code = ?2)
             ORDER BY is_airport DESC, (iata_code IS NOT NULL) DESC,
                      country_code, location_code
             LIMIT 1",
            (code.as_str(), country.as_deref()),
            |row| {
                let key = LocationKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?);
                Ok(key.hyphenated())
            },
        )
    }

    /// The airport nearest to `(latitude, longitude)`.
    pub fn nearest_airport(
        &self,
        latitude: f64,
        longitude: f64,
        country_code: Option<&str>,
    ) -> Result<Option<Location>, QueryError> {
        self.nearest(latitude, longitude, country_code, Some(Function::Airport))
    }

    /// The port nearest to `(latitude, longitude)`.
    pub fn nearest_port(
        &self,
        latitude: f64,
        longitude: f64,
        country_code: Option<&str>,
    ) -> Result<Option<Location>, QueryError> {
        self.nearest(latitude, longitude, country_code, Some(Function::Port))
    }

    /// The postal exchange office nearest to `(latitude, longitude)`.
    pub fn nearest_postal_office(
        &self,
        latitude: f64,
        longitude: f64,
        country_code: Option<&str>,
    ) -> Result<Option<Location>, QueryError> {
        self.nearest(
            latitude,
            longitude,
            country_code,
            Some(Function::PostalExchangeOffice),
        )
    }

    /// The location of any function nearest to `(latitude, longitude)`.
    pub fn nearest_location(
        &self,
        latitude: f64,
        longitude: f64,
        country_code: Option<&str>,
    ) -> Result<Option<Location>, QueryError> {
        self.nearest(latitude, longitude, country_code, None)
    }

    /// The location nearest to `(latitude, longitude)` among those carrying
    /// `function` (any location when `None`) in `country_code` (any country
    /// when `None`). Locations without a known position never match.
    pub fn nearest(
        &self,
        latitude: f64,
        longitude: f64,
        country_code: Option<&str>,
        function: Option<Function>,
    ) -> Result<Option<Location>, QueryError> {
        let function_filter =
            function.map_or_else(String::new, |f| format!(" AND {} = 1", f.column()));
        let sql = format!(
            "SELECT {LOCATION_COLUMNS} FROM location
             WHERE (?1 IS NULL OR country_code = ?1)
               AND latitude BETWEEN -90 AND 90{function_filter}
             ORDER BY country_code, location_code"
        );
        let wrap = |source: rusqlite::Error| {
            QueryError::from(StoreError::Sqlite {
                operation: "scan nearest-location candidates",
                source,
            })
        };
        let connection = self.connection()?;
        let mut statement = connection.prepare_cached(&sql).map_err(wrap)?;
        let rows = statement
            .query_map([country_code], location_from_row)
            .map_err(wrap)?;

        // Rows are streamed; the first decoding failure ends the scan.
        let mut failure = None;
        let origin = Coord {
            x: longitude,
            y: latitude,
        };
        let found = nearest_location(
            origin,
            rows.map_while(|row| row.map_err(|source| failure = Some(source)).ok()),
        );
        match failure {
            Some(source) => Err(wrap(source)),
            None => Ok(found),
        }
    }

    /// Row counts, optionally restricted to `country_code`.
    pub fn analytics(&self, country_code: Option<&str>) -> Result<DatasetStats, QueryError> {
        let countries = self.count(
            "count countries",
            "SELECT COUNT(*) FROM country WHERE (?1 IS NULL OR code = ?1)",
            country_code,
        )?;
        let subdivisions = self.count(
            "count subdivisions",
            "SELECT COUNT(*) FROM subdivision WHERE (?1 IS NULL OR country_code = ?1)",
            country_code,
        )?;
        let stats = self.query_optional(
            "count locations",
            "SELECT COUNT(*),
                    COALESCE(SUM(is_port), 0),
                    COALESCE(SUM(is_airport), 0),
                    COALESCE(SUM(is_road_terminal), 0),
                    COALESCE(SUM(is_rail_terminal), 0),
                    COALESCE(SUM(is_postal_exchange_office), 0),
                    COALESCE(SUM(is_border_cross), 0)
             FROM location WHERE (?1 IS NULL OR country_code = ?1)",
            [country_code],
            |row| {
                Ok(DatasetStats {
                    country: country_code.map(str::to_owned),
                    countries,
                    subdivisions,
                    locations: row.get(0)?,
                    ports: row.get(1)?,
                    airports: row.get(2)?,
                    road_terminals: row.get(3)?,
                    rail_terminals: row.get(4)?,
                    postal_exchange_offices: row.get(5)?,
                    border_crossings: row.get(6)?,
                })
            },
        )?;
        Ok(stats.unwrap_or_default())
    }

    fn count(
        &self,
        operation: &'static str,
        sql: &str,
        country_code: Option<&str>,
    ) -> Result<u64, QueryError> {
        let count = self.query_optional(operation, sql, [country_code], |row| row.get(0))?;
        Ok(count.unwrap_or(0))
    }

    fn query_optional<T, P, F>(
        &self,
        operation: &'static str,
        sql: &str,
        params: P,
        map: F,
    ) -> Result<Option<T>, QueryError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let connection = self.connection()?;
        connection
            .query_row(sql, params, map)
            .optional()
            .map_err(|source| StoreError::Sqlite { operation, source }.into())
    }

    fn query_all<T, P, F>(
        &self,
        operation: &'static str,
        sql: &str,
        params: P,
        map: F,
    ) -> Result<Vec<T>, QueryError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let wrap = |source: rusqlite::Error| QueryError::from(StoreError::Sqlite { operation, source });
        let connection = self.connection()?;
        let mut statement = connection.prepare_cached(sql).map_err(wrap)?;
        let rows = statement.query_map(params, map).map_err(wrap)?;
        let values = rows.collect::<Result<Vec<_>, _>>().map_err(wrap)?;
        Ok(values)
    }
}

fn validate_iata(code: &str) -> Result<String, QueryError> {
    if code.chars().count() == 3 {
        Ok(code.to_uppercase())
    } else {
        Err(QueryError::InvalidArgument {
            argument: "IATA code",
            value: code.to_owned(),
            expected: IATA_EXPECTATION,
        })
    }
}

/// Escape `LIKE` metacharacters so `input` matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}

fn prefix_pattern(input: &str) -> String {
    format!("{}%", escape_like(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("LOS ANGELES", "%LOS ANGELES%")]
    #[case("100%", "%100\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("back\\slash", "%back\\\\slash%")]
    #[case("O'Hare", "%O'Hare%")]
    fn contains_pattern_escapes_wildcards(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(input), expected);
    }

    #[rstest]
    fn prefix_pattern_anchors_start() {
        assert_eq!(prefix_pattern("SAN"), "SAN%");
    }

    #[rstest]
    #[case("T")]
    #[case("TPEX")]
    #[case("")]
    fn iata_codes_must_have_three_characters(#[case] code: &str) {
        let err = validate_iata(code).expect_err("invalid length should fail");
        assert!(matches!(err, QueryError::InvalidArgument { argument: "IATA code", .. }));
    }

    #[rstest]
    fn iata_codes_are_uppercased() {
        assert_eq!(validate_iata("tpe").expect("valid code"), "TPE");
    }
}
