//! Test-only dataset fixtures and an in-memory `DatasetSink`.

use std::collections::BTreeMap;
use std::convert::Infallible;

use geo::Coord;

use crate::{Country, DatasetSink, Functions, Location, LocationKey, Subdivision};

/// In-memory `DatasetSink` keyed the same way as the SQLite tables.
///
/// Upserts replace whole rows, so the sink mirrors the store's overwrite
/// behaviour without touching disk.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// Countries keyed by code.
    pub countries: BTreeMap<String, Country>,
    /// Subdivisions keyed by `(country, subdivision)`.
    pub subdivisions: BTreeMap<(String, String), Subdivision>,
    /// Locations keyed by `(country, location)`.
    pub locations: BTreeMap<LocationKey, Location>,
}

impl MemorySink {
    /// Look up a stored location.
    pub fn location(&self, country_code: &str, location_code: &str) -> Option<&Location> {
        self.locations
            .get(&LocationKey::new(country_code, location_code))
    }
}

impl DatasetSink for MemorySink {
    type Error = Infallible;

    fn upsert_country(&mut self, country: &Country) -> Result<(), Self::Error> {
        self.countries.insert(country.code.clone(), country.clone());
        Ok(())
    }

    fn upsert_subdivision(&mut self, subdivision: &Subdivision) -> Result<(), Self::Error> {
        let key = (
            subdivision.country_code.clone(),
            subdivision.subdivision_code.clone(),
        );
        self.subdivisions.insert(key, subdivision.clone());
        Ok(())
    }

    fn upsert_location(&mut self, location: &Location) -> Result<(), Self::Error> {
        self.locations.insert(location.key(), location.clone());
        Ok(())
    }
}

/// Countries in the sample dataset.
pub fn sample_countries() -> Vec<Country> {
    vec![
        Country::new("CN", "CHINA"),
        Country::new("GB", "UNITED KINGDOM"),
        Country::new("RU", "RUSSIAN FEDERATION"),
        Country::new("TW", "TAIWAN, PROVINCE OF CHINA"),
        Country::new("US", "UNITED STATES"),
    ]
}

/// Subdivisions in the sample dataset.
pub fn sample_subdivisions() -> Vec<Subdivision> {
    vec![
        Subdivision::new("GB", "ENG", "England"),
        Subdivision::new("TW", "TPE", "Taipei City"),
        Subdivision::new("US", "CA", "California"),
        Subdivision::new("US", "NH", "New Hampshire"),
    ]
}

fn at(latitude: f64, longitude: f64) -> Coord<f64> {
    Coord {
        x: longitude,
        y: latitude,
    }
}

/// Locations in the sample dataset.
///
/// Three airports carry known positions in the United States (`LAX`, `LEB`,
/// `EWR`); `US ZZZ` has no position.
pub fn sample_locations() -> Vec<Location> {
    vec![
        Location::new("CN", "PVG", "Pudong Apt/Shanghai")
            .with_functions(Functions::from_code("---4----"))
            .with_position(at(31.09, 121.48)),
        Location::new("CN", "SHA", "Shanghai")
            .with_functions(Functions::from_code("12345---"))
            .with_position(at(31.14, 121.28)),
        Location::new("GB", "LHR", "Heathrow Apt/London")
            .with_subdivision("ENG")
            .with_functions(Functions::from_code("---4----"))
            .with_position(at(51.28, -0.27)),
        Location::new("GB", "LON", "London")
            .with_subdivision("ENG")
            .with_functions(Functions::from_code("12345---"))
            .with_position(at(51.30, -0.07)),
        Location::new("TW", "KHH", "Kaohsiung")
            .with_functions(Functions::from_code("1--4----"))
            .with_position(at(22.38, 120.18)),
        Location::new("TW", "TPE", "Taipei")
            .with_subdivision("TPE")
            .with_functions(Functions::from_code("1-345---"))
            .with_status("AI")
            .with_position(at(25.05, 121.31)),
        Location::new("US", "EWR", "Newark Apt")
            .with_functions(Functions::from_code("---4----"))
            .with_iata("NYC")
            .with_position(at(40.42, -74.10)),
        Location::new("US", "LAX", "Los Angeles")
            .with_subdivision("CA")
            .with_functions(Functions::from_code("1234----"))
            .with_position(at(33.56, -118.24)),
        Location::new("US", "LEB", "Lebanon")
            .with_subdivision("NH")
            .with_functions(Functions::from_code("---4----"))
            .with_position(at(43.38, -72.15)),
        Location::new("US", "NYC", "New York")
            .with_functions(Functions::from_code("123-5---"))
            .with_position(at(40.42, -74.00)),
        Location::new("US", "ZZZ", "Unplaced 100% _wild_")
            .with_functions(Functions::from_code("1--4----")),
    ]
}

/// Write the sample dataset into `sink`.
pub fn seed_sample_dataset<S: DatasetSink>(sink: &mut S) -> Result<(), S::Error> {
    for country in sample_countries() {
        sink.upsert_country(&country)?;
    }
    for subdivision in sample_subdivisions() {
        sink.upsert_subdivision(&subdivision)?;
    }
    for location in sample_locations() {
        sink.upsert_location(&location)?;
    }
    Ok(())
}

/// Open an in-memory database holding the sample dataset.
#[cfg(feature = "store-sqlite")]
pub fn sample_database() -> Result<crate::LocodeDatabase, crate::StoreError> {
    let mut db = crate::LocodeDatabase::open_in_memory()?;
    let mut rebuild = db.rebuild()?;
    seed_sample_dataset(&mut rebuild)?;
    rebuild.commit()?;
    Ok(db)
}
