//! Behavioural tests for the dataset loader using rstest-bdd.

use std::cell::RefCell;
use std::fs;

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;
use unlocode_core::LocodeDatabase;
use unlocode_data::{IngestError, IngestReport, LoaderOptions, rebuild_from_dir};

const CODE_LIST: &[u8] = b",\"CI\",,\".C\xd4TE D'IVOIRE\",,,,,,,,\n\
,\"US\",,\".UNITED STATES\",,,,,,,,\n\
,\"US\",\"LEB\",\"Lebanon\",\"Lebanon\",\"NH\",\"---4----\",\"AI\",\"0307\",,\"4338N 07215W\",\n\
,\"CI\",\"ABJ\",\"Abidjan\",\"Abidjan\",\"AB\",\"1234----\",\"AI\",\"9501\",,\"0519N 00402W\",\n";

const SUBDIVISIONS: &[u8] = b"\"US\",\"NH\",\"New Hampshire\",\"State\"\n";

#[derive(Debug)]
struct LoaderWorld {
    release: TempDir,
    database: RefCell<LocodeDatabase>,
    outcome: RefCell<Option<Result<IngestReport, IngestError>>>,
}

impl LoaderWorld {
    fn new() -> Self {
        Self {
            release: TempDir::new().expect("create temp dir"),
            database: RefCell::new(LocodeDatabase::open_in_memory().expect("open database")),
            outcome: RefCell::new(None),
        }
    }

    fn release_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.release.path().to_path_buf())
            .expect("temp dir path is UTF-8")
    }

    fn rebuild(&self) {
        let dir = self.release_path();
        let outcome = rebuild_from_dir(
            &mut self.database.borrow_mut(),
            &dir,
            LoaderOptions::default(),
        );
        self.outcome.replace(Some(outcome));
    }
}

#[fixture]
fn world() -> LoaderWorld {
    LoaderWorld::new()
}

#[given("a release directory with a code list and subdivisions")]
fn given_release(world: &LoaderWorld) {
    let dir = world.release.path();
    fs::write(dir.join("2024-1 UNLOCODE CodeListPart1.csv"), CODE_LIST)
        .expect("write code list");
    fs::write(dir.join("2024-1 SubdivisionCodes.csv"), SUBDIVISIONS)
        .expect("write subdivisions");
}

#[when("I rebuild the database from the release directory")]
fn when_rebuild(world: &LoaderWorld) {
    world.rebuild();
}

#[when("I rebuild the database from the release directory again")]
fn when_rebuild_again(world: &LoaderWorld) {
    world.rebuild();
}

#[when("a malformed code list file is added")]
fn when_malformed_file(world: &LoaderWorld) {
    fs::write(
        world.release.path().join("2024-1 UNLOCODE CodeListPart2.csv"),
        b",\"US\",\"BAD\"\n",
    )
    .expect("write malformed file");
}

#[then("the rebuild succeeds")]
fn then_success(world: &LoaderWorld) {
    let outcome = world.outcome.borrow();
    let result = outcome.as_ref().expect("a rebuild should have run");
    assert!(result.is_ok(), "rebuild failed: {result:?}");
}

#[then("the rebuild fails with a decode error")]
fn then_decode_error(world: &LoaderWorld) {
    let outcome = world.outcome.borrow();
    let result = outcome.as_ref().expect("a rebuild should have run");
    assert!(matches!(result, Err(IngestError::Decode { .. })));
}

#[then("the database resolves IATA code {code:word} to {locode:word}")]
fn then_iata(world: &LoaderWorld, code: String, locode: String) {
    let resolved = world
        .database
        .borrow()
        .iata_to_locode(code.trim_matches('"'), None)
        .expect("iata query");
    assert_eq!(resolved.as_deref(), Some(locode.trim_matches('"')));
}

#[then("the country {code:word} keeps its accented name")]
fn then_country_name(world: &LoaderWorld, code: String) {
    let stored = world
        .database
        .borrow()
        .country_name(code.trim_matches('"'))
        .expect("country query");
    assert_eq!(stored.as_deref(), Some("CÔTE D'IVOIRE"));
}

#[then("the database holds both locations")]
fn then_location_count(world: &LoaderWorld) {
    let locations = world.database.borrow().all_locations().expect("list locations");
    let codes: Vec<_> = locations.iter().map(|l| l.key().locode()).collect();
    assert_eq!(codes, vec!["CIABJ", "USLEB"]);
}

#[scenario(path = "tests/features/dataset_loader.feature", index = 0)]
fn loading_a_release(world: LoaderWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/dataset_loader.feature", index = 1)]
fn rebuilding_twice(world: LoaderWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/dataset_loader.feature", index = 2)]
fn broken_file_rolls_back(world: LoaderWorld) {
    let _ = world;
}
