//! Unit tests for the dataset loader.

use std::fs;

use rstest::{fixture, rstest};
use tempfile::TempDir;
use unlocode_core::test_support::MemorySink;

use super::*;

const CODE_LIST: &[u8] = b",\"CI\",,\".C\xd4TE D'IVOIRE\",,,,,,,,\n\
,\"US\",,\".UNITED STATES\",,,,,,,,\n\
,\"US\",\"LEB\",\"Hanover-Lebanon-White River Apt\",\"Hanover-Lebanon-White River Apt\",\"NH\",\"--34----\",\"AI\",\"0307\",,\"4338N 07215W\",\n\
,\"US\",\"LEB\",\"Lebanon-White River-Hanover Apt\",\"Lebanon-White River-Hanover Apt\",\"VT\",\"---4----\",\"AI\",\"9601\",,,\n\
\"X\",\"US\",\"OLD\",\"Old Town\",\"Old Town\",,\"1-------\",\"AA\",\"0101\",,,\n\
\"=\",\"US\",,\"Peking = Beijing\",\"Peking = Beijing\",,,,,,,\n\
\"\xa6\",\"US\",,\"Not a place\",\"Not a place\",,,,,,,\n\
,\"US\",,\"No code\",\"No code\",,,,,,,\n\
,\"CI\",\"ABJ\",\"Abidjan\",\"Abidjan\",\"AB\",\"1234----\",\"AI\",\"9501\",,\"0519N 00402W\",\"Port autonome\"\n";

const SUBDIVISIONS: &[u8] = b"\"US\",\"NH\",\"New Hampshire\",\"State\"\n\
\"US\",\"VT\",\"Vermont\",\"State\"\n\
\"FR\",\"IDF\",\"\xcele-de-France\",\"metropolitan region\"\n";

#[fixture]
fn release_dir() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("2024-1 UNLOCODE CodeListPart1.csv"), CODE_LIST)
        .expect("write code list");
    fs::write(dir.path().join("2024-1 SubdivisionCodes.csv"), SUBDIVISIONS)
        .expect("write subdivisions");
    fs::write(dir.path().join("README.txt"), b"ignored").expect("write readme");
    fs::write(dir.path().join("notes.csv"), b"a,b\n").expect("write unclassified file");
    dir
}

fn utf8_path(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir path is UTF-8")
}

fn ingest_into_memory(dir: &TempDir) -> (MemorySink, IngestReport) {
    let mut sink = MemorySink::default();
    let report =
        ingest_dir(&utf8_path(dir), &mut sink, LoaderOptions::default()).expect("ingest");
    (sink, report)
}

#[rstest]
fn classifies_files_by_name_marker() {
    assert_eq!(
        classify_file(Utf8Path::new("/data/2023-2 UNLOCODE CodeListPart3.csv")),
        Some(FileKind::CodeList)
    );
    assert_eq!(
        classify_file(Utf8Path::new("2023-2 SubdivisionCodes.csv")),
        Some(FileKind::Subdivision)
    );
    assert_eq!(classify_file(Utf8Path::new("unlocode.csv")), None);
}

#[rstest]
fn loads_countries_subdivisions_and_locations(release_dir: TempDir) {
    let (sink, report) = ingest_into_memory(&release_dir);

    assert_eq!(sink.countries.len(), 2);
    assert_eq!(
        sink.countries.get("CI").map(|c| c.name.as_str()),
        Some("CÔTE D'IVOIRE")
    );
    assert_eq!(sink.subdivisions.len(), 3);
    assert_eq!(sink.locations.len(), 2);

    assert_eq!(report.countries, 2);
    assert_eq!(report.subdivisions, 3);
    assert_eq!(report.locations, 3);
}

#[rstest]
fn later_rows_supersede_earlier_ones(release_dir: TempDir) {
    let (sink, report) = ingest_into_memory(&release_dir);
    let lebanon = sink.location("US", "LEB").expect("LEB loaded");

    assert_eq!(lebanon.name, "Lebanon-White River-Hanover Apt");
    assert_eq!(lebanon.subdivision_code.as_deref(), Some("VT"));
    assert_eq!(lebanon.position, None);
    assert!(!lebanon.functions.road_terminal);
    assert_eq!(report.superseded_locations, 1);
}

#[rstest]
fn filtered_rows_are_counted_by_reason(release_dir: TempDir) {
    let (sink, report) = ingest_into_memory(&release_dir);

    assert!(sink.location("US", "OLD").is_none());
    assert_eq!(report.skipped_rows.get(&SkipReason::Removed), Some(&1));
    assert_eq!(report.skipped_rows.get(&SkipReason::ReferenceEntry), Some(&1));
    assert_eq!(report.skipped_rows.get(&SkipReason::NonLocation), Some(&1));
    assert_eq!(
        report.skipped_rows.get(&SkipReason::MissingLocationCode),
        Some(&1)
    );
    assert_eq!(report.skipped_row_count(), 4);
}

#[rstest]
fn files_are_processed_in_name_order(release_dir: TempDir) {
    let (_, report) = ingest_into_memory(&release_dir);
    let processed: Vec<_> = report
        .files_processed
        .iter()
        .filter_map(|p| p.file_name())
        .collect();
    assert_eq!(
        processed,
        vec!["2024-1 SubdivisionCodes.csv", "2024-1 UNLOCODE CodeListPart1.csv"]
    );
    let skipped: Vec<_> = report
        .files_skipped
        .iter()
        .filter_map(|p| p.file_name())
        .collect();
    assert_eq!(skipped, vec!["notes.csv"]);
}

#[rstest]
fn malformed_row_reports_file_and_line(release_dir: TempDir) {
    let broken = release_dir.path().join("2024-1 UNLOCODE CodeListPart2.csv");
    fs::write(&broken, b",\"US\",\"AAA\",\"Fine\",\"Fine\",,,,,,,\n,\"US\",\"BBB\"\n")
        .expect("write broken file");

    let mut sink = MemorySink::default();
    let err = ingest_dir(&utf8_path(&release_dir), &mut sink, LoaderOptions::default())
        .expect_err("field count error");
    match err {
        IngestError::Decode { path, line, source } => {
            assert_eq!(path.file_name(), Some("2024-1 UNLOCODE CodeListPart2.csv"));
            assert_eq!(line, 2);
            assert_eq!(
                source,
                DecodeError::FieldCount {
                    kind: FileKind::CodeList,
                    expected: 12,
                    found: 3,
                }
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn missing_directory_is_an_error() {
    let dir = TempDir::new().expect("create temp dir");
    let missing = utf8_path(&dir).join("absent");
    let mut sink = MemorySink::default();
    let err = ingest_dir(&missing, &mut sink, LoaderOptions::default())
        .expect_err("missing directory");
    assert!(matches!(err, IngestError::ListDirectory { .. }));
}

#[rstest]
fn rebuild_commits_the_dataset(release_dir: TempDir) {
    let mut db = LocodeDatabase::open_in_memory().expect("open database");
    let report = rebuild_from_dir(&mut db, &utf8_path(&release_dir), LoaderOptions::default())
        .expect("rebuild");

    assert_eq!(report.locations, 3);
    assert_eq!(
        db.location_name("CI", "ABJ").expect("query").as_deref(),
        Some("Abidjan")
    );
    assert_eq!(
        db.subdivision_name("FR", "IDF").expect("query").as_deref(),
        Some("Île-de-France")
    );
}

#[rstest]
fn rebuild_is_idempotent(release_dir: TempDir) {
    let mut db = LocodeDatabase::open_in_memory().expect("open database");
    let dir = utf8_path(&release_dir);
    rebuild_from_dir(&mut db, &dir, LoaderOptions::default()).expect("first rebuild");
    let first = db.all_locations().expect("query");
    rebuild_from_dir(&mut db, &dir, LoaderOptions::default()).expect("second rebuild");
    assert_eq!(db.all_locations().expect("query"), first);
    assert_eq!(db.all_countries().expect("query").len(), 2);
}

#[rstest]
fn failed_rebuild_keeps_previous_dataset(release_dir: TempDir) {
    let mut db = LocodeDatabase::open_in_memory().expect("open database");
    let dir = utf8_path(&release_dir);
    rebuild_from_dir(&mut db, &dir, LoaderOptions::default()).expect("first rebuild");

    fs::write(
        release_dir.path().join("2024-1 UNLOCODE CodeListPart2.csv"),
        b",\"US\",\"BBB\"\n",
    )
    .expect("write broken file");
    rebuild_from_dir(&mut db, &dir, LoaderOptions::default()).expect_err("broken rebuild");

    assert_eq!(db.all_locations().expect("query").len(), 2);
    assert_eq!(db.all_countries().expect("query").len(), 2);
}
