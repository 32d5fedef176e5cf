//! Focused unit tests covering command configuration and validation.

use super::helpers::Workspace;
use super::*;
use crate::build::{BuildConfig, config_from_layers_for_test};
use crate::report::{ReportConfig, open_existing};
use camino::Utf8PathBuf;
use rstest::rstest;
use std::fs;
use unlocode_data::SourceEncoding;

#[rstest]
#[case(None, Some(Utf8PathBuf::from("unlocode.db")), ARG_CSV_DIR, ENV_BUILD_CSV_DIR)]
#[case(
    Some(Utf8PathBuf::from("release")),
    None,
    ARG_DATABASE,
    ENV_BUILD_DATABASE
)]
fn converting_without_required_fields_errors(
    #[case] csv_dir: Option<Utf8PathBuf>,
    #[case] database: Option<Utf8PathBuf>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = BuildArgs {
        csv_dir,
        database,
        ..BuildArgs::default()
    };
    let err = BuildConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn build_defaults_to_latin1() {
    let args = BuildArgs {
        csv_dir: Some(Utf8PathBuf::from("release")),
        database: Some(Utf8PathBuf::from("unlocode.db")),
        encoding: None,
    };
    let config = BuildConfig::try_from(args).expect("config should build");
    assert_eq!(config.encoding, SourceEncoding::Latin1);
}

#[rstest]
fn validate_sources_reports_missing_directory() {
    let workspace = Workspace::new();
    let config = BuildConfig {
        csv_dir: workspace.root().join("missing"),
        database: workspace.database(),
        encoding: SourceEncoding::default(),
    };
    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceDirectory { field, .. } => assert_eq!(field, ARG_CSV_DIR),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_files() {
    let workspace = Workspace::new();
    let file = workspace.root().join("release.csv");
    fs::write(&file, b"a,b\n").expect("write file");
    let config = BuildConfig {
        csv_dir: file,
        database: workspace.database(),
        encoding: SourceEncoding::default(),
    };
    let err = config
        .validate_sources()
        .expect_err("expected directory validation to fail");
    match err {
        CliError::MissingSourceDirectory { field, .. } => assert_eq!(field, ARG_CSV_DIR),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "csv_dir": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let workspace = Workspace::new();
    let root = workspace.root();
    let env_database = root.join("from-env.db");
    let cli_dir = root.join("from-cli");

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "csv_dir": root.join("from-file").as_str(),
            "database": root.join("from-file.db").as_str(),
            "encoding": "utf8",
        }),
        None,
    );
    composer.push_environment(json!({
        "database": env_database.as_str(),
    }));
    composer.push_cli(json!({
        "csv_dir": cli_dir.as_str(),
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.csv_dir, cli_dir);
    assert_eq!(config.database, env_database);
    assert_eq!(config.encoding, SourceEncoding::Utf8);
}

#[rstest]
fn report_requires_database() {
    let err = ReportConfig::try_from(ReportArgs::default()).expect_err("missing database");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_DATABASE);
            assert_eq!(env, ENV_REPORT_DATABASE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn report_uppercases_country() {
    let args = ReportArgs {
        database: Some(Utf8PathBuf::from("unlocode.db")),
        country: Some("us".to_owned()),
    };
    let config = ReportConfig::try_from(args).expect("config should build");
    assert_eq!(config.country.as_deref(), Some("US"));
}

#[rstest]
fn open_existing_reports_missing_database() {
    let workspace = Workspace::new();
    let path = workspace.root().join("absent.db");
    let err = open_existing(&path).expect_err("missing database should error");
    match err {
        CliError::MissingDatabase { path: missing } => assert_eq!(missing, path),
        other => panic!("expected MissingDatabase, found {other:?}"),
    }
    assert!(!path.exists(), "lookup must not create a database");
}

#[rstest]
fn open_existing_rejects_directories() {
    let workspace = Workspace::new();
    let err = open_existing(workspace.root()).expect_err("directory should error");
    match err {
        CliError::DatabaseNotFile { .. } => {}
        other => panic!("expected DatabaseNotFile, found {other:?}"),
    }
}

#[rstest]
fn nearest_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "unlocode",
        "lookup",
        "--database",
        "unlocode.db",
        "nearest",
        "-33.9",
        "-151.2",
        "--kind",
        "postal-office",
    ])
    .expect("negative coordinates should parse");
    match cli.command {
        Command::Lookup(args) => match args.query {
            crate::lookup::LookupQuery::Nearest {
                latitude,
                longitude,
                kind,
                ..
            } => {
                assert!((latitude + 33.9).abs() < f64::EPSILON);
                assert!((longitude + 151.2).abs() < f64::EPSILON);
                assert_eq!(kind, crate::lookup::NearestKind::PostalOffice);
            }
            other => panic!("expected nearest query, found {other:?}"),
        },
        other => panic!("expected lookup command, found {other:?}"),
    }
}

#[rstest]
fn unknown_encoding_is_rejected_by_the_parser() {
    let err = Cli::try_parse_from(["unlocode", "build", "--encoding", "ebcdic"])
        .expect_err("unknown encoding should fail");
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}
