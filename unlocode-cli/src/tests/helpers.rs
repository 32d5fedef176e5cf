//! Test helpers for writing release fixtures and driving commands.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// ISO-8859-1 encoded code list: two countries, three locations and a
/// reference entry.
const CODE_LIST: &[u8] = b",\"CI\",,\".C\xd4TE D'IVOIRE\",,,,,,,,\n\
,\"US\",,\".UNITED STATES\",,,,,,,,\n\
,\"US\",\"LEB\",\"Lebanon\",\"Lebanon\",\"NH\",\"---4----\",\"AI\",\"0307\",,\"4338N 07215W\",\n\
,\"US\",\"BOS\",\"Boston\",\"Boston\",\"MA\",\"1--4----\",\"AI\",\"0307\",,\"4221N 07101W\",\n\
\"=\",\"US\",,\"Beantown = Boston\",\"Beantown = Boston\",,,,,,,\n\
,\"CI\",\"ABJ\",\"Abidjan\",\"Abidjan\",\"AB\",\"1234----\",\"AI\",\"9501\",,\"0519N 00402W\",\n";

const SUBDIVISIONS: &[u8] = b"\"US\",\"NH\",\"New Hampshire\",\"State\"\n\
\"US\",\"MA\",\"Massachusetts\",\"State\"\n";

/// Temporary workspace holding a release directory and a database path.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Self { _dir: dir, root }
    }

    pub(super) fn with_release() -> Self {
        let workspace = Self::new();
        let release = workspace.release_dir();
        fs::create_dir_all(&release).expect("create release dir");
        fs::write(release.join("2024-1 UNLOCODE CodeListPart1.csv"), CODE_LIST)
            .expect("write code list");
        fs::write(release.join("2024-1 SubdivisionCodes.csv"), SUBDIVISIONS)
            .expect("write subdivisions");
        workspace
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn release_dir(&self) -> Utf8PathBuf {
        self.root.join("release")
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("db").join("unlocode.db")
    }
}

/// Parse `args` as a full command line and run it, capturing stdout.
pub(super) fn run_cli(args: &[&str]) -> Result<Value, CliError> {
    let mut invocation = vec!["unlocode"];
    invocation.extend_from_slice(args);
    let cli = Cli::try_parse_from(invocation).map_err(CliError::ArgumentParsing)?;
    let mut output = Vec::new();
    run_command(cli.command, &mut output)?;
    Ok(serde_json::from_slice(&output).expect("command output should be JSON"))
}

/// Build the workspace database from its release directory.
pub(super) fn build_database(workspace: &Workspace) -> Value {
    let release = workspace.release_dir();
    let database = workspace.database();
    run_cli(&[
        "build",
        "--csv-dir",
        release.as_str(),
        "--database",
        database.as_str(),
    ])
    .expect("build should succeed")
}
