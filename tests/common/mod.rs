//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Flags for the reference maize observation.
pub const MAIZE_ARGS: [&str; 12] = [
    "--crop", "maize", "--ph", "6.2", "--n", "30", "--p", "10", "--k", "70", "--rainfall", "650",
];

/// Scratch working directory that runs the `advisor` binary.
pub struct AdvisorFixture {
    dir: TempDir,
}

/// Captured result of one `advisor` invocation.
#[derive(Debug)]
pub struct RunResult {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl AdvisorFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Default output directory relative to the fixture root.
    pub fn outputs_dir(&self) -> PathBuf {
        self.root().join("outputs")
    }

    pub fn history_path(&self) -> PathBuf {
        self.outputs_dir().join("history.json")
    }

    /// Run `advisor` with `args` from the fixture root.
    pub fn run(&self, args: &[&str]) -> RunResult {
        Command::new(env!("CARGO_BIN_EXE_advisor"))
            .args(args)
            .current_dir(self.root())
            .env_remove("ADVISOR_LOG")
            .output()
            .expect("run advisor")
            .into()
    }

    /// Parsed `history.json`, or `None` when it was never written.
    pub fn history(&self) -> Option<Vec<serde_json::Value>> {
        let text = std::fs::read_to_string(self.history_path()).ok()?;
        Some(serde_json::from_str(&text).expect("parse history.json"))
    }

    /// Sorted report file names in the default output directory.
    pub fn report_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.outputs_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with("recommendation_") && name.ends_with(".txt"))
            .collect();
        names.sort();
        names
    }

    /// True when the run left no files at all in the fixture root.
    pub fn is_untouched(&self) -> bool {
        std::fs::read_dir(self.root())
            .expect("list fixture root")
            .next()
            .is_none()
    }
}
