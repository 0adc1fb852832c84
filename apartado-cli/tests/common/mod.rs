//! Common test utilities for CLI integration tests.
//!
//! Every command runs inside a temporary working directory with its own
//! home directory, so no configuration outside the test leaks in.

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Variables that would override the test's configuration.
const APARTADO_ENV: [&str; 8] = [
    "APARTADO_CONFIG",
    "APARTADO_LOG_MODE",
    "APARTADO_MIN_DURATION_MINUTES",
    "APARTADO_MAX_DURATION_MINUTES",
    "APARTADO_TITLE_MIN_LENGTH",
    "APARTADO_PASSWORD_MIN_LENGTH",
    "APARTADO_REDIRECT_DELAY_MS",
    "APARTADO_OUTPUT_FORMAT",
];

/// Isolated working and home directories.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Working directory the commands run in
    pub work_dir: PathBuf,
    /// Home directory seen by the commands
    pub home_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let work_dir = temp_dir.path().join("project");
        let home_dir = temp_dir.path().join("home");
        fs::create_dir_all(&work_dir).expect("Failed to create work dir");
        fs::create_dir_all(&home_dir).expect("Failed to create home dir");

        Self {
            temp_dir,
            work_dir,
            home_dir,
        }
    }

    /// A command running in the work directory with a clean environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("apartado").expect("Failed to find apartado binary");
        cmd.current_dir(&self.work_dir).env("HOME", &self.home_dir);
        for name in APARTADO_ENV {
            cmd.env_remove(name);
        }
        cmd
    }

    /// Writes `apartado.yaml` into the work directory.
    pub fn write_project_config(&self, contents: &str) -> PathBuf {
        self.write_file("apartado.yaml", contents)
    }

    /// Writes a file relative to the work directory.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Runs `check-reservation` for a draft with the given bounds.
    pub fn check_reservation(&self, title: &str, start: &str, end: &str) -> Command {
        let mut cmd = self.command();
        cmd.args(["check-reservation", "--title", title, "--start", start, "--end", end]);
        cmd
    }
}

/// A calendar with two spaces and an approved class in Lab A.
#[allow(dead_code)]
pub const CALENDAR: &str = r"
spaces:
  - id: 1
    name: Lab A
    location: Building 1
  - id: 2
    name: Lab B
    location: Building 2
reservations:
  - id: 10
    space: 1
    created_by: 7
    title: Physics
    start_at: 2025-01-02T10:00:00
    end_at: 2025-01-02T11:00:00
    status: APPROVED
";

/// Parses a command's stdout as JSON.
#[allow(dead_code)]
pub fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}
