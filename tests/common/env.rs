//! Test environment builder for isolated Gantry CLI testing.
//!
//! Provides `TestEnv` - an isolated project directory plus helpers to run
//! the gantry binary against it. None of the CLI tests reach a real
//! remote host; they exercise the validation and confirmation paths that
//! fail before any connection is attempted.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Result of running a gantry CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with a temp project directory.
pub struct TestEnv {
    pub project_root: TempDir,
    gantry_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().expect("failed to create temp project dir"),
            gantry_bin: PathBuf::from(env!("CARGO_BIN_EXE_gantry")),
        }
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Write a gantry.toml into the project
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.project_path("gantry.toml"), content)
            .expect("failed to write gantry.toml");
    }

    /// Run gantry in this environment from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.project_root.path(), args)
    }

    /// Run gantry from a specific directory
    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        let output = Command::new(&self.gantry_bin)
            .current_dir(cwd)
            .args(args)
            .env("GANTRY_NO_COLOR", "1")
            .env_remove("GANTRY_HOST")
            .env_remove("GANTRY_DEPLOY_PATH")
            .output()
            .expect("Failed to execute gantry");

        self.output_to_result(output)
    }

    fn output_to_result(&self, output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
