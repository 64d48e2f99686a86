//! Shared testing utilities for draftsmith CLI tests.

use assert_cmd::Command;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated working directory plus a fake completion service.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
    server: mockito::ServerGuard,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        let server = mockito::Server::new();
        Self { root, work_dir, server }
    }

    pub fn home(&self) -> &Path {
        self.root.path()
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn server(&mut self) -> &mut mockito::ServerGuard {
        &mut self.server
    }

    /// Command for the compiled binary, pointed at the fake service.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("draftsmith").expect("Failed to locate draftsmith binary");
        cmd.current_dir(&self.work_dir)
            .env("HOME", self.home())
            .env("DRAFTSMITH_API_BASE", self.server.url())
            .env_remove("DRAFTSMITH_API_KEY")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Write `draftsmith.toml` into the working directory.
    pub fn write_config(&self, content: &str) {
        fs::write(self.work_dir.join("draftsmith.toml"), content).expect("Failed to write config");
    }

    /// Register a completion answer for requests whose body matches `pattern`.
    pub fn mock_completion(&mut self, pattern: &str, content: &str) -> mockito::Mock {
        self.server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::Regex(pattern.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(content))
            .create()
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.work_dir.join(relative)).expect("Failed to read output file")
    }
}

/// Chat-completion response body carrying `content`.
pub fn completion_body(content: &str) -> String {
    json!({
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

/// Config with small thresholds and no heading plan.
pub const SMALL_CONFIG: &str = r#"
[assembly]
min_total_length = 60
min_section_count = 2
min_subsections_per_section = 1
max_retries = 3
use_heading_plan = false
"#;
