//! Shared helpers for CLI specs

#![allow(dead_code, deprecated)]

pub use assert_cmd::Command;
pub use similar_asserts::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Owner tree used by most specs: top -> top.env -> top.env.agent
pub const TREE: &str = r#"
[objection]
name = "run_phase"

[[owner]]
name = "top"

[[owner]]
name = "top.env"
parent = "top"

[[owner]]
name = "top.env.agent"
parent = "top.env"
"#;

/// Raise two on the agent, drop them 10ms later
pub const RAISE_AND_DROP: &str = r#"
[[step]]
at = "0ms"
action = "raise"
owner = "top.env.agent"
count = 2
description = "seq"

[[step]]
at = "10ms"
action = "drop"
owner = "top.env.agent"
count = 2
description = "seq"
"#;

/// Temporary directory holding scenario files
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project and return its path
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write `TREE` followed by `steps` as a scenario
    pub fn scenario(&self, steps: &str) -> PathBuf {
        self.file("scenario.toml", &format!("{TREE}{steps}"))
    }
}

/// The objection binary, run from `dir`
pub fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("objection").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

pub fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
