//! CLI error specs

use crate::prelude::*;

#[test]
fn missing_scenario_file_fails() {
    let project = Project::empty();
    let output = cli(project.path())
        .args(["run", "nope.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("failed to read scenario"));
}

#[test]
fn malformed_scenario_fails() {
    let project = Project::empty();
    project.file("bad.toml", "[[step]]\nat = \"soon\"\n");

    let output = cli(project.path())
        .args(["check", "bad.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("failed to parse scenario"));
}

#[test]
fn unknown_subcommand_fails() {
    let project = Project::empty();
    let output = cli(project.path()).arg("drain").output().unwrap();
    assert!(!output.status.success());
}
