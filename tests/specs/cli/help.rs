//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    let project = Project::empty();
    let output = cli(project.path()).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("run"), "{stdout}");
    assert!(stdout.contains("check"), "{stdout}");
}

#[test]
fn run_help_documents_flags() {
    let project = Project::empty();
    let output = cli(project.path()).args(["run", "--help"]).output().unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    for flag in ["--trace", "--json", "--timeout"] {
        assert!(stdout.contains(flag), "missing {flag} in {stdout}");
    }
}
