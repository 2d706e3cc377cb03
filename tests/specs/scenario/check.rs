//! `objection check` specs

use crate::prelude::*;

#[test]
fn valid_scenario_passes() {
    let project = Project::empty();
    project.scenario(RAISE_AND_DROP);

    let output = cli(project.path())
        .args(["check", "scenario.toml"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr_of(&output));
    assert!(stdout_of(&output).contains("ok (3 owners, 2 steps)"));
}

#[test]
fn unknown_owner_is_reported() {
    let project = Project::empty();
    project.scenario(
        r#"
[[step]]
at = "0ms"
action = "raise"
owner = "top.ghost"
"#,
    );

    let output = cli(project.path())
        .args(["check", "scenario.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("step 1 refers to unknown owner 'top.ghost'"));
}

#[test]
fn negative_balance_is_reported() {
    let project = Project::empty();
    project.scenario(
        r#"
[[step]]
at = "0ms"
action = "drop"
owner = "top.env"
count = 3
"#,
    );

    let output = cli(project.path())
        .args(["check", "scenario.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("step 1 drops 3 from 'top.env' with only 0 raised"));
}

#[test]
fn second_root_is_reported() {
    let project = Project::empty();
    project.file(
        "scenario.toml",
        "[[owner]]\nname = \"a\"\n\n[[owner]]\nname = \"b\"\n",
    );

    let output = cli(project.path())
        .args(["check", "scenario.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("more than one root"));
}
