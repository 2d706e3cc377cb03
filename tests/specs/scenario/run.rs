//! `objection run` specs

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn raise_and_drop_drains_to_root() {
    let project = Project::empty();
    project.scenario(RAISE_AND_DROP);

    let output = cli(project.path())
        .args(["run", "scenario.toml"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr_of(&output));
    assert_eq!(
        stdout_of(&output),
        "\
raised top.env.agent count=2 total=2 originator=top.env.agent [seq]
raised top.env count=2 total=2 originator=top.env.agent [seq]
raised top count=2 total=2 originator=top.env.agent [seq]
dropped top.env.agent count=2 total=0 originator=top.env.agent [seq]
all_dropped top.env.agent count=2 total=0 originator=top.env.agent [seq]
dropped top.env count=2 total=0 originator=top.env.agent [seq]
all_dropped top.env count=2 total=0 originator=top.env.agent [seq]
dropped top count=2 total=0 originator=top.env.agent [seq]
all_dropped top count=2 total=0 originator=top.env.agent [seq]
objection 'run_phase'
  no objections outstanding
"
    );
}

#[test]
fn reraise_during_drain_time_keeps_parent_busy() {
    let project = Project::empty();
    project.file(
        "scenario.toml",
        r#"
[objection]
name = "run_phase"

[[owner]]
name = "top"

[[owner]]
name = "top.env"
parent = "top"
drain_time = "200ms"

[[step]]
at = "0ms"
action = "raise"
owner = "top.env"

[[step]]
at = "10ms"
action = "drop"
owner = "top.env"

[[step]]
at = "50ms"
action = "raise"
owner = "top.env"

[[step]]
at = "60ms"
action = "drop"
owner = "top.env"
"#,
    );

    let output = cli(project.path())
        .args(["run", "scenario.toml"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr_of(&output));
    let stdout = stdout_of(&output);
    let all_dropped: Vec<&str> = stdout
        .lines()
        .filter(|l| l.starts_with("all_dropped"))
        .collect();
    assert_eq!(
        all_dropped,
        vec![
            "all_dropped top.env count=1 total=0 originator=top.env",
            "all_dropped top count=1 total=0 originator=top.env",
        ]
    );
    // The root saw one raise and one drop in total
    assert_eq!(stdout.lines().filter(|l| l.starts_with("raised top ")).count(), 1);
    assert_eq!(stdout.lines().filter(|l| l.starts_with("dropped top ")).count(), 1);
}

#[test]
fn json_prints_one_event_per_line() {
    let project = Project::empty();
    project.scenario(RAISE_AND_DROP);

    let output = cli(project.path())
        .args(["run", "--json", "scenario.toml"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr_of(&output));
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 9);
    assert!(lines.iter().all(|l| l.starts_with('{') && l.ends_with('}')));
    assert!(lines[8].starts_with(r#"{"kind":"all_dropped","objection":"run_phase","owner":"top","#));
    // The report moves to stderr
    assert!(stderr_of(&output).contains("no objections outstanding"));
}

#[test]
fn overdrop_fails_with_details() {
    let project = Project::empty();
    project.scenario(
        r#"
[[step]]
at = "0ms"
action = "drop"
owner = "top.env"
description = "too early"
"#,
    );

    let output = cli(project.path())
        .args(["run", "scenario.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("objection 'run_phase' dropped 1 below zero on top.env"),
        "{stderr}"
    );
    assert!(stderr.contains("too early"), "{stderr}");
}

#[test]
fn outstanding_objection_times_out() {
    let project = Project::empty();
    project.scenario(
        r#"
[[step]]
at = "0ms"
action = "raise"
owner = "top.env"
"#,
    );

    let output = cli(project.path())
        .args(["run", "--timeout", "50ms", "scenario.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(
        stdout_of(&output),
        "\
raised top.env count=1 total=1 originator=top.env
raised top count=1 total=1 originator=top.env
objection 'run_phase'
  source  total  owner
       0      1  top
       1      1  top.env
"
    );
    assert!(stderr_of(&output).contains("still busy after 50ms"));
}

#[test]
fn trace_logs_to_stderr() {
    let project = Project::empty();
    project.scenario(RAISE_AND_DROP);

    let output = cli(project.path())
        .args(["run", "--trace", "scenario.toml"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr_of(&output));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("objection::trace"), "{stderr}");
    assert!(stderr.contains("delta=2"), "{stderr}");
    assert!(stderr.contains("delta=-2"), "{stderr}");
}
