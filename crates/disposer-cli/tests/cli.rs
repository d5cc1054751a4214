// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the `disposer` binary.
//!
//! Each test writes a small project into a temporary directory and runs the
//! built executable against it.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const BASE: &str = "using System;

public class Resource : IDisposable
{
    public void Dispose()
    {
        Dispose(true);
        GC.SuppressFinalize(this);
    }

    protected virtual void Dispose(bool disposing)
    {
    }
}
";

const GOOD: &str = "public class Good : Resource
{
    protected override void Dispose(bool disposing)
    {
        base.Dispose(disposing);
    }
}
";

const BAD: &str = "public class Bad : Resource
{
    protected override void Dispose(bool disposing)
    {
    }
}
";

fn disposer(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_disposer"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run disposer")
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    for (name, content) in files {
        let path = temp.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dir");
        }
        fs::write(path, content).expect("write source");
    }
    temp
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn clean_project_exits_zero() {
    let temp = project(&[("src/base.cs", BASE), ("src/good.cs", GOOD)]);
    let output = disposer(&["lint"], temp.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn violation_is_reported_with_rule_and_exit_code() {
    let temp = project(&[("base.cs", BASE), ("bad.cs", BAD)]);
    let output = disposer(&["lint", "."], temp.path());
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("CA2215"), "stderr: {err}");
    assert!(
        err.contains("Ensure that method 'Bad.Dispose(bool)' calls 'base.Dispose(bool)'"),
        "stderr: {err}"
    );
    assert!(err.contains("1 diagnostic found in 2 file(s)"), "stderr: {err}");
}

#[test]
fn json_output_is_one_object_per_line() {
    let temp = project(&[("base.cs", BASE), ("bad.cs", BAD), ("good.cs", GOOD)]);
    let output = disposer(&["lint", "--format", "json"], temp.path());
    assert!(!output.status.success());

    let out = stdout(&output);
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid JSON line"))
        .collect();
    assert_eq!(lines.len(), 1, "stdout: {out}");
    let report = &lines[0];
    assert_eq!(report["rule"], "CA2215");
    assert_eq!(report["severity"], "lint");
    assert_eq!(report["arguments"][0], "Bad.Dispose(bool)");
    assert_eq!(report["arguments"][1], "base.Dispose(bool)");
    assert!(report["file"].as_str().unwrap().ends_with("bad.cs"));
    let start = report["span_start"].as_u64().unwrap() as usize;
    let end = report["span_end"].as_u64().unwrap() as usize;
    assert_eq!(&BAD[start..end], "Dispose");
}

#[test]
fn visual_basic_spelling_from_flag() {
    let temp = project(&[("base.cs", BASE), ("bad.cs", BAD)]);
    let output = disposer(
        &["lint", "--format", "json", "--language", "visual-basic"],
        temp.path(),
    );
    let out = stdout(&output);
    assert!(out.contains("\"MyBase.Dispose(Boolean)\""), "stdout: {out}");
    assert!(out.contains("\"Bad.Dispose(Boolean)\""), "stdout: {out}");
}

#[test]
fn config_file_sets_severity() {
    let temp = project(&[
        ("base.cs", BASE),
        ("bad.cs", BAD),
        ("disposer.toml", "[rules]\nCA2215 = \"error\"\n"),
    ]);
    let output = disposer(&["lint", "--format", "json", "--sequential"], temp.path());
    assert!(!output.status.success());
    assert!(stdout(&output).contains("\"severity\":\"error\""));
}

#[test]
fn config_file_can_disable_the_rule() {
    let temp = project(&[
        ("base.cs", BASE),
        ("bad.cs", BAD),
        ("disposer.toml", "[rules]\nCA2215 = \"off\"\n"),
    ]);
    let output = disposer(&["lint"], temp.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn unknown_rule_in_config_is_an_error() {
    let temp = project(&[
        ("base.cs", BASE),
        ("disposer.toml", "[rules]\nCA1234 = \"warning\"\n"),
    ]);
    let output = disposer(&["lint"], temp.path());
    assert!(!output.status.success());
    assert!(stderr(&output).contains("CA1234"));
}

#[test]
fn front_end_errors_are_reported() {
    let temp = project(&[("broken.cs", "class A { void M() { int x = ; } }")]);
    let output = disposer(&["lint", "--format", "json"], temp.path());
    assert!(!output.status.success());
    assert!(stdout(&output).contains("\"severity\":\"error\""));
}

#[test]
fn rules_lists_ca2215() {
    let temp = project(&[]);
    let output = disposer(&["rules"], temp.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("CA2215  Usage"));
}

#[test]
fn explain_known_and_unknown_rules() {
    let temp = project(&[]);
    let known = disposer(&["explain", "CA2215"], temp.path());
    assert!(known.status.success());
    assert!(stdout(&known).contains("quality-rules/ca2215"));

    let unknown = disposer(&["explain", "CA0001"], temp.path());
    assert!(!unknown.status.success());
    assert!(stderr(&unknown).contains("CA0001"));
}
