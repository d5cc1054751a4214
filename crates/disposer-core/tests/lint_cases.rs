// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Annotated lint cases.
//!
//! Each `tests/cases/*.cs` file is compiled on its own and linted. A method
//! that must be reported carries a trailing annotation on the line of its
//! name, giving the call the override is missing:
//!
//! ```text
//! protected override void Dispose(bool disposing) // expect: base.Dispose(bool)
//! ```
//!
//! Every other line must stay clean, and the file must compile without
//! front-end diagnostics.

use std::fs;
use std::path::{Path, PathBuf};

use disposer_core::prelude::*;

const EXPECT_MARKER: &str = "// expect:";

fn test_cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("cases")
}

/// Expected `(line, call)` pairs, 1-based lines.
fn parse_expectations(content: &str) -> Vec<(usize, String)> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let (_, call) = line.split_once(EXPECT_MARKER)?;
            Some((i + 1, call.trim().to_string()))
        })
        .collect()
}

fn line_of(text: &str, offset: u32) -> usize {
    let offset = (offset as usize).min(text.len());
    text[..offset].matches('\n').count() + 1
}

fn case_files() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(test_cases_dir())
        .expect("Failed to read test cases directory")
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "cs").then_some(path)
        })
        .collect();
    files.sort();
    files
}

/// Runs one case file and returns its failures.
fn run_case(path: &Path) -> Vec<String> {
    let name = path.file_name().map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    let text = fs::read_to_string(path).expect("Failed to read test case");
    let compilation = Compilation::new(
        [(name.as_str(), text.as_str())],
        CompilationOptions::default(),
    );

    let mut failures = Vec::new();
    for diagnostic in compilation.diagnostics() {
        failures.push(format!(
            "{name}:{}: unexpected front-end diagnostic: {}",
            line_of(&text, diagnostic.span.start()),
            diagnostic.message
        ));
    }

    let mut actual: Vec<(usize, String)> = run_lint(&compilation, &LintOptions::default())
        .iter()
        .map(|diagnostic| {
            let call = diagnostic.arguments.get(1).map_or_else(String::new, ToString::to_string);
            (line_of(&text, diagnostic.span.start()), call)
        })
        .collect();
    actual.sort();
    let expected = parse_expectations(&text);

    for entry in &expected {
        if !actual.contains(entry) {
            failures.push(format!("{name}:{}: expected report `{}`", entry.0, entry.1));
        }
    }
    for entry in &actual {
        if !expected.contains(entry) {
            failures.push(format!("{name}:{}: unexpected report `{}`", entry.0, entry.1));
        }
    }
    failures
}

#[test]
fn annotated_cases() {
    let files = case_files();
    assert!(!files.is_empty(), "no cases in {}", test_cases_dir().display());

    let failures: Vec<String> = files.iter().flat_map(|path| run_case(path)).collect();
    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("  - {failure}");
        }
        panic!("{} lint case failure(s) across {} file(s)", failures.len(), files.len());
    }
}

#[test]
fn parallel_and_sequential_runs_agree() {
    for path in case_files() {
        let text = fs::read_to_string(&path).expect("Failed to read test case");
        let compilation = Compilation::new([("case.cs", text.as_str())], CompilationOptions::default());
        let sequential = run_lint(
            &compilation,
            &LintOptions {
                parallel: false,
                ..LintOptions::default()
            },
        );
        let parallel = run_lint(&compilation, &LintOptions::default());
        assert_eq!(sequential, parallel, "{}", path.display());
    }
}

#[test]
fn repeated_runs_are_identical() {
    for path in case_files() {
        let text = fs::read_to_string(&path).expect("Failed to read test case");
        let compilation = Compilation::new([("case.cs", text.as_str())], CompilationOptions::default());
        let first = run_lint(&compilation, &LintOptions::default());
        let second = run_lint(&compilation, &LintOptions::default());
        assert_eq!(first, second, "{}", path.display());
    }
}

#[test]
fn parse_expectations_reads_trailing_annotations() {
    let parsed = parse_expectations(
        "class A {\n    public override void Dispose() // expect: base.Dispose()\n}\n",
    );
    assert_eq!(parsed, vec![(2, "base.Dispose()".to_string())]);
}

fn chained_source(body: &str, base_call: bool) -> String {
    let base_call = if base_call { "base.Dispose();" } else { "" };
    format!(
        "using System;
class A : IDisposable {{ public virtual void Dispose() {{ }} public A F() {{ return this; }} }}
class B : A {{ public override void Dispose() {{ {body} {base_call} }} }}"
    )
}

#[test]
fn long_chains_are_linted_without_overflow() {
    let calls = format!("this{};", ".F()".repeat(10_000));
    let sum = format!("int total = 1{};", " + 1".repeat(20_000));
    for body in [calls, sum] {
        let text = chained_source(&body, false);
        let compilation = Compilation::new([("long.cs", text.as_str())], CompilationOptions::default());
        assert!(
            compilation
                .diagnostics()
                .iter()
                .any(|d| d.message.contains("expression is too long")),
            "{:?}",
            compilation.diagnostics()
        );
        let diagnostics = run_lint(&compilation, &LintOptions::default());
        assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
        assert_eq!(diagnostics[0].arguments[1].as_str(), "base.Dispose()");
    }
}

#[test]
fn deep_chains_within_the_limit_bind_and_lint() {
    // 1,002 links, just under the parser's limit.
    let body = format!("this{}.Dispose();", ".F()".repeat(500));
    for parallel in [true, false] {
        let text = chained_source(&body, true);
        let compilation = Compilation::new([("deep.cs", text.as_str())], CompilationOptions::default());
        assert!(compilation.diagnostics().is_empty(), "{:?}", compilation.diagnostics());
        let options = LintOptions {
            parallel,
            ..LintOptions::default()
        };
        assert!(run_lint(&compilation, &options).is_empty());
    }
}
