// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the class-language parser.
//!
//! 1. **Parser never panics** on arbitrary or near-valid input
//! 2. **Diagnostic spans stay within the input**
//! 3. **Error statements produce diagnostics**
//! 4. **Valid declarations parse cleanly**
//!
//! **DDD Context:** Source Analysis

use proptest::prelude::*;

use crate::ast::{Block, Member, Statement};
use crate::source_analysis::{lex_with_eof, parse};

/// Class-language fragments for composing near-valid inputs.
const FRAGMENTS: &[&str] = &[
    "using System;",
    "namespace Acme { }",
    "class A : System.IDisposable { public void Dispose() { } }",
    "class B : A { public override void Dispose() { base.Dispose(); } }",
    "class C { protected virtual void Dispose(bool disposing) { if (disposing) { x.Dispose(); } } }",
    "class D : C { protected override void Dispose(bool disposing) { try { } finally { base.Dispose(disposing); } } }",
    "interface I { void Close(); }",
    "abstract class E { public abstract void Run(); }",
    "class F { int count = 1 + 2 * 3; }",
    "class G { void M() { var s = new Stream(); s.Close(); return; } }",
    "class H { bool M() { return !closed && count >= 0; } }",
    "class J { J() : base() { } }",
];

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(std::string::ToString::to_string)
}

/// A fragment cut short at an arbitrary (ASCII) position.
fn truncated_fragment() -> impl Strategy<Value = String> {
    valid_fragment().prop_flat_map(|s| {
        let len = s.len();
        (1..len).prop_map(move |cut| s[..cut].to_string())
    })
}

/// A fragment with one token-significant character deleted.
fn fragment_with_deletion() -> impl Strategy<Value = String> {
    valid_fragment().prop_flat_map(|s| {
        let len = s.len();
        (0..len).prop_map(move |at| {
            let mut mutated = s.clone();
            mutated.remove(at);
            mutated
        })
    })
}

/// A fragment with braces and parentheses swapped.
fn mismatched_brackets() -> impl Strategy<Value = String> {
    valid_fragment().prop_map(|s| {
        s.chars()
            .map(|ch| match ch {
                '{' => '(',
                ')' => '}',
                _ => ch,
            })
            .collect()
    })
}

fn near_valid_source() -> impl Strategy<Value = String> {
    prop_oneof![
        valid_fragment(),
        truncated_fragment(),
        fragment_with_deletion(),
        mismatched_brackets(),
    ]
}

fn block_has_error(block: &Block) -> bool {
    block.statements.iter().any(statement_has_error)
}

fn statement_has_error(statement: &Statement) -> bool {
    match statement {
        Statement::Error { .. } => true,
        Statement::Block(block) => block_has_error(block),
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => {
            statement_has_error(then_branch)
                || else_branch.as_deref().is_some_and(statement_has_error)
        }
        Statement::While { body, .. } => statement_has_error(body),
        Statement::Try { body, finally, .. } => {
            block_has_error(body) || finally.as_ref().is_some_and(block_has_error)
        }
        Statement::Expression { .. }
        | Statement::LocalDeclaration { .. }
        | Statement::Return { .. }
        | Statement::Empty(_) => false,
    }
}

/// Default is 512 cases; override via `PROPTEST_CASES` env var for nightly runs.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn parser_never_panics(input in "\\PC{0,300}") {
        let _ = parse(lex_with_eof(&input));
    }

    #[test]
    fn parser_never_panics_on_near_valid_input(input in near_valid_source()) {
        let _ = parse(lex_with_eof(&input));
    }

    #[test]
    fn diagnostic_spans_within_input(input in near_valid_source()) {
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        let (_, diagnostics) = parse(lex_with_eof(&input));
        for diagnostic in &diagnostics {
            prop_assert!(
                diagnostic.span.end() <= input_len,
                "diagnostic {:?} past end of {:?}",
                diagnostic,
                input,
            );
        }
    }

    #[test]
    fn error_statements_imply_diagnostics(input in near_valid_source()) {
        let (unit, diagnostics) = parse(lex_with_eof(&input));
        let has_error_node = unit.types.iter().flat_map(|ty| &ty.members).any(|member| {
            matches!(member, Member::Method(method)
                if method.body.as_ref().is_some_and(block_has_error))
        });
        if has_error_node {
            prop_assert!(!diagnostics.is_empty(), "error node without diagnostic in {:?}", input);
        }
    }

    #[test]
    fn valid_fragments_parse_cleanly(
        fragments in prop::collection::vec(valid_fragment(), 1..5)
    ) {
        let input = fragments.join("\n");
        let (_, diagnostics) = parse(lex_with_eof(&input));
        prop_assert!(diagnostics.is_empty(), "{:?} for {:?}", diagnostics, input);
    }
}
