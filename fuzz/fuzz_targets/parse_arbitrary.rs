// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for parser crash safety testing.
//!
//! Feeds arbitrary byte sequences to the lexer and parser and asserts that
//! they never panic. The parser must handle all input gracefully, producing
//! a compilation unit plus diagnostics.
//!
//! # Corpus Seeding
//!
//! Seed `fuzz/corpus/parse_arbitrary/` with the `.cs` files from
//! `crates/disposer-core/tests/cases/`.

#![no_main]

use disposer_core::source_analysis::{lex_with_eof, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 is rejected before lexing.
    if let Ok(source) = std::str::from_utf8(data) {
        let (unit, diagnostics) = parse(lex_with_eof(source));
        for diagnostic in &diagnostics {
            assert!(diagnostic.span.end() as usize <= source.len());
        }
        assert!(unit.span.end() as usize <= source.len());
    }
});
