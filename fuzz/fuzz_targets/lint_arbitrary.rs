// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the whole pipeline: binding plus every lint rule.
//!
//! Whatever the input, building the compilation and running the rules must
//! not panic, and the sequential and parallel drivers must agree.

#![no_main]

use disposer_core::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        let compilation = Compilation::from_source(source);
        let parallel = run_lint(&compilation, &LintOptions::default());
        let sequential = run_lint(
            &compilation,
            &LintOptions {
                parallel: false,
                ..LintOptions::default()
            },
        );
        assert_eq!(parallel, sequential);
    }
});
