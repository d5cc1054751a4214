// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Disposal-contract analysis core.
//!
//! This crate contains:
//! - Lexical analysis and parsing of a C#-shaped class language
//! - Semantic analysis (symbol tables, override resolution, body binding)
//! - The analysis engine that drives rules over bound method bodies
//! - The lint rules themselves
//!
//! ```
//! use disposer_core::lint::{LintOptions, run_lint};
//! use disposer_core::semantic_analysis::Compilation;
//!
//! let compilation = Compilation::from_source(
//!     "using System;
//!      class A : IDisposable {
//!          public void Dispose() { Dispose(true); }
//!          protected virtual void Dispose(bool disposing) { }
//!      }
//!      class B : A {
//!          protected override void Dispose(bool disposing) { }
//!      }",
//! );
//! let diagnostics = run_lint(&compilation, &LintOptions::default());
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].arguments[1], "base.Dispose(bool)");
//! ```

#![doc = include_str!("../../../README.md")]

pub mod analysis;
pub mod ast;
pub mod lint;
pub mod operation_walker;
pub mod semantic_analysis;
pub mod source_analysis;

/// Runs `f`, switching to a heap-allocated stack segment when less than
/// 32 KiB of stack remain.
///
/// Wraps the recursive entry points of the parser, the binder and the
/// operation walker, so deep but valid input cannot overflow the stack of
/// the calling thread (rayon workers and test threads have small stacks).
#[inline]
pub(crate) fn maybe_grow_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(32 * 1024, 256 * 1024, f)
}

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::lint::{LintOptions, RuleLevel, run_lint};
    pub use crate::semantic_analysis::{Compilation, CompilationOptions, Language};
    pub use crate::source_analysis::{Diagnostic, FileId, Severity, Span};
}
