// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Built-in core library declarations.
//!
//! **DDD Context:** Semantic Analysis
//!
//! The core library supplies the types every program implicitly depends on:
//! the root class `System.Object`, the disposal contract
//! `System.IDisposable`, and a few members that disposal code commonly
//! calls. It is written in the class language itself and parsed with the
//! regular front end into the pseudo-file [`FileId::CORE_LIBRARY`].
//!
//! [`FileId::CORE_LIBRARY`]: crate::source_analysis::FileId::CORE_LIBRARY

use crate::ast::CompilationUnit;
use crate::source_analysis::{lex_with_eof, parse};

/// Qualified name of the root class.
pub const OBJECT_TYPE: &str = "System.Object";

/// Qualified name of the disposal contract.
pub const DISPOSABLE_TYPE: &str = "System.IDisposable";

const CORE_LIBRARY_SOURCE: &str = r#"
namespace System {
    public class Object {
        public virtual string ToString() { return ""; }
        public virtual bool Equals(object obj) { return false; }
        public virtual int GetHashCode() { return 0; }
    }

    public interface IDisposable {
        void Dispose();
    }

    public static class GC {
        public static void SuppressFinalize(object obj) { }
    }
}
"#;

/// Parses the core library.
pub(crate) fn core_library_unit() -> CompilationUnit {
    let (unit, diagnostics) = parse(lex_with_eof(CORE_LIBRARY_SOURCE));
    debug_assert!(diagnostics.is_empty(), "core library failed to parse: {diagnostics:?}");
    unit
}
