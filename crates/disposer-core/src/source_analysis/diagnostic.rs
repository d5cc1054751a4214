// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics produced by the front end and by lint rules.

use std::collections::HashSet;

use ecow::EcoString;

use super::{FileId, Span};

/// The semantic category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCategory {
    /// Malformed source text.
    Syntax,
    /// Unresolvable names, bad inheritance, bad overrides.
    Binding,
    /// API usage rule (e.g. disposal contracts).
    Usage,
}

impl DiagnosticCategory {
    /// Name used in rule listings and machine-readable output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Syntax => "Syntax",
            Self::Binding => "Binding",
            Self::Usage => "Usage",
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// An error in the program; the model may be incomplete.
    Error,
    /// A warning that should be addressed.
    Warning,
    /// A lint finding (the default for rule diagnostics).
    Lint,
    /// A hint or informational note.
    Hint,
}

impl Severity {
    /// Lower-case name used in machine-readable output and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Lint => "lint",
            Self::Hint => "hint",
        }
    }
}

/// A diagnostic message (error, warning, lint or hint).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The fully formatted message.
    pub message: EcoString,
    /// The file the span points into, once known.
    pub file: Option<FileId>,
    /// The source location.
    pub span: Span,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
    /// Optional semantic category.
    pub category: Option<DiagnosticCategory>,
    /// Identifier of the rule that produced this diagnostic (`CA2215`).
    pub code: Option<EcoString>,
    /// Message-format arguments, in order.
    pub arguments: Vec<EcoString>,
}

impl Diagnostic {
    fn new(severity: Severity, message: EcoString, span: Span) -> Self {
        Self {
            severity,
            message,
            file: None,
            span,
            hint: None,
            category: None,
            code: None,
            arguments: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, span: Span) -> Self {
        Self::new(Severity::Error, message.into(), span)
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>, span: Span) -> Self {
        Self::new(Severity::Warning, message.into(), span)
    }

    /// Creates a new lint diagnostic.
    #[must_use]
    pub fn lint(message: impl Into<EcoString>, span: Span) -> Self {
        Self::new(Severity::Lint, message.into(), span)
    }

    /// Replaces the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attaches a semantic category.
    #[must_use]
    pub fn with_category(mut self, category: DiagnosticCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Attaches the file the span refers to.
    #[must_use]
    pub fn with_file(mut self, file: FileId) -> Self {
        self.file = Some(file);
        self
    }

    /// Attaches the producing rule and its message arguments.
    #[must_use]
    pub fn with_code(
        mut self,
        code: impl Into<EcoString>,
        arguments: impl IntoIterator<Item = EcoString>,
    ) -> Self {
        self.code = Some(code.into());
        self.arguments = arguments.into_iter().collect();
        self
    }

    /// Sort key giving a stable, document-ordered report.
    #[must_use]
    pub fn sort_key(&self) -> (Option<FileId>, u32, u32, Option<&str>, &str) {
        (
            self.file,
            self.span.start(),
            self.span.end(),
            self.code.as_deref(),
            self.message.as_str(),
        )
    }
}

/// Sorts diagnostics into document order and removes exact duplicates.
///
/// Diagnostics with equal sort keys keep their relative order, and only
/// the first copy of each duplicate survives, even when other diagnostics
/// with the same key sit between the copies.
pub fn sort_and_dedup(diagnostics: &mut Vec<Diagnostic>) {
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    let mut seen = HashSet::with_capacity(diagnostics.len());
    diagnostics.retain(|diagnostic| seen.insert(diagnostic.clone()));
}
