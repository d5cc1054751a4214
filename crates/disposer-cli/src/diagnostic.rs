// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rich diagnostics using miette.
//!
//! Converts disposer-core diagnostics into miette reports with:
//! - Source code context
//! - Arrows pointing to the reported method
//! - The rule id as the diagnostic code, with its help link

use std::fmt::Display;

use disposer_core::lint::find_rule;
use disposer_core::prelude::{Diagnostic as CoreDiagnostic, Severity};
use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};

/// A front-end or rule diagnostic with rich formatting.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct LintDiagnostic {
    pub severity: Severity,
    pub message: String,
    /// Rule id, or `None` for front-end errors.
    pub code: Option<String>,
    pub help_url: Option<&'static str>,
    pub hint: Option<String>,
    pub src: NamedSource<String>,
    pub span: SourceSpan,
    pub label: &'static str,
}

impl LintDiagnostic {
    /// Create a new diagnostic from a disposer-core diagnostic.
    pub fn from_core_diagnostic(diagnostic: &CoreDiagnostic, source_path: &str, source: &str) -> Self {
        let label = match diagnostic.severity {
            Severity::Error => "error here",
            Severity::Warning => "warning here",
            Severity::Lint | Severity::Hint => "reported here",
        };
        let help_url = diagnostic
            .code
            .as_deref()
            .and_then(find_rule)
            .map(|rule| rule.descriptor().help_url);

        Self {
            severity: diagnostic.severity,
            message: diagnostic.message.to_string(),
            code: diagnostic.code.as_ref().map(ToString::to_string),
            help_url,
            hint: diagnostic.hint.as_ref().map(ToString::to_string),
            src: NamedSource::new(source_path, source.to_string()),
            span: diagnostic.span.into(),
            label,
        }
    }
}

impl Diagnostic for LintDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn Display + 'a>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning | Severity::Lint => miette::Severity::Warning,
            Severity::Hint => miette::Severity::Advice,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.hint
            .as_ref()
            .map(|hint| Box::new(hint) as Box<dyn Display + 'a>)
    }

    fn url<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.help_url
            .map(|url| Box::new(url) as Box<dyn Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.label.to_string()),
            self.span,
        ))))
    }
}
