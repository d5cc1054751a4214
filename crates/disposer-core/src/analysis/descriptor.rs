// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Static rule metadata.

use ecow::EcoString;

use crate::source_analysis::{Diagnostic, DiagnosticCategory, Severity, Span};

/// Identity and documentation of an analysis rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Stable rule identifier (`CA2215`).
    pub id: &'static str,
    pub title: &'static str,
    /// Message with positional placeholders `{0}`, `{1}`, ...
    pub message_format: &'static str,
    pub description: &'static str,
    pub category: DiagnosticCategory,
    pub default_severity: Severity,
    pub help_url: &'static str,
}

impl RuleDescriptor {
    /// Fills the positional placeholders of [`Self::message_format`].
    ///
    /// Placeholders without a matching argument are left as written.
    #[must_use]
    pub fn format_message(&self, arguments: &[EcoString]) -> EcoString {
        let format = self.message_format;
        let mut out = EcoString::new();
        let mut rest = format;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                let argument = arguments.get(index)?;
                Some((argument, close))
            });
            match substituted {
                Some((argument, close)) => {
                    out.push_str(argument);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// Builds this rule's diagnostic at `span`.
    #[must_use]
    pub fn create_diagnostic(&self, span: Span, arguments: Vec<EcoString>) -> Diagnostic {
        Diagnostic::lint(self.format_message(&arguments), span)
            .with_severity(self.default_severity)
            .with_category(self.category)
            .with_code(self.id, arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE: RuleDescriptor = RuleDescriptor {
        id: "XX0001",
        title: "Example",
        message_format: "Method '{0}' should call '{1}'",
        description: "Example rule.",
        category: DiagnosticCategory::Usage,
        default_severity: Severity::Warning,
        help_url: "https://example.invalid/xx0001",
    };

    #[test]
    fn format_message_fills_placeholders() {
        let message = RULE.format_message(&["B.Dispose()".into(), "base.Dispose()".into()]);
        assert_eq!(message, "Method 'B.Dispose()' should call 'base.Dispose()'");
    }

    #[test]
    fn missing_arguments_are_left_in_place() {
        assert_eq!(RULE.format_message(&["x".into()]), "Method 'x' should call '{1}'");
        let odd = RuleDescriptor {
            message_format: "{a} {0",
            ..RULE
        };
        assert_eq!(odd.format_message(&["x".into()]), "{a} {0");
    }

    #[test]
    fn create_diagnostic_carries_rule_identity() {
        let diagnostic = RULE.create_diagnostic(Span::new(2, 5), vec!["a".into(), "b".into()]);
        assert_eq!(diagnostic.code.as_deref(), Some("XX0001"));
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.category, Some(DiagnosticCategory::Usage));
        assert_eq!(diagnostic.arguments.len(), 2);
        assert_eq!(diagnostic.message, "Method 'a' should call 'b'");
    }
}
