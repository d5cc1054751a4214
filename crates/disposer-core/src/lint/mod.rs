// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lint rules and the entry point that runs them.
//!
//! **DDD Context:** Analysis
//!
//! # Adding a New Rule
//!
//! 1. Create `crates/disposer-core/src/lint/<your_rule>.rs`.
//! 2. Declare `pub(crate) struct YourRule;` implementing [`AnalysisRule`].
//! 3. Add `mod your_rule;` below (keep alphabetical).
//! 4. Push `Box::new(your_rule::YourRule)` into `all_rules()` (keep alphabetical).

mod dispose_base_call;
// ── add new lint modules here (alphabetical) ──────────────────────────────

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ecow::EcoString;
use thiserror::Error;
use tracing::debug;

use crate::analysis::{AnalysisDriver, AnalysisRule};
use crate::semantic_analysis::Compilation;
use crate::source_analysis::{Diagnostic, Severity};

/// Construct the ordered list of all registered rules.
///
/// **To register a new rule:** append `Box::new(your_module::YourRule)` in
/// alphabetical order. This is the only line that needs to change per rule.
#[must_use]
pub fn all_rules() -> Vec<Box<dyn AnalysisRule>> {
    vec![
        Box::new(dispose_base_call::DisposeMethodsShouldCallBaseClassDispose),
        // ── add new rules here (alphabetical) ─────────────────────────────
    ]
}

/// Looks up a registered rule by id (case-insensitive).
#[must_use]
pub fn find_rule(id: &str) -> Option<Box<dyn AnalysisRule>> {
    all_rules()
        .into_iter()
        .find(|rule| rule.descriptor().id.eq_ignore_ascii_case(id))
}

/// Configured level of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleLevel {
    /// The rule does not run.
    Off,
    Hint,
    Lint,
    Warning,
    Error,
}

impl RuleLevel {
    /// The severity diagnostics are reported with; `None` for [`Self::Off`].
    #[must_use]
    pub const fn severity(self) -> Option<Severity> {
        match self {
            Self::Off => None,
            Self::Hint => Some(Severity::Hint),
            Self::Lint => Some(Severity::Lint),
            Self::Warning => Some(Severity::Warning),
            Self::Error => Some(Severity::Error),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Hint => "hint",
            Self::Lint => "lint",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule level that is not one of `off`, `hint`, `lint`, `warning`, `error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rule level `{0}` (expected off, hint, lint, warning or error)")]
pub struct UnknownRuleLevel(pub String);

impl FromStr for RuleLevel {
    type Err = UnknownRuleLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "hint" => Ok(Self::Hint),
            "lint" => Ok(Self::Lint),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(UnknownRuleLevel(s.to_string())),
        }
    }
}

/// Options for [`run_lint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOptions {
    /// Analyze method bodies in parallel.
    pub parallel: bool,
    /// Per-rule level overrides, keyed by rule id.
    pub rule_levels: BTreeMap<EcoString, RuleLevel>,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            rule_levels: BTreeMap::new(),
        }
    }
}

impl LintOptions {
    /// The configured level of `rule_id`, if overridden.
    #[must_use]
    pub fn level(&self, rule_id: &str) -> Option<RuleLevel> {
        self.rule_levels
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(rule_id))
            .map(|(_, level)| *level)
    }
}

/// Runs every enabled rule over `compilation`.
///
/// Diagnostics come back in document order without duplicates, with their
/// severity adjusted to the configured rule level.
#[must_use]
pub fn run_lint(compilation: &Compilation, options: &LintOptions) -> Vec<Diagnostic> {
    let rules = all_rules();
    let enabled: Vec<&dyn AnalysisRule> = rules
        .iter()
        .map(|rule| &**rule)
        .filter(|rule| {
            let id = rule.descriptor().id;
            let off = options.level(id) == Some(RuleLevel::Off);
            if off {
                debug!(rule = id, "rule disabled by configuration");
            }
            !off
        })
        .collect();

    let mut diagnostics = AnalysisDriver::new()
        .with_parallel(options.parallel)
        .run(compilation, &enabled);
    for diagnostic in &mut diagnostics {
        let severity = diagnostic
            .code
            .as_deref()
            .and_then(|code| options.level(code))
            .and_then(RuleLevel::severity);
        if let Some(severity) = severity {
            diagnostic.severity = severity;
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIOLATION: &str = "
        using System;
        class A : IDisposable {
            public void Dispose() { Dispose(true); }
            protected virtual void Dispose(bool disposing) { }
        }
        class B : A {
            protected override void Dispose(bool disposing) { }
        }";

    #[test]
    fn registry_is_sorted_and_unique() {
        let ids: Vec<&str> = all_rules().iter().map(|rule| rule.descriptor().id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn find_rule_is_case_insensitive() {
        assert!(find_rule("CA2215").is_some());
        assert!(find_rule("ca2215").is_some());
        assert!(find_rule("CA9999").is_none());
    }

    #[test]
    fn rule_levels_parse() {
        assert_eq!("warning".parse(), Ok(RuleLevel::Warning));
        assert_eq!("OFF".parse(), Ok(RuleLevel::Off));
        assert_eq!(
            "loud".parse::<RuleLevel>().map_err(|e| e.to_string()),
            Err("unknown rule level `loud` (expected off, hint, lint, warning or error)".to_string())
        );
        assert_eq!(RuleLevel::Off.severity(), None);
        assert_eq!(RuleLevel::Error.severity(), Some(Severity::Error));
    }

    #[test]
    fn default_level_is_lint() {
        let compilation = Compilation::from_source(VIOLATION);
        let diagnostics = run_lint(&compilation, &LintOptions::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Lint);
    }

    #[test]
    fn configured_level_overrides_severity() {
        let compilation = Compilation::from_source(VIOLATION);
        let options = LintOptions {
            rule_levels: BTreeMap::from([("ca2215".into(), RuleLevel::Error)]),
            ..LintOptions::default()
        };
        let diagnostics = run_lint(&compilation, &options);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn off_disables_the_rule() {
        let compilation = Compilation::from_source(VIOLATION);
        let options = LintOptions {
            parallel: false,
            rule_levels: BTreeMap::from([("CA2215".into(), RuleLevel::Off)]),
        };
        assert!(run_lint(&compilation, &options).is_empty());
    }
}
