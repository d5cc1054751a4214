// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Analysis engine: the hooks rules implement and the driver that runs them.
//!
//! **DDD Context:** Analysis
//!
//! A rule plugs in at three levels, mirroring the lifetime of the state it
//! needs:
//!
//! 1. [`AnalysisRule::compilation_start`] runs once per compilation and may
//!    decline the whole compilation (for example when required metadata is
//!    missing).
//! 2. [`CompilationAnalyzer::method_body_start`] runs once per method body
//!    and may decline that body.
//! 3. A [`MethodBodyAnalyzer`] receives every invocation of the body in
//!    document order, then [`MethodBodyAnalyzer::body_end`] exactly once.
//!
//! Body analyzers own their per-body state; the driver never shares one
//! between bodies, so bodies can be analyzed in parallel.

use std::ops::ControlFlow;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::operation_walker::for_each_invocation;
use crate::semantic_analysis::{Compilation, InvocationOperation, MethodSymbol, Operation};
use crate::source_analysis::{Diagnostic, sort_and_dedup};

mod descriptor;

pub use descriptor::RuleDescriptor;

/// An analysis rule.
pub trait AnalysisRule: Send + Sync {
    /// Static identity and documentation of the rule.
    fn descriptor(&self) -> &'static RuleDescriptor;

    /// Prepares the rule for `compilation`. Returning `None` declines the
    /// whole compilation.
    fn compilation_start<'c>(
        &self,
        compilation: &'c Compilation,
    ) -> Option<Box<dyn CompilationAnalyzer + 'c>>;
}

/// Per-compilation state of a rule. Shared by every body being analyzed.
pub trait CompilationAnalyzer: Send + Sync {
    /// Starts analysis of `method`'s body. Returning `None` skips every
    /// further hook for that body.
    fn method_body_start(&self, method: &MethodSymbol) -> Option<Box<dyn MethodBodyAnalyzer + '_>>;
}

/// Per-body state of a rule.
pub trait MethodBodyAnalyzer {
    /// Called for each invocation in the body, in document order.
    /// `Break` stops delivery for this body.
    fn invocation(&mut self, invocation: &InvocationOperation) -> ControlFlow<()>;

    /// Called once after the last invocation.
    fn body_end(self: Box<Self>, diagnostics: &mut Vec<Diagnostic>);
}

/// Runs rules over every method body of a compilation.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisDriver {
    parallel: bool,
}

impl Default for AnalysisDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisDriver {
    /// A driver that analyzes bodies in parallel.
    #[must_use]
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enables or disables parallel body analysis.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Runs `rules` and returns their diagnostics in document order,
    /// without duplicates.
    #[must_use]
    pub fn run(&self, compilation: &Compilation, rules: &[&dyn AnalysisRule]) -> Vec<Diagnostic> {
        let analyzers: Vec<Box<dyn CompilationAnalyzer + '_>> = rules
            .iter()
            .filter_map(|rule| {
                let analyzer = rule.compilation_start(compilation);
                if analyzer.is_none() {
                    debug!(rule = rule.descriptor().id, "rule declined compilation");
                }
                analyzer
            })
            .collect();
        if analyzers.is_empty() {
            return Vec::new();
        }

        let bodies: Vec<(&MethodSymbol, &Operation)> = compilation
            .methods()
            .iter()
            .filter(|method| !method.location.file.is_core_library())
            .filter_map(|method| compilation.method_body(method.id).map(|body| (method, body)))
            .collect();
        debug!(
            rules = analyzers.len(),
            bodies = bodies.len(),
            parallel = self.parallel,
            "analyzing method bodies"
        );

        let analyze = |(method, body): &(&MethodSymbol, &Operation)| analyze_body(&analyzers, method, body);
        let mut diagnostics: Vec<Diagnostic> = if self.parallel {
            bodies.par_iter().flat_map_iter(analyze).collect()
        } else {
            bodies.iter().flat_map(analyze).collect()
        };
        sort_and_dedup(&mut diagnostics);
        diagnostics
    }
}

fn analyze_body(
    analyzers: &[Box<dyn CompilationAnalyzer + '_>],
    method: &MethodSymbol,
    body: &Operation,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for analyzer in analyzers {
        let Some(mut body_analyzer) = analyzer.method_body_start(method) else {
            continue;
        };
        trace!(method = %method.display_name, "analyzing body");
        let _ = for_each_invocation(body, |invocation| body_analyzer.invocation(invocation));
        body_analyzer.body_end(&mut diagnostics);
    }
    for diagnostic in &mut diagnostics {
        if diagnostic.file.is_none() {
            diagnostic.file = Some(method.location.file);
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{DiagnosticCategory, FileId, Severity, Span};

    static COUNT_CALLS: RuleDescriptor = RuleDescriptor {
        id: "TEST01",
        title: "Count calls",
        message_format: "{0} makes {1} call(s)",
        description: "Reports the number of calls seen in each body.",
        category: DiagnosticCategory::Usage,
        default_severity: Severity::Hint,
        help_url: "https://example.invalid/test01",
    };

    /// Reports how many invocations each body delivered, stopping after
    /// `limit`.
    struct CountCalls {
        limit: usize,
        decline_compilation: bool,
    }

    struct CountCallsAnalyzer<'c> {
        compilation: &'c Compilation,
        limit: usize,
    }

    struct CountCallsBody<'a> {
        name: &'a str,
        span: Span,
        seen: usize,
        limit: usize,
    }

    impl AnalysisRule for CountCalls {
        fn descriptor(&self) -> &'static RuleDescriptor {
            &COUNT_CALLS
        }

        fn compilation_start<'c>(
            &self,
            compilation: &'c Compilation,
        ) -> Option<Box<dyn CompilationAnalyzer + 'c>> {
            if self.decline_compilation {
                return None;
            }
            Some(Box::new(CountCallsAnalyzer {
                compilation,
                limit: self.limit,
            }))
        }
    }

    impl CompilationAnalyzer for CountCallsAnalyzer<'_> {
        fn method_body_start(&self, method: &MethodSymbol) -> Option<Box<dyn MethodBodyAnalyzer + '_>> {
            let method = self.compilation.method(method.id);
            if method.name == "Skipped" {
                return None;
            }
            Some(Box::new(CountCallsBody {
                name: &method.display_name,
                span: method.location.span,
                seen: 0,
                limit: self.limit,
            }))
        }
    }

    impl MethodBodyAnalyzer for CountCallsBody<'_> {
        fn invocation(&mut self, _invocation: &InvocationOperation) -> ControlFlow<()> {
            self.seen += 1;
            if self.seen >= self.limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }

        fn body_end(self: Box<Self>, diagnostics: &mut Vec<Diagnostic>) {
            diagnostics.push(
                COUNT_CALLS.create_diagnostic(self.span, vec![self.name.into(), self.seen.to_string().into()]),
            );
        }
    }

    const SOURCE: &str = "
        class A {
            void F() { G(); G(); G(); }
            void G() { }
            void Skipped() { G(); }
        }
        abstract class B { public abstract void H(); }";

    fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
        diagnostics.iter().map(|d| d.message.to_string()).collect()
    }

    #[test]
    fn hooks_fire_per_body_in_document_order() {
        let compilation = Compilation::from_source(SOURCE);
        let rule = CountCalls {
            limit: usize::MAX,
            decline_compilation: false,
        };
        let diagnostics = AnalysisDriver::new().run(&compilation, &[&rule]);
        assert_eq!(messages(&diagnostics), ["A.F() makes 3 call(s)", "A.G() makes 0 call(s)"]);
        assert!(diagnostics.iter().all(|d| d.file == Some(FileId::from_index(0))));
        assert!(diagnostics.iter().all(|d| d.severity == Severity::Hint));
    }

    #[test]
    fn break_stops_invocation_delivery() {
        let compilation = Compilation::from_source(SOURCE);
        let rule = CountCalls {
            limit: 2,
            decline_compilation: false,
        };
        let diagnostics = AnalysisDriver::new().with_parallel(false).run(&compilation, &[&rule]);
        assert_eq!(messages(&diagnostics)[0], "A.F() makes 2 call(s)");
    }

    #[test]
    fn declined_compilation_produces_nothing() {
        let compilation = Compilation::from_source(SOURCE);
        let rule = CountCalls {
            limit: 1,
            decline_compilation: true,
        };
        assert!(AnalysisDriver::new().run(&compilation, &[&rule]).is_empty());
    }

    #[test]
    fn parallel_matches_sequential() {
        let compilation = Compilation::from_source(SOURCE);
        let rule = CountCalls {
            limit: usize::MAX,
            decline_compilation: false,
        };
        let parallel = AnalysisDriver::new().run(&compilation, &[&rule]);
        let sequential = AnalysisDriver::new().with_parallel(false).run(&compilation, &[&rule]);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn core_library_bodies_are_not_analyzed() {
        let compilation = Compilation::from_source("");
        let rule = CountCalls {
            limit: usize::MAX,
            decline_compilation: false,
        };
        assert!(compilation.methods().iter().any(|m| m.location.file.is_core_library()));
        assert!(AnalysisDriver::new().run(&compilation, &[&rule]).is_empty());
    }
}
