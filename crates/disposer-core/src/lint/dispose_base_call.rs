// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lint CA2215: dispose methods should call the base class dispose.
//!
//! An override of a concrete `Dispose()` or `Dispose(bool)` owns the
//! propagation of cleanup to its base type's state, so it must call the
//! base implementation through `base`:
//!
//! ```text
//! // Bad: A's resources are never released
//! class B : A {
//!     protected override void Dispose(bool disposing) { stream.Dispose(); }
//! }
//!
//! // Good
//! class B : A {
//!     protected override void Dispose(bool disposing) {
//!         stream.Dispose();
//!         base.Dispose(disposing);
//!     }
//! }
//! ```
//!
//! Overrides of abstract methods have nothing to call and are never flagged.
//! `Close()` overrides are excluded. A qualifying call anywhere in the body
//! satisfies the rule; control-flow paths are not checked.

use std::ops::ControlFlow;

use ecow::EcoString;
use tracing::{debug, trace};

use crate::analysis::{AnalysisRule, CompilationAnalyzer, MethodBodyAnalyzer, RuleDescriptor};
use crate::semantic_analysis::{
    Compilation, DisposeAnalysisHelper, DisposeMethodKind, InvocationOperation, MethodId,
    MethodSymbol,
};
use crate::source_analysis::{Diagnostic, DiagnosticCategory, Severity};

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: "CA2215",
    title: "Dispose methods should call base class dispose",
    message_format: "Ensure that method '{0}' calls '{1}' in all possible control flow paths",
    description: "A type that implements System.IDisposable inherits from a type that also \
                  implements IDisposable. The Dispose method of the inheriting type does not \
                  call the Dispose method of the parent type. To fix a violation of this rule, \
                  call base.Dispose in your Dispose method.",
    category: DiagnosticCategory::Usage,
    default_severity: Severity::Lint,
    help_url: "https://learn.microsoft.com/dotnet/fundamentals/code-analysis/quality-rules/ca2215",
};

/// Whether overrides of a convention are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanPolicy {
    Scan,
    Skip,
}

/// `Close()` is skipped: closing commonly releases only the derived state.
const POLICY: &[(DisposeMethodKind, ScanPolicy)] = &[
    (DisposeMethodKind::Dispose, ScanPolicy::Scan),
    (DisposeMethodKind::DisposeBool, ScanPolicy::Scan),
    (DisposeMethodKind::Close, ScanPolicy::Skip),
    (DisposeMethodKind::Other, ScanPolicy::Skip),
    (DisposeMethodKind::NotDisposeMethod, ScanPolicy::Skip),
];

fn policy_for(kind: DisposeMethodKind) -> ScanPolicy {
    POLICY
        .iter()
        .find(|(candidate, _)| *candidate == kind)
        .map_or(ScanPolicy::Skip, |(_, policy)| *policy)
}

/// Rule that flags dispose overrides that never call the base dispose.
pub(crate) struct DisposeMethodsShouldCallBaseClassDispose;

impl AnalysisRule for DisposeMethodsShouldCallBaseClassDispose {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DESCRIPTOR
    }

    fn compilation_start<'c>(
        &self,
        compilation: &'c Compilation,
    ) -> Option<Box<dyn CompilationAnalyzer + 'c>> {
        let Some(helper) = DisposeAnalysisHelper::try_new(compilation) else {
            debug!(rule = DESCRIPTOR.id, "System.IDisposable is not available");
            return None;
        };
        Some(Box::new(DisposeBaseCallAnalyzer {
            compilation,
            helper,
        }))
    }
}

struct DisposeBaseCallAnalyzer<'c> {
    compilation: &'c Compilation,
    helper: DisposeAnalysisHelper<'c>,
}

impl DisposeBaseCallAnalyzer<'_> {
    /// The convention `method` follows as an override of a concrete base
    /// method of the same convention, or `NotDisposeMethod`.
    fn classify(&self, method: &MethodSymbol) -> DisposeMethodKind {
        if !method.is_override() {
            return DisposeMethodKind::NotDisposeMethod;
        }
        let Some(overridden) = method.overridden_method.map(|id| self.compilation.method(id)) else {
            return DisposeMethodKind::NotDisposeMethod;
        };
        if overridden.is_abstract() {
            return DisposeMethodKind::NotDisposeMethod;
        }
        let kind = self.helper.dispose_method_kind(method);
        if self.helper.dispose_method_kind(overridden) != kind {
            return DisposeMethodKind::NotDisposeMethod;
        }
        kind
    }
}

impl CompilationAnalyzer for DisposeBaseCallAnalyzer<'_> {
    fn method_body_start(&self, method: &MethodSymbol) -> Option<Box<dyn MethodBodyAnalyzer + '_>> {
        let method = self.compilation.method(method.id);
        let kind = self.classify(method);
        if policy_for(kind) == ScanPolicy::Skip {
            trace!(method = %method.display_name, kind = kind.as_str(), "not checked");
            return None;
        }
        let expected = method.overridden_method?;
        Some(Box::new(BaseCallScanner {
            compilation: self.compilation,
            helper: self.helper,
            method,
            kind,
            expected,
            scan: BaseCallScan::Unsatisfied,
        }))
    }
}

/// Result of scanning one body. Only ever moves to `Satisfied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BaseCallScan {
    Unsatisfied,
    Satisfied,
}

struct BaseCallScanner<'c> {
    compilation: &'c Compilation,
    helper: DisposeAnalysisHelper<'c>,
    method: &'c MethodSymbol,
    kind: DisposeMethodKind,
    /// The overridden method; the only acceptable call target.
    expected: MethodId,
    scan: BaseCallScan,
}

impl BaseCallScanner<'_> {
    fn is_base_dispose_call(&self, invocation: &InvocationOperation) -> bool {
        if invocation.target() != Some(self.expected) || !invocation.is_base_call() {
            return false;
        }
        let target_kind = self
            .helper
            .dispose_method_kind(self.compilation.method(self.expected));
        debug_assert_eq!(
            target_kind, self.kind,
            "`{}` was classified as {} but calls a base method classified as {}",
            self.method.display_name,
            self.kind.as_str(),
            target_kind.as_str(),
        );
        target_kind == self.kind
    }

    /// `{1}` of the message: the call the override should contain.
    fn expected_call(&self) -> EcoString {
        let spelling = self.method.language.spelling();
        match self.kind {
            DisposeMethodKind::DisposeBool => {
                format!("{}.Dispose({})", spelling.base_keyword, spelling.boolean_type)
            }
            _ => format!("{}.{}()", spelling.base_keyword, self.method.name),
        }
        .into()
    }
}

impl MethodBodyAnalyzer for BaseCallScanner<'_> {
    fn invocation(&mut self, invocation: &InvocationOperation) -> ControlFlow<()> {
        if self.scan == BaseCallScan::Satisfied {
            return ControlFlow::Break(());
        }
        if self.is_base_dispose_call(invocation) {
            trace!(method = %self.method.display_name, "base dispose call found");
            self.scan = BaseCallScan::Satisfied;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn body_end(self: Box<Self>, diagnostics: &mut Vec<Diagnostic>) {
        if self.scan == BaseCallScan::Satisfied {
            return;
        }
        let location = self.method.location;
        diagnostics.push(
            DESCRIPTOR
                .create_diagnostic(
                    location.span,
                    vec![self.method.display_name.clone(), self.expected_call()],
                )
                .with_file(location.file),
        );
    }
}
