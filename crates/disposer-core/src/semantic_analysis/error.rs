// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis error types.
//!
//! Binding never stops at the first problem: each error is recorded as a
//! [`SemanticError`] and converted into an error [`Diagnostic`] in the
//! [`Binding`](DiagnosticCategory::Binding) category.

use ecow::EcoString;
use thiserror::Error;

use crate::source_analysis::{Diagnostic, DiagnosticCategory, FileId, Span};

/// A semantic error discovered during declaration or binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub span: Span,
}

/// Types of semantic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    #[error("the type `{name}` could not be found")]
    UnknownType { name: EcoString },

    #[error("the namespace already contains a definition for `{name}`")]
    DuplicateType { name: EcoString },

    #[error("circular base type dependency involving `{name}`")]
    CircularBase { name: EcoString },

    #[error("`{name}` cannot derive from sealed type `{base}`")]
    SealedBase { name: EcoString, base: EcoString },

    #[error("base class `{base}` must come before any interfaces")]
    BaseClassNotFirst { base: EcoString },

    #[error("`{name}` is not an interface")]
    NotAnInterface { name: EcoString },

    #[error("type `{type_name}` already defines a member called `{name}` with the same parameter types")]
    DuplicateMember { type_name: EcoString, name: EcoString },

    #[error("`{name}` cannot declare a body because it is marked abstract")]
    AbstractWithBody { name: EcoString },

    #[error("`{name}` must declare a body because it is not marked abstract")]
    MissingBody { name: EcoString },

    #[error("`{name}` is abstract but it is contained in non-abstract type `{type_name}`")]
    AbstractInConcreteType { name: EcoString, type_name: EcoString },

    #[error("`{name}`: no suitable method found to override")]
    NothingToOverride { name: EcoString },

    #[error("`{name}`: cannot override `{base}` because it is not marked virtual, abstract, or override")]
    NotOverridable { name: EcoString, base: EcoString },

    #[error("`{name}`: cannot override inherited member `{base}` because it is sealed")]
    SealedOverride { name: EcoString, base: EcoString },

    #[error("the name `{name}` does not exist in the current context")]
    UndefinedName { name: EcoString },

    #[error("`{type_name}` does not contain a method `{name}` that takes {arity} argument(s)")]
    MethodNotFound {
        type_name: EcoString,
        name: EcoString,
        arity: usize,
    },

    #[error("`{type_name}` does not contain a field `{name}`")]
    FieldNotFound { type_name: EcoString, name: EcoString },

    #[error("cannot call abstract base member `{name}`")]
    AbstractBaseCall { name: EcoString },

    #[error("keyword `{keyword}` is not valid in this context")]
    InvalidKeywordUse { keyword: &'static str },

    #[error("`{type_name}` has no base class")]
    NoBaseClass { type_name: EcoString },

    #[error("cannot create an instance of abstract type or interface `{name}`")]
    AbstractInstantiation { name: EcoString },

    #[error("the left-hand side of an assignment must be a variable or field")]
    InvalidAssignmentTarget,

    #[error("implicitly-typed variable `{name}` must be initialized")]
    UninitializedVar { name: EcoString },

    #[error("expression is not invocable")]
    NotInvocable,
}

impl SemanticError {
    /// Create a new semantic error.
    #[must_use]
    pub fn new(kind: SemanticErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Converts into an error diagnostic located in `file`.
    #[must_use]
    pub fn into_diagnostic(self, file: FileId) -> Diagnostic {
        Diagnostic::error(self.to_string(), self.span)
            .with_file(file)
            .with_category(DiagnosticCategory::Binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_symbols() {
        let error = SemanticError::new(
            SemanticErrorKind::NothingToOverride {
                name: "B.Dispose(bool)".into(),
            },
            Span::new(3, 9),
        );
        assert_eq!(
            error.to_string(),
            "`B.Dispose(bool)`: no suitable method found to override"
        );
    }

    #[test]
    fn into_diagnostic_keeps_location() {
        let file = FileId::from_index(2);
        let diagnostic = SemanticError::new(SemanticErrorKind::NotInvocable, Span::new(1, 4))
            .into_diagnostic(file);
        assert_eq!(diagnostic.file, Some(file));
        assert_eq!(diagnostic.span, Span::new(1, 4));
        assert_eq!(diagnostic.category, Some(DiagnosticCategory::Binding));
    }
}
