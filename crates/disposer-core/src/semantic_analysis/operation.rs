// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Bound operation trees.
//!
//! **DDD Context:** Semantic Analysis
//!
//! Binding lowers each method body from syntax into an [`Operation`] tree in
//! which every name has been resolved: invocations know their target
//! [`MethodId`] and how their receiver was written. Analysis rules walk these
//! trees with [`crate::operation_walker`].

use ecow::EcoString;

use super::{MethodId, TypeId, TypeRef};
use crate::ast::Literal;
use crate::source_analysis::Span;

/// How an instance reference was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceReferenceKind {
    /// Explicit `this`.
    This,
    /// The receiver of an unqualified member access (`Dispose()`).
    ImplicitThis,
    /// `base`.
    Base,
}

/// The receiver of an invocation, as seen by analysis rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    /// `this.M()` or `M()` on an instance method.
    This,
    /// `base.M()`: non-virtual dispatch to the base implementation.
    Base,
    /// `expr.M()` on any other instance.
    Instance,
    /// `Type.M()` or `M()` on a static method.
    Static,
    /// The receiver could not be bound.
    Unknown,
}

/// A call in a method body.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationOperation {
    /// The resolved target, if any.
    pub target: Option<MethodId>,
    /// How the receiver was written.
    pub receiver: ReceiverKind,
    /// The receiver operation; `None` for static and unresolved calls.
    pub instance: Option<Box<Operation>>,
    pub arguments: Vec<Operation>,
    pub span: Span,
}

impl InvocationOperation {
    /// The method this invocation binds to, if it could be resolved.
    #[must_use]
    pub fn target(&self) -> Option<MethodId> {
        self.target
    }

    #[must_use]
    pub fn receiver_kind(&self) -> ReceiverKind {
        self.receiver
    }

    /// Returns `true` for `base.M(...)` calls.
    #[must_use]
    pub fn is_base_call(&self) -> bool {
        self.receiver == ReceiverKind::Base
    }
}

/// A bound operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Block {
        operations: Vec<Operation>,
        span: Span,
    },
    ExpressionStatement {
        operation: Box<Operation>,
        span: Span,
    },
    VariableDeclaration {
        name: EcoString,
        ty: TypeRef,
        initializer: Option<Box<Operation>>,
        span: Span,
    },
    /// `if`/`else`
    Conditional {
        condition: Box<Operation>,
        when_true: Box<Operation>,
        when_false: Option<Box<Operation>>,
        span: Span,
    },
    /// `while`
    Loop {
        condition: Box<Operation>,
        body: Box<Operation>,
        span: Span,
    },
    TryFinally {
        body: Box<Operation>,
        finally: Option<Box<Operation>>,
        span: Span,
    },
    Return {
        value: Option<Box<Operation>>,
        span: Span,
    },
    Invocation(InvocationOperation),
    InstanceReference {
        kind: InstanceReferenceKind,
        span: Span,
    },
    LocalReference {
        name: EcoString,
        ty: TypeRef,
        span: Span,
    },
    ParameterReference {
        name: EcoString,
        ty: TypeRef,
        span: Span,
    },
    FieldReference {
        /// `None` for static fields.
        instance: Option<Box<Operation>>,
        name: EcoString,
        ty: TypeRef,
        span: Span,
    },
    /// A type name used as the receiver of a static call.
    TypeReference {
        ty: TypeId,
        span: Span,
    },
    Literal {
        value: Literal,
        span: Span,
    },
    Unary {
        operator: EcoString,
        operand: Box<Operation>,
        span: Span,
    },
    Binary {
        operator: EcoString,
        left: Box<Operation>,
        right: Box<Operation>,
        span: Span,
    },
    Assignment {
        target: Box<Operation>,
        value: Box<Operation>,
        span: Span,
    },
    ObjectCreation {
        ty: TypeRef,
        arguments: Vec<Operation>,
        span: Span,
    },
    Empty(Span),
    /// Something that failed to bind; keeps whatever children did bind.
    Invalid {
        children: Vec<Operation>,
        span: Span,
    },
}

impl Operation {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Invocation(invocation) => invocation.span,
            Self::Empty(span)
            | Self::Block { span, .. }
            | Self::ExpressionStatement { span, .. }
            | Self::VariableDeclaration { span, .. }
            | Self::Conditional { span, .. }
            | Self::Loop { span, .. }
            | Self::TryFinally { span, .. }
            | Self::Return { span, .. }
            | Self::InstanceReference { span, .. }
            | Self::LocalReference { span, .. }
            | Self::ParameterReference { span, .. }
            | Self::FieldReference { span, .. }
            | Self::TypeReference { span, .. }
            | Self::Literal { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Assignment { span, .. }
            | Self::ObjectCreation { span, .. }
            | Self::Invalid { span, .. } => *span,
        }
    }

    /// Returns the invocation, if this is one.
    #[must_use]
    pub fn as_invocation(&self) -> Option<&InvocationOperation> {
        match self {
            Self::Invocation(invocation) => Some(invocation),
            _ => None,
        }
    }

    /// Returns `true` for references that may be assigned to.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Self::LocalReference { .. } | Self::ParameterReference { .. } | Self::FieldReference { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(receiver: ReceiverKind) -> InvocationOperation {
        InvocationOperation {
            target: Some(MethodId::from_index(0)),
            receiver,
            instance: None,
            arguments: Vec::new(),
            span: Span::new(0, 4),
        }
    }

    #[test]
    fn base_call_detection() {
        assert!(call(ReceiverKind::Base).is_base_call());
        assert!(!call(ReceiverKind::This).is_base_call());
        assert_eq!(call(ReceiverKind::Static).receiver_kind(), ReceiverKind::Static);
    }

    #[test]
    fn as_invocation_and_span() {
        let operation = Operation::Invocation(call(ReceiverKind::Base));
        assert!(operation.as_invocation().is_some());
        assert_eq!(operation.span(), Span::new(0, 4));
        assert!(Operation::Empty(Span::new(1, 2)).as_invocation().is_none());
    }

    #[test]
    fn assignable_references() {
        let local = Operation::LocalReference {
            name: "x".into(),
            ty: TypeRef::Int,
            span: Span::new(0, 1),
        };
        assert!(local.is_assignable());
        assert!(!Operation::Empty(Span::new(0, 0)).is_assignable());
    }
}
