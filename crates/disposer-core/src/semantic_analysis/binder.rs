// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Method-body binding.
//!
//! **DDD Context:** Semantic Analysis
//!
//! This module implements the `Binder` domain service. For one method body
//! the binder:
//! - manages the local scope stack (parameters, then nested blocks),
//! - resolves simple names to locals, parameters, fields and types,
//! - binds invocations to their target [`MethodId`] and receiver kind,
//! - lowers statements and expressions into an [`Operation`] tree.
//!
//! Name lookup order for a simple name is local, parameter, field, type.
//! `base.M(...)` binds to the nearest implementation of `M` above the
//! containing type; every other call form binds through ordinary member
//! lookup, which lands on the original `virtual` declaration.

use super::class_hierarchy::{ClassHierarchy, MemberLookup, TypeContext};
use super::error::{SemanticError, SemanticErrorKind};
use super::operation::{InstanceReferenceKind, InvocationOperation, Operation, ReceiverKind};
use super::scope::{BindingKind, Scope};
use super::symbols::{MethodId, MethodSymbol, TypeId, TypeRef};
use crate::ast::{Block, Expression, Identifier, Literal, Statement, TypeSyntax};
use crate::source_analysis::{Keyword, Span};

/// Binds the body of `method` and returns its operation tree together with
/// every error found.
pub(crate) fn bind_method_body(
    hierarchy: &ClassHierarchy,
    method: MethodId,
    body: &Block,
) -> (Operation, Vec<SemanticError>) {
    let mut binder = Binder::new(hierarchy, hierarchy.method(method));
    let operation = binder.bind_block(body);
    (operation, binder.errors)
}

/// Method-body binding domain service.
///
/// **DDD Context:** Semantic Analysis - Domain Service
struct Binder<'h> {
    hierarchy: &'h ClassHierarchy,
    method: &'h MethodSymbol,
    context: TypeContext<'h>,
    scope: Scope,
    errors: Vec<SemanticError>,
}

impl<'h> Binder<'h> {
    fn new(hierarchy: &'h ClassHierarchy, method: &'h MethodSymbol) -> Self {
        let mut scope = Scope::new();
        for parameter in &method.parameters {
            scope.define(&parameter.name, parameter.span, BindingKind::Parameter, parameter.ty);
        }
        Self {
            hierarchy,
            method,
            context: hierarchy.context(method.containing_type),
            scope,
            errors: Vec::new(),
        }
    }

    fn error(&mut self, kind: SemanticErrorKind, span: Span) {
        self.errors.push(SemanticError::new(kind, span));
    }

    fn containing_type(&self) -> TypeId {
        self.method.containing_type
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn bind_block(&mut self, block: &Block) -> Operation {
        self.scope.push();
        let operations = block
            .statements
            .iter()
            .map(|statement| self.bind_statement(statement))
            .collect();
        self.scope.pop();
        Operation::Block {
            operations,
            span: block.span,
        }
    }

    /// Binds the body of an `if`/`while`; a declaration there is scoped to it.
    fn bind_embedded(&mut self, statement: &Statement) -> Operation {
        self.scope.push();
        let operation = self.bind_statement(statement);
        self.scope.pop();
        operation
    }

    fn bind_statement(&mut self, statement: &Statement) -> Operation {
        match statement {
            Statement::Block(block) => self.bind_block(block),
            Statement::Expression { expression, span } => Operation::ExpressionStatement {
                operation: Box::new(self.bind_expression(expression)),
                span: *span,
            },
            Statement::LocalDeclaration {
                ty,
                name,
                initializer,
                span,
            } => self.bind_local_declaration(ty.as_ref(), name, initializer.as_ref(), *span),
            Statement::If {
                condition,
                then_branch,
                else_branch,
                span,
            } => Operation::Conditional {
                condition: Box::new(self.bind_expression(condition)),
                when_true: Box::new(self.bind_embedded(then_branch)),
                when_false: else_branch
                    .as_ref()
                    .map(|branch| Box::new(self.bind_embedded(branch))),
                span: *span,
            },
            Statement::While {
                condition,
                body,
                span,
            } => Operation::Loop {
                condition: Box::new(self.bind_expression(condition)),
                body: Box::new(self.bind_embedded(body)),
                span: *span,
            },
            Statement::Try {
                body,
                finally,
                span,
            } => Operation::TryFinally {
                body: Box::new(self.bind_block(body)),
                finally: finally.as_ref().map(|block| Box::new(self.bind_block(block))),
                span: *span,
            },
            Statement::Return { value, span } => Operation::Return {
                value: value
                    .as_ref()
                    .map(|value| Box::new(self.bind_expression(value))),
                span: *span,
            },
            Statement::Empty(span) => Operation::Empty(*span),
            Statement::Error { span } => Operation::Invalid {
                children: Vec::new(),
                span: *span,
            },
        }
    }

    fn bind_local_declaration(
        &mut self,
        ty: Option<&TypeSyntax>,
        name: &Identifier,
        initializer: Option<&Expression>,
        span: Span,
    ) -> Operation {
        let initializer = initializer.map(|value| Box::new(self.bind_expression(value)));
        let ty = match (ty, &initializer) {
            (Some(syntax), _) => match self.hierarchy.resolve_type_syntax(syntax, self.context) {
                Ok(ty) => ty,
                Err(error) => {
                    self.errors.push(error);
                    TypeRef::Error
                }
            },
            (None, Some(value)) => self.type_of(value),
            (None, None) => {
                self.error(
                    SemanticErrorKind::UninitializedVar {
                        name: name.name.clone(),
                    },
                    name.span,
                );
                TypeRef::Error
            }
        };
        self.scope.define(&name.name, name.span, BindingKind::Local, ty);
        Operation::VariableDeclaration {
            name: name.name.clone(),
            ty,
            initializer,
            span,
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn bind_expression(&mut self, expression: &Expression) -> Operation {
        crate::maybe_grow_stack(|| self.bind_expression_inner(expression))
    }

    fn bind_expression_inner(&mut self, expression: &Expression) -> Operation {
        match expression {
            Expression::Literal(value, span) => Operation::Literal {
                value: value.clone(),
                span: *span,
            },
            Expression::Identifier(identifier) => self.bind_name(identifier),
            Expression::This(span) => self.bind_this(*span),
            Expression::Base(span) => {
                self.error(SemanticErrorKind::InvalidKeywordUse { keyword: "base" }, *span);
                invalid(Vec::new(), *span)
            }
            Expression::MemberAccess {
                receiver,
                member,
                span,
            } => self.bind_field_access(receiver, member, *span),
            Expression::Invocation {
                callee,
                arguments,
                span,
            } => self.bind_invocation(callee, arguments, *span),
            Expression::ObjectCreation {
                ty,
                arguments,
                span,
            } => self.bind_object_creation(ty, arguments, *span),
            Expression::Unary {
                operator,
                operand,
                span,
            } => Operation::Unary {
                operator: operator.clone(),
                operand: Box::new(self.bind_expression(operand)),
                span: *span,
            },
            Expression::Binary {
                operator,
                left,
                right,
                span,
            } => Operation::Binary {
                operator: operator.clone(),
                left: Box::new(self.bind_expression(left)),
                right: Box::new(self.bind_expression(right)),
                span: *span,
            },
            Expression::Assignment {
                target,
                value,
                span,
            } => {
                let target = self.bind_expression(target);
                let value = self.bind_expression(value);
                if !target.is_assignable() && !matches!(target, Operation::Invalid { .. }) {
                    self.error(SemanticErrorKind::InvalidAssignmentTarget, target.span());
                }
                Operation::Assignment {
                    target: Box::new(target),
                    value: Box::new(value),
                    span: *span,
                }
            }
            Expression::Parenthesized { expression, .. } => self.bind_expression(expression),
            Expression::Error { span } => invalid(Vec::new(), *span),
        }
    }

    fn bind_this(&mut self, span: Span) -> Operation {
        if self.method.is_static() {
            self.error(SemanticErrorKind::InvalidKeywordUse { keyword: "this" }, span);
            return invalid(Vec::new(), span);
        }
        Operation::InstanceReference {
            kind: InstanceReferenceKind::This,
            span,
        }
    }

    /// Resolves a simple name: local, parameter, field, then type.
    fn bind_name(&mut self, identifier: &Identifier) -> Operation {
        let span = identifier.span;
        if let Some(binding) = self.scope.lookup(&identifier.name) {
            let (name, ty) = (binding.name.clone(), binding.ty);
            return match binding.kind {
                BindingKind::Local => Operation::LocalReference { name, ty, span },
                BindingKind::Parameter => Operation::ParameterReference { name, ty, span },
            };
        }
        if let Some(field) = self.hierarchy.find_field(self.containing_type(), &identifier.name) {
            let instance = (!field.is_static).then(|| {
                Box::new(Operation::InstanceReference {
                    kind: InstanceReferenceKind::ImplicitThis,
                    span,
                })
            });
            return Operation::FieldReference {
                instance,
                name: field.name.clone(),
                ty: field.ty,
                span,
            };
        }
        if let Some(ty) = self.hierarchy.resolve_type_name(&identifier.name, self.context) {
            return Operation::TypeReference { ty, span };
        }
        // `string.Empty` and friends: a predefined type used as a receiver.
        if Keyword::from_text(&identifier.name).is_some_and(Keyword::is_predefined_type) {
            return match (identifier.name.as_str(), self.hierarchy.object_type()) {
                ("object", Some(ty)) => Operation::TypeReference { ty, span },
                _ => invalid(Vec::new(), span),
            };
        }
        self.error(
            SemanticErrorKind::UndefinedName {
                name: identifier.name.clone(),
            },
            span,
        );
        invalid(Vec::new(), span)
    }

    /// `receiver.member` used as a value.
    fn bind_field_access(&mut self, receiver: &Expression, member: &Identifier, span: Span) -> Operation {
        let (receiver, owner) = match receiver {
            Expression::Base(base_span) => {
                let base = self.hierarchy.type_symbol(self.containing_type()).base_class;
                (
                    Operation::InstanceReference {
                        kind: InstanceReferenceKind::Base,
                        span: *base_span,
                    },
                    base,
                )
            }
            _ => {
                let receiver = self.bind_expression(receiver);
                let owner = match &receiver {
                    Operation::TypeReference { ty, .. } => Some(*ty),
                    other => self.type_of(other).type_id(),
                };
                (receiver, owner)
            }
        };
        let Some(owner) = owner else {
            return invalid(vec![receiver], span);
        };
        let Some(field) = self.hierarchy.find_field(owner, &member.name) else {
            self.error(
                SemanticErrorKind::FieldNotFound {
                    type_name: self.hierarchy.type_symbol(owner).name.clone(),
                    name: member.name.clone(),
                },
                member.span,
            );
            return invalid(vec![receiver], span);
        };
        let instance = match receiver {
            Operation::TypeReference { .. } => None,
            receiver => Some(Box::new(receiver)),
        };
        Operation::FieldReference {
            instance,
            name: field.name.clone(),
            ty: field.ty,
            span,
        }
    }

    fn bind_object_creation(&mut self, ty: &TypeSyntax, arguments: &[Expression], span: Span) -> Operation {
        let arguments = arguments
            .iter()
            .map(|argument| self.bind_expression(argument))
            .collect();
        let ty = match self.hierarchy.resolve_type_syntax(ty, self.context) {
            Ok(ty) => ty,
            Err(error) => {
                self.errors.push(error);
                TypeRef::Error
            }
        };
        if let Some(id) = ty.type_id() {
            let symbol = self.hierarchy.type_symbol(id);
            if symbol.is_abstract {
                self.error(
                    SemanticErrorKind::AbstractInstantiation {
                        name: symbol.qualified_name(),
                    },
                    span,
                );
            }
        }
        Operation::ObjectCreation { ty, arguments, span }
    }

    // ========================================================================
    // Invocations
    // ========================================================================

    fn bind_invocation(&mut self, callee: &Expression, arguments: &[Expression], span: Span) -> Operation {
        let arguments: Vec<Operation> = arguments
            .iter()
            .map(|argument| self.bind_expression(argument))
            .collect();
        let argument_types: Vec<TypeRef> = arguments.iter().map(|argument| self.type_of(argument)).collect();

        match callee {
            Expression::Identifier(name) => {
                self.bind_simple_call(name, arguments, &argument_types, span)
            }
            Expression::MemberAccess {
                receiver, member, ..
            } => match receiver.as_ref() {
                Expression::Base(base_span) => {
                    self.bind_base_call(*base_span, member, arguments, &argument_types, span)
                }
                receiver => self.bind_member_call(receiver, member, arguments, &argument_types, span),
            },
            Expression::Error { .. } => invalid(arguments, span),
            other => {
                let callee = self.bind_expression(other);
                self.error(SemanticErrorKind::NotInvocable, callee.span());
                let mut children = vec![callee];
                children.extend(arguments);
                invalid(children, span)
            }
        }
    }

    /// `M(...)`: member lookup on the containing type.
    fn bind_simple_call(
        &mut self,
        name: &Identifier,
        arguments: Vec<Operation>,
        argument_types: &[TypeRef],
        span: Span,
    ) -> Operation {
        let owner = self.containing_type();
        let Some(target) = self.lookup(owner, name, argument_types, MemberLookup::Virtual) else {
            return invocation(None, ReceiverKind::Unknown, None, arguments, span);
        };
        if self.hierarchy.method(target).is_static() {
            return invocation(Some(target), ReceiverKind::Static, None, arguments, span);
        }
        let instance = Operation::InstanceReference {
            kind: InstanceReferenceKind::ImplicitThis,
            span: name.span,
        };
        invocation(Some(target), ReceiverKind::This, Some(instance), arguments, span)
    }

    /// `base.M(...)`: the nearest implementation above the containing type.
    fn bind_base_call(
        &mut self,
        base_span: Span,
        member: &Identifier,
        arguments: Vec<Operation>,
        argument_types: &[TypeRef],
        span: Span,
    ) -> Operation {
        let instance = Operation::InstanceReference {
            kind: InstanceReferenceKind::Base,
            span: base_span,
        };
        if self.method.is_static() {
            self.error(SemanticErrorKind::InvalidKeywordUse { keyword: "base" }, base_span);
            return invocation(None, ReceiverKind::Base, Some(instance), arguments, span);
        }
        let containing = self.hierarchy.type_symbol(self.containing_type());
        let Some(base) = containing.base_class else {
            self.error(
                SemanticErrorKind::NoBaseClass {
                    type_name: containing.name.clone(),
                },
                base_span,
            );
            return invocation(None, ReceiverKind::Base, Some(instance), arguments, span);
        };
        let target = self.lookup(base, member, argument_types, MemberLookup::Implementation);
        if let Some(target) = target {
            let method = self.hierarchy.method(target);
            if method.is_abstract() {
                self.error(
                    SemanticErrorKind::AbstractBaseCall {
                        name: method.display_name.clone(),
                    },
                    span,
                );
            }
        }
        invocation(target, ReceiverKind::Base, Some(instance), arguments, span)
    }

    /// `this.M(...)`, `Type.M(...)` and `expr.M(...)`.
    fn bind_member_call(
        &mut self,
        receiver: &Expression,
        member: &Identifier,
        arguments: Vec<Operation>,
        argument_types: &[TypeRef],
        span: Span,
    ) -> Operation {
        let receiver = self.bind_expression(receiver);
        let (owner, receiver_kind) = match &receiver {
            Operation::TypeReference { ty, .. } => (Some(*ty), ReceiverKind::Static),
            Operation::InstanceReference {
                kind: InstanceReferenceKind::This,
                ..
            } => (Some(self.containing_type()), ReceiverKind::This),
            Operation::Invalid { .. } => (None, ReceiverKind::Unknown),
            other => match self.type_of(other) {
                TypeRef::Named(ty) => (Some(ty), ReceiverKind::Instance),
                TypeRef::Error => (None, ReceiverKind::Unknown),
                _ => (None, ReceiverKind::Instance),
            },
        };
        let target = owner.and_then(|owner| self.lookup(owner, member, argument_types, MemberLookup::Virtual));
        let instance = match receiver {
            Operation::TypeReference { .. } => None,
            receiver => Some(receiver),
        };
        invocation(target, receiver_kind, instance, arguments, span)
    }

    /// Resolves `name` on `owner`, reporting a missing method.
    fn lookup(
        &mut self,
        owner: TypeId,
        name: &Identifier,
        argument_types: &[TypeRef],
        lookup: MemberLookup,
    ) -> Option<MethodId> {
        let target = self
            .hierarchy
            .resolve_method(owner, &name.name, argument_types, lookup);
        if target.is_none() {
            self.error(
                SemanticErrorKind::MethodNotFound {
                    type_name: self.hierarchy.type_symbol(owner).name.clone(),
                    name: name.name.clone(),
                    arity: argument_types.len(),
                },
                name.span,
            );
        }
        target
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// The static type of a bound expression.
    fn type_of(&self, operation: &Operation) -> TypeRef {
        crate::maybe_grow_stack(|| self.type_of_inner(operation))
    }

    fn type_of_inner(&self, operation: &Operation) -> TypeRef {
        match operation {
            Operation::Literal { value, .. } => match value {
                Literal::Integer(_) => TypeRef::Int,
                Literal::String(_) => TypeRef::String,
                Literal::Boolean(_) => TypeRef::Bool,
                Literal::Null => TypeRef::Null,
            },
            Operation::LocalReference { ty, .. }
            | Operation::ParameterReference { ty, .. }
            | Operation::FieldReference { ty, .. }
            | Operation::ObjectCreation { ty, .. } => *ty,
            Operation::InstanceReference { kind, .. } => match kind {
                InstanceReferenceKind::This | InstanceReferenceKind::ImplicitThis => {
                    TypeRef::Named(self.containing_type())
                }
                InstanceReferenceKind::Base => self
                    .hierarchy
                    .type_symbol(self.containing_type())
                    .base_class
                    .map_or(TypeRef::Error, TypeRef::Named),
            },
            Operation::Invocation(invocation) => invocation
                .target
                .map_or(TypeRef::Error, |target| self.hierarchy.method(target).return_type),
            Operation::Unary { operator, .. } => match operator.as_str() {
                "!" => TypeRef::Bool,
                _ => TypeRef::Int,
            },
            Operation::Binary {
                operator,
                left,
                right,
                ..
            } => match operator.as_str() {
                "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" => TypeRef::Bool,
                "+" if self.type_of(left) == TypeRef::String || self.type_of(right) == TypeRef::String => {
                    TypeRef::String
                }
                _ => TypeRef::Int,
            },
            Operation::Assignment { target, .. } => self.type_of(target),
            _ => TypeRef::Error,
        }
    }
}

fn invocation(
    target: Option<MethodId>,
    receiver: ReceiverKind,
    instance: Option<Operation>,
    arguments: Vec<Operation>,
    span: Span,
) -> Operation {
    Operation::Invocation(InvocationOperation {
        target,
        receiver,
        instance: instance.map(Box::new),
        arguments,
        span,
    })
}

fn invalid(children: Vec<Operation>, span: Span) -> Operation {
    Operation::Invalid { children, span }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic_analysis::Compilation;

    /// Binds `source` and returns every invocation in `method`'s body,
    /// pre-order, plus the error messages.
    fn calls_in(source: &str, method: &str) -> (Vec<(Option<String>, ReceiverKind)>, Vec<String>) {
        let compilation = Compilation::from_source(source);
        let symbol = compilation
            .methods()
            .iter()
            .find(|symbol| symbol.display_name == method)
            .unwrap_or_else(|| panic!("no method {method}"));
        let body = compilation.method_body(symbol.id).expect("body");
        let mut calls = Vec::new();
        let _ = crate::operation_walker::for_each_invocation(body, |invocation| {
            calls.push((
                invocation
                    .target
                    .map(|target| compilation.method(target).display_name.to_string()),
                invocation.receiver,
            ));
            std::ops::ControlFlow::<()>::Continue(())
        });
        let errors = compilation
            .diagnostics()
            .iter()
            .map(|diagnostic| diagnostic.message.to_string())
            .collect();
        (calls, errors)
    }

    const HIERARCHY: &str = "
        using System;
        class A : IDisposable {
            public void Dispose() { Dispose(true); GC.SuppressFinalize(this); }
            protected virtual void Dispose(bool disposing) { }
        }
        class B : A {
            protected override void Dispose(bool disposing) { BODY }
        }";

    fn calls_in_b(body: &str) -> (Vec<(Option<String>, ReceiverKind)>, Vec<String>) {
        calls_in(&HIERARCHY.replace("BODY", body), "B.Dispose(bool)")
    }

    #[test]
    fn base_call_binds_to_base_implementation() {
        let (calls, errors) = calls_in_b("base.Dispose(disposing);");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            calls,
            vec![(Some("A.Dispose(bool)".to_string()), ReceiverKind::Base)]
        );
    }

    #[test]
    fn this_call_binds_to_virtual_declaration() {
        let (calls, errors) = calls_in_b("this.Dispose(disposing); Dispose(false);");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            calls,
            vec![
                (Some("A.Dispose(bool)".to_string()), ReceiverKind::This),
                (Some("A.Dispose(bool)".to_string()), ReceiverKind::This),
            ]
        );
    }

    #[test]
    fn base_call_with_different_overload() {
        let (calls, errors) = calls_in_b("base.Dispose();");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(calls, vec![(Some("A.Dispose()".to_string()), ReceiverKind::Base)]);
    }

    #[test]
    fn static_and_instance_receivers() {
        let (calls, errors) = calls_in(HIERARCHY.replace("BODY", "").as_str(), "A.Dispose()");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            calls,
            vec![
                (Some("A.Dispose(bool)".to_string()), ReceiverKind::This),
                (Some("GC.SuppressFinalize(object)".to_string()), ReceiverKind::Static),
            ]
        );

        let (calls, errors) = calls_in_b("var other = new B(); other.Dispose();");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(calls, vec![(Some("A.Dispose()".to_string()), ReceiverKind::Instance)]);
    }

    #[test]
    fn nested_calls_are_bound_in_control_flow() {
        let (calls, errors) = calls_in_b(
            "if (disposing) { try { } finally { base.Dispose(disposing); } } while (false) { Dispose(); }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, ReceiverKind::Base);
        assert_eq!(calls[1].1, ReceiverKind::This);
    }

    #[test]
    fn unresolved_calls_have_no_target() {
        let (calls, errors) = calls_in_b("base.Flush(); Missing(1);");
        assert_eq!(calls, vec![(None, ReceiverKind::Base), (None, ReceiverKind::Unknown)]);
        assert_eq!(
            errors,
            vec![
                "`A` does not contain a method `Flush` that takes 0 argument(s)",
                "`B` does not contain a method `Missing` that takes 1 argument(s)",
            ]
        );
    }

    #[test]
    fn receivers_of_unknown_type_are_silent() {
        let (calls, errors) = calls_in_b("string.Empty.Trim(); \"x\".Trim();");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(calls, vec![(None, ReceiverKind::Unknown), (None, ReceiverKind::Instance)]);
    }

    #[test]
    fn abstract_base_call_is_an_error_but_keeps_target() {
        let (calls, errors) = calls_in(
            "abstract class A { protected abstract void Dispose(bool disposing); }
             class B : A { protected override void Dispose(bool disposing) { base.Dispose(disposing); } }",
            "B.Dispose(bool)",
        );
        assert_eq!(calls, vec![(Some("A.Dispose(bool)".to_string()), ReceiverKind::Base)]);
        assert_eq!(errors, vec!["cannot call abstract base member `A.Dispose(bool)`"]);
    }

    #[test]
    fn names_resolve_to_locals_parameters_and_fields() {
        let compilation = Compilation::from_source(
            "class A { bool disposed; void F(bool disposing) { var count = 1; disposed = disposing; count = count + 1; } }",
        );
        assert!(compilation.diagnostics().is_empty(), "{:?}", compilation.diagnostics());
        let method = compilation
            .methods()
            .iter()
            .find(|method| method.name == "F")
            .expect("F");
        let Some(Operation::Block { operations, .. }) = compilation.method_body(method.id) else {
            panic!("expected block");
        };
        assert!(matches!(
            &operations[0],
            Operation::VariableDeclaration { ty: TypeRef::Int, .. }
        ));
        let Operation::ExpressionStatement { operation, .. } = &operations[1] else {
            panic!("expected expression statement");
        };
        let Operation::Assignment { target, value, .. } = operation.as_ref() else {
            panic!("expected assignment");
        };
        assert!(matches!(target.as_ref(), Operation::FieldReference { ty: TypeRef::Bool, .. }));
        assert!(matches!(value.as_ref(), Operation::ParameterReference { .. }));
    }

    #[test]
    fn binding_errors() {
        let compilation = Compilation::from_source(
            "abstract class R { }
             class A {
                 static void S() { this.F(); base.F(); }
                 void F() { var x; y = 1; 1 = 2; new R(); base; (1)(); }
             }",
        );
        let messages: Vec<String> = compilation
            .diagnostics()
            .iter()
            .map(|diagnostic| diagnostic.message.to_string())
            .collect();
        for expected in [
            "keyword `this` is not valid in this context",
            "keyword `base` is not valid in this context",
            "implicitly-typed variable `x` must be initialized",
            "the name `y` does not exist in the current context",
            "the left-hand side of an assignment must be a variable or field",
            "cannot create an instance of abstract type or interface `R`",
            "expression is not invocable",
        ] {
            assert!(messages.iter().any(|m| m == expected), "missing {expected:?} in {messages:?}");
        }
    }

    #[test]
    fn base_call_without_base_class() {
        let compilation = crate::semantic_analysis::Compilation::new(
            [("a.cs", "class A { void F() { base.F(); } }")],
            crate::semantic_analysis::CompilationOptions {
                core_library: false,
                ..Default::default()
            },
        );
        assert_eq!(
            compilation.diagnostics()[0].message.as_str(),
            "`A` has no base class"
        );
    }
}
