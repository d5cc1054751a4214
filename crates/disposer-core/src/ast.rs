// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for the class language.
//!
//! The language is a small C#-shaped subset: namespaces, classes and
//! interfaces with single class inheritance, methods with block bodies,
//! fields, and an expression language with member access and invocation.
//! That is enough to express disposal hierarchies such as
//!
//! ```text
//! class Resource : IDisposable {
//!     public void Dispose() { Dispose(true); }
//!     protected virtual void Dispose(bool disposing) { }
//! }
//!
//! class Derived : Resource {
//!     protected override void Dispose(bool disposing) {
//!         base.Dispose(disposing);
//!     }
//! }
//! ```
//!
//! Every node carries a [`Span`]. The parser always produces a tree; damaged
//! input shows up as [`Statement::Error`] and [`Expression::Error`] nodes.

use crate::source_analysis::Span;
use ecow::EcoString;

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    /// `using` directives, in source order.
    pub usings: Vec<QualifiedName>,
    /// Type declarations, flattened out of any `namespace` blocks.
    pub types: Vec<TypeDeclaration>,
    /// Source location spanning the entire file.
    pub span: Span,
}

/// A name with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: EcoString,
    pub span: Span,
}

impl Identifier {
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A dotted name such as `System.IDisposable`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub parts: Vec<Identifier>,
    pub span: Span,
}

impl QualifiedName {
    /// Returns the name joined with `.`.
    #[must_use]
    pub fn dotted(&self) -> EcoString {
        let mut out = EcoString::new();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&part.name);
        }
        out
    }

    /// Returns the last segment (`IDisposable` for `System.IDisposable`).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.parts.last().map_or("", |part| part.name.as_str())
    }
}

/// Declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Internal,
    Static,
    Abstract,
    Virtual,
    Override,
    Sealed,
    New,
}

/// The modifier list of a declaration, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub items: Vec<(Modifier, Span)>,
}

impl Modifiers {
    /// Returns `true` if `modifier` is present.
    #[must_use]
    pub fn has(&self, modifier: Modifier) -> bool {
        self.items.iter().any(|(m, _)| *m == modifier)
    }

    /// Returns the span of `modifier`, if present.
    #[must_use]
    pub fn span_of(&self, modifier: Modifier) -> Option<Span> {
        self.items
            .iter()
            .find(|(m, _)| *m == modifier)
            .map(|(_, span)| *span)
    }
}

/// Built-in types spelled with a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedType {
    Bool,
    Int,
    Object,
    String,
    Void,
}

/// A type as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSyntax {
    /// `bool`, `int`, `object`, `string`, `void`.
    Predefined(PredefinedType, Span),
    /// A (possibly qualified) type name.
    Named(QualifiedName),
}

impl TypeSyntax {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Predefined(_, span) => *span,
            Self::Named(name) => name.span,
        }
    }
}

/// Whether a type declaration is a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclarationKind {
    Class,
    Interface,
}

/// A `class` or `interface` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub kind: TypeDeclarationKind,
    pub modifiers: Modifiers,
    pub name: Identifier,
    /// Enclosing namespace, dotted (`Acme.IO`), if any.
    pub namespace: Option<EcoString>,
    /// Base class and/or implemented interfaces, in source order.
    pub base_list: Vec<TypeSyntax>,
    pub members: Vec<Member>,
    pub span: Span,
}

impl TypeDeclaration {
    /// Iterates the method declarations of this type.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDeclaration> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method) => Some(method),
            Member::Field(_) => None,
        })
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Method(MethodDeclaration),
    Field(FieldDeclaration),
}

/// A method declaration. `body` is `None` for `abstract` and interface methods.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub modifiers: Modifiers,
    pub return_type: TypeSyntax,
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
    pub body: Option<Block>,
    /// `true` for `Name(...)` constructors; `return_type` is then `void`.
    pub is_constructor: bool,
    pub span: Span,
}

/// A formal parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: TypeSyntax,
    pub name: Identifier,
    pub span: Span,
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    pub name: Identifier,
    pub initializer: Option<Expression>,
    pub span: Span,
}

/// A `{ ... }` statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Block),
    /// `expr;`
    Expression { expression: Expression, span: Span },
    /// `var x = e;` (`ty` is `None`) or `T x = e;`
    LocalDeclaration {
        ty: Option<TypeSyntax>,
        name: Identifier,
        initializer: Option<Expression>,
        span: Span,
    },
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        span: Span,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
        span: Span,
    },
    /// `try { } finally { }`
    Try {
        body: Block,
        finally: Option<Block>,
        span: Span,
    },
    Return { value: Option<Expression>, span: Span },
    /// A lone `;`.
    Empty(Span),
    /// Unparseable statement (error recovery).
    Error { span: Span },
}

impl Statement {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Block(block) => block.span,
            Self::Expression { span, .. }
            | Self::LocalDeclaration { span, .. }
            | Self::If { span, .. }
            | Self::While { span, .. }
            | Self::Try { span, .. }
            | Self::Return { span, .. }
            | Self::Error { span }
            | Self::Empty(span) => *span,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Integer(i64),
    String(EcoString),
    Boolean(bool),
    Null,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal, Span),
    /// A simple name: a local, parameter, field or method group.
    Identifier(Identifier),
    /// `this`
    This(Span),
    /// `base`
    Base(Span),
    /// `receiver.member`
    MemberAccess {
        receiver: Box<Expression>,
        member: Identifier,
        span: Span,
    },
    /// `callee(arguments)`
    Invocation {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        span: Span,
    },
    /// `new T(arguments)`
    ObjectCreation {
        ty: TypeSyntax,
        arguments: Vec<Expression>,
        span: Span,
    },
    /// `!e`, `-e`
    Unary {
        operator: EcoString,
        operand: Box<Expression>,
        span: Span,
    },
    /// `l op r`
    Binary {
        operator: EcoString,
        left: Box<Expression>,
        right: Box<Expression>,
        span: Span,
    },
    /// `target = value`
    Assignment {
        target: Box<Expression>,
        value: Box<Expression>,
        span: Span,
    },
    /// `(e)`
    Parenthesized {
        expression: Box<Expression>,
        span: Span,
    },
    /// Unparseable expression (error recovery).
    Error { span: Span },
}

impl Expression {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(_, span) | Self::This(span) | Self::Base(span) => *span,
            Self::Identifier(identifier) => identifier.span,
            Self::MemberAccess { span, .. }
            | Self::Invocation { span, .. }
            | Self::ObjectCreation { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Assignment { span, .. }
            | Self::Parenthesized { span, .. }
            | Self::Error { span } => *span,
        }
    }

    /// Returns `true` for error-recovery placeholders.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_dotted_and_simple() {
        let name = QualifiedName {
            parts: vec![
                Identifier::new("System", Span::new(0, 6)),
                Identifier::new("IDisposable", Span::new(7, 18)),
            ],
            span: Span::new(0, 18),
        };
        assert_eq!(name.dotted(), "System.IDisposable");
        assert_eq!(name.simple_name(), "IDisposable");
    }

    #[test]
    fn modifiers_lookup() {
        let modifiers = Modifiers {
            items: vec![
                (Modifier::Protected, Span::new(0, 9)),
                (Modifier::Override, Span::new(10, 18)),
            ],
        };
        assert!(modifiers.has(Modifier::Override));
        assert!(!modifiers.has(Modifier::Virtual));
        assert_eq!(modifiers.span_of(Modifier::Override), Some(Span::new(10, 18)));
    }

    #[test]
    fn expression_span_of_compound_nodes() {
        let expr = Expression::MemberAccess {
            receiver: Box::new(Expression::Base(Span::new(0, 4))),
            member: Identifier::new("Dispose", Span::new(5, 12)),
            span: Span::new(0, 12),
        };
        assert_eq!(expr.span(), Span::new(0, 12));
        assert!(!expr.is_error());
        assert!(Expression::Error { span: Span::new(1, 2) }.is_error());
    }
}
