// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for class-language source code.
//!
//! This parser builds a [`CompilationUnit`] from a stream of tokens.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** - the parser always produces a tree
//! - **Multiple errors** - report all errors, don't stop at the first
//! - **Precise spans** - every diagnostic points at an exact source location
//! - **Synchronization points** - recover at `;`, `}` and member boundaries
//!
//! # Binary Operator Precedence (Pratt Parsing)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 10 | `\|\|` | Left |
//! | 20 | `&&` | Left |
//! | 30 | `==` `!=` | Left |
//! | 40 | `<` `>` `<=` `>=` | Left |
//! | 50 | `+` `-` | Left |
//! | 60 | `*` `/` `%` | Left |
//!
//! Assignment (`=`) sits below all of these and is right-associative.
//!
//! # Usage
//!
//! ```
//! use disposer_core::source_analysis::{lex_with_eof, parse};
//!
//! let tokens = lex_with_eof("class A { void F() { base.F(); } }");
//! let (unit, diagnostics) = parse(tokens);
//!
//! assert!(diagnostics.is_empty());
//! assert_eq!(unit.types.len(), 1);
//! ```

use ecow::EcoString;

use crate::ast::{CompilationUnit, Identifier, QualifiedName};
use crate::source_analysis::{Diagnostic, DiagnosticCategory, Keyword, Span, Token, TokenKind};

mod declarations;
mod expressions;
mod statements;

#[cfg(test)]
mod property_tests;

// ============================================================================
// Pratt Parsing for Binary Operator Precedence
// ============================================================================

/// Binding power for binary operators (Pratt parsing).
///
/// Higher values bind tighter. For left-associative operators
/// `left_bp == right_bp - 1`.
#[derive(Debug, Clone, Copy)]
pub(super) struct BindingPower {
    /// How tightly this operator binds to its left operand.
    pub(super) left: u8,
    /// How tightly this operator binds to its right operand.
    pub(super) right: u8,
}

impl BindingPower {
    /// Creates a left-associative binding power.
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }
}

/// Gets the binding power for a binary operator.
///
/// Returns `None` for operators that are not binary (`!`), which ends the
/// binary expression.
pub(super) fn binary_binding_power(op: &str) -> Option<BindingPower> {
    match op {
        "||" => Some(BindingPower::left_assoc(10)),
        "&&" => Some(BindingPower::left_assoc(20)),
        "==" | "!=" => Some(BindingPower::left_assoc(30)),
        "<" | ">" | "<=" | ">=" => Some(BindingPower::left_assoc(40)),
        "+" | "-" => Some(BindingPower::left_assoc(50)),
        "*" | "/" | "%" => Some(BindingPower::left_assoc(60)),
        _ => None,
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Parses a token stream into a [`CompilationUnit`].
///
/// The stream should come from [`lex_with_eof`](super::lex_with_eof); a
/// missing trailing EOF token is tolerated. Lexical error tokens are reported
/// as syntax diagnostics and skipped.
///
/// Always returns a tree; the diagnostics describe anything that had to be
/// recovered from.
#[must_use]
pub fn parse(tokens: Vec<Token>) -> (CompilationUnit, Vec<Diagnostic>) {
    let mut diagnostics: Vec<Diagnostic> = super::lex_errors(&tokens)
        .into_iter()
        .map(|error| {
            Diagnostic::error(error.to_string(), error.span)
                .with_category(DiagnosticCategory::Syntax)
        })
        .collect();

    let mut parser = Parser::new(tokens);
    let unit = parser.parse_compilation_unit();
    diagnostics.extend(parser.diagnostics);
    (unit, diagnostics)
}

/// Maximum nesting depth for statements and expressions.
///
/// Prevents stack overflow on deeply nested input such as `((((...))))`
/// or `{{{{...}}}}`.
const MAX_NESTING_DEPTH: usize = 64;

/// The parser state.
pub(super) struct Parser {
    /// The tokens being parsed, without error tokens, ending in EOF.
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
    /// Accumulated diagnostics.
    pub(super) diagnostics: Vec<Diagnostic>,
    /// Current nesting depth (guards against stack overflow).
    nesting_depth: usize,
}

impl Parser {
    /// Creates a new parser for the given tokens.
    fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|token| !token.kind().is_error())
            .collect();
        if !tokens.last().is_some_and(|token| token.kind().is_eof()) {
            let end = tokens.last().map_or(0, |token| token.span().end());
            tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));
        }
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
            nesting_depth: 0,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token. Past the end this is the EOF token.
    pub(super) fn current_token(&self) -> &Token {
        let index = self.current.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Returns the current token kind.
    pub(super) fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    /// Peeks `offset` tokens ahead (0 is the current token).
    pub(super) fn peek_kind_at(&self, offset: usize) -> &TokenKind {
        let index = (self.current + offset).min(self.tokens.len() - 1);
        self.tokens[index].kind()
    }

    /// Checks if we're at the end of input.
    pub(super) fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Advances to the next token and returns the consumed one.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Span of the most recently consumed token.
    pub(super) fn previous_span(&self) -> Span {
        if self.current == 0 {
            let start = self.current_token().span().start();
            return Span::new(start, start);
        }
        self.tokens[self.current - 1].span()
    }

    /// Span from `start` through the most recently consumed token.
    pub(super) fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }

    /// Checks if the current token is exactly `kind`.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current_kind().is_keyword(keyword)
    }

    /// Consumes the current token if it is exactly `kind`.
    pub(super) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is the given keyword.
    pub(super) fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be `kind`, advancing if it is.
    ///
    /// Otherwise reports `expected {what}, found ...` and returns `None`.
    pub(super) fn expect(&mut self, kind: &TokenKind, what: &str) -> Option<Span> {
        if self.check(kind) {
            Some(self.advance().span())
        } else {
            self.error_expected(what);
            None
        }
    }

    /// Parses an identifier, reporting an error if there is none.
    pub(super) fn expect_identifier(&mut self, what: &str) -> Option<Identifier> {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let name = name.clone();
            let span = self.advance().span();
            Some(Identifier::new(name, span))
        } else {
            self.error_expected(what);
            None
        }
    }

    /// Parses a dotted name: `Identifier ('.' Identifier)*`.
    pub(super) fn parse_qualified_name(&mut self, what: &str) -> Option<QualifiedName> {
        let first = self.expect_identifier(what)?;
        let mut parts = vec![first];
        while self.check(&TokenKind::Dot) && self.peek_kind_at(1).is_identifier() {
            self.advance();
            if let Some(part) = self.expect_identifier("a name after `.`") {
                parts.push(part);
            }
        }
        let span = parts[0].span.merge(parts[parts.len() - 1].span);
        Some(QualifiedName { parts, span })
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Reports an error at the given span.
    pub(super) fn error_at(&mut self, message: impl Into<EcoString>, span: Span) {
        self.diagnostics
            .push(Diagnostic::error(message, span).with_category(DiagnosticCategory::Syntax));
    }

    /// Reports an `expected X, found Y` error at the current token.
    pub(super) fn error_expected(&mut self, what: &str) {
        let found = describe(self.current_kind());
        let span = self.current_token().span();
        self.error_at(format!("expected {what}, found {found}"), span);
    }

    /// Increments the nesting depth, reporting an error and returning
    /// `false` when it exceeds [`MAX_NESTING_DEPTH`]. Pair every `true`
    /// with [`Self::leave_nesting`].
    pub(super) fn enter_nesting(&mut self) -> bool {
        self.nesting_depth += 1;
        if self.nesting_depth > MAX_NESTING_DEPTH {
            self.nesting_depth -= 1;
            let span = self.current_token().span();
            self.error_at(
                format!("nesting is too deep (maximum {MAX_NESTING_DEPTH} levels)"),
                span,
            );
            return false;
        }
        true
    }

    /// Decrements the nesting depth (pair with [`Self::enter_nesting`]).
    pub(super) fn leave_nesting(&mut self) {
        debug_assert!(
            self.nesting_depth > 0,
            "leave_nesting called without matching enter_nesting"
        );
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    /// Skips tokens until the end of the current statement.
    ///
    /// Consumes a terminating `;`, stops before a `}` that closes the
    /// enclosing block, and skips balanced `{ ... }` groups.
    pub(super) fn synchronize_statement(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace if depth == 0 => return,
                TokenKind::RightBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Skips the whole innermost balanced `{ ... }` group starting at the
    /// current token, or a single token otherwise.
    pub(super) fn skip_balanced(&mut self) {
        if !self.check(&TokenKind::LeftBrace) {
            self.advance();
            return;
        }
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.advance().kind() {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Describes a token for `found ...` messages.
fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Eof => "end of file".to_string(),
        TokenKind::Identifier(name) => format!("identifier `{name}`"),
        TokenKind::Keyword(keyword) => format!("keyword `{keyword}`"),
        other => format!("`{other}`"),
    }
}
