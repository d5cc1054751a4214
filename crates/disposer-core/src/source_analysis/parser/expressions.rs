// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing.
//!
//! Precedence, from loosest to tightest:
//!
//! 1. assignment (`=`, right-associative)
//! 2. binary operators, via [`binary_binding_power`]
//! 3. prefix `!` and `-`
//! 4. postfix member access (`.x`) and invocation (`(...)`)
//! 5. primaries: literals, names, `this`, `base`, `new T(...)`, `(e)`

use super::declarations::predefined_type_for;
use super::{Parser, binary_binding_power};
use crate::ast::{Expression, Identifier, Literal};
use crate::source_analysis::{Keyword, Span, TokenKind};

/// Links a left-associative chain (`a + b + ...`, `x.F().G()...`) may have.
///
/// The parser builds a chain in a loop, but every link makes the tree one
/// node deeper. Links past the limit collapse into an error node, which
/// bounds the depth later passes (and `Drop`) recurse through.
pub(super) const MAX_CHAIN_LINKS: usize = 1024;

impl Parser {
    /// Parses a full expression.
    pub(super) fn parse_expression(&mut self) -> Expression {
        crate::maybe_grow_stack(|| self.parse_assignment())
    }

    /// Counts one more link of a chain, reporting the first link past
    /// [`MAX_CHAIN_LINKS`]. Returns `false` once the chain is too long.
    fn extend_chain(&mut self, links: &mut usize, span: Span) -> bool {
        *links += 1;
        if *links == MAX_CHAIN_LINKS + 1 {
            self.error_at(
                format!("expression is too long (maximum {MAX_CHAIN_LINKS} chained operations)"),
                span,
            );
        }
        *links <= MAX_CHAIN_LINKS
    }

    fn parse_assignment(&mut self) -> Expression {
        let target = self.parse_binary(0);
        if !self.check(&TokenKind::Assign) {
            return target;
        }
        let operator_span = self.advance().span();
        if !self.enter_nesting() {
            return Expression::Error {
                span: target.span().merge(operator_span),
            };
        }
        let value = self.parse_assignment();
        self.leave_nesting();
        let span = target.span().merge(value.span());
        Expression::Assignment {
            target: Box::new(target),
            value: Box::new(value),
            span,
        }
    }

    /// Pratt loop over binary operators binding at least `min_bp`.
    fn parse_binary(&mut self, min_bp: u8) -> Expression {
        let mut left = self.parse_unary();
        let mut links = 0;
        loop {
            let TokenKind::Operator(op) = self.current_kind() else {
                break;
            };
            let Some(bp) = binary_binding_power(op) else {
                break;
            };
            if bp.left < min_bp {
                break;
            }
            let operator = op.clone();
            self.advance();
            let right = self.parse_binary(bp.right);
            let span = left.span().merge(right.span());
            left = if self.extend_chain(&mut links, span) {
                Expression::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                }
            } else {
                Expression::Error { span }
            };
        }
        left
    }

    fn parse_unary(&mut self) -> Expression {
        let operator = match self.current_kind() {
            TokenKind::Operator(op) if op == "!" || op == "-" => op.clone(),
            _ => return self.parse_postfix(),
        };
        let start = self.advance().span();
        if !self.enter_nesting() {
            return Expression::Error { span: start };
        }
        let operand = self.parse_unary();
        self.leave_nesting();
        let span = start.merge(operand.span());
        Expression::Unary {
            operator,
            operand: Box::new(operand),
            span,
        }
    }

    fn parse_postfix(&mut self) -> Expression {
        let mut expression = self.parse_primary();
        if expression.is_error() {
            return expression;
        }
        let mut links = 0;
        loop {
            if self.match_token(&TokenKind::Dot) {
                let Some(member) = self.expect_identifier("a member name after `.`") else {
                    return Expression::Error {
                        span: self.span_from(expression.span()),
                    };
                };
                let span = expression.span().merge(member.span);
                expression = if self.extend_chain(&mut links, span) {
                    Expression::MemberAccess {
                        receiver: Box::new(expression),
                        member,
                        span,
                    }
                } else {
                    Expression::Error { span }
                };
            } else if self.check(&TokenKind::LeftParen) {
                let arguments = self.parse_arguments();
                let span = self.span_from(expression.span());
                expression = if self.extend_chain(&mut links, span) {
                    Expression::Invocation {
                        callee: Box::new(expression),
                        arguments,
                        span,
                    }
                } else {
                    Expression::Error { span }
                };
            } else {
                return expression;
            }
        }
    }

    /// `( [expr {, expr}] )`. The current token must be `(`.
    fn parse_arguments(&mut self) -> Vec<Expression> {
        self.advance();
        let mut arguments = Vec::new();
        if self.match_token(&TokenKind::RightParen) {
            return arguments;
        }
        if !self.enter_nesting() {
            self.skip_to_closing_paren();
            return arguments;
        }
        loop {
            arguments.push(self.parse_expression());
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.leave_nesting();
        self.expect(&TokenKind::RightParen, "`)`");
        arguments
    }

    fn parse_primary(&mut self) -> Expression {
        let span = self.current_token().span();
        match self.current_kind() {
            TokenKind::Integer(text) => {
                let value = parse_integer(text);
                self.advance();
                let value = value.unwrap_or_else(|| {
                    self.error_at("integer literal is too large", span);
                    0
                });
                Expression::Literal(Literal::Integer(value), span)
            }
            TokenKind::String(text) => {
                let text = text.clone();
                self.advance();
                Expression::Literal(Literal::String(text), span)
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Expression::Identifier(Identifier::new(name, span))
            }
            TokenKind::Keyword(keyword) => {
                let keyword = *keyword;
                return self.parse_keyword_primary(keyword, span);
            }
            TokenKind::LeftParen => return self.parse_parenthesized(),
            _ => {
                self.error_expected("an expression");
                if !matches!(
                    self.current_kind(),
                    TokenKind::Semicolon
                        | TokenKind::RightBrace
                        | TokenKind::RightParen
                        | TokenKind::Comma
                        | TokenKind::Eof
                ) {
                    self.advance();
                }
                Expression::Error { span }
            }
        }
    }

    fn parse_keyword_primary(&mut self, keyword: Keyword, span: Span) -> Expression {
        match keyword {
            Keyword::True | Keyword::False => {
                self.advance();
                Expression::Literal(Literal::Boolean(keyword == Keyword::True), span)
            }
            Keyword::Null => {
                self.advance();
                Expression::Literal(Literal::Null, span)
            }
            Keyword::This => {
                self.advance();
                Expression::This(span)
            }
            Keyword::Base => {
                self.advance();
                Expression::Base(span)
            }
            Keyword::New => self.parse_object_creation(),
            // `string.Empty`, `object.Equals(a, b)`
            _ if predefined_type_for(keyword).is_some() && keyword != Keyword::Void => {
                self.advance();
                Expression::Identifier(Identifier::new(keyword.as_str(), span))
            }
            _ => {
                self.error_expected("an expression");
                self.advance();
                Expression::Error { span }
            }
        }
    }

    /// `new T(args)`
    fn parse_object_creation(&mut self) -> Expression {
        let start = self.advance().span();
        let Some(ty) = self.parse_type("a type after `new`") else {
            return Expression::Error { span: start };
        };
        let arguments = if self.check(&TokenKind::LeftParen) {
            self.parse_arguments()
        } else {
            self.error_expected("`(`");
            Vec::new()
        };
        Expression::ObjectCreation {
            ty,
            arguments,
            span: self.span_from(start),
        }
    }

    /// `( expr )`
    fn parse_parenthesized(&mut self) -> Expression {
        let start = self.advance().span();
        if !self.enter_nesting() {
            self.skip_to_closing_paren();
            return Expression::Error {
                span: self.span_from(start),
            };
        }
        let inner = self.parse_expression();
        self.leave_nesting();
        self.expect(&TokenKind::RightParen, "`)`");
        Expression::Parenthesized {
            expression: Box::new(inner),
            span: self.span_from(start),
        }
    }

    /// Skips to just past the `)` matching an already consumed `(`.
    ///
    /// Stops early, without consuming, at `;`, `{`, `}` or EOF.
    fn skip_to_closing_paren(&mut self) {
        let mut depth = 1usize;
        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::Semicolon | TokenKind::LeftBrace | TokenKind::RightBrace => return,
                _ => {}
            }
            self.advance();
        }
    }
}

/// Parses decimal integer literal text, `None` on overflow.
pub(super) fn parse_integer(text: &str) -> Option<i64> {
    text.parse().ok()
}
