// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement and block parsing.

use super::Parser;
use crate::ast::{Block, Statement};
use crate::source_analysis::{Keyword, TokenKind};

impl Parser {
    /// Parses `{ statement* }`. The current token must be `{`.
    pub(super) fn parse_block(&mut self) -> Block {
        let start = self.current_token().span();
        if !self.enter_nesting() {
            self.skip_balanced();
            return Block {
                statements: Vec::new(),
                span: self.span_from(start),
            };
        }
        self.advance();

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_statement());
        }
        self.expect(&TokenKind::RightBrace, "`}`");
        self.leave_nesting();

        Block {
            statements,
            span: self.span_from(start),
        }
    }

    /// Parses a single statement.
    pub(super) fn parse_statement(&mut self) -> Statement {
        match self.current_kind() {
            TokenKind::LeftBrace => Statement::Block(self.parse_block()),
            TokenKind::Semicolon => Statement::Empty(self.advance().span()),
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::Try) => self.parse_try(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),
            _ if self.looks_like_local_declaration() => self.parse_local_declaration(),
            _ => self.parse_expression_statement(),
        }
    }

    /// Parses the body of `if`/`else`/`while` under the nesting guard.
    fn parse_embedded_statement(&mut self) -> Statement {
        let start = self.current_token().span();
        if !self.enter_nesting() {
            self.synchronize_statement();
            return Statement::Error {
                span: self.span_from(start),
            };
        }
        let statement = self.parse_statement();
        self.leave_nesting();
        statement
    }

    /// `var x`, `bool x`, `T x` and `A.B x` start a local declaration.
    fn looks_like_local_declaration(&self) -> bool {
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Var) => self.peek_kind_at(1).is_identifier(),
            TokenKind::Keyword(keyword) if keyword.is_predefined_type() => {
                *keyword != Keyword::Void && self.peek_kind_at(1).is_identifier()
            }
            TokenKind::Identifier(_) => {
                let mut offset = 1;
                while self.peek_kind_at(offset) == &TokenKind::Dot
                    && self.peek_kind_at(offset + 1).is_identifier()
                {
                    offset += 2;
                }
                self.peek_kind_at(offset).is_identifier()
            }
            _ => false,
        }
    }

    fn parse_local_declaration(&mut self) -> Statement {
        let start = self.current_token().span();
        let ty = if self.match_keyword(Keyword::Var) {
            None
        } else {
            self.parse_type("a type")
        };
        let Some(name) = self.expect_identifier("a variable name") else {
            self.synchronize_statement();
            return Statement::Error {
                span: self.span_from(start),
            };
        };
        let initializer = if self.match_token(&TokenKind::Assign) {
            Some(self.parse_expression())
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon, "`;`");
        Statement::LocalDeclaration {
            ty,
            name,
            initializer,
            span: self.span_from(start),
        }
    }

    fn parse_expression_statement(&mut self) -> Statement {
        let start = self.current_token().span();
        let expression = self.parse_expression();
        if expression.is_error() {
            self.synchronize_statement();
            return Statement::Error {
                span: self.span_from(start),
            };
        }
        self.expect(&TokenKind::Semicolon, "`;`");
        Statement::Expression {
            expression,
            span: self.span_from(start),
        }
    }

    /// `if (cond) stmt [else stmt]`
    fn parse_if(&mut self) -> Statement {
        let start = self.advance().span();
        self.expect(&TokenKind::LeftParen, "`(` after `if`");
        let condition = self.parse_expression();
        self.expect(&TokenKind::RightParen, "`)`");
        let then_branch = Box::new(self.parse_embedded_statement());
        let else_branch = if self.match_keyword(Keyword::Else) {
            Some(Box::new(self.parse_embedded_statement()))
        } else {
            None
        };
        Statement::If {
            condition,
            then_branch,
            else_branch,
            span: self.span_from(start),
        }
    }

    /// `while (cond) stmt`
    fn parse_while(&mut self) -> Statement {
        let start = self.advance().span();
        self.expect(&TokenKind::LeftParen, "`(` after `while`");
        let condition = self.parse_expression();
        self.expect(&TokenKind::RightParen, "`)`");
        let body = Box::new(self.parse_embedded_statement());
        Statement::While {
            condition,
            body,
            span: self.span_from(start),
        }
    }

    /// `try { } finally { }`
    fn parse_try(&mut self) -> Statement {
        let start = self.advance().span();
        if !self.check(&TokenKind::LeftBrace) {
            self.error_expected("`{` after `try`");
            self.synchronize_statement();
            return Statement::Error {
                span: self.span_from(start),
            };
        }
        let body = self.parse_block();
        let finally = if self.match_keyword(Keyword::Finally) {
            if self.check(&TokenKind::LeftBrace) {
                Some(self.parse_block())
            } else {
                self.error_expected("`{` after `finally`");
                None
            }
        } else {
            self.error_expected("`finally`");
            None
        };
        Statement::Try {
            body,
            finally,
            span: self.span_from(start),
        }
    }

    /// `return [expr];`
    fn parse_return(&mut self) -> Statement {
        let start = self.advance().span();
        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(&TokenKind::Semicolon, "`;`");
        Statement::Return {
            value,
            span: self.span_from(start),
        }
    }
}
