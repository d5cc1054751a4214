// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for class-language source code.
//!
//! **DDD Context:** Source Analysis
//!
//! This module contains the lexer, the parser and the diagnostic types
//! shared by every later stage.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. Each token
//! carries its source location via [`Span`] and the whitespace and comments
//! that precede it as [`Trivia`].
//!
//! ```
//! use disposer_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("base.Dispose()").collect();
//! assert_eq!(tokens.len(), 5); // base . Dispose ( )
//! ```
//!
//! # Parsing
//!
//! The [`parse`] function converts tokens into a
//! [`CompilationUnit`](crate::ast::CompilationUnit). Binary operator
//! precedence uses Pratt parsing (see the `parser` module).
//!
//! # Error Handling
//!
//! The lexer never stops on bad input: it emits [`TokenKind::Error`] tokens,
//! which [`lex_errors`] turns into structured [`LexError`]s and which the
//! parser reports as [`Diagnostic`]s.

mod diagnostic;
mod error;
mod lexer;
mod parser;
mod span;
mod token;


pub use diagnostic::{Diagnostic, DiagnosticCategory, Severity, sort_and_dedup};
pub use error::{LexError, LexErrorKind};
pub use lexer::{Lexer, lex, lex_errors, lex_with_eof};
pub use parser::parse;
pub use span::{FileId, Location, MAX_SOURCE_LEN, Span, offset_to_u32};
pub use token::{Keyword, Token, TokenKind, Trivia};
