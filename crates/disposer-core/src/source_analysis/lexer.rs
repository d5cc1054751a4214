// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for the class language.
//!
//! The lexer is hand-written so that it never fails: unknown characters and
//! unterminated literals become [`TokenKind::Error`] tokens and lexing
//! continues. Whitespace and comments are kept as leading [`Trivia`].
//!
//! ```
//! use disposer_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("base.Dispose();").collect();
//! assert_eq!(tokens.len(), 6); // base . Dispose ( ) ;
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Keyword, LexError, Span, Token, TokenKind, Trivia, offset_to_u32};

/// A lexer that tokenizes class-language source code.
pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    position: usize,
    pending_trivia: Vec<Trivia>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            pending_trivia: Vec::new(),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    fn current_position(&self) -> u32 {
        offset_to_u32(self.position)
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Skips whitespace and comments, collecting them as trivia.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    let start = self.current_position();
                    self.advance_while(char::is_whitespace);
                    let text = self.text_for(self.span_from(start));
                    self.pending_trivia.push(Trivia::Whitespace(text.into()));
                }
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    let start = self.current_position();
                    let is_doc = self.peek_char_n(2) == Some('/') && self.peek_char_n(3) != Some('/');
                    self.advance_while(|c| c != '\n');
                    let text = EcoString::from(self.text_for(self.span_from(start)));
                    self.pending_trivia.push(if is_doc {
                        Trivia::DocComment(text)
                    } else {
                        Trivia::LineComment(text)
                    });
                }
                Some('/') if self.peek_char_n(1) == Some('*') => self.lex_block_comment(),
                _ => break,
            }
        }
    }

    /// Lexes a block comment: `/* ... */`. Unterminated comments run to EOF.
    fn lex_block_comment(&mut self) {
        let start = self.current_position();
        self.advance(); // /
        self.advance(); // *
        loop {
            match self.peek_char() {
                None => break,
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        let text = self.text_for(self.span_from(start));
        self.pending_trivia.push(Trivia::BlockComment(text.into()));
    }

    /// Lexes the next token.
    fn lex_token(&mut self) -> Token {
        self.skip_trivia();
        let leading_trivia = std::mem::take(&mut self.pending_trivia);
        let start = self.current_position();
        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => self.lex_token_kind(c, start),
        };
        Token::with_trivia(kind, self.span_from(start), leading_trivia)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn lex_token_kind(&mut self, c: char, start: u32) -> TokenKind {
        match c {
            'a'..='z' | 'A'..='Z' | '_' | '@' => self.lex_identifier_or_keyword(),
            '0'..='9' => {
                self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                TokenKind::Integer(self.text_for(self.span_from(start)).into())
            }
            '"' => self.lex_string(start),
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            '{' => self.single(TokenKind::LeftBrace),
            '}' => self.single(TokenKind::RightBrace),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Dot),
            ':' => self.single(TokenKind::Colon),
            '=' if self.peek_char_n(1) == Some('=') => self.operator(2, start),
            '=' => self.single(TokenKind::Assign),
            '!' | '<' | '>' if self.peek_char_n(1) == Some('=') => self.operator(2, start),
            '&' if self.peek_char_n(1) == Some('&') => self.operator(2, start),
            '|' if self.peek_char_n(1) == Some('|') => self.operator(2, start),
            '!' | '<' | '>' | '+' | '-' | '*' | '/' | '%' => self.operator(1, start),
            _ => {
                self.advance();
                TokenKind::Error(self.text_for(self.span_from(start)).into())
            }
        }
    }

    fn operator(&mut self, width: usize, start: u32) -> TokenKind {
        for _ in 0..width {
            self.advance();
        }
        TokenKind::Operator(self.text_for(self.span_from(start)).into())
    }

    /// Lexes an identifier or reserved word. `@name` escapes a reserved word.
    fn lex_identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.current_position();
        let verbatim = self.peek_char() == Some('@');
        if verbatim {
            self.advance();
        }
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = self.text_for(self.span_from(start));
        if verbatim {
            return match text.get(1..) {
                Some(name) if !name.is_empty() => TokenKind::Identifier(name.into()),
                _ => TokenKind::Error(text.into()),
            };
        }
        Keyword::from_text(text).map_or_else(
            || TokenKind::Identifier(text.into()),
            TokenKind::Keyword,
        )
    }

    /// Lexes a string literal. Unterminated strings become error tokens
    /// containing the raw text up to the end of the line.
    fn lex_string(&mut self, start: u32) -> TokenKind {
        self.advance(); // opening quote
        let content_start = self.current_position();
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return TokenKind::Error(self.text_for(self.span_from(start)).into());
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('"') => {
                    let content = self.text_for(self.span_from(content_start));
                    self.advance();
                    return TokenKind::String(content.into());
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lex_token();
        if token.kind().is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// Tokenizes source text, excluding the EOF token.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Tokenizes source text and terminates the stream with an EOF token.
///
/// This is the form the parser expects.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex_token();
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    tokens
}

/// Extracts structured lexical errors from a token stream.
#[must_use]
pub fn lex_errors(tokens: &[Token]) -> Vec<LexError> {
    tokens
        .iter()
        .filter_map(|token| match token.kind() {
            TokenKind::Error(text) if text.starts_with('"') => {
                Some(LexError::unterminated_string(token.span()))
            }
            TokenKind::Error(text) => Some(
                text.chars()
                    .next()
                    .map_or_else(
                        || LexError::unterminated_string(token.span()),
                        |c| LexError::unexpected_char(c, token.span()),
                    ),
            ),
            _ => None,
        })
        .collect()
}
