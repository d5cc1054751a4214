// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for the class-language lexer.
//!
//! Each token consists of a [`TokenKind`], the [`Span`] it covers and the
//! [`Trivia`] (whitespace and comments) that precedes it.

use std::fmt;

use ecow::EcoString;

use super::Span;

/// Reserved words of the class language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Abstract,
    Base,
    Bool,
    Class,
    Else,
    False,
    Finally,
    If,
    Int,
    Interface,
    Internal,
    Namespace,
    New,
    Null,
    Object,
    Override,
    Private,
    Protected,
    Public,
    Return,
    Sealed,
    Static,
    String,
    This,
    True,
    Try,
    Using,
    Var,
    Virtual,
    Void,
    While,
}

/// Spelling table for [`Keyword`], sorted by spelling.
const KEYWORDS: &[(&str, Keyword)] = &[
    ("abstract", Keyword::Abstract),
    ("base", Keyword::Base),
    ("bool", Keyword::Bool),
    ("class", Keyword::Class),
    ("else", Keyword::Else),
    ("false", Keyword::False),
    ("finally", Keyword::Finally),
    ("if", Keyword::If),
    ("int", Keyword::Int),
    ("interface", Keyword::Interface),
    ("internal", Keyword::Internal),
    ("namespace", Keyword::Namespace),
    ("new", Keyword::New),
    ("null", Keyword::Null),
    ("object", Keyword::Object),
    ("override", Keyword::Override),
    ("private", Keyword::Private),
    ("protected", Keyword::Protected),
    ("public", Keyword::Public),
    ("return", Keyword::Return),
    ("sealed", Keyword::Sealed),
    ("static", Keyword::Static),
    ("string", Keyword::String),
    ("this", Keyword::This),
    ("true", Keyword::True),
    ("try", Keyword::Try),
    ("using", Keyword::Using),
    ("var", Keyword::Var),
    ("virtual", Keyword::Virtual),
    ("void", Keyword::Void),
    ("while", Keyword::While),
];

impl Keyword {
    /// Looks up a reserved word by its spelling.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        KEYWORDS
            .binary_search_by(|(spelling, _)| (*spelling).cmp(text))
            .ok()
            .map(|index| KEYWORDS[index].1)
    }

    /// Returns the source spelling of the keyword.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, keyword)| *keyword == self)
            .map_or("", |(spelling, _)| spelling)
    }

    /// Returns `true` for declaration modifiers (`public`, `override`, ...).
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::Abstract
                | Self::Internal
                | Self::New
                | Self::Override
                | Self::Private
                | Self::Protected
                | Self::Public
                | Self::Sealed
                | Self::Static
                | Self::Virtual
        )
    }

    /// Returns `true` for keywords that name a built-in type.
    #[must_use]
    pub const fn is_predefined_type(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::Object | Self::String | Self::Void
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of token, not including source location or trivia.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals and names ===
    /// An identifier: `Dispose`, `disposing`, `_stream`
    Identifier(EcoString),

    /// A reserved word: `class`, `override`, `base`
    Keyword(Keyword),

    /// An integer literal: `42`
    Integer(EcoString),

    /// A double-quoted string literal (escape sequences preserved verbatim)
    String(EcoString),

    // === Delimiters ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,

    // === Punctuation ===
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `=`
    Assign,

    /// Unary or binary operator: `==`, `!=`, `&&`, `!`, `+`, ...
    Operator(EcoString),

    // === Special ===
    /// End of file
    Eof,

    /// Invalid/error token (preserves unparseable text for error recovery)
    Error(EcoString),
}

impl TokenKind {
    /// Returns `true` if this token is a literal value.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Integer(_)
                | Self::String(_)
                | Self::Keyword(Keyword::True | Keyword::False | Keyword::Null)
        )
    }

    /// Returns `true` if this token is an identifier.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    /// Returns `true` if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(k) if *k == keyword)
    }

    /// Returns `true` if this is the given operator.
    #[must_use]
    pub fn is_operator(&self, op: &str) -> bool {
        matches!(self, Self::Operator(o) if o == op)
    }

    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this is an error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(s) | Self::Integer(s) | Self::Operator(s) => write!(f, "{s}"),
            Self::Keyword(k) => write!(f, "{k}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Error(s) => write!(f, "<error: {s}>"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::Semicolon => write!(f, ";"),
            Self::Comma => write!(f, ","),
            Self::Dot => write!(f, "."),
            Self::Colon => write!(f, ":"),
            Self::Assign => write!(f, "="),
            Self::Eof => write!(f, "<eof>"),
        }
    }
}

/// Trivia represents non-semantic content like whitespace and comments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trivia {
    /// Whitespace (spaces, tabs, newlines)
    Whitespace(EcoString),

    /// A line comment: `// comment text`
    LineComment(EcoString),

    /// A block comment: `/* comment text */`
    BlockComment(EcoString),

    /// A doc comment: `/// doc text`
    DocComment(EcoString),
}

impl Trivia {
    /// Returns the text content of this trivia.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Whitespace(s)
            | Self::LineComment(s)
            | Self::BlockComment(s)
            | Self::DocComment(s) => s,
        }
    }

    /// Returns `true` if this is a comment.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(
            self,
            Self::LineComment(_) | Self::BlockComment(_) | Self::DocComment(_)
        )
    }
}

/// A token with its source location and leading trivia.
///
/// # Examples
///
/// ```
/// use disposer_core::source_analysis::{Span, Token, TokenKind};
///
/// let token = Token::new(TokenKind::Identifier("foo".into()), Span::new(0, 3));
/// assert!(token.kind().is_identifier());
/// assert_eq!(token.span().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
    leading_trivia: Vec<Trivia>,
}

impl Token {
    /// Creates a new token with no trivia.
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            leading_trivia: Vec::new(),
        }
    }

    /// Creates a new token with leading trivia.
    #[must_use]
    pub fn with_trivia(kind: TokenKind, span: Span, leading_trivia: Vec<Trivia>) -> Self {
        Self {
            kind,
            span,
            leading_trivia,
        }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Returns the source span of this token (excluding trivia).
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the trivia that precedes this token.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading_trivia
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_is_sorted() {
        assert!(KEYWORDS.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn keyword_lookup_round_trips() {
        for (spelling, keyword) in KEYWORDS {
            assert_eq!(Keyword::from_text(spelling), Some(*keyword));
            assert_eq!(keyword.as_str(), *spelling);
        }
        assert_eq!(Keyword::from_text("Dispose"), None);
        assert_eq!(Keyword::from_text("MyBase"), None);
    }

    #[test]
    fn token_kind_display() {
        assert_eq!(TokenKind::Identifier("foo".into()).to_string(), "foo");
        assert_eq!(TokenKind::Keyword(Keyword::Override).to_string(), "override");
        assert_eq!(TokenKind::String("hi".into()).to_string(), "\"hi\"");
        assert_eq!(TokenKind::Operator("&&".into()).to_string(), "&&");
        assert_eq!(TokenKind::LeftBrace.to_string(), "{");
        assert_eq!(TokenKind::Eof.to_string(), "<eof>");
    }

    #[test]
    fn token_kind_predicates() {
        assert!(TokenKind::Keyword(Keyword::True).is_literal());
        assert!(TokenKind::Integer("1".into()).is_literal());
        assert!(!TokenKind::Identifier("x".into()).is_literal());
        assert!(TokenKind::Keyword(Keyword::Base).is_keyword(Keyword::Base));
        assert!(TokenKind::Operator("!".into()).is_operator("!"));
        assert!(TokenKind::Eof.is_eof());
        assert!(TokenKind::Error("@".into()).is_error());
    }

    #[test]
    fn modifiers_and_predefined_types() {
        assert!(Keyword::Override.is_modifier());
        assert!(!Keyword::Class.is_modifier());
        assert!(Keyword::Bool.is_predefined_type());
        assert!(!Keyword::Base.is_predefined_type());
    }
}
