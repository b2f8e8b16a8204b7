// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for SQL lexical analysis.
//!
//! This module defines the tokens produced by the lexer, including support
//! for trivia (whitespace and comments) so that formatting tools can
//! reconstruct the source exactly.
//!
//! # Token Structure
//!
//! Each token consists of:
//! - A [`TokenKind`] indicating the type of token
//! - The verbatim source text and a [`Span`] locating it; spans are
//!   code-point addressed, so `span.len()` equals the text's character
//!   count
//! - Leading and trailing [`Trivia`] for accurate source reconstruction
//!
//! For any lexed token stream, concatenating `leading_trivia + text +
//! trailing_trivia` over every token reproduces the input byte-for-byte.
//! Error recovery in the parser relies on this: deleted tokens are spliced
//! into a neighbouring token's leading trivia instead of being dropped.

use ecow::EcoString;

use super::{LineCol, Span};

/// A SQL keyword, recognized case-insensitively by the lexer.
///
/// `Keyword::from_lexeme` and [`Keyword::lexeme`] together form the
/// bidirectional keyword index: lexeme → kind during lexing, kind → lexeme
/// when diagnostics or the unparser need a textual form for a synthesized
/// token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Abort,
    Action,
    Always,
    As,
    Asc,
    Autoincrement,
    Begin,
    Cascade,
    Case,
    Check,
    Collate,
    Commit,
    Conflict,
    Constraint,
    Create,
    Default,
    Deferrable,
    Deferred,
    Delete,
    Desc,
    Else,
    End,
    Exists,
    Fail,
    False,
    Foreign,
    Generated,
    If,
    Ignore,
    Immediate,
    In,
    Index,
    Initially,
    Key,
    Match,
    No,
    Not,
    Null,
    On,
    Pragma,
    Primary,
    References,
    Replace,
    Restrict,
    Rollback,
    Rowid,
    Select,
    Set,
    Stored,
    Strict,
    Table,
    Temporary,
    Then,
    Transaction,
    Trigger,
    True,
    Unique,
    Update,
    Using,
    View,
    Virtual,
    When,
    Where,
    Without,
}

impl Keyword {
    /// Looks up a keyword from an already-lowercased lexeme.
    ///
    /// `temp` is an alias for `temporary`, matching SQLite.
    #[must_use]
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        Some(match lexeme {
            "abort" => Self::Abort,
            "action" => Self::Action,
            "always" => Self::Always,
            "as" => Self::As,
            "asc" => Self::Asc,
            "autoincrement" => Self::Autoincrement,
            "begin" => Self::Begin,
            "cascade" => Self::Cascade,
            "case" => Self::Case,
            "check" => Self::Check,
            "collate" => Self::Collate,
            "commit" => Self::Commit,
            "conflict" => Self::Conflict,
            "constraint" => Self::Constraint,
            "create" => Self::Create,
            "default" => Self::Default,
            "deferrable" => Self::Deferrable,
            "deferred" => Self::Deferred,
            "delete" => Self::Delete,
            "desc" => Self::Desc,
            "else" => Self::Else,
            "end" => Self::End,
            "exists" => Self::Exists,
            "fail" => Self::Fail,
            "false" => Self::False,
            "foreign" => Self::Foreign,
            "generated" => Self::Generated,
            "if" => Self::If,
            "ignore" => Self::Ignore,
            "immediate" => Self::Immediate,
            "in" => Self::In,
            "index" => Self::Index,
            "initially" => Self::Initially,
            "key" => Self::Key,
            "match" => Self::Match,
            "no" => Self::No,
            "not" => Self::Not,
            "null" => Self::Null,
            "on" => Self::On,
            "pragma" => Self::Pragma,
            "primary" => Self::Primary,
            "references" => Self::References,
            "replace" => Self::Replace,
            "restrict" => Self::Restrict,
            "rollback" => Self::Rollback,
            "rowid" => Self::Rowid,
            "select" => Self::Select,
            "set" => Self::Set,
            "stored" => Self::Stored,
            "strict" => Self::Strict,
            "table" => Self::Table,
            "temp" | "temporary" => Self::Temporary,
            "then" => Self::Then,
            "transaction" => Self::Transaction,
            "trigger" => Self::Trigger,
            "true" => Self::True,
            "unique" => Self::Unique,
            "update" => Self::Update,
            "using" => Self::Using,
            "view" => Self::View,
            "virtual" => Self::Virtual,
            "when" => Self::When,
            "where" => Self::Where,
            "without" => Self::Without,
            _ => return None,
        })
    }

    /// Returns the canonical (lowercase) lexeme for this keyword.
    #[must_use]
    pub const fn lexeme(self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Action => "action",
            Self::Always => "always",
            Self::As => "as",
            Self::Asc => "asc",
            Self::Autoincrement => "autoincrement",
            Self::Begin => "begin",
            Self::Cascade => "cascade",
            Self::Case => "case",
            Self::Check => "check",
            Self::Collate => "collate",
            Self::Commit => "commit",
            Self::Conflict => "conflict",
            Self::Constraint => "constraint",
            Self::Create => "create",
            Self::Default => "default",
            Self::Deferrable => "deferrable",
            Self::Deferred => "deferred",
            Self::Delete => "delete",
            Self::Desc => "desc",
            Self::Else => "else",
            Self::End => "end",
            Self::Exists => "exists",
            Self::Fail => "fail",
            Self::False => "false",
            Self::Foreign => "foreign",
            Self::Generated => "generated",
            Self::If => "if",
            Self::Ignore => "ignore",
            Self::Immediate => "immediate",
            Self::In => "in",
            Self::Index => "index",
            Self::Initially => "initially",
            Self::Key => "key",
            Self::Match => "match",
            Self::No => "no",
            Self::Not => "not",
            Self::Null => "null",
            Self::On => "on",
            Self::Pragma => "pragma",
            Self::Primary => "primary",
            Self::References => "references",
            Self::Replace => "replace",
            Self::Restrict => "restrict",
            Self::Rollback => "rollback",
            Self::Rowid => "rowid",
            Self::Select => "select",
            Self::Set => "set",
            Self::Stored => "stored",
            Self::Strict => "strict",
            Self::Table => "table",
            Self::Temporary => "temporary",
            Self::Then => "then",
            Self::Transaction => "transaction",
            Self::Trigger => "trigger",
            Self::True => "true",
            Self::Unique => "unique",
            Self::Update => "update",
            Self::Using => "using",
            Self::View => "view",
            Self::Virtual => "virtual",
            Self::When => "when",
            Self::Where => "where",
            Self::Without => "without",
        }
    }

    /// Returns `true` if this keyword can begin a column or table constraint.
    ///
    /// The column-definition loop stops when one of these appears at the head
    /// of a comma-separated item, handing over to constraint parsing.
    #[must_use]
    pub const fn starts_constraint(self) -> bool {
        matches!(
            self,
            Self::Constraint
                | Self::Primary
                | Self::Foreign
                | Self::Unique
                | Self::Check
                | Self::Default
                | Self::Collate
                | Self::References
                | Self::Generated
        )
    }
}

/// The kind of token, not including source text, location, or trivia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Punctuation ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `;`
    Semicolon,
    /// `=`
    Equal,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `!`
    Bang,
    /// `<`
    Less,
    /// `>`
    Greater,

    // === Multi-char operators ===
    /// `!=`
    NotEqual,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,

    // === Literals and identifiers ===
    /// A bare, double-quoted, or backtick-quoted identifier.
    Identifier,
    /// A single-quoted string literal.
    StringLiteral,
    /// `42`, `3.14`, `3.14e2`, `.5`
    DecimalNumeric,
    /// `0xDEAD_BEEF`
    HexNumeric,
    /// `0b1010`
    BinaryNumeric,
    /// `00755`
    OctalNumeric,

    /// A reserved word, recognized case-insensitively.
    Keyword(Keyword),

    // === Special ===
    /// End of file.
    Eof,
    /// Invalid input (unknown character, unterminated quote). The token text
    /// preserves the offending source so lexing stays lossless.
    Error,
}

impl TokenKind {
    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this is an error token.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns `true` if this token is a numeric literal of any base.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::DecimalNumeric | Self::HexNumeric | Self::BinaryNumeric | Self::OctalNumeric
        )
    }

    /// Returns the keyword carried by this kind, if any.
    #[must_use]
    pub const fn keyword(self) -> Option<Keyword> {
        match self {
            Self::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }

    /// Cost of synthesizing a token of this kind during error recovery.
    ///
    /// Keywords are cheap to conjure out of thin air, punctuation slightly
    /// less so, and identifiers or literals are expensive: the parser must
    /// never invent a name the user did not write.
    #[must_use]
    pub const fn insertion_cost(self) -> u32 {
        match self {
            Self::Keyword(_) => 1,
            Self::LeftParen
            | Self::RightParen
            | Self::Comma
            | Self::Period
            | Self::Semicolon
            | Self::Equal
            | Self::Plus
            | Self::Minus
            | Self::Star
            | Self::Slash
            | Self::Bang
            | Self::Less
            | Self::Greater
            | Self::NotEqual
            | Self::GreaterEqual
            | Self::LessEqual => 2,
            Self::Identifier
            | Self::StringLiteral
            | Self::DecimalNumeric
            | Self::HexNumeric
            | Self::BinaryNumeric
            | Self::OctalNumeric
            | Self::Eof
            | Self::Error => 10,
        }
    }

    /// Cost of deleting a token of this kind during error recovery.
    ///
    /// Stray punctuation deletes cheaply; identifiers and literals carry user
    /// intent and resist deletion. EOF can never be deleted.
    #[must_use]
    pub const fn deletion_cost(self) -> u32 {
        match self {
            Self::LeftParen
            | Self::RightParen
            | Self::Comma
            | Self::Period
            | Self::Semicolon
            | Self::Equal
            | Self::Plus
            | Self::Minus
            | Self::Star
            | Self::Slash
            | Self::Bang
            | Self::Less
            | Self::Greater
            | Self::NotEqual
            | Self::GreaterEqual
            | Self::LessEqual
            | Self::Error => 1,
            Self::Keyword(_) => 4,
            Self::Identifier
            | Self::StringLiteral
            | Self::DecimalNumeric
            | Self::HexNumeric
            | Self::BinaryNumeric
            | Self::OctalNumeric => 8,
            Self::Eof => 10,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
            Self::Period => write!(f, "."),
            Self::Semicolon => write!(f, ";"),
            Self::Equal => write!(f, "="),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Bang => write!(f, "!"),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
            Self::NotEqual => write!(f, "!="),
            Self::GreaterEqual => write!(f, ">="),
            Self::LessEqual => write!(f, "<="),
            Self::Identifier => write!(f, "identifier"),
            Self::StringLiteral => write!(f, "string literal"),
            Self::DecimalNumeric => write!(f, "decimal numeric literal"),
            Self::HexNumeric => write!(f, "hex numeric literal"),
            Self::BinaryNumeric => write!(f, "binary numeric literal"),
            Self::OctalNumeric => write!(f, "octal numeric literal"),
            Self::Keyword(keyword) => write!(f, "{}", keyword.lexeme()),
            Self::Eof => write!(f, "<eof>"),
            Self::Error => write!(f, "<error>"),
        }
    }
}

/// Trivia represents non-semantic content between tokens.
///
/// Preserving trivia lets formatting tools reconstruct source code exactly
/// and keeps comments attached to the tokens they annotate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trivia {
    /// Whitespace (spaces, tabs, newlines).
    Whitespace(EcoString),

    /// A line comment: `-- comment text`
    LineComment(EcoString),

    /// A block comment: `/* comment text */`
    BlockComment(EcoString),

    /// Source text absorbed during parser error recovery. When a stray token
    /// is deleted, its full text lands here so the stream stays lossless.
    Skipped(EcoString),
}

impl Trivia {
    /// Returns the verbatim text of this trivia.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Whitespace(s) | Self::LineComment(s) | Self::BlockComment(s) | Self::Skipped(s) => {
                s
            }
        }
    }

    /// Returns `true` if this trivia contains a newline.
    #[must_use]
    pub fn contains_newline(&self) -> bool {
        self.as_str().contains('\n')
    }

    /// Returns `true` if this is a comment.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment(_) | Self::BlockComment(_))
    }
}

/// A token with its source text, location, and surrounding trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: EcoString,
    span: Span,
    line_col: LineCol,
    leading_trivia: Vec<Trivia>,
    trailing_trivia: Vec<Trivia>,
}

impl Token {
    /// Creates a new token with no trivia.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<EcoString>, span: Span, line_col: LineCol) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            line_col,
            leading_trivia: Vec::new(),
            trailing_trivia: Vec::new(),
        }
    }

    /// Creates a new token with trivia.
    #[must_use]
    pub fn with_trivia(
        kind: TokenKind,
        text: impl Into<EcoString>,
        span: Span,
        line_col: LineCol,
        leading_trivia: Vec<Trivia>,
        trailing_trivia: Vec<Trivia>,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            line_col,
            leading_trivia,
            trailing_trivia,
        }
    }

    /// Creates a zero-width synthetic token, used when error recovery decides
    /// to insert an expected token rather than delete the current one.
    ///
    /// Synthetic tokens carry no text, so the round-trip invariant is
    /// unaffected; the unparser falls back to the canonical keyword lexeme
    /// when it meets one.
    #[must_use]
    pub fn synthetic(kind: TokenKind, offset: u32, line_col: LineCol) -> Self {
        Self {
            kind,
            text: EcoString::new(),
            span: Span::empty(offset),
            line_col,
            leading_trivia: Vec::new(),
            trailing_trivia: Vec::new(),
        }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the verbatim source text of this token.
    ///
    /// For quoted strings and identifiers this includes the quotes; use
    /// [`Token::unquoted`] for the inner value.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the token text with one layer of `'`, `"`, or backtick quoting
    /// removed, if present.
    #[must_use]
    pub fn unquoted(&self) -> &str {
        let text = self.text.as_str();
        for quote in ['\'', '"', '`'] {
            if let Some(rest) = text.strip_prefix(quote) {
                return rest.strip_suffix(quote).unwrap_or(rest);
            }
        }
        text
    }

    /// Returns the source span of this token (excluding trivia).
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the 1-based line/column of the token start.
    #[must_use]
    pub fn line_col(&self) -> LineCol {
        self.line_col
    }

    /// Returns the trivia that precedes this token.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading_trivia
    }

    /// Returns the trivia that follows this token.
    #[must_use]
    pub fn trailing_trivia(&self) -> &[Trivia] {
        &self.trailing_trivia
    }

    /// Returns `true` if this token has any attached comments.
    #[must_use]
    pub fn has_comment(&self) -> bool {
        self.leading_trivia.iter().any(Trivia::is_comment)
            || self.trailing_trivia.iter().any(Trivia::is_comment)
    }

    /// Returns `leading trivia + text + trailing trivia` as written in the
    /// source.
    #[must_use]
    pub fn to_source_string(&self) -> String {
        let mut out = String::new();
        for trivia in &self.leading_trivia {
            out.push_str(trivia.as_str());
        }
        out.push_str(&self.text);
        for trivia in &self.trailing_trivia {
            out.push_str(trivia.as_str());
        }
        out
    }

    /// Absorbs a deleted token into this token's leading trivia.
    ///
    /// Error recovery calls this when it decides `stray` should not have been
    /// in the stream: the stray token's entire source text (trivia included)
    /// is prepended so the token stream still reconstructs the input.
    pub fn absorb_stray(&mut self, stray: Token) {
        let mut leading = stray.leading_trivia;
        if !stray.text.is_empty() {
            leading.push(Trivia::Skipped(stray.text));
        }
        leading.extend(stray.trailing_trivia);
        leading.append(&mut self.leading_trivia);
        self.leading_trivia = leading;
    }

    /// A short description of the token for diagnostics: the text when there
    /// is any, the kind otherwise.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.text.is_empty() {
            self.kind.to_string()
        } else {
            self.text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_index_is_bidirectional() {
        for lexeme in ["create", "table", "without", "rowid", "autoincrement"] {
            let keyword = Keyword::from_lexeme(lexeme).unwrap();
            assert_eq!(keyword.lexeme(), lexeme);
        }
    }

    #[test]
    fn keyword_temp_aliases_temporary() {
        assert_eq!(Keyword::from_lexeme("temp"), Some(Keyword::Temporary));
        assert_eq!(Keyword::from_lexeme("temporary"), Some(Keyword::Temporary));
    }

    #[test]
    fn keyword_unknown_lexeme() {
        assert_eq!(Keyword::from_lexeme("users"), None);
        assert_eq!(Keyword::from_lexeme(""), None);
    }

    #[test]
    fn constraint_starting_keywords() {
        assert!(Keyword::Constraint.starts_constraint());
        assert!(Keyword::Primary.starts_constraint());
        assert!(Keyword::Generated.starts_constraint());
        assert!(!Keyword::Table.starts_constraint());
        assert!(!Keyword::Where.starts_constraint());
    }

    #[test]
    fn token_kind_display() {
        assert_eq!(TokenKind::LeftParen.to_string(), "(");
        assert_eq!(TokenKind::NotEqual.to_string(), "!=");
        assert_eq!(TokenKind::Identifier.to_string(), "identifier");
        assert_eq!(TokenKind::Keyword(Keyword::Null).to_string(), "null");
        assert_eq!(TokenKind::Eof.to_string(), "<eof>");
    }

    #[test]
    fn insertion_cheaper_for_keywords_than_identifiers() {
        assert!(
            TokenKind::Keyword(Keyword::Null).insertion_cost()
                < TokenKind::Identifier.insertion_cost()
        );
    }

    #[test]
    fn deletion_cheaper_for_punctuation_than_identifiers() {
        assert!(TokenKind::Comma.deletion_cost() < TokenKind::Identifier.deletion_cost());
    }

    #[test]
    fn token_unquoted() {
        let lc = LineCol::default();
        let token = Token::new(TokenKind::StringLiteral, "'hello'", Span::new(0, 7), lc);
        assert_eq!(token.unquoted(), "hello");

        let token = Token::new(TokenKind::Identifier, "\"my col\"", Span::new(0, 8), lc);
        assert_eq!(token.unquoted(), "my col");

        let token = Token::new(TokenKind::Identifier, "plain", Span::new(0, 5), lc);
        assert_eq!(token.unquoted(), "plain");
    }

    #[test]
    fn token_source_string_round_trip() {
        let token = Token::with_trivia(
            TokenKind::Identifier,
            "users",
            Span::new(2, 7),
            LineCol::default(),
            vec![Trivia::Whitespace("  ".into())],
            vec![Trivia::LineComment("-- the table".into()), Trivia::Whitespace("\n".into())],
        );
        assert_eq!(token.to_source_string(), "  users-- the table\n");
    }

    #[test]
    fn absorb_stray_preserves_all_text() {
        let mut real = Token::with_trivia(
            TokenKind::RightParen,
            ")",
            Span::new(10, 11),
            LineCol::default(),
            vec![Trivia::Whitespace(" ".into())],
            vec![],
        );
        let stray = Token::with_trivia(
            TokenKind::Comma,
            ",",
            Span::new(8, 9),
            LineCol::default(),
            vec![Trivia::Whitespace(" ".into())],
            vec![],
        );
        real.absorb_stray(stray);
        assert_eq!(real.to_source_string(), " , )");
    }

    #[test]
    fn synthetic_token_is_zero_width() {
        let token = Token::synthetic(
            TokenKind::Keyword(Keyword::Null),
            42,
            LineCol::new(3, 7),
        );
        assert!(token.span().is_empty());
        assert_eq!(token.span().start(), 42);
        assert_eq!(token.text(), "");
        assert_eq!(token.describe(), "null");
    }
}
