// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for SQL schema source.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written for maximum control over error recovery and trivia
//! attribution.
//!
//! # Design Principles
//!
//! - **Error recovery**: Never panic on malformed input; emit
//!   [`TokenKind::Error`] and keep going
//! - **Trivia preservation**: Whitespace and comments attach to tokens so
//!   `leading + text + trailing` reconstructs the source verbatim
//! - **Precise spans**: Every token carries its exact source location,
//!   addressed in code points (the byte cursor never leaves the lexer)
//!
//! # Trivia attribution
//!
//! Leading trivia absorbs any amount of whitespace (newlines included) and
//! comments before a token. Trailing trivia absorbs same-line whitespace and
//! comments and stops after consuming a single newline, so each line's
//! trailing comment belongs to the last token on that line.

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{LineCol, Span, Token, TokenKind, Trivia};

/// A streaming lexer over a fixed source buffer.
///
/// Exposes [`next_token`](Lexer::next_token), [`peek`](Lexer::peek), and
/// [`eof`](Lexer::eof). The lexer always makes progress: every call to
/// `next_token` either consumes at least one character or returns EOF.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position, used only for slicing the UTF-8 buffer.
    position: usize,
    /// Code points consumed so far; token spans are addressed in these.
    offset: u32,
    /// Current 1-based line number.
    line: u32,
    /// Byte offset of the start of the current line.
    line_start: usize,
    /// Trivia collected but not yet attached to a token.
    pending_trivia: Vec<Trivia>,
    /// One-token lookahead buffer.
    peeked: Option<Token>,
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
            offset: 0,
            line: 1,
            line_start: 0,
            pending_trivia: Vec::new(),
            peeked: None,
        }
    }

    /// Returns the next token, consuming it.
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.peeked.take() {
            return token;
        }
        self.lex_token()
    }

    /// Returns the token that `next_token` would return, without consuming.
    pub fn peek(&mut self) -> &Token {
        if self.peeked.is_none() {
            let token = self.lex_token();
            self.peeked = Some(token);
        }
        self.peeked.as_ref().expect("peek buffer filled above")
    }

    /// Reports whether `next_token` would return EOF.
    pub fn eof(&mut self) -> bool {
        self.peek().kind().is_eof()
    }

    // ========================================================================
    // Character helpers
    // ========================================================================

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is the same as
    /// `peek_char`).
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
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.line_start = self.position;
        }
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    fn text_from(&self, start: usize) -> &'src str {
        &self.source[start..self.position]
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_line_col(&self) -> LineCol {
        let col = self.source[self.line_start..self.position].chars().count() as u32 + 1;
        LineCol::new(self.line, col)
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Collects whitespace and comments before a token, newlines included.
    fn collect_leading_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    let start = self.position;
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                    let text = self.text_from(start);
                    self.pending_trivia.push(Trivia::Whitespace(EcoString::from(text)));
                }
                Some('-') if self.peek_char_n(1) == Some('-') => {
                    self.lex_line_comment();
                }
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    self.lex_block_comment();
                }
                _ => break,
            }
        }
    }

    /// Collects same-line whitespace and comments after a token, stopping
    /// after a single newline is consumed.
    fn collect_trailing_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r') => {
                    let start = self.position;
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r'));
                    let text = self.text_from(start);
                    self.pending_trivia.push(Trivia::Whitespace(EcoString::from(text)));
                }
                Some('\n') => {
                    self.advance();
                    self.pending_trivia.push(Trivia::Whitespace(EcoString::from("\n")));
                    break;
                }
                Some('-') if self.peek_char_n(1) == Some('-') => {
                    self.lex_line_comment();
                }
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    self.lex_block_comment();
                }
                _ => break,
            }
        }
    }

    /// Lexes a line comment: `-- ...` up to (not including) the newline.
    fn lex_line_comment(&mut self) {
        let start = self.position;
        self.advance(); // -
        self.advance(); // -
        self.advance_while(|c| c != '\n');
        let text = self.text_from(start);
        self.pending_trivia.push(Trivia::LineComment(EcoString::from(text)));
    }

    /// Lexes a block comment: `/* ... */`. Nested comments are not
    /// supported; an unterminated comment runs to EOF.
    fn lex_block_comment(&mut self) {
        let start = self.position;
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

        let text = self.text_from(start);
        self.pending_trivia.push(Trivia::BlockComment(EcoString::from(text)));
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    fn lex_token(&mut self) -> Token {
        self.collect_leading_trivia();
        let leading_trivia = std::mem::take(&mut self.pending_trivia);

        let start_byte = self.position;
        let start_offset = self.offset;
        let line_col = self.current_line_col();

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => self.lex_token_kind(c),
        };

        let span = Span::new(start_offset, self.offset);
        let text = EcoString::from(self.text_from(start_byte));

        self.collect_trailing_trivia();
        let trailing_trivia = std::mem::take(&mut self.pending_trivia);

        Token::with_trivia(kind, text, span, line_col, leading_trivia, trailing_trivia)
    }

    fn lex_token_kind(&mut self, c: char) -> TokenKind {
        match c {
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '=' => self.single(TokenKind::Equal),
            '+' => self.single(TokenKind::Plus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            // A `--` here is impossible: leading trivia already claimed it.
            '-' => self.single(TokenKind::Minus),

            '!' => self.maybe_equal(TokenKind::Bang, TokenKind::NotEqual),
            '>' => self.maybe_equal(TokenKind::Greater, TokenKind::GreaterEqual),
            '<' => self.maybe_equal(TokenKind::Less, TokenKind::LessEqual),

            '\'' => self.lex_quoted('\'', TokenKind::StringLiteral),
            '"' => self.lex_quoted('"', TokenKind::Identifier),
            '`' => self.lex_quoted('`', TokenKind::Identifier),

            '.' => {
                if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.lex_decimal()
                } else {
                    self.single(TokenKind::Period)
                }
            }

            '0' => match self.peek_char_n(1) {
                Some('x' | 'X') => self.lex_radix(TokenKind::HexNumeric, |c| {
                    c.is_ascii_hexdigit() || c == '_'
                }),
                Some('b' | 'B') => self.lex_radix(TokenKind::BinaryNumeric, |c| {
                    matches!(c, '0' | '1' | '_')
                }),
                Some('0') => self.lex_radix(TokenKind::OctalNumeric, |c| {
                    matches!(c, '0'..='7' | '_')
                }),
                _ => self.lex_decimal(),
            },
            '1'..='9' => self.lex_decimal(),

            c if is_identifier_start(c) => self.lex_identifier_or_keyword(),

            // Unknown character - error recovery
            _ => {
                self.advance();
                TokenKind::Error
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn maybe_equal(&mut self, bare: TokenKind, with_equal: TokenKind) -> TokenKind {
        self.advance();
        if self.peek_char() == Some('=') {
            self.advance();
            with_equal
        } else {
            bare
        }
    }

    /// Lexes a quoted string or identifier. Backslash escapes the closing
    /// quote. Unterminated quotes produce an [`TokenKind::Error`] token
    /// spanning to EOF.
    fn lex_quoted(&mut self, quote: char, kind: TokenKind) -> TokenKind {
        self.advance(); // opening quote
        let mut prev = '\0';
        loop {
            match self.peek_char() {
                None => return TokenKind::Error,
                Some(c) if c == quote && prev != '\\' => {
                    self.advance();
                    return kind;
                }
                Some(c) => {
                    self.advance();
                    prev = c;
                }
            }
        }
    }

    /// Lexes a decimal numeric: digits with at most one `.`, at most one
    /// `e`, and an optional trailing `f`.
    fn lex_decimal(&mut self) -> TokenKind {
        let mut has_period = false;
        let mut has_exponent = false;

        loop {
            match self.peek_char() {
                Some('.') if !has_period => {
                    self.advance();
                    has_period = true;
                }
                Some('e') if !has_exponent => {
                    self.advance();
                    has_exponent = true;
                }
                Some(c) if c.is_ascii_digit() => {
                    self.advance();
                }
                _ => break,
            }
        }

        if self.peek_char() == Some('f') {
            self.advance();
        }

        TokenKind::DecimalNumeric
    }

    /// Lexes a radix literal (`0x…`, `0b…`, `00…`): two prefix characters
    /// then digits of the given class, underscores allowed as separators.
    fn lex_radix(&mut self, kind: TokenKind, digit: impl Fn(char) -> bool) -> TokenKind {
        self.advance(); // 0
        self.advance(); // x / b / 0
        self.advance_while(digit);
        kind
    }

    fn lex_identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.position;
        self.advance_while(|c| c.is_alphanumeric() || c == '_');
        let text = self.text_from(start);

        match super::Keyword::from_lexeme(&text.to_lowercase()) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier,
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Lexes the entire source, returning every token including the final EOF.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind().is_eof();
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}
