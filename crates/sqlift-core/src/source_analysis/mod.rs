// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source analysis: lexing and parsing of SQLite schema DDL.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. Each
//! token carries its source location via [`Span`] plus leading and trailing
//! [`Trivia`], so the token stream reconstructs the source exactly — the
//! property the formatter depends on.
//!
//! # Parsing
//!
//! The [`parse`] function converts a [`SourceFile`] into a statement list
//! plus diagnostics. Parsing never fails outright: error recovery produces
//! a best-effort tree and a deduplicated set of [`Report`]s.
//!
//! ```
//! use sqlift_core::source_analysis::{SourceFile, parse};
//!
//! let file = SourceFile::new("schema.sql", "PRAGMA foreign_keys = ON;");
//! let (statements, reports) = parse(&file);
//! assert_eq!(statements.len(), 1);
//! assert!(reports.is_empty());
//! ```
//!
//! [`Report`]: crate::diagnostics::Report

mod lexer;
mod parser;
mod span;
mod token;

#[cfg(test)]
mod lexer_property_tests;

pub use lexer::{Lexer, lex_with_eof};
pub use parser::{Fatal, Parser, parse};
pub use span::{LineCol, Span};
pub use token::{Keyword, Token, TokenKind, Trivia};

use ecow::EcoString;

/// A named, read-only source buffer.
///
/// The file name is used only for diagnostics. The text is shared by
/// reference among tokens, AST nodes, and the diagnostic renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name shown in diagnostic snippet headers.
    pub name: EcoString,
    /// The full source text.
    pub text: String,
}

impl SourceFile {
    /// Creates a new source file.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Converts a code-point [`Span`] into a byte-addressed
    /// [`miette::SourceSpan`].
    ///
    /// Spans in this crate follow the data model and address code points;
    /// miette labels address bytes, so the conversion needs the buffer.
    #[must_use]
    pub fn byte_span(&self, span: Span) -> miette::SourceSpan {
        let start = span.start() as usize;
        let end = span.end() as usize;

        let mut byte_start = self.text.len();
        let mut byte_end = self.text.len();
        for (count, (byte_offset, _)) in self.text.char_indices().enumerate() {
            if count == start {
                byte_start = byte_offset;
            }
            if count == end {
                byte_end = byte_offset;
                break;
            }
        }

        (byte_start, byte_end - byte_start).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_span_converts_code_points_to_bytes() {
        let file = SourceFile::new("s.sql", "café x");
        // `x` is code point 5 but byte 6 because of the two-byte `é`.
        let span = file.byte_span(Span::new(5, 6));
        assert_eq!(span.offset(), 6);
        assert_eq!(span.len(), 1);
    }

    #[test]
    fn byte_span_is_identity_for_ascii() {
        let file = SourceFile::new("s.sql", "PRAGMA x;");
        let span = file.byte_span(Span::new(7, 8));
        assert_eq!(span.offset(), 7);
        assert_eq!(span.len(), 1);
    }

    #[test]
    fn byte_span_at_end_of_buffer() {
        let file = SourceFile::new("s.sql", "café");
        let span = file.byte_span(Span::empty(4));
        assert_eq!(span.offset(), 5);
        assert_eq!(span.len(), 0);
    }
}
