// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! sqlift core: a SQLite schema parser and diff front-end.
//!
//! This crate turns SQL DDL text into a concrete syntax tree that keeps
//! enough lexical fidelity for three consumers:
//!
//! - **Diagnostics** — tokens carry precise spans; the parser recovers from
//!   errors and reports them with parse-context labels
//! - **Migration diff** — AST nodes implement a structural-equivalence
//!   contract ([`ast::Equivalent`]) that ignores trivia
//! - **Formatting** — tokens carry leading/trailing trivia and AST nodes
//!   emit into a layout [`Document`](unparse::Document) protocol
//!
//! The pipeline: source text → [`source_analysis::Lexer`] →
//! [`source_analysis::parse`] → AST + diagnostics.

pub mod ast;
pub mod diagnostics;
pub mod source_analysis;
pub mod unparse;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Equivalent, Expr, Statement};
    pub use crate::diagnostics::{Renderer, Report, Severity};
    pub use crate::source_analysis::{SourceFile, Span, parse};
}
