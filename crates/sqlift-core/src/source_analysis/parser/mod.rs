// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for SQLite schema DDL.
//!
//! The parser builds an AST from the token stream. It is designed for diff
//! and formatting use, so error recovery is mandatory: parsing always
//! produces a best-effort tree plus a deduplicated set of diagnostics.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** — the parser MUST always produce an AST
//! - **Multiple errors** — report all errors, don't stop at the first
//! - **One diagnostic per location** — reports are keyed by source range;
//!   a second error at the same range means recovery is going in circles,
//!   so the enclosing statement is abandoned and parsing resynchronizes at
//!   the next `;`
//! - **Parse contexts** — every non-terminal pushes a named context; when a
//!   parse fails, the diagnostic says what was being attempted
//!
//! # Recovery at `expect`
//!
//! When `expect(kind)` meets the wrong token it reports, then repairs:
//!
//! 1. If the *next* token matches, the current one is extraneous: its text
//!    is folded into the next token's leading trivia (lossless) and the
//!    real token is consumed.
//! 2. Otherwise an insertion/deletion cost heuristic decides between
//!    synthesizing a zero-width token of the expected kind and deleting the
//!    current token. Keywords synthesize cheaply; identifiers and literals
//!    never do.

use std::collections::BTreeMap;

use ecow::eco_format;
use tracing::debug;

use crate::ast::Statement;
use crate::diagnostics::Report;
use crate::source_analysis::{Lexer, SourceFile, Span, Token, TokenKind};

mod expressions;
mod statements;


/// Sentinel for a locally-aborted subtree: a second error was reported at a
/// source range that already holds one. The statement loop catches it and
/// resynchronizes at the next `;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fatal;

pub(crate) type ParseResult<T> = Result<T, Fatal>;

/// One entry of the parse-context stack.
#[derive(Debug, Clone)]
struct ParseContext {
    name: &'static str,
    #[expect(dead_code, reason = "kept for context-ranged labels in diagnostics work")]
    start: Span,
}

/// Parses a source file into statements plus diagnostics.
///
/// This is the main entry point. It always returns a statement list, even
/// in the presence of errors; callers must inspect the reports before
/// trusting the tree for diff purposes.
///
/// # Examples
///
/// ```
/// use sqlift_core::source_analysis::{SourceFile, parse};
///
/// let file = SourceFile::new("schema.sql", "CREATE TABLE t (id INTEGER);");
/// let (statements, reports) = parse(&file);
/// assert_eq!(statements.len(), 1);
/// assert!(reports.is_empty());
/// ```
#[must_use]
pub fn parse(file: &SourceFile) -> (Vec<Statement>, Vec<Report>) {
    debug!(file = %file.name, "parsing sql schema");
    let mut parser = Parser::new(&file.text);
    let statements = parser.statements();
    let reports = parser.into_reports();
    (statements, reports)
}

/// The parser state: current/lookahead tokens, context stack, and the
/// deduplicating diagnostic maps.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    pub(crate) current: Token,
    pub(crate) peeked: Token,
    /// Span of the most recently consumed token; used to close node spans.
    pub(crate) previous_span: Span,
    context: Vec<ParseContext>,
    errors: BTreeMap<Span, Report>,
    warnings: BTreeMap<Span, Report>,
}

impl<'src> Parser<'src> {
    /// Creates a parser over the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        let peeked = lexer.next_token();
        Self {
            lexer,
            current,
            peeked,
            previous_span: Span::default(),
            context: Vec::new(),
            errors: BTreeMap::new(),
            warnings: BTreeMap::new(),
        }
    }

    /// Consumes all accumulated diagnostics, ordered by source range.
    #[must_use]
    pub fn into_reports(self) -> Vec<Report> {
        let mut all: Vec<(Span, Report)> = self
            .errors
            .into_iter()
            .chain(self.warnings)
            .collect();
        all.sort_by_key(|(span, _)| *span);
        all.into_iter().map(|(_, report)| report).collect()
    }

    /// Returns the number of error reports so far.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the current depth of the parse-context stack.
    ///
    /// Zero before and after any public entry point; every push is matched
    /// by a pop on every exit path.
    #[must_use]
    pub fn context_depth(&self) -> usize {
        self.context.len()
    }

    // ========================================================================
    // Token management
    // ========================================================================

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current.kind()
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.current.kind().is_eof()
    }

    /// Consumes the current token and returns it, refilling the lookahead.
    pub(crate) fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        let newly_current = std::mem::replace(&mut self.peeked, next);
        let consumed = std::mem::replace(&mut self.current, newly_current);
        self.previous_span = consumed.span();
        consumed
    }

    /// Consumes the current token if it has the given kind.
    pub(crate) fn maybe_token(&mut self, kind: TokenKind) -> Option<Token> {
        if self.current.kind() == kind {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expects the current token to have the given kind, recovering when it
    /// does not. See the module docs for the recovery ladder.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.current.kind() == kind {
            return Ok(self.advance());
        }

        let mut report = Report::error("parse error").with_label(
            self.current.span(),
            eco_format!("expected '{}' got '{}'", kind, self.current.describe()),
        );
        for context in self.context.iter().rev() {
            report = report.with_note(eco_format!("attempting to parse {}", context.name));
        }
        self.report_error(report)?;

        // The current token is extraneous and the real one is right behind
        // it: fold the stray into the real token's leading trivia.
        if self.peeked.kind() == kind {
            let stray = self.advance();
            self.current.absorb_stray(stray);
            return Ok(self.advance());
        }

        if kind.insertion_cost() <= self.current.kind().deletion_cost() {
            return Ok(Token::synthetic(
                kind,
                self.current.span().start(),
                self.current.line_col(),
            ));
        }

        // Delete the current token, splicing it into its successor.
        let stray = self.advance();
        self.current.absorb_stray(stray);
        Ok(self.current.clone())
    }

    /// Advances until one of `kinds` is found (consuming it) or EOF.
    pub(crate) fn synchronize(&mut self, kinds: &[TokenKind]) {
        while !self.at_eof() {
            if kinds.contains(&self.current.kind()) {
                self.advance();
                return;
            }
            self.advance();
        }
    }

    // ========================================================================
    // Diagnostics & context
    // ========================================================================

    /// Runs `f` under a named parse context. The context is popped on every
    /// exit path, sentinel propagation included.
    pub(crate) fn with_context<T>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.context.push(ParseContext {
            name,
            start: self.current.span(),
        });
        let result = f(self);
        self.context.pop();
        result
    }

    /// Records an error keyed at the current token's range. A second error
    /// at the same range aborts the subtree.
    pub(crate) fn report_error(&mut self, report: Report) -> ParseResult<()> {
        self.report_error_at(self.current.span(), report)
    }

    /// Records an error keyed at the given range.
    pub(crate) fn report_error_at(&mut self, span: Span, report: Report) -> ParseResult<()> {
        if self.errors.contains_key(&span) {
            return Err(Fatal);
        }
        self.errors.insert(span, report);
        Ok(())
    }

    /// Records a warning keyed at the current token's range.
    pub(crate) fn report_warning(&mut self, report: Report) {
        self.warnings.insert(self.current.span(), report);
    }

    /// Builds a parse-error report labelled at the current token.
    pub(crate) fn error_here(&self, note: impl Into<ecow::EcoString>) -> Report {
        Report::error("parse error").with_label(self.current.span(), note)
    }

    // ========================================================================
    // Statement loop
    // ========================================================================

    /// Parses statements until EOF. Each statement runs under a recovery
    /// guard: a fatal subtree abort resynchronizes at the next `;` and
    /// parsing continues with the following statement.
    pub fn statements(&mut self) -> Vec<Statement> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            match self.terminated_statement() {
                Ok(Some(statement)) => statements.push(statement),
                Ok(None) => {}
                Err(Fatal) => self.synchronize(&[TokenKind::Semicolon]),
            }
        }
        statements
    }

    fn terminated_statement(&mut self) -> ParseResult<Option<Statement>> {
        let statement = self.statement()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        ColumnConstraint, Expr, ForeignKeyActionKind, ForeignKeyEvent, DeferrableMode,
        SortDirection, Statement, TableConstraint,
    };
    use crate::diagnostics::Severity;

    fn parse_source(source: &str) -> (Vec<Statement>, Vec<Report>) {
        let file = SourceFile::new("test.sql", source);
        parse(&file)
    }

    /// Helper to parse a string and assert no diagnostics.
    fn parse_ok(source: &str) -> Vec<Statement> {
        let (statements, reports) = parse_source(source);
        assert!(
            reports.is_empty(),
            "expected no diagnostics, got: {reports:#?}"
        );
        statements
    }

    /// Helper to parse a string expecting diagnostics.
    fn parse_err(source: &str) -> (Vec<Statement>, Vec<Report>) {
        let (statements, reports) = parse_source(source);
        assert!(!reports.is_empty(), "expected diagnostics for {source:?}");
        (statements, reports)
    }

    /// Helper that tolerates warnings (e.g. unnamed table constraints) but
    /// no errors.
    fn parse_no_errors(source: &str) -> Vec<Statement> {
        let (statements, reports) = parse_source(source);
        let errors: Vec<_> = reports
            .iter()
            .filter(|report| report.severity == Severity::Error)
            .collect();
        assert!(errors.is_empty(), "expected no errors, got: {errors:#?}");
        statements
    }

    fn first_table(source: &str) -> crate::ast::CreateTable {
        match parse_no_errors(source).into_iter().next() {
            Some(Statement::CreateTable(table)) => table,
            other => panic!("expected CreateTable, got {other:?}"),
        }
    }

    #[test]
    fn create_table_with_column_constraints() {
        let table =
            first_table("CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);");
        assert_eq!(table.name.object.name, "t");
        assert!(table.if_not_exists.is_none());
        assert_eq!(table.definition.columns.len(), 2);
        assert!(table.definition.constraints.is_empty());

        let id = &table.definition.columns[0];
        assert_eq!(id.name.name, "id");
        assert_eq!(id.type_name.name.name, "INTEGER");
        assert_eq!(id.constraints.len(), 1);
        match &id.constraints[0] {
            ColumnConstraint::PrimaryKey(pk) => {
                assert!(pk.is_autoincrement());
                assert!(pk.order.is_none());
                assert!(pk.conflict.is_none());
            }
            other => panic!("expected primary key, got {other:?}"),
        }

        let name = &table.definition.columns[1];
        assert!(matches!(name.constraints[0], ColumnConstraint::NotNull(_)));
        assert!(!table.options.is_strict());
        assert!(!table.options.is_without_row_id());
    }

    #[test]
    fn create_table_if_not_exists_qualified_composite_key() {
        let table =
            first_table("CREATE TABLE IF NOT EXISTS s.t (a INT, b INT, PRIMARY KEY(a,b)) WITHOUT ROWID;");
        assert!(table.if_not_exists.is_some());
        assert_eq!(table.name.qualified_name("main"), "\"s\".\"t\"");
        assert_eq!(table.definition.columns.len(), 2);
        assert_eq!(table.definition.constraints.len(), 1);
        match &table.definition.constraints[0] {
            TableConstraint::PrimaryKey(pk) => {
                assert_eq!(pk.columns.len(), 2);
                assert!(pk.autoincrement.is_none());
            }
            other => panic!("expected primary key, got {other:?}"),
        }
        assert!(table.options.is_without_row_id());
    }

    #[test]
    fn foreign_key_clause_with_actions_and_deferrability() {
        let table = first_table(
            "CREATE TABLE c (x INT, FOREIGN KEY(x) REFERENCES p(x) \
             ON DELETE CASCADE ON UPDATE NO ACTION DEFERRABLE INITIALLY DEFERRED);",
        );
        let TableConstraint::ForeignKey(fk) = &table.definition.constraints[0] else {
            panic!("expected foreign key");
        };
        assert_eq!(fk.columns.len(), 1);
        assert_eq!(fk.clause.foreign_table.object.name, "p");
        assert_eq!(fk.clause.columns.len(), 1);
        assert_eq!(fk.clause.actions.len(), 2);
        assert_eq!(fk.clause.actions[0].event, ForeignKeyEvent::Delete);
        assert_eq!(fk.clause.actions[0].action.kind, ForeignKeyActionKind::Cascade);
        assert_eq!(fk.clause.actions[1].event, ForeignKeyEvent::Update);
        assert_eq!(fk.clause.actions[1].action.kind, ForeignKeyActionKind::NoAction);
        let deferrable = fk.clause.deferrable.as_ref().unwrap();
        assert!(!deferrable.is_not());
        assert_eq!(deferrable.initially, Some(DeferrableMode::Deferred));
    }

    #[test]
    fn pragma_with_boolean_on() {
        let statements = parse_ok("PRAGMA foreign_keys = ON;");
        let Statement::Pragma(pragma) = &statements[0] else {
            panic!("expected pragma");
        };
        assert_eq!(pragma.name.object.name, "foreign_keys");
        assert!(matches!(pragma.value, Expr::Boolean { value: true, .. }));
    }

    #[test]
    fn pragma_parenthesized_value() {
        let statements = parse_ok("PRAGMA cache_size(2000);");
        let Statement::Pragma(pragma) = &statements[0] else {
            panic!("expected pragma");
        };
        assert!(matches!(pragma.value, Expr::Integer { value: 2000, .. }));
    }

    #[test]
    fn unique_index_with_expression_and_where() {
        let statements =
            parse_ok("CREATE UNIQUE INDEX IF NOT EXISTS i ON t(lower(name)) WHERE active = 1;");
        let Statement::CreateIndex(index) = &statements[0] else {
            panic!("expected index");
        };
        assert!(index.is_unique());
        assert!(index.if_not_exists.is_some());
        assert_eq!(index.table.object.name, "t");
        assert_eq!(index.columns.len(), 1);
        match &index.columns[0].subject {
            Expr::FunctionCall { name, args, .. } => {
                assert_eq!(name.name, "lower");
                assert_eq!(args.len(), 1);
                assert!(matches!(&args[0], Expr::Identifier(id) if id.name == "name"));
            }
            other => panic!("expected function call, got {other:?}"),
        }
        match index.where_expr.as_ref().unwrap() {
            Expr::BinaryOp { op, lhs, rhs } => {
                assert_eq!(op.text(), "=");
                assert!(matches!(&**lhs, Expr::Identifier(id) if id.name == "active"));
                assert!(matches!(&**rhs, Expr::Integer { value: 1, .. }));
            }
            other => panic!("expected binary op, got {other:?}"),
        }
    }

    #[test]
    fn indexed_column_with_collation_and_order() {
        let statements = parse_ok("CREATE INDEX i ON t(name COLLATE nocase DESC);");
        let Statement::CreateIndex(index) = &statements[0] else {
            panic!("expected index");
        };
        let column = &index.columns[0];
        assert_eq!(column.collation.as_ref().unwrap().name.name, "nocase");
        assert_eq!(
            column.order.as_ref().unwrap().direction,
            SortDirection::Desc
        );
    }

    #[test]
    fn create_virtual_table_collects_opaque_args() {
        let statements =
            parse_ok("CREATE VIRTUAL TABLE ft USING fts5(content, tokenize = 'porter');");
        let Statement::CreateVirtualTable(vt) = &statements[0] else {
            panic!("expected virtual table");
        };
        assert_eq!(vt.module.name, "fts5");
        assert_eq!(vt.args.len(), 2);
        assert_eq!(vt.args[0], "content");
        assert!(vt.args[1].starts_with("tokenize"));
    }

    #[test]
    fn create_view_skips_select_body() {
        let statements =
            parse_ok("CREATE VIEW v (a, b) AS SELECT x, y FROM t WHERE x > 1;");
        let Statement::CreateView(view) = &statements[0] else {
            panic!("expected view");
        };
        assert_eq!(view.name.object.name, "v");
        assert_eq!(view.columns.len(), 2);
    }

    #[test]
    fn create_trigger_body_is_opaque() {
        let statements = parse_ok(
            "CREATE TRIGGER trg AFTER INSERT ON t BEGIN SELECT 1; END;\nCREATE TABLE u (x INT);",
        );
        assert_eq!(statements.len(), 2);
        assert!(matches!(statements[0], Statement::CreateTrigger(_)));
        assert!(matches!(statements[1], Statement::CreateTable(_)));
    }

    #[test]
    fn begin_and_commit() {
        let statements = parse_ok("BEGIN TRANSACTION;\nCREATE TABLE t (x INT);\nCOMMIT;");
        assert!(matches!(statements[0], Statement::BeginTransaction(_)));
        assert!(matches!(statements[2], Statement::CommitTransaction(_)));
    }

    #[test]
    fn temporary_table_and_view() {
        let statements = parse_ok("CREATE TEMPORARY TABLE t (x INT);");
        let Statement::CreateTable(table) = &statements[0] else {
            panic!("expected table");
        };
        assert!(table.temporary_token.is_some());

        let statements = parse_ok("CREATE TEMP VIEW v AS SELECT 1;");
        assert!(matches!(statements[0], Statement::CreateView(_)));
    }

    #[test]
    fn generated_column_both_forms() {
        let table = first_table(
            "CREATE TABLE t (a INT, b INT GENERATED ALWAYS AS (a * 2) STORED, c INT AS (a + 1));",
        );
        let ColumnConstraint::Generated(generated) = &table.definition.columns[1].constraints[0]
        else {
            panic!("expected generated constraint");
        };
        assert!(generated.generated_tokens.is_some());
        assert!(generated.storage.is_some());

        let ColumnConstraint::Generated(short_form) = &table.definition.columns[2].constraints[0]
        else {
            panic!("expected generated constraint");
        };
        assert!(short_form.generated_tokens.is_none());
        assert!(short_form.storage.is_none());
    }

    #[test]
    fn case_expression_in_check() {
        let table = first_table(
            "CREATE TABLE t (x INT, CHECK (CASE WHEN x > 0 THEN 1 ELSE 0 END = 1));",
        );
        let TableConstraint::Check(check) = &table.definition.constraints[0] else {
            panic!("expected check constraint");
        };
        let Expr::BinaryOp { lhs, .. } = &check.expr else {
            panic!("expected binary op");
        };
        assert!(matches!(&**lhs, Expr::Case(_)));
    }

    #[test]
    fn qualified_column_names_in_expressions() {
        let statements = parse_ok("CREATE INDEX i ON t(a.b, s.t.c);");
        let Statement::CreateIndex(index) = &statements[0] else {
            panic!("expected index");
        };
        match &index.columns[0].subject {
            Expr::ColumnName { schema, table, column } => {
                assert!(schema.is_none());
                assert_eq!(table.as_ref().unwrap().name, "a");
                assert_eq!(column.name, "b");
            }
            other => panic!("expected column name, got {other:?}"),
        }
        match &index.columns[1].subject {
            Expr::ColumnName { schema, table, column } => {
                assert_eq!(schema.as_ref().unwrap().name, "s");
                assert_eq!(table.as_ref().unwrap().name, "t");
                assert_eq!(column.name, "c");
            }
            other => panic!("expected column name, got {other:?}"),
        }
    }

    #[test]
    fn tuple_expression_in_check() {
        let table = first_table("CREATE TABLE t (x INT, CHECK (x IN (1, 2, 3)));");
        let TableConstraint::Check(check) = &table.definition.constraints[0] else {
            panic!("expected check");
        };
        let Expr::BinaryOp { op, rhs, .. } = &check.expr else {
            panic!("expected binary op");
        };
        assert_eq!(op.text().to_lowercase(), "in");
        match &**rhs {
            Expr::List(items) => assert_eq!(items.len(), 3),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn precedence_multiplication_binds_tighter() {
        let table = first_table("CREATE TABLE t (x INT, CHECK (x = 1 + 2 * 3));");
        let TableConstraint::Check(check) = &table.definition.constraints[0] else {
            panic!("expected check");
        };
        // x = (1 + (2 * 3))
        let Expr::BinaryOp { op, rhs, .. } = &check.expr else {
            panic!("expected =");
        };
        assert_eq!(op.text(), "=");
        let Expr::BinaryOp { op, rhs: mul, .. } = &**rhs else {
            panic!("expected +");
        };
        assert_eq!(op.text(), "+");
        let Expr::BinaryOp { op, .. } = &**mul else {
            panic!("expected *");
        };
        assert_eq!(op.text(), "*");
    }

    #[test]
    fn recovery_synthesizes_missing_null() {
        // Scenario: `NOT` without `NULL` before `)`. One diagnostic, the
        // NOT NULL constraint still materializes, and the next statement
        // parses cleanly.
        let (statements, reports) = parse_err(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT );\nCREATE TABLE u (x INT);",
        );
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Error);
        assert!(
            reports[0].labels[0].note.contains("expected 'null'"),
            "got: {}",
            reports[0].labels[0].note
        );

        assert_eq!(statements.len(), 2);
        let Statement::CreateTable(table) = &statements[0] else {
            panic!("expected table");
        };
        assert!(matches!(
            table.definition.columns[1].constraints[0],
            ColumnConstraint::NotNull(_)
        ));
        assert!(matches!(statements[1], Statement::CreateTable(_)));
    }

    #[test]
    fn recovery_folds_extraneous_token() {
        // A stray identifier before `(`: the next token matches what the
        // parser expected, so the stray is folded into its leading trivia
        // and parsing continues losslessly.
        let (statements, reports) = parse_err("CREATE TABLE t x (a INT);");
        assert_eq!(reports.len(), 1);
        let Statement::CreateTable(table) = &statements[0] else {
            panic!("expected table");
        };
        assert_eq!(table.definition.columns.len(), 1);
        assert!(
            table
                .definition
                .l_paren
                .leading_trivia()
                .iter()
                .any(|trivia| trivia.as_str().contains('x')),
            "stray token text not preserved in trivia"
        );
    }

    #[test]
    fn unknown_statement_start_recovers_at_semicolon() {
        let (statements, reports) =
            parse_err("42 GO BANANAS;\nCREATE TABLE t (x INT);");
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Statement::CreateTable(_)));
        assert!(
            reports[0].labels[0]
                .note
                .contains("unknown token at start of sql statement"),
            "got: {}",
            reports[0].labels[0].note
        );
    }

    #[test]
    fn diagnostics_are_deduplicated_by_range() {
        let (_, reports) = parse_err("CREATE TABLE t (;");
        let mut spans: Vec<_> = reports.iter().filter_map(Report::primary_span).collect();
        let before = spans.len();
        spans.dedup();
        assert_eq!(spans.len(), before, "duplicate diagnostic ranges");
    }

    #[test]
    fn expect_error_names_parse_context() {
        let (_, reports) = parse_err("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT );");
        assert!(
            reports[0]
                .notes
                .iter()
                .any(|note| note.contains("attempting to parse")),
            "got: {:?}",
            reports[0].notes
        );
    }

    #[test]
    fn unnamed_table_constraint_warns() {
        let (_, reports) = parse_source("CREATE TABLE t (x INT, PRIMARY KEY(x));");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Warning);
        assert!(reports[0].message.contains("unnamed table constraint"));
        // Named constraints do not warn.
        let (_, reports) = parse_source("CREATE TABLE t (x INT, CONSTRAINT pk PRIMARY KEY(x));");
        assert!(reports.is_empty());
    }

    #[test]
    fn autoincrement_composite_key_takes_single_column() {
        let table = first_table("CREATE TABLE t (a INT, PRIMARY KEY(a AUTOINCREMENT));");
        let TableConstraint::PrimaryKey(pk) = &table.definition.constraints[0] else {
            panic!("expected primary key");
        };
        assert_eq!(pk.columns.len(), 1);
        assert!(pk.autoincrement.is_some());
    }

    #[test]
    fn context_stack_is_balanced_after_parsing() {
        for source in [
            "CREATE TABLE t (x INT);",
            "CREATE TABLE broken (;",
            "PRAGMA x = ;",
            ";;;",
            "CREATE",
        ] {
            let mut parser = Parser::new(source);
            let _ = parser.statements();
            assert_eq!(parser.context_depth(), 0, "unbalanced for {source:?}");
        }
    }

    #[test]
    fn conflict_clause_on_column_primary_key() {
        let table = first_table("CREATE TABLE t (id INTEGER PRIMARY KEY ON CONFLICT REPLACE);");
        let ColumnConstraint::PrimaryKey(pk) = &table.definition.columns[0].constraints[0] else {
            panic!("expected primary key");
        };
        assert!(pk.conflict.is_some());
    }

    #[test]
    fn column_default_values() {
        let table = first_table(
            "CREATE TABLE t (a INT DEFAULT 0, b TEXT DEFAULT 'x', c INT DEFAULT TRUE, \
             d TEXT DEFAULT NULL, e TEXT DEFAULT some_func);",
        );
        let defaults: Vec<&Expr> = table
            .definition
            .columns
            .iter()
            .map(|column| match &column.constraints[0] {
                ColumnConstraint::Default(d) => &d.value,
                other => panic!("expected default, got {other:?}"),
            })
            .collect();
        assert!(matches!(defaults[0], Expr::Integer { value: 0, .. }));
        assert!(matches!(defaults[1], Expr::String { .. }));
        assert!(matches!(defaults[2], Expr::Boolean { value: true, .. }));
        assert!(matches!(defaults[3], Expr::Null(_)));
        assert!(matches!(defaults[4], Expr::Identifier(_)));
    }

    #[test]
    fn statements_terminate_on_garbage() {
        // Termination, not correctness, is the property here.
        for source in ["(((((", ")))));;;", "CREATE CREATE CREATE", "'", "§§§"] {
            let file = SourceFile::new("garbage.sql", source);
            let (_, _) = parse(&file);
        }
    }

    #[test]
    fn strict_and_without_rowid_in_any_order() {
        let table = first_table("CREATE TABLE t (x INT) STRICT, WITHOUT ROWID;");
        assert!(table.options.is_strict());
        assert!(table.options.is_without_row_id());

        let table = first_table("CREATE TABLE t (x INT) WITHOUT ROWID STRICT;");
        assert!(table.options.is_strict());
        assert!(table.options.is_without_row_id());
    }

    #[test]
    fn numeric_literal_values() {
        let table = first_table(
            "CREATE TABLE t (a INT DEFAULT 0xFF, b INT DEFAULT 0b101, c INT DEFAULT 00777, \
             d REAL DEFAULT 3.14e2);",
        );
        let values: Vec<&Expr> = table
            .definition
            .columns
            .iter()
            .map(|column| match &column.constraints[0] {
                ColumnConstraint::Default(d) => &d.value,
                other => panic!("expected default, got {other:?}"),
            })
            .collect();
        assert!(matches!(values[0], Expr::Integer { value: 255, .. }));
        assert!(matches!(values[1], Expr::Integer { value: 5, .. }));
        assert!(matches!(values[2], Expr::Integer { value: 511, .. }));
        match values[3] {
            Expr::Float { value, .. } => assert!((value - 314.0).abs() < f64::EPSILON),
            other => panic!("expected float, got {other:?}"),
        }
    }
}
