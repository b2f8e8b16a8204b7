// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing: CREATE TABLE/INDEX/VIEW/TRIGGER/VIRTUAL TABLE,
//! PRAGMA, and transaction statements.
//!
//! Each non-terminal runs under a named parse context so diagnostics can
//! say what was being attempted. SELECT bodies and trigger bodies are
//! recognized and skipped; their contents belong to other tools.

use ecow::{EcoString, eco_format};

use crate::ast::{
    BeginTransaction, CatalogObjectIdentifier, CheckConstraint, Collation, ColumnCollate,
    ColumnConstraint, ColumnDefault, ColumnDefinition, ColumnGenerated, ColumnNotNull,
    ColumnPrimaryKey, ColumnUnique, CommitTransaction, ConflictAction, ConflictClause,
    ConstraintName, CreateIndex, CreateTable, CreateTrigger, CreateView, CreateVirtualTable,
    Deferrable, DeferrableMode, Expr, ForeignKeyAction, ForeignKeyActionKind, ForeignKeyClause,
    ForeignKeyEvent, ForeignKeyTrigger, GeneratedStorage, Identifier, IfNotExists, IndexedColumn,
    Pragma, Select, SortDirection, SortOrder, Statement, StorageMode, TableConstraint,
    TableDefinition, TableForeignKey, TableOptions, TablePrimaryKey, TypeName, WithoutRowId,
};
use crate::source_analysis::{Keyword, Token, TokenKind};

use super::{ParseResult, Parser};

/// Shorthand for keyword token kinds.
const fn kw(keyword: Keyword) -> TokenKind {
    TokenKind::Keyword(keyword)
}

impl Parser<'_> {
    /// Dispatches one statement on the current token.
    ///
    /// Returns `Ok(None)` when the statement could not be started; an error
    /// has been reported and the caller's `;` expectation drives recovery.
    pub(crate) fn statement(&mut self) -> ParseResult<Option<Statement>> {
        self.with_context("statement", |p| match p.current_kind() {
            TokenKind::Keyword(Keyword::Pragma) => p.pragma_statement(),
            TokenKind::Keyword(Keyword::Create) => p.create_statement(),
            TokenKind::Keyword(Keyword::Begin) => p.begin_statement().map(Some),
            TokenKind::Keyword(Keyword::Commit) => {
                let commit_token = p.advance();
                let span = commit_token.span();
                Ok(Some(Statement::CommitTransaction(CommitTransaction {
                    commit_token,
                    span,
                })))
            }
            _ => {
                let report = p.error_here(eco_format!(
                    "unknown token at start of sql statement '{}'",
                    p.current.describe()
                ));
                p.report_error(report)?;
                Ok(None)
            }
        })
    }

    fn begin_statement(&mut self) -> ParseResult<Statement> {
        let begin_token = self.expect(kw(Keyword::Begin))?;
        let transaction_token = self.expect(kw(Keyword::Transaction))?;
        let span = begin_token.span().merge(transaction_token.span());
        Ok(Statement::BeginTransaction(BeginTransaction {
            begin_token,
            transaction_token,
            span,
        }))
    }

    // ========================================================================
    // PRAGMA
    // ========================================================================

    fn pragma_statement(&mut self) -> ParseResult<Option<Statement>> {
        self.with_context("pragma statement", |p| {
            let pragma_token = p.expect(kw(Keyword::Pragma))?;
            let name = p.catalog_object_identifier()?;

            match p.current_kind() {
                TokenKind::Equal => {
                    p.advance();
                    let value = p.pragma_value()?;
                    let span = pragma_token.span().merge(p.previous_span);
                    Ok(Some(Statement::Pragma(Pragma {
                        pragma_token,
                        name,
                        value,
                        span,
                    })))
                }
                TokenKind::LeftParen => {
                    p.advance();
                    let value = p.pragma_value()?;
                    let r_paren = p.expect(TokenKind::RightParen)?;
                    let span = pragma_token.span().merge(r_paren.span());
                    Ok(Some(Statement::Pragma(Pragma {
                        pragma_token,
                        name,
                        value,
                        span,
                    })))
                }
                _ => {
                    let report = p.error_here("unknown token after pragma identifier");
                    p.report_error(report)?;
                    Ok(None)
                }
            }
        })
    }

    fn pragma_value(&mut self) -> ParseResult<Expr> {
        self.with_context("pragma value", |p| match p.current_kind() {
            TokenKind::DecimalNumeric => {
                let token = p.advance();
                p.number_expr(token)
            }
            TokenKind::Identifier => {
                let token = p.advance();
                Ok(Expr::Identifier(Identifier::from_token(token)))
            }
            TokenKind::StringLiteral => {
                let token = p.advance();
                let value = EcoString::from(token.unquoted());
                Ok(Expr::String { token, value })
            }
            TokenKind::Keyword(Keyword::True | Keyword::On) => {
                let token = p.advance();
                Ok(Expr::Boolean { token, value: true })
            }
            TokenKind::Keyword(Keyword::False) => {
                let token = p.advance();
                Ok(Expr::Boolean {
                    token,
                    value: false,
                })
            }
            _ => {
                let span = p.current.span();
                let report = p.error_here("unknown token for pragma value");
                p.report_error(report)?;
                // Assume we got a value when the terminator is next, to
                // keep the parser going.
                if p.peeked.kind() == TokenKind::Semicolon {
                    p.advance();
                }
                Ok(Expr::Error(span))
            }
        })
    }

    // ========================================================================
    // CREATE dispatch
    // ========================================================================

    fn create_statement(&mut self) -> ParseResult<Option<Statement>> {
        self.with_context("create statement", |p| {
            let create_token = p.expect(kw(Keyword::Create))?;

            match p.current_kind() {
                TokenKind::Keyword(Keyword::Table) => {
                    p.create_table_statement(create_token, None).map(Some)
                }
                TokenKind::Keyword(Keyword::View) => {
                    p.create_view_statement(create_token, None).map(Some)
                }
                TokenKind::Keyword(Keyword::Trigger) => {
                    p.create_trigger_statement(create_token, None).map(Some)
                }
                TokenKind::Keyword(Keyword::Index) => {
                    p.create_index_statement(create_token, false).map(Some)
                }
                TokenKind::Keyword(Keyword::Unique) => {
                    p.create_index_statement(create_token, true).map(Some)
                }
                TokenKind::Keyword(Keyword::Virtual) => {
                    p.create_virtual_table_statement(create_token).map(Some)
                }
                TokenKind::Keyword(Keyword::Temporary) => p.create_temporary_statement(create_token),
                _ => {
                    let report = p.error_here("unknown token for create statement");
                    p.report_error(report)?;
                    Ok(None)
                }
            }
        })
    }

    fn create_temporary_statement(
        &mut self,
        create_token: Token,
    ) -> ParseResult<Option<Statement>> {
        self.with_context("create temporary statement", |p| {
            let temporary_token = p.expect(kw(Keyword::Temporary))?;

            match p.current_kind() {
                TokenKind::Keyword(Keyword::Table) => p
                    .create_table_statement(create_token, Some(temporary_token))
                    .map(Some),
                TokenKind::Keyword(Keyword::View) => p
                    .create_view_statement(create_token, Some(temporary_token))
                    .map(Some),
                TokenKind::Keyword(Keyword::Trigger) => p
                    .create_trigger_statement(create_token, Some(temporary_token))
                    .map(Some),
                _ => {
                    let report = p.error_here("unexpected token after 'temporary' keyword");
                    p.report_error(report)?;
                    Ok(None)
                }
            }
        })
    }

    // ========================================================================
    // CREATE TABLE
    // ========================================================================

    fn create_table_statement(
        &mut self,
        create_token: Token,
        temporary_token: Option<Token>,
    ) -> ParseResult<Statement> {
        self.with_context("create table statement", |p| {
            let table_token = p.expect(kw(Keyword::Table))?;
            let if_not_exists = p.maybe_if_not_exists()?;
            let name = p.catalog_object_identifier()?;
            let definition = p.table_definition()?;
            let options = p.table_options()?;

            let span = create_token.span().merge(p.previous_span);
            Ok(Statement::CreateTable(CreateTable {
                create_token,
                temporary_token,
                table_token,
                if_not_exists,
                name,
                definition,
                options,
                span,
            }))
        })
    }

    fn table_definition(&mut self) -> ParseResult<TableDefinition> {
        self.with_context("table definition", |p| {
            let l_paren = p.expect(TokenKind::LeftParen)?;
            let columns = p.column_definitions()?;
            let constraints = p.table_constraints()?;
            let r_paren = p.expect(TokenKind::RightParen)?;
            Ok(TableDefinition {
                l_paren,
                columns,
                constraints,
                r_paren,
            })
        })
    }

    fn column_definitions(&mut self) -> ParseResult<Vec<ColumnDefinition>> {
        self.with_context("column definitions", |p| {
            let mut definitions = Vec::new();
            while !p.at_eof() {
                match p.current_kind() {
                    TokenKind::Comma => {
                        p.advance();
                    }
                    TokenKind::RightParen => break,
                    TokenKind::Keyword(keyword) if keyword.starts_constraint() => break,
                    _ => definitions.push(p.column_definition()?),
                }
            }
            Ok(definitions)
        })
    }

    fn column_definition(&mut self) -> ParseResult<ColumnDefinition> {
        self.with_context("column definition", |p| {
            let name = p.identifier()?;
            let type_name = p.type_name()?;
            let constraints = p.column_constraints()?;
            let span = name.span().merge(p.previous_span);
            Ok(ColumnDefinition {
                name,
                type_name,
                constraints,
                span,
            })
        })
    }

    fn type_name(&mut self) -> ParseResult<TypeName> {
        self.with_context("type name", |p| {
            let name = p.identifier()?;
            Ok(TypeName { name })
        })
    }

    // ========================================================================
    // Column constraints
    // ========================================================================

    fn column_constraints(&mut self) -> ParseResult<Vec<ColumnConstraint>> {
        self.with_context("column constraints", |p| {
            let mut constraints = Vec::new();
            while !p.at_eof() {
                match p.current_kind() {
                    TokenKind::Comma | TokenKind::RightParen => break,
                    _ => {
                        if let Some(constraint) = p.column_constraint()? {
                            constraints.push(constraint);
                        }
                    }
                }
            }
            Ok(constraints)
        })
    }

    fn column_constraint(&mut self) -> ParseResult<Option<ColumnConstraint>> {
        self.with_context("column constraint", |p| {
            let name = p.maybe_constraint_name()?;

            match p.current_kind() {
                TokenKind::Keyword(Keyword::Primary) => {
                    p.column_primary_key(name).map(Some)
                }
                TokenKind::Keyword(Keyword::Not) => p.column_not_null(name).map(Some),
                TokenKind::Keyword(Keyword::Default) => p.column_default(name).map(Some),
                TokenKind::Keyword(Keyword::Unique) => p.column_unique(name).map(Some),
                TokenKind::Keyword(Keyword::Collate) => p.column_collate(name).map(Some),
                TokenKind::Keyword(Keyword::Check) => {
                    p.check_constraint(name).map(|c| Some(ColumnConstraint::Check(c)))
                }
                TokenKind::Keyword(Keyword::As | Keyword::Generated) => {
                    p.column_generated(name).map(Some)
                }
                _ => {
                    let report = p.error_here("expected beginning of column constraint");
                    p.report_error(report)?;
                    Ok(None)
                }
            }
        })
    }

    fn column_primary_key(
        &mut self,
        name: Option<ConstraintName>,
    ) -> ParseResult<ColumnConstraint> {
        self.with_context("primary key column constraint", |p| {
            let primary_token = p.expect(kw(Keyword::Primary))?;
            let key_token = p.expect(kw(Keyword::Key))?;
            let order = p.maybe_order();
            let conflict = p.maybe_conflict_clause()?;
            let autoincrement = p.maybe_token(kw(Keyword::Autoincrement));

            Ok(ColumnConstraint::PrimaryKey(ColumnPrimaryKey {
                name,
                primary_token,
                key_token,
                order,
                conflict,
                autoincrement,
            }))
        })
    }

    fn column_not_null(&mut self, name: Option<ConstraintName>) -> ParseResult<ColumnConstraint> {
        self.with_context("not null column constraint", |p| {
            let not_token = p.expect(kw(Keyword::Not))?;
            let null_token = p.expect(kw(Keyword::Null))?;
            Ok(ColumnConstraint::NotNull(ColumnNotNull {
                name,
                not_token,
                null_token,
            }))
        })
    }

    fn column_default(&mut self, name: Option<ConstraintName>) -> ParseResult<ColumnConstraint> {
        self.with_context("default column constraint", |p| {
            let default_token = p.expect(kw(Keyword::Default))?;

            let value = match p.current_kind() {
                TokenKind::StringLiteral => {
                    let token = p.advance();
                    let value = EcoString::from(token.unquoted());
                    Expr::String { token, value }
                }
                kind if kind.is_numeric() => {
                    let token = p.advance();
                    p.number_expr(token)?
                }
                TokenKind::Keyword(Keyword::True) => {
                    let token = p.advance();
                    Expr::Boolean { token, value: true }
                }
                TokenKind::Keyword(Keyword::False) => {
                    let token = p.advance();
                    Expr::Boolean {
                        token,
                        value: false,
                    }
                }
                TokenKind::Keyword(Keyword::Null) => Expr::Null(p.advance()),
                TokenKind::Identifier => {
                    let token = p.advance();
                    Expr::Identifier(Identifier::from_token(token))
                }
                _ => {
                    let span = p.current.span();
                    let report = p.error_here("expected default value");
                    p.report_error(report)?;
                    Expr::Error(span)
                }
            };

            Ok(ColumnConstraint::Default(ColumnDefault {
                name,
                default_token,
                value,
            }))
        })
    }

    fn column_unique(&mut self, name: Option<ConstraintName>) -> ParseResult<ColumnConstraint> {
        self.with_context("unique column constraint", |p| {
            let unique_token = p.expect(kw(Keyword::Unique))?;
            Ok(ColumnConstraint::Unique(ColumnUnique { name, unique_token }))
        })
    }

    fn column_collate(&mut self, name: Option<ConstraintName>) -> ParseResult<ColumnConstraint> {
        self.with_context("collate column constraint", |p| {
            let collate_token = p.expect(kw(Keyword::Collate))?;
            let collation = p.identifier()?;
            Ok(ColumnConstraint::Collate(ColumnCollate {
                name,
                collate_token,
                collation,
            }))
        })
    }

    fn column_generated(&mut self, name: Option<ConstraintName>) -> ParseResult<ColumnConstraint> {
        self.with_context("generated column", |p| {
            let generated_tokens = if p.current_kind() == kw(Keyword::Generated) {
                let generated = p.advance();
                let always = p.expect(kw(Keyword::Always))?;
                Some((generated, always))
            } else {
                None
            };

            let as_token = p.expect(kw(Keyword::As))?;
            let l_paren = p.expect(TokenKind::LeftParen)?;
            let expr = p.expr(0)?;
            let r_paren = p.expect(TokenKind::RightParen)?;
            let storage = p.generated_storage();

            Ok(ColumnConstraint::Generated(ColumnGenerated {
                name,
                generated_tokens,
                as_token,
                l_paren,
                expr,
                r_paren,
                storage,
            }))
        })
    }

    fn generated_storage(&mut self) -> Option<GeneratedStorage> {
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Virtual) => Some(GeneratedStorage {
                token: self.advance(),
                mode: StorageMode::Virtual,
            }),
            TokenKind::Keyword(Keyword::Stored) => Some(GeneratedStorage {
                token: self.advance(),
                mode: StorageMode::Stored,
            }),
            _ => None,
        }
    }

    /// `CHECK ( expr )`, shared by column and table constraints.
    fn check_constraint(&mut self, name: Option<ConstraintName>) -> ParseResult<CheckConstraint> {
        self.with_context("check constraint", |p| {
            let check_token = p.expect(kw(Keyword::Check))?;
            let l_paren = p.expect(TokenKind::LeftParen)?;
            let expr = p.expr(0)?;
            let r_paren = p.expect(TokenKind::RightParen)?;
            Ok(CheckConstraint {
                name,
                check_token,
                l_paren,
                expr,
                r_paren,
            })
        })
    }

    fn maybe_constraint_name(&mut self) -> ParseResult<Option<ConstraintName>> {
        self.with_context("constraint name", |p| {
            if p.current_kind() != kw(Keyword::Constraint) {
                return Ok(None);
            }
            let constraint_token = p.advance();
            let name = p.identifier()?;
            Ok(Some(ConstraintName {
                constraint_token,
                name,
            }))
        })
    }

    // ========================================================================
    // Table constraints
    // ========================================================================

    fn table_constraints(&mut self) -> ParseResult<Vec<TableConstraint>> {
        self.with_context("table constraints", |p| {
            let mut constraints = Vec::new();
            while !p.at_eof() {
                match p.current_kind() {
                    TokenKind::RightParen => break,
                    TokenKind::Comma => {
                        p.advance();
                    }
                    _ => {
                        if let Some(constraint) = p.table_constraint()? {
                            constraints.push(constraint);
                        }
                    }
                }
            }
            Ok(constraints)
        })
    }

    fn table_constraint(&mut self) -> ParseResult<Option<TableConstraint>> {
        self.with_context("table constraint", |p| {
            let name = p.maybe_constraint_name()?;
            if name.is_none() {
                let report = crate::diagnostics::Report::warning("unnamed table constraint")
                    .with_label(p.current.span(), "CONSTRAINT constraint_name")
                    .with_note(
                        "by adding a constraint name, we can detect changes of table \
                         constraints, and migrate them appropriately.",
                    );
                p.report_warning(report);
            }

            match p.current_kind() {
                TokenKind::Keyword(Keyword::Primary) => p.table_primary_key(name).map(Some),
                TokenKind::Keyword(Keyword::Foreign) => p.table_foreign_key(name).map(Some),
                TokenKind::Keyword(Keyword::Check) => p
                    .check_constraint(name)
                    .map(|c| Some(TableConstraint::Check(c))),
                _ => {
                    let report = p.error_here("unexpected token for table constraint");
                    p.report_error(report)?;
                    Ok(None)
                }
            }
        })
    }

    fn table_primary_key(
        &mut self,
        name: Option<ConstraintName>,
    ) -> ParseResult<TableConstraint> {
        self.with_context("primary key table constraint", |p| {
            let primary_token = p.expect(kw(Keyword::Primary))?;
            let key_token = p.expect(kw(Keyword::Key))?;
            let l_paren = p.expect(TokenKind::LeftParen)?;

            // Take the first column by hand in case AUTOINCREMENT follows;
            // SQLite allows no further columns after it.
            let mut columns = vec![p.indexed_column(false)?];
            let autoincrement = p.maybe_token(kw(Keyword::Autoincrement));

            if autoincrement.is_none() {
                while !p.at_eof() {
                    match p.current_kind() {
                        TokenKind::Comma => {
                            p.advance();
                        }
                        TokenKind::RightParen => break,
                        _ => columns.push(p.indexed_column(false)?),
                    }
                }
            }

            let r_paren = p.expect(TokenKind::RightParen)?;
            let conflict = p.maybe_conflict_clause()?;

            Ok(TableConstraint::PrimaryKey(TablePrimaryKey {
                name,
                primary_token,
                key_token,
                l_paren,
                columns,
                autoincrement,
                r_paren,
                conflict,
            }))
        })
    }

    fn table_foreign_key(
        &mut self,
        name: Option<ConstraintName>,
    ) -> ParseResult<TableConstraint> {
        self.with_context("foreign key table constraint", |p| {
            let foreign_token = p.expect(kw(Keyword::Foreign))?;
            let key_token = p.expect(kw(Keyword::Key))?;
            let l_paren = p.expect(TokenKind::LeftParen)?;
            let columns = p.identifier_list()?;
            let r_paren = p.expect(TokenKind::RightParen)?;
            let clause = p.foreign_key_clause()?;

            Ok(TableConstraint::ForeignKey(TableForeignKey {
                name,
                foreign_token,
                key_token,
                l_paren,
                columns,
                r_paren,
                clause,
            }))
        })
    }

    /// Comma-separated identifiers, stopping at `)` (not consumed).
    fn identifier_list(&mut self) -> ParseResult<Vec<Identifier>> {
        let mut identifiers = Vec::new();
        while !self.at_eof() {
            match self.current_kind() {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RightParen => break,
                _ => identifiers.push(self.identifier()?),
            }
        }
        Ok(identifiers)
    }

    fn foreign_key_clause(&mut self) -> ParseResult<ForeignKeyClause> {
        self.with_context("foreign key clause", |p| {
            let references_token = p.expect(kw(Keyword::References))?;
            let foreign_table = p.catalog_object_identifier()?;

            let mut l_paren = None;
            let mut r_paren = None;
            let mut columns = Vec::new();
            if p.current_kind() == TokenKind::LeftParen {
                l_paren = Some(p.advance());
                columns = p.identifier_list()?;
                r_paren = Some(p.expect(TokenKind::RightParen)?);
            }

            let mut actions = Vec::new();
            let mut match_token = None;
            let mut match_name = None;
            let mut deferrable = None;

            while !p.at_eof() {
                match p.current_kind() {
                    TokenKind::Keyword(Keyword::On) => {
                        if let Some(trigger) = p.foreign_key_trigger()? {
                            actions.push(trigger);
                        } else {
                            break;
                        }
                    }
                    TokenKind::Keyword(Keyword::Match) => {
                        match_token = Some(p.advance());
                        match_name = Some(p.identifier()?);
                    }
                    TokenKind::Keyword(Keyword::Not | Keyword::Deferrable) => {
                        deferrable = p.foreign_key_deferrable()?;
                        if deferrable.is_none() {
                            break;
                        }
                    }
                    _ => break,
                }
            }

            Ok(ForeignKeyClause {
                references_token,
                foreign_table,
                l_paren,
                columns,
                r_paren,
                actions,
                match_token,
                match_name,
                deferrable,
            })
        })
    }

    fn foreign_key_trigger(&mut self) -> ParseResult<Option<ForeignKeyTrigger>> {
        self.with_context("foreign key action trigger", |p| {
            let on_token = p.expect(kw(Keyword::On))?;

            let (event_token, event) = match p.current_kind() {
                TokenKind::Keyword(Keyword::Delete) => (p.advance(), ForeignKeyEvent::Delete),
                TokenKind::Keyword(Keyword::Update) => (p.advance(), ForeignKeyEvent::Update),
                _ => {
                    let report = p.error_here(
                        "expected action trigger keyword 'delete' or 'update' for fk action",
                    );
                    p.report_error(report)?;
                    return Ok(None);
                }
            };

            let Some(action) = p.foreign_key_action()? else {
                return Ok(None);
            };

            Ok(Some(ForeignKeyTrigger {
                on_token,
                event_token,
                event,
                action,
            }))
        })
    }

    fn foreign_key_action(&mut self) -> ParseResult<Option<ForeignKeyAction>> {
        self.with_context("foreign key action", |p| match p.current_kind() {
            TokenKind::Keyword(Keyword::Cascade) => Ok(Some(ForeignKeyAction {
                tokens: vec![p.advance()],
                kind: ForeignKeyActionKind::Cascade,
            })),
            TokenKind::Keyword(Keyword::Restrict) => Ok(Some(ForeignKeyAction {
                tokens: vec![p.advance()],
                kind: ForeignKeyActionKind::Restrict,
            })),
            TokenKind::Keyword(Keyword::No) => {
                let no = p.advance();
                let action = p.expect(kw(Keyword::Action))?;
                Ok(Some(ForeignKeyAction {
                    tokens: vec![no, action],
                    kind: ForeignKeyActionKind::NoAction,
                }))
            }
            TokenKind::Keyword(Keyword::Set) => {
                let set = p.advance();
                match p.current_kind() {
                    TokenKind::Keyword(Keyword::Default) => Ok(Some(ForeignKeyAction {
                        tokens: vec![set, p.advance()],
                        kind: ForeignKeyActionKind::SetDefault,
                    })),
                    TokenKind::Keyword(Keyword::Null) => Ok(Some(ForeignKeyAction {
                        tokens: vec![set, p.advance()],
                        kind: ForeignKeyActionKind::SetNull,
                    })),
                    _ => {
                        let report =
                            p.error_here("expected keyword 'default' or 'null' for fk action 'set'");
                        p.report_error(report)?;
                        Ok(None)
                    }
                }
            }
            _ => {
                let report = p.error_here(
                    "expected fk action method 'cascade', 'restrict', 'no action', \
                     'set default' or 'set null'",
                );
                p.report_error(report)?;
                Ok(None)
            }
        })
    }

    fn foreign_key_deferrable(&mut self) -> ParseResult<Option<Deferrable>> {
        self.with_context("foreign key deferrable", |p| {
            let not_token = p.maybe_token(kw(Keyword::Not));
            let deferrable_token = p.expect(kw(Keyword::Deferrable))?;

            let mut initially_token = None;
            let mut mode_token = None;
            let mut initially = None;
            if p.current_kind() == kw(Keyword::Initially) {
                initially_token = Some(p.advance());
                match p.current_kind() {
                    TokenKind::Keyword(Keyword::Immediate) => {
                        mode_token = Some(p.advance());
                        initially = Some(DeferrableMode::Immediate);
                    }
                    TokenKind::Keyword(Keyword::Deferred) => {
                        mode_token = Some(p.advance());
                        initially = Some(DeferrableMode::Deferred);
                    }
                    _ => {
                        let report = p.error_here(
                            "expected deferrable keyword 'immediate' or 'deferred' after 'initially'",
                        );
                        p.report_error(report)?;
                        return Ok(None);
                    }
                }
            }

            Ok(Some(Deferrable {
                not_token,
                deferrable_token,
                initially_token,
                mode_token,
                initially,
            }))
        })
    }

    fn table_options(&mut self) -> ParseResult<TableOptions> {
        self.with_context("table options", |p| {
            let mut options = TableOptions::default();
            while !p.at_eof() {
                match p.current_kind() {
                    TokenKind::Keyword(Keyword::Strict) => {
                        options.strict = Some(p.advance());
                    }
                    TokenKind::Keyword(Keyword::Without) => {
                        let without_token = p.advance();
                        let rowid_token = p.expect(kw(Keyword::Rowid))?;
                        options.without_row_id = Some(WithoutRowId {
                            without_token,
                            rowid_token,
                        });
                    }
                    // Options may optionally be comma-separated.
                    TokenKind::Comma
                        if matches!(
                            p.peeked.kind(),
                            TokenKind::Keyword(Keyword::Strict | Keyword::Without)
                        ) =>
                    {
                        p.advance();
                    }
                    _ => break,
                }
            }
            Ok(options)
        })
    }

    fn maybe_conflict_clause(&mut self) -> ParseResult<Option<ConflictClause>> {
        self.with_context("conflict clause", |p| {
            if p.current_kind() != kw(Keyword::On) {
                return Ok(None);
            }
            let on_token = p.advance();
            let conflict_token = p.expect(kw(Keyword::Conflict))?;

            let action = match p.current_kind() {
                TokenKind::Keyword(Keyword::Rollback) => ConflictAction::Rollback,
                TokenKind::Keyword(Keyword::Abort) => ConflictAction::Abort,
                TokenKind::Keyword(Keyword::Fail) => ConflictAction::Fail,
                TokenKind::Keyword(Keyword::Ignore) => ConflictAction::Ignore,
                TokenKind::Keyword(Keyword::Replace) => ConflictAction::Replace,
                _ => {
                    let report = p.error_here("expected conflict clause verb");
                    p.report_error(report)?;
                    return Ok(None);
                }
            };
            let action_token = p.advance();

            Ok(Some(ConflictClause {
                on_token,
                conflict_token,
                action_token,
                action,
            }))
        })
    }

    /// Consumes `ASC` or `DESC` when present, else leaves the current token
    /// untouched.
    fn maybe_order(&mut self) -> Option<SortOrder> {
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Asc) => Some(SortOrder {
                token: self.advance(),
                direction: SortDirection::Asc,
            }),
            TokenKind::Keyword(Keyword::Desc) => Some(SortOrder {
                token: self.advance(),
                direction: SortDirection::Desc,
            }),
            _ => None,
        }
    }

    fn maybe_collation(&mut self) -> ParseResult<Option<Collation>> {
        if self.current_kind() != kw(Keyword::Collate) {
            return Ok(None);
        }
        let collate_token = self.advance();
        let name = self.identifier()?;
        Ok(Some(Collation {
            collate_token,
            name,
        }))
    }

    fn maybe_if_not_exists(&mut self) -> ParseResult<Option<IfNotExists>> {
        self.with_context("if not exists", |p| {
            if p.current_kind() != kw(Keyword::If) {
                return Ok(None);
            }
            let if_token = p.advance();
            let not_token = p.expect(kw(Keyword::Not))?;
            let exists_token = p.expect(kw(Keyword::Exists))?;
            Ok(Some(IfNotExists {
                if_token,
                not_token,
                exists_token,
            }))
        })
    }

    pub(crate) fn catalog_object_identifier(&mut self) -> ParseResult<CatalogObjectIdentifier> {
        self.with_context("catalog object identifier", |p| {
            let schema_or_object = p.identifier()?;

            if p.current_kind() != TokenKind::Period {
                return Ok(CatalogObjectIdentifier {
                    schema: None,
                    object: schema_or_object,
                });
            }
            p.advance();

            let object = p.identifier()?;
            Ok(CatalogObjectIdentifier {
                schema: Some(schema_or_object),
                object,
            })
        })
    }

    pub(crate) fn identifier(&mut self) -> ParseResult<Identifier> {
        self.with_context("identifier", |p| {
            let token = p.expect(TokenKind::Identifier)?;
            Ok(Identifier::from_token(token))
        })
    }

    pub(crate) fn indexed_column(&mut self, allow_expressions: bool) -> ParseResult<IndexedColumn> {
        self.with_context("indexed column", |p| {
            let subject = if allow_expressions {
                p.expr(0)?
            } else {
                Expr::Identifier(p.identifier()?)
            };
            let collation = p.maybe_collation()?;
            let order = p.maybe_order();
            Ok(IndexedColumn {
                subject,
                collation,
                order,
            })
        })
    }

    // ========================================================================
    // CREATE INDEX
    // ========================================================================

    fn create_index_statement(
        &mut self,
        create_token: Token,
        is_unique: bool,
    ) -> ParseResult<Statement> {
        self.with_context("create index statement", |p| {
            let unique_token = if is_unique {
                Some(p.expect(kw(Keyword::Unique))?)
            } else {
                None
            };
            let index_token = p.expect(kw(Keyword::Index))?;
            let if_not_exists = p.maybe_if_not_exists()?;
            let name = p.catalog_object_identifier()?;
            let on_token = p.expect(kw(Keyword::On))?;
            let table = p.catalog_object_identifier()?;

            let l_paren = p.expect(TokenKind::LeftParen)?;
            let mut columns = Vec::new();
            while !p.at_eof() {
                match p.current_kind() {
                    TokenKind::Comma => {
                        p.advance();
                    }
                    TokenKind::RightParen => break,
                    _ => columns.push(p.indexed_column(true)?),
                }
            }
            let r_paren = p.expect(TokenKind::RightParen)?;

            let mut where_token = None;
            let mut where_expr = None;
            if p.current_kind() == kw(Keyword::Where) {
                where_token = Some(p.advance());
                where_expr = Some(p.expr(0)?);
            }

            let span = create_token.span().merge(p.previous_span);
            Ok(Statement::CreateIndex(CreateIndex {
                create_token,
                unique_token,
                index_token,
                if_not_exists,
                name,
                on_token,
                table,
                l_paren,
                columns,
                r_paren,
                where_token,
                where_expr,
                span,
            }))
        })
    }

    // ========================================================================
    // CREATE VIRTUAL TABLE
    // ========================================================================

    fn create_virtual_table_statement(&mut self, create_token: Token) -> ParseResult<Statement> {
        self.with_context("create virtual table statement", |p| {
            let virtual_token = p.expect(kw(Keyword::Virtual))?;
            let table_token = p.expect(kw(Keyword::Table))?;
            let if_not_exists = p.maybe_if_not_exists()?;
            let name = p.catalog_object_identifier()?;
            let using_token = p.expect(kw(Keyword::Using))?;
            let module = p.identifier()?;

            // Module arguments are opaque: raw source text split on commas.
            let mut args = Vec::new();
            if p.current_kind() == TokenKind::LeftParen {
                p.advance();
                let mut text = String::new();
                while !p.at_eof() {
                    match p.current_kind() {
                        TokenKind::Comma => {
                            p.advance();
                            args.push(EcoString::from(text.trim()));
                            text.clear();
                        }
                        TokenKind::RightParen => {
                            if !text.trim().is_empty() {
                                args.push(EcoString::from(text.trim()));
                            }
                            text.clear();
                            break;
                        }
                        _ => {
                            let token = p.advance();
                            text.push_str(&token.to_source_string());
                        }
                    }
                }
                p.expect(TokenKind::RightParen)?;
            }

            let span = create_token.span().merge(p.previous_span);
            Ok(Statement::CreateVirtualTable(CreateVirtualTable {
                create_token,
                virtual_token,
                table_token,
                if_not_exists,
                name,
                using_token,
                module,
                args,
                span,
            }))
        })
    }

    // ========================================================================
    // CREATE VIEW / SELECT
    // ========================================================================

    fn create_view_statement(
        &mut self,
        create_token: Token,
        temporary_token: Option<Token>,
    ) -> ParseResult<Statement> {
        self.with_context("create view statement", |p| {
            let view_token = p.expect(kw(Keyword::View))?;
            let if_not_exists = p.maybe_if_not_exists()?;
            let name = p.catalog_object_identifier()?;

            let mut columns = Vec::new();
            if p.current_kind() == TokenKind::LeftParen {
                p.advance();
                columns = p.identifier_list()?;
                p.expect(TokenKind::RightParen)?;
            }

            let as_token = p.expect(kw(Keyword::As))?;
            let select = p.select_statement()?;

            let span = create_token.span().merge(p.previous_span);
            Ok(Statement::CreateView(CreateView {
                create_token,
                temporary_token,
                view_token,
                if_not_exists,
                name,
                columns,
                as_token,
                select,
                span,
            }))
        })
    }

    /// Recognizes `SELECT` and skips the body up to (not consuming) `;`.
    fn select_statement(&mut self) -> ParseResult<Select> {
        self.with_context("select statement", |p| {
            let select_token = p.expect(kw(Keyword::Select))?;
            while !p.at_eof() && p.current_kind() != TokenKind::Semicolon {
                p.advance();
            }
            let span = select_token.span().merge(p.previous_span);
            Ok(Select { select_token, span })
        })
    }

    // ========================================================================
    // CREATE TRIGGER
    // ========================================================================

    /// Consumes a trigger as an opaque region: header tokens up to `BEGIN`,
    /// the body up to `;`, then everything up to and including `END`.
    fn create_trigger_statement(
        &mut self,
        create_token: Token,
        temporary_token: Option<Token>,
    ) -> ParseResult<Statement> {
        self.with_context("create trigger statement", |p| {
            let trigger_token = p.expect(kw(Keyword::Trigger))?;

            while !p.at_eof() && p.current_kind() != kw(Keyword::Begin) {
                p.advance();
            }
            if !p.at_eof() {
                p.advance(); // BEGIN
            }
            while !p.at_eof() && p.current_kind() != TokenKind::Semicolon {
                p.advance();
            }
            if !p.at_eof() {
                p.advance(); // ;
            }
            while !p.at_eof() && p.current_kind() != kw(Keyword::End) {
                p.advance();
            }
            if !p.at_eof() {
                p.advance(); // END
            }

            let span = create_token.span().merge(p.previous_span);
            Ok(Statement::CreateTrigger(CreateTrigger {
                create_token,
                temporary_token,
                trigger_token,
                span,
            }))
        })
    }
}
