// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! AST emission into the layout [`Document`] protocol.
//!
//! Statements render back to SQL through [`ToDoc`]. Keyword tokens emit
//! their original source text (casing preserved); tokens synthesized by
//! error recovery fall back to the canonical lexeme. Identifiers emit
//! through the [`Document::Identifier`] primitive, which double-quotes.
//!
//! Only the statements the migration pipeline rewrites render fully:
//! CREATE TABLE (with every constraint form), CREATE INDEX, PRAGMA, and the
//! transaction statements. The opaque statements (views, triggers, virtual
//! tables, SELECT) return [`UnparseError::Unsupported`], which callers
//! treat as an error.

mod document;

pub use document::{
    DEFAULT_LINE_WIDTH, Document, Documentable, INDENT, anchor, concat, group, indent, join, line,
    nil,
};

use thiserror::Error;

use crate::ast::{
    CatalogObjectIdentifier, CheckConstraint, ColumnConstraint, ColumnDefinition, ConflictClause,
    ConstraintName, Deferrable, Expr, ForeignKeyClause, ForeignKeyTrigger, Identifier,
    IfNotExists, IndexedColumn, SortOrder, Statement, TableConstraint, TableDefinition,
    TableOptions,
};
use crate::docvec;
use crate::source_analysis::Token;

/// Failure to emit an AST node into the layout protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnparseError {
    /// The statement kind has no renderer; its body is opaque to this crate.
    #[error("rendering {0} is not implemented")]
    Unsupported(&'static str),
}

/// Emission of an AST node into a [`Document`].
pub trait ToDoc {
    /// Builds the document for this node.
    fn to_doc(&self) -> Result<Document<'static>, UnparseError>;
}

/// The token's source text, or the canonical lexeme for synthesized tokens.
fn token_text(token: &Token) -> Document<'static> {
    if token.text().is_empty() {
        if let Some(keyword) = token.kind().keyword() {
            return Document::String(keyword.lexeme().to_uppercase());
        }
        return Document::String(token.kind().to_string());
    }
    Document::String(token.text().to_string())
}

fn ident_doc(identifier: &Identifier) -> Document<'static> {
    Document::Identifier(identifier.name.to_string())
}

impl ToDoc for Statement {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        match self {
            Self::CreateTable(create) => create_table_doc(create),
            Self::CreateIndex(index) => create_index_doc(index),
            Self::Pragma(pragma) => {
                let value = pragma.value.to_doc()?;
                Ok(docvec![
                    token_text(&pragma.pragma_token),
                    Document::Space,
                    pragma.name.to_doc()?,
                    Document::Space,
                    Document::Rune('='),
                    Document::Space,
                    value,
                ])
            }
            Self::BeginTransaction(begin) => Ok(docvec![
                token_text(&begin.begin_token),
                Document::Space,
                token_text(&begin.transaction_token),
            ]),
            Self::CommitTransaction(commit) => Ok(token_text(&commit.commit_token)),
            Self::CreateView(_) => Err(UnparseError::Unsupported("create view statement")),
            Self::CreateVirtualTable(_) => {
                Err(UnparseError::Unsupported("create virtual table statement"))
            }
            Self::CreateTrigger(_) => Err(UnparseError::Unsupported("create trigger statement")),
            Self::Select(_) => Err(UnparseError::Unsupported("select statement")),
        }
    }
}

fn create_table_doc(
    create: &crate::ast::CreateTable,
) -> Result<Document<'static>, UnparseError> {
    let mut docs = vec![token_text(&create.create_token)];
    if let Some(temporary) = &create.temporary_token {
        docs.push(Document::Space);
        docs.push(token_text(temporary));
    }
    docs.push(Document::Space);
    docs.push(token_text(&create.table_token));
    if let Some(if_not_exists) = &create.if_not_exists {
        docs.push(Document::Space);
        docs.push(if_not_exists.to_doc()?);
    }
    docs.push(Document::Space);
    docs.push(create.name.to_doc()?);
    docs.push(Document::Space);

    docs.push(Document::Rune('('));
    docs.push(indent(docvec![Document::Break, create.definition.to_doc()?]));
    docs.push(Document::Break);
    docs.push(Document::Rune(')'));

    docs.push(options_doc(&create.options));

    Ok(group(concat(docs)))
}

fn options_doc(options: &TableOptions) -> Document<'static> {
    let mut docs = Vec::new();
    if let Some(strict) = &options.strict {
        docs.push(Document::Space);
        docs.push(token_text(strict));
    }
    if let Some(without) = &options.without_row_id {
        docs.push(Document::Space);
        docs.push(token_text(&without.without_token));
        docs.push(Document::Space);
        docs.push(token_text(&without.rowid_token));
    }
    concat(docs)
}

impl ToDoc for IfNotExists {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        Ok(docvec![
            token_text(&self.if_token),
            Document::Space,
            token_text(&self.not_token),
            Document::Space,
            token_text(&self.exists_token),
        ])
    }
}

impl ToDoc for CatalogObjectIdentifier {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        let mut docs = Vec::new();
        if let Some(schema) = &self.schema {
            docs.push(ident_doc(schema));
            docs.push(Document::Rune('.'));
        }
        docs.push(ident_doc(&self.object));
        Ok(concat(docs))
    }
}

impl ToDoc for TableDefinition {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        let separator = docvec![Document::Rune(','), Document::Break];
        let mut items = Vec::new();
        for column in &self.columns {
            items.push(column.to_doc()?);
        }
        for constraint in &self.constraints {
            items.push(constraint.to_doc()?);
        }
        Ok(anchor(join(items, &separator)))
    }
}

impl ToDoc for ColumnDefinition {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        let mut docs = vec![
            ident_doc(&self.name),
            Document::Space,
            Document::String(self.type_name.name.token.text().to_string()),
        ];
        for constraint in &self.constraints {
            docs.push(Document::Space);
            docs.push(constraint.to_doc()?);
        }
        Ok(concat(docs))
    }
}

fn constraint_name_doc(name: Option<&ConstraintName>) -> Document<'static> {
    match name {
        Some(name) => docvec![
            token_text(&name.constraint_token),
            Document::Space,
            ident_doc(&name.name),
            Document::Space,
        ],
        None => nil(),
    }
}

impl ToDoc for ColumnConstraint {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        match self {
            Self::PrimaryKey(pk) => {
                let mut docs = vec![
                    constraint_name_doc(pk.name.as_ref()),
                    token_text(&pk.primary_token),
                    Document::Space,
                    token_text(&pk.key_token),
                ];
                if let Some(order) = &pk.order {
                    docs.push(Document::Space);
                    docs.push(order_doc(order));
                }
                if let Some(conflict) = &pk.conflict {
                    docs.push(Document::Space);
                    docs.push(conflict.to_doc()?);
                }
                if let Some(autoincrement) = &pk.autoincrement {
                    docs.push(Document::Space);
                    docs.push(token_text(autoincrement));
                }
                Ok(concat(docs))
            }
            Self::NotNull(not_null) => Ok(docvec![
                constraint_name_doc(not_null.name.as_ref()),
                token_text(&not_null.not_token),
                Document::Space,
                token_text(&not_null.null_token),
            ]),
            Self::Unique(unique) => Ok(docvec![
                constraint_name_doc(unique.name.as_ref()),
                token_text(&unique.unique_token),
            ]),
            Self::Collate(collate) => Ok(docvec![
                constraint_name_doc(collate.name.as_ref()),
                token_text(&collate.collate_token),
                Document::Space,
                ident_doc(&collate.collation),
            ]),
            Self::Default(default) => Ok(docvec![
                constraint_name_doc(default.name.as_ref()),
                token_text(&default.default_token),
                Document::Space,
                default.value.to_doc()?,
            ]),
            Self::Generated(generated) => {
                let mut docs = vec![constraint_name_doc(generated.name.as_ref())];
                if let Some((generated_token, always_token)) = &generated.generated_tokens {
                    docs.push(token_text(generated_token));
                    docs.push(Document::Space);
                    docs.push(token_text(always_token));
                    docs.push(Document::Space);
                }
                docs.push(token_text(&generated.as_token));
                docs.push(Document::Space);
                docs.push(Document::Rune('('));
                docs.push(generated.expr.to_doc()?);
                docs.push(Document::Rune(')'));
                if let Some(storage) = &generated.storage {
                    docs.push(Document::Space);
                    docs.push(token_text(&storage.token));
                }
                Ok(concat(docs))
            }
            Self::Check(check) => check.to_doc(),
        }
    }
}

impl ToDoc for CheckConstraint {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        Ok(docvec![
            constraint_name_doc(self.name.as_ref()),
            token_text(&self.check_token),
            Document::Space,
            Document::Rune('('),
            self.expr.to_doc()?,
            Document::Rune(')'),
        ])
    }
}

impl ToDoc for TableConstraint {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        match self {
            Self::PrimaryKey(pk) => {
                let mut docs = vec![
                    constraint_name_doc(pk.name.as_ref()),
                    token_text(&pk.primary_token),
                    Document::Space,
                    token_text(&pk.key_token),
                    Document::Space,
                    Document::Rune('('),
                ];
                let mut columns = Vec::new();
                for column in &pk.columns {
                    columns.push(column.to_doc()?);
                }
                docs.push(join(columns, &docvec![Document::Rune(','), Document::Space]));
                if let Some(autoincrement) = &pk.autoincrement {
                    docs.push(Document::Space);
                    docs.push(token_text(autoincrement));
                }
                docs.push(Document::Rune(')'));
                if let Some(conflict) = &pk.conflict {
                    docs.push(Document::Space);
                    docs.push(conflict.to_doc()?);
                }
                Ok(group(concat(docs)))
            }
            Self::ForeignKey(fk) => {
                let mut docs = vec![
                    constraint_name_doc(fk.name.as_ref()),
                    token_text(&fk.foreign_token),
                    Document::Space,
                    token_text(&fk.key_token),
                    Document::Space,
                    Document::Rune('('),
                    join(
                        fk.columns.iter().map(ident_doc),
                        &docvec![Document::Rune(','), Document::Space],
                    ),
                    Document::Rune(')'),
                    Document::Space,
                ];
                docs.push(fk.clause.to_doc()?);
                Ok(group(concat(docs)))
            }
            Self::Check(check) => check.to_doc(),
        }
    }
}

impl ToDoc for ForeignKeyClause {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        let mut docs = vec![
            token_text(&self.references_token),
            Document::Space,
            self.foreign_table.to_doc()?,
        ];
        if !self.columns.is_empty() {
            docs.push(Document::Rune('('));
            docs.push(join(
                self.columns.iter().map(ident_doc),
                &docvec![Document::Rune(','), Document::Space],
            ));
            docs.push(Document::Rune(')'));
        }
        for action in &self.actions {
            docs.push(Document::Space);
            docs.push(action.to_doc()?);
        }
        if let (Some(match_token), Some(match_name)) = (&self.match_token, &self.match_name) {
            docs.push(Document::Space);
            docs.push(token_text(match_token));
            docs.push(Document::Space);
            docs.push(ident_doc(match_name));
        }
        if let Some(deferrable) = &self.deferrable {
            docs.push(Document::Space);
            docs.push(deferrable.to_doc()?);
        }
        Ok(concat(docs))
    }
}

impl ToDoc for ForeignKeyTrigger {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        let mut docs = vec![
            token_text(&self.on_token),
            Document::Space,
            token_text(&self.event_token),
        ];
        for token in &self.action.tokens {
            docs.push(Document::Space);
            docs.push(token_text(token));
        }
        Ok(concat(docs))
    }
}

impl ToDoc for Deferrable {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        let mut docs = Vec::new();
        if let Some(not_token) = &self.not_token {
            docs.push(token_text(not_token));
            docs.push(Document::Space);
        }
        docs.push(token_text(&self.deferrable_token));
        if let (Some(initially_token), Some(mode_token)) =
            (&self.initially_token, &self.mode_token)
        {
            docs.push(Document::Space);
            docs.push(token_text(initially_token));
            docs.push(Document::Space);
            docs.push(token_text(mode_token));
        }
        Ok(concat(docs))
    }
}

impl ToDoc for ConflictClause {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        Ok(docvec![
            token_text(&self.on_token),
            Document::Space,
            token_text(&self.conflict_token),
            Document::Space,
            token_text(&self.action_token),
        ])
    }
}

impl ToDoc for IndexedColumn {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        let mut docs = vec![self.subject.to_doc()?];
        if let Some(collation) = &self.collation {
            docs.push(Document::Space);
            docs.push(token_text(&collation.collate_token));
            docs.push(Document::Space);
            docs.push(ident_doc(&collation.name));
        }
        if let Some(order) = &self.order {
            docs.push(Document::Space);
            docs.push(order_doc(order));
        }
        Ok(concat(docs))
    }
}

fn order_doc(order: &SortOrder) -> Document<'static> {
    token_text(&order.token)
}

fn create_index_doc(
    index: &crate::ast::CreateIndex,
) -> Result<Document<'static>, UnparseError> {
    let mut docs = vec![token_text(&index.create_token)];
    if let Some(unique) = &index.unique_token {
        docs.push(Document::Space);
        docs.push(token_text(unique));
    }
    docs.push(Document::Space);
    docs.push(token_text(&index.index_token));
    if let Some(if_not_exists) = &index.if_not_exists {
        docs.push(Document::Space);
        docs.push(if_not_exists.to_doc()?);
    }
    docs.push(Document::Space);
    docs.push(index.name.to_doc()?);
    docs.push(Document::Space);
    docs.push(token_text(&index.on_token));
    docs.push(Document::Space);
    docs.push(index.table.to_doc()?);
    docs.push(Document::Rune('('));
    let mut columns = Vec::new();
    for column in &index.columns {
        columns.push(column.to_doc()?);
    }
    docs.push(join(columns, &docvec![Document::Rune(','), Document::Space]));
    docs.push(Document::Rune(')'));
    if let (Some(where_token), Some(where_expr)) = (&index.where_token, &index.where_expr) {
        docs.push(Document::Space);
        docs.push(token_text(where_token));
        docs.push(Document::Space);
        docs.push(where_expr.to_doc()?);
    }
    Ok(group(concat(docs)))
}

impl ToDoc for Expr {
    fn to_doc(&self) -> Result<Document<'static>, UnparseError> {
        match self {
            Self::Null(token)
            | Self::Boolean { token, .. }
            | Self::Integer { token, .. }
            | Self::Float { token, .. }
            | Self::String { token, .. } => Ok(token_text(token)),
            Self::Identifier(identifier) => Ok(ident_doc(identifier)),
            Self::ColumnName {
                schema,
                table,
                column,
            } => {
                let mut docs = Vec::new();
                if let Some(schema) = schema {
                    docs.push(ident_doc(schema));
                    docs.push(Document::Rune('.'));
                }
                if let Some(table) = table {
                    docs.push(ident_doc(table));
                    docs.push(Document::Rune('.'));
                }
                docs.push(ident_doc(column));
                Ok(concat(docs))
            }
            Self::FunctionCall { name, args, .. } => {
                let mut arg_docs = Vec::new();
                for arg in args {
                    arg_docs.push(arg.to_doc()?);
                }
                Ok(docvec![
                    Document::String(name.token.text().to_string()),
                    Document::Rune('('),
                    join(arg_docs, &docvec![Document::Rune(','), Document::Space]),
                    Document::Rune(')'),
                ])
            }
            Self::BinaryOp { op, lhs, rhs } => Ok(docvec![
                lhs.to_doc()?,
                Document::Space,
                token_text(op),
                Document::Space,
                rhs.to_doc()?,
            ]),
            Self::UnaryOp { op, rhs } => Ok(docvec![token_text(op), rhs.to_doc()?]),
            Self::Case(case) => {
                let mut docs = vec![token_text(&case.case_token)];
                if let Some(operand) = &case.operand {
                    docs.push(Document::Space);
                    docs.push(operand.to_doc()?);
                }
                for arm in &case.arms {
                    docs.push(Document::Space);
                    docs.push(token_text(&arm.when_token));
                    docs.push(Document::Space);
                    docs.push(arm.when.to_doc()?);
                    docs.push(Document::Space);
                    docs.push(token_text(&arm.then_token));
                    docs.push(Document::Space);
                    docs.push(arm.then.to_doc()?);
                }
                if let (Some(else_token), Some(else_expr)) = (&case.else_token, &case.else_expr) {
                    docs.push(Document::Space);
                    docs.push(token_text(else_token));
                    docs.push(Document::Space);
                    docs.push(else_expr.to_doc()?);
                }
                docs.push(Document::Space);
                docs.push(token_text(&case.end_token));
                Ok(group(concat(docs)))
            }
            Self::List(items) => {
                let mut item_docs = Vec::new();
                for item in items {
                    item_docs.push(item.to_doc()?);
                }
                Ok(docvec![
                    Document::Rune('('),
                    join(item_docs, &docvec![Document::Rune(','), Document::Space]),
                    Document::Rune(')'),
                ])
            }
            Self::Error(_) => Err(UnparseError::Unsupported("error placeholder expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{SourceFile, parse};

    fn render(source: &str) -> String {
        render_width(source, DEFAULT_LINE_WIDTH)
    }

    fn render_width(source: &str, width: isize) -> String {
        let file = SourceFile::new("test.sql", source);
        let (statements, _) = parse(&file);
        statements[0]
            .to_doc()
            .expect("statement should render")
            .to_pretty_string_width(width)
    }

    #[test]
    fn create_table_renders_flat() {
        let rendered = render("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT NULL);");
        assert_eq!(
            rendered,
            "CREATE TABLE \"t\" ( \"id\" INTEGER PRIMARY KEY, \"name\" TEXT NOT NULL )"
        );
    }

    #[test]
    fn create_table_breaks_at_narrow_width() {
        let rendered = render_width("CREATE TABLE t (id INTEGER, name TEXT);", 24);
        assert_eq!(
            rendered,
            "CREATE TABLE \"t\" (\n    \"id\" INTEGER,\n    \"name\" TEXT\n)"
        );
    }

    #[test]
    fn keyword_casing_is_preserved() {
        let rendered = render("create table t (id integer primary key);");
        assert!(rendered.starts_with("create table"), "got: {rendered}");
        assert!(rendered.contains("primary key"), "got: {rendered}");
    }

    #[test]
    fn table_options_render() {
        let rendered = render("CREATE TABLE t (x INT) STRICT;");
        assert!(rendered.ends_with("STRICT"), "got: {rendered}");

        let rendered = render("CREATE TABLE t (x INT) WITHOUT ROWID;");
        assert!(rendered.ends_with("WITHOUT ROWID"), "got: {rendered}");
    }

    #[test]
    fn foreign_key_constraint_renders() {
        let rendered = render(
            "CREATE TABLE c (x INT, CONSTRAINT fk FOREIGN KEY(x) REFERENCES p(x) \
             ON DELETE CASCADE NOT DEFERRABLE INITIALLY IMMEDIATE);",
        );
        assert!(
            rendered.contains("CONSTRAINT \"fk\" FOREIGN KEY (\"x\") REFERENCES \"p\"(\"x\") \
                               ON DELETE CASCADE NOT DEFERRABLE INITIALLY IMMEDIATE"),
            "got: {rendered}"
        );
    }

    #[test]
    fn pragma_renders() {
        let rendered = render("PRAGMA foreign_keys = ON;");
        assert_eq!(rendered, "PRAGMA \"foreign_keys\" = ON");
    }

    #[test]
    fn transaction_statements_render() {
        assert_eq!(render("BEGIN TRANSACTION;"), "BEGIN TRANSACTION");
        assert_eq!(render("COMMIT;"), "COMMIT");
    }

    #[test]
    fn create_index_renders() {
        let rendered = render("CREATE UNIQUE INDEX i ON t(lower(name)) WHERE active = 1;");
        assert_eq!(
            rendered,
            "CREATE UNIQUE INDEX \"i\" ON \"t\"(lower(\"name\")) WHERE \"active\" = 1"
        );
    }

    #[test]
    fn check_constraint_renders_expression() {
        let rendered = render("CREATE TABLE t (x INT CHECK (x >= 0));");
        assert!(rendered.contains("CHECK (\"x\" >= 0)"), "got: {rendered}");
    }

    #[test]
    fn opaque_statements_are_unsupported() {
        let file = SourceFile::new("test.sql", "CREATE VIEW v AS SELECT 1;");
        let (statements, _) = parse(&file);
        assert_eq!(
            statements[0].to_doc(),
            Err(UnparseError::Unsupported("create view statement"))
        );
    }

    #[test]
    fn synthesized_tokens_render_canonical_lexeme() {
        // `NOT` without `NULL`: recovery synthesizes the NULL token, which
        // renders as its canonical lexeme.
        let file = SourceFile::new("test.sql", "CREATE TABLE t (a TEXT NOT );");
        let (statements, reports) = parse(&file);
        assert!(!reports.is_empty());
        let rendered = statements[0].to_doc().unwrap().to_pretty_string();
        assert!(rendered.contains("NOT NULL"), "got: {rendered}");
    }
}
