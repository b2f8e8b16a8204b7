// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for SQLite schema DDL.
//!
//! The AST is lossless enough for two consumers with very different needs:
//!
//! - the **formatter**, which wants original keyword casing, quoting, and
//!   comment trivia — so nodes retain their constituent [`Token`]s;
//! - the **migration diff**, which wants to know whether an on-disk
//!   constraint *means the same thing* as a desired constraint — the
//!   [`Equivalent`] trait, which ignores trivia entirely.
//!
//! # Design Philosophy
//!
//! - **Closed sum types** — statements, constraints, and expressions are
//!   enums with exhaustive matching, no open-ended extension
//! - **Error recovery** — the parser can produce trees containing
//!   [`Expr::Error`] nodes; those compare equivalent to nothing
//! - **Spans everywhere** — every node can report the source range it spans

use ecow::EcoString;

use crate::source_analysis::{Span, Token};

/// Structural equivalence, the contract consumed by migration diff.
///
/// Trivia is never significant. Named constraints are identity: two
/// constraints with the same `CONSTRAINT <name>` are equivalent regardless
/// of body, and a named constraint is never equivalent to an unnamed one.
/// Numeric literals compare by their source text to stay bit-exact across
/// float representations.
pub trait Equivalent {
    /// Returns `true` if `self` and `other` are structurally equivalent.
    fn equivalent(&self, other: &Self) -> bool;
}

fn option_equivalent<T: Equivalent>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.equivalent(b),
        _ => false,
    }
}

fn slice_equivalent<T: Equivalent>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equivalent(y))
}

// ============================================================================
// Identifiers
// ============================================================================

/// An identifier with its unquoted name.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// The identifier token, quotes and original casing intact.
    pub token: Token,
    /// The unquoted name.
    pub name: EcoString,
}

impl Identifier {
    /// Builds an identifier from a lexed token, stripping one quoting layer.
    #[must_use]
    pub fn from_token(token: Token) -> Self {
        let name = EcoString::from(token.unquoted());
        Self { token, name }
    }

    /// Returns the source span of the identifier.
    #[must_use]
    pub fn span(&self) -> Span {
        self.token.span()
    }
}

impl Equivalent for Identifier {
    fn equivalent(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A possibly schema-qualified name for a table, index, view, or trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogObjectIdentifier {
    /// Optional schema qualifier (`main.users` → `main`).
    pub schema: Option<Identifier>,
    /// The object name.
    pub object: Identifier,
}

impl CatalogObjectIdentifier {
    /// Returns the fully-qualified, double-quoted name, substituting
    /// `default_schema` when no schema was written:
    /// `"main"."users"`.
    #[must_use]
    pub fn qualified_name(&self, default_schema: &str) -> String {
        let schema = self
            .schema
            .as_ref()
            .map_or(default_schema, |s| s.name.as_str());
        format!("\"{}\".\"{}\"", schema, self.object.name)
    }

    /// Returns the source span of the whole qualified name.
    #[must_use]
    pub fn span(&self) -> Span {
        match &self.schema {
            Some(schema) => schema.span().merge(self.object.span()),
            None => self.object.span(),
        }
    }
}

impl Equivalent for CatalogObjectIdentifier {
    fn equivalent(&self, other: &Self) -> bool {
        option_equivalent(self.schema.as_ref(), other.schema.as_ref())
            && self.object.equivalent(&other.object)
    }
}

// ============================================================================
// Statements
// ============================================================================

/// A top-level SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    CreateView(CreateView),
    CreateIndex(CreateIndex),
    CreateVirtualTable(CreateVirtualTable),
    CreateTrigger(CreateTrigger),
    Pragma(Pragma),
    BeginTransaction(BeginTransaction),
    CommitTransaction(CommitTransaction),
    /// A SELECT whose body was recognized and skipped.
    Select(Select),
}

impl Statement {
    /// Returns the source span of the statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::CreateTable(s) => s.span,
            Self::CreateView(s) => s.span,
            Self::CreateIndex(s) => s.span,
            Self::CreateVirtualTable(s) => s.span,
            Self::CreateTrigger(s) => s.span,
            Self::Pragma(s) => s.span,
            Self::BeginTransaction(s) => s.span,
            Self::CommitTransaction(s) => s.span,
            Self::Select(s) => s.span,
        }
    }
}

impl Equivalent for Statement {
    fn equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::CreateTable(a), Self::CreateTable(b)) => a.equivalent(b),
            (Self::CreateView(a), Self::CreateView(b)) => a.equivalent(b),
            (Self::CreateIndex(a), Self::CreateIndex(b)) => a.equivalent(b),
            (Self::CreateVirtualTable(a), Self::CreateVirtualTable(b)) => a.equivalent(b),
            // Trigger and SELECT bodies are opaque; same variant is all we know.
            (Self::CreateTrigger(_), Self::CreateTrigger(_)) => true,
            (Self::Select(_), Self::Select(_)) => true,
            (Self::Pragma(a), Self::Pragma(b)) => a.equivalent(b),
            (Self::BeginTransaction(_), Self::BeginTransaction(_)) => true,
            (Self::CommitTransaction(_), Self::CommitTransaction(_)) => true,
            _ => false,
        }
    }
}

/// `IF NOT EXISTS`, with its three keyword tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct IfNotExists {
    pub if_token: Token,
    pub not_token: Token,
    pub exists_token: Token,
}

impl IfNotExists {
    /// Returns the source span of the clause.
    #[must_use]
    pub fn span(&self) -> Span {
        self.if_token.span().merge(self.exists_token.span())
    }
}

/// `CREATE [TEMPORARY] TABLE …`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub create_token: Token,
    pub temporary_token: Option<Token>,
    pub table_token: Token,
    pub if_not_exists: Option<IfNotExists>,
    pub name: CatalogObjectIdentifier,
    pub definition: TableDefinition,
    pub options: TableOptions,
    pub span: Span,
}

impl Equivalent for CreateTable {
    fn equivalent(&self, other: &Self) -> bool {
        self.temporary_token.is_some() == other.temporary_token.is_some()
            && self.name.equivalent(&other.name)
            && self.definition.equivalent(&other.definition)
            && self.options.equivalent(&other.options)
    }
}

/// The parenthesized body of a CREATE TABLE: columns, then table constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub l_paren: Token,
    pub columns: Vec<ColumnDefinition>,
    pub constraints: Vec<TableConstraint>,
    pub r_paren: Token,
}

impl Equivalent for TableDefinition {
    fn equivalent(&self, other: &Self) -> bool {
        slice_equivalent(&self.columns, &other.columns)
            && slice_equivalent(&self.constraints, &other.constraints)
    }
}

/// Trailing table options: `STRICT`, `WITHOUT ROWID`, in any order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableOptions {
    pub strict: Option<Token>,
    pub without_row_id: Option<WithoutRowId>,
}

impl TableOptions {
    /// Returns `true` if the table is declared STRICT.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict.is_some()
    }

    /// Returns `true` if the table is declared WITHOUT ROWID.
    #[must_use]
    pub fn is_without_row_id(&self) -> bool {
        self.without_row_id.is_some()
    }
}

impl Equivalent for TableOptions {
    fn equivalent(&self, other: &Self) -> bool {
        self.is_strict() == other.is_strict()
            && self.is_without_row_id() == other.is_without_row_id()
    }
}

/// `WITHOUT ROWID`, keeping both keyword tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct WithoutRowId {
    pub without_token: Token,
    pub rowid_token: Token,
}

/// One column definition: name, type, constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: Identifier,
    pub type_name: TypeName,
    pub constraints: Vec<ColumnConstraint>,
    pub span: Span,
}

impl Equivalent for ColumnDefinition {
    fn equivalent(&self, other: &Self) -> bool {
        self.name.equivalent(&other.name)
            && self.type_name.equivalent(&other.type_name)
            && slice_equivalent(&self.constraints, &other.constraints)
    }
}

/// A column type. SQLite type names are free-form single identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub name: Identifier,
}

impl Equivalent for TypeName {
    fn equivalent(&self, other: &Self) -> bool {
        self.name.equivalent(&other.name)
    }
}

/// An optional `CONSTRAINT <name>` preamble.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintName {
    pub constraint_token: Token,
    pub name: Identifier,
}

impl Equivalent for ConstraintName {
    fn equivalent(&self, other: &Self) -> bool {
        self.name.equivalent(&other.name)
    }
}

/// Applies the named-constraint identity rule shared by every constraint
/// variant: both named → compare names only; exactly one named → never
/// equivalent; both unnamed → fall through to structural comparison.
fn names_decide(
    a: Option<&ConstraintName>,
    b: Option<&ConstraintName>,
) -> Option<bool> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.equivalent(b)),
        (None, None) => None,
        _ => Some(false),
    }
}

// ============================================================================
// Column constraints
// ============================================================================

/// A constraint attached to a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey(ColumnPrimaryKey),
    NotNull(ColumnNotNull),
    Unique(ColumnUnique),
    Collate(ColumnCollate),
    Default(ColumnDefault),
    Generated(ColumnGenerated),
    Check(CheckConstraint),
}

impl ColumnConstraint {
    /// Returns the `CONSTRAINT <name>` preamble, if any.
    #[must_use]
    pub fn name(&self) -> Option<&ConstraintName> {
        match self {
            Self::PrimaryKey(c) => c.name.as_ref(),
            Self::NotNull(c) => c.name.as_ref(),
            Self::Unique(c) => c.name.as_ref(),
            Self::Collate(c) => c.name.as_ref(),
            Self::Default(c) => c.name.as_ref(),
            Self::Generated(c) => c.name.as_ref(),
            Self::Check(c) => c.name.as_ref(),
        }
    }
}

impl Equivalent for ColumnConstraint {
    fn equivalent(&self, other: &Self) -> bool {
        if let Some(decided) = names_decide(self.name(), other.name()) {
            return decided;
        }
        match (self, other) {
            (Self::PrimaryKey(a), Self::PrimaryKey(b)) => {
                option_equivalent(a.order.as_ref(), b.order.as_ref())
                    && option_equivalent(a.conflict.as_ref(), b.conflict.as_ref())
                    && a.autoincrement.is_some() == b.autoincrement.is_some()
            }
            (Self::NotNull(_), Self::NotNull(_)) | (Self::Unique(_), Self::Unique(_)) => true,
            (Self::Collate(a), Self::Collate(b)) => a.collation.equivalent(&b.collation),
            (Self::Default(a), Self::Default(b)) => a.value.equivalent(&b.value),
            (Self::Generated(a), Self::Generated(b)) => {
                a.expr.equivalent(&b.expr) && a.storage_mode() == b.storage_mode()
            }
            (Self::Check(a), Self::Check(b)) => a.expr.equivalent(&b.expr),
            // Different variants are never equivalent.
            _ => false,
        }
    }
}

/// `PRIMARY KEY [ASC|DESC] [conflict-clause] [AUTOINCREMENT]` on a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPrimaryKey {
    pub name: Option<ConstraintName>,
    pub primary_token: Token,
    pub key_token: Token,
    pub order: Option<SortOrder>,
    pub conflict: Option<ConflictClause>,
    pub autoincrement: Option<Token>,
}

impl ColumnPrimaryKey {
    /// Returns `true` if the column is AUTOINCREMENT.
    #[must_use]
    pub fn is_autoincrement(&self) -> bool {
        self.autoincrement.is_some()
    }
}

/// `NOT NULL` on a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnNotNull {
    pub name: Option<ConstraintName>,
    pub not_token: Token,
    pub null_token: Token,
}

/// `UNIQUE` on a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnUnique {
    pub name: Option<ConstraintName>,
    pub unique_token: Token,
}

/// `COLLATE <name>` on a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCollate {
    pub name: Option<ConstraintName>,
    pub collate_token: Token,
    pub collation: Identifier,
}

/// `DEFAULT <literal|identifier>` on a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefault {
    pub name: Option<ConstraintName>,
    pub default_token: Token,
    pub value: Expr,
}

/// `[GENERATED ALWAYS] AS ( expr ) [VIRTUAL|STORED]` on a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGenerated {
    pub name: Option<ConstraintName>,
    /// `GENERATED` and `ALWAYS`, when the long form was written.
    pub generated_tokens: Option<(Token, Token)>,
    pub as_token: Token,
    pub l_paren: Token,
    pub expr: Expr,
    pub r_paren: Token,
    pub storage: Option<GeneratedStorage>,
}

impl ColumnGenerated {
    fn storage_mode(&self) -> Option<StorageMode> {
        self.storage.as_ref().map(|s| s.mode)
    }
}

/// The storage keyword of a generated column.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStorage {
    pub token: Token,
    pub mode: StorageMode,
}

/// Whether a generated column is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Virtual,
    Stored,
}

/// `CHECK ( expr )`, shared by column- and table-level checks.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConstraint {
    pub name: Option<ConstraintName>,
    pub check_token: Token,
    pub l_paren: Token,
    pub expr: Expr,
    pub r_paren: Token,
}

// ============================================================================
// Table constraints
// ============================================================================

/// A constraint attached to the table as a whole.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    PrimaryKey(TablePrimaryKey),
    ForeignKey(TableForeignKey),
    Check(CheckConstraint),
}

impl TableConstraint {
    /// Returns the `CONSTRAINT <name>` preamble, if any.
    #[must_use]
    pub fn name(&self) -> Option<&ConstraintName> {
        match self {
            Self::PrimaryKey(c) => c.name.as_ref(),
            Self::ForeignKey(c) => c.name.as_ref(),
            Self::Check(c) => c.name.as_ref(),
        }
    }
}

impl Equivalent for TableConstraint {
    fn equivalent(&self, other: &Self) -> bool {
        if let Some(decided) = names_decide(self.name(), other.name()) {
            return decided;
        }
        match (self, other) {
            (Self::PrimaryKey(a), Self::PrimaryKey(b)) => {
                // Column order is significant for a primary key.
                slice_equivalent(&a.columns, &b.columns)
                    && option_equivalent(a.conflict.as_ref(), b.conflict.as_ref())
                    && a.autoincrement.is_some() == b.autoincrement.is_some()
            }
            (Self::ForeignKey(a), Self::ForeignKey(b)) => {
                let mut left = a.column_pairs();
                let mut right = b.column_pairs();
                left.sort();
                right.sort();
                left == right && a.clause.modifiers_equivalent(&b.clause)
            }
            (Self::Check(a), Self::Check(b)) => a.expr.equivalent(&b.expr),
            _ => false,
        }
    }
}

/// `PRIMARY KEY ( indexed-columns [AUTOINCREMENT] ) [conflict-clause]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePrimaryKey {
    pub name: Option<ConstraintName>,
    pub primary_token: Token,
    pub key_token: Token,
    pub l_paren: Token,
    pub columns: Vec<IndexedColumn>,
    pub autoincrement: Option<Token>,
    pub r_paren: Token,
    pub conflict: Option<ConflictClause>,
}

/// `FOREIGN KEY ( columns ) foreign-key-clause`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableForeignKey {
    pub name: Option<ConstraintName>,
    pub foreign_token: Token,
    pub key_token: Token,
    pub l_paren: Token,
    pub columns: Vec<Identifier>,
    pub r_paren: Token,
    pub clause: ForeignKeyClause,
}

impl TableForeignKey {
    /// Pairs each local column with its foreign counterpart by position.
    /// Diff treats the *set* of pairs as significant, not their order, so
    /// callers sort the result before comparing.
    fn column_pairs(&self) -> Vec<(&str, Option<&str>)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, local)| {
                let foreign = self.clause.columns.get(i).map(|c| c.name.as_str());
                (local.name.as_str(), foreign)
            })
            .collect()
    }
}

/// `REFERENCES table [(columns)]` plus the trailing modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyClause {
    pub references_token: Token,
    pub foreign_table: CatalogObjectIdentifier,
    pub l_paren: Option<Token>,
    pub columns: Vec<Identifier>,
    pub r_paren: Option<Token>,
    pub actions: Vec<ForeignKeyTrigger>,
    pub match_token: Option<Token>,
    pub match_name: Option<Identifier>,
    pub deferrable: Option<Deferrable>,
}

impl ForeignKeyClause {
    /// Compares everything except the column lists, which the owning
    /// constraint compares as sorted local/foreign pairs.
    fn modifiers_equivalent(&self, other: &Self) -> bool {
        if !self.foreign_table.equivalent(&other.foreign_table) {
            return false;
        }
        let mut left: Vec<_> = self.actions.iter().map(ForeignKeyTrigger::shape).collect();
        let mut right: Vec<_> = other.actions.iter().map(ForeignKeyTrigger::shape).collect();
        left.sort();
        right.sort();
        left == right
            && option_equivalent(self.match_name.as_ref(), other.match_name.as_ref())
            && option_equivalent(self.deferrable.as_ref(), other.deferrable.as_ref())
    }
}

/// `ON DELETE <action>` or `ON UPDATE <action>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyTrigger {
    pub on_token: Token,
    pub event_token: Token,
    pub event: ForeignKeyEvent,
    pub action: ForeignKeyAction,
}

impl ForeignKeyTrigger {
    fn shape(&self) -> (ForeignKeyEvent, ForeignKeyActionKind) {
        (self.event, self.action.kind)
    }
}

/// Which write triggers a foreign-key action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ForeignKeyEvent {
    Delete,
    Update,
}

/// A foreign-key action with the keyword tokens that spelled it.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyAction {
    /// `CASCADE`, or `NO ACTION`, `SET NULL`, `SET DEFAULT` as two tokens.
    pub tokens: Vec<Token>,
    pub kind: ForeignKeyActionKind,
}

/// The action taken when a referenced row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ForeignKeyActionKind {
    Cascade,
    Restrict,
    NoAction,
    SetNull,
    SetDefault,
}

/// `[NOT] DEFERRABLE [INITIALLY IMMEDIATE|DEFERRED]`.
///
/// `NOT` and the `INITIALLY` value are independent facts; neither rewrites
/// the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Deferrable {
    pub not_token: Option<Token>,
    pub deferrable_token: Token,
    pub initially_token: Option<Token>,
    pub mode_token: Option<Token>,
    pub initially: Option<DeferrableMode>,
}

impl Deferrable {
    /// Returns `true` for `NOT DEFERRABLE`.
    #[must_use]
    pub fn is_not(&self) -> bool {
        self.not_token.is_some()
    }
}

impl Equivalent for Deferrable {
    fn equivalent(&self, other: &Self) -> bool {
        self.is_not() == other.is_not() && self.initially == other.initially
    }
}

/// When a deferrable constraint is first checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferrableMode {
    Immediate,
    Deferred,
}

/// `ON CONFLICT <action>` attached to a uniqueness constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictClause {
    pub on_token: Token,
    pub conflict_token: Token,
    pub action_token: Token,
    pub action: ConflictAction,
}

impl Equivalent for ConflictClause {
    fn equivalent(&self, other: &Self) -> bool {
        self.action == other.action
    }
}

/// The verb of a conflict clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    Rollback,
    Abort,
    Fail,
    Ignore,
    Replace,
}

/// One column (or expression) of an index or primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedColumn {
    pub subject: Expr,
    pub collation: Option<Collation>,
    pub order: Option<SortOrder>,
}

impl Equivalent for IndexedColumn {
    fn equivalent(&self, other: &Self) -> bool {
        // Collation and order: both absent is equal, exactly one absent is
        // not, both present compare.
        self.subject.equivalent(&other.subject)
            && option_equivalent(self.collation.as_ref(), other.collation.as_ref())
            && option_equivalent(self.order.as_ref(), other.order.as_ref())
    }
}

/// `COLLATE <name>` inside an indexed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Collation {
    pub collate_token: Token,
    pub name: Identifier,
}

impl Equivalent for Collation {
    fn equivalent(&self, other: &Self) -> bool {
        self.name.equivalent(&other.name)
    }
}

/// `ASC` or `DESC` with its token.
#[derive(Debug, Clone, PartialEq)]
pub struct SortOrder {
    pub token: Token,
    pub direction: SortDirection,
}

impl Equivalent for SortOrder {
    fn equivalent(&self, other: &Self) -> bool {
        self.direction == other.direction
    }
}

/// Sort direction of an indexed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

// ============================================================================
// Other statements
// ============================================================================

/// `CREATE [UNIQUE] INDEX … ON … ( indexed-columns ) [WHERE expr]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    pub create_token: Token,
    pub unique_token: Option<Token>,
    pub index_token: Token,
    pub if_not_exists: Option<IfNotExists>,
    pub name: CatalogObjectIdentifier,
    pub on_token: Token,
    pub table: CatalogObjectIdentifier,
    pub l_paren: Token,
    pub columns: Vec<IndexedColumn>,
    pub r_paren: Token,
    pub where_token: Option<Token>,
    pub where_expr: Option<Expr>,
    pub span: Span,
}

impl CreateIndex {
    /// Returns `true` for a UNIQUE index.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.unique_token.is_some()
    }
}

impl Equivalent for CreateIndex {
    fn equivalent(&self, other: &Self) -> bool {
        self.is_unique() == other.is_unique()
            && self.name.equivalent(&other.name)
            && self.table.equivalent(&other.table)
            && slice_equivalent(&self.columns, &other.columns)
            && option_equivalent(self.where_expr.as_ref(), other.where_expr.as_ref())
    }
}

/// `CREATE VIRTUAL TABLE … USING module [( args )]`. Module arguments are
/// opaque text.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateVirtualTable {
    pub create_token: Token,
    pub virtual_token: Token,
    pub table_token: Token,
    pub if_not_exists: Option<IfNotExists>,
    pub name: CatalogObjectIdentifier,
    pub using_token: Token,
    pub module: Identifier,
    pub args: Vec<EcoString>,
    pub span: Span,
}

impl Equivalent for CreateVirtualTable {
    fn equivalent(&self, other: &Self) -> bool {
        self.name.equivalent(&other.name)
            && self.module.equivalent(&other.module)
            && self.args == other.args
    }
}

/// `CREATE [TEMPORARY] VIEW … AS select`. The SELECT body is opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateView {
    pub create_token: Token,
    pub temporary_token: Option<Token>,
    pub view_token: Token,
    pub if_not_exists: Option<IfNotExists>,
    pub name: CatalogObjectIdentifier,
    pub columns: Vec<Identifier>,
    pub as_token: Token,
    pub select: Select,
    pub span: Span,
}

impl Equivalent for CreateView {
    fn equivalent(&self, other: &Self) -> bool {
        self.name.equivalent(&other.name) && slice_equivalent(&self.columns, &other.columns)
    }
}

/// `CREATE [TEMPORARY] TRIGGER … BEGIN … END`. Header and body tokens are
/// consumed but not modelled.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTrigger {
    pub create_token: Token,
    pub temporary_token: Option<Token>,
    pub trigger_token: Token,
    pub span: Span,
}

/// A SELECT statement whose body was skipped up to the terminator.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub select_token: Token,
    pub span: Span,
}

/// `PRAGMA name = value` or `PRAGMA name ( value )`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pragma {
    pub pragma_token: Token,
    pub name: CatalogObjectIdentifier,
    pub value: Expr,
    pub span: Span,
}

impl Equivalent for Pragma {
    fn equivalent(&self, other: &Self) -> bool {
        self.name.equivalent(&other.name) && self.value.equivalent(&other.value)
    }
}

/// `BEGIN TRANSACTION`.
#[derive(Debug, Clone, PartialEq)]
pub struct BeginTransaction {
    pub begin_token: Token,
    pub transaction_token: Token,
    pub span: Span,
}

/// `COMMIT`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitTransaction {
    pub commit_token: Token,
    pub span: Span,
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression, produced by the Pratt sub-parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `NULL`
    Null(Token),
    /// `TRUE`, `FALSE`, or a pragma `ON`
    Boolean { token: Token, value: bool },
    /// An integer literal of any base, value as unsigned 64-bit.
    Integer { token: Token, value: u64 },
    /// A decimal literal with a `.` or exponent.
    Float { token: Token, value: f64 },
    /// A single-quoted string, value unquoted.
    String { token: Token, value: EcoString },
    /// A bare identifier.
    Identifier(Identifier),
    /// `schema.table.column`, `table.column`.
    ColumnName {
        schema: Option<Identifier>,
        table: Option<Identifier>,
        column: Identifier,
    },
    /// `name(args…)`
    FunctionCall {
        name: Identifier,
        l_paren: Token,
        args: Vec<Expr>,
        r_paren: Token,
    },
    /// `lhs op rhs`, operator token retained for fidelity.
    BinaryOp {
        op: Token,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `op rhs`, operator token retained for fidelity.
    UnaryOp { op: Token, rhs: Box<Expr> },
    /// `CASE [operand] WHEN … THEN … [ELSE …] END`
    Case(CaseExpr),
    /// A parenthesized tuple: `(a, b, c)`.
    List(Vec<Expr>),
    /// Placeholder produced by error recovery; equivalent to nothing.
    Error(Span),
}

impl Expr {
    /// Returns the source span of the expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Null(token)
            | Self::Boolean { token, .. }
            | Self::Integer { token, .. }
            | Self::Float { token, .. }
            | Self::String { token, .. } => token.span(),
            Self::Identifier(ident) => ident.span(),
            Self::ColumnName {
                schema,
                table,
                column,
            } => {
                let mut span = column.span();
                if let Some(table) = table {
                    span = span.merge(table.span());
                }
                if let Some(schema) = schema {
                    span = span.merge(schema.span());
                }
                span
            }
            Self::FunctionCall { name, r_paren, .. } => name.span().merge(r_paren.span()),
            Self::BinaryOp { lhs, rhs, .. } => lhs.span().merge(rhs.span()),
            Self::UnaryOp { op, rhs } => op.span().merge(rhs.span()),
            Self::Case(case) => case.case_token.span().merge(case.end_token.span()),
            Self::List(items) => items
                .iter()
                .map(Expr::span)
                .reduce(Span::merge)
                .unwrap_or_default(),
            Self::Error(span) => *span,
        }
    }

    /// Returns `true` for the error-recovery placeholder.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl Equivalent for Expr {
    fn equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null(_), Self::Null(_)) => true,
            (Self::Boolean { value: a, .. }, Self::Boolean { value: b, .. }) => a == b,
            // Numbers compare by source text to stay bit-exact.
            (Self::Integer { token: a, .. }, Self::Integer { token: b, .. })
            | (Self::Float { token: a, .. }, Self::Float { token: b, .. }) => {
                a.text() == b.text()
            }
            (Self::String { value: a, .. }, Self::String { value: b, .. }) => a == b,
            (Self::Identifier(a), Self::Identifier(b)) => a.equivalent(b),
            (
                Self::ColumnName {
                    schema: sa,
                    table: ta,
                    column: ca,
                },
                Self::ColumnName {
                    schema: sb,
                    table: tb,
                    column: cb,
                },
            ) => {
                option_equivalent(sa.as_ref(), sb.as_ref())
                    && option_equivalent(ta.as_ref(), tb.as_ref())
                    && ca.equivalent(cb)
            }
            (
                Self::FunctionCall {
                    name: na, args: aa, ..
                },
                Self::FunctionCall {
                    name: nb, args: ab, ..
                },
            ) => na.equivalent(nb) && slice_equivalent(aa, ab),
            (
                Self::BinaryOp {
                    op: oa,
                    lhs: la,
                    rhs: ra,
                },
                Self::BinaryOp {
                    op: ob,
                    lhs: lb,
                    rhs: rb,
                },
            ) => oa.text() == ob.text() && la.equivalent(lb) && ra.equivalent(rb),
            (Self::UnaryOp { op: oa, rhs: ra }, Self::UnaryOp { op: ob, rhs: rb }) => {
                oa.text() == ob.text() && ra.equivalent(rb)
            }
            (Self::Case(a), Self::Case(b)) => a.equivalent(b),
            (Self::List(a), Self::List(b)) => slice_equivalent(a, b),
            // Error nodes poison equivalence; different variants never match.
            _ => false,
        }
    }
}

/// A CASE expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub case_token: Token,
    pub operand: Option<Box<Expr>>,
    pub arms: Vec<WhenThen>,
    pub else_token: Option<Token>,
    pub else_expr: Option<Box<Expr>>,
    pub end_token: Token,
}

impl Equivalent for CaseExpr {
    fn equivalent(&self, other: &Self) -> bool {
        let operands = match (&self.operand, &other.operand) {
            (None, None) => true,
            (Some(a), Some(b)) => a.equivalent(b),
            _ => false,
        };
        let elses = match (&self.else_expr, &other.else_expr) {
            (None, None) => true,
            (Some(a), Some(b)) => a.equivalent(b),
            _ => false,
        };
        operands
            && elses
            && self.arms.len() == other.arms.len()
            && self
                .arms
                .iter()
                .zip(&other.arms)
                .all(|(a, b)| a.when.equivalent(&b.when) && a.then.equivalent(&b.then))
    }
}

/// One `WHEN … THEN …` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenThen {
    pub when_token: Token,
    pub when: Expr,
    pub then_token: Token,
    pub then: Expr,
}
