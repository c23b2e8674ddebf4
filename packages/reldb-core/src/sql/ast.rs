//! Typed statement AST, one variant per command kind.

use crate::table::Predicate;
use crate::value::{DataType, Value};

/// Column definition inside a CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub primary_key: bool,
    pub unique: bool,
    pub not_null: bool,
}

/// SELECT projection: every column or an explicit list.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    All,
    Columns(Vec<String>),
}

/// Single equality join: `JOIN <table> ON left.<col> = <table>.<col>`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// Right-hand table
    pub table: String,
    /// Join column on the FROM table
    pub left_column: String,
    /// Join column on the joined table
    pub right_column: String,
}

/// A parsed statement. Stateless and replayable; the executor never mutates
/// it.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable {
        name: String,
        columns: Vec<ColumnDef>,
        /// Table-level `PRIMARY KEY(<col>)` clause
        primary_key: Option<String>,
    },
    Insert {
        table: String,
        columns: Vec<String>,
        values: Vec<Value>,
    },
    Select {
        table: String,
        projection: Projection,
        join: Option<JoinClause>,
        predicate: Predicate,
    },
    Update {
        table: String,
        assignments: Vec<(String, Value)>,
        predicate: Predicate,
    },
    Delete {
        table: String,
        predicate: Predicate,
    },
}
