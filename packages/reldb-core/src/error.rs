//! Database error types.

use thiserror::Error;

/// Database operation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    /// Malformed statement text
    #[error("Syntax error at position {position}: expected {expected}")]
    SyntaxError { position: usize, expected: String },

    /// Table already exists
    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Table not found
    #[error("Table '{table}' not found")]
    TableNotFound { table: String },

    /// Column not found in table schema
    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// Duplicate column name in a table definition
    #[error("Duplicate column '{column}' in table definition")]
    DuplicateColumn { column: String },

    /// More than one primary key column in a table definition
    #[error("Table definition declares more than one primary key column")]
    MultiplePrimaryKeys,

    /// Value tag differs from the declared or compared type
    #[error("Type mismatch on column '{column}': expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: String,
        got: String,
    },

    /// Missing or NULL value for a NOT NULL column
    #[error("Column '{column}' cannot be null")]
    NotNullViolation { column: String },

    /// Duplicate value in a primary key column
    #[error("Duplicate primary key: {column}={value} already exists")]
    PrimaryKeyViolation { column: String, value: String },

    /// Duplicate value in a unique column
    #[error("Duplicate entry: {column}={value} already exists")]
    UniqueViolation { column: String, value: String },

    /// Row id not present in the table
    #[error("Row {row_id} not found in table '{table}'")]
    RowNotFound { table: String, row_id: u64 },

    /// Malformed or unreadable persistence document
    #[error("Persistence error: {0}")]
    PersistenceError(String),
}
