//! Table schema: ordered column definitions and their constraint flags.

use serde::{Deserialize, Serialize};

use crate::error::DbError;
use crate::value::DataType;

/// A single column definition.
///
/// Field names follow the persistence document layout, so this struct
/// serializes directly into the `schema` array of a saved table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within the table
    pub name: String,
    /// Declared value type
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Primary key flag (implies unique and not-null)
    #[serde(rename = "primaryKey", default)]
    pub primary_key: bool,
    /// Unique constraint flag
    #[serde(default)]
    pub unique: bool,
    /// Not-null constraint flag
    #[serde(rename = "notNull", default)]
    pub not_null: bool,
}

impl Column {
    /// Creates a plain column with no constraint flags.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            unique: false,
            not_null: false,
        }
    }

    /// Returns true if the column needs an index (primary key or unique).
    pub fn indexed(&self) -> bool {
        self.primary_key || self.unique
    }
}

/// Ordered, immutable column list for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Builds a schema from column definitions, validating them.
    ///
    /// Fails when a column name repeats or more than one column carries the
    /// primary key flag. A primary key column is normalized to also be
    /// unique and not-null.
    pub fn new(mut columns: Vec<Column>) -> Result<Self, DbError> {
        let mut seen = std::collections::HashSet::new();
        let mut primary_keys = 0;
        for column in &columns {
            if !seen.insert(column.name.clone()) {
                return Err(DbError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
            if column.primary_key {
                primary_keys += 1;
            }
        }
        if primary_keys > 1 {
            return Err(DbError::MultiplePrimaryKeys);
        }

        for column in &mut columns {
            if column.primary_key {
                column.unique = true;
                column.not_null = true;
            }
        }

        Ok(Self { columns })
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns true if the schema contains the named column.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Iterates columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Columns that carry an index (primary key or unique).
    pub fn indexed_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.indexed())
    }

    /// The primary key column, if the table declares one.
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.primary_key)
    }
}
