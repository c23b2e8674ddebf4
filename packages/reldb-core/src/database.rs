//! Database container managing tables, the unit of persistence.
//!
//! The database is a plain mutable value with no interior locking: the engine
//! assumes exactly one logical writer, and embedding adapters serialize their
//! own access.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::DbError;
use crate::executor::{self, ExecuteResult};
use crate::persistence;
use crate::schema::Schema;
use crate::sql;
use crate::table::Table;

/// Database container holding all tables.
#[derive(Debug, Default)]
pub struct Database {
    /// Map of table name to table instance, ordered for stable persistence
    tables: BTreeMap<String, Table>,
}

impl Database {
    /// Creates a new empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table with the given name and schema.
    pub fn create_table(&mut self, name: String, schema: Schema) -> Result<(), DbError> {
        if self.tables.contains_key(&name) {
            return Err(DbError::TableAlreadyExists(name));
        }
        let table = Table::create(name.clone(), schema);
        self.tables.insert(name, table);
        Ok(())
    }

    /// Gets a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Result<&Table, DbError> {
        self.tables.get(name).ok_or_else(|| DbError::TableNotFound {
            table: name.to_string(),
        })
    }

    /// Gets a mutable reference to a table by name.
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table, DbError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DbError::TableNotFound {
                table: name.to_string(),
            })
    }

    /// Adds an already-built table, used when restoring from persistence.
    pub(crate) fn insert_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Returns all table names in sorted order.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// Returns the number of tables in the database.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Iterates tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Parses and executes one statement. The adapter-facing entry point.
    pub fn execute(&mut self, statement_text: &str) -> Result<ExecuteResult, DbError> {
        let statement = sql::parse(statement_text)?;
        executor::execute(self, &statement)
    }

    /// Saves the whole database to a JSON document file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DbError> {
        persistence::save_to_path(self, path.as_ref())
    }

    /// Loads a database from a JSON document file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DbError> {
        persistence::load_from_path(path.as_ref())
    }
}
