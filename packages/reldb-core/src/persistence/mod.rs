//! JSON-document persistence: whole-database save and load.
//!
//! The document maps each table name to its schema (column names, types,
//! flags) and its rows in ascending row-id order. Indexes and row ids are not
//! persisted; load reassigns ids in document order and rebuilds every index,
//! so `load(save(db))` is observationally equivalent to `db`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::DbError;
use crate::schema::{Column, Schema};
use crate::table::{Row, Table};

/// One table in the persistence document.
#[derive(Debug, Serialize, Deserialize)]
pub struct TableDocument {
    /// Column definitions in declaration order
    pub schema: Vec<Column>,
    /// Rows in ascending row-id order
    pub rows: Vec<Row>,
}

/// The whole-database document: table name to table contents, name-ordered.
pub type Document = BTreeMap<String, TableDocument>;

/// Serializes a database into a document.
pub fn to_document(db: &Database) -> Document {
    db.tables()
        .map(|table| {
            (
                table.name.clone(),
                TableDocument {
                    schema: table.schema().columns().cloned().collect(),
                    rows: table.rows().map(|(_, row)| row.clone()).collect(),
                },
            )
        })
        .collect()
}

/// Reconstructs a database from a document.
///
/// Schema and constraint violations inside the document (duplicate columns,
/// duplicate primary keys, rows that do not match their schema) surface as
/// [`DbError::PersistenceError`]: the document is malformed. Nothing is
/// partially populated on failure; the database is only returned complete.
pub fn from_document(document: Document) -> Result<Database, DbError> {
    let mut db = Database::new();
    for (name, table_document) in document {
        let table = restore_table(&name, table_document)
            .map_err(|e| DbError::PersistenceError(format!("table '{}': {}", name, e)))?;
        db.insert_table(table);
    }
    Ok(db)
}

fn restore_table(name: &str, document: TableDocument) -> Result<Table, DbError> {
    let schema = Schema::new(document.schema)?;
    Table::restore(name.to_string(), schema, document.rows)
}

/// Saves the database document to a file, writing a temporary file first and
/// renaming it into place.
pub fn save_to_path(db: &Database, path: &Path) -> Result<(), DbError> {
    let document = to_document(db);
    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| DbError::PersistenceError(e.to_string()))?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json)
        .map_err(|e| DbError::PersistenceError(format!("writing {}: {}", temp_path.display(), e)))?;
    fs::rename(&temp_path, path)
        .map_err(|e| DbError::PersistenceError(format!("renaming {}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), tables = db.table_count(), "saved database");
    Ok(())
}

/// Loads a database document from a file.
pub fn load_from_path(path: &Path) -> Result<Database, DbError> {
    let json = fs::read_to_string(path)
        .map_err(|e| DbError::PersistenceError(format!("reading {}: {}", path.display(), e)))?;
    let document: Document =
        serde_json::from_str(&json).map_err(|e| DbError::PersistenceError(e.to_string()))?;
    let db = from_document(document)?;
    tracing::debug!(path = %path.display(), tables = db.table_count(), "loaded database");
    Ok(db)
}
