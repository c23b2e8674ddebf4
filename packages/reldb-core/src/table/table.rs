//! Table: one relation owning its schema, rows, and indexes.

use std::collections::{BTreeMap, HashMap};

use crate::error::DbError;
use crate::index::Index;
use crate::schema::Schema;
use crate::value::Value;

use super::query::{CompareOp, Condition, Predicate};
use super::validation;
use super::{Row, RowId};

/// A single table: schema, rows in ascending row-id order, and one index per
/// unique/primary column.
#[derive(Debug)]
pub struct Table {
    /// Table name
    pub name: String,
    schema: Schema,
    rows: BTreeMap<RowId, Row>,
    indexes: HashMap<String, Index>,
    next_row_id: RowId,
}

impl Table {
    /// Creates an empty table. One index is built per indexed column of the
    /// schema; row ids start at 1.
    pub fn create(name: String, schema: Schema) -> Self {
        let indexes = schema
            .indexed_columns()
            .map(|column| {
                (
                    column.name.clone(),
                    Index::new(column.name.clone(), column.unique, column.primary_key),
                )
            })
            .collect();
        Self {
            name,
            schema,
            rows: BTreeMap::new(),
            indexes,
            next_row_id: 1,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the column has an index.
    pub fn has_index(&self, column: &str) -> bool {
        self.indexes.contains_key(column)
    }

    /// Fetches a row by id.
    pub fn get(&self, row_id: RowId) -> Option<&Row> {
        self.rows.get(&row_id)
    }

    /// Iterates all rows in ascending row-id order.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &Row)> {
        self.rows.iter().map(|(id, row)| (*id, row))
    }

    /// Inserts a candidate row.
    ///
    /// Shape validation and every uniqueness check complete before any row or
    /// index mutation, so a failed insert leaves the table unchanged.
    pub fn insert(&mut self, mut values: Row) -> Result<RowId, DbError> {
        validation::validate_insert(&self.name, &self.schema, &mut values)?;
        for index in self.indexes.values() {
            if let Some(value) = values.get(index.column()) {
                index.check_unique(value, None)?;
            }
        }

        let row_id = self.next_row_id;
        self.next_row_id += 1;
        for index in self.indexes.values_mut() {
            if let Some(value) = values.get(index.column()) {
                // Cannot fail: uniqueness was pre-checked above.
                index.insert(value.clone(), row_id)?;
            }
        }
        self.rows.insert(row_id, values);
        tracing::debug!(table = %self.name, row_id, "inserted row");
        Ok(row_id)
    }

    /// Applies a partial change set to one row.
    ///
    /// Changed indexed columns are pre-checked against uniqueness, ignoring
    /// the row's own current entry, before any index entry is swapped.
    pub fn update(&mut self, row_id: RowId, mut changes: Row) -> Result<(), DbError> {
        let row = self.rows.get(&row_id).ok_or_else(|| DbError::RowNotFound {
            table: self.name.clone(),
            row_id,
        })?;
        validation::validate_update(&self.name, &self.schema, &mut changes)?;

        let mut index_swaps = Vec::new();
        for index in self.indexes.values() {
            if let Some(new_value) = changes.get(index.column()) {
                index.check_unique(new_value, Some(row_id))?;
                index_swaps.push((
                    index.column().to_string(),
                    row.get(index.column()).cloned(),
                    new_value.clone(),
                ));
            }
        }

        // Commit point: swap index entries, then write the new values.
        for (column, old_value, new_value) in index_swaps {
            if let Some(index) = self.indexes.get_mut(&column) {
                if let Some(old_value) = old_value {
                    index.remove(&old_value, row_id);
                }
                index.insert(new_value, row_id)?;
            }
        }
        if let Some(row) = self.rows.get_mut(&row_id) {
            row.extend(changes);
        }
        tracing::debug!(table = %self.name, row_id, "updated row");
        Ok(())
    }

    /// Removes a row and its entries from every index.
    pub fn delete(&mut self, row_id: RowId) -> Result<(), DbError> {
        let row = self.rows.remove(&row_id).ok_or_else(|| DbError::RowNotFound {
            table: self.name.clone(),
            row_id,
        })?;
        for index in self.indexes.values_mut() {
            if let Some(value) = row.get(index.column()) {
                index.remove(value, row_id);
            }
        }
        tracing::debug!(table = %self.name, row_id, "deleted row");
        Ok(())
    }

    /// Lazily scans rows satisfying the predicate, in ascending row-id order.
    ///
    /// Each call is a fresh traversal; the iterator yields an error item if a
    /// predicate term compares mismatched value tags.
    pub fn scan<'a>(
        &'a self,
        predicate: &'a Predicate,
    ) -> impl Iterator<Item = Result<(RowId, &'a Row), DbError>> + 'a {
        self.rows.iter().filter_map(move |(id, row)| {
            match predicate.matches(row) {
                Ok(true) => Some(Ok((*id, row))),
                Ok(false) => None,
                Err(e) => Some(Err(e)),
            }
        })
    }

    /// Equality lookup through the column's index, falling back to a full
    /// scan when the column is not indexed. Same result set either way.
    pub fn scan_by_index(&self, column: &str, value: &Value) -> Result<Vec<(RowId, &Row)>, DbError> {
        if let Some(index) = self.indexes.get(column) {
            let mut matches = Vec::new();
            for row_id in index.lookup(value) {
                if let Some(row) = self.rows.get(&row_id) {
                    matches.push((row_id, row));
                }
            }
            return Ok(matches);
        }

        let condition = Condition {
            column: column.to_string(),
            op: CompareOp::Eq,
            value: value.clone(),
        };
        let mut matches = Vec::new();
        for (row_id, row) in self.rows() {
            if condition.matches(row)? {
                matches.push((row_id, row));
            }
        }
        Ok(matches)
    }

    /// Rebuilds a table from persisted rows.
    ///
    /// Row ids are reassigned in document order starting at 1; the next id
    /// counter resumes past the highest assigned id and every index is
    /// rebuilt by replaying the rows.
    pub(crate) fn restore(name: String, schema: Schema, rows: Vec<Row>) -> Result<Self, DbError> {
        let mut table = Self::create(name, schema);
        for (offset, mut row) in rows.into_iter().enumerate() {
            validation::validate_insert(&table.name, &table.schema, &mut row)?;
            table.rows.insert(offset as RowId + 1, row);
        }
        table.next_row_id = table.rows.keys().next_back().copied().unwrap_or(0) + 1;
        table.rebuild_indexes()?;
        Ok(table)
    }

    fn rebuild_indexes(&mut self) -> Result<(), DbError> {
        for index in self.indexes.values_mut() {
            index.rebuild(self.rows.iter().map(|(id, row)| (*id, row)))?;
        }
        Ok(())
    }
}
