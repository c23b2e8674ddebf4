//! Hash index: value to row-id-set lookup for one column.
//!
//! An index holds row ids only, never row data. It is kept in lockstep with
//! its table: every insert/update/delete that touches the indexed column
//! updates the index in the same logical step.

use std::collections::{BTreeSet, HashMap};

use crate::error::DbError;
use crate::table::{Row, RowId};
use crate::value::Value;

/// Per-column mapping from value to the set of row ids holding that value.
#[derive(Debug, Clone)]
pub struct Index {
    /// Indexed column name
    column: String,
    /// Unique constraint: every mapped set has size <= 1
    unique: bool,
    /// Primary key flag, only used to pick the error variant on violation
    primary: bool,
    entries: HashMap<Value, BTreeSet<RowId>>,
}

impl Index {
    /// Creates an empty index for the given column.
    pub fn new(column: impl Into<String>, unique: bool, primary: bool) -> Self {
        Self {
            column: column.into(),
            unique,
            primary,
            entries: HashMap::new(),
        }
    }

    /// Returns the indexed column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns true if the index enforces uniqueness.
    pub fn unique(&self) -> bool {
        self.unique
    }

    /// Row ids currently holding `value`, in ascending order.
    pub fn lookup(&self, value: &Value) -> Vec<RowId> {
        self.entries
            .get(value)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Checks whether inserting `value` would violate uniqueness, without
    /// mutating the index. `ignore` excludes a row's own current entry, for
    /// update pre-checks.
    pub fn check_unique(&self, value: &Value, ignore: Option<RowId>) -> Result<(), DbError> {
        if !self.unique {
            return Ok(());
        }
        let occupied = self
            .entries
            .get(value)
            .map(|ids| ids.iter().any(|id| Some(*id) != ignore))
            .unwrap_or(false);
        if occupied {
            return Err(self.violation(value));
        }
        Ok(())
    }

    /// Adds a row id under `value`.
    ///
    /// For unique indexes, fails when the value is already mapped to another
    /// row and leaves the index unchanged.
    pub fn insert(&mut self, value: Value, row_id: RowId) -> Result<(), DbError> {
        self.check_unique(&value, Some(row_id))?;
        self.entries.entry(value).or_default().insert(row_id);
        Ok(())
    }

    /// Removes a row id from the set for `value`, dropping emptied keys.
    pub fn remove(&mut self, value: &Value, row_id: RowId) {
        if let Some(ids) = self.entries.get_mut(value) {
            ids.remove(&row_id);
            if ids.is_empty() {
                self.entries.remove(value);
            }
        }
    }

    /// Clears the index and replays every row in ascending row-id order.
    ///
    /// Used after loading from persistence so the index exactly matches the
    /// loaded rows regardless of on-disk ordering.
    pub fn rebuild<'a>(
        &mut self,
        rows: impl Iterator<Item = (RowId, &'a Row)>,
    ) -> Result<(), DbError> {
        self.entries.clear();
        for (row_id, row) in rows {
            if let Some(value) = row.get(&self.column) {
                self.insert(value.clone(), row_id)?;
            }
        }
        Ok(())
    }

    fn violation(&self, value: &Value) -> DbError {
        if self.primary {
            DbError::PrimaryKeyViolation {
                column: self.column.clone(),
                value: value.to_string(),
            }
        } else {
            DbError::UniqueViolation {
                column: self.column.clone(),
                value: value.to_string(),
            }
        }
    }
}
