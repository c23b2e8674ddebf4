//! Pure shape validation of candidate rows against a schema.
//!
//! Validation runs to completion before any row or index mutation begins, so
//! a failed insert or update leaves the table unchanged. Uniqueness checks
//! need table-wide state and live in the index, not here.

use crate::error::DbError;
use crate::schema::Schema;
use crate::table::Row;
use crate::value::Value;

/// Validates a full candidate row for insertion.
///
/// Checks, in order: every supplied column exists in the schema, every value
/// matches its declared type (coercing `Int` literals into `Float` columns),
/// and every not-null column is present. The candidate is modified only by
/// coercion; on error it may be partially coerced but is discarded by the
/// caller anyway.
pub fn validate_insert(table: &str, schema: &Schema, values: &mut Row) -> Result<(), DbError> {
    check_known_and_typed(table, schema, values)?;

    for column in schema.columns() {
        if column.not_null && !values.contains_key(&column.name) {
            return Err(DbError::NotNullViolation {
                column: column.name.clone(),
            });
        }
    }
    Ok(())
}

/// Validates a partial change set for an update.
///
/// Updates supply only the changed columns, so absent columns are fine; the
/// supplied ones must exist and type-check.
pub fn validate_update(table: &str, schema: &Schema, changes: &mut Row) -> Result<(), DbError> {
    check_known_and_typed(table, schema, changes)
}

fn check_known_and_typed(table: &str, schema: &Schema, values: &mut Row) -> Result<(), DbError> {
    for name in values.keys() {
        if !schema.has_column(name) {
            return Err(DbError::UnknownColumn {
                table: table.to_string(),
                column: name.clone(),
            });
        }
    }

    for (name, value) in values.iter_mut() {
        // Unwrap is safe: unknown columns were rejected above.
        let column = schema.column(name).unwrap();
        match value.coerce_to(column.data_type) {
            Some(coerced) => *value = coerced,
            None => {
                return Err(DbError::TypeMismatch {
                    column: name.clone(),
                    expected: column.data_type.to_string(),
                    got: value.data_type().to_string(),
                });
            }
        }
    }
    Ok(())
}
