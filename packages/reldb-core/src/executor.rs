//! Statement execution against a database.
//!
//! The executor resolves table and column names, converts literals to typed
//! values, and delegates constraint enforcement to the table and its indexes.
//! It never mutates the statement; statements are replayable.

use crate::database::Database;
use crate::error::DbError;
use crate::schema::{Column, Schema};
use crate::sql::ast::{JoinClause, Projection, Statement};
use crate::table::{Predicate, Row, RowId, Table};
use crate::value::Value;

/// Outcome of one executed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecuteResult {
    /// CREATE TABLE succeeded
    TableCreated(String),
    /// INSERT succeeded, with the new row's id
    Inserted(RowId),
    /// SELECT result set
    Rows(Vec<Row>),
    /// UPDATE/DELETE affected row count (0 is not an error)
    Affected(usize),
}

/// Applies a parsed statement to the database.
pub fn execute(db: &mut Database, statement: &Statement) -> Result<ExecuteResult, DbError> {
    match statement {
        Statement::CreateTable {
            name,
            columns,
            primary_key,
        } => execute_create_table(db, name, columns, primary_key.as_deref()),
        Statement::Insert {
            table,
            columns,
            values,
        } => execute_insert(db, table, columns, values),
        Statement::Select {
            table,
            projection,
            join,
            predicate,
        } => execute_select(db, table, projection, join.as_ref(), predicate),
        Statement::Update {
            table,
            assignments,
            predicate,
        } => execute_update(db, table, assignments, predicate),
        Statement::Delete { table, predicate } => execute_delete(db, table, predicate),
    }
}

fn execute_create_table(
    db: &mut Database,
    name: &str,
    defs: &[crate::sql::ast::ColumnDef],
    primary_key: Option<&str>,
) -> Result<ExecuteResult, DbError> {
    let mut columns: Vec<Column> = defs
        .iter()
        .map(|def| Column {
            name: def.name.clone(),
            data_type: def.data_type,
            primary_key: def.primary_key,
            unique: def.unique,
            not_null: def.not_null,
        })
        .collect();

    if let Some(pk) = primary_key {
        let column = columns
            .iter_mut()
            .find(|c| c.name == pk)
            .ok_or_else(|| DbError::UnknownColumn {
                table: name.to_string(),
                column: pk.to_string(),
            })?;
        column.primary_key = true;
    }

    let schema = Schema::new(columns)?;
    db.create_table(name.to_string(), schema)?;
    tracing::debug!(table = name, "created table");
    Ok(ExecuteResult::TableCreated(name.to_string()))
}

fn execute_insert(
    db: &mut Database,
    table_name: &str,
    columns: &[String],
    values: &[Value],
) -> Result<ExecuteResult, DbError> {
    let table = db.get_table_mut(table_name)?;

    let mut row = Row::new();
    for (column, value) in columns.iter().zip(values) {
        if row.insert(column.clone(), value.clone()).is_some() {
            return Err(DbError::DuplicateColumn {
                column: column.clone(),
            });
        }
    }

    let row_id = table.insert(row)?;
    Ok(ExecuteResult::Inserted(row_id))
}

fn execute_select(
    db: &Database,
    table_name: &str,
    projection: &Projection,
    join: Option<&JoinClause>,
    predicate: &Predicate,
) -> Result<ExecuteResult, DbError> {
    let table = db.get_table(table_name)?;

    let combined = match join {
        Some(join) => {
            let right = db.get_table(&join.table)?;
            check_column(table, &join.left_column)?;
            check_column(right, &join.right_column)?;
            check_joined_predicate(table, right, predicate)?;
            join_rows(table, right, join)?
        }
        None => {
            check_predicate(table, predicate)?;
            select_rows(table, predicate)?
        }
    };

    let mut results = Vec::new();
    for row in combined {
        if join.is_some() && !predicate.matches(&row)? {
            continue;
        }
        results.push(project(db, table_name, join, projection, row)?);
    }
    Ok(ExecuteResult::Rows(results))
}

/// Rows of a single table matching the predicate, using the index when the
/// first WHERE term is an equality on an indexed column. Purely a same-result
/// substitution for a full scan: the probe literal goes through the same type
/// check (and Int into Float coercion) a full scan would apply, so a
/// mismatched literal fails identically on both paths.
fn select_rows(table: &Table, predicate: &Predicate) -> Result<Vec<Row>, DbError> {
    if let Some(condition) = predicate.first_equality() {
        if let Some(column) = table.schema().column(&condition.column) {
            if table.has_index(&condition.column) {
                let probe = condition.value.coerce_to(column.data_type).ok_or_else(|| {
                    DbError::TypeMismatch {
                        column: condition.column.clone(),
                        expected: column.data_type.to_string(),
                        got: condition.value.data_type().to_string(),
                    }
                })?;
                let mut rows = Vec::new();
                for (_, row) in table.scan_by_index(&condition.column, &probe)? {
                    if predicate.matches(row)? {
                        rows.push(row.clone());
                    }
                }
                return Ok(rows);
            }
        }
    }
    table
        .scan(predicate)
        .map(|item| item.map(|(_, row)| row.clone()))
        .collect()
}

/// Nested-loop equality join: for each left row, probe the right table's
/// index on the join column when present, else scan. One combined row per
/// matching pair; left column names win on collision.
fn join_rows(left: &Table, right: &Table, join: &JoinClause) -> Result<Vec<Row>, DbError> {
    let mut combined = Vec::new();
    for (_, left_row) in left.rows() {
        let Some(join_value) = left_row.get(&join.left_column) else {
            continue;
        };
        for (_, right_row) in right.scan_by_index(&join.right_column, join_value)? {
            let mut row = right_row.clone();
            row.extend(left_row.clone());
            combined.push(row);
        }
    }
    Ok(combined)
}

fn execute_update(
    db: &mut Database,
    table_name: &str,
    assignments: &[(String, Value)],
    predicate: &Predicate,
) -> Result<ExecuteResult, DbError> {
    let table = db.get_table_mut(table_name)?;
    check_predicate(table, predicate)?;

    let row_ids: Vec<RowId> = table
        .scan(predicate)
        .map(|item| item.map(|(id, _)| id))
        .collect::<Result<_, _>>()?;

    // Assigning one constant to a unique column across several rows can only
    // collide; reject before touching any row so the statement is
    // all-or-nothing.
    if row_ids.len() > 1 {
        for (column, value) in assignments {
            if let Some(column_def) = table.schema().column(column) {
                if column_def.primary_key {
                    return Err(DbError::PrimaryKeyViolation {
                        column: column.clone(),
                        value: value.to_string(),
                    });
                }
                if column_def.unique {
                    return Err(DbError::UniqueViolation {
                        column: column.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }
    }

    for row_id in &row_ids {
        let mut changes = Row::new();
        for (column, value) in assignments {
            changes.insert(column.clone(), value.clone());
        }
        table.update(*row_id, changes)?;
    }
    Ok(ExecuteResult::Affected(row_ids.len()))
}

fn execute_delete(
    db: &mut Database,
    table_name: &str,
    predicate: &Predicate,
) -> Result<ExecuteResult, DbError> {
    let table = db.get_table_mut(table_name)?;
    check_predicate(table, predicate)?;

    let row_ids: Vec<RowId> = table
        .scan(predicate)
        .map(|item| item.map(|(id, _)| id))
        .collect::<Result<_, _>>()?;

    for row_id in &row_ids {
        table.delete(*row_id)?;
    }
    Ok(ExecuteResult::Affected(row_ids.len()))
}

/// Projects one combined row, validating projected column names.
fn project(
    db: &Database,
    table_name: &str,
    join: Option<&JoinClause>,
    projection: &Projection,
    row: Row,
) -> Result<Row, DbError> {
    let columns = match projection {
        Projection::All => return Ok(row),
        Projection::Columns(columns) => columns,
    };

    let mut projected = Row::new();
    for column in columns {
        let known = db.get_table(table_name)?.schema().has_column(column)
            || match join {
                Some(join) => db.get_table(&join.table)?.schema().has_column(column),
                None => false,
            };
        if !known {
            return Err(DbError::UnknownColumn {
                table: table_name.to_string(),
                column: column.clone(),
            });
        }
        if let Some(value) = row.get(column) {
            projected.insert(column.clone(), value.clone());
        }
    }
    Ok(projected)
}

fn check_column(table: &Table, column: &str) -> Result<(), DbError> {
    if !table.schema().has_column(column) {
        return Err(DbError::UnknownColumn {
            table: table.name.clone(),
            column: column.to_string(),
        });
    }
    Ok(())
}

fn check_predicate(table: &Table, predicate: &Predicate) -> Result<(), DbError> {
    for condition in &predicate.conditions {
        check_column(table, &condition.column)?;
    }
    Ok(())
}

/// Predicate columns over a joined row may come from either side.
fn check_joined_predicate(
    left: &Table,
    right: &Table,
    predicate: &Predicate,
) -> Result<(), DbError> {
    for condition in &predicate.conditions {
        if !left.schema().has_column(&condition.column)
            && !right.schema().has_column(&condition.column)
        {
            return Err(DbError::UnknownColumn {
                table: left.name.clone(),
                column: condition.column.clone(),
            });
        }
    }
    Ok(())
}
