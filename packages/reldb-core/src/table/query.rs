//! Predicates: conjunctions of column/operator/literal comparisons.

use std::cmp::Ordering;
use std::fmt;

use crate::error::DbError;
use crate::table::Row;
use crate::value::Value;

/// Comparison operator in a WHERE term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl CompareOp {
    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::NotEq => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Gt => ordering == Ordering::Greater,
            Self::LtEq => ordering != Ordering::Greater,
            Self::GtEq => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
        };
        write!(f, "{}", symbol)
    }
}

/// One `column OP literal` term.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Condition {
    /// Evaluates this term against a row.
    ///
    /// A cell absent from the row (nullable, never set) satisfies no
    /// condition. Comparing mismatched value tags is a type error.
    pub fn matches(&self, row: &Row) -> Result<bool, DbError> {
        match row.get(&self.column) {
            Some(cell) => match cell.compare(&self.value) {
                Some(ordering) => Ok(self.op.accepts(ordering)),
                None => Err(DbError::TypeMismatch {
                    column: self.column.clone(),
                    expected: cell.data_type().to_string(),
                    got: self.value.data_type().to_string(),
                }),
            },
            None => Ok(false),
        }
    }
}

/// Conjunction of conditions. An empty predicate matches every row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Predicate {
    pub conditions: Vec<Condition>,
}

impl Predicate {
    /// The always-true predicate (no WHERE clause).
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates the conjunction against a row.
    pub fn matches(&self, row: &Row) -> Result<bool, DbError> {
        for condition in &self.conditions {
            if !condition.matches(row)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The first term, when it is an equality. Used to pick an indexed scan
    /// path; later equality terms never trigger the index.
    pub fn first_equality(&self) -> Option<&Condition> {
        self.conditions.first().filter(|c| c.op == CompareOp::Eq)
    }
}
