//! Table storage: rows keyed by stable row ids, with synchronous index
//! maintenance and validate-before-mutate constraint checking.

pub mod query;
#[allow(clippy::module_inception)]
pub mod table;
pub mod validation;


use std::collections::BTreeMap;

use crate::value::Value;

/// Stable row identity: monotonically increasing, never reused.
pub type RowId = u64;

/// One stored record: column name to value mapping.
pub type Row = BTreeMap<String, Value>;

pub use query::{CompareOp, Condition, Predicate};
pub use table::Table;
