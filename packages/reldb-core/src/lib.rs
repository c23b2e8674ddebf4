//! Core engine for a minimal in-memory relational database.
//!
//! Provides typed values, table schemas with primary/unique constraints,
//! hash indexes, a small SQL-like statement language, and JSON persistence.

pub mod database;
pub mod error;
pub mod executor;
pub mod index;
pub mod persistence;
pub mod schema;
pub mod sql;
pub mod table;
pub mod value;

pub use database::Database;
pub use error::DbError;
pub use executor::ExecuteResult;
pub use value::{DataType, Value};
