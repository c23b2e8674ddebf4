//! Typed cell values and their declared types.
//!
//! Every stored cell and every statement literal is a [`Value`]: a tagged
//! scalar whose tag never changes after construction. Type checks throughout
//! the engine are tag comparisons against a column's [`DataType`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,
    Str,
    Float,
    Bool,
}

impl DataType {
    /// Parses a type keyword as written in a CREATE TABLE statement.
    ///
    /// Keywords are case-insensitive; `integer` and `text` are accepted as
    /// aliases for `int` and `str`.
    pub fn parse_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(Self::Int),
            "str" | "text" => Some(Self::Str),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::Int => "int",
            Self::Str => "str",
            Self::Float => "float",
            Self::Bool => "bool",
        };
        write!(f, "{}", keyword)
    }
}

/// A single cell value or statement literal.
///
/// Serialized untagged so the persistence document stores plain JSON scalars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// Returns the tag of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Str(_) => DataType::Str,
            Self::Float(_) => DataType::Float,
            Self::Bool(_) => DataType::Bool,
        }
    }

    /// Compares two values of the same tag.
    ///
    /// The single supported coercion is numeric: an `Int` compares against a
    /// `Float` as `f64`. Every other cross-tag pair is incomparable and
    /// returns `None`; the caller decides how to report it.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Some(a.total_cmp(b)),
            (Self::Int(a), Self::Float(b)) => Some((*a as f64).total_cmp(b)),
            (Self::Float(a), Self::Int(b)) => Some(a.total_cmp(&(*b as f64))),
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Coerces this value to the given column type.
    ///
    /// An `Int` literal stored into a `Float` column becomes a `Float`; no
    /// other conversion is performed. Returns `None` when the tags are
    /// incompatible.
    pub fn coerce_to(&self, data_type: DataType) -> Option<Value> {
        match (self, data_type) {
            (Self::Int(i), DataType::Float) => Some(Self::Float(*i as f64)),
            (value, expected) if value.data_type() == expected => Some(value.clone()),
            _ => None,
        }
    }
}

// Hand-rolled equality and hashing so floats can key a hash index. Floats
// compare and hash by bit pattern, which keeps Eq and Hash consistent.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Int(i) => {
                0u8.hash(state);
                i.hash(state);
            }
            Self::Str(s) => {
                1u8.hash(state);
                s.hash(state);
            }
            Self::Float(f) => {
                2u8.hash(state);
                f.to_bits().hash(state);
            }
            Self::Bool(b) => {
                3u8.hash(state);
                b.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Str(s) => write!(f, "{}", s),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}
