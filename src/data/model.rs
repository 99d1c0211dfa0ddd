use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{EvaluateError, Result};

// ---------------------------------------------------------------------------
// Value – a single cell in a dataset column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataset dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// One dataset row: column name → value.
pub type Row = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Dataset – the collaborator contract the views read through
// ---------------------------------------------------------------------------

/// Integer-indexed, read-only row access.
///
/// `row` must fail for `index >= len()`. Backends that store rows return
/// them borrowed; columnar backends build an owned row per call.
pub trait Dataset {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn row(&self, index: usize) -> Result<Cow<'_, Row>>;
}

impl<D: Dataset + ?Sized> Dataset for Box<D> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn row(&self, index: usize) -> Result<Cow<'_, Row>> {
        (**self).row(index)
    }
}

// ---------------------------------------------------------------------------
// Table – row-oriented in-memory dataset
// ---------------------------------------------------------------------------

/// Rows held in memory, as parsed from JSON or CSV.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Table { rows }
    }
}

impl Dataset for Table {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Result<Cow<'_, Row>> {
        self.rows
            .get(index)
            .map(Cow::Borrowed)
            .ok_or(EvaluateError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            })
    }
}
