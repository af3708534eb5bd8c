//! # Report Values
//!
//! The row shape shared by every report query.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NamedRow = ordered [(column, Value)]                                   │
//! │                                                                         │
//! │    book_id │ title        │ sale_price │ sale_date                      │
//! │    ────────┼──────────────┼────────────┼───────────                     │
//! │    Integer │ Text         │ Decimal    │ Date                           │
//! │                                                                         │
//! │  JSON:  {"book_id": 3, "title": "Dune",                                 │
//! │          "sale_price": "12.50", "sale_date": "2024-05-01"}              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Column order is the SELECT order and survives serialization. Decimals
//! serialize as strings so no cent is lost on the way to a spreadsheet.

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Value
// =============================================================================

/// A single report cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(Money),
    Date(NaiveDate),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<Money> {
        match self {
            Value::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(v) => Some(*v),
            _ => None,
        }
    }
}

/// Plain-text rendering used for tables and CSV cells. Null renders empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(v) => f.write_str(v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Decimal(v) => f.write_str(&v.to_decimal_string()),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::Null => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(v) => serializer.serialize_str(v),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Decimal(v) => serializer.serialize_str(&v.to_decimal_string()),
            Value::Date(v) => serializer.collect_str(&v.format("%Y-%m-%d")),
            Value::Null => serializer.serialize_none(),
        }
    }
}

// =============================================================================
// Column Kind
// =============================================================================

/// How a report column's raw SQLite value is read back.
///
/// SQLite has no DECIMAL or DATE storage class, so prices (INTEGER cents)
/// and dates (TEXT) need the report to say what they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    /// INTEGER cents.
    Decimal,
    /// TEXT `YYYY-MM-DD`.
    Date,
}

// =============================================================================
// Named Row
// =============================================================================

/// One report row: column names paired with values, in SELECT order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedRow {
    cells: Vec<(String, Value)>,
}

impl NamedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column. Callers push in SELECT order.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.cells.push((column.into(), value));
    }

    /// Looks a value up by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for NamedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
