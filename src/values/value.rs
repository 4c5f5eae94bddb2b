//! Public cell type for table rows.

use std::borrow::Cow;

/// A single table cell, as handed to the encoder or materialized from a
/// decoded row.
///
/// `Text` uses `Cow` so cells can borrow from a decoded table (which may in
/// turn borrow from the file buffer) without copying.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Int(i64),
    Double(f64),
    Text(Cow<'a, str>),
}

impl<'a> Value<'a> {
    /// Returns true if this cell is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Detaches the cell from any borrowed buffer.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Int(i) => Value::Int(i),
            Value::Double(d) => Value::Double(d),
            Value::Text(s) => Value::Text(Cow::Owned(s.into_owned())),
        }
    }

    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<Cow<'a, str>>) -> Self {
        Value::Text(s.into())
    }
}

impl From<i64> for Value<'_> {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value<'_> {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'static> {
    fn from(s: String) -> Self {
        Value::Text(Cow::Owned(s))
    }
}
