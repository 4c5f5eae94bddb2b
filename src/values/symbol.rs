//! # Symbol Representation
//!
//! A symbol is one distinct value in a column's symbol table. On the wire
//! each symbol is a 1-byte type tag followed by a payload:
//!
//! | Tag | Variant      | Payload                                  |
//! |-----|--------------|------------------------------------------|
//! | 1   | `Int`        | 4-byte little-endian signed int          |
//! | 2   | `Double`     | 8-byte little-endian IEEE-754 binary64   |
//! | 4   | `Text`       | UTF-8 bytes, NUL-terminated              |
//! | 5   | `DualInt`    | 4-byte LE int, then UTF-8, then NUL      |
//! | 6   | `DualDouble` | 8-byte LE double, then UTF-8, then NUL   |
//!
//! The dual variants pair a numeric value with its display string; the
//! string is the symbol's primary rendering.
//!
//! ## Equality and hashing
//!
//! Symbols are dedup keys, so they need lawful `Eq`/`Hash`. Doubles are
//! compared and hashed by bit pattern: two symbols are equal exactly when
//! every component matches, and NaN payloads dedup against themselves.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use super::Value;

pub const TAG_INT: u8 = 1;
pub const TAG_DOUBLE: u8 = 2;
pub const TAG_TEXT: u8 = 4;
pub const TAG_DUAL_INT: u8 = 5;
pub const TAG_DUAL_DOUBLE: u8 = 6;

/// One distinct value in a column's symbol table.
#[derive(Debug, Clone)]
pub enum Symbol<'a> {
    Int(i32),
    Double(f64),
    Text(Cow<'a, str>),
    DualInt(i32, Cow<'a, str>),
    DualDouble(f64, Cow<'a, str>),
}

impl<'a> Symbol<'a> {
    /// Wire type tag for this variant.
    pub fn tag(&self) -> u8 {
        match self {
            Symbol::Int(_) => TAG_INT,
            Symbol::Double(_) => TAG_DOUBLE,
            Symbol::Text(_) => TAG_TEXT,
            Symbol::DualInt(..) => TAG_DUAL_INT,
            Symbol::DualDouble(..) => TAG_DUAL_DOUBLE,
        }
    }

    /// The primary rendering of this symbol: the string component when one
    /// is present, else the integer, else the double.
    pub fn primary(&self) -> Value<'_> {
        match self {
            Symbol::Int(i) => Value::Int(*i as i64),
            Symbol::Double(d) => Value::Double(*d),
            Symbol::Text(s) | Symbol::DualInt(_, s) | Symbol::DualDouble(_, s) => {
                Value::Text(Cow::Borrowed(s.as_ref()))
            }
        }
    }

    /// Classifies a raw cell into its wire shape.
    ///
    /// Whole numbers inside the i32 range become `DualInt` with the decimal
    /// text of the value; every other number becomes `DualDouble`; text
    /// stays text. Returns `None` for null cells, which have no symbol
    /// representation; the caller decides whether that is an error.
    pub fn classify(value: Value<'a>) -> Option<Symbol<'a>> {
        match value {
            Value::Null => None,
            Value::Int(i) => {
                if let Ok(narrow) = i32::try_from(i) {
                    Some(Symbol::DualInt(narrow, Cow::Owned(narrow.to_string())))
                } else {
                    Some(Symbol::DualDouble(i as f64, Cow::Owned(i.to_string())))
                }
            }
            Value::Double(d) => {
                if d.is_finite()
                    && d.fract() == 0.0
                    && d >= i32::MIN as f64
                    && d <= i32::MAX as f64
                {
                    let narrow = d as i32;
                    Some(Symbol::DualInt(narrow, Cow::Owned(narrow.to_string())))
                } else {
                    Some(Symbol::DualDouble(d, Cow::Owned(d.to_string())))
                }
            }
            Value::Text(s) => Some(Symbol::Text(s)),
        }
    }

    /// Detaches the symbol from any borrowed buffer.
    pub fn into_owned(self) -> Symbol<'static> {
        match self {
            Symbol::Int(i) => Symbol::Int(i),
            Symbol::Double(d) => Symbol::Double(d),
            Symbol::Text(s) => Symbol::Text(Cow::Owned(s.into_owned())),
            Symbol::DualInt(i, s) => Symbol::DualInt(i, Cow::Owned(s.into_owned())),
            Symbol::DualDouble(d, s) => Symbol::DualDouble(d, Cow::Owned(s.into_owned())),
        }
    }
}

impl PartialEq for Symbol<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Symbol::Int(a), Symbol::Int(b)) => a == b,
            (Symbol::Double(a), Symbol::Double(b)) => a.to_bits() == b.to_bits(),
            (Symbol::Text(a), Symbol::Text(b)) => a == b,
            (Symbol::DualInt(a, s), Symbol::DualInt(b, t)) => a == b && s == t,
            (Symbol::DualDouble(a, s), Symbol::DualDouble(b, t)) => {
                a.to_bits() == b.to_bits() && s == t
            }
            _ => false,
        }
    }
}

impl Eq for Symbol<'_> {}

impl Hash for Symbol<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.tag());
        match self {
            Symbol::Int(i) => i.hash(state),
            Symbol::Double(d) => d.to_bits().hash(state),
            Symbol::Text(s) => s.hash(state),
            Symbol::DualInt(i, s) => {
                i.hash(state);
                s.hash(state);
            }
            Symbol::DualDouble(d, s) => {
                d.to_bits().hash(state);
                s.hash(state);
            }
        }
    }
}
