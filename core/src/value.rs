//! Argument values and their wire form.
//!
//! Every value placed into a path segment, a query parameter or a form body
//! goes through [`Value::format`]: timestamps render as RFC 3339, everything
//! else as its plain string.

use std::fmt;

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::OffsetDateTime;

/// A single call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Strings and numbers, already in string form.
    Scalar(String),
    /// A point in time.
    Timestamp(OffsetDateTime),
}

impl Value {
    /// Wire form of the value.
    pub fn format(&self) -> String {
        match self {
            Value::Scalar(s) => s.clone(),
            // Rfc3339 only rejects years outside 0..=9999.
            Value::Timestamp(ts) => ts
                .format(&Rfc3339)
                .or_else(|_| ts.format(&Iso8601::DEFAULT))
                .unwrap_or_else(|_| ts.to_string()),
        }
    }

    /// The point in time this value denotes, if any.
    ///
    /// Scalars count when they parse as RFC 3339 or ISO-8601 date-times, so a
    /// formatted timestamp passed back in as a string is still accepted.
    pub fn as_timestamp(&self) -> Option<OffsetDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            Value::Scalar(s) => OffsetDateTime::parse(s, &Rfc3339)
                .or_else(|_| OffsetDateTime::parse(s, &Iso8601::DEFAULT))
                .ok(),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Scalar(s) => s.parse().ok(),
            Value::Timestamp(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Scalar(s) if s.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Scalar(s.clone())
    }
}

impl From<OffsetDateTime> for Value {
    fn from(ts: OffsetDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

macro_rules! scalar_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Scalar(v.to_string())
                }
            }
        )*
    };
}

scalar_from!(i32, i64, u16, u32, u64, usize, f64, bool);
