//! Typed leaf values
//!
//! Element text and attribute values share one codec. The boolean
//! vocabulary is part of the stored format and must never change:
//!
//! | value | accepted on read      | written |
//! |-------|-----------------------|---------|
//! | true  | `true`, `True`, `1`   | `true`  |
//! | false | `false`, `False`, `0` | `false` |

use super::format::{render, shortest, Arg};
use crate::error::{Error, Result};
use std::fmt;

/// Literals read as `true`
pub const TRUE_LITERALS: [&str; 3] = ["true", "True", "1"];

/// Literals read as `false`
pub const FALSE_LITERALS: [&str; 3] = ["false", "False", "0"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Real,
    Boolean,
}

/// A leaf value of any supported type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Decode stored text as a value of `kind`
    pub fn parse_as(kind: ValueKind, path: &str, text: &str) -> Result<Value> {
        Ok(match kind {
            ValueKind::Text => Value::Text(text.to_string()),
            ValueKind::Integer => Value::Integer(i64::from_text(path, text)?),
            ValueKind::Real => Value::Real(f64::from_text(path, text)?),
            ValueKind::Boolean => Value::Boolean(bool::from_text(path, text)?),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => f.write_str(&shortest(*r)),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

// ============================================================================
// Scalar codec
// ============================================================================

/// A type that can be stored as element text or an attribute value
pub trait Scalar: Sized {
    const KIND: ValueKind;

    /// Decode stored text; `path` is only used for error context
    fn from_text(path: &str, text: &str) -> Result<Self>;

    /// Encode for storage. `format` is a printf-style pattern; `None`
    /// writes the canonical form.
    fn to_text(&self, format: Option<&str>) -> Result<String>;

    /// Kind of this particular value
    fn kind(&self) -> ValueKind {
        Self::KIND
    }
}

fn no_number(path: &str, text: &str) -> Error {
    Error::NoNumber {
        path: path.to_string(),
        text: text.to_string(),
    }
}

impl Scalar for String {
    const KIND: ValueKind = ValueKind::Text;

    fn from_text(_path: &str, text: &str) -> Result<Self> {
        Ok(text.to_string())
    }

    fn to_text(&self, format: Option<&str>) -> Result<String> {
        match format {
            Some(f) => render(f, Arg::Text(self)),
            None => Ok(self.clone()),
        }
    }
}

impl Scalar for i64 {
    const KIND: ValueKind = ValueKind::Integer;

    fn from_text(path: &str, text: &str) -> Result<Self> {
        text.trim().parse().map_err(|_| no_number(path, text))
    }

    fn to_text(&self, format: Option<&str>) -> Result<String> {
        match format {
            Some(f) => render(f, Arg::Int(*self)),
            None => Ok(self.to_string()),
        }
    }
}

impl Scalar for i32 {
    const KIND: ValueKind = ValueKind::Integer;

    fn from_text(path: &str, text: &str) -> Result<Self> {
        text.trim().parse().map_err(|_| no_number(path, text))
    }

    fn to_text(&self, format: Option<&str>) -> Result<String> {
        i64::from(*self).to_text(format)
    }
}

impl Scalar for f64 {
    const KIND: ValueKind = ValueKind::Real;

    fn from_text(path: &str, text: &str) -> Result<Self> {
        text.trim().parse().map_err(|_| no_number(path, text))
    }

    fn to_text(&self, format: Option<&str>) -> Result<String> {
        match format {
            Some(f) => render(f, Arg::Real(*self)),
            None => Ok(shortest(*self)),
        }
    }
}

impl Scalar for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn from_text(path: &str, text: &str) -> Result<Self> {
        let token = text.trim();
        if TRUE_LITERALS.contains(&token) {
            Ok(true)
        } else if FALSE_LITERALS.contains(&token) {
            Ok(false)
        } else {
            Err(Error::InvalidValue {
                path: path.to_string(),
                text: text.to_string(),
                expected: "boolean",
            })
        }
    }

    fn to_text(&self, _format: Option<&str>) -> Result<String> {
        Ok(if *self { "true" } else { "false" }.to_string())
    }
}

impl Scalar for Value {
    const KIND: ValueKind = ValueKind::Text;

    /// Untyped reads always yield text; use [`Value::parse_as`] for others.
    fn from_text(_path: &str, text: &str) -> Result<Self> {
        Ok(Value::Text(text.to_string()))
    }

    fn to_text(&self, format: Option<&str>) -> Result<String> {
        match self {
            Value::Text(s) => s.to_text(format),
            Value::Integer(i) => i.to_text(format),
            Value::Real(r) => r.to_text(format),
            Value::Boolean(b) => b.to_text(format),
        }
    }

    fn kind(&self) -> ValueKind {
        Value::kind(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_vocabulary() {
        for t in TRUE_LITERALS {
            assert!(bool::from_text("/p", t).unwrap());
        }
        for f in FALSE_LITERALS {
            assert!(!bool::from_text("/p", f).unwrap());
        }
        assert!(bool::from_text("/p", " true\n").unwrap());
        assert_eq!(
            bool::from_text("/p", "yes"),
            Err(Error::InvalidValue {
                path: "/p".into(),
                text: "yes".into(),
                expected: "boolean"
            })
        );
        assert!(bool::from_text("/p", "TRUE").is_err());
        assert_eq!(true.to_text(Some("%d")).unwrap(), "true");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(i64::from_text("/p", " 42 ").unwrap(), 42);
        assert_eq!(i32::from_text("/p", "-7").unwrap(), -7);
        assert!(matches!(i32::from_text("/p", "4.5"), Err(Error::NoNumber { .. })));
        assert!(matches!(i32::from_text("/p", "99999999999"), Err(Error::NoNumber { .. })));
        assert_eq!(f64::from_text("/p", "1e-3").unwrap(), 0.001);
        assert!(matches!(f64::from_text("/p", "abc"), Err(Error::NoNumber { .. })));
        assert!(matches!(f64::from_text("/p", ""), Err(Error::NoNumber { .. })));
    }

    #[test]
    fn test_real_formats() {
        assert_eq!(0.1f64.to_text(None).unwrap(), "0.1");
        assert_eq!(2.0f64.to_text(None).unwrap(), "2");
        assert_eq!(3.14159f64.to_text(Some("%.2f")).unwrap(), "3.14");
        assert_eq!(42i64.to_text(Some("%05d")).unwrap(), "00042");
    }

    #[test]
    fn test_value_dispatch() {
        assert_eq!(Value::from(1.5).to_text(None).unwrap(), "1.5");
        assert_eq!(Scalar::kind(&Value::from(true)), ValueKind::Boolean);
        assert_eq!(
            Value::parse_as(ValueKind::Integer, "/p", "12").unwrap(),
            Value::Integer(12)
        );
        assert_eq!(Value::Real(0.25).to_string(), "0.25");
    }
}
