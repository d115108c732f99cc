use chrono::{DateTime, Utc};
use moredata_core_types::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::schema::FieldType;

/// Dynamic value of a single record field
///
/// Values are totally ordered so they can serve directly as sort keys.
/// Variants order as declared (`Null` first), then by content.
/// `Set` contents are kept sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Text(String),
    Date(DateTime<Utc>),
    Set(Vec<Value>),
}

impl Value {
    /// Build a set value, normalising element order
    pub fn set<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let items: BTreeSet<Value> = items.into_iter().map(Into::into).collect();
        Value::Set(items.into_iter().collect())
    }

    /// Check if this value is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text content, if this is a `Text` value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the elements, if this is a `Set` value
    pub fn as_set(&self) -> Option<&[Value]> {
        match self {
            Value::Set(items) => Some(items),
            _ => None,
        }
    }

    /// The field type this value belongs to (`None` for `Null`)
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(FieldType::Bool),
            Value::Integer(_) => Some(FieldType::Integer),
            Value::Text(_) => Some(FieldType::Text),
            Value::Date(_) => Some(FieldType::Date),
            Value::Set(_) => Some(FieldType::Set),
        }
    }

    /// True when both values are non-null and of the same variant
    pub fn is_comparable_with(&self, other: &Value) -> bool {
        !self.is_null()
            && !other.is_null()
            && std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", if *b { 1 } else { 0 }),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        _ => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Value::Date(d) => write!(f, "CAST(\"{}\", \"NSDate\")", d.to_rfc3339()),
            Value::Set(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Value::Text(id.as_str().to_string())
    }
}

impl From<&EntityId> for Value {
    fn from(id: &EntityId) -> Self {
        Value::Text(id.as_str().to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::set(items)
    }
}

impl<T: Into<Value>> From<BTreeSet<T>> for Value {
    fn from(items: BTreeSet<T>) -> Self {
        Value::set(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_null_sorts_first() {
        let mut values = vec![Value::from(3), Value::Null, Value::from(1)];
        values.sort();
        assert_eq!(values, vec![Value::Null, Value::from(1), Value::from(3)]);
    }

    #[test]
    fn test_set_is_normalised() {
        let a = Value::from(vec!["b", "a", "b"]);
        let b = Value::from(vec!["a", "b"]);
        assert_eq!(a, b);
        assert_eq!(a.as_set().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn test_display_escapes_quotes() {
        assert_eq!(Value::from("say \"hi\"").to_string(), "\"say \\\"hi\\\"\"");
        assert_eq!(Value::from(true).to_string(), "1");
        assert_eq!(Value::Null.to_string(), "nil");
        assert_eq!(Value::from(vec![18, 25]).to_string(), "{18, 25}");
    }

    #[test]
    fn test_comparable_requires_same_variant() {
        let date = Value::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert!(date.is_comparable_with(&date));
        assert!(!Value::from(1).is_comparable_with(&Value::from("1")));
        assert!(!Value::Null.is_comparable_with(&Value::Null));
    }
}
