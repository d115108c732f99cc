use std::cmp::Ordering;

use super::{Comparison, Predicate, TextMatch};
use crate::model::{Record, Value};

impl Predicate {
    /// Evaluate against a single record
    ///
    /// Absent fields read as `Null`. Any comparison involving `Null` is false
    /// except `IsNil`, equality with `Null`, and `!=`. Values of different
    /// types never compare.
    pub fn evaluate<R: Record>(&self, record: &R) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::Compare { field, op, value } => {
                compare(&read(record, field), *op, value)
            }
            Predicate::Text {
                field,
                op,
                text,
                case_insensitive,
            } => match read(record, field) {
                Value::Text(haystack) => match_text(&haystack, *op, text, *case_insensitive),
                _ => false,
            },
            Predicate::Between {
                field,
                lower,
                upper,
            } => {
                let actual = read(record, field);
                actual.is_comparable_with(lower)
                    && actual.is_comparable_with(upper)
                    && *lower <= actual
                    && actual <= *upper
            }
            Predicate::In { field, values } => {
                let actual = read(record, field);
                !actual.is_null() && values.contains(&actual)
            }
            Predicate::ContainsElement { field, element } => match read(record, field) {
                Value::Set(items) => items.contains(element),
                _ => false,
            },
            Predicate::IsNil { field } => read(record, field).is_null(),
            Predicate::IsNotNil { field } => !read(record, field).is_null(),
            Predicate::And { predicates } => predicates.iter().all(|p| p.evaluate(record)),
            Predicate::Or { predicates } => predicates.iter().any(|p| p.evaluate(record)),
            Predicate::Not { predicate } => !predicate.evaluate(record),
        }
    }
}

fn read<R: Record>(record: &R, field: &str) -> Value {
    record.value(field).unwrap_or(Value::Null)
}

fn compare(actual: &Value, op: Comparison, expected: &Value) -> bool {
    match op {
        Comparison::Equal => actual == expected,
        Comparison::NotEqual => actual != expected,
        _ => {
            if !actual.is_comparable_with(expected) {
                return false;
            }
            let ord = actual.cmp(expected);
            match op {
                Comparison::GreaterThan => ord == Ordering::Greater,
                Comparison::LessThan => ord == Ordering::Less,
                Comparison::GreaterOrEqual => ord != Ordering::Less,
                Comparison::LessOrEqual => ord != Ordering::Greater,
                Comparison::Equal | Comparison::NotEqual => false,
            }
        }
    }
}

fn match_text(haystack: &str, op: TextMatch, needle: &str, case_insensitive: bool) -> bool {
    let (haystack, needle) = if case_insensitive {
        (haystack.to_lowercase(), needle.to_lowercase())
    } else {
        (haystack.to_string(), needle.to_string())
    };
    match op {
        TextMatch::Contains => haystack.contains(&needle),
        TextMatch::BeginsWith => haystack.starts_with(&needle),
        TextMatch::EndsWith => haystack.ends_with(&needle),
    }
}
