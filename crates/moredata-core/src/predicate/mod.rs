//! Query predicates
//!
//! A `Predicate` is a boolean condition over a record's named fields. Leaves
//! compare one field to a constant; `And`, `Or` and `Not` combine them.
//! Predicates are plain values: two built the same way compare equal, which
//! is what lets a live result set tell whether a filter actually changed.
//!
//! Constructors take typed [`Field`] references so operator/type mismatches
//! fail to compile. The untyped variants remain public for stores and for
//! predicates decoded from JSON; [`Predicate::validate`] checks those against
//! an [`EntitySchema`](crate::model::EntitySchema).

mod eval;
mod format;
mod validate;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{Collection, Field, FieldValue, Ordered, Textual, Value};

/// Relational operator of a comparison leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
        }
    }

    /// True for operators that need an ordered field
    pub fn requires_order(&self) -> bool {
        !matches!(self, Comparison::Equal | Comparison::NotEqual)
    }
}

/// Substring operator of a text leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    Contains,
    BeginsWith,
    EndsWith,
}

impl TextMatch {
    pub fn keyword(&self) -> &'static str {
        match self {
            TextMatch::Contains => "CONTAINS",
            TextMatch::BeginsWith => "BEGINSWITH",
            TextMatch::EndsWith => "ENDSWITH",
        }
    }
}

/// Boolean condition over a record's fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Matches every record
    True,
    /// Matches no record
    False,
    Compare {
        field: String,
        op: Comparison,
        value: Value,
    },
    Text {
        field: String,
        op: TextMatch,
        text: String,
        case_insensitive: bool,
    },
    /// Inclusive range on an ordered field
    Between {
        field: String,
        lower: Value,
        upper: Value,
    },
    /// Field value is one of the listed values
    In { field: String, values: Vec<Value> },
    /// Set-valued field holds the element
    ContainsElement { field: String, element: Value },
    IsNil { field: String },
    IsNotNil { field: String },
    And { predicates: Vec<Predicate> },
    Or { predicates: Vec<Predicate> },
    Not { predicate: Box<Predicate> },
}

fn scalar<T: FieldValue, V: Into<T::Scalar>>(value: V) -> Value {
    let scalar: T::Scalar = value.into();
    scalar.into()
}

impl Predicate {
    fn compare<E, T: FieldValue>(
        field: &Field<E, T>,
        op: Comparison,
        value: impl Into<T::Scalar>,
    ) -> Self {
        Predicate::Compare {
            field: field.name().to_string(),
            op,
            value: scalar::<T, _>(value),
        }
    }

    fn text<E, T: Textual>(
        field: &Field<E, T>,
        op: TextMatch,
        text: impl Into<String>,
        case_insensitive: bool,
    ) -> Self {
        Predicate::Text {
            field: field.name().to_string(),
            op,
            text: text.into(),
            case_insensitive,
        }
    }

    // ===== Equality =====

    pub fn equals<E, T: FieldValue>(field: &Field<E, T>, value: impl Into<T::Scalar>) -> Self {
        Self::compare(field, Comparison::Equal, value)
    }

    pub fn not_equals<E, T: FieldValue>(field: &Field<E, T>, value: impl Into<T::Scalar>) -> Self {
        Self::compare(field, Comparison::NotEqual, value)
    }

    pub fn is_nil<E, T: FieldValue>(field: &Field<E, Option<T>>) -> Self {
        Predicate::IsNil {
            field: field.name().to_string(),
        }
    }

    pub fn is_not_nil<E, T: FieldValue>(field: &Field<E, Option<T>>) -> Self {
        Predicate::IsNotNil {
            field: field.name().to_string(),
        }
    }

    pub fn is_true<E>(field: &Field<E, bool>) -> Self {
        Self::equals(field, true)
    }

    pub fn is_false<E>(field: &Field<E, bool>) -> Self {
        Self::equals(field, false)
    }

    // ===== Text =====

    pub fn contains<E, T: Textual>(
        field: &Field<E, T>,
        text: impl Into<String>,
        case_insensitive: bool,
    ) -> Self {
        Self::text(field, TextMatch::Contains, text, case_insensitive)
    }

    pub fn begins_with<E, T: Textual>(
        field: &Field<E, T>,
        text: impl Into<String>,
        case_insensitive: bool,
    ) -> Self {
        Self::text(field, TextMatch::BeginsWith, text, case_insensitive)
    }

    pub fn ends_with<E, T: Textual>(
        field: &Field<E, T>,
        text: impl Into<String>,
        case_insensitive: bool,
    ) -> Self {
        Self::text(field, TextMatch::EndsWith, text, case_insensitive)
    }

    // ===== Ordering =====

    pub fn greater_than<E, T: Ordered>(field: &Field<E, T>, value: impl Into<T::Scalar>) -> Self {
        Self::compare(field, Comparison::GreaterThan, value)
    }

    pub fn less_than<E, T: Ordered>(field: &Field<E, T>, value: impl Into<T::Scalar>) -> Self {
        Self::compare(field, Comparison::LessThan, value)
    }

    pub fn greater_or_equal<E, T: Ordered>(
        field: &Field<E, T>,
        value: impl Into<T::Scalar>,
    ) -> Self {
        Self::compare(field, Comparison::GreaterOrEqual, value)
    }

    pub fn less_or_equal<E, T: Ordered>(field: &Field<E, T>, value: impl Into<T::Scalar>) -> Self {
        Self::compare(field, Comparison::LessOrEqual, value)
    }

    /// Inclusive on both ends
    pub fn between<E, T: Ordered>(
        field: &Field<E, T>,
        lower: impl Into<T::Scalar>,
        upper: impl Into<T::Scalar>,
    ) -> Self {
        Predicate::Between {
            field: field.name().to_string(),
            lower: scalar::<T, _>(lower),
            upper: scalar::<T, _>(upper),
        }
    }

    /// Strictly earlier than the given instant
    pub fn before<E, T: Ordered>(field: &Field<E, T>, value: impl Into<T::Scalar>) -> Self {
        Self::less_than(field, value)
    }

    /// Strictly later than the given instant
    pub fn after<E, T: Ordered>(field: &Field<E, T>, value: impl Into<T::Scalar>) -> Self {
        Self::greater_than(field, value)
    }

    // ===== Collections =====

    /// The set-valued field holds `element`
    pub fn contains_element<E, C: Collection>(
        field: &Field<E, C>,
        element: impl Into<<C::Element as FieldValue>::Scalar>,
    ) -> Self {
        Predicate::ContainsElement {
            field: field.name().to_string(),
            element: scalar::<C::Element, _>(element),
        }
    }

    /// The field's value is one of `values`
    pub fn element_in<E, T, I, V>(field: &Field<E, T>, values: I) -> Self
    where
        T: FieldValue,
        I: IntoIterator<Item = V>,
        V: Into<T::Scalar>,
    {
        Predicate::In {
            field: field.name().to_string(),
            values: values.into_iter().map(scalar::<T, V>).collect(),
        }
    }

    // ===== Combinators =====

    /// Conjunction; empty is `True`, a single predicate is returned as is
    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut predicates: Vec<Predicate> = predicates.into_iter().collect();
        match predicates.len() {
            0 => Predicate::True,
            1 => predicates.remove(0),
            _ => Predicate::And { predicates },
        }
    }

    /// Disjunction; empty is `False`, a single predicate is returned as is
    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut predicates: Vec<Predicate> = predicates.into_iter().collect();
        match predicates.len() {
            0 => Predicate::False,
            1 => predicates.remove(0),
            _ => Predicate::Or { predicates },
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(predicate: Predicate) -> Self {
        Predicate::Not {
            predicate: Box::new(predicate),
        }
    }

    pub fn always_true() -> Self {
        Predicate::True
    }

    pub fn always_false() -> Self {
        Predicate::False
    }

    /// Names of every field the predicate reads
    pub fn fields(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Predicate::True | Predicate::False => {}
            Predicate::Compare { field, .. }
            | Predicate::Text { field, .. }
            | Predicate::Between { field, .. }
            | Predicate::In { field, .. }
            | Predicate::ContainsElement { field, .. }
            | Predicate::IsNil { field }
            | Predicate::IsNotNil { field } => {
                out.insert(field.as_str());
            }
            Predicate::And { predicates } | Predicate::Or { predicates } => {
                for p in predicates {
                    p.collect_fields(out);
                }
            }
            Predicate::Not { predicate } => predicate.collect_fields(out),
        }
    }

    /// Serialize to JSON
    ///
    /// # Errors
    ///
    /// Returns `MoreDataError::Serialization` if encoding fails
    pub fn to_json(&self) -> crate::errors::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    ///
    /// # Errors
    ///
    /// Returns `MoreDataError::Serialization` if the input is not a predicate
    pub fn from_json(json: &str) -> crate::errors::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
