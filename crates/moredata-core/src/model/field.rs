//! Typed field references
//!
//! A `Field<E, T>` names one queryable property of entity `E` whose Rust type
//! is `T`. Predicate constructors take typed fields, so an operator that does
//! not apply to the field's type is rejected by the compiler rather than by
//! the store.

use chrono::{DateTime, Utc};
use moredata_core_types::EntityId;
use std::collections::BTreeSet;
use std::marker::PhantomData;

use super::schema::FieldType;
use super::value::Value;

/// Reference to a field of entity `E` holding values of type `T`
pub struct Field<E, T> {
    name: &'static str,
    _marker: PhantomData<fn(&E) -> T>,
}

impl<E, T> Field<E, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<E, T> Clone for Field<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T> Copy for Field<E, T> {}

impl<E, T> PartialEq for Field<E, T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<E, T> Eq for Field<E, T> {}

impl<E, T> std::fmt::Debug for Field<E, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// Rust types that can back a queryable field
pub trait FieldValue {
    /// Type of a single comparison operand
    type Scalar: Into<Value>;

    const FIELD_TYPE: FieldType;
    const NULLABLE: bool = false;
}

/// Fields supporting `CONTAINS`, `BEGINSWITH` and `ENDSWITH`
pub trait Textual: FieldValue {}

/// Fields supporting `<`, `>`, `<=`, `>=` and `BETWEEN`
pub trait Ordered: FieldValue {}

/// Fields usable as a sort key
pub trait Sortable: FieldValue {}

/// Set-valued fields supporting element membership
pub trait Collection: FieldValue {
    type Element: FieldValue;
}

impl FieldValue for String {
    type Scalar = String;
    const FIELD_TYPE: FieldType = FieldType::Text;
}

impl FieldValue for i64 {
    type Scalar = i64;
    const FIELD_TYPE: FieldType = FieldType::Integer;
}

impl FieldValue for bool {
    type Scalar = bool;
    const FIELD_TYPE: FieldType = FieldType::Bool;
}

impl FieldValue for DateTime<Utc> {
    type Scalar = DateTime<Utc>;
    const FIELD_TYPE: FieldType = FieldType::Date;
}

// A to-one relationship is stored as the referenced record's id.
impl FieldValue for EntityId {
    type Scalar = EntityId;
    const FIELD_TYPE: FieldType = FieldType::Text;
}

impl<T: FieldValue> FieldValue for Option<T> {
    type Scalar = T::Scalar;
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;
    const NULLABLE: bool = true;
}

impl<T: FieldValue> FieldValue for Vec<T> {
    type Scalar = Vec<T::Scalar>;
    const FIELD_TYPE: FieldType = FieldType::Set;
}

impl<T: FieldValue> FieldValue for BTreeSet<T>
where
    T::Scalar: Ord,
{
    type Scalar = BTreeSet<T::Scalar>;
    const FIELD_TYPE: FieldType = FieldType::Set;
}

impl Textual for String {}
impl Textual for Option<String> {}

impl Ordered for i64 {}
impl Ordered for DateTime<Utc> {}
impl Ordered for Option<i64> {}
impl Ordered for Option<DateTime<Utc>> {}

impl Sortable for String {}
impl Sortable for i64 {}
impl Sortable for bool {}
impl Sortable for DateTime<Utc> {}
impl Sortable for EntityId {}
impl<T: Sortable> Sortable for Option<T> {}

impl<T: FieldValue> Collection for Vec<T> {
    type Element = T;
}

impl<T: FieldValue> Collection for BTreeSet<T>
where
    T::Scalar: Ord,
{
    type Element = T;
}
