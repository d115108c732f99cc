use moredata_core_types::EntityId;

use super::field::Field;
use super::schema::EntitySchema;
use super::value::Value;
use crate::filter::Filtering;
use crate::sort::Sorting;

/// A stored record that predicates can be evaluated against
pub trait Record: Clone + std::fmt::Debug {
    /// Stable identity used to match the record across snapshots
    fn entity_id(&self) -> EntityId;

    /// Current value of the named field, `None` if the record has no such field
    fn value(&self, field: &str) -> Option<Value>;

    /// Read a typed field, absent fields read as `Null`
    fn get<T>(&self, field: &Field<Self, T>) -> Value
    where
        Self: Sized,
    {
        self.value(field.name()).unwrap_or(Value::Null)
    }
}

/// An entity type that can back a live result set
///
/// Binds the entity to its filter and sort vocabularies and to the schema
/// stores validate requests against. Content equality (`PartialEq`) decides
/// whether a record that kept its position was updated.
pub trait Fetchable: Record + PartialEq {
    type Filter: Filtering;
    type Sort: Sorting;

    fn entity_name() -> &'static str;

    fn schema() -> EntitySchema;
}
