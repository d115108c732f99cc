//! Sort orders
//!
//! A sort is a list of descriptors applied lexicographically. Ties under all
//! descriptors keep the store's insertion order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::errors::{MoreDataError, Result};
use crate::model::{EntitySchema, Field, Record, Sortable, Value};

/// One sort key and its direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub field: String,
    pub ascending: bool,
}

impl SortDescriptor {
    pub fn ascending<E, T: Sortable>(field: &Field<E, T>) -> Self {
        Self {
            field: field.name().to_string(),
            ascending: true,
        }
    }

    pub fn descending<E, T: Sortable>(field: &Field<E, T>) -> Self {
        Self {
            field: field.name().to_string(),
            ascending: false,
        }
    }
}

impl std::fmt::Display for SortDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dir = if self.ascending { "ASC" } else { "DESC" };
        write!(f, "{} {}", self.field, dir)
    }
}

/// A domain-level sort order
pub trait Sorting: Clone + PartialEq + std::fmt::Debug {
    fn sort_descriptors(&self) -> Vec<SortDescriptor>;
}

/// Lexicographic comparison under `descriptors`
///
/// Nulls sort before every other value in ascending order.
pub fn compare<R: Record>(a: &R, b: &R, descriptors: &[SortDescriptor]) -> Ordering {
    for d in descriptors {
        let left = a.value(&d.field).unwrap_or(Value::Null);
        let right = b.value(&d.field).unwrap_or(Value::Null);
        let ord = if d.ascending {
            left.cmp(&right)
        } else {
            right.cmp(&left)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Stable in-place sort
pub fn sort_records<R: Record>(records: &mut [R], descriptors: &[SortDescriptor]) {
    if descriptors.is_empty() {
        return;
    }
    records.sort_by(|a, b| compare(a, b, descriptors));
}

/// Check every descriptor names a declared, sortable field
///
/// # Errors
///
/// - `UnknownField` if a descriptor names an undeclared field
/// - `UnsortableField` if the field is set-valued
pub fn validate(descriptors: &[SortDescriptor], schema: &EntitySchema) -> Result<()> {
    for d in descriptors {
        let def = schema
            .get(&d.field)
            .ok_or_else(|| MoreDataError::UnknownField {
                entity: schema.entity.clone(),
                field: d.field.clone(),
            })?;
        if !def.field_type.is_sortable() {
            return Err(MoreDataError::UnsortableField {
                entity: schema.entity.clone(),
                field: d.field.clone(),
            });
        }
    }
    Ok(())
}
