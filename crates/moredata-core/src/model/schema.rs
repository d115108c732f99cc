//! Entity schemas
//!
//! A schema lists the queryable fields of an entity type with their declared
//! types. Stores validate predicates and sort orders against it before
//! executing a fetch.

use serde::{Deserialize, Serialize};

use super::field::{Field, FieldValue};

/// Declared type of a queryable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Integer,
    Bool,
    Date,
    Set,
}

impl FieldType {
    /// Integer and date fields support `<`, `>`, `<=`, `>=` and `BETWEEN`
    pub fn is_ordered(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Date)
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::Text)
    }

    /// Every scalar type can act as a sort key; sets cannot
    pub fn is_sortable(&self) -> bool {
        !matches!(self, FieldType::Set)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Bool => "bool",
            FieldType::Date => "date",
            FieldType::Set => "set",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    pub nullable: bool,
}

/// Queryable shape of an entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub entity: String,
    pub fields: Vec<FieldDef>,
}

impl EntitySchema {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field from its typed reference
    ///
    /// The declared type and nullability come from the field's Rust type, so
    /// the schema cannot disagree with the predicates built against it.
    pub fn with<E, T: FieldValue>(mut self, field: &Field<E, T>) -> Self {
        self.fields.push(FieldDef {
            name: field.name().to_string(),
            field_type: T::FIELD_TYPE,
            nullable: T::NULLABLE,
        });
        self
    }

    /// Declare an untyped field
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType, nullable: bool) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            field_type,
            nullable,
        });
        self
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
