use chrono::{DateTime, Utc};
use moredata_core::model::{EntitySchema, Fetchable, Field, Record, Value};
use moredata_core::{CompoundFilter, EntityId, Filtering, Predicate, SortDescriptor, Sorting};
use serde::Serialize;

use super::person::Person;

/// A piece of gossip told by one person to others
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub statement_id: EntityId,
    pub content: String,
    /// Speaker's person id
    pub by: EntityId,
    /// Listeners' person ids
    pub to: Vec<EntityId>,
    pub created_at: DateTime<Utc>,
}

impl Statement {
    pub const STATEMENT_ID: Field<Statement, EntityId> = Field::new("statement_id");
    pub const CONTENT: Field<Statement, String> = Field::new("content");
    pub const BY: Field<Statement, EntityId> = Field::new("by");
    pub const TO: Field<Statement, Vec<EntityId>> = Field::new("to");
    pub const CREATED_AT: Field<Statement, DateTime<Utc>> = Field::new("created_at");
}

impl Record for Statement {
    fn entity_id(&self) -> EntityId {
        self.statement_id.clone()
    }

    fn value(&self, field: &str) -> Option<Value> {
        match field {
            "statement_id" => Some(self.statement_id.clone().into()),
            "content" => Some(self.content.clone().into()),
            "by" => Some(self.by.clone().into()),
            "to" => Some(self.to.clone().into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

impl Fetchable for Statement {
    type Filter = StatementFilter;
    type Sort = StatementSort;

    fn entity_name() -> &'static str {
        "Statement"
    }

    fn schema() -> EntitySchema {
        EntitySchema::new("Statement")
            .with(&Statement::STATEMENT_ID)
            .with(&Statement::CONTENT)
            .with(&Statement::BY)
            .with(&Statement::TO)
            .with(&Statement::CREATED_AT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementFilter {
    /// Content contains the text, ignoring case
    Contains(String),
    /// Spoken by the person with this id
    ToldBy(String),
    /// Heard by the person with this id
    ToldTo(String),
    All(Vec<StatementFilter>),
    NoElements,
}

impl StatementFilter {
    /// Statements told by the person with `person_id`, if that person exists
    pub fn told_by_id(person_id: &str, people: &[Person]) -> Self {
        Self::resolve(
            person_id,
            people,
            |p| p.person_id.as_str(),
            |p| StatementFilter::ToldBy(p.person_id.to_string()),
        )
    }

    /// Statements told by the person called `name`, if that person exists
    pub fn told_by_name(name: &str, people: &[Person]) -> Self {
        Self::resolve(
            name,
            people,
            |p| p.name.as_str(),
            |p| StatementFilter::ToldBy(p.person_id.to_string()),
        )
    }
}

impl Filtering for StatementFilter {
    fn predicate(&self) -> Predicate {
        match self {
            StatementFilter::Contains(text) => {
                Predicate::contains(&Statement::CONTENT, text.as_str(), true)
            }
            StatementFilter::ToldBy(id) => {
                Predicate::equals(&Statement::BY, EntityId::from(id.as_str()))
            }
            StatementFilter::ToldTo(id) => {
                Predicate::contains_element(&Statement::TO, EntityId::from(id.as_str()))
            }
            StatementFilter::All(filters) => Self::all_of(filters),
            StatementFilter::NoElements => Predicate::always_false(),
        }
    }
}

impl CompoundFilter for StatementFilter {
    fn all(children: Vec<Self>) -> Self {
        StatementFilter::All(children)
    }

    fn none() -> Self {
        StatementFilter::NoElements
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementSort {
    Newest,
}

impl Sorting for StatementSort {
    fn sort_descriptors(&self) -> Vec<SortDescriptor> {
        match self {
            StatementSort::Newest => vec![SortDescriptor::descending(&Statement::CREATED_AT)],
        }
    }
}
