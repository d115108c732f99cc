use chrono::{DateTime, Duration, Utc};
use moredata_core::model::{EntitySchema, Fetchable, Field, Record, Value};
use moredata_core::{CompoundFilter, EntityId, Filtering, Predicate, SortDescriptor, Sorting};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub person_id: EntityId,
    pub name: String,
    pub birthdate: DateTime<Utc>,
    pub avatar: String,
}

impl Person {
    pub const PERSON_ID: Field<Person, EntityId> = Field::new("person_id");
    pub const NAME: Field<Person, String> = Field::new("name");
    pub const BIRTHDATE: Field<Person, DateTime<Utc>> = Field::new("birthdate");
    pub const AVATAR: Field<Person, String> = Field::new("avatar");

    /// Age in whole 365-day years at `now`
    pub fn age_at(&self, now: DateTime<Utc>) -> i64 {
        (now - self.birthdate).num_days() / 365
    }
}

impl Record for Person {
    fn entity_id(&self) -> EntityId {
        self.person_id.clone()
    }

    fn value(&self, field: &str) -> Option<Value> {
        match field {
            "person_id" => Some(self.person_id.clone().into()),
            "name" => Some(self.name.clone().into()),
            "birthdate" => Some(self.birthdate.into()),
            "avatar" => Some(self.avatar.clone().into()),
            _ => None,
        }
    }
}

impl Fetchable for Person {
    type Filter = PersonFilter;
    type Sort = PersonSort;

    fn entity_name() -> &'static str {
        "Person"
    }

    fn schema() -> EntitySchema {
        EntitySchema::new("Person")
            .with(&Person::PERSON_ID)
            .with(&Person::NAME)
            .with(&Person::BIRTHDATE)
            .with(&Person::AVATAR)
    }
}

/// Birthdate `years` 365-day years before now
fn years_ago(years: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(365 * years)
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersonFilter {
    /// At most this many years old
    MaximumAge(i64),
    /// At least this many years old
    MinimumAge(i64),
    PersonId(String),
    All(Vec<PersonFilter>),
    NoElements,
}

impl Filtering for PersonFilter {
    fn predicate(&self) -> Predicate {
        match self {
            PersonFilter::MaximumAge(years) => {
                Predicate::after(&Person::BIRTHDATE, years_ago(*years))
            }
            PersonFilter::MinimumAge(years) => {
                Predicate::before(&Person::BIRTHDATE, years_ago(*years))
            }
            PersonFilter::PersonId(id) => {
                Predicate::equals(&Person::PERSON_ID, EntityId::from(id.as_str()))
            }
            PersonFilter::All(filters) => Self::all_of(filters),
            PersonFilter::NoElements => Predicate::always_false(),
        }
    }
}

impl CompoundFilter for PersonFilter {
    fn all(children: Vec<Self>) -> Self {
        PersonFilter::All(children)
    }

    fn none() -> Self {
        PersonFilter::NoElements
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersonSort {
    Name,
}

impl Sorting for PersonSort {
    fn sort_descriptors(&self) -> Vec<SortDescriptor> {
        match self {
            PersonSort::Name => vec![SortDescriptor::ascending(&Person::NAME)],
        }
    }
}
