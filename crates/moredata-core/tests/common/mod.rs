use chrono::{DateTime, TimeZone, Utc};
use moredata_core::model::{EntitySchema, Field, Fetchable, Record, Value};
use moredata_core::predicate::Predicate;
use moredata_core::sort::{SortDescriptor, Sorting};
use moredata_core::store::{FetchRequest, FetchStore, MemoryStore, StoreSubscription};
use moredata_core::{CompoundFilter, EntityId, Filtering, MoreDataError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Club member used across the integration tests
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: EntityId,
    pub name: String,
    pub age: i64,
    pub active: bool,
    pub joined_at: DateTime<Utc>,
    pub nickname: Option<String>,
    pub tags: Vec<String>,
}

impl Member {
    pub const NAME: Field<Member, String> = Field::new("name");
    pub const AGE: Field<Member, i64> = Field::new("age");
    pub const ACTIVE: Field<Member, bool> = Field::new("active");
    pub const JOINED_AT: Field<Member, DateTime<Utc>> = Field::new("joined_at");
    pub const NICKNAME: Field<Member, Option<String>> = Field::new("nickname");
    pub const TAGS: Field<Member, Vec<String>> = Field::new("tags");
}

impl Record for Member {
    fn entity_id(&self) -> EntityId {
        self.id.clone()
    }

    fn value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.clone().into()),
            "name" => Some(self.name.clone().into()),
            "age" => Some(self.age.into()),
            "active" => Some(self.active.into()),
            "joined_at" => Some(self.joined_at.into()),
            "nickname" => Some(self.nickname.clone().into()),
            "tags" => Some(self.tags.clone().into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberFilter {
    MinimumAge(i64),
    NameContains(String),
    IsActive,
    All(Vec<MemberFilter>),
    NoElements,
}

impl Filtering for MemberFilter {
    fn predicate(&self) -> Predicate {
        match self {
            MemberFilter::MinimumAge(age) => Predicate::greater_or_equal(&Member::AGE, *age),
            MemberFilter::NameContains(text) => {
                Predicate::contains(&Member::NAME, text.as_str(), true)
            }
            MemberFilter::IsActive => Predicate::is_true(&Member::ACTIVE),
            MemberFilter::All(children) => Self::all_of(children),
            MemberFilter::NoElements => Predicate::always_false(),
        }
    }
}

impl CompoundFilter for MemberFilter {
    fn all(children: Vec<Self>) -> Self {
        MemberFilter::All(children)
    }

    fn none() -> Self {
        MemberFilter::NoElements
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberSort {
    Name,
    Oldest,
    /// Sorting by a set-valued field, rejected by the store
    Tags,
}

impl Sorting for MemberSort {
    fn sort_descriptors(&self) -> Vec<SortDescriptor> {
        match self {
            MemberSort::Name => vec![SortDescriptor::ascending(&Member::NAME)],
            MemberSort::Oldest => vec![SortDescriptor::descending(&Member::AGE)],
            MemberSort::Tags => vec![SortDescriptor {
                field: "tags".to_string(),
                ascending: true,
            }],
        }
    }
}

impl Fetchable for Member {
    type Filter = MemberFilter;
    type Sort = MemberSort;

    fn entity_name() -> &'static str {
        "Member"
    }

    fn schema() -> EntitySchema {
        EntitySchema::new("Member")
            .with(&Field::<Member, EntityId>::new("id"))
            .with(&Member::NAME)
            .with(&Member::AGE)
            .with(&Member::ACTIVE)
            .with(&Member::JOINED_AT)
            .with(&Member::NICKNAME)
            .with(&Member::TAGS)
    }
}

/// Build a member with sensible defaults
#[allow(dead_code)]
pub fn member(id: &str, name: &str, age: i64) -> Member {
    Member {
        id: EntityId::from(id),
        name: name.to_string(),
        age,
        active: true,
        joined_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        nickname: None,
        tags: Vec::new(),
    }
}

/// Ids of a snapshot, in order
#[allow(dead_code)]
pub fn ids(records: &[Member]) -> Vec<String> {
    records.iter().map(|m| m.id.to_string()).collect()
}

/// Store wrapper whose fetches can be switched to fail
#[derive(Clone)]
#[allow(dead_code)]
pub struct FlakyStore {
    pub inner: MemoryStore<Member>,
    failing: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn new(inner: MemoryStore<Member>) -> Self {
        Self {
            inner,
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_next_fetches(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl FetchStore<Member> for FlakyStore {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Member>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MoreDataError::StoreFailure {
                message: "backend unavailable".to_string(),
            });
        }
        self.inner.fetch(request)
    }

    fn subscribe(&self) -> StoreSubscription {
        self.inner.subscribe()
    }
}
