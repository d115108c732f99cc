//! Record stores
//!
//! A store executes fetch requests and announces that its contents may have
//! changed. Notifications carry no payload: subscribers re-query and diff,
//! so a store never has to describe its own changes.

mod memory;

pub use memory::{MemoryStore, StoreTransaction};

use std::sync::mpsc;

use crate::errors::Result;
use crate::model::Fetchable;
use crate::predicate::Predicate;
use crate::sort::{SortDescriptor, Sorting};
use crate::filter::Filtering;

/// A single fetch: entity type, predicate and sort order
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub entity: String,
    pub predicate: Predicate,
    pub sort: Vec<SortDescriptor>,
}

impl FetchRequest {
    /// Request for entity `E`; a missing filter matches every record
    pub fn for_entity<E: Fetchable>(filter: Option<&E::Filter>, sort: Option<&E::Sort>) -> Self {
        Self {
            entity: E::entity_name().to_string(),
            predicate: filter.map(Filtering::predicate).unwrap_or(Predicate::True),
            sort: sort.map(Sorting::sort_descriptors).unwrap_or_default(),
        }
    }
}

/// "Contents may have changed" signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreNotification {
    /// Monotonic write counter at the time of the change
    pub sequence: u64,
}

pub type StoreSubscription = mpsc::Receiver<StoreNotification>;

/// Backing store of a live result set
pub trait FetchStore<E: Fetchable> {
    /// Execute a fetch and return matching records in sort order
    ///
    /// # Errors
    ///
    /// Query errors (`UnknownField`, `TypeMismatch`, `UnsortableField`,
    /// `StoreFailure`) when the request cannot be executed.
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<E>>;

    /// Register for change notifications
    fn subscribe(&self) -> StoreSubscription;
}
