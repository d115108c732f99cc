//! MoreData Core - typed queries and live result sets
//!
//! This crate provides:
//! - Typed field references and a predicate algebra checked at compile time
//! - Domain filter and sort vocabularies that resolve to predicates
//! - An in-memory store with change notifications
//! - A snapshot diff engine producing insert/remove/update/move batches
//! - Live result sets that keep an ordered view current and publish changes
//! - Structured error and logging facilities

pub mod diff;
pub mod errors;
pub mod filter;
pub mod live;
pub mod logging_facility;
pub mod model;
pub mod predicate;
pub mod sort;
pub mod store;

// Re-export commonly used types
pub use diff::{compute_changes, ChangeBatch, ChangeEvent};
pub use errors::{ExError, ExErrorKind, MoreDataError, Result};
pub use filter::{CompoundFilter, Filtering};
pub use live::{LiveResultSet, LiveState};
pub use model::{EntitySchema, Fetchable, Field, FieldType, Record, Value};
pub use moredata_core_types::{EntityId, ResultSetId};
pub use predicate::{Comparison, Predicate, TextMatch};
pub use sort::{SortDescriptor, Sorting};
pub use store::{FetchRequest, FetchStore, MemoryStore, StoreNotification};
