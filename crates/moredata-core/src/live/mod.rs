//! Live result sets
//!
//! A [`LiveResultSet`] keeps an ordered snapshot of the records matching a
//! filter and sort, and publishes a [`ChangeBatch`](crate::diff::ChangeBatch)
//! whenever the snapshot changes. Changes come from three sources: the
//! filter being replaced, the sort being replaced, and the store announcing
//! a write.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --start()--> Active --dispose()/query error--> Disposed
//!   \____________________dispose()___________________/
//! ```
//!
//! Store notifications are queued on a channel and drained by
//! [`LiveResultSet::process_changes`], so every state transition happens on
//! the owner's thread.

mod result_set;

pub use result_set::{LiveResultSet, LiveState};
