//! Snapshot diff engine.
//!
//! Compares two ordered result snapshots and produces the change batch that
//! turns the first into the second.
//!
//! ## Entry point
//!
//! ```ignore
//! use moredata_core::diff::compute_changes;
//!
//! let batch = compute_changes(&previous, &next);
//! assert_eq!(batch.apply(&previous), next);
//! ```
//!
//! ## Guarantees
//!
//! - **Identity matching**: records are matched by `entity_id`, not position.
//! - **Index convention**: removals, updates and move sources use indices in
//!   the previous snapshot; insertions and move targets use indices in the
//!   new snapshot.
//! - **Minimal moves**: records on a longest increasing subsequence of the
//!   surviving order stay in place; only the rest are reported as moved.
//! - **Determinism**: identical inputs produce identical batches.

pub mod engine;
pub mod model;

pub use engine::compute_changes;
pub use model::{ChangeBatch, ChangeEvent};
