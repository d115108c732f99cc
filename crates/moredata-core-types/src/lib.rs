//! Core types shared across MoreData facilities
//!
//! This crate provides foundational types used by the query layer, the
//! error facility and the logging facility:
//!
//! - **Identifiers**: EntityId (stable record identity), ResultSetId (log correlation)
//! - **Schema constants**: Canonical field keys and event names

pub mod ids;
pub mod schema;

pub use ids::{EntityId, ResultSetId};
