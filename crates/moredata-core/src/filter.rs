//! Filter vocabularies
//!
//! Each entity declares a filter type (usually an enum) whose variants map to
//! predicates. Filters are compared structurally so a live result set can
//! skip redundant re-queries.

use crate::predicate::Predicate;

/// A domain-level filter that resolves to a predicate
pub trait Filtering: Clone + PartialEq + std::fmt::Debug {
    /// The predicate this filter stands for
    fn predicate(&self) -> Predicate;

    /// Conjunction of every filter; empty matches everything
    fn all_of(filters: &[Self]) -> Predicate
    where
        Self: Sized,
    {
        Predicate::and(filters.iter().map(Self::predicate))
    }

    /// Disjunction of every filter; empty matches nothing
    fn any_of(filters: &[Self]) -> Predicate
    where
        Self: Sized,
    {
        Predicate::or(filters.iter().map(Self::predicate))
    }

    fn by(filter: &Self) -> Predicate
    where
        Self: Sized,
    {
        filter.predicate()
    }

    fn negate(filter: &Self) -> Predicate
    where
        Self: Sized,
    {
        Predicate::not(filter.predicate())
    }
}

/// Filters that can express "all of these" and "no match"
pub trait CompoundFilter: Filtering + Sized {
    fn all(children: Vec<Self>) -> Self;

    /// Filter matching no record
    fn none() -> Self;

    /// Build a filter from a looked-up candidate, or `none()` on a miss
    ///
    /// Used by filters keyed on a related record (e.g. "told by the person
    /// named X"): when the key does not resolve, the result is empty rather
    /// than unfiltered.
    fn resolve<C, K, F>(key: &str, candidates: &[C], key_of: K, make: F) -> Self
    where
        K: Fn(&C) -> &str,
        F: FnOnce(&C) -> Self,
    {
        match candidates.iter().find(|c| key_of(c) == key) {
            Some(candidate) => make(candidate),
            None => {
                tracing::debug!(key, candidates = candidates.len(), "filter lookup miss");
                Self::none()
            }
        }
    }
}
