//! Change batch types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One structural change between two snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ChangeEvent<E> {
    /// `item` appears at `index` in the new snapshot
    Inserted { index: usize, item: E },
    /// `item` was at `index` in the previous snapshot and is gone
    Removed { index: usize, item: E },
    /// The record at previous `index` kept its place but changed contents
    Updated { index: usize, item: E },
    /// The record moved from previous `from` to new `to`; `item` is its new contents
    Moved { from: usize, to: usize, item: E },
}

impl<E> ChangeEvent<E> {
    pub fn item(&self) -> &E {
        match self {
            ChangeEvent::Inserted { item, .. }
            | ChangeEvent::Removed { item, .. }
            | ChangeEvent::Updated { item, .. }
            | ChangeEvent::Moved { item, .. } => item,
        }
    }
}

/// Ordered list of change events from one snapshot transition
///
/// Events are grouped as removals (ascending), insertions (ascending),
/// moves, then updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch<E> {
    events: Vec<ChangeEvent<E>>,
}

impl<E> Default for ChangeBatch<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> ChangeBatch<E> {
    pub fn new(events: Vec<ChangeEvent<E>>) -> Self {
        Self { events }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn events(&self) -> &[ChangeEvent<E>] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeEvent<E>> {
        self.events.iter()
    }

    pub fn into_events(self) -> Vec<ChangeEvent<E>> {
        self.events
    }

    pub fn insertions(&self) -> impl Iterator<Item = (usize, &E)> {
        self.events.iter().filter_map(|e| match e {
            ChangeEvent::Inserted { index, item } => Some((*index, item)),
            _ => None,
        })
    }

    pub fn removals(&self) -> impl Iterator<Item = (usize, &E)> {
        self.events.iter().filter_map(|e| match e {
            ChangeEvent::Removed { index, item } => Some((*index, item)),
            _ => None,
        })
    }

    pub fn updates(&self) -> impl Iterator<Item = (usize, &E)> {
        self.events.iter().filter_map(|e| match e {
            ChangeEvent::Updated { index, item } => Some((*index, item)),
            _ => None,
        })
    }

    /// `(from, to, item)` for every move
    pub fn moves(&self) -> impl Iterator<Item = (usize, usize, &E)> {
        self.events.iter().filter_map(|e| match e {
            ChangeEvent::Moved { from, to, item } => Some((*from, *to, item)),
            _ => None,
        })
    }
}

impl<E: Clone> ChangeBatch<E> {
    /// Replay the batch onto `previous`, producing the new snapshot
    ///
    /// Inserted and moved records land on their new indices; the records that
    /// stayed fill the remaining slots in their previous order, with updates
    /// applied.
    pub fn apply(&self, previous: &[E]) -> Vec<E> {
        let mut vacated = BTreeSet::new();
        let mut placed = BTreeMap::new();
        let mut updated = BTreeMap::new();

        for event in &self.events {
            match event {
                ChangeEvent::Removed { index, .. } => {
                    vacated.insert(*index);
                }
                ChangeEvent::Inserted { index, item } => {
                    placed.insert(*index, item);
                }
                ChangeEvent::Moved { from, to, item } => {
                    vacated.insert(*from);
                    placed.insert(*to, item);
                }
                ChangeEvent::Updated { index, item } => {
                    updated.insert(*index, item);
                }
            }
        }

        let mut stayed = previous
            .iter()
            .enumerate()
            .filter(|(i, _)| !vacated.contains(i))
            .map(|(i, item)| updated.get(&i).copied().unwrap_or(item));

        let len = previous.len().saturating_sub(vacated.len()) + placed.len();
        (0..len)
            .filter_map(|slot| placed.get(&slot).copied().or_else(|| stayed.next()))
            .cloned()
            .collect()
    }
}

impl<'a, E> IntoIterator for &'a ChangeBatch<E> {
    type Item = &'a ChangeEvent<E>;
    type IntoIter = std::slice::Iter<'a, ChangeEvent<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
