use moredata_core_types::EntityId;
use std::sync::{mpsc, Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{FetchRequest, FetchStore, StoreNotification, StoreSubscription};
use crate::errors::{MoreDataError, Result};
use crate::model::{Fetchable, Record};
use crate::predicate::Predicate;
use crate::sort;

/// In-memory store for records of one entity type
///
/// Records keep insertion order, which is also the tie-break order of a
/// sorted fetch. Clones share the same contents, so a writer task and any
/// number of live result sets can hold their own handle.
#[derive(Debug)]
pub struct MemoryStore<E> {
    inner: Arc<RwLock<Inner<E>>>,
}

#[derive(Debug)]
struct Inner<E> {
    records: Vec<E>,
    sequence: u64,
    subscribers: Vec<mpsc::Sender<StoreNotification>>,
}

impl<E> Clone for MemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Fetchable> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Fetchable> MemoryStore<E> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a store pre-populated with `records`, without notifying
    pub fn with_records(records: Vec<E>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                records,
                sequence: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner<E>>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner<E>>> {
        self.inner.write().map_err(|_| poisoned())
    }

    /// Insert a new record
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntity` if a record with the same id is stored
    pub fn insert(&self, record: E) -> Result<()> {
        let mut inner = self.write()?;
        insert_into(&mut inner.records, record)?;
        inner.notify();
        Ok(())
    }

    /// Insert or replace (in place) a record by id
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned
    pub fn upsert(&self, record: E) -> Result<()> {
        let mut inner = self.write()?;
        upsert_into(&mut inner.records, record);
        inner.notify();
        Ok(())
    }

    /// Remove a record by id and return it
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if no record has the id
    pub fn remove(&self, id: &EntityId) -> Result<E> {
        let mut inner = self.write()?;
        let removed = remove_from(&mut inner.records, id)?;
        inner.notify();
        Ok(removed)
    }

    /// Remove every record matching `predicate`, returning how many went
    ///
    /// Subscribers are only notified when something was removed.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned
    pub fn remove_matching(&self, predicate: &Predicate) -> Result<usize> {
        let mut inner = self.write()?;
        let before = inner.records.len();
        inner.records.retain(|r| !predicate.evaluate(r));
        let removed = before - inner.records.len();
        if removed > 0 {
            inner.notify();
        }
        Ok(removed)
    }

    /// Apply several writes atomically with a single notification
    ///
    /// The closure works on a copy of the contents. If it returns an error
    /// the copy is discarded and the store is left untouched.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by the closure
    pub fn batch<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreTransaction<E>) -> Result<T>,
    {
        let mut inner = self.write()?;
        let mut tx = StoreTransaction {
            records: inner.records.clone(),
            writes: 0,
        };
        let out = f(&mut tx)?;
        if tx.writes > 0 {
            inner.records = tx.records;
            inner.notify();
        }
        Ok(out)
    }

    /// Announce a change without writing, e.g. after an external mutation
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned
    pub fn notify(&self) -> Result<()> {
        self.write()?.notify();
        Ok(())
    }

    /// Look up a record by id
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned
    pub fn get(&self, id: &EntityId) -> Result<Option<E>> {
        Ok(self
            .read()?
            .records
            .iter()
            .find(|r| &r.entity_id() == id)
            .cloned())
    }

    /// Every record in insertion order
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned
    pub fn all(&self) -> Result<Vec<E>> {
        Ok(self.read()?.records.clone())
    }

    /// Number of records matching `predicate`
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned
    pub fn count(&self, predicate: &Predicate) -> Result<usize> {
        Ok(self
            .read()?
            .records
            .iter()
            .filter(|r| predicate.evaluate(*r))
            .count())
    }

    /// Current write sequence number
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned
    pub fn sequence(&self) -> Result<u64> {
        Ok(self.read()?.sequence)
    }

    /// Number of live notification channels
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned
    pub fn subscriber_count(&self) -> Result<usize> {
        Ok(self.read()?.subscribers.len())
    }
}

impl<E> Inner<E> {
    // Senders whose receiver has been dropped are pruned here.
    fn notify(&mut self) {
        self.sequence += 1;
        let notification = StoreNotification {
            sequence: self.sequence,
        };
        self.subscribers.retain(|tx| tx.send(notification).is_ok());
        tracing::trace!(
            sequence = self.sequence,
            subscribers = self.subscribers.len(),
            "store notified"
        );
    }
}

impl<E: Fetchable> FetchStore<E> for MemoryStore<E> {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<E>> {
        if request.entity != E::entity_name() {
            return Err(MoreDataError::StoreFailure {
                message: format!(
                    "store holds {} records, request is for {}",
                    E::entity_name(),
                    request.entity
                ),
            });
        }
        let schema = E::schema();
        request.predicate.validate(&schema)?;
        sort::validate(&request.sort, &schema)?;

        let mut matched: Vec<E> = self
            .read()?
            .records
            .iter()
            .filter(|r| request.predicate.evaluate(*r))
            .cloned()
            .collect();
        sort::sort_records(&mut matched, &request.sort);
        Ok(matched)
    }

    fn subscribe(&self) -> StoreSubscription {
        let (tx, rx) = mpsc::channel();
        match self.inner.write() {
            Ok(mut inner) => inner.subscribers.push(tx),
            Err(_) => tracing::warn!("store lock poisoned, subscription will never fire"),
        }
        rx
    }
}

/// Staged writes inside [`MemoryStore::batch`]
#[derive(Debug)]
pub struct StoreTransaction<E> {
    records: Vec<E>,
    writes: usize,
}

impl<E: Record> StoreTransaction<E> {
    /// # Errors
    ///
    /// Returns `DuplicateEntity` if a record with the same id is staged
    pub fn insert(&mut self, record: E) -> Result<()> {
        insert_into(&mut self.records, record)?;
        self.writes += 1;
        Ok(())
    }

    pub fn upsert(&mut self, record: E) {
        upsert_into(&mut self.records, record);
        self.writes += 1;
    }

    /// # Errors
    ///
    /// Returns `EntityNotFound` if no staged record has the id
    pub fn remove(&mut self, id: &EntityId) -> Result<E> {
        let removed = remove_from(&mut self.records, id)?;
        self.writes += 1;
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn poisoned() -> MoreDataError {
    MoreDataError::Internal {
        message: "store lock poisoned".to_string(),
    }
}

fn position<E: Record>(records: &[E], id: &EntityId) -> Option<usize> {
    records.iter().position(|r| &r.entity_id() == id)
}

fn insert_into<E: Record>(records: &mut Vec<E>, record: E) -> Result<()> {
    let id = record.entity_id();
    if position(records, &id).is_some() {
        return Err(MoreDataError::DuplicateEntity {
            entity_id: id.to_string(),
        });
    }
    records.push(record);
    Ok(())
}

fn upsert_into<E: Record>(records: &mut Vec<E>, record: E) {
    match position(records, &record.entity_id()) {
        Some(i) => records[i] = record,
        None => records.push(record),
    }
}

fn remove_from<E: Record>(records: &mut Vec<E>, id: &EntityId) -> Result<E> {
    let i = position(records, id).ok_or_else(|| MoreDataError::EntityNotFound {
        entity_id: id.to_string(),
    })?;
    Ok(records.remove(i))
}
