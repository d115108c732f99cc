use moredata_core_types::ResultSetId;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Instant;

use crate::diff::{compute_changes, ChangeBatch};
use crate::errors::{MoreDataError, Result};
use crate::model::Fetchable;
use crate::store::{FetchRequest, FetchStore, StoreSubscription};
use crate::{log_op_end, log_op_error, log_op_start};

/// Lifecycle state of a live result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveState {
    /// Created, filter and sort may be set freely, nothing fetched yet
    Idle,
    /// Snapshot is current and changes are being published
    Active,
    /// Terminal; no further fetches or events
    Disposed,
}

/// Continuously updated, ordered view over a store
///
/// Mutating operations take `&mut self`; wrap the result set in a mutex if
/// several tasks need to drive it.
pub struct LiveResultSet<E, S>
where
    E: Fetchable,
    S: FetchStore<E>,
{
    id: ResultSetId,
    store: S,
    filter: Option<E::Filter>,
    sort: Option<E::Sort>,
    state: LiveState,
    snapshot: Vec<E>,
    notifications: Option<StoreSubscription>,
    subscribers: Vec<mpsc::Sender<ChangeBatch<E>>>,
}

impl<E, S> LiveResultSet<E, S>
where
    E: Fetchable,
    S: FetchStore<E>,
{
    /// Create an idle result set; nothing is fetched until [`start`](Self::start)
    pub fn new(store: S, filter: Option<E::Filter>, sort: Option<E::Sort>) -> Self {
        Self {
            id: ResultSetId::new(),
            store,
            filter,
            sort,
            state: LiveState::Idle,
            snapshot: Vec::new(),
            notifications: None,
            subscribers: Vec::new(),
        }
    }

    pub fn id(&self) -> &ResultSetId {
        &self.id
    }

    pub fn state(&self) -> LiveState {
        self.state
    }

    pub fn filter(&self) -> Option<&E::Filter> {
        self.filter.as_ref()
    }

    pub fn sort(&self) -> Option<&E::Sort> {
        self.sort.as_ref()
    }

    /// Current ordered contents (the last good snapshot after a failure)
    pub fn snapshot(&self) -> &[E] {
        &self.snapshot
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.snapshot.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Fetch the initial snapshot and begin observing the store
    ///
    /// Returns the initial batch: one `Inserted` event per record, which is
    /// also delivered to current subscribers.
    ///
    /// # Errors
    ///
    /// - `AlreadyActive` if already started
    /// - `Disposed` if disposed
    /// - Any query error from the store; the result set is then disposed
    pub fn start(&mut self) -> Result<ChangeBatch<E>> {
        const OP: &str = "live_start";
        let started = Instant::now();
        log_op_start!(OP, entity = E::entity_name(), result_set_id = %self.id);

        let refused = match self.state {
            LiveState::Idle => None,
            LiveState::Active => Some(MoreDataError::AlreadyActive),
            LiveState::Disposed => Some(MoreDataError::Disposed),
        };
        if let Some(err) = refused {
            log_op_error!(OP, err.clone(), duration_ms = elapsed_ms(started), result_set_id = %self.id);
            return Err(err);
        }

        // Subscribe before fetching so a write racing the fetch still signals.
        let notifications = self.store.subscribe();
        let records = match self.fetch() {
            Ok(records) => records,
            Err(err) => {
                log_op_error!(OP, err.clone(), duration_ms = elapsed_ms(started), result_set_id = %self.id);
                self.dispose();
                return Err(err);
            }
        };

        self.notifications = Some(notifications);
        self.state = LiveState::Active;
        let batch = compute_changes(&[], &records);
        self.snapshot = records;
        if !batch.is_empty() {
            self.emit(&batch);
        }

        log_op_end!(
            OP,
            duration_ms = elapsed_ms(started),
            result_set_id = %self.id,
            snapshot_len = self.snapshot.len(),
            batch_len = batch.len()
        );
        Ok(batch)
    }

    /// Replace the filter (`None` matches every record)
    ///
    /// While idle the filter is only recorded. While active the store is
    /// re-queried and the resulting batch is returned and, when non-empty,
    /// published. Disposed result sets ignore the call.
    ///
    /// # Errors
    ///
    /// Any query error from the store; the result set is then disposed
    pub fn set_filter(&mut self, filter: Option<E::Filter>) -> Result<ChangeBatch<E>> {
        match self.state {
            LiveState::Disposed => Ok(ChangeBatch::empty()),
            LiveState::Idle => {
                self.filter = filter;
                Ok(ChangeBatch::empty())
            }
            LiveState::Active => {
                self.filter = filter;
                self.refresh("live_set_filter")
            }
        }
    }

    /// Replace the sort (`None` keeps store order)
    ///
    /// Same state rules as [`set_filter`](Self::set_filter).
    ///
    /// # Errors
    ///
    /// Any query error from the store; the result set is then disposed
    pub fn set_sort(&mut self, sort: Option<E::Sort>) -> Result<ChangeBatch<E>> {
        match self.state {
            LiveState::Disposed => Ok(ChangeBatch::empty()),
            LiveState::Idle => {
                self.sort = sort;
                Ok(ChangeBatch::empty())
            }
            LiveState::Active => {
                self.sort = sort;
                self.refresh("live_set_sort")
            }
        }
    }

    /// Drain pending store notifications and re-query once if any arrived
    ///
    /// Returns `None` when there was nothing to process or the result set is
    /// not active.
    ///
    /// # Errors
    ///
    /// Any query error from the store; the result set is then disposed
    pub fn process_changes(&mut self) -> Result<Option<ChangeBatch<E>>> {
        if self.state != LiveState::Active {
            return Ok(None);
        }
        let Some(notifications) = &self.notifications else {
            return Ok(None);
        };

        let mut pending = 0usize;
        loop {
            match notifications.try_recv() {
                Ok(_) => pending += 1,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if pending == 0 {
            return Ok(None);
        }

        tracing::debug!(result_set_id = %self.id, pending, "coalescing store notifications");
        self.refresh("live_process_changes").map(Some)
    }

    /// Register a receiver for every future non-empty batch
    ///
    /// A disposed result set hands out a receiver that is already closed.
    pub fn subscribe(&mut self) -> mpsc::Receiver<ChangeBatch<E>> {
        let (tx, rx) = mpsc::channel();
        if self.state != LiveState::Disposed {
            self.subscribers.push(tx);
        }
        rx
    }

    /// Stop observing the store and release every subscriber
    ///
    /// Idempotent. The last snapshot stays readable.
    pub fn dispose(&mut self) {
        if self.state == LiveState::Disposed {
            return;
        }
        self.state = LiveState::Disposed;
        self.notifications = None;
        self.subscribers.clear();
        tracing::debug!(
            entity = E::entity_name(),
            result_set_id = %self.id,
            "live result set disposed"
        );
    }

    fn fetch(&self) -> Result<Vec<E>> {
        let request = FetchRequest::for_entity::<E>(self.filter.as_ref(), self.sort.as_ref());
        self.store.fetch(&request)
    }

    fn refresh(&mut self, op: &'static str) -> Result<ChangeBatch<E>> {
        let started = Instant::now();
        log_op_start!(op, entity = E::entity_name(), result_set_id = %self.id);

        let records = match self.fetch() {
            Ok(records) => records,
            Err(err) => {
                log_op_error!(op, err.clone(), duration_ms = elapsed_ms(started), result_set_id = %self.id);
                self.dispose();
                return Err(err);
            }
        };

        let batch = compute_changes(&self.snapshot, &records);
        self.snapshot = records;
        if !batch.is_empty() {
            self.emit(&batch);
        }

        log_op_end!(
            op,
            duration_ms = elapsed_ms(started),
            result_set_id = %self.id,
            snapshot_len = self.snapshot.len(),
            batch_len = batch.len()
        );
        Ok(batch)
    }

    fn emit(&mut self, batch: &ChangeBatch<E>) {
        self.subscribers.retain(|tx| tx.send(batch.clone()).is_ok());
    }
}

impl<E, S> Drop for LiveResultSet<E, S>
where
    E: Fetchable,
    S: FetchStore<E>,
{
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<E, S> std::fmt::Debug for LiveResultSet<E, S>
where
    E: Fetchable,
    S: FetchStore<E>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveResultSet")
            .field("id", &self.id)
            .field("entity", &E::entity_name())
            .field("state", &self.state)
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("len", &self.snapshot.len())
            .finish()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
