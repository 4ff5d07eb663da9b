//! # In-Memory World State
//!
//! Multi-version store with optimistic concurrency control. Transactions
//! simulate against the latest committed state, collect a read/write set,
//! and are validated under the store write lock at commit.

use crate::domain::{
    CommitReceipt, KeyRange, KeyValue, RangeQueryInfo, ReadWriteSet, Version, VersionedValue,
    WorldStateConfig, WorldStateError,
};
use crate::ports::{StateIterator, TransactionContext, WorldState};
use parking_lot::{Mutex, RwLock};
use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct CommittedState {
    entries: BTreeMap<String, VersionedValue>,
    height: Version,
}

#[derive(Debug)]
struct StoreInner {
    state: RwLock<CommittedState>,
    config: WorldStateConfig,
}

/// In-memory implementation of `WorldState`.
///
/// Cloning is cheap and yields a handle to the same store.
#[derive(Clone, Debug)]
pub struct InMemoryWorldState {
    inner: Arc<StoreInner>,
}

impl InMemoryWorldState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(CommittedState::default()),
                config: WorldStateConfig::default(),
            }),
        }
    }

    pub fn with_config(config: WorldStateConfig) -> Result<Self, WorldStateError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(CommittedState::default()),
                config,
            }),
        })
    }

    /// Empty store configured from `WorldStateConfig::from_env`.
    pub fn from_env() -> Result<Self, WorldStateError> {
        Self::with_config(WorldStateConfig::from_env()?)
    }

    pub fn config(&self) -> &WorldStateConfig {
        &self.inner.config
    }

    /// Height of the last commit that wrote anything.
    pub fn height(&self) -> Version {
        self.inner.state.read().height
    }

    /// Committed value at `key`, bypassing any transaction.
    pub fn get_committed(&self, key: &str) -> Option<VersionedValue> {
        self.inner.state.read().entries.get(key).cloned()
    }

    /// Copy of the whole committed state.
    pub fn snapshot(&self) -> BTreeMap<String, VersionedValue> {
        self.inner.state.read().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryWorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState for InMemoryWorldState {
    type Transaction = InMemoryTransaction;

    fn begin_transaction(&self) -> Result<InMemoryTransaction, WorldStateError> {
        let tx = InMemoryTransaction {
            tx_id: Uuid::new_v4().to_string(),
            store: Arc::clone(&self.inner),
            rwset: Mutex::new(ReadWriteSet::new()),
            open_iterators: AtomicUsize::new(0),
        };
        trace!(tx_id = %tx.tx_id, "Transaction started");
        Ok(tx)
    }

    fn commit(&self, tx: InMemoryTransaction) -> Result<CommitReceipt, WorldStateError> {
        if !Arc::ptr_eq(&tx.store, &self.inner) {
            return Err(WorldStateError::DatabaseError(format!(
                "transaction {} was opened against a different store",
                tx.tx_id
            )));
        }

        let InMemoryTransaction { tx_id, rwset, .. } = tx;
        let rwset = rwset.into_inner();

        let mut state = self.inner.state.write();
        if let Err(e) = rwset.validate(&state.entries) {
            warn!(tx_id = %tx_id, error = %e, "Transaction rejected at commit");
            return Err(e);
        }

        if rwset.is_read_only() {
            trace!(tx_id = %tx_id, "Read-only transaction committed");
            return Ok(CommitReceipt {
                tx_id,
                version: state.height,
                keys_written: Vec::new(),
            });
        }

        state.height += 1;
        let version = state.height;
        let mut keys_written = Vec::with_capacity(rwset.writes.len());
        for (key, value) in rwset.writes {
            keys_written.push(key.clone());
            state.entries.insert(key, VersionedValue { value, version });
        }

        debug!(
            tx_id = %tx_id,
            version,
            keys = keys_written.len(),
            "Transaction committed"
        );

        Ok(CommitReceipt {
            tx_id,
            version,
            keys_written,
        })
    }
}

/// Transaction handle produced by `InMemoryWorldState`.
///
/// Dropping it without committing discards every buffered write.
#[derive(Debug)]
pub struct InMemoryTransaction {
    tx_id: String,
    store: Arc<StoreInner>,
    rwset: Mutex<ReadWriteSet>,
    open_iterators: AtomicUsize,
}

impl InMemoryTransaction {
    /// Copy of what this transaction has read and written so far.
    pub fn read_write_set(&self) -> ReadWriteSet {
        self.rwset.lock().clone()
    }

    /// Number of range iterators opened on this transaction that have not
    /// been dropped yet.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(AtomicOrdering::SeqCst)
    }
}

impl TransactionContext for InMemoryTransaction {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, WorldStateError> {
        let mut rwset = self.rwset.lock();
        if let Some(pending) = rwset.writes.get(key) {
            return Ok(Some(pending.clone()));
        }

        let state = self.store.state.read();
        let entry = state.entries.get(key);
        rwset.record_read(key, entry.map(|v| v.version));
        Ok(entry.map(|v| v.value.clone()))
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), WorldStateError> {
        if key.is_empty() {
            return Err(WorldStateError::EmptyKey);
        }
        self.rwset.lock().record_write(key, value);
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<StateIterator<'_>, WorldStateError> {
        let range = KeyRange::new(start_key, end_key);

        let pending: VecDeque<(String, Vec<u8>)> = if range.is_void() {
            VecDeque::new()
        } else {
            self.rwset
                .lock()
                .writes
                .range::<str, _>(range.bounds(None))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        };

        self.open_iterators.fetch_add(1, AtomicOrdering::SeqCst);
        trace!(tx_id = %self.tx_id, start_key, end_key, "Range iterator opened");

        Ok(Box::new(InMemoryRangeIterator {
            tx: self,
            committed_done: range.is_void(),
            info: Some(RangeQueryInfo::new(range.clone())),
            range,
            page: VecDeque::new(),
            pending,
            resume_after: None,
        }))
    }
}

enum NextSource {
    Committed,
    Pending,
    /// Pending write to a key that also exists in committed state.
    Shadowed,
}

/// Lazy range iterator over committed state merged with the transaction's
/// own pending writes.
struct InMemoryRangeIterator<'a> {
    tx: &'a InMemoryTransaction,
    range: KeyRange,
    page: VecDeque<(String, VersionedValue)>,
    pending: VecDeque<(String, Vec<u8>)>,
    /// Last committed key fetched into `page`.
    resume_after: Option<String>,
    committed_done: bool,
    info: Option<RangeQueryInfo>,
}

impl InMemoryRangeIterator<'_> {
    fn fetch_page(&mut self) {
        let page_size = self.tx.store.config.range_page_size;
        let page: VecDeque<(String, VersionedValue)> = {
            let state = self.tx.store.state.read();
            state
                .entries
                .range::<str, _>(self.range.bounds(self.resume_after.as_deref()))
                .take(page_size)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        };

        if page.len() < page_size {
            self.committed_done = true;
        }
        if let Some((key, _)) = page.back() {
            self.resume_after = Some(key.clone());
        }
        trace!(tx_id = %self.tx.tx_id, entries = page.len(), "Range page fetched");
        self.page = page;
    }

    fn observe(&mut self, key: &str, version: Version) {
        if let Some(info) = self.info.as_mut() {
            info.observed.push((key.to_string(), version));
        }
    }
}

impl Iterator for InMemoryRangeIterator<'_> {
    type Item = Result<KeyValue, WorldStateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.page.is_empty() && !self.committed_done {
            self.fetch_page();
        }

        let source = match (self.page.front(), self.pending.front()) {
            (None, None) => {
                if let Some(info) = self.info.as_mut() {
                    info.exhausted = true;
                }
                return None;
            }
            (Some(_), None) => NextSource::Committed,
            (None, Some(_)) => NextSource::Pending,
            (Some((committed, _)), Some((pending, _))) => match pending.cmp(committed) {
                Ordering::Less => NextSource::Pending,
                Ordering::Equal => NextSource::Shadowed,
                Ordering::Greater => NextSource::Committed,
            },
        };

        let kv = match source {
            NextSource::Committed => {
                let (key, value) = self.page.pop_front()?;
                self.observe(&key, value.version);
                KeyValue::new(key, value.value)
            }
            NextSource::Pending => {
                let (key, value) = self.pending.pop_front()?;
                KeyValue::new(key, value)
            }
            NextSource::Shadowed => {
                let (key, committed) = self.page.pop_front()?;
                self.observe(&key, committed.version);
                let (_, value) = self.pending.pop_front()?;
                KeyValue::new(key, value)
            }
        };

        if let Some(info) = self.info.as_mut() {
            info.last_key = Some(kv.key.clone());
        }
        Some(Ok(kv))
    }
}

impl Drop for InMemoryRangeIterator<'_> {
    fn drop(&mut self) {
        if let Some(info) = self.info.take() {
            trace!(
                tx_id = %self.tx.tx_id,
                observed = info.observed.len(),
                exhausted = info.exhausted,
                "Range iterator closed"
            );
            self.tx.rwset.lock().range_queries.push(info);
        }
        self.tx.open_iterators.fetch_sub(1, AtomicOrdering::SeqCst);
    }
}
