//! Local collection store.
//!
//! Holds the five portal collections in memory, mirrors every mutation into
//! one durable slot and tells subscribers that something changed. Each call
//! first waits out a simulated network delay.
//!
//! Two stores opened over the same slot do not coordinate: the last one to
//! commit overwrites the other's changes.

pub mod latency;
pub mod listeners;
pub mod record;
pub mod slot;
pub mod snapshot;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info};

use latency::{Latency, NoLatency, UniformLatency};
use listeners::{Listeners, Subscription};
use record::{CollectionName, Record};
use slot::{DurableSlot, MemorySlot};
use snapshot::Snapshot;

/// Cheap to clone; every clone shares the same state.
#[derive(Clone)]
pub struct CollectionStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: RwLock<Snapshot>,
    slot: Arc<dyn DurableSlot>,
    latency: Arc<dyn Latency>,
    listeners: Arc<Listeners>,
}

impl CollectionStore {
    /// Open over `slot` with the default 50–350 ms latency.
    pub fn open(slot: Arc<dyn DurableSlot>) -> Self {
        Self::with_latency(slot, Arc::new(UniformLatency::default()))
    }

    pub fn with_latency(slot: Arc<dyn DurableSlot>, latency: Arc<dyn Latency>) -> Self {
        let snapshot = load_snapshot(slot.as_ref());
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(snapshot),
                slot,
                latency,
                listeners: Arc::new(Listeners::default()),
            }),
        }
    }

    /// Empty store over a fresh in-memory slot, no latency.
    pub fn in_memory() -> Self {
        Self::with_latency(Arc::new(MemorySlot::new("memory")), Arc::new(NoLatency))
    }

    /// Current records of `T`'s collection, in stored order.
    pub async fn read<T: Record>(&self) -> Vec<T> {
        self.simulate_latency().await;
        let records = T::items(&self.read_state()).clone();
        debug!(collection = %T::COLLECTION, count = records.len(), "read");
        records
    }

    /// Overwrite the whole collection.
    pub async fn replace<T: Record>(&self, records: Vec<T>) {
        let count = records.len();
        self.mutate(T::COLLECTION, |state| *T::items_mut(state) = records)
            .await;
        debug!(collection = %T::COLLECTION, count, "replace");
    }

    /// Put `record` at the head of its collection and hand it back.
    pub async fn insert_front<T: Record>(&self, record: T) -> T {
        let inserted = record.clone();
        self.mutate(T::COLLECTION, |state| T::items_mut(state).insert(0, record))
            .await;
        debug!(collection = %T::COLLECTION, "insert_front");
        inserted
    }

    /// Drop every record whose `field` equals `key`.
    pub async fn remove_by<T: Record>(&self, key: &str, field: T::Field) {
        let removed = self
            .mutate(T::COLLECTION, |state| {
                let items = T::items_mut(state);
                let before = items.len();
                items.retain(|item| item.key(field) != key);
                before - items.len()
            })
            .await;
        debug!(collection = %T::COLLECTION, key, ?field, removed, "remove_by");
    }

    /// `remove_by` on the collection's default key field.
    pub async fn remove<T: Record>(&self, key: &str) {
        self.remove_by::<T>(key, T::DEFAULT_FIELD).await
    }

    /// Merge `updates` into every record whose `field` equals `key`.
    pub async fn patch_by<T: Record>(&self, key: &str, updates: T::Patch, field: T::Field) {
        let patched = self
            .mutate(T::COLLECTION, |state| {
                let mut patched = 0usize;
                for item in T::items_mut(state)
                    .iter_mut()
                    .filter(|item| item.key(field) == key)
                {
                    item.apply(&updates);
                    patched += 1;
                }
                patched
            })
            .await;
        debug!(collection = %T::COLLECTION, key, ?field, patched, "patch_by");
    }

    /// `patch_by` on the collection's default key field.
    pub async fn patch<T: Record>(&self, key: &str, updates: T::Patch) {
        self.patch_by::<T>(key, updates, T::DEFAULT_FIELD).await
    }

    /// Read-modify-write of one collection as a single mutation.
    pub(crate) async fn update_with<T: Record, R>(&self, edit: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let result = self
            .mutate(T::COLLECTION, |state| edit(T::items_mut(state)))
            .await;
        debug!(collection = %T::COLLECTION, "update_with");
        result
    }

    /// Call `callback` after every persisted mutation.
    ///
    /// The call carries no payload; re-read whatever you display. An `Err`
    /// or a panic from the callback is logged and does not affect the
    /// mutation or the other listeners.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.inner.listeners.register(callback)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    async fn simulate_latency(&self) {
        let delay = self.inner.latency.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn mutate<R>(&self, collection: CollectionName, apply: impl FnOnce(&mut Snapshot) -> R) -> R {
        self.simulate_latency().await;
        let result = {
            let mut state = self.write_state();
            let result = apply(&mut *state);
            // commit while still holding the lock so slot writes keep mutation order.
            // FileSlot::commit fsyncs on this worker thread; fine for one local user.
            self.persist(collection, &state);
            result
        };
        self.notify(collection);
        result
    }

    fn persist(&self, collection: CollectionName, state: &Snapshot) {
        let payload = match state.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                error!(collection = %collection, error = %e, "Failed to serialize snapshot");
                return;
            }
        };
        if let Err(e) = self.inner.slot.commit(&payload) {
            error!(
                collection = %collection,
                slot = self.inner.slot.name(),
                error = %e,
                "Failed to commit snapshot, change kept in memory only"
            );
        }
    }

    fn notify(&self, collection: CollectionName) {
        let delivery = self.inner.listeners.notify();
        debug!(
            collection = %collection,
            delivered = delivery.delivered,
            failed = delivery.failed,
            "notified listeners"
        );
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore")
            .field("slot", &self.inner.slot.name())
            .field("latency", &self.inner.latency)
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}

fn load_snapshot(slot: &dyn DurableSlot) -> Snapshot {
    match slot.load() {
        Ok(Some(raw)) => {
            let snapshot = Snapshot::parse_lenient(&raw);
            info!(
                slot = slot.name(),
                users = snapshot.users.len(),
                tasks = snapshot.tasks.len(),
                instructions = snapshot.instructions.len(),
                attendance = snapshot.attendance.len(),
                salaries = snapshot.salaries.len(),
                "Loaded snapshot"
            );
            snapshot
        }
        Ok(None) => {
            info!(slot = slot.name(), "Slot is empty, starting with empty collections");
            Snapshot::default()
        }
        Err(e) => {
            error!(slot = slot.name(), error = %e, "Failed to read slot, starting with empty collections");
            Snapshot::default()
        }
    }
}
