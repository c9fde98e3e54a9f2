//! Record store layer
//!
//! Responsible for storing and loading the finance records.
//! Currently uses in-memory collections; can be replaced with a database.

use crate::error::ServiceError;
use crate::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Anything the record store can hold
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// Borrowed predicate used by `list_where`
pub type RecordFilter<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

/// In-place modification applied by `update`
pub type RecordPatch<T> = Box<dyn FnOnce(&mut T) -> Result<()> + Send>;

/// Trait for record persistence
#[async_trait::async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Insert a new record; fails with `Conflict` when the id is taken
    async fn insert(&self, record: T) -> Result<T>;
    async fn get(&self, id: &str) -> Result<Option<T>>;
    /// All records in insertion order
    async fn list(&self) -> Result<Vec<T>>;
    async fn list_where(&self, filter: RecordFilter<'_, T>) -> Result<Vec<T>>;
    /// Apply `patch` to the record with `id`; `None` when it does not exist
    async fn update(&self, id: &str, patch: RecordPatch<T>) -> Result<Option<T>>;
    /// Insert or replace
    async fn upsert(&self, record: T) -> Result<T>;
    /// Remove the record; returns whether something was removed
    async fn delete(&self, id: &str) -> Result<bool>;
}

struct Slots<T> {
    records: HashMap<String, T>,
    order: Vec<String>,
}

/// In-memory record store for development
pub struct InMemoryRecordStore<T> {
    slots: Arc<RwLock<Slots<T>>>,
}

impl<T> InMemoryRecordStore<T> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(RwLock::new(Slots {
                records: HashMap::new(),
                order: Vec::new(),
            })),
        }
    }
}

impl<T> Default for InMemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<T: Record> RecordStore<T> for InMemoryRecordStore<T> {

    async fn insert(&self, record: T) -> Result<T> {
        let mut slots = self.slots.write().await;
        let id = record.id().to_string();

        if slots.records.contains_key(&id) {
            return Err(ServiceError::Conflict(format!(
                "Record with id {} already exists",
                id
            )));
        }

        slots.order.push(id.clone());
        slots.records.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        let slots = self.slots.read().await;
        Ok(slots.records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let slots = self.slots.read().await;
        Ok(slots
            .order
            .iter()
            .filter_map(|id| slots.records.get(id))
            .cloned()
            .collect())
    }

    async fn list_where(&self, filter: RecordFilter<'_, T>) -> Result<Vec<T>> {
        let slots = self.slots.read().await;
        Ok(slots
            .order
            .iter()
            .filter_map(|id| slots.records.get(id))
            .filter(|record| filter(record))
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, patch: RecordPatch<T>) -> Result<Option<T>> {
        let mut slots = self.slots.write().await;

        let Some(current) = slots.records.get(id) else {
            return Ok(None);
        };

        // Patch a copy so a failing patch leaves the stored record untouched
        let mut updated = current.clone();
        patch(&mut updated)?;

        slots.records.insert(id.to_string(), updated.clone());
        Ok(Some(updated))
    }

    async fn upsert(&self, record: T) -> Result<T> {
        let mut slots = self.slots.write().await;
        let id = record.id().to_string();

        if !slots.records.contains_key(&id) {
            slots.order.push(id.clone());
        }
        slots.records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut slots = self.slots.write().await;

        if slots.records.remove(id).is_none() {
            return Ok(false);
        }
        slots.order.retain(|existing| existing != id);
        Ok(true)
    }
}

/// Human-facing display codes such as `T-1001`.
///
/// Codes are never reused, even after the record they labelled is deleted.
pub struct CodeSequence {
    prefix: &'static str,
    next: AtomicU64,
}

impl CodeSequence {
    pub fn new(prefix: &'static str, first: u64) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(first),
        }
    }

    pub fn next_code(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}
