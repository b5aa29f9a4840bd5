//! Mutex-guarded in-memory record collections.
//!
//! Every operation holds the collection lock for its whole find-then-mutate
//! sequence, so concurrent updates and deletes of the same id serialize.
//! Ids are assigned from a counter and never reused.

use crate::errors::RecordError;
use crate::models::Record;
use std::sync::{Mutex, MutexGuard};
use tracing::error;

struct Arena<T> {
    records: Vec<T>,
    next_id: i64,
}

/// In-memory collection of `T`, in insertion order.
pub struct RecordStore<T> {
    inner: Mutex<Arena<T>>,
}

impl<T: Record> RecordStore<T> {
    /// Create a store holding `records`; new ids continue after the largest one.
    pub fn new(records: Vec<T>) -> Self {
        let next_id = records.iter().map(Record::id).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Arena { records, next_id }),
        }
    }

    /// Create a store holding the collection's seed records.
    pub fn seeded() -> Self {
        Self::new(T::seed())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Arena<T>>, RecordError> {
        self.inner.lock().map_err(|_| {
            error!(target: "records.store", collection = T::COLLECTION, "Record store lock poisoned");
            RecordError::Internal
        })
    }

    pub fn list(&self) -> Result<Vec<T>, RecordError> {
        Ok(self.lock()?.records.clone())
    }

    /// # Errors
    ///
    /// Returns `RecordError::NotFound` if no record has this id.
    pub fn get(&self, id: i64) -> Result<T, RecordError> {
        self.lock()?
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or(RecordError::NotFound(T::LABEL))
    }

    /// Store a new record under the next id.
    pub fn insert(&self, new: T::New) -> Result<T, RecordError> {
        let mut arena = self.lock()?;
        let record = T::create(arena.next_id, new);
        arena.next_id += 1;
        arena.records.push(record.clone());
        Ok(record)
    }

    /// Apply a partial update and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotFound` if no record has this id.
    pub fn update(&self, id: i64, update: T::Update) -> Result<T, RecordError> {
        let mut arena = self.lock()?;
        let record = arena
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(RecordError::NotFound(T::LABEL))?;
        record.apply(update);
        Ok(record.clone())
    }

    /// # Errors
    ///
    /// Returns `RecordError::NotFound` if no record has this id.
    pub fn delete(&self, id: i64) -> Result<(), RecordError> {
        let mut arena = self.lock()?;
        let position = arena
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(RecordError::NotFound(T::LABEL))?;
        arena.records.remove(position);
        Ok(())
    }
}
