//! Dynamic resource store
//!
//! A fixed number of slots, each holding at most one named resource. Paths
//! are matched exactly with a linear scan over all slots.

use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::http::parser::MAX_PATH_LEN;

/// Store failures. None of them change any slot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no free slot left, capacity is {capacity}")]
    CapacityExceeded { capacity: usize },

    #[error("resource {0} already exists")]
    AlreadyExists(String),

    #[error("path is {len} bytes, limit is {max}")]
    PathTooLong { len: usize, max: usize },

    #[error("content is {len} bytes, limit is {max}")]
    ContentTooLarge { len: usize, max: usize },

    #[error("slot {0} is not in use")]
    NotInUse(usize),

    #[error("slot {index} out of range, capacity is {capacity}")]
    OutOfRange { index: usize, capacity: usize },
}

/// One storage unit, identified by its position in the store.
#[derive(Debug, Clone, Default)]
pub struct Slot {
    path: String,
    content: Bytes,
    in_use: bool,
}

impl Slot {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    pub fn in_use(&self) -> bool {
        self.in_use
    }

    fn clear(&mut self) {
        self.path.clear();
        self.content = Bytes::new();
        self.in_use = false;
    }
}

/// Result of a scan over all slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    /// In-use slot holding the path.
    pub existing: Option<usize>,
    /// First free slot seen during the scan.
    pub first_free: Option<usize>,
}

/// What a `PUT` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Created(usize),
    Updated(usize),
}

/// Bounded slot table with create/read/update/delete by exact path.
#[derive(Debug, Clone)]
pub struct DynamicStore {
    slots: Vec<Slot>,
    max_content_size: usize,
}

impl DynamicStore {
    pub fn new(capacity: usize, max_content_size: usize) -> Self {
        Self {
            slots: vec![Slot::default(); capacity],
            max_content_size,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.in_use).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Scans every slot for `path`, noting the first free one on the way.
    pub fn lookup(&self, path: &str) -> Lookup {
        let mut first_free = None;

        for (index, slot) in self.slots.iter().enumerate() {
            if slot.in_use {
                if slot.path == path {
                    return Lookup {
                        existing: Some(index),
                        first_free,
                    };
                }
            } else if first_free.is_none() {
                first_free = Some(index);
            }
        }

        Lookup {
            existing: None,
            first_free,
        }
    }

    /// Stores a resource under a path that is not live yet.
    pub fn create(&mut self, path: &str, content: Bytes) -> Result<usize, StoreError> {
        if path.len() > MAX_PATH_LEN {
            return Err(StoreError::PathTooLong {
                len: path.len(),
                max: MAX_PATH_LEN,
            });
        }
        self.check_content(&content)?;

        let lookup = self.lookup(path);
        if lookup.existing.is_some() {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }
        let index = lookup.first_free.ok_or(StoreError::CapacityExceeded {
            capacity: self.capacity(),
        })?;

        let slot = &mut self.slots[index];
        slot.in_use = true;
        slot.path.clear();
        slot.path.push_str(path);
        slot.content = content;

        Ok(index)
    }

    /// Replaces the content of a live slot. The path stays as it is.
    pub fn update(&mut self, index: usize, content: Bytes) -> Result<(), StoreError> {
        self.check_content(&content)?;
        let slot = self.live_slot_mut(index)?;
        slot.content = content;
        Ok(())
    }

    /// Frees a live slot and drops its content.
    pub fn delete(&mut self, index: usize) -> Result<(), StoreError> {
        self.live_slot_mut(index)?.clear();
        Ok(())
    }

    /// Current content of a live slot. `Bytes` clones are reference counted.
    pub fn read(&self, index: usize) -> Result<Bytes, StoreError> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get(index)
            .ok_or(StoreError::OutOfRange { index, capacity })?;
        if !slot.in_use {
            return Err(StoreError::NotInUse(index));
        }
        Ok(slot.content.clone())
    }

    /// Update if `path` is live, create otherwise.
    pub fn put(&mut self, path: &str, content: Bytes) -> Result<PutOutcome, StoreError> {
        match self.lookup(path).existing {
            Some(index) => {
                self.update(index, content)?;
                Ok(PutOutcome::Updated(index))
            }
            None => self.create(path, content).map(PutOutcome::Created),
        }
    }

    /// Content stored under `path`, if live.
    pub fn get(&self, path: &str) -> Option<Bytes> {
        let index = self.lookup(path).existing?;
        self.read(index).ok()
    }

    /// Deletes `path`. Returns whether it was live.
    pub fn remove(&mut self, path: &str) -> bool {
        match self.lookup(path).existing {
            Some(index) => self.delete(index).is_ok(),
            None => false,
        }
    }

    fn check_content(&self, content: &Bytes) -> Result<(), StoreError> {
        if content.len() > self.max_content_size {
            return Err(StoreError::ContentTooLarge {
                len: content.len(),
                max: self.max_content_size,
            });
        }
        Ok(())
    }

    fn live_slot_mut(&mut self, index: usize) -> Result<&mut Slot, StoreError> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(StoreError::OutOfRange { index, capacity })?;
        if !slot.in_use {
            return Err(StoreError::NotInUse(index));
        }
        Ok(slot)
    }
}

/// The store as shared between connections.
///
/// Every method takes the lock once, so a lookup and the mutation that
/// depends on it cannot interleave with another connection.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<DynamicStore>>,
}

impl SharedStore {
    pub fn new(store: DynamicStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub async fn get(&self, path: &str) -> Option<Bytes> {
        self.inner.lock().await.get(path)
    }

    pub async fn put(&self, path: &str, content: Bytes) -> Result<PutOutcome, StoreError> {
        self.inner.lock().await.put(path, content)
    }

    pub async fn remove(&self, path: &str) -> bool {
        self.inner.lock().await.remove(path)
    }

    /// Number of live resources.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn capacity(&self) -> usize {
        self.inner.lock().await.capacity()
    }
}
