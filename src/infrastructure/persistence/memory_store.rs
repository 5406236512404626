//! In-process store backed by concurrent hash maps.
//!
//! Implements both repository traits with the same atomicity contracts as the
//! PostgreSQL backend: conditional creates go through the map's entry API,
//! which holds the shard lock across the check and the insert.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::Mapping;
use crate::domain::repositories::{CounterRepository, MappingRepository, StoreError};

/// Volatile mapping and counter store.
///
/// Contents are lost on restart. Intended for development and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    mappings: DashMap<String, Mapping>,
    counters: DashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[async_trait]
impl MappingRepository for MemoryStore {
    async fn put_if_absent(&self, mapping: &Mapping) -> Result<(), StoreError> {
        match self.mappings.entry(mapping.short_code.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(mapping.short_code.clone())),
            Entry::Vacant(slot) => {
                slot.insert(mapping.clone());
                Ok(())
            }
        }
    }

    async fn put(&self, mapping: &Mapping) -> Result<(), StoreError> {
        self.mappings
            .insert(mapping.short_code.clone(), mapping.clone());
        Ok(())
    }

    async fn get(&self, short_code: &str) -> Result<Option<Mapping>, StoreError> {
        Ok(self.mappings.get(short_code).map(|entry| entry.value().clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl CounterRepository for MemoryStore {
    async fn ensure_exists(&self, counter_id: &str) -> Result<(), StoreError> {
        self.counters.entry(counter_id.to_string()).or_insert(0);
        Ok(())
    }

    async fn increment(&self, counter_id: &str) -> Result<u64, StoreError> {
        let mut value = self
            .counters
            .get_mut(counter_id)
            .ok_or_else(|| StoreError::Backend(format!("counter {} does not exist", counter_id)))?;

        *value = value
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend(format!("counter {} overflowed", counter_id)))?;

        Ok(*value)
    }
}
