//! Storage facade over named collections
//!
//! Each collection is one JSON array stored under its key in a [`KeyValueStore`].
//! Every mutation reads the whole array, changes it and writes the whole array
//! back. The facade checks no domain invariants; that is the job of the class
//! and member APIs layered on top.
//!
//! Operations are `async` in shape only: the store underneath is synchronous and
//! nothing serializes concurrent read-modify-write cycles on the same key.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::entities::Record;
use crate::error::{GymError, Result};
use crate::kv::KeyValueStore;

/// Logical collection names used as storage keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Members,
    Classes,
    States,
    Cities,
    Districts,
    PaymentPlans,
    ClassTypes,
    ClassStatuses,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 8] = [
        CollectionKey::Members,
        CollectionKey::Classes,
        CollectionKey::States,
        CollectionKey::Cities,
        CollectionKey::Districts,
        CollectionKey::PaymentPlans,
        CollectionKey::ClassTypes,
        CollectionKey::ClassStatuses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKey::Members => "members",
            CollectionKey::Classes => "classes",
            CollectionKey::States => "states",
            CollectionKey::Cities => "cities",
            CollectionKey::Districts => "districts",
            CollectionKey::PaymentPlans => "payment-plans",
            CollectionKey::ClassTypes => "class-types",
            CollectionKey::ClassStatuses => "class-statuses",
        }
    }
}

impl std::fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CollectionKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CollectionKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown collection: {s}"))
    }
}

/// Async CRUD facade over JSON-array collections
#[derive(Clone)]
pub struct CollectionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CollectionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// All items of a collection; an absent key is an empty collection
    pub async fn get_all<T: DeserializeOwned>(&self, key: CollectionKey) -> Result<Vec<T>> {
        let raw = self.read(key)?;
        let items: Vec<T> = raw
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<_, _>>()?;
        Ok(items)
    }

    /// First item whose id matches, or `None`
    pub async fn get<T: Record>(&self, key: CollectionKey, id: i64) -> Result<Option<T>> {
        let raw = self.read(key)?;
        raw.into_iter()
            .find(|value| value_id(value) == Some(id))
            .map(serde_json::from_value)
            .transpose()
            .map_err(GymError::from)
    }

    /// Append an item; ids are not checked for uniqueness
    pub async fn create<T: Serialize>(&self, key: CollectionKey, item: &T) -> Result<()> {
        let mut raw = self.read(key)?;
        raw.push(serde_json::to_value(item)?);
        self.write(key, &raw)
    }

    /// Replace the first item with the same id, whole record
    ///
    /// An unknown id fails with [`GymError::NotFound`] and leaves the collection untouched.
    pub async fn update<T: Record>(&self, key: CollectionKey, item: &T) -> Result<()> {
        let mut raw = self.read(key)?;
        let id = item.id();
        let slot = raw
            .iter_mut()
            .find(|value| value_id(value) == Some(id))
            .ok_or_else(|| {
                tracing::warn!(collection = %key, id, "Update of unknown record");
                GymError::not_found(key.as_str(), id)
            })?;
        *slot = serde_json::to_value(item)?;
        self.write(key, &raw)
    }

    /// Drop every item with the given id; returns whether anything was removed
    pub async fn delete(&self, key: CollectionKey, id: i64) -> Result<bool> {
        let mut raw = self.read(key)?;
        let before = raw.len();
        raw.retain(|value| value_id(value) != Some(id));
        if raw.len() == before {
            return Ok(false);
        }
        self.write(key, &raw)?;
        Ok(true)
    }

    /// Persist a whole collection, replacing what was stored
    pub async fn save_all<T: Serialize>(&self, key: CollectionKey, items: &[T]) -> Result<()> {
        let raw = items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.write(key, &raw)
    }

    pub async fn len(&self, key: CollectionKey) -> Result<usize> {
        Ok(self.read(key)?.len())
    }

    pub async fn is_empty(&self, key: CollectionKey) -> Result<bool> {
        Ok(self.len(key).await? == 0)
    }

    fn read(&self, key: CollectionKey) -> Result<Vec<Value>> {
        let items: Vec<Value> = match self.kv.get(key.as_str())? {
            Some(blob) => serde_json::from_str(&blob)?,
            None => Vec::new(),
        };
        tracing::debug!(collection = %key, count = items.len(), "Read collection");
        Ok(items)
    }

    fn write(&self, key: CollectionKey, items: &[Value]) -> Result<()> {
        let blob = serde_json::to_string(items)?;
        self.kv.set(key.as_str(), blob)?;
        tracing::debug!(collection = %key, count = items.len(), "Wrote collection");
        Ok(())
    }
}

fn value_id(value: &Value) -> Option<i64> {
    value.get("id").and_then(Value::as_i64)
}
