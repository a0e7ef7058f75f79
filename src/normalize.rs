//! # Normalization
//!
//! Flattens a collection of entities into an `id → entity` table plus an ordered
//! id list, and rebuilds plain attribute objects from those tables.
//!
//! Entities are keyed by their client-local id rather than the server id, so a
//! resource that was never saved normalizes exactly like a fetched one.

use crate::store::LocalId;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Anything that can be stored in a normalized table.
pub trait Normalizable {
    fn local_id(&self) -> LocalId;
    fn attributes(&self) -> &Map<String, Value>;
}

impl<T: Normalizable> Normalizable for Arc<T> {
    fn local_id(&self) -> LocalId {
        T::local_id(self)
    }

    fn attributes(&self) -> &Map<String, Value> {
        T::attributes(self)
    }
}

/// Describes one entity collection, named after the resource it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    key: String,
}

/// Output of [`EntitySchema::normalize`].
#[derive(Debug)]
pub struct Normalized<T> {
    pub entities: HashMap<LocalId, T>,
    pub result: Vec<LocalId>,
}

impl EntitySchema {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// A repeated id keeps its first position; the last record wins.
    pub fn normalize<T: Normalizable>(&self, records: impl IntoIterator<Item = T>) -> Normalized<T> {
        let mut entities = HashMap::new();
        let mut result = Vec::new();
        for record in records {
            let id = record.local_id();
            if entities.insert(id, record).is_none() {
                result.push(id);
            }
        }
        trace!(schema = %self.key, count = result.len(), "Normalized");
        Normalized { entities, result }
    }

    pub fn normalize_one<T: Normalizable>(&self, record: T) -> Normalized<T> {
        self.normalize(std::iter::once(record))
    }

    /// Ids missing from `entities` are skipped.
    pub fn denormalize<T: Normalizable>(
        &self,
        ids: &[LocalId],
        entities: &HashMap<LocalId, T>,
    ) -> Vec<Value> {
        ids.iter()
            .filter_map(|id| entities.get(id))
            .map(|entity| Value::Object(entity.attributes().clone()))
            .collect()
    }
}
