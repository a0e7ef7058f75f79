//! Module state and the identifiers it is keyed by.

use crate::error::ResourceError;
use crate::normalize::EntitySchema;
use crate::resource::Resource;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_LOCAL_ID: AtomicU64 = AtomicU64::new(1);

/// Client-local identifier, the storage key in `by_id`.
///
/// Assigned from a process-wide counter in creation order, so unsaved resources
/// can be tracked before the server hands out a permanent id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(u64);

impl LocalId {
    pub fn next() -> Self {
        Self(NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "local_{}", self.0)
    }
}

/// Lifecycle stage of the most recent asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Initial,
    Loading,
    Updating,
    Deleting,
    Creating,
    Error,
    Success,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Initial => "INITIAL",
            Status::Loading => "LOADING",
            Status::Updating => "UPDATING",
            Status::Deleting => "DELETING",
            Status::Creating => "CREATING",
            Status::Error => "ERROR",
            Status::Success => "SUCCESS",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized state of one resource module.
///
/// INVARIANT: every id in `all_ids` has an entry in `by_id` and vice versa,
/// and `all_ids` holds no duplicates. Only [`Mutation`](super::Mutation)s write here.
///
/// Entities are shared between snapshots; a mutation copies only the entity it writes.
#[derive(Debug, Clone, Default)]
pub struct ResourceModuleState {
    pub(crate) by_id: HashMap<LocalId, Arc<Resource>>,
    pub(crate) all_ids: Vec<LocalId>,
    pub(crate) status: Status,
    pub(crate) error: Option<ResourceError>,
}

impl ResourceModuleState {
    pub fn by_id(&self) -> &HashMap<LocalId, Arc<Resource>> {
        &self.by_id
    }

    pub fn all_ids(&self) -> &[LocalId] {
        &self.all_ids
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn error(&self) -> Option<&ResourceError> {
        self.error.as_ref()
    }

    pub fn get(&self, local_id: LocalId) -> Option<&Resource> {
        self.by_id.get(&local_id).map(Arc::as_ref)
    }

    /// Entities in `all_ids` order.
    pub fn all(&self) -> Vec<Resource> {
        self.all_ids
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .map(|resource| Resource::clone(resource))
            .collect()
    }

    /// Plain attribute objects rebuilt from the normalized tables.
    pub fn denormalized(&self, schema: &EntitySchema) -> Vec<Value> {
        schema.denormalize(&self.all_ids, &self.by_id)
    }

    pub fn loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn updating(&self) -> bool {
        self.status == Status::Updating
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Checks the `by_id`/`all_ids` invariant.
    pub fn is_consistent(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.all_ids.len());
        self.all_ids.len() == self.by_id.len()
            && self
                .all_ids
                .iter()
                .all(|id| seen.insert(*id) && self.by_id.contains_key(id))
    }
}
