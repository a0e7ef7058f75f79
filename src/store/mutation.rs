//! The declared state transitions of a resource module.

use super::state::{LocalId, ResourceModuleState, Status};
use crate::error::{ResourceError, StoreError};
use crate::normalize::{EntitySchema, Normalized};
use crate::resource::Resource;
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// A synchronous write to [`ResourceModuleState`].
///
/// Mutations are the only way state changes. They are sent to the store task
/// with [`StoreClient::commit`](super::StoreClient::commit) and applied in order.
#[derive(Debug)]
pub enum Mutation {
    SetStatus(Status),
    SetError(Option<ResourceError>),
    /// Replace `by_id` and `all_ids` wholesale, e.g. after a fetch.
    SetResources {
        records: Vec<Resource>,
        schema: EntitySchema,
    },
    /// Write a single attribute on an existing entity.
    Set {
        local_id: LocalId,
        attribute: String,
        value: Value,
    },
    AddResource(Resource),
    DeleteResource(LocalId),
    /// Merge an entity that is already in `all_ids`, e.g. after a save.
    ModifyResource(Resource),
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetStatus(_) => "SET_STATUS",
            Mutation::SetError(_) => "SET_ERROR",
            Mutation::SetResources { .. } => "SET_RESOURCES",
            Mutation::Set { .. } => "SET",
            Mutation::AddResource(_) => "ADD_RESOURCE",
            Mutation::DeleteResource(_) => "DELETE_RESOURCE",
            Mutation::ModifyResource(_) => "MODIFY_RESOURCE",
        }
    }

    /// Applies the mutation. On `Err` the state is left untouched.
    ///
    /// `schema` is the module's own schema, used to normalize single entities.
    pub(crate) fn apply(
        self,
        state: &mut ResourceModuleState,
        schema: &EntitySchema,
    ) -> Result<(), StoreError> {
        match self {
            Mutation::SetStatus(status) => state.status = status,
            Mutation::SetError(error) => state.error = error,
            Mutation::SetResources { records, schema } => {
                let Normalized { entities, result } = schema.normalize(records);
                state.by_id = entities
                    .into_iter()
                    .map(|(id, resource)| (id, Arc::new(resource)))
                    .collect();
                state.all_ids = result;
            }
            Mutation::Set {
                local_id,
                attribute,
                value,
            } => {
                let resource = state
                    .by_id
                    .get_mut(&local_id)
                    .ok_or(StoreError::NotFound(local_id))?;
                Arc::make_mut(resource).set_attribute(attribute, value);
            }
            Mutation::AddResource(resource) => {
                let Normalized { entities, result } = schema.normalize_one(resource);
                merge(state, entities);
                for id in result {
                    if !state.all_ids.contains(&id) {
                        state.all_ids.push(id);
                    }
                }
            }
            Mutation::DeleteResource(local_id) => {
                state
                    .by_id
                    .remove(&local_id)
                    .ok_or(StoreError::NotFound(local_id))?;
                state.all_ids.retain(|id| *id != local_id);
            }
            Mutation::ModifyResource(resource) => {
                let Normalized { entities, .. } = schema.normalize_one(resource);
                if let Some(missing) = entities.keys().find(|id| !state.by_id.contains_key(id)) {
                    return Err(StoreError::NotFound(*missing));
                }
                merge(state, entities);
            }
        }
        Ok(())
    }
}

fn merge(state: &mut ResourceModuleState, entities: impl IntoIterator<Item = (LocalId, Resource)>) {
    for (id, incoming) in entities {
        match state.by_id.entry(id) {
            Entry::Occupied(mut existing) => Arc::make_mut(existing.get_mut()).absorb(incoming),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(incoming));
            }
        }
    }
}
