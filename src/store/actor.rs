//! # Store Actor
//!
//! The task that owns a module's [`ResourceModuleState`].
//!
//! # Architecture Note
//! This is the "Server" half of the store. It owns the state and the receiver end
//! of the channel, and applies mutations one at a time in arrival order. No
//! `Mutex` or `RwLock` guards the state: the task has exclusive ownership of it.
//!
//! After every successful mutation the actor publishes an immutable snapshot on a
//! `watch` channel. Getters read the latest snapshot, and subscribers are woken on
//! each change. A commit is acknowledged only after its snapshot is published, so
//! `commit(..).await` followed by a getter always observes the write.

use super::client::StoreClient;
use super::mutation::Mutation;
use super::state::{LocalId, ResourceModuleState};
use crate::error::StoreError;
use crate::normalize::EntitySchema;
use crate::resource::Resource;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Requests the store task understands.
#[derive(Debug)]
pub enum StoreRequest {
    Commit {
        mutation: Mutation,
        respond_to: Response<()>,
    },
    Get {
        local_id: LocalId,
        respond_to: Response<Option<Resource>>,
    },
}

pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    state: ResourceModuleState,
    schema: EntitySchema,
    publisher: watch::Sender<Arc<ResourceModuleState>>,
}

impl StoreActor {
    /// Creates the actor and its client.
    ///
    /// # Arguments
    ///
    /// * `schema` - The module's entity schema; its key names the store in logs.
    /// * `buffer_size` - Capacity of the request channel (at least 1).
    pub fn new(schema: EntitySchema, buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let (publisher, snapshots) = watch::channel(Arc::new(ResourceModuleState::default()));
        let actor = Self {
            receiver,
            state: ResourceModuleState::default(),
            schema,
            publisher,
        };
        (actor, StoreClient::new(sender, snapshots))
    }

    /// Processes requests until every strong client is dropped.
    pub async fn run(mut self) {
        let resource = self.schema.key().to_string();
        info!(%resource, "Store started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                StoreRequest::Commit {
                    mutation,
                    respond_to,
                } => {
                    let name = mutation.name();
                    debug!(%resource, mutation = name, "Commit");
                    let result = mutation.apply(&mut self.state, &self.schema);
                    match &result {
                        Ok(()) => {
                            debug_assert!(self.state.is_consistent());
                            self.publisher.send_replace(Arc::new(self.state.clone()));
                        }
                        Err(e) => warn!(%resource, mutation = name, error = %e, "Commit rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Get {
                    local_id,
                    respond_to,
                } => {
                    let item = self.state.get(local_id).cloned();
                    debug!(%resource, %local_id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
            }
        }

        info!(%resource, size = self.state.all_ids.len(), "Shutdown");
    }
}
