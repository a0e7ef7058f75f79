//! Handles for talking to a [`StoreActor`](super::StoreActor).

use super::actor::{Response, StoreRequest};
use super::mutation::Mutation;
use super::state::{LocalId, ResourceModuleState};
use crate::error::StoreError;
use crate::resource::Resource;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::warn;

/// The module's commit channel plus a view of the latest snapshot.
///
/// While any `StoreClient` is alive the store task keeps running.
#[derive(Clone, Debug)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
    snapshots: watch::Receiver<Arc<ResourceModuleState>>,
}

impl StoreClient {
    pub(crate) fn new(
        sender: mpsc::Sender<StoreRequest>,
        snapshots: watch::Receiver<Arc<ResourceModuleState>>,
    ) -> Self {
        Self { sender, snapshots }
    }

    pub async fn commit(&self, mutation: Mutation) -> Result<(), StoreError> {
        request(&self.sender, |respond_to| StoreRequest::Commit {
            mutation,
            respond_to,
        })
        .await
    }

    pub async fn get(&self, local_id: LocalId) -> Result<Option<Resource>, StoreError> {
        request(&self.sender, |respond_to| StoreRequest::Get {
            local_id,
            respond_to,
        })
        .await
    }

    /// The state as of the last applied mutation.
    pub fn snapshot(&self) -> Arc<ResourceModuleState> {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified after every mutation applied from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ResourceModuleState>> {
        let mut receiver = self.snapshots.clone();
        let _ = receiver.borrow_and_update();
        receiver
    }

    /// A handle that does not keep the store task alive.
    pub fn downgrade(&self) -> WeakStoreClient {
        WeakStoreClient {
            sender: self.sender.downgrade(),
        }
    }
}

/// Commit channel held by resources.
///
/// Resources live inside the state they commit to, so a strong sender there would
/// keep the store task running forever.
#[derive(Clone, Debug)]
pub struct WeakStoreClient {
    sender: mpsc::WeakSender<StoreRequest>,
}

impl WeakStoreClient {
    pub async fn commit(&self, mutation: Mutation) -> Result<(), StoreError> {
        let sender = self.sender.upgrade().ok_or(StoreError::ActorClosed)?;
        request(&sender, |respond_to| StoreRequest::Commit {
            mutation,
            respond_to,
        })
        .await
    }

    pub async fn get(&self, local_id: LocalId) -> Result<Option<Resource>, StoreError> {
        let sender = self.sender.upgrade().ok_or(StoreError::ActorClosed)?;
        request(&sender, |respond_to| StoreRequest::Get {
            local_id,
            respond_to,
        })
        .await
    }
}

async fn request<T>(
    sender: &mpsc::Sender<StoreRequest>,
    build: impl FnOnce(Response<T>) -> StoreRequest,
) -> Result<T, StoreError> {
    let (respond_to, response) = oneshot::channel();
    sender
        .send(build(respond_to))
        .await
        .map_err(|_| StoreError::ActorClosed)?;
    response.await.map_err(|_| StoreError::ActorDropped)?
}

/// Logs a failed commit made on behalf of an action; actions never fail on it.
pub(crate) fn log_commit(result: Result<(), StoreError>, mutation: &'static str) {
    if let Err(error) = result {
        warn!(mutation, %error, "Commit failed");
    }
}
