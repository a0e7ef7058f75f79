//! # Module Store
//!
//! Centralized state for one resource module, in the actor style:
//!
//! - [`StoreActor`] - owns [`ResourceModuleState`], applies [`Mutation`]s sequentially
//! - [`StoreClient`] - commit channel and snapshot view used by the module
//! - [`WeakStoreClient`] - commit channel used by resources
//!
//! State changes only through declared mutations; reads go through snapshots.

mod actor;
mod client;
mod mutation;
mod state;

pub use actor::{Response, StoreActor, StoreRequest};
pub use client::{StoreClient, WeakStoreClient};
pub(crate) use client::log_commit;
pub use mutation::Mutation;
pub use state::{LocalId, ResourceModuleState, Status};
