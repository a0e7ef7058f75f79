//! # Errors
//!
//! Error types shared by the store, the HTTP boundary and the namespaced dispatcher.
//!
//! [`ResourceError`] is what ends up in a module's `error` field, so it is `Clone`
//! and carries the raw response payload. [`StoreError`] covers the commit channel
//! itself and mirrors the actor errors of a message-passing store.

use crate::store::LocalId;
use serde_json::Value;
use thiserror::Error;

/// Failures at the HTTP boundary. Stored in module state, never raised past an action.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResourceError {
    /// The API answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: Value },

    /// The request never produced a response (connection refused, DNS, timeout...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be interpreted.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// A collection response did not contain the expected top-level key.
    #[error("Response has no `{0}` collection")]
    MissingCollection(String),

    /// A persisted resource has no server identifier to address it by.
    #[error("Resource has no `{0}` identifier")]
    MissingIdentifier(String),
}

/// Errors raised by the store's commit channel.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Store closed")]
    ActorClosed,
    #[error("Store dropped response channel")]
    ActorDropped,
    #[error("Resource not found: {0}")]
    NotFound(LocalId),
}

/// Errors from string-addressed dispatch on the root [`Store`](crate::lifecycle::Store).
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown getter: {0}")]
    UnknownGetter(String),

    #[error("Invalid payload for {action}: {source}")]
    InvalidPayload {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors while loading a [`StoreConfig`](crate::config::StoreConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid module `{module}`: {reason}")]
    Invalid { module: String, reason: String },
}
