//! # Resource Instance
//!
//! A [`Resource`] is one entity of a collection: its business attributes plus
//! metadata needed to persist it (URL, HTTP client, commit channel, lifecycle tag,
//! local id, identifier field).
//!
//! The metadata lives in private fields. It is not serialized and not shown by
//! `Debug`; only the attributes travel to the API or to generic tooling.
//!
//! # Source of Truth
//! The copy in the module state is authoritative. [`Resource::set`] commits a
//! mutation instead of writing to `self`, and [`Resource::save`] and
//! [`Resource::delete`] re-read the stored copy before talking to the server, so
//! a clone obtained earlier still persists the latest attributes.

use crate::error::{ResourceError, StoreError};
use crate::http::HttpClient;
use crate::normalize::Normalizable;
use crate::store::{log_commit, LocalId, Mutation, Status, WeakStoreClient};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Whether an entity has ever been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    New,
    Saved,
}

/// Everything a module hands to the resources it creates.
#[derive(Clone, Debug)]
pub(crate) struct Binding {
    pub(crate) collection: String,
    pub(crate) path: String,
    pub(crate) id_field: String,
    pub(crate) http: HttpClient,
    pub(crate) store: WeakStoreClient,
}

#[derive(Clone)]
struct Meta {
    local_id: LocalId,
    lifecycle: Lifecycle,
    binding: Binding,
}

/// One entity of a resource collection.
#[derive(Clone)]
pub struct Resource {
    attributes: Map<String, Value>,
    meta: Meta,
}

impl Resource {
    pub(crate) fn bind(
        attributes: Map<String, Value>,
        binding: &Binding,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            attributes,
            meta: Meta {
                local_id: LocalId::next(),
                lifecycle,
                binding: binding.clone(),
            },
        }
    }

    pub fn local_id(&self) -> LocalId {
        self.meta.local_id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.meta.lifecycle
    }

    pub fn is_new(&self) -> bool {
        self.meta.lifecycle == Lifecycle::New
    }

    /// The collection (resource) name.
    pub fn collection(&self) -> &str {
        &self.meta.binding.collection
    }

    pub fn id_field(&self) -> &str {
        &self.meta.binding.id_field
    }

    /// The server identifier, if the attributes carry one.
    pub fn external_id(&self) -> Option<String> {
        match self.attributes.get(&self.meta.binding.id_field)? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Full request URL: base URL, nested path and, once persisted, the server id.
    pub fn url(&self) -> String {
        let http = &self.meta.binding.http;
        match self.meta.lifecycle {
            Lifecycle::Saved => match self.member_path() {
                Some(path) => http.url(&path),
                None => http.url(&self.meta.binding.path),
            },
            Lifecycle::New => http.url(&self.meta.binding.path),
        }
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    /// Commits a `SET` of one attribute on the stored copy.
    ///
    /// `self` is not modified; read the module state to see the change.
    pub async fn set(&self, attribute: impl Into<String>, value: Value) -> Result<(), StoreError> {
        self.meta
            .binding
            .store
            .commit(Mutation::Set {
                local_id: self.meta.local_id,
                attribute: attribute.into(),
                value,
            })
            .await
    }

    /// Creates (`New`) or updates (`Saved`) the entity on the server.
    ///
    /// Failures are recorded in the module's `status`/`error`; the attributes are
    /// left as they were.
    #[instrument(skip(self), fields(resource = %self.meta.binding.collection, local_id = %self.meta.local_id))]
    pub async fn save(&mut self) {
        self.refresh().await;

        let in_flight = match self.meta.lifecycle {
            Lifecycle::New => Status::Creating,
            Lifecycle::Saved => Status::Updating,
        };
        self.commit(Mutation::SetStatus(in_flight)).await;

        let http = &self.meta.binding.http;
        let result = match self.meta.lifecycle {
            Lifecycle::New => {
                let path = format!("{}/", self.meta.binding.path);
                http.post(&path, &self.attributes).await
            }
            Lifecycle::Saved => match self.member_path() {
                Some(path) => http.put(&path, &self.attributes).await,
                None => Err(ResourceError::MissingIdentifier(
                    self.meta.binding.id_field.clone(),
                )),
            },
        };

        match result {
            Ok(body) => {
                if let Value::Object(saved) = body {
                    self.attributes.extend(saved);
                }
                self.meta.lifecycle = Lifecycle::Saved;
                self.commit(Mutation::ModifyResource(self.clone())).await;
                self.commit(Mutation::SetError(None)).await;
                self.commit(Mutation::SetStatus(Status::Success)).await;
                info!(external_id = ?self.external_id(), "Saved");
            }
            Err(error) => self.fail(error).await,
        }
    }

    /// Deletes the entity on the server, then from the module state.
    ///
    /// An entity that was never saved is only removed locally. On failure the
    /// entity stays in the state.
    #[instrument(skip(self), fields(resource = %self.meta.binding.collection, local_id = %self.meta.local_id))]
    pub async fn delete(&mut self) {
        self.refresh().await;

        if self.is_new() {
            debug!("Never saved, removing locally");
            self.commit(Mutation::DeleteResource(self.meta.local_id)).await;
            self.commit(Mutation::SetError(None)).await;
            self.commit(Mutation::SetStatus(Status::Success)).await;
            return;
        }

        self.commit(Mutation::SetStatus(Status::Deleting)).await;
        let result = match self.member_path() {
            Some(path) => self.meta.binding.http.delete(&path).await,
            None => Err(ResourceError::MissingIdentifier(
                self.meta.binding.id_field.clone(),
            )),
        };

        match result {
            Ok(_) => {
                self.commit(Mutation::DeleteResource(self.meta.local_id)).await;
                self.commit(Mutation::SetError(None)).await;
                self.commit(Mutation::SetStatus(Status::Success)).await;
                info!("Deleted");
            }
            Err(error) => self.fail(error).await,
        }
    }

    fn member_path(&self) -> Option<String> {
        self.external_id()
            .map(|id| format!("{}/{}", self.meta.binding.path, id))
    }

    /// Pulls attributes and lifecycle from the stored copy, if there is one.
    async fn refresh(&mut self) {
        match self.meta.binding.store.get(self.meta.local_id).await {
            Ok(Some(current)) => {
                self.attributes = current.attributes;
                self.meta.lifecycle = current.meta.lifecycle;
            }
            Ok(None) => debug!("Not in store, using local attributes"),
            Err(error) => warn!(%error, "Could not refresh from store"),
        }
    }

    async fn fail(&self, error: ResourceError) {
        warn!(%error, "Request failed");
        self.commit(Mutation::SetStatus(Status::Error)).await;
        self.commit(Mutation::SetError(Some(error))).await;
    }

    async fn commit(&self, mutation: Mutation) {
        let name = mutation.name();
        log_commit(self.meta.binding.store.commit(mutation).await, name);
    }

    pub(crate) fn set_attribute(&mut self, attribute: String, value: Value) {
        self.attributes.insert(attribute, value);
    }

    /// Merges a newer copy of the same entity into this one.
    pub(crate) fn absorb(&mut self, other: Resource) {
        self.attributes.extend(other.attributes);
        self.meta.lifecycle = other.meta.lifecycle;
    }
}

impl Normalizable for Resource {
    fn local_id(&self) -> LocalId {
        self.meta.local_id
    }

    fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

/// Only business attributes are serialized.
impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.attributes.iter()).finish()
    }
}

/// Blank attributes shaped like `existing`: arrays become `[]`, numbers `0`,
/// strings `""`; other types are left out.
pub fn blank_template(existing: &Map<String, Value>) -> Map<String, Value> {
    existing
        .iter()
        .filter_map(|(key, value)| {
            let blank = match value {
                Value::Array(_) => Value::Array(Vec::new()),
                Value::Number(_) => Value::from(0),
                Value::String(_) => Value::String(String::new()),
                _ => return None,
            };
            Some((key.clone(), blank))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::http::mock::MockTransport;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    /// A `Saved` resource whose store is already gone.
    pub(crate) fn detached(attributes: Value) -> Resource {
        let Value::Object(attributes) = attributes else {
            panic!("attributes must be an object");
        };
        let (sender, _receiver) = mpsc::channel(1);
        let binding = Binding {
            collection: "comments".into(),
            path: "/posts/abc/comments".into(),
            id_field: "id".into(),
            http: HttpClient::new("http://api.test", Arc::new(MockTransport::new())),
            store: crate::store::StoreClient::new(sender, tokio::sync::watch::channel(Default::default()).1)
                .downgrade(),
        };
        Resource::bind(attributes, &binding, Lifecycle::Saved)
    }

    #[test]
    fn serialization_hides_metadata() {
        let resource = detached(json!({ "id": 4, "title": "x" }));
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value, json!({ "id": 4, "title": "x" }));

        let debug = format!("{resource:?}");
        assert!(debug.contains("title"));
        assert!(!debug.contains("api.test"));
        assert!(!debug.contains("local_"));
    }

    #[test]
    fn url_includes_external_id_once_known() {
        let saved = detached(json!({ "id": 4 }));
        assert_eq!(saved.url(), "http://api.test/posts/abc/comments/4");
        assert_eq!(saved.external_id().as_deref(), Some("4"));

        let unsaved = detached(json!({ "title": "x" }));
        assert_eq!(unsaved.url(), "http://api.test/posts/abc/comments");
        assert_eq!(unsaved.external_id(), None);
    }

    #[test]
    fn local_ids_are_unique() {
        let a = detached(json!({}));
        let b = detached(json!({}));
        assert_ne!(a.local_id(), b.local_id());
        assert!(a.local_id() < b.local_id());
    }

    #[test]
    fn blank_template_follows_attribute_types() {
        let existing = json!({
            "id": 12,
            "title": "hello",
            "tags": ["a", "b"],
            "published": true,
            "author": { "name": "x" },
            "deleted_at": null
        });
        let Value::Object(existing) = existing else { unreachable!() };

        let blank = blank_template(&existing);
        assert_eq!(
            Value::Object(blank),
            json!({ "id": 0, "title": "", "tags": [] })
        );
    }

    #[tokio::test]
    async fn set_on_closed_store_reports_error() {
        let resource = detached(json!({ "id": 1 }));
        let result = resource.set("title", json!("y")).await;
        assert_eq!(result, Err(StoreError::ActorClosed));
    }
}
