//! # Resource Module Factory
//!
//! [`create_resource_module`] builds a self-contained store slice for one REST
//! collection:
//!
//! - **State**: a fresh [`ResourceModuleState`] owned by its own store task.
//! - **Mutations**: [`Mutation`], committed through [`ResourceModule::commit`].
//! - **Actions**: [`fetch_resources`](ResourceModule::fetch_resources) and
//!   [`new_resource`](ResourceModule::new_resource).
//! - **Getters**: [`all`](ResourceModule::all), [`denormalized`](ResourceModule::denormalized),
//!   [`loading`](ResourceModule::loading), [`updating`](ResourceModule::updating),
//!   [`has_error`](ResourceModule::has_error).
//!
//! Actions capture HTTP failures into `status`/`error` and return normally, so
//! callers observe state instead of matching on results.
//!
//! ```rust,no_run
//! use resource_store::module::{create_resource_module, NewResource};
//! use resource_store::path::PathSegments;
//! use serde_json::json;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let comments = create_resource_module("comments", "http://localhost:3000", None);
//!
//! let post = PathSegments::new().with("post", "abc");
//! comments.fetch_resources(&post).await; // GET /posts/abc/comments
//!
//! let mut draft = comments
//!     .new_resource(NewResource::new(post).with_attributes(json!({ "body": "hi" })))
//!     .await?;
//! draft.save().await; // POST /posts/abc/comments/
//! assert!(!comments.has_error());
//! # Ok(())
//! # }
//! ```

use crate::config::ModuleConfig;
use crate::error::{ResourceError, StoreError};
use crate::http::{HttpClient, ReqwestTransport, Transport};
use crate::normalize::EntitySchema;
use crate::path::{generate_path, PathSegments};
use crate::resource::{blank_template, Binding, Lifecycle, Resource};
use crate::store::{
    log_commit, LocalId, Mutation, ResourceModuleState, Status, StoreActor, StoreClient,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Parameters of the `newResource` action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    #[serde(default)]
    pub path_segments: PathSegments,
    /// Seed attributes. Takes precedence over `existing_resource`.
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
    /// Shape to copy as a blank template.
    #[serde(default)]
    pub existing_resource: Option<Map<String, Value>>,
}

impl NewResource {
    pub fn new(path_segments: PathSegments) -> Self {
        Self {
            path_segments,
            ..Self::default()
        }
    }

    /// Seeds the new entity. Non-object values are ignored.
    pub fn with_attributes(mut self, attributes: Value) -> Self {
        if let Value::Object(attributes) = attributes {
            self.attributes = Some(attributes);
        }
        self
    }

    pub fn like(mut self, existing: &Resource) -> Self {
        self.existing_resource = Some(existing.attributes().clone());
        self
    }

    fn initial_attributes(&self) -> Map<String, Value> {
        match (&self.attributes, &self.existing_resource) {
            (Some(attributes), _) => attributes.clone(),
            (None, Some(existing)) => blank_template(existing),
            (None, None) => Map::new(),
        }
    }
}

/// Creates a module talking to `base_url` over `reqwest`.
///
/// `id_field` defaults to `"id"`. Must be called inside a Tokio runtime.
pub fn create_resource_module(
    resource_name: &str,
    base_url: &str,
    id_field: Option<&str>,
) -> ResourceModule {
    let mut config = ModuleConfig::new(resource_name, base_url);
    if let Some(id_field) = id_field {
        config = config.with_id_field(id_field);
    }
    ResourceModule::with_transport(config, Arc::new(ReqwestTransport::new()))
}

/// A namespaced store slice for one REST collection.
pub struct ResourceModule {
    config: ModuleConfig,
    schema: EntitySchema,
    http: HttpClient,
    store: StoreClient,
    handle: JoinHandle<()>,
}

impl ResourceModule {
    /// Spawns the module's store task and returns the module.
    pub fn with_transport(config: ModuleConfig, transport: Arc<dyn Transport>) -> Self {
        let schema = EntitySchema::new(config.resource_name.clone());
        let (actor, store) = StoreActor::new(schema.clone(), config.channel_capacity);
        let handle = tokio::spawn(actor.run());
        let http = HttpClient::new(&config.base_url, transport);
        info!(resource = %config.resource_name, base_url = %http.base_url(), "Module created");

        Self {
            config,
            schema,
            http,
            store,
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.resource_name
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub async fn commit(&self, mutation: Mutation) -> Result<(), StoreError> {
        self.store.commit(mutation).await
    }

    // --- Actions ---

    /// Loads the collection below `path_segments` and replaces the module state.
    #[instrument(skip(self), fields(resource = %self.config.resource_name))]
    pub async fn fetch_resources(&self, path_segments: &PathSegments) {
        let path = generate_path(path_segments, &self.config.resource_name);
        self.commit_logged(Mutation::SetStatus(Status::Loading)).await;

        match self.load(&path).await {
            Ok(records) => {
                info!(%path, count = records.len(), "Fetched");
                self.commit_logged(Mutation::SetResources {
                    records,
                    schema: self.schema.clone(),
                })
                .await;
                self.commit_logged(Mutation::SetError(None)).await;
                self.commit_logged(Mutation::SetStatus(Status::Success)).await;
            }
            Err(error) => {
                warn!(%path, %error, "Fetch failed");
                self.commit_logged(Mutation::SetStatus(Status::Error)).await;
                self.commit_logged(Mutation::SetError(Some(error))).await;
            }
        }
    }

    /// Adds an unsaved entity to the state and returns it. No HTTP request is made.
    #[instrument(skip(self), fields(resource = %self.config.resource_name))]
    pub async fn new_resource(&self, params: NewResource) -> Result<Resource, StoreError> {
        let path = generate_path(&params.path_segments, &self.config.resource_name);
        let resource = Resource::bind(
            params.initial_attributes(),
            &self.binding(path),
            Lifecycle::New,
        );
        self.store
            .commit(Mutation::AddResource(resource.clone()))
            .await?;
        debug!(local_id = %resource.local_id(), "New resource");
        Ok(resource)
    }

    async fn load(&self, path: &str) -> Result<Vec<Resource>, ResourceError> {
        let mut body = self.http.get(path).await?;
        let name = &self.config.resource_name;
        let items = match body.get_mut(name.as_str()).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => return Err(ResourceError::MissingCollection(name.clone())),
        };

        let binding = self.binding(path.to_string());
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(attributes) => {
                    Ok(Resource::bind(attributes, &binding, Lifecycle::Saved))
                }
                other => Err(ResourceError::Decode(format!(
                    "expected objects in `{name}`, got {other}"
                ))),
            })
            .collect()
    }

    fn binding(&self, path: String) -> Binding {
        Binding {
            collection: self.config.resource_name.clone(),
            path,
            id_field: self.config.id_field.clone(),
            http: self.http.clone(),
            store: self.store.downgrade(),
        }
    }

    async fn commit_logged(&self, mutation: Mutation) {
        let name = mutation.name();
        log_commit(self.store.commit(mutation).await, name);
    }

    // --- Getters ---

    pub fn snapshot(&self) -> Arc<ResourceModuleState> {
        self.store.snapshot()
    }

    /// Notified after every mutation applied from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ResourceModuleState>> {
        self.store.subscribe()
    }

    pub fn all(&self) -> Vec<Resource> {
        self.snapshot().all()
    }

    pub fn denormalized(&self) -> Vec<Value> {
        self.snapshot().denormalized(&self.schema)
    }

    pub fn get(&self, local_id: LocalId) -> Option<Resource> {
        self.snapshot().get(local_id).cloned()
    }

    pub fn status(&self) -> Status {
        self.snapshot().status()
    }

    pub fn error(&self) -> Option<ResourceError> {
        self.snapshot().error().cloned()
    }

    pub fn loading(&self) -> bool {
        self.snapshot().loading()
    }

    pub fn updating(&self) -> bool {
        self.snapshot().updating()
    }

    pub fn has_error(&self) -> bool {
        self.snapshot().has_error()
    }

    /// Stops the store task. Resources still held elsewhere can no longer commit.
    pub async fn shutdown(self) {
        let Self {
            config, store, handle, ..
        } = self;
        drop(store);
        if let Err(error) = handle.await {
            warn!(resource = %config.resource_name, %error, "Store task failed");
        }
    }
}
