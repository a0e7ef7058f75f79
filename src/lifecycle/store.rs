//! # Namespaced Root Store
//!
//! [`Store`] registers resource modules under their resource names and exposes
//! them through string addresses, the way a UI layer consumes them:
//!
//! | Address                        | Kind   | Payload / result                       |
//! |--------------------------------|--------|----------------------------------------|
//! | `<name>/fetchResources`        | action | path segments object, e.g. `{"post": "abc"}` |
//! | `<name>/newResource`           | action | `{pathSegments, attributes, existingResource}` |
//! | `<name>/all`                   | getter | array of attribute objects             |
//! | `<name>/denormalized`          | getter | array of attribute objects             |
//! | `<name>/loading`               | getter | bool                                   |
//! | `<name>/updating`              | getter | bool                                   |
//! | `<name>/hasError`              | getter | bool                                   |
//! | `<name>/status`                | getter | status string, e.g. `"SUCCESS"`        |
//! | `<name>/error`                 | getter | error message, `""` when none          |
//!
//! A `null` payload means "no parameters". Typed access is available through
//! [`Store::module`].

use crate::config::StoreConfig;
use crate::error::DispatchError;
use crate::http::{ReqwestTransport, Transport};
use crate::module::{NewResource, ResourceModule};
use crate::path::PathSegments;
use crate::resource::Resource;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// What a dispatched action produced.
#[derive(Debug)]
pub enum Dispatched {
    /// `fetchResources` finished; read the outcome through getters.
    Fetched,
    /// `newResource` added this unsaved instance.
    Created(Resource),
}

/// Owns every registered module.
///
/// # Example
///
/// ```rust,no_run
/// use resource_store::lifecycle::{Dispatched, Store};
/// use resource_store::config::StoreConfig;
/// use serde_json::json;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoreConfig::from_json(
///     r#"{ "modules": [ { "resourceName": "posts", "baseUrl": "http://localhost:3000" } ] }"#,
/// )?;
/// let store = Store::from_config(&config);
///
/// store.dispatch("posts/fetchResources", json!(null)).await?;
/// println!("{}", store.getter("posts/denormalized")?);
///
/// if let Dispatched::Created(mut post) = store
///     .dispatch("posts/newResource", json!({ "attributes": { "title": "x" } }))
///     .await?
/// {
///     post.save().await;
/// }
///
/// store.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Store {
    modules: IndexMap<String, ResourceModule>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds one module per config entry, talking over `reqwest`.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Builds one module per config entry, all sharing `transport`.
    pub fn with_transport(config: &StoreConfig, transport: Arc<dyn Transport>) -> Self {
        let mut store = Self::new();
        for module in &config.modules {
            store.register(ResourceModule::with_transport(
                module.clone(),
                Arc::clone(&transport),
            ));
        }
        info!(modules = store.modules.len(), "Store ready");
        store
    }

    /// Adds a module under its resource name, returning any module it replaces.
    pub fn register(&mut self, module: ResourceModule) -> Option<ResourceModule> {
        self.modules.insert(module.name().to_string(), module)
    }

    pub fn module(&self, name: &str) -> Option<&ResourceModule> {
        self.modules.get(name)
    }

    /// Registered modules in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &ResourceModule> {
        self.modules.values()
    }

    /// Runs `<name>/<action>` with a JSON payload.
    pub async fn dispatch(&self, address: &str, payload: Value) -> Result<Dispatched, DispatchError> {
        let (module, action) = self.route(address, DispatchError::UnknownAction)?;
        debug!(address, %payload, "Dispatch");

        match action {
            "fetchResources" => {
                let segments: PathSegments = parse_payload(address, payload)?;
                module.fetch_resources(&segments).await;
                Ok(Dispatched::Fetched)
            }
            "newResource" => {
                let params: NewResource = parse_payload(address, payload)?;
                let resource = module.new_resource(params).await?;
                Ok(Dispatched::Created(resource))
            }
            _ => Err(DispatchError::UnknownAction(address.to_string())),
        }
    }

    /// Reads `<name>/<getter>` as JSON.
    pub fn getter(&self, address: &str) -> Result<Value, DispatchError> {
        let (module, getter) = self.route(address, DispatchError::UnknownGetter)?;

        let value = match getter {
            "all" => Value::Array(
                module
                    .all()
                    .into_iter()
                    .map(|resource| Value::Object(resource.into_attributes()))
                    .collect(),
            ),
            "denormalized" => Value::Array(module.denormalized()),
            "loading" => Value::Bool(module.loading()),
            "updating" => Value::Bool(module.updating()),
            "hasError" => Value::Bool(module.has_error()),
            "status" => Value::from(module.status().as_str()),
            "error" => Value::from(module.error().map(|e| e.to_string()).unwrap_or_default()),
            _ => return Err(DispatchError::UnknownGetter(address.to_string())),
        };
        Ok(value)
    }

    fn route<'a>(
        &self,
        address: &'a str,
        malformed: fn(String) -> DispatchError,
    ) -> Result<(&ResourceModule, &'a str), DispatchError> {
        let (name, member) = address
            .split_once('/')
            .ok_or_else(|| malformed(address.to_string()))?;
        let module = self
            .modules
            .get(name)
            .ok_or_else(|| DispatchError::UnknownModule(name.to_string()))?;
        Ok((module, member))
    }

    /// Stops every module's store task, in registration order.
    pub async fn shutdown(self) {
        info!("Shutting down store...");
        for (_, module) in self.modules {
            module.shutdown().await;
        }
        info!("Store shutdown complete.");
    }
}

fn parse_payload<T: DeserializeOwned + Default>(
    address: &str,
    payload: Value,
) -> Result<T, DispatchError> {
    if payload.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(payload).map_err(|source| DispatchError::InvalidPayload {
        action: address.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleConfig;
    use crate::http::mock::MockTransport;
    use serde_json::json;

    fn store(mock: &MockTransport) -> Store {
        let config = StoreConfig {
            modules: vec![
                ModuleConfig::new("posts", "http://api.test"),
                ModuleConfig::new("comments", "http://api.test"),
            ],
        };
        Store::with_transport(&config, Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn modules_are_registered_in_order() {
        let store = store(&MockTransport::new());
        let names: Vec<_> = store.modules().map(|m| m.name().to_string()).collect();
        assert_eq!(names, ["posts", "comments"]);
        assert!(store.module("users").is_none());
        store.shutdown().await;
    }

    #[tokio::test]
    async fn unknown_addresses_are_rejected() {
        let store = store(&MockTransport::new());

        assert!(matches!(
            store.dispatch("users/fetchResources", Value::Null).await,
            Err(DispatchError::UnknownModule(name)) if name == "users"
        ));
        assert!(matches!(
            store.dispatch("posts/explode", Value::Null).await,
            Err(DispatchError::UnknownAction(_))
        ));
        assert!(matches!(
            store.dispatch("posts", Value::Null).await,
            Err(DispatchError::UnknownAction(_))
        ));
        assert!(matches!(
            store.getter("posts/count"),
            Err(DispatchError::UnknownGetter(_))
        ));
        store.shutdown().await;
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected() {
        let store = store(&MockTransport::new());
        let result = store
            .dispatch("comments/newResource", json!({ "pathSegments": [1, 2] }))
            .await;
        assert!(matches!(
            result,
            Err(DispatchError::InvalidPayload { action, .. }) if action == "comments/newResource"
        ));
        assert_eq!(store.getter("comments/all").unwrap(), json!([]));
        store.shutdown().await;
    }

    #[tokio::test]
    async fn getters_reflect_module_state() {
        let store = store(&MockTransport::new());
        assert_eq!(store.getter("posts/status").unwrap(), json!("INITIAL"));
        assert_eq!(store.getter("posts/error").unwrap(), json!(""));
        assert_eq!(store.getter("posts/loading").unwrap(), json!(false));

        let created = store
            .dispatch("posts/newResource", json!({ "attributes": { "title": "x" } }))
            .await
            .unwrap();
        assert!(matches!(created, Dispatched::Created(ref post) if post.is_new()));

        assert_eq!(store.getter("posts/all").unwrap(), json!([{ "title": "x" }]));
        assert_eq!(store.getter("comments/all").unwrap(), json!([]));
        store.shutdown().await;
    }
}
