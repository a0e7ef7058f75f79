//! Module and store configuration.
//!
//! Both structs deserialize from camelCase JSON:
//!
//! ```json
//! {
//!   "modules": [
//!     { "resourceName": "posts", "baseUrl": "http://localhost:3000" },
//!     { "resourceName": "comments", "baseUrl": "http://localhost:3000", "idField": "_id" }
//!   ]
//! }
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ID_FIELD: &str = "id";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

fn default_id_field() -> String {
    DEFAULT_ID_FIELD.to_string()
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

/// Settings for one resource module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    /// Collection name: the last path segment, the response key and the namespace.
    pub resource_name: String,
    pub base_url: String,
    /// Server identifier attribute, e.g. `"_id"`.
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Capacity of the store's request channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl ModuleConfig {
    pub fn new(resource_name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            base_url: base_url.into(),
            id_field: default_id_field(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            module: self.resource_name.clone(),
            reason: reason.to_string(),
        };
        if self.resource_name.is_empty() || self.resource_name.contains('/') {
            return Err(invalid("resource name must be a single non-empty path segment"));
        }
        if self.base_url.is_empty() {
            return Err(invalid("base URL is empty"));
        }
        if self.id_field.is_empty() {
            return Err(invalid("identifier field is empty"));
        }
        if self.channel_capacity == 0 {
            return Err(invalid("channel capacity must be at least 1"));
        }
        Ok(())
    }
}

/// Settings for a root [`Store`](crate::lifecycle::Store).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

impl StoreConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        for module in &config.modules {
            module.validate()?;
        }
        if let Some(duplicate) = config.modules.iter().enumerate().find_map(|(i, m)| {
            config.modules[..i]
                .iter()
                .any(|earlier| earlier.resource_name == m.resource_name)
                .then_some(&m.resource_name)
        }) {
            return Err(ConfigError::Invalid {
                module: duplicate.clone(),
                reason: "registered twice".to_string(),
            });
        }
        Ok(config)
    }
}
