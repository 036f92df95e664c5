//! File-based application description.
//!
//! A manifest lists an application's routes the way its framework reports them,
//! together with the documentation settings and per-view metadata. It lets the
//! generator run outside the host process, e.g. from the command line.
//!
//! ```yaml
//! app: pets
//! config:
//!   title: Pet Store
//!   version: "1.0"
//!   auth_schemes:
//!     - type: bearer
//!       name: jwt
//! routes:
//!   - rule: /api/pets/<int:id>
//!     methods: [GET, HEAD, OPTIONS]
//!     endpoint: pets.get_pet
//! metadata:
//!   get_pet:
//!     summary: Fetch a pet
//!     security: jwt
//! responses:
//!   - view: get_pet
//!     status: 404
//!     description: No such pet
//! ```

use crate::config::SwaggerConfig;
use crate::error::Error;
use crate::metadata::MetadataStore;
use crate::route::{RouteRule, RouteTable};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// An application's routes, settings and metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Application name
    pub app: String,
    #[serde(default)]
    pub config: SwaggerConfig,
    #[serde(default)]
    pub routes: Vec<RouteRule>,
    /// View key to metadata payload
    #[serde(default)]
    pub metadata: IndexMap<String, Value>,
    /// Additional response declarations
    #[serde(default)]
    pub responses: Vec<ResponseDeclaration>,
}

/// One response declared for a view outside its metadata payload
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseDeclaration {
    pub view: String,
    pub status: u16,
    pub description: String,
}

impl Manifest {
    /// Load a manifest; `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading manifest: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON manifest: {}", path.display()))
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML manifest: {}", path.display()))
        }
    }

    /// Register the manifest's metadata and response declarations.
    ///
    /// # Errors
    ///
    /// Fails on the first payload that is not a mapping, carries unknown keys, or is
    /// registered twice, and on a response declaration naming an ambiguous view.
    pub fn metadata_store(&self) -> crate::error::Result<MetadataStore> {
        let mut store = MetadataStore::new();
        for (key, payload) in &self.metadata {
            let Value::Object(payload) = payload else {
                return Err(Error::InvalidMetadata {
                    key: key.clone(),
                    message: "metadata must be a mapping".to_string(),
                });
            };
            store.register_payload(key.as_str(), payload)?;
        }
        for declaration in &self.responses {
            store.add_response(
                declaration.view.as_str(),
                declaration.status,
                declaration.description.clone(),
            )?;
        }
        Ok(store)
    }
}

impl RouteTable for Manifest {
    fn app_name(&self) -> &str {
        &self.app
    }

    fn rules(&self) -> Vec<RouteRule> {
        self.routes.clone()
    }
}
