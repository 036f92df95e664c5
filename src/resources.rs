//! In-memory resources of the documentation UI.
//!
//! The UI bundle is compiled into the binary and served from memory, so a host does
//! not need to ship or serve static files for it. Resources can be added or replaced,
//! for example with a vendored copy of the Swagger UI distribution.

use bytes::Bytes;
use indexmap::IndexMap;
use log::debug;

/// Name of the UI entry page
pub const INDEX_RESOURCE: &str = "index.html";

const EMBEDDED: &[(&str, &str)] = &[
    (INDEX_RESOURCE, include_str!("../assets/index.html")),
    ("index.css", include_str!("../assets/index.css")),
    (
        "swagger-initializer.js",
        include_str!("../assets/swagger-initializer.js"),
    ),
];

/// A named resource and its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub content: Bytes,
    /// Known for `.html`, `.css` and `.js` resources
    pub content_type: Option<&'static str>,
}

/// Resource name to content
#[derive(Debug, Clone, Default)]
pub struct ResourceMap {
    resources: IndexMap<String, Bytes>,
}

impl ResourceMap {
    /// An empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled UI resources
    pub fn embedded() -> Self {
        let mut map = Self::new();
        for &(name, content) in EMBEDDED {
            map.insert(name, Bytes::from_static(content.as_bytes()));
        }
        debug!("Loaded {} embedded UI resources", map.len());
        map
    }

    /// Add or replace a resource
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Bytes>) {
        self.resources.insert(name.into(), content.into());
    }

    pub fn get(&self, name: &str) -> Option<Resource> {
        self.resources.get(name).map(|content| Resource {
            content: content.clone(),
            content_type: content_type_for(name),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Content type from the resource name's extension
pub fn content_type_for(name: &str) -> Option<&'static str> {
    let (_, extension) = name.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "css" => Some("text/css"),
        "js" => Some("text/javascript"),
        "html" => Some("text/html"),
        _ => None,
    }
}
