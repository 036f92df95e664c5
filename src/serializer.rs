//! Serialization of generated documents.
//!
//! JSON is the format the documentation UI consumes; YAML is offered for checking a
//! document into version control or feeding it to other tooling.

use crate::openapi_builder::OpenApiDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes a document to pretty-printed JSON.
///
/// This is the same rendering [`crate::swagger::SwaggerService`] serves.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwaggerConfig;
    use crate::metadata::MetadataStore;
    use crate::openapi_builder::generate_document;
    use crate::route::RouteMap;
    use tempfile::TempDir;

    fn create_test_document() -> OpenApiDocument {
        let routes = RouteMap::new("Test API")
            .route("/api/users/<id>", ["GET", "POST"], "users.get_user");
        generate_document(
            &routes,
            &MetadataStore::new(),
            &SwaggerConfig::new().with_version("1.0.0"),
        )
        .unwrap()
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&create_test_document()).unwrap();

        assert!(json.contains("\"openapi\": \"3.0.1\""));
        assert!(json.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["info"]["title"], "Test API");
        assert!(parsed["paths"]["/api/users/{id}"]["post"].is_object());
    }

    #[test]
    fn test_json_key_order_follows_document_layout() {
        let json = serialize_json(&create_test_document()).unwrap();
        let openapi = json.find("\"openapi\"").unwrap();
        let info = json.find("\"info\"").unwrap();
        let paths = json.find("\"paths\"").unwrap();
        let components = json.find("\"components\"").unwrap();
        assert!(openapi < info && info < paths && paths < components);
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_document()).unwrap();

        assert!(yaml.contains("openapi: 3.0.1") || yaml.contains("openapi: '3.0.1'"));
        assert!(yaml.contains("/api/users/"));
        assert!(yaml.contains("get:"));
        assert!(yaml.contains("post:"));

        let parsed: OpenApiDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, create_test_document());
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("docs").join("v1").join("swagger.json");

        write_to_file("{}", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{}");
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("swagger.yaml");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }
}
