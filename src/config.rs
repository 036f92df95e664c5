//! Construction-time options for document generation and the documentation UI.

use crate::error::{Error, Result};
use crate::security::SecurityScheme;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Path the generated document is served at
pub const SPEC_PATH: &str = "/swagger/v1/swagger.json";

/// Default path of the UI entry page
pub const DEFAULT_UI_URL: &str = "/swagger/index.html";

/// Route pattern serving the UI bundle's resources
pub const RESOURCE_ROUTE: &str = "/swagger/<resource_name>";

/// Route substrings that are never documented
pub const DEFAULT_EXCLUSIONS: &[&str] = &["swagger", "static"];

/// Documentation settings.
///
/// Everything is optional. The title falls back to the application name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwaggerConfig {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub license_name: Option<String>,
    pub license_url: Option<String>,
    pub terms_of_service: Option<String>,
    pub external_doc_url: Option<String>,
    pub external_doc_description: Option<String>,
    /// Server base URLs
    pub servers: Vec<String>,
    pub auth_schemes: Vec<SecurityScheme>,
    /// Override for the UI entry page path
    pub url: Option<String>,
    /// Additional route substrings to leave out of the document
    pub exclude: Vec<String>,
}

impl SwaggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }

    pub fn with_license(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.license_name = Some(name.into());
        self.license_url = Some(url.into());
        self
    }

    pub fn with_terms_of_service(mut self, terms: impl Into<String>) -> Self {
        self.terms_of_service = Some(terms.into());
        self
    }

    pub fn with_external_docs(mut self, url: impl Into<String>, description: Option<String>) -> Self {
        self.external_doc_url = Some(url.into());
        self.external_doc_description = description;
        self
    }

    pub fn with_server(mut self, url: impl Into<String>) -> Self {
        self.servers.push(url.into());
        self
    }

    pub fn with_auth_scheme(mut self, scheme: SecurityScheme) -> Self {
        self.auth_schemes.push(scheme);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_exclusion(mut self, fragment: impl Into<String>) -> Self {
        self.exclude.push(fragment.into());
        self
    }

    /// Path of the UI entry page
    pub fn ui_url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_UI_URL)
    }

    /// Whether a route pattern is left out of the document
    pub fn is_excluded(&self, pattern: &str) -> bool {
        DEFAULT_EXCLUSIONS.iter().any(|fragment| pattern.contains(fragment))
            || self
                .exclude
                .iter()
                .any(|fragment| !fragment.is_empty() && pattern.contains(fragment.as_str()))
    }

    /// Check the options for consistency.
    ///
    /// # Errors
    ///
    /// Fails for an empty or relative UI url, a UI url shadowing the document path,
    /// an empty title or server, or duplicate security scheme names.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            if url.trim().is_empty() {
                return Err(Error::config("url", "must not be empty"));
            }
            if !url.starts_with('/') {
                return Err(Error::config("url", format!("'{}' must start with '/'", url)));
            }
            if url == SPEC_PATH {
                return Err(Error::config(
                    "url",
                    format!("'{}' is reserved for the generated document", url),
                ));
            }
        }

        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err(Error::config("title", "must not be empty"));
        }

        if self.servers.iter().any(|server| server.trim().is_empty()) {
            return Err(Error::config("servers", "server urls must not be empty"));
        }

        let mut names = HashSet::new();
        for scheme in &self.auth_schemes {
            if !names.insert(scheme.name()) {
                return Err(Error::DuplicateSecurityScheme {
                    name: scheme.name().to_string(),
                });
            }
        }

        if self.license_name.is_some() != self.license_url.is_some() {
            warn!("license_name and license_url must both be set for the license to be shown");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ui_url() {
        assert_eq!(SwaggerConfig::new().ui_url(), "/swagger/index.html");
        assert_eq!(SwaggerConfig::new().with_url("/docs").ui_url(), "/docs");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SwaggerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let err = SwaggerConfig::new().with_url("docs").validate().unwrap_err();
        assert!(matches!(err, Error::Config { ref field, .. } if field == "url"));
    }

    #[test]
    fn test_url_cannot_shadow_document() {
        assert!(SwaggerConfig::new().with_url(SPEC_PATH).validate().is_err());
    }

    #[test]
    fn test_duplicate_scheme_names_are_rejected() {
        let config = SwaggerConfig::new()
            .with_auth_scheme(SecurityScheme::bearer("auth"))
            .with_auth_scheme(SecurityScheme::api_key("auth", "X-Key"));
        assert!(matches!(
            config.validate(),
            Err(Error::DuplicateSecurityScheme { .. })
        ));
    }

    #[test]
    fn test_exclusions() {
        let config = SwaggerConfig::new().with_exclusion("internal");
        assert!(config.is_excluded("/static/<path:filename>"));
        assert!(config.is_excluded("/swagger/index.html"));
        assert!(config.is_excluded("/internal/health"));
        assert!(!config.is_excluded("/api/users"));
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let config: SwaggerConfig = serde_yaml::from_str(
            r#"
title: Pets
version: "1.0"
servers: ["https://api.example.com"]
auth_schemes:
  - type: bearer
    name: jwt
"#,
        )
        .unwrap();
        assert_eq!(config.title.as_deref(), Some("Pets"));
        assert_eq!(config.servers.len(), 1);
        assert_eq!(config.auth_schemes[0].name(), "jwt");
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let result: std::result::Result<SwaggerConfig, _> = serde_yaml::from_str("colour: blue");
        assert!(result.is_err());
    }
}
