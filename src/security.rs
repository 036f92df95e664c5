//! Authentication schemes and their `components.securitySchemes` entries.
//!
//! Three scheme kinds are supported: JWT bearer tokens, API keys sent in a header,
//! and the OAuth2 implicit flow. Every scheme carries a name which is used both as its
//! key in the document and as the value a view's metadata refers to.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A configured authentication scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    /// HTTP bearer authentication with JWT tokens
    #[serde(rename = "bearer")]
    Bearer { name: String },
    /// API key passed in a request header
    #[serde(rename = "api_key")]
    ApiKey { name: String, header_key: String },
    /// OAuth2 implicit flow.
    ///
    /// Each scope is a `[name, description]` pair.
    #[serde(rename = "oauth2")]
    OAuth2 {
        name: String,
        authorization_url: String,
        scopes: Vec<Vec<String>>,
    },
}

/// Kind of a security scheme, as it affects operations referencing it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    Http,
    ApiKey,
    OAuth2,
}

impl SecurityScheme {
    pub fn bearer(name: impl Into<String>) -> Self {
        SecurityScheme::Bearer { name: name.into() }
    }

    pub fn api_key(name: impl Into<String>, header_key: impl Into<String>) -> Self {
        SecurityScheme::ApiKey {
            name: name.into(),
            header_key: header_key.into(),
        }
    }

    pub fn oauth2<'a>(
        name: impl Into<String>,
        authorization_url: impl Into<String>,
        scopes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        SecurityScheme::OAuth2 {
            name: name.into(),
            authorization_url: authorization_url.into(),
            scopes: scopes
                .into_iter()
                .map(|(scope, description)| vec![scope.to_string(), description.to_string()])
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SecurityScheme::Bearer { name }
            | SecurityScheme::ApiKey { name, .. }
            | SecurityScheme::OAuth2 { name, .. } => name,
        }
    }

    pub fn kind(&self) -> SchemeKind {
        match self {
            SecurityScheme::Bearer { .. } => SchemeKind::Http,
            SecurityScheme::ApiKey { .. } => SchemeKind::ApiKey,
            SecurityScheme::OAuth2 { .. } => SchemeKind::OAuth2,
        }
    }

    /// Render the scheme into its document object.
    ///
    /// # Errors
    ///
    /// Fails for an OAuth2 scheme whose scopes are not all `(name, description)` pairs.
    pub fn render(&self) -> Result<SecuritySchemeObject> {
        let object = match self {
            SecurityScheme::Bearer { .. } => SecuritySchemeObject {
                scheme_type: "http".to_string(),
                scheme: Some("bearer".to_string()),
                bearer_format: Some("JWT".to_string()),
                ..SecuritySchemeObject::default()
            },
            SecurityScheme::ApiKey { header_key, .. } => SecuritySchemeObject {
                scheme_type: "apiKey".to_string(),
                name: Some(header_key.clone()),
                location: Some("header".to_string()),
                ..SecuritySchemeObject::default()
            },
            SecurityScheme::OAuth2 {
                name,
                authorization_url,
                scopes,
            } => {
                let mut rendered = IndexMap::with_capacity(scopes.len());
                for (index, scope) in scopes.iter().enumerate() {
                    match scope.as_slice() {
                        [scope, description] => {
                            rendered.insert(scope.clone(), description.clone());
                        }
                        other => {
                            return Err(Error::InvalidScope {
                                scheme: name.clone(),
                                index,
                                len: other.len(),
                            })
                        }
                    }
                }
                SecuritySchemeObject {
                    scheme_type: "oauth2".to_string(),
                    flows: Some(OAuthFlows {
                        implicit: ImplicitFlow {
                            authorization_url: authorization_url.clone(),
                            scopes: rendered,
                        },
                    }),
                    ..SecuritySchemeObject::default()
                }
            }
        };
        Ok(object)
    }
}

/// Render every scheme, keyed by scheme name.
///
/// # Errors
///
/// Fails if two schemes share a name or if any scheme fails to render.
pub fn render_all(schemes: &[SecurityScheme]) -> Result<IndexMap<String, SecuritySchemeObject>> {
    let mut rendered = IndexMap::with_capacity(schemes.len());
    for scheme in schemes {
        if rendered.contains_key(scheme.name()) {
            return Err(Error::DuplicateSecurityScheme {
                name: scheme.name().to_string(),
            });
        }
        rendered.insert(scheme.name().to_string(), scheme.render()?);
    }
    Ok(rendered)
}

/// OpenAPI Security Scheme object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySchemeObject {
    #[serde(rename = "type")]
    pub scheme_type: String,
    /// HTTP auth scheme (for type=http)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(rename = "bearerFormat", skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    /// Header name (for type=apiKey)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<OAuthFlows>,
}

/// OAuth2 flows; only the implicit flow is supported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthFlows {
    pub implicit: ImplicitFlow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplicitFlow {
    #[serde(rename = "authorizationUrl")]
    pub authorization_url: String,
    /// Scope name to description
    pub scopes: IndexMap<String, String>,
}
