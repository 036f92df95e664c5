use crate::config::SwaggerConfig;
use crate::error::{Error, Result};
use crate::metadata::{MetadataRecord, MetadataStore};
use crate::route::{EndpointRecord, HttpMethod, RouteTable};
use crate::schema_generator::{ParameterLocation, ParameterSchema, Schema, SchemaGenerator};
use crate::security::{self, SchemeKind, SecurityScheme, SecuritySchemeObject};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// OpenAPI version written to every document
pub const OPENAPI_VERSION: &str = "3.0.1";

/// Description of the response used when a view declares none
pub const DEFAULT_RESPONSE_DESCRIPTION: &str = "Success";

/// OpenAPI document builder
pub struct OpenApiBuilder {
    /// OpenAPI info section
    info: Info,
    servers: Vec<Server>,
    external_docs: Option<ExternalDocs>,
    /// Configured authentication schemes
    auth_schemes: Vec<SecurityScheme>,
    /// Rendered schemes, keyed by scheme name
    security_schemes: IndexMap<String, SecuritySchemeObject>,
    /// Paths collection (URL path -> PathItem)
    paths: IndexMap<String, PathItem>,
    /// Component schemas collected from request models
    schema_gen: SchemaGenerator,
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDocs {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// TRACE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
    /// OPTIONS operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
}

impl PathItem {
    /// Set the operation for a method, replacing only that method's entry
    pub fn set(&mut self, method: HttpMethod, operation: Operation) {
        let slot = match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Trace => &mut self.trace,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
        };
        *slot = Some(operation);
    }

    pub fn get_operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
        }
    }
}

/// Security requirement: scheme name -> required scopes
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Display groups
    pub tags: Vec<String>,
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters (path, query)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterSchema>>,
    /// Request body
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses, keyed by status code
    pub responses: IndexMap<String, Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Content types and their schemas
    pub content: IndexMap<String, MediaType>,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema for this media type
    pub schema: Schema,
}

/// OpenAPI Response object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    pub description: String,
}

/// OpenAPI Components object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    /// Security scheme definitions
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, SecuritySchemeObject>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// API paths
    pub paths: IndexMap<String, PathItem>,
    /// Components (schemas, security schemes)
    pub components: Components,
}

impl OpenApiBuilder {
    /// Create a builder from the documentation settings.
    ///
    /// `app_name` is the title used when the settings carry none.
    ///
    /// # Errors
    ///
    /// Fails when a configured security scheme cannot be rendered.
    pub fn new(app_name: &str, config: &SwaggerConfig) -> Result<Self> {
        debug!("Initializing OpenApiBuilder");

        let security_schemes = security::render_all(&config.auth_schemes)?;

        let license = match (&config.license_name, &config.license_url) {
            (Some(name), Some(url)) => Some(License {
                name: name.clone(),
                url: url.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            info: Info {
                title: config.title.clone().unwrap_or_else(|| app_name.to_string()),
                version: config.version.clone(),
                description: config.description.clone(),
                terms_of_service: config.terms_of_service.clone(),
                contact: config.contact_email.clone().map(|email| Contact { email }),
                license,
            },
            servers: config
                .servers
                .iter()
                .map(|url| Server { url: url.clone() })
                .collect(),
            external_docs: config.external_doc_url.clone().map(|url| ExternalDocs {
                url,
                description: config.external_doc_description.clone(),
            }),
            auth_schemes: config.auth_schemes.clone(),
            security_schemes,
            paths: IndexMap::new(),
            schema_gen: SchemaGenerator::new(),
        })
    }

    /// Add an endpoint's operations to the document.
    ///
    /// Operations for a path that is already present are merged into its entry; methods
    /// written by earlier endpoints are kept.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint's metadata references an unknown scheme or omits
    /// OAuth2 scopes.
    pub fn add_endpoint(&mut self, endpoint: &EndpointRecord, metadata: &MetadataStore) -> Result<()> {
        debug!("Adding endpoint: {:?} {}", endpoint.methods, endpoint.literal);

        let mut parameters: Vec<ParameterSchema> = endpoint
            .path_segments
            .iter()
            .map(|name| {
                self.schema_gen
                    .generate_parameter_schema(name, ParameterLocation::Path)
            })
            .collect();

        let mut operation = Operation {
            tags: vec![endpoint.tag.clone()],
            summary: None,
            description: None,
            parameters: None,
            request_body: None,
            responses: default_responses(),
            security: None,
            deprecated: None,
        };

        match metadata.resolve(&endpoint.view_identifier) {
            Some((key, record)) => {
                self.apply_metadata(&mut operation, &mut parameters, endpoint, key, record)?
            }
            None => debug!("No metadata for {}", endpoint.view_identifier),
        }

        if !parameters.is_empty() {
            operation.parameters = Some(parameters);
        }

        if endpoint.methods.is_empty() {
            warn!("Endpoint {} has no documented methods", endpoint.rule);
        }

        let path_item = self.paths.entry(endpoint.literal.clone()).or_default();
        for method in &endpoint.methods {
            path_item.set(*method, operation.clone());
        }

        Ok(())
    }

    fn apply_metadata(
        &mut self,
        operation: &mut Operation,
        parameters: &mut Vec<ParameterSchema>,
        endpoint: &EndpointRecord,
        key: &str,
        record: &MetadataRecord,
    ) -> Result<()> {
        if let Some(query_params) = &record.query_params {
            parameters.extend(query_params.iter().map(|name| {
                self.schema_gen
                    .generate_parameter_schema(name, ParameterLocation::Query)
            }));
        }

        // Grouped records keep their group in the component key
        if let Some(model) = &record.request_model {
            let reference = self.schema_gen.register_model(key, model);
            let mut content = IndexMap::new();
            content.insert(
                "application/json".to_string(),
                MediaType { schema: reference },
            );
            operation.request_body = Some(RequestBody { content });
        }

        if let Some(responses) = &record.response_model {
            operation.responses = responses
                .iter()
                .map(|(status, description)| {
                    (
                        status.clone(),
                        Response {
                            description: description.clone(),
                        },
                    )
                })
                .collect();
        }

        operation.description = Some(
            record
                .description
                .clone()
                .unwrap_or_else(|| endpoint.view_identifier.clone()),
        );
        operation.summary = record.summary.clone();

        if let Some(scheme_name) = &record.security {
            operation.security = Some(vec![self.security_requirement(scheme_name, record)?]);
        }

        if record.deprecated {
            operation.deprecated = Some(true);
        }

        Ok(())
    }

    fn security_requirement(
        &self,
        scheme_name: &str,
        record: &MetadataRecord,
    ) -> Result<SecurityRequirement> {
        if self.auth_schemes.is_empty() {
            return Err(Error::NoSecuritySchemes {
                name: scheme_name.to_string(),
            });
        }

        let scheme = self
            .auth_schemes
            .iter()
            .find(|scheme| scheme.name() == scheme_name)
            .ok_or_else(|| Error::UndefinedSecurityScheme {
                name: scheme_name.to_string(),
            })?;

        let scopes = match scheme.kind() {
            SchemeKind::OAuth2 => record.scopes.clone().ok_or_else(|| Error::MissingScopes {
                name: scheme_name.to_string(),
            })?,
            SchemeKind::Http | SchemeKind::ApiKey => Vec::new(),
        };

        let mut requirement = SecurityRequirement::new();
        requirement.insert(scheme_name.to_string(), scopes);
        Ok(requirement)
    }

    /// Build the final OpenAPI document
    pub fn build(self) -> OpenApiDocument {
        debug!("Building final OpenAPI document");

        OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: self.info,
            external_docs: self.external_docs,
            servers: self.servers,
            paths: self.paths,
            components: Components {
                schemas: self.schema_gen.into_schemas(),
                security_schemes: self.security_schemes,
            },
        }
    }
}

fn default_responses() -> IndexMap<String, Response> {
    let mut responses = IndexMap::new();
    responses.insert(
        "200".to_string(),
        Response {
            description: DEFAULT_RESPONSE_DESCRIPTION.to_string(),
        },
    );
    responses
}

/// Generate the document for every documentable route of an application.
///
/// Routes matching the configured exclusions are skipped. Any failing endpoint aborts
/// the whole build.
pub fn generate_document(
    routes: &dyn RouteTable,
    metadata: &MetadataStore,
    config: &SwaggerConfig,
) -> Result<OpenApiDocument> {
    let mut builder = OpenApiBuilder::new(routes.app_name(), config)?;
    let mut documented = 0usize;

    for rule in routes.rules() {
        if config.is_excluded(&rule.pattern) {
            debug!("Skipping excluded route {}", rule.pattern);
            continue;
        }
        let endpoint = EndpointRecord::adapt(&rule)?;
        builder.add_endpoint(&endpoint, metadata)?;
        documented += 1;
    }

    info!("Documented {} routes", documented);
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataKey;
    use crate::route::{RouteMap, RouteRule};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn endpoint(pattern: &str, methods: &[&str], view: &str) -> EndpointRecord {
        EndpointRecord::adapt(&RouteRule::new(pattern, methods.iter().copied(), view)).unwrap()
    }

    fn builder() -> OpenApiBuilder {
        OpenApiBuilder::new("test_app", &SwaggerConfig::default()).unwrap()
    }

    #[test]
    fn test_new_builder_uses_app_name() {
        let document = builder().build();

        assert_eq!(document.openapi, "3.0.1");
        assert_eq!(document.info.title, "test_app");
        assert!(document.info.version.is_none());
        assert!(document.paths.is_empty());
        assert!(document.components.schemas.is_empty());
    }

    #[test]
    fn test_info_from_config() {
        let config = SwaggerConfig::new()
            .with_title("My API")
            .with_version("2.0.0")
            .with_description("Custom description")
            .with_contact_email("api@example.com")
            .with_license("MIT", "https://opensource.org/licenses/MIT")
            .with_terms_of_service("https://example.com/tos")
            .with_external_docs("https://docs.example.com", Some("Guides".to_string()))
            .with_server("https://api.example.com");
        let document = OpenApiBuilder::new("ignored", &config).unwrap().build();

        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({
                "openapi": "3.0.1",
                "info": {
                    "title": "My API",
                    "version": "2.0.0",
                    "description": "Custom description",
                    "termsOfService": "https://example.com/tos",
                    "contact": {"email": "api@example.com"},
                    "license": {"name": "MIT", "url": "https://opensource.org/licenses/MIT"}
                },
                "externalDocs": {"url": "https://docs.example.com", "description": "Guides"},
                "servers": [{"url": "https://api.example.com"}],
                "paths": {},
                "components": {"schemas": {}}
            })
        );
    }

    #[test]
    fn test_license_requires_name_and_url() {
        let mut config = SwaggerConfig::new();
        config.license_name = Some("MIT".to_string());
        let document = OpenApiBuilder::new("app", &config).unwrap().build();
        assert!(document.info.license.is_none());
    }

    #[test]
    fn test_endpoint_without_metadata() {
        let mut builder = builder();
        builder
            .add_endpoint(&endpoint("/users", &["GET"], "list_users"), &MetadataStore::new())
            .unwrap();
        let document = builder.build();

        assert_eq!(
            serde_json::to_value(&document.paths["/users"]).unwrap(),
            json!({
                "get": {
                    "tags": ["users"],
                    "responses": {"200": {"description": "Success"}}
                }
            })
        );
    }

    #[test]
    fn test_path_parameters_without_metadata() {
        let mut builder = builder();
        builder
            .add_endpoint(
                &endpoint("/users/<id>/posts/<post_id>", &["GET"], "get_post"),
                &MetadataStore::new(),
            )
            .unwrap();
        let document = builder.build();

        let operation = document.paths["/users/{id}/posts/{post_id}"].get.as_ref().unwrap();
        let parameters = operation.parameters.as_ref().unwrap();
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].name, "id");
        assert_eq!(parameters[1].name, "post_id");
        assert!(parameters.iter().all(|p| p.location == ParameterLocation::Path));
    }

    #[test]
    fn test_full_metadata() {
        let mut store = MetadataStore::new();
        store
            .register(
                "create_user",
                MetadataRecord::new()
                    .summary("Create a user")
                    .description("Creates a user account")
                    .query_param("dry_run")
                    .request_field("name", "string")
                    .request_field("age", "int")
                    .response(201, "Created")
                    .response(400, "Bad request"),
            )
            .unwrap();

        let mut builder = builder();
        builder
            .add_endpoint(&endpoint("/api/users", &["POST"], "users.create_user"), &store)
            .unwrap();
        let document = builder.build();

        assert_eq!(
            serde_json::to_value(&document.paths["/api/users"].post).unwrap(),
            json!({
                "tags": ["users"],
                "summary": "Create a user",
                "description": "Creates a user account",
                "parameters": [{
                    "name": "dry_run",
                    "in": "query",
                    "required": true,
                    "schema": {"type": "string", "nullable": false}
                }],
                "requestBody": {
                    "content": {
                        "application/json": {
                            "schema": {"$ref": "#/components/schemas/create_user"}
                        }
                    }
                },
                "responses": {
                    "201": {"description": "Created"},
                    "400": {"description": "Bad request"}
                }
            })
        );
        assert_eq!(
            serde_json::to_string(&document.components.schemas["create_user"]).unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "nullable": true},
                    "age": {"type": "int", "nullable": true}
                }
            })
            .to_string()
        );
    }

    #[test]
    fn test_description_falls_back_to_view_identifier() {
        let mut store = MetadataStore::new();
        store
            .register("get_user", MetadataRecord::new().summary("Get"))
            .unwrap();

        let mut builder = builder();
        builder
            .add_endpoint(&endpoint("/users/<id>", &["GET"], "users.get_user"), &store)
            .unwrap();
        let document = builder.build();

        let operation = document.paths["/users/{id}"].get.as_ref().unwrap();
        assert_eq!(operation.description.as_deref(), Some("users.get_user"));
        assert_eq!(operation.summary.as_deref(), Some("Get"));
        assert_eq!(operation.responses, default_responses());
    }

    #[test]
    fn test_query_params_follow_path_params() {
        let mut store = MetadataStore::new();
        store
            .register("get_user", MetadataRecord::new().query_param("fields"))
            .unwrap();

        let mut builder = builder();
        builder
            .add_endpoint(&endpoint("/users/<id>", &["GET"], "get_user"), &store)
            .unwrap();
        let document = builder.build();

        let parameters = document.paths["/users/{id}"]
            .get
            .as_ref()
            .unwrap()
            .parameters
            .clone()
            .unwrap();
        let names: Vec<_> = parameters.iter().map(|p| (p.name.as_str(), p.location)).collect();
        assert_eq!(
            names,
            vec![("id", ParameterLocation::Path), ("fields", ParameterLocation::Query)]
        );
    }

    #[test]
    fn test_same_literal_merges_methods() {
        let mut builder = builder();
        let store = MetadataStore::new();
        builder
            .add_endpoint(&endpoint("/users/<id>", &["GET"], "get_user"), &store)
            .unwrap();
        builder
            .add_endpoint(&endpoint("/users/<int:id>", &["PUT", "DELETE"], "update_user"), &store)
            .unwrap();
        let document = builder.build();

        assert_eq!(document.paths.len(), 1);
        let item = &document.paths["/users/{id}"];
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
        assert!(item.post.is_none());
    }

    #[test]
    fn test_security_schemes_are_rendered() {
        let config = SwaggerConfig::new()
            .with_auth_scheme(SecurityScheme::bearer("jwt"))
            .with_auth_scheme(SecurityScheme::api_key("key", "X-API-Key"));
        let mut store = MetadataStore::new();
        store
            .register("get_user", MetadataRecord::new().security("jwt"))
            .unwrap();

        let mut builder = OpenApiBuilder::new("app", &config).unwrap();
        builder
            .add_endpoint(&endpoint("/users/<id>", &["GET"], "get_user"), &store)
            .unwrap();
        let document = builder.build();

        assert_eq!(
            document.components.security_schemes.keys().collect::<Vec<_>>(),
            vec!["jwt", "key"]
        );
        let operation = document.paths["/users/{id}"].get.as_ref().unwrap();
        assert_eq!(
            serde_json::to_value(&operation.security).unwrap(),
            json!([{"jwt": []}])
        );
    }

    #[test]
    fn test_oauth2_security_uses_scopes() {
        let config = SwaggerConfig::new().with_auth_scheme(SecurityScheme::oauth2(
            "oauth",
            "https://auth.example.com",
            [("users:read", "Read users")],
        ));
        let mut store = MetadataStore::new();
        store
            .register(
                "get_user",
                MetadataRecord::new().security("oauth").scope("users:read"),
            )
            .unwrap();

        let mut builder = OpenApiBuilder::new("app", &config).unwrap();
        builder
            .add_endpoint(&endpoint("/users", &["GET"], "get_user"), &store)
            .unwrap();
        let document = builder.build();

        let operation = document.paths["/users"].get.as_ref().unwrap();
        assert_eq!(
            serde_json::to_value(&operation.security).unwrap(),
            json!([{"oauth": ["users:read"]}])
        );
    }

    #[test]
    fn test_oauth2_security_requires_scopes() {
        let config = SwaggerConfig::new().with_auth_scheme(SecurityScheme::oauth2(
            "oauth",
            "https://auth.example.com",
            [("read", "Read")],
        ));
        let mut store = MetadataStore::new();
        store
            .register("get_user", MetadataRecord::new().security("oauth"))
            .unwrap();

        let mut builder = OpenApiBuilder::new("app", &config).unwrap();
        let err = builder
            .add_endpoint(&endpoint("/users", &["GET"], "get_user"), &store)
            .unwrap_err();
        assert!(matches!(err, Error::MissingScopes { ref name } if name == "oauth"));
    }

    #[test]
    fn test_undefined_security_scheme_fails() {
        let config = SwaggerConfig::new().with_auth_scheme(SecurityScheme::bearer("jwt"));
        let mut store = MetadataStore::new();
        store
            .register("get_user", MetadataRecord::new().security("session"))
            .unwrap();

        let mut builder = OpenApiBuilder::new("app", &config).unwrap();
        let err = builder
            .add_endpoint(&endpoint("/users", &["GET"], "get_user"), &store)
            .unwrap_err();
        assert!(err.to_string().contains("session"));
    }

    #[test]
    fn test_security_without_any_schemes_fails() {
        let mut store = MetadataStore::new();
        store
            .register("get_user", MetadataRecord::new().security("jwt"))
            .unwrap();

        let err = builder()
            .add_endpoint(&endpoint("/users", &["GET"], "get_user"), &store)
            .unwrap_err();
        assert!(matches!(err, Error::NoSecuritySchemes { .. }));
        assert!(err.to_string().contains("jwt"));
    }

    #[test]
    fn test_deprecated_flag() {
        let mut store = MetadataStore::new();
        store
            .register("old", MetadataRecord::new().deprecated(true))
            .unwrap();

        let mut builder = builder();
        builder
            .add_endpoint(&endpoint("/old", &["GET"], "old"), &store)
            .unwrap();
        let document = builder.build();
        assert_eq!(document.paths["/old"].get.as_ref().unwrap().deprecated, Some(true));
    }

    #[test]
    fn test_generate_document_skips_excluded_routes() {
        let routes = RouteMap::new("app")
            .route("/static/<path:filename>", ["GET"], "static")
            .route("/swagger/index.html", ["GET"], "swagger_index")
            .route("/users", ["GET"], "list_users");
        let document =
            generate_document(&routes, &MetadataStore::new(), &SwaggerConfig::default()).unwrap();

        assert_eq!(document.paths.keys().collect::<Vec<_>>(), vec!["/users"]);
    }

    #[test]
    fn test_generate_document_is_all_or_nothing() {
        let routes = RouteMap::new("app")
            .route("/users", ["GET"], "list_users")
            .route("/api", ["GET"], "api_root");
        let result = generate_document(&routes, &MetadataStore::new(), &SwaggerConfig::default());
        assert!(matches!(result, Err(Error::Derivation { .. })));
    }

    #[test]
    fn test_path_item_get_operation() {
        let mut item = PathItem::default();
        let operation = Operation {
            tags: vec!["t".to_string()],
            summary: None,
            description: None,
            parameters: None,
            request_body: None,
            responses: default_responses(),
            security: None,
            deprecated: None,
        };
        item.set(HttpMethod::Patch, operation.clone());
        assert_eq!(item.get_operation(HttpMethod::Patch), Some(&operation));
        assert!(item.get_operation(HttpMethod::Get).is_none());
    }

    #[test]
    fn test_security_schemes_rendered_without_routes() {
        let config = SwaggerConfig::new().with_auth_scheme(SecurityScheme::bearer("jwt"));
        let document = generate_document(&RouteMap::new("app"), &MetadataStore::new(), &config)
            .unwrap();
        assert_eq!(
            document.components.security_schemes.keys().collect::<Vec<_>>(),
            vec!["jwt"]
        );
    }

    #[test]
    fn test_malformed_scope_fails_without_routes() {
        let config = SwaggerConfig::new().with_auth_scheme(SecurityScheme::OAuth2 {
            name: "oauth".to_string(),
            authorization_url: "https://auth.example.com".to_string(),
            scopes: vec![vec!["read".to_string()]],
        });
        let result = generate_document(&RouteMap::new("app"), &MetadataStore::new(), &config);
        assert!(matches!(result, Err(Error::InvalidScope { .. })));
    }

    #[test]
    fn test_grouped_models_get_separate_components() {
        let mut store = MetadataStore::new();
        store
            .register(
                MetadataKey::new("create").in_group("users"),
                MetadataRecord::new().request_field("name", "string"),
            )
            .unwrap();
        store
            .register(
                MetadataKey::new("create").in_group("orders"),
                MetadataRecord::new().request_field("total", "number"),
            )
            .unwrap();
        let routes = RouteMap::new("shop")
            .route("/users", ["POST"], "users.create")
            .route("/orders", ["POST"], "orders.create");

        let document = generate_document(&routes, &store, &SwaggerConfig::default()).unwrap();
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(
            document.components.schemas.keys().collect::<Vec<_>>(),
            vec!["users.create", "orders.create"]
        );
        assert_eq!(
            json["components"]["schemas"]["users.create"]["properties"],
            json!({"name": {"type": "string", "nullable": true}})
        );
        let body_ref = |path: &str| {
            json["paths"][path]["post"]["requestBody"]["content"]["application/json"]["schema"]
                ["$ref"]
                .clone()
        };
        assert_eq!(body_ref("/users"), "#/components/schemas/users.create");
        assert_eq!(body_ref("/orders"), "#/components/schemas/orders.create");
    }
}
