//! Swagger Gen - OpenAPI documentation generated from a web application's route table.
//!
//! The generator walks the routes an application has registered, combines them with
//! optional per-view metadata, and produces an OpenAPI 3.0.1 document. The document is
//! served together with an interactive Swagger UI.
//!
//! # Architecture
//!
//! 1. [`route`] - Normalizes the host framework's route rules into endpoint records
//! 2. [`metadata`] - Stores per-view metadata (summary, models, responses, security)
//! 3. [`security`] - Renders the configured authentication schemes
//! 4. [`schema_generator`] - Synthesizes parameter and component schemas
//! 5. [`openapi_builder`] - Assembles the document, merging methods per path
//! 6. [`swagger`] - Builds the document once and serves it with the UI
//! 7. [`resources`] - The in-memory UI bundle
//! 8. [`manifest`] / [`serializer`] / [`cli`] - File-based generation
//!
//! # Example Usage
//!
//! ```
//! use swagger_gen::{
//!     config::SwaggerConfig,
//!     metadata::{MetadataRecord, MetadataStore},
//!     route::RouteMap,
//!     security::SecurityScheme,
//!     swagger::Swagger,
//! };
//!
//! let routes = RouteMap::new("users_service")
//!     .route("/api/users/<id>", ["GET", "HEAD", "OPTIONS"], "users.get_user")
//!     .route("/api/users", ["POST"], "users.create_user");
//!
//! let mut metadata = MetadataStore::new();
//! metadata
//!     .register(
//!         "create_user",
//!         MetadataRecord::new()
//!             .summary("Create a user")
//!             .request_field("name", "string")
//!             .response(201, "Created")
//!             .security("jwt"),
//!     )
//!     .unwrap();
//!
//! let config = SwaggerConfig::new()
//!     .with_title("Users")
//!     .with_version("1.0.0")
//!     .with_auth_scheme(SecurityScheme::bearer("jwt"));
//!
//! let service = Swagger::new(&routes, config)
//!     .unwrap()
//!     .with_metadata(metadata)
//!     .configure()
//!     .unwrap();
//!
//! let document = service.document();
//! assert!(document.paths["/api/users/{id}"].get.is_some());
//! assert!(document.components.schemas.contains_key("create_user"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod openapi_builder;
pub mod resources;
pub mod route;
pub mod schema_generator;
pub mod security;
pub mod serializer;
pub mod swagger;
