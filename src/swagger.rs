//! Documentation setup and serving.
//!
//! [`Swagger`] ties an application's route table, its metadata and the documentation
//! settings together. [`Swagger::configure`] builds the document once and returns a
//! [`SwaggerService`] which answers requests for the document, the UI entry page and
//! the UI's resources.
//!
//! # Example
//!
//! ```
//! use swagger_gen::config::SwaggerConfig;
//! use swagger_gen::metadata::{MetadataRecord, MetadataStore};
//! use swagger_gen::route::RouteMap;
//! use swagger_gen::swagger::Swagger;
//!
//! let routes = RouteMap::new("pets")
//!     .route("/api/pets/<id>", ["GET"], "pets.get_pet");
//!
//! let mut metadata = MetadataStore::new();
//! metadata
//!     .register("get_pet", MetadataRecord::new().summary("Fetch a pet"))
//!     .unwrap();
//!
//! let service = Swagger::new(&routes, SwaggerConfig::new().with_version("1.0"))
//!     .unwrap()
//!     .with_metadata(metadata)
//!     .configure()
//!     .unwrap();
//!
//! let request = http::Request::get("/swagger/v1/swagger.json").body(()).unwrap();
//! let response = service.handle(&request);
//! assert_eq!(response.status(), http::StatusCode::OK);
//! ```

use crate::config::{SwaggerConfig, RESOURCE_ROUTE, SPEC_PATH};
use crate::error::Result;
use crate::metadata::MetadataStore;
use crate::openapi_builder::{generate_document, OpenApiDocument};
use crate::resources::{ResourceMap, INDEX_RESOURCE};
use crate::route::{RouteRule, RouteTable};
use bytes::Bytes;
use http::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use log::{debug, info, warn};

const RESOURCE_PREFIX: &str = "/swagger/";

/// Documentation setup for one application.
pub struct Swagger<'a> {
    app: &'a dyn RouteTable,
    config: SwaggerConfig,
    metadata: MetadataStore,
    resources: ResourceMap,
}

impl<'a> Swagger<'a> {
    /// Create the setup for an application.
    ///
    /// # Errors
    ///
    /// Fails immediately if the settings are invalid, see [`SwaggerConfig::validate`].
    pub fn new(app: &'a dyn RouteTable, config: SwaggerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            app,
            config,
            metadata: MetadataStore::new(),
            resources: ResourceMap::embedded(),
        })
    }

    /// Use the given metadata when documenting views
    pub fn with_metadata(mut self, metadata: MetadataStore) -> Self {
        self.metadata = metadata;
        self
    }

    /// Serve the given UI resources instead of the bundled ones
    pub fn with_resources(mut self, resources: ResourceMap) -> Self {
        self.resources = resources;
        self
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataStore {
        &mut self.metadata
    }

    pub fn config(&self) -> &SwaggerConfig {
        &self.config
    }

    /// Build the document from the application's current routes
    pub fn document(&self) -> Result<OpenApiDocument> {
        generate_document(self.app, &self.metadata, &self.config)
    }

    /// Build the document and prepare it for serving.
    ///
    /// # Errors
    ///
    /// Fails if any route or metadata record cannot be documented; no service is
    /// returned for a partial document.
    pub fn configure(&self) -> Result<SwaggerService> {
        info!("Configuring documentation for {}", self.app.app_name());
        let document = self.document()?;
        let spec_json = Bytes::from(serde_json::to_vec_pretty(&document)?);

        debug!("Serialized document: {} bytes", spec_json.len());
        Ok(SwaggerService {
            document,
            spec_json,
            resources: self.resources.clone(),
            ui_url: self.config.ui_url().to_string(),
        })
    }
}

/// Serves a built document and the documentation UI.
///
/// The document is fixed at configuration time and served verbatim on every request.
#[derive(Debug, Clone)]
pub struct SwaggerService {
    document: OpenApiDocument,
    spec_json: Bytes,
    resources: ResourceMap,
    ui_url: String,
}

impl SwaggerService {
    pub fn document(&self) -> &OpenApiDocument {
        &self.document
    }

    /// The serialized document
    pub fn spec_json(&self) -> &Bytes {
        &self.spec_json
    }

    pub fn ui_url(&self) -> &str {
        &self.ui_url
    }

    /// Rules a host mounts to route requests to this service
    pub fn routes(&self) -> Vec<RouteRule> {
        vec![
            RouteRule::new(SPEC_PATH, ["GET"], "swagger.spec"),
            RouteRule::new(RESOURCE_ROUTE, ["GET"], "swagger.resource"),
            RouteRule::new(&self.ui_url, ["GET"], "swagger.index"),
        ]
    }

    /// Answer a request for the document, the UI page or a UI resource.
    ///
    /// `HEAD` gets the same status and headers as `GET` with an empty body.
    pub fn handle<B>(&self, request: &Request<B>) -> Response<Bytes> {
        let response = self.dispatch(request);
        if request.method() == Method::HEAD {
            return response.map(|_| Bytes::new());
        }
        response
    }

    fn dispatch<B>(&self, request: &Request<B>) -> Response<Bytes> {
        if request.method() != Method::GET && request.method() != Method::HEAD {
            let mut response = respond(StatusCode::METHOD_NOT_ALLOWED, Bytes::new(), None);
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
            return response;
        }

        let path = request.uri().path();
        debug!("Serving {}", path);

        if path == SPEC_PATH {
            return self.serve_document();
        }
        if path == self.ui_url {
            return self.serve_index();
        }
        match path.strip_prefix(RESOURCE_PREFIX) {
            Some(name) if !name.is_empty() && !name.contains('/') => self.serve_resource(name),
            _ => not_found(),
        }
    }

    pub fn serve_document(&self) -> Response<Bytes> {
        respond(StatusCode::OK, self.spec_json.clone(), Some("application/json"))
    }

    pub fn serve_index(&self) -> Response<Bytes> {
        self.serve_resource(INDEX_RESOURCE)
    }

    /// Serve a UI resource by name; unknown names get a 404
    pub fn serve_resource(&self, name: &str) -> Response<Bytes> {
        match self.resources.get(name) {
            Some(resource) => respond(StatusCode::OK, resource.content, resource.content_type),
            None => {
                warn!("Unknown documentation resource requested: {}", name);
                not_found()
            }
        }
    }
}

fn respond(status: StatusCode, body: Bytes, content_type: Option<&'static str>) -> Response<Bytes> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    response
}

fn not_found() -> Response<Bytes> {
    respond(
        StatusCode::NOT_FOUND,
        Bytes::from_static(b"Not Found"),
        Some("text/plain"),
    )
}
