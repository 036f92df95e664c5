use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Prefix of references into `components.schemas`
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Schema generator - turns request models into component schemas and synthesizes
/// parameter schemas
#[derive(Debug, Default)]
pub struct SchemaGenerator {
    /// Component schemas registered so far, by component key
    schemas: IndexMap<String, Schema>,
}

/// OpenAPI Schema definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, object, or whatever a model declares)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Properties for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    /// Reference to another schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Schema {
    /// A typed schema with explicit nullability
    pub fn typed(schema_type: &str, nullable: bool) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            nullable: Some(nullable),
            ..Self::default()
        }
    }

    /// A reference to a component schema
    pub fn reference(component_key: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", SCHEMA_REF_PREFIX, component_key)),
            ..Self::default()
        }
    }
}

/// Where a parameter is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
}

/// Parameter schema for OpenAPI parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,
    /// Parameter location (path, query)
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the parameter is required
    pub required: bool,
    /// Schema for the parameter
    pub schema: Schema,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        debug!("Initializing SchemaGenerator");
        Self::default()
    }

    /// Generate a required, non-nullable string parameter
    pub fn generate_parameter_schema(
        &self,
        name: &str,
        location: ParameterLocation,
    ) -> ParameterSchema {
        ParameterSchema {
            name: name.to_string(),
            location,
            required: true,
            schema: Schema::typed("string", false),
        }
    }

    /// Convert a field-to-type mapping into an object schema.
    ///
    /// Every property takes the declared type name verbatim and is nullable.
    pub fn generate_model_schema(&self, model: &IndexMap<String, String>) -> Schema {
        let properties = model
            .iter()
            .map(|(field, type_name)| (field.clone(), Schema::typed(type_name, true)))
            .collect();

        Schema {
            schema_type: Some("object".to_string()),
            properties: Some(properties),
            ..Schema::default()
        }
    }

    /// Register a model as a component schema and return a reference to it.
    ///
    /// Registering the same key again replaces the earlier schema.
    pub fn register_model(&mut self, component_key: &str, model: &IndexMap<String, String>) -> Schema {
        debug!("Registering component schema: {}", component_key);
        let schema = self.generate_model_schema(model);
        self.schemas.insert(component_key.to_string(), schema);
        Schema::reference(component_key)
    }

    /// Get all registered component schemas
    pub fn get_schemas(&self) -> &IndexMap<String, Schema> {
        &self.schemas
    }

    pub fn into_schemas(self) -> IndexMap<String, Schema> {
        self.schemas
    }
}
