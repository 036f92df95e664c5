use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for document generation.
///
/// Every variant except the serialization one aborts the document build;
/// a partially generated document is never returned.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction-time configuration
    #[error("invalid configuration for '{field}': {message}")]
    Config { field: String, message: String },

    /// A route rule could not be turned into an endpoint record
    #[error("failed to derive endpoint from rule '{rule}': {message}")]
    Derivation { rule: String, message: String },

    /// A metadata payload carried keys outside the allow-list
    #[error("unknown metadata keys for '{key}': {}", .keys.join(", "))]
    UnknownMetadataKeys { key: String, keys: Vec<String> },

    /// Metadata was already registered under this key
    #[error("metadata is already registered for '{key}'")]
    DuplicateMetadata { key: String },

    /// A metadata payload value has the wrong shape
    #[error("invalid metadata for '{key}': {message}")]
    InvalidMetadata { key: String, message: String },

    /// A request or response model could not be interpreted
    #[error("invalid model for '{key}': {message}")]
    InvalidModel { key: String, message: String },

    /// An endpoint references a security scheme but none are configured
    #[error("endpoint requires security scheme '{name}' but no security schemes are defined")]
    NoSecuritySchemes { name: String },

    /// An endpoint references a security scheme that is not configured
    #[error("no security scheme with the name '{name}' is defined")]
    UndefinedSecurityScheme { name: String },

    /// An OAuth2 scheme was referenced without scopes
    #[error("scopes must be provided when using the OAuth2 scheme '{name}'")]
    MissingScopes { name: String },

    /// An OAuth2 scope descriptor is not a (name, description) pair
    #[error("invalid scope #{index} on scheme '{scheme}': expected a (name, description) pair, got {len} values")]
    InvalidScope {
        scheme: String,
        index: usize,
        len: usize,
    },

    /// Two security schemes share the same name
    #[error("security scheme '{name}' is defined more than once")]
    DuplicateSecurityScheme { name: String },

    /// A bare view name matches records in more than one group
    #[error("metadata key '{key}' matches records in groups {}; qualify it with its group", .groups.join(", "))]
    AmbiguousMetadata { key: String, groups: Vec<String> },

    /// Serialization of the document failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub(crate) fn config(field: &str, message: impl Into<String>) -> Self {
        Error::Config {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn derivation(rule: &str, message: impl Into<String>) -> Self {
        Error::Derivation {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}
