//! Per-view documentation metadata.
//!
//! Metadata is registered against a view identifier before the document is built and
//! looked up read-only by the builder. A view without metadata is still documented, it
//! just gets default responses and no summary or description.
//!
//! Views living in a namespace (a blueprint, a router group) are registered under
//! `group.view`, see [`MetadataKey::in_group`]. Lookups try the full view identifier
//! first and then fall back to the name after its last separator.

use crate::error::{Error, Result};
use crate::route::{short_view_name, VIEW_SEPARATOR};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Keys a metadata payload may carry
pub const ALLOWED_KEYS: &[&str] = &[
    "summary",
    "description",
    "query_params",
    "request_model",
    "response_model",
    "security",
    "scopes",
    "deprecated",
    "blueprint",
];

/// Documentation metadata for one view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataRecord {
    /// Shown next to the collapsed operation
    #[serde(default)]
    pub summary: Option<String>,
    /// Shown when the operation is expanded
    #[serde(default)]
    pub description: Option<String>,
    /// Names of the query parameters the view reads
    #[serde(default)]
    pub query_params: Option<Vec<String>>,
    /// Request body fields, name to type name
    #[serde(default)]
    pub request_model: Option<IndexMap<String, String>>,
    /// Documented responses as (status code, description) pairs
    #[serde(default)]
    pub response_model: Option<Vec<(String, String)>>,
    /// Name of the security scheme protecting the view
    #[serde(default)]
    pub security: Option<String>,
    /// OAuth2 scopes required by the view
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    #[serde(default)]
    pub deprecated: bool,
    /// Namespace the view is registered in
    #[serde(default)]
    pub blueprint: Option<String>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn query_param(mut self, name: impl Into<String>) -> Self {
        self.query_params.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    pub fn request_field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.request_model
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), type_name.into());
        self
    }

    /// Declare a response; a repeated status code replaces the earlier description
    pub fn response(mut self, status: impl ToString, description: impl Into<String>) -> Self {
        upsert_response(
            self.response_model.get_or_insert_with(Vec::new),
            status.to_string(),
            description.into(),
        );
        self
    }

    pub fn security(mut self, scheme: impl Into<String>) -> Self {
        self.security = Some(scheme.into());
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.get_or_insert_with(Vec::new).push(scope.into());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn blueprint(mut self, group: impl Into<String>) -> Self {
        self.blueprint = Some(group.into());
        self
    }

    /// Parse an untyped payload, rejecting keys outside [`ALLOWED_KEYS`].
    ///
    /// All unknown keys are reported together. Response entries must be
    /// `[status, description]` pairs and the request model must map field names to
    /// type names.
    pub fn from_payload(key: &str, payload: &Map<String, Value>) -> Result<Self> {
        let unknown: Vec<String> = payload
            .keys()
            .filter(|k| !ALLOWED_KEYS.contains(&k.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(Error::UnknownMetadataKeys {
                key: key.to_string(),
                keys: unknown,
            });
        }

        let mut rest = payload.clone();
        let request_model = rest
            .remove("request_model")
            .filter(|v| !v.is_null())
            .map(|v| parse_request_model(key, v))
            .transpose()?;
        let response_model = rest
            .remove("response_model")
            .filter(|v| !v.is_null())
            .map(|v| parse_response_model(key, v))
            .transpose()?;

        let mut record: MetadataRecord =
            serde_json::from_value(Value::Object(rest)).map_err(|e| Error::InvalidMetadata {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        record.request_model = request_model;
        record.response_model = response_model;
        Ok(record)
    }
}

fn parse_request_model(key: &str, value: Value) -> Result<IndexMap<String, String>> {
    let invalid = |message: String| Error::InvalidModel {
        key: key.to_string(),
        message,
    };
    let Value::Object(fields) = value else {
        return Err(invalid(
            "request model must be a mapping of field name to type name".to_string(),
        ));
    };
    fields
        .into_iter()
        .map(|(name, type_name)| match type_name {
            Value::String(type_name) => Ok((name, type_name)),
            other => Err(invalid(format!(
                "type of request field '{}' must be a string, got {}",
                name, other
            ))),
        })
        .collect()
}

fn parse_response_model(key: &str, value: Value) -> Result<Vec<(String, String)>> {
    let invalid = |message: String| Error::InvalidModel {
        key: key.to_string(),
        message,
    };
    let Value::Array(entries) = value else {
        return Err(invalid(
            "response model must be a list of (status, description) pairs".to_string(),
        ));
    };

    let mut responses = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let pair = match entry {
            Value::Array(pair) if pair.len() == 2 => pair,
            Value::Array(other) => {
                return Err(invalid(format!(
                    "response #{} must be a (status, description) pair, got {} values",
                    index,
                    other.len()
                )))
            }
            _ => {
                return Err(invalid(format!(
                    "response #{} must be a (status, description) pair",
                    index
                )))
            }
        };
        let status = match &pair[0] {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            other => return Err(invalid(format!("invalid status code {}", other))),
        };
        let description = match &pair[1] {
            Value::String(s) => s.clone(),
            other => return Err(invalid(format!("invalid response description {}", other))),
        };
        upsert_response(&mut responses, status, description);
    }
    Ok(responses)
}

fn upsert_response(responses: &mut Vec<(String, String)>, status: String, description: String) {
    match responses.iter_mut().find(|(code, _)| *code == status) {
        Some(existing) => existing.1 = description,
        None => responses.push((status, description)),
    }
}

/// Registration key: a view name, optionally inside a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataKey {
    group: Option<String>,
    view: String,
}

impl MetadataKey {
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            group: None,
            view: view.into(),
        }
    }

    /// Place the view inside a namespace, giving the key `group.view`
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{}.{}", group, self.view),
            None => f.write_str(&self.view),
        }
    }
}

impl From<&str> for MetadataKey {
    fn from(view: &str) -> Self {
        MetadataKey::new(view)
    }
}

impl From<String> for MetadataKey {
    fn from(view: String) -> Self {
        MetadataKey::new(view)
    }
}

/// Table of metadata records keyed by view identifier.
///
/// Built up during route setup and handed to the document builder. Records are never
/// modified by the builder.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    records: IndexMap<String, MetadataRecord>,
    /// Keys whose record so far only holds response declarations
    pending: HashSet<String>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for a view.
    ///
    /// A record carrying a `blueprint` and registered under a bare view name is stored
    /// under `blueprint.view`. Responses declared earlier with [`add_response`] for the
    /// same view are merged into the record and override its own entries per status
    /// code.
    ///
    /// # Errors
    ///
    /// Fails if the key already holds a registered record.
    ///
    /// [`add_response`]: MetadataStore::add_response
    pub fn register(&mut self, key: impl Into<MetadataKey>, mut record: MetadataRecord) -> Result<()> {
        let mut key = key.into();
        if key.group.is_none() {
            key.group = record.blueprint.clone();
        }
        let view = key.view.clone();
        let key = key.to_string();

        let declared = if self.pending.remove(&key) {
            self.records.shift_remove(&key)
        } else if self.records.contains_key(&key) {
            return Err(Error::DuplicateMetadata { key });
        } else if key != view && self.pending.remove(&view) {
            self.records.shift_remove(&view)
        } else {
            None
        };

        if let Some(declared) = declared.and_then(|declared| declared.response_model) {
            let responses = record.response_model.get_or_insert_with(Vec::new);
            for (status, description) in declared {
                upsert_response(responses, status, description);
            }
        }

        debug!("Registered metadata for {}", key);
        self.records.insert(key, record);
        Ok(())
    }

    /// Register an untyped payload, see [`MetadataRecord::from_payload`]
    pub fn register_payload(
        &mut self,
        key: impl Into<MetadataKey>,
        payload: &Map<String, Value>,
    ) -> Result<()> {
        let key = key.into();
        let record = MetadataRecord::from_payload(&key.to_string(), payload)?;
        self.register(key, record)
    }

    /// Append a response declaration for a view.
    ///
    /// A bare view name resolves to the record registered under that name, or else to
    /// the single grouped record for the view. Without either, a record holding only
    /// the response is created and merged on a later [`register`]. Repeated
    /// declarations for the same status code keep the latest description.
    ///
    /// # Errors
    ///
    /// Fails if a bare view name matches grouped records in more than one group.
    ///
    /// [`register`]: MetadataStore::register
    pub fn add_response(
        &mut self,
        key: impl Into<MetadataKey>,
        status: impl ToString,
        description: impl Into<String>,
    ) -> Result<()> {
        let key = self.response_key(key.into())?;
        if !self.records.contains_key(&key) {
            self.pending.insert(key.clone());
        }
        let record = self.records.entry(key).or_default();
        upsert_response(
            record.response_model.get_or_insert_with(Vec::new),
            status.to_string(),
            description.into(),
        );
        Ok(())
    }

    fn response_key(&self, key: MetadataKey) -> Result<String> {
        let full = key.to_string();
        if key.group.is_some() || self.records.contains_key(&full) {
            return Ok(full);
        }

        let suffix = format!("{}{}", VIEW_SEPARATOR, key.view);
        let grouped: Vec<&String> = self
            .records
            .keys()
            .filter(|candidate| candidate.ends_with(&suffix))
            .collect();
        match grouped.as_slice() {
            [] => Ok(full),
            [only] => Ok((*only).clone()),
            many => Err(Error::AmbiguousMetadata {
                key: full,
                groups: many
                    .iter()
                    .map(|candidate| candidate[..candidate.len() - suffix.len()].to_string())
                    .collect(),
            }),
        }
    }

    /// Find the metadata for a view identifier together with the key it is stored
    /// under, trying the full identifier before its short name
    pub fn resolve(&self, view_identifier: &str) -> Option<(&str, &MetadataRecord)> {
        self.records
            .get_key_value(view_identifier)
            .or_else(|| self.records.get_key_value(short_view_name(view_identifier)))
            .map(|(key, record)| (key.as_str(), record))
    }

    /// Find the metadata for a view identifier, falling back to its short name
    pub fn lookup(&self, view_identifier: &str) -> Option<&MetadataRecord> {
        self.resolve(view_identifier).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
