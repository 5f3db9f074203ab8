//! Boundary types for recorded HTTP interactions.
//!
//! The host test framework (or a capture file produced by one) supplies one
//! [`RecordedInteraction`] per executed request. This module pins down exactly
//! which fields the core consumes, so framework-specific objects are adapted
//! once at the boundary instead of being duck-typed throughout the crate.

use crate::attribute::AttributeSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header map preserving the order headers were recorded in.
///
/// `serde_json::Map` is insertion-ordered (the `preserve_order` feature), so
/// header-derived parameters come out in a deterministic order.
pub type HeaderMap = serde_json::Map<String, Value>;

/// One captured request/response pair plus its documentation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedInteraction {
    /// The request as the framework resolved it
    pub request: RecordedRequest,
    /// The response the application produced
    pub response: RecordedResponse,
    /// Human-authored documentation details
    #[serde(default)]
    pub metadata: InteractionMeta,
}

/// The request half of a recorded interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedRequest {
    /// HTTP method as recorded (any case)
    pub method: String,
    /// Normalized request path, without query string (may be empty)
    #[serde(default)]
    pub path: String,
    /// Full request target including query string, used as a fallback
    /// when `path` is empty
    #[serde(default)]
    pub full_path: String,
    /// Dynamic path segment bindings resolved by the framework's router,
    /// in enumeration order (e.g. `{"id": "1"}` for `/pokemons/1`)
    #[serde(default)]
    pub path_params: serde_json::Map<String, Value>,
    /// Request headers
    #[serde(default)]
    pub headers: HeaderMap,
    /// Raw request body (empty string when the request had no body)
    #[serde(default)]
    pub body: String,
    /// Request content type, if one was set
    #[serde(default)]
    pub content_type: Option<String>,
}

/// The response half of a recorded interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    #[serde(default)]
    pub headers: HeaderMap,
    /// Raw response body (empty string when the response had no body)
    #[serde(default)]
    pub body: String,
    /// Response content type, if one was set
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Documentation metadata attached to an interaction by the test author.
///
/// Everything here is optional; `action_verb`/`action_path`/`action_params`
/// override what would otherwise be inferred from the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionMeta {
    /// Human-readable description of this example
    #[serde(default)]
    pub description: String,
    /// Name of the Resource this example documents
    #[serde(default)]
    pub resource_name: String,
    /// Optional group the Resource belongs to
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Resource description (verbatim, or a `*.md` file name)
    #[serde(default)]
    pub resource_desc: Option<String>,
    /// Resource endpoint note
    #[serde(default)]
    pub resource_endpoint: Option<String>,
    /// Explicit action name; defaults to the description
    #[serde(default)]
    pub action_name: Option<String>,
    /// Action description (verbatim, or a `*.md` file name)
    #[serde(default)]
    pub action_desc: Option<String>,
    /// Explicit HTTP verb, overriding the recorded request method
    #[serde(default)]
    pub action_verb: Option<String>,
    /// Explicit path template, overriding template inference
    #[serde(default)]
    pub action_path: Option<String>,
    /// Explicit parameter list, overriding inferred parameters
    #[serde(default)]
    pub action_params: Option<Vec<crate::template::UriParam>>,
    /// Name of the declared request schema (becomes a `$ref`)
    #[serde(default)]
    pub request_schema: Option<String>,
    /// Name of the declared response schema (becomes a `$ref`)
    #[serde(default)]
    pub response_schema: Option<String>,
    /// Documented attributes for the Action. Attributes carry deferred
    /// defaults and are built in code, not deserialized from captures.
    #[serde(skip)]
    pub attributes: Vec<AttributeSpec>,
}

/// Normalized view of one interaction, as consumed by the document builder.
///
/// Immutable once constructed; appended to its owning Action's example list
/// in recording order.
#[derive(Debug, Clone)]
pub struct ExampleRecord {
    /// Human-readable description, used as the `examples` key
    pub description: String,
    /// Request headers
    pub request_headers: HeaderMap,
    /// Raw request body
    pub request_body: String,
    /// Request content type
    pub request_content_type: Option<String>,
    /// Declared request schema name
    pub request_schema: Option<String>,
    /// Response status code
    pub response_status: u16,
    /// Response headers
    pub response_headers: HeaderMap,
    /// Raw response body
    pub response_body: String,
    /// Response content type
    pub response_content_type: Option<String>,
    /// Declared response schema name
    pub response_schema: Option<String>,
}

impl RecordedRequest {
    /// The concrete request path: `path` when present, otherwise the
    /// portion of `full_path` before the query string.
    pub fn concrete_path(&self) -> &str {
        if !self.path.is_empty() {
            &self.path
        } else {
            self.full_path.split('?').next().unwrap_or("")
        }
    }

    /// Path parameter bindings as string pairs, in enumeration order.
    /// Non-string values are rendered through their JSON representation.
    pub fn path_bindings(&self) -> Vec<(String, String)> {
        self.path_params
            .iter()
            .map(|(name, value)| (name.clone(), value_as_string(value)))
            .collect()
    }
}

impl ExampleRecord {
    /// Normalize a recorded interaction into an `ExampleRecord`.
    pub fn from_interaction(interaction: &RecordedInteraction) -> Self {
        Self {
            description: interaction.metadata.description.clone(),
            request_headers: interaction.request.headers.clone(),
            request_body: interaction.request.body.clone(),
            request_content_type: interaction.request.content_type.clone(),
            request_schema: interaction.metadata.request_schema.clone(),
            response_status: interaction.response.status,
            response_headers: interaction.response.headers.clone(),
            response_body: interaction.response.body.clone(),
            response_content_type: interaction.response.content_type.clone(),
            response_schema: interaction.metadata.response_schema.clone(),
        }
    }
}

/// Renders a JSON value as a bare string (strings lose their quotes).
pub fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Looks up a header by exact name and returns its string value.
pub fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(Value::as_str)
}
