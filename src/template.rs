//! Path template inference.
//!
//! Turns a concrete request path like `/pokemons/1` into a parameterized
//! template like `/pokemons/{id}` using the dynamic-segment bindings the
//! framework's router resolved, and infers a typed parameter list from the
//! bound values.

use log::debug;
use serde::{Deserialize, Serialize};

/// Inferred type of a path parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Value consisted solely of ASCII digits
    Number,
    /// Anything else
    String,
}

/// Whether a parameter must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Required,
    Optional,
}

/// One inferred (or explicitly declared) path parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriParam {
    /// Placeholder name, matching a `{name}` segment in the template
    pub name: String,
    /// Inferred value type
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Path parameters always come from a resolved segment, so they are
    /// required unless explicitly overridden
    pub requirement: Requirement,
    /// The concrete value observed in the recorded request
    pub example: String,
}

/// Result of template inference: the parameterized path plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInference {
    /// Path with dynamic segments replaced by `{name}` placeholders
    pub template: String,
    /// One entry per binding whose value occurred in the path, in binding
    /// enumeration order
    pub params: Vec<UriParam>,
}

impl ParamType {
    /// The OpenAPI-style type name for this parameter type
    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::Number => "number",
            ParamType::String => "string",
        }
    }
}

/// Infers a path template and typed parameter list from a concrete path.
///
/// For each `(name, value)` binding, the first path segment equal to `value`
/// (bounded by `/` on the left and `/` or end-of-path on the right) is
/// replaced with `{name}`. Substitution is single-pass and first-match only:
/// when the same literal value appears in several segments, only the first
/// occurrence is replaced per binding. Bindings whose value does not occur
/// in the path are skipped silently and contribute no parameter.
///
/// # Example
///
/// ```
/// use apidox::template::{infer, ParamType};
///
/// let inference = infer("/pokemons/1", &[("id".to_string(), "1".to_string())]);
/// assert_eq!(inference.template, "/pokemons/{id}");
/// assert_eq!(inference.params[0].param_type, ParamType::Number);
/// ```
pub fn infer(concrete_path: &str, bindings: &[(String, String)]) -> TemplateInference {
    let mut template = concrete_path.to_string();
    let mut params = Vec::new();

    for (name, value) in bindings {
        match substitute_first(&template, name, value) {
            Some(substituted) => {
                template = substituted;
                params.push(UriParam {
                    name: name.clone(),
                    param_type: guess_param_type(value),
                    requirement: Requirement::Required,
                    example: value.clone(),
                });
            }
            None => {
                debug!("Binding {}={} not found in path {}", name, value, concrete_path);
            }
        }
    }

    TemplateInference { template, params }
}

/// Replaces the first `/value` segment (followed by `/` or end of path)
/// with `/{name}`. Returns `None` when no bounded occurrence exists.
fn substitute_first(path: &str, name: &str, value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    let needle = format!("/{}", value);
    let mut search_from = 0;

    while let Some(offset) = path[search_from..].find(&needle) {
        let start = search_from + offset;
        let end = start + needle.len();

        // The match must end at a segment boundary
        if path[end..].is_empty() || path[end..].starts_with('/') {
            let mut substituted = String::with_capacity(path.len() + name.len());
            substituted.push_str(&path[..start]);
            substituted.push_str("/{");
            substituted.push_str(name);
            substituted.push('}');
            substituted.push_str(&path[end..]);
            return Some(substituted);
        }

        search_from = start + 1;
    }

    None
}

/// Classifies a bound value: all-digit values are numbers, the rest strings.
fn guess_param_type(value: &str) -> ParamType {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        ParamType::Number
    } else {
        ParamType::String
    }
}
