//! Configuration for document generation.
//!
//! All components receive an explicit [`DocConfig`] reference instead of reading
//! ambient global state, so the same process can build several documents with
//! different settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings consumed by the document builder and the markdown renderer.
///
/// # Example
///
/// ```
/// use apidox::config::DocConfig;
///
/// let config = DocConfig::default()
///     .with_headers_whitelist(vec!["X-Auth-Token".to_string()]);
/// assert!(config.header_whitelisted("X-Auth-Token"));
/// assert!(!config.header_whitelisted("x-auth-token"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocConfig {
    /// Case-sensitive list of header names that may appear in rendered output
    /// and header-derived parameters. An empty list hides all headers.
    pub headers_whitelist: Vec<String>,
    /// Folder prefix for request schema `$ref` strings
    pub schema_request_folder: PathBuf,
    /// Folder prefix for response schema `$ref` strings
    pub schema_response_folder: PathBuf,
    /// Resolution base for file-backed (`*.md`) descriptions
    pub desc_folder: PathBuf,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            headers_whitelist: Vec::new(),
            schema_request_folder: PathBuf::from("schemas/requests"),
            schema_response_folder: PathBuf::from("schemas/responses"),
            desc_folder: PathBuf::from("docs/descriptions"),
        }
    }
}

impl DocConfig {
    /// Replace the headers whitelist
    pub fn with_headers_whitelist(mut self, whitelist: Vec<String>) -> Self {
        self.headers_whitelist = whitelist;
        self
    }

    /// Set the request schema folder prefix
    pub fn with_schema_request_folder(mut self, folder: PathBuf) -> Self {
        self.schema_request_folder = folder;
        self
    }

    /// Set the response schema folder prefix
    pub fn with_schema_response_folder(mut self, folder: PathBuf) -> Self {
        self.schema_response_folder = folder;
        self
    }

    /// Set the description resolution base
    pub fn with_desc_folder(mut self, folder: PathBuf) -> Self {
        self.desc_folder = folder;
        self
    }

    /// Whether a header name passes the case-sensitive whitelist
    pub fn header_whitelisted(&self, name: &str) -> bool {
        self.headers_whitelist.iter().any(|h| h == name)
    }

    /// Builds the `$ref` string for a request schema name
    pub fn request_schema_ref(&self, name: &str) -> String {
        Self::schema_ref(&self.schema_request_folder, name)
    }

    /// Builds the `$ref` string for a response schema name
    pub fn response_schema_ref(&self, name: &str) -> String {
        Self::schema_ref(&self.schema_response_folder, name)
    }

    fn schema_ref(folder: &Path, name: &str) -> String {
        folder.join(format!("{}.json", name)).display().to_string()
    }
}
