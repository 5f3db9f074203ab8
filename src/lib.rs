//! apidox - API documentation from recorded HTTP test interactions.
//!
//! This library converts a sequence of recorded request/response interactions
//! (captured while an automated test suite runs) into a structured API
//! description document: a path-keyed tree analogous to an OpenAPI document,
//! rendered to markdown or JSON.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`record`] - Boundary types for recorded interactions and their normalized view
//! 2. [`template`] - Infers parameterized path templates from concrete request paths
//! 3. [`registry`] - Resources, Actions and the grow-only registry accumulating them
//! 4. [`document`] - The idempotent find-or-add merge engine building the document tree
//! 5. [`attribute`] - Documented attributes and their markdown formatting
//! 6. [`collector`] - Feeds interactions through inference, registry and merge engine
//! 7. [`renderer`] - Renders the registry to markdown
//! 8. [`serializer`] - Serializes the document tree to JSON
//!
//! # Example Usage
//!
//! ```
//! use apidox::collector::DocumentCollector;
//! use apidox::config::DocConfig;
//! use apidox::record::RecordedInteraction;
//! use serde_json::json;
//!
//! let config = DocConfig::default();
//! let mut collector = DocumentCollector::new(&config);
//!
//! let interaction: RecordedInteraction = serde_json::from_value(json!({
//!     "request": {
//!         "method": "GET",
//!         "path": "/pokemons/1",
//!         "path_params": {"id": "1"}
//!     },
//!     "response": {
//!         "status": 200,
//!         "body": "{\"id\":1,\"name\":\"Pikachu\"}"
//!     },
//!     "metadata": {
//!         "description": "Returns a Pokemon",
//!         "resource_name": "Pokemons"
//!     }
//! })).unwrap();
//!
//! collector.record(&interaction).unwrap();
//! let (registry, tree) = collector.into_parts();
//!
//! assert!(tree.contains_key("/pokemons/{id}"));
//! assert_eq!(registry.resources()[0].name, "Pokemons");
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod attribute;
pub mod cli;
pub mod collector;
pub mod config;
pub mod document;
pub mod error;
pub mod record;
pub mod registry;
pub mod renderer;
pub mod serializer;
pub mod template;
