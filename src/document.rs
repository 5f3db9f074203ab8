//! The document-tree merge engine.
//!
//! The output of a run is a path-keyed tree (paths → methods → parameters /
//! requestBody / responses → content types → examples) built up one recorded
//! example at a time. Everything here is a composition of one find-or-add
//! primitive, which makes the accumulation idempotent: folding the same
//! example in twice leaves the tree unchanged.

use crate::config::DocConfig;
use crate::record::{header_value, value_as_string, ExampleRecord};
use crate::registry::Action;
use crate::template::Requirement;
use log::debug;
use serde_json::{json, Map, Value};

/// The accumulating output tree. Keys keep first-insertion order.
pub type DocumentTree = Map<String, Value>;

/// Content-type key used when no content type can be determined.
pub const ANY_CONTENT: &str = "any";

/// Returns `node[key]` if present, otherwise inserts `default` and returns it.
///
/// This is the single primitive all higher-level merging is built from.
/// Calling it twice with identical arguments leaves the node unchanged.
pub fn find_or_add<'a>(node: &'a mut DocumentTree, key: &str, default: Value) -> &'a mut Value {
    node.entry(key).or_insert(default)
}

/// Threads [`find_or_add`] along a key path, inserting empty objects for
/// missing levels, and returns the innermost object.
///
/// A non-object value already sitting at an intermediate key is replaced by
/// an empty object; the composition only ever stores objects at interior
/// keys, so this arm is a totality guard rather than an expected path.
pub fn get_or_insert_path<'a>(node: &'a mut DocumentTree, keys: &[&str]) -> &'a mut DocumentTree {
    let mut current = node;
    for key in keys {
        let child = find_or_add(current, key, Value::Object(Map::new()));
        if !child.is_object() {
            *child = Value::Object(Map::new());
        }
        current = match child {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
    }
    current
}

/// Folds recorded examples into the document tree.
///
/// Holds a reference to the configuration (whitelist, schema folders) and
/// owns the tree being built. Single-threaded by design: one builder per
/// suite run, mutated per interaction, read once at the end.
pub struct DocumentTreeBuilder<'a> {
    config: &'a DocConfig,
    tree: DocumentTree,
}

impl<'a> DocumentTreeBuilder<'a> {
    /// Create a builder with an empty tree
    pub fn new(config: &'a DocConfig) -> Self {
        Self {
            config,
            tree: DocumentTree::new(),
        }
    }

    /// The tree built so far
    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Consume the builder, yielding the finished tree
    pub fn into_tree(self) -> DocumentTree {
        self.tree
    }

    /// Folds one example of an action into the tree.
    ///
    /// Creates the `paths[template][verb]` node on first sight and merges the
    /// example's parameters, request body and response into it. Idempotent:
    /// folding an identical example again converges to the same tree.
    pub fn add_example(&mut self, action: &Action, example: &ExampleRecord) {
        debug!(
            "Folding example '{}' into {} {}",
            example.description,
            action.verb.as_str(),
            action.path_template
        );

        let config = self.config;
        let method = get_or_insert_path(
            &mut self.tree,
            &[action.path_template.as_str(), action.verb.doc_key()],
        );

        let description = action
            .description
            .clone()
            .unwrap_or_else(|| action.name.clone());
        find_or_add(method, "description", Value::String(description));

        Self::add_parameters(config, method, action, example);
        Self::add_request(config, method, example);
        Self::add_response(config, method, example);
    }

    /// Appends path parameters and whitelisted header parameters to the
    /// method's `parameters` array, deduplicated by name + location in
    /// first-seen order.
    fn add_parameters(
        config: &DocConfig,
        method: &mut DocumentTree,
        action: &Action,
        example: &ExampleRecord,
    ) {
        let parameters = find_or_add(method, "parameters", Value::Array(Vec::new()));
        let Some(list) = parameters.as_array_mut() else {
            return;
        };

        for param in &action.uri_params {
            push_unique(
                list,
                json!({
                    "name": param.name,
                    "in": "path",
                    "required": param.requirement == Requirement::Required,
                    "schema": { "type": param.param_type.as_str() },
                    "example": param.example,
                }),
            );
        }

        for (name, value) in &example.request_headers {
            if config.header_whitelisted(name) {
                push_unique(
                    list,
                    json!({
                        "name": name,
                        "in": "header",
                        "example": value_as_string(value),
                    }),
                );
            }
        }
    }

    /// Merges the request side: `requestBody.content[<key>].examples[<desc>]`
    /// plus an optional `schema` ref. An empty request body creates no
    /// `requestBody` node at all.
    fn add_request(config: &DocConfig, method: &mut DocumentTree, example: &ExampleRecord) {
        if example.request_body.is_empty() {
            return;
        }

        let key = request_content_key(example);
        let content = get_or_insert_path(method, &["requestBody", "content", key.as_str()]);

        if let Some(schema) = &example.request_schema {
            content.insert(
                "schema".to_string(),
                json!({ "$ref": config.request_schema_ref(schema) }),
            );
        }

        insert_example_value(content, &example.description, &example.request_body);
    }

    /// Merges the response side: `responses[<status>]` always, and
    /// `.content[<key>].examples[<desc>]` when the response had a body.
    fn add_response(config: &DocConfig, method: &mut DocumentTree, example: &ExampleRecord) {
        let status = example.response_status.to_string();
        let response = get_or_insert_path(method, &["responses", status.as_str()]);

        if example.response_body.is_empty() {
            return;
        }

        let key = response_content_key(example);
        let content = get_or_insert_path(response, &["content", key.as_str()]);

        if let Some(schema) = &example.response_schema {
            content.insert(
                "schema".to_string(),
                json!({ "$ref": config.response_schema_ref(schema) }),
            );
        }

        insert_example_value(content, &example.description, &example.response_body);
    }
}

/// The content-type key for the request side: the `Accept` header when
/// present, the sentinel `any` otherwise.
pub fn request_content_key(example: &ExampleRecord) -> String {
    header_value(&example.request_headers, "Accept")
        .map(str::to_string)
        .unwrap_or_else(|| ANY_CONTENT.to_string())
}

/// The content-type key for the response side: the recorded response content
/// type, the response `Content-Type` header, or the sentinel `any`.
pub fn response_content_key(example: &ExampleRecord) -> String {
    example
        .response_content_type
        .clone()
        .or_else(|| header_value(&example.response_headers, "Content-Type").map(str::to_string))
        .unwrap_or_else(|| ANY_CONTENT.to_string())
}

/// Sets `examples[<desc>] = {summary, value}` on a content node. A later
/// example with the same description overwrites the value instead of
/// duplicating the entry.
fn insert_example_value(content: &mut DocumentTree, description: &str, raw_body: &str) {
    let examples = get_or_insert_path(content, &["examples"]);
    examples.insert(
        description.to_string(),
        json!({
            "summary": description,
            "value": parse_body(raw_body),
        }),
    );
}

/// Parses a recorded body as JSON; bodies that are not valid JSON are kept
/// as raw strings (absence/odd data is never an error).
fn parse_body(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Pushes a parameter unless one with the same name and location exists.
fn push_unique(list: &mut Vec<Value>, param: Value) {
    let duplicate = list
        .iter()
        .any(|existing| existing.get("name") == param.get("name") && existing.get("in") == param.get("in"));
    if !duplicate {
        list.push(param);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::HeaderMap;
    use crate::registry::Action;
    use crate::template::infer;
    use pretty_assertions::assert_eq;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.to_string(), Value::String(value.to_string()));
        }
        map
    }

    fn pokemon_action() -> Action {
        let inference = infer("/pokemons/1", &[("id".to_string(), "1".to_string())]);
        Action::new(
            None,
            Some("Returns a Pokemon".to_string()),
            "GET",
            inference.template,
            inference.params,
            Vec::new(),
        )
        .unwrap()
    }

    fn pokemon_example() -> ExampleRecord {
        ExampleRecord {
            description: "Returns a Pokemon".to_string(),
            request_headers: HeaderMap::new(),
            request_body: String::new(),
            request_content_type: None,
            request_schema: None,
            response_status: 200,
            response_headers: HeaderMap::new(),
            response_body: r#"{"id":1,"name":"Pikachu"}"#.to_string(),
            response_content_type: None,
            response_schema: None,
        }
    }

    #[test]
    fn test_find_or_add_inserts_then_finds() {
        let mut node = DocumentTree::new();

        find_or_add(&mut node, "key", json!("first"));
        let found = find_or_add(&mut node, "key", json!("second"));

        assert_eq!(found, &json!("first"));
        assert_eq!(node.len(), 1);
    }

    #[test]
    fn test_find_or_add_is_idempotent() {
        let mut node = DocumentTree::new();
        find_or_add(&mut node, "a", json!({"x": 1}));
        let before = node.clone();

        find_or_add(&mut node, "a", json!({"x": 1}));

        assert_eq!(node, before);
    }

    #[test]
    fn test_get_or_insert_path_builds_nesting() {
        let mut node = DocumentTree::new();
        let inner = get_or_insert_path(&mut node, &["a", "b", "c"]);
        inner.insert("leaf".to_string(), json!(1));

        assert_eq!(node["a"]["b"]["c"]["leaf"], json!(1));
    }

    #[test]
    fn test_get_or_insert_path_keeps_existing_siblings() {
        let mut node = DocumentTree::new();
        get_or_insert_path(&mut node, &["a", "b"]).insert("x".to_string(), json!(1));
        get_or_insert_path(&mut node, &["a", "c"]).insert("y".to_string(), json!(2));

        assert_eq!(node["a"]["b"]["x"], json!(1));
        assert_eq!(node["a"]["c"]["y"], json!(2));
    }

    #[test]
    fn test_pokemon_scenario() {
        let config = DocConfig::default();
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();

        builder.add_example(&action, &pokemon_example());
        let tree = builder.into_tree();

        let method = &tree["/pokemons/{id}"]["get"];
        assert_eq!(method["description"], json!("Returns a Pokemon"));

        let params = method["parameters"].as_array().unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0]["name"], json!("id"));
        assert_eq!(params[0]["in"], json!("path"));
        assert_eq!(params[0]["required"], json!(true));
        assert_eq!(params[0]["schema"]["type"], json!("number"));

        // No request body recorded, so no requestBody node
        assert!(method.get("requestBody").is_none());

        assert_eq!(
            method["responses"]["200"]["content"]["any"]["examples"]["Returns a Pokemon"]["value"],
            json!({"id": 1, "name": "Pikachu"})
        );
    }

    #[test]
    fn test_request_body_under_accept_content_type() {
        let config = DocConfig::default();
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();

        let mut example = pokemon_example();
        example.description = "Creates a Pokemon".to_string();
        example.request_headers = headers(&[("Accept", "application/json")]);
        example.request_body = r#"{"name":"Pikachu","type":"Electric"}"#.to_string();

        builder.add_example(&action, &example);
        let tree = builder.into_tree();

        let value = &tree["/pokemons/{id}"]["get"]["requestBody"]["content"]
            ["application/json"]["examples"]["Creates a Pokemon"]["value"];
        assert_eq!(value, &json!({"name": "Pikachu", "type": "Electric"}));
    }

    #[test]
    fn test_repeated_folding_converges() {
        let config = DocConfig::default();
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();
        let example = pokemon_example();

        builder.add_example(&action, &example);
        let first = builder.tree().clone();

        builder.add_example(&action, &example);

        assert_eq!(builder.tree(), &first);
    }

    #[test]
    fn test_header_parameter_dedup() {
        let config =
            DocConfig::default().with_headers_whitelist(vec!["X-Auth-Token".to_string()]);
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();

        let mut example = pokemon_example();
        example.request_headers = headers(&[("X-Auth-Token", "abc"), ("Other", "x")]);

        builder.add_example(&action, &example);
        builder.add_example(&action, &example);
        let tree = builder.into_tree();

        let params = tree["/pokemons/{id}"]["get"]["parameters"].as_array().unwrap().clone();
        let header_params: Vec<&Value> =
            params.iter().filter(|p| p["in"] == json!("header")).collect();

        // Whitelisted header appears exactly once; non-whitelisted not at all
        assert_eq!(header_params.len(), 1);
        assert_eq!(header_params[0]["name"], json!("X-Auth-Token"));
        assert_eq!(header_params[0]["example"], json!("abc"));
    }

    #[test]
    fn test_whitelist_is_case_sensitive_for_parameters() {
        let config =
            DocConfig::default().with_headers_whitelist(vec!["X-Auth-Token".to_string()]);
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();

        let mut example = pokemon_example();
        example.request_headers = headers(&[("x-auth-token", "abc")]);

        builder.add_example(&action, &example);
        let tree = builder.into_tree();

        let params = tree["/pokemons/{id}"]["get"]["parameters"].as_array().unwrap().clone();
        assert!(params.iter().all(|p| p["in"] != json!("header")));
    }

    #[test]
    fn test_schema_refs_attached() {
        let config = DocConfig::default();
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();

        let mut example = pokemon_example();
        example.request_headers = headers(&[("Accept", "application/json")]);
        example.request_body = r#"{"name":"Pikachu"}"#.to_string();
        example.request_schema = Some("pokemon_create".to_string());
        example.response_schema = Some("pokemon".to_string());

        builder.add_example(&action, &example);
        let tree = builder.into_tree();

        let method = &tree["/pokemons/{id}"]["get"];
        assert_eq!(
            method["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            json!("schemas/requests/pokemon_create.json")
        );
        assert_eq!(
            method["responses"]["200"]["content"]["any"]["schema"]["$ref"],
            json!("schemas/responses/pokemon.json")
        );
    }

    #[test]
    fn test_no_schema_field_without_schema_ref() {
        let config = DocConfig::default();
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();

        builder.add_example(&action, &pokemon_example());
        let tree = builder.into_tree();

        let content = &tree["/pokemons/{id}"]["get"]["responses"]["200"]["content"]["any"];
        assert!(content.get("schema").is_none());
    }

    #[test]
    fn test_empty_response_body_creates_status_without_content() {
        let config = DocConfig::default();
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();

        let mut example = pokemon_example();
        example.response_status = 204;
        example.response_body = String::new();

        builder.add_example(&action, &example);
        let tree = builder.into_tree();

        let response = &tree["/pokemons/{id}"]["get"]["responses"]["204"];
        assert!(response.is_object());
        assert!(response.get("content").is_none());
    }

    #[test]
    fn test_response_content_key_prefers_recorded_content_type() {
        let mut example = pokemon_example();
        example.response_content_type = Some("application/vnd.api+json".to_string());
        example.response_headers = headers(&[("Content-Type", "text/plain")]);
        assert_eq!(response_content_key(&example), "application/vnd.api+json");

        example.response_content_type = None;
        assert_eq!(response_content_key(&example), "text/plain");

        example.response_headers = HeaderMap::new();
        assert_eq!(response_content_key(&example), "any");
    }

    #[test]
    fn test_non_json_body_kept_as_raw_string() {
        let config = DocConfig::default();
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();

        let mut example = pokemon_example();
        example.response_body = "pika pika".to_string();

        builder.add_example(&action, &example);
        let tree = builder.into_tree();

        assert_eq!(
            tree["/pokemons/{id}"]["get"]["responses"]["200"]["content"]["any"]["examples"]
                ["Returns a Pokemon"]["value"],
            json!("pika pika")
        );
    }

    #[test]
    fn test_two_descriptions_two_example_entries() {
        let config = DocConfig::default();
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();

        let first = pokemon_example();
        let mut second = pokemon_example();
        second.description = "Returns another Pokemon".to_string();
        second.response_body = r#"{"id":2,"name":"Raichu"}"#.to_string();

        builder.add_example(&action, &first);
        builder.add_example(&action, &second);
        let tree = builder.into_tree();

        let examples = tree["/pokemons/{id}"]["get"]["responses"]["200"]["content"]["any"]
            ["examples"]
            .as_object()
            .unwrap()
            .clone();
        assert_eq!(examples.len(), 2);

        // First-insertion order is preserved
        let keys: Vec<&String> = examples.keys().collect();
        assert_eq!(keys, vec!["Returns a Pokemon", "Returns another Pokemon"]);
    }

    #[test]
    fn test_same_description_overwrites_value() {
        let config = DocConfig::default();
        let mut builder = DocumentTreeBuilder::new(&config);
        let action = pokemon_action();

        let first = pokemon_example();
        let mut second = pokemon_example();
        second.response_body = r#"{"id":1,"name":"Pikachu","level":5}"#.to_string();

        builder.add_example(&action, &first);
        builder.add_example(&action, &second);
        let tree = builder.into_tree();

        let examples = tree["/pokemons/{id}"]["get"]["responses"]["200"]["content"]["any"]
            ["examples"]
            .as_object()
            .unwrap()
            .clone();
        assert_eq!(examples.len(), 1);
        assert_eq!(
            examples["Returns a Pokemon"]["value"],
            json!({"id": 1, "name": "Pikachu", "level": 5})
        );
    }
}
