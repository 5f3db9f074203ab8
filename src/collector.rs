//! Glue between recorded interactions and the accumulated output.
//!
//! One [`DocumentCollector`] lives for the duration of a suite run. Every
//! recorded interaction is fed through [`DocumentCollector::record`], which
//! normalizes it, resolves its Action, appends the example and folds it into
//! the document tree. At the end the registry and tree are handed to the
//! renderer.

use crate::config::DocConfig;
use crate::document::{DocumentTree, DocumentTreeBuilder};
use crate::error::Result;
use crate::record::{ExampleRecord, RecordedInteraction};
use crate::registry::{Action, ResourceRegistry, Verb};
use crate::template::infer;
use log::debug;

/// Accumulates the resource registry and document tree for one run.
pub struct DocumentCollector<'a> {
    registry: ResourceRegistry,
    builder: DocumentTreeBuilder<'a>,
}

impl<'a> DocumentCollector<'a> {
    /// Create a collector with empty state
    pub fn new(config: &'a DocConfig) -> Self {
        Self {
            registry: ResourceRegistry::new(),
            builder: DocumentTreeBuilder::new(config),
        }
    }

    /// Processes one recorded interaction.
    ///
    /// Resolves the Action (verb + path template, inferred from the request
    /// or taken from explicit metadata overrides), appends the example to it
    /// and merges it into the document tree.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidVerb`] when the interaction's
    /// verb is not a recognized HTTP method. The interaction is rejected:
    /// nothing is registered and the tree is untouched. The caller decides
    /// whether to log and continue or abort the run.
    pub fn record(&mut self, interaction: &RecordedInteraction) -> Result<()> {
        let meta = &interaction.metadata;
        let example = ExampleRecord::from_interaction(interaction);

        let verb_str = meta
            .action_verb
            .as_deref()
            .unwrap_or(&interaction.request.method);
        let verb: Verb = verb_str.parse()?;

        let inference = infer(
            interaction.request.concrete_path(),
            &interaction.request.path_bindings(),
        );
        let template = meta.action_path.clone().unwrap_or(inference.template);
        let params = meta.action_params.clone().unwrap_or(inference.params);

        debug!(
            "Recording interaction '{}' as {} {}",
            example.description,
            verb.as_str(),
            template
        );

        let factory_template = template.clone();
        let action = self.registry.upsert_action(meta, verb, &template, || {
            Action::new(
                meta.action_name.clone(),
                meta.action_desc.clone(),
                verb_str,
                factory_template,
                params,
                meta.attributes.clone(),
            )
        })?;

        action.examples.push(example.clone());
        self.builder.add_example(action, &example);
        Ok(())
    }

    /// The registry built so far
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// The document tree built so far
    pub fn tree(&self) -> &DocumentTree {
        self.builder.tree()
    }

    /// Consume the collector, yielding the registry and the finished tree
    pub fn into_parts(self) -> (ResourceRegistry, DocumentTree) {
        (self.registry, self.builder.into_tree())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pokemon_interaction() -> RecordedInteraction {
        serde_json::from_value(json!({
            "request": {
                "method": "GET",
                "path": "/pokemons/1",
                "path_params": {"id": "1"}
            },
            "response": {
                "status": 200,
                "body": "{\"id\":1,\"name\":\"Pikachu\"}"
            },
            "metadata": {
                "description": "Returns a Pokemon",
                "resource_name": "Pokemons"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_record_builds_registry_and_tree() {
        let config = DocConfig::default();
        let mut collector = DocumentCollector::new(&config);

        collector.record(&pokemon_interaction()).unwrap();
        let (registry, tree) = collector.into_parts();

        assert_eq!(registry.resources().len(), 1);
        let resource = &registry.resources()[0];
        assert_eq!(resource.name, "Pokemons");
        assert_eq!(resource.actions.len(), 1);

        let action = &resource.actions[0];
        assert_eq!(action.path_template, "/pokemons/{id}");
        assert_eq!(action.examples.len(), 1);

        assert_eq!(
            tree["/pokemons/{id}"]["get"]["responses"]["200"]["content"]["any"]["examples"]
                ["Returns a Pokemon"]["value"],
            json!({"id": 1, "name": "Pikachu"})
        );
    }

    #[test]
    fn test_same_endpoint_accumulates_one_action() {
        let config = DocConfig::default();
        let mut collector = DocumentCollector::new(&config);

        let mut second = pokemon_interaction();
        second.request.path = "/pokemons/2".to_string();
        second.request.path_params = serde_json::from_value(json!({"id": "2"})).unwrap();
        second.metadata.description = "Returns a different Pokemon".to_string();

        collector.record(&pokemon_interaction()).unwrap();
        collector.record(&second).unwrap();
        let (registry, tree) = collector.into_parts();

        let resource = &registry.resources()[0];
        assert_eq!(resource.actions.len(), 1);
        assert_eq!(resource.actions[0].examples.len(), 2);

        let examples = tree["/pokemons/{id}"]["get"]["responses"]["200"]["content"]["any"]
            ["examples"]
            .as_object()
            .unwrap()
            .clone();
        assert_eq!(examples.len(), 2);
    }

    #[test]
    fn test_invalid_verb_rejects_interaction() {
        let config = DocConfig::default();
        let mut collector = DocumentCollector::new(&config);

        let mut interaction = pokemon_interaction();
        interaction.request.method = "TELEPORT".to_string();

        let result = collector.record(&interaction);
        assert!(matches!(result, Err(Error::InvalidVerb(_))));
        assert!(collector.tree().is_empty());
    }

    #[test]
    fn test_verb_override_wins_over_request_method() {
        let config = DocConfig::default();
        let mut collector = DocumentCollector::new(&config);

        let mut interaction = pokemon_interaction();
        interaction.metadata.action_verb = Some("head".to_string());

        collector.record(&interaction).unwrap();
        let (_, tree) = collector.into_parts();

        assert!(tree["/pokemons/{id}"].get("head").is_some());
        assert!(tree["/pokemons/{id}"].get("get").is_none());
    }

    #[test]
    fn test_path_override_wins_over_inference() {
        let config = DocConfig::default();
        let mut collector = DocumentCollector::new(&config);

        let mut interaction = pokemon_interaction();
        interaction.metadata.action_path = Some("/pokemons/{pokemon_id}".to_string());

        collector.record(&interaction).unwrap();
        let (registry, tree) = collector.into_parts();

        assert_eq!(
            registry.resources()[0].actions[0].path_template,
            "/pokemons/{pokemon_id}"
        );
        assert!(tree.contains_key("/pokemons/{pokemon_id}"));
    }

    #[test]
    fn test_recording_same_interaction_twice_keeps_tree_shape() {
        let config = DocConfig::default();
        let mut collector = DocumentCollector::new(&config);
        let interaction = pokemon_interaction();

        collector.record(&interaction).unwrap();
        let first = collector.tree().clone();
        collector.record(&interaction).unwrap();

        assert_eq!(collector.tree(), &first);
    }
}
