//! Resources, Actions and the registry that accumulates them.
//!
//! A Resource groups the Actions documented under one name (all actions of
//! "Pokemons", say); an Action is one (verb, path template) endpoint with its
//! parameters, attributes and recorded examples. The registry only grows
//! during a run and is read once by the renderer at the end.

use crate::attribute::AttributeSpec;
use crate::error::{Error, Result};
use crate::record::{ExampleRecord, InteractionMeta};
use crate::template::UriParam;
use log::debug;
use std::str::FromStr;

/// Recognized HTTP verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
    /// HTTP HEAD method
    Head,
    /// HTTP OPTIONS method
    Options,
}

impl Verb {
    /// Uppercase name, as shown in rendered output
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Head => "HEAD",
            Verb::Options => "OPTIONS",
        }
    }

    /// Lowercase name, used as the method key in the document tree
    pub fn doc_key(self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
            Verb::Head => "head",
            Verb::Options => "options",
        }
    }
}

impl FromStr for Verb {
    type Err = Error;

    /// Case-insensitive parse; anything outside the recognized set is an
    /// [`Error::InvalidVerb`].
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "PATCH" => Ok(Verb::Patch),
            "DELETE" => Ok(Verb::Delete),
            "HEAD" => Ok(Verb::Head),
            "OPTIONS" => Ok(Verb::Options),
            _ => Err(Error::InvalidVerb(s.to_string())),
        }
    }
}

/// One documented endpoint: a verb plus a path template, with everything
/// accumulated for it.
#[derive(Debug, Clone)]
pub struct Action {
    /// Display name (falls back to "VERB template" when not provided)
    pub name: String,
    /// Action description (verbatim, or a `*.md` file name)
    pub description: Option<String>,
    /// HTTP verb
    pub verb: Verb,
    /// Parameterized path, e.g. `/pokemons/{id}`
    pub path_template: String,
    /// Path parameters; names equal the template's placeholders
    pub uri_params: Vec<UriParam>,
    /// Documented body attributes
    pub attributes: Vec<AttributeSpec>,
    /// Recorded examples, in recording order
    pub examples: Vec<ExampleRecord>,
}

impl Action {
    /// Construct an Action, validating the verb.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVerb`] when `verb` is not a recognized HTTP
    /// method. The caller must reject the offending interaction; nothing is
    /// registered for it.
    pub fn new(
        name: Option<String>,
        description: Option<String>,
        verb: &str,
        path_template: String,
        uri_params: Vec<UriParam>,
        attributes: Vec<AttributeSpec>,
    ) -> Result<Self> {
        let verb = Verb::from_str(verb)?;
        let name = name.unwrap_or_else(|| format!("{} {}", verb.as_str(), path_template));

        Ok(Self {
            name,
            description,
            verb,
            path_template,
            uri_params,
            attributes,
            examples: Vec::new(),
        })
    }
}

/// A named group of Actions.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Resource name (identity, together with the group)
    pub name: String,
    /// Optional group the resource is rendered under
    pub group: Option<String>,
    /// Resource description (verbatim, or a `*.md` file name)
    pub description: Option<String>,
    /// Endpoint note shown in the rendered output
    pub endpoint: Option<String>,
    /// Actions in first-seen order
    pub actions: Vec<Action>,
}

impl Resource {
    fn from_meta(meta: &InteractionMeta) -> Self {
        Self {
            name: meta.resource_name.clone(),
            group: meta.resource_group.clone(),
            description: meta.resource_desc.clone(),
            endpoint: meta.resource_endpoint.clone(),
            actions: Vec::new(),
        }
    }
}

/// Grow-only registry of Resources, the top-level accumulation unit.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
}

impl ResourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// All resources, in first-seen order
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Whether any resource has been registered
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Finds the Resource identified by the metadata's name+group, creating
    /// it on first sight, then finds the Action identified by verb+template
    /// inside it, constructing it via `factory` on first sight.
    ///
    /// Returns the (possibly pre-existing) Action so the caller can append
    /// the new example to it.
    ///
    /// # Errors
    ///
    /// Propagates the factory's error; nothing is inserted in that case.
    pub fn upsert_action<F>(
        &mut self,
        meta: &InteractionMeta,
        verb: Verb,
        path_template: &str,
        factory: F,
    ) -> Result<&mut Action>
    where
        F: FnOnce() -> Result<Action>,
    {
        let resource = self.upsert_resource(meta);

        if let Some(pos) = resource
            .actions
            .iter()
            .position(|a| a.verb == verb && a.path_template == path_template)
        {
            return Ok(&mut resource.actions[pos]);
        }

        debug!("Registering action: {} {}", verb.as_str(), path_template);
        let action = factory()?;
        let pos = resource.actions.len();
        resource.actions.push(action);
        Ok(&mut resource.actions[pos])
    }

    fn upsert_resource(&mut self, meta: &InteractionMeta) -> &mut Resource {
        if let Some(pos) = self
            .resources
            .iter()
            .position(|r| r.name == meta.resource_name && r.group == meta.resource_group)
        {
            return &mut self.resources[pos];
        }

        debug!("Registering resource: {}", meta.resource_name);
        let pos = self.resources.len();
        self.resources.push(Resource::from_meta(meta));
        &mut self.resources[pos]
    }
}
