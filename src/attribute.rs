//! Documented attributes and their markdown rendering.
//!
//! An [`AttributeSpec`] describes one field of a request or response body the
//! way the test author documented it. Rendering is pure and total: malformed
//! combinations are not validated, they simply render through whichever
//! branch matches.

use serde_json::Value;

/// A default value that is either a literal or deferred until rendering.
///
/// Deferred defaults cover values that are only meaningful at render time
/// (timestamps, generated identifiers). `resolve` is the single way to
/// observe either variant.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// A plain literal default
    Literal(Value),
    /// A zero-argument thunk invoked at resolution time
    Thunk(fn() -> Value),
}

impl DefaultValue {
    /// Resolve to a concrete value, invoking the thunk if deferred
    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Thunk(thunk) => thunk(),
        }
    }
}

/// One enum member of an attribute.
#[derive(Debug, Clone, Default)]
pub struct Member {
    /// Member name as it appears on the wire
    pub name: String,
    /// Optional member description
    pub description: Option<String>,
}

/// One documented field of a request or response body.
///
/// `children` present means composite (object/array) rendering; absent means
/// scalar rendering. `members` turns the printed type into `enum[<type>]`.
#[derive(Debug, Clone, Default)]
pub struct AttributeSpec {
    /// Field name
    pub name: String,
    /// Declared type (normalized at render time)
    pub attr_type: String,
    /// One-line description
    pub description: Option<String>,
    /// Extra free-form description rendered on its own line
    pub additional_description: Option<String>,
    /// Default value, literal or deferred
    pub default: Option<DefaultValue>,
    /// Example value rendered inline
    pub example: Option<String>,
    /// Whether the field is required
    pub required: bool,
    /// Enum members, when the field is an enumeration
    pub members: Vec<Member>,
    /// Nested attributes; presence selects composite rendering
    pub children: Vec<AttributeSpec>,
}

impl AttributeSpec {
    /// Create a scalar attribute with the given name and type
    pub fn new(name: impl Into<String>, attr_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attr_type: attr_type.into(),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the additional description line
    pub fn with_additional_description(mut self, description: impl Into<String>) -> Self {
        self.additional_description = Some(description.into());
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the inline example
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Mark the attribute required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Add an enum member
    pub fn with_member(mut self, name: impl Into<String>, description: Option<String>) -> Self {
        self.members.push(Member {
            name: name.into(),
            description,
        });
        self
    }

    /// Add a nested child attribute
    pub fn with_child(mut self, child: AttributeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// The type as printed: normalized, and wrapped in `enum[..]` when the
    /// attribute has members.
    pub fn printed_type(&self) -> String {
        let normalized = normalize_type(&self.attr_type);
        if self.members.is_empty() {
            normalized.to_string()
        } else {
            format!("enum[{}]", normalized)
        }
    }
}

/// Normalizes a declared type name: numeric aliases collapse to `number`,
/// `hash` becomes `object`, everything else passes through unchanged.
pub fn normalize_type(attr_type: &str) -> &str {
    match attr_type {
        "integer" | "double" | "float" => "number",
        "hash" => "object",
        other => other,
    }
}

/// Extracts the base type from a printed `enum[<type>]` string, if the
/// string has that shape.
pub fn enum_base_type(printed: &str) -> Option<&str> {
    printed.strip_prefix("enum[")?.strip_suffix(']')
}

/// Renders a single attribute into a markdown fragment.
///
/// Composite attributes (those with children) render only their header line;
/// indenting and rendering the children is the caller's responsibility (see
/// [`render_tree`]). Leaf attributes render the main line plus any optional
/// detail lines.
pub fn render(attr: &AttributeSpec) -> String {
    if attr.children.is_empty() {
        render_leaf(attr)
    } else {
        render_composite_header(attr)
    }
}

/// Renders an attribute and its children recursively, indenting each nesting
/// level by four spaces.
pub fn render_tree(attr: &AttributeSpec) -> String {
    let mut lines = vec![render(attr)];
    for child in &attr.children {
        let rendered = render_tree(child);
        for line in rendered.lines() {
            lines.push(format!("    {}", line));
        }
    }
    lines.join("\n")
}

fn render_composite_header(attr: &AttributeSpec) -> String {
    format!("+ {} ({})", attr.name, requirement_word(attr.required))
}

fn render_leaf(attr: &AttributeSpec) -> String {
    let mut lines = vec![main_line(attr)];

    if let Some(additional) = &attr.additional_description {
        lines.push(format!("    {}", additional));
    }
    if let Some(default) = &attr.default {
        lines.push(format!(
            "    Default: {}",
            crate::record::value_as_string(&default.resolve())
        ));
    }
    if !attr.members.is_empty() {
        lines.push("    + Members".to_string());
        for member in &attr.members {
            match &member.description {
                Some(desc) => lines.push(format!("        + `{}` - {}", member.name, desc)),
                None => lines.push(format!("        + `{}`", member.name)),
            }
        }
    }

    lines.join("\n")
}

fn main_line(attr: &AttributeSpec) -> String {
    let mut line = format!("+ {}:", attr.name);
    if let Some(example) = &attr.example {
        line.push_str(&format!(" `{}`", example));
    }
    line.push_str(&format!(
        " ({}, {})",
        attr.printed_type(),
        requirement_word(attr.required)
    ));
    if let Some(description) = &attr.description {
        line.push_str(&format!(" - {}", description));
    }
    line
}

fn requirement_word(required: bool) -> &'static str {
    if required {
        "required"
    } else {
        "optional"
    }
}
