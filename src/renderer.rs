//! Markdown rendering of the accumulated registry.
//!
//! Walks resources, actions and examples and emits an API Blueprint style
//! markdown document: resource headings, parameter and attribute blocks, and
//! per-example request/response sections with whitelist-filtered header
//! blocks and pretty-printed JSON bodies.

use crate::attribute;
use crate::config::DocConfig;
use crate::record::{value_as_string, ExampleRecord, HeaderMap};
use crate::registry::{Action, Resource, ResourceRegistry};
use anyhow::{Context, Result};
use log::debug;
use std::fs;

/// Renders the whole registry to markdown.
///
/// # Errors
///
/// Returns an error when a file-backed (`*.md`) description cannot be read
/// from the configured description folder.
pub fn render_markdown(registry: &ResourceRegistry, config: &DocConfig) -> Result<String> {
    debug!("Rendering {} resources to markdown", registry.resources().len());

    let mut out = String::new();
    for resource in registry.resources() {
        render_resource(&mut out, resource, config)?;
    }
    Ok(out)
}

/// Prefixes every line of `text` with `spaces` spaces.
pub fn indent_lines(spaces: usize, text: &str) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolves a description: a value ending in `.md` is read from the
/// configured description folder, anything else is returned verbatim.
pub fn resolve_description(desc: &str, config: &DocConfig) -> Result<String> {
    if desc.ends_with(".md") {
        let path = config.desc_folder.join(desc);
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read description file: {}", path.display()))
    } else {
        Ok(desc.to_string())
    }
}

fn render_resource(out: &mut String, resource: &Resource, config: &DocConfig) -> Result<()> {
    if let Some(group) = &resource.group {
        out.push_str(&format!("# Group {}\n\n", group));
    }
    out.push_str(&format!("## {}", resource.name));
    if let Some(endpoint) = &resource.endpoint {
        out.push_str(&format!(" [{}]", endpoint));
    }
    out.push_str("\n\n");

    if let Some(desc) = &resource.description {
        out.push_str(&resolve_description(desc, config)?);
        out.push_str("\n\n");
    }

    for action in &resource.actions {
        render_action(out, action, config)?;
    }
    Ok(())
}

fn render_action(out: &mut String, action: &Action, config: &DocConfig) -> Result<()> {
    out.push_str(&format!(
        "### {} [{} {}]\n\n",
        action.name,
        action.verb.as_str(),
        action.path_template
    ));

    if let Some(desc) = &action.description {
        out.push_str(&resolve_description(desc, config)?);
        out.push_str("\n\n");
    }

    if !action.uri_params.is_empty() {
        out.push_str("+ Parameters\n\n");
        for param in &action.uri_params {
            let rendered = attribute::render(
                &attribute::AttributeSpec {
                    name: param.name.clone(),
                    attr_type: param.param_type.as_str().to_string(),
                    example: Some(param.example.clone()),
                    required: param.requirement == crate::template::Requirement::Required,
                    ..Default::default()
                },
            );
            out.push_str(&indent_lines(4, &rendered));
            out.push('\n');
        }
        out.push('\n');
    }

    if !action.attributes.is_empty() {
        out.push_str("+ Attributes\n\n");
        for attr in &action.attributes {
            out.push_str(&indent_lines(4, &attribute::render_tree(attr)));
            out.push('\n');
        }
        out.push('\n');
    }

    for example in &action.examples {
        render_example(out, action, example, config);
    }
    Ok(())
}

fn render_example(out: &mut String, action: &Action, example: &ExampleRecord, config: &DocConfig) {
    out.push_str(&format!("+ Request {}\n", example.description));
    out.push_str(&format!(
        "**{}**&nbsp;&nbsp;`{}`\n\n",
        action.verb.as_str(),
        action.path_template
    ));

    render_headers(out, &example.request_headers, config, false);
    render_body(out, &example.request_body);

    out.push_str(&format!("+ Response {}\n\n", example.response_status));
    render_headers(out, &example.response_headers, config, true);
    render_body(out, &example.response_body);
}

/// Renders a `+ Headers` block with whitelist-filtered headers, sorted by
/// name for stable output. The response `Content-Type` is always shown.
fn render_headers(out: &mut String, headers: &HeaderMap, config: &DocConfig, is_response: bool) {
    let mut lines: Vec<String> = headers
        .iter()
        .filter(|(name, _)| {
            config.header_whitelisted(name) || (is_response && name.as_str() == "Content-Type")
        })
        .map(|(name, value)| format!("{}: {}", name, value_as_string(value)))
        .collect();
    lines.sort();

    out.push_str("    + Headers\n\n");
    for line in lines {
        out.push_str(&indent_lines(12, &line));
        out.push('\n');
    }
    out.push('\n');
}

/// Renders a `+ Body` block; JSON bodies are pretty-printed, anything else
/// is emitted verbatim. Empty bodies render no block.
fn render_body(out: &mut String, raw: &str) {
    if raw.is_empty() {
        return;
    }

    let formatted = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    };

    out.push_str("    + Body\n\n");
    out.push_str(&indent_lines(12, &formatted));
    out.push_str("\n\n");
}
