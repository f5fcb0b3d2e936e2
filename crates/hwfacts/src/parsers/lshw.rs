//! Flattener for `lshw -json` output.
//!
//! lshw prints a tree of nodes (`class`, `id`, `product`, ..., `children`).
//! Nodes are visited depth-first in print order and each one becomes a
//! record of facts keyed by its class and id. The node taxonomy is lshw's;
//! nothing here interprets it.

use crate::error::{ProbeError, Result};
use crate::facts::Fact;
use serde_json::Value;

/// Node key -> attribute name, in emission order.
const NODE_FIELDS: &[(&str, &str)] = &[
    ("product", "name"),
    ("vendor", "vendor"),
    ("version", "version"),
    ("serial", "serial"),
    ("description", "description"),
    ("slot", "slot"),
    ("businfo", "businfo"),
    ("logicalname", "logical_name"),
    ("size", "size"),
    ("capacity", "capacity"),
    ("clock", "clock"),
    ("width", "width"),
];

/// Parse and flatten an lshw JSON document.
/// The root may be a single object or (newer lshw) an array of objects.
pub fn parse_lshw(text: &str) -> Result<Vec<Fact>> {
    let root: Value = serde_json::from_str(text).map_err(|e| {
        ProbeError::mismatch("lshw", format!("invalid JSON at line {}: {}", e.line(), e))
    })?;

    let mut facts = Vec::new();
    match &root {
        Value::Array(nodes) => {
            for node in nodes {
                flatten_node(node, true, &mut facts);
            }
        }
        Value::Object(_) => flatten_node(&root, true, &mut facts),
        _ => return Err(ProbeError::mismatch("lshw", "root is not a node")),
    }
    Ok(facts)
}

fn flatten_node(node: &Value, is_root: bool, facts: &mut Vec<Fact>) {
    let class = node.get("class").and_then(Value::as_str);
    let id = node.get("id").and_then(Value::as_str);

    if let (Some(class), Some(id)) = (class, id) {
        // The root system node describes the product itself; interfaces
        // are known by their name everywhere else in the output
        let resource = match class {
            "system" if is_root => "product",
            "network" => first_logical_name(node).unwrap_or(id),
            _ => id,
        };
        facts.extend(
            node_attributes(node)
                .into_iter()
                .map(|(attr, value)| Fact::new(class, resource, attr, value)),
        );
    }

    if let Some(children) = node.get("children").and_then(Value::as_array) {
        for child in children {
            flatten_node(child, false, facts);
        }
    }
}

fn first_logical_name(node: &Value) -> Option<&str> {
    match node.get("logicalname")? {
        Value::Array(names) => names.iter().find_map(Value::as_str),
        value => value.as_str(),
    }
    .map(str::trim)
    .filter(|name| !name.is_empty())
}

fn node_attributes(node: &Value) -> Vec<(String, String)> {
    let mut attrs = Vec::new();

    for (key, attr) in NODE_FIELDS {
        match node.get(*key) {
            Some(Value::Array(items)) => {
                attrs.extend(
                    items
                        .iter()
                        .filter_map(scalar)
                        .map(|v| (attr.to_string(), v)),
                );
            }
            Some(value) => {
                if let Some(v) = scalar(value) {
                    attrs.push((attr.to_string(), v));
                }
            }
            None => {}
        }
    }

    if let Some(config) = node.get("configuration").and_then(Value::as_object) {
        for (key, value) in config {
            if let Some(v) = scalar(value) {
                attrs.push((key.clone(), v));
            }
        }
    }

    attrs
}

/// String form of a scalar JSON value; objects, arrays and null have none.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
