//! Connection parsing and the strong/feedback edge split.
//!
//! A connection's `from`/`to` endpoints are dot-separated references:
//! `component` or `component.output`. The network builds one [`Connection`]
//! per configured link; every connection whose target is a `LaggedValue`
//! component is marked as a feedback edge and excluded from the strong
//! subgraph the scheduler orders.

use std::collections::HashMap;

use crate::components::Component;
use crate::error::{BasinflowError, Result};

#[derive(Debug, Clone)]
pub struct Connection {
    pub source: String,
    pub source_output: String,
    pub target: String,
    pub target_input: String,
    pub is_feedback: bool,
}

/// A raw `from`/`to` pair as written in a model's connection list, before
/// resolution against the concrete set of components.
#[derive(Debug, Clone)]
pub struct RawConnection {
    pub from: String,
    pub to: String,
}

fn split_ref(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('.') {
        Some((component, rest)) => (component, Some(rest)),
        None => (reference, None),
    }
}

/// Resolves raw `component`/`component.output` connection endpoints against
/// a concrete component set, filling in default outputs where the source
/// side omits one, and flags feedback edges by destination component type.
pub fn resolve_connections(
    components: &HashMap<String, Component>,
    raw: &[RawConnection],
) -> Result<Vec<Connection>> {
    let mut connections = Vec::with_capacity(raw.len());

    for link in raw {
        let (source_name, source_output) = split_ref(&link.from);
        let source = components
            .get(source_name)
            .ok_or_else(|| BasinflowError::UndefinedComponent(source_name.to_string()))?;
        let source_output = match source_output {
            Some(output) => output.to_string(),
            None => source.default_output()?.to_string(),
        };
        if !source.outputs().contains_key(&source_output) {
            return Err(BasinflowError::UndefinedReference {
                component: source_name.to_string(),
                output: source_output,
            });
        }

        let (target_name, target_input) = split_ref(&link.to);
        let target = components
            .get(target_name)
            .ok_or_else(|| BasinflowError::UndefinedComponent(target_name.to_string()))?;
        let target_input = target_input.ok_or_else(|| {
            BasinflowError::Configuration(format!(
                "connection target `{}` must name an input slot, e.g. `{}.input_name`",
                link.to, target_name
            ))
        })?;

        let is_feedback = matches!(target, Component::LaggedValue(_));

        connections.push(Connection {
            source: source_name.to_string(),
            source_output,
            target: target_name.to_string(),
            target_input: target_input.to_string(),
            is_feedback,
        });
    }

    Ok(connections)
}
