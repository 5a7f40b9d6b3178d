//! Value-to-node conversion: turns one hole value into the concrete node
//! sequence that replaces the hole's current content.

use crate::build::build;
use crate::value::Value;
use tracing::{error, warn};
use web_sys::{Document, Node};

const DEPTH_LIMIT: usize = 128;

/// Composes `value` into a node sequence, recursively. Total: unrenderable
/// values degrade to an empty sequence with a diagnostic, never a failure.
///
/// `allow_template` is true for text-node holes and false for attribute
/// holes, which can only take stringifiable content.
pub(crate) fn compose(document: &Document, value: &Value, allow_template: bool) -> Vec<Node> {
	let mut nodes = Vec::new();
	compose_into(document, value, allow_template, DEPTH_LIMIT, &mut nodes);
	nodes
}

fn compose_into(document: &Document, value: &Value, allow_template: bool, depth_limit: usize, nodes: &mut Vec<Node>) {
	if depth_limit == 0 {
		return error!("depth limit reached; composing nothing");
	}

	match value {
		Value::Null => (),
		Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Text(_) => {
			let text = value.scalar_text().unwrap_or_default();
			nodes.push(document.create_text_node(&text).into());
		}
		Value::Lazy(thunk) => compose_into(document, &thunk(), allow_template, depth_limit - 1, nodes),
		Value::Template(result) if allow_template => {
			let mut inner = build(result.markup());
			match inner.apply(result.args()) {
				// The whole fragment counts as one composed node; inserting it
				// splices its children into place.
				Ok(()) => nodes.push(inner.element().clone().into()),
				Err(error) => error!(%error, "failed to apply nested template; composing nothing for it"),
			}
		}
		Value::List(values) if allow_template => {
			for value in values.iter() {
				compose_into(document, value, true, depth_limit - 1, nodes);
			}
		}
		other => warn!(value = ?other, allow_template, "value cannot be rendered here; composing nothing"),
	}
}
