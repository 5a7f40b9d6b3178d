//! Fragment instantiation and incremental re-application.
//!
//! [`build`] turns one compiled markup string into a detached
//! [***DocumentFragment***](https://developer.mozilla.org/en-US/docs/Web/API/DocumentFragment)
//! plus the ordered list of [`Binding`]s discovered by a one-time scan. The
//! returned [`Build`] is the reusable pairing for one render site: insert
//! [`Build::element`] once, then call [`Build::apply`] on every render.

use crate::compose::compose;
use crate::error::ApplyError;
use crate::template::{find_marker, TemplateResult};
use crate::value::Value;
use core::cell::RefCell;
use hashbrown::{HashMap, HashSet};
use js_sys::Function;
use std::rc::Rc;
use tracing::{error, instrument, trace, trace_span, warn};
use wasm_bindgen::{closure::Closure, JsCast, UnwrapThrowExt};
use web_sys::{Comment, Document, DocumentFragment, Element, HtmlTemplateElement, Node, Text};

thread_local! {
	/// Parsed `<template>` elements by markup string. Purely an optimisation;
	/// every [`build`] call still clones a fresh fragment out of the cached
	/// template.
	//TODO: No eviction; callers generating unbounded distinct markup strings grow this without limit.
	static TEMPLATE_CACHE: RefCell<HashMap<String, HtmlTemplateElement>> = RefCell::new(HashMap::new());
}

pub(crate) fn document() -> Document {
	web_sys::window()
		.expect_throw("weft-dom: no window available")
		.document()
		.expect_throw("weft-dom: window has no document")
}

fn parsed_template(document: &Document, markup: &str) -> HtmlTemplateElement {
	TEMPLATE_CACHE.with(|cache| {
		let mut cache = cache.borrow_mut();
		if let Some(template) = cache.get(markup) {
			return template.clone();
		}
		let template = document
			.create_element("template")
			.expect_throw("weft-dom: failed to create template element")
			.dyn_into::<HtmlTemplateElement>()
			.unwrap_throw();
		template.set_inner_html(markup);
		cache.insert(markup.to_owned(), template.clone());
		template
	})
}

/// Parses `markup` through an inert `<template>` element (scripts don't run,
/// nothing observes the parse), clones its content into a fresh detached
/// fragment and scans the clone for holes.
///
/// Malformed HTML is handled however the browser's lenient parser handles it;
/// no stricter validity is imposed here.
#[must_use]
#[instrument(skip(markup), fields(markup_len = markup.len()))]
pub fn build(markup: &str) -> Build {
	let document = document();
	let template = parsed_template(&document, markup);
	let fragment = template
		.content()
		.clone_node_with_deep(true)
		.expect_throw("weft-dom: failed to clone template content")
		.dyn_into::<DocumentFragment>()
		.unwrap_throw();

	let mut bindings = Vec::new();
	scan_node(&document, fragment.as_ref(), &mut bindings);
	let required = bindings.iter().map(|binding| binding.id).collect::<HashSet<_>>().len();
	trace!(bindings = bindings.len(), required, "scan complete");

	Build {
		element: fragment,
		bindings,
		required,
	}
}

/// Builds `result`, applies its own arguments and appends the fragment to
/// `container` — one-shot, non-reactive insertion.
///
/// The [`Build`] is still returned so the caller may keep re-applying.
pub fn render(result: &TemplateResult, container: &Element) -> Result<Build, ApplyError> {
	let mut build = build(result.markup());
	build.apply(result.args())?;
	if let Err(error) = container.append_child(build.element.as_ref()) {
		error!(?error, "failed to append rendered fragment");
	}
	Ok(build)
}

/// One markup string, instantiated: the fragment to insert plus the scanned
/// bindings that patch it in place.
///
/// Created once per logical render site and reused across that site's
/// re-renders. Dropping it drops the event listener closures it owns, after
/// which the associated listeners stop working.
#[derive(Debug)]
pub struct Build {
	element: DocumentFragment,
	bindings: Vec<Binding>,
	required: usize,
}

impl Build {
	/// The detached fragment; insert it into the live document exactly once.
	#[must_use]
	pub fn element(&self) -> &DocumentFragment {
		&self.element
	}

	/// Drives every binding with the value at its slot index, equality-gated
	/// per binding.
	///
	/// # Errors
	///
	/// [`ApplyError::MissingArguments`] when fewer values than distinct slots
	/// are supplied; [`ApplyError::Binding`] when a binding signals a genuine
	/// application failure. Surplus values are tolerated with a warning. No
	/// partial-application guarantee is made once a hard error fires mid-loop.
	///
	/// # Correct use
	///
	/// Don't call this on the same [`Build`] from within one of its own event
	/// listeners during the same tick; schedule such re-renders for the next
	/// microtask instead. Bindings mutate disjoint DOM regions, but an
	/// interleaved re-entrant apply observes the outer call half-done.
	pub fn apply(&mut self, args: &[Value]) -> Result<(), ApplyError> {
		let span = trace_span!("apply", supplied = args.len(), bindings = self.bindings.len());
		let _enter = span.enter();

		if args.len() < self.required {
			error!(required = self.required, supplied = args.len(), "too few arguments");
			return Err(ApplyError::MissingArguments {
				required: self.required,
				supplied: args.len(),
			});
		}
		if args.len() > self.required {
			warn!(required = self.required, supplied = args.len(), "surplus arguments will be ignored");
		}

		let document = document();
		for binding in &mut self.bindings {
			let value = args.get(binding.id).ok_or(ApplyError::MissingSlot { slot: binding.id })?;
			if let Err(reason) = binding.set(&document, value) {
				error!(slot = binding.id, %reason, "binding application failed");
				return Err(ApplyError::Binding { slot: binding.id, reason });
			}
		}
		Ok(())
	}
}

/// The setter for one DOM location's dynamic content. One binding exclusively
/// owns one location; several bindings may service the same slot id.
#[derive(Debug)]
struct Binding {
	id: usize,
	/// Last value applied here, for `===`-style update gating. An explicit
	/// field rather than closure state so it stays inspectable.
	last: Option<Value>,
	target: Target,
}

#[derive(Debug)]
enum Target {
	/// A text hole: dynamic nodes live strictly between `start` and `anchor`.
	Text { start: Text, anchor: Comment },
	/// An `@event` attribute hole. The attached closure keeps the live
	/// listener alive.
	Event {
		element: Element,
		name: String,
		attached: Option<Closure<dyn Fn(web_sys::Event)>>,
	},
	/// One hole of a templated attribute; all holes of that attribute share
	/// the template.
	Attribute {
		shared: Rc<RefCell<AttributeTemplate>>,
		hole: usize,
	},
}

#[derive(Debug)]
struct AttributeTemplate {
	element: Element,
	name: String,
	parts: Vec<AttributePart>,
}

#[derive(Debug)]
enum AttributePart {
	Literal(String),
	Hole(String),
}

impl AttributeTemplate {
	fn recompile(&self) -> String {
		let mut value = String::new();
		for part in &self.parts {
			match part {
				AttributePart::Literal(literal) => value.push_str(literal),
				AttributePart::Hole(current) => value.push_str(current),
			}
		}
		value
	}
}

impl Binding {
	fn new(id: usize, target: Target) -> Self {
		Self { id, last: None, target }
	}

	fn set(&mut self, document: &Document, value: &Value) -> Result<(), String> {
		let span = trace_span!("set", slot = self.id);
		let _enter = span.enter();

		if self.last.as_ref().is_some_and(|last| last.same(value)) {
			trace!("value unchanged; skipping");
			return Ok(());
		}

		match &mut self.target {
			Target::Text { start, anchor } => {
				let Some(parent) = anchor.parent_node() else {
					trace!("anchor detached; skipping");
					return Ok(());
				};
				let anchor_node: &Node = anchor.as_ref();

				while let Some(stale) = start.next_sibling() {
					if stale == *anchor_node {
						break;
					}
					if let Err(error) = parent.remove_child(&stale) {
						error!(?error, "failed to remove stale node");
						return Err("failed to remove stale node".to_owned());
					}
				}
				for node in compose(document, value, true) {
					if let Err(error) = parent.insert_before(&node, Some(anchor_node)) {
						error!(?error, "failed to insert composed node");
						return Err("failed to insert composed node".to_owned());
					}
				}
				self.last = Some(value.clone());
				Ok(())
			}

			Target::Event { element, name, attached } => {
				let Value::Listener(handler) = value else {
					trace!(event = %name, "non-listener value for event binding; ignoring");
					return Ok(());
				};
				if let Some(previous) = attached.take() {
					if let Err(error) = element.remove_event_listener_with_callback(name, previous.as_ref().unchecked_ref()) {
						error!(?error, event = %name, "failed to remove previous event listener");
					}
				}
				let handler = Rc::clone(handler);
				let listener = Closure::wrap(Box::new(move |event: web_sys::Event| handler(event)) as Box<dyn Fn(web_sys::Event)>);
				if let Err(error) = element.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref::<Function>()) {
					error!(?error, event = %name, "failed to attach event listener");
					return Err(format!("failed to attach {name:?} listener"));
				}
				*attached = Some(listener);
				self.last = Some(value.clone());
				Ok(())
			}

			Target::Attribute { shared, hole } => {
				let text = value.attribute_text().unwrap_or_else(|| {
					warn!(slot = self.id, value = ?value, "unsupported attribute value type; substituting nothing");
					String::new()
				});
				let mut template = shared.borrow_mut();
				match template.parts.get_mut(*hole) {
					Some(AttributePart::Hole(current)) => *current = text,
					_ => return Err("attribute hole out of range".to_owned()),
				}
				let compiled = template.recompile();
				if let Err(error) = template.element.set_attribute(&template.name, &compiled) {
					error!(?error, attribute = %template.name, "failed to set attribute");
					return Err(format!("failed to set attribute {:?}", template.name));
				}
				self.last = Some(value.clone());
				Ok(())
			}
		}
	}
}

/// Depth-first walk over the freshly cloned fragment, attributes before the
/// element's children.
fn scan_node(document: &Document, node: &Node, bindings: &mut Vec<Binding>) {
	if let Some(element) = node.dyn_ref::<Element>() {
		scan_attributes(element, bindings);
	}

	// Snapshot first: splitting a text node mutates the child list under us.
	let child_nodes = node.child_nodes();
	let mut children = Vec::with_capacity(child_nodes.length() as usize);
	for i in 0..child_nodes.length() {
		children.push(child_nodes.get(i).unwrap_throw());
	}

	for child in children {
		if let Some(text) = child.dyn_ref::<Text>() {
			scan_text(document, text, bindings);
		} else {
			scan_node(document, &child, bindings);
		}
	}
}

fn scan_attributes(element: &Element, bindings: &mut Vec<Binding>) {
	let attributes = element.attributes();
	let mut snapshot = Vec::with_capacity(attributes.length() as usize);
	for i in 0..attributes.length() {
		let attribute = attributes.item(i).unwrap_throw();
		snapshot.push((attribute.name(), attribute.value()));
	}

	for (name, value) in snapshot {
		if let Some(event) = name.strip_prefix('@') {
			match find_marker(&value, 0) {
				Some(marker) if marker.start == 0 && marker.end == value.len() => {
					if let Err(error) = element.remove_attribute(&name) {
						error!(?error, attribute = %name, "failed to remove event attribute");
					}
					bindings.push(Binding::new(
						marker.slot,
						Target::Event {
							element: element.clone(),
							name: event.to_owned(),
							attached: None,
						},
					));
				}
				// Left in the DOM so the mistake stays visible.
				_ => warn!(attribute = %name, value = %value, "event attribute value must be exactly one slot marker"),
			}
		} else if find_marker(&value, 0).is_some() {
			scan_templated_attribute(element, name, &value, bindings);
		}
	}
}

fn scan_templated_attribute(element: &Element, name: String, value: &str, bindings: &mut Vec<Binding>) {
	let mut parts = Vec::new();
	let mut holes = Vec::new();
	let mut position = 0;
	while let Some(marker) = find_marker(value, position) {
		if marker.start > position {
			parts.push(AttributePart::Literal(value[position..marker.start].to_owned()));
		}
		holes.push((parts.len(), marker.slot));
		parts.push(AttributePart::Hole(String::new()));
		position = marker.end;
	}
	if position < value.len() {
		parts.push(AttributePart::Literal(value[position..].to_owned()));
	}

	let shared = Rc::new(RefCell::new(AttributeTemplate {
		element: element.clone(),
		name,
		parts,
	}));
	for (hole, slot) in holes {
		bindings.push(Binding::new(
			slot,
			Target::Attribute {
				shared: Rc::clone(&shared),
				hole,
			},
		));
	}
}

fn scan_text(document: &Document, text: &Text, bindings: &mut Vec<Binding>) {
	let data = text.data();
	let Some(first) = find_marker(&data, 0) else {
		return;
	};
	let Some(parent) = text.parent_node() else {
		error!("text node with slot markers has no parent; skipping");
		return;
	};
	let text_node: &Node = text.as_ref();

	let mut position = 0;
	let mut marker = Some(first);
	while let Some(m) = marker {
		// The "before" text node is materialised even when empty; it delimits
		// the start of the replace range.
		let before = document.create_text_node(&data[position..m.start]);
		parent.insert_before(before.as_ref(), Some(text_node)).unwrap_throw();
		let anchor = document.create_comment("");
		parent.insert_before(anchor.as_ref(), Some(text_node)).unwrap_throw();
		bindings.push(Binding::new(m.slot, Target::Text { start: before, anchor }));
		position = m.end;
		marker = find_marker(&data, position);
	}
	if position < data.len() {
		let after = document.create_text_node(&data[position..]);
		parent.insert_before(after.as_ref(), Some(text_node)).unwrap_throw();
	}
	text.remove();
}
