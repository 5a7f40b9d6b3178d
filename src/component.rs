//! The component boundary layer: explicit per-type descriptors and a
//! per-instance render host over the core `build`/`apply` contract.
//!
//! Registration is an explicit builder call per component type; there are no
//! global registries to recover metadata from, and the descriptor is passed
//! into [`Host::attach`] by hand.

use crate::build::{build, Build};
use crate::error::ApplyError;
use crate::template::TemplateResult;
use crate::value::Value;
use hashbrown::HashMap;
use tracing::{error, trace, warn};
use wasm_bindgen::UnwrapThrowExt;
use web_sys::{Element, ShadowRoot, ShadowRootInit, ShadowRootMode};

/// Per-component-type record, built once at registration time.
#[derive(Debug)]
pub struct Descriptor {
	tag: &'static str,
	properties: Vec<PropertySpec>,
}

/// One declared property: its name, the attribute it seeds from (if any) and
/// its default value.
#[derive(Debug)]
pub struct PropertySpec {
	name: &'static str,
	attribute: Option<&'static str>,
	default: Value,
}

impl Descriptor {
	#[must_use]
	pub fn new(tag: &'static str) -> Self {
		Self {
			tag,
			properties: Vec::new(),
		}
	}

	#[must_use]
	pub fn property(mut self, name: &'static str, default: Value) -> Self {
		self.properties.push(PropertySpec {
			name,
			attribute: None,
			default,
		});
		self
	}

	/// Like [`Descriptor::property`], but seeded from `attribute` when the
	/// host element carries it.
	#[must_use]
	pub fn reflected_property(mut self, name: &'static str, attribute: &'static str, default: Value) -> Self {
		self.properties.push(PropertySpec {
			name,
			attribute: Some(attribute),
			default,
		});
		self
	}

	#[must_use]
	pub fn tag(&self) -> &'static str {
		self.tag
	}

	#[must_use]
	pub fn properties(&self) -> &[PropertySpec] {
		&self.properties
	}
}

impl PropertySpec {
	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}

	#[must_use]
	pub fn attribute(&self) -> Option<&'static str> {
		self.attribute
	}
}

/// One component instance's render site: its shadow root, its property
/// values, and — once the first render happened — the stored [`Build`].
///
/// First-render detection lives here, not in the core: the first
/// [`Host::update`] builds and appends, every later one only re-applies.
#[derive(Debug)]
pub struct Host {
	root: ShadowRoot,
	properties: HashMap<&'static str, Value>,
	build: Option<Build>,
}

impl Host {
	/// Attaches an open shadow root to `element` and seeds property values
	/// from the descriptor's defaults and any reflected attributes present.
	#[must_use]
	pub fn attach(descriptor: &Descriptor, element: &Element) -> Self {
		if !element.tag_name().eq_ignore_ascii_case(descriptor.tag) {
			warn!(expected = descriptor.tag, found = %element.tag_name(), "element tag does not match descriptor");
		}
		let root = element
			.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
			.expect_throw("weft-dom: failed to attach shadow root");

		let mut properties = HashMap::with_capacity(descriptor.properties.len());
		for spec in &descriptor.properties {
			let value = spec
				.attribute
				.and_then(|attribute| element.get_attribute(attribute))
				.map_or_else(|| spec.default.clone(), Value::from);
			properties.insert(spec.name, value);
		}

		Self {
			root,
			properties,
			build: None,
		}
	}

	/// Stores a property value. Returns whether the stored value changed (by
	/// [`Value::same`]); callers typically re-render only on `true`.
	pub fn set_property(&mut self, name: &str, value: Value) -> bool {
		match self.properties.get_mut(name) {
			Some(slot) => {
				if slot.same(&value) {
					trace!(property = name, "property unchanged");
					false
				} else {
					*slot = value;
					true
				}
			}
			None => {
				warn!(property = name, "unknown property; ignoring");
				false
			}
		}
	}

	#[must_use]
	pub fn property(&self, name: &str) -> Option<&Value> {
		self.properties.get(name)
	}

	#[must_use]
	pub fn root(&self) -> &ShadowRoot {
		&self.root
	}

	/// Applies one render's result. On the first call the result's markup is
	/// built and the fragment appended to the shadow root exactly once; on
	/// every call (this one included) the result's args are applied.
	///
	/// # Errors
	///
	/// Propagates [`ApplyError`] from the underlying apply. A failed first
	/// render stores nothing and appends nothing, so no partial content
	/// reaches the document.
	pub fn update(&mut self, result: &TemplateResult) -> Result<(), ApplyError> {
		match &mut self.build {
			Some(existing) => existing.apply(result.args()),
			None => {
				let mut fresh = build(result.markup());
				fresh.apply(result.args())?;
				if let Err(error) = self.root.append_child(fresh.element().as_ref()) {
					error!(?error, "failed to append component fragment");
				}
				self.build = Some(fresh);
				Ok(())
			}
		}
	}
}
