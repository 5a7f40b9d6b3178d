#![cfg(target_arch = "wasm32")]

use std::sync::Once;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use weft_dom::component::{Descriptor, Host};
use weft_dom::{html, Value};
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn element(tag: &str) -> Element {
	static INIT: Once = Once::new();
	INIT.call_once(tracing_wasm::set_as_global_default);

	let document = web_sys::window().unwrap().document().unwrap();
	let element = document.create_element(tag).unwrap();
	document.body().unwrap().append_child(&element).unwrap();
	element
}

fn card_descriptor() -> Descriptor {
	Descriptor::new("x-card")
		.reflected_property("label", "label", "untitled".into())
		.property("count", 0.into())
}

fn card_render(host: &Host) -> weft_dom::TemplateResult {
	let label = host.property("label").cloned().unwrap_or(Value::Null);
	let count = host.property("count").cloned().unwrap_or(Value::Null);
	html!("<h2>" {label} "</h2><output>" {count} "</output>")
}

#[wasm_bindgen_test]
fn attributes_seed_reflected_properties() {
	let element = element("x-card");
	element.set_attribute("label", "From attribute").unwrap();

	let host = Host::attach(&card_descriptor(), &element);
	assert!(host.property("label").unwrap().same(&"From attribute".into()));
	// Unreflected properties fall back to their declared default.
	assert!(host.property("count").unwrap().same(&0.into()));
	assert!(host.property("missing").is_none());
}

#[wasm_bindgen_test]
fn first_update_builds_then_later_updates_patch() {
	let element = element("x-card");
	let mut host = Host::attach(&card_descriptor(), &element);

	host.update(&card_render(&host)).unwrap();
	let heading = host.root().query_selector("h2").unwrap().unwrap();
	assert_eq!(heading.text_content().unwrap(), "untitled");

	assert!(host.set_property("label", "Renamed".into()));
	host.update(&card_render(&host)).unwrap();

	// The shadow tree was patched, not rebuilt.
	assert_eq!(host.root().query_selector("h2").unwrap().unwrap(), heading);
	assert_eq!(heading.text_content().unwrap(), "Renamed");
}

#[wasm_bindgen_test]
fn set_property_reports_changes_only() {
	let element = element("x-card");
	let mut host = Host::attach(&card_descriptor(), &element);

	assert!(!host.set_property("count", 0.into()));
	assert!(host.set_property("count", 3.into()));
	assert!(!host.set_property("count", 3.into()));
	assert!(!host.set_property("unknown", 1.into()));
}

#[wasm_bindgen_test]
fn descriptor_records_its_registration() {
	let descriptor = card_descriptor();
	assert_eq!(descriptor.tag(), "x-card");
	assert_eq!(descriptor.properties().len(), 2);
	assert_eq!(descriptor.properties()[0].name(), "label");
	assert_eq!(descriptor.properties()[0].attribute(), Some("label"));
	assert_eq!(descriptor.properties()[1].attribute(), None);
}
