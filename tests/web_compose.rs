#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Once;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use weft_dom::{html, render, Value};
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> Element {
	static INIT: Once = Once::new();
	INIT.call_once(tracing_wasm::set_as_global_default);

	let document = web_sys::window().unwrap().document().unwrap();
	let container = document.create_element("div").unwrap();
	document.body().unwrap().append_child(&container).unwrap();
	container
}

#[wasm_bindgen_test]
fn nested_template_renders_like_an_independent_build() {
	let outer_container = container();
	let inner_container = container();

	let inner = || html!("<b>" {"hi"} "</b>");
	let result = html!("<div>" {inner()} "</div>");
	render(&result, &outer_container).unwrap();
	render(&inner(), &inner_container).unwrap();

	let nested = outer_container.query_selector("div").unwrap().unwrap();
	assert_eq!(nested.inner_html(), inner_container.inner_html());
	assert_eq!(nested.text_content().unwrap(), "hi");
}

#[wasm_bindgen_test]
fn mixed_arrays_flatten_in_order() {
	let container = container();

	let value = Value::list(vec![
		1.into(),
		html!("<b>" {"hi"} "</b>").into(),
		Value::list(vec![2.into(), 3.into()]),
	]);
	let result = html!("<p>" {value} "</p>");
	render(&result, &container).unwrap();

	let paragraph = container.query_selector("p").unwrap().unwrap();
	assert_eq!(paragraph.text_content().unwrap(), "1hi23");
	assert_eq!(container.query_selector("p > b").unwrap().unwrap().text_content().unwrap(), "hi");
}

#[wasm_bindgen_test]
fn lazy_values_are_invoked_at_compose_time() {
	let container = container();

	let invocations = Rc::new(Cell::new(0u32));

	let lazy = |invocations: &Rc<Cell<u32>>| {
		let invocations = Rc::clone(invocations);
		Value::lazy(move || {
			invocations.set(invocations.get() + 1);
			"late".into()
		})
	};

	let result = html!("<p>" {lazy(&invocations)} "</p>");
	let mut build = render(&result, &container).unwrap();
	assert_eq!(container.text_content().unwrap(), "late");
	assert_eq!(invocations.get(), 1);

	// A fresh thunk is not the previous one, so it composes again.
	build.apply(&[lazy(&invocations)]).unwrap();
	assert_eq!(invocations.get(), 2);
}

#[wasm_bindgen_test]
fn unrenderable_text_values_degrade_to_nothing() {
	let container = container();

	let result = html!("a" {Value::listener(|_event| {})} "b" {Value::Null} "c");
	render(&result, &container).unwrap();
	assert_eq!(container.text_content().unwrap(), "abc");
}

#[wasm_bindgen_test]
fn templates_nest_recursively() {
	let container = container();

	let leaf = |label: &str| html!("<li>" {label} "</li>");
	let branch = html!("<ul>" {Value::list(vec![leaf("one").into(), leaf("two").into()])} "</ul>");
	let result = html!("<nav>" {branch} "</nav>");
	render(&result, &container).unwrap();

	let items = container.query_selector_all("nav ul li").unwrap();
	assert_eq!(items.length(), 2);
	assert_eq!(container.query_selector("nav").unwrap().unwrap().text_content().unwrap(), "onetwo");
}
