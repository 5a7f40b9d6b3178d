use weft_dom::{html, Value};

#[test]
fn scalars_compare_by_value() {
	assert!(Value::Null.same(&Value::Null));
	assert!(Value::Bool(true).same(&Value::from(true)));
	assert!(Value::Int(3).same(&Value::from(3)));
	assert!(Value::from("abc").same(&Value::Text("abc".to_owned())));
	assert!(!Value::from("abc").same(&Value::from("abd")));
	assert!(!Value::Int(0).same(&Value::Null));
	// Int and Float never unify, mirroring the tagged representation.
	assert!(!Value::Int(1).same(&Value::Float(1.0)));
}

#[test]
fn nan_is_never_same() {
	let nan = Value::Float(f64::NAN);
	assert!(!nan.same(&nan.clone()));
	assert!(Value::Float(1.5).same(&Value::Float(1.5)));
}

#[test]
fn reference_values_compare_by_identity() {
	let list = Value::list(vec!["a".into(), "b".into()]);
	assert!(list.same(&list.clone()));
	assert!(!list.same(&Value::list(vec!["a".into(), "b".into()])));

	let lazy = Value::lazy(|| Value::Null);
	assert!(lazy.same(&lazy.clone()));
	assert!(!lazy.same(&Value::lazy(|| Value::Null)));

	let listener = Value::listener(|_event| {});
	assert!(listener.same(&listener.clone()));
	assert!(!listener.same(&Value::listener(|_event| {})));
}

#[test]
fn template_results_compare_by_identity() {
	let result = html!("a" {1} "b");
	let value = Value::from(result.clone());
	assert!(value.same(&Value::from(result)));
	assert!(!value.same(&Value::from(html!("a" {1} "b"))));
}

#[test]
fn option_converts_to_null_or_value() {
	assert!(Value::from(None::<&str>).same(&Value::Null));
	assert!(Value::from(Some("x")).same(&Value::from("x")));
}

#[test]
fn debug_is_opaque_for_callables() {
	let rendered = format!("{:?}", Value::lazy(|| Value::Null));
	assert_eq!(rendered, "Lazy(..)");
	let rendered = format!("{:?}", Value::listener(|_event| {}));
	assert_eq!(rendered, "Listener(..)");
}
