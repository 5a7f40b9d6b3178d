//! The tagged hole-value model.
//!
//! Every dynamic value a template hole can take is one of these variants, so
//! the composer and the bindings pattern-match instead of structurally
//! guessing at shapes.

use crate::template::TemplateResult;
use core::fmt;
use std::rc::Rc;

/// A dynamic value bound into one or more template holes.
#[derive(Clone)]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Text(String),
	/// Deferred content: invoked (synchronously, unmemoised) whenever the hole
	/// is composed.
	Lazy(Rc<dyn Fn() -> Value>),
	/// An event handler, only meaningful for `@event` attribute holes.
	Listener(Rc<dyn Fn(web_sys::Event)>),
	/// A nested sub-template, rendered as its own fragment.
	Template(TemplateResult),
	/// A sequence of values, flattened in order when composed.
	List(Rc<Vec<Value>>),
}

impl Value {
	pub fn lazy(thunk: impl Fn() -> Value + 'static) -> Self {
		Self::Lazy(Rc::new(thunk))
	}

	pub fn listener(handler: impl Fn(web_sys::Event) + 'static) -> Self {
		Self::Listener(Rc::new(handler))
	}

	#[must_use]
	pub fn list(values: Vec<Value>) -> Self {
		Self::List(Rc::new(values))
	}

	/// The `===` analogue used for update gating: scalars compare by value,
	/// everything reference-shaped by identity.
	///
	/// `Float` uses `f64` equality, so a `NaN` never compares same to
	/// anything, itself included.
	#[allow(clippy::float_cmp)]
	#[must_use]
	pub fn same(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::Text(a), Self::Text(b)) => a == b,
			(Self::Lazy(a), Self::Lazy(b)) => thin_ptr_eq(a, b),
			(Self::Listener(a), Self::Listener(b)) => thin_ptr_eq(a, b),
			(Self::Template(a), Self::Template(b)) => a.same(b),
			(Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
			_ => false,
		}
	}

	/// String form for text-node content; `None` for anything that is not a
	/// scalar.
	pub(crate) fn scalar_text(&self) -> Option<String> {
		match self {
			Self::Bool(value) => Some(if *value { "true" } else { "false" }.to_owned()),
			Self::Int(value) => Some(value.to_string()),
			Self::Float(value) => Some(value.to_string()),
			Self::Text(value) => Some(value.clone()),
			_ => None,
		}
	}

	/// String contribution of this value to a templated attribute: scalars in
	/// display form, `Null` as the empty string, lists joined by a single
	/// space. `None` means the type is unsupported in attribute position.
	pub(crate) fn attribute_text(&self) -> Option<String> {
		match self {
			Self::Null => Some(String::new()),
			Self::List(values) => {
				let mut joined = String::new();
				for (i, value) in values.iter().enumerate() {
					if i > 0 {
						joined.push(' ');
					}
					// Unsupported elements contribute nothing but keep the
					// separator, matching the empty-substitution rule.
					joined.push_str(&value.attribute_text().unwrap_or_default());
				}
				Some(joined)
			}
			_ => self.scalar_text(),
		}
	}
}

fn thin_ptr_eq<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
	Rc::as_ptr(a).cast::<u8>() == Rc::as_ptr(b).cast::<u8>()
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("Null"),
			Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
			Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
			Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
			Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
			Self::Lazy(_) => f.write_str("Lazy(..)"),
			Self::Listener(_) => f.write_str("Listener(..)"),
			Self::Template(result) => f.debug_tuple("Template").field(&result.markup()).finish(),
			Self::List(values) => f.debug_tuple("List").field(values).finish(),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Self::Int(value.into())
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<TemplateResult> for Value {
	fn from(value: TemplateResult) -> Self {
		Self::Template(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(values: Vec<Value>) -> Self {
		Self::list(values)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}
