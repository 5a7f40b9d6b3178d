//! Markup compilation: literal segments in, a single static markup string with
//! numbered `{{i}}` slot markers out, paired with the positional hole values.

use crate::value::Value;
use std::rc::Rc;

/// Interleaves `segments` with `{{i}}` slot markers, one marker per gap.
///
/// `markup(&["a", "b", "c"])` is `"a{{0}}b{{1}}c"`. Total over any segment
/// list; a single segment comes back unchanged.
#[must_use]
pub fn markup(segments: &[&str]) -> String {
	let mut compiled = String::with_capacity(segments.iter().map(|segment| segment.len() + 7).sum());
	for (i, segment) in segments.iter().enumerate() {
		compiled.push_str(segment);
		if i + 1 < segments.len() {
			compiled.push_str("{{");
			compiled.push_str(&i.to_string());
			compiled.push_str("}}");
		}
	}
	compiled
}

/// The tagged-template entry point: compiles `segments` and pairs the result
/// with its hole values.
///
/// Most call sites go through [`html!`](crate::html) instead, which also
/// normalises adjacent and leading/trailing holes.
#[must_use]
pub fn html(segments: &[&str], args: Vec<Value>) -> TemplateResult {
	TemplateResult::new(markup(segments), args)
}

/// One templating call: the fully expanded static markup plus the dynamic
/// values awaiting binding, indexed positionally.
///
/// Cheap to create and to clone; the payload sits behind an [`Rc`], so clones
/// of one result share identity (see [`Value::same`]) while every fresh
/// templating call yields a distinct one.
#[derive(Clone, Debug)]
pub struct TemplateResult {
	inner: Rc<Inner>,
}

#[derive(Debug)]
struct Inner {
	markup: String,
	args: Vec<Value>,
}

impl TemplateResult {
	#[must_use]
	pub fn new(markup: String, args: Vec<Value>) -> Self {
		Self {
			inner: Rc::new(Inner { markup, args }),
		}
	}

	#[must_use]
	pub fn markup(&self) -> &str {
		&self.inner.markup
	}

	#[must_use]
	pub fn args(&self) -> &[Value] {
		&self.inner.args
	}

	/// Identity comparison, the `===` analogue for template results.
	#[must_use]
	pub fn same(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

/// One `{{slot}}` occurrence inside a larger string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Marker {
	/// Byte offset of the opening `{{`.
	pub start: usize,
	/// Byte offset one past the closing `}}`.
	pub end: usize,
	pub slot: usize,
}

/// Finds the next well-formed slot marker at or after `from`.
///
/// A marker is well-formed iff the text between braces is a plain decimal
/// integer; anything else (`{{foo}}`, `{{}}`) is literal text and is skipped
/// over, not reported.
pub(crate) fn find_marker(text: &str, from: usize) -> Option<Marker> {
	let mut search = from;
	while let Some(open) = text[search..].find("{{").map(|offset| search + offset) {
		let Some(close) = text[open + 2..].find("}}").map(|offset| open + 2 + offset) else {
			return None;
		};
		let inner = &text[open + 2..close];
		if !inner.is_empty() && inner.bytes().all(|byte| byte.is_ascii_digit()) {
			if let Ok(slot) = inner.parse() {
				return Some(Marker {
					start: open,
					end: close + 2,
					slot,
				});
			}
		}
		// Not a slot; resume past the opening braces so overlaps like
		// `{{{{0}}` still find the real marker.
		search = open + 2;
	}
	None
}

/// Builds a [`TemplateResult`] from an alternation of string literals and
/// `{expression}` holes.
///
/// Any alternation is accepted: adjacent holes, or a hole at either end, get
/// an empty segment spliced in, so the segment count always exceeds the hole
/// count by exactly one.
///
/// ```rust
/// use weft_dom::html;
///
/// let name = "weft";
/// let result = html!("<p>Hello, " {name} "!</p>");
/// assert_eq!(result.markup(), "<p>Hello, {{0}}!</p>");
/// ```
#[macro_export]
macro_rules! html {
	($($tt:tt)*) => {
		$crate::__html_parts!(@start [] [] $($tt)*)
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __html_parts {
	(@start [] []) => {
		$crate::template::html(&[""], ::std::vec::Vec::new())
	};
	(@start [] [] $segment:literal $($rest:tt)*) => {
		$crate::__html_parts!(@segment [$segment,] [] $($rest)*)
	};
	(@start [] [] { $hole:expr } $($rest:tt)*) => {
		$crate::__html_parts!(@hole ["",] [$crate::value::Value::from($hole),] $($rest)*)
	};
	// A segment was just pushed: either done, or a hole follows.
	(@segment [$($segment:expr,)*] [$($arg:expr,)*]) => {
		$crate::template::html(&[$($segment,)*], ::std::vec![$($arg,)*])
	};
	(@segment [$($segment:expr,)*] [$($arg:expr,)*] { $hole:expr } $($rest:tt)*) => {
		$crate::__html_parts!(@hole [$($segment,)*] [$($arg,)* $crate::value::Value::from($hole),] $($rest)*)
	};
	// A hole was just pushed: splice an empty segment wherever no literal follows.
	(@hole [$($segment:expr,)*] [$($arg:expr,)*]) => {
		$crate::template::html(&[$($segment,)* "",], ::std::vec![$($arg,)*])
	};
	(@hole [$($segment:expr,)*] [$($arg:expr,)*] $next:literal $($rest:tt)*) => {
		$crate::__html_parts!(@segment [$($segment,)* $next,] [$($arg,)*] $($rest)*)
	};
	(@hole [$($segment:expr,)*] [$($arg:expr,)*] { $hole:expr } $($rest:tt)*) => {
		$crate::__html_parts!(@hole [$($segment,)* "",] [$($arg,)* $crate::value::Value::from($hole),] $($rest)*)
	};
}
