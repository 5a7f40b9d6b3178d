#![doc(html_root_url = "https://docs.rs/weft-dom/0.1.0")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod build;
pub mod component;
mod compose;
pub mod error;
pub mod template;
pub mod value;

pub use build::{build, render, Build};
pub use error::ApplyError;
pub use template::{html, markup, TemplateResult};
pub use value::Value;
