//! Initialization errors.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors that abort setting up the particle field.
///
/// Only raised while wiring the canvas; the per-frame loop never fails.
#[derive(Error, Debug)]
pub enum FieldError {
	/// No `window` global (not running in a browser).
	#[error("no window available")]
	NoWindow,

	/// The canvas refused to hand out a 2d rendering context.
	#[error("canvas has no 2d rendering context")]
	ContextUnavailable,

	/// A browser API threw during setup.
	#[error("javascript error: {0}")]
	Js(String),
}

impl From<JsValue> for FieldError {
	fn from(value: JsValue) -> Self {
		FieldError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
	}
}
