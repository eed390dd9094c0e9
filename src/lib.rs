//! particle-field: pointer-reactive particle background for web pages.
//!
//! This crate provides a WASM canvas component that animates a field of
//! glowing, twinkling particles which drift, gather around the pointer and
//! link up with faint lines when close to each other.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;

pub use components::particle_field::{ConfigDocument, FieldConfig, ParticleFieldCanvas, Preset};
pub use error::FieldError;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("particle-field: logging initialized");
}

/// Parse an embedded configuration document.
///
/// Accepts either `{"preset": "twinkle" | "classic"}` or a (partial) field
/// configuration. Anything unparseable, including unknown keys or a preset
/// mixed with overrides, is logged and falls back to the default preset.
pub fn parse_field_config(json_text: &str) -> FieldConfig {
	match serde_json::from_str::<ConfigDocument>(json_text) {
		Ok(doc) => doc.into_config(),
		Err(e) => {
			warn!("particle-field: failed to parse config: {}", e);
			FieldConfig::default()
		}
	}
}

/// Load the field configuration from a script element with id="particle-config".
/// Missing element means the default preset.
fn load_field_config() -> FieldConfig {
	let Some(json_text) = config_script_text() else {
		return FieldConfig::default();
	};
	let config = parse_field_config(&json_text);
	info!(
		"particle-field: loaded config ({} glow layers, sparkle {})",
		config.glow.len(),
		if config.sparkle.is_some() { "on" } else { "off" }
	);
	config
}

fn config_script_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("particle-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Loads the field configuration from the DOM and renders the background.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_field_config();
	let config_signal = Signal::derive(move || config.clone());

	view! {
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<ParticleFieldCanvas config=config_signal fullscreen=true />
	}
}
