//! patch-graph: Interactive force-directed editor for audio-synthesis
//! patch graphs.
//!
//! This crate provides a WASM-based editor component: drop oscillator and
//! buzz widgets onto a canvas, wire them with directional links, and shape
//! the patch with keyboard commands while a physics simulation keeps the
//! layout settled.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::patch_graph::{
	EditorConfig, EditorState, NodeId, NodeKind, PatchEditorCanvas, Theme,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("patch-graph: logging initialized");
}

/// Load editor configuration from a script element with id="editor-config".
/// Expected format: JSON with any of { width, height, scale, theme,
/// default_kind }; missing fields take their defaults.
pub fn load_editor_config() -> Option<EditorConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("editor-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<EditorConfig>(&json_text) {
		Ok(config) => {
			info!(
				"patch-graph: loaded config ({}x{}, theme {})",
				config.width, config.height, config.theme
			);
			Some(config)
		}
		Err(e) => {
			warn!("patch-graph: failed to parse editor config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Reads host configuration from the DOM and mounts the patch editor.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_editor_config().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Patch Editor" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="linen-container">
			<PatchEditorCanvas config=config />
			<div class="editor-overlay">
				<h1>"Patch Editor"</h1>
				<p class="subtitle">
					"Click empty space to add a widget. Drag node to node to wire a link. "
					"Ctrl-drag repositions, double-click unpins. Delete/B/L/R act on the selection."
				</p>
			</div>
		</div>
	}
}
