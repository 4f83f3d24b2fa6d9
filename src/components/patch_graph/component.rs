//! Leptos component wrapping the patch editor canvas.
//!
//! The component creates an HTML canvas element, builds the editor session
//! from the host configuration, and routes raw DOM events into the input
//! interpreter: mouse events from the canvas, key events from window-level
//! listeners. An animation loop runs via `requestAnimationFrame`, advancing
//! the layout simulation and repainting each frame. Handlers that change the
//! model run a reconciliation pass and feed the resulting ops to the
//! renderer.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::input::{Key, Modifiers, PointerTarget};
use super::render::CanvasRenderer;
use super::state::EditorState;
use super::theme::Theme;
use super::types::{EditorConfig, Point};

/// Bundles the editor session with its rendering backend.
struct EditorContext {
	state: EditorState,
	renderer: CanvasRenderer,
}

impl EditorContext {
	/// Reconcile after a model change and hand the ops to the renderer.
	fn restart(&mut self) {
		let ops = self.state.restart();
		self.renderer.apply(&ops);
	}
}

/// Translate a DOM key name into an editor command key.
fn map_key(key: &str) -> Key {
	match key {
		"Delete" => Key::Delete,
		"b" | "B" => Key::B,
		"l" | "L" => Key::L,
		"r" | "R" => Key::R,
		_ => Key::Other,
	}
}

/// Pointer position relative to the canvas, in screen pixels.
fn event_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders the interactive patch editor on a canvas element.
///
/// Click empty canvas to place a widget of the configured default kind, drag
/// from node to node to wire a link, ctrl-drag a node to reposition and pin
/// it, double-click to unpin. Delete/B/L/R act on the current selection.
#[component]
pub fn PatchEditorCanvas(
	#[prop(default = EditorConfig::default())] config: EditorConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<EditorContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let keydown_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let keyup_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let (context_init, animate_init, keydown_init, keyup_init) = (
		context.clone(),
		animate.clone(),
		keydown_cb.clone(),
		keyup_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		canvas.set_width(config.width as u32);
		canvas.set_height(config.height as u32);

		let ctx: web_sys::CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let mut state = EditorState::new(&config);
		let mut renderer = CanvasRenderer::new(ctx, Theme::by_name(&config.theme));
		let ops = state.restart();
		renderer.apply(&ops);
		debug!(
			"patch-graph: editor ready ({}x{} at scale {})",
			config.width, config.height, config.scale
		);
		*context_init.borrow_mut() = Some(EditorContext { state, renderer });

		let context_kd = context_init.clone();
		*keydown_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if let Some(ref mut c) = *context_kd.borrow_mut()
				&& c.state.key_down(map_key(&ev.key()))
			{
				c.restart();
			}
		}));
		if let Some(ref cb) = *keydown_init.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let context_ku = context_init.clone();
		*keyup_init.borrow_mut() = Some(Closure::new(move |_: KeyboardEvent| {
			if let Some(ref mut c) = *context_ku.borrow_mut() {
				c.state.key_up();
			}
		}));
		if let Some(ref cb) = *keyup_init.borrow() {
			let _ = window.add_event_listener_with_callback("keyup", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let frame = c.state.tick(0.016);
				c.renderer.set_frame(&frame);
				let scaled = c.state.scaled();
				c.renderer.draw(c.state.width, c.state.height, &scaled);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let point = event_point(&canvas, &ev);

		if let Some(ref mut c) = *context_md.borrow_mut() {
			let target = c.state.target_at(point);
			let modifiers = Modifiers { ctrl: ev.ctrl_key() };
			if modifiers.ctrl {
				// The reserved modifier gesture: reposition (and pin) a node.
				if let PointerTarget::Node(id) = target {
					c.state.drag_start(id);
				}
			} else if c.state.pointer_down(target, point, modifiers) {
				c.restart();
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let point = event_point(&canvas, &ev);

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag_active() {
				c.state.drag_to(point);
			} else if c.state.pointer_move(point) {
				c.restart();
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let point = event_point(&canvas, &ev);

		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.drag_active() {
				c.state.drag_end(point);
				c.restart();
			} else {
				let target = c.state.target_at(point);
				if c.state.pointer_up(target) {
					c.restart();
				}
			}
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let point = event_point(&canvas, &ev);

		if let Some(ref mut c) = *context_ml.borrow_mut() {
			if c.state.drag_active() {
				c.state.drag_end(point);
				c.restart();
			} else {
				// Leaving the canvas cancels any in-flight link drag.
				c.state.pointer_up(PointerTarget::Canvas);
			}
		}
	};

	let context_dc = context.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let point = event_point(&canvas, &ev);

		if let Some(ref mut c) = *context_dc.borrow_mut() {
			let target = c.state.target_at(point);
			if c.state.double_click(target) {
				c.restart();
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="patch-editor-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			style="display: block; cursor: crosshair;"
		/>
	}
}
