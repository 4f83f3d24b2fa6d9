//! Canvas rendering backend for the patch editor.
//!
//! The renderer consumes the reconciler's instruction lists into retained
//! visual tables, takes the per-frame geometry as-is, and repaints the whole
//! scene each animation frame in passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Links with their arrowheads (world space)
//! 3. Nodes: disc, rings, dials, labels (world space)
//! 4. The provisional drag line (screen space, over everything)

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::input::DragLine;
use super::scale::ScaledValues;
use super::scene::{Frame, LinkPath, LinkVisual, NodeVisual, SceneOp};
use super::theme::Theme;
use super::types::{LinkEnds, NodeId};

/// Arrowhead length in world units.
const ARROW_SIZE: f64 = 8.0;
/// Dash pattern for the pinned-node ring.
const PIN_DASH: (f64, f64) = (4.0, 3.0);

/// Retained-state canvas renderer for the reconciled scene.
pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	nodes: BTreeMap<NodeId, NodeVisual>,
	links: BTreeMap<LinkEnds, LinkVisual>,
	positions: HashMap<NodeId, (f64, f64)>,
	paths: HashMap<LinkEnds, LinkPath>,
	drag_line: Option<DragLine>,
}

impl CanvasRenderer {
	pub fn new(ctx: CanvasRenderingContext2d, theme: Theme) -> Self {
		Self {
			ctx,
			theme,
			nodes: BTreeMap::new(),
			links: BTreeMap::new(),
			positions: HashMap::new(),
			paths: HashMap::new(),
			drag_line: None,
		}
	}

	/// Apply a reconciliation instruction list to the retained tables.
	pub fn apply(&mut self, ops: &[SceneOp]) {
		for op in ops {
			match op {
				SceneOp::CreateNode(visual) | SceneOp::UpdateNode(visual) => {
					self.nodes.insert(visual.id, visual.clone());
				}
				SceneOp::RemoveNode(id) => {
					self.nodes.remove(id);
					self.positions.remove(id);
				}
				SceneOp::CreateLink(visual) | SceneOp::UpdateLink(visual) => {
					self.links.insert(visual.ends, *visual);
				}
				SceneOp::RemoveLink(ends) => {
					self.links.remove(ends);
					self.paths.remove(ends);
				}
			}
		}
	}

	/// Take this frame's geometry. Repositioning only; elements are created
	/// and removed exclusively through [`CanvasRenderer::apply`].
	pub fn set_frame(&mut self, frame: &Frame) {
		for placement in &frame.nodes {
			if self.nodes.contains_key(&placement.id) {
				self.positions
					.insert(placement.id, (placement.x, placement.y));
			}
		}
		for path in &frame.links {
			if self.links.contains_key(&path.ends) {
				self.paths.insert(path.ends, *path);
			}
		}
		self.drag_line = frame.drag_line;
	}

	/// Repaint the scene.
	pub fn draw(&self, width: f64, height: f64, scale: &ScaledValues) {
		let ctx = &self.ctx;

		ctx.set_fill_style_str(&self.theme.background.color.to_css());
		ctx.fill_rect(0.0, 0.0, width, height);

		ctx.save();
		let _ = ctx.scale(scale.k, scale.k);
		self.draw_links(scale);
		self.draw_nodes(scale);
		ctx.restore();

		if let Some(line) = self.drag_line {
			self.draw_drag_line(line, scale);
		}
	}

	fn draw_links(&self, scale: &ScaledValues) {
		let ctx = &self.ctx;
		for (ends, visual) in &self.links {
			let Some(path) = self.paths.get(ends) else {
				continue;
			};
			let color = if visual.selected {
				self.theme.link.selected_color
			} else {
				self.theme.link.color
			};
			let css = color.to_css();

			ctx.set_stroke_style_str(&css);
			ctx.set_line_width(scale.link_width);
			ctx.begin_path();
			ctx.move_to(path.source.x, path.source.y);
			ctx.line_to(path.target.x, path.target.y);
			ctx.stroke();

			let (dx, dy) = (path.target.x - path.source.x, path.target.y - path.source.y);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < 0.001 {
				continue;
			}
			let (ux, uy) = (dx / dist, dy / dist);
			if visual.right {
				draw_arrowhead(ctx, path.target.x, path.target.y, ux, uy, &css);
			}
			if visual.left {
				draw_arrowhead(ctx, path.source.x, path.source.y, -ux, -uy, &css);
			}
		}
	}

	fn draw_nodes(&self, scale: &ScaledValues) {
		let ctx = &self.ctx;
		for (id, visual) in &self.nodes {
			if !visual.visible {
				continue;
			}
			let Some(&(x, y)) = self.positions.get(id) else {
				continue;
			};
			let base = self.theme.palette.for_node(*id);
			let fill = if visual.selected {
				base.lighten(self.theme.node.selected_lighten)
			} else {
				base
			};
			let radius = scale.node_radius * visual.decor.radius_scale;

			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, TAU);
			ctx.set_fill_style_str(&fill.to_css());
			ctx.fill();
			ctx.set_stroke_style_str(&base.darken(self.theme.node.stroke_darken).to_css());
			ctx.set_line_width(1.5 / scale.k);
			ctx.stroke();

			if visual.reflexive {
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius + 3.0, 0.0, TAU);
				ctx.set_stroke_style_str(&self.theme.node.reflexive_color.to_css());
				ctx.set_line_width(2.5 / scale.k);
				ctx.stroke();
			}

			if visual.fixed {
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius + 6.0, 0.0, TAU);
				ctx.set_stroke_style_str(&self.theme.node.fixed_color.to_css());
				ctx.set_line_width(1.5 / scale.k);
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(PIN_DASH.0),
					&JsValue::from_f64(PIN_DASH.1),
				));
				ctx.stroke();
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}

			if visual.decor.dial_ring {
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius * 0.55, 0.0, TAU);
				ctx.set_stroke_style_str(
					&base.darken(self.theme.node.stroke_darken).to_css(),
				);
				ctx.set_line_width(1.0 / scale.k);
				ctx.stroke();
			}

			if let Some(label) = visual.decor.label {
				ctx.set_fill_style_str(&self.theme.node.label_color.to_css());
				ctx.set_font(&scale.label_font);
				let _ = ctx.fill_text(label, x + radius + 4.0, y + 4.0);
			}
		}
	}

	fn draw_drag_line(&self, line: DragLine, scale: &ScaledValues) {
		let ctx = &self.ctx;
		let css = self.theme.link.drag_color.to_css();

		ctx.set_stroke_style_str(&css);
		ctx.set_line_width(scale.drag_line_width);
		ctx.begin_path();
		ctx.move_to(line.from.x, line.from.y);
		ctx.line_to(line.to.x, line.to.y);
		ctx.stroke();

		let (dx, dy) = (line.to.x - line.from.x, line.to.y - line.from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist >= 0.001 {
			draw_arrowhead(ctx, line.to.x, line.to.y, dx / dist, dy / dist, &css);
		}
	}
}

/// Filled triangle with its tip at `(x, y)`, pointing along `(ux, uy)`.
fn draw_arrowhead(ctx: &CanvasRenderingContext2d, x: f64, y: f64, ux: f64, uy: f64, css: &str) {
	let (bx, by) = (x - ux * ARROW_SIZE, y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);

	ctx.set_fill_style_str(css);
	ctx.begin_path();
	ctx.move_to(x, y);
	ctx.line_to(bx + px, by + py);
	ctx.line_to(bx - px, by - py);
	ctx.close_path();
	ctx.fill();
}
