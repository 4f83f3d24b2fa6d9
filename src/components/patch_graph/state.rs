//! The editor session: one explicit object owning the graph model, scene
//! reconciler, layout simulation and input interpreter.
//!
//! The host creates an [`EditorState`] per editor instance and routes raw
//! events into it; there is no process-wide state. All operations are
//! synchronous: event handlers mutate the model and report whether a
//! reconciliation pass is needed, [`EditorState::restart`] produces the scene
//! ops for the rendering backend, and [`EditorState::tick`] advances the
//! layout and yields this frame's geometry.

use super::input::{DragLine, DragState, Interpreter, Key, Modifiers, PointerTarget};
use super::model::PatchModel;
use super::registry::ExtensionRegistry;
use super::scale::{ScaleConfig, ScaledValues};
use super::scene::{self, Frame, Scene, SceneOp};
use super::simulation::{ALPHA_SETTLE, Simulation};
use super::types::{EditorConfig, NodeId, NodeKind, Point};

/// Distance from `p` to the segment `a..b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let (abx, aby) = (b.x - a.x, b.y - a.y);
	let len_sq = abx * abx + aby * aby;
	let t = if len_sq < f64::EPSILON {
		0.0
	} else {
		(((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.x + abx * t, a.y + aby * t);
	((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// A live editing session over one patch graph.
pub struct EditorState {
	pub model: PatchModel,
	scene: Scene,
	sim: Simulation,
	input: Interpreter,
	drag: DragState,
	registry: ExtensionRegistry,
	scale: ScaleConfig,
	/// Canvas size in pixels.
	pub width: f64,
	pub height: f64,
	/// Zoom factor applied to the whole scene.
	pub k: f64,
	default_kind: NodeKind,
}

impl EditorState {
	pub fn new(config: &EditorConfig) -> Self {
		Self {
			model: PatchModel::new(),
			scene: Scene::new(),
			sim: Simulation::new(config.width, config.height),
			input: Interpreter::new(),
			drag: DragState::default(),
			registry: ExtensionRegistry::with_builtins(),
			scale: ScaleConfig::default(),
			width: config.width,
			height: config.height,
			k: config.scale,
			default_kind: config.default_kind,
		}
	}

	/// Pre-computed sizes for the current zoom level.
	pub fn scaled(&self) -> ScaledValues {
		ScaledValues::new(&self.scale, self.k)
	}

	fn to_world(&self, screen: Point) -> Point {
		Point::new(screen.x / self.k, screen.y / self.k)
	}

	/// Resolve what a pointer position (in screen coordinates) lands on:
	/// node discs take precedence (topmost, i.e. most recently created,
	/// first), then link segments within a pick tolerance, then the canvas.
	pub fn target_at(&self, screen: Point) -> PointerTarget {
		let world = self.to_world(screen);
		let scaled = self.scaled();

		for node in self.model.nodes().iter().rev() {
			if node.is_child && self.model.composite_owning(node.id).is_none() {
				continue; // hidden, not pickable
			}
			let radius = scaled.hit_radius * self.registry.decorate(node).radius_scale;
			let dist = ((world.x - node.x).powi(2) + (world.y - node.y).powi(2)).sqrt();
			if dist < radius {
				return PointerTarget::Node(node.id);
			}
		}

		let tolerance = scaled.link_hit_tolerance / self.k;
		for link in self.model.links() {
			let (Some(s), Some(t)) = (
				self.model.node(link.source()),
				self.model.node(link.target()),
			) else {
				continue;
			};
			let dist = segment_distance(
				world,
				Point::new(s.x, s.y),
				Point::new(t.x, t.y),
			);
			if dist < tolerance {
				return PointerTarget::Link(link.ends);
			}
		}

		PointerTarget::Canvas
	}

	// ---- interpreter entry points -------------------------------------

	/// Pointer pressed at a screen position. Returns whether to re-render.
	pub fn pointer_down(
		&mut self,
		target: PointerTarget,
		screen: Point,
		modifiers: Modifiers,
	) -> bool {
		let world = self.to_world(screen);
		self.input.pointer_down(
			&mut self.model,
			&self.registry,
			self.default_kind,
			target,
			world,
			self.k,
			modifiers,
		)
	}

	/// Pointer moved at a screen position.
	pub fn pointer_move(&mut self, screen: Point) -> bool {
		self.input.pointer_move(&self.model, screen, self.k)
	}

	/// Pointer released over the given target.
	pub fn pointer_up(&mut self, target: PointerTarget) -> bool {
		self.input.pointer_up(&mut self.model, target)
	}

	/// Double click: unpin the node so the layout may move it again.
	pub fn double_click(&mut self, target: PointerTarget) -> bool {
		let changed = self.input.double_click(&mut self.model, target);
		if changed && let PointerTarget::Node(id) = target {
			self.sim.release(id);
		}
		changed
	}

	pub fn key_down(&mut self, key: Key) -> bool {
		self.input.key_down(&mut self.model, key)
	}

	pub fn key_up(&mut self) {
		self.input.key_up();
	}

	// ---- node-repositioning drag gesture ------------------------------

	pub fn drag_active(&self) -> bool {
		self.drag.active()
	}

	/// Begin repositioning a node: pins it at its current position and
	/// re-energizes an idle simulation so neighbors adjust live.
	pub fn drag_start(&mut self, id: NodeId) -> bool {
		if !self.drag.start(&mut self.model, id) {
			return false;
		}
		if let Some(node) = self.model.node(id) {
			self.sim.pin(id, node.x, node.y);
		}
		if !self.sim.is_active() {
			self.sim.restart(ALPHA_SETTLE);
		}
		true
	}

	/// Follow the pointer while repositioning.
	pub fn drag_to(&mut self, screen: Point) {
		let world = self.to_world(screen);
		if let Some(id) = self.drag.drag(&mut self.model, world) {
			self.sim.pin(id, world.x, world.y);
		}
	}

	/// Drop the node: it stays fixed where it was released.
	pub fn drag_end(&mut self, screen: Point) {
		let world = self.to_world(screen);
		if let Some(id) = self.drag.end(&mut self.model, world) {
			self.sim.pin(id, world.x, world.y);
		}
	}

	// ---- reconciliation and animation ---------------------------------

	/// Full reconciliation pass: diff the scene against the model, re-sync
	/// the simulation with the current node/link sets and re-energize it so
	/// the edit animates. Returns the ops for the rendering backend.
	pub fn restart(&mut self) -> Vec<SceneOp> {
		let ops = self.scene.reconcile(&self.model, &self.registry);
		self.sim.sync(&self.model);
		self.sim.restart(ALPHA_SETTLE);
		ops
	}

	/// Advance the layout one animation step and collect this frame's
	/// geometry. Repositioning only: the frame never creates or removes
	/// elements.
	pub fn tick(&mut self, dt: f32) -> Frame {
		self.sim.tick(dt, &mut self.model);
		let scaled = self.scaled();
		let (nodes, links) = scene::frame(&self.model, &scaled);
		Frame {
			nodes,
			links,
			drag_line: self.drag_line(),
		}
	}

	/// The provisional link-drag line, if one is showing.
	pub fn drag_line(&self) -> Option<DragLine> {
		self.input.drag_line()
	}
}
