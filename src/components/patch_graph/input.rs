//! Input interpretation: a small state machine turning raw pointer and
//! keyboard events into graph edits.
//!
//! Transient gesture state (the pressed node/link and the provisional drag
//! line) lives in [`Interpreter`]; the one-keystroke-per-keydown latch is an
//! explicit [`KeyLatch`] so held keys fire exactly once. Node repositioning
//! is not interpreted here: it is delegated to the separate [`DragState`]
//! gesture primitive.
//!
//! Every handler returns whether the caller must run a full reconciliation
//! pass afterwards.

use super::model::{PatchModel, Selection};
use super::registry::ExtensionRegistry;
use super::types::{LinkEnds, NodeId, NodeKind, Point};

/// What a pointer event landed on, as resolved by hit testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerTarget {
	Canvas,
	Node(NodeId),
	Link(LinkEnds),
}

/// Modifier keys held during a pointer event. A held modifier suppresses the
/// default gestures; hosts may route modified gestures elsewhere (node
/// repositioning uses this).
#[derive(Clone, Copy, Debug, Default)]
pub struct Modifiers {
	pub ctrl: bool,
}

impl Modifiers {
	fn suppresses(&self) -> bool {
		self.ctrl
	}
}

/// Keyboard commands the editor understands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Key {
	Delete,
	B,
	L,
	R,
	Other,
}

/// Explicit key-repeat latch: a key held down is processed once, and the
/// latch re-arms only on key-up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum KeyLatch {
	#[default]
	Idle,
	Held,
}

/// The provisional link-drag line, in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragLine {
	pub from: Point,
	pub to: Point,
}

/// Pointer/keyboard state machine over the graph model.
#[derive(Debug, Default)]
pub struct Interpreter {
	pressed_node: Option<NodeId>,
	pressed_link: Option<LinkEnds>,
	drag_line: Option<DragLine>,
	latch: KeyLatch,
}

impl Interpreter {
	pub fn new() -> Self {
		Self::default()
	}

	/// The provisional drag line to render this frame, if a link drag is in
	/// progress.
	pub fn drag_line(&self) -> Option<DragLine> {
		self.drag_line
	}

	fn reset_pointer(&mut self) {
		self.pressed_node = None;
		self.pressed_link = None;
	}

	/// Pointer pressed. `world` is the position in world coordinates, `k`
	/// the current zoom factor (the drag line is kept in screen space).
	pub fn pointer_down(
		&mut self,
		model: &mut PatchModel,
		registry: &ExtensionRegistry,
		default_kind: NodeKind,
		target: PointerTarget,
		world: Point,
		k: f64,
		modifiers: Modifiers,
	) -> bool {
		if modifiers.suppresses() {
			return false;
		}
		match target {
			PointerTarget::Canvas => {
				if self.pressed_node.is_some() || self.pressed_link.is_some() {
					return false;
				}
				registry.spawn(model, default_kind, world);
				true
			}
			PointerTarget::Node(id) => {
				self.pressed_node = Some(id);
				// Child nodes are not independently selectable: picking one
				// selects the composite widget that owns it.
				let selection = match model.composite_owning(id) {
					Some(composite) => Selection::Composite(composite.master),
					None => Selection::Node(id),
				};
				model.set_selection(selection);
				if let Some(node) = model.node(id) {
					let anchor = Point::new(node.x * k, node.y * k);
					self.drag_line = Some(DragLine {
						from: anchor,
						to: anchor,
					});
				}
				true
			}
			PointerTarget::Link(ends) => {
				self.pressed_link = Some(ends);
				let selection = if model.selection() == Selection::Link(ends) {
					Selection::None
				} else {
					Selection::Link(ends)
				};
				model.set_selection(selection);
				true
			}
		}
	}

	/// Pointer moved. Only meaningful while a link drag is in progress:
	/// tracks the provisional line's endpoint in screen space.
	pub fn pointer_move(&mut self, model: &PatchModel, screen: Point, k: f64) -> bool {
		let Some(origin) = self.pressed_node else {
			return false;
		};
		let Some(node) = model.node(origin) else {
			return false;
		};
		self.drag_line = Some(DragLine {
			from: Point::new(node.x * k, node.y * k),
			to: screen,
		});
		true
	}

	/// Pointer released. Completes a node-to-node drag into a link, cancels
	/// a drag released over its origin or over nothing, and is idempotent
	/// when no gesture was in progress.
	pub fn pointer_up(&mut self, model: &mut PatchModel, target: PointerTarget) -> bool {
		self.drag_line = None;
		let Some(origin) = self.pressed_node.take() else {
			self.reset_pointer();
			return false;
		};
		self.reset_pointer();

		let PointerTarget::Node(dest) = target else {
			return false;
		};
		// A press and release on the same node is a click, not a link.
		if dest == origin {
			return false;
		}
		let Some(ends) = model.add_or_update_link(origin, dest) else {
			return false;
		};
		model.set_selection(Selection::Link(ends));
		true
	}

	/// Double click unpins a node, re-admitting it to the simulation.
	pub fn double_click(&mut self, model: &mut PatchModel, target: PointerTarget) -> bool {
		let PointerTarget::Node(id) = target else {
			return false;
		};
		model.unpin(id);
		true
	}

	/// A key went down. Fires at most once per physical key press; commands
	/// require a current selection.
	pub fn key_down(&mut self, model: &mut PatchModel, key: Key) -> bool {
		if self.latch == KeyLatch::Held {
			return false;
		}
		self.latch = KeyLatch::Held;

		let selection = model.selection();
		if selection.is_none() {
			return false;
		}
		match key {
			Key::Delete => {
				match selection {
					Selection::Link(ends) => model.remove_link(ends),
					Selection::Composite(master) => model.remove_composite(master),
					// A selected node is only deselected, never removed here.
					Selection::Node(_) | Selection::None => {}
				}
				model.clear_selection();
				true
			}
			Key::B => {
				if let Some(ends) = selection.link()
					&& let Some(link) = model.link_mut(ends)
				{
					link.left = true;
					link.right = true;
				}
				true
			}
			Key::L => {
				if let Some(ends) = selection.link()
					&& let Some(link) = model.link_mut(ends)
				{
					link.left = true;
					link.right = false;
				}
				true
			}
			Key::R => {
				if let Some(id) = selection.node() {
					if let Some(node) = model.node_mut(id) {
						node.reflexive = !node.reflexive;
					}
				} else if let Some(ends) = selection.link()
					&& let Some(link) = model.link_mut(ends)
				{
					link.left = false;
					link.right = true;
				}
				true
			}
			Key::Other => false,
		}
	}

	/// Key released: re-arm the latch.
	pub fn key_up(&mut self) {
		self.latch = KeyLatch::Idle;
	}
}

/// Node-repositioning drag gesture, kept separate from the link-drag
/// interpretation. Dragging pins the node under the pointer; releasing
/// leaves it fixed in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragState {
	node: Option<NodeId>,
}

impl DragState {
	pub fn active(&self) -> bool {
		self.node.is_some()
	}

	pub fn node(&self) -> Option<NodeId> {
		self.node
	}

	/// Begin dragging: pin the node at its current position.
	pub fn start(&mut self, model: &mut PatchModel, id: NodeId) -> bool {
		let Some(node) = model.node_mut(id) else {
			return false;
		};
		node.fixed = false;
		node.fx = Some(node.x);
		node.fy = Some(node.y);
		self.node = Some(id);
		true
	}

	/// Follow the pointer in world coordinates.
	pub fn drag(&mut self, model: &mut PatchModel, world: Point) -> Option<NodeId> {
		let id = self.node?;
		let node = model.node_mut(id)?;
		node.fx = Some(world.x);
		node.fy = Some(world.y);
		node.x = world.x;
		node.y = world.y;
		Some(id)
	}

	/// Release: the node stays pinned where it was dropped.
	pub fn end(&mut self, model: &mut PatchModel, world: Point) -> Option<NodeId> {
		let id = self.node.take()?;
		let node = model.node_mut(id)?;
		node.fx = Some(world.x);
		node.fy = Some(world.y);
		node.x = world.x;
		node.y = world.y;
		node.fixed = true;
		Some(id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fixture() -> (PatchModel, ExtensionRegistry, Interpreter) {
		(
			PatchModel::new(),
			ExtensionRegistry::with_builtins(),
			Interpreter::new(),
		)
	}

	fn plain_pair(model: &mut PatchModel) -> (NodeId, NodeId) {
		let a = model.add_node(NodeKind::Plain, Point::new(10.0, 10.0));
		let b = model.add_node(NodeKind::Plain, Point::new(50.0, 50.0));
		(a, b)
	}

	#[test]
	fn canvas_press_creates_a_widget() {
		let (mut model, registry, mut input) = fixture();
		let changed = input.pointer_down(
			&mut model,
			&registry,
			NodeKind::Oscillator,
			PointerTarget::Canvas,
			Point::new(120.0, 80.0),
			1.0,
			Modifiers::default(),
		);
		assert!(changed);
		// Master plus two dials.
		assert_eq!(model.nodes().len(), 3);
	}

	#[test]
	fn modifier_press_is_reserved() {
		let (mut model, registry, mut input) = fixture();
		let changed = input.pointer_down(
			&mut model,
			&registry,
			NodeKind::Oscillator,
			PointerTarget::Canvas,
			Point::default(),
			1.0,
			Modifiers { ctrl: true },
		);
		assert!(!changed);
		assert!(model.nodes().is_empty());
	}

	#[test]
	fn node_press_selects_and_shows_drag_line() {
		let (mut model, registry, mut input) = fixture();
		let (a, _) = plain_pair(&mut model);
		input.pointer_down(
			&mut model,
			&registry,
			NodeKind::Plain,
			PointerTarget::Node(a),
			Point::new(10.0, 10.0),
			2.0,
			Modifiers::default(),
		);
		assert_eq!(model.selection(), Selection::Node(a));
		let line = input.drag_line().unwrap();
		// Anchored at the node, scaled into screen space.
		assert_eq!(line.from, Point::new(20.0, 20.0));
		assert_eq!(line.from, line.to);
	}

	#[test]
	fn child_press_selects_owning_composite() {
		let (mut model, registry, mut input) = fixture();
		let master = registry.spawn(&mut model, NodeKind::Oscillator, Point::default());
		let child = model.composite_of_master(master).unwrap().children[0];
		input.pointer_down(
			&mut model,
			&registry,
			NodeKind::Plain,
			PointerTarget::Node(child),
			Point::default(),
			1.0,
			Modifiers::default(),
		);
		assert_eq!(model.selection(), Selection::Composite(master));
	}

	#[test]
	fn release_on_origin_is_a_click_not_a_link() {
		let (mut model, registry, mut input) = fixture();
		let (a, _) = plain_pair(&mut model);
		input.pointer_down(
			&mut model,
			&registry,
			NodeKind::Plain,
			PointerTarget::Node(a),
			Point::default(),
			1.0,
			Modifiers::default(),
		);
		let changed = input.pointer_up(&mut model, PointerTarget::Node(a));
		assert!(!changed);
		assert!(model.links().is_empty());
		assert!(input.drag_line().is_none());
		// Selection from the press survives the cancelled drag.
		assert_eq!(model.selection(), Selection::Node(a));
	}

	#[test]
	fn drag_between_nodes_creates_and_selects_link() {
		let (mut model, registry, mut input) = fixture();
		let (a, b) = plain_pair(&mut model);
		input.pointer_down(
			&mut model,
			&registry,
			NodeKind::Plain,
			PointerTarget::Node(a),
			Point::default(),
			1.0,
			Modifiers::default(),
		);
		let changed = input.pointer_up(&mut model, PointerTarget::Node(b));
		assert!(changed);
		assert_eq!(model.links().len(), 1);
		let link = model.links()[0];
		assert!(!link.left && link.right);
		assert_eq!(model.selection(), Selection::Link(link.ends));
	}

	#[test]
	fn opposing_drags_yield_one_bidirectional_link() {
		let (mut model, registry, mut input) = fixture();
		let (a, b) = plain_pair(&mut model);
		for (from, to) in [(a, b), (b, a)] {
			input.pointer_down(
				&mut model,
				&registry,
				NodeKind::Plain,
				PointerTarget::Node(from),
				Point::default(),
				1.0,
				Modifiers::default(),
			);
			input.pointer_up(&mut model, PointerTarget::Node(to));
		}
		assert_eq!(model.links().len(), 1);
		let link = model.links()[0];
		assert!(link.left && link.right);
	}

	#[test]
	fn move_tracks_drag_line_in_screen_space() {
		let (mut model, registry, mut input) = fixture();
		let (a, _) = plain_pair(&mut model);
		input.pointer_down(
			&mut model,
			&registry,
			NodeKind::Plain,
			PointerTarget::Node(a),
			Point::default(),
			2.0,
			Modifiers::default(),
		);
		assert!(input.pointer_move(&model, Point::new(70.0, 35.0), 2.0));
		let line = input.drag_line().unwrap();
		assert_eq!(line.from, Point::new(20.0, 20.0));
		assert_eq!(line.to, Point::new(70.0, 35.0));
	}

	#[test]
	fn stray_release_is_idempotent() {
		let (mut model, _, mut input) = fixture();
		assert!(!input.pointer_up(&mut model, PointerTarget::Canvas));
		assert!(!input.pointer_up(&mut model, PointerTarget::Canvas));
		assert!(input.drag_line().is_none());
	}

	#[test]
	fn link_press_toggles_selection() {
		let (mut model, registry, mut input) = fixture();
		let (a, b) = plain_pair(&mut model);
		let ends = model.add_or_update_link(a, b).unwrap();
		input.pointer_down(
			&mut model,
			&registry,
			NodeKind::Plain,
			PointerTarget::Link(ends),
			Point::default(),
			1.0,
			Modifiers::default(),
		);
		assert_eq!(model.selection(), Selection::Link(ends));
		input.pointer_up(&mut model, PointerTarget::Link(ends));
		input.pointer_down(
			&mut model,
			&registry,
			NodeKind::Plain,
			PointerTarget::Link(ends),
			Point::default(),
			1.0,
			Modifiers::default(),
		);
		assert!(model.selection().is_none());
	}

	#[test]
	fn held_key_fires_once_until_released() {
		let (mut model, _, mut input) = fixture();
		let (a, _) = plain_pair(&mut model);
		model.set_selection(Selection::Node(a));

		assert!(input.key_down(&mut model, Key::R));
		assert!(model.node(a).unwrap().reflexive);
		// Auto-repeat while held must be ignored.
		assert!(!input.key_down(&mut model, Key::R));
		assert!(model.node(a).unwrap().reflexive);

		input.key_up();
		assert!(input.key_down(&mut model, Key::R));
		assert!(!model.node(a).unwrap().reflexive);
	}

	#[test]
	fn commands_require_a_selection() {
		let (mut model, _, mut input) = fixture();
		plain_pair(&mut model);
		assert!(!input.key_down(&mut model, Key::Delete));
		assert_eq!(model.nodes().len(), 2);
	}

	#[test]
	fn delete_removes_selected_link_only() {
		let (mut model, _, mut input) = fixture();
		let (a, b) = plain_pair(&mut model);
		let ends = model.add_or_update_link(a, b).unwrap();
		model.set_selection(Selection::Link(ends));
		assert!(input.key_down(&mut model, Key::Delete));
		assert!(model.links().is_empty());
		assert_eq!(model.nodes().len(), 2);
		assert!(model.selection().is_none());
	}

	#[test]
	fn delete_removes_selected_composite_entirely() {
		let (mut model, registry, mut input) = fixture();
		let master = registry.spawn(&mut model, NodeKind::Buzz, Point::default());
		model.set_selection(Selection::Composite(master));
		assert!(input.key_down(&mut model, Key::Delete));
		assert!(model.nodes().is_empty());
		assert!(model.selection().is_none());
	}

	#[test]
	fn delete_on_selected_node_only_deselects() {
		let (mut model, _, mut input) = fixture();
		let (a, _) = plain_pair(&mut model);
		model.set_selection(Selection::Node(a));
		assert!(input.key_down(&mut model, Key::Delete));
		assert!(model.node(a).is_some());
		assert!(model.selection().is_none());
	}

	#[test]
	fn direction_keys_rewrite_link_arrows() {
		let (mut model, _, mut input) = fixture();
		let (a, b) = plain_pair(&mut model);
		let ends = model.add_or_update_link(a, b).unwrap();
		model.set_selection(Selection::Link(ends));

		input.key_down(&mut model, Key::B);
		input.key_up();
		let link = *model.link(ends).unwrap();
		assert!(link.left && link.right);

		input.key_down(&mut model, Key::L);
		input.key_up();
		let link = *model.link(ends).unwrap();
		assert!(link.left && !link.right);

		input.key_down(&mut model, Key::R);
		input.key_up();
		let link = *model.link(ends).unwrap();
		assert!(!link.left && link.right);
	}

	#[test]
	fn reflexive_toggle_is_an_involution() {
		let (mut model, _, mut input) = fixture();
		let (a, _) = plain_pair(&mut model);
		model.set_selection(Selection::Node(a));
		input.key_down(&mut model, Key::R);
		input.key_up();
		input.key_down(&mut model, Key::R);
		input.key_up();
		assert!(!model.node(a).unwrap().reflexive);
	}

	#[test]
	fn drag_gesture_pins_on_release() {
		let (mut model, _, _) = fixture();
		let (a, _) = plain_pair(&mut model);
		let mut drag = DragState::default();
		assert!(drag.start(&mut model, a));
		assert!(drag.active());
		drag.drag(&mut model, Point::new(200.0, 150.0));
		drag.end(&mut model, Point::new(210.0, 160.0));
		assert!(!drag.active());

		let node = model.node(a).unwrap();
		assert!(node.fixed);
		assert_eq!(node.fx, Some(210.0));
		assert_eq!(node.fy, Some(160.0));
	}

	#[test]
	fn double_click_unpins() {
		let (mut model, _, mut input) = fixture();
		let (a, _) = plain_pair(&mut model);
		let mut drag = DragState::default();
		drag.start(&mut model, a);
		drag.end(&mut model, Point::new(5.0, 5.0));
		assert!(model.node(a).unwrap().fixed);

		assert!(input.double_click(&mut model, PointerTarget::Node(a)));
		let node = model.node(a).unwrap();
		assert!(!node.fixed);
		assert!(node.fx.is_none() && node.fy.is_none());
	}
}
