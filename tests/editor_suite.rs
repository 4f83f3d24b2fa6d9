//! End-to-end editing scenarios driven through the session's public entry
//! points, the way the canvas component drives them.

// Test target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use patch_graph::components::patch_graph::input::{Key, Modifiers, PointerTarget};
use patch_graph::components::patch_graph::model::Selection;
use patch_graph::components::patch_graph::scene::SceneOp;
use patch_graph::components::patch_graph::types::Point;
use patch_graph::{EditorConfig, EditorState, NodeId, NodeKind};

fn session() -> EditorState {
	EditorState::new(&EditorConfig::default())
}

fn press_and_release(state: &mut EditorState, from: NodeId, to: NodeId) {
	let origin = state.model.node(from).unwrap();
	let at = Point::new(origin.x * state.k, origin.y * state.k);
	state.pointer_down(PointerTarget::Node(from), at, Modifiers::default());
	state.pointer_up(PointerTarget::Node(to));
	state.restart();
}

fn tap(state: &mut EditorState, key: Key) {
	state.key_down(key);
	state.key_up();
	state.restart();
}

#[test]
fn wiring_a_patch_end_to_end() {
	let mut state = session();

	// Two widgets placed on empty canvas: an oscillator and a buzz.
	state.pointer_down(
		PointerTarget::Canvas,
		Point::new(200.0, 150.0),
		Modifiers::default(),
	);
	state.restart();
	let osc = NodeId(0);
	assert_eq!(state.model.composite_of_master(osc).unwrap().children.len(), 2);

	let node_count = state.model.nodes().len();
	assert_eq!(node_count, 3);

	// A modifier-held click is reserved and must not create anything.
	state.pointer_down(
		PointerTarget::Canvas,
		Point::new(600.0, 300.0),
		Modifiers { ctrl: true },
	);
	assert_eq!(state.model.nodes().len(), node_count);

	// Wire the oscillator's first dial from a plain node.
	let plain = state.model.add_node(NodeKind::Plain, Point::new(500.0, 250.0));
	let dial = state.model.composite_of_master(osc).unwrap().children[0];
	press_and_release(&mut state, plain, dial);

	assert_eq!(state.model.links().len(), 1);
	let link = state.model.links()[0];
	assert!(link.ends.touches(plain) && link.ends.touches(dial));
	assert!(link.source() < link.target());
	assert_eq!(state.model.selection(), Selection::Link(link.ends));
}

#[test]
fn ids_stay_monotonic_across_deletions() {
	let mut state = session();
	let a = state.model.add_node(NodeKind::Plain, Point::new(10.0, 10.0));
	let b = state.model.add_node(NodeKind::Plain, Point::new(20.0, 20.0));
	state.restart();

	state.model.set_selection(Selection::Node(a));
	tap(&mut state, Key::Delete); // deselects but keeps the node
	assert!(state.model.node(a).is_some());

	state.model.remove_node(a);
	let c = state.model.add_node(NodeKind::Plain, Point::new(30.0, 30.0));
	assert!(c > b);
	assert!(c > a);
}

#[test]
fn directional_gestures_and_keys() {
	let mut state = session();
	let a = state.model.add_node(NodeKind::Plain, Point::new(10.0, 10.0));
	let b = state.model.add_node(NodeKind::Plain, Point::new(50.0, 50.0));
	state.restart();

	// Drag A to B: one link, arrow toward B.
	press_and_release(&mut state, a, b);
	assert_eq!(state.model.links().len(), 1);
	{
		let link = state.model.links()[0];
		assert_eq!((link.source(), link.target()), (a, b));
		assert!(!link.left && link.right);
	}

	// Drag B to A afterward: still one link, now bidirectional.
	press_and_release(&mut state, b, a);
	assert_eq!(state.model.links().len(), 1);
	let ends = {
		let link = state.model.links()[0];
		assert!(link.left && link.right);
		link.ends
	};

	// L forces left-only.
	state.model.set_selection(Selection::Link(ends));
	tap(&mut state, Key::L);
	{
		let link = *state.model.link(ends).unwrap();
		assert!(link.left && !link.right);
	}

	// R on a link forces right-only.
	state.model.set_selection(Selection::Link(ends));
	tap(&mut state, Key::R);
	{
		let link = *state.model.link(ends).unwrap();
		assert!(!link.left && link.right);
	}

	// B restores both.
	state.model.set_selection(Selection::Link(ends));
	tap(&mut state, Key::B);
	{
		let link = *state.model.link(ends).unwrap();
		assert!(link.left && link.right);
	}

	// R on a node toggles reflexivity; twice returns to the original.
	state.model.set_selection(Selection::Node(a));
	tap(&mut state, Key::R);
	assert!(state.model.node(a).unwrap().reflexive);
	state.model.set_selection(Selection::Node(a));
	tap(&mut state, Key::R);
	assert!(!state.model.node(a).unwrap().reflexive);

	// Delete the selected link: nothing remains, selection cleared.
	state.model.set_selection(Selection::Link(ends));
	tap(&mut state, Key::Delete);
	assert!(state.model.links().is_empty());
	assert!(state.model.selection().is_none());
}

#[test]
fn composite_deletion_cascades_through_links() {
	let mut state = session();
	// Fill ids 0..5 so the widget master lands on id 5.
	for i in 0..5 {
		state
			.model
			.add_node(NodeKind::Plain, Point::new(i as f64 * 40.0, 400.0));
	}
	state.pointer_down(
		PointerTarget::Canvas,
		Point::new(300.0, 100.0),
		Modifiers::default(),
	);
	state.restart();

	let master = NodeId(5);
	let children = state.model.composite_of_master(master).unwrap().children.clone();
	assert_eq!(children, vec![NodeId(6), NodeId(7)]);

	// Wire an outside node into the widget, then delete the composite.
	press_and_release(&mut state, NodeId(0), children[1]);
	state.model.set_selection(Selection::Composite(master));
	tap(&mut state, Key::Delete);

	for id in [master, children[0], children[1]] {
		assert!(state.model.node(id).is_none());
		for link in state.model.links() {
			assert!(!link.ends.touches(id));
		}
	}
	assert!(state.model.selection().is_none());
	assert!(state.model.links().is_empty());
}

#[test]
fn selection_stays_exclusive_through_gestures() {
	let mut state = session();
	let a = state.model.add_node(NodeKind::Plain, Point::new(10.0, 10.0));
	let b = state.model.add_node(NodeKind::Plain, Point::new(50.0, 50.0));
	state.restart();

	state.pointer_down(PointerTarget::Node(a), Point::new(10.0, 10.0), Modifiers::default());
	assert_eq!(state.model.selection(), Selection::Node(a));
	state.pointer_up(PointerTarget::Node(b));
	// Completing the drag selects the link and nothing else.
	let ends = state.model.links()[0].ends;
	assert_eq!(state.model.selection(), Selection::Link(ends));

	// Clicking the selected link again deselects it.
	state.pointer_down(PointerTarget::Link(ends), Point::default(), Modifiers::default());
	state.pointer_up(PointerTarget::Link(ends));
	assert_eq!(state.model.selection(), Selection::Link(ends));
	state.pointer_down(PointerTarget::Link(ends), Point::default(), Modifiers::default());
	assert!(state.model.selection().is_none());
}

#[test]
fn reconciler_tracks_the_whole_session() {
	let mut state = session();
	state.pointer_down(
		PointerTarget::Canvas,
		Point::new(240.0, 120.0),
		Modifiers::default(),
	);
	let ops = state.restart();
	let creates = ops
		.iter()
		.filter(|op| matches!(op, SceneOp::CreateNode(_)))
		.count();
	assert_eq!(creates, 3);

	// Nothing changed since: reconciliation is a no-op.
	assert!(state.restart().is_empty());

	// Deleting the composite retires every visual.
	let master = NodeId(0);
	state.model.set_selection(Selection::Composite(master));
	state.key_down(Key::Delete);
	state.key_up();
	let ops = state.restart();
	let removes = ops
		.iter()
		.filter(|op| matches!(op, SceneOp::RemoveNode(_)))
		.count();
	assert_eq!(removes, 3);
}

#[test]
fn pinning_survives_simulation_and_double_click_frees() {
	let mut state = session();
	let a = state.model.add_node(NodeKind::Plain, Point::new(100.0, 100.0));
	let b = state.model.add_node(NodeKind::Plain, Point::new(140.0, 100.0));
	state.model.add_or_update_link(a, b);
	state.restart();

	state.drag_start(a);
	state.drag_to(Point::new(50.0, 60.0));
	state.drag_end(Point::new(50.0, 60.0));

	for _ in 0..60 {
		state.tick(0.016);
	}
	let node = state.model.node(a).unwrap();
	assert_eq!((node.x, node.y), (50.0, 60.0));
	assert!(node.fixed);

	state.double_click(PointerTarget::Node(a));
	state.restart();
	for _ in 0..60 {
		state.tick(0.016);
	}
	let node = state.model.node(a).unwrap();
	assert_ne!((node.x, node.y), (50.0, 60.0));
}

#[test]
fn frame_geometry_follows_arrowheads() {
	let mut state = session();
	let a = state.model.add_node(NodeKind::Plain, Point::new(0.0, 0.0));
	let b = state.model.add_node(NodeKind::Plain, Point::new(200.0, 0.0));
	press_and_release(&mut state, a, b);

	// Freeze both nodes so the frame geometry is exact.
	for id in [a, b] {
		state.drag_start(id);
	}
	let frame = state.tick(0.016);
	let path = frame
		.links
		.iter()
		.find(|p| p.ends.touches(a))
		.expect("link path");
	// Plain padding at the source, arrowhead padding at the target.
	assert!((path.source.x - 12.0).abs() < 1e-9);
	assert!((path.target.x - 183.0).abs() < 1e-9);
}
