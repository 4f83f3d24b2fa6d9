//! Physics layout engine wrapping the `force_graph` simulation.
//!
//! `force_graph` supplies pairwise repulsion, spring attraction and damping;
//! this wrapper layers on the remaining layout behaviors the editor needs:
//! two centering forces pulling toward the canvas midpoint, a per-link rest
//! distance, pinned-node anchoring, and an alpha energy envelope so that a
//! restarted simulation keeps animating at low energy instead of freezing
//! between edits.
//!
//! The simulation graph is rebuilt from the model on every [`Simulation::sync`]
//! (positions are owned by the model and survive the rebuild), which keeps the
//! engine trivially consistent with arbitrary node/link edits.

use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::model::PatchModel;
use super::types::NodeId;

/// Alpha target applied after every reconciliation pass. Keeps the layout
/// settling smoothly through incremental edits.
pub const ALPHA_SETTLE: f32 = 0.3;

/// Below this energy, a simulation with a zero target goes idle.
const ALPHA_MIN: f32 = 0.001;
/// Per-tick interpolation factor toward the alpha target.
const ALPHA_DECAY: f32 = 0.0228;

/// Target rest length of a link, in world units.
const REST_DISTANCE: f64 = 150.0;
/// Fraction of the rest-length error corrected per tick (scaled by alpha).
const LINK_STRENGTH: f64 = 0.3;
/// Fraction of the distance to the canvas midpoint recovered per tick on
/// each axis (scaled by alpha).
const CENTER_STRENGTH: f64 = 0.05;

/// Iterative force layout over the patch graph.
pub struct Simulation {
	graph: ForceGraph<NodeId, ()>,
	index: HashMap<NodeId, DefaultNodeIdx>,
	links: Vec<(NodeId, NodeId)>,
	alpha: f32,
	alpha_target: f32,
	center: (f64, f64),
}

impl Simulation {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: ForceGraph::new(Self::parameters()),
			index: HashMap::new(),
			links: Vec::new(),
			alpha: 1.0,
			alpha_target: 0.0,
			center: (width / 2.0, height / 2.0),
		}
	}

	fn parameters() -> SimulationParameters {
		SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}

	/// Rebuild the simulation graph from the model's current node/link sets.
	/// Positions are seeded from the model; pinned nodes become anchors held
	/// at their pin.
	pub fn sync(&mut self, model: &PatchModel) {
		let mut graph = ForceGraph::new(Self::parameters());
		let mut index = HashMap::new();
		let mut links = Vec::new();

		for node in model.nodes() {
			let x = node.fx.unwrap_or(node.x) as f32;
			let y = node.fy.unwrap_or(node.y) as f32;
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: node.fixed,
				user_data: node.id,
			});
			index.insert(node.id, idx);
		}

		for link in model.links() {
			if let (Some(&a), Some(&b)) = (index.get(&link.source()), index.get(&link.target())) {
				graph.add_edge(a, b, EdgeData::default());
				links.push((link.source(), link.target()));
			}
		}

		self.graph = graph;
		self.index = index;
		self.links = links;
	}

	/// Re-energize the simulation toward the given alpha target.
	pub fn restart(&mut self, target: f32) {
		self.alpha_target = target;
		if self.alpha < target {
			self.alpha = target;
		}
	}

	/// Lower (or raise) the energy target without touching current alpha.
	/// A zero target lets the simulation decay to rest.
	pub fn set_alpha_target(&mut self, target: f32) {
		self.alpha_target = target;
	}

	pub fn alpha(&self) -> f32 {
		self.alpha
	}

	/// Whether the simulation still has energy to spend.
	pub fn is_active(&self) -> bool {
		self.alpha >= ALPHA_MIN || self.alpha_target >= ALPHA_MIN
	}

	/// Pin a node at the given world position and hold it there. The
	/// simulation stops repositioning it until [`Simulation::release`].
	pub fn pin(&mut self, id: NodeId, x: f64, y: f64) {
		if let Some(&idx) = self.index.get(&id) {
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = x as f32;
					node.data.y = y as f32;
					node.data.is_anchor = true;
				}
			});
		}
	}

	/// Re-admit a pinned node to the simulation.
	pub fn release(&mut self, id: NodeId) {
		if let Some(&idx) = self.index.get(&id) {
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.is_anchor = false;
				}
			});
		}
	}

	/// Advance the layout one step and write the resulting positions back
	/// into the model. Returns false (and does nothing) once the simulation
	/// has gone idle.
	pub fn tick(&mut self, dt: f32, model: &mut PatchModel) -> bool {
		if !self.is_active() {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
		let alpha = self.alpha as f64;

		self.graph.update(dt * self.alpha);

		// Rest-distance relaxation per link, applied as positional nudges.
		let mut positions: HashMap<NodeId, (f64, f64)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.data.user_data, (node.x() as f64, node.y() as f64));
		});
		let mut shift: HashMap<NodeId, (f64, f64)> = HashMap::new();
		for &(a, b) in &self.links {
			let (Some(&(ax, ay)), Some(&(bx, by))) = (positions.get(&a), positions.get(&b)) else {
				continue;
			};
			let (dx, dy) = (bx - ax, by - ay);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < f64::EPSILON {
				continue;
			}
			let correction = (dist - REST_DISTANCE) / dist * LINK_STRENGTH * alpha;
			let (sx, sy) = (dx * correction * 0.5, dy * correction * 0.5);
			let entry = shift.entry(a).or_insert((0.0, 0.0));
			entry.0 += sx;
			entry.1 += sy;
			let entry = shift.entry(b).or_insert((0.0, 0.0));
			entry.0 -= sx;
			entry.1 -= sy;
		}

		let (cx, cy) = self.center;
		self.graph.visit_nodes_mut(|node| {
			if node.data.is_anchor {
				return;
			}
			if let Some(&(sx, sy)) = shift.get(&node.data.user_data) {
				node.data.x += sx as f32;
				node.data.y += sy as f32;
			}
			node.data.x += ((cx - node.data.x as f64) * CENTER_STRENGTH * alpha) as f32;
			node.data.y += ((cy - node.data.y as f64) * CENTER_STRENGTH * alpha) as f32;
		});

		self.graph.visit_nodes(|node| {
			if let Some(model_node) = model.node_mut(node.data.user_data) {
				model_node.x = node.x() as f64;
				model_node.y = node.y() as f64;
			}
		});
		true
	}
}
