//! Scene reconciliation: an explicit diff between the model and the
//! previously rendered scene.
//!
//! [`Scene::reconcile`] compares the retained visual state (keyed by node id
//! and link identity, never by array index) against the model and emits the
//! minimal instruction list to bring a renderer in sync. The per-frame
//! geometry pass ([`frame`]) is separate: it only repositions elements that
//! already exist, it never creates or destroys them.

use std::collections::BTreeMap;

use super::input::DragLine;
use super::model::{PatchModel, Selection};
use super::registry::{ExtensionRegistry, NodeDecor};
use super::scale::ScaledValues;
use super::types::{LinkEnds, NodeId, NodeKind, Point};

/// Semantic visual state of a node. Color and shape derivation are the
/// renderer's concern.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub id: NodeId,
	pub kind: NodeKind,
	pub selected: bool,
	pub reflexive: bool,
	pub fixed: bool,
	/// Child nodes without an owning composite are hidden, not removed.
	pub visible: bool,
	pub is_child: bool,
	pub decor: NodeDecor,
}

/// Semantic visual state of a link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkVisual {
	pub ends: LinkEnds,
	pub left: bool,
	pub right: bool,
	pub selected: bool,
}

/// A single reconciliation instruction for the rendering backend.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneOp {
	CreateNode(NodeVisual),
	UpdateNode(NodeVisual),
	RemoveNode(NodeId),
	CreateLink(LinkVisual),
	UpdateLink(LinkVisual),
	RemoveLink(LinkEnds),
}

/// New position of a rendered node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePlacement {
	pub id: NodeId,
	pub x: f64,
	pub y: f64,
}

/// Endpoints of a rendered link segment, already padded away from the node
/// centers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkPath {
	pub ends: LinkEnds,
	pub source: Point,
	pub target: Point,
}

/// Geometry for one animation frame: repositioning only.
#[derive(Clone, Debug, Default)]
pub struct Frame {
	pub nodes: Vec<NodePlacement>,
	pub links: Vec<LinkPath>,
	/// Provisional link-drag line, in screen coordinates.
	pub drag_line: Option<DragLine>,
}

/// Retained visual state of the rendered scene.
#[derive(Debug, Default)]
pub struct Scene {
	nodes: BTreeMap<NodeId, NodeVisual>,
	links: BTreeMap<LinkEnds, LinkVisual>,
}

impl Scene {
	pub fn new() -> Self {
		Self::default()
	}

	fn node_visual(
		model: &PatchModel,
		registry: &ExtensionRegistry,
		node: &super::types::Node,
	) -> NodeVisual {
		NodeVisual {
			id: node.id,
			kind: node.kind,
			selected: model.selection() == Selection::Node(node.id),
			reflexive: node.reflexive,
			fixed: node.fixed,
			visible: !node.is_child || model.composite_owning(node.id).is_some(),
			is_child: node.is_child,
			decor: registry.decorate(node),
		}
	}

	fn link_visual(model: &PatchModel, ends: LinkEnds) -> Option<LinkVisual> {
		let link = model.link(ends)?;
		Some(LinkVisual {
			ends,
			left: link.left,
			right: link.right,
			selected: model.selection() == Selection::Link(ends),
		})
	}

	/// Diff the model against the retained scene and return the minimal
	/// add/update/remove set. Applying the ops (and retaining them here)
	/// makes the pass idempotent: reconciling an unchanged model yields no
	/// ops.
	pub fn reconcile(&mut self, model: &PatchModel, registry: &ExtensionRegistry) -> Vec<SceneOp> {
		let mut ops = Vec::new();

		// Removals first so a backend never holds an element whose model
		// entity is already gone.
		let stale_links: Vec<LinkEnds> = self
			.links
			.keys()
			.filter(|ends| model.link(**ends).is_none())
			.copied()
			.collect();
		for ends in stale_links {
			self.links.remove(&ends);
			ops.push(SceneOp::RemoveLink(ends));
		}
		let stale_nodes: Vec<NodeId> = self
			.nodes
			.keys()
			.filter(|id| model.node(**id).is_none())
			.copied()
			.collect();
		for id in stale_nodes {
			self.nodes.remove(&id);
			ops.push(SceneOp::RemoveNode(id));
		}

		// Nodes before links, so link creation always finds its endpoints.
		for node in model.nodes() {
			let visual = Self::node_visual(model, registry, node);
			match self.nodes.get(&node.id) {
				None => {
					self.nodes.insert(node.id, visual.clone());
					ops.push(SceneOp::CreateNode(visual));
				}
				Some(prev) if *prev != visual => {
					self.nodes.insert(node.id, visual.clone());
					ops.push(SceneOp::UpdateNode(visual));
				}
				Some(_) => {}
			}
		}
		for link in model.links() {
			let Some(visual) = Self::link_visual(model, link.ends) else {
				continue;
			};
			match self.links.get(&link.ends) {
				None => {
					self.links.insert(link.ends, visual);
					ops.push(SceneOp::CreateLink(visual));
				}
				Some(prev) if *prev != visual => {
					self.links.insert(link.ends, visual);
					ops.push(SceneOp::UpdateLink(visual));
				}
				Some(_) => {}
			}
		}

		ops
	}
}

/// Compute this frame's node translations and padded link segments.
///
/// Each link endpoint is offset from its node's center along the unit vector
/// between the two centers: by the arrowhead padding when that end carries an
/// arrowhead, by the plain padding otherwise. Coincident endpoints collapse
/// to the centers instead of dividing by zero.
pub fn frame(model: &PatchModel, scale: &ScaledValues) -> (Vec<NodePlacement>, Vec<LinkPath>) {
	let nodes = model
		.nodes()
		.iter()
		.map(|n| NodePlacement {
			id: n.id,
			x: n.x,
			y: n.y,
		})
		.collect();

	let links = model
		.links()
		.iter()
		.filter_map(|link| {
			let source = model.node(link.source())?;
			let target = model.node(link.target())?;
			let (dx, dy) = (target.x - source.x, target.y - source.y);
			let dist = (dx * dx + dy * dy).sqrt();
			let (sx, sy, tx, ty) = if dist < f64::EPSILON {
				(source.x, source.y, target.x, target.y)
			} else {
				let (ux, uy) = (dx / dist, dy / dist);
				let source_pad = if link.left {
					scale.arrow_pad
				} else {
					scale.node_pad
				};
				let target_pad = if link.right {
					scale.arrow_pad
				} else {
					scale.node_pad
				};
				(
					source.x + source_pad * ux,
					source.y + source_pad * uy,
					target.x - target_pad * ux,
					target.y - target_pad * uy,
				)
			};
			Some(LinkPath {
				ends: link.ends,
				source: Point::new(sx, sy),
				target: Point::new(tx, ty),
			})
		})
		.collect();

	(nodes, links)
}
