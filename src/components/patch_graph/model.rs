//! Authoritative in-memory graph model: node set, link set, composites and
//! selection state.
//!
//! The model is transient, held only for the lifetime of an editing session.
//! Every destructive operation cascades so that no rendered element can ever
//! observe a dangling reference: removing a node first prunes every link
//! incident to it, and removing a composite removes each child, then the
//! master, through the same path.

use super::types::{Composite, Link, LinkEnds, Node, NodeId, NodeKind, Point};

/// Current selection. At most one entity is selected at any time; the enum
/// makes competing selections unrepresentable.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Selection {
	#[default]
	None,
	Node(NodeId),
	Link(LinkEnds),
	/// A composite widget, identified by its master node id.
	Composite(NodeId),
}

impl Selection {
	pub fn is_none(&self) -> bool {
		matches!(self, Selection::None)
	}

	pub fn node(&self) -> Option<NodeId> {
		match self {
			Selection::Node(id) => Some(*id),
			_ => None,
		}
	}

	pub fn link(&self) -> Option<LinkEnds> {
		match self {
			Selection::Link(ends) => Some(*ends),
			_ => None,
		}
	}

	pub fn composite(&self) -> Option<NodeId> {
		match self {
			Selection::Composite(master) => Some(*master),
			_ => None,
		}
	}
}

/// The mutable patch graph owned by an editor session.
#[derive(Debug, Default)]
pub struct PatchModel {
	nodes: Vec<Node>,
	links: Vec<Link>,
	composites: Vec<Composite>,
	selection: Selection,
	next_id: u32,
}

impl PatchModel {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn composites(&self) -> &[Composite] {
		&self.composites
	}

	pub fn selection(&self) -> Selection {
		self.selection
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	pub fn link(&self, ends: LinkEnds) -> Option<&Link> {
		self.links.iter().find(|l| l.ends == ends)
	}

	pub fn link_mut(&mut self, ends: LinkEnds) -> Option<&mut Link> {
		self.links.iter_mut().find(|l| l.ends == ends)
	}

	fn alloc_id(&mut self) -> NodeId {
		let id = NodeId(self.next_id);
		self.next_id += 1;
		id
	}

	fn push_node(&mut self, kind: NodeKind, at: Point, is_child: bool) -> NodeId {
		let id = self.alloc_id();
		self.nodes.push(Node {
			id,
			kind,
			x: at.x,
			y: at.y,
			fx: None,
			fy: None,
			fixed: false,
			reflexive: false,
			is_child,
		});
		id
	}

	/// Add a top-level node at the given position.
	pub fn add_node(&mut self, kind: NodeKind, at: Point) -> NodeId {
		self.push_node(kind, at, false)
	}

	/// Add an auxiliary child node at the given position. Used by node-kind
	/// extensions to synthesize the sub-nodes of a composite widget.
	pub fn add_child(&mut self, kind: NodeKind, at: Point) -> NodeId {
		self.push_node(kind, at, true)
	}

	/// Remove a node, pruning every link incident to it first and dropping it
	/// from any composite's child list. Clears the selection if it referenced
	/// the node or one of its links.
	pub fn remove_node(&mut self, id: NodeId) {
		self.links.retain(|l| !l.ends.touches(id));
		self.nodes.retain(|n| n.id != id);
		for composite in &mut self.composites {
			composite.children.retain(|c| *c != id);
		}
		let stale = match self.selection {
			Selection::Node(sel) => sel == id,
			Selection::Link(ends) => ends.touches(id),
			Selection::Composite(master) => master == id,
			Selection::None => false,
		};
		if stale {
			self.selection = Selection::None;
		}
	}

	/// Create a link between two distinct nodes, or set the appropriate
	/// arrowhead on the one that already joins them. The gesture runs from
	/// `from` to `to`; a fresh link gets exactly one direction flag set.
	///
	/// Returns the canonical key, or `None` for a degenerate `from == to`
	/// gesture.
	pub fn add_or_update_link(&mut self, from: NodeId, to: NodeId) -> Option<LinkEnds> {
		let ends = LinkEnds::new(from, to)?;
		match self.link_mut(ends) {
			Some(link) => link.point_toward(to),
			None => {
				let mut link = Link {
					ends,
					left: false,
					right: false,
				};
				link.point_toward(to);
				self.links.push(link);
			}
		}
		Some(ends)
	}

	/// Remove a link. Clears the selection if it referenced the link.
	pub fn remove_link(&mut self, ends: LinkEnds) {
		self.links.retain(|l| l.ends != ends);
		if self.selection == Selection::Link(ends) {
			self.selection = Selection::None;
		}
	}

	/// Replace the selection. Selecting one entity implicitly deselects the
	/// others; the enum admits no other outcome.
	pub fn set_selection(&mut self, selection: Selection) {
		self.selection = selection;
	}

	pub fn clear_selection(&mut self) {
		self.selection = Selection::None;
	}

	/// Register a composite widget. Called by node-kind extensions after they
	/// have synthesized the children of a freshly created master.
	pub fn register_composite(&mut self, composite: Composite) {
		self.composites.push(composite);
	}

	/// The composite a child node belongs to, if any.
	pub fn composite_owning(&self, child: NodeId) -> Option<&Composite> {
		self.composites
			.iter()
			.find(|c| c.children.contains(&child))
	}

	/// The composite mastered by the given node, if any.
	pub fn composite_of_master(&self, master: NodeId) -> Option<&Composite> {
		self.composites.iter().find(|c| c.master == master)
	}

	/// Remove a composite: every child, then the master, each through
	/// [`PatchModel::remove_node`] so link cleanup cascades per node.
	pub fn remove_composite(&mut self, master: NodeId) {
		let Some(composite) = self.composite_of_master(master) else {
			return;
		};
		let children = composite.children.clone();
		for child in children {
			self.remove_node(child);
		}
		self.remove_node(master);
		self.composites.retain(|c| c.master != master);
		if self.selection == Selection::Composite(master) {
			self.selection = Selection::None;
		}
	}

	/// Clear a node's pin so the simulation may move it again.
	pub fn unpin(&mut self, id: NodeId) {
		if let Some(node) = self.node_mut(id) {
			node.fixed = false;
			node.fx = None;
			node.fy = None;
		}
	}
}
