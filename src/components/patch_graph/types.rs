//! Core data types for the patch graph model and the host-supplied
//! editor configuration.

use serde::Deserialize;

/// Unique identifier of a node within an editing session.
///
/// Ids are handed out by the model from a monotonically increasing counter
/// and are never reused, so they are stable keys for rendered elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Kind tag selecting which visual/behavioral extension augments a node.
///
/// Kinds without a registered extension still render with the default
/// appearance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// Periodic waveform source with frequency and amplitude dials.
	Oscillator,
	/// Harmonic "buzz" source with frequency, amplitude and harmonics dials.
	Buzz,
	/// Undecorated node with no auxiliary children.
	Plain,
}

/// A point in world coordinates (or screen coordinates at the host boundary).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A node in the patch graph.
#[derive(Clone, Debug)]
pub struct Node {
	pub id: NodeId,
	pub kind: NodeKind,
	/// Current position, updated by the layout simulation.
	pub x: f64,
	pub y: f64,
	/// Pinned position override. While set, the simulation holds the node here.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
	/// True once the user has pinned the node in place.
	pub fixed: bool,
	/// Marks a self-loop, rendered as a distinguishing ring rather than a
	/// literal edge.
	pub reflexive: bool,
	/// Auxiliary sub-node owned by a composite widget. Child nodes are part
	/// of their master's widget and are not independently selectable.
	pub is_child: bool,
}

/// Canonical unordered node pair identifying a link.
///
/// The pair is always stored with `source < target`, so any two nodes map to
/// exactly one key no matter which side a gesture approached from. Direction
/// is carried separately by the link's arrowhead flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkEnds {
	source: NodeId,
	target: NodeId,
}

impl LinkEnds {
	/// Canonicalize a node pair. Returns `None` for a degenerate `(a, a)`
	/// pair; a self reference is expressed by the node's `reflexive` flag,
	/// never by a literal link.
	pub fn new(a: NodeId, b: NodeId) -> Option<Self> {
		if a == b {
			return None;
		}
		let (source, target) = if a < b { (a, b) } else { (b, a) };
		Some(Self { source, target })
	}

	pub fn source(&self) -> NodeId {
		self.source
	}

	pub fn target(&self) -> NodeId {
		self.target
	}

	/// Whether this link touches the given node.
	pub fn touches(&self, id: NodeId) -> bool {
		self.source == id || self.target == id
	}
}

/// A link between two distinct nodes.
///
/// `left` and `right` are independent arrowhead flags: both set means
/// bidirectional, neither set means undirected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	pub ends: LinkEnds,
	/// Arrowhead at the canonical source end.
	pub left: bool,
	/// Arrowhead at the canonical target end.
	pub right: bool,
}

impl Link {
	/// Set the arrowhead for a gesture arriving at `to`. Flags are only ever
	/// set, so an already-bidirectional link stays bidirectional.
	pub fn point_toward(&mut self, to: NodeId) {
		if to == self.target() {
			self.right = true;
		} else {
			self.left = true;
		}
	}

	pub fn source(&self) -> NodeId {
		self.ends.source()
	}

	pub fn target(&self) -> NodeId {
		self.ends.target()
	}
}

/// A master node plus the auxiliary child nodes of its widget.
///
/// The members remain individually addressable in the model but are deleted
/// together.
#[derive(Clone, Debug)]
pub struct Composite {
	pub master: NodeId,
	pub children: Vec<NodeId>,
}

/// Host-supplied editor configuration, loaded from an embedded JSON script
/// element (see [`crate::load_editor_config`]).
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Zoom factor applied to the whole scene.
	pub scale: f64,
	/// Theme preset name (see [`super::theme::Theme::by_name`]).
	pub theme: String,
	/// Node kind instantiated by an empty-canvas click.
	pub default_kind: NodeKind,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			width: 960.0,
			height: 500.0,
			scale: 1.0,
			theme: String::from("default"),
			default_kind: NodeKind::Oscillator,
		}
	}
}
