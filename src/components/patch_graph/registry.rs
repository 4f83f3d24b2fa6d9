//! Node-kind extension registry.
//!
//! Each [`NodeKind`] may register a capability that augments a freshly placed
//! master node with the auxiliary child nodes of its widget (parameter dials)
//! and contributes kind-specific visual decoration. The variant set is closed
//! per release, but the registry itself is open: hosts can register further
//! extensions. A kind without an extension degrades gracefully to the default
//! disc with no children.

use std::collections::HashMap;

use super::model::PatchModel;
use super::types::{Composite, Node, NodeId, NodeKind, Point};

/// Kind-specific visual decoration, consumed by the rendering backend.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDecor {
	/// Short label drawn beside the node.
	pub label: Option<&'static str>,
	/// Radius multiplier relative to the base node radius.
	pub radius_scale: f64,
	/// Draw the inner dial ring used for parameter children.
	pub dial_ring: bool,
}

impl Default for NodeDecor {
	fn default() -> Self {
		Self {
			label: None,
			radius_scale: 1.0,
			dial_ring: false,
		}
	}
}

/// Synthesize an auxiliary child node (a parameter dial) at the given point.
///
/// This is the callback extensions use from [`NodeExtension::augment`]; it is
/// public so hosts wiring their own extensions can do the same.
pub fn add_dial(model: &mut PatchModel, kind: NodeKind, at: Point) -> NodeId {
	model.add_child(kind, at)
}

/// A visual/behavioral capability attached to one node kind.
pub trait NodeExtension {
	/// The kind this extension handles.
	fn kind(&self) -> NodeKind;

	/// Called once for a freshly placed master node of this kind. Synthesizes
	/// child nodes and registers the resulting composite.
	fn augment(&self, model: &mut PatchModel, master: NodeId);

	/// Visual decoration for a node of this kind.
	fn decorate(&self, node: &Node) -> NodeDecor {
		let _ = node;
		NodeDecor::default()
	}
}

/// Oscillator widget: a master disc with frequency and amplitude dials.
struct OscillatorExtension;

/// Dial offsets below the master, in world units.
const OSC_DIALS: [(f64, f64); 2] = [(-26.0, 30.0), (26.0, 30.0)];
const BUZZ_DIALS: [(f64, f64); 3] = [(-30.0, 28.0), (0.0, 40.0), (30.0, 28.0)];

impl NodeExtension for OscillatorExtension {
	fn kind(&self) -> NodeKind {
		NodeKind::Oscillator
	}

	fn augment(&self, model: &mut PatchModel, master: NodeId) {
		let Some(node) = model.node(master) else {
			return;
		};
		let (x, y) = (node.x, node.y);
		let children = OSC_DIALS
			.iter()
			.map(|(dx, dy)| {
				add_dial(model, NodeKind::Oscillator, Point::new(x + dx, y + dy))
			})
			.collect();
		model.register_composite(Composite { master, children });
	}

	fn decorate(&self, node: &Node) -> NodeDecor {
		if node.is_child {
			NodeDecor {
				label: None,
				radius_scale: 0.6,
				dial_ring: true,
			}
		} else {
			NodeDecor {
				label: Some("osc"),
				radius_scale: 1.4,
				dial_ring: false,
			}
		}
	}
}

/// Buzz widget: a harmonic source with frequency, amplitude and harmonics
/// dials.
struct BuzzExtension;

impl NodeExtension for BuzzExtension {
	fn kind(&self) -> NodeKind {
		NodeKind::Buzz
	}

	fn augment(&self, model: &mut PatchModel, master: NodeId) {
		let Some(node) = model.node(master) else {
			return;
		};
		let (x, y) = (node.x, node.y);
		let children = BUZZ_DIALS
			.iter()
			.map(|(dx, dy)| add_dial(model, NodeKind::Buzz, Point::new(x + dx, y + dy)))
			.collect();
		model.register_composite(Composite { master, children });
	}

	fn decorate(&self, node: &Node) -> NodeDecor {
		if node.is_child {
			NodeDecor {
				label: None,
				radius_scale: 0.6,
				dial_ring: true,
			}
		} else {
			NodeDecor {
				label: Some("buzz"),
				radius_scale: 1.4,
				dial_ring: false,
			}
		}
	}
}

/// Registry mapping node kinds to their extensions.
pub struct ExtensionRegistry {
	extensions: HashMap<NodeKind, Box<dyn NodeExtension>>,
}

impl ExtensionRegistry {
	/// An empty registry; every kind renders with default appearance.
	pub fn new() -> Self {
		Self {
			extensions: HashMap::new(),
		}
	}

	/// Registry with the built-in oscillator and buzz extensions.
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry.register(Box::new(OscillatorExtension));
		registry.register(Box::new(BuzzExtension));
		registry
	}

	/// Register an extension, replacing any previous one for the same kind.
	pub fn register(&mut self, extension: Box<dyn NodeExtension>) {
		self.extensions.insert(extension.kind(), extension);
	}

	/// Place a master node of the given kind and let its extension (if any)
	/// synthesize children and register the composite.
	pub fn spawn(&self, model: &mut PatchModel, kind: NodeKind, at: Point) -> NodeId {
		let master = model.add_node(kind, at);
		if let Some(extension) = self.extensions.get(&kind) {
			extension.augment(model, master);
		}
		master
	}

	/// Decoration for a node, falling back to the default appearance for
	/// kinds without an extension.
	pub fn decorate(&self, node: &Node) -> NodeDecor {
		self.extensions
			.get(&node.kind)
			.map(|e| e.decorate(node))
			.unwrap_or_default()
	}
}

impl Default for ExtensionRegistry {
	fn default() -> Self {
		Self::with_builtins()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn oscillator_spawn_registers_composite_with_dials() {
		let mut model = PatchModel::new();
		let registry = ExtensionRegistry::with_builtins();
		let master = registry.spawn(&mut model, NodeKind::Oscillator, Point::new(100.0, 100.0));

		let composite = model.composite_of_master(master).expect("composite");
		assert_eq!(composite.children.len(), 2);
		for child in &composite.children {
			let node = model.node(*child).unwrap();
			assert!(node.is_child);
			assert!(*child > master);
		}
		assert_eq!(model.nodes().len(), 3);
	}

	#[test]
	fn buzz_spawn_has_three_dials() {
		let mut model = PatchModel::new();
		let registry = ExtensionRegistry::with_builtins();
		let master = registry.spawn(&mut model, NodeKind::Buzz, Point::default());
		assert_eq!(model.composite_of_master(master).unwrap().children.len(), 3);
	}

	#[test]
	fn unregistered_kind_degrades_to_default() {
		let mut model = PatchModel::new();
		let registry = ExtensionRegistry::with_builtins();
		let master = registry.spawn(&mut model, NodeKind::Plain, Point::default());
		assert!(model.composite_of_master(master).is_none());
		assert_eq!(model.nodes().len(), 1);
		let decor = registry.decorate(model.node(master).unwrap());
		assert_eq!(decor, NodeDecor::default());
	}
}
