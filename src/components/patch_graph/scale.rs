//! Zoom-dependent sizing for editor visuals.
//!
//! The editor context carries a single zoom factor `k` that the host chooses;
//! this module centralizes how each visual measurement responds to it.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: the coordinate system of the graph model. World values
//!   scale proportionally with zoom.
//! - **Screen-space**: pixel coordinates on the canvas, constant regardless
//!   of zoom.

/// Defines how a visual measurement responds to the zoom factor.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k, so bounds divide by k.
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Scale configuration for the editor's visual elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Base node radius in world units. Doubles as the plain link padding.
	pub node_radius: f64,
	pub radius_behavior: ScaleBehavior,
	/// Link endpoint padding from a node center when that end carries an
	/// arrowhead.
	pub arrow_pad: f64,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	pub hit_behavior: ScaleBehavior,
	/// Distance from a link segment within which it is pickable, in screen
	/// pixels.
	pub link_hit_tolerance: f64,
	/// Link stroke width in screen pixels.
	pub link_width: f64,
	/// Provisional drag-line stroke width, in world units.
	pub drag_line_width: f64,
	/// Label font size in world units.
	pub label_size: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: 12.0,
			radius_behavior: ScaleBehavior::World,
			arrow_pad: 17.0,
			hit_radius: 14.0,
			hit_behavior: ScaleBehavior::Clamped {
				min_screen: 10.0,
				max_screen: f64::INFINITY,
			},
			link_hit_tolerance: 6.0,
			link_width: 2.5,
			drag_line_width: 4.0,
			label_size: 11.0,
		}
	}
}

/// Pre-computed sizes for a specific zoom level. Create once per pass and
/// hand to geometry/rendering code; all values are world-space unless noted.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	pub node_radius: f64,
	pub hit_radius: f64,
	/// Link padding at a plain end.
	pub node_pad: f64,
	/// Link padding at an arrowhead end.
	pub arrow_pad: f64,
	/// Link pick tolerance in screen pixels.
	pub link_hit_tolerance: f64,
	pub link_width: f64,
	/// Drag-line stroke width in screen pixels (drawn untransformed).
	pub drag_line_width: f64,
	/// Label font shorthand, e.g. "11px sans-serif".
	pub label_font: String,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let node_radius = config.radius_behavior.apply(config.node_radius, k);
		Self {
			k,
			node_radius,
			hit_radius: config.hit_behavior.apply(config.hit_radius, k),
			node_pad: node_radius,
			arrow_pad: config.arrow_pad,
			link_hit_tolerance: config.link_hit_tolerance,
			link_width: ScaleBehavior::Screen.apply(config.link_width, k),
			drag_line_width: config.drag_line_width * k,
			label_font: format!("{}px sans-serif", config.label_size),
		}
	}
}
