//! Visual theming for the patch editor.
//!
//! Node fills come from a categorical palette keyed by node id, so a node
//! keeps its color for the lifetime of the session. Selection brightens the
//! fill; the stroke is a darkened variant of it.

use super::types::NodeId;

/// RGBA color representation.
#[derive(Clone, Copy, Debug)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// A categorical palette assigning stable colors by node id.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Ten-hue categorical palette (default).
	pub fn category() -> Self {
		Self {
			colors: vec![
				Color::rgb(31, 119, 180),  // Blue
				Color::rgb(255, 127, 14),  // Orange
				Color::rgb(44, 160, 44),   // Green
				Color::rgb(214, 39, 40),   // Red
				Color::rgb(148, 103, 189), // Purple
				Color::rgb(140, 86, 75),   // Brown
				Color::rgb(227, 119, 194), // Pink
				Color::rgb(127, 127, 127), // Gray
				Color::rgb(188, 189, 34),  // Olive
				Color::rgb(23, 190, 207),  // Cyan
			],
		}
	}

	/// Muted slate palette for the dark preset.
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(108, 142, 173), // Air force blue
				Color::rgb(119, 158, 165), // Desaturated cyan
				Color::rgb(143, 163, 180), // Cool gray
				Color::rgb(122, 153, 168), // Dusty blue
			],
		}
	}

	/// Stable color for a node id.
	pub fn for_node(&self, id: NodeId) -> Color {
		self.colors[id.0 as usize % self.colors.len()]
	}
}

/// Background style.
#[derive(Clone, Copy, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
}

/// Link visual style.
#[derive(Clone, Copy, Debug)]
pub struct LinkStyle {
	/// Base stroke and arrowhead color.
	pub color: Color,
	/// Stroke for the selected link.
	pub selected_color: Color,
	/// Provisional drag-line stroke.
	pub drag_color: Color,
}

/// Node visual style beyond the palette fill.
#[derive(Clone, Copy, Debug)]
pub struct NodeStyle {
	/// How much the fill brightens when selected.
	pub selected_lighten: f64,
	/// How much the stroke darkens from the fill.
	pub stroke_darken: f64,
	/// Ring stroke marking a reflexive node.
	pub reflexive_color: Color,
	/// Ring stroke marking a pinned node.
	pub fixed_color: Color,
	/// Label text color.
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub link: LinkStyle,
	pub node: NodeStyle,
	pub palette: NodePalette,
}

impl Theme {
	/// Light editor surface (default).
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(250, 240, 230), // Linen
			},
			link: LinkStyle {
				color: Color::rgb(0, 0, 0),
				selected_color: Color::rgb(214, 39, 40),
				drag_color: Color::rgba(0, 0, 0, 0.6),
			},
			node: NodeStyle {
				selected_lighten: 0.4,
				stroke_darken: 0.3,
				reflexive_color: Color::rgb(0, 0, 0),
				fixed_color: Color::rgba(0, 0, 0, 0.45),
				label_color: Color::rgb(40, 40, 40),
			},
			palette: NodePalette::category(),
		}
	}

	/// Dark editor surface.
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
			},
			link: LinkStyle {
				color: Color::rgb(200, 210, 220),
				selected_color: Color::rgb(255, 140, 105),
				drag_color: Color::rgba(200, 210, 220, 0.6),
			},
			node: NodeStyle {
				selected_lighten: 0.4,
				stroke_darken: 0.35,
				reflexive_color: Color::rgb(235, 235, 235),
				fixed_color: Color::rgba(235, 235, 235, 0.45),
				label_color: Color::rgb(220, 220, 220),
			},
			palette: NodePalette::slate(),
		}
	}

	/// Look up a preset by configuration name; unknown names fall back to
	/// the default.
	pub fn by_name(name: &str) -> Self {
		match name {
			"midnight" => Self::midnight(),
			_ => Self::default_theme(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
