//! Visual theming for the knowledge graph canvas.
//!
//! Colors that carry meaning (category and relationship colors) live in
//! [`super::style`]; this module holds the look of everything around them.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color at opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		let down = |c: u8| (c as f64 * f) as u8;
		Self {
			r: down(self.r),
			g: down(self.g),
			b: down(self.b),
			a: self.a,
		}
	}

	/// CSS color value: hex when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			self.to_css_rgb()
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// `#rrggbb`, ignoring opacity.
	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Flat fill, and the edge color of the gradient.
	pub color: Color,
	/// Center color of the radial gradient.
	pub color_secondary: Color,
	/// Draw the radial gradient instead of a flat fill.
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Edge visual style. The stroke color itself comes from the relationship.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Resting line opacity.
	pub opacity: f64,
	/// Opacity of edges touching the hovered node.
	pub highlight_opacity: f64,
	/// Opacity of the other edges while something is hovered.
	pub dimmed_opacity: f64,
}

/// Node visual style. The fill color itself comes from the category.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Shade nodes with a radial gradient.
	pub use_gradient: bool,
	/// Fill opacity of an unselected node.
	pub fill_opacity: f64,
	/// Border width in screen pixels (0 = no border).
	pub border_width: f64,
	/// Border stroke opacity.
	pub border_opacity: f64,
	/// Label text color.
	pub label_color: Color,
	/// CSS font family for labels.
	pub label_font_family: &'static str,
}

/// Look of the ring drawn around the tapped node.
#[derive(Clone, Debug)]
pub struct SelectionStyle {
	/// Ring color.
	pub color: Color,
	/// Ring width in screen pixels.
	pub width: f64,
	/// Soft halo radius as a multiple of the node radius.
	pub halo: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Preset name.
	pub name: &'static str,
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Edge opacities.
	pub edge: EdgeStyle,
	/// Node fill, border and labels.
	pub node: NodeStyle,
	/// Selection ring.
	pub selection: SelectionStyle,
}

impl Theme {
	/// Near-black terminal look with neon accents (default)
	pub fn abyss() -> Self {
		Self {
			name: "abyss",
			background: BackgroundStyle {
				color: Color::rgb(10, 10, 15),
				color_secondary: Color::rgb(20, 20, 30),
				use_gradient: true,
				vignette: 0.25,
			},
			edge: EdgeStyle {
				opacity: 0.6,
				highlight_opacity: 1.0,
				dimmed_opacity: 0.15,
			},
			node: NodeStyle {
				use_gradient: true,
				fill_opacity: 0.8,
				border_width: 2.0,
				border_opacity: 0.6,
				label_color: Color::rgb(226, 232, 240),
				label_font_family: "JetBrains Mono, monospace",
			},
			selection: SelectionStyle {
				color: Color::rgb(255, 0, 64),
				width: 3.0,
				halo: 2.2,
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::abyss()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output_drops_alpha_when_opaque() {
		assert_eq!(Color::rgb(0, 212, 255).to_css(), "#00d4ff");
		assert_eq!(
			Color::rgb(0, 212, 255).with_alpha(0.5).to_css(),
			"rgba(0, 212, 255, 0.5)"
		);
	}

	#[test]
	fn lighten_and_darken_hit_the_extremes() {
		let c = Color::rgb(100, 50, 0);
		assert_eq!(c.lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(c.darken(1.0), Color::rgb(0, 0, 0));
		assert_eq!(c.lighten(0.0), c);
	}
}
