//! Zoom-dependent scaling configuration for graph visuals.
//!
//! Sizes come in two flavours. World-space values scale with the zoom level
//! `k` (nodes get bigger when zoomed in); screen-space values are divided by
//! `k` so they keep a fixed pixel size after the canvas transform.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size in pixels.
		min_screen: f64,
		/// Largest on-screen size in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`, ready for drawing after the
	/// canvas transform.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			// screen = world * k, so the bounds become min/k..max/k in world units
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Fades a property in between two zoom levels.
#[derive(Clone, Debug)]
pub struct ZoomFade {
	/// Zoom at or below which the property is invisible.
	pub hidden_below: f64,
	/// Zoom at or above which the property is fully visible.
	pub visible_above: f64,
}

impl ZoomFade {
	/// Opacity multiplier at zoom `k`.
	pub fn alpha(&self, k: f64) -> f64 {
		if self.visible_above <= self.hidden_below {
			return 1.0;
		}
		((k - self.hidden_below) / (self.visible_above - self.hidden_below)).clamp(0.0, 1.0)
	}
}

/// Node sizes and label placement.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Circle radius in world units. Shapes scale this by their size factor.
	pub radius: f64,
	/// How `radius` follows the zoom.
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// How `hit_radius` follows the zoom.
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Zoom below which the label font stops shrinking.
	pub label_min_k: f64,
	/// Gap between the node and its label, in world units.
	pub label_margin: f64,
	/// Label visibility by zoom.
	pub label_fade: ZoomFade,
}

/// Edge strokes and arrowheads.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// Arrowhead length in world units.
	pub arrow_size: f64,
	/// How `arrow_size` follows the zoom.
	pub arrow_behavior: ScaleBehavior,
	/// Arrowhead visibility by zoom.
	pub arrow_fade: ZoomFade,
}

/// Limits and steps for zooming.
#[derive(Clone, Debug)]
pub struct ZoomConfig {
	/// Smallest zoom factor.
	pub min_k: f64,
	/// Largest zoom factor.
	pub max_k: f64,
	/// Wheel zoom multiplier per notch.
	pub wheel_step: f64,
	/// Margin kept around the graph by `fit`, in screen pixels.
	pub fit_padding: f64,
	/// Simulated seconds before the first automatic fit.
	pub settle_time: f64,
}

impl ZoomConfig {
	/// Limits `k` to `min_k..=max_k`.
	pub fn clamp(&self, k: f64) -> f64 {
		k.clamp(self.min_k, self.max_k)
	}
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node sizing.
	pub node: NodeScaleConfig,
	/// Edge sizing.
	pub edge: EdgeScaleConfig,
	/// Zoom limits.
	pub zoom: ZoomConfig,
	/// Pointer travel in screen pixels that turns a press into a drag.
	pub tap_slop: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 15.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 4.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 18.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 6.0,
					max_screen: f64::INFINITY,
				},
				label_size: 10.0,
				label_min_k: 0.5,
				label_margin: 5.0,
				label_fade: ZoomFade {
					hidden_below: 0.25,
					visible_above: 0.45,
				},
			},
			edge: EdgeScaleConfig {
				line_width: 1.5,
				arrow_size: 8.0,
				arrow_behavior: ScaleBehavior::Clamped {
					min_screen: 0.0,
					max_screen: 16.0,
				},
				arrow_fade: ZoomFade {
					hidden_below: 0.2,
					visible_above: 0.6,
				},
			},
			zoom: ZoomConfig {
				min_k: 0.1,
				max_k: 10.0,
				wheel_step: 1.1,
				fit_padding: 30.0,
				settle_time: 1.5,
			},
			tap_slop: 3.0,
		}
	}
}

/// Scale values resolved for one zoom level, all in world-space.
///
/// Compute once per frame and hand to the drawing functions.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Zoom these values were resolved for.
	pub k: f64,
	/// Circle radius.
	pub node_radius: f64,
	/// Pointer hit radius.
	pub hit_radius: f64,
	/// CSS font shorthand for labels.
	pub label_font: String,
	/// Gap between node and label.
	pub label_margin: f64,
	/// Label opacity multiplier.
	pub label_alpha: f64,
	/// Edge stroke width.
	pub edge_line_width: f64,
	/// Arrowhead length.
	pub arrow_size: f64,
	/// Arrowhead opacity multiplier.
	pub arrow_alpha: f64,
	/// One screen pixel in world units.
	pub pixel: f64,
}

impl ScaledValues {
	/// Resolves `config` at zoom `k`.
	pub fn new(config: &ScaleConfig, font_family: &str, k: f64) -> Self {
		let node = &config.node;
		let font_size = node.label_size / k.max(node.label_min_k);

		Self {
			k,
			node_radius: node.radius_behavior.apply(node.radius, k),
			hit_radius: node.hit_behavior.apply(node.hit_radius, k),
			label_font: format!("{font_size}px {font_family}"),
			label_margin: node.label_margin,
			label_alpha: node.label_fade.alpha(k),
			edge_line_width: config.edge.line_width / k,
			arrow_size: config.edge.arrow_behavior.apply(config.edge.arrow_size, k),
			arrow_alpha: config.edge.arrow_fade.alpha(k),
			pixel: 1.0 / k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_behavior_bounds_screen_size() {
		let b = ScaleBehavior::Clamped {
			min_screen: 4.0,
			max_screen: 16.0,
		};
		// k=0.1: 15 world units would be 1.5px on screen, floor is 4px
		assert!((b.apply(15.0, 0.1) - 40.0).abs() < 1e-9);
		// k=4: 15 world units would be 60px, ceiling is 16px
		assert!((b.apply(15.0, 4.0) - 4.0).abs() < 1e-9);
		assert_eq!(b.apply(8.0, 1.0), 8.0);
		assert_eq!(ScaleBehavior::Screen.apply(8.0, 2.0), 4.0);
		assert_eq!(ScaleBehavior::World.apply(8.0, 2.0), 8.0);
	}

	#[test]
	fn fade_is_linear_between_thresholds() {
		let fade = ZoomFade {
			hidden_below: 0.2,
			visible_above: 0.6,
		};
		assert_eq!(fade.alpha(0.1), 0.0);
		assert!((fade.alpha(0.4) - 0.5).abs() < 1e-9);
		assert_eq!(fade.alpha(2.0), 1.0);
	}

	#[test]
	fn zoom_clamp() {
		let zoom = ScaleConfig::default().zoom;
		assert_eq!(zoom.clamp(100.0), 10.0);
		assert_eq!(zoom.clamp(0.0), 0.1);
	}

	#[test]
	fn scaled_values_use_font_family() {
		let scaled = ScaledValues::new(&ScaleConfig::default(), "monospace", 1.0);
		assert_eq!(scaled.label_font, "10px monospace");
		assert_eq!(scaled.node_radius, 15.0);
	}
}
