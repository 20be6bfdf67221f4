//! Canvas-backed [`GraphView`] implementation.
//!
//! Bundles one [`GraphScene`] with its visual configuration and the node tap
//! listener. The component builds a fresh view per payload and hands it to the
//! [`super::controller::GraphViewController`].

use web_sys::CanvasRenderingContext2d;

use super::controller::{GraphView, TapHandler};
use super::elements::ElementSet;
use super::render;
use super::scale::ScaleConfig;
use super::state::GraphScene;
use super::theme::Theme;

/// One rendered graph: scene, look and tap listener.
pub struct CanvasView {
	scene: GraphScene,
	scale: ScaleConfig,
	theme: Theme,
	on_tap: Option<TapHandler>,
}

impl CanvasView {
	/// Lays out `elements` on a `width` by `height` canvas.
	pub fn new(
		elements: &ElementSet,
		width: f64,
		height: f64,
		theme: Theme,
		scale: ScaleConfig,
	) -> Self {
		Self {
			scene: GraphScene::new(elements, width, height),
			scale,
			theme,
			on_tap: None,
		}
	}

	/// Simulation and view state.
	pub fn scene(&self) -> &GraphScene {
		&self.scene
	}

	/// Starts a tap, drag or pan at canvas position `(x, y)`.
	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.scene.pointer_down(x, y, &self.scale);
	}

	/// Updates the drag or pan, or the hover highlight.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.scene.pointer_move(x, y, &self.scale);
	}

	/// Ends the gesture; a tap on a node rings it and notifies the listener.
	pub fn pointer_up(&mut self) {
		let Some(idx) = self.scene.pointer_up() else {
			return;
		};
		let Some(node) = self.scene.node_data(idx) else {
			return;
		};
		self.scene.selected = Some(idx);
		if let Some(handler) = self.on_tap.as_mut() {
			handler(node);
		}
	}

	/// Cancels the gesture and the hover.
	pub fn pointer_leave(&mut self) {
		self.scene.pointer_leave();
	}

	/// Wheel zoom around the cursor.
	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		self.scene.wheel(x, y, delta_y, &self.scale);
	}

	/// Advances the simulation by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		self.scene.tick(dt, &self.scale);
	}

	/// Follows a canvas size change.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.scene.resize(width, height);
	}

	/// Draws one frame.
	pub fn render(&self, ctx: &CanvasRenderingContext2d) {
		render::render(&self.scene, ctx, &self.scale, &self.theme);
	}
}

impl GraphView for CanvasView {
	fn zoom(&self) -> f64 {
		self.scene.transform.k
	}

	fn set_zoom(&mut self, k: f64) {
		self.scene.zoom_to(k, &self.scale);
	}

	fn fit(&mut self) {
		self.scene.fit(&self.scale);
	}

	fn reset(&mut self) {
		self.scene.reset();
	}

	fn listen_node_tap(&mut self, handler: TapHandler) {
		self.on_tap = Some(handler);
	}

	fn unlisten_node_tap(&mut self) {
		self.on_tap = None;
	}
}
