//! Layout simulation and pointer interaction for one rendered graph.
//!
//! A [`GraphScene`] is built from an [`ElementSet`] and lives until the next
//! payload replaces it. It wraps the `force_graph` simulation with the view
//! transform, the in-flight pointer gesture, hover highlighting and the
//! selection ring.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::elements::ElementSet;
use super::scale::{ScaleConfig, ScaledValues};
use super::theme::Color;
use super::types::RenderableNode;

/// Per-node data attached to each simulated node.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	/// The element drawn for this node.
	pub node: RenderableNode,
	/// Radius multiplier from shape and connectivity.
	pub size: f64,
}

/// Per-edge data attached to each simulated edge.
#[derive(Clone, Debug)]
pub struct EdgeInfo {
	/// Stroke color.
	pub color: Color,
}

/// Pan and zoom applied to the whole graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal offset in screen pixels.
	pub x: f64,
	/// Vertical offset in screen pixels.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

/// Pointer gesture in progress.
#[derive(Clone, Debug, Default)]
pub enum Gesture {
	/// No button held.
	#[default]
	Idle,
	/// Pressed on a node. Turns into a drag once the pointer leaves the tap slop.
	Node {
		/// Pressed node.
		idx: DefaultNodeIdx,
		/// Screen x of the press.
		start_x: f64,
		/// Screen y of the press.
		start_y: f64,
		/// Node x at the press, in graph units.
		node_x: f32,
		/// Node y at the press, in graph units.
		node_y: f32,
		/// Whether the slop was exceeded.
		dragging: bool,
	},
	/// Pressed on empty canvas.
	Pan {
		/// Screen x of the press.
		start_x: f64,
		/// Screen y of the press.
		start_y: f64,
		/// Transform x at the press.
		origin_x: f64,
		/// Transform y at the press.
		origin_y: f64,
	},
}

/// Hover highlight of a node and its neighbors, with an eased intensity.
///
/// The lit set outlives the hover so the highlight can fade out instead of
/// snapping off.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	hovered: Option<DefaultNodeIdx>,
	lit: HashSet<DefaultNodeIdx>,
	intensity: f64,
}

impl HighlightState {
	const FADE_IN_SPEED: f64 = 6.0;
	const FADE_OUT_SPEED: f64 = 4.0;

	/// Lights `node` and its neighbors. `None` starts the fade out.
	pub fn set_hover(
		&mut self,
		node: Option<DefaultNodeIdx>,
		edges: &[(DefaultNodeIdx, DefaultNodeIdx)],
	) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		let Some(idx) = node else {
			return;
		};
		self.lit.clear();
		self.lit.insert(idx);
		for &(src, tgt) in edges {
			if src == idx {
				self.lit.insert(tgt);
			} else if tgt == idx {
				self.lit.insert(src);
			}
		}
	}

	/// Eases the intensity toward its target.
	pub fn tick(&mut self, dt: f64) {
		let (target, speed) = if self.hovered.is_some() {
			(1.0, Self::FADE_IN_SPEED)
		} else {
			(0.0, Self::FADE_OUT_SPEED)
		};
		self.intensity += (target - self.intensity) * (1.0 - (-speed * dt).exp());
		if self.hovered.is_none() && self.intensity < 0.005 {
			self.intensity = 0.0;
			self.lit.clear();
		}
	}

	/// Drops the highlight at once.
	pub fn clear(&mut self) {
		*self = Self::default();
	}

	/// Node under the pointer.
	pub fn hovered(&self) -> Option<DefaultNodeIdx> {
		self.hovered
	}

	/// Whether `idx` is part of the highlight.
	pub fn is_lit(&self, idx: DefaultNodeIdx) -> bool {
		self.lit.contains(&idx)
	}

	/// 0.0 when nothing is highlighted, approaching 1.0 while hovering.
	pub fn intensity(&self) -> f64 {
		self.intensity
	}
}

/// Simulation plus view state for the currently rendered graph.
pub struct GraphScene {
	/// Force simulation holding the nodes and edges.
	pub graph: ForceGraph<NodeInfo, EdgeInfo>,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Pointer gesture in progress.
	pub gesture: Gesture,
	/// Hover highlight.
	pub highlight: HighlightState,
	/// Node carrying the selection ring.
	pub selected: Option<DefaultNodeIdx>,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Simulated seconds since the scene was built.
	pub elapsed: f64,
	auto_fit_pending: bool,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

impl GraphScene {
	/// Seeds the simulation from `elements`, centered in the canvas.
	pub fn new(elements: &ElementSet, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 250.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		let mut degree: HashMap<&str, usize> = HashMap::new();
		for edge in elements.edges() {
			*degree.entry(edge.source.as_str()).or_insert(0) += 1;
			*degree.entry(edge.target.as_str()).or_insert(0) += 1;
		}
		let max_degree = degree.values().copied().max().unwrap_or(1).max(1);

		let count = elements.nodes().len().max(1) as f64;
		let ring = 60.0 + 12.0 * count.sqrt();
		let mut id_to_idx = HashMap::with_capacity(elements.nodes().len());

		for (i, node) in elements.nodes().iter().enumerate() {
			let angle = i as f64 * TAU / count;
			let connectivity =
				(degree.get(node.id.as_str()).copied().unwrap_or(0) as f64 / max_degree as f64)
					.sqrt();
			let size = (0.85 + 0.5 * connectivity) * node.shape.size_factor();

			let idx = graph.add_node(NodeData {
				x: (ring * angle.cos()) as f32,
				y: (ring * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					node: node.clone(),
					size,
				},
			});
			id_to_idx.entry(node.id.as_str()).or_insert(idx);
		}

		let mut edges = Vec::with_capacity(elements.edges().len());
		for edge in elements.edges() {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(edge.source.as_str()),
				id_to_idx.get(edge.target.as_str()),
			) {
				graph.add_edge(src, tgt, EdgeData {
					user_data: EdgeInfo { color: edge.color },
				});
				edges.push((src, tgt));
			}
		}

		Self {
			graph,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			gesture: Gesture::Idle,
			highlight: HighlightState::default(),
			selected: None,
			width,
			height,
			elapsed: 0.0,
			auto_fit_pending: true,
			edges,
		}
	}

	/// Screen position to graph units.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position.
	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let hit = config.node.hit_behavior.apply(config.node.hit_radius, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < hit * node.data.user_data.size {
				found = Some(node.index());
			}
		});
		found
	}

	/// Full data of the node at `idx`.
	pub fn node_data(&self, idx: DefaultNodeIdx) -> Option<RenderableNode> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.node.clone());
			}
		});
		found
	}

	fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f32, f32)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x(), node.y()));
			}
		});
		found
	}

	/// Starts a node gesture or a pan.
	pub fn pointer_down(&mut self, x: f64, y: f64, config: &ScaleConfig) {
		self.auto_fit_pending = false;
		let hit = self
			.node_at_position(x, y, config)
			.and_then(|idx| self.node_position(idx).map(|pos| (idx, pos)));
		self.gesture = match hit {
			Some((idx, (node_x, node_y))) => Gesture::Node {
				idx,
				start_x: x,
				start_y: y,
				node_x,
				node_y,
				dragging: false,
			},
			None => Gesture::Pan {
				start_x: x,
				start_y: y,
				origin_x: self.transform.x,
				origin_y: self.transform.y,
			},
		};
	}

	/// Drags, pans or updates the hover highlight.
	pub fn pointer_move(&mut self, x: f64, y: f64, config: &ScaleConfig) {
		let k = self.transform.k;
		match &mut self.gesture {
			Gesture::Idle => {
				let hovered = self.node_at_position(x, y, config);
				self.highlight.set_hover(hovered, &self.edges);
			}
			Gesture::Node {
				idx,
				start_x,
				start_y,
				node_x,
				node_y,
				dragging,
			} => {
				let (dx, dy) = (x - *start_x, y - *start_y);
				if !*dragging && (dx * dx + dy * dy).sqrt() > config.tap_slop {
					*dragging = true;
				}
				if !*dragging {
					return;
				}
				let (idx, nx, ny) = (
					*idx,
					*node_x + (dx / k) as f32,
					*node_y + (dy / k) as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
			Gesture::Pan {
				start_x,
				start_y,
				origin_x,
				origin_y,
			} => {
				self.transform.x = *origin_x + (x - *start_x);
				self.transform.y = *origin_y + (y - *start_y);
			}
		}
	}

	/// Ends the gesture. Returns the node if the gesture was a tap on it.
	/// Dragged nodes stay pinned where they were dropped.
	pub fn pointer_up(&mut self) -> Option<DefaultNodeIdx> {
		match std::mem::take(&mut self.gesture) {
			Gesture::Node {
				idx,
				dragging: false,
				..
			} => Some(idx),
			_ => None,
		}
	}

	/// Cancels the gesture and the hover.
	pub fn pointer_leave(&mut self) {
		self.gesture = Gesture::Idle;
		self.highlight.set_hover(None, &self.edges);
	}

	/// Wheel zoom anchored at the cursor.
	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64, config: &ScaleConfig) {
		let factor = if delta_y > 0.0 {
			1.0 / config.zoom.wheel_step
		} else {
			config.zoom.wheel_step
		};
		self.zoom_around(self.transform.k * factor, x, y, config);
	}

	/// Zoom anchored at the canvas center.
	pub fn zoom_to(&mut self, k: f64, config: &ScaleConfig) {
		self.zoom_around(k, self.width / 2.0, self.height / 2.0, config);
	}

	fn zoom_around(&mut self, k: f64, sx: f64, sy: f64, config: &ScaleConfig) {
		self.auto_fit_pending = false;
		let new_k = config.zoom.clamp(k);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Centers the graph and zooms so every node fits inside the padding.
	pub fn fit(&mut self, config: &ScaleConfig) {
		self.auto_fit_pending = false;
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		self.graph.visit_nodes(|node| {
			let r = config.node.radius * node.data.user_data.size;
			let (x, y) = (node.x() as f64, node.y() as f64);
			min_x = min_x.min(x - r);
			min_y = min_y.min(y - r);
			max_x = max_x.max(x + r);
			max_y = max_y.max(y + r);
		});
		if !min_x.is_finite() || !max_x.is_finite() {
			return;
		}

		let pad = config.zoom.fit_padding;
		let (avail_w, avail_h) = (
			(self.width - 2.0 * pad).max(1.0),
			(self.height - 2.0 * pad).max(1.0),
		);
		let (span_w, span_h) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let k = config.zoom.clamp((avail_w / span_w).min(avail_h / span_h));
		let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

		self.transform = ViewTransform {
			x: self.width / 2.0 - mid_x * k,
			y: self.height / 2.0 - mid_y * k,
			k,
		};
	}

	/// Drops pan, zoom, pinned nodes, hover and the selection ring.
	pub fn reset(&mut self) {
		self.auto_fit_pending = false;
		self.transform = ViewTransform {
			x: self.width / 2.0,
			y: self.height / 2.0,
			k: 1.0,
		};
		self.gesture = Gesture::Idle;
		self.highlight.clear();
		self.selected = None;
		self.graph.visit_nodes_mut(|node| {
			node.data.is_anchor = false;
		});
	}

	/// Steps the simulation and highlight, and runs the first auto-fit.
	pub fn tick(&mut self, dt: f64, config: &ScaleConfig) {
		self.graph.update(dt as f32);
		self.elapsed += dt;
		self.highlight.tick(dt);
		if self.auto_fit_pending && self.elapsed >= config.zoom.settle_time {
			self.fit(config);
		}
	}

	/// Records a new canvas size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Per-frame scale values for the current zoom.
	pub fn scaled(&self, config: &ScaleConfig, font_family: &str) -> ScaledValues {
		ScaledValues::new(config, font_family, self.transform.k)
	}
}
