//! Canvas rendering for the knowledge graph.
//!
//! Passes, back to front:
//! 1. Background gradient (screen space)
//! 2. Edges and arrowheads (world space)
//! 3. Selection halo, unlit nodes, hover-lit nodes on top, selection ring
//! 4. Vignette (screen space)

use std::f64::consts::TAU;

use force_graph::Node;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{GraphScene, NodeInfo};
use super::style::NodeShape;
use super::theme::{Color, Theme};

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(
	scene: &GraphScene,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = scene.scaled(config, theme.node.label_font_family);

	draw_background(scene, ctx, theme);

	ctx.save();
	let _ = ctx.translate(scene.transform.x, scene.transform.y);
	let _ = ctx.scale(scene.transform.k, scene.transform.k);

	draw_edges(scene, ctx, &scale, theme);
	draw_nodes(scene, ctx, &scale, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(scene, ctx, theme);
	}
}

fn draw_background(scene: &GraphScene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (scene.width / 2.0, scene.height / 2.0);
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			let r = scene.width.max(scene.height) * 0.8;
			ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, r)
		})
		.and_then(Result::ok);

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);
}

fn draw_vignette(scene: &GraphScene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (scene.width / 2.0, scene.height / 2.0);
	let Ok(gradient) = ctx.create_radial_gradient(
		cx,
		cy,
		scene.width.min(scene.height) * 0.3,
		cx,
		cy,
		scene.width.max(scene.height) * 0.7,
	) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&Color::rgba(0, 0, 0, theme.background.vignette).to_css(),
	);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);
}

fn draw_edges(
	scene: &GraphScene,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let t = smooth_step(scene.highlight.intensity());
	let style = &theme.edge;

	scene.graph.visit_edges(|n1, n2, edge| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		let lit = scene.highlight.is_lit(n1.index()) && scene.highlight.is_lit(n2.index());
		let (alpha, width) = if lit {
			(
				style.opacity + (style.highlight_opacity - style.opacity) * t,
				scale.edge_line_width * (1.0 + 0.5 * t),
			)
		} else {
			(
				style.opacity + (style.dimmed_opacity - style.opacity) * t,
				scale.edge_line_width,
			)
		};

		let (ux, uy) = (dx / dist, dy / dist);
		let (r1, r2) = (
			scale.node_radius * n1.data.user_data.size,
			scale.node_radius * n2.data.user_data.size,
		);
		if dist <= r1 + r2 {
			return;
		}
		let color = edge.user_data.color;
		let draw_arrow = scale.arrow_alpha > 0.05;
		let arrow = if draw_arrow { scale.arrow_size } else { 0.0 };

		ctx.set_stroke_style_str(&color.with_alpha(alpha).to_css());
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * (r2 + arrow), y2 - uy * (r2 + arrow));
		ctx.stroke();

		if draw_arrow {
			let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
			let (back_x, back_y) = (tip_x - ux * arrow, tip_y - uy * arrow);
			let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);

			ctx.set_fill_style_str(&color.with_alpha(alpha * scale.arrow_alpha).to_css());
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
	});
}

fn draw_nodes(
	scene: &GraphScene,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let t = smooth_step(scene.highlight.intensity());
	let fill = theme.node.fill_opacity;

	visit_selected(scene, |node| draw_selection_halo(ctx, node, scale, theme));

	// Pass 1: nodes outside the highlight, dimmed while something is hovered
	scene.graph.visit_nodes(|node| {
		if scene.highlight.is_lit(node.index()) {
			return;
		}
		draw_node(ctx, node, scale, theme, fill * (1.0 - 0.6 * t), 1.0 - 0.1 * t);
	});

	// Pass 2: hovered node and neighbors on top
	scene.graph.visit_nodes(|node| {
		let idx = node.index();
		if !scene.highlight.is_lit(idx) {
			return;
		}
		let hovered = scene.highlight.hovered() == Some(idx);
		let grow = if hovered { 0.3 } else { 0.15 };
		draw_node(ctx, node, scale, theme, fill + (1.0 - fill) * t, 1.0 + grow * t);
		if hovered && t > 0.01 {
			let r = scale.node_radius * node.data.user_data.size * (1.0 + grow * t);
			trace_shape(ctx, node, r + 2.0 * scale.pixel);
			ctx.set_stroke_style_str(&Color::rgba(255, 255, 255, 0.7 * t).to_css());
			ctx.set_line_width(1.5 * scale.pixel);
			ctx.stroke();
		}
	});

	// Pass 3: selection ring
	visit_selected(scene, |node| draw_selection_ring(ctx, node, scale, theme));
}

fn visit_selected(scene: &GraphScene, mut f: impl FnMut(&Node<NodeInfo>)) {
	let Some(selected) = scene.selected else {
		return;
	};
	scene.graph.visit_nodes(|node| {
		if node.index() == selected {
			f(node);
		}
	});
}

fn trace_shape(ctx: &CanvasRenderingContext2d, node: &Node<NodeInfo>, radius: f64) {
	let (x, y) = (node.x() as f64, node.y() as f64);
	ctx.begin_path();
	match node.data.user_data.node.shape {
		NodeShape::Circle => {
			let _ = ctx.arc(x, y, radius, 0.0, TAU);
		}
		NodeShape::Diamond => {
			ctx.move_to(x, y - radius);
			ctx.line_to(x + radius, y);
			ctx.line_to(x, y + radius);
			ctx.line_to(x - radius, y);
			ctx.close_path();
		}
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	radius_mult: f64,
) {
	let (x, y) = (node.x() as f64, node.y() as f64);
	let info = &node.data.user_data;
	let radius = scale.node_radius * info.size * radius_mult;
	let color = info.node.color;

	ctx.set_global_alpha(alpha);
	trace_shape(ctx, node, radius);
	let gradient = theme
		.node
		.use_gradient
		.then(|| ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius))
		.and_then(Result::ok);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &color.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &color.to_css());
			let _ = gradient.add_color_stop(1.0, &color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&color.to_css()),
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&color.with_alpha(theme.node.border_opacity).to_css());
		ctx.set_line_width(theme.node.border_width * scale.pixel);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);

	let label_alpha = alpha * scale.label_alpha;
	if label_alpha > 0.05 && !info.node.display_label.is_empty() {
		ctx.set_global_alpha(label_alpha);
		ctx.set_fill_style_str(&theme.node.label_color.to_css());
		ctx.set_font(&scale.label_font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		let _ = ctx.fill_text(&info.node.display_label, x, y + radius + scale.label_margin);
		ctx.set_global_alpha(1.0);
	}
}

fn draw_selection_halo(
	ctx: &CanvasRenderingContext2d,
	node: &Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let (x, y) = (node.x() as f64, node.y() as f64);
	let radius = scale.node_radius * node.data.user_data.size;
	let ring = &theme.selection;

	let Ok(halo) = ctx.create_radial_gradient(x, y, radius * 0.8, x, y, radius * ring.halo) else {
		return;
	};
	let _ = halo.add_color_stop(0.0, &ring.color.with_alpha(0.5).to_css());
	let _ = halo.add_color_stop(1.0, &ring.color.with_alpha(0.0).to_css());
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius * ring.halo, 0.0, TAU);
	#[allow(deprecated)]
	ctx.set_fill_style(&halo);
	ctx.fill();
}

fn draw_selection_ring(
	ctx: &CanvasRenderingContext2d,
	node: &Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let radius = scale.node_radius * node.data.user_data.size;
	let ring = &theme.selection;

	trace_shape(ctx, node, radius + ring.width * 0.5 * scale.pixel);
	ctx.set_stroke_style_str(&ring.color.to_css());
	ctx.set_line_width(ring.width * scale.pixel);
	ctx.stroke();
}
