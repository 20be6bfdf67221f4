//! Leptos component wrapping the knowledge graph canvas.
//!
//! The component rebuilds the element set whenever the `data` signal changes,
//! loads a fresh [`CanvasView`] into its [`GraphViewController`] and keeps one
//! `requestAnimationFrame` loop ticking and drawing whichever view is bound.
//! Mouse and wheel events go straight to the bound view; the toolbar goes
//! through the controller.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::controller::GraphViewController;
use super::elements::{ElementSet, LabelOptions};
use super::scale::ScaleConfig;
use super::style::edge_legend;
use super::theme::Theme;
use super::types::{GraphData, RenderableNode};
use super::view::CanvasView;

type SharedController = Rc<RefCell<GraphViewController<CanvasView>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

const FALLBACK_WIDTH: f64 = 800.0;

fn canvas_width(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(FALLBACK_WIDTH)
}

fn local_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn request_frame(callback: &Closure<dyn FnMut()>) {
	if let Some(window) = web_sys::window() {
		let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
	}
}

/// Renders the knowledge graph for `data` with zoom controls and an edge legend.
///
/// `None` or a payload without nodes shows the empty-state panel instead of a
/// graph. `on_node_select` fires once per node tap with the tapped node.
#[component]
pub fn KnowledgeGraph(
	#[prop(into)] data: Signal<Option<GraphData>>,
	#[prop(optional)] on_node_select: Option<Callback<RenderableNode>>,
	#[prop(default = LabelOptions::default())] labels: LabelOptions,
	#[prop(default = 600.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let elements = Memo::new(move |_| data.with(|d| ElementSet::build(d.as_ref(), &labels)));
	let is_empty = move || elements.with(ElementSet::is_empty);

	let controller: SharedController = Rc::new(RefCell::new(GraphViewController::new()));
	controller
		.borrow_mut()
		.set_on_select(Some(Rc::new(move |node: &RenderableNode| {
			info!("abyssal-graph: selected {}", node.id);
			if let Some(callback) = on_node_select {
				callback.run(node.clone());
			}
		})));

	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let (controller_init, animate_init, resize_cb_init) =
		(controller.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let set = elements.get();

		let loaded = controller_init.borrow_mut().load(&set, |set| {
			let w = canvas_width(&canvas);
			canvas.set_width(w as u32);
			canvas.set_height(height as u32);
			CanvasView::new(set, w, height, Theme::default(), ScaleConfig::default())
		});
		match loaded {
			Ok(true) => info!(
				"abyssal-graph: showing {} nodes, {} edges",
				set.nodes().len(),
				set.edges().len()
			),
			Ok(false) => {
				// Resizing clears the bitmap left by the previous view.
				canvas.set_width(canvas.width());
				return;
			}
			Err(e) => {
				warn!("abyssal-graph: {}", e);
				return;
			}
		}

		if resize_cb_init.borrow().is_none() {
			let (controller_resize, canvas_resize) = (controller_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let w = canvas_width(&canvas_resize);
				canvas_resize.set_width(w as u32);
				if let Some(view) = controller_resize.borrow_mut().view_mut() {
					view.resize(w, height);
				}
			}));
			let window: Option<Window> = web_sys::window();
			if let (Some(window), Some(cb)) = (window, resize_cb_init.borrow().as_ref()) {
				let _ = window
					.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if animate_init.borrow().is_some() {
			return;
		}
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("abyssal-graph: canvas has no 2d context");
			return;
		};
		let (controller_anim, animate_inner) = (controller_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(view) = controller_anim.borrow_mut().view_mut() {
				view.tick(0.016);
				view.render(&ctx);
			}
			if let Some(cb) = animate_inner.borrow().as_ref() {
				request_frame(cb);
			}
		}));
		if let Some(cb) = animate_init.borrow().as_ref() {
			request_frame(cb);
		}
	});

	let controller_md = controller.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(view) = controller_md.borrow_mut().view_mut() {
			view.pointer_down(x, y);
		}
	};

	let controller_mm = controller.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(view) = controller_mm.borrow_mut().view_mut() {
			view.pointer_move(x, y);
		}
	};

	let controller_mu = controller.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(view) = controller_mu.borrow_mut().view_mut() {
			view.pointer_up();
		}
	};

	let controller_ml = controller.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(view) = controller_ml.borrow_mut().view_mut() {
			view.pointer_leave();
		}
	};

	let controller_wh = controller.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(view) = controller_wh.borrow_mut().view_mut() {
			view.wheel(x, y, ev.delta_y());
		}
	};

	let (ctl_in, ctl_out, ctl_fit, ctl_reset) = (
		controller.clone(),
		controller.clone(),
		controller.clone(),
		controller.clone(),
	);
	let overlay_display = move || if is_empty() { "none" } else { "flex" };
	let empty_display = move || if is_empty() { "flex" } else { "none" };

	view! {
		<div class="knowledge-graph" style:height=format!("{height}px")>
			<canvas
				node_ref=canvas_ref
				class="knowledge-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>

			<div class="graph-controls" style:display=overlay_display>
				<button title="Zoom in" on:click=move |_| ctl_in.borrow_mut().zoom_in()>"+"</button>
				<button title="Zoom out" on:click=move |_| ctl_out.borrow_mut().zoom_out()>"−"</button>
				<button title="Fit to view" on:click=move |_| ctl_fit.borrow_mut().fit()>"⤢"</button>
				<button title="Reset view" on:click=move |_| ctl_reset.borrow_mut().reset()>"↺"</button>
			</div>

			<div class="graph-legend" style:display=overlay_display>
				<div class="graph-legend-title">"EDGE TYPES"</div>
				{edge_legend()
					.into_iter()
					.map(|entry| {
						view! {
							<div class="graph-legend-row">
								<span
									class="graph-legend-swatch"
									style:background-color=entry.color.to_css_rgb()
								></span>
								<span>{entry.label}</span>
							</div>
						}
					})
					.collect_view()}
			</div>

			<div class="graph-empty" style:display=empty_display>
				<div class="graph-empty-glyph">"⬡"</div>
				<div class="graph-empty-title">"No graph data available"</div>
				<div class="graph-empty-hint">"Add knowledge entries to visualize relationships"</div>
			</div>
		</div>
	}
}
