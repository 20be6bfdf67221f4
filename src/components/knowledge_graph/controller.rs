//! View control and selection tracking.
//!
//! [`GraphViewController`] owns at most one live [`GraphView`] at a time. The
//! view's tap listener is registered once per `bind` and removed on `unbind`,
//! so re-rendering the host never stacks listeners. Every control is a silent
//! no-op while nothing is bound.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use thiserror::Error;

use super::elements::ElementSet;
use super::types::RenderableNode;

/// Zoom multiplier applied by [`GraphViewController::zoom_in`].
pub const ZOOM_IN_FACTOR: f64 = 1.3;
/// Zoom multiplier applied by [`GraphViewController::zoom_out`].
pub const ZOOM_OUT_FACTOR: f64 = 0.7;

/// Listener a view invokes when a node is tapped.
pub type TapHandler = Box<dyn FnMut(RenderableNode)>;

/// Host callback invoked after the selection changes.
pub type SelectCallback = Rc<dyn Fn(&RenderableNode)>;

/// What the controller needs from a rendering engine instance.
///
/// Calls are fire-and-forget: the view may animate or lay out afterwards
/// without the controller waiting on it.
pub trait GraphView {
	/// Current zoom factor.
	fn zoom(&self) -> f64;
	/// Sets the zoom factor. The view may clamp it.
	fn set_zoom(&mut self, k: f64);
	/// Frames the whole graph.
	fn fit(&mut self);
	/// Drops manual pan, zoom and selection styling.
	fn reset(&mut self);
	/// Registers the node tap listener, replacing any previous one.
	fn listen_node_tap(&mut self, handler: TapHandler);
	/// Removes the node tap listener.
	fn unlisten_node_tap(&mut self);
}

/// Why [`GraphViewController::bind`] refused a view.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
	/// Another view is still attached.
	#[error("a graph view is already bound; unbind it before binding another")]
	AlreadyBound,
}

type SelectionCell = Rc<RefCell<Option<RenderableNode>>>;
type CallbackCell = Rc<RefCell<Option<SelectCallback>>>;

/// Drives a bound [`GraphView`] and tracks the selected node.
pub struct GraphViewController<V: GraphView> {
	view: Option<V>,
	selection: SelectionCell,
	on_select: CallbackCell,
}

impl<V: GraphView> Default for GraphViewController<V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<V: GraphView> GraphViewController<V> {
	/// Creates a controller with no view, selection or callback.
	pub fn new() -> Self {
		Self {
			view: None,
			selection: Rc::new(RefCell::new(None)),
			on_select: Rc::new(RefCell::new(None)),
		}
	}

	/// Sets (or clears) the host callback. Takes effect for bound views too.
	pub fn set_on_select(&mut self, callback: Option<SelectCallback>) {
		*self.on_select.borrow_mut() = callback;
	}

	/// Attaches `view` and registers its tap listener.
	///
	/// Fails with [`BindError::AlreadyBound`] if a view is already attached;
	/// the attached view is left untouched and `view` is dropped.
	pub fn bind(&mut self, mut view: V) -> Result<(), BindError> {
		if self.view.is_some() {
			return Err(BindError::AlreadyBound);
		}
		let (selection, on_select) = (self.selection.clone(), self.on_select.clone());
		view.listen_node_tap(Box::new(move |node| {
			apply_selection(&selection, &on_select, node);
		}));
		self.view = Some(view);
		debug!("abyssal-graph: view bound");
		Ok(())
	}

	/// Detaches the bound view, removing its listener, and hands it back.
	pub fn unbind(&mut self) -> Option<V> {
		let mut view = self.view.take()?;
		view.unlisten_node_tap();
		debug!("abyssal-graph: view unbound");
		Some(view)
	}

	/// Swaps in a view for a freshly built element set.
	///
	/// Unbinds the current view and clears the selection first. An empty set
	/// leaves the controller unbound without calling `make_view`. Returns
	/// whether a view was bound.
	pub fn load(
		&mut self,
		elements: &ElementSet,
		make_view: impl FnOnce(&ElementSet) -> V,
	) -> Result<bool, BindError> {
		self.unbind();
		self.clear_selection();
		if elements.is_empty() {
			return Ok(false);
		}
		self.bind(make_view(elements))?;
		Ok(true)
	}

	/// Whether a view is attached.
	pub fn is_bound(&self) -> bool {
		self.view.is_some()
	}

	/// The bound view.
	pub fn view(&self) -> Option<&V> {
		self.view.as_ref()
	}

	/// The bound view, mutably. Input handlers drive it through this.
	pub fn view_mut(&mut self) -> Option<&mut V> {
		self.view.as_mut()
	}

	/// Multiplies the zoom by [`ZOOM_IN_FACTOR`].
	pub fn zoom_in(&mut self) {
		self.scale_zoom(ZOOM_IN_FACTOR);
	}

	/// Multiplies the zoom by [`ZOOM_OUT_FACTOR`].
	pub fn zoom_out(&mut self) {
		self.scale_zoom(ZOOM_OUT_FACTOR);
	}

	fn scale_zoom(&mut self, factor: f64) {
		if let Some(view) = self.view.as_mut() {
			let k = view.zoom();
			view.set_zoom(k * factor);
		}
	}

	/// Frames the whole graph.
	pub fn fit(&mut self) {
		if let Some(view) = self.view.as_mut() {
			view.fit();
		}
	}

	/// Clears view-side pan, zoom and selection styling, then fits.
	/// The tracked selection is kept.
	pub fn reset(&mut self) {
		if let Some(view) = self.view.as_mut() {
			view.reset();
			view.fit();
		}
	}

	/// Records a tap on `node` exactly as the bound view's listener would.
	pub fn on_node_tap(&self, node: RenderableNode) {
		apply_selection(&self.selection, &self.on_select, node);
	}

	/// The currently selected node, if any.
	pub fn selection(&self) -> Option<RenderableNode> {
		self.selection.borrow().clone()
	}

	/// Forgets the selected node without notifying the host.
	pub fn clear_selection(&self) {
		self.selection.borrow_mut().take();
	}
}

impl<V: GraphView> Drop for GraphViewController<V> {
	fn drop(&mut self) {
		self.unbind();
	}
}

fn apply_selection(selection: &SelectionCell, on_select: &CallbackCell, node: RenderableNode) {
	// Release both borrows before the host runs; it may read the selection back.
	let callback = on_select.borrow().clone();
	*selection.borrow_mut() = Some(node.clone());
	if let Some(callback) = callback {
		callback(&node);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;
	use crate::components::knowledge_graph::elements::LabelOptions;
	use crate::components::knowledge_graph::style::NodeShape;
	use crate::components::knowledge_graph::theme::Color;
	use crate::components::knowledge_graph::types::{Category, GraphData};

	/// Records every call the controller makes.
	#[derive(Default)]
	struct RecordingView {
		k: f64,
		fits: usize,
		resets: usize,
		listens: usize,
		unlistens: usize,
		handler: Option<TapHandler>,
	}

	impl RecordingView {
		fn new() -> Self {
			Self {
				k: 1.0,
				..Default::default()
			}
		}

		fn tap(&mut self, node: RenderableNode) {
			if let Some(handler) = self.handler.as_mut() {
				handler(node);
			}
		}
	}

	impl GraphView for RecordingView {
		fn zoom(&self) -> f64 {
			self.k
		}

		fn set_zoom(&mut self, k: f64) {
			self.k = k;
		}

		fn fit(&mut self) {
			self.fits += 1;
		}

		fn reset(&mut self) {
			self.resets += 1;
			self.k = 1.0;
		}

		fn listen_node_tap(&mut self, handler: TapHandler) {
			self.listens += 1;
			self.handler = Some(handler);
		}

		fn unlisten_node_tap(&mut self) {
			self.unlistens += 1;
			self.handler = None;
		}
	}

	fn sample_node(id: &str) -> RenderableNode {
		RenderableNode {
			id: id.to_string(),
			display_label: id.to_uppercase(),
			full_label: id.to_uppercase(),
			category: Category::Tool,
			skill_level: 2,
			color: Color::rgb(0x64, 0xff, 0x64),
			shape: NodeShape::Circle,
			tags: vec![],
			mitre_techniques: vec![],
		}
	}

	#[test]
	fn controls_are_noops_while_unbound() {
		let mut controller = GraphViewController::<RecordingView>::new();
		controller.zoom_in();
		controller.zoom_out();
		controller.fit();
		controller.reset();
		assert!(!controller.is_bound());
		assert!(controller.selection().is_none());
		assert!(controller.unbind().is_none());
	}

	#[test]
	fn zoom_steps_multiply() {
		let mut controller = GraphViewController::new();
		controller.bind(RecordingView::new()).unwrap();
		controller.zoom_in();
		assert!((controller.view().unwrap().k - 1.3).abs() < 1e-9);
		controller.zoom_out();
		assert!((controller.view().unwrap().k - 0.91).abs() < 1e-9);
	}

	#[test]
	fn reset_resets_then_fits() {
		let mut controller = GraphViewController::new();
		controller.bind(RecordingView::new()).unwrap();
		controller.zoom_in();
		controller.reset();
		let view = controller.view().unwrap();
		assert_eq!(view.resets, 1);
		assert_eq!(view.fits, 1);
		assert_eq!(view.k, 1.0);
	}

	#[test]
	fn listener_registered_once_per_bind() {
		let mut controller = GraphViewController::new();
		controller.bind(RecordingView::new()).unwrap();
		assert_eq!(
			controller.bind(RecordingView::new()),
			Err(BindError::AlreadyBound)
		);
		assert_eq!(controller.view().unwrap().listens, 1);

		let released = controller.unbind().unwrap();
		assert_eq!(released.listens, 1);
		assert_eq!(released.unlistens, 1);
		assert!(released.handler.is_none());

		controller.bind(released).unwrap();
		assert_eq!(controller.view().unwrap().listens, 2);
	}

	#[test]
	fn tap_selects_and_calls_back_once() {
		let calls = Rc::new(Cell::new(0));
		let seen = Rc::new(RefCell::new(None));
		let mut controller = GraphViewController::new();
		let (calls_cb, seen_cb) = (calls.clone(), seen.clone());
		controller.set_on_select(Some(Rc::new(move |node: &RenderableNode| {
			calls_cb.set(calls_cb.get() + 1);
			*seen_cb.borrow_mut() = Some(node.clone());
		})));
		controller.bind(RecordingView::new()).unwrap();

		let node = sample_node("a");
		controller.view_mut().unwrap().tap(node.clone());

		assert_eq!(controller.selection(), Some(node.clone()));
		assert_eq!(calls.get(), 1);
		assert_eq!(*seen.borrow(), Some(node));
	}

	#[test]
	fn direct_tap_without_callback_still_selects() {
		let controller = GraphViewController::<RecordingView>::new();
		controller.on_node_tap(sample_node("b"));
		assert_eq!(controller.selection().map(|n| n.id), Some("b".to_string()));
		controller.clear_selection();
		assert!(controller.selection().is_none());
	}

	#[test]
	fn callback_may_read_selection_back() {
		let controller = Rc::new(RefCell::new(GraphViewController::<RecordingView>::new()));
		let observed = Rc::new(RefCell::new(None));
		let (inner, observed_cb) = (Rc::downgrade(&controller), observed.clone());
		controller
			.borrow_mut()
			.set_on_select(Some(Rc::new(move |_: &RenderableNode| {
				if let Some(c) = inner.upgrade() {
					*observed_cb.borrow_mut() = c.borrow().selection();
				}
			})));
		controller.borrow().on_node_tap(sample_node("c"));
		assert_eq!(observed.borrow().as_ref().map(|n| n.id.as_str()), Some("c"));
	}

	fn one_node_set() -> ElementSet {
		let data: GraphData = serde_json::from_str(r#"{"nodes": [{"id": "a"}]}"#).unwrap();
		ElementSet::build(Some(&data), &LabelOptions::default())
	}

	#[test]
	fn empty_set_never_builds_a_view() {
		let mut controller = GraphViewController::new();
		let built = Cell::new(false);
		let loaded = controller.load(&ElementSet::default(), |_| {
			built.set(true);
			RecordingView::new()
		});
		assert_eq!(loaded, Ok(false));
		assert!(!built.get());
		assert!(!controller.is_bound());
	}

	#[test]
	fn reload_swaps_view_and_clears_selection() {
		let set = one_node_set();
		let mut controller = GraphViewController::new();
		assert_eq!(controller.load(&set, |_| RecordingView::new()), Ok(true));
		controller.view_mut().unwrap().tap(sample_node("a"));
		controller.zoom_in();
		assert!(controller.selection().is_some());

		assert_eq!(controller.load(&set, |_| RecordingView::new()), Ok(true));
		assert!(controller.selection().is_none());
		let view = controller.view().unwrap();
		assert_eq!(view.listens, 1);
		assert_eq!(view.k, 1.0);

		assert_eq!(
			controller.load(&ElementSet::default(), |_| RecordingView::new()),
			Ok(false)
		);
		assert!(!controller.is_bound());
	}

	#[test]
	fn factory_sees_the_loaded_set() {
		let set = one_node_set();
		let mut controller = GraphViewController::new();
		controller
			.load(&set, |elements| {
				assert_eq!(elements.nodes().len(), 1);
				RecordingView::new()
			})
			.unwrap();
		assert!(controller.is_bound());
	}

	#[test]
	fn reset_keeps_selection() {
		let mut controller = GraphViewController::new();
		controller.bind(RecordingView::new()).unwrap();
		controller.on_node_tap(sample_node("a"));
		controller.reset();
		assert!(controller.selection().is_some());
	}
}
