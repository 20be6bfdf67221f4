//! Knowledge graph visualization component.
//!
//! Turns the archive's graph payload into styled renderable elements and
//! draws them on an HTML canvas with:
//! - Category colors and shapes, relationship-colored edges
//! - Force-directed layout that settles and then fits the viewport
//! - Pan, wheel zoom, node dragging and hover highlighting
//! - Tap-to-select, reported through [`GraphViewController`]
//!
//! # Example
//!
//! ```ignore
//! use abyssal_graph::components::knowledge_graph::{GraphData, KnowledgeGraph};
//!
//! let data = RwSignal::new(None::<GraphData>);
//! view! { <KnowledgeGraph data=data on_node_select=Callback::new(|node| log::info!("{}", node.id)) /> }
//! ```

mod component;
pub mod controller;
pub mod elements;
pub mod label;
mod render;
pub mod scale;
mod state;
pub mod style;
pub mod theme;
pub mod types;
mod view;

pub use component::KnowledgeGraph;
pub use controller::{BindError, GraphView, GraphViewController, TapHandler};
pub use elements::{ElementSet, LabelOptions, build_elements};
pub use label::{DEFAULT_MAX_LABEL_LEN, format_label};
pub use style::{LegendEntry, NodeShape, edge_color, edge_legend, node_color, node_shape};
pub use theme::{Color, Theme};
pub use types::{
	Category, GraphData, GraphEdge, GraphNode, RelationshipKind, RenderableEdge, RenderableElement,
	RenderableNode,
};
pub use view::CanvasView;
