//! Turns a backend payload into renderable elements.
//!
//! Building is a pure function of the payload. Edges whose endpoints are not
//! both in the payload's node list are dropped without error: the backend
//! filters nodes by category but not the edges that point at them.

use std::collections::HashMap;

use log::debug;

use super::label::{DEFAULT_MAX_LABEL_LEN, format_label};
use super::style::{edge_color, node_color, node_shape};
use super::types::{
	GraphData, GraphEdge, GraphNode, RenderableEdge, RenderableElement, RenderableNode,
};

/// Knobs for element building.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelOptions {
	/// Maximum display label length before the ellipsis.
	pub max_len: usize,
}

impl Default for LabelOptions {
	fn default() -> Self {
		Self {
			max_len: DEFAULT_MAX_LABEL_LEN,
		}
	}
}

/// Builds the flat element list: all nodes in input order, then the edges that
/// survive filtering, in input order.
pub fn build_elements(payload: Option<&GraphData>) -> Vec<RenderableElement> {
	ElementSet::build(payload, &LabelOptions::default()).into_elements()
}

/// The builder output, kept split into nodes and edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSet {
	nodes: Vec<RenderableNode>,
	edges: Vec<RenderableEdge>,
	/// Node id to position in `nodes`. The first node wins on duplicate ids.
	index: HashMap<String, usize>,
}

impl ElementSet {
	/// Builds styled nodes and the edges whose endpoints both exist.
	/// `None` builds an empty set.
	pub fn build(payload: Option<&GraphData>, options: &LabelOptions) -> Self {
		let Some(data) = payload else {
			return Self::default();
		};

		let nodes: Vec<RenderableNode> = data
			.nodes
			.iter()
			.map(|node| renderable_node(node, options))
			.collect();

		let mut index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			index.entry(node.id.clone()).or_insert(i);
		}

		let edges: Vec<RenderableEdge> = data
			.edges
			.iter()
			.filter(|edge| index.contains_key(&edge.source) && index.contains_key(&edge.target))
			.map(renderable_edge)
			.collect();

		let dropped = data.edges.len() - edges.len();
		if dropped > 0 {
			debug!(
				"abyssal-graph: dropped {} of {} edges with missing endpoints",
				dropped,
				data.edges.len()
			);
		}

		Self {
			nodes,
			edges,
			index,
		}
	}

	/// Nodes in payload order.
	pub fn nodes(&self) -> &[RenderableNode] {
		&self.nodes
	}

	/// Surviving edges in payload order.
	pub fn edges(&self) -> &[RenderableEdge] {
		&self.edges
	}

	/// Looks a node up by id.
	pub fn node(&self, id: &str) -> Option<&RenderableNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Whether a node with `id` exists.
	pub fn contains_node(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// True when there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}

	/// Total element count (nodes plus edges).
	pub fn len(&self) -> usize {
		self.nodes.len() + self.edges.len()
	}

	/// Flattens into nodes followed by edges.
	pub fn into_elements(self) -> Vec<RenderableElement> {
		let mut elements = Vec::with_capacity(self.len());
		elements.extend(self.nodes.into_iter().map(RenderableElement::Node));
		elements.extend(self.edges.into_iter().map(RenderableElement::Edge));
		elements
	}
}

fn renderable_node(node: &GraphNode, options: &LabelOptions) -> RenderableNode {
	RenderableNode {
		id: node.id.clone(),
		display_label: format_label(&node.label, options.max_len),
		full_label: node.label.clone(),
		category: node.knowledge_type.clone(),
		skill_level: node.skill_level,
		color: node_color(&node.knowledge_type),
		shape: node_shape(&node.knowledge_type),
		tags: node.tags.clone().unwrap_or_default(),
		mitre_techniques: node.mitre_techniques.clone().unwrap_or_default(),
	}
}

fn renderable_edge(edge: &GraphEdge) -> RenderableEdge {
	RenderableEdge {
		id: edge.id.clone(),
		source: edge.source.clone(),
		target: edge.target.clone(),
		relationship: edge.relationship.clone(),
		color: edge_color(&edge.relationship),
	}
}
