//! Category and relationship styling.
//!
//! Two static lookups, one per element kind. Every value resolves: anything
//! the tables do not name falls back to that table's default.

use super::theme::Color;
use super::types::{Category, RelationshipKind};

/// Fill color for nodes whose category has no entry.
pub const DEFAULT_NODE_COLOR: Color = Color::rgb(0x88, 0x88, 0x88);
/// Stroke color for edges whose relationship has no entry.
pub const DEFAULT_EDGE_COLOR: Color = Color::rgb(0x88, 0x88, 0x88);

/// Outline drawn for a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeShape {
	/// Entries.
	#[default]
	Circle,
	/// MITRE techniques.
	Diamond,
}

impl NodeShape {
	/// Size relative to a circle node. Diamonds are drawn smaller.
	pub fn size_factor(self) -> f64 {
		match self {
			NodeShape::Circle => 1.0,
			NodeShape::Diamond => 2.0 / 3.0,
		}
	}
}

/// Fill color for `category`.
pub fn node_color(category: &Category) -> Color {
	match category {
		Category::Recon => Color::rgb(0x00, 0xd4, 0xff),
		Category::Exploit => Color::rgb(0xff, 0x00, 0x40),
		Category::PostExploitation => Color::rgb(0xff, 0x64, 0x00),
		Category::Tool => Color::rgb(0x64, 0xff, 0x64),
		Category::Payload => Color::rgb(0xc8, 0x00, 0xff),
		Category::Writeup => Color::rgb(0xff, 0xff, 0x00),
		Category::Poc => Color::rgb(0xff, 0x96, 0x00),
		Category::ZeroDay => Color::rgb(0xff, 0x44, 0x44),
		Category::CaseStudy => Color::rgb(0x00, 0xff, 0xc8),
		Category::MitreTechnique => Color::rgb(0x96, 0x96, 0xff),
		Category::Unset | Category::Unknown(_) => DEFAULT_NODE_COLOR,
	}
}

/// Outline for `category`.
pub fn node_shape(category: &Category) -> NodeShape {
	match category {
		Category::MitreTechnique => NodeShape::Diamond,
		_ => NodeShape::Circle,
	}
}

/// Stroke color for `relationship`.
pub fn edge_color(relationship: &RelationshipKind) -> Color {
	match relationship {
		RelationshipKind::Dependency => Color::rgb(0xff, 0x00, 0x40),
		RelationshipKind::Related => Color::rgb(0x00, 0xd4, 0xff),
		RelationshipKind::MitreChain => Color::rgb(0x96, 0x96, 0xff),
		RelationshipKind::Unset | RelationshipKind::Unknown(_) => DEFAULT_EDGE_COLOR,
	}
}

/// One row of the edge-type legend.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
	/// Relationship the row describes.
	pub kind: RelationshipKind,
	/// Human label, e.g. `mitre chain`.
	pub label: String,
	/// Swatch color.
	pub color: Color,
}

/// Legend rows for every relationship kind with its own color.
pub fn edge_legend() -> Vec<LegendEntry> {
	RelationshipKind::KNOWN
		.into_iter()
		.map(|kind| LegendEntry {
			label: kind.as_str().replace('_', " "),
			color: edge_color(&kind),
			kind,
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exploit_and_unknown_categories() {
		assert_eq!(
			node_color(&Category::parse("exploit")),
			Color::rgb(0xff, 0x00, 0x40)
		);
		assert_eq!(
			node_color(&Category::parse("unknown-future-type")),
			DEFAULT_NODE_COLOR
		);
	}

	#[test]
	fn every_input_resolves() {
		for raw in ["", "EXPLOIT", "exploit ", "mitre_chain", "ünïcode"] {
			assert_eq!(node_color(&Category::parse(raw)), DEFAULT_NODE_COLOR);
		}
		for raw in ["", "depends", "Related", "mitre-chain"] {
			assert_eq!(
				edge_color(&RelationshipKind::parse(raw)),
				DEFAULT_EDGE_COLOR
			);
		}
	}

	#[test]
	fn known_categories_have_their_own_color() {
		for category in Category::KNOWN {
			assert_ne!(node_color(&category), DEFAULT_NODE_COLOR, "{category}");
		}
		for kind in RelationshipKind::KNOWN {
			assert_ne!(edge_color(&kind), DEFAULT_EDGE_COLOR, "{kind}");
		}
	}

	#[test]
	fn only_techniques_are_diamonds() {
		assert_eq!(node_shape(&Category::MitreTechnique), NodeShape::Diamond);
		assert_eq!(node_shape(&Category::Tool), NodeShape::Circle);
		assert_eq!(node_shape(&Category::Unset), NodeShape::Circle);
	}

	#[test]
	fn legend_uses_spaces() {
		let legend = edge_legend();
		assert_eq!(legend.len(), 3);
		assert_eq!(legend[2].label, "mitre chain");
		assert_eq!(legend[2].color, edge_color(&RelationshipKind::MitreChain));
	}
}
