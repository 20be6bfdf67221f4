//! Graph payload and renderable element types.
//!
//! The raw types mirror what the archive backend sends on its `/graph`
//! endpoints. The renderable types carry the resolved display attributes the
//! canvas needs and are produced only by [`super::elements`].
//!
//! Decoding is lenient: a `null` where a list, label or enum is expected reads
//! as its default, and skill levels outside 1-5 are clamped into range.

use std::fmt;

use serde::{Deserialize, Deserializer};

use super::style::NodeShape;
use super::theme::Color;

/// Lowest skill rating shown on the detail panel.
pub const MIN_SKILL_LEVEL: u8 = 1;
/// Highest skill rating shown on the detail panel.
pub const MAX_SKILL_LEVEL: u8 = 5;

/// Primary classification of a knowledge entry.
///
/// Values the client does not know keep their raw text in [`Category::Unknown`]
/// and render with the default style.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Category {
	/// Reconnaissance notes.
	Recon,
	/// Exploitation techniques.
	Exploit,
	/// Persistence, lateral movement and the like.
	PostExploitation,
	/// Offensive tooling.
	Tool,
	/// Payloads and shellcode.
	Payload,
	/// Engagement or CTF writeups.
	Writeup,
	/// Proof-of-concept code.
	Poc,
	/// Unpatched vulnerabilities.
	ZeroDay,
	/// Incident or breach case studies.
	CaseStudy,
	/// A MITRE ATT&CK technique node. Drawn as a diamond.
	MitreTechnique,
	/// Empty or absent on the wire.
	#[default]
	Unset,
	/// Anything else, raw text kept.
	Unknown(String),
}

impl Category {
	/// Every category the backend is known to emit, in filter-menu order.
	pub const KNOWN: [Category; 10] = [
		Category::Recon,
		Category::Exploit,
		Category::PostExploitation,
		Category::Tool,
		Category::Payload,
		Category::Writeup,
		Category::Poc,
		Category::ZeroDay,
		Category::CaseStudy,
		Category::MitreTechnique,
	];

	/// Reads a wire name. Never fails.
	pub fn parse(raw: &str) -> Self {
		match raw {
			"recon" => Self::Recon,
			"exploit" => Self::Exploit,
			"post-exploitation" => Self::PostExploitation,
			"tool" => Self::Tool,
			"payload" => Self::Payload,
			"writeup" => Self::Writeup,
			"poc" => Self::Poc,
			"zero-day" => Self::ZeroDay,
			"case-study" => Self::CaseStudy,
			"mitre-technique" => Self::MitreTechnique,
			"" => Self::Unset,
			other => Self::Unknown(other.to_string()),
		}
	}

	/// Wire name of the category (the raw text for unknown values).
	pub fn as_str(&self) -> &str {
		match self {
			Self::Recon => "recon",
			Self::Exploit => "exploit",
			Self::PostExploitation => "post-exploitation",
			Self::Tool => "tool",
			Self::Payload => "payload",
			Self::Writeup => "writeup",
			Self::Poc => "poc",
			Self::ZeroDay => "zero-day",
			Self::CaseStudy => "case-study",
			Self::MitreTechnique => "mitre-technique",
			Self::Unset => "",
			Self::Unknown(raw) => raw,
		}
	}
}

impl From<String> for Category {
	fn from(raw: String) -> Self {
		Self::parse(&raw)
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind of a directed link between two entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum RelationshipKind {
	/// Source needs target.
	Dependency,
	/// Loosely related entries.
	Related,
	/// Entry to the MITRE technique it implements.
	MitreChain,
	/// Empty or absent on the wire.
	#[default]
	Unset,
	/// Anything else, raw text kept.
	Unknown(String),
}

impl RelationshipKind {
	/// Relationship kinds with a dedicated color, in legend order.
	pub const KNOWN: [RelationshipKind; 3] = [
		RelationshipKind::Dependency,
		RelationshipKind::Related,
		RelationshipKind::MitreChain,
	];

	/// Reads a wire name. Never fails.
	pub fn parse(raw: &str) -> Self {
		match raw {
			"dependency" => Self::Dependency,
			"related" => Self::Related,
			"mitre_chain" => Self::MitreChain,
			"" => Self::Unset,
			other => Self::Unknown(other.to_string()),
		}
	}

	/// Wire name of the relationship (the raw text for unknown values).
	pub fn as_str(&self) -> &str {
		match self {
			Self::Dependency => "dependency",
			Self::Related => "related",
			Self::MitreChain => "mitre_chain",
			Self::Unset => "",
			Self::Unknown(raw) => raw,
		}
	}
}

impl From<String> for RelationshipKind {
	fn from(raw: String) -> Self {
		Self::parse(&raw)
	}
}

impl fmt::Display for RelationshipKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Reads `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_skill_level() -> u8 {
	MIN_SKILL_LEVEL
}

/// Reads any JSON number (or `null`) as a skill level in 1-5.
fn lenient_skill_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
	D: Deserializer<'de>,
{
	let level = Option::<f64>::deserialize(deserializer)?;
	Ok(match level {
		Some(level) if level.is_finite() => {
			level.round().clamp(MIN_SKILL_LEVEL as f64, MAX_SKILL_LEVEL as f64) as u8
		}
		_ => MIN_SKILL_LEVEL,
	})
}

/// A knowledge entry as sent by the backend.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique identifier within one payload. Edges reference nodes by this id.
	pub id: String,
	/// Full entry title.
	#[serde(default, deserialize_with = "null_as_default")]
	pub label: String,
	/// Category driving color and shape.
	#[serde(default, deserialize_with = "null_as_default")]
	pub knowledge_type: Category,
	/// Difficulty rating, 1 to 5.
	#[serde(default = "default_skill_level", deserialize_with = "lenient_skill_level")]
	pub skill_level: u8,
	/// Free-form tags.
	#[serde(default)]
	pub tags: Option<Vec<String>>,
	/// MITRE ATT&CK technique ids the entry cites.
	#[serde(default)]
	pub mitre_techniques: Option<Vec<String>>,
}

/// A directed relationship as sent by the backend.
///
/// `source` and `target` are not guaranteed to name nodes in the same payload.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphEdge {
	/// Unique identifier within one payload.
	pub id: String,
	/// Id of the node the edge starts at.
	pub source: String,
	/// Id of the node the edge points to.
	pub target: String,
	/// Relationship kind driving the edge color.
	#[serde(default, deserialize_with = "null_as_default")]
	pub relationship: RelationshipKind,
}

/// Graph payload: nodes and edges. Either list may be missing or `null`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	/// Entries, in backend order.
	#[serde(default, deserialize_with = "null_as_default")]
	pub nodes: Vec<GraphNode>,
	/// Relationships, in backend order.
	#[serde(default, deserialize_with = "null_as_default")]
	pub edges: Vec<GraphEdge>,
}

/// A node ready for the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderableNode {
	/// Id copied from the payload.
	pub id: String,
	/// Label shown on the canvas, truncated with an ellipsis.
	pub display_label: String,
	/// Original label, kept for detail panels.
	pub full_label: String,
	/// Category as decoded.
	pub category: Category,
	/// Skill rating, 1 to 5.
	pub skill_level: u8,
	/// Fill and border color.
	pub color: Color,
	/// Outline drawn for the node.
	pub shape: NodeShape,
	/// Tags, empty when the payload had none.
	pub tags: Vec<String>,
	/// MITRE technique ids, empty when the payload had none.
	pub mitre_techniques: Vec<String>,
}

/// An edge ready for the renderer. Both endpoints exist in its element set.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderableEdge {
	/// Id copied from the payload.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Relationship as decoded.
	pub relationship: RelationshipKind,
	/// Line and arrow color.
	pub color: Color,
}

/// One entry of the builder output: nodes come first, then edges.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderableElement {
	/// A styled node.
	Node(RenderableNode),
	/// A styled edge.
	Edge(RenderableEdge),
}

impl RenderableElement {
	/// Id of the wrapped node or edge.
	pub fn id(&self) -> &str {
		match self {
			Self::Node(node) => &node.id,
			Self::Edge(edge) => &edge.id,
		}
	}

	/// The node, if this is one.
	pub fn as_node(&self) -> Option<&RenderableNode> {
		match self {
			Self::Node(node) => Some(node),
			Self::Edge(_) => None,
		}
	}

	/// The edge, if this is one.
	pub fn as_edge(&self) -> Option<&RenderableEdge> {
		match self {
			Self::Edge(edge) => Some(edge),
			Self::Node(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn category_round_trips_known_names() {
		for category in Category::KNOWN {
			assert_eq!(Category::parse(category.as_str()), category);
		}
	}

	#[test]
	fn unknown_category_keeps_raw_text() {
		let category = Category::parse("unknown-future-type");
		assert_eq!(
			category,
			Category::Unknown("unknown-future-type".to_string())
		);
		assert_eq!(category.to_string(), "unknown-future-type");
	}

	#[test]
	fn payload_tolerates_missing_lists_and_fields() {
		let data: GraphData = serde_json::from_str(r#"{"nodes":[{"id":"a"}]}"#).unwrap();
		assert_eq!(data.nodes.len(), 1);
		assert!(data.edges.is_empty());
		let node = &data.nodes[0];
		assert_eq!(node.label, "");
		assert_eq!(node.knowledge_type, Category::Unset);
		assert_eq!(node.skill_level, 1);
		assert_eq!(node.tags, None);

		let empty: GraphData = serde_json::from_str("{}").unwrap();
		assert_eq!(empty, GraphData::default());
	}

	#[test]
	fn payload_reads_null_as_default() {
		let lists: GraphData = serde_json::from_str(r#"{"nodes":null,"edges":null}"#).unwrap();
		assert_eq!(lists, GraphData::default());

		let json = r#"{
			"nodes": [{"id": "a", "label": null, "knowledge_type": null, "skill_level": null}],
			"edges": [{"id": "e1", "source": "a", "target": "a", "relationship": null}]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		let node = &data.nodes[0];
		assert_eq!(node.label, "");
		assert_eq!(node.knowledge_type, Category::Unset);
		assert_eq!(node.skill_level, MIN_SKILL_LEVEL);
		assert_eq!(data.edges[0].relationship, RelationshipKind::Unset);
	}

	#[test]
	fn out_of_range_skill_levels_are_clamped() {
		let json = r#"{"nodes": [
			{"id": "neg", "skill_level": -3},
			{"id": "big", "skill_level": 300},
			{"id": "frac", "skill_level": 2.6},
			{"id": "ok", "skill_level": 4}
		]}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		let levels: Vec<u8> = data.nodes.iter().map(|n| n.skill_level).collect();
		assert_eq!(levels, [1, 5, 3, 4]);
	}

	#[test]
	fn payload_decodes_backend_shape() {
		let json = r#"{
			"nodes": [{"id": "n1", "label": "Kerberoasting", "knowledge_type": "post-exploitation",
				"skill_level": 3, "tags": ["ad"], "mitre_techniques": null}],
			"edges": [{"id": "dep-n1-n2", "source": "n1", "target": "n2", "relationship": "dependency"}]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes[0].knowledge_type, Category::PostExploitation);
		assert_eq!(data.nodes[0].tags.as_deref(), Some(&["ad".to_string()][..]));
		assert_eq!(data.edges[0].relationship, RelationshipKind::Dependency);
	}
}
