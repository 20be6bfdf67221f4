//! End-to-end checks of the element builder and view controller through the
//! public API, driven by backend-shaped JSON.

// Test target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::cell::RefCell;
use std::rc::Rc;

use abyssal_graph::components::knowledge_graph::{
	Category, Color, ElementSet, GraphData, GraphView, GraphViewController, LabelOptions,
	RenderableElement, RenderableNode, TapHandler, build_elements, edge_color, format_label,
	node_color,
};
use unicode_segmentation::UnicodeSegmentation;

const PAYLOAD: &str = r#"{
	"nodes": [
		{"id": "n1", "label": "Kerberoasting Service Accounts", "knowledge_type": "exploit", "skill_level": 3,
		 "tags": ["ad", "kerberos"], "mitre_techniques": ["T1558.003"]},
		{"id": "n2", "label": "Rubeus", "knowledge_type": "tool", "skill_level": 2},
		{"id": "T1558.003", "label": "Kerberoasting", "knowledge_type": "mitre-technique", "skill_level": 1},
		{"id": "n4", "label": "Field notes", "knowledge_type": "field-notes"}
	],
	"edges": [
		{"id": "e1", "source": "n1", "target": "n2", "relationship": "dependency"},
		{"id": "e2", "source": "n1", "target": "T1558.003", "relationship": "mitre_chain"},
		{"id": "e3", "source": "n2", "target": "gone", "relationship": "related"},
		{"id": "e4", "source": "n4", "target": "n1", "relationship": "supersedes"}
	]
}"#;

fn payload() -> GraphData {
	serde_json::from_str(PAYLOAD).unwrap()
}

#[derive(Default)]
struct TestView {
	k: f64,
	fits: usize,
	handler: Option<TapHandler>,
}

impl GraphView for TestView {
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
		self.k = 1.0;
	}

	fn listen_node_tap(&mut self, handler: TapHandler) {
		self.handler = Some(handler);
	}

	fn unlisten_node_tap(&mut self) {
		self.handler = None;
	}
}

impl TestView {
	fn tap(&mut self, node: &RenderableNode) {
		if let Some(handler) = self.handler.as_mut() {
			handler(node.clone());
		}
	}
}

#[test]
fn backend_payload_builds_consistent_elements() {
	let elements = build_elements(Some(&payload()));
	let ids: Vec<&str> = elements.iter().map(RenderableElement::id).collect();
	assert_eq!(ids, ["n1", "n2", "T1558.003", "n4", "e1", "e2", "e4"]);

	let node_ids: Vec<&str> = elements
		.iter()
		.filter_map(RenderableElement::as_node)
		.map(|n| n.id.as_str())
		.collect();
	for edge in elements.iter().filter_map(RenderableElement::as_edge) {
		assert!(node_ids.contains(&edge.source.as_str()));
		assert!(node_ids.contains(&edge.target.as_str()));
	}
}

#[test]
fn styles_resolve_for_known_and_unknown_values() {
	let set = ElementSet::build(Some(&payload()), &LabelOptions::default());

	let kerberoast = set.node("n1").unwrap();
	assert_eq!(kerberoast.color, Color::rgb(0xff, 0x00, 0x40));
	assert_eq!(kerberoast.display_label, "Kerberoasting Servic…");
	assert_eq!(kerberoast.full_label, "Kerberoasting Service Accounts");

	let notes = set.node("n4").unwrap();
	assert_eq!(notes.category, Category::Unknown("field-notes".to_string()));
	assert_eq!(notes.color, node_color(&Category::Unset));
	assert_eq!(notes.skill_level, 1);

	let unknown_edge = set.edges().iter().find(|e| e.id == "e4").unwrap();
	assert_eq!(unknown_edge.color, edge_color(&Default::default()));
}

#[test]
fn empty_inputs_build_nothing() {
	let empty: GraphData = serde_json::from_str("{}").unwrap();
	assert!(build_elements(None).is_empty());
	assert!(build_elements(Some(&empty)).is_empty());
	assert!(ElementSet::build(Some(&empty), &LabelOptions::default()).is_empty());
}

#[test]
fn labels_never_exceed_bound() {
	let labels = [
		"",
		"short",
		"exactly twenty chars",
		"a label well beyond twenty characters",
		"Pass-the-Ticket (🇫🇷 campaign, 👨\u{200d}💻 notes)",
	];
	for label in labels {
		let formatted = format_label(label, 20);
		assert!(formatted.graphemes(true).count() <= 21);
		if label.graphemes(true).count() <= 20 {
			assert_eq!(formatted, label);
		}
	}
}

#[test]
fn tap_updates_selection_and_notifies_host_once() {
	let set = ElementSet::build(Some(&payload()), &LabelOptions::default());
	let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

	let mut controller = GraphViewController::new();
	let sink = seen.clone();
	controller.set_on_select(Some(Rc::new(move |node: &RenderableNode| {
		sink.borrow_mut().push(node.id.clone());
	})));
	controller
		.bind(TestView {
			k: 1.0,
			..Default::default()
		})
		.unwrap();

	let rubeus = set.node("n2").unwrap().clone();
	controller.view_mut().unwrap().tap(&rubeus);

	assert_eq!(controller.selection(), Some(rubeus));
	assert_eq!(*seen.borrow(), ["n2"]);
}

#[test]
fn controls_drive_bound_view_and_ignore_unbound() {
	let mut controller = GraphViewController::<TestView>::new();
	controller.reset();
	controller.zoom_in();
	controller.fit();
	assert!(!controller.is_bound());

	controller
		.bind(TestView {
			k: 1.0,
			..Default::default()
		})
		.unwrap();
	controller.zoom_in();
	controller.zoom_out();
	controller.reset();

	let view = controller.unbind().unwrap();
	assert_eq!(view.k, 1.0);
	assert_eq!(view.fits, 1);
	assert!(view.handler.is_none());
}
