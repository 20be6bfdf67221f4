//! Attack graph page: mode switch, category filter, the graph itself and the
//! selected-node detail panel.

use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info};
use wasm_bindgen_futures::spawn_local;
use web_sys::UrlSearchParams;

use crate::api::{ApiClient, GraphQuery};
use crate::components::knowledge_graph::{
	Category, GraphData, KnowledgeGraph, LabelOptions, RenderableNode,
};
use crate::config::AppConfig;

/// Which backend graph the page shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphMode {
	/// Every entry, optionally filtered by category.
	Full,
	/// MITRE technique coverage.
	Mitre,
	/// Neighborhood of the entry named by `?focus=`.
	Focus,
}

impl GraphMode {
	/// Text on the mode button.
	pub fn label(self) -> &'static str {
		match self {
			GraphMode::Full => "Full Graph",
			GraphMode::Mitre => "MITRE Coverage",
			GraphMode::Focus => "Focused Entry",
		}
	}
}

/// Maps the page controls to a backend query. Focus mode without a focus id
/// falls back to the full graph.
pub fn graph_query(
	mode: GraphMode,
	filter: Option<&Category>,
	focus: Option<&str>,
	depth: u32,
) -> GraphQuery {
	match (mode, focus) {
		(GraphMode::Mitre, _) => GraphQuery::Mitre,
		(GraphMode::Focus, Some(id)) => GraphQuery::Entry {
			id: id.to_string(),
			depth,
		},
		(GraphMode::Full | GraphMode::Focus, _) => GraphQuery::Full {
			knowledge_type: filter.cloned(),
		},
	}
}

/// Hands out request ids so only the latest fetch may update the page.
#[derive(Debug, Default)]
pub struct RequestTracker {
	latest: Cell<u64>,
}

impl RequestTracker {
	/// Starts a request and makes it the latest.
	pub fn begin(&self) -> u64 {
		let id = self.latest.get() + 1;
		self.latest.set(id);
		id
	}

	/// Whether `id` is still the latest request.
	pub fn is_current(&self, id: u64) -> bool {
		self.latest.get() == id
	}
}

/// Stores `next` unless it equals the current payload. Returns whether the
/// payload changed.
fn replace_payload(current: &mut Option<GraphData>, next: GraphData) -> bool {
	if current.as_ref() == Some(&next) {
		return false;
	}
	*current = Some(next);
	true
}

fn focus_param() -> Option<String> {
	let search = web_sys::window()?.location().search().ok()?;
	let params = UrlSearchParams::new_with_str(&search).ok()?;
	params.get("focus").filter(|id| !id.is_empty())
}

/// The attack graph page. Starts in focus mode when the URL has `?focus=`.
#[component]
pub fn GraphPage(config: AppConfig) -> impl IntoView {
	let client = ApiClient::new(&config.api_base);
	let focus = focus_param();
	let depth = config.focus_depth;
	let labels = LabelOptions {
		max_len: config.label_max_len,
	};

	let mode = RwSignal::new(if focus.is_some() {
		GraphMode::Focus
	} else {
		GraphMode::Full
	});
	let type_filter = RwSignal::new(None::<Category>);
	let graph = RwSignal::new(None::<GraphData>);
	let loading = RwSignal::new(true);
	let fetch_error = RwSignal::new(None::<String>);
	let selected = RwSignal::new(None::<RenderableNode>);

	let modes = match focus {
		Some(_) => vec![GraphMode::Full, GraphMode::Mitre, GraphMode::Focus],
		None => vec![GraphMode::Full, GraphMode::Mitre],
	};

	let tracker = Rc::new(RequestTracker::default());
	Effect::new(move |_| {
		let query = type_filter.with(|filter| {
			graph_query(mode.get(), filter.as_ref(), focus.as_deref(), depth)
		});
		let id = tracker.begin();
		loading.set(true);
		let (client, tracker) = (client.clone(), tracker.clone());
		spawn_local(async move {
			let result = client.graph(&query).await;
			if !tracker.is_current(id) {
				debug!("abyssal-graph: dropping stale response #{}", id);
				return;
			}
			match result {
				Ok(data) => {
					info!(
						"abyssal-graph: loaded {} nodes, {} edges",
						data.nodes.len(),
						data.edges.len()
					);
					fetch_error.set(None);
					// An identical payload keeps the graph and its selection.
					let mut changed = false;
					graph.maybe_update(|current| {
						changed = replace_payload(current, data);
						changed
					});
					if changed {
						selected.set(None);
					}
				}
				Err(e) => {
					error!("abyssal-graph: graph fetch failed: {}", e);
					fetch_error.set(Some(e.to_string()));
				}
			}
			loading.set(false);
		});
	});

	let counts = move || {
		graph.with(|g| {
			g.as_ref().map(|g| {
				view! {
					<span class="count-nodes">{g.nodes.len()}</span>
					" nodes • "
					<span class="count-edges">{g.edges.len()}</span>
					" edges"
				}
			})
		})
	};

	let detail = move || {
		selected.get().map(|node| {
			view! {
				<div class="panel node-detail">
					<div class="panel-header">"SELECTED NODE"</div>
					<div class="node-detail-grid">
						<div>
							<div class="node-detail-key">"ID"</div>
							<div class="node-detail-value">{node.id.clone()}</div>
						</div>
						<div>
							<div class="node-detail-key">"Label"</div>
							<div class="node-detail-value">{node.full_label.clone()}</div>
						</div>
						<div>
							<div class="node-detail-key">"Type"</div>
							<span class=format!("badge-type type-{}", node.category)>
								{node.category.to_string()}
							</span>
						</div>
						<div>
							<div class="node-detail-key">"Skill Level"</div>
							<div class="node-detail-skill">{format!("{}/5", node.skill_level)}</div>
						</div>
						<div>
							<div class="node-detail-key">"Tags"</div>
							<div class="node-detail-value">{node.tags.join(", ")}</div>
						</div>
						<div>
							<div class="node-detail-key">"MITRE"</div>
							<div class="node-detail-value">{node.mitre_techniques.join(", ")}</div>
						</div>
					</div>
				</div>
			}
		})
	};

	view! {
		<div class="graph-page">
			<div>
				<h1 class="page-title"><span class="prompt">"$"</span>" ATTACK GRAPH"</h1>
				<p class="page-subtitle">
					"Visualize knowledge relationships, attack chains, and MITRE ATT&CK coverage"
				</p>
			</div>

			<div class="graph-toolbar">
				<div class="mode-switch">
					{modes
						.into_iter()
						.map(|m| {
							view! {
								<button
									class:active=move || mode.get() == m
									on:click=move |_| mode.set(m)
								>
									{m.label()}
								</button>
							}
						})
						.collect_view()}
				</div>

				<div
					class="type-filter"
					style:display=move || if mode.get() == GraphMode::Full { "flex" } else { "none" }
				>
					<select on:change=move |ev| {
						let value = event_target_value(&ev);
						type_filter.set((!value.is_empty()).then(|| Category::parse(&value)));
					}>
						<option value="">"All Types"</option>
						{Category::KNOWN
							.into_iter()
							.map(|c| view! { <option value=c.as_str().to_string()>{c.to_string()}</option> })
							.collect_view()}
					</select>
				</div>

				<div class="graph-counts">{counts}</div>
			</div>

			{move || fetch_error.get().map(|msg| view! { <div class="panel graph-error">{msg}</div> })}

			<div class="graph-stage">
				<KnowledgeGraph
					data=graph
					labels=labels
					on_node_select=Callback::new(move |node: RenderableNode| selected.set(Some(node)))
				/>
				<Show when=move || loading.get()>
					<div class="graph-loading">"Rendering graph..."</div>
				</Show>
			</div>

			<p class="graph-hint">
				"Click a node to inspect it. Drag nodes to reposition. Scroll to zoom. Drag background to pan."
			</p>

			{detail}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn controls_map_to_queries() {
		assert_eq!(
			graph_query(GraphMode::Full, None, None, 2),
			GraphQuery::Full {
				knowledge_type: None
			}
		);
		assert_eq!(
			graph_query(GraphMode::Full, Some(&Category::Exploit), Some("x"), 2),
			GraphQuery::Full {
				knowledge_type: Some(Category::Exploit)
			}
		);
		assert_eq!(
			graph_query(GraphMode::Mitre, Some(&Category::Exploit), None, 2),
			GraphQuery::Mitre
		);
		assert_eq!(
			graph_query(GraphMode::Focus, None, Some("entry-7"), 3),
			GraphQuery::Entry {
				id: "entry-7".to_string(),
				depth: 3
			}
		);
	}

	#[test]
	fn focus_mode_without_id_falls_back_to_full() {
		assert_eq!(
			graph_query(GraphMode::Focus, None, None, 2),
			GraphQuery::Full {
				knowledge_type: None
			}
		);
	}

	#[test]
	fn identical_payload_is_not_replaced() {
		let data: GraphData =
			serde_json::from_str(r#"{"nodes": [{"id": "a"}, {"id": "b"}]}"#).unwrap();
		let mut current = None;
		assert!(replace_payload(&mut current, data.clone()));
		assert!(!replace_payload(&mut current, data.clone()));
		assert_eq!(current.as_ref(), Some(&data));

		let mut other = data.clone();
		other.nodes.pop();
		assert!(replace_payload(&mut current, other.clone()));
		assert_eq!(current, Some(other));
	}

	#[test]
	fn only_latest_request_is_current() {
		let tracker = RequestTracker::default();
		let first = tracker.begin();
		assert!(tracker.is_current(first));
		let second = tracker.begin();
		assert!(!tracker.is_current(first));
		assert!(tracker.is_current(second));
	}
}
