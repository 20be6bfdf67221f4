//! abyssal-graph: attack graph visualization for the Abyssal Archive.
//!
//! This crate provides a WASM-based page that fetches the archive's knowledge
//! graph, renders it on a canvas with a force-directed layout, and reports
//! node selection back to the page.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod api;
pub mod components;
pub mod config;
mod pages;

pub use components::knowledge_graph::{
	GraphData, GraphEdge, GraphNode, GraphViewController, KnowledgeGraph, build_elements,
	format_label,
};
pub use config::AppConfig;
pub use pages::{GraphMode, GraphPage};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("abyssal-graph: logging initialized");
}

/// Main application component.
/// Reads the page config and mounts the attack graph page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = config::load_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Abyssal Archive | Attack Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="abyss">
			<GraphPage config=config />
		</main>
	}
}
