//! Runtime configuration read from the host page.
//!
//! The page may embed `<script id="app-config" type="application/json">` with
//! any subset of the fields below; missing fields take their defaults.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use crate::components::knowledge_graph::DEFAULT_MAX_LABEL_LEN;

/// Id of the script element holding the JSON config.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

/// Settings the host page can override.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Prefix for every backend request, e.g. `/api/v1`.
	pub api_base: String,
	/// Visible characters of a node label drawn before the ellipsis.
	pub label_max_len: usize,
	/// Hop count for the focused-entry subgraph.
	pub focus_depth: u32,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base: "/api/v1".to_string(),
			label_max_len: DEFAULT_MAX_LABEL_LEN,
			focus_depth: 2,
		}
	}
}

impl AppConfig {
	/// Parses config JSON. Missing keys take their defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		let mut config: Self = serde_json::from_str(text)?;
		config.api_base = config.api_base.trim_end_matches('/').to_string();
		Ok(config)
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let element = window.document()?.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Reads the config element, falling back to defaults when it is absent or
/// malformed.
pub fn load_config() -> AppConfig {
	let Some(text) = config_text() else {
		info!(
			"abyssal-graph: no #{} element, using defaults",
			CONFIG_ELEMENT_ID
		);
		return AppConfig::default();
	};
	match AppConfig::from_json(&text) {
		Ok(config) => {
			info!("abyssal-graph: api base {}", config.api_base);
			config
		}
		Err(e) => {
			warn!("abyssal-graph: failed to parse config: {}", e);
			AppConfig::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_gives_defaults() {
		assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
	}

	#[test]
	fn partial_config_overrides_fields() {
		let config =
			AppConfig::from_json(r#"{"api_base": "http://archive.local/api/v1/", "focus_depth": 3}"#)
				.unwrap();
		assert_eq!(config.api_base, "http://archive.local/api/v1");
		assert_eq!(config.focus_depth, 3);
		assert_eq!(config.label_max_len, 20);
	}

	#[test]
	fn malformed_config_is_an_error() {
		assert!(AppConfig::from_json(r#"{"label_max_len": "long"}"#).is_err());
	}
}
