//! HTTP client for the archive backend's graph endpoints.
//!
//! Requests go through the browser `fetch` API; bodies are read as text and
//! decoded with `serde_json`. A `null` graph body decodes as an empty graph.

use serde::Deserialize;
use thiserror::Error;
use url::form_urlencoded::byte_serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::components::knowledge_graph::{Category, GraphData};

/// Failure of a backend call.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The request never produced a response.
	#[error("request failed: {0}")]
	Request(String),
	/// Non-2xx response.
	#[error("HTTP {status}: {detail}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Backend `detail` text, or the raw body.
		detail: String,
	},
	/// The body was not the expected JSON.
	#[error("invalid response body: {0}")]
	Decode(#[from] serde_json::Error),
}

/// Which graph to fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphQuery {
	/// Every entry, optionally restricted to one category.
	Full {
		/// Category filter; `None` for every category.
		knowledge_type: Option<Category>,
	},
	/// Technique coverage: MITRE technique nodes joined to the entries citing them.
	Mitre,
	/// Neighborhood of one entry, `depth` hops out.
	Entry {
		/// Entry id at the center.
		id: String,
		/// Hop count.
		depth: u32,
	},
}

impl GraphQuery {
	/// Request path relative to the API base.
	pub fn path(&self) -> String {
		match self {
			GraphQuery::Full {
				knowledge_type: None,
			} => "/graph/".to_string(),
			GraphQuery::Full {
				knowledge_type: Some(category),
			} => format!("/graph/?knowledge_type={}", encode(category.as_str())),
			GraphQuery::Mitre => "/graph/mitre".to_string(),
			GraphQuery::Entry { id, depth } => {
				format!("/graph/entry/{}?depth={}", encode(id), depth)
			}
		}
	}
}

fn encode(value: &str) -> String {
	byte_serialize(value.as_bytes()).collect()
}

#[derive(Deserialize)]
struct ErrorBody {
	detail: serde_json::Value,
}

/// Human-readable message from an error response body.
///
/// The backend sends `{"detail": "..."}`; validation errors carry a structured
/// detail, which is passed through as JSON text.
fn error_detail(body: &str) -> String {
	match serde_json::from_str::<ErrorBody>(body) {
		Ok(ErrorBody {
			detail: serde_json::Value::String(detail),
		}) => detail,
		Ok(ErrorBody { detail }) => detail.to_string(),
		Err(_) if body.trim().is_empty() => "no details".to_string(),
		Err(_) => body.trim().to_string(),
	}
}

/// Decodes a graph response body. A `null` body is an empty graph.
pub fn decode_graph(body: &str) -> Result<GraphData, ApiError> {
	let data: Option<GraphData> = serde_json::from_str(body)?;
	Ok(data.unwrap_or_default())
}

/// Client for one API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
}

impl ApiClient {
	/// Creates a client for `base_url`, ignoring a trailing slash.
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	/// Absolute request URL for `path`.
	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	async fn fetch_text(&self, path: &str) -> Result<String, ApiError> {
		let opts = RequestInit::new();
		opts.set_method("GET");
		opts.set_mode(RequestMode::Cors);

		let request = Request::new_with_str_and_init(&self.url(path), &opts)
			.map_err(|e| ApiError::Request(format!("{:?}", e)))?;
		request
			.headers()
			.set("Accept", "application/json")
			.map_err(|e| ApiError::Request(format!("{:?}", e)))?;

		let window = web_sys::window().ok_or_else(|| ApiError::Request("no window".into()))?;
		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| ApiError::Request(format!("{:?}", e)))?
			.dyn_into()
			.map_err(|_| ApiError::Request("fetch did not yield a Response".into()))?;

		let text = JsFuture::from(
			response
				.text()
				.map_err(|e| ApiError::Request(format!("{:?}", e)))?,
		)
		.await
		.map_err(|e| ApiError::Request(format!("{:?}", e)))?
		.as_string()
		.unwrap_or_default();

		if !response.ok() {
			return Err(ApiError::Status {
				status: response.status(),
				detail: error_detail(&text),
			});
		}
		Ok(text)
	}

	/// Fetches one graph.
	pub async fn graph(&self, query: &GraphQuery) -> Result<GraphData, ApiError> {
		let text = self.fetch_text(&query.path()).await?;
		decode_graph(&text)
	}
}
