//! Remote Data Gateway: typed wrappers around the registry API.
//!
//! Every operation resolves to [`ApiResult`]; transport failures, non-2xx
//! statuses, and malformed payloads all land in the `Err` branch with a
//! human-readable message. Callers never see an exception path, so the UI
//! has a single uniform error channel.

use gloo_net::http::{Request, Response};
use log::warn;
use serde::de::DeserializeOwned;

use crate::types::{
	CfgNameList, Crate, DependencyGraph, LastUpdated, TargetList,
};

/// API base path, overridable at compile time.
pub const API_BASE_URL: &str = match option_env!("API_BASE_URL") {
	Some(url) => url,
	None => "/api",
};

/// Uniform result shape for every gateway call.
pub type ApiResult<T> = Result<T, String>;

/// Extracts the backend's error message from a non-2xx response, falling
/// back to the status line when the body is empty or unreadable.
async fn error_message(response: Response) -> String {
	let status = response.status();
	match response.text().await {
		// Error bodies are JSON-encoded strings; unwrap the quoting.
		Ok(body) if !body.is_empty() => {
			serde_json::from_str::<String>(&body).unwrap_or(body)
		}
		_ => format!("Request failed with status {status}."),
	}
}

/// Performs a GET against `{API_BASE_URL}{path}` and decodes the JSON body.
async fn get_json<T: DeserializeOwned>(path: &str) -> ApiResult<T> {
	let url = format!("{API_BASE_URL}{path}");
	let response = Request::get(&url)
		.send()
		.await
		.map_err(|e| format!("Network error reaching the registry API: {e}"))?;

	if !response.ok() {
		let message = error_message(response).await;
		warn!("api: GET {path} failed: {message}");
		return Err(message);
	}

	response
		.json::<T>()
		.await
		.map_err(|e| format!("Malformed response from the registry API: {e}"))
}

/// Fetches a single crate's metadata.
pub async fn get_crate(name: &str) -> ApiResult<Crate> {
	get_json(&format!("/crates/{name}")).await
}

/// Searches crates matching `term`.
///
/// Callers must short-circuit empty terms to an empty result instead of
/// calling this.
pub async fn search_crates(term: &str) -> ApiResult<Vec<Crate>> {
	get_json(&format!("/search/crates/{term}")).await
}

/// Builds the graph request path. Omitted selections are excluded from the
/// query string entirely so the backend applies its own defaults.
fn graph_path(
	name: &str,
	features: &[String],
	target: Option<&str>,
	cfg_name: Option<&str>,
) -> String {
	let mut params = Vec::new();
	if !features.is_empty() {
		params.push(format!("features={}", features.join(",")));
	}
	if let Some(target) = target {
		params.push(format!("target={target}"));
	}
	if let Some(cfg_name) = cfg_name {
		params.push(format!("cfg_name={cfg_name}"));
	}

	if params.is_empty() {
		format!("/graph/{name}")
	} else {
		format!("/graph/{name}?{}", params.join("&"))
	}
}

/// Fetches the dependency graph rooted at `name` under the given selection.
pub async fn get_dependency_graph(
	name: &str,
	features: &[String],
	target: Option<&str>,
	cfg_name: Option<&str>,
) -> ApiResult<DependencyGraph> {
	get_json(&graph_path(name, features, target, cfg_name)).await
}

/// Fetches a dependency graph rooted at a server-chosen crate.
pub async fn get_random_dependency_graph() -> ApiResult<DependencyGraph> {
	get_json("/random/graph").await
}

/// Fetches the elapsed seconds since the backend data was refreshed.
pub async fn get_last_updated() -> ApiResult<LastUpdated> {
	get_json("/state/last-updated").await
}

/// Fetches the list of valid compilation targets.
pub async fn get_targets() -> ApiResult<TargetList> {
	get_json("/compiler/targets").await
}

/// Fetches the list of valid cfg names.
pub async fn get_cfg_names() -> ApiResult<CfgNameList> {
	get_json("/compiler/cfg-names").await
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn graph_path_omits_empty_selections() {
		assert_eq!(graph_path("serde", &[], None, None), "/graph/serde");
	}

	#[test]
	fn graph_path_joins_features_with_commas() {
		let features = vec!["derive".to_string(), "std".to_string()];
		assert_eq!(
			graph_path("serde", &features, None, None),
			"/graph/serde?features=derive,std"
		);
	}

	#[test]
	fn graph_path_includes_target_and_cfg_name() {
		let features = vec!["full".to_string()];
		assert_eq!(
			graph_path(
				"tokio",
				&features,
				Some("x86_64-unknown-linux-gnu"),
				Some("unix"),
			),
			"/graph/tokio?features=full&target=x86_64-unknown-linux-gnu&cfg_name=unix"
		);
	}
}
