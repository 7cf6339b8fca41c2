//! Selection State Store: the single authoritative holder of "what the user
//! is currently looking at", plus the orchestration rule for fetching.
//!
//! All mutation goes through the methods here; the interaction and viewport
//! layers are pure readers. Graph fetches carry a monotonically increasing
//! request token, and a response is applied only if its token is still the
//! latest when it resolves: last-selection-wins, not last-response-wins.
//! Search responses are deliberately untokened (last-resolved-wins), since a
//! brief flicker of stale suggestions is tolerable.

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, ApiResult};
use crate::highlight;
use crate::types::{Crate, CrateInfo, DependencyGraph};
use crate::url_sync::{self, UrlQuery};

/// Reactive application state, shared through context. All fields are
/// signals, so the store itself is `Copy`.
#[derive(Clone, Copy)]
pub struct AppStore {
	/// Selected root crate plus its feature selection.
	pub current_crate: RwSignal<Option<CrateInfo>>,
	/// Latest fetched graph. Replaced wholesale, never patched.
	pub dependency_graph: RwSignal<Option<DependencyGraph>>,
	/// Ephemeral clicked-node selection; cleared on every graph replacement.
	pub clicked_crate_name: RwSignal<Option<String>>,
	/// Selected compilation target, `None` for the backend default.
	pub selected_target: RwSignal<Option<String>>,
	/// Selected cfg name, `None` for the backend default.
	pub selected_cfg_name: RwSignal<Option<String>>,
	/// Free-text search input.
	pub search_term: RwSignal<String>,
	/// Suggestions for the current search term.
	pub search_results: RwSignal<Vec<Crate>>,
	/// Valid targets fetched from the backend.
	pub valid_targets: RwSignal<Vec<String>>,
	/// Valid cfg names fetched from the backend.
	pub valid_cfg_names: RwSignal<Vec<String>>,
	/// Active error notification; empty string means none.
	pub error: RwSignal<String>,
	/// Token of the most recently issued graph fetch.
	graph_request: RwSignal<u64>,
}

impl Default for AppStore {
	fn default() -> Self {
		Self::new()
	}
}

impl AppStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self {
			current_crate: RwSignal::new(None),
			dependency_graph: RwSignal::new(None),
			clicked_crate_name: RwSignal::new(None),
			selected_target: RwSignal::new(None),
			selected_cfg_name: RwSignal::new(None),
			search_term: RwSignal::new(String::new()),
			search_results: RwSignal::new(vec![]),
			valid_targets: RwSignal::new(vec![]),
			valid_cfg_names: RwSignal::new(vec![]),
			error: RwSignal::new(String::new()),
			graph_request: RwSignal::new(0),
		}
	}

	/// Raises the single error notification; a new message replaces any
	/// previous one.
	pub fn report_error(&self, message: impl Into<String>) {
		self.error.set(message.into());
	}

	/// Dismisses the error notification.
	pub fn clear_error(&self) {
		self.error.set(String::new());
	}

	fn issue_graph_token(&self) -> u64 {
		self.graph_request.update(|token| *token += 1);
		self.graph_request.get_untracked()
	}

	fn token_is_current(&self, token: u64) -> bool {
		self.graph_request.get_untracked() == token
	}

	/// Applies a graph response for a plain refetch (root crate unchanged).
	/// Stale responses are discarded on arrival.
	fn apply_graph_response(&self, token: u64, result: ApiResult<DependencyGraph>) {
		if !self.token_is_current(token) {
			debug!("store: discarding stale graph response (token {token})");
			return;
		}
		match result {
			Ok(graph) => {
				self.clicked_crate_name.set(None);
				self.dependency_graph.set(Some(graph));
				self.clear_error();
			}
			// Previous graph stays up: stale but consistent.
			Err(message) => self.report_error(message),
		}
	}

	/// Applies a graph response that also carries a new root crate (the
	/// random endpoint). Root and graph are set together so they can never
	/// disagree.
	fn apply_root_graph_response(
		&self,
		token: u64,
		result: ApiResult<DependencyGraph>,
	) {
		if !self.token_is_current(token) {
			debug!("store: discarding stale random-graph response (token {token})");
			return;
		}
		match result {
			Ok(graph) => {
				let root = graph
					.root_name()
					.and_then(|root| graph.node(root));
				let Some(krate) = root.map(|node| node.krate.clone()) else {
					self.report_error("Received an empty dependency graph.");
					return;
				};

				self.current_crate.set(Some(CrateInfo {
					krate,
					selected_features: vec![],
				}));
				self.selected_target.set(None);
				self.selected_cfg_name.set(None);
				self.clicked_crate_name.set(None);
				self.dependency_graph.set(Some(graph));
				self.clear_error();
				self.sync_url();
			}
			Err(message) => self.report_error(message),
		}
	}

	fn spawn_graph_fetch(&self, name: String, features: Vec<String>) {
		let store = *self;
		let token = store.issue_graph_token();
		let target = store.selected_target.get_untracked();
		let cfg_name = store.selected_cfg_name.get_untracked();

		spawn_local(async move {
			let result = api::get_dependency_graph(
				&name,
				&features,
				target.as_deref(),
				cfg_name.as_deref(),
			)
			.await;
			store.apply_graph_response(token, result);
		});
	}

	/// Selects a new root crate: feature and target/cfg selections reset to
	/// their defaults and a graph fetch with no overrides is issued.
	pub fn set_root_crate(&self, krate: Crate) {
		let name = krate.name.clone();
		self.current_crate.set(Some(CrateInfo {
			krate,
			selected_features: vec![],
		}));
		self.selected_target.set(None);
		self.selected_cfg_name.set(None);
		self.clicked_crate_name.set(None);
		self.sync_url();
		self.spawn_graph_fetch(name, vec![]);
	}

	/// Resolves a search suggestion into a root-crate selection.
	pub fn select_search_result(&self, name: &str) {
		self.search_term.set(name.to_string());
		if name.is_empty() {
			return;
		}
		let found = self
			.search_results
			.with_untracked(|results| results.iter().find(|c| c.name == name).cloned());
		match found {
			Some(krate) => {
				self.search_results.set(vec![]);
				self.set_root_crate(krate);
			}
			None => self.report_error(format!("Crate with id {name} does not exist.")),
		}
	}

	/// Replaces the feature selection and refetches with the current
	/// target/cfg. No-op when no root crate is set.
	pub fn set_selected_features(&self, features: Vec<String>) {
		let Some(mut info) = self.current_crate.get_untracked() else {
			return;
		};
		info.selected_features = features.clone();
		let name = info.krate.name.clone();
		self.current_crate.set(Some(info));
		self.sync_url();
		self.spawn_graph_fetch(name, features);
	}

	/// Toggle-all semantics: select every toggleable feature unless all are
	/// already selected, in which case clear the selection.
	pub fn toggle_all_features(&self) {
		let Some(info) = self.current_crate.get_untracked() else {
			return;
		};
		let next = next_all_toggle(&info.selected_features, &info.krate.feature_names());
		self.set_selected_features(next);
	}

	/// Applies a target selection after validating it against the fetched
	/// target list. Empty input means "no selection" and is ignored.
	pub fn set_selected_target(&self, target: &str) {
		if target.is_empty() {
			return;
		}
		let valid = self
			.valid_targets
			.with_untracked(|targets| targets.iter().any(|t| t == target));
		if !valid {
			warn!("store: ignoring unknown target {target:?}");
			return;
		}
		self.selected_target.set(Some(target.to_string()));
		self.sync_url();
		self.refetch_current();
	}

	/// Applies a cfg-name selection after validating it against the fetched
	/// cfg-name list. Empty input means "no selection" and is ignored.
	pub fn set_selected_cfg_name(&self, cfg_name: &str) {
		if cfg_name.is_empty() {
			return;
		}
		let valid = self
			.valid_cfg_names
			.with_untracked(|names| names.iter().any(|n| n == cfg_name));
		if !valid {
			warn!("store: ignoring unknown cfg name {cfg_name:?}");
			return;
		}
		self.selected_cfg_name.set(Some(cfg_name.to_string()));
		self.sync_url();
		self.refetch_current();
	}

	fn refetch_current(&self) {
		let Some(info) = self.current_crate.get_untracked() else {
			return;
		};
		self.spawn_graph_fetch(info.krate.name, info.selected_features);
	}

	/// Fetches a graph rooted at a server-chosen crate and atomically
	/// replaces the whole selection with it.
	pub fn load_random_crate(&self) {
		let store = *self;
		let token = store.issue_graph_token();
		spawn_local(async move {
			let result = api::get_random_dependency_graph().await;
			store.apply_root_graph_response(token, result);
		});
	}

	/// Mount-time bootstrap from the query string. Runs exactly once; later
	/// URL writes never re-enter this path.
	pub fn bootstrap_from_url(&self) {
		let query = url_sync::read_query();
		let Some(name) = query.crate_name.clone() else {
			self.load_random_crate();
			return;
		};

		let store = *self;
		let token = store.issue_graph_token();
		spawn_local(async move {
			match api::get_crate(&name).await {
				Ok(krate) => {
					let Some(features) =
						store.seed_bootstrap_selection(token, &query, krate)
					else {
						return;
					};
					let result = api::get_dependency_graph(
						&name,
						&features,
						query.target.as_deref(),
						query.cfg_name.as_deref(),
					)
					.await;
					store.apply_graph_response(token, result);
				}
				Err(message) => {
					if store.token_is_current(token) {
						store.report_error(message);
					}
				}
			}
		});
	}

	/// Seeds the selection from the URL query once the crate metadata has
	/// resolved. A newer fetch issued while the metadata request was in
	/// flight wins: the seed is discarded wholesale so the root crate and
	/// the displayed graph can never disagree. Returns the validated
	/// feature list for the follow-up graph fetch.
	fn seed_bootstrap_selection(
		&self,
		token: u64,
		query: &UrlQuery,
		krate: Crate,
	) -> Option<Vec<String>> {
		if !self.token_is_current(token) {
			debug!("store: discarding stale bootstrap seed (token {token})");
			return None;
		}

		// Keep the invariant: only features the crate actually has survive
		// the URL.
		let valid_names = krate.feature_names();
		let features: Vec<String> = query
			.features
			.iter()
			.filter(|f| valid_names.contains(f))
			.cloned()
			.collect();

		self.current_crate.set(Some(CrateInfo {
			krate,
			selected_features: features.clone(),
		}));
		self.selected_target.set(query.target.clone());
		self.selected_cfg_name.set(query.cfg_name.clone());
		Some(features)
	}

	/// Search-as-you-type. Empty terms short-circuit to an empty suggestion
	/// list without touching the network; otherwise the most recently
	/// resolved response wins.
	pub fn run_search(&self, term: String) {
		self.search_term.set(term.clone());
		if term.is_empty() {
			self.search_results.set(vec![]);
			return;
		}

		let store = *self;
		spawn_local(async move {
			match api::search_crates(&term.to_lowercase()).await {
				Ok(results) => store.search_results.set(results),
				Err(message) => store.report_error(message),
			}
		});
	}

	/// Loads the valid target and cfg-name lists used by the pickers.
	pub fn load_compiler_lists(&self) {
		let store = *self;
		spawn_local(async move {
			match api::get_targets().await {
				Ok(list) => store.valid_targets.set(list.targets),
				Err(message) => store.report_error(message),
			}
			match api::get_cfg_names().await {
				Ok(list) => store.valid_cfg_names.set(list.cfg_names),
				Err(message) => store.report_error(message),
			}
		});
	}

	/// Click toggle for graph nodes and list rows.
	pub fn toggle_clicked(&self, name: &str) {
		let next = self
			.clicked_crate_name
			.with_untracked(|current| highlight::toggle_clicked(current.as_deref(), name));
		self.clicked_crate_name.set(next);
	}

	/// Background click: clears the node selection.
	pub fn clear_clicked(&self) {
		self.clicked_crate_name.set(None);
	}

	/// Mirrors the current selection into the query string.
	fn sync_url(&self) {
		let query = UrlQuery {
			crate_name: self
				.current_crate
				.with_untracked(|c| c.as_ref().map(|info| info.krate.name.clone())),
			features: self
				.current_crate
				.with_untracked(|c| {
					c.as_ref()
						.map(|info| info.selected_features.clone())
						.unwrap_or_default()
				}),
			target: self.selected_target.get_untracked(),
			cfg_name: self.selected_cfg_name.get_untracked(),
		};
		url_sync::write_query(&query);
	}
}

/// Pure toggle-all rule: everything selected flips to nothing, anything
/// else flips to everything.
fn next_all_toggle(selected: &[String], all: &[String]) -> Vec<String> {
	if selected.len() == all.len() {
		vec![]
	} else {
		all.to_vec()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::CrateDistance;
	use std::collections::HashMap;

	fn with_owner<T>(f: impl FnOnce() -> T) -> T {
		let owner = Owner::new();
		owner.set();
		f()
	}

	fn graph_rooted_at(name: &str) -> DependencyGraph {
		DependencyGraph {
			crates: vec![CrateDistance {
				krate: Crate {
					name: name.to_string(),
					version: "1.0.0".to_string(),
					description: String::new(),
					downloads: 0,
					categories: vec![],
					keywords: vec![],
					features: HashMap::new(),
					created_at: String::new(),
				},
				distance: 0,
				enabled_features: vec![],
			}],
			dependencies: vec![],
		}
	}

	#[test]
	fn stale_graph_response_is_discarded() {
		with_owner(|| {
			let store = AppStore::new();
			let token_a = store.issue_graph_token();
			let token_b = store.issue_graph_token();

			// "b" resolves first, then "a" arrives late.
			store.apply_graph_response(token_b, Ok(graph_rooted_at("b")));
			store.apply_graph_response(token_a, Ok(graph_rooted_at("a")));

			let root = store
				.dependency_graph
				.with_untracked(|g| g.as_ref().unwrap().root_name().unwrap().to_string());
			assert_eq!(root, "b");
		});
	}

	#[test]
	fn graph_replacement_clears_clicked_node() {
		with_owner(|| {
			let store = AppStore::new();
			store.clicked_crate_name.set(Some("serde".to_string()));

			let token = store.issue_graph_token();
			store.apply_graph_response(token, Ok(graph_rooted_at("tokio")));

			assert_eq!(store.clicked_crate_name.get_untracked(), None);
		});
	}

	#[test]
	fn failed_fetch_keeps_previous_graph() {
		with_owner(|| {
			let store = AppStore::new();
			let token = store.issue_graph_token();
			store.apply_graph_response(token, Ok(graph_rooted_at("serde")));

			let token = store.issue_graph_token();
			store.apply_graph_response(token, Err("boom".to_string()));

			assert_eq!(store.error.get_untracked(), "boom");
			let root = store
				.dependency_graph
				.with_untracked(|g| g.as_ref().unwrap().root_name().unwrap().to_string());
			assert_eq!(root, "serde");
		});
	}

	#[test]
	fn random_response_keeps_root_and_graph_in_agreement() {
		with_owner(|| {
			let store = AppStore::new();
			store.selected_target.set(Some("x86_64-unknown-linux-gnu".to_string()));

			let token = store.issue_graph_token();
			store.apply_root_graph_response(token, Ok(graph_rooted_at("rand")));

			let crate_name = store
				.current_crate
				.with_untracked(|c| c.as_ref().unwrap().krate.name.clone());
			let root = store
				.dependency_graph
				.with_untracked(|g| g.as_ref().unwrap().root_name().unwrap().to_string());
			assert_eq!(crate_name, root);
			assert_eq!(store.selected_target.get_untracked(), None);
		});
	}

	fn crate_with_features(name: &str, features: &[&str]) -> Crate {
		let mut graph = graph_rooted_at(name);
		let mut krate = graph.crates.remove(0).krate;
		for feature in features {
			krate.features.insert(feature.to_string(), vec![]);
		}
		krate
	}

	#[test]
	fn bootstrap_seed_loses_to_newer_fetch() {
		with_owner(|| {
			let store = AppStore::new();
			let bootstrap_token = store.issue_graph_token();

			// A random fetch completes while the bootstrap's metadata
			// request is still in flight.
			let newer_token = store.issue_graph_token();
			store.apply_root_graph_response(newer_token, Ok(graph_rooted_at("rand")));

			let query = UrlQuery {
				crate_name: Some("serde".to_string()),
				features: vec![],
				target: Some("wasm32-unknown-unknown".to_string()),
				cfg_name: None,
			};
			let seeded = store.seed_bootstrap_selection(
				bootstrap_token,
				&query,
				crate_with_features("serde", &[]),
			);

			assert_eq!(seeded, None);
			let crate_name = store
				.current_crate
				.with_untracked(|c| c.as_ref().unwrap().krate.name.clone());
			assert_eq!(crate_name, "rand");
			assert_eq!(store.selected_target.get_untracked(), None);
		});
	}

	#[test]
	fn bootstrap_seed_applies_only_known_features() {
		with_owner(|| {
			let store = AppStore::new();
			let token = store.issue_graph_token();

			let query = UrlQuery {
				crate_name: Some("serde".to_string()),
				features: vec!["derive".to_string(), "ghost".to_string()],
				target: None,
				cfg_name: Some("unix".to_string()),
			};
			let seeded = store.seed_bootstrap_selection(
				token,
				&query,
				crate_with_features("serde", &["derive", "std"]),
			);

			assert_eq!(seeded, Some(vec!["derive".to_string()]));
			let selected = store
				.current_crate
				.with_untracked(|c| c.as_ref().unwrap().selected_features.clone());
			assert_eq!(selected, vec!["derive"]);
			assert_eq!(store.selected_cfg_name.get_untracked().as_deref(), Some("unix"));
		});
	}

	#[test]
	fn toggle_all_selects_everything_then_nothing() {
		let all = vec!["derive".to_string(), "std".to_string()];
		assert_eq!(next_all_toggle(&[], &all), all);
		assert_eq!(next_all_toggle(&all, &all), Vec::<String>::new());
	}

	#[test]
	fn partial_selection_toggles_to_everything() {
		let all = vec!["derive".to_string(), "std".to_string()];
		let some = vec!["derive".to_string()];
		assert_eq!(next_all_toggle(&some, &all), all);
	}
}
