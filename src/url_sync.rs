//! URL Synchronization Layer: query-string binding for shareable views.
//!
//! Four query parameters are owned by this module: `crate`, `features`
//! (comma-delimited), `target`, and `cfg_name`. The query string is read
//! exactly once, at mount; afterwards state changes are mirrored back with
//! `history.replaceState`, which never re-triggers the read path, so no
//! update loop can form.
//!
//! Parsing and encoding are pure so they can be tested off the DOM.

use wasm_bindgen::JsValue;

/// The selection fields mirrored into the query string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UrlQuery {
	/// Root crate name (`crate`).
	pub crate_name: Option<String>,
	/// Selected features (`features`), empty when absent.
	pub features: Vec<String>,
	/// Selected target (`target`), `None` means the backend default.
	pub target: Option<String>,
	/// Selected cfg name (`cfg_name`), `None` means the backend default.
	pub cfg_name: Option<String>,
}

/// Parses a raw query string (with or without the leading `?`).
///
/// A `features` list containing any empty entry is treated as invalid and
/// collapses to no features at all.
pub fn parse_query(query: &str) -> UrlQuery {
	let mut parsed = UrlQuery::default();

	for pair in query.trim_start_matches('?').split('&') {
		let (key, value) = match pair.split_once('=') {
			Some((key, value)) => (key, value),
			None => continue,
		};
		if value.is_empty() {
			continue;
		}

		match key {
			"crate" => parsed.crate_name = Some(value.to_string()),
			"features" => {
				let entries: Vec<&str> = value.split(',').collect();
				parsed.features = if entries.iter().any(|f| f.is_empty()) {
					vec![]
				} else {
					entries.iter().map(|f| f.to_string()).collect()
				};
			}
			"target" => parsed.target = Some(value.to_string()),
			"cfg_name" => parsed.cfg_name = Some(value.to_string()),
			_ => {}
		}
	}

	parsed
}

/// Encodes the selection back into a query string, or `""` when every field
/// is at its default. Defaults are omitted to keep shareable links minimal.
pub fn encode_query(query: &UrlQuery) -> String {
	let mut params = Vec::new();

	if let Some(name) = &query.crate_name {
		params.push(format!("crate={name}"));
	}
	if !query.features.is_empty() {
		params.push(format!("features={}", query.features.join(",")));
	}
	if let Some(target) = &query.target {
		params.push(format!("target={target}"));
	}
	if let Some(cfg_name) = &query.cfg_name {
		params.push(format!("cfg_name={cfg_name}"));
	}

	if params.is_empty() {
		String::new()
	} else {
		format!("?{}", params.join("&"))
	}
}

/// Reads the page's current query string. Mount-time only.
pub fn read_query() -> UrlQuery {
	if cfg!(not(target_arch = "wasm32")) {
		// No address bar outside the browser (unit tests).
		return UrlQuery::default();
	}
	let Some(window) = web_sys::window() else {
		return UrlQuery::default();
	};
	match window.location().search() {
		Ok(search) => parse_query(&search),
		Err(_) => UrlQuery::default(),
	}
}

/// Mirrors the selection into the address bar without navigating.
pub fn write_query(query: &UrlQuery) {
	if cfg!(not(target_arch = "wasm32")) {
		return;
	}
	let Some(window) = web_sys::window() else {
		return;
	};
	let location = window.location();
	let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
	let url = format!("{pathname}{}", encode_query(query));

	if let Ok(history) = window.history() {
		let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&url));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_reads_all_owned_params() {
		let parsed = parse_query(
			"?crate=serde&features=derive,std&target=wasm32-unknown-unknown&cfg_name=unix",
		);
		assert_eq!(parsed.crate_name.as_deref(), Some("serde"));
		assert_eq!(parsed.features, vec!["derive", "std"]);
		assert_eq!(parsed.target.as_deref(), Some("wasm32-unknown-unknown"));
		assert_eq!(parsed.cfg_name.as_deref(), Some("unix"));
	}

	#[test]
	fn parse_treats_empty_values_as_absent() {
		let parsed = parse_query("crate=&target=");
		assert_eq!(parsed, UrlQuery::default());
	}

	#[test]
	fn parse_rejects_feature_list_with_placeholder_entries() {
		assert!(parse_query("crate=serde&features=derive,,std").features.is_empty());
		assert!(parse_query("crate=serde&features=,").features.is_empty());
	}

	#[test]
	fn parse_ignores_unowned_params() {
		let parsed = parse_query("crate=serde&utm_source=x");
		assert_eq!(parsed.crate_name.as_deref(), Some("serde"));
	}

	#[test]
	fn encode_omits_defaults() {
		let query = UrlQuery {
			crate_name: Some("serde".to_string()),
			features: vec![],
			target: None,
			cfg_name: None,
		};
		assert_eq!(encode_query(&query), "?crate=serde");
		assert_eq!(encode_query(&UrlQuery::default()), "");
	}

	#[test]
	fn selection_round_trips_with_defaults_falling_back() {
		let query = UrlQuery {
			crate_name: Some("serde".to_string()),
			features: vec!["derive".to_string(), "std".to_string()],
			target: None,
			cfg_name: None,
		};

		let decoded = parse_query(&encode_query(&query));
		assert_eq!(decoded.crate_name.as_deref(), Some("serde"));
		assert_eq!(decoded.features, vec!["derive", "std"]);
		assert_eq!(decoded.target, None);
		assert_eq!(decoded.cfg_name, None);
	}
}
