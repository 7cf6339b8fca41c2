//! Data model for the registry API.
//!
//! Everything here mirrors the backend's JSON wire format. Values are
//! immutable once deserialized: a refetch replaces the whole
//! [`DependencyGraph`], nothing is ever patched in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Reserved feature name excluded from user-facing toggles.
pub const DEFAULT_FEATURE: &str = "default";

/// A crate as published on the registry.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Crate {
	/// Unique crate name, the identity key throughout the app.
	pub name: String,
	/// Latest published version.
	pub version: String,
	/// Registry description text.
	pub description: String,
	/// All-time download count.
	pub downloads: u64,
	/// Registry categories, in registry order.
	pub categories: Vec<String>,
	/// Registry keywords, in registry order.
	pub keywords: Vec<String>,
	/// Feature map: feature name to the features it enables.
	pub features: HashMap<String, Vec<String>>,
	/// Publication timestamp, display-only.
	pub created_at: String,
}

impl Crate {
	/// Names of user-toggleable features, sorted, with `"default"` excluded.
	pub fn feature_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self
			.features
			.keys()
			.filter(|name| *name != DEFAULT_FEATURE)
			.cloned()
			.collect();
		names.sort();
		names
	}
}

/// A node in a dependency graph: a crate annotated with its position
/// relative to the root of the graph.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CrateDistance {
	/// The crate itself, flattened into the same JSON object.
	#[serde(flatten)]
	pub krate: Crate,
	/// Shortest hop count from the root crate (0 for the root).
	pub distance: u32,
	/// Features actually active for this crate under the current selection.
	pub enabled_features: Vec<String>,
}

/// A directed dependency edge between two crates, referenced by name.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Dependency {
	/// Name of the depending crate.
	pub from: String,
	/// Name of the crate depended on.
	pub to: String,
	/// Platform triple the edge is conditional on, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target: Option<String>,
}

/// The atomic unit returned per graph query.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct DependencyGraph {
	/// Nodes, unique by crate name. The root is the node with distance 0.
	pub crates: Vec<CrateDistance>,
	/// Edges. An edge naming a crate absent from `crates` is tolerated
	/// downstream, never fatal.
	pub dependencies: Vec<Dependency>,
}

impl DependencyGraph {
	/// Looks up a node by crate name.
	pub fn node(&self, name: &str) -> Option<&CrateDistance> {
		self.crates.iter().find(|c| c.krate.name == name)
	}

	/// The root crate's name, if the graph is non-empty.
	pub fn root_name(&self) -> Option<&str> {
		self.crates
			.iter()
			.find(|c| c.distance == 0)
			.map(|c| c.krate.name.as_str())
	}
}

/// The root crate paired with the user's feature selection.
#[derive(Clone, Debug, PartialEq)]
pub struct CrateInfo {
	/// The selected root crate.
	pub krate: Crate,
	/// Currently selected features, always a subset of
	/// [`Crate::feature_names`].
	pub selected_features: Vec<String>,
}

/// Elapsed time since the backend data was last refreshed.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct LastUpdated {
	/// Seconds since the last refresh.
	pub seconds: u64,
}

/// Valid compilation targets, for validating the target picker.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TargetList {
	/// Known target triples.
	pub targets: Vec<String>,
}

/// Valid cfg names, for validating the cfg-name picker.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CfgNameList {
	/// Known cfg names.
	pub cfg_names: Vec<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_crate(name: &str) -> Crate {
		Crate {
			name: name.to_string(),
			version: "1.0.0".to_string(),
			description: String::new(),
			downloads: 0,
			categories: vec![],
			keywords: vec![],
			features: HashMap::new(),
			created_at: String::new(),
		}
	}

	#[test]
	fn feature_names_excludes_default() {
		let mut krate = sample_crate("serde");
		krate.features.insert("default".to_string(), vec!["std".to_string()]);
		krate.features.insert("std".to_string(), vec![]);
		krate.features.insert("derive".to_string(), vec![]);

		assert_eq!(krate.feature_names(), vec!["derive", "std"]);
	}

	#[test]
	fn crate_distance_deserializes_flattened() {
		let json = r#"{
			"name": "serde",
			"version": "1.0.0",
			"description": "serialization",
			"downloads": 100,
			"categories": [],
			"keywords": [],
			"features": {},
			"created_at": "2015-01-01",
			"distance": 1,
			"enabled_features": ["std"]
		}"#;

		let node: CrateDistance = serde_json::from_str(json).unwrap();
		assert_eq!(node.krate.name, "serde");
		assert_eq!(node.distance, 1);
		assert_eq!(node.enabled_features, vec!["std"]);
	}

	#[test]
	fn root_name_finds_distance_zero() {
		let graph = DependencyGraph {
			crates: vec![
				CrateDistance {
					krate: sample_crate("dep"),
					distance: 1,
					enabled_features: vec![],
				},
				CrateDistance {
					krate: sample_crate("root"),
					distance: 0,
					enabled_features: vec![],
				},
			],
			dependencies: vec![],
		};

		assert_eq!(graph.root_name(), Some("root"));
	}
}
