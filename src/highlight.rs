//! Graph Interaction Layer: derived highlight state for the rendered graph.
//!
//! Everything here is a pure function of `(graph, clicked crate name)`. The
//! fetched graph is never mutated; colors, the click toggle, and the detail
//! panel's dependency list are recomputed on demand.

use crate::types::{Dependency, DependencyGraph};

/// Color of the clicked crate itself.
pub const SELECTED_COLOR: &str = "hsl(120, 100%, 50%)";
/// Color of crates that directly depend on the clicked crate.
pub const DEPENDENT_COLOR: &str = "hsl(0, 100%, 50%)";
/// Color of crates the clicked crate directly depends on.
pub const DEPENDENCY_COLOR: &str = "hsl(216, 100%, 50%)";
/// Color of everything else while a selection is active.
pub const NEUTRAL_COLOR: &str = "hsl(0, 0%, 50%)";

/// Role of a node relative to the clicked crate. Exactly one class applies
/// to each node; the classes are mutually exclusive by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
	/// The clicked crate.
	Selected,
	/// Directly depends on the clicked crate.
	Dependent,
	/// Directly depended on by the clicked crate.
	Dependency,
	/// Unrelated to the clicked crate.
	Neutral,
}

impl NodeClass {
	/// The display color for this class.
	pub fn color(self) -> &'static str {
		match self {
			NodeClass::Selected => SELECTED_COLOR,
			NodeClass::Dependent => DEPENDENT_COLOR,
			NodeClass::Dependency => DEPENDENCY_COLOR,
			NodeClass::Neutral => NEUTRAL_COLOR,
		}
	}
}

/// Classifies a node by name against the clicked crate.
///
/// Checked in priority order: the selected node wins even in the degenerate
/// case of a self-edge, then dependents, then dependencies.
pub fn classify_node(
	name: &str,
	clicked: &str,
	dependencies: &[Dependency],
) -> NodeClass {
	if name == clicked {
		NodeClass::Selected
	} else if dependencies
		.iter()
		.any(|dep| dep.from == name && dep.to == clicked)
	{
		NodeClass::Dependent
	} else if dependencies
		.iter()
		.any(|dep| dep.from == clicked && dep.to == name)
	{
		NodeClass::Dependency
	} else {
		NodeClass::Neutral
	}
}

/// Color of a node while a crate is clicked. With no click active, callers
/// fall back to the automatic per-name palette instead.
pub fn node_color(name: &str, clicked: &str, dependencies: &[Dependency]) -> &'static str {
	classify_node(name, clicked, dependencies).color()
}

/// Color of an edge while a crate is clicked: edges into the clicked crate
/// take the dependent color, edges out of it the dependency color.
pub fn edge_color(dependency: &Dependency, clicked: &str) -> &'static str {
	if dependency.to == clicked {
		DEPENDENT_COLOR
	} else if dependency.from == clicked {
		DEPENDENCY_COLOR
	} else {
		NEUTRAL_COLOR
	}
}

/// Click toggle: clicking the already-selected crate clears the selection,
/// clicking a different crate replaces it.
pub fn toggle_clicked(current: Option<&str>, name: &str) -> Option<String> {
	if current == Some(name) {
		None
	} else {
		Some(name.to_string())
	}
}

/// Name of the crate the detail panel inspects: the clicked crate if one is
/// set, else the root crate.
pub fn inspected_crate_name<'a>(clicked: Option<&'a str>, root: &'a str) -> &'a str {
	clicked.unwrap_or(root)
}

/// Direct dependencies of the inspected crate, in edge order, deduplicated.
pub fn direct_dependencies(graph: &DependencyGraph, inspected: &str) -> Vec<String> {
	let mut names: Vec<String> = Vec::new();
	for dep in &graph.dependencies {
		if dep.from == inspected && !names.iter().any(|n| n == &dep.to) {
			names.push(dep.to.clone());
		}
	}
	names
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{Crate, CrateDistance};
	use std::collections::HashMap;

	fn edge(from: &str, to: &str) -> Dependency {
		Dependency {
			from: from.to_string(),
			to: to.to_string(),
			target: None,
		}
	}

	fn node(name: &str, distance: u32) -> CrateDistance {
		CrateDistance {
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
			distance,
			enabled_features: vec![],
		}
	}

	fn sample_graph() -> DependencyGraph {
		DependencyGraph {
			crates: vec![node("a", 0), node("b", 1), node("c", 1)],
			dependencies: vec![edge("a", "b"), edge("a", "c"), edge("b", "c")],
		}
	}

	#[test]
	fn node_classes_are_mutually_exclusive() {
		let graph = sample_graph();
		for clicked in ["a", "b", "c"] {
			for node in &graph.crates {
				let class =
					classify_node(&node.krate.name, clicked, &graph.dependencies);
				let matches = [
					class == NodeClass::Selected,
					class == NodeClass::Dependent,
					class == NodeClass::Dependency,
					class == NodeClass::Neutral,
				];
				assert_eq!(matches.iter().filter(|m| **m).count(), 1);
			}
		}
	}

	#[test]
	fn classify_relative_to_clicked() {
		let graph = sample_graph();
		// "b" is clicked: "a" depends on it, it depends on "c".
		assert_eq!(classify_node("b", "b", &graph.dependencies), NodeClass::Selected);
		assert_eq!(classify_node("a", "b", &graph.dependencies), NodeClass::Dependent);
		assert_eq!(classify_node("c", "b", &graph.dependencies), NodeClass::Dependency);
	}

	#[test]
	fn unrelated_nodes_are_neutral() {
		let deps = vec![edge("a", "b")];
		assert_eq!(classify_node("z", "a", &deps), NodeClass::Neutral);
	}

	#[test]
	fn edge_colors_follow_direction() {
		assert_eq!(edge_color(&edge("a", "b"), "b"), DEPENDENT_COLOR);
		assert_eq!(edge_color(&edge("a", "b"), "a"), DEPENDENCY_COLOR);
		assert_eq!(edge_color(&edge("a", "b"), "c"), NEUTRAL_COLOR);
	}

	#[test]
	fn toggle_is_idempotent_over_two_clicks() {
		let first = toggle_clicked(None, "serde");
		assert_eq!(first.as_deref(), Some("serde"));
		assert_eq!(toggle_clicked(first.as_deref(), "serde"), None);
	}

	#[test]
	fn toggle_replaces_different_crate() {
		assert_eq!(
			toggle_clicked(Some("serde"), "tokio").as_deref(),
			Some("tokio")
		);
	}

	#[test]
	fn inspected_prefers_clicked_over_root() {
		assert_eq!(inspected_crate_name(Some("b"), "a"), "b");
		assert_eq!(inspected_crate_name(None, "a"), "a");
	}

	#[test]
	fn direct_dependencies_per_inspected_node() {
		let graph = sample_graph();
		assert_eq!(direct_dependencies(&graph, "a"), vec!["b", "c"]);
		assert_eq!(direct_dependencies(&graph, "b"), vec!["c"]);
		assert!(direct_dependencies(&graph, "c").is_empty());
	}

	#[test]
	fn direct_dependencies_deduplicates() {
		let mut graph = sample_graph();
		graph.dependencies.push(edge("a", "b"));
		assert_eq!(direct_dependencies(&graph, "a"), vec!["b", "c"]);
	}
}
