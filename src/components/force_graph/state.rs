//! Simulation state for the dependency graph canvas.
//!
//! Wraps the `force_graph` physics collaborator with per-node crate
//! metadata, the pan/zoom view transform, and the display colors derived
//! from the clicked-crate selection. The fetched [`DependencyGraph`] itself
//! is never mutated; a new fetch builds a fresh `GraphState`.

use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::Theme;
use crate::highlight;
use crate::types::{Dependency, DependencyGraph};

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	/// Crate name, the node identity used for all lookups.
	pub name: String,
	/// Current display color (CSS string).
	pub color: String,
	/// Automatic per-name color used while nothing is clicked.
	pub auto_color: String,
	/// Size multiplier (1.0 = normal, >1.0 = larger/more important).
	pub size: f64,
	/// Hop count from the root crate.
	pub distance: u32,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	/// Whether the pointer moved beyond the click slop since mousedown.
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	/// Whether the pointer moved beyond the click slop since mousedown.
	pub moved: bool,
}

/// A rendered edge: simulation endpoints plus the dependency it came from.
#[derive(Clone, Debug)]
pub struct EdgeHandle {
	/// Simulation index of the `from` crate.
	pub from_idx: DefaultNodeIdx,
	/// Simulation index of the `to` crate.
	pub to_idx: DefaultNodeIdx,
	/// The dependency this edge renders.
	pub dependency: Dependency,
	/// Current display color (CSS string).
	pub color: String,
	/// Deterministic phase offset desynchronizing flow particles.
	pub flow_offset: f64,
}

/// Core canvas state combining the physics simulation with interaction
/// tracking and derived selection colors.
///
/// Created when the first graph arrives and rebuilt on every graph
/// replacement, then mutated each frame by the animation loop.
pub struct GraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeHandle>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hovered: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	/// Clicked crate name the current colors were derived from.
	selection: Option<String>,
	dependencies: Vec<Dependency>,
}

/// Size multiplier for a node at the given distance from the root. The
/// root dominates, direct dependencies sit slightly above the rest.
fn size_for_distance(distance: u32) -> f64 {
	match distance {
		0 => 1.7,
		1 => 1.1,
		d => (1.1 - 0.15 * f64::from(d - 1)).max(0.6),
	}
}

impl GraphState {
	pub fn new(data: &DependencyGraph, width: f64, height: f64, theme: &Theme) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut name_to_idx = HashMap::new();

		for (i, node) in data.crates.iter().enumerate() {
			let name = node.krate.name.clone();
			let auto_color = theme.palette.color_for_name(&name).to_css();
			let angle = (i as f64) * 2.0 * std::f64::consts::PI / data.crates.len() as f64;
			let (x, y) = (
				(width / 2.0 + 100.0 * angle.cos()) as f32,
				(height / 2.0 + 100.0 * angle.sin()) as f32,
			);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					name: name.clone(),
					color: auto_color.clone(),
					auto_color,
					size: size_for_distance(node.distance),
					distance: node.distance,
				},
			});
			name_to_idx.insert(name, idx);
		}

		let mut edges = Vec::new();
		for (i, dependency) in data.dependencies.iter().enumerate() {
			// An edge naming a crate outside the node set is a backend
			// inconsistency; skip it rather than fail the whole render.
			let (Some(&from_idx), Some(&to_idx)) = (
				name_to_idx.get(&dependency.from),
				name_to_idx.get(&dependency.to),
			) else {
				debug!(
					"graph: dropping edge {} -> {} with missing endpoint",
					dependency.from, dependency.to
				);
				continue;
			};

			graph.add_edge(from_idx, to_idx, EdgeData::default());
			edges.push(EdgeHandle {
				from_idx,
				to_idx,
				dependency: dependency.clone(),
				color: theme.palette.color_for_name(&dependency.from).to_css(),
				flow_offset: pseudo_random(i as f64),
			});
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hovered: None,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			selection: None,
			dependencies: data.dependencies.clone(),
		}
	}

	/// Re-derives every node and edge color from the clicked crate. With no
	/// click active, colors fall back to the automatic per-name palette.
	pub fn apply_selection(&mut self, clicked: Option<&str>, theme: &Theme) {
		self.selection = clicked.map(str::to_string);
		let dependencies = &self.dependencies;

		self.graph.visit_nodes_mut(|node| {
			let info = &mut node.data.user_data;
			info.color = match clicked {
				None => info.auto_color.clone(),
				Some(clicked) => {
					highlight::node_color(&info.name, clicked, dependencies).to_string()
				}
			};
		});

		for edge in &mut self.edges {
			edge.color = match clicked {
				None => theme
					.palette
					.color_for_name(&edge.dependency.from)
					.to_css(),
				Some(clicked) => highlight::edge_color(&edge.dependency, clicked).to_string(),
			};
		}
	}

	/// The clicked crate name the current colors reflect.
	pub fn selection(&self) -> Option<&str> {
		self.selection.as_deref()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let node_hit_radius = scale.hit_radius * node.data.user_data.size;
			if (dx * dx + dy * dy).sqrt() < node_hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// Crate name of a simulation node.
	pub fn node_name(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut name = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				name = Some(node.data.user_data.name.clone());
			}
		});
		name
	}

	/// World position and size multiplier of every node, gathered once per
	/// frame for edge drawing.
	pub fn node_geometry(&self) -> HashMap<DefaultNodeIdx, (f64, f64, f64)> {
		let mut geometry = HashMap::new();
		self.graph.visit_nodes(|node| {
			geometry.insert(
				node.index(),
				(node.x() as f64, node.y() as f64, node.data.user_data.size),
			);
		});
		geometry
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += f64::from(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Simple deterministic pseudo-random function, used to desynchronize the
/// per-edge flow particle phases.
pub fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::highlight::{DEPENDENT_COLOR, NEUTRAL_COLOR, SELECTED_COLOR};
	use crate::types::{Crate, CrateDistance};

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

	fn edge(from: &str, to: &str) -> Dependency {
		Dependency {
			from: from.to_string(),
			to: to.to_string(),
			target: None,
		}
	}

	fn sample_data() -> DependencyGraph {
		DependencyGraph {
			crates: vec![node("a", 0), node("b", 1)],
			dependencies: vec![edge("a", "b")],
		}
	}

	#[test]
	fn drops_edges_with_missing_endpoints() {
		let mut data = sample_data();
		data.dependencies.push(edge("a", "ghost"));

		let state = GraphState::new(&data, 800.0, 600.0, &Theme::default());
		assert_eq!(state.edges.len(), 1);
	}

	#[test]
	fn selection_recolors_nodes_and_clearing_restores_auto() {
		let theme = Theme::default();
		let mut state = GraphState::new(&sample_data(), 800.0, 600.0, &theme);

		state.apply_selection(Some("b"), &theme);
		let mut colors = HashMap::new();
		state.graph.visit_nodes(|node| {
			colors.insert(
				node.data.user_data.name.clone(),
				node.data.user_data.color.clone(),
			);
		});
		assert_eq!(colors["b"], SELECTED_COLOR);
		assert_eq!(colors["a"], DEPENDENT_COLOR);

		state.apply_selection(None, &theme);
		state.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			assert_eq!(info.color, info.auto_color);
		});
	}

	#[test]
	fn selection_recolors_edges_by_direction() {
		let theme = Theme::default();
		let mut state = GraphState::new(&sample_data(), 800.0, 600.0, &theme);

		state.apply_selection(Some("b"), &theme);
		assert_eq!(state.edges[0].color, DEPENDENT_COLOR);

		state.apply_selection(Some("zzz"), &theme);
		assert_eq!(state.edges[0].color, NEUTRAL_COLOR);
	}

	#[test]
	fn root_renders_largest() {
		assert!(size_for_distance(0) > size_for_distance(1));
		assert!(size_for_distance(1) > size_for_distance(4));
		assert!(size_for_distance(30) >= 0.6);
	}
}
