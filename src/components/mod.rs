//! UI components: the sidebar with its crate detail panel, and the canvas
//! graph renderer.

pub mod crate_panel;
pub mod force_graph;
pub mod sidebar;
