//! Interactive force-directed rendering of a crate dependency graph.
//!
//! The simulation itself comes from the `force_graph` crate; this module
//! owns everything around it: per-node crate metadata and selection colors
//! ([`state`]), pan/zoom/drag/click pointer handling and the animation loop
//! ([`component`]), canvas painting ([`render`] and [`flow`]), visual
//! configuration ([`theme`] and [`scale`]), and the narrow callback surface
//! the rest of the app talks to ([`adapter`]).

pub mod adapter;
pub mod component;
pub mod flow;
pub mod render;
pub mod scale;
pub mod state;
pub mod theme;

pub use adapter::GraphAdapter;
pub use component::ForceGraphCanvas;
pub use theme::Theme;
