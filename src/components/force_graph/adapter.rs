//! Narrow typed interface between the app core and the canvas renderer.
//!
//! The renderer identifies nodes by crate name and edges by their
//! `from`/`to` names; colors are derived in the interaction layer and
//! applied via [`super::state::GraphState::apply_selection`]. The only
//! things crossing back out of the renderer are the two click callbacks
//! below, so the core never depends on canvas-level types.

use std::rc::Rc;

/// Callbacks the canvas invokes in response to pointer interaction.
#[derive(Clone)]
pub struct GraphAdapter {
	/// A node was clicked; the argument is the crate name.
	pub on_node_click: Rc<dyn Fn(String)>,
	/// The background (no node) was clicked.
	pub on_background_click: Rc<dyn Fn()>,
}

impl GraphAdapter {
	/// Bundles the two interaction callbacks.
	pub fn new(
		on_node_click: impl Fn(String) + 'static,
		on_background_click: impl Fn() + 'static,
	) -> Self {
		Self {
			on_node_click: Rc::new(on_node_click),
			on_background_click: Rc::new(on_background_click),
		}
	}
}
