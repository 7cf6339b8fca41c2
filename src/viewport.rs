//! Viewport & renderer lifecycle management.
//!
//! Owns the canvas dimensions and the portrait/landscape layout switch, and
//! recomputes them on window resize through a scoped listener that is
//! removed when the owning component is torn down. Also tracks whether the
//! deferred canvas renderer has finished constructing, so callers never draw
//! against a half-configured canvas.

use gloo_events::EventListener;
use leptos::prelude::*;

/// Fraction of the viewport height reserved as margin in landscape mode, so
/// the render never clips exactly edge to edge.
pub const DIMENSION_FACTOR: f64 = 0.1;

/// Pixel dimensions available to the graph canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dimensions {
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
}

/// Portrait layout: the window is taller than it is wide. The canvas then
/// claims the full viewport and the sidebar becomes a collapsible overlay.
pub fn is_portrait(window_width: f64, window_height: f64) -> bool {
	window_height > window_width
}

/// Computes the canvas dimensions for the current window and sidebar sizes.
/// Idempotent: identical inputs always yield identical output.
pub fn canvas_dimensions(
	window_width: f64,
	window_height: f64,
	sidebar_width: f64,
) -> Dimensions {
	if is_portrait(window_width, window_height) {
		Dimensions {
			width: window_width,
			height: window_height,
		}
	} else {
		Dimensions {
			width: window_width - sidebar_width - window_height * DIMENSION_FACTOR,
			height: window_height * (1.0 - DIMENSION_FACTOR),
		}
	}
}

/// Reactive viewport state, owned here rather than by ad-hoc window-bound
/// handlers.
#[derive(Clone, Copy)]
pub struct Viewport {
	/// Current canvas dimensions.
	pub dimensions: RwSignal<Dimensions>,
	/// Whether the portrait layout is active.
	pub portrait: RwSignal<bool>,
	/// Set once the canvas renderer is fully constructed.
	pub renderer_ready: RwSignal<bool>,
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new()
	}
}

impl Viewport {
	/// Creates a viewport with zeroed dimensions; call [`Viewport::update`]
	/// once the DOM is available.
	pub fn new() -> Self {
		Self {
			dimensions: RwSignal::new(Dimensions::default()),
			portrait: RwSignal::new(false),
			renderer_ready: RwSignal::new(false),
		}
	}

	/// Remeasures the window and sidebar and recomputes the canvas size.
	pub fn update(&self) {
		let Some((width, height)) = window_size() else {
			return;
		};
		let portrait = is_portrait(width, height);
		let sidebar = if portrait { 0.0 } else { sidebar_width() };

		self.portrait.set(portrait);
		self.dimensions
			.set(canvas_dimensions(width, height, sidebar));
	}
}

fn window_size() -> Option<(f64, f64)> {
	let window = web_sys::window()?;
	let width = window.inner_width().ok()?.as_f64()?;
	let height = window.inner_height().ok()?.as_f64()?;
	Some((width, height))
}

/// Width of the sidebar element, or 0 when it is not in the document.
fn sidebar_width() -> f64 {
	web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id("sidebar"))
		.map(|el| f64::from(el.client_width()))
		.unwrap_or(0.0)
}

/// Performs the initial measurement and attaches a window resize listener
/// scoped to the current reactive owner. The listener is dropped (and thus
/// detached) when the owner is cleaned up, so no global handler leaks
/// across mounts.
pub fn mount_resize_listener(viewport: Viewport) {
	viewport.update();

	let Some(window) = web_sys::window() else {
		return;
	};
	let listener = EventListener::new(&window, "resize", move |_| {
		viewport.update();
	});

	// Local storage: the listener is !Send and only ever touched on drop.
	let handle = StoredValue::new_local(Some(listener));
	on_cleanup(move || {
		handle.update_value(|listener| {
			drop(listener.take());
		});
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn landscape_reserves_margin_fraction() {
		let dims = canvas_dimensions(1000.0, 800.0, 300.0);
		assert_eq!(dims.height, 720.0);
		assert_eq!(dims.width, 1000.0 - 300.0 - 80.0);
	}

	#[test]
	fn portrait_claims_full_viewport() {
		assert!(is_portrait(800.0, 1000.0));
		let dims = canvas_dimensions(800.0, 1000.0, 300.0);
		assert_eq!(
			dims,
			Dimensions {
				width: 800.0,
				height: 1000.0
			}
		);
	}

	#[test]
	fn square_window_is_landscape() {
		assert!(!is_portrait(900.0, 900.0));
	}

	#[test]
	fn recompute_is_idempotent() {
		let first = canvas_dimensions(1440.0, 900.0, 432.0);
		let second = canvas_dimensions(1440.0, 900.0, 432.0);
		assert_eq!(first, second);
	}
}
