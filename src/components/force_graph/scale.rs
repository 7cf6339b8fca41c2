//! Zoom-dependent scaling for graph visuals.
//!
//! Centralizes how element sizes behave as the zoom level `k` changes:
//!
//! - **World-space** values scale with zoom (appear larger when zoomed in).
//! - **Screen-space** values stay a constant pixel size regardless of zoom.
//! - **Clamped** values scale with zoom but respect min/max screen bounds.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k, so bounds divide by k.
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Base node radius in world units.
	pub node_radius: f64,
	/// How the node radius scales with zoom.
	pub node_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// How hit radius scales with zoom.
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Minimum zoom level for label font scaling.
	pub label_min_k: f64,
	/// Edge line width in screen pixels.
	pub edge_line_width: f64,
	/// Arrowhead size in world units.
	pub arrow_size: f64,
	/// How arrow size scales with zoom.
	pub arrow_behavior: ScaleBehavior,
	/// Flow particle radius in screen pixels.
	pub particle_radius: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: 5.0,
			node_behavior: ScaleBehavior::Clamped {
				min_screen: 5.0,
				max_screen: f64::INFINITY,
			},
			hit_radius: 12.0,
			hit_behavior: ScaleBehavior::Clamped {
				min_screen: 5.0,
				max_screen: f64::INFINITY,
			},
			label_size: 10.0,
			label_min_k: 0.5,
			edge_line_width: 1.5,
			arrow_size: 5.0,
			arrow_behavior: ScaleBehavior::Clamped {
				min_screen: 0.0,
				max_screen: 18.0,
			},
			particle_radius: 1.5,
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Node radius in world-space.
	pub node_radius: f64,
	/// Hit detection radius in world-space.
	pub hit_radius: f64,
	/// Label font size string (e.g., "10px sans-serif").
	pub label_font: String,
	/// Edge line width in world-space.
	pub edge_line_width: f64,
	/// Arrow size in world-space.
	pub arrow_size: f64,
	/// Flow particle radius in world-space.
	pub particle_radius: f64,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.label_size / k.max(config.label_min_k);

		Self {
			k,
			node_radius: config.node_behavior.apply(config.node_radius, k),
			hit_radius: config.hit_behavior.apply(config.hit_radius, k),
			label_font: format!("{}px sans-serif", label_font_size),
			edge_line_width: config.edge_line_width / k,
			arrow_size: config.arrow_behavior.apply(config.arrow_size, k),
			particle_radius: config.particle_radius / k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_behavior_counteracts_zoom() {
		assert_eq!(ScaleBehavior::Screen.apply(10.0, 2.0), 5.0);
	}

	#[test]
	fn clamped_behavior_holds_minimum_screen_size() {
		let clamped = ScaleBehavior::Clamped {
			min_screen: 5.0,
			max_screen: f64::INFINITY,
		};
		// Zoomed way out, 5 world units would be 0.5px on screen; the
		// clamp holds it at 5px worth of world units.
		assert_eq!(clamped.apply(5.0, 0.1), 50.0);
		// At normal zoom the base value passes through.
		assert_eq!(clamped.apply(5.0, 1.0), 5.0);
	}
}
