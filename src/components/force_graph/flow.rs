//! Directional flow particles along dependency edges.
//!
//! Each edge carries a small number of particles travelling from the
//! depending crate toward its dependency, giving the graph a readable
//! direction at a glance. Particle positions are a pure function of the
//! animation clock and a per-edge phase offset, so there is no per-particle
//! state to update.

/// Particles rendered on each edge.
pub const PARTICLES_PER_EDGE: usize = 4;

/// Edge traversals per second.
const FLOW_SPEED: f64 = 0.25;

/// Positions of an edge's particles along its length, each in `[0, 1)`
/// where 0 is the `from` endpoint.
pub fn particle_phases(flow_time: f64, edge_offset: f64) -> [f64; PARTICLES_PER_EDGE] {
	let base = flow_time * FLOW_SPEED + edge_offset;
	let mut phases = [0.0; PARTICLES_PER_EDGE];
	for (i, phase) in phases.iter_mut().enumerate() {
		*phase = (base + i as f64 / PARTICLES_PER_EDGE as f64).fract().abs();
	}
	phases
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn phases_stay_in_unit_range() {
		for step in 0..100 {
			for phase in particle_phases(step as f64 * 0.37, 0.81) {
				assert!((0.0..1.0).contains(&phase));
			}
		}
	}

	#[test]
	fn particles_are_evenly_spaced() {
		let phases = particle_phases(0.0, 0.0);
		assert_eq!(phases[0], 0.0);
		assert_eq!(phases[1], 0.25);
		assert_eq!(phases[2], 0.5);
		assert_eq!(phases[3], 0.75);
	}

	#[test]
	fn offset_desynchronizes_edges() {
		assert_ne!(
			particle_phases(1.0, 0.0)[0],
			particle_phases(1.0, 0.33)[0]
		);
	}
}
