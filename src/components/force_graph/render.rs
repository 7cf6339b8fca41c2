//! Canvas rendering for the dependency graph.
//!
//! Drawing happens in passes for correct z-ordering: background, edge lines
//! with arrowheads, directional flow particles, then nodes and labels on
//! top. All colors were already derived by the interaction layer and stored
//! on the simulation state; this module only paints them.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::flow;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::{GraphState, NodeInfo};
use super::theme::{parse_color, Theme};

/// Renders the complete graph to the canvas.
pub fn render(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();
}

fn draw_background(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.use_gradient {
		let gradient = ctx
			.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				(state.width.max(state.height)) * 0.8,
			)
			.unwrap();

		gradient
			.add_color_stop(0.0, &theme.background_secondary.to_css())
			.unwrap();
		gradient
			.add_color_stop(1.0, &theme.background.to_css())
			.unwrap();

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.to_css());
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let geometry = state.node_geometry();

	for edge in &state.edges {
		let (Some(&(x1, y1, from_size)), Some(&(x2, y2, to_size))) = (
			geometry.get(&edge.from_idx),
			geometry.get(&edge.to_idx),
		) else {
			continue;
		};

		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		let from_radius = scale.node_radius * from_size;
		let to_radius = scale.node_radius * to_size;
		let (start_x, start_y) = (x1 + ux * from_radius, y1 + uy * from_radius);
		let (end_x, end_y) = (
			x2 - ux * (to_radius + scale.arrow_size),
			y2 - uy * (to_radius + scale.arrow_size),
		);

		ctx.set_global_alpha(theme.edge_alpha);
		ctx.set_stroke_style_str(&edge.color);
		ctx.set_line_width(scale.edge_line_width);
		ctx.begin_path();
		ctx.move_to(start_x, start_y);
		ctx.line_to(end_x, end_y);
		ctx.stroke();

		// Arrowhead at the dependency end.
		let (tip_x, tip_y) = (x2 - ux * to_radius, y2 - uy * to_radius);
		let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
		let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);

		ctx.set_fill_style_str(&edge.color);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		draw_flow_particles(
			state, ctx, scale, edge.flow_offset, &edge.color,
			(start_x, start_y), (end_x, end_y),
		);

		ctx.set_global_alpha(1.0);
	}
}

/// Particles travelling from the depending crate toward its dependency.
fn draw_flow_particles(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	flow_offset: f64,
	color: &str,
	(start_x, start_y): (f64, f64),
	(end_x, end_y): (f64, f64),
) {
	ctx.set_fill_style_str(color);
	for phase in flow::particle_phases(state.flow_time, flow_offset) {
		let x = start_x + (end_x - start_x) * phase;
		let y = start_y + (end_y - start_y) * phase;
		ctx.begin_path();
		let _ = ctx.arc(x, y, scale.particle_radius, 0.0, PI * 2.0);
		ctx.fill();
	}
}

fn draw_nodes(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let selection = state.selection().map(str::to_string);
	let hovered = state.hovered;

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let radius = scale.node_radius * info.size;

		draw_node_circle(ctx, info, x, y, radius);

		let labeled = info.distance == 0
			|| hovered == Some(node.index())
			|| selection.as_deref() == Some(info.name.as_str());
		if labeled {
			ctx.set_fill_style_str(&theme.label_color.to_css());
			ctx.set_font(&scale.label_font);
			let _ = ctx.fill_text(&info.name, x + radius + 4.0, y + 3.0);
		}
	});
}

fn draw_node_circle(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	x: f64,
	y: f64,
	radius: f64,
) {
	let base_color = parse_color(&info.color);
	let highlight = base_color.lighten(0.4);
	let shadow = base_color.darken(0.2);

	let gradient = ctx
		.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
		.unwrap();
	gradient.add_color_stop(0.0, &highlight.to_css()).unwrap();
	gradient.add_color_stop(0.7, &base_color.to_css()).unwrap();
	gradient.add_color_stop(1.0, &shadow.to_css()).unwrap();

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}
