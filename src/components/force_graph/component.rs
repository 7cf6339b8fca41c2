//! Leptos component wrapping the dependency graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel
//! event handlers for node dragging, panning, zooming, and click selection.
//! An animation loop runs via `requestAnimationFrame`, advancing the physics
//! simulation and repainting each frame. The simulation state is rebuilt
//! whenever the graph signal changes; the canvas element and animation loop
//! survive across rebuilds.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::adapter::GraphAdapter;
use super::render;
use super::scale::ScaleConfig;
use super::state::GraphState;
use super::theme::Theme;
use crate::types::DependencyGraph;
use crate::viewport::Viewport;

/// Pointer travel (pixels) below which a mousedown/mouseup pair counts as a
/// click instead of a drag.
const CLICK_SLOP: f64 = 4.0;

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: GraphState,
	scale: ScaleConfig,
	theme: Theme,
}

/// Renders an interactive force-directed dependency graph on a canvas.
///
/// The simulation is constructed lazily, on the first run with a graph and
/// a mounted canvas; `viewport.renderer_ready` flips to `true` at that
/// point so callers can gate on it. Canvas dimensions follow
/// `viewport.dimensions`; clicks are reported through `adapter`.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] graph: Signal<DependencyGraph>,
	#[prop(into)] clicked: Signal<Option<String>>,
	viewport: Viewport,
	adapter: GraphAdapter,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let loop_started = Rc::new(Cell::new(false));
	let (context_init, animate_init, loop_started_init) =
		(context.clone(), animate.clone(), loop_started.clone());

	// Build (and rebuild, on every graph replacement) the simulation.
	Effect::new(move |_| {
		let data = graph.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let dims = viewport.dimensions.get_untracked();
		canvas.set_width(dims.width as u32);
		canvas.set_height(dims.height as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let theme = Theme::default();
		let mut state = GraphState::new(&data, dims.width, dims.height, &theme);
		state.apply_selection(clicked.get_untracked().as_deref(), &theme);

		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale: ScaleConfig::default(),
			theme,
		});
		viewport.renderer_ready.set(true);

		// The animation loop is started once and repaints whatever
		// simulation currently lives in the shared context.
		if !loop_started_init.get() {
			loop_started_init.set(true);
			let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
			let last_frame = Cell::new(js_sys::Date::now());
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				let now = js_sys::Date::now();
				let dt = (((now - last_frame.get()) / 1000.0) as f32).min(0.1);
				last_frame.set(now);

				if let Some(ref mut c) = *context_anim.borrow_mut() {
					if c.state.animation_running {
						c.state.tick(dt);
					}
					render::render(&c.state, &ctx, &c.scale, &c.theme);
				}
				if let Some(ref cb) = *animate_inner.borrow() {
					let _ = web_sys::window()
						.unwrap()
						.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}));
			if let Some(ref cb) = *animate_init.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}
	});

	// Re-derive display colors when the clicked crate changes.
	let context_sel = context.clone();
	Effect::new(move |_| {
		let clicked = clicked.get();
		if let Some(ref mut c) = *context_sel.borrow_mut() {
			let GraphContext { state, theme, .. } = c;
			state.apply_selection(clicked.as_deref(), theme);
		}
	});

	// Track viewport dimension changes.
	let context_dims = context.clone();
	Effect::new(move |_| {
		let dims = viewport.dimensions.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(dims.width as u32);
		canvas.set_height(dims.height as u32);
		if let Some(ref mut c) = *context_dims.borrow_mut() {
			c.state.resize(dims.width, dims.height);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.state.node_at_position(x, y, &c.scale) {
				c.state.drag.active = true;
				c.state.drag.node_idx = Some(idx);
				c.state.drag.start_x = x;
				c.state.drag.start_y = y;
				c.state.drag.moved = false;
				c.state.graph.visit_nodes(|node| {
					if node.index() == idx {
						c.state.drag.node_start_x = node.x();
						c.state.drag.node_start_y = node.y();
					}
				});
			} else {
				c.state.pan.active = true;
				c.state.pan.start_x = x;
				c.state.pan.start_y = y;
				c.state.pan.moved = false;
				c.state.pan.transform_start_x = c.state.transform.x;
				c.state.pan.transform_start_y = c.state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			// Update hover state when not dragging
			if !c.state.drag.active {
				c.state.hovered = c.state.node_at_position(x, y, &c.scale);
			}

			if c.state.drag.active {
				if (x - c.state.drag.start_x).hypot(y - c.state.drag.start_y) > CLICK_SLOP {
					c.state.drag.moved = true;
				}
				if c.state.drag.moved {
					if let Some(idx) = c.state.drag.node_idx {
						let (dx, dy) = (
							(x - c.state.drag.start_x) / c.state.transform.k,
							(y - c.state.drag.start_y) / c.state.transform.k,
						);
						let (nx, ny) = (
							c.state.drag.node_start_x + dx as f32,
							c.state.drag.node_start_y + dy as f32,
						);
						c.state.graph.visit_nodes_mut(|node| {
							if node.index() == idx {
								node.data.x = nx;
								node.data.y = ny;
								node.data.is_anchor = true;
							}
						});
					}
				}
			} else if c.state.pan.active {
				if (x - c.state.pan.start_x).hypot(y - c.state.pan.start_y) > CLICK_SLOP {
					c.state.pan.moved = true;
				}
				if c.state.pan.moved {
					c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
					c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
				}
			}
		}
	};

	let context_mu = context.clone();
	let adapter_mu = adapter.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut clicked_node = None;
		let mut clicked_background = false;

		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.drag.active {
				if let Some(idx) = c.state.drag.node_idx {
					if c.state.drag.moved {
						c.state.graph.visit_nodes_mut(|node| {
							if node.index() == idx {
								node.data.is_anchor = true;
							}
						});
					} else {
						clicked_node = c.state.node_name(idx);
					}
				}
			} else if c.state.pan.active && !c.state.pan.moved {
				clicked_background = true;
			}
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
		}

		// Callbacks run after the borrow is released: they mutate signals
		// that feed straight back into the selection effect.
		if let Some(name) = clicked_node {
			(adapter_mu.on_node_click)(name);
		} else if clicked_background {
			(adapter_mu.on_background_click)();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
			c.state.hovered = None;
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (c.state.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / c.state.transform.k;
			c.state.transform.x = x - (x - c.state.transform.x) * ratio;
			c.state.transform.y = y - (y - c.state.transform.y) * ratio;
			c.state.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
