//! crate-atlas: interactive dependency graph explorer for the crates.io
//! registry.
//!
//! A CSR WASM app: the store in [`store`] owns all selection state, the
//! gateway in [`api`] talks to the registry backend, [`url_sync`] mirrors
//! the selection into the query string, and the canvas renderer under
//! [`components::force_graph`] draws the graph with a physics-based layout.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod api;
pub mod components;
pub mod highlight;
pub mod store;
pub mod types;
pub mod url_sync;
pub mod viewport;

pub use components::force_graph::{ForceGraphCanvas, GraphAdapter};
pub use components::sidebar::Sidebar;
pub use store::AppStore;
pub use viewport::Viewport;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("crate-atlas: logging initialized");
}

/// The single error notification. A new error replaces the previous one;
/// dismissing clears the message, which hides the banner.
#[component]
fn ErrorBanner() -> impl IntoView {
	let store = expect_context::<AppStore>();

	move || {
		let message = store.error.get();
		(!message.is_empty()).then(|| {
			view! {
				<div class="error-banner" role="alert">
					<span>{message}</span>
					<button type="button" on:click=move |_| store.clear_error()>
						"Dismiss"
					</button>
				</div>
			}
		})
	}
}

/// Main application component.
///
/// Creates the store and viewport, seeds the selection from the query
/// string (falling back to a random crate), and lays out the sidebar next
/// to the graph canvas.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let store = AppStore::new();
	let viewport = Viewport::new();
	provide_context(store);
	provide_context(viewport);

	store.load_compiler_lists();
	store.bootstrap_from_url();
	viewport::mount_resize_listener(viewport);

	let graph = Signal::derive(move || store.dependency_graph.get().unwrap_or_default());
	let clicked = Signal::derive(move || store.clicked_crate_name.get());
	// Memoized so graph replacements re-enter the canvas effect instead of
	// remounting the whole component.
	let has_graph = Memo::new(move |_| store.dependency_graph.with(|g| g.is_some()));
	let loading = move || !has_graph.get() || !viewport.renderer_ready.get();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Crate Atlas" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<ErrorBanner />
		<div class="app-layout">
			<Sidebar />
			<main class="graph-area">
				{move || {
					has_graph.get().then(|| {
						let adapter = GraphAdapter::new(
							move |name: String| store.toggle_clicked(&name),
							move || store.clear_clicked(),
						);
						view! {
							<ForceGraphCanvas graph clicked viewport adapter />
						}
					})
				}}
				<Show when=loading>
					<p class="graph-loading">"Loading dependency graph"</p>
				</Show>
			</main>
		</div>
	}
}
