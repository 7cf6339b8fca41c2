//! Sidebar: search, selection controls, and the crate detail panel.
//!
//! The sidebar is a pure reader of the store; every user action routes back
//! through a store method. Its root element carries `id="sidebar"` so the
//! viewport can measure its width when computing canvas dimensions. In
//! portrait layout the sidebar collapses behind a toggle instead of
//! reserving horizontal space.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{KeyboardEvent, MouseEvent};

use crate::api;
use crate::components::crate_panel::CratePanelBody;
use crate::highlight;
use crate::store::AppStore;
use crate::types::{Crate, DependencyGraph};
use crate::viewport::Viewport;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Formats elapsed seconds as a coarse human-readable age.
fn format_elapsed(seconds: u64) -> String {
	let (count, unit) = if seconds < MINUTE {
		(seconds, "second")
	} else if seconds < HOUR {
		(seconds / MINUTE, "minute")
	} else if seconds < DAY {
		(seconds / HOUR, "hour")
	} else {
		(seconds / DAY, "day")
	};
	let plural = if count == 1 { "" } else { "s" };
	format!("{count} {unit}{plural} ago")
}

/// The crate the detail panel inspects: the clicked graph node if one is
/// set, else the root of the current graph.
fn inspected_crate(store: &AppStore) -> Option<Crate> {
	let graph = store.dependency_graph.get()?;
	let root = graph.root_name()?.to_string();
	let clicked = store.clicked_crate_name.get();
	let name = highlight::inspected_crate_name(clicked.as_deref(), &root);
	graph
		.node(name)
		.map(|node| node.krate.clone())
		.or_else(|| store.current_crate.get().map(|info| info.krate))
}

/// Control and detail panel beside (or, in portrait, over) the graph.
#[component]
pub fn Sidebar() -> impl IntoView {
	let store = expect_context::<AppStore>();
	let viewport = expect_context::<Viewport>();
	let collapsed = RwSignal::new(false);
	let last_updated = RwSignal::new(None::<u64>);

	spawn_local(async move {
		match api::get_last_updated().await {
			Ok(value) => last_updated.set(Some(value.seconds)),
			Err(message) => store.report_error(message),
		}
	});

	let on_search_input = move |ev| store.run_search(event_target_value(&ev));
	let on_search_key = move |ev: KeyboardEvent| {
		if ev.key() == "Enter" {
			let term = store.search_term.get_untracked();
			store.select_search_result(&term);
		}
	};

	let suggestions = move || {
		let results = store.search_results.get();
		(!results.is_empty()).then(|| {
			view! {
				<ul class="search-suggestions">
					{results
						.into_iter()
						.map(|krate| {
							let name = krate.name.clone();
							view! {
								<li>
									<button
										type="button"
										on:click=move |_| store.select_search_result(&name)
									>
										{krate.name.clone()}
									</button>
								</li>
							}
						})
						.collect_view()}
				</ul>
			}
		})
	};

	let heading = move || {
		inspected_crate(&store).map(|krate| format!("{} v{}", krate.name, krate.version))
	};

	let detail = move || inspected_crate(&store).map(|krate| view! { <CratePanelBody krate/> });

	let hidden = move || viewport.portrait.get() && collapsed.get();

	view! {
		<aside id="sidebar" class="sidebar" class:sidebar-collapsed=hidden>
			<Show when=move || viewport.portrait.get()>
				<button
					type="button"
					class="sidebar-toggle"
					on:click=move |_| collapsed.update(|c| *c = !*c)
				>
					{move || if collapsed.get() { "Show panel" } else { "Hide panel" }}
				</button>
			</Show>
			<div class="sidebar-body" class:hidden=hidden>
				<div class="sidebar-search">
					<input
						type="search"
						placeholder="Search crates"
						prop:value=move || store.search_term.get()
						on:input=on_search_input
						on:keydown=on_search_key
					/>
					{suggestions}
					<button
						type="button"
						class="sidebar-random"
						on:click=move |_| store.load_random_crate()
					>
						"Random crate"
					</button>
				</div>

				<h2 class="sidebar-heading">{heading}</h2>
				{detail}

				<FeaturesSection/>
				<CompilerSection/>
				<DependenciesSection/>
				<IncludedCratesSection/>
				<EdgeListSection/>

				<footer class="sidebar-footer">
					{move || {
						last_updated
							.get()
							.map(|seconds| format!("Data updated {}", format_elapsed(seconds)))
					}}
				</footer>
			</div>
		</aside>
	}
}

/// Feature checkboxes for the root crate, with a toggle-all row. The
/// `default` feature is never listed; it is implied by the backend.
#[component]
fn FeaturesSection() -> impl IntoView {
	let store = expect_context::<AppStore>();

	move || {
		let info = store.current_crate.get()?;
		let all = info.krate.feature_names();
		if all.is_empty() {
			return None;
		}
		let selected = info.selected_features.clone();
		let all_selected = selected.len() == all.len();

		let rows = all
			.iter()
			.map(|feature| {
				let checked = selected.contains(feature);
				let toggle = {
					let feature = feature.clone();
					let selected = selected.clone();
					move |_| {
						let mut next = selected.clone();
						match next.iter().position(|f| f == &feature) {
							Some(pos) => {
								next.remove(pos);
							}
							None => next.push(feature.clone()),
						}
						store.set_selected_features(next);
					}
				};
				view! {
					<li>
						<label>
							<input type="checkbox" prop:checked=checked on:change=toggle/>
							{feature.clone()}
						</label>
					</li>
				}
			})
			.collect_view();

		Some(view! {
			<section class="sidebar-section sidebar-features">
				<h3>"Features"</h3>
				<label class="features-toggle-all">
					<input
						type="checkbox"
						prop:checked=all_selected
						on:change=move |_| store.toggle_all_features()
					/>
					{format!("{}/{}", selected.len(), all.len())}
				</label>
				<ul>{rows}</ul>
			</section>
		})
	}
}

/// Target and cfg-name pickers, backed by datalists of the valid values
/// fetched from the backend. Unknown entries are ignored by the store.
#[component]
fn CompilerSection() -> impl IntoView {
	let store = expect_context::<AppStore>();

	view! {
		<section class="sidebar-section sidebar-compiler">
			<h3>"Platform"</h3>
			<input
				list="valid-targets"
				placeholder="target triple"
				prop:value=move || store.selected_target.get().unwrap_or_default()
				on:change=move |ev| store.set_selected_target(&event_target_value(&ev))
			/>
			<datalist id="valid-targets">
				{move || {
					store
						.valid_targets
						.get()
						.into_iter()
						.map(|target| view! { <option value=target/> })
						.collect_view()
				}}
			</datalist>
			<input
				list="valid-cfg-names"
				placeholder="cfg name"
				prop:value=move || store.selected_cfg_name.get().unwrap_or_default()
				on:change=move |ev| store.set_selected_cfg_name(&event_target_value(&ev))
			/>
			<datalist id="valid-cfg-names">
				{move || {
					store
						.valid_cfg_names
						.get()
						.into_iter()
						.map(|name| view! { <option value=name/> })
						.collect_view()
				}}
			</datalist>
		</section>
	}
}

/// Direct dependencies of the inspected crate; each row toggles the clicked
/// selection like a graph node click.
#[component]
fn DependenciesSection() -> impl IntoView {
	let store = expect_context::<AppStore>();

	move || {
		let graph = store.dependency_graph.get()?;
		let root = graph.root_name()?.to_string();
		let clicked = store.clicked_crate_name.get();
		let inspected = highlight::inspected_crate_name(clicked.as_deref(), &root).to_string();
		let dependencies = highlight::direct_dependencies(&graph, &inspected);
		if dependencies.is_empty() {
			return None;
		}

		let rows = dependencies
			.into_iter()
			.map(|name| {
				let target = name.clone();
				view! {
					<li>
						<button type="button" on:click=move |_| store.toggle_clicked(&target)>
							{name}
						</button>
					</li>
				}
			})
			.collect_view();

		Some(view! {
			<section class="sidebar-section sidebar-dependencies">
				<h3>{format!("{inspected} depends on")}</h3>
				<ul>{rows}</ul>
			</section>
		})
	}
}

/// Every crate in the current graph, ordered by distance from the root.
/// Clicking a row toggles the clicked selection.
#[component]
fn IncludedCratesSection() -> impl IntoView {
	let store = expect_context::<AppStore>();

	move || {
		let graph = store.dependency_graph.get()?;
		let mut nodes: Vec<(String, u32)> = graph
			.crates
			.iter()
			.map(|node| (node.krate.name.clone(), node.distance))
			.collect();
		nodes.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
		let total = nodes.len();

		let rows = nodes
			.into_iter()
			.map(|(name, distance)| {
				let row_name = name.clone();
				let click_name = name.clone();
				let registry_url = format!("https://crates.io/crates/{name}");
				view! {
					<li
						class:selected=move || {
							store.clicked_crate_name.get().as_deref()
								== Some(row_name.as_str())
						}
						on:click=move |_| store.toggle_clicked(&click_name)
					>
						<span class="crate-list-name">{name}</span>
						<span class="crate-list-distance">{distance}</span>
						<a
							class="crate-list-link"
							href=registry_url
							target="_blank"
							rel="noopener"
							on:click=move |ev: MouseEvent| ev.stop_propagation()
						>
							"crates.io"
						</a>
					</li>
				}
			})
			.collect_view();

		Some(view! {
			<section class="sidebar-section sidebar-included">
				<h3>{format!("Included crates ({total})")}</h3>
				<ul class="crate-list">{rows}</ul>
			</section>
		})
	}
}

/// Row labels for the full edge list, in graph order.
fn edge_labels(graph: &DependencyGraph) -> Vec<String> {
	graph
		.dependencies
		.iter()
		.map(|dep| format!("{} depends on {}", dep.from, dep.to))
		.collect()
}

/// Every edge in the current graph as a "from depends on to" row, with the
/// edge count in the heading.
#[component]
fn EdgeListSection() -> impl IntoView {
	let store = expect_context::<AppStore>();

	move || {
		let graph = store.dependency_graph.get()?;
		let labels = edge_labels(&graph);
		if labels.is_empty() {
			return None;
		}
		let total = labels.len();

		let rows = labels
			.into_iter()
			.map(|label| view! { <li>{label}</li> })
			.collect_view();

		Some(view! {
			<section class="sidebar-section sidebar-edge-list">
				<h3>{format!("All dependencies ({total})")}</h3>
				<ul>{rows}</ul>
			</section>
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::types::Dependency;

	#[test]
	fn edge_labels_cover_every_dependency() {
		let graph = DependencyGraph {
			crates: vec![],
			dependencies: vec![
				Dependency {
					from: "a".to_string(),
					to: "b".to_string(),
					target: None,
				},
				Dependency {
					from: "b".to_string(),
					to: "c".to_string(),
					target: None,
				},
			],
		};

		assert_eq!(
			edge_labels(&graph),
			vec!["a depends on b", "b depends on c"]
		);
		assert!(edge_labels(&DependencyGraph::default()).is_empty());
	}

	#[test]
	fn elapsed_uses_the_coarsest_fitting_unit() {
		assert_eq!(format_elapsed(0), "0 seconds ago");
		assert_eq!(format_elapsed(1), "1 second ago");
		assert_eq!(format_elapsed(59), "59 seconds ago");
		assert_eq!(format_elapsed(60), "1 minute ago");
		assert_eq!(format_elapsed(3 * HOUR + 59), "3 hours ago");
		assert_eq!(format_elapsed(2 * DAY), "2 days ago");
	}
}
