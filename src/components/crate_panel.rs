//! Detail panel body for a single crate.
//!
//! Pure presentation: everything shown here is read from the [`Crate`]
//! passed in, with no store access, so the panel works identically for the
//! root crate and for a clicked graph node.

use leptos::prelude::*;

use crate::types::Crate;

/// Formats a download count with thousands separators.
fn format_downloads(downloads: u64) -> String {
	let digits = downloads.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(c);
	}
	out
}

/// Registry metadata for one crate: description, version, downloads,
/// category and keyword tags, and a link out to the registry page.
#[component]
pub fn CratePanelBody(krate: Crate) -> impl IntoView {
	let registry_url = format!("https://crates.io/crates/{}", krate.name);

	let description = (!krate.description.is_empty())
		.then(|| view! { <p class="crate-panel-description">{krate.description.clone()}</p> });

	let categories = (!krate.categories.is_empty()).then(|| {
		view! {
			<ul class="crate-panel-tags">
				{krate
					.categories
					.iter()
					.map(|category| view! { <li>{category.clone()}</li> })
					.collect_view()}
			</ul>
		}
	});

	let keywords = (!krate.keywords.is_empty()).then(|| {
		view! {
			<ul class="crate-panel-tags crate-panel-keywords">
				{krate
					.keywords
					.iter()
					.map(|keyword| view! { <li>{format!("#{keyword}")}</li> })
					.collect_view()}
			</ul>
		}
	});

	view! {
		<div class="crate-panel">
			{description}
			<dl class="crate-panel-facts">
				<dt>"Version"</dt>
				<dd>{krate.version.clone()}</dd>
				<dt>"Downloads"</dt>
				<dd>{format_downloads(krate.downloads)}</dd>
			</dl>
			{categories}
			{keywords}
			<a class="crate-panel-link" href=registry_url target="_blank" rel="noopener">
				"View on crates.io"
			</a>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn downloads_get_thousands_separators() {
		assert_eq!(format_downloads(0), "0");
		assert_eq!(format_downloads(999), "999");
		assert_eq!(format_downloads(1000), "1,000");
		assert_eq!(format_downloads(123456789), "123,456,789");
	}
}
