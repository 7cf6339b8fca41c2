//! Colors and visual theming for the dependency graph canvas.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Builds a [`Color`] from hue (degrees), saturation, and lightness (both
/// 0.0 to 1.0). The selection colors are specified in `hsl()` notation.
pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Color {
	let hue = hue.rem_euclid(360.0);
	let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
	let x = c * (1.0 - ((hue / 60.0).rem_euclid(2.0) - 1.0).abs());
	let m = lightness - c / 2.0;

	let (r, g, b) = match hue {
		h if h < 60.0 => (c, x, 0.0),
		h if h < 120.0 => (x, c, 0.0),
		h if h < 180.0 => (0.0, c, x),
		h if h < 240.0 => (0.0, x, c),
		h if h < 300.0 => (x, 0.0, c),
		_ => (c, 0.0, x),
	};

	Color::rgb(
		((r + m) * 255.0).round() as u8,
		((g + m) * 255.0).round() as u8,
		((b + m) * 255.0).round() as u8,
	)
}

/// Parses a CSS color string into a [`Color`].
/// Supports hex (`#RRGGBB`), `rgb()`/`rgba()`, and `hsl()` notation.
pub fn parse_color(color_str: &str) -> Color {
	if color_str.starts_with('#') && color_str.len() == 7 {
		let r = u8::from_str_radix(&color_str[1..3], 16).unwrap_or(128);
		let g = u8::from_str_radix(&color_str[3..5], 16).unwrap_or(128);
		let b = u8::from_str_radix(&color_str[5..7], 16).unwrap_or(128);
		Color::rgb(r, g, b)
	} else if color_str.starts_with("hsl") {
		let nums: Vec<f64> = color_str
			.trim_start_matches("hsl(")
			.trim_end_matches(')')
			.split(',')
			.map(|s| s.trim().trim_end_matches('%').parse().unwrap_or(0.0))
			.collect();
		match nums.as_slice() {
			[h, s, l] => hsl(*h, s / 100.0, l / 100.0),
			_ => Color::rgb(128, 128, 128),
		}
	} else if color_str.starts_with("rgb") {
		let nums: Vec<&str> = color_str
			.trim_start_matches("rgba(")
			.trim_start_matches("rgb(")
			.trim_end_matches(')')
			.split(',')
			.collect();
		let r = nums
			.first()
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let g = nums
			.get(1)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let b = nums
			.get(2)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let a = nums
			.get(3)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(1.0);
		Color::rgba(r, g, b, a)
	} else {
		Color::rgb(128, 128, 128)
	}
}

/// Color palette for the automatic per-crate coloring used while no node is
/// clicked.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Default palette, spread widely enough that adjacent crates read as
	/// distinct on a dark background.
	pub fn registry() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(163, 190, 140), // Moss
				Color::rgb(208, 135, 112), // Clay
				Color::rgb(180, 142, 173), // Orchid
				Color::rgb(235, 203, 139), // Gold
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(136, 192, 208), // Glacier
				Color::rgb(191, 97, 106),  // Brick
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}

	/// Deterministic per-name color, the stand-in for the renderer's
	/// "auto color by id" mode.
	pub fn color_for_name(&self, name: &str) -> Color {
		self.get(name_hash(name) as usize)
	}
}

/// FNV-1a. Stable across sessions so a shared link renders the same colors
/// everywhere.
fn name_hash(name: &str) -> u64 {
	let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
	for byte in name.bytes() {
		hash ^= u64::from(byte);
		hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
	}
	hash
}

/// Visual theme for the canvas.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Fill behind the graph.
	pub background: Color,
	/// Secondary background color for the radial gradient.
	pub background_secondary: Color,
	/// Whether to draw the background as a radial gradient.
	pub use_gradient: bool,
	/// Alpha applied to edge lines.
	pub edge_alpha: f64,
	/// Node label color.
	pub label_color: Color,
	/// Palette for automatic per-crate coloring.
	pub palette: NodePalette,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(0, 0, 0),
			background_secondary: Color::rgb(18, 22, 28),
			use_gradient: true,
			edge_alpha: 0.55,
			label_color: Color::rgba(255, 255, 255, 0.9),
			palette: NodePalette::registry(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_selection_hsl_colors() {
		assert_eq!(parse_color("hsl(0, 100%, 50%)"), Color::rgb(255, 0, 0));
		assert_eq!(parse_color("hsl(120, 100%, 50%)"), Color::rgb(0, 255, 0));
		assert_eq!(parse_color("hsl(0, 0%, 50%)"), Color::rgb(128, 128, 128));
	}

	#[test]
	fn parses_hex_and_rgb() {
		assert_eq!(parse_color("#ff8000"), Color::rgb(255, 128, 0));
		assert_eq!(parse_color("rgb(1, 2, 3)"), Color::rgb(1, 2, 3));
	}

	#[test]
	fn per_name_color_is_deterministic() {
		let palette = NodePalette::registry();
		assert_eq!(
			palette.color_for_name("serde"),
			palette.color_for_name("serde")
		);
	}
}
