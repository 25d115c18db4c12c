//! The color table of a map document.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the color table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapColor {
	pub number: u32,
	#[serde(default)]
	pub name: String,
	pub rgb: [u8; 3],
	/// Print-process representation in percent, `[c, m, y, k]` with values in `0..=100`.
	#[serde(default)]
	pub cmyk: Option<[f64; 4]>,
}

impl MapColor {
	/// CMYK components scaled to `0.0..=1.0`.
	pub fn cmyk_unit(&self) -> Option<[f32; 4]> {
		self.cmyk.map(|cmyk| cmyk.map(|v| (v / 100.0).clamp(0.0, 1.0) as f32))
	}

	pub fn hex(&self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.rgb[0], self.rgb[1], self.rgb[2])
	}
}

/// Colors in drawing priority order: the first color is painted on top of all others.
#[derive(Clone, Debug, Default)]
pub struct ColorTable {
	colors: Vec<MapColor>,
	by_number: HashMap<u32, usize>,
}

impl ColorTable {
	pub fn new(colors: Vec<MapColor>) -> ColorTable {
		let by_number = colors
			.iter()
			.enumerate()
			.map(|(index, color)| (color.number, index))
			.collect();
		ColorTable { colors, by_number }
	}

	pub fn get(&self, number: u32) -> Option<&MapColor> {
		self.by_number.get(&number).map(|index| &self.colors[*index])
	}

	/// Position in the drawing order, `0` being the topmost color.
	pub fn priority(&self, number: u32) -> Option<usize> {
		self.by_number.get(&number).copied()
	}

	/// The first color with exactly this RGB value.
	pub fn find_by_rgb(&self, rgb: [u8; 3]) -> Option<&MapColor> {
		self.colors.iter().find(|color| color.rgb == rgb)
	}

	pub fn iter(&self) -> impl Iterator<Item = &MapColor> {
		self.colors.iter()
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}
}
