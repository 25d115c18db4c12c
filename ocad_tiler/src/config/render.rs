use crate::tiler::DEFAULT_BUFFER_PX;
use anyhow::Result;
use ocad_tiler_core::Extent;
use ocad_tiler_geometry::SymbolId;
use ocad_tiler_image::Color;
use serde::Deserialize;

pub const DEFAULT_RESOLUTION: f64 = 1.0;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
	/// Output resolution in meters per pixel.
	pub resolution: Option<f64>,

	/// Extent to render, in projected coordinates. Defaults to the map bounds.
	pub bounds: Option<Extent>,

	/// Background color, transparent if unset.
	pub fill: Option<String>,

	/// Include hidden symbols and objects.
	pub show_hidden: Option<bool>,

	/// Only draw these symbols.
	pub filter_symbols: Option<Vec<SymbolId>>,

	/// Rotate the output by the map's grivation.
	pub grivation: Option<bool>,

	/// Margin around every rendered extent, in output pixels.
	pub buffer: Option<u32>,
}

impl RenderConfig {
	pub fn resolution(&self) -> f64 {
		self.resolution.unwrap_or(DEFAULT_RESOLUTION)
	}

	pub fn show_hidden(&self) -> bool {
		self.show_hidden.unwrap_or(false)
	}

	pub fn grivation(&self) -> bool {
		self.grivation.unwrap_or(false)
	}

	pub fn buffer(&self) -> u32 {
		self.buffer.unwrap_or(DEFAULT_BUFFER_PX)
	}

	pub fn background(&self) -> Result<Option<Color>> {
		self.fill.as_deref().map(Color::parse).transpose()
	}

	pub fn override_optional_resolution(&mut self, resolution: Option<f64>) {
		if resolution.is_some() {
			self.resolution = resolution;
		}
	}

	pub fn override_optional_bounds(&mut self, bounds: Option<Extent>) {
		if bounds.is_some() {
			self.bounds = bounds;
		}
	}

	pub fn override_optional_fill(&mut self, fill: Option<&str>) {
		if let Some(fill) = fill {
			self.fill = Some(fill.to_string());
		}
	}

	/// Flags can only switch on what the file leaves off.
	pub fn override_show_hidden(&mut self, show_hidden: bool) {
		if show_hidden {
			self.show_hidden = Some(true);
		}
	}

	pub fn override_grivation(&mut self, grivation: bool) {
		if grivation {
			self.grivation = Some(true);
		}
	}

	pub fn override_optional_filter_symbols(&mut self, symbols: Option<Vec<SymbolId>>) {
		if symbols.is_some() {
			self.filter_symbols = symbols;
		}
	}
}
