use anyhow::Result;
use ocad_tiler_core::ZoomLevels;
use serde::Deserialize;

pub const DEFAULT_LEVELS: u8 = 4;
pub const DEFAULT_OFFSET: u8 = 0;
pub const DEFAULT_TILE_SIZE: u32 = 256;
pub const DEFAULT_BASE_RESOLUTION: f64 = 1.0;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TilesConfig {
	/// Number of zoom levels.
	pub levels: Option<u8>,

	/// Added to every zoom number in paths and URLs.
	pub offset: Option<u8>,

	/// Tile width and height in pixels.
	pub tile_size: Option<u32>,

	/// Resolution of the most detailed level, in meters per pixel.
	pub base_resolution: Option<f64>,

	/// Number of tiles rendered in parallel.
	pub jobs: Option<usize>,
}

impl TilesConfig {
	pub fn zoom_levels(&self) -> Result<ZoomLevels> {
		ZoomLevels::new(
			self.levels.unwrap_or(DEFAULT_LEVELS),
			self.offset.unwrap_or(DEFAULT_OFFSET),
			self.base_resolution.unwrap_or(DEFAULT_BASE_RESOLUTION),
		)
	}

	pub fn tile_size(&self) -> u32 {
		self.tile_size.unwrap_or(DEFAULT_TILE_SIZE)
	}

	pub fn override_optional_levels(&mut self, levels: Option<u8>) {
		if levels.is_some() {
			self.levels = levels;
		}
	}

	pub fn override_optional_offset(&mut self, offset: Option<u8>) {
		if offset.is_some() {
			self.offset = offset;
		}
	}

	pub fn override_optional_tile_size(&mut self, tile_size: Option<u32>) {
		if tile_size.is_some() {
			self.tile_size = tile_size;
		}
	}

	pub fn override_optional_base_resolution(&mut self, base_resolution: Option<f64>) {
		if base_resolution.is_some() {
			self.base_resolution = base_resolution;
		}
	}

	pub fn override_optional_jobs(&mut self, jobs: Option<usize>) {
		if jobs.is_some() {
			self.jobs = jobs;
		}
	}
}
