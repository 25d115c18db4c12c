//! Per-level tile rectangles of a whole pyramid.

use crate::{ConfigError, Extent, TileBounds, TileCoord, ZoomLevels};
use anyhow::{Result, ensure};

/// The tile layout of a pyramid: every zoom level covers the same projected bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct TilePyramid {
	levels: ZoomLevels,
	tile_size: u32,
	bounds: Extent,
	/// Indexed by zoom index.
	level_bounds: Vec<TileBounds>,
}

impl TilePyramid {
	pub fn new(levels: ZoomLevels, tile_size: u32, bounds: Extent) -> Result<TilePyramid> {
		ensure!(tile_size > 0, ConfigError::InvalidTileSize);
		let level_bounds = (0..levels.count())
			.map(|index| TileBounds::from_extent(levels.resolution(index), tile_size, &bounds))
			.collect();
		Ok(TilePyramid {
			levels,
			tile_size,
			bounds,
			level_bounds,
		})
	}

	pub fn levels(&self) -> &ZoomLevels {
		&self.levels
	}

	pub fn tile_size(&self) -> u32 {
		self.tile_size
	}

	/// Projected bounds shared by all levels.
	pub fn bounds(&self) -> &Extent {
		&self.bounds
	}

	pub fn level_bounds(&self, index: u8) -> &TileBounds {
		&self.level_bounds[usize::from(index)]
	}

	/// Total number of tiles over all levels.
	pub fn count_tiles(&self) -> u64 {
		self.level_bounds.iter().map(TileBounds::count).sum()
	}

	/// Resolution of an external zoom number, if the zoom belongs to this pyramid.
	pub fn resolution_of_zoom(&self, zoom: u8) -> Option<f64> {
		self.levels.index_of_zoom(zoom).map(|index| self.levels.resolution(index))
	}

	/// Whether `coord` (external zoom number) addresses a tile inside this pyramid.
	pub fn contains(&self, coord: &TileCoord) -> bool {
		self
			.levels
			.index_of_zoom(coord.zoom)
			.is_some_and(|index| self.level_bounds(index).contains(coord.col, coord.row))
	}

	/// All tiles, most detailed level first and row by row inside a level.
	pub fn iter_coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
		self.levels.iter_detailed_first().flat_map(move |index| {
			let zoom = self.levels.zoom_of_index(index);
			self.level_bounds(index).iter_coords(zoom)
		})
	}
}
