//! Tile grid math.
//!
//! The grid is anchored at the projected origin: tile `(col, row)` at a given resolution covers
//! `[col·s, row·s, (col+1)·s, (row+1)·s]` with `s = tile_size · resolution`.

use crate::{Extent, TileCoord};
use itertools::Itertools;
use std::fmt;

/// A half-open rectangle of tiles `[min_col, max_col) × [min_row, max_row)` at one resolution.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TileBounds {
	pub min_col: i64,
	pub min_row: i64,
	pub max_col: i64,
	pub max_row: i64,
}

impl TileBounds {
	pub fn new(min_col: i64, min_row: i64, max_col: i64, max_row: i64) -> TileBounds {
		TileBounds {
			min_col,
			min_row,
			max_col: max_col.max(min_col),
			max_row: max_row.max(min_row),
		}
	}

	/// The smallest tile rectangle fully covering `extent` (projected meters).
	///
	/// ```
	/// use ocad_tiler_core::{Extent, TileBounds};
	///
	/// let extent = Extent::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
	/// let bounds = TileBounds::from_extent(1.0, 256, &extent);
	/// assert_eq!(bounds.as_array(), [0, 0, 4, 4]);
	/// assert_eq!(bounds.count(), 16);
	/// ```
	pub fn from_extent(resolution: f64, tile_size: u32, extent: &Extent) -> TileBounds {
		let size = projected_tile_size(resolution, tile_size);
		TileBounds::new(
			(extent.x_min / size).floor() as i64,
			(extent.y_min / size).floor() as i64,
			(extent.x_max / size).ceil() as i64,
			(extent.y_max / size).ceil() as i64,
		)
	}

	pub fn as_array(&self) -> [i64; 4] {
		[self.min_col, self.min_row, self.max_col, self.max_row]
	}

	pub fn width(&self) -> u64 {
		(self.max_col - self.min_col) as u64
	}

	pub fn height(&self) -> u64 {
		(self.max_row - self.min_row) as u64
	}

	pub fn count(&self) -> u64 {
		self.width() * self.height()
	}

	pub fn is_empty(&self) -> bool {
		self.count() == 0
	}

	pub fn contains(&self, col: i64, row: i64) -> bool {
		col >= self.min_col && col < self.max_col && row >= self.min_row && row < self.max_row
	}

	/// The projected area covered by all tiles of this rectangle.
	pub fn to_extent(&self, resolution: f64, tile_size: u32) -> Extent {
		let size = projected_tile_size(resolution, tile_size);
		Extent::from_corners(
			[self.min_col as f64 * size, self.min_row as f64 * size],
			[self.max_col as f64 * size, self.max_row as f64 * size],
		)
	}

	/// Iterates over all tiles, row by row.
	pub fn iter_coords(self, zoom: u8) -> impl Iterator<Item = TileCoord> {
		(self.min_row..self.max_row)
			.cartesian_product(self.min_col..self.max_col)
			.map(move |(row, col)| TileCoord::new(zoom, col, row))
	}
}

impl fmt::Debug for TileBounds {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"TileBounds(cols {}..{}, rows {}..{})",
			self.min_col, self.max_col, self.min_row, self.max_row
		)
	}
}

/// Edge length of one tile in projected meters.
pub fn projected_tile_size(resolution: f64, tile_size: u32) -> f64 {
	f64::from(tile_size) * resolution
}

/// The projected extent of tile `(row, col)`.
pub fn tile_extent(resolution: f64, tile_size: u32, row: i64, col: i64) -> Extent {
	let size = projected_tile_size(resolution, tile_size);
	Extent::from_corners(
		[col as f64 * size, row as f64 * size],
		[(col + 1) as f64 * size, (row + 1) as f64 * size],
	)
}
