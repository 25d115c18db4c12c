//! Addresses of single tiles.

use std::fmt;

/// A tile address in the projected tile grid.
///
/// `zoom` is the externally visible zoom number (offset already applied). `col` and `row`
/// count tiles from the projected origin and may be negative; `row` grows northwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
	pub zoom: u8,
	pub col: i64,
	pub row: i64,
}

impl TileCoord {
	pub fn new(zoom: u8, col: i64, row: i64) -> TileCoord {
		TileCoord { zoom, col, row }
	}

	/// Relative location of the tile inside a pyramid: `{zoom}/{col}/{row}.png`.
	pub fn as_path_components(&self) -> [String; 3] {
		[self.zoom.to_string(), self.col.to_string(), format!("{}.png", self.row)]
	}
}

impl fmt::Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.zoom, self.col, self.row)
	}
}

impl fmt::Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
	}
}
