//! Zoom numbering and the zoom → resolution mapping.

use crate::ConfigError;
use anyhow::{Result, ensure};

/// The zoom levels of a pyramid.
///
/// Zoom index `0` is the coarsest level and `count - 1` the most detailed one, with
/// `resolution(i) = base_resolution · 2^(count - 1 - i)`. The `offset` only shifts the zoom
/// numbers visible in paths and URLs.
///
/// ```
/// use ocad_tiler_core::ZoomLevels;
///
/// let levels = ZoomLevels::new(6, 0, 1.0).unwrap();
/// let resolutions: Vec<f64> = (0..6).map(|i| levels.resolution(i)).collect();
/// assert_eq!(resolutions, [32.0, 16.0, 8.0, 4.0, 2.0, 1.0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLevels {
	count: u8,
	offset: u8,
	base_resolution: f64,
}

impl ZoomLevels {
	pub fn new(count: u8, offset: u8, base_resolution: f64) -> Result<ZoomLevels> {
		ensure!(count > 0, ConfigError::NoZoomLevels);
		ensure!(
			base_resolution.is_finite() && base_resolution > 0.0,
			ConfigError::InvalidResolution(base_resolution)
		);
		ensure!(
			u16::from(count) + u16::from(offset) <= 256,
			"zoom offset {offset} plus {count} levels exceeds the zoom range 0..=255"
		);
		Ok(ZoomLevels {
			count,
			offset,
			base_resolution,
		})
	}

	pub fn count(&self) -> u8 {
		self.count
	}

	pub fn offset(&self) -> u8 {
		self.offset
	}

	pub fn base_resolution(&self) -> f64 {
		self.base_resolution
	}

	/// Resolution (projected meters per pixel) of zoom index `index`.
	pub fn resolution(&self, index: u8) -> f64 {
		let steps = i32::from(self.count) - 1 - i32::from(index);
		self.base_resolution * 2f64.powi(steps)
	}

	/// External zoom number of the coarsest level.
	pub fn min_zoom(&self) -> u8 {
		self.offset
	}

	/// External zoom number of the most detailed level.
	pub fn max_zoom(&self) -> u8 {
		self.offset + (self.count - 1)
	}

	pub fn zoom_of_index(&self, index: u8) -> u8 {
		self.offset + index
	}

	/// Maps an external zoom number back to its index, or `None` outside `min_zoom..=max_zoom`.
	pub fn index_of_zoom(&self, zoom: u8) -> Option<u8> {
		if zoom < self.min_zoom() || zoom > self.max_zoom() {
			None
		} else {
			Some(zoom - self.offset)
		}
	}

	/// Zoom indices from the most detailed level to the coarsest.
	pub fn iter_detailed_first(&self) -> impl Iterator<Item = u8> + use<> {
		(0..self.count).rev()
	}
}
