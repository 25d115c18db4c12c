//! The cartographic reference system of a map document.

use crate::ConfigError;
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Length of one native drawing unit in paper meters (0.01 mm).
pub const NATIVE_UNIT_TO_METER: f64 = 0.00001;

/// Divisor applied to the map scale to get the coarsest resolution worth rendering a scene at.
///
/// A scene for a map at 1:15000 is never rendered coarser than 1 m/px; the rasterizer resizes
/// the result to the requested output resolution afterwards. The value is empirical.
pub const SCENE_RESOLUTION_SCALE_DIVISOR: f64 = 15000.0;

/// Scale, false origin and grid rotation of a map.
///
/// `projected = native * NATIVE_UNIT_TO_METER * scale + (easting, northing)`, optionally rotated
/// by `grivation` radians around the false origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceSystem {
	pub scale: f64,
	#[serde(default)]
	pub easting: f64,
	#[serde(default)]
	pub northing: f64,
	/// Radians, counter-clockwise.
	#[serde(default)]
	pub grivation: f64,
}

impl ReferenceSystem {
	pub fn new(scale: f64, easting: f64, northing: f64, grivation: f64) -> Result<ReferenceSystem> {
		ReferenceSystem {
			scale,
			easting,
			northing,
			grivation,
		}
		.checked()
	}

	/// Parses a scale string such as `"15000"` or `"1:15000"`.
	pub fn parse_scale(text: &str) -> Result<f64> {
		let trimmed = text.trim();
		let number = trimmed.strip_prefix("1:").unwrap_or(trimmed).replace(['_', ' '], "");
		let scale = number
			.parse::<f64>()
			.map_err(|_| ConfigError::InvalidScale(text.to_string()))?;
		ensure!(
			scale.is_finite() && scale > 0.0,
			ConfigError::InvalidScale(text.to_string())
		);
		Ok(scale)
	}

	/// Meters in the projected space covered by one native unit.
	#[must_use]
	pub fn meters_per_native_unit(&self) -> f64 {
		NATIVE_UNIT_TO_METER * self.scale
	}

	/// The resolution a scene should be rendered at, never coarser than `scale / 15000`.
	#[must_use]
	pub fn scene_resolution(&self, requested: f64) -> f64 {
		requested.min(self.scale / SCENE_RESOLUTION_SCALE_DIVISOR)
	}

	pub fn checked(self) -> Result<Self> {
		ensure!(
			self.scale.is_finite() && self.scale > 0.0,
			ConfigError::InvalidScale(self.scale.to_string())
		);
		ensure!(
			self.easting.is_finite() && self.northing.is_finite() && self.grivation.is_finite(),
			"reference system contains non-finite values: {self:?}"
		);
		Ok(self)
	}
}

impl Default for ReferenceSystem {
	fn default() -> Self {
		ReferenceSystem {
			scale: 15000.0,
			easting: 0.0,
			northing: 0.0,
			grivation: 0.0,
		}
	}
}
