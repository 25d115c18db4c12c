//! Axis-aligned rectangles in one of the three coordinate spaces.
//!
//! An [`Extent`] never records which space it lives in; the functions that produce
//! and consume extents state it in their names (`to_native`, `to_projected`, ...).

use crate::ConfigError;
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// An axis-aligned rectangle `[x_min, y_min, x_max, y_max]`.
///
/// Invariant: `x_min <= x_max` and `y_min <= y_max`. Zero-area extents are valid.
///
/// # Examples
///
/// ```
/// use ocad_tiler_core::Extent;
///
/// let mut a = Extent::new(0.0, 0.0, 10.0, 10.0).unwrap();
/// a.extend(&Extent::new(-5.0, 2.0, 3.0, 20.0).unwrap());
/// assert_eq!(a.as_array(), [-5.0, 0.0, 10.0, 20.0]);
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct Extent {
	pub x_min: f64,
	pub y_min: f64,
	pub x_max: f64,
	pub y_max: f64,
}

impl Extent {
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Extent> {
		Extent {
			x_min,
			y_min,
			x_max,
			y_max,
		}
		.checked()
	}

	/// Builds an extent from two arbitrary corners, sorting the coordinates.
	pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Extent {
		Extent {
			x_min: a[0].min(b[0]),
			y_min: a[1].min(b[1]),
			x_max: a[0].max(b[0]),
			y_max: a[1].max(b[1]),
		}
	}

	/// The bounding box of a list of points, or `None` if the list is empty.
	pub fn from_points<I>(points: I) -> Option<Extent>
	where
		I: IntoIterator<Item = [f64; 2]>,
	{
		let mut iter = points.into_iter();
		let first = iter.next()?;
		let mut extent = Extent::from_corners(first, first);
		for point in iter {
			extent.include_point(point);
		}
		Some(extent)
	}

	#[must_use]
	pub fn as_array(&self) -> [f64; 4] {
		[self.x_min, self.y_min, self.x_max, self.y_max]
	}

	#[must_use]
	pub fn width(&self) -> f64 {
		self.x_max - self.x_min
	}

	#[must_use]
	pub fn height(&self) -> f64 {
		self.y_max - self.y_min
	}

	#[must_use]
	pub fn center(&self) -> [f64; 2] {
		[(self.x_min + self.x_max) / 2.0, (self.y_min + self.y_max) / 2.0]
	}

	/// The four corners, counter-clockwise starting at `(x_min, y_min)`.
	#[must_use]
	pub fn corners(&self) -> [[f64; 2]; 4] {
		[
			[self.x_min, self.y_min],
			[self.x_max, self.y_min],
			[self.x_max, self.y_max],
			[self.x_min, self.y_max],
		]
	}

	pub fn include_point(&mut self, point: [f64; 2]) {
		self.x_min = self.x_min.min(point[0]);
		self.y_min = self.y_min.min(point[1]);
		self.x_max = self.x_max.max(point[0]);
		self.y_max = self.y_max.max(point[1]);
	}

	/// Expands the extent in place so that it also covers `other`.
	pub fn extend(&mut self, other: &Extent) {
		self.x_min = self.x_min.min(other.x_min);
		self.y_min = self.y_min.min(other.y_min);
		self.x_max = self.x_max.max(other.x_max);
		self.y_max = self.y_max.max(other.y_max);
	}

	#[must_use]
	pub fn extended(mut self, other: &Extent) -> Extent {
		self.extend(other);
		self
	}

	/// Grows the extent by `amount` on every side. Negative amounts are clamped so the
	/// extent never inverts.
	#[must_use]
	pub fn buffered(&self, amount: f64) -> Extent {
		let amount = amount.max(-(self.width().min(self.height()) / 2.0));
		Extent {
			x_min: self.x_min - amount,
			y_min: self.y_min - amount,
			x_max: self.x_max + amount,
			y_max: self.y_max + amount,
		}
	}

	/// Closed-interval overlap test; touching edges count as intersecting.
	#[must_use]
	pub fn intersects(&self, other: &Extent) -> bool {
		self.x_min <= other.x_max && other.x_min <= self.x_max && self.y_min <= other.y_max && other.y_min <= self.y_max
	}

	#[must_use]
	pub fn contains_extent(&self, other: &Extent) -> bool {
		self.x_min <= other.x_min && self.y_min <= other.y_min && self.x_max >= other.x_max && self.y_max >= other.y_max
	}

	/// Pixel dimensions of this extent at `resolution` units per pixel.
	///
	/// Each axis is `round(size / resolution)`.
	#[must_use]
	pub fn pixel_size(&self, resolution: f64) -> (u32, u32) {
		(
			(self.width() / resolution).round() as u32,
			(self.height() / resolution).round() as u32,
		)
	}

	/// Formats the extent as a JSON array, e.g. `[0,0,1000,1000]`.
	#[must_use]
	pub fn as_string_json(&self) -> String {
		format!("[{},{},{},{}]", self.x_min, self.y_min, self.x_max, self.y_max)
	}

	fn checked(self) -> Result<Self> {
		ensure!(
			self.as_array().iter().all(|v| v.is_finite()),
			"extent {:?} contains non-finite values",
			self.as_array()
		);
		ensure!(
			self.x_min <= self.x_max,
			"x_min ({}) must be <= x_max ({})",
			self.x_min,
			self.x_max
		);
		ensure!(
			self.y_min <= self.y_max,
			"y_min ({}) must be <= y_max ({})",
			self.y_min,
			self.y_max
		);
		Ok(self)
	}
}

impl fmt::Debug for Extent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Extent({}, {}, {}, {})", self.x_min, self.y_min, self.x_max, self.y_max)
	}
}

impl fmt::Display for Extent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.as_string_json())
	}
}

impl TryFrom<[f64; 4]> for Extent {
	type Error = anyhow::Error;

	fn try_from(input: [f64; 4]) -> Result<Self> {
		Extent::new(input[0], input[1], input[2], input[3])
	}
}

impl TryFrom<Vec<f64>> for Extent {
	type Error = anyhow::Error;

	fn try_from(input: Vec<f64>) -> Result<Self> {
		ensure!(
			input.len() == 4,
			"Extent must have 4 elements (x_min, y_min, x_max, y_max), got {}",
			input.len()
		);
		Extent::new(input[0], input[1], input[2], input[3])
	}
}

impl From<Extent> for [f64; 4] {
	fn from(extent: Extent) -> Self {
		extent.as_array()
	}
}

impl FromStr for Extent {
	type Err = anyhow::Error;

	/// Parses `"x_min,y_min,x_max,y_max"`. Spaces and semicolons are accepted as separators too.
	fn from_str(text: &str) -> Result<Self> {
		let invalid = || ConfigError::InvalidBounds(text.to_string());
		let values = text
			.split([' ', ',', ';'])
			.filter(|s| !s.is_empty())
			.map(|s| s.parse::<f64>().map_err(|_| invalid()))
			.collect::<Result<Vec<f64>, ConfigError>>()?;
		if values.len() != 4 {
			return Err(invalid().into());
		}
		Extent::try_from(values).map_err(|_| invalid().into())
	}
}
