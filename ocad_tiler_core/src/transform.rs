//! Conversions between native drawing units and projected meters.
//!
//! Pixel space is not modelled here: an extent in projected meters becomes pixels by dividing by
//! a resolution (see [`Extent::pixel_size`]).

use crate::{Extent, ReferenceSystem};

/// Applies a [`ReferenceSystem`] to points and extents.
///
/// With `apply_grivation` switched off the transform is a per-axis scale and offset, and
/// [`CoordTransform::extent_to_native`] is the exact inverse of [`CoordTransform::extent_to_projected`].
/// With rotation the extent transforms return the bounding box of the four rotated corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordTransform {
	crs: ReferenceSystem,
	apply_grivation: bool,
}

impl CoordTransform {
	pub fn new(crs: ReferenceSystem, apply_grivation: bool) -> CoordTransform {
		CoordTransform { crs, apply_grivation }
	}

	pub fn crs(&self) -> &ReferenceSystem {
		&self.crs
	}

	pub fn rotation(&self) -> f64 {
		if self.apply_grivation { self.crs.grivation } else { 0.0 }
	}

	pub fn to_projected_coord(&self, point: [f64; 2]) -> [f64; 2] {
		let factor = self.crs.meters_per_native_unit();
		let [x, y] = rotate([point[0] * factor, point[1] * factor], self.rotation());
		[x + self.crs.easting, y + self.crs.northing]
	}

	pub fn to_native_coord(&self, point: [f64; 2]) -> [f64; 2] {
		let factor = self.crs.meters_per_native_unit();
		let [x, y] = rotate(
			[point[0] - self.crs.easting, point[1] - self.crs.northing],
			-self.rotation(),
		);
		[x / factor, y / factor]
	}

	pub fn extent_to_projected(&self, native: &Extent) -> Extent {
		transform_corners(native, |p| self.to_projected_coord(p))
	}

	pub fn extent_to_native(&self, projected: &Extent) -> Extent {
		transform_corners(projected, |p| self.to_native_coord(p))
	}

	/// Converts a length in projected meters to native units.
	pub fn length_to_native(&self, meters: f64) -> f64 {
		meters / self.crs.meters_per_native_unit()
	}

	/// The native → projected transform as an SVG/PDF style matrix `[a, b, c, d, e, f]`,
	/// mapping `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`.
	pub fn native_to_projected_affine(&self) -> [f64; 6] {
		let factor = self.crs.meters_per_native_unit();
		let (sin, cos) = self.rotation().sin_cos();
		[
			factor * cos,
			factor * sin,
			-factor * sin,
			factor * cos,
			self.crs.easting,
			self.crs.northing,
		]
	}
}

fn rotate(point: [f64; 2], angle: f64) -> [f64; 2] {
	if angle == 0.0 {
		return point;
	}
	let (sin, cos) = angle.sin_cos();
	[point[0] * cos - point[1] * sin, point[0] * sin + point[1] * cos]
}

fn transform_corners(extent: &Extent, f: impl Fn([f64; 2]) -> [f64; 2]) -> Extent {
	let corners = extent.corners().map(f);
	let mut result = Extent::from_corners(corners[0], corners[0]);
	for corner in &corners[1..] {
		result.include_point(*corner);
	}
	result
}
