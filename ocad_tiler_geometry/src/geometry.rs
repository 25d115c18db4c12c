use ocad_tiler_core::Extent;
use serde::{Deserialize, Serialize};

/// Geometry of a map object in native units.
///
/// Serialized like GeoJSON geometries: `{"type": "LineString", "coordinates": [[0, 0], [10, 5]]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
	Point([f64; 2]),
	LineString(Vec<[f64; 2]>),
	/// Outer ring followed by holes.
	Polygon(Vec<Vec<[f64; 2]>>),
}

impl Geometry {
	/// All coordinates, rings flattened.
	pub fn coords(&self) -> Box<dyn Iterator<Item = [f64; 2]> + '_> {
		match self {
			Geometry::Point(point) => Box::new(std::iter::once(*point)),
			Geometry::LineString(line) => Box::new(line.iter().copied()),
			Geometry::Polygon(rings) => Box::new(rings.iter().flatten().copied()),
		}
	}

	/// Bounding box, `None` for geometries without coordinates.
	pub fn extent(&self) -> Option<Extent> {
		Extent::from_points(self.coords())
	}

	pub fn is_empty(&self) -> bool {
		self.coords().next().is_none()
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			Geometry::Point(_) => "Point",
			Geometry::LineString(_) => "LineString",
			Geometry::Polygon(_) => "Polygon",
		}
	}

	/// Applies `f` to every coordinate.
	#[must_use]
	pub fn map_coords(&self, f: impl Fn([f64; 2]) -> [f64; 2]) -> Geometry {
		match self {
			Geometry::Point(point) => Geometry::Point(f(*point)),
			Geometry::LineString(line) => Geometry::LineString(line.iter().map(|p| f(*p)).collect()),
			Geometry::Polygon(rings) => {
				Geometry::Polygon(rings.iter().map(|ring| ring.iter().map(|p| f(*p)).collect()).collect())
			}
		}
	}
}
