//! Bulk-loaded bounding-box index over the features of a map document.
//!
//! The index stores only one box per feature plus the position of the feature in the
//! document's feature list. It is built once and never mutated, so shared references can be
//! queried from any number of threads.

use crate::Extent;
use rstar::{AABB, RTree, RTreeObject};

/// Bounding box of one feature, in native units.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedBox {
	pub id: usize,
	pub extent: Extent,
}

impl RTreeObject for IndexedBox {
	type Envelope = AABB<[f64; 2]>;

	fn envelope(&self) -> Self::Envelope {
		AABB::from_corners(
			[self.extent.x_min, self.extent.y_min],
			[self.extent.x_max, self.extent.y_max],
		)
	}
}

pub struct SpatialIndex {
	tree: RTree<IndexedBox>,
	bounds: Option<Extent>,
}

impl SpatialIndex {
	/// Builds the index from the coordinate lists of all features.
	///
	/// The id of a feature is its position in `features`. Features without any coordinate
	/// have no bounding box and are left out; they never show up in query results.
	pub fn build<F, P>(features: F) -> SpatialIndex
	where
		F: IntoIterator<Item = P>,
		P: IntoIterator<Item = [f64; 2]>,
	{
		let boxes: Vec<IndexedBox> = features
			.into_iter()
			.enumerate()
			.filter_map(|(id, points)| Extent::from_points(points).map(|extent| IndexedBox { id, extent }))
			.collect();

		let bounds = boxes.iter().map(|b| b.extent).reduce(|a, b| a.extended(&b));

		log::debug!("built spatial index over {} features, bounds {:?}", boxes.len(), bounds);

		SpatialIndex {
			tree: RTree::bulk_load(boxes),
			bounds,
		}
	}

	/// Ids of all features whose bounding box intersects `extent` (native units).
	///
	/// Touching boxes count as intersecting. The result is unordered and may contain features
	/// whose actual geometry lies outside `extent`.
	pub fn query(&self, extent: &Extent) -> Vec<usize> {
		let envelope = AABB::from_corners([extent.x_min, extent.y_min], [extent.x_max, extent.y_max]);
		self
			.tree
			.locate_in_envelope_intersecting(&envelope)
			.map(|b| b.id)
			.collect()
	}

	/// Union of all feature boxes, `None` for an empty index.
	pub fn bounds(&self) -> Option<Extent> {
		self.bounds
	}

	pub fn len(&self) -> usize {
		self.tree.size()
	}

	pub fn is_empty(&self) -> bool {
		self.tree.size() == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn sample() -> SpatialIndex {
		SpatialIndex::build(vec![
			vec![[0.0, 0.0], [10.0, 10.0]],
			vec![[20.0, 20.0], [30.0, 25.0], [25.0, 40.0]],
			vec![[5.0, 35.0]],
			vec![],
			vec![[-50.0, -50.0], [-40.0, -45.0]],
		])
	}

	fn sorted(mut ids: Vec<usize>) -> Vec<usize> {
		ids.sort_unstable();
		ids
	}

	#[rstest]
	#[case([0.0, 0.0, 100.0, 100.0], vec![0, 1, 2])]
	#[case([10.0, 10.0, 20.0, 20.0], vec![0, 1])]
	#[case([4.0, 34.0, 6.0, 36.0], vec![2])]
	#[case([5.0, 35.0, 5.0, 35.0], vec![2])]
	#[case([11.0, 11.0, 19.0, 19.0], vec![])]
	#[case([-100.0, -100.0, 100.0, 100.0], vec![0, 1, 2, 4])]
	fn query(#[case] extent: [f64; 4], #[case] expected: Vec<usize>) {
		let extent = Extent::try_from(extent).unwrap();
		assert_eq!(sorted(sample().query(&extent)), expected);
	}

	#[test]
	fn bounds_cover_all_features() {
		let index = sample();
		assert_eq!(index.bounds().unwrap().as_array(), [-50.0, -50.0, 30.0, 40.0]);
		assert_eq!(index.len(), 4);
	}

	#[test]
	fn empty_index_answers_nothing() {
		let index = SpatialIndex::build(Vec::<Vec<[f64; 2]>>::new());
		assert!(index.is_empty());
		assert!(index.bounds().is_none());
		assert!(index.query(&Extent::new(-1e9, -1e9, 1e9, 1e9).unwrap()).is_empty());
	}

	#[test]
	fn never_misses_an_intersecting_box() {
		let features: Vec<Vec<[f64; 2]>> = (0..400)
			.map(|i| {
				let x = f64::from(i % 20) * 13.0;
				let y = f64::from(i / 20) * 7.0;
				vec![[x, y], [x + 9.0, y + 4.0]]
			})
			.collect();
		let index = SpatialIndex::build(features.clone());
		let query = Extent::new(40.0, 30.0, 120.0, 71.0).unwrap();
		let found = index.query(&query);
		for (id, points) in features.into_iter().enumerate() {
			let extent = Extent::from_points(points).unwrap();
			if extent.intersects(&query) {
				assert!(found.contains(&id), "feature {id} missing");
			}
		}
	}
}
