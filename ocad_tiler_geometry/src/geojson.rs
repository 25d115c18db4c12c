//! GeoJSON export of map objects.

use crate::{FeatureFilter, MapDocument};
use ocad_tiler_core::CoordTransform;
use serde_json::{Value, json};

/// Builds a GeoJSON `FeatureCollection` from the features with the given ids.
///
/// Coordinates are converted to projected meters. Features rejected by `filter` and ids outside the
/// document are skipped. Output follows the order of `ids`.
pub fn to_feature_collection(
	document: &dyn MapDocument,
	ids: &[usize],
	filter: &FeatureFilter,
	transform: &CoordTransform,
) -> Value {
	let features = document.features();
	let symbols = document.symbols();

	let items: Vec<Value> = ids
		.iter()
		.filter_map(|id| features.get(*id).map(|feature| (*id, feature)))
		.filter(|(_, feature)| filter.accepts(feature, symbols))
		.map(|(id, feature)| {
			let geometry = feature.geometry.map_coords(|p| transform.to_projected_coord(p));
			let symbol = symbols.get(feature.symbol);
			json!({
				"type": "Feature",
				"id": id,
				"geometry": geometry,
				"properties": {
					"sym": feature.symbol.code(),
					"symbol": feature.symbol.to_string(),
					"name": symbol.map(|s| s.name.as_str()),
					"color": symbol.and_then(|s| document.colors().get(s.color)).map(crate::MapColor::hex),
					"hidden": feature.hidden,
				},
			})
		})
		.collect();

	log::debug!("exporting {} of {} candidate features as GeoJSON", items.len(), ids.len());

	json!({
		"type": "FeatureCollection",
		"features": items,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::sample_document;
	use pretty_assertions::assert_eq;

	#[test]
	fn exports_projected_features() {
		let document = sample_document();
		let transform = CoordTransform::new(*document.crs(), false);
		let collection = to_feature_collection(&document, &[2], &FeatureFilter::default(), &transform);

		assert_eq!(collection["type"], "FeatureCollection");
		let feature = &collection["features"][0];
		assert_eq!(feature["type"], "Feature");
		assert_eq!(feature["properties"]["symbol"], "101");
		assert_eq!(feature["properties"]["sym"], 101000);
		assert_eq!(feature["geometry"]["type"], "LineString");

		let first = &feature["geometry"]["coordinates"][0];
		let expected = transform.to_projected_coord(match &document.features()[2].geometry {
			crate::Geometry::LineString(line) => line[0],
			_ => unreachable!(),
		});
		assert_eq!(first[0].as_f64().unwrap(), expected[0]);
		assert_eq!(first[1].as_f64().unwrap(), expected[1]);
	}

	#[test]
	fn applies_the_filter() {
		let document = sample_document();
		let transform = CoordTransform::new(*document.crs(), false);
		let all: Vec<usize> = (0..document.features().len()).collect();

		let visible = to_feature_collection(&document, &all, &FeatureFilter::default(), &transform);
		let everything = to_feature_collection(
			&document,
			&all,
			&FeatureFilter {
				include_hidden: true,
				symbols: vec![],
			},
			&transform,
		);
		let visible = visible["features"].as_array().unwrap().len();
		let everything = everything["features"].as_array().unwrap().len();
		assert_eq!(everything, document.features().len());
		assert!(visible < everything);
	}

	#[test]
	fn ignores_unknown_ids() {
		let document = sample_document();
		let transform = CoordTransform::new(*document.crs(), false);
		let collection = to_feature_collection(&document, &[10_000], &FeatureFilter::default(), &transform);
		assert_eq!(collection["features"].as_array().unwrap().len(), 0);
	}
}
