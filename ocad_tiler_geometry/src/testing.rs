//! Fixtures shared by the tests of all crates.

use crate::MapFile;

/// A small orienteering map at 1:10000 covering roughly 1 km × 0.8 km.
pub const SAMPLE_MAP_JSON: &str = include_str!("../../testdata/sample_map.json");

pub fn sample_document() -> MapFile {
	MapFile::from_json(SAMPLE_MAP_JSON).expect("sample map must parse")
}
