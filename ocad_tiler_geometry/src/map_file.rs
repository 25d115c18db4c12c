//! Map documents stored as JSON.
//!
//! ```json
//! {
//!   "crs": { "scale": 10000, "easting": 600000, "northing": 150000, "grivation": 0.0 },
//!   "colors": [{ "number": 0, "name": "Black", "rgb": [0, 0, 0], "cmyk": [0, 0, 0, 100] }],
//!   "symbols": [{ "number": "101", "kind": "line", "color": 0, "line_width": 14 }],
//!   "features": [{ "symbol": "101", "geometry": { "type": "LineString", "coordinates": [[0, 0], [500, 80]] } }]
//! }
//! ```
//!
//! Coordinates are native units (0.01 mm on paper).

use crate::{ColorTable, Feature, MapColor, MapDocument, Symbol, SymbolTable};
use anyhow::{Context, Result};
use ocad_tiler_core::ReferenceSystem;
use serde::Deserialize;
use std::{fs::File, io::BufReader, io::Read, path::Path};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMapFile {
	crs: RawReferenceSystem,
	#[serde(default)]
	colors: Vec<MapColor>,
	#[serde(default)]
	symbols: Vec<Symbol>,
	#[serde(default)]
	features: Vec<Feature>,
}

/// The scale may be written as a number (`15000`) or as a string (`"1:15000"`).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScale {
	Number(f64),
	Text(String),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReferenceSystem {
	scale: RawScale,
	#[serde(default)]
	easting: f64,
	#[serde(default)]
	northing: f64,
	#[serde(default)]
	grivation: f64,
}

impl RawReferenceSystem {
	fn into_crs(self) -> Result<ReferenceSystem> {
		let scale = match self.scale {
			RawScale::Number(scale) => scale,
			RawScale::Text(text) => ReferenceSystem::parse_scale(&text)?,
		};
		ReferenceSystem::new(scale, self.easting, self.northing, self.grivation)
	}
}

/// A map document loaded from a JSON file.
pub struct MapFile {
	crs: ReferenceSystem,
	colors: ColorTable,
	symbols: SymbolTable,
	features: Vec<Feature>,
}

impl MapFile {
	pub fn new(crs: ReferenceSystem, colors: Vec<MapColor>, symbols: Vec<Symbol>, features: Vec<Feature>) -> Result<MapFile> {
		let crs = crs.checked()?;
		let colors = ColorTable::new(colors);
		let symbols = SymbolTable::new(symbols);

		for symbol in symbols.iter() {
			if colors.get(symbol.color).is_none() {
				log::warn!("symbol {} uses unknown color {}", symbol.number, symbol.color);
			}
		}
		let unknown = features.iter().filter(|f| symbols.get(f.symbol).is_none()).count();
		if unknown > 0 {
			log::warn!("{unknown} features use undefined symbols and will not be drawn");
		}

		Ok(MapFile {
			crs,
			colors,
			symbols,
			features,
		})
	}

	pub fn from_path(path: &Path) -> Result<MapFile> {
		log::debug!("loading map document {path:?}");
		let file = File::open(path).with_context(|| format!("opening map file {path:?}"))?;
		MapFile::from_reader(BufReader::new(file)).with_context(|| format!("reading map file {path:?}"))
	}

	pub fn from_reader(reader: impl Read) -> Result<MapFile> {
		let raw: RawMapFile = serde_json::from_reader(reader).context("parsing map document JSON")?;
		let map = MapFile::new(raw.crs.into_crs()?, raw.colors, raw.symbols, raw.features)?;
		log::info!(
			"loaded map document: {} features, {} symbols, {} colors, scale 1:{}",
			map.features.len(),
			map.symbols.len(),
			map.colors.len(),
			map.crs.scale
		);
		Ok(map)
	}

	pub fn from_json(json: &str) -> Result<MapFile> {
		MapFile::from_reader(json.as_bytes())
	}
}

impl MapDocument for MapFile {
	fn features(&self) -> &[Feature] {
		&self.features
	}

	fn crs(&self) -> &ReferenceSystem {
		&self.crs
	}

	fn colors(&self) -> &ColorTable {
		&self.colors
	}

	fn symbols(&self) -> &SymbolTable {
		&self.symbols
	}
}
