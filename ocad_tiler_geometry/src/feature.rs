use crate::{Geometry, SymbolId, SymbolTable};
use serde::{Deserialize, Serialize};

/// A map object: a geometry drawn with one symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Feature {
	pub symbol: SymbolId,
	pub geometry: Geometry,
	/// Objects can be hidden individually, independent of their symbol.
	#[serde(default)]
	pub hidden: bool,
}

impl Feature {
	pub fn new(symbol: SymbolId, geometry: Geometry) -> Feature {
		Feature {
			symbol,
			geometry,
			hidden: false,
		}
	}
}

/// Visibility rules shared by every output kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureFilter {
	pub include_hidden: bool,
	/// Only these symbols are drawn when non-empty.
	pub symbols: Vec<SymbolId>,
}

impl FeatureFilter {
	pub fn accepts(&self, feature: &Feature, symbols: &SymbolTable) -> bool {
		if !self.symbols.is_empty() && !self.symbols.contains(&feature.symbol) {
			return false;
		}
		if self.include_hidden {
			return true;
		}
		!feature.hidden && !symbols.get(feature.symbol).is_some_and(|s| s.hidden)
	}
}
