//! Symbols and symbol numbers.

use anyhow::Result;
use ocad_tiler_core::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::HashMap, fmt, str::FromStr};

/// A symbol number such as `101.2`, stored as `major · 1000 + minor`.
///
/// ```
/// use ocad_tiler_geometry::SymbolId;
///
/// assert_eq!("101.2".parse::<SymbolId>().unwrap().code(), 101002);
/// assert_eq!("529".parse::<SymbolId>().unwrap().code(), 529000);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
	pub fn from_code(code: u32) -> SymbolId {
		SymbolId(code)
	}

	pub fn code(&self) -> u32 {
		self.0
	}

	/// Parses a comma separated list such as `"101,102.1,529"`.
	pub fn parse_list(text: &str) -> Result<Vec<SymbolId>> {
		text
			.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(str::parse)
			.collect()
	}
}

impl FromStr for SymbolId {
	type Err = anyhow::Error;

	/// The fractional digits are scaled by 1/100 before multiplying by 1000, so `"101.2"` → `101002`.
	fn from_str(text: &str) -> Result<Self> {
		let number: f64 = text
			.trim()
			.parse()
			.map_err(|_| ConfigError::InvalidSymbolNumber(text.to_string()))?;
		if !number.is_finite() || number < 0.0 {
			return Err(ConfigError::InvalidSymbolNumber(text.to_string()).into());
		}
		let major = number.trunc();
		let code = ((major + (number - major) / 100.0) * 1000.0).round();
		if code > f64::from(u32::MAX) {
			return Err(ConfigError::InvalidSymbolNumber(text.to_string()).into());
		}
		Ok(SymbolId(code as u32))
	}
}

impl fmt::Display for SymbolId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (major, minor) = (self.0 / 1000, self.0 % 1000);
		if minor == 0 {
			write!(f, "{major}")
		} else {
			write!(f, "{major}.{minor}")
		}
	}
}

impl fmt::Debug for SymbolId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SymbolId({self})")
	}
}

impl Serialize for SymbolId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for SymbolId {
	/// Accepts the human notation as a string (`"101.2"`) or a plain number (`101`).
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Number(f64),
			Text(String),
		}
		let text = match Raw::deserialize(deserializer)? {
			Raw::Number(number) => number.to_string(),
			Raw::Text(text) => text,
		};
		text.parse().map_err(serde::de::Error::custom)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
	Point,
	Line,
	Area,
}

/// How objects of one symbol are drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Symbol {
	pub number: SymbolId,
	#[serde(default)]
	pub name: String,
	pub kind: SymbolKind,
	/// Number of the color in the color table.
	pub color: u32,
	/// Stroke width of lines and area outlines, native units.
	#[serde(default)]
	pub line_width: f64,
	/// Diameter of point symbols, native units.
	#[serde(default)]
	pub size: f64,
	/// Hidden symbols are left out unless explicitly requested.
	#[serde(default)]
	pub hidden: bool,
}

/// All symbols of a map, addressable by number.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
	symbols: Vec<Symbol>,
	by_id: HashMap<SymbolId, usize>,
}

impl SymbolTable {
	pub fn new(symbols: Vec<Symbol>) -> SymbolTable {
		let mut by_id = HashMap::with_capacity(symbols.len());
		for (index, symbol) in symbols.iter().enumerate() {
			if by_id.insert(symbol.number, index).is_some() {
				log::warn!("symbol {} is defined more than once, using the last definition", symbol.number);
			}
		}
		SymbolTable { symbols, by_id }
	}

	pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
		self.by_id.get(&id).map(|index| &self.symbols[*index])
	}

	pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
		self.symbols.iter()
	}

	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}
}
