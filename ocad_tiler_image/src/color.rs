//! Color values for backgrounds and symbol paint.
//!
//! Colors are written as hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, the `#` being optional),
//! as one of a few CSS names, or as `transparent`.

use anyhow::{Result, bail};
use ocad_tiler_core::ConfigError;
use std::{fmt, str::FromStr};

/// An 8-bit RGBA color with straight (not premultiplied) alpha.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: u8,
}

const NAMED: [(&str, [u8; 3]); 10] = [
	("black", [0, 0, 0]),
	("white", [255, 255, 255]),
	("red", [255, 0, 0]),
	("green", [0, 128, 0]),
	("blue", [0, 0, 255]),
	("yellow", [255, 255, 0]),
	("orange", [255, 165, 0]),
	("purple", [128, 0, 128]),
	("gray", [128, 128, 128]),
	("grey", [128, 128, 128]),
];

impl Color {
	pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
		Color { r, g, b, a: 255 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
		Color { r, g, b, a }
	}

	pub fn as_rgb(&self) -> [u8; 3] {
		[self.r, self.g, self.b]
	}

	pub fn is_opaque(&self) -> bool {
		self.a == 255
	}

	pub fn is_transparent(&self) -> bool {
		self.a == 0
	}

	/// `#rrggbb`, without alpha.
	pub fn to_hex(&self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}

	pub fn opacity(&self) -> f64 {
		f64::from(self.a) / 255.0
	}

	/// Parses a color, reporting failures as [`ConfigError::InvalidColor`].
	pub fn parse(text: &str) -> Result<Color> {
		let trimmed = text.trim();
		let lower = trimmed.to_ascii_lowercase();
		if lower == "transparent" || lower == "none" {
			return Ok(Color::TRANSPARENT);
		}
		if let Some((_, [r, g, b])) = NAMED.iter().find(|(name, _)| *name == lower) {
			return Ok(Color::rgb(*r, *g, *b));
		}
		match parse_hex_color(trimmed) {
			Ok(bytes) => Ok(match bytes.as_slice() {
				[r, g, b] => Color::rgb(*r, *g, *b),
				[r, g, b, a] => Color::rgba(*r, *g, *b, *a),
				_ => unreachable!("hex colors have three or four components"),
			}),
			Err(err) => {
				log::debug!("{err}");
				Err(ConfigError::InvalidColor(text.to_string()).into())
			}
		}
	}
}

/// Parses a hex color string into RGB or RGBA bytes.
///
/// ```
/// use ocad_tiler_image::parse_hex_color;
///
/// assert_eq!(parse_hex_color("FF5733").unwrap(), vec![255, 87, 51]);
/// assert_eq!(parse_hex_color("#F00").unwrap(), vec![255, 0, 0]);
/// assert_eq!(parse_hex_color("FF573380").unwrap(), vec![255, 87, 51, 128]);
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Vec<u8>> {
	let hex = hex.trim_start_matches('#');
	if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
		bail!("invalid hex color '{hex}': only hex digits are allowed");
	}

	let expanded: String = match hex.len() {
		3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
		6 | 8 => hex.to_string(),
		_ => bail!("invalid hex color '{hex}': expected 3, 4, 6, or 8 hex characters"),
	};

	let bytes: Result<Vec<u8>, _> = (0..expanded.len())
		.step_by(2)
		.map(|i| u8::from_str_radix(&expanded[i..i + 2], 16))
		.collect();

	bytes.map_err(|e| anyhow::anyhow!("invalid hex color '{hex}': {e}"))
}

impl FromStr for Color {
	type Err = anyhow::Error;

	fn from_str(text: &str) -> Result<Color> {
		Color::parse(text)
	}
}

impl fmt::Debug for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Color({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_opaque() {
			write!(f, "{}", self.to_hex())
		} else {
			write!(f, "{}{:02x}", self.to_hex(), self.a)
		}
	}
}

impl From<[u8; 3]> for Color {
	fn from([r, g, b]: [u8; 3]) -> Self {
		Color::rgb(r, g, b)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("F00", vec![255, 0, 0])]
	#[case("0F08", vec![0, 255, 0, 136])]
	#[case("#FF5733", vec![255, 87, 51])]
	#[case("000000FF", vec![0, 0, 0, 255])]
	fn parses_hex(#[case] input: &str, #[case] expected: Vec<u8>) {
		assert_eq!(parse_hex_color(input).unwrap(), expected);
	}

	#[rstest]
	#[case("GG0000")]
	#[case("FF")]
	#[case("FF5733FF0")]
	#[case("FFFFF")]
	#[case("+1+1+1")]
	fn rejects_bad_hex(#[case] input: &str) {
		assert!(parse_hex_color(input).is_err());
	}

	#[rstest]
	#[case("transparent", Color::TRANSPARENT)]
	#[case("White", Color::WHITE)]
	#[case(" grey ", Color::rgb(128, 128, 128))]
	#[case("#102030", Color::rgb(16, 32, 48))]
	#[case("10203040", Color::rgba(16, 32, 48, 64))]
	fn parses_colors(#[case] input: &str, #[case] expected: Color) {
		assert_eq!(input.parse::<Color>().unwrap(), expected);
	}

	#[test]
	fn invalid_colors_are_config_errors() {
		let err = Color::parse("chartreuse-ish").unwrap_err();
		assert_eq!(
			err.downcast_ref::<ConfigError>(),
			Some(&ConfigError::InvalidColor("chartreuse-ish".into()))
		);
	}

	#[test]
	fn formats_as_hex() {
		assert_eq!(Color::rgb(255, 186, 53).to_string(), "#ffba35");
		assert_eq!(Color::rgba(0, 0, 0, 128).to_string(), "#00000080");
		assert_eq!(format!("{:?}", Color::WHITE), "Color(255, 255, 255, 255)");
	}
}
