//! Raster output formats. Each submodule encodes a [`DynamicImage`] into a [`Blob`].

pub mod jpeg;
pub mod png;
pub mod webp;

use anyhow::{Result, bail};
use image::DynamicImage;
use ocad_tiler_core::Blob;
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RasterFormat {
	Png,
	Jpeg,
	Webp,
}

impl RasterFormat {
	/// Matches a file extension (without dot, case-insensitive).
	pub fn from_extension(extension: &str) -> Option<RasterFormat> {
		match extension.to_ascii_lowercase().as_str() {
			"png" => Some(RasterFormat::Png),
			"jpg" | "jpeg" => Some(RasterFormat::Jpeg),
			"webp" => Some(RasterFormat::Webp),
			_ => None,
		}
	}

	pub fn extension(&self) -> &'static str {
		match self {
			RasterFormat::Png => "png",
			RasterFormat::Jpeg => "jpg",
			RasterFormat::Webp => "webp",
		}
	}

	pub fn mime(&self) -> &'static str {
		match self {
			RasterFormat::Png => "image/png",
			RasterFormat::Jpeg => "image/jpeg",
			RasterFormat::Webp => "image/webp",
		}
	}

	pub fn encode(&self, image: &DynamicImage) -> Result<Blob> {
		match self {
			RasterFormat::Png => png::encode(image),
			RasterFormat::Jpeg => jpeg::encode(image, None),
			RasterFormat::Webp => webp::encode(image),
		}
	}
}

impl FromStr for RasterFormat {
	type Err = anyhow::Error;

	fn from_str(text: &str) -> Result<RasterFormat> {
		match RasterFormat::from_extension(text.trim().trim_start_matches('.')) {
			Some(format) => Ok(format),
			None => bail!("unknown raster format '{text}', expected png, jpg or webp"),
		}
	}
}

impl fmt::Display for RasterFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.extension())
	}
}
