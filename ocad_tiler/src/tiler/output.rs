//! Output kinds, chosen once at the boundary from a file extension or a format name.

use anyhow::{Context, Result, bail};
use ocad_tiler_image::RasterFormat;
use std::{fmt, path::Path, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputKind {
	Raster(RasterFormat),
	Svg,
	Pdf,
	GeoJson,
}

impl OutputKind {
	/// `.svg`, `.pdf`, `.json`/`.geojson` or a raster extension. PNG when there is no extension.
	pub fn from_path(path: &Path) -> Result<OutputKind> {
		let Some(extension) = path.extension() else {
			return Ok(OutputKind::Raster(RasterFormat::Png));
		};
		let Some(name) = extension.to_str() else {
			bail!("unknown output format for {path:?}");
		};
		name.parse::<OutputKind>().with_context(|| {
			format!("choosing the output format of {path:?}, expected png, jpg, webp, svg, pdf, json or geojson")
		})
	}

	pub fn mime(&self) -> &'static str {
		match self {
			OutputKind::Raster(format) => format.mime(),
			OutputKind::Svg => "image/svg+xml",
			OutputKind::Pdf => "application/pdf",
			OutputKind::GeoJson => "application/geo+json",
		}
	}

	pub fn extension(&self) -> &'static str {
		match self {
			OutputKind::Raster(format) => format.extension(),
			OutputKind::Svg => "svg",
			OutputKind::Pdf => "pdf",
			OutputKind::GeoJson => "geojson",
		}
	}
}

impl FromStr for OutputKind {
	type Err = anyhow::Error;

	fn from_str(text: &str) -> Result<OutputKind> {
		let name = text.trim().trim_start_matches('.').to_ascii_lowercase();
		Ok(match name.as_str() {
			"svg" => OutputKind::Svg,
			"pdf" => OutputKind::Pdf,
			"json" | "geojson" => OutputKind::GeoJson,
			other => match RasterFormat::from_extension(other) {
				Some(format) => OutputKind::Raster(format),
				None => bail!("unknown output format '{text}'"),
			},
		})
	}
}

impl fmt::Display for OutputKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.extension())
	}
}
