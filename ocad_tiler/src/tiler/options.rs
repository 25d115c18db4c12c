use super::OutputKind;
use anyhow::Result;
use ocad_tiler_core::{Blob, ConfigError};
use ocad_tiler_geometry::{FeatureFilter, SymbolId};
use ocad_tiler_image::{Color, PdfPage};
use std::path::{Path, PathBuf};

/// Buffer added around every rendered extent, in pixels at the requested resolution.
pub const DEFAULT_BUFFER_PX: u32 = 16;

/// Everything a render needs besides the extent and the resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
	pub include_hidden: bool,
	/// Only these symbols are drawn when non-empty.
	pub symbol_filter: Vec<SymbolId>,
	pub background: Option<Color>,
	pub buffer_px: u32,
	pub page: PdfPage,
	/// Write the artifact here, the kind being chosen from the extension.
	pub output_path: Option<PathBuf>,
	/// Return the artifact as an encoded buffer of this kind.
	pub format: Option<OutputKind>,
}

impl Default for RenderOptions {
	fn default() -> Self {
		RenderOptions {
			include_hidden: false,
			symbol_filter: Vec::new(),
			background: None,
			buffer_px: DEFAULT_BUFFER_PX,
			page: PdfPage::default(),
			output_path: None,
			format: None,
		}
	}
}

impl RenderOptions {
	/// A copy of these options writing to `path`.
	#[must_use]
	pub fn with_output_path(&self, path: &Path) -> RenderOptions {
		RenderOptions {
			output_path: Some(path.to_path_buf()),
			format: None,
			..self.clone()
		}
	}

	/// A copy of these options returning a buffer of `kind`.
	#[must_use]
	pub fn with_format(&self, kind: OutputKind) -> RenderOptions {
		RenderOptions {
			output_path: None,
			format: Some(kind),
			..self.clone()
		}
	}

	pub fn feature_filter(&self) -> FeatureFilter {
		FeatureFilter {
			include_hidden: self.include_hidden,
			symbols: self.symbol_filter.clone(),
		}
	}
}

/// Where a rendered artifact goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderTarget {
	File { path: PathBuf, kind: OutputKind },
	Buffer(OutputKind),
}

impl RenderTarget {
	/// Exactly one of `output_path` and `format` must be set.
	pub fn from_options(options: &RenderOptions) -> Result<RenderTarget> {
		match (&options.output_path, options.format) {
			(Some(path), None) => Ok(RenderTarget::File {
				kind: OutputKind::from_path(path)?,
				path: path.clone(),
			}),
			(None, Some(kind)) => Ok(RenderTarget::Buffer(kind)),
			(None, None) => Err(ConfigError::MissingOutputTarget.into()),
			(Some(_), Some(_)) => Err(ConfigError::AmbiguousOutputTarget.into()),
		}
	}

	pub fn kind(&self) -> OutputKind {
		match self {
			RenderTarget::File { kind, .. } | RenderTarget::Buffer(kind) => *kind,
		}
	}
}

/// The result of a render.
#[derive(Clone, Debug, PartialEq)]
pub enum Artifact {
	Written(PathBuf),
	Buffer(Blob),
}

impl Artifact {
	pub fn into_blob(self) -> Option<Blob> {
		match self {
			Artifact::Buffer(blob) => Some(blob),
			Artifact::Written(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ocad_tiler_image::RasterFormat;

	#[test]
	fn requires_an_output_target() {
		let err = RenderTarget::from_options(&RenderOptions::default()).unwrap_err();
		assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::MissingOutputTarget));
	}

	#[test]
	fn rejects_two_output_targets() {
		let options = RenderOptions {
			output_path: Some(PathBuf::from("map.png")),
			format: Some(OutputKind::Svg),
			..RenderOptions::default()
		};
		let err = RenderTarget::from_options(&options).unwrap_err();
		assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::AmbiguousOutputTarget));
	}

	#[test]
	fn chooses_the_kind_once() {
		let options = RenderOptions::default();
		assert_eq!(
			RenderTarget::from_options(&options.with_output_path(Path::new("out/map.geojson"))).unwrap(),
			RenderTarget::File {
				path: PathBuf::from("out/map.geojson"),
				kind: OutputKind::GeoJson
			}
		);
		let buffer = RenderTarget::from_options(&options.with_format(OutputKind::Raster(RasterFormat::Webp))).unwrap();
		assert_eq!(buffer.kind(), OutputKind::Raster(RasterFormat::Webp));
	}

	#[test]
	fn unknown_file_extensions_are_rejected() {
		let options = RenderOptions::default().with_output_path(Path::new("out/map.tif"));
		assert!(RenderTarget::from_options(&options).is_err());
	}

	#[test]
	fn switching_targets_clears_the_other_one() {
		let options = RenderOptions::default()
			.with_format(OutputKind::Pdf)
			.with_output_path(Path::new("a.svg"));
		assert_eq!(options.format, None);
		assert!(RenderTarget::from_options(&options).is_ok());
	}
}
