use super::{PdfConfig, RenderConfig, ServerConfig, TilesConfig};
use crate::tiler::RenderOptions;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Resolution, bounds and styling
	#[serde(default)]
	pub render: RenderConfig,

	/// Tile pyramid layout
	#[serde(default)]
	pub tiles: TilesConfig,

	/// HTTP server address
	#[serde(default)]
	pub server: ServerConfig,

	/// PDF page setup
	#[serde(default)]
	pub pdf: PdfConfig,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))
	}

	/// Loads `path` if given, the defaults otherwise.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		match path {
			Some(path) => Config::from_path(path),
			None => Ok(Config::default()),
		}
	}

	/// Rendering options without an output target.
	pub fn render_options(&self) -> Result<RenderOptions> {
		Ok(RenderOptions {
			include_hidden: self.render.show_hidden(),
			symbol_filter: self.render.filter_symbols.clone().unwrap_or_default(),
			background: self.render.background()?,
			buffer_px: self.render.buffer(),
			page: self.pdf.page()?,
			..RenderOptions::default()
		})
	}
}
