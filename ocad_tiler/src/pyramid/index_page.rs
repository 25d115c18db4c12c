//! The `index.html` page that shows a tile pyramid in a browser.

use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use ocad_tiler_core::TilePyramid;
use regex::{Captures, Regex};
use std::collections::HashMap;

const TEMPLATE: &str = include_str!("../../assets/index.html.template");

lazy_static! {
	static ref PLACEHOLDER: Regex = Regex::new(r"\$\{ *([\w -]+?) *\}").expect("placeholder pattern is valid");
}

/// Replaces every `${name}` in `template` with the value of `name`.
///
/// A placeholder without a value is an error.
pub fn fill_template(template: &str, values: &HashMap<&str, String>) -> Result<String> {
	let mut missing = None;
	let text = PLACEHOLDER.replace_all(template, |caps: &Captures| match values.get(&caps[1]) {
		Some(value) => value.clone(),
		None => {
			missing.get_or_insert_with(|| caps[0].to_string());
			String::new()
		}
	});
	match missing {
		Some(placeholder) => Err(anyhow!("no value provided for variable {placeholder}")),
		None => Ok(text.into_owned()),
	}
}

/// Renders the viewer page for `pyramid`.
pub fn render_index_page(pyramid: &TilePyramid) -> Result<String> {
	let levels = pyramid.levels();
	let values = HashMap::from([
		("bounds", pyramid.bounds().as_string_json()),
		("minZoom", levels.min_zoom().to_string()),
		("maxZoom", levels.max_zoom().to_string()),
		("baseResolution", levels.base_resolution().to_string()),
		("tileSize", pyramid.tile_size().to_string()),
	]);
	fill_template(TEMPLATE, &values)
}
