use anyhow::Result;
use ocad_tiler::{config::Config, tiler::Tiler};
use ocad_tiler_core::Extent;
use ocad_tiler_geometry::{MapFile, SymbolId};
use std::{path::PathBuf, sync::Arc};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// Map document to render
	#[arg(required = true)]
	map: PathBuf,

	/// Output file. The extension selects the format:
	/// .png, .jpg, .webp, .svg, .pdf or .json/.geojson
	#[arg(required = true)]
	output: PathBuf,

	/// YAML config file; flags override its settings
	#[arg(long, short = 'c', value_name = "FILE", display_order = 0)]
	config: Option<PathBuf>,

	/// Extent to render in projected coordinates: "x_min,y_min,x_max,y_max".
	/// Defaults to the bounds of the map
	#[arg(long, short = 'b', value_name = "EXTENT", allow_hyphen_values = true)]
	bounds: Option<Extent>,

	/// Resolution in meters per pixel [default: 1]
	#[arg(long, short = 'r')]
	resolution: Option<f64>,

	/// Background color, e.g. "#ffffff" or "white" [default: transparent]
	#[arg(long, short = 'f', value_name = "COLOR")]
	fill: Option<String>,

	/// Also draw hidden symbols and objects
	#[arg(long)]
	show_hidden: bool,

	/// Only draw these symbols, e.g. "101,505.1"
	#[arg(long, value_name = "SYMBOLS", value_delimiter = ',')]
	filter_symbols: Option<Vec<SymbolId>>,

	/// Rotate the output by the map's grivation
	#[arg(long)]
	grivation: bool,

	/// PDF page size: A0 to A5, letter or legal [default: A4]
	#[arg(long, value_name = "SIZE")]
	page_size: Option<String>,

	/// Landscape PDF pages
	#[arg(long)]
	landscape: bool,
}

impl Subcommand {
	fn config(&self) -> Result<Config> {
		let mut config = Config::load(self.config.as_deref())?;
		let render = &mut config.render;
		render.override_optional_bounds(self.bounds);
		render.override_optional_resolution(self.resolution);
		render.override_optional_fill(self.fill.as_deref());
		render.override_show_hidden(self.show_hidden);
		render.override_optional_filter_symbols(self.filter_symbols.clone());
		render.override_grivation(self.grivation);
		config.pdf.override_optional_page_size(self.page_size.as_deref());
		config.pdf.override_landscape(self.landscape);
		Ok(config)
	}
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let config = arguments.config()?;
	let document = MapFile::from_path(&arguments.map)?;
	let tiler = Tiler::new(Arc::new(document), config.render.grivation());

	let extent = tiler.bounds_or(config.render.bounds)?;
	let resolution = config.render.resolution();
	let options = config.render_options()?.with_output_path(&arguments.output);

	log::info!("rendering {extent} at {resolution} m/px to {:?}", arguments.output);
	tiler.render_extent(&extent, resolution, &options)?;
	log::info!("finished");

	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::{run_command, testdata};
	use assert_fs::TempDir;

	#[test]
	fn renders_svg() {
		let dir = TempDir::new().unwrap();
		let output = dir.path().join("map.svg");
		run_command(vec![
			"ocad-tiler",
			"render",
			&testdata("sample_map.json"),
			output.to_str().unwrap(),
			"-r",
			"4",
			"-f",
			"white",
		])
		.unwrap();

		let svg = std::fs::read_to_string(&output).unwrap();
		assert!(svg.starts_with("<svg"));
		assert!(svg.contains(r#"width="250" height="200""#));
	}

	#[test]
	fn renders_a_window_of_the_map() {
		let dir = TempDir::new().unwrap();
		let output = dir.path().join("lake.png");
		run_command(vec![
			"ocad-tiler",
			"render",
			&testdata("sample_map.json"),
			output.to_str().unwrap(),
			"--bounds",
			"600200,150200,600400,150400",
			"--filter-symbols",
			"301,101",
		])
		.unwrap();

		let image = image::open(&output).unwrap();
		assert_eq!((image.width(), image.height()), (200, 200));
	}

	#[test]
	fn reports_a_missing_map() {
		let dir = TempDir::new().unwrap();
		let output = dir.path().join("map.png");
		let err = run_command(vec!["ocad-tiler", "render", "/does/not/exist.json", output.to_str().unwrap()])
			.unwrap_err();
		assert!(format!("{err:#}").contains("/does/not/exist.json"));
		assert!(!output.exists());
	}

	#[test]
	fn rejects_bad_bounds() {
		let err = run_command(vec!["ocad-tiler", "render", "map.json", "out.png", "-b", "1,2,3"]).unwrap_err();
		assert!(err.to_string().contains("-b"));
	}
}
