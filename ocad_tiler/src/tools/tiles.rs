use anyhow::Result;
use ocad_tiler::{
	config::Config,
	pyramid::{PyramidGenerator, render_index_page},
	server::{TileCache, TileServer},
	tiler::Tiler,
};
use ocad_tiler_core::{ConcurrencyLimits, Extent, TilePyramid};
use ocad_tiler_geometry::{MapFile, SymbolId};
use std::{path::PathBuf, sync::Arc};
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// Map document to render
	#[arg(required = true)]
	map: PathBuf,

	/// Directory that receives the tiles as {zoom}/{column}/{row}.png and an index.html viewer
	#[arg(required = true)]
	output_dir: PathBuf,

	/// YAML config file; flags override its settings
	#[arg(long, short = 'c', value_name = "FILE", display_order = 0)]
	config: Option<PathBuf>,

	/// Number of zoom levels [default: 4]
	#[arg(long = "levels", short = 'n', display_order = 1)]
	levels: Option<u8>,

	/// Added to every zoom number in paths and URLs [default: 0]
	#[arg(long, short = 'o', display_order = 1)]
	offset: Option<u8>,

	/// Tile width and height in pixels [default: 256]
	#[arg(long, short = 's', display_order = 1)]
	tile_size: Option<u32>,

	/// Resolution of the most detailed level in meters per pixel [default: 1]
	#[arg(long = "resolution", short = 'r', display_order = 1)]
	base_resolution: Option<f64>,

	/// Extent covered by the pyramid in projected coordinates: "x_min,y_min,x_max,y_max".
	/// Defaults to the bounds of the map
	#[arg(long, short = 'b', value_name = "EXTENT", allow_hyphen_values = true, display_order = 1)]
	bounds: Option<Extent>,

	/// Background color, e.g. "#ffffff" or "white" [default: transparent]
	#[arg(long, short = 'f', value_name = "COLOR", display_order = 2)]
	fill: Option<String>,

	/// Also draw hidden symbols and objects
	#[arg(long, display_order = 2)]
	show_hidden: bool,

	/// Only draw these symbols, e.g. "101,505.1"
	#[arg(long, value_name = "SYMBOLS", value_delimiter = ',', display_order = 2)]
	filter_symbols: Option<Vec<SymbolId>>,

	/// Rotate the map by its grivation
	#[arg(long, display_order = 2)]
	grivation: bool,

	/// Number of tiles rendered in parallel [default: number of CPUs]
	#[arg(long, short = 'j', display_order = 3)]
	jobs: Option<usize>,

	/// Serve tiles over HTTP instead of rendering all of them.
	/// Tiles are rendered into the output directory on first request
	#[arg(long, display_order = 4)]
	serve: bool,

	/// IP to bind the server to [default: 0.0.0.0]
	#[arg(long, short = 'i', display_order = 4)]
	ip: Option<String>,

	/// Port to bind the server to [default: 8080]
	#[arg(long, short = 'p', display_order = 4)]
	port: Option<u16>,

	/// Shut the server down after this many milliseconds
	#[arg(long, display_order = 5)]
	auto_shutdown: Option<u64>,
}

impl Subcommand {
	fn config(&self) -> Result<Config> {
		let mut config = Config::load(self.config.as_deref())?;

		let render = &mut config.render;
		render.override_optional_bounds(self.bounds);
		render.override_optional_fill(self.fill.as_deref());
		render.override_show_hidden(self.show_hidden);
		render.override_optional_filter_symbols(self.filter_symbols.clone());
		render.override_grivation(self.grivation);

		let tiles = &mut config.tiles;
		tiles.override_optional_levels(self.levels);
		tiles.override_optional_offset(self.offset);
		tiles.override_optional_tile_size(self.tile_size);
		tiles.override_optional_base_resolution(self.base_resolution);
		tiles.override_optional_jobs(self.jobs);

		config.server.override_optional_ip(self.ip.as_deref());
		config.server.override_optional_port(self.port);
		Ok(config)
	}
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let config = arguments.config()?;
	let document = MapFile::from_path(&arguments.map)?;
	let tiler = Arc::new(Tiler::new(Arc::new(document), config.render.grivation()));

	let levels = config.tiles.zoom_levels()?;
	let bounds = tiler.bounds_or(config.render.bounds)?;
	log::info!("finest resolution: {} m/px", levels.base_resolution());
	log::info!("coarsest resolution: {} m/px", levels.resolution(0));
	log::info!("bounds: {bounds}");

	let pyramid = TilePyramid::new(levels, config.tiles.tile_size(), bounds)?;
	let options = config.render_options()?;

	if arguments.serve {
		let index_page = render_index_page(&pyramid)?;
		let cache = TileCache::new(tiler, pyramid, options, arguments.output_dir.clone());
		let mut server = TileServer::new(config.server.ip(), config.server.port(), cache, index_page);
		server.start().await?;

		if let Some(milliseconds) = arguments.auto_shutdown {
			sleep(Duration::from_millis(milliseconds)).await
		} else {
			loop {
				sleep(Duration::from_secs(60)).await
			}
		}

		server.stop().await;
	} else {
		let jobs = ConcurrencyLimits::with_jobs(config.tiles.jobs).cpu_bound;
		let mut generator =
			PyramidGenerator::new(tiler, pyramid, options, arguments.output_dir.clone()).with_jobs(jobs);
		let summary = generator.run().await?;
		log::info!(
			"{} tiles: {} rendered, {} already present",
			summary.total,
			summary.rendered,
			summary.skipped
		);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::{run_command, testdata};
	use assert_fs::TempDir;

	#[test]
	fn renders_a_small_pyramid() {
		let dir = TempDir::new().unwrap();
		let output = dir.path().join("tiles");
		run_command(vec![
			"ocad-tiler",
			"tiles",
			&testdata("sample_map.json"),
			output.to_str().unwrap(),
			"-n",
			"2",
			"-o",
			"10",
			"-r",
			"4",
			"-j",
			"2",
		])
		.unwrap();

		assert!(output.join("index.html").is_file());
		assert!(output.join("10/292/73.png").is_file());
		assert!(output.join("11/586/147.png").is_file());
		assert!(!output.join("9").exists());
	}

	#[test]
	fn serves_until_shutdown() {
		let dir = TempDir::new().unwrap();
		run_command(vec![
			"ocad-tiler",
			"tiles",
			&testdata("sample_map.json"),
			dir.path().to_str().unwrap(),
			"--serve",
			"-i",
			"127.0.0.1",
			"-p",
			"0",
			"--auto-shutdown",
			"300",
		])
		.unwrap();

		// tiles are only rendered on request
		assert!(!dir.path().join("index.html").exists());
	}
}
