mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
	name = "ocad-tiler",
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Render a map, or a window of it, to an image, SVG, PDF or GeoJSON file
	Render(tools::render::Subcommand),

	#[clap(alias = "pyramid")]
	/// Render a tile pyramid, or serve its tiles on demand
	Tiles(tools::tiles::Subcommand),
}

fn main() -> ExitCode {
	let cli = match Cli::try_parse() {
		Ok(cli) => cli,
		Err(err) => {
			let _ = err.print();
			// help and version go to stdout and are not failures
			return if err.use_stderr() {
				ExitCode::FAILURE
			} else {
				ExitCode::SUCCESS
			};
		}
	};

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("Error: {err:?}");
			ExitCode::FAILURE
		}
	}
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Render(arguments) => tools::render::run(arguments),
		Commands::Tiles(arguments) => tools::tiles::run(arguments),
	}
}
