use super::{TileOutcome, render_index_page, render_tile};
use crate::tiler::{RenderOptions, Tiler, write_atomic};
use anyhow::{Context, Result};
use futures::{StreamExt, stream};
use ocad_tiler_core::{Blob, ConcurrencyLimits, TilePyramid, progress::get_progress_bar};
use std::{fmt, path::PathBuf, sync::Arc};

/// Stages of a generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Counting,
	Rendering,
	Finalizing,
	Done,
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Phase::Counting => "counting",
			Phase::Rendering => "rendering",
			Phase::Finalizing => "finalizing",
			Phase::Done => "done",
		})
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationSummary {
	pub total: u64,
	pub rendered: u64,
	pub skipped: u64,
}

/// Writes every tile of a pyramid below one output directory, followed by `index.html`.
///
/// Tiles that exist already are skipped, so an interrupted run can simply be repeated.
pub struct PyramidGenerator {
	tiler: Arc<Tiler>,
	pyramid: Arc<TilePyramid>,
	options: Arc<RenderOptions>,
	output_dir: PathBuf,
	jobs: usize,
	phase: Phase,
}

impl PyramidGenerator {
	pub fn new(tiler: Arc<Tiler>, pyramid: TilePyramid, options: RenderOptions, output_dir: PathBuf) -> Self {
		PyramidGenerator {
			tiler,
			pyramid: Arc::new(pyramid),
			options: Arc::new(options),
			output_dir,
			jobs: ConcurrencyLimits::default().cpu_bound,
			phase: Phase::Counting,
		}
	}

	/// Number of tiles rendered at the same time.
	#[must_use]
	pub fn with_jobs(mut self, jobs: usize) -> Self {
		self.jobs = jobs.max(1);
		self
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn pyramid(&self) -> &TilePyramid {
		&self.pyramid
	}

	fn enter(&mut self, phase: Phase) {
		log::info!("pyramid generation: {phase}");
		self.phase = phase;
	}

	pub async fn run(&mut self) -> Result<GenerationSummary> {
		self.enter(Phase::Counting);
		let levels = *self.pyramid.levels();
		for index in levels.iter_detailed_first() {
			let bounds = self.pyramid.level_bounds(index);
			log::debug!(
				"zoom {}: {} m/px, tiles {:?}, {} tiles",
				levels.zoom_of_index(index),
				levels.resolution(index),
				bounds,
				bounds.count()
			);
		}
		let total = self.pyramid.count_tiles();

		self.enter(Phase::Rendering);
		let (rendered, skipped) = self.render_tiles(total).await?;

		self.enter(Phase::Finalizing);
		let index_page = render_index_page(&self.pyramid)?;
		write_atomic(&self.output_dir.join("index.html"), &Blob::from(index_page))?;

		self.enter(Phase::Done);
		log::info!("{rendered} tiles rendered, {skipped} already present");
		Ok(GenerationSummary {
			total,
			rendered,
			skipped,
		})
	}

	async fn render_tiles(&self, total: u64) -> Result<(u64, u64)> {
		log::debug!("rendering {total} tiles with {} workers", self.jobs);
		let progress = get_progress_bar("rendering tiles", total);

		let mut results = stream::iter(self.pyramid.iter_coords())
			.map(|coord| {
				let tiler = Arc::clone(&self.tiler);
				let pyramid = Arc::clone(&self.pyramid);
				let options = Arc::clone(&self.options);
				let root = self.output_dir.clone();
				tokio::task::spawn_blocking(move || render_tile(&tiler, &pyramid, &coord, &root, &options))
			})
			.buffer_unordered(self.jobs);

		let (mut rendered, mut skipped) = (0, 0);
		while let Some(joined) = results.next().await {
			let outcome = match joined.context("tile render task failed").and_then(|result| result) {
				Ok(outcome) => outcome,
				Err(err) => {
					progress.remove();
					return Err(err);
				}
			};
			match outcome {
				TileOutcome::Rendered => {
					rendered += 1;
					progress.inc(1);
				}
				TileOutcome::Skipped => {
					skipped += 1;
					progress.skip(1);
				}
			}
		}
		progress.finish();
		Ok((rendered, skipped))
	}
}
