//! Render-on-first-request tile storage.

use crate::{
	pyramid::{render_tile, tile_path},
	tiler::{RenderOptions, Tiler},
};
use anyhow::{Context, Result};
use dashmap::DashMap;
use ocad_tiler_core::{Blob, TileCoord, TilePyramid};
use std::{
	path::{Path, PathBuf},
	sync::Arc,
};
use tokio::sync::Mutex;

/// Tiles of one pyramid, rendered into the output directory when first requested.
///
/// Rendered files are never touched again, so reading them needs no locking. Concurrent
/// requests for a tile that is not on disk yet wait for a single render.
pub struct TileCache {
	tiler: Arc<Tiler>,
	pyramid: Arc<TilePyramid>,
	options: Arc<RenderOptions>,
	root: PathBuf,
	in_flight: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl TileCache {
	pub fn new(tiler: Arc<Tiler>, pyramid: TilePyramid, options: RenderOptions, root: PathBuf) -> TileCache {
		TileCache {
			tiler,
			pyramid: Arc::new(pyramid),
			options: Arc::new(options),
			root,
			in_flight: DashMap::new(),
		}
	}

	pub fn pyramid(&self) -> &TilePyramid {
		&self.pyramid
	}

	/// The PNG bytes of `coord`, or `None` if the tile lies outside the pyramid.
	pub async fn get(&self, coord: TileCoord) -> Result<Option<Blob>> {
		if !self.pyramid.contains(&coord) {
			log::debug!("tile {coord} is outside the pyramid");
			return Ok(None);
		}

		let path = tile_path(&self.root, &coord);
		if !exists(&path).await {
			self.materialize(coord, &path).await?;
		}

		let bytes = tokio::fs::read(&path)
			.await
			.with_context(|| format!("reading tile {path:?}"))?;
		Ok(Some(Blob::from(bytes)))
	}

	async fn materialize(&self, coord: TileCoord, path: &Path) -> Result<()> {
		let lock = self.in_flight.entry(path.to_path_buf()).or_default().clone();
		let guard = lock.lock().await;

		// another request may have finished the tile while this one was waiting
		let result = if exists(path).await {
			Ok(())
		} else {
			let tiler = Arc::clone(&self.tiler);
			let pyramid = Arc::clone(&self.pyramid);
			let options = Arc::clone(&self.options);
			let root = self.root.clone();
			tokio::task::spawn_blocking(move || render_tile(&tiler, &pyramid, &coord, &root, &options))
				.await
				.context("tile render task failed")
				.and_then(|result| result.map(|_| ()))
		};

		drop(guard);
		self.in_flight.remove(path);
		result
	}
}

async fn exists(path: &Path) -> bool {
	tokio::fs::try_exists(path).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tiler::testing::{CountingRasterizer, sample_tiler};
	use assert_fs::TempDir;
	use ocad_tiler_core::{Extent, ZoomLevels};

	fn cache(rasterizer: &CountingRasterizer, root: &Path) -> Arc<TileCache> {
		let levels = ZoomLevels::new(2, 10, 4.0).unwrap();
		let bounds = Extent::new(600000.0, 150000.0, 601000.0, 150800.0).unwrap();
		let pyramid = TilePyramid::new(levels, 256, bounds).unwrap();
		Arc::new(TileCache::new(
			sample_tiler(rasterizer),
			pyramid,
			RenderOptions::default(),
			root.to_path_buf(),
		))
	}

	#[tokio::test]
	async fn renders_once_and_serves_from_disk() {
		let dir = TempDir::new().unwrap();
		let rasterizer = CountingRasterizer::default();
		let cache = cache(&rasterizer, dir.path());
		let coord = TileCoord::new(11, 585, 146);

		let first = cache.get(coord).await.unwrap().unwrap();
		assert!(first.as_slice().starts_with(b"\x89PNG"));
		assert!(dir.path().join("11/585/146.png").exists());

		let second = cache.get(coord).await.unwrap().unwrap();
		assert_eq!(first, second);
		assert_eq!(rasterizer.calls(), 1);
		assert!(cache.in_flight.is_empty());
	}

	#[tokio::test]
	async fn outside_tiles_are_not_rendered() {
		let dir = TempDir::new().unwrap();
		let rasterizer = CountingRasterizer::default();
		let cache = cache(&rasterizer, dir.path());

		for coord in [
			TileCoord::new(9, 292, 73),
			TileCoord::new(12, 585, 146),
			TileCoord::new(11, 587, 146),
			TileCoord::new(11, 585, 145),
		] {
			assert_eq!(cache.get(coord).await.unwrap(), None, "{coord}");
		}
		assert_eq!(rasterizer.calls(), 0);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn concurrent_requests_render_once() {
		let dir = TempDir::new().unwrap();
		let rasterizer = CountingRasterizer::default();
		let cache = cache(&rasterizer, dir.path());
		let coord = TileCoord::new(10, 293, 73);

		let requests: Vec<_> = (0..8)
			.map(|_| {
				let cache = Arc::clone(&cache);
				tokio::spawn(async move { cache.get(coord).await })
			})
			.collect();
		for request in requests {
			assert!(request.await.unwrap().unwrap().is_some());
		}
		assert_eq!(rasterizer.calls(), 1);
	}

	#[tokio::test]
	async fn render_failures_are_errors() {
		let dir = TempDir::new().unwrap();
		let cache = cache(&CountingRasterizer::failing(), dir.path());
		let err = cache.get(TileCoord::new(11, 586, 147)).await.unwrap_err();
		assert!(format!("{err:#}").contains("rasterizer failed on purpose"));
		assert!(cache.in_flight.is_empty());
	}
}
