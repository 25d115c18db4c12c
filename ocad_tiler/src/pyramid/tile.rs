use crate::tiler::{OutputKind, RenderOptions, Tiler, write_new};
use anyhow::{Context, Result, anyhow};
use ocad_tiler_core::{TileCoord, TilePyramid, tile_extent};
use ocad_tiler_image::RasterFormat;
use std::path::{Path, PathBuf};

/// What happened to one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileOutcome {
	Rendered,
	/// The file was already there.
	Skipped,
}

/// `{root}/{zoom}/{col}/{row}.png`
pub fn tile_path(root: &Path, coord: &TileCoord) -> PathBuf {
	let [zoom, col, row] = coord.as_path_components();
	root.join(zoom).join(col).join(row)
}

/// Renders the tile at `coord` into the pyramid below `root` unless its file exists.
///
/// Existing files are never checked or replaced, also when another worker finishes the same tile first.
pub fn render_tile(
	tiler: &Tiler,
	pyramid: &TilePyramid,
	coord: &TileCoord,
	root: &Path,
	options: &RenderOptions,
) -> Result<TileOutcome> {
	let path = tile_path(root, coord);
	if path.exists() {
		log::trace!("tile {coord} exists, skipping");
		return Ok(TileOutcome::Skipped);
	}

	let resolution = pyramid
		.resolution_of_zoom(coord.zoom)
		.ok_or_else(|| anyhow!("zoom {} is not part of the pyramid", coord.zoom))?;
	let extent = tile_extent(resolution, pyramid.tile_size(), coord.row, coord.col);
	let blob = tiler
		.render_extent(&extent, resolution, &options.with_format(OutputKind::Raster(RasterFormat::Png)))
		.with_context(|| format!("rendering tile {coord}"))?
		.into_blob()
		.ok_or_else(|| anyhow!("tile {coord} was not rendered into memory"))?;

	if !write_new(&path, &blob).with_context(|| format!("writing tile {coord}"))? {
		log::trace!("tile {coord} was written concurrently, keeping it");
		return Ok(TileOutcome::Skipped);
	}

	log::debug!("rendered tile {coord} ({extent} at {resolution} m/px)");
	Ok(TileOutcome::Rendered)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tiler::testing::{CountingRasterizer, sample_tiler};
	use assert_fs::TempDir;
	use ocad_tiler_core::{Blob, Extent, ZoomLevels};

	fn pyramid() -> TilePyramid {
		let levels = ZoomLevels::new(2, 3, 4.0).unwrap();
		TilePyramid::new(levels, 256, Extent::new(600000.0, 150000.0, 601000.0, 150800.0).unwrap()).unwrap()
	}

	#[test]
	fn builds_tile_paths() {
		let path = tile_path(Path::new("out"), &TileCoord::new(12, -3, 7));
		assert_eq!(path, Path::new("out").join("12").join("-3").join("7.png"));
	}

	#[test]
	fn renders_missing_tiles_only() {
		let dir = TempDir::new().unwrap();
		let rasterizer = CountingRasterizer::default();
		let tiler = sample_tiler(&rasterizer);
		let coord = TileCoord::new(4, 585, 146);

		let outcome = render_tile(&tiler, &pyramid(), &coord, dir.path(), &RenderOptions::default()).unwrap();
		assert_eq!(outcome, TileOutcome::Rendered);
		let path = dir.path().join("4/585/146.png");
		let tile = image::open(&path).unwrap();
		assert_eq!((tile.width(), tile.height()), (256, 256));

		let outcome = render_tile(&tiler, &pyramid(), &coord, dir.path(), &RenderOptions::default()).unwrap();
		assert_eq!(outcome, TileOutcome::Skipped);
		assert_eq!(rasterizer.calls(), 1);
	}

	#[test]
	fn never_replaces_a_tile_written_during_the_render() {
		let dir = TempDir::new().unwrap();
		let tiler = sample_tiler(&CountingRasterizer::default());
		let coord = TileCoord::new(4, 585, 146);
		let path = tile_path(dir.path(), &coord);

		assert!(write_new(&path, &Blob::from("earlier")).unwrap());

		let outcome = render_tile(&tiler, &pyramid(), &coord, dir.path(), &RenderOptions::default()).unwrap();
		assert_eq!(outcome, TileOutcome::Skipped);
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "earlier");
	}

	#[test]
	fn rejects_foreign_zoom_levels() {
		let dir = TempDir::new().unwrap();
		let tiler = sample_tiler(&CountingRasterizer::default());
		let coord = TileCoord::new(9, 0, 0);
		assert!(render_tile(&tiler, &pyramid(), &coord, dir.path(), &RenderOptions::default()).is_err());
	}
}
