use super::{
	Artifact, OutputKind, RenderOptions, RenderTarget, SceneRenderer, SceneRequest, SymbolSceneRenderer, write_atomic,
};
use anyhow::{Context, Result, ensure};
use ocad_tiler_core::{Blob, ConfigError, CoordTransform, Extent, SpatialIndex, TileBounds};
use ocad_tiler_geometry::{MapColor, MapDocument, geojson};
use ocad_tiler_image::{Rasterizer, ResvgRasterizer, Scene, scene_to_pdf};
use std::sync::Arc;

/// Renders arbitrary projected extents of one map document.
///
/// The spatial index and the bounds are computed once at construction. A `Tiler` is immutable
/// afterwards and can be shared between threads behind an `Arc`.
pub struct Tiler {
	document: Arc<dyn MapDocument>,
	index: SpatialIndex,
	transform: CoordTransform,
	bounds: Option<Extent>,
	scene_renderer: Box<dyn SceneRenderer>,
	rasterizer: Box<dyn Rasterizer>,
}

impl Tiler {
	pub fn new(document: Arc<dyn MapDocument>, apply_grivation: bool) -> Tiler {
		Tiler::with_renderers(
			document,
			apply_grivation,
			Box::new(SymbolSceneRenderer::new()),
			Box::new(ResvgRasterizer::new()),
		)
	}

	pub fn with_renderers(
		document: Arc<dyn MapDocument>,
		apply_grivation: bool,
		scene_renderer: Box<dyn SceneRenderer>,
		rasterizer: Box<dyn Rasterizer>,
	) -> Tiler {
		let transform = CoordTransform::new(*document.crs(), apply_grivation);
		let index = SpatialIndex::build(document.features().iter().map(|f| f.geometry.coords()));
		let bounds = index.bounds().map(|native| transform.extent_to_projected(&native));
		log::debug!(
			"indexed {} of {} features, projected bounds {bounds:?}",
			index.len(),
			document.features().len()
		);
		Tiler {
			document,
			index,
			transform,
			bounds,
			scene_renderer,
			rasterizer,
		}
	}

	pub fn document(&self) -> &dyn MapDocument {
		self.document.as_ref()
	}

	pub fn transform(&self) -> &CoordTransform {
		&self.transform
	}

	/// Projected bounds of all features, `None` for a map without any geometry.
	pub fn bounds(&self) -> Option<&Extent> {
		self.bounds.as_ref()
	}

	/// `override_bounds` if given, the map bounds otherwise.
	pub fn bounds_or(&self, override_bounds: Option<Extent>) -> Result<Extent> {
		match override_bounds.or(self.bounds) {
			Some(bounds) => Ok(bounds),
			None => Err(ConfigError::EmptyMap.into()),
		}
	}

	/// The tile rectangle covering the map at `resolution`.
	pub fn tile_bounds(&self, resolution: f64, tile_size: u32) -> Result<TileBounds> {
		Ok(TileBounds::from_extent(resolution, tile_size, &self.bounds_or(None)?))
	}

	/// Candidate feature ids for a projected extent grown by `buffer` projected meters.
	pub fn objects(&self, extent: &Extent, buffer: f64) -> Vec<usize> {
		let native = self.transform.extent_to_native(extent);
		self.index.query(&native.buffered(self.transform.length_to_native(buffer)))
	}

	/// Builds the vector scene of `extent` sized `width × height` pixels.
	pub fn build_scene(
		&self,
		extent: &Extent,
		resolution: f64,
		width: u32,
		height: u32,
		options: &RenderOptions,
	) -> Result<Scene> {
		let objects = self.objects(extent, f64::from(options.buffer_px) * resolution);
		let request = SceneRequest {
			objects: &objects,
			include_hidden: options.include_hidden,
			symbol_filter: &options.symbol_filter,
			view: *extent,
			width,
			height,
			transform: self.transform,
			background: options.background,
		};
		self.scene_renderer
			.render(self.document(), &request)
			.with_context(|| format!("building the scene of {extent}"))
	}

	/// Renders `extent` (projected meters) at `resolution` meters per pixel.
	///
	/// `options` must name exactly one target, a path or a format. Artifacts written to a path
	/// appear atomically.
	pub fn render_extent(&self, extent: &Extent, resolution: f64, options: &RenderOptions) -> Result<Artifact> {
		let target = RenderTarget::from_options(options)?;
		ensure!(
			resolution.is_finite() && resolution > 0.0,
			ConfigError::InvalidResolution(resolution)
		);

		let blob = self.encode(extent, resolution, options, target.kind())?;
		match target {
			RenderTarget::File { path, .. } => {
				write_atomic(&path, &blob)?;
				Ok(Artifact::Written(path))
			}
			RenderTarget::Buffer(_) => Ok(Artifact::Buffer(blob)),
		}
	}

	fn encode(&self, extent: &Extent, resolution: f64, options: &RenderOptions, kind: OutputKind) -> Result<Blob> {
		if kind == OutputKind::GeoJson {
			let objects = self.objects(extent, f64::from(options.buffer_px) * resolution);
			let collection =
				geojson::to_feature_collection(self.document(), &objects, &options.feature_filter(), &self.transform);
			return Ok(Blob::from(serde_json::to_vec(&collection)?));
		}

		let (width, height) = extent.pixel_size(resolution);
		ensure!(
			width > 0 && height > 0,
			"extent {extent} is smaller than one pixel at {resolution} m/px"
		);

		match kind {
			OutputKind::Raster(format) => {
				let scene_resolution = self.transform.crs().scene_resolution(resolution);
				let (scene_width, scene_height) = extent.pixel_size(scene_resolution);
				log::trace!("rendering {extent} at {scene_resolution} m/px, output {width}x{height}");
				let scene = self.build_scene(extent, resolution, scene_width, scene_height, options)?;
				let image = self.rasterizer.rasterize(&scene, width, height)?;
				format.encode(&image)
			}
			OutputKind::Svg => {
				let scene = self.build_scene(extent, resolution, width, height, options)?;
				Ok(Blob::from(scene.to_svg()))
			}
			OutputKind::Pdf => {
				let scene = self.build_scene(extent, resolution, width, height, options)?;
				let colors = self.document.colors();
				scene_to_pdf(&scene, &options.page, &|rgb: [u8; 3]| {
					colors.find_by_rgb(rgb).and_then(MapColor::cmyk_unit)
				})
			}
			OutputKind::GeoJson => unreachable!("handled above"),
		}
	}
}
