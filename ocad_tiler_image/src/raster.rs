//! Rasterization of scenes into images.

use crate::Scene;
use anyhow::{Context, Result, anyhow, ensure};
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};
use resvg::{tiny_skia, usvg};

/// Turns a [`Scene`] into pixels.
///
/// Implementations render at the scene's own pixel size and deliver an image of exactly
/// `width × height` pixels.
pub trait Rasterizer: Send + Sync {
	fn rasterize(&self, scene: &Scene, width: u32, height: u32) -> Result<DynamicImage>;
}

/// Renders the SVG form of a scene with resvg and resamples it with a Lanczos filter.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResvgRasterizer;

impl ResvgRasterizer {
	pub fn new() -> ResvgRasterizer {
		ResvgRasterizer
	}

	fn render(scene: &Scene) -> Result<RgbaImage> {
		let (width, height) = (scene.width(), scene.height());
		let svg = scene.to_svg();
		let tree = usvg::Tree::from_data(svg.as_bytes(), &usvg::Options::default()).context("parsing scene SVG")?;

		let mut pixmap =
			tiny_skia::Pixmap::new(width, height).ok_or_else(|| anyhow!("cannot allocate a {width}x{height} pixmap"))?;
		resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

		let mut data = Vec::with_capacity(pixmap.data().len());
		for pixel in pixmap.pixels() {
			let color = pixel.demultiply();
			data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
		}
		RgbaImage::from_raw(width, height, data).ok_or_else(|| anyhow!("pixmap size does not match {width}x{height}"))
	}
}

impl Rasterizer for ResvgRasterizer {
	fn rasterize(&self, scene: &Scene, width: u32, height: u32) -> Result<DynamicImage> {
		ensure!(
			scene.width() > 0 && scene.height() > 0,
			"scene has no pixels ({}x{})",
			scene.width(),
			scene.height()
		);
		ensure!(width > 0 && height > 0, "output image has no pixels ({width}x{height})");

		log::trace!(
			"rasterizing {} shapes at {}x{} into {width}x{height}",
			scene.len(),
			scene.width(),
			scene.height()
		);
		let image = DynamicImage::ImageRgba8(Self::render(scene)?);
		if (scene.width(), scene.height()) == (width, height) {
			return Ok(image);
		}

		let mut resized = DynamicImage::new(width, height, image.color());
		Resizer::new()
			.resize(
				&image,
				&mut resized,
				&ResizeOptions::default().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
			)
			.with_context(|| format!("resizing {}x{} to {width}x{height}", scene.width(), scene.height()))?;
		Ok(resized)
	}
}
