//! Test doubles for the rasterizer.

use super::{SymbolSceneRenderer, Tiler};
use anyhow::{Result, bail};
use image::DynamicImage;
use ocad_tiler_geometry::testing::sample_document;
use ocad_tiler_image::{Rasterizer, Scene};
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

/// Produces empty images of the requested size and counts its calls.
#[derive(Clone, Default)]
pub struct CountingRasterizer {
	calls: Arc<AtomicUsize>,
	fail: bool,
}

impl CountingRasterizer {
	pub fn failing() -> CountingRasterizer {
		CountingRasterizer {
			calls: Arc::default(),
			fail: true,
		}
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl Rasterizer for CountingRasterizer {
	fn rasterize(&self, _scene: &Scene, width: u32, height: u32) -> Result<DynamicImage> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if self.fail {
			bail!("rasterizer failed on purpose");
		}
		Ok(DynamicImage::new_rgba8(width, height))
	}
}

/// A tiler over the sample map using `rasterizer`.
pub fn sample_tiler(rasterizer: &CountingRasterizer) -> Arc<Tiler> {
	Arc::new(Tiler::with_renderers(
		Arc::new(sample_document()),
		false,
		Box::new(SymbolSceneRenderer::new()),
		Box::new(rasterizer.clone()),
	))
}
