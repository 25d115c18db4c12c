//! PNG encoding.

use anyhow::{Result, bail};
use image::{
	ColorType, DynamicImage, ImageEncoder,
	codecs::png::{CompressionType, FilterType, PngEncoder},
};
use ocad_tiler_core::Blob;

pub fn encode(image: &DynamicImage) -> Result<Blob> {
	if !matches!(
		image.color(),
		ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
	) {
		bail!("png encoding only supports 8-bit images, got {:?}", image.color());
	}

	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, FilterType::Adaptive).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;

	Ok(Blob::from(buffer))
}
