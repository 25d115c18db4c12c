//! Lossless WebP encoding.

use anyhow::Result;
use image::{DynamicImage, ImageEncoder, codecs::webp::WebPEncoder};
use ocad_tiler_core::Blob;

pub fn encode(image: &DynamicImage) -> Result<Blob> {
	let rgba = image.to_rgba8();

	let mut buffer: Vec<u8> = Vec::new();
	WebPEncoder::new_lossless(&mut buffer).write_image(
		rgba.as_raw(),
		rgba.width(),
		rgba.height(),
		image::ExtendedColorType::Rgba8,
	)?;

	Ok(Blob::from(buffer))
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{Rgba, RgbaImage};

	#[test]
	fn is_lossless() {
		let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(6, 4, |x, y| Rgba([x as u8 * 40, y as u8 * 60, 7, 255])));
		let blob = encode(&image).unwrap();
		assert_eq!(&blob.as_slice()[8..12], b"WEBP");

		let decoded = image::load_from_memory(blob.as_slice()).unwrap();
		assert_eq!(decoded.to_rgba8(), image.to_rgba8());
	}
}
