//! JPEG encoding. JPEG has no alpha channel, so transparent pixels are flattened onto white.

use anyhow::Result;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage, codecs::jpeg::JpegEncoder};
use ocad_tiler_core::Blob;

pub const DEFAULT_QUALITY: u8 = 90;

pub fn encode(image: &DynamicImage, quality: Option<u8>) -> Result<Blob> {
	let quality = quality.unwrap_or(DEFAULT_QUALITY).clamp(1, 100);
	let rgb = flatten_on_white(image);

	let mut buffer: Vec<u8> = Vec::new();
	JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
		rgb.as_raw(),
		rgb.width(),
		rgb.height(),
		ExtendedColorType::Rgb8,
	)?;

	Ok(Blob::from(buffer))
}

fn flatten_on_white(image: &DynamicImage) -> RgbImage {
	if !image.color().has_alpha() {
		return image.to_rgb8();
	}
	let rgba = image.to_rgba8();
	RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
		let [r, g, b, a] = rgba.get_pixel(x, y).0;
		let a = u16::from(a);
		let blend = |c: u8| ((u16::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
		Rgb([blend(r), blend(g), blend(b)])
	})
}
