//! Single-page PDF export of a scene.
//!
//! The scene is scaled uniformly to fit the printable area of the page and centered. Colors that
//! have a CMYK alternate in the map's color table are written as device CMYK, all others as RGB.

use crate::{Color, Outline, Scene, scene::apply};
use anyhow::{Result, anyhow, bail, ensure};
use ocad_tiler_core::Blob;
use printpdf::{
	Line, LineCapStyle, LineJoinStyle, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
	path::{PaintMode, WindingOrder},
};
use std::{f64::consts::TAU, str::FromStr};

const MM_TO_PT: f64 = 72.0 / 25.4;
const CIRCLE_SEGMENTS: usize = 32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageSize {
	A0,
	A1,
	A2,
	A3,
	#[default]
	A4,
	A5,
	Letter,
	Legal,
}

impl PageSize {
	/// Width and height in portrait orientation, in millimeters.
	pub fn dimensions_mm(&self) -> (f64, f64) {
		match self {
			PageSize::A0 => (841.0, 1189.0),
			PageSize::A1 => (594.0, 841.0),
			PageSize::A2 => (420.0, 594.0),
			PageSize::A3 => (297.0, 420.0),
			PageSize::A4 => (210.0, 297.0),
			PageSize::A5 => (148.0, 210.0),
			PageSize::Letter => (215.9, 279.4),
			PageSize::Legal => (215.9, 355.6),
		}
	}
}

impl FromStr for PageSize {
	type Err = anyhow::Error;

	fn from_str(text: &str) -> Result<PageSize> {
		Ok(match text.trim().to_ascii_lowercase().as_str() {
			"a0" => PageSize::A0,
			"a1" => PageSize::A1,
			"a2" => PageSize::A2,
			"a3" => PageSize::A3,
			"a4" => PageSize::A4,
			"a5" => PageSize::A5,
			"letter" => PageSize::Letter,
			"legal" => PageSize::Legal,
			_ => bail!("unknown page size '{text}', expected one of A0-A5, letter, legal"),
		})
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
	#[default]
	Portrait,
	Landscape,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PdfPage {
	pub size: PageSize,
	pub orientation: Orientation,
	pub margin_mm: f64,
}

impl Default for PdfPage {
	fn default() -> Self {
		PdfPage {
			size: PageSize::A4,
			orientation: Orientation::Portrait,
			margin_mm: 10.0,
		}
	}
}

impl PdfPage {
	pub fn dimensions_mm(&self) -> (f64, f64) {
		let (w, h) = self.size.dimensions_mm();
		match self.orientation {
			Orientation::Portrait => (w, h),
			Orientation::Landscape => (h, w),
		}
	}
}

/// A paint color as written to the content stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PdfColor {
	Rgb([f32; 3]),
	Cmyk([f32; 4]),
}

impl PdfColor {
	/// Uses the CMYK alternate returned by `cmyk_of` when there is one.
	pub fn resolve(color: Color, cmyk_of: &dyn Fn([u8; 3]) -> Option<[f32; 4]>) -> PdfColor {
		match cmyk_of(color.as_rgb()) {
			Some(cmyk) => PdfColor::Cmyk(cmyk),
			None => PdfColor::Rgb(color.as_rgb().map(|v| f32::from(v) / 255.0)),
		}
	}

	fn to_printpdf(self) -> printpdf::Color {
		match self {
			PdfColor::Rgb([r, g, b]) => printpdf::Color::Rgb(printpdf::Rgb::new(r, g, b, None)),
			PdfColor::Cmyk([c, m, y, k]) => printpdf::Color::Cmyk(printpdf::Cmyk::new(c, m, y, k, None)),
		}
	}
}

/// Placement of scene pixels on the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLayout {
	/// Millimeters per scene pixel.
	pub scale: f64,
	pub offset_x: f64,
	pub offset_y: f64,
	pub page_height: f64,
}

impl PageLayout {
	pub fn fit(scene: &Scene, page: &PdfPage) -> Result<PageLayout> {
		ensure!(scene.width() > 0 && scene.height() > 0, "cannot place an empty scene on a page");
		let (page_w, page_h) = page.dimensions_mm();
		let (avail_w, avail_h) = (page_w - 2.0 * page.margin_mm, page_h - 2.0 * page.margin_mm);
		ensure!(avail_w > 0.0 && avail_h > 0.0, "page margins leave no printable area");

		let (w, h) = (f64::from(scene.width()), f64::from(scene.height()));
		let scale = (avail_w / w).min(avail_h / h);
		Ok(PageLayout {
			scale,
			offset_x: (page_w - w * scale) / 2.0,
			offset_y: (page_h - h * scale) / 2.0,
			page_height: page_h,
		})
	}

	/// Scene pixel (y down) → page millimeters (y up).
	pub fn to_page(&self, [x, y]: [f64; 2]) -> [f64; 2] {
		[self.offset_x + x * self.scale, self.page_height - (self.offset_y + y * self.scale)]
	}
}

/// Writes `scene` as a one-page PDF document.
pub fn scene_to_pdf(scene: &Scene, page: &PdfPage, cmyk_of: &dyn Fn([u8; 3]) -> Option<[f32; 4]>) -> Result<Blob> {
	let layout = PageLayout::fit(scene, page)?;
	let (page_w, page_h) = page.dimensions_mm();
	log::debug!(
		"placing {}x{} scene on a {page_w}x{page_h} mm page at {:.4} mm/px",
		scene.width(),
		scene.height(),
		layout.scale
	);

	let (doc, page_index, layer_index) = PdfDocument::new("Map", Mm(page_w as f32), Mm(page_h as f32), "Map");
	let layer = doc.get_page(page_index).get_layer(layer_index);
	layer.set_line_cap_style(LineCapStyle::Round);
	layer.set_line_join_style(LineJoinStyle::Round);

	if let Some(background) = scene.background() {
		let corners = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
			.map(|[u, v]| [u * f64::from(scene.width()), v * f64::from(scene.height())]);
		layer.set_fill_color(PdfColor::resolve(background, cmyk_of).to_printpdf());
		layer.add_polygon(Polygon {
			rings: vec![corners.iter().map(|p| page_point(&layout, *p)).collect()],
			mode: PaintMode::Fill,
			winding_order: WindingOrder::NonZero,
		});
	}

	let matrix = scene.pixel_matrix();
	let px_per_unit = scene.pixels_per_native_unit();
	for shape in scene.shapes() {
		let (rings, closed) = match &shape.outline {
			Outline::Path { rings, closed } => (
				rings
					.iter()
					.filter(|ring| ring.len() >= 2)
					.map(|ring| {
						ring.iter()
							.map(|p| page_point(&layout, apply(&matrix, *p)))
							.collect::<Vec<_>>()
					})
					.collect::<Vec<_>>(),
				*closed,
			),
			Outline::Circle { center, radius } => {
				let [cx, cy] = apply(&matrix, *center);
				let r = radius * px_per_unit;
				let ring = (0..CIRCLE_SEGMENTS)
					.map(|i| {
						let angle = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
						page_point(&layout, [cx + r * angle.cos(), cy + r * angle.sin()])
					})
					.collect();
				(vec![ring], true)
			}
		};
		if rings.is_empty() {
			continue;
		}

		let fill = shape.paint.fill.filter(|color| closed && !color.is_transparent());
		let stroke = shape.paint.stroke.filter(|stroke| !stroke.color.is_transparent());
		if let Some(color) = fill {
			layer.set_fill_color(PdfColor::resolve(color, cmyk_of).to_printpdf());
		}
		if let Some(stroke) = stroke {
			layer.set_outline_color(PdfColor::resolve(stroke.color, cmyk_of).to_printpdf());
			layer.set_outline_thickness((stroke.width * px_per_unit * layout.scale * MM_TO_PT) as f32);
		}
		draw(&layer, rings, closed, fill.is_some(), stroke.is_some());
	}

	let bytes = doc.save_to_bytes().map_err(|e| anyhow!("writing PDF document: {e:?}"))?;
	Ok(Blob::from(bytes))
}

fn draw(layer: &PdfLayerReference, rings: Vec<Vec<(Point, bool)>>, closed: bool, fill: bool, stroke: bool) {
	let mode = match (fill, stroke) {
		(true, true) => PaintMode::FillStroke,
		(true, false) => PaintMode::Fill,
		(false, true) => PaintMode::Stroke,
		(false, false) => return,
	};
	if closed {
		layer.add_polygon(Polygon {
			rings,
			mode,
			winding_order: WindingOrder::EvenOdd,
		});
	} else {
		for points in rings {
			layer.add_line(Line {
				points,
				is_closed: false,
			});
		}
	}
}

fn page_point(layout: &PageLayout, pixel: [f64; 2]) -> (Point, bool) {
	let [x, y] = layout.to_page(pixel);
	(Point::new(Mm(x as f32), Mm(y as f32)), false)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Paint, Shape};
	use approx::assert_relative_eq;
	use ocad_tiler_core::Extent;
	use rstest::rstest;

	fn scene(width: u32, height: u32) -> Scene {
		let view = Extent::new(0.0, 0.0, f64::from(width), f64::from(height)).unwrap();
		Scene::new(view, width, height, [1.0, 0.0, 0.0, 1.0, 0.0, 0.0])
	}

	#[rstest]
	#[case("A4", PageSize::A4)]
	#[case("a0", PageSize::A0)]
	#[case(" Letter ", PageSize::Letter)]
	fn parses_page_sizes(#[case] text: &str, #[case] expected: PageSize) {
		assert_eq!(text.parse::<PageSize>().unwrap(), expected);
	}

	#[test]
	fn landscape_swaps_dimensions() {
		let page = PdfPage {
			orientation: Orientation::Landscape,
			..PdfPage::default()
		};
		assert_eq!(page.dimensions_mm(), (297.0, 210.0));
		assert!("B5".parse::<PageSize>().is_err());
	}

	#[test]
	fn fits_and_centers_the_scene() {
		// 380 x 190 px on A4 portrait with 10 mm margins: width limits, 190 mm / 380 px
		let layout = PageLayout::fit(&scene(380, 190), &PdfPage::default()).unwrap();
		assert_relative_eq!(layout.scale, 0.5);
		assert_relative_eq!(layout.offset_x, 10.0);
		assert_relative_eq!(layout.offset_y, (297.0 - 95.0) / 2.0);

		let [x, y] = layout.to_page([0.0, 0.0]);
		assert_relative_eq!(x, 10.0);
		assert_relative_eq!(y, 297.0 - 101.0);
	}

	#[test]
	fn resolves_cmyk_alternates() {
		let lookup = |rgb: [u8; 3]| (rgb == [0, 0, 0]).then_some([0.0, 0.0, 0.0, 1.0]);
		assert_eq!(
			PdfColor::resolve(Color::rgb(0, 0, 0), &lookup),
			PdfColor::Cmyk([0.0, 0.0, 0.0, 1.0])
		);
		assert_eq!(
			PdfColor::resolve(Color::rgb(255, 0, 51), &lookup),
			PdfColor::Rgb([1.0, 0.0, 0.2])
		);
	}

	#[test]
	fn writes_a_pdf_document() {
		let mut scene = scene(100, 100).with_background(Some(Color::WHITE));
		scene.push(Shape {
			outline: Outline::Path {
				rings: vec![vec![[10.0, 10.0], [90.0, 10.0], [90.0, 90.0]]],
				closed: true,
			},
			paint: Paint::fill(Color::rgb(0, 163, 224)),
		});
		scene.push(Shape {
			outline: Outline::Path {
				rings: vec![vec![[10.0, 50.0], [90.0, 50.0]]],
				closed: false,
			},
			paint: Paint::stroke(Color::rgb(0, 0, 0), 2.0),
		});
		scene.push(Shape {
			outline: Outline::Circle {
				center: [50.0, 50.0],
				radius: 5.0,
			},
			paint: Paint::fill(Color::rgb(62, 181, 73)),
		});

		let blob = scene_to_pdf(&scene, &PdfPage::default(), &|_| None).unwrap();
		assert!(blob.as_slice().starts_with(b"%PDF-"));
	}

	#[test]
	fn rejects_empty_scenes() {
		assert!(scene_to_pdf(&scene(0, 0), &PdfPage::default(), &|_| None).is_err());
	}
}
