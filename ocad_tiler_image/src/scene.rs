//! Vector scenes: what a render request draws, before it becomes pixels or a PDF page.
//!
//! Shapes keep their native map coordinates. The scene carries the affine transform from native
//! units to projected meters and the projected view extent, which together define the mapping to
//! scene pixels (y pointing down).

use crate::Color;
use ocad_tiler_core::Extent;
use std::fmt::Write;

/// Outline of a shape, in native map units.
#[derive(Clone, Debug, PartialEq)]
pub enum Outline {
	/// One or more rings. Closed paths are filled with the even-odd rule.
	Path { rings: Vec<Vec<[f64; 2]>>, closed: bool },
	Circle { center: [f64; 2], radius: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
	pub color: Color,
	/// Line width in native units.
	pub width: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Paint {
	pub fill: Option<Color>,
	pub stroke: Option<Stroke>,
}

impl Paint {
	pub fn fill(color: Color) -> Paint {
		Paint {
			fill: Some(color),
			stroke: None,
		}
	}

	pub fn stroke(color: Color, width: f64) -> Paint {
		Paint {
			fill: None,
			stroke: Some(Stroke { color, width }),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
	pub outline: Outline,
	pub paint: Paint,
}

/// An ordered list of shapes. Shapes pushed later are painted on top.
#[derive(Clone, Debug)]
pub struct Scene {
	width: u32,
	height: u32,
	view: Extent,
	transform: [f64; 6],
	background: Option<Color>,
	shapes: Vec<Shape>,
}

impl Scene {
	/// `view` is the projected extent shown by the scene, `transform` maps native units to
	/// projected meters (see `CoordTransform::native_to_projected_affine`).
	pub fn new(view: Extent, width: u32, height: u32, transform: [f64; 6]) -> Scene {
		Scene {
			width,
			height,
			view,
			transform,
			background: None,
			shapes: Vec::new(),
		}
	}

	#[must_use]
	pub fn with_background(mut self, background: Option<Color>) -> Scene {
		self.background = background.filter(|color| !color.is_transparent());
		self
	}

	pub fn push(&mut self, shape: Shape) {
		self.shapes.push(shape);
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn view(&self) -> &Extent {
		&self.view
	}

	pub fn background(&self) -> Option<Color> {
		self.background
	}

	pub fn shapes(&self) -> &[Shape] {
		&self.shapes
	}

	pub fn len(&self) -> usize {
		self.shapes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.shapes.is_empty()
	}

	/// Native units → scene pixels, as `[a, b, c, d, e, f]`.
	///
	/// The projected offset is subtracted in `f64` so the matrix stays small enough for
	/// single precision renderers.
	pub fn pixel_matrix(&self) -> [f64; 6] {
		let [a, b, c, d, e, f] = self.transform;
		let sx = f64::from(self.width) / self.view.width();
		let sy = f64::from(self.height) / self.view.height();
		[
			sx * a,
			-sy * b,
			sx * c,
			-sy * d,
			sx * (e - self.view.x_min),
			sy * (self.view.y_max - f),
		]
	}

	/// How many pixels one native unit spans.
	pub fn pixels_per_native_unit(&self) -> f64 {
		let [a, b, ..] = self.pixel_matrix();
		a.hypot(b)
	}

	pub fn to_pixel(&self, point: [f64; 2]) -> [f64; 2] {
		apply(&self.pixel_matrix(), point)
	}

	/// Serializes the scene as a standalone SVG document sized in scene pixels.
	pub fn to_svg(&self) -> String {
		let (w, h) = (self.width, self.height);
		let mut svg = String::with_capacity(256 + self.shapes.len() * 128);
		let _ = write!(
			svg,
			r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
		);
		if let Some(background) = self.background {
			let _ = write!(svg, r#"<rect width="{w}" height="{h}"{}/>"#, paint_attr("fill", background));
		}
		let m = self.pixel_matrix();
		let _ = write!(
			svg,
			r#"<g transform="matrix({} {} {} {} {} {})">"#,
			m[0], m[1], m[2], m[3], m[4], m[5]
		);
		for shape in &self.shapes {
			write_shape(&mut svg, shape);
		}
		svg.push_str("</g></svg>");
		svg
	}
}

pub(crate) fn apply(m: &[f64; 6], [x, y]: [f64; 2]) -> [f64; 2] {
	[m[0] * x + m[2] * y + m[4], m[1] * x + m[3] * y + m[5]]
}

fn paint_attr(name: &str, color: Color) -> String {
	if color.is_opaque() {
		format!(r#" {name}="{}""#, color.to_hex())
	} else {
		format!(r#" {name}="{}" {name}-opacity="{:.3}""#, color.to_hex(), color.opacity())
	}
}

fn style_attrs(paint: &Paint) -> String {
	let mut attrs = match paint.fill {
		Some(color) => paint_attr("fill", color) + r#" fill-rule="evenodd""#,
		None => r#" fill="none""#.to_string(),
	};
	if let Some(stroke) = paint.stroke {
		attrs += &paint_attr("stroke", stroke.color);
		let _ = write!(
			attrs,
			r#" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round""#,
			stroke.width
		);
	}
	attrs
}

fn write_shape(svg: &mut String, shape: &Shape) {
	match &shape.outline {
		Outline::Path { rings, closed } => {
			let mut d = String::new();
			for ring in rings.iter().filter(|ring| !ring.is_empty()) {
				for (i, [x, y]) in ring.iter().enumerate() {
					let _ = write!(d, "{}{x} {y}", if i == 0 { "M" } else { "L" });
				}
				if *closed {
					d.push('Z');
				}
			}
			if !d.is_empty() {
				let _ = write!(svg, r#"<path d="{d}"{}/>"#, style_attrs(&shape.paint));
			}
		}
		Outline::Circle { center, radius } => {
			let _ = write!(
				svg,
				r#"<circle cx="{}" cy="{}" r="{radius}"{}/>"#,
				center[0],
				center[1],
				style_attrs(&shape.paint)
			);
		}
	}
}
