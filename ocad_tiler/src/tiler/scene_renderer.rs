//! Turning map objects into a vector [`Scene`].

use anyhow::Result;
use ocad_tiler_core::{CoordTransform, Extent};
use ocad_tiler_geometry::{FeatureFilter, Geometry, MapDocument, Symbol, SymbolId, SymbolKind};
use ocad_tiler_image::{Color, Outline, Paint, Scene, Shape, Stroke};
use std::cmp::Reverse;

/// What to draw and how large the drawing is.
#[derive(Clone, Debug)]
pub struct SceneRequest<'a> {
	/// Candidate feature ids, usually straight from the spatial index.
	pub objects: &'a [usize],
	pub include_hidden: bool,
	pub symbol_filter: &'a [SymbolId],
	/// Projected extent shown by the scene.
	pub view: Extent,
	pub width: u32,
	pub height: u32,
	pub transform: CoordTransform,
	pub background: Option<Color>,
}

pub trait SceneRenderer: Send + Sync {
	fn render(&self, document: &dyn MapDocument, request: &SceneRequest) -> Result<Scene>;
}

/// Point symbols without a size are drawn with this diameter, in native units.
const FALLBACK_POINT_DIAMETER: f64 = 50.0;

/// Draws every object with the color of its symbol.
///
/// Areas are filled, lines are stroked with the symbol's line width and points become discs.
/// Objects are painted in color table order, the first color ending up on top.
#[derive(Clone, Copy, Debug, Default)]
pub struct SymbolSceneRenderer;

impl SymbolSceneRenderer {
	pub fn new() -> SymbolSceneRenderer {
		SymbolSceneRenderer
	}
}

impl SceneRenderer for SymbolSceneRenderer {
	fn render(&self, document: &dyn MapDocument, request: &SceneRequest) -> Result<Scene> {
		let features = document.features();
		let symbols = document.symbols();
		let colors = document.colors();
		let filter = FeatureFilter {
			include_hidden: request.include_hidden,
			symbols: request.symbol_filter.to_vec(),
		};

		let mut drawable: Vec<(usize, usize, &Geometry, &Symbol, Color)> = Vec::with_capacity(request.objects.len());
		for &id in request.objects {
			let Some(feature) = features.get(id) else {
				continue;
			};
			if !filter.accepts(feature, symbols) {
				continue;
			}
			let Some(symbol) = symbols.get(feature.symbol) else {
				log::trace!("object {id} uses the undefined symbol {}", feature.symbol);
				continue;
			};
			let Some(color) = colors.get(symbol.color) else {
				log::trace!("symbol {} uses the undefined color {}", symbol.number, symbol.color);
				continue;
			};
			let priority = colors.priority(symbol.color).unwrap_or(usize::MAX);
			drawable.push((priority, id, &feature.geometry, symbol, Color::from(color.rgb)));
		}
		drawable.sort_by_key(|(priority, id, ..)| (Reverse(*priority), *id));

		let mut scene = Scene::new(
			request.view,
			request.width,
			request.height,
			request.transform.native_to_projected_affine(),
		)
		.with_background(request.background);
		let hairline = 1.0 / scene.pixels_per_native_unit();

		for (_, _, geometry, symbol, color) in drawable {
			if let Some(shape) = shape_for(geometry, symbol, color, hairline) {
				scene.push(shape);
			}
		}

		log::trace!(
			"scene {}x{} with {} shapes from {} candidates",
			request.width,
			request.height,
			scene.len(),
			request.objects.len()
		);
		Ok(scene)
	}
}

fn shape_for(geometry: &Geometry, symbol: &Symbol, color: Color, hairline: f64) -> Option<Shape> {
	let stroke_width = if symbol.line_width > 0.0 {
		symbol.line_width
	} else {
		hairline
	};
	let (outline, paint) = match (symbol.kind, geometry) {
		(SymbolKind::Area, Geometry::Polygon(rings)) => (
			Outline::Path {
				rings: rings.clone(),
				closed: true,
			},
			Paint {
				fill: Some(color),
				stroke: (symbol.line_width > 0.0).then_some(Stroke {
					color,
					width: symbol.line_width,
				}),
			},
		),
		(SymbolKind::Area, Geometry::LineString(line)) => (
			Outline::Path {
				rings: vec![line.clone()],
				closed: true,
			},
			Paint::fill(color),
		),
		(SymbolKind::Line, Geometry::LineString(line)) => (
			Outline::Path {
				rings: vec![line.clone()],
				closed: false,
			},
			Paint::stroke(color, stroke_width),
		),
		(SymbolKind::Line, Geometry::Polygon(rings)) => (
			Outline::Path {
				rings: rings.clone(),
				closed: true,
			},
			Paint::stroke(color, stroke_width),
		),
		(SymbolKind::Point, Geometry::Point(center)) => {
			let diameter = if symbol.size > 0.0 {
				symbol.size
			} else {
				FALLBACK_POINT_DIAMETER
			};
			(
				Outline::Circle {
					center: *center,
					radius: diameter / 2.0,
				},
				Paint::fill(color),
			)
		}
		(kind, geometry) => {
			log::trace!(
				"cannot draw a {} with the {kind:?} symbol {}",
				geometry.type_name(),
				symbol.number
			);
			return None;
		}
	};
	Some(Shape { outline, paint })
}
