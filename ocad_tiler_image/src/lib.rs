//! Drawing map scenes: colors, vector scenes, rasterization, raster encoders and PDF export.

mod color;
pub mod format;
pub mod pdf;
mod raster;
mod scene;

pub use color::{Color, parse_hex_color};
pub use format::RasterFormat;
pub use pdf::{Orientation, PageSize, PdfPage, scene_to_pdf};
pub use raster::{Rasterizer, ResvgRasterizer};
pub use scene::{Outline, Paint, Scene, Shape, Stroke};
