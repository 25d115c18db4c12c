//! The map document model: features, symbols, colors and the reference system.

mod color;
mod document;
mod feature;
pub mod geojson;
mod geometry;
mod map_file;
mod symbol;
#[cfg(any(test, feature = "test"))]
pub mod testing;

pub use color::{ColorTable, MapColor};
pub use document::MapDocument;
pub use feature::{Feature, FeatureFilter};
pub use geometry::Geometry;
pub use map_file::MapFile;
pub use symbol::{Symbol, SymbolId, SymbolKind, SymbolTable};
