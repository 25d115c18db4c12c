//! Coordinate spaces, tile grid math and the spatial index shared by all ocad_tiler crates.
//!
//! Three coordinate spaces are involved: native drawing units of the map document, projected
//! meters of the map's reference system, and pixels at a given resolution (meters per pixel).

mod concurrency;
mod error;
pub mod progress;
mod spatial_index;
mod transform;
mod types;

pub use concurrency::ConcurrencyLimits;
pub use error::ConfigError;
pub use spatial_index::{IndexedBox, SpatialIndex};
pub use transform::CoordTransform;
pub use types::*;
