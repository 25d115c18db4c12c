mod blob;
mod extent;
mod reference_system;
mod tile_bounds;
mod tile_coord;
mod tile_pyramid;
mod zoom_levels;

pub use blob::*;
pub use extent::*;
pub use reference_system::*;
pub use tile_bounds::*;
pub use tile_coord::*;
pub use tile_pyramid::*;
pub use zoom_levels::*;
