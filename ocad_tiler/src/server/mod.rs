//! The on-demand tile server.

mod handlers;
mod tile_cache;
mod tile_server;

pub use tile_cache::TileCache;
pub use tile_server::TileServer;
