//! Batch generation of tile pyramids.
//!
//! Tiles live at `{output}/{zoom}/{col}/{row}.png` and are rendered most detailed level first.
//! Each tile is an independent render, so a bounded pool of blocking tasks works through them.

mod generator;
mod index_page;
mod tile;

pub use generator::{GenerationSummary, Phase, PyramidGenerator};
pub use index_page::{fill_template, render_index_page};
pub use tile::{TileOutcome, render_tile, tile_path};
