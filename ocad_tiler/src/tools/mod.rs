pub mod render;
pub mod tiles;
