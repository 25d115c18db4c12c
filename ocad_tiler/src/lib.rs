//! Renders orienteering map documents to images, vector files and tile pyramids, and serves
//! tiles on demand over HTTP.

pub mod config;
pub mod pyramid;
pub mod server;
pub mod tiler;
