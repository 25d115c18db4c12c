//! Run configuration.
//!
//! A YAML file can preset every option of the command line tools. It is split into sections:
//! - [`RenderConfig`] (`render:`): resolution, bounds and styling shared by all outputs
//! - [`TilesConfig`] (`tiles:`): zoom levels, tile size and worker count of a pyramid
//! - [`ServerConfig`] (`server:`): address of the on-demand tile server
//! - [`PdfConfig`] (`pdf:`): page setup for PDF output
//!
//! Command line flags override file settings field by field.

mod main;
mod pdf;
mod render;
mod server;
mod tiles;

pub use main::Config;
pub use pdf::PdfConfig;
pub use render::RenderConfig;
pub use server::ServerConfig;
pub use tiles::TilesConfig;
