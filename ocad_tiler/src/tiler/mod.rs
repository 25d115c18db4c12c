//! The render orchestrator.
//!
//! A [`Tiler`] owns the spatial index of a map document and renders any projected extent at any
//! resolution. Each render looks up the candidate features, builds a vector scene with a
//! [`SceneRenderer`] and encodes it as a raster image, SVG, PDF or GeoJSON, either into a file
//! or into a buffer.

mod engine;
mod options;
mod output;
mod scene_renderer;
mod write;

pub use engine::Tiler;
pub use options::{Artifact, DEFAULT_BUFFER_PX, RenderOptions, RenderTarget};
pub use output::OutputKind;
pub use scene_renderer::{SceneRenderer, SceneRequest, SymbolSceneRenderer};
pub use write::{write_atomic, write_new};

#[cfg(test)]
pub(crate) mod testing;
