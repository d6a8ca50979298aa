//! Rendering adapter: turns a wave field into data a GPU renderer can upload.
//!
//! # Invariants
//! - Renderers read the field; they never mutate it.
//! - Index topology depends only on the grid dimensions and is built once.
//!
//! Texture loading, pipelines and draw submission live in the host renderer.

mod mesh;
mod renderer;

pub use mesh::{MeshBuilder, RenderError, SurfaceMesh, WaveVertex, grid_indices, grid_indices_u16};
pub use renderer::{DebugTextRenderer, MeshRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "ripple-render v0.1.0"
}
