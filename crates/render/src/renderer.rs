use std::fmt::Write as _;

use ripple_waves::WaveField;

use crate::mesh::{SurfaceMesh, WaveVertex, grid_indices, write_vertices};

/// View configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Sample every `stride`-th row and column.
    pub stride: usize,
    /// Displacement that maps to the top of the shading ramp.
    pub height_scale: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            stride: 8,
            height_scale: 0.5,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the field and a view configuration, then produces
/// output. It never mutates the field.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given field and view.
    fn render(&self, field: &WaveField, view: &RenderView) -> Self::Output;
}

/// Produces a complete [`SurfaceMesh`] per frame. Stateless; prefer
/// [`MeshBuilder`](crate::MeshBuilder) when the index list can be reused.
#[derive(Debug, Default)]
pub struct MeshRenderer;

impl Renderer for MeshRenderer {
    type Output = SurfaceMesh;

    fn render(&self, field: &WaveField, _view: &RenderView) -> SurfaceMesh {
        let mut vertices: Vec<WaveVertex> = Vec::with_capacity(field.vertex_count());
        write_vertices(field, &mut vertices);
        SurfaceMesh {
            vertices,
            indices: grid_indices(field.row_count(), field.column_count()),
        }
    }
}

/// Text renderer: a header line plus a coarse ASCII height map.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

/// Shading ramp from trough to crest.
const RAMP: &[u8] = b" .:-=+*#@";

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn shade(height: f32, scale: f32) -> char {
        let t = if scale > 0.0 {
            (0.5 + 0.5 * height / scale).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let idx = (t * (RAMP.len() - 1) as f32).round() as usize;
        RAMP[idx] as char
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, field: &WaveField, view: &RenderView) -> String {
        let stride = view.stride.max(1);
        let heights = field.heights();
        let (min, max) = heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &y| {
                (lo.min(y), hi.max(y))
            });

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Wave Field (step={}, {}x{}) ===",
            field.step_count(),
            field.row_count(),
            field.column_count()
        );
        let _ = writeln!(
            out,
            "Extent: {:.1} x {:.1}  height range: [{:.4}, {:.4}]",
            field.width(),
            field.depth(),
            min,
            max
        );

        let cols = field.column_count();
        for row in (0..field.row_count()).step_by(stride) {
            let line: String = (0..cols)
                .step_by(stride)
                .map(|col| Self::shade(heights[row * cols + col], view.height_scale))
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out
    }
}
