use bytemuck::{Pod, Zeroable};
use ripple_waves::WaveField;

/// Errors from mesh construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("{vertex_count} vertices do not fit {bits}-bit indices")]
    TooManyVertices { vertex_count: usize, bits: u32 },
    #[error("mesh built for a {expected_rows}x{expected_cols} grid, field is {rows}x{cols}")]
    TopologyMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },
}

/// GPU vertex layout of the water surface.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct WaveVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// Triangle-list indices over the `(rows-1) x (cols-1)` quads of a grid.
///
/// Each quad `(i, j)` yields `(i*n+j, i*n+j+1, (i+1)*n+j)` and
/// `((i+1)*n+j, i*n+j+1, (i+1)*n+j+1)`.
pub fn grid_indices(rows: usize, cols: usize) -> Vec<u32> {
    quad_indices(rows, cols, |i| i as u32)
}

/// 16-bit variant of [`grid_indices`] for grids with fewer than 65535 vertices.
pub fn grid_indices_u16(rows: usize, cols: usize) -> Result<Vec<u16>, RenderError> {
    let vertex_count = rows * cols;
    if vertex_count >= u16::MAX as usize {
        return Err(RenderError::TooManyVertices {
            vertex_count,
            bits: 16,
        });
    }
    Ok(quad_indices(rows, cols, |i| i as u16))
}

fn quad_indices<T>(rows: usize, cols: usize, convert: impl Fn(usize) -> T) -> Vec<T> {
    let quads = rows.saturating_sub(1) * cols.saturating_sub(1);
    let mut indices = Vec::with_capacity(6 * quads);
    for i in 0..rows.saturating_sub(1) {
        for j in 0..cols.saturating_sub(1) {
            let top = i * cols + j;
            let bottom = (i + 1) * cols + j;
            indices.extend([top, top + 1, bottom, bottom, top + 1, bottom + 1].map(&convert));
        }
    }
    indices
}

/// A drawable surface: per-frame vertices plus static indices.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMesh {
    pub vertices: Vec<WaveVertex>,
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex bytes for a dynamic vertex buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Builds a [`SurfaceMesh`] for one grid size and refreshes its vertices from
/// the field every frame. The index list is computed once at creation.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    rows: usize,
    cols: usize,
    mesh: SurfaceMesh,
}

impl MeshBuilder {
    pub fn new(field: &WaveField) -> Self {
        let rows = field.row_count();
        let cols = field.column_count();
        let indices = grid_indices(rows, cols);
        tracing::debug!(
            rows,
            cols,
            triangles = indices.len() / 3,
            "built surface index buffer"
        );
        Self {
            rows,
            cols,
            mesh: SurfaceMesh {
                vertices: Vec::with_capacity(field.vertex_count()),
                indices,
            },
        }
    }

    /// Rewrite the vertex array from the field's current state.
    pub fn update(&mut self, field: &WaveField) -> Result<&SurfaceMesh, RenderError> {
        if field.row_count() != self.rows || field.column_count() != self.cols {
            return Err(RenderError::TopologyMismatch {
                expected_rows: self.rows,
                expected_cols: self.cols,
                rows: field.row_count(),
                cols: field.column_count(),
            });
        }
        write_vertices(field, &mut self.mesh.vertices);
        Ok(&self.mesh)
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }
}

/// Fill `out` with one vertex per grid point. Texture coordinates map the
/// surface extent `[-w/2, w/2] x [-d/2, d/2]` onto `[0, 1]^2`.
pub(crate) fn write_vertices(field: &WaveField, out: &mut Vec<WaveVertex>) {
    let width = field.width();
    let depth = field.depth();
    out.clear();
    out.extend(
        field
            .positions()
            .iter()
            .zip(field.normals())
            .map(|(p, n)| WaveVertex {
                position: p.to_array(),
                normal: n.to_array(),
                tex_coord: [0.5 + p.x / width, 0.5 - p.z / depth],
            }),
    );
}
