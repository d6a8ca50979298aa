use glam::Vec3;

use crate::{Coefficients, WaveCommand, WaveError, WaveParams};

/// Relative slack when comparing accumulated time against the time step, so
/// that N frames of `dt / N` add up to one step despite float rounding.
const STEP_TOLERANCE: f32 = 1e-5;

/// A vibrating height field on a regular `rows x cols` grid.
///
/// The field owns two displacement buffers with alternating roles: `curr`
/// holds the displacement at the latest step and `prev` the one before it.
/// A step writes the new solution over `prev` and swaps the roles, so no
/// third buffer is ever allocated.
///
/// Only the interior cells are integrated. The boundary ring keeps its
/// initial zero displacement, and `disturb` refuses to touch it.
#[derive(Debug, Clone)]
pub struct WaveField {
    params: WaveParams,
    coefficients: Coefficients,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tangents_x: Vec<Vec3>,
    prev: Vec<f32>,
    curr: Vec<f32>,
    /// Elapsed time not yet consumed by a step.
    accumulated: f32,
    steps: u64,
}

impl WaveField {
    /// Build a flat field. Fails when the parameters are outside their domain.
    ///
    /// Parameters outside the stable regime are accepted (and logged); use
    /// [`WaveParams::check_stability`] to reject them up front.
    pub fn new(params: WaveParams) -> Result<Self, WaveError> {
        params.validate()?;

        let WaveParams {
            rows,
            cols,
            spatial_step: dx,
            ..
        } = params;
        let count = rows * cols;
        let half_width = 0.5 * params.width();
        let half_depth = 0.5 * params.depth();

        let mut positions = Vec::with_capacity(count);
        for i in 0..rows {
            let z = half_depth - i as f32 * dx;
            for j in 0..cols {
                let x = -half_width + j as f32 * dx;
                positions.push(Vec3::new(x, 0.0, z));
            }
        }

        let coefficients = params.coefficients();
        tracing::debug!(
            rows,
            cols,
            k1 = coefficients.k1,
            k2 = coefficients.k2,
            k3 = coefficients.k3,
            courant = params.courant_number(),
            "wave field created"
        );
        if !params.is_stable() {
            tracing::warn!(
                courant = params.courant_number(),
                "wave parameters are outside the stable regime; the field may diverge"
            );
        }

        Ok(Self {
            params,
            coefficients,
            positions,
            normals: vec![Vec3::Y; count],
            tangents_x: vec![Vec3::X; count],
            prev: vec![0.0; count],
            curr: vec![0.0; count],
            accumulated: 0.0,
            steps: 0,
        })
    }

    /// Positional form of [`WaveField::new`].
    pub fn with_dimensions(
        rows: usize,
        cols: usize,
        spatial_step: f32,
        time_step: f32,
        speed: f32,
        damping: f32,
    ) -> Result<Self, WaveError> {
        Self::new(WaveParams::new(
            rows,
            cols,
            spatial_step,
            time_step,
            speed,
            damping,
        ))
    }

    /// Rebuild a field by applying a recorded command sequence to a fresh field.
    pub fn replay(params: WaveParams, commands: &[WaveCommand]) -> Result<Self, WaveError> {
        let mut field = Self::new(params)?;
        for command in commands {
            field.apply(command)?;
        }
        Ok(field)
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    pub fn row_count(&self) -> usize {
        self.params.rows
    }

    pub fn column_count(&self) -> usize {
        self.params.cols
    }

    pub fn vertex_count(&self) -> usize {
        self.params.rows * self.params.cols
    }

    pub fn triangle_count(&self) -> usize {
        2 * (self.params.rows - 1) * (self.params.cols - 1)
    }

    pub fn width(&self) -> f32 {
        self.params.width()
    }

    pub fn depth(&self) -> f32 {
        self.params.depth()
    }

    /// Number of integration steps taken so far.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Elapsed time carried toward the next step.
    pub fn accumulated_time(&self) -> f32 {
        self.accumulated
    }

    pub fn position(&self, index: usize) -> Result<Vec3, WaveError> {
        self.check_index(index)?;
        Ok(self.positions[index])
    }

    pub fn normal(&self, index: usize) -> Result<Vec3, WaveError> {
        self.check_index(index)?;
        Ok(self.normals[index])
    }

    /// Unit tangent along +X at the vertex.
    pub fn tangent_x(&self, index: usize) -> Result<Vec3, WaveError> {
        self.check_index(index)?;
        Ok(self.tangents_x[index])
    }

    /// Current displacement at a grid cell.
    pub fn height(&self, row: usize, col: usize) -> Result<f32, WaveError> {
        let index = self.index_of(row, col)?;
        Ok(self.curr[index])
    }

    /// All vertex positions in row-major order.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Current displacement of every cell, row-major.
    pub fn heights(&self) -> &[f32] {
        &self.curr
    }

    /// Flattened index of a grid cell.
    pub fn index_of(&self, row: usize, col: usize) -> Result<usize, WaveError> {
        if row >= self.params.rows || col >= self.params.cols {
            return Err(self.cell_error(row, col));
        }
        Ok(row * self.params.cols + col)
    }

    /// True for cells off the boundary ring.
    pub fn is_interior(&self, row: usize, col: usize) -> bool {
        (1..self.params.rows - 1).contains(&row) && (1..self.params.cols - 1).contains(&col)
    }

    /// Drop an impulse of `magnitude` on an interior cell: half of it lands on
    /// the cell and a quarter on each of its four neighbors.
    ///
    /// A share that lands on the boundary ring stays there: the stencil never
    /// integrates those cells, so they hold the written value from then on.
    pub fn disturb(&mut self, row: usize, col: usize, magnitude: f32) -> Result<(), WaveError> {
        if !self.is_interior(row, col) {
            return Err(self.cell_error(row, col));
        }

        let half = 0.5 * magnitude;
        let quarter = 0.25 * magnitude;
        self.add_height(row, col, half);
        for (r, c) in [
            (row - 1, col),
            (row + 1, col),
            (row, col - 1),
            (row, col + 1),
        ] {
            self.add_height(r, c, quarter);
            if !self.is_interior(r, c) {
                // Both buffers, or the swap in `step` would undo the write.
                let idx = r * self.params.cols + c;
                self.prev[idx] += quarter;
            }
        }

        tracing::trace!(row, col, magnitude, "disturb");
        Ok(())
    }

    /// Feed elapsed wall-clock time. Takes at most one step per call, once the
    /// carried time reaches the time step; returns whether it stepped.
    ///
    /// Time beyond one step is carried into later calls, never caught up in a
    /// burst, so under sustained load the field runs behind real time.
    pub fn update(&mut self, elapsed: f32) -> bool {
        if !(elapsed.is_finite() && elapsed >= 0.0) {
            tracing::warn!(elapsed, "ignoring invalid elapsed time");
            return false;
        }

        self.accumulated += elapsed;
        let dt = self.params.time_step;
        if self.accumulated < dt - dt * STEP_TOLERANCE {
            return false;
        }
        self.accumulated -= dt;
        self.step();
        true
    }

    /// Integrate one time step unconditionally.
    pub fn step(&mut self) {
        let _span = tracing::trace_span!("wave_step", step = self.steps + 1).entered();

        let rows = self.params.rows;
        let cols = self.params.cols;
        let Coefficients { k1, k2, k3 } = self.coefficients;

        // The new solution overwrites `prev` in place: each cell of `prev`
        // is read only by its own update.
        let curr = &self.curr;
        let prev = &mut self.prev;
        for i in 1..rows - 1 {
            for j in 1..cols - 1 {
                let idx = i * cols + j;
                let neighbors = curr[idx + cols] + curr[idx - cols] + curr[idx + 1] + curr[idx - 1];
                prev[idx] = k1 * prev[idx] + k2 * curr[idx] + k3 * neighbors;
            }
        }
        std::mem::swap(&mut self.prev, &mut self.curr);

        self.refresh_vertices();
        self.steps += 1;
    }

    /// Apply a single recorded command.
    pub fn apply(&mut self, command: &WaveCommand) -> Result<(), WaveError> {
        match *command {
            WaveCommand::Disturb {
                row,
                col,
                magnitude,
            } => self.disturb(row, col, magnitude),
            WaveCommand::Update { elapsed } => {
                self.update(elapsed);
                Ok(())
            }
        }
    }

    /// Deterministic hash of the simulation state (FNV-1a over the step count,
    /// carried time and both displacement buffers).
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.steps.to_le_bytes());
        mix(&mut h, &self.accumulated.to_bits().to_le_bytes());
        for y in self.curr.iter().chain(&self.prev) {
            mix(&mut h, &y.to_bits().to_le_bytes());
        }
        h
    }

    fn add_height(&mut self, row: usize, col: usize, delta: f32) {
        let idx = row * self.params.cols + col;
        self.curr[idx] += delta;
        self.positions[idx].y = self.curr[idx];
    }

    /// Mirror displacements into positions and rebuild interior normals and
    /// tangents from central differences.
    fn refresh_vertices(&mut self) {
        for (p, &y) in self.positions.iter_mut().zip(&self.curr) {
            p.y = y;
        }

        let rows = self.params.rows;
        let cols = self.params.cols;
        let two_dx = 2.0 * self.params.spatial_step;
        for i in 1..rows - 1 {
            for j in 1..cols - 1 {
                let idx = i * cols + j;
                let l = self.curr[idx - 1];
                let r = self.curr[idx + 1];
                let t = self.curr[idx - cols];
                let b = self.curr[idx + cols];
                // Row 0 sits at +z, so (0, t - b, 2dx) points along +z and
                // the cross product with the +x tangent reduces to this.
                self.normals[idx] = Vec3::new(l - r, two_dx, b - t).normalize();
                self.tangents_x[idx] = Vec3::new(two_dx, r - l, 0.0).normalize();
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<(), WaveError> {
        let len = self.vertex_count();
        if index < len {
            Ok(())
        } else {
            Err(WaveError::IndexOutOfRange { index, len })
        }
    }

    fn cell_error(&self, row: usize, col: usize) -> WaveError {
        WaveError::CellOutOfRange {
            row,
            col,
            rows: self.params.rows,
            cols: self.params.cols,
        }
    }
}
