use serde::{Deserialize, Serialize};

use crate::WaveError;

/// Largest Courant number the explicit 5-point scheme tolerates in 2-D.
pub const COURANT_LIMIT: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Grid and physical parameters of a wave field. Fixed for the field's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    /// Number of grid rows (`m`).
    pub rows: usize,
    /// Number of grid columns (`n`).
    pub cols: usize,
    /// Distance between neighboring grid points.
    pub spatial_step: f32,
    /// Fixed simulation time step in seconds.
    pub time_step: f32,
    /// Wave propagation speed.
    pub speed: f32,
    /// Damping coefficient. Zero means no dissipation.
    pub damping: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            rows: 128,
            cols: 128,
            spatial_step: 1.0,
            time_step: 0.03,
            speed: 4.0,
            damping: 0.2,
        }
    }
}

/// The three update weights of the damped wave recurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Weight of the previous displacement.
    pub k1: f32,
    /// Weight of the current displacement.
    pub k2: f32,
    /// Weight of the sum of the four neighbor displacements.
    pub k3: f32,
}

impl WaveParams {
    pub fn new(
        rows: usize,
        cols: usize,
        spatial_step: f32,
        time_step: f32,
        speed: f32,
        damping: f32,
    ) -> Self {
        Self {
            rows,
            cols,
            spatial_step,
            time_step,
            speed,
            damping,
        }
    }

    /// Check the parameter domain. Does not check stability.
    pub fn validate(&self) -> Result<(), WaveError> {
        if self.rows < 3 {
            return Err(WaveError::invalid(
                "rows",
                format!("must be at least 3, got {}", self.rows),
            ));
        }
        if self.cols < 3 {
            return Err(WaveError::invalid(
                "cols",
                format!("must be at least 3, got {}", self.cols),
            ));
        }
        positive("spatial_step", self.spatial_step)?;
        positive("time_step", self.time_step)?;
        positive("speed", self.speed)?;
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(WaveError::invalid(
                "damping",
                format!("must be non-negative and finite, got {}", self.damping),
            ));
        }
        if self.rows.checked_mul(self.cols).is_none() {
            return Err(WaveError::invalid(
                "rows",
                format!("{}x{} grid overflows the vertex count", self.rows, self.cols),
            ));
        }
        Ok(())
    }

    /// Derive the finite-difference weights of the damped wave equation
    /// `y_tt = c^2 * laplacian(y) - damping * y_t`.
    pub fn coefficients(&self) -> Coefficients {
        let dt = self.time_step;
        let d = self.damping * dt + 2.0;
        let e = (self.speed * self.speed * dt * dt) / (self.spatial_step * self.spatial_step);
        Coefficients {
            k1: (self.damping * dt - 2.0) / d,
            k2: (4.0 - 8.0 * e) / d,
            k3: (2.0 * e) / d,
        }
    }

    /// `speed * time_step / spatial_step`.
    pub fn courant_number(&self) -> f32 {
        self.speed * self.time_step / self.spatial_step
    }

    pub fn is_stable(&self) -> bool {
        self.courant_number() < COURANT_LIMIT
    }

    /// Opt-in stability check. Construction never calls this, so parameter
    /// sets outside the stable regime can still be built and observed.
    pub fn check_stability(&self) -> Result<(), WaveError> {
        let courant = self.courant_number();
        if courant < COURANT_LIMIT {
            Ok(())
        } else {
            Err(WaveError::Unstable {
                courant,
                limit: COURANT_LIMIT,
            })
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn width(&self) -> f32 {
        (self.cols - 1) as f32 * self.spatial_step
    }

    pub fn depth(&self) -> f32 {
        (self.rows - 1) as f32 * self.spatial_step
    }
}

/// `is_finite` first so NaN falls through to the error.
fn positive(name: &'static str, value: f32) -> Result<(), WaveError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WaveError::invalid(
            name,
            format!("must be positive and finite, got {value}"),
        ))
    }
}
