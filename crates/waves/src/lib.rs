//! Wave field: a damped height-field simulation on a regular grid.
//!
//! The field integrates `y_tt = c^2 * laplacian(y) - damping * y_t` with an
//! explicit 5-point finite-difference scheme at a fixed time step, and exposes
//! the vertex positions, normals and grid topology a renderer needs.
//!
//! # Invariants
//! - Grid topology and the x/z layout never change after construction.
//! - The stencil never integrates the boundary ring; a border cell changes only
//!   when a `disturb` next to it writes its quarter share.
//! - All state mutations flow through `disturb`, `update` and `step`; the same
//!   inputs reproduce the same state bit for bit.

mod command;
mod error;
mod field;
mod params;

pub use command::WaveCommand;
pub use error::WaveError;
pub use field::WaveField;
pub use params::{COURANT_LIMIT, Coefficients, WaveParams};

pub fn crate_info() -> &'static str {
    "ripple-waves v0.1.0"
}
