use serde::{Deserialize, Serialize};

/// A caller input to a wave field, recorded for deterministic replay.
///
/// Replaying the same command sequence against the same parameters yields a
/// field with an identical [`state_hash`](crate::WaveField::state_hash).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WaveCommand {
    /// Impulse on an interior cell.
    Disturb { row: usize, col: usize, magnitude: f32 },
    /// Elapsed frame time fed to the fixed-step integrator.
    Update { elapsed: f32 },
}
