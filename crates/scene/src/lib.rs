//! Water scene: the per-frame driver around a wave field.
//!
//! Owns the caller-side policy the simulation itself stays free of: a seeded
//! "rain" that disturbs a random interior cell at a fixed interval, scene
//! configuration files, and optional command recording for replay.
//!
//! # Invariants
//! - At most one disturbance per frame, always before that frame's update.
//! - The same configuration and frame times reproduce the same field.

mod config;
mod rain;
mod scene;

pub use config::{ConfigError, SceneConfig};
pub use rain::{Rain, RainConfig, RainError, Raindrop, SplitMix64};
pub use scene::{FrameReport, WaterScene};

pub fn crate_info() -> &'static str {
    "ripple-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
