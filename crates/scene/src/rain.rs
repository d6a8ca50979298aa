use serde::{Deserialize, Serialize};

/// Splitmix64: a small, fast deterministic PRNG. Identical seeds give
/// identical streams on every platform.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform integer in `[lo, hi]`. Requires `lo <= hi`.
    pub fn range_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        debug_assert!(lo <= hi);
        let span = (hi - lo) as u64 + 1;
        lo + (self.next_u64() % span) as usize
    }

    /// Uniform float in `[lo, hi)`.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

/// Settings of the periodic random disturbance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub enabled: bool,
    /// Seconds of scene time between drops.
    pub interval: f32,
    /// Rows/columns kept clear of drops along each edge.
    pub margin: usize,
    pub min_magnitude: f32,
    pub max_magnitude: f32,
    pub seed: u64,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 0.25,
            margin: 4,
            min_magnitude: 0.2,
            max_magnitude: 0.5,
            seed: 42,
        }
    }
}

/// Rain settings outside their domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RainError {
    #[error("interval must be positive and finite, got {0}")]
    Interval(f32),
    #[error("magnitudes must be finite, got [{min}, {max}]")]
    NonFiniteMagnitude { min: f32, max: f32 },
    #[error("min_magnitude {min} exceeds max_magnitude {max}")]
    InvertedMagnitudes { min: f32, max: f32 },
}

impl RainConfig {
    pub fn validate(&self) -> Result<(), RainError> {
        let (min, max) = (self.min_magnitude, self.max_magnitude);
        if !(self.interval.is_finite() && self.interval > 0.0) {
            return Err(RainError::Interval(self.interval));
        }
        if !(min.is_finite() && max.is_finite()) {
            return Err(RainError::NonFiniteMagnitude { min, max });
        }
        if min > max {
            return Err(RainError::InvertedMagnitudes { min, max });
        }
        Ok(())
    }
}

/// One scheduled disturbance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raindrop {
    pub row: usize,
    pub col: usize,
    pub magnitude: f32,
}

/// Drops a random disturbance every `interval` seconds of scene time.
///
/// The schedule advances by exactly one interval per drop and at most one
/// drop is produced per poll, so a long frame delays later drops instead of
/// producing a burst.
#[derive(Debug, Clone)]
pub struct Rain {
    config: RainConfig,
    rng: SplitMix64,
    /// Scene time of the last scheduled drop.
    last_drop: f64,
}

impl Rain {
    pub fn new(config: RainConfig) -> Self {
        Self {
            config,
            rng: SplitMix64::new(config.seed),
            last_drop: 0.0,
        }
    }

    /// Produce a drop if an interval has elapsed since the last one.
    pub fn poll(&mut self, total_time: f64, rows: usize, cols: usize) -> Option<Raindrop> {
        if !self.config.enabled {
            return None;
        }
        let interval = f64::from(self.config.interval);
        if total_time - self.last_drop < interval {
            return None;
        }
        self.last_drop += interval;

        let (row_lo, row_hi) = self.span(rows);
        let (col_lo, col_hi) = self.span(cols);
        let row = self.rng.range_inclusive(row_lo, row_hi);
        let col = self.rng.range_inclusive(col_lo, col_hi);
        let magnitude = self
            .rng
            .range_f32(self.config.min_magnitude, self.config.max_magnitude);
        Some(Raindrop {
            row,
            col,
            magnitude,
        })
    }

    /// Inclusive index range for one axis: `[margin, len-1-margin]`, or the
    /// whole interior `[1, len-2]` when the margin leaves nothing.
    fn span(&self, len: usize) -> (usize, usize) {
        let margin = self.config.margin.max(1);
        if len > 2 * margin {
            (margin, len - 1 - margin)
        } else {
            (1, len.saturating_sub(2).max(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix_is_deterministic() {
        let mut a = SplitMix64::new(7);
        let mut b = SplitMix64::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        assert_ne!(SplitMix64::new(1).next_u64(), SplitMix64::new(2).next_u64());
    }

    #[test]
    fn splitmix_ranges() {
        let mut rng = SplitMix64::new(3);
        for _ in 0..1000 {
            let u = rng.next_f32();
            assert!((0.0..1.0).contains(&u));
            let i = rng.range_inclusive(4, 6);
            assert!((4..=6).contains(&i));
            let m = rng.range_f32(0.2, 0.5);
            assert!((0.2..=0.5).contains(&m));
        }
        assert_eq!(rng.range_inclusive(5, 5), 5);
    }

    #[test]
    fn drops_once_per_interval() {
        let mut rain = Rain::new(RainConfig::default());
        assert!(rain.poll(0.1, 128, 128).is_none());
        assert!(rain.poll(0.25, 128, 128).is_some());
        assert!(rain.poll(0.3, 128, 128).is_none());
        assert!(rain.poll(0.5, 128, 128).is_some());
    }

    #[test]
    fn long_gap_yields_one_drop_per_poll() {
        let mut rain = Rain::new(RainConfig::default());
        // One second late: four drops are owed, one per poll.
        let drops = (0..6).filter(|_| rain.poll(1.0, 128, 128).is_some()).count();
        assert_eq!(drops, 4);
    }

    #[test]
    fn drops_respect_the_margin() {
        let mut rain = Rain::new(RainConfig::default());
        for k in 1..=400 {
            let drop = rain.poll(k as f64 * 0.25, 32, 20).unwrap();
            assert!((4..=27).contains(&drop.row), "row {}", drop.row);
            assert!((4..=15).contains(&drop.col), "col {}", drop.col);
            assert!((0.2..=0.5).contains(&drop.magnitude));
        }
    }

    #[test]
    fn small_grids_fall_back_to_the_interior() {
        let mut rain = Rain::new(RainConfig::default());
        for k in 1..=200 {
            let drop = rain.poll(k as f64 * 0.25, 8, 3).unwrap();
            assert!((1..=6).contains(&drop.row));
            assert_eq!(drop.col, 1);
        }
    }

    #[test]
    fn disabled_rain_never_drops() {
        let mut rain = Rain::new(RainConfig {
            enabled: false,
            ..RainConfig::default()
        });
        assert!(rain.poll(100.0, 128, 128).is_none());
    }

    #[test]
    fn validate_rejects_bad_settings() {
        assert!(RainConfig::default().validate().is_ok());
        let bad_interval = RainConfig {
            interval: 0.0,
            ..RainConfig::default()
        };
        assert_eq!(bad_interval.validate(), Err(RainError::Interval(0.0)));
        let inverted = RainConfig {
            min_magnitude: 0.6,
            max_magnitude: 0.5,
            ..RainConfig::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(RainError::InvertedMagnitudes { min: 0.6, max: 0.5 })
        );
        let infinite = RainConfig {
            max_magnitude: f32::INFINITY,
            ..RainConfig::default()
        };
        assert!(matches!(
            infinite.validate(),
            Err(RainError::NonFiniteMagnitude { .. })
        ));
    }
}
