use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use ripple_waves::WaveField;

/// One recorded frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Wall-clock cost of the frame.
    pub cost: Duration,
    /// The field took an integration step during the frame.
    pub stepped: bool,
    /// Time left in the field's accumulator after the frame.
    pub lag: f32,
}

/// Rolling record of recent frames against the field's fixed time step.
///
/// Tracks what the frame cost, how often the field actually stepped, and how
/// much simulated time was left waiting in the accumulator. A lag that keeps
/// growing means the caller feeds time faster than one step per frame can
/// consume it.
#[derive(Debug)]
pub struct StepTimer {
    samples: VecDeque<FrameSample>,
    capacity: usize,
    time_step: f32,
}

impl StepTimer {
    /// Keep the last `capacity` frames (at least one) of `field`'s run.
    pub fn new(field: &WaveField, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            time_step: field.params().time_step,
        }
    }

    /// Record a frame that just finished updating `field`.
    pub fn record(&mut self, field: &WaveField, cost: Duration, stepped: bool) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(FrameSample {
            cost,
            stepped,
            lag: field.accumulated_time(),
        });
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn latest(&self) -> Option<&FrameSample> {
        self.samples.back()
    }

    pub fn average_cost(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().map(|s| s.cost).sum();
        total / self.samples.len() as u32
    }

    pub fn max_cost(&self) -> Duration {
        self.samples
            .iter()
            .map(|s| s.cost)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Fraction of recorded frames that stepped, in `[0, 1]`.
    pub fn step_ratio(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let stepped = self.samples.iter().filter(|s| s.stepped).count();
        stepped as f32 / self.samples.len() as f32
    }

    /// Largest accumulator backlog seen, in time steps.
    pub fn max_lag_steps(&self) -> f32 {
        self.samples
            .iter()
            .map(|s| s.lag / self.time_step)
            .fold(0.0, f32::max)
    }

    /// Average wall-clock cost per step taken; zero when nothing stepped.
    pub fn cost_per_step(&self) -> Duration {
        let steps = self.samples.iter().filter(|s| s.stepped).count();
        if steps == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().map(|s| s.cost).sum();
        total / steps as u32
    }
}

impl fmt::Display for StepTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames={} stepped={:.0}% cost avg={:?} max={:?} per-step={:?} lag<={:.2} steps",
            self.count(),
            100.0 * self.step_ratio(),
            self.average_cost(),
            self.max_cost(),
            self.cost_per_step(),
            self.max_lag_steps()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.03;

    fn field() -> WaveField {
        WaveField::with_dimensions(8, 8, 1.0, DT, 4.0, 0.2).unwrap()
    }

    fn run(timer: &mut StepTimer, field: &mut WaveField, elapsed: f32, cost_ms: u64) {
        let stepped = field.update(elapsed);
        timer.record(field, Duration::from_millis(cost_ms), stepped);
    }

    #[test]
    fn tracks_cost_and_step_ratio() {
        let mut f = field();
        let mut timer = StepTimer::new(&f, 8);
        // Half-step frames: every second frame steps.
        for cost in [10, 20, 30, 40] {
            run(&mut timer, &mut f, DT / 2.0, cost);
        }
        assert_eq!(timer.count(), 4);
        assert_eq!(timer.average_cost(), Duration::from_millis(25));
        assert_eq!(timer.max_cost(), Duration::from_millis(40));
        assert_eq!(timer.step_ratio(), 0.5);
        assert_eq!(timer.cost_per_step(), Duration::from_millis(50));
        assert!(timer.latest().unwrap().stepped);
        assert_eq!(f.step_count(), 2);
    }

    #[test]
    fn keeps_only_the_newest_frames() {
        let mut f = field();
        let mut timer = StepTimer::new(&f, 2);
        run(&mut timer, &mut f, 0.0, 10);
        run(&mut timer, &mut f, 0.0, 20);
        run(&mut timer, &mut f, 0.0, 30);
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average_cost(), Duration::from_millis(25));
        assert_eq!(timer.step_ratio(), 0.0);
        assert_eq!(timer.cost_per_step(), Duration::ZERO);
    }

    #[test]
    fn lag_grows_when_frames_outrun_the_step() {
        let mut f = field();
        let mut timer = StepTimer::new(&f, 16);
        for _ in 0..10 {
            run(&mut timer, &mut f, 2.0 * DT, 1);
        }
        // Each frame brings two steps of time and consumes one.
        assert_eq!(timer.step_ratio(), 1.0);
        assert!((timer.max_lag_steps() - 10.0).abs() < 1e-3);
        assert!((timer.latest().unwrap().lag - 10.0 * DT).abs() < 1e-4);
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = StepTimer::new(&field(), 0);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average_cost(), Duration::ZERO);
        assert_eq!(timer.max_cost(), Duration::ZERO);
        assert_eq!(timer.step_ratio(), 0.0);
        assert_eq!(timer.max_lag_steps(), 0.0);
        assert!(timer.latest().is_none());
        assert!(timer.to_string().starts_with("frames=0"));
    }
}
