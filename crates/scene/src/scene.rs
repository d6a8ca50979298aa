use ripple_waves::{WaveCommand, WaveError, WaveField};

use crate::config::{ConfigError, SceneConfig};
use crate::rain::{Rain, Raindrop};

/// What happened during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// The field took an integration step.
    pub stepped: bool,
    /// Disturbance applied before the update, if one was due.
    pub raindrop: Option<Raindrop>,
}

/// A wave field plus the rain that keeps it moving.
#[derive(Debug, Clone)]
pub struct WaterScene {
    config: SceneConfig,
    field: WaveField,
    rain: Rain,
    total_time: f64,
    frames: u64,
    commands: Vec<WaveCommand>,
}

impl WaterScene {
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = WaveField::new(config.waves)?;
        Ok(Self {
            rain: Rain::new(config.rain),
            config,
            field,
            total_time: 0.0,
            frames: 0,
            commands: Vec::new(),
        })
    }

    /// Advance one frame: drop rain if due, then feed `elapsed` to the field.
    pub fn frame(&mut self, elapsed: f32) -> FrameReport {
        if !(elapsed.is_finite() && elapsed >= 0.0) {
            tracing::warn!(elapsed, "skipping frame with invalid elapsed time");
            return FrameReport::default();
        }
        self.total_time += f64::from(elapsed);
        self.frames += 1;

        let raindrop = self
            .rain
            .poll(
                self.total_time,
                self.field.row_count(),
                self.field.column_count(),
            )
            .and_then(|drop| self.drop_rain(drop));

        self.record(WaveCommand::Update { elapsed });
        let stepped = self.field.update(elapsed);
        FrameReport { stepped, raindrop }
    }

    pub fn field(&self) -> &WaveField {
        &self.field
    }

    /// Scene time in seconds (sum of all accepted frame times).
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Commands recorded so far; empty unless `record_commands` is set.
    pub fn commands(&self) -> &[WaveCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<WaveCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Rebuild the field from the recorded commands.
    pub fn replay(&self) -> Result<WaveField, WaveError> {
        WaveField::replay(self.config.waves, &self.commands)
    }

    /// Disturb the field with a drop; `None` when the field rejects it.
    fn drop_rain(&mut self, drop: Raindrop) -> Option<Raindrop> {
        let command = WaveCommand::Disturb {
            row: drop.row,
            col: drop.col,
            magnitude: drop.magnitude,
        };
        match self.field.apply(&command) {
            Ok(()) => {
                tracing::debug!(
                    row = drop.row,
                    col = drop.col,
                    magnitude = drop.magnitude,
                    "raindrop"
                );
                self.record(command);
                Some(drop)
            }
            Err(e) => {
                tracing::warn!("raindrop rejected: {e}");
                None
            }
        }
    }

    fn record(&mut self, command: WaveCommand) {
        if self.config.record_commands {
            self.commands.push(command);
        }
    }
}
