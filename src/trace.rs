//! Recorded input traces and their replay.
//!
//! A trace is a TOML file with a `[[steps]]` array. Each step carries a
//! `kind` tag:
//!
//! ```toml
//! [[steps]]
//! kind = "touch"
//! action = "down"
//! pointers = [{ id = 0, x = 217.0, y = 547.0 }]
//!
//! [[steps]]
//! kind = "accelerometer"
//! values = [0.0, 0.0, 9.80665]
//! timestamp_ns = 16000000
//!
//! [[steps]]
//! kind = "hat"
//! x = 0.0
//! y = -1.0
//! ```

use crate::config::Orientation;
use crate::controller::{ButtonType, GamepadInput, StickType};
use crate::motion::SensorSample;
use crate::overlay::{OverlaySession, TouchFrame};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse trace: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceStep {
    Touch(TouchFrame),
    Accelerometer { values: [f32; 3], timestamp_ns: i64 },
    Gyroscope { values: [f32; 3], timestamp_ns: i64 },
    // physical pad samples
    Stick { stick: StickType, x: f32, y: f32 },
    Trigger { button: ButtonType, value: f32 },
    Hat { x: f32, y: f32 },
    Rotate { orientation: Orientation },
    ResetLayout,
    Edit { enabled: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputTrace {
    #[serde(default)]
    pub steps: Vec<TraceStep>,
}

impl InputTrace {
    pub fn parse(content: &str) -> Result<Self, TraceError> {
        Ok(toml::from_str(content)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let trace = Self::parse(&content)?;
        info!(
            "Loaded {} trace steps from {}",
            trace.steps.len(),
            path.as_ref().display()
        );
        Ok(trace)
    }
}

/// Counters gathered while replaying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub touch_frames: usize,
    pub redraws: usize,
    pub sensor_samples: usize,
    pub gamepad_samples: usize,
}

/// Feeds every step of `trace` to the overlay, in order.
pub fn replay(mut session: OverlaySession, trace: &InputTrace) -> (OverlaySession, ReplaySummary) {
    let mut summary = ReplaySummary::default();

    for step in &trace.steps {
        match step {
            TraceStep::Touch(frame) => {
                summary.touch_frames += 1;
                if session.handle_touch(frame) {
                    summary.redraws += 1;
                }
            }
            TraceStep::Accelerometer {
                values,
                timestamp_ns,
            } => {
                summary.sensor_samples += 1;
                session.handle_motion(SensorSample::Accelerometer {
                    values: *values,
                    timestamp_ns: *timestamp_ns,
                });
            }
            TraceStep::Gyroscope {
                values,
                timestamp_ns,
            } => {
                summary.sensor_samples += 1;
                session.handle_motion(SensorSample::Gyroscope {
                    values: *values,
                    timestamp_ns: *timestamp_ns,
                });
            }
            TraceStep::Stick { stick, x, y } => {
                summary.gamepad_samples += 1;
                session.handle_gamepad(GamepadInput::Stick {
                    stick: *stick,
                    x: *x,
                    y: *y,
                });
            }
            TraceStep::Trigger { button, value } => {
                summary.gamepad_samples += 1;
                session.handle_gamepad(GamepadInput::Trigger {
                    button: *button,
                    value: *value,
                });
            }
            TraceStep::Hat { x, y } => {
                summary.gamepad_samples += 1;
                session.handle_gamepad(GamepadInput::Hat { x: *x, y: *y });
            }
            TraceStep::Rotate { orientation } => session.set_orientation(*orientation),
            TraceStep::ResetLayout => {
                if let Err(e) = session.reset_layout() {
                    warn!("Layout reset was not persisted: {}", e);
                }
            }
            TraceStep::Edit { enabled } => session = session.set_editing(*enabled),
        }
    }

    (session, summary)
}
