use crate::controller::{ControllerEvent, DeviceId};
use serde::{Deserialize, Serialize};
use tracing::trace;

// Standard gravity in m/s^2
pub const GRAVITY_EARTH: f32 = 9.80665;

// Raw gyroscope rad/s to the console's gyro units
pub const GYRO_DESCALE: f32 = 12.0;

// Devices that receive every motion event, in emission order
pub const MOTION_DEVICES: [DeviceId; 2] = [DeviceId::Player1, DeviceId::Console];

/// Raw sample as delivered by the platform sensor API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SensorSample {
    Accelerometer { values: [f32; 3], timestamp_ns: i64 },
    Gyroscope { values: [f32; 3], timestamp_ns: i64 },
}

/// Turns accelerometer and gyroscope samples into motion events.
///
/// The accelerometer paces the output: each accelerometer sample emits one
/// event per device in [`MOTION_DEVICES`], carrying whatever gyro vector was
/// cached last. Gyro samples only update that cache.
#[derive(Debug, Clone, Default)]
pub struct MotionRouter {
    gyro: [f32; 3],
    accel: [f32; 3],
    last_timestamp_ns: Option<i64>,
}

impl MotionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gyro(&self) -> [f32; 3] {
        self.gyro
    }

    pub fn accel(&self) -> [f32; 3] {
        self.accel
    }

    pub fn on_sample(&mut self, sample: SensorSample) -> Option<[ControllerEvent; 2]> {
        match sample {
            SensorSample::Gyroscope { values, .. } => {
                self.gyro = [
                    values[1] / GYRO_DESCALE,
                    -values[0] / GYRO_DESCALE,
                    values[2] / GYRO_DESCALE,
                ];
                None
            }
            SensorSample::Accelerometer {
                values,
                timestamp_ns,
            } => {
                self.accel = [
                    -values[1] / GRAVITY_EARTH,
                    values[0] / GRAVITY_EARTH,
                    -values[2] / GRAVITY_EARTH,
                ];

                // first sample has nothing to measure against
                let delta_us = self
                    .last_timestamp_ns
                    .map(|last| timestamp_ns.saturating_sub(last) / 1000)
                    .unwrap_or(0);
                self.last_timestamp_ns = Some(timestamp_ns);
                trace!("Motion delta {}us", delta_us);

                Some(MOTION_DEVICES.map(|device| ControllerEvent::Motion {
                    device,
                    delta_timestamp_us: delta_us,
                    gyro: self.gyro,
                    accel: self.accel,
                }))
            }
        }
    }
}
