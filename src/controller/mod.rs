//! Canonical controller vocabulary shared by every input source
//!
//! 1. [`event`] - Button, stick and device ids plus the [`event::ControllerEvent`] type
//! 2. [`sink`] - Delivery of events to the emulation core
//! 3. [`gamepad`] - Translation of physical gamepad axes
//!
//! # Architecture
//!
//! ```text
//! Overlay widgets ──┐
//! Motion router ────┼──► ControllerEvent ──► EventSink ──► emulation core
//! Physical pad ─────┘
//! ```

pub mod event;
pub mod gamepad;
pub mod sink;

pub use event::{ButtonState, ButtonType, ControllerEvent, DeviceId, StickType};
pub use gamepad::{GamepadInput, GamepadTranslator};
pub use sink::EventSink;
