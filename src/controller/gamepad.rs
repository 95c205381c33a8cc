//! Physical gamepad axes translated into the same event vocabulary as the overlay.
//!
//! Sticks get a radial deadzone, analog triggers and hat axes are turned into
//! plain button presses.

use super::event::{ButtonState, ButtonType, ControllerEvent, DeviceId, StickType};
use tracing::debug;

// Radius below which a stick reads as centered
pub const STICK_DEADZONE: f32 = 0.15;

// Axis value above which an axis counts as a pressed button
pub const AXIS_PRESS_THRESHOLD: f32 = 0.5;

/// Applies the radial deadzone and normalizes the stick vector.
///
/// Output starts at zero on the deadzone edge and never leaves the unit
/// circle. `y` is returned in raw device orientation (down is positive).
pub fn stick_state(x: f32, y: f32) -> (f32, f32) {
    let r = (x * x + y * y).sqrt();
    if r <= STICK_DEADZONE {
        return (0.0, 0.0);
    }

    let factor = 1.0 / r * (r - STICK_DEADZONE) / (1.0 - STICK_DEADZONE);
    let (mut x, mut y, r) = (x * factor, y * factor, r * factor);

    if r > 1.0 {
        x /= r;
        y /= r;
    }
    (x, y)
}

pub fn axis_to_button(value: f32) -> ButtonState {
    ButtonState::from(value > AXIS_PRESS_THRESHOLD)
}

/// Translates stick motion of a physical pad into a joystick event.
pub fn stick_event(device: DeviceId, stick: StickType, x: f32, y: f32) -> ControllerEvent {
    let (x, y) = stick_state(x, y);
    ControllerEvent::Joystick {
        device,
        stick,
        x,
        y: -y,
    }
}

/// Translates an analog trigger axis into a button event.
pub fn trigger_event(device: DeviceId, button: ButtonType, value: f32) -> ControllerEvent {
    ControllerEvent::Button {
        device,
        button,
        state: axis_to_button(value),
    }
}

/// Turns a hat (or axis-driven dpad) into dpad button transitions.
///
/// Every direction is evaluated from its own axis on each sample, so an axis
/// falling back to zero releases its direction at once, even when the other
/// half of a diagonal stays held. Only changes are emitted.
#[derive(Debug, Clone)]
pub struct HatTranslator {
    device: DeviceId,
    // up, down, left, right
    pressed: [bool; 4],
}

impl HatTranslator {
    const DIRECTIONS: [ButtonType; 4] = [
        ButtonType::DpadUp,
        ButtonType::DpadDown,
        ButtonType::DpadLeft,
        ButtonType::DpadRight,
    ];

    pub fn new(device: DeviceId) -> Self {
        Self {
            device,
            pressed: [false; 4],
        }
    }

    pub fn update(&mut self, x: f32, y: f32) -> Vec<ControllerEvent> {
        let next = [
            axis_to_button(-y) == ButtonState::Pressed,
            axis_to_button(y) == ButtonState::Pressed,
            axis_to_button(-x) == ButtonState::Pressed,
            axis_to_button(x) == ButtonState::Pressed,
        ];

        let mut events = Vec::new();
        for (i, button) in Self::DIRECTIONS.iter().enumerate() {
            if next[i] != self.pressed[i] {
                debug!("Hat {} -> {}", button, next[i]);
                events.push(ControllerEvent::button(self.device, *button, next[i]));
            }
        }
        self.pressed = next;
        events
    }

    pub fn is_pressed(&self, button: ButtonType) -> bool {
        Self::DIRECTIONS
            .iter()
            .position(|b| *b == button)
            .map(|i| self.pressed[i])
            .unwrap_or(false)
    }
}

/// One sample from a physical pad, as reported by the host's input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamepadInput {
    Stick { stick: StickType, x: f32, y: f32 },
    Trigger { button: ButtonType, value: f32 },
    Hat { x: f32, y: f32 },
}

/// Per-device translation state for a physical pad.
#[derive(Debug, Clone)]
pub struct GamepadTranslator {
    device: DeviceId,
    hat: HatTranslator,
}

impl GamepadTranslator {
    pub fn new(device: DeviceId) -> Self {
        Self {
            device,
            hat: HatTranslator::new(device),
        }
    }

    pub fn translate(&mut self, input: GamepadInput) -> Vec<ControllerEvent> {
        match input {
            GamepadInput::Stick { stick, x, y } => vec![stick_event(self.device, stick, x, y)],
            GamepadInput::Trigger { button, value } => {
                vec![trigger_event(self.device, button, value)]
            }
            GamepadInput::Hat { x, y } => self.hat.update(x, y),
        }
    }
}
