use serde::{Deserialize, Serialize};
use std::fmt;

// Canonical button ids understood by the emulation core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ButtonType {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    StickL = 4,
    StickR = 5,
    TriggerL = 6,
    TriggerR = 7,
    TriggerZl = 8,
    TriggerZr = 9,
    Plus = 10,
    Minus = 11,
    DpadLeft = 12,
    DpadUp = 13,
    DpadRight = 14,
    DpadDown = 15,
    Sl = 16,
    Sr = 17,
    Home = 18,
    Capture = 19,
}

impl ButtonType {
    pub fn id(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ButtonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.id())
    }
}

// Analog stick ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum StickType {
    Left = 0,
    Right = 1,
}

impl StickType {
    pub fn id(self) -> i32 {
        self as i32
    }
}

// Button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ButtonState {
    Released = 0,
    Pressed = 1,
}

impl From<bool> for ButtonState {
    fn from(pressed: bool) -> Self {
        if pressed {
            ButtonState::Pressed
        } else {
            ButtonState::Released
        }
    }
}

/// Logical target of an emitted event.
///
/// Players map to ids 0..=7, the handheld console itself is id 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum DeviceId {
    Player1 = 0,
    Player2 = 1,
    Player3 = 2,
    Player4 = 3,
    Player5 = 4,
    Player6 = 5,
    Player7 = 6,
    Player8 = 7,
    Console = 8,
}

impl DeviceId {
    pub fn id(self) -> i32 {
        self as i32
    }
}

/// Events handed to the emulation core.
///
/// One variant per entry point of the core's controller-input API. Joystick
/// `y` is already inverted (up is positive) when the event is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    Button {
        device: DeviceId,
        button: ButtonType,
        state: ButtonState,
    },
    Joystick {
        device: DeviceId,
        stick: StickType,
        x: f32,
        y: f32,
    },
    TouchPressed {
        id: i32,
        x: f32,
        y: f32,
    },
    TouchMoved {
        id: i32,
        x: f32,
        y: f32,
    },
    TouchReleased {
        id: i32,
    },
    Motion {
        device: DeviceId,
        delta_timestamp_us: i64,
        gyro: [f32; 3],
        accel: [f32; 3],
    },
}

impl ControllerEvent {
    pub fn button(device: DeviceId, button: ButtonType, pressed: bool) -> Self {
        ControllerEvent::Button {
            device,
            button,
            state: ButtonState::from(pressed),
        }
    }
}
