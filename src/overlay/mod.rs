//! On-screen controller overlay
//!
//! 1. [`geometry`], [`touch`] - Rectangles, stick values and touch frames
//! 2. [`button`], [`dpad`], [`joystick`] - Widget kinds, unified in [`widget`]
//! 3. [`tracker`] - Contact ownership and touch passthrough
//! 4. [`layout`] - Widget registry and default layout
//! 5. [`editor`] - Drag-to-reposition
//! 6. [`input_overlay`] - Lifecycle tying it all to a store and an event sink

pub mod button;
pub mod dpad;
pub mod editor;
pub mod geometry;
pub mod input_overlay;
pub mod joystick;
pub mod layout;
pub mod touch;
pub mod tracker;
pub mod widget;

pub use input_overlay::{Editing, InputOverlay, Initializing, OverlaySession, Running};
pub use layout::{ScreenSize, WidgetLayout};
pub use touch::{Pointer, TouchAction, TouchFrame};
pub use widget::OverlayWidget;
