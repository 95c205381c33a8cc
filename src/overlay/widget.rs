use super::button::OverlayButton;
use super::dpad::OverlayDpad;
use super::geometry::Rect;
use super::joystick::OverlayJoystick;
use super::touch::WidgetInput;
use crate::config::{OverlayConfig, WidgetKind};
use crate::controller::{ButtonType, ControllerEvent, DeviceId};

/// Settings a widget needs while handling a touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchContext {
    pub device: DeviceId,
    pub joystick_recenter: bool,
    pub dpad_slide: bool,
}

impl Default for TouchContext {
    fn default() -> Self {
        Self {
            device: DeviceId::Player1,
            joystick_recenter: true,
            dpad_slide: true,
        }
    }
}

impl From<&OverlayConfig> for TouchContext {
    fn from(config: &OverlayConfig) -> Self {
        Self {
            device: DeviceId::Player1,
            joystick_recenter: config.joystick_recenter,
            dpad_slide: config.dpad_slide,
        }
    }
}

/// Result of feeding one input to one widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDelta {
    changed: bool,
    events: Vec<ControllerEvent>,
}

impl StateDelta {
    pub fn push(&mut self, event: ControllerEvent) {
        self.changed = true;
        self.events.push(event);
    }

    // Visual change without an event, e.g. a dpad grabbed in its neutral cell
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[ControllerEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ControllerEvent> {
        self.events
    }
}

/// Any widget the overlay can show.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayWidget {
    Button(OverlayButton),
    Dpad(OverlayDpad),
    Joystick(OverlayJoystick),
}

impl OverlayWidget {
    pub fn from_kind(kind: WidgetKind, bounds: Rect) -> Self {
        if kind == WidgetKind::Dpad {
            OverlayWidget::Dpad(OverlayDpad::new(bounds))
        } else if let Some(stick) = kind.stick() {
            OverlayWidget::Joystick(OverlayJoystick::new(stick, kind.button(), bounds))
        } else {
            OverlayWidget::Button(OverlayButton::new(kind.button(), bounds))
        }
    }

    pub fn update_status(&mut self, input: &WidgetInput, ctx: &TouchContext) -> StateDelta {
        match self {
            OverlayWidget::Button(button) => button.update_status(input, ctx),
            OverlayWidget::Dpad(dpad) => dpad.update_status(input, ctx),
            OverlayWidget::Joystick(stick) => stick.update_status(input, ctx),
        }
    }

    pub fn track_id(&self) -> Option<i32> {
        match self {
            OverlayWidget::Button(button) => button.track_id(),
            OverlayWidget::Dpad(dpad) => dpad.track_id(),
            OverlayWidget::Joystick(stick) => stick.track_id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            OverlayWidget::Button(button) => button.bounds(),
            OverlayWidget::Dpad(dpad) => dpad.bounds(),
            OverlayWidget::Joystick(stick) => stick.bounds(),
        }
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        match self {
            OverlayWidget::Button(button) => button.set_bounds(bounds),
            OverlayWidget::Dpad(dpad) => dpad.set_bounds(bounds),
            OverlayWidget::Joystick(stick) => stick.set_bounds(bounds),
        }
    }

    /// Id the widget's position is persisted under.
    pub fn layout_id(&self) -> i32 {
        match self {
            OverlayWidget::Button(button) => button.button().id(),
            OverlayWidget::Dpad(_) => ButtonType::DpadUp.id(),
            OverlayWidget::Joystick(stick) => stick.button().id(),
        }
    }
}
