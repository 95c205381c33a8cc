use super::geometry::Rect;
use super::touch::{TouchPhase, WidgetInput};
use super::widget::{StateDelta, TouchContext};
use crate::controller::{ButtonType, ControllerEvent};
use tracing::debug;

/// Single on-screen button.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayButton {
    button: ButtonType,
    bounds: Rect,
    track_id: Option<i32>,
    pressed: bool,
}

impl OverlayButton {
    pub fn new(button: ButtonType, bounds: Rect) -> Self {
        Self {
            button,
            bounds,
            track_id: None,
            pressed: false,
        }
    }

    pub fn button(&self) -> ButtonType {
        self.button
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn track_id(&self) -> Option<i32> {
        self.track_id
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn update_status(&mut self, input: &WidgetInput, ctx: &TouchContext) -> StateDelta {
        let mut delta = StateDelta::default();
        match input.phase {
            TouchPhase::Down => {
                let (x, y) = input.pixel();
                if self.track_id.is_some() || !self.bounds.contains(x, y) {
                    return delta;
                }
                debug!("{} claimed by pointer {}", self.button, input.pointer_id);
                self.track_id = Some(input.pointer_id);
                self.pressed = true;
                delta.push(ControllerEvent::button(ctx.device, self.button, true));
            }
            TouchPhase::Up => {
                if self.track_id != Some(input.pointer_id) {
                    return delta;
                }
                debug!("{} released by pointer {}", self.button, input.pointer_id);
                self.track_id = None;
                self.pressed = false;
                delta.push(ControllerEvent::button(ctx.device, self.button, false));
            }
            TouchPhase::Move => {}
        }
        delta
    }
}
