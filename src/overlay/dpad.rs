use super::geometry::Rect;
use super::touch::{TouchPhase, WidgetInput};
use super::widget::{StateDelta, TouchContext};
use crate::controller::{ButtonType, ControllerEvent};
use tracing::debug;

// Fraction of the half extent that stays neutral on each axis
const DPAD_AXIS_DEADZONE: f32 = 0.5;

/// Four-way directional pad.
///
/// The pad is split into a 3x3 grid around its center. Corner cells press two
/// directions at once, the middle cell presses none.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDpad {
    bounds: Rect,
    track_id: Option<i32>,
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl OverlayDpad {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            track_id: None,
            up: false,
            down: false,
            left: false,
            right: false,
        }
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

    pub fn is_pressed(&self, direction: ButtonType) -> bool {
        match direction {
            ButtonType::DpadUp => self.up,
            ButtonType::DpadDown => self.down,
            ButtonType::DpadLeft => self.left,
            ButtonType::DpadRight => self.right,
            _ => false,
        }
    }

    // [up, down, left, right] for a point relative to the pad
    fn resolve(&self, x: f32, y: f32) -> [bool; 4] {
        let cx = self.bounds.center_x() as f32;
        let cy = self.bounds.center_y() as f32;
        let half_w = self.bounds.right as f32 - cx;
        let half_h = self.bounds.bottom as f32 - cy;
        if half_w <= 0.0 || half_h <= 0.0 {
            return [false; 4];
        }

        let ax = (x - cx) / half_w;
        let ay = (y - cy) / half_h;
        [
            ay < -DPAD_AXIS_DEADZONE,
            ay > DPAD_AXIS_DEADZONE,
            ax < -DPAD_AXIS_DEADZONE,
            ax > DPAD_AXIS_DEADZONE,
        ]
    }

    fn apply(&mut self, next: [bool; 4], ctx: &TouchContext, delta: &mut StateDelta) {
        let current = [self.up, self.down, self.left, self.right];
        let buttons = [
            ButtonType::DpadUp,
            ButtonType::DpadDown,
            ButtonType::DpadLeft,
            ButtonType::DpadRight,
        ];
        for i in 0..4 {
            if current[i] != next[i] {
                delta.push(ControllerEvent::button(ctx.device, buttons[i], next[i]));
            }
        }
        [self.up, self.down, self.left, self.right] = next;
    }

    pub fn update_status(&mut self, input: &WidgetInput, ctx: &TouchContext) -> StateDelta {
        let mut delta = StateDelta::default();
        match input.phase {
            TouchPhase::Down => {
                let (x, y) = input.pixel();
                if self.track_id.is_some() || !self.bounds.contains(x, y) {
                    return delta;
                }
                debug!("Dpad claimed by pointer {}", input.pointer_id);
                self.track_id = Some(input.pointer_id);
                // claiming alone is a visible change even in the neutral cell
                delta.mark_changed();
                let next = self.resolve(input.x, input.y);
                self.apply(next, ctx, &mut delta);
            }
            TouchPhase::Move => {
                if self.track_id != Some(input.pointer_id) || !ctx.dpad_slide {
                    return delta;
                }
                let next = self.resolve(input.x, input.y);
                self.apply(next, ctx, &mut delta);
            }
            TouchPhase::Up => {
                if self.track_id != Some(input.pointer_id) {
                    return delta;
                }
                debug!("Dpad released by pointer {}", input.pointer_id);
                self.track_id = None;
                delta.mark_changed();
                self.apply([false; 4], ctx, &mut delta);
            }
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DeviceId;
    use crate::overlay::touch::Pointer;

    fn input(phase: TouchPhase, id: i32, x: f32, y: f32) -> WidgetInput {
        WidgetInput::new(phase, &Pointer { id, x, y })
    }

    fn pad() -> OverlayDpad {
        OverlayDpad::new(Rect::new(0, 0, 120, 120))
    }

    fn pressed(pad: &OverlayDpad) -> [bool; 4] {
        [
            pad.is_pressed(ButtonType::DpadUp),
            pad.is_pressed(ButtonType::DpadDown),
            pad.is_pressed(ButtonType::DpadLeft),
            pad.is_pressed(ButtonType::DpadRight),
        ]
    }

    #[test]
    fn resolves_nine_zones() {
        let cases = [
            ((60.0, 60.0), [false, false, false, false]),
            ((60.0, 5.0), [true, false, false, false]),
            ((60.0, 115.0), [false, true, false, false]),
            ((5.0, 60.0), [false, false, true, false]),
            ((115.0, 60.0), [false, false, false, true]),
            ((5.0, 5.0), [true, false, true, false]),
            ((115.0, 5.0), [true, false, false, true]),
            ((5.0, 115.0), [false, true, true, false]),
            ((115.0, 115.0), [false, true, false, true]),
        ];
        let pad = pad();
        for ((x, y), expected) in cases {
            assert_eq!(pad.resolve(x, y), expected, "at ({}, {})", x, y);
        }
    }

    #[test]
    fn diagonal_press_emits_both_directions() {
        let ctx = TouchContext::default();
        let mut pad = pad();
        let delta = pad.update_status(&input(TouchPhase::Down, 0, 110.0, 10.0), &ctx);
        assert_eq!(
            delta.events(),
            &[
                ControllerEvent::button(DeviceId::Player1, ButtonType::DpadUp, true),
                ControllerEvent::button(DeviceId::Player1, ButtonType::DpadRight, true),
            ]
        );
    }

    #[test]
    fn slide_emits_only_changed_directions() {
        let ctx = TouchContext::default();
        let mut pad = pad();
        pad.update_status(&input(TouchPhase::Down, 0, 110.0, 10.0), &ctx);

        let delta = pad.update_status(&input(TouchPhase::Move, 0, 60.0, 10.0), &ctx);
        assert_eq!(
            delta.events(),
            &[ControllerEvent::button(
                DeviceId::Player1,
                ButtonType::DpadRight,
                false
            )]
        );
        assert_eq!(pressed(&pad), [true, false, false, false]);
    }

    #[test]
    fn slide_disabled_keeps_initial_direction() {
        let ctx = TouchContext {
            dpad_slide: false,
            ..TouchContext::default()
        };
        let mut pad = pad();
        pad.update_status(&input(TouchPhase::Down, 0, 60.0, 5.0), &ctx);
        assert!(pad
            .update_status(&input(TouchPhase::Move, 0, 60.0, 115.0), &ctx)
            .is_empty());
        assert_eq!(pressed(&pad), [true, false, false, false]);
    }

    #[test]
    fn release_clears_everything() {
        let ctx = TouchContext::default();
        let mut pad = pad();
        pad.update_status(&input(TouchPhase::Down, 3, 5.0, 115.0), &ctx);

        let delta = pad.update_status(&input(TouchPhase::Up, 3, 0.0, 0.0), &ctx);
        assert_eq!(delta.events().len(), 2);
        assert_eq!(pressed(&pad), [false; 4]);
        assert_eq!(pad.track_id(), None);
    }
}
