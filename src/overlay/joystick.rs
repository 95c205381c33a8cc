use super::geometry::{AxisValue, Rect};
use super::touch::{TouchPhase, WidgetInput};
use super::widget::{StateDelta, TouchContext};
use crate::controller::{ButtonState, ButtonType, ControllerEvent, StickType};
use tracing::debug;

// Outer ring size divided by thumb size
const THUMB_RATIO: f32 = 1.66;

/// Analog stick.
///
/// `bounds` is the hit box and stays put. `virtual_bounds` is the frame the
/// deflection is measured in; with recentering enabled it jumps under the
/// finger on press. Both snap back to `original_bounds` on release.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayJoystick {
    stick: StickType,
    button: ButtonType,
    bounds: Rect,
    virtual_bounds: Rect,
    original_bounds: Rect,
    thumb_bounds: Rect,
    track_id: Option<i32>,
    axis: AxisValue,
    // outer ring hidden and reach box shown while held
    pressed: bool,
}

impl OverlayJoystick {
    pub fn new(stick: StickType, button: ButtonType, bounds: Rect) -> Self {
        let thumb_w = (bounds.width() as f32 / THUMB_RATIO) as i32;
        let thumb_h = (bounds.height() as f32 / THUMB_RATIO) as i32;
        let thumb = Rect::from_origin_size(0, 0, thumb_w, thumb_h)
            .centered_at(bounds.center_x(), bounds.center_y());
        Self {
            stick,
            button,
            bounds,
            virtual_bounds: bounds,
            original_bounds: bounds,
            thumb_bounds: thumb,
            track_id: None,
            axis: AxisValue::ZERO,
            pressed: false,
        }
    }

    pub fn stick(&self) -> StickType {
        self.stick
    }

    pub fn button(&self) -> ButtonType {
        self.button
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn virtual_bounds(&self) -> Rect {
        self.virtual_bounds
    }

    pub fn original_bounds(&self) -> Rect {
        self.original_bounds
    }

    // Where the thumb graphic goes, derived from the axis value
    pub fn thumb_bounds(&self) -> Rect {
        self.thumb_bounds
    }

    pub fn axis(&self) -> AxisValue {
        self.axis
    }

    pub fn track_id(&self) -> Option<i32> {
        self.track_id
    }

    pub fn outer_ring_visible(&self) -> bool {
        !self.pressed
    }

    pub fn reach_box(&self) -> Option<Rect> {
        self.pressed.then_some(self.virtual_bounds)
    }

    /// Moves the whole widget, used by the layout editor.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.virtual_bounds = bounds;
        self.original_bounds = bounds;
        self.update_thumb();
    }

    pub fn update_status(&mut self, input: &WidgetInput, ctx: &TouchContext) -> StateDelta {
        let mut delta = StateDelta::default();
        match input.phase {
            TouchPhase::Down => {
                let (x, y) = input.pixel();
                if self.track_id.is_some() || !self.bounds.contains(x, y) {
                    return delta;
                }
                debug!("{:?} stick claimed by pointer {}", self.stick, input.pointer_id);
                self.track_id = Some(input.pointer_id);
                self.pressed = true;
                if ctx.joystick_recenter {
                    self.virtual_bounds = self.virtual_bounds.centered_at(x, y);
                }
                self.deflect(input.x, input.y);
                delta.mark_changed();
                delta.push(self.axis_event(ctx));
            }
            TouchPhase::Move => {
                if self.track_id != Some(input.pointer_id) {
                    return delta;
                }
                if self.deflect(input.x, input.y) {
                    delta.push(self.axis_event(ctx));
                }
            }
            TouchPhase::Up => {
                if self.track_id != Some(input.pointer_id) {
                    return delta;
                }
                debug!("{:?} stick released by pointer {}", self.stick, input.pointer_id);
                self.track_id = None;
                self.pressed = false;
                self.axis = AxisValue::ZERO;
                self.bounds = self.original_bounds;
                self.virtual_bounds = self.original_bounds;
                self.update_thumb();
                delta.push(self.axis_event(ctx));
                delta.push(ControllerEvent::Button {
                    device: ctx.device,
                    button: self.button,
                    state: ButtonState::Released,
                });
            }
        }
        delta
    }

    // Returns whether the axis value changed
    fn deflect(&mut self, x: f32, y: f32) -> bool {
        let vb = self.virtual_bounds;
        let cx = vb.center_x() as f32;
        let cy = vb.center_y() as f32;
        let max_x = vb.right as f32 - cx;
        let max_y = vb.bottom as f32 - cy;
        if max_x <= 0.0 || max_y <= 0.0 {
            return false;
        }

        let ax = (x - cx) / max_x;
        let ay = (y - cy) / max_y;
        let angle = ay.atan2(ax);
        let radius = (ax * ax + ay * ay).sqrt().min(1.0);
        let next = AxisValue {
            x: angle.cos() * radius,
            y: angle.sin() * radius,
        };

        let changed = next != self.axis;
        self.axis = next;
        self.update_thumb();
        changed
    }

    fn update_thumb(&mut self) {
        let vb = self.virtual_bounds;
        let (half_w, half_h) = (vb.width() / 2, vb.height() / 2);
        let x = (vb.center_x() + (self.axis.x * half_w as f32) as i32)
            .clamp(vb.center_x() - half_w, vb.center_x() + half_w);
        let y = (vb.center_y() + (self.axis.y * half_h as f32) as i32)
            .clamp(vb.center_y() - half_h, vb.center_y() + half_h);
        self.thumb_bounds = self.thumb_bounds.centered_at(x, y);
    }

    fn axis_event(&self, ctx: &TouchContext) -> ControllerEvent {
        ControllerEvent::Joystick {
            device: ctx.device,
            stick: self.stick,
            x: self.axis.x,
            y: -self.axis.y,
        }
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

    fn stick() -> OverlayJoystick {
        OverlayJoystick::new(
            StickType::Left,
            ButtonType::StickL,
            Rect::new(50, 50, 150, 150),
        )
    }

    fn fixed() -> TouchContext {
        TouchContext {
            joystick_recenter: false,
            ..TouchContext::default()
        }
    }

    #[test]
    fn touch_right_of_center_reads_point_six() {
        let ctx = fixed();
        let mut stick = stick();
        let delta = stick.update_status(&input(TouchPhase::Down, 0, 130.0, 100.0), &ctx);

        match delta.events() {
            [ControllerEvent::Joystick {
                device: DeviceId::Player1,
                stick: StickType::Left,
                x,
                y,
            }] => {
                assert!((x - 0.6).abs() < 1e-6);
                assert!(y.abs() < 1e-6);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn y_is_inverted_on_emission() {
        let ctx = fixed();
        let mut stick = stick();
        stick.update_status(&input(TouchPhase::Down, 0, 100.0, 100.0), &ctx);
        let delta = stick.update_status(&input(TouchPhase::Move, 0, 100.0, 75.0), &ctx);

        assert!((stick.axis().y + 0.5).abs() < 1e-6);
        match delta.events() {
            [ControllerEvent::Joystick { y, .. }] => assert!((y - 0.5).abs() < 1e-6),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn deflection_is_clamped_to_unit_circle() {
        let ctx = fixed();
        let mut stick = stick();
        stick.update_status(&input(TouchPhase::Down, 0, 100.0, 100.0), &ctx);

        let points = [
            (1000.0, 1000.0),
            (-400.0, 120.0),
            (149.0, 51.0),
            (100.0, -900.0),
            (130.0, 140.0),
        ];
        for (x, y) in points {
            stick.update_status(&input(TouchPhase::Move, 0, x, y), &ctx);
            let axis = stick.axis();
            assert!(axis.magnitude() <= 1.0 + 1e-5, "({}, {})", x, y);

            let raw = ((y - 100.0) / 50.0f32).atan2((x - 100.0) / 50.0);
            assert!((axis.y.atan2(axis.x) - raw).abs() < 1e-4, "({}, {})", x, y);
        }
    }

    #[test]
    fn recenter_moves_virtual_bounds_under_finger() {
        let ctx = TouchContext::default();
        let mut stick = stick();
        stick.update_status(&input(TouchPhase::Down, 0, 140.0, 60.0), &ctx);

        let vb = stick.virtual_bounds();
        assert_eq!((vb.center_x(), vb.center_y()), (140, 60));
        assert_eq!(stick.bounds(), Rect::new(50, 50, 150, 150));
        assert!(stick.axis().magnitude() < 1e-6);
        assert!(!stick.outer_ring_visible());
        assert_eq!(stick.reach_box(), Some(vb));

        stick.update_status(&input(TouchPhase::Move, 0, 165.0, 60.0), &ctx);
        assert!((stick.axis().x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn release_restores_state() {
        let ctx = TouchContext::default();
        let mut stick = stick();
        stick.update_status(&input(TouchPhase::Down, 4, 140.0, 60.0), &ctx);
        stick.update_status(&input(TouchPhase::Move, 4, 10.0, 10.0), &ctx);

        let delta = stick.update_status(&input(TouchPhase::Up, 4, 10.0, 10.0), &ctx);
        assert_eq!(stick.axis(), AxisValue::ZERO);
        assert_eq!(stick.virtual_bounds(), stick.original_bounds());
        assert_eq!(stick.track_id(), None);
        assert!(stick.outer_ring_visible());
        assert_eq!(
            delta.events()[1],
            ControllerEvent::Button {
                device: DeviceId::Player1,
                button: ButtonType::StickL,
                state: ButtonState::Released,
            }
        );
    }

    #[test]
    fn thumb_follows_axis_within_bounds() {
        let ctx = fixed();
        let mut stick = stick();
        stick.update_status(&input(TouchPhase::Down, 0, 100.0, 100.0), &ctx);
        stick.update_status(&input(TouchPhase::Move, 0, 900.0, 100.0), &ctx);

        let thumb = stick.thumb_bounds();
        assert_eq!(thumb.center_x(), 150);
        assert_eq!(thumb.center_y(), 100);
    }
}
