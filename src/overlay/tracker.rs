use super::touch::{Pointer, TouchAction, TouchFrame, TouchPhase, WidgetInput};
use super::widget::{OverlayWidget, TouchContext};
use crate::config::OverlayConfig;
use crate::controller::{ControllerEvent, EventSink};
use tracing::{debug, trace};

/// Routes touch frames to widgets and forwards unclaimed contacts.
///
/// Ownership lives in the widgets themselves (`track_id`). The tracker only
/// decides which widget sees which contact:
///
/// - a new contact is offered to the widgets in order, the first one that
///   claims it owns it until the contact goes away
/// - a lifted contact releases the widget it owns
/// - a move re-evaluates every owned widget with its own contact's position
/// - a cancel releases every owned widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerTracker {
    ctx: TouchContext,
    passthrough: bool,
}

impl PointerTracker {
    pub fn new(ctx: TouchContext, passthrough: bool) -> Self {
        Self { ctx, passthrough }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(TouchContext::from(config), config.touch_enabled)
    }

    /// Processes one frame. Returns whether any widget changed and needs a
    /// redraw.
    pub fn dispatch(
        &self,
        frame: &TouchFrame,
        widgets: &mut [OverlayWidget],
        sink: &mut dyn EventSink,
    ) -> bool {
        let owned_before: Vec<i32> = widgets.iter().filter_map(|w| w.track_id()).collect();
        let mut redraw = false;

        match frame.action {
            TouchAction::Down | TouchAction::PointerDown => {
                if let Some(pointer) = frame.action_pointer() {
                    redraw |= self.claim(pointer, &owned_before, widgets, sink);
                }
            }
            TouchAction::Up | TouchAction::PointerUp => {
                if let Some(pointer) = frame.action_pointer() {
                    if let Some(widget) = widgets
                        .iter_mut()
                        .find(|w| w.track_id() == Some(pointer.id))
                    {
                        let input = WidgetInput::new(TouchPhase::Up, pointer);
                        redraw |= self.apply(widget, &input, sink);
                    }
                }
            }
            TouchAction::Move => {
                for widget in widgets.iter_mut() {
                    let Some(owner) = widget.track_id() else {
                        continue;
                    };
                    // owner missing from the batch, nothing to evaluate
                    if let Some(pointer) = frame.pointer(owner) {
                        let input = WidgetInput::new(TouchPhase::Move, pointer);
                        redraw |= self.apply(widget, &input, sink);
                    }
                }
            }
            TouchAction::Cancel => {
                for widget in widgets.iter_mut() {
                    let Some(owner) = widget.track_id() else {
                        continue;
                    };
                    debug!("Contact {} cancelled", owner);
                    let pointer = frame.pointer(owner).copied().unwrap_or(Pointer {
                        id: owner,
                        x: 0.0,
                        y: 0.0,
                    });
                    let input = WidgetInput::new(TouchPhase::Up, &pointer);
                    redraw |= self.apply(widget, &input, sink);
                }
            }
        }

        if self.passthrough {
            self.forward_unclaimed(frame, &owned_before, widgets, sink);
        }
        redraw
    }

    fn claim(
        &self,
        pointer: &Pointer,
        owned_before: &[i32],
        widgets: &mut [OverlayWidget],
        sink: &mut dyn EventSink,
    ) -> bool {
        if owned_before.contains(&pointer.id) {
            debug!("Contact {} is already down, ignoring repeated press", pointer.id);
            return false;
        }

        let input = WidgetInput::new(TouchPhase::Down, pointer);
        for widget in widgets.iter_mut() {
            let delta = widget.update_status(&input, &self.ctx);
            if widget.track_id() == Some(pointer.id) {
                let changed = delta.is_changed();
                for event in delta.into_events() {
                    sink.emit(event);
                }
                return changed;
            }
        }
        trace!("Contact {} hit no widget", pointer.id);
        false
    }

    fn apply(
        &self,
        widget: &mut OverlayWidget,
        input: &WidgetInput,
        sink: &mut dyn EventSink,
    ) -> bool {
        let delta = widget.update_status(input, &self.ctx);
        let changed = delta.is_changed();
        for event in delta.into_events() {
            sink.emit(event);
        }
        changed
    }

    fn forward_unclaimed(
        &self,
        frame: &TouchFrame,
        owned_before: &[i32],
        widgets: &[OverlayWidget],
        sink: &mut dyn EventSink,
    ) {
        let consumed = |id: i32| {
            owned_before.contains(&id) || widgets.iter().any(|w| w.track_id() == Some(id))
        };

        match frame.action {
            TouchAction::Down | TouchAction::PointerDown => {
                if let Some(p) = frame.action_pointer().filter(|p| !consumed(p.id)) {
                    sink.emit(ControllerEvent::TouchPressed {
                        id: p.id,
                        x: p.x,
                        y: p.y,
                    });
                }
            }
            TouchAction::Move => {
                for p in frame.pointers.iter().filter(|p| !consumed(p.id)) {
                    sink.emit(ControllerEvent::TouchMoved {
                        id: p.id,
                        x: p.x,
                        y: p.y,
                    });
                }
            }
            TouchAction::Up | TouchAction::PointerUp => {
                if let Some(p) = frame.action_pointer().filter(|p| !consumed(p.id)) {
                    sink.emit(ControllerEvent::TouchReleased { id: p.id });
                }
            }
            TouchAction::Cancel => {
                for p in frame.pointers.iter().filter(|p| !consumed(p.id)) {
                    sink.emit(ControllerEvent::TouchReleased { id: p.id });
                }
            }
        }
    }
}
