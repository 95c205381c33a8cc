//! Drag-to-reposition while the overlay is in edit mode.
//!
//! A press on a widget grabs it. The widget only starts following the finger
//! once the contact has travelled [`DRAG_THRESHOLD_PX`], so a tap never nudges
//! it. Lifting the finger after a drag writes the new top-left corner under
//! the widget's orientation key and commits the store. A cancelled drag puts
//! the widget back where it was and persists nothing.

use super::geometry::Rect;
use super::layout::{ScreenSize, WidgetLayout};
use super::touch::{Pointer, TouchAction, TouchFrame};
use crate::config::{position_key_x, position_key_y, Orientation};
use crate::persistence::LayoutStore;
use tracing::{debug, error, info};

pub const DRAG_THRESHOLD_PX: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    index: usize,
    pointer_id: i32,
    start_x: f32,
    start_y: f32,
    // contact position relative to the widget's top-left corner
    offset_x: f32,
    offset_y: f32,
    original: Rect,
    dragging: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEditor {
    grab: Option<Grab>,
}

impl LayoutEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.map(|g| g.dragging).unwrap_or(false)
    }

    // Index of the grabbed widget, if any
    pub fn grabbed(&self) -> Option<usize> {
        self.grab.map(|g| g.index)
    }

    /// Drops any grab without persisting, restoring the widget.
    pub fn abort(&mut self, layout: &mut WidgetLayout) {
        if let Some(grab) = self.grab.take() {
            if let Some(widget) = layout.widgets_mut().get_mut(grab.index) {
                widget.set_bounds(grab.original);
            }
        }
    }

    /// Handles a frame in edit mode. Returns whether a redraw is needed.
    pub fn handle_touch(
        &mut self,
        frame: &TouchFrame,
        layout: &mut WidgetLayout,
        store: &mut dyn LayoutStore,
        screen: ScreenSize,
        orientation: Orientation,
    ) -> bool {
        match frame.action {
            TouchAction::Down | TouchAction::PointerDown => {
                if self.grab.is_some() {
                    return false;
                }
                match frame.action_pointer() {
                    Some(pointer) => self.try_grab(pointer, layout),
                    None => false,
                }
            }
            TouchAction::Move => {
                let Some(grab) = self.grab.as_mut() else {
                    return false;
                };
                let Some(pointer) = frame.pointer(grab.pointer_id) else {
                    return false;
                };

                if !grab.dragging {
                    let dx = pointer.x - grab.start_x;
                    let dy = pointer.y - grab.start_y;
                    if (dx * dx + dy * dy).sqrt() < DRAG_THRESHOLD_PX {
                        return false;
                    }
                    debug!("Drag started on widget {}", grab.index);
                    grab.dragging = true;
                }

                let Some(widget) = layout.widgets_mut().get_mut(grab.index) else {
                    return false;
                };
                let mut bounds = widget.bounds();
                let max_x = (screen.width as i32 - bounds.width()).max(0);
                let max_y = (screen.height as i32 - bounds.height()).max(0);
                let x = ((pointer.x - grab.offset_x) as i32).clamp(0, max_x);
                let y = ((pointer.y - grab.offset_y) as i32).clamp(0, max_y);
                bounds.offset_to(x, y);
                widget.set_bounds(bounds);
                true
            }
            TouchAction::Up | TouchAction::PointerUp => {
                let Some(grab) = self.grab else {
                    return false;
                };
                if frame.action_pointer().map(|p| p.id) != Some(grab.pointer_id) {
                    return false;
                }
                self.grab = None;
                if !grab.dragging {
                    return false;
                }

                let Some(widget) = layout.widgets().get(grab.index) else {
                    return false;
                };
                let bounds = widget.bounds();
                let id = widget.layout_id();
                store.put_float(&position_key_x(id, orientation), bounds.left as f32);
                store.put_float(&position_key_y(id, orientation), bounds.top as f32);
                match store.commit() {
                    Ok(()) => info!(
                        "Widget {} moved to ({}, {}) for {:?}",
                        id, bounds.left, bounds.top, orientation
                    ),
                    Err(e) => error!("Failed to persist position of widget {}: {}", id, e),
                }
                true
            }
            TouchAction::Cancel => {
                let moved = self.is_dragging();
                self.abort(layout);
                moved
            }
        }
    }

    fn try_grab(&mut self, pointer: &Pointer, layout: &WidgetLayout) -> bool {
        let (px, py) = (pointer.x as i32, pointer.y as i32);
        let Some(index) = layout
            .widgets()
            .iter()
            .position(|w| w.bounds().contains(px, py))
        else {
            return false;
        };

        let original = layout.widgets()[index].bounds();
        debug!("Widget {} grabbed by contact {}", index, pointer.id);
        self.grab = Some(Grab {
            index,
            pointer_id: pointer.id,
            start_x: pointer.x,
            start_y: pointer.y,
            offset_x: pointer.x - original.left as f32,
            offset_y: pointer.y - original.top as f32,
            original,
            dragging: false,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OverlayConfig, WidgetKind, WidgetSet};
    use crate::persistence::MemoryStore;

    const SCREEN: ScreenSize = ScreenSize {
        width: 1280,
        height: 720,
    };

    fn setup() -> (WidgetLayout, MemoryStore) {
        let mut store = MemoryStore::default();
        store.put_float("0-X", 100.0);
        store.put_float("0-Y", 100.0);
        let config = OverlayConfig {
            widgets: WidgetSet::BUTTON_A,
            ..OverlayConfig::default()
        };
        let layout = WidgetLayout::build(&config, &store, Orientation::Landscape);
        (layout, store)
    }

    fn feed(
        editor: &mut LayoutEditor,
        layout: &mut WidgetLayout,
        store: &mut MemoryStore,
        action: TouchAction,
        x: f32,
        y: f32,
    ) -> bool {
        editor.handle_touch(
            &TouchFrame::single(action, 0, x, y),
            layout,
            store,
            SCREEN,
            Orientation::Landscape,
        )
    }

    #[test]
    fn drag_moves_live_and_persists_on_drop() {
        let (mut layout, mut store) = setup();
        let mut editor = LayoutEditor::new();

        assert!(feed(&mut editor, &mut layout, &mut store, TouchAction::Down, 110.0, 120.0));
        assert!(feed(&mut editor, &mut layout, &mut store, TouchAction::Move, 310.0, 220.0));
        assert!(editor.is_dragging());
        let a = layout.get(WidgetKind::ButtonA).unwrap();
        assert_eq!(a.bounds(), Rect::new(300, 200, 364, 264));
        assert_eq!(store.commits(), 0);

        assert!(feed(&mut editor, &mut layout, &mut store, TouchAction::Up, 310.0, 220.0));
        assert_eq!(store.get_float("0-X"), Some(300.0));
        assert_eq!(store.get_float("0-Y"), Some(200.0));
        assert_eq!(store.commits(), 1);
        assert_eq!(editor.grabbed(), None);
    }

    #[test]
    fn small_wiggle_is_a_tap() {
        let (mut layout, mut store) = setup();
        let mut editor = LayoutEditor::new();

        feed(&mut editor, &mut layout, &mut store, TouchAction::Down, 110.0, 120.0);
        assert!(!feed(&mut editor, &mut layout, &mut store, TouchAction::Move, 113.0, 124.0));
        feed(&mut editor, &mut layout, &mut store, TouchAction::Up, 113.0, 124.0);

        let a = layout.get(WidgetKind::ButtonA).unwrap();
        assert_eq!(a.bounds().left, 100);
        assert_eq!(store.commits(), 0);
    }

    #[test]
    fn drag_is_clamped_to_screen() {
        let (mut layout, mut store) = setup();
        let mut editor = LayoutEditor::new();

        feed(&mut editor, &mut layout, &mut store, TouchAction::Down, 110.0, 110.0);
        feed(&mut editor, &mut layout, &mut store, TouchAction::Move, 5000.0, -300.0);
        let a = layout.get(WidgetKind::ButtonA).unwrap();
        assert_eq!(a.bounds(), Rect::new(1216, 0, 1280, 64));
    }

    #[test]
    fn cancel_restores_without_persisting() {
        let (mut layout, mut store) = setup();
        let mut editor = LayoutEditor::new();

        feed(&mut editor, &mut layout, &mut store, TouchAction::Down, 110.0, 110.0);
        feed(&mut editor, &mut layout, &mut store, TouchAction::Move, 600.0, 400.0);
        assert!(feed(&mut editor, &mut layout, &mut store, TouchAction::Cancel, 600.0, 400.0));

        let a = layout.get(WidgetKind::ButtonA).unwrap();
        assert_eq!(a.bounds().left, 100);
        assert_eq!(store.get_float("0-X"), Some(100.0));
        assert_eq!(store.commits(), 0);
    }

    #[test]
    fn press_outside_widgets_grabs_nothing() {
        let (mut layout, mut store) = setup();
        let mut editor = LayoutEditor::new();
        assert!(!feed(&mut editor, &mut layout, &mut store, TouchAction::Down, 900.0, 500.0));
        assert_eq!(editor.grabbed(), None);
    }
}
