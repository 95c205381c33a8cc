use serde::{Deserialize, Serialize};

/// Kind of change a touch frame reports.
///
/// `Down`/`Up` are the first and last contact of a gesture, the `Pointer*`
/// variants add or remove further contacts while others stay down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchAction {
    Down,
    PointerDown,
    Move,
    Up,
    PointerUp,
    Cancel,
}

// One contact inside a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

/// A batch from the touch hardware: one action plus the position of every
/// active contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchFrame {
    pub action: TouchAction,
    // index into `pointers` of the contact the action refers to
    #[serde(default)]
    pub action_index: usize,
    pub pointers: Vec<Pointer>,
}

impl TouchFrame {
    pub fn new(action: TouchAction, action_index: usize, pointers: Vec<Pointer>) -> Self {
        Self {
            action,
            action_index,
            pointers,
        }
    }

    // Single contact frame
    pub fn single(action: TouchAction, id: i32, x: f32, y: f32) -> Self {
        Self::new(action, 0, vec![Pointer { id, x, y }])
    }

    pub fn action_pointer(&self) -> Option<&Pointer> {
        self.pointers.get(self.action_index)
    }

    pub fn pointer(&self, id: i32) -> Option<&Pointer> {
        self.pointers.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
}

/// What a single widget sees of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetInput {
    pub phase: TouchPhase,
    pub pointer_id: i32,
    pub x: f32,
    pub y: f32,
}

impl WidgetInput {
    pub fn new(phase: TouchPhase, pointer: &Pointer) -> Self {
        Self {
            phase,
            pointer_id: pointer.id,
            x: pointer.x,
            y: pointer.y,
        }
    }

    // Hit tests run on whole pixels
    pub fn pixel(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}
