/// Axis aligned rectangle in overlay pixels.
///
/// Edges follow the half-open convention: `left` and `top` are inside,
/// `right` and `bottom` are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> i32 {
        (self.left + self.right) >> 1
    }

    pub fn center_y(&self) -> i32 {
        (self.top + self.bottom) >> 1
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    // Moves the rect so its top-left corner lands on (x, y)
    pub fn offset_to(&mut self, x: i32, y: i32) {
        *self = Self::from_origin_size(x, y, self.width(), self.height());
    }

    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    // Same size, centered on (x, y)
    pub fn centered_at(&self, x: i32, y: i32) -> Self {
        let (w, h) = (self.width(), self.height());
        Self::from_origin_size(x - w / 2, y - h / 2, w, h)
    }
}

/// Stick deflection, each component in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisValue {
    pub x: f32,
    pub y: f32,
}

impl AxisValue {
    pub const ZERO: AxisValue = AxisValue { x: 0.0, y: 0.0 };

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}
