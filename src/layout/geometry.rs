//! Pixel-space geometry shared by layout, rendering, and gesture code.

/// A point in row-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle in row-local pixels.
///
/// Width and height are never negative; constructors clamp them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent, `>= 0`.
    pub width: f32,
    /// Vertical extent, `>= 0`.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle, clamping negative sizes to zero.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// Creates a rectangle of the given size centered on `center`.
    pub fn centered(center: Point, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns `true` if `point` lies inside (edges inclusive on the left/top).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Mirrors the rectangle horizontally inside a row of `row_width`.
    pub fn mirrored(&self, row_width: f32) -> Self {
        Self {
            x: row_width - self.x - self.width,
            ..*self
        }
    }

    /// Moves the rectangle horizontally.
    pub fn offset_x(&self, dx: f32) -> Self {
        Self {
            x: self.x + dx,
            ..*self
        }
    }

    /// Scales the rectangle around its center.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::centered(self.center(), self.width * factor, self.height * factor)
    }

    /// Intersection with `other`, or an empty rectangle at `self`'s origin.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// The four corners, clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    /// Returns `true` when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Clamps to `>= 0`, mapping NaN to zero.
pub fn non_negative(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}
