/// Integer pixel geometry for the play field.

/// Play-field width in pixels.
pub const WIDTH: i32 = 960;
/// Play-field height in pixels.
pub const HEIGHT: i32 = 660;

/// Axis-aligned rectangle.  `x`/`y` are the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn centerx(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn centery(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn set_left(&mut self, v: i32) {
        self.x = v;
    }

    pub fn set_right(&mut self, v: i32) {
        self.x = v - self.w;
    }

    pub fn set_bottom(&mut self, v: i32) {
        self.y = v - self.h;
    }

    pub fn set_centerx(&mut self, v: i32) {
        self.x = v - self.w / 2;
    }

    pub fn set_centery(&mut self, v: i32) {
        self.y = v - self.h / 2;
    }

    /// Overlapping region, if any.  Touching edges do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}
