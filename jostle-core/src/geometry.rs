use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of size `width` x `height` centered on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.max_x()
            && self.max_x() > other.x
            && self.y < other.max_y()
            && self.max_y() > other.y
    }

    /// True if `other` lies entirely inside this rectangle (edges inclusive)
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.max_x() <= self.max_x()
            && other.y >= self.y
            && other.max_y() <= self.max_y()
    }

    /// One of the four equal quadrants: 0 = bottom-left, 1 = bottom-right,
    /// 2 = top-left, 3 = top-right
    pub fn quadrant(&self, index: usize) -> Rect {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        match index & 3 {
            0 => Rect::new(self.x, self.y, hw, hh),
            1 => Rect::new(self.x + hw, self.y, hw, hh),
            2 => Rect::new(self.x, self.y + hh, hw, hh),
            _ => Rect::new(self.x + hw, self.y + hh, hw, hh),
        }
    }

    /// Clamp a point so it lies inside the rectangle
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.x, self.max_x().max(self.x)),
            point.y.clamp(self.y, self.max_y().max(self.y)),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}
