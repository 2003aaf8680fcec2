//! Axis-aligned collision tests
//!
//! Everything in the game is a rectangle: the bird's hitbox and the two halves
//! of every pipe. Rectangles are stored as top-left corner plus size in world
//! units, with y growing downward.

use glam::Vec2;

/// Axis-aligned bounding box (top-left corner + extent)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Check whether two boxes overlap with positive area
    ///
    /// Boxes that only share an edge do not intersect, so a bird resting exactly
    /// on the lip of a pipe is still alive.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        left < right && top < bottom
    }
}

/// Which vertical edge of the world was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Check whether a box has left the vertical band `[0, height]`
///
/// The top edge wins when a box is taller than the band itself.
pub fn vertical_exit(bounds: &Aabb, height: f32) -> Option<Edge> {
    if bounds.top() < 0.0 {
        Some(Edge::Top)
    } else if bounds.bottom() > height {
        Some(Edge::Bottom)
    } else {
        None
    }
}
