//! Axis-aligned boxes in screen space
//!
//! Screen space follows the host's convention: x grows to the right and y grows
//! downward, so `top() < bottom()` for any non-empty box. Player height above
//! the ground is converted with `GROUND_Y - y`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(left + width, top + height),
        }
    }

    /// Box of the given size standing with its bottom edge on `bottom`
    pub fn resting_on(left: f32, bottom: f32, size: Vec2) -> Self {
        Self::new(left, bottom - size.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Shrink every side inward by `amount`
    pub fn shrink(&self, amount: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(amount),
            max: self.max - Vec2::splat(amount),
        }
    }

    /// Shrink by a fraction of the shorter side
    pub fn inset(&self, fraction: f32) -> Self {
        self.shrink(self.size().min_element() * fraction)
    }

    /// Signed horizontal overlap (negative when the boxes are apart)
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        self.right().min(other.right()) - self.left().max(other.left())
    }

    /// Overlap test that counts shared edges as touching
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }
}
