//! Plane geometry used by element layout
//!
//! Coordinates follow the page convention: x grows to the right and
//! y grows downward.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// A point (or offset) in the page plane
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for PointF {
    type Output = PointF;

    fn add(self, rhs: PointF) -> PointF {
        PointF::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f64> for PointF {
    type Output = PointF;

    fn mul(self, rhs: f64) -> PointF {
        PointF::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectF {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// A null rectangle has neither width nor height and never contributes to a union
    pub fn is_null(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn translated(&self, offset: PointF) -> RectF {
        RectF::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Smallest rectangle containing both `self` and `other`
    pub fn united(&self, other: &RectF) -> RectF {
        if self.is_null() {
            return *other;
        }
        if other.is_null() {
            return *self;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        RectF::new(left, top, right - left, bottom - top)
    }
}
