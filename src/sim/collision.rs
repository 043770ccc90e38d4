//! Box geometry for collision detection
//!
//! Every body in the game is an axis-aligned rectangle described by its center
//! and size, so overlap testing reduces to interval checks on each axis.

use glam::DVec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn from_center(center: DVec2, size: DVec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// Strict overlap; boxes that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Penetration depth along each axis (zero when separated)
    pub fn penetration(&self, other: &Aabb) -> DVec2 {
        let x = (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0);
        let y = (self.max.y.min(other.max.y) - self.min.y.max(other.min.y)).max(0.0);
        if x == 0.0 || y == 0.0 {
            DVec2::ZERO
        } else {
            DVec2::new(x, y)
        }
    }
}
