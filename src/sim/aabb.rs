//! Axis-aligned boxes on a fixed ground plane
//!
//! Every collision in the game is a box-vs-box test. Boxes stay axis aligned in
//! world space because the corridor only ever turns in 90° steps.

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box from a center point and full extents
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Cube of the given half-extent around a point
    pub fn cube(center: Vec3, half_extent: f32) -> Self {
        Self {
            min: center - Vec3::splat(half_extent),
            max: center + Vec3::splat(half_extent),
        }
    }

    /// Inclusive overlap on all three axes (touching faces count)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Smallest signed X shift that moves `self` out of `other`.
    ///
    /// Positive moves `self` toward +X (it is mostly on the right), negative
    /// toward -X.
    #[inline]
    pub fn separation_x(&self, other: &Aabb) -> f32 {
        min_signed_overlap(other.max.x - self.min.x, self.max.x - other.min.x)
    }

    /// Smallest signed Z shift that moves `self` out of `other`
    #[inline]
    pub fn separation_z(&self, other: &Aabb) -> f32 {
        min_signed_overlap(other.max.z - self.min.z, self.max.z - other.min.z)
    }

    /// Horizontal push-out along the cheaper axis: (dx, 0, dz) with exactly one
    /// non-zero component. Ties resolve along Z.
    pub fn horizontal_push_out(&self, other: &Aabb) -> Vec3 {
        let dx = self.separation_x(other);
        let dz = self.separation_z(other);
        if dx.abs() < dz.abs() {
            Vec3::new(dx, 0.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, dz)
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// `positive` is how far to move +, `negative` how far to move -; pick the smaller
#[inline]
fn min_signed_overlap(positive: f32, negative: f32) -> f32 {
    if positive < negative { positive } else { -negative }
}
