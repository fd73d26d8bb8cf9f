//! Axis-aligned bounding boxes
//!
//! The only collision shape in the game. Touching faces count as overlap.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box centered on `center` extending `half_extents` along each axis
    #[inline]
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// True if the boxes share any point, faces and edges included
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// Bounding box of an entity at `position` with fixed `half_extents`
#[inline]
pub fn bounding_box_of(position: Vec3, half_extents: Vec3) -> Aabb {
    Aabb::from_center(position, half_extents)
}

/// Inclusive overlap test on all three axes
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.overlaps(b)
}
