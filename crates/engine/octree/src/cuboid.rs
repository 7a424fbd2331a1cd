//! Cuboid - axis-aligned integer box used to describe write regions
//!
//! Every box covers the half-open range `[min, min + extent)` on each axis.
//! Two boxes that only touch along a face, edge or corner do not intersect,
//! and a box with a zero extent on any axis intersects nothing.
//!
//! The far sides saturate at `i32::MAX`, so a box reaching past the end of
//! the coordinate range is treated as ending there.

use crate::OctreeError;
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in integer voxel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cuboid {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl Cuboid {
    pub const fn new(x: i32, y: i32, z: i32, width: i32, height: i32, depth: i32) -> Self {
        Self {
            x,
            y,
            z,
            width,
            height,
            depth,
        }
    }

    /// Create a box from its minimum corner and extent
    pub fn from_min_size(min: IVec3, size: IVec3) -> Self {
        Self::new(min.x, min.y, min.z, size.x, size.y, size.z)
    }

    /// Create a box from its minimum corner and exclusive maximum corner
    pub fn from_min_max(min: IVec3, max: IVec3) -> Self {
        Self::from_min_size(min, max.saturating_sub(min))
    }

    /// Create a cube with edge length `size` at `origin`
    pub fn cube(origin: IVec3, size: i32) -> Self {
        Self::new(origin.x, origin.y, origin.z, size, size, size)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn front(&self) -> i32 {
        self.z
    }

    #[inline]
    pub fn back(&self) -> i32 {
        self.z.saturating_add(self.depth)
    }

    /// Minimum corner (inclusive)
    #[inline]
    pub fn min(&self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// Maximum corner (exclusive)
    #[inline]
    pub fn max(&self) -> IVec3 {
        IVec3::new(self.right(), self.top(), self.back())
    }

    /// Extent on each axis
    #[inline]
    pub fn size(&self) -> IVec3 {
        IVec3::new(self.width, self.height, self.depth)
    }

    /// Number of unit cells covered, zero for degenerate boxes
    pub fn volume(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        self.width as i64 * self.height as i64 * self.depth as i64
    }

    /// True when the box has no positive extent on at least one axis
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0 || self.depth <= 0
    }

    /// Check if the two boxes share a region of positive volume
    pub fn is_intersecting(&self, other: &Cuboid) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
            && self.front() < other.back()
            && other.front() < self.back()
    }

    /// Overlap of the two boxes
    ///
    /// Calling this on boxes that do not intersect is a caller bug and
    /// yields [`OctreeError::DisjointCuboids`].
    pub fn find_intersection(&self, other: &Cuboid) -> Result<Cuboid, OctreeError> {
        self.intersection(other)
            .ok_or(OctreeError::DisjointCuboids {
                a: *self,
                b: *other,
            })
    }

    /// Overlap of the two boxes, `None` when they are disjoint
    pub fn intersection(&self, other: &Cuboid) -> Option<Cuboid> {
        if !self.is_intersecting(other) {
            return None;
        }
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        Some(Self::from_min_max(min, max))
    }

    /// Check if `other` lies entirely inside this box
    pub fn contains(&self, other: &Cuboid) -> bool {
        !other.is_empty()
            && other.min().cmpge(self.min()).all()
            && other.max().cmple(self.max()).all()
    }

    /// Check if the unit cell at `point` lies inside this box
    pub fn contains_point(&self, point: IVec3) -> bool {
        point.cmpge(self.min()).all() && point.cmplt(self.max()).all()
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: IVec3) -> Cuboid {
        Self::from_min_size(self.min() + offset, self.size())
    }
}
