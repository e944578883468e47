//! Shared types used throughout the library.

mod address;
mod vertex;

pub use address::SegmentAddress;
pub use vertex::Vertex;

use glam::IVec3;
use serde::Serialize;

/// An axis-aligned bounding box in model units.
///
/// Bounds are inclusive on both ends. An empty box has `min` above `max` on
/// every axis so that the first included point defines it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub min: IVec3,
    pub max: IVec3,
}

impl BoundingBox {
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// A box containing nothing.
    pub fn empty() -> Self {
        Self {
            min: IVec3::splat(i32::MAX),
            max: IVec3::splat(i32::MIN),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = IVec3>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.include(p);
        }
        bounds
    }

    /// Grow the box to contain `point`.
    pub fn include(&mut self, point: IVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns `true` if no point has been included.
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Per-axis extent. Negative on an empty box.
    pub fn dimensions(&self) -> IVec3 {
        if self.is_empty() {
            return IVec3::splat(-1);
        }
        self.max - self.min
    }

    /// The largest axis extent, never below zero.
    pub fn largest_extent(&self) -> i32 {
        self.dimensions().max_element().max(0)
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: IVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
