//! Axis-aligned bounding boxes
//!
//! Boxes are always derived from a centroid and a half-extent vector and are
//! never stored on their own, so they cannot drift from the item they
//! describe.
//!
//! # Overlap rule
//!
//! Two boxes overlap only when their interiors intersect by more than an
//! epsilon on every axis. Faces that touch exactly (zero gap) do not count,
//! which is what makes stacking and wall-flush placement legal.
//!
//! # Example
//!
//! ```ignore
//! use truckload_engine::geometry::{Aabb, DVec3};
//!
//! let a = Aabb::from_center_half_extents(DVec3::new(0.0, 5.0, 0.0), DVec3::splat(5.0));
//! let b = Aabb::from_center_half_extents(DVec3::new(10.0, 5.0, 0.0), DVec3::splat(5.0));
//! assert!(!a.overlaps(&b, 1e-6));
//! ```

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// One of the three world axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component of `v` along this axis.
    #[inline]
    pub fn of(self, v: DVec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Axis-aligned bounding box defined by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Builds the box `center ± half_extents`.
    #[inline]
    pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> DVec3 {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Y of the bottom face.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.min.y
    }

    /// Y of the top face.
    #[inline]
    pub fn top(&self) -> f64 {
        self.max.y
    }

    /// True when every min component is at or below the matching max and all
    /// corners are finite.
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    pub fn translated(&self, delta: DVec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Strict interior overlap on a single axis, with `epsilon` of slack on
    /// both sides.
    #[inline]
    pub fn overlaps_on(&self, other: &Aabb, axis: Axis, epsilon: f64) -> bool {
        axis.of(self.min) < axis.of(other.max) - epsilon
            && axis.of(self.max) > axis.of(other.min) + epsilon
    }

    /// True if the interiors intersect on all three axes.
    /// Touching faces are NOT counted as overlap.
    pub fn overlaps(&self, other: &Aabb, epsilon: f64) -> bool {
        self.overlaps_on(other, Axis::X, epsilon)
            && self.overlaps_on(other, Axis::Y, epsilon)
            && self.overlaps_on(other, Axis::Z, epsilon)
    }

    /// Overlap of the footprints in the XZ plane, ignoring height.
    pub fn overlaps_xz(&self, other: &Aabb, epsilon: f64) -> bool {
        self.overlaps_on(other, Axis::X, epsilon) && self.overlaps_on(other, Axis::Z, epsilon)
    }

    /// True if `inner` lies fully inside this box (faces may coincide).
    pub fn encloses(&self, inner: &Aabb) -> bool {
        inner.min.cmpge(self.min).all() && inner.max.cmple(self.max).all()
    }
}
