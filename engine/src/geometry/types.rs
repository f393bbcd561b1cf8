//! Geometry type re-exports from glam
//!
//! World math runs in double precision: the overlap epsilon sits below
//! single-precision resolution at truck scale.

pub use glam::{DMat3, DQuat, DVec2, DVec3, EulerRot};

/// A world-space point.
pub type Point3 = DVec3;
