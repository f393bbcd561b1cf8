//! Geometry module
//!
//! Axis-aligned boxes and the math types every other module works in.
//!
//! # Unit System
//!
//! The engine is unit-agnostic: every length (envelope, templates, zones,
//! positions, thresholds) must be expressed in the same unit. Conversion to
//! and from display units happens outside the engine.
//!
//! # Axes
//!
//! - X runs along the truck length
//! - Y is up (gravity pulls towards -Y, the floor is `y = 0`)
//! - Z runs across the truck width

pub mod aabb;
pub mod types;

pub use aabb::{Aabb, Axis};
pub use types::{DMat3, DQuat, DVec2, DVec3, EulerRot, Point3};
