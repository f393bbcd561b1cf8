//! Physics module
//!
//! The read-only queries of the placement engine. None of these functions
//! mutate the item store; they run over a [`SpatialIndex`] snapshot and
//! return plain values.
//!
//! # Submodules
//!
//! - [`collision`] - pairwise AABB overlap and candidate validation
//! - [`containment`] - single-zone enclosure and the arrangement audit
//! - [`gravity`] - resting height under simple stacking
//! - [`snap`] - flush alignment against walls and neighbors on drop
//!
//! [`SpatialIndex`]: crate::spatial::SpatialIndex

pub mod collision;
pub mod containment;
pub mod gravity;
pub mod snap;

pub use collision::{CollisionCheck, check_collision, first_overlap, overlapping_pairs, overlaps};
pub use containment::{ArrangementReport, audit, is_contained, out_of_gauge};
pub use gravity::{resting_y, settle, settle_all, settle_group};
pub use snap::{SnapTarget, Snapped, snap, snap_box};
