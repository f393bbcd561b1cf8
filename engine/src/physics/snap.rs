//! Edge snapping
//!
//! Runs when a move is dropped, never during a live drag. X and Z are
//! handled independently: for each axis the moving item's faces are compared
//! against the envelope walls and the faces of every other visible item, and
//! the closest surface within the threshold wins. Y is left to gravity.
//!
//! # Candidate surfaces per axis
//!
//! - min wall against the item's min face, max wall against its max face
//! - another item's max face against the item's min face (abut on the far side)
//! - another item's min face against the item's max face (abut on the near side)
//!
//! # Tie-break
//!
//! Walls are scanned first (min, then max), then items in ascending id
//! order. A candidate replaces the current best only when strictly closer,
//! so on equal distances the earliest candidate in that order wins.

use glam::DVec3;

use crate::geometry::{Aabb, Axis};
use crate::model::ItemId;
use crate::spatial::SpatialIndex;

/// What an axis snapped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTarget {
    Wall,
    Item(ItemId),
}

/// Corrected X/Z for a dropped item. An axis that found nothing within the
/// threshold keeps its candidate coordinate and has no target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub x: f64,
    pub z: f64,
    pub x_target: Option<SnapTarget>,
    pub z_target: Option<SnapTarget>,
}

impl Snapped {
    /// Offset from `candidate` to the snapped position (Y is always zero).
    pub fn offset_from(&self, candidate: DVec3) -> DVec3 {
        DVec3::new(self.x - candidate.x, 0.0, self.z - candidate.z)
    }
}

#[derive(Clone, Copy)]
struct Best {
    distance: f64,
    /// Centroid coordinate that puts the face exactly on the surface
    center: f64,
    target: SnapTarget,
}

fn consider(
    best: &mut Option<Best>,
    face: f64,
    surface: f64,
    center: f64,
    target: SnapTarget,
    threshold: f64,
) {
    let distance = (surface - face).abs();
    if distance > threshold {
        return;
    }
    if best.is_none_or(|b| distance < b.distance) {
        *best = Some(Best {
            distance,
            center,
            target,
        });
    }
}

fn snap_axis(
    index: &SpatialIndex,
    id: ItemId,
    aabb: &Aabb,
    half: f64,
    walls: &Aabb,
    ignore: &[ItemId],
    axis: Axis,
    threshold: f64,
) -> Option<Best> {
    let item_min = axis.of(aabb.min);
    let item_max = axis.of(aabb.max);
    let mut best = None;

    let wall_min = axis.of(walls.min);
    let wall_max = axis.of(walls.max);
    consider(&mut best, item_min, wall_min, wall_min + half, SnapTarget::Wall, threshold);
    consider(&mut best, item_max, wall_max, wall_max - half, SnapTarget::Wall, threshold);

    for body in index.others(ignore).filter(|b| b.id != id) {
        let other = body.aabb();
        let target = SnapTarget::Item(body.id);
        let far = axis.of(other.max);
        let near = axis.of(other.min);
        consider(&mut best, item_min, far, far + half, target, threshold);
        consider(&mut best, item_max, near, near - half, target, threshold);
    }
    best
}

/// Snaps a box with the given `half_extents` centered at `candidate`.
/// Returns `None` when neither axis found a surface within `threshold`.
pub fn snap_box(
    index: &SpatialIndex,
    id: ItemId,
    candidate: DVec3,
    half_extents: DVec3,
    walls: &Aabb,
    ignore: &[ItemId],
    threshold: f64,
) -> Option<Snapped> {
    let aabb = Aabb::from_center_half_extents(candidate, half_extents);
    let x = snap_axis(index, id, &aabb, half_extents.x, walls, ignore, Axis::X, threshold);
    let z = snap_axis(index, id, &aabb, half_extents.z, walls, ignore, Axis::Z, threshold);
    if x.is_none() && z.is_none() {
        return None;
    }
    Some(Snapped {
        x: x.map_or(candidate.x, |b| b.center),
        z: z.map_or(candidate.z, |b| b.center),
        x_target: x.map(|b| b.target),
        z_target: z.map(|b| b.target),
    })
}

/// Snaps indexed item `id` as if it were centered at `candidate`, using its
/// indexed half extents. `None` for unknown ids or when nothing is in range.
pub fn snap(
    index: &SpatialIndex,
    id: ItemId,
    candidate: DVec3,
    walls: &Aabb,
    ignore: &[ItemId],
    threshold: f64,
) -> Option<Snapped> {
    let body = index.get(id)?;
    snap_box(index, id, candidate, body.half_extents, walls, ignore, threshold)
}
