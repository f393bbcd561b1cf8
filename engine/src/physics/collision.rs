//! Collision detection
//!
//! Pairwise AABB overlap with an epsilon so flush faces never collide.
//! Every query scans the spatial index once and stops at the first hit.
//!
//! # Example
//!
//! ```ignore
//! use truckload_engine::physics::collision::check_collision;
//!
//! let check = check_collision(&index, id, &candidate, &group, &zones, config.overlap_epsilon);
//! if check.collides {
//!     // reject the move
//! }
//! ```

use crate::geometry::Aabb;
use crate::model::ItemId;
use crate::spatial::SpatialIndex;
use crate::zones::Zone;

use super::containment::is_contained;

/// Result of validating one candidate box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionCheck {
    /// Whether the candidate overlaps a stationary item
    pub collides: bool,
    /// Whether the candidate sits fully inside one usable zone
    pub inside_envelope: bool,
    /// First item found overlapping the candidate
    pub blocker: Option<ItemId>,
}

/// True if the interiors of `a` and `b` overlap by more than `epsilon` on
/// all three axes.
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb, epsilon: f64) -> bool {
    a.overlaps(b, epsilon)
}

/// First indexed item (in id order) overlapping `candidate`, skipping `item_id`
/// and everything in `ignore`.
pub fn first_overlap(
    index: &SpatialIndex,
    item_id: ItemId,
    candidate: &Aabb,
    ignore: &[ItemId],
    epsilon: f64,
) -> Option<ItemId> {
    index
        .others(ignore)
        .filter(|body| body.id != item_id)
        .find(|body| overlaps(candidate, &body.aabb(), epsilon))
        .map(|body| body.id)
}

/// Validates a candidate box for `item_id` against every other visible item
/// not in `ignore`, and reports containment against `zones`.
pub fn check_collision(
    index: &SpatialIndex,
    item_id: ItemId,
    candidate: &Aabb,
    ignore: &[ItemId],
    zones: &[Zone],
    epsilon: f64,
) -> CollisionCheck {
    let blocker = first_overlap(index, item_id, candidate, ignore, epsilon);
    CollisionCheck {
        collides: blocker.is_some(),
        inside_envelope: is_contained(candidate, zones),
        blocker,
    }
}

/// Every overlapping pair in the index, each reported once as `(lower, higher)`.
pub fn overlapping_pairs(index: &SpatialIndex, epsilon: f64) -> Vec<(ItemId, ItemId)> {
    let bodies: Vec<_> = index.iter().collect();
    let mut pairs = Vec::new();
    for (i, a) in bodies.iter().enumerate() {
        let a_box = a.aabb();
        for b in &bodies[i + 1..] {
            if overlaps(&a_box, &b.aabb(), epsilon) {
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs
}
