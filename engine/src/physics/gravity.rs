//! Gravity settling
//!
//! Single-step resting height, not a simulation. With X and Z fixed, an item
//! comes to rest on the highest top face among the items underneath its
//! footprint, or on the floor (`y = 0`) when nothing is there.
//!
//! An item counts as "underneath" only when its top is at or below the
//! settling item's bottom plus the support tolerance. Anything higher is
//! above the settling item (or would already have collided with it) and can
//! never pull it upwards.

use crate::geometry::Aabb;
use crate::model::ItemId;
use crate::spatial::{Body, SpatialIndex};

/// Resting centroid Y for a box with vertical half extent `half_y` and the
/// given current `aabb`, over candidate `supports`.
pub fn resting_y<'a>(
    aabb: &Aabb,
    half_y: f64,
    supports: impl Iterator<Item = &'a Body>,
    tolerance: f64,
    epsilon: f64,
) -> f64 {
    let bottom = aabb.bottom();
    let mut rest = half_y;
    for support in supports {
        let other = support.aabb();
        if !aabb.overlaps_xz(&other, epsilon) {
            continue;
        }
        if other.top() <= bottom + tolerance {
            rest = rest.max(other.top() + half_y);
        }
    }
    rest
}

/// Resting Y for an indexed item against every other indexed item.
/// `None` if the id is not in the index.
pub fn settle(index: &SpatialIndex, id: ItemId, tolerance: f64, epsilon: f64) -> Option<f64> {
    let body = index.get(id)?;
    let supports = index.iter().filter(|other| other.id != id);
    Some(resting_y(
        &body.aabb(),
        body.half_extents.y,
        supports,
        tolerance,
        epsilon,
    ))
}

/// Settles `ids` one at a time, lowest bottom face first (ties by id), writing
/// each result back into the index so items resting on a moved item follow
/// it down in the same pass. Unknown ids are skipped. Returns the new Y of
/// every settled item in processing order.
pub fn settle_group(
    index: &mut SpatialIndex,
    ids: &[ItemId],
    tolerance: f64,
    epsilon: f64,
) -> Vec<(ItemId, f64)> {
    let mut order: Vec<(ItemId, f64)> = ids
        .iter()
        .filter_map(|&id| index.get(id).map(|b| (id, b.aabb().bottom())))
        .collect();
    order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    order.dedup_by_key(|entry| entry.0);

    let mut settled = Vec::with_capacity(order.len());
    for (id, _) in order {
        let Some(y) = settle(index, id, tolerance, epsilon) else {
            continue;
        };
        if let Some(body) = index.get(id) {
            let center = body.center.with_y(y);
            index.set_center(id, center);
        }
        settled.push((id, y));
    }
    settled
}

/// Settles every indexed item bottom-up.
pub fn settle_all(index: &mut SpatialIndex, tolerance: f64, epsilon: f64) -> Vec<(ItemId, f64)> {
    let ids: Vec<ItemId> = index.iter().map(|b| b.id).collect();
    settle_group(index, &ids, tolerance, epsilon)
}
