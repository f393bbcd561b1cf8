//! Containment testing
//!
//! An item is inside the truck only when one single zone encloses its whole
//! box. A case bridging two zones (say, across a wheel-well notch) is out of
//! gauge even if the union of zones covers it: it would be resting on legal
//! floor while overhanging excluded space.
//!
//! The same predicate drives live validation of a candidate move and the
//! passive audit of the whole arrangement.

use crate::geometry::Aabb;
use crate::model::ItemId;
use crate::spatial::SpatialIndex;
use crate::store::ItemStore;
use crate::zones::Zone;

use super::collision::overlapping_pairs;

/// True if some single zone fully encloses `aabb` (faces may coincide).
/// An empty zone list contains nothing.
pub fn is_contained(aabb: &Aabb, zones: &[Zone]) -> bool {
    zones.iter().any(|zone| zone.bounds().encloses(aabb))
}

/// Ids of visible items that no single zone contains, ascending.
pub fn out_of_gauge(index: &SpatialIndex, zones: &[Zone]) -> Vec<ItemId> {
    index
        .iter()
        .filter(|body| !is_contained(&body.aabb(), zones))
        .map(|body| body.id)
        .collect()
}

/// Full-arrangement sweep over the visible items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrangementReport {
    /// Items fully inside one usable zone
    pub contained: Vec<ItemId>,
    /// Items outside every usable zone
    pub out_of_gauge: Vec<ItemId>,
    /// Pairs that interpenetrate (empty for a legal arrangement)
    pub overlapping: Vec<(ItemId, ItemId)>,
    /// Weight of the contained items
    pub loaded_weight: f64,
    /// Weight of every visible item
    pub total_weight: f64,
    /// Volume of the contained items' boxes
    pub loaded_volume: f64,
}

impl ArrangementReport {
    pub fn is_legal(&self) -> bool {
        self.overlapping.is_empty()
    }
}

/// Audits every visible item in `store` against `zones`.
pub fn audit(store: &ItemStore, zones: &[Zone], epsilon: f64) -> ArrangementReport {
    let index = SpatialIndex::from_store(store);
    let mut report = ArrangementReport {
        overlapping: overlapping_pairs(&index, epsilon),
        ..ArrangementReport::default()
    };

    for body in index.iter() {
        let aabb = body.aabb();
        let weight = store
            .get(body.id)
            .and_then(|item| store.template_of(item))
            .map_or(0.0, |t| t.weight);
        report.total_weight += weight;
        if is_contained(&aabb, zones) {
            report.contained.push(body.id);
            report.loaded_weight += weight;
            let size = aabb.size();
            report.loaded_volume += size.x * size.y * size.z;
        } else {
            report.out_of_gauge.push(body.id);
        }
    }
    report
}
