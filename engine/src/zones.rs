//! Usable zones
//!
//! A zone is one axis-aligned box of legal cargo space. A rectangular truck
//! has a single zone; wheel wells or a front overhang turn the usable volume
//! into several boxes. Working those boxes out from an envelope is the job of
//! a [`ZoneProvider`], which lives outside the engine. The engine only
//! consumes the finished list and must be handed a fresh one whenever the
//! envelope changes.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::Aabb;
use crate::model::CargoEnvelope;

/// One box of usable space, in the same world frame as item boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub min: DVec3,
    pub max: DVec3,
}

impl Zone {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.min, self.max)
    }

    pub fn is_well_formed(&self) -> bool {
        self.bounds().is_well_formed()
    }
}

impl From<Aabb> for Zone {
    fn from(aabb: Aabb) -> Self {
        Self::new(aabb.min, aabb.max)
    }
}

/// Produces the usable zones for an envelope snapshot.
pub trait ZoneProvider {
    fn usable_zones(&self, envelope: &CargoEnvelope) -> Vec<Zone>;
}

impl<F> ZoneProvider for F
where
    F: Fn(&CargoEnvelope) -> Vec<Zone>,
{
    fn usable_zones(&self, envelope: &CargoEnvelope) -> Vec<Zone> {
        self(envelope)
    }
}

/// A fixed zone list, independent of the envelope passed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticZones(pub Vec<Zone>);

impl ZoneProvider for StaticZones {
    fn usable_zones(&self, _envelope: &CargoEnvelope) -> Vec<Zone> {
        self.0.clone()
    }
}

/// Drops malformed zones (inverted or non-finite corners), keeping order.
pub fn sanitize_zones(zones: Vec<Zone>) -> Vec<Zone> {
    let before = zones.len();
    let kept: Vec<Zone> = zones.into_iter().filter(Zone::is_well_formed).collect();
    if kept.len() != before {
        warn!(
            dropped = before - kept.len(),
            kept = kept.len(),
            "ignoring malformed zones"
        );
    }
    kept
}
