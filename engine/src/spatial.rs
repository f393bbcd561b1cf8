//! Spatial index
//!
//! A snapshot of every visible item's centroid and half extents, taken from
//! the store and optionally overridden with the candidate poses of a move in
//! progress. Queries are linear scans; at tens to low hundreds of cases that
//! is cheaper than maintaining a tree. Bodies are kept in ascending id order
//! so scan order, and with it every tie-break, is deterministic.

use glam::DVec3;

use crate::geometry::Aabb;
use crate::model::ItemId;
use crate::store::ItemStore;

/// Geometry of one visible item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: ItemId,
    pub center: DVec3,
    pub half_extents: DVec3,
}

impl Body {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    bodies: Vec<Body>,
}

impl SpatialIndex {
    /// Snapshot of all non-hidden items whose template resolves.
    pub fn from_store(store: &ItemStore) -> Self {
        let bodies = store
            .items()
            .filter(|item| !item.hidden)
            .filter_map(|item| {
                let template = store.template_of(item)?;
                Some(Body {
                    id: item.id,
                    center: item.position,
                    half_extents: item.half_extents(template),
                })
            })
            .collect();
        Self { bodies }
    }

    /// Builds an index from loose bodies, sorting them by id.
    pub fn from_bodies(mut bodies: Vec<Body>) -> Self {
        bodies.sort_by_key(|b| b.id);
        bodies.dedup_by_key(|b| b.id);
        Self { bodies }
    }

    pub fn get(&self, id: ItemId) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.bodies[i])
    }

    /// Replaces the geometry of an indexed body. Returns false for unknown
    /// ids.
    pub fn set_pose(&mut self, id: ItemId, center: DVec3, half_extents: DVec3) -> bool {
        match self.bodies.binary_search_by_key(&id, |b| b.id) {
            Ok(i) => {
                self.bodies[i].center = center;
                self.bodies[i].half_extents = half_extents;
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_center(&mut self, id: ItemId, center: DVec3) -> bool {
        match self.bodies.binary_search_by_key(&id, |b| b.id) {
            Ok(i) => {
                self.bodies[i].center = center;
                true
            }
            Err(_) => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Every body except the ids in `ignore`.
    pub fn others<'a>(&'a self, ignore: &'a [ItemId]) -> impl Iterator<Item = &'a Body> + 'a {
        self.bodies.iter().filter(move |b| !ignore.contains(&b.id))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
