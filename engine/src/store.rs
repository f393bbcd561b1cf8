//! Item store
//!
//! Owns the templates and the placed items of one arrangement. Transform
//! fields (position, rotation) change only through [`ItemStore::apply_batch`],
//! which writes a whole transaction at once and bumps the revision exactly
//! once, so downstream consumers never see half of a group move.

use std::collections::{BTreeMap, HashMap};

use glam::DVec3;
use tracing::debug;

use crate::geometry::Aabb;
use crate::model::{Dimensions, ItemId, ItemTemplate, PlacedItem};

/// New transform for one item in a batch commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseUpdate {
    pub id: ItemId,
    pub position: DVec3,
    /// Only set when the transaction changed the rotation
    pub rotation: Option<DVec3>,
}

/// Templates plus placed items, keyed by id. Items iterate in ascending id
/// order.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    templates: HashMap<String, ItemTemplate>,
    items: BTreeMap<ItemId, PlacedItem>,
    revision: u64,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a template, returning the previous definition.
    pub fn insert_template(&mut self, template: ItemTemplate) -> Option<ItemTemplate> {
        self.templates.insert(template.id.clone(), template)
    }

    pub fn template(&self, template_id: &str) -> Option<&ItemTemplate> {
        self.templates.get(template_id)
    }

    pub fn templates(&self) -> impl Iterator<Item = &ItemTemplate> {
        self.templates.values()
    }

    /// Adds an item to the arrangement, replacing any item with the same id.
    pub fn insert_item(&mut self, item: PlacedItem) -> Option<PlacedItem> {
        self.revision += 1;
        self.items.insert(item.id, item)
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<PlacedItem> {
        let removed = self.items.remove(&id);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    pub fn get(&self, id: ItemId) -> Option<&PlacedItem> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &PlacedItem> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bumped once per structural change or batch commit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns false when the id is unknown.
    pub fn set_hidden(&mut self, id: ItemId, hidden: bool) -> bool {
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        item.hidden = hidden;
        self.revision += 1;
        true
    }

    /// Sets or clears the auto-arrangement dimensions. Returns false when the
    /// id is unknown or the dimensions are degenerate.
    pub fn set_oriented_dims(&mut self, id: ItemId, dims: Option<Dimensions>) -> bool {
        let dims = match dims.map(Dimensions::validated).transpose() {
            Ok(dims) => dims,
            Err(e) => {
                debug!(id, error = %e, "rejecting oriented dimensions");
                return false;
            }
        };
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        item.oriented_dims = dims;
        self.revision += 1;
        true
    }

    /// Template of a placed item.
    pub fn template_of(&self, item: &PlacedItem) -> Option<&ItemTemplate> {
        self.templates.get(&item.template_id)
    }

    /// Current world half extents, or `None` for unknown ids or templates.
    pub fn half_extents(&self, id: ItemId) -> Option<DVec3> {
        let item = self.items.get(&id)?;
        let template = self.template_of(item)?;
        Some(item.half_extents(template))
    }

    /// Current world box, recomputed from position and extents.
    pub fn aabb(&self, id: ItemId) -> Option<Aabb> {
        let item = self.items.get(&id)?;
        let template = self.template_of(item)?;
        Some(item.aabb(template))
    }

    /// Writes all updates as one change. Unknown ids are skipped. Returns the
    /// number of items written.
    pub fn apply_batch(&mut self, updates: &[PoseUpdate]) -> usize {
        let mut written = 0;
        for update in updates {
            let Some(item) = self.items.get_mut(&update.id) else {
                debug!(id = update.id, "skipping update for stale item id");
                continue;
            };
            item.position = update.position;
            if let Some(rotation) = update.rotation {
                item.rotation = rotation;
            }
            written += 1;
        }
        if written > 0 {
            self.revision += 1;
        }
        written
    }
}
