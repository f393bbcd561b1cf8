//! Planner
//!
//! Owns one arrangement (store, envelope, zones, config) and at most one
//! in-flight [`PlacementTransaction`]. Every transform change goes through a
//! transaction, so the store only ever sees whole batches.

use glam::DVec3;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::geometry::Aabb;
use crate::model::{CargoEnvelope, ItemId, ItemTemplate, PlacedItem};
use crate::physics::{
    ArrangementReport, CollisionCheck, Snapped, audit, check_collision, is_contained, settle,
    settle_all, snap,
};
use crate::spatial::SpatialIndex;
use crate::store::{ItemStore, PoseUpdate};
use crate::zones::{Zone, ZoneProvider, sanitize_zones};

use super::transaction::{
    MemberStart, PlacementTransaction, TransactionOutcome, TransactionState, Validation,
};

#[derive(Debug, Clone)]
pub struct Planner {
    store: ItemStore,
    envelope: CargoEnvelope,
    zones: Vec<Zone>,
    config: EngineConfig,
    active: Option<PlacementTransaction>,
}

impl Planner {
    /// Creates an empty arrangement. `zones` are sanitized on the way in.
    pub fn new(envelope: CargoEnvelope, zones: Vec<Zone>, config: EngineConfig) -> Self {
        Self {
            store: ItemStore::new(),
            envelope,
            zones: sanitize_zones(zones),
            config,
            active: None,
        }
    }

    /// Creates an empty arrangement whose zones come from `provider`.
    pub fn with_provider(
        envelope: CargoEnvelope,
        provider: &impl ZoneProvider,
        config: EngineConfig,
    ) -> Self {
        let zones = provider.usable_zones(&envelope);
        Self::new(envelope, zones, config)
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn envelope(&self) -> &CargoEnvelope {
        &self.envelope
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Replaces the envelope and re-fetches its zones. Any move in progress
    /// is cancelled first; zones never change under a live transaction.
    pub fn set_envelope(&mut self, envelope: CargoEnvelope, provider: &impl ZoneProvider) {
        if self.cancel().is_some() {
            debug!("envelope changed, cancelled move in progress");
        }
        self.zones = sanitize_zones(provider.usable_zones(&envelope));
        self.envelope = envelope;
        info!(
            length = envelope.length,
            width = envelope.width,
            height = envelope.height,
            zones = self.zones.len(),
            "envelope updated"
        );
    }

    pub fn add_template(&mut self, template: ItemTemplate) -> Option<ItemTemplate> {
        self.store.insert_template(template)
    }

    /// Adds an item as-is. Placement rules are not applied; use
    /// [`Planner::move_items`] or [`Planner::settle_all`] afterwards.
    pub fn add_item(&mut self, item: PlacedItem) -> Option<PlacedItem> {
        self.store.insert_item(item)
    }

    /// Removes an item. Items that rested on it stay where they are until
    /// [`Planner::settle_all`] runs.
    pub fn remove_item(&mut self, id: ItemId) -> Option<PlacedItem> {
        if self.active.as_ref().is_some_and(|tx| tx.ids().contains(&id)) {
            self.active = None;
            debug!(id, "removed item was being moved, cancelled move");
        }
        self.store.remove_item(id)
    }

    pub fn set_hidden(&mut self, id: ItemId, hidden: bool) -> bool {
        self.store.set_hidden(id, hidden)
    }

    fn index(&self) -> SpatialIndex {
        SpatialIndex::from_store(&self.store)
    }

    /// Checks `candidate` for `id` against every other visible item.
    pub fn check_collision(&self, id: ItemId, candidate: &Aabb, ignore: &[ItemId]) -> CollisionCheck {
        check_collision(
            &self.index(),
            id,
            candidate,
            ignore,
            &self.zones,
            self.config.overlap_epsilon,
        )
    }

    /// Whether item `id` currently sits inside one usable zone.
    pub fn is_contained(&self, id: ItemId) -> Option<bool> {
        self.store.aabb(id).map(|aabb| is_contained(&aabb, &self.zones))
    }

    /// Resting Y for `id` at its current X/Z. Read-only.
    pub fn settle(&self, id: ItemId) -> Option<f64> {
        settle(
            &self.index(),
            id,
            self.config.support_tolerance,
            self.config.overlap_epsilon,
        )
    }

    /// Snap result for `id` if it were dropped at `candidate`. Read-only.
    pub fn snap(&self, id: ItemId, candidate: DVec3) -> Option<Snapped> {
        snap(
            &self.index(),
            id,
            candidate,
            &self.envelope.bounds(),
            &[],
            self.config.snap_threshold,
        )
    }

    /// Starts a drag of `ids`, replacing any move already in progress.
    /// Returns false when none of the ids exist.
    pub fn begin_move(&mut self, ids: &[ItemId]) -> bool {
        self.active = PlacementTransaction::begin(&self.store, ids);
        self.active.is_some()
    }

    pub fn active_move(&self) -> Option<&PlacementTransaction> {
        self.active.as_ref()
    }

    /// Live drag update: the group delta from the drag start, validated but
    /// neither snapped nor settled.
    pub fn drag(&mut self, delta: DVec3) -> Option<Validation> {
        let tx = self.active.as_mut()?;
        tx.propose_translation(delta);
        Some(tx.validate(&self.store, &self.zones, &self.config))
    }

    /// Ends the drag: commit or roll back.
    pub fn drop_move(&mut self) -> Option<TransactionOutcome> {
        let tx = self.active.take()?;
        let config = self.config;
        Some(self.finish(tx, &config))
    }

    /// Abandons the drag without touching the store.
    pub fn cancel(&mut self) -> Option<Vec<MemberStart>> {
        self.active.take().map(PlacementTransaction::cancel)
    }

    /// One-shot group move by `delta`, snapped and settled on drop.
    pub fn move_items(&mut self, ids: &[ItemId], delta: DVec3) -> Option<TransactionOutcome> {
        let config = self.config;
        self.run(ids, delta, DVec3::ZERO, &config)
    }

    /// Moves one item so its centroid lands on `position` before snapping
    /// and settling.
    pub fn move_to(&mut self, id: ItemId, position: DVec3) -> Option<TransactionOutcome> {
        let start = self.store.get(id)?.position;
        self.move_items(&[id], position - start)
    }

    /// Keyboard step. Never snaps, or a nudge away from a wall would be
    /// pulled straight back.
    pub fn nudge(&mut self, ids: &[ItemId], delta: DVec3) -> Option<TransactionOutcome> {
        let config = self.config.without_snap();
        self.run(ids, delta, DVec3::ZERO, &config)
    }

    /// Turns every member in place by `rotation_delta` (Euler XYZ, radians).
    ///
    /// Returns [`TransactionOutcome::Refused`] without starting a transaction
    /// when a member's template does not allow the resulting orientation, and
    /// `None` only when none of `ids` is in the store.
    pub fn rotate(&mut self, ids: &[ItemId], rotation_delta: DVec3) -> Option<TransactionOutcome> {
        for &id in ids {
            let Some(item) = self.store.get(id) else {
                continue;
            };
            let Some(template) = self.store.template_of(item) else {
                continue;
            };
            if !template.permits(item.rotation + rotation_delta) {
                debug!(id, template = %template.id, "rotation would tip a no-flip case, refused");
                return Some(TransactionOutcome::Refused { id });
            }
        }
        let config = self.config.without_snap();
        self.run(ids, DVec3::ZERO, rotation_delta, &config)
    }

    fn run(
        &mut self,
        ids: &[ItemId],
        delta: DVec3,
        rotation_delta: DVec3,
        config: &EngineConfig,
    ) -> Option<TransactionOutcome> {
        let mut tx = PlacementTransaction::begin(&self.store, ids)?;
        tx.propose_translation(delta);
        if rotation_delta != DVec3::ZERO {
            tx.propose_rotation(rotation_delta);
        }
        Some(self.finish(tx, config))
    }

    fn finish(&mut self, tx: PlacementTransaction, config: &EngineConfig) -> TransactionOutcome {
        let (state, outcome) = tx.finish(&mut self.store, &self.envelope, &self.zones, config);
        if state == TransactionState::RolledBack {
            info!("move rejected by collision, restored start poses");
        }
        outcome
    }

    /// Drops every visible item onto whatever is below it, bottom-up, as one
    /// batch. Returns the number of items that moved.
    pub fn settle_all(&mut self) -> usize {
        let mut index = self.index();
        let settled = settle_all(
            &mut index,
            self.config.support_tolerance,
            self.config.overlap_epsilon,
        );
        let updates: Vec<PoseUpdate> = settled
            .into_iter()
            .filter_map(|(id, y)| {
                let item = self.store.get(id)?;
                (item.position.y != y).then(|| PoseUpdate {
                    id,
                    position: item.position.with_y(y),
                    rotation: None,
                })
            })
            .collect();
        if updates.is_empty() {
            return 0;
        }
        let written = self.store.apply_batch(&updates);
        info!(written, "settled arrangement");
        written
    }

    pub fn audit(&self) -> ArrangementReport {
        audit(&self.store, &self.zones, self.config.overlap_epsilon)
    }
}
