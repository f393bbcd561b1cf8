//! Placement transaction
//!
//! One drag, nudge or rotate of one item or a whole selection. The
//! transaction records where every member started, turns a single group
//! delta into per-member candidates (`start + delta`), validates them against
//! the stationary items, and on drop either commits everything in one batch
//! or rolls everything back.
//!
//! # States
//!
//! ```text
//! Idle -> Proposing -> Colliding | Valid -> Committed | RolledBack
//! ```
//!
//! - `Idle`: members recorded, nothing proposed yet
//! - `Proposing`: a delta has been applied but not validated
//! - `Colliding` / `Valid`: result of the last validation
//! - `Committed`: snap, gravity and the batch write ran
//! - `RolledBack`: a member collided, before or after settling; the store
//!   was never touched and the start poses are handed back so the caller can
//!   restore any preview
//!
//! Collision is the only rejection. Leaving the usable zones is reported but
//! does not block the move (staging space outside the truck is legal).
//!
//! The store is only read until commit, so abandoning a transaction without
//! finishing it needs no cleanup.

use glam::DVec3;
use tracing::debug;

use crate::config::EngineConfig;
use crate::geometry::Aabb;
use crate::model::{CargoEnvelope, ItemId};
use crate::physics::{check_collision, is_contained, overlaps, settle_group, snap_box};
use crate::spatial::SpatialIndex;
use crate::store::{ItemStore, PoseUpdate};
use crate::zones::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    Proposing,
    Colliding,
    Valid,
    Committed,
    RolledBack,
}

/// Pose of a member when the transaction began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberStart {
    pub id: ItemId,
    pub position: DVec3,
    pub rotation: DVec3,
}

/// Proposed pose of one member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: ItemId,
    pub position: DVec3,
    pub rotation: DVec3,
    pub half_extents: DVec3,
    /// Hidden members move along but take no part in any check
    pub hidden: bool,
}

impl Candidate {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}

/// Validation result for one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberStatus {
    pub id: ItemId,
    pub collides: bool,
    pub inside_envelope: bool,
    pub blocker: Option<ItemId>,
}

/// Validation result for the whole proposed set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub members: Vec<MemberStatus>,
}

impl Validation {
    /// True when no member collides.
    pub fn is_valid(&self) -> bool {
        self.members.iter().all(|m| !m.collides)
    }

    /// Members outside every usable zone (informational only).
    pub fn out_of_envelope(&self) -> Vec<ItemId> {
        self.members
            .iter()
            .filter(|m| !m.inside_envelope)
            .map(|m| m.id)
            .collect()
    }
}

/// How a finished transaction ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionOutcome {
    Committed {
        /// The batch written to the store
        updates: Vec<PoseUpdate>,
        /// Members that ended outside every usable zone
        out_of_envelope: Vec<ItemId>,
        /// Whether a snap correction was kept
        snapped: bool,
    },
    RolledBack {
        /// Exact start poses of every member
        restored: Vec<MemberStart>,
        /// `(member, blocker)` for each colliding member
        blocked_by: Vec<(ItemId, ItemId)>,
    },
    /// The request was rejected before any transaction began, because the
    /// template of `id` does not allow the requested orientation.
    Refused { id: ItemId },
}

impl TransactionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, TransactionOutcome::Committed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct PlacementTransaction {
    members: Vec<MemberStart>,
    delta: DVec3,
    rotation_delta: DVec3,
    state: TransactionState,
}

impl PlacementTransaction {
    /// Records the start poses of `ids`. Unknown ids are dropped; returns
    /// `None` when none of them exist.
    pub fn begin(store: &ItemStore, ids: &[ItemId]) -> Option<Self> {
        let mut members: Vec<MemberStart> = ids
            .iter()
            .filter_map(|&id| {
                let item = store.get(id);
                if item.is_none() {
                    debug!(id, "ignoring stale id in move selection");
                }
                item
            })
            .map(|item| MemberStart {
                id: item.id,
                position: item.position,
                rotation: item.rotation,
            })
            .collect();
        members.sort_by_key(|m| m.id);
        members.dedup_by_key(|m| m.id);
        if members.is_empty() {
            return None;
        }
        Some(Self {
            members,
            delta: DVec3::ZERO,
            rotation_delta: DVec3::ZERO,
            state: TransactionState::Idle,
        })
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn members(&self) -> &[MemberStart] {
        &self.members
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.members.iter().map(|m| m.id).collect()
    }

    pub fn delta(&self) -> DVec3 {
        self.delta
    }

    /// Sets the group translation. Every member's candidate is its own start
    /// position plus this delta; successive calls replace, not accumulate.
    pub fn propose_translation(&mut self, delta: DVec3) {
        self.delta = delta;
        self.state = TransactionState::Proposing;
    }

    /// Sets the rotation added to every member's start rotation. Members turn
    /// in place about their own centroids.
    pub fn propose_rotation(&mut self, rotation_delta: DVec3) {
        self.rotation_delta = rotation_delta;
        self.state = TransactionState::Proposing;
    }

    fn rotation_changed(&self) -> bool {
        self.rotation_delta != DVec3::ZERO
    }

    /// Current candidate poses. Members that vanished from the store since
    /// `begin` are skipped. If any visible member would sink below the floor,
    /// the whole group is raised until the lowest one rests on it, so every
    /// check sees the boxes where gravity can actually put them.
    pub fn candidates(&self, store: &ItemStore) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .members
            .iter()
            .filter_map(|start| {
                let item = store.get(start.id)?;
                let template = store.template_of(item)?;
                let rotation = start.rotation + self.rotation_delta;
                Some(Candidate {
                    id: start.id,
                    position: start.position + self.delta,
                    rotation,
                    half_extents: item.half_extents_at(template, rotation),
                    hidden: item.hidden,
                })
            })
            .collect();

        let sink = candidates
            .iter()
            .filter(|c| !c.hidden)
            .map(|c| c.half_extents.y - c.position.y)
            .fold(0.0, f64::max);
        if sink > 0.0 {
            for c in &mut candidates {
                c.position.y += sink;
            }
        }
        candidates
    }

    fn check(
        &self,
        index: &SpatialIndex,
        candidates: &[Candidate],
        zones: &[Zone],
        epsilon: f64,
    ) -> Validation {
        let ignore = self.ids();
        let members = candidates
            .iter()
            .map(|c| {
                let aabb = c.aabb();
                if c.hidden {
                    return MemberStatus {
                        id: c.id,
                        collides: false,
                        inside_envelope: is_contained(&aabb, zones),
                        blocker: None,
                    };
                }
                let check = check_collision(index, c.id, &aabb, &ignore, zones, epsilon);
                // Settling moves members independently, so one can end up
                // inside another.
                let blocker = check.blocker.or_else(|| {
                    candidates
                        .iter()
                        .filter(|o| !o.hidden && o.id != c.id)
                        .find(|o| overlaps(&aabb, &o.aabb(), epsilon))
                        .map(|o| o.id)
                });
                MemberStatus {
                    id: c.id,
                    collides: blocker.is_some(),
                    inside_envelope: check.inside_envelope,
                    blocker,
                }
            })
            .collect();
        Validation { members }
    }

    /// Validates the current proposal against the stationary items. Used on
    /// every live drag update; never snaps or settles.
    pub fn validate(&mut self, store: &ItemStore, zones: &[Zone], config: &EngineConfig) -> Validation {
        let index = SpatialIndex::from_store(store);
        let candidates = self.candidates(store);
        let validation = self.check(&index, &candidates, zones, config.overlap_epsilon);
        self.state = if validation.is_valid() {
            TransactionState::Valid
        } else {
            TransactionState::Colliding
        };
        validation
    }

    /// Abandons the transaction. Nothing was written, so this only hands back
    /// the start poses.
    pub fn cancel(self) -> Vec<MemberStart> {
        self.members
    }

    /// Drops the proposal: validate, then either roll back or snap, settle
    /// and commit as one batch. The settled poses are validated again before
    /// anything is written; a member that gravity carried into another box
    /// rolls the whole move back.
    pub fn finish(
        mut self,
        store: &mut ItemStore,
        envelope: &CargoEnvelope,
        zones: &[Zone],
        config: &EngineConfig,
    ) -> (TransactionState, TransactionOutcome) {
        let epsilon = config.overlap_epsilon;
        let stationary = SpatialIndex::from_store(store);
        let mut candidates = self.candidates(store);
        let validation = self.check(&stationary, &candidates, zones, epsilon);
        if !validation.is_valid() {
            return self.roll_back(&validation, "move collides, rolling back");
        }

        let snapped = config.snap_on_drop
            && self.apply_group_snap(&stationary, &mut candidates, envelope, zones, config);

        // Settle on a working copy so moved members see each other's new poses.
        let mut working = stationary.clone();
        for c in candidates.iter().filter(|c| !c.hidden) {
            working.set_pose(c.id, c.position, c.half_extents);
        }
        let visible: Vec<ItemId> = candidates.iter().filter(|c| !c.hidden).map(|c| c.id).collect();
        for (id, y) in settle_group(&mut working, &visible, config.support_tolerance, epsilon) {
            if let Some(c) = candidates.iter_mut().find(|c| c.id == id) {
                c.position.y = y;
            }
        }
        let settled = self.check(&stationary, &candidates, zones, epsilon);
        if !settled.is_valid() {
            return self.roll_back(&settled, "settled move collides, rolling back");
        }

        let rotated = self.rotation_changed();
        let updates: Vec<PoseUpdate> = candidates
            .iter()
            .map(|c| PoseUpdate {
                id: c.id,
                position: c.position,
                rotation: rotated.then_some(c.rotation),
            })
            .collect();
        let out_of_envelope: Vec<ItemId> = candidates
            .iter()
            .filter(|c| !is_contained(&c.aabb(), zones))
            .map(|c| c.id)
            .collect();

        let written = store.apply_batch(&updates);
        self.state = TransactionState::Committed;
        debug!(written, snapped, ?out_of_envelope, "move committed");
        (
            self.state,
            TransactionOutcome::Committed {
                updates,
                out_of_envelope,
                snapped,
            },
        )
    }

    fn roll_back(
        mut self,
        validation: &Validation,
        reason: &str,
    ) -> (TransactionState, TransactionOutcome) {
        self.state = TransactionState::RolledBack;
        let blocked_by: Vec<(ItemId, ItemId)> = validation
            .members
            .iter()
            .filter_map(|m| m.blocker.map(|b| (m.id, b)))
            .collect();
        debug!(members = self.members.len(), ?blocked_by, "{reason}");
        (
            self.state,
            TransactionOutcome::RolledBack {
                restored: self.members,
                blocked_by,
            },
        )
    }

    /// Snaps the group as one rigid body: each member proposes a correction
    /// per axis and the smallest one (lowest id on ties) moves the whole
    /// group. The correction is dropped if it would collide. Returns whether
    /// a correction was kept.
    fn apply_group_snap(
        &self,
        stationary: &SpatialIndex,
        candidates: &mut [Candidate],
        envelope: &CargoEnvelope,
        zones: &[Zone],
        config: &EngineConfig,
    ) -> bool {
        let walls = envelope.bounds();
        let ignore = self.ids();
        let mut best_x: Option<f64> = None;
        let mut best_z: Option<f64> = None;

        for c in candidates.iter().filter(|c| !c.hidden) {
            let Some(snapped) = snap_box(
                stationary,
                c.id,
                c.position,
                c.half_extents,
                &walls,
                &ignore,
                config.snap_threshold,
            ) else {
                continue;
            };
            let offset = snapped.offset_from(c.position);
            if snapped.x_target.is_some() && best_x.is_none_or(|b| offset.x.abs() < b.abs()) {
                best_x = Some(offset.x);
            }
            if snapped.z_target.is_some() && best_z.is_none_or(|b| offset.z.abs() < b.abs()) {
                best_z = Some(offset.z);
            }
        }
        if best_x.is_none() && best_z.is_none() {
            return false;
        }

        let single = candidates.len() == 1;
        let shift = DVec3::new(best_x.unwrap_or(0.0), 0.0, best_z.unwrap_or(0.0));
        let shifted: Vec<Candidate> = candidates
            .iter()
            .map(|c| {
                let mut moved = *c;
                if single {
                    // Exact face coordinates, no offset arithmetic.
                    if let Some(s) = snap_box(
                        stationary,
                        c.id,
                        c.position,
                        c.half_extents,
                        &walls,
                        &ignore,
                        config.snap_threshold,
                    ) {
                        moved.position.x = s.x;
                        moved.position.z = s.z;
                    }
                } else {
                    moved.position += shift;
                }
                moved
            })
            .collect();

        if !self.check(stationary, &shifted, zones, config.overlap_epsilon).is_valid() {
            debug!(?shift, "snap would collide, keeping unsnapped drop");
            return false;
        }
        candidates.copy_from_slice(&shifted);
        true
    }
}
