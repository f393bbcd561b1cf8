//! Placement Tests - Collision, Rollback, Gravity and Snapping
//!
//! End-to-end tests that drive the planner the way an editor does: drag,
//! drop, nudge, rotate, and check the committed arrangement afterwards.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;
use truckload_engine::physics::SnapTarget;
use truckload_engine::{
    Aabb, CargoEnvelope, Dimensions, EngineConfig, ItemTemplate, PlacedItem, Planner,
    TransactionOutcome, Zone,
};

fn planner_with(length: f64, width: f64, height: f64) -> Planner {
    let envelope = CargoEnvelope::rect(length, width, height).unwrap();
    let zones = vec![Zone::from(envelope.bounds())];
    let mut planner = Planner::new(envelope, zones, EngineConfig::default());
    planner.add_template(ItemTemplate::new("cube", Dimensions::new(10.0, 10.0, 10.0)).unwrap());
    planner.add_template(
        ItemTemplate::new("rack", Dimensions::new(20.0, 10.0, 6.0))
            .unwrap()
            .with_flip(true),
    );
    planner
}

fn planner() -> Planner {
    planner_with(100.0, 40.0, 50.0)
}

fn cube(planner: &mut Planner, id: u32, x: f64, y: f64, z: f64) {
    planner.add_item(PlacedItem::new(id, "cube", DVec3::new(x, y, z)));
}

fn position(planner: &Planner, id: u32) -> DVec3 {
    planner.store().get(id).unwrap().position
}

// ============================================================================
// Collision and Rollback
// ============================================================================

#[test]
fn test_rollback_restores_exact_position() {
    let mut planner = planner_with(100.0, 60.0, 50.0);
    cube(&mut planner, 1, 10.0, 5.0, 0.0);
    cube(&mut planner, 2, 10.0, 5.0, 20.0);

    let outcome = planner.move_to(1, DVec3::new(10.0, 5.0, 20.0)).unwrap();

    assert!(!outcome.is_committed());
    // bit-exact, not approximately
    assert_eq!(position(&planner, 1), DVec3::new(10.0, 5.0, 0.0));
    assert_eq!(position(&planner, 2), DVec3::new(10.0, 5.0, 20.0));
}

#[test]
fn test_group_move_is_all_or_nothing() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    cube(&mut planner, 2, 20.0, 5.0, 0.0);
    cube(&mut planner, 3, 40.0, 5.0, 0.0);
    let revision = planner.store().revision();

    // item 1 would land free at x=15, item 2 would hit item 3
    let outcome = planner.move_items(&[1, 2], DVec3::new(15.0, 0.0, 0.0)).unwrap();

    let TransactionOutcome::RolledBack { restored, blocked_by } = outcome else {
        panic!("group move with one colliding member must roll back");
    };
    assert_eq!(blocked_by, vec![(2, 3)]);
    assert_eq!(restored.len(), 2);
    assert_eq!(position(&planner, 1), DVec3::new(0.0, 5.0, 0.0));
    assert_eq!(position(&planner, 2), DVec3::new(20.0, 5.0, 0.0));
    assert_eq!(planner.store().revision(), revision, "rollback must not write");
}

#[test]
fn test_group_members_do_not_block_each_other() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    cube(&mut planner, 2, 10.0, 5.0, 0.0);

    // item 1's candidate overlaps item 2's start pose, but item 2 moves too
    let outcome = planner.move_items(&[1, 2], DVec3::new(6.0, 0.0, 0.0)).unwrap();

    assert!(outcome.is_committed());
    assert_eq!(position(&planner, 1), DVec3::new(6.0, 5.0, 0.0));
    assert_eq!(position(&planner, 2), DVec3::new(16.0, 5.0, 0.0));
}

#[test]
fn test_flush_touching_boxes_do_not_collide() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    cube(&mut planner, 2, 30.0, 5.0, 0.0);

    let candidate = Aabb::from_center_half_extents(DVec3::new(10.0, 5.0, 0.0), DVec3::splat(5.0));
    let check = planner.check_collision(2, &candidate, &[]);
    assert!(!check.collides, "zero-gap contact is legal");
    assert_eq!(check.blocker, None);

    assert!(planner.move_to(2, DVec3::new(10.0, 5.0, 0.0)).unwrap().is_committed());
    assert!(planner.audit().overlapping.is_empty());
}

#[test]
fn test_outside_envelope_is_reported_not_rejected() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);

    let outcome = planner.move_to(1, DVec3::new(80.0, 5.0, 0.0)).unwrap();

    let TransactionOutcome::Committed { out_of_envelope, .. } = outcome else {
        panic!("staging outside the truck is legal");
    };
    assert_eq!(out_of_envelope, vec![1]);
    assert_eq!(planner.is_contained(1), Some(false));
}

#[test]
fn test_hidden_items_do_not_block() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    cube(&mut planner, 2, 25.0, 5.0, 0.0);
    planner.set_hidden(1, true);

    assert!(planner.move_to(2, DVec3::new(0.0, 5.0, 0.0)).unwrap().is_committed());
    assert_eq!(planner.audit().overlapping, Vec::new());
}

#[test]
fn test_no_overlap_after_any_sequence_of_moves() {
    let mut planner = planner();
    cube(&mut planner, 1, -30.0, 5.0, 0.0);
    cube(&mut planner, 2, 0.0, 5.0, 0.0);
    cube(&mut planner, 3, 30.0, 5.0, 0.0);
    cube(&mut planner, 4, 0.0, 5.0, 12.0);

    let moves = [
        (1, DVec3::new(27.0, 0.0, 0.0)),
        (3, DVec3::new(-25.0, 12.0, 1.0)),
        (4, DVec3::new(0.0, 20.0, -12.0)),
        (2, DVec3::new(3.0, 0.0, 3.0)),
        (1, DVec3::new(-3.5, 30.0, -3.0)),
        (3, DVec3::new(-33.0, 0.0, 0.0)),
        (4, DVec3::new(0.0, -40.0, 0.0)),
        (1, DVec3::new(3.0, -25.0, 3.0)),
        (3, DVec3::new(30.0, -5.0, 0.0)),
    ];
    for (id, delta) in moves {
        planner.move_items(&[id], delta);
        assert!(
            planner.audit().overlapping.is_empty(),
            "overlap after moving item {id} by {delta}"
        );
    }
}

// ============================================================================
// Drops Below the Floor
// ============================================================================

#[test]
fn test_sunk_move_lifted_into_neighbor_rolls_back() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    cube(&mut planner, 2, 30.0, 5.0, 0.0);

    // lands under item 1; the floor would push it straight into it
    let outcome = planner.move_items(&[2], DVec3::new(-30.0, -20.0, 0.0)).unwrap();

    let TransactionOutcome::RolledBack { blocked_by, .. } = outcome else {
        panic!("a box raised into its neighbor must roll back");
    };
    assert_eq!(blocked_by, vec![(2, 1)]);
    assert_eq!(position(&planner, 2), DVec3::new(30.0, 5.0, 0.0));
    assert!(planner.audit().overlapping.is_empty());
}

#[test]
fn test_tipped_rack_lifted_into_shelf_rolls_back() {
    let mut planner = planner();
    planner.add_template(ItemTemplate::new("post", Dimensions::new(10.0, 10.0, 20.0)).unwrap());
    planner.add_template(ItemTemplate::new("shelf", Dimensions::new(10.0, 30.0, 10.0)).unwrap());
    planner.add_template(
        ItemTemplate::new("low_rack", Dimensions::new(30.0, 6.0, 4.0))
            .unwrap()
            .with_flip(true),
    );
    planner.add_item(PlacedItem::new(1, "post", DVec3::new(0.0, 10.0, 15.0)));
    // rests on the post and overhangs the rack
    planner.add_item(PlacedItem::new(2, "shelf", DVec3::new(0.0, 25.0, 5.0)));
    planner.add_item(PlacedItem::new(3, "low_rack", DVec3::new(0.0, 2.0, 0.0)));
    assert!(planner.audit().overlapping.is_empty());

    // standing on end about its centroid pokes 13 below the floor
    let outcome = planner.rotate(&[3], DVec3::new(0.0, 0.0, FRAC_PI_2)).unwrap();

    let TransactionOutcome::RolledBack { blocked_by, .. } = outcome else {
        panic!("a rack raised into the shelf must roll back");
    };
    assert_eq!(blocked_by, vec![(3, 2)]);
    assert_eq!(planner.store().get(3).unwrap().rotation, DVec3::ZERO);
    assert_eq!(planner.store().half_extents(3), Some(DVec3::new(15.0, 2.0, 3.0)));
    assert!(planner.audit().overlapping.is_empty());
}

#[test]
fn test_sunk_stack_lands_as_a_stack() {
    let mut planner = planner();
    cube(&mut planner, 1, -30.0, 5.0, 0.0);
    cube(&mut planner, 2, -30.0, 15.0, 0.0);

    let outcome = planner.move_items(&[1, 2], DVec3::new(30.0, -8.0, 0.0)).unwrap();

    assert!(outcome.is_committed());
    assert_eq!(position(&planner, 1), DVec3::new(0.0, 5.0, 0.0));
    assert_eq!(position(&planner, 2), DVec3::new(0.0, 15.0, 0.0));
    assert!(planner.audit().overlapping.is_empty());
}

#[test]
fn test_sunk_stack_lifted_into_neighbor_rolls_back() {
    let mut planner = planner();
    cube(&mut planner, 1, -30.0, 5.0, 0.0);
    cube(&mut planner, 2, -30.0, 15.0, 0.0);
    cube(&mut planner, 3, 0.0, 5.0, 0.0);
    let revision = planner.store().revision();

    let outcome = planner.move_items(&[1, 2], DVec3::new(30.0, -8.0, 0.0)).unwrap();

    let TransactionOutcome::RolledBack { blocked_by, .. } = outcome else {
        panic!("group raised into a neighbor must roll back");
    };
    assert_eq!(blocked_by, vec![(1, 3)]);
    assert_eq!(position(&planner, 1), DVec3::new(-30.0, 5.0, 0.0));
    assert_eq!(position(&planner, 2), DVec3::new(-30.0, 15.0, 0.0));
    assert_eq!(planner.store().revision(), revision);
    assert!(planner.audit().overlapping.is_empty());
}

#[test]
fn test_tipping_a_stack_cannot_drop_one_member_into_another() {
    let mut planner = planner();
    planner.add_item(PlacedItem::new(1, "rack", DVec3::new(0.0, 3.0, 0.0)));
    planner.add_item(PlacedItem::new(2, "rack", DVec3::new(0.0, 9.0, 0.0)));

    // both stand on end in place; the lower one needs the floor under it
    // and the upper one would otherwise settle into the same spot
    let outcome = planner.rotate(&[1, 2], DVec3::new(0.0, 0.0, FRAC_PI_2)).unwrap();

    let TransactionOutcome::RolledBack { blocked_by, .. } = outcome else {
        panic!("members settling into each other must roll back");
    };
    assert_eq!(blocked_by, vec![(1, 2), (2, 1)]);
    assert_eq!(position(&planner, 1), DVec3::new(0.0, 3.0, 0.0));
    assert_eq!(position(&planner, 2), DVec3::new(0.0, 9.0, 0.0));
    assert_eq!(planner.store().get(2).unwrap().rotation, DVec3::ZERO);
    assert!(planner.audit().overlapping.is_empty());
}

// ============================================================================
// Gravity
// ============================================================================

#[test]
fn test_dropped_box_stacks_on_box_below() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    cube(&mut planner, 2, 30.0, 5.0, 0.0);

    planner.move_to(2, DVec3::new(0.0, 30.0, 0.0)).unwrap();

    assert_eq!(position(&planner, 2), DVec3::new(0.0, 15.0, 0.0));
}

#[test]
fn test_settle_is_idempotent() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    cube(&mut planner, 2, 3.0, 21.0, -2.0);

    let first = planner.settle(2);
    let second = planner.settle(2);
    assert_eq!(first, Some(15.0));
    assert_eq!(first, second);
}

#[test]
fn test_group_drop_settles_bottom_up() {
    let mut planner = planner();
    cube(&mut planner, 1, -30.0, 5.0, 0.0);
    cube(&mut planner, 2, -30.0, 15.0, 0.0);

    // lift the stack into the air; it lands as a stack, not collapsed
    planner.move_items(&[2, 1], DVec3::new(30.0, 20.0, 0.0)).unwrap();

    assert_eq!(position(&planner, 1), DVec3::new(0.0, 5.0, 0.0));
    assert_eq!(position(&planner, 2), DVec3::new(0.0, 15.0, 0.0));
}

// ============================================================================
// Snapping
// ============================================================================

#[test]
fn test_snap_threshold_boundary() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    cube(&mut planner, 2, 0.0, 5.0, 15.0);

    // min face 1.9 from the x = -50 wall
    planner.move_to(1, DVec3::new(-43.1, 5.0, 0.0)).unwrap();
    assert_eq!(position(&planner, 1).x, -45.0);

    // min face 2.1 from the same wall
    planner.move_to(2, DVec3::new(-42.9, 5.0, 15.0)).unwrap();
    assert_eq!(position(&planner, 2).x, -42.9);
}

#[test]
fn test_live_drag_never_snaps() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);

    planner.begin_move(&[1]);
    let validation = planner.drag(DVec3::new(-43.5, 0.0, 0.0)).unwrap();
    assert!(validation.is_valid());
    assert_eq!(position(&planner, 1), DVec3::new(0.0, 5.0, 0.0));

    planner.drop_move().unwrap();
    assert_eq!(position(&planner, 1).x, -45.0);
}

#[test]
fn test_snap_reports_neighbor_target() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    cube(&mut planner, 2, 30.0, 5.0, 0.0);

    let snapped = planner.snap(2, DVec3::new(11.2, 5.0, 0.0)).unwrap();
    assert_eq!(snapped.x, 10.0);
    assert_eq!(snapped.x_target, Some(SnapTarget::Item(1)));
}

#[test]
fn test_group_snap_keeps_formation() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    cube(&mut planner, 2, 12.0, 5.0, 0.0);

    let outcome = planner.move_items(&[1, 2], DVec3::new(-43.5, 0.0, 0.0)).unwrap();

    assert!(matches!(outcome, TransactionOutcome::Committed { snapped: true, .. }));
    assert_eq!(position(&planner, 1).x, -45.0);
    assert_eq!(position(&planner, 2).x, -33.0);
}

#[test]
fn test_nudge_moves_exact_step() {
    let mut planner = planner();
    cube(&mut planner, 1, -45.0, 5.0, 0.0);

    planner.nudge(&[1], DVec3::new(1.0, 0.0, 0.0)).unwrap();
    assert_eq!(position(&planner, 1), DVec3::new(-44.0, 5.0, 0.0));
}

// ============================================================================
// Rotation and Batch Commits
// ============================================================================

#[test]
fn test_group_rotation_turns_members_in_place() {
    let mut planner = planner();
    planner.add_item(PlacedItem::new(1, "rack", DVec3::new(-20.0, 3.0, 0.0)));
    planner.add_item(PlacedItem::new(2, "rack", DVec3::new(20.0, 3.0, 0.0)));

    let outcome = planner.rotate(&[1, 2], DVec3::new(0.0, FRAC_PI_2, 0.0)).unwrap();

    assert!(outcome.is_committed());
    assert_eq!(position(&planner, 1), DVec3::new(-20.0, 3.0, 0.0));
    assert_eq!(position(&planner, 2), DVec3::new(20.0, 3.0, 0.0));
    assert_eq!(planner.store().half_extents(1), Some(DVec3::new(5.0, 3.0, 10.0)));
    assert_eq!(planner.store().get(2).unwrap().rotation, DVec3::new(0.0, FRAC_PI_2, 0.0));
}

#[test]
fn test_rotation_into_neighbor_rolls_back() {
    let mut planner = planner();
    planner.add_item(PlacedItem::new(1, "rack", DVec3::new(0.0, 3.0, 0.0)));
    cube(&mut planner, 2, 0.0, 5.0, 12.0);

    // turning swaps the 20-long footprint onto z, into item 2
    let outcome = planner.rotate(&[1], DVec3::new(0.0, FRAC_PI_2, 0.0)).unwrap();

    assert!(!outcome.is_committed());
    assert_eq!(planner.store().get(1).unwrap().rotation, DVec3::ZERO);
}

#[test]
fn test_flip_stands_rack_on_end() {
    let mut planner = planner();
    planner.add_item(PlacedItem::new(1, "rack", DVec3::new(0.0, 3.0, 0.0)));

    planner.rotate(&[1], DVec3::new(0.0, 0.0, FRAC_PI_2)).unwrap();

    assert_eq!(planner.store().half_extents(1), Some(DVec3::new(3.0, 10.0, 5.0)));
    assert_eq!(position(&planner, 1).y, 10.0);
}

#[test]
fn test_refused_flip_is_told_apart_from_stale_ids() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    let revision = planner.store().revision();

    assert_eq!(
        planner.rotate(&[1], DVec3::new(FRAC_PI_2, 0.0, 0.0)),
        Some(TransactionOutcome::Refused { id: 1 })
    );
    assert_eq!(planner.rotate(&[7], DVec3::new(FRAC_PI_2, 0.0, 0.0)), None);
    assert_eq!(planner.store().revision(), revision);
}

#[test]
fn test_group_commit_bumps_revision_once() {
    let mut planner = planner();
    cube(&mut planner, 1, -30.0, 5.0, 0.0);
    cube(&mut planner, 2, 0.0, 5.0, 0.0);
    cube(&mut planner, 3, 30.0, 5.0, 0.0);
    let revision = planner.store().revision();

    planner.move_items(&[1, 2, 3], DVec3::new(0.0, 0.0, 5.0)).unwrap();

    assert_eq!(planner.store().revision(), revision + 1);
}

#[test]
fn test_cancelled_drag_writes_nothing() {
    let mut planner = planner();
    cube(&mut planner, 1, 0.0, 5.0, 0.0);
    let revision = planner.store().revision();

    planner.begin_move(&[1]);
    planner.drag(DVec3::new(7.0, 0.0, 0.0));
    let starts = planner.cancel().unwrap();

    assert_eq!(starts[0].position, DVec3::new(0.0, 5.0, 0.0));
    assert_eq!(planner.store().revision(), revision);
}
