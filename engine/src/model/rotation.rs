//! Rotation helpers
//!
//! Rotations are continuous Euler angles (XYZ order, radians). The editor
//! only ever applies quarter turns, but nothing here depends on that: the
//! half extent of a turned item is the extent of the box that encloses its
//! rotated local box. For quarter turns that enclosing box is an exact
//! permutation of the local dimensions.

use glam::{DMat3, DVec3, EulerRot};

/// Matrix entries this close to 0 or 1 are snapped to the exact value.
const MATRIX_CLEAN_EPSILON: f64 = 1e-12;

/// Slack on the rotated up axis still counted as pointing straight up.
const UPRIGHT_EPSILON: f64 = 1e-9;

pub fn rotation_matrix(rotation: DVec3) -> DMat3 {
    DMat3::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

fn clean(v: DVec3) -> DVec3 {
    let snap = |c: f64| {
        if c.abs() < MATRIX_CLEAN_EPSILON {
            0.0
        } else if (c - 1.0).abs() < MATRIX_CLEAN_EPSILON {
            1.0
        } else {
            c
        }
    };
    DVec3::new(snap(v.x), snap(v.y), snap(v.z))
}

/// World-space half extents of a local box with `half` extents turned by
/// `rotation`: `|R| * half`.
pub fn enclosing_half_extents(rotation: DVec3, half: DVec3) -> DVec3 {
    if rotation == DVec3::ZERO {
        return half;
    }
    let m = rotation_matrix(rotation);
    let abs = DMat3::from_cols(
        clean(m.x_axis.abs()),
        clean(m.y_axis.abs()),
        clean(m.z_axis.abs()),
    );
    abs * half
}

/// True if the rotation leaves the item's local up axis pointing up, so the
/// base stays down. Upside down does not count.
pub fn is_upright(rotation: DVec3) -> bool {
    rotation_matrix(rotation).y_axis.y > 1.0 - UPRIGHT_EPSILON
}
