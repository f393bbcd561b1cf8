//! Engine Configuration
//!
//! Numeric policy shared by the collision, gravity and snap passes.
//! `Default` returns the values the editor ships with.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

/// Slack allowed before two faces count as interpenetrating.
pub const DEFAULT_OVERLAP_EPSILON: f64 = 1e-6;

/// How far a support's top may sit above an item's bottom and still carry it.
pub const DEFAULT_SUPPORT_TOLERANCE: f64 = 1e-3;

/// Maximum face-to-surface distance that snaps flush on drop.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 2.0;

const_assert!(DEFAULT_OVERLAP_EPSILON > 0.0);
const_assert!(DEFAULT_SUPPORT_TOLERANCE > DEFAULT_OVERLAP_EPSILON);
const_assert!(DEFAULT_SNAP_THRESHOLD > DEFAULT_SUPPORT_TOLERANCE);

/// Tolerances and thresholds for one engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Overlap slack for collision and footprint tests
    pub overlap_epsilon: f64,
    /// Support slack for gravity settling
    pub support_tolerance: f64,
    /// Snap distance in world units
    pub snap_threshold: f64,
    /// Run the snap pass when a move is dropped
    pub snap_on_drop: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overlap_epsilon: DEFAULT_OVERLAP_EPSILON,
            support_tolerance: DEFAULT_SUPPORT_TOLERANCE,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            snap_on_drop: true,
        }
    }
}

impl EngineConfig {
    /// Same config with snapping switched off.
    pub fn without_snap(self) -> Self {
        Self {
            snap_on_drop: false,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.overlap_epsilon, 1e-6);
        assert_eq!(config.snap_threshold, 2.0);
        assert!(config.snap_on_drop);
        assert!(!config.without_snap().snap_on_drop);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "snap_threshold": 3.5 }"#).unwrap();
        assert_eq!(config.snap_threshold, 3.5);
        assert_eq!(config.overlap_epsilon, DEFAULT_OVERLAP_EPSILON);
        assert!(config.snap_on_drop);
    }
}
