//! Config Module
//!
//! Centralized tolerances and thresholds for the placement engine.

pub mod engine_config;

pub use engine_config::{
    DEFAULT_OVERLAP_EPSILON, DEFAULT_SNAP_THRESHOLD, DEFAULT_SUPPORT_TOLERANCE, EngineConfig,
};
