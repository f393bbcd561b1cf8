//! Truckload Engine Library
//!
//! Placement and collision engine for arranging cargo cases inside a truck.
//! Cases are axis-aligned boxes; the engine keeps an arrangement physically
//! valid while a user drags, nudges and rotates them: no two cases
//! interpenetrate, cases rest on the floor or on top of other cases, and
//! drops snap flush against walls and neighbors.
//!
//! # Modules
//!
//! - [`geometry`] - AABB math over `glam` double-precision vectors
//! - [`model`] - cargo envelope, case templates, placed items, rotation
//! - [`zones`] - usable zones and the zone-provider seam
//! - [`store`] - item store with batched transform commits
//! - [`spatial`] - snapshot of visible item boxes used by every query
//! - [`physics`] - collision, containment, gravity and snap queries
//! - [`placement`] - the placement transaction and the [`Planner`] facade
//! - [`config`] - tolerances and thresholds
//! - [`scene`] - JSON scene files
//! - [`error`] - error types
//!
//! # Example
//!
//! ```ignore
//! use truckload_engine::{CargoEnvelope, Dimensions, EngineConfig, ItemTemplate, PlacedItem, Planner, Zone};
//! use glam::DVec3;
//!
//! let envelope = CargoEnvelope::rect(100.0, 40.0, 50.0)?;
//! let zones = vec![Zone::from(envelope.bounds())];
//! let mut planner = Planner::new(envelope, zones, EngineConfig::default());
//!
//! planner.add_template(ItemTemplate::new("cube", Dimensions::new(10.0, 10.0, 10.0))?);
//! planner.add_item(PlacedItem::new(1, "cube", DVec3::new(0.0, 5.0, 0.0)));
//!
//! // Drag, then drop: validated, snapped, settled and committed in one batch
//! planner.begin_move(&[1]);
//! planner.drag(DVec3::new(20.0, 0.0, 0.0));
//! let outcome = planner.drop_move();
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod physics;
pub mod placement;
pub mod scene;
pub mod spatial;
pub mod store;
pub mod zones;

pub use config::EngineConfig;
pub use error::{GeometryError, SceneError};
pub use geometry::{Aabb, Axis, Point3};
pub use model::{CargoEnvelope, Dimensions, EnvelopeShape, ItemId, ItemShape, ItemTemplate, PlacedItem};
pub use placement::{PlacementTransaction, Planner, TransactionOutcome, TransactionState};
pub use scene::Scene;
pub use store::{ItemStore, PoseUpdate};
pub use zones::{StaticZones, Zone, ZoneProvider};
