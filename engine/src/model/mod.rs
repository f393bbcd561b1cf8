//! Data Model
//!
//! The cargo envelope, case templates and placed case instances.

pub mod envelope;
pub mod item;
pub mod rotation;

pub use envelope::{CargoEnvelope, EnvelopeShape, FrontBonusConfig, ShapeMode, WheelWellConfig};
pub use item::{Dimensions, ItemId, ItemShape, ItemTemplate, PlacedItem};
pub use rotation::{enclosing_half_extents, is_upright, rotation_matrix};
