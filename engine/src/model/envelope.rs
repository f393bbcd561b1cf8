//! Cargo envelope
//!
//! The interior volume of the truck. The envelope box sits on the floor
//! plane and is centered on the origin in X and Z:
//!
//! - x in `[-length/2, length/2]`
//! - y in `[0, height]`
//! - z in `[-width/2, width/2]`
//!
//! The shape parameters (wheel wells, front overhang) are kept here only so
//! a zone provider can turn them into usable zones; the engine itself never
//! interprets them.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, require_positive};
use crate::geometry::Aabb;

/// Which shape family an envelope uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeMode {
    Rect,
    WheelWells,
    FrontBonus,
}

/// Wheel-well notches cut out of the floor on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelWellConfig {
    pub well_height: f64,
    /// Width of each well, measured in from the side wall
    pub well_width: f64,
    pub well_length: f64,
    /// Distance from the rear wall to the start of the well
    pub well_offset: f64,
}

/// Extra volume above the cab at the front of the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontBonusConfig {
    pub bonus_length: f64,
    pub bonus_width: f64,
    pub bonus_height: f64,
}

/// Envelope shape with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum EnvelopeShape {
    #[default]
    Rect,
    WheelWells(WheelWellConfig),
    FrontBonus(FrontBonusConfig),
}

impl EnvelopeShape {
    pub fn mode(&self) -> ShapeMode {
        match self {
            EnvelopeShape::Rect => ShapeMode::Rect,
            EnvelopeShape::WheelWells(_) => ShapeMode::WheelWells,
            EnvelopeShape::FrontBonus(_) => ShapeMode::FrontBonus,
        }
    }
}

fn clamp_len(value: f64, max: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, max) } else { 0.0 }
}

impl WheelWellConfig {
    fn clamped(self, length: f64, width: f64, height: f64) -> Self {
        let well_length = clamp_len(self.well_length, length);
        Self {
            well_height: clamp_len(self.well_height, height),
            well_width: clamp_len(self.well_width, width * 0.5),
            well_length,
            well_offset: clamp_len(self.well_offset, length - well_length),
        }
    }
}

impl FrontBonusConfig {
    fn clamped(self, length: f64, width: f64, height: f64) -> Self {
        Self {
            bonus_length: clamp_len(self.bonus_length, length),
            bonus_width: clamp_len(self.bonus_width, width),
            bonus_height: clamp_len(self.bonus_height, height),
        }
    }
}

/// The vehicle's cargo volume. Replaced wholesale on every edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CargoEnvelope {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub shape: EnvelopeShape,
}

impl CargoEnvelope {
    /// Validates the dimensions and clamps the shape parameters to them.
    pub fn new(
        length: f64,
        width: f64,
        height: f64,
        shape: EnvelopeShape,
    ) -> Result<Self, GeometryError> {
        let length = require_positive("envelope length", length)?;
        let width = require_positive("envelope width", width)?;
        let height = require_positive("envelope height", height)?;
        let shape = match shape {
            EnvelopeShape::Rect => EnvelopeShape::Rect,
            EnvelopeShape::WheelWells(cfg) => {
                EnvelopeShape::WheelWells(cfg.clamped(length, width, height))
            }
            EnvelopeShape::FrontBonus(cfg) => {
                EnvelopeShape::FrontBonus(cfg.clamped(length, width, height))
            }
        };
        Ok(Self {
            length,
            width,
            height,
            shape,
        })
    }

    /// A plain rectangular box.
    pub fn rect(length: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        Self::new(length, width, height, EnvelopeShape::Rect)
    }

    /// Re-runs validation on a value that bypassed `new` (e.g. deserialized).
    pub fn validated(self) -> Result<Self, GeometryError> {
        Self::new(self.length, self.width, self.height, self.shape)
    }

    pub fn shape_mode(&self) -> ShapeMode {
        self.shape.mode()
    }

    /// The main box in world space. Its X and Z faces are the snap walls.
    pub fn bounds(&self) -> Aabb {
        let half = DVec3::new(self.length * 0.5, 0.0, self.width * 0.5);
        Aabb::new(
            DVec3::new(-half.x, 0.0, -half.z),
            DVec3::new(half.x, self.height, half.z),
        )
    }
}
