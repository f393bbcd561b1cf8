//! Item templates and placed items
//!
//! A template is the reusable case definition; a placed item is one instance
//! of it in the arrangement. Geometry always flows from
//! `(oriented_dims ?? template dims) / 2`, rotated, around `position`. Nothing
//! is cached, so a change to `oriented_dims` or `rotation` is picked up by the
//! next query.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::rotation::{enclosing_half_extents, is_upright};
use crate::error::{GeometryError, require_positive};
use crate::geometry::Aabb;

/// Stable identity of a placed item within one arrangement.
pub type ItemId = u32;

/// Case dimensions. `length` runs along X, `width` along Z, `height` along Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Rejects zero, negative or non-finite values.
    pub fn validated(self) -> Result<Self, GeometryError> {
        Ok(Self {
            length: require_positive("length", self.length)?,
            width: require_positive("width", self.width)?,
            height: require_positive("height", self.height)?,
        })
    }

    /// Dimensions laid out as a world-axis vector.
    pub fn to_vec3(self) -> DVec3 {
        DVec3::new(self.length, self.height, self.width)
    }

    pub fn volume(self) -> f64 {
        self.length * self.width * self.height
    }
}

/// Outer shape of a case. Both shapes are bounded by the same box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemShape {
    #[default]
    Box,
    Cylinder,
}

/// Reusable case definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub can_flip: bool,
    #[serde(default)]
    pub shape: ItemShape,
    #[serde(default)]
    pub weight: f64,
}

impl ItemTemplate {
    pub fn new(id: impl Into<String>, dimensions: Dimensions) -> Result<Self, GeometryError> {
        Ok(Self {
            id: id.into(),
            name: None,
            dimensions: dimensions.validated()?,
            can_flip: false,
            shape: ItemShape::Box,
            weight: 0.0,
        })
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_flip(mut self, can_flip: bool) -> Self {
        self.can_flip = can_flip;
        self
    }

    pub fn with_shape(mut self, shape: ItemShape) -> Self {
        self.shape = shape;
        self
    }

    /// Whether `rotation` is allowed for this case. Cases that cannot flip
    /// may only turn about the vertical axis.
    pub fn permits(&self, rotation: DVec3) -> bool {
        self.can_flip || is_upright(rotation)
    }
}

fn is_false(v: &bool) -> bool {
    !v
}

/// One case instance in the arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: ItemId,
    pub template_id: String,
    /// World-space centroid
    pub position: DVec3,
    /// Euler angles (XYZ order, radians)
    #[serde(default)]
    pub rotation: DVec3,
    /// Axis-aligned dimensions set by an auto-arrangement pass; override the
    /// template's dimensions when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oriented_dims: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

impl PlacedItem {
    pub fn new(id: ItemId, template_id: impl Into<String>, position: DVec3) -> Self {
        Self {
            id,
            template_id: template_id.into(),
            position,
            rotation: DVec3::ZERO,
            oriented_dims: None,
            hidden: false,
        }
    }

    pub fn with_rotation(mut self, rotation: DVec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_oriented_dims(mut self, dims: Dimensions) -> Self {
        self.oriented_dims = Some(dims);
        self
    }

    /// Dimensions in the item's local frame, before rotation.
    pub fn local_dims(&self, template: &ItemTemplate) -> Dimensions {
        self.oriented_dims.unwrap_or(template.dimensions)
    }

    /// World-space half extents at the current rotation.
    pub fn half_extents(&self, template: &ItemTemplate) -> DVec3 {
        self.half_extents_at(template, self.rotation)
    }

    /// World-space half extents if the item were turned to `rotation`.
    pub fn half_extents_at(&self, template: &ItemTemplate, rotation: DVec3) -> DVec3 {
        enclosing_half_extents(rotation, self.local_dims(template).to_vec3() * 0.5)
    }

    pub fn aabb(&self, template: &ItemTemplate) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents(template))
    }
}
