//! Error types
//!
//! Only contract violations are errors. Collisions, out-of-gauge placements
//! and missing snaps are ordinary results and never show up here.

use std::fmt;

/// Rejected dimensions on an envelope or item template.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A length, width or height that is zero or negative.
    NonPositiveDimension { field: &'static str, value: f64 },
    /// NaN or infinity where a finite number is required.
    NonFinite { field: &'static str },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::NonPositiveDimension { field, value } => {
                write!(f, "{field} must be positive (got {value})")
            }
            GeometryError::NonFinite { field } => write!(f, "{field} must be finite"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Errors that can occur while loading a scene file.
#[derive(Debug)]
pub enum SceneError {
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
    /// An envelope or template failed dimension validation.
    Geometry(GeometryError),
    /// A placed item references a template that is not in the scene.
    UnknownTemplate(String),
    /// Two placed items share the same id.
    DuplicateItem(u32),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "IO error: {e}"),
            SceneError::Json(e) => write!(f, "JSON error: {e}"),
            SceneError::Geometry(e) => write!(f, "invalid geometry: {e}"),
            SceneError::UnknownTemplate(id) => write!(f, "unknown template '{id}'"),
            SceneError::DuplicateItem(id) => write!(f, "duplicate item id {id}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io(e) => Some(e),
            SceneError::Json(e) => Some(e),
            SceneError::Geometry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        SceneError::Json(e)
    }
}

impl From<GeometryError> for SceneError {
    fn from(e: GeometryError) -> Self {
        SceneError::Geometry(e)
    }
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, GeometryError> {
    if !value.is_finite() {
        return Err(GeometryError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(GeometryError::NonPositiveDimension { field, value });
    }
    Ok(value)
}
