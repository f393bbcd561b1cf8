//! Scene files
//!
//! JSON snapshot of one arrangement, used by the audit binary and by test
//! fixtures:
//!
//! ```json
//! {
//!   "config": { "snap_threshold": 2.0 },
//!   "envelope": { "length": 100.0, "width": 40.0, "height": 50.0 },
//!   "zones": [{ "min": [-50.0, 0.0, -20.0], "max": [50.0, 50.0, 20.0] }],
//!   "templates": [{ "id": "cube", "dimensions": { "length": 10.0, "width": 10.0, "height": 10.0 } }],
//!   "items": [{ "id": 1, "template_id": "cube", "position": [0.0, 5.0, 0.0] }]
//! }
//! ```
//!
//! `config` is optional and falls back to the defaults. When `zones` is
//! omitted the envelope's main box is the only zone.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::error::SceneError;
use crate::model::{CargoEnvelope, ItemTemplate, PlacedItem};
use crate::placement::Planner;
use crate::zones::Zone;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,
    pub envelope: CargoEnvelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<Zone>>,
    #[serde(default)]
    pub templates: Vec<ItemTemplate>,
    #[serde(default)]
    pub items: Vec<PlacedItem>,
}

impl Scene {
    /// Parses and validates a scene from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.validated()
    }

    /// Reads and validates a scene file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            templates = scene.templates.len(),
            items = scene.items.len(),
            "loaded scene"
        );
        Ok(scene)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshot of a planner's current arrangement.
    pub fn capture(planner: &Planner) -> Self {
        let mut templates: Vec<ItemTemplate> = planner.store().templates().cloned().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            config: Some(*planner.config()),
            envelope: *planner.envelope(),
            zones: Some(planner.zones().to_vec()),
            templates,
            items: planner.store().items().cloned().collect(),
        }
    }

    /// Checks dimensions, template references and item id uniqueness.
    /// Envelope shape parameters are clamped on the way through.
    pub fn validated(mut self) -> Result<Self, SceneError> {
        self.envelope = self.envelope.validated()?;
        for template in &mut self.templates {
            template.dimensions = template.dimensions.validated()?;
        }
        let known: BTreeSet<&str> = self.templates.iter().map(|t| t.id.as_str()).collect();
        let mut seen = BTreeSet::new();
        for item in &self.items {
            if !known.contains(item.template_id.as_str()) {
                return Err(SceneError::UnknownTemplate(item.template_id.clone()));
            }
            if !seen.insert(item.id) {
                return Err(SceneError::DuplicateItem(item.id));
            }
            if let Some(dims) = item.oriented_dims {
                dims.validated()?;
            }
        }
        Ok(self)
    }

    /// Builds a planner holding this scene's arrangement.
    pub fn into_planner(self) -> Planner {
        let zones = self
            .zones
            .unwrap_or_else(|| vec![Zone::from(self.envelope.bounds())]);
        let mut planner = Planner::new(self.envelope, zones, self.config.unwrap_or_default());
        for template in self.templates {
            planner.add_template(template);
        }
        for item in self.items {
            planner.add_item(item);
        }
        planner
    }
}
