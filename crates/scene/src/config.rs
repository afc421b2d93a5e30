use std::collections::BTreeMap;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tableau_common::quat_from_rxyz;

/// Everything needed to construct a [`Scene`](crate::Scene).
///
/// `features` maps a feature name to either a parameter object or a plain
/// value, which becomes `{"value": value}`. `directional_light` is enabled
/// with its default lights unless named here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub features: BTreeMap<String, Value>,
    /// Viewport width and height in scene units, before zoom.
    pub size: Vec2,
    pub translation: Vec3,
    pub rotation: Quat,
    pub zoom: f32,
    /// Pixels per scene unit.
    pub pixel_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            features: BTreeMap::new(),
            size: Vec2::new(40.0, 30.0),
            translation: Vec3::new(0.0, 0.0, -50.0),
            rotation: Quat::IDENTITY,
            zoom: 1.0,
            pixel_scale: 20.0,
        }
    }
}

impl SceneConfig {
    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }

    pub fn with_size(mut self, size: [f32; 2]) -> Self {
        self.size = Vec2::from(size);
        self
    }

    pub fn with_translation(mut self, translation: [f32; 3]) -> Self {
        self.translation = Vec3::from(translation);
        self
    }

    /// Rotation quaternion given real part first, `[r, x, y, z]`.
    pub fn with_rotation(mut self, rotation: [f32; 4]) -> Self {
        self.rotation = quat_from_rxyz(rotation);
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_pixel_scale(mut self, pixel_scale: f32) -> Self {
        self.pixel_scale = pixel_scale;
        self
    }
}

/// Caller-provided replacements for a converted scene's settings.
///
/// Unset fields keep the source scene's values. `features` replaces the
/// whole feature table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneOverrides {
    pub features: Option<BTreeMap<String, Value>>,
    pub size: Option<Vec2>,
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub zoom: Option<f32>,
    pub pixel_scale: Option<f32>,
}

impl SceneOverrides {
    pub fn apply(self, base: SceneConfig) -> SceneConfig {
        SceneConfig {
            features: self.features.unwrap_or(base.features),
            size: self.size.unwrap_or(base.size),
            translation: self.translation.unwrap_or(base.translation),
            rotation: self.rotation.unwrap_or(base.rotation),
            zoom: self.zoom.unwrap_or(base.zoom),
            pixel_scale: self.pixel_scale.unwrap_or(base.pixel_scale),
        }
    }
}
