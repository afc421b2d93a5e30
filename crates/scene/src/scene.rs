use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::{Rc, Weak};

use glam::{Quat, Vec2, Vec3};
use serde_json::{Value, json};
use tableau_common::ShapeId;
use tableau_shapes::Shape;

use crate::feature::{self, DIRECTIONAL_LIGHT, FeatureConfig, LINK_ROTATION};
use crate::{SceneConfig, SceneError};

/// Shared handle used to register a scene as a `link_rotation` target.
pub type SceneHandle = Rc<RefCell<Scene>>;

/// Quaternions closer than this per component count as equal when
/// propagating linked rotations.
const ROTATION_EPSILON: f32 = 1e-6;

/// An ordered collection of primitives with global view state.
///
/// The scene owns its primitives and keeps their scene transform in sync
/// with its own `translation` and `rotation`. Features are opaque named
/// parameter maps that a backend consults while rendering.
#[derive(Debug)]
pub struct Scene {
    primitives: Vec<Shape>,
    features: BTreeMap<String, FeatureConfig>,
    size: Vec2,
    pixel_scale: f32,
    translation: Vec3,
    rotation: Quat,
    zoom: f32,
    backend: &'static str,
    rotation_targets: Vec<Weak<RefCell<Scene>>>,
}

impl Default for Scene {
    fn default() -> Self {
        let mut scene = Self::bare(&SceneConfig::default());
        scene.insert_default_lights();
        scene
    }
}

impl Scene {
    /// Build an empty scene from `config`.
    ///
    /// `directional_light` is enabled with the default lights unless the
    /// config names it. `link_rotation` needs live scene handles and can
    /// only be enabled through [`Scene::link_rotation`].
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        let mut scene = Self::bare(&config);
        for (name, value) in config.features {
            if name == LINK_ROTATION {
                return Err(link_rotation_needs_handles());
            }
            let params = feature::from_value(&name, value)?;
            scene.features.insert(name, params);
        }
        if !scene.features.contains_key(DIRECTIONAL_LIGHT) {
            scene.insert_default_lights();
        }
        Ok(scene)
    }

    /// Build a scene from `config` holding `primitives` in order.
    pub fn with_primitives<I, S>(config: SceneConfig, primitives: I) -> Result<Self, SceneError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        let mut scene = Self::new(config)?;
        for primitive in primitives {
            scene.add_primitive(primitive);
        }
        Ok(scene)
    }

    fn bare(config: &SceneConfig) -> Self {
        Self {
            primitives: Vec::new(),
            features: BTreeMap::new(),
            size: config.size,
            pixel_scale: config.pixel_scale,
            translation: config.translation,
            rotation: config.rotation,
            zoom: config.zoom,
            backend: "core",
            rotation_targets: Vec::new(),
        }
    }

    fn insert_default_lights(&mut self) {
        let mut params = FeatureConfig::new();
        params.insert("value".to_string(), feature::default_directional_lights());
        self.features.insert(DIRECTIONAL_LIGHT.to_string(), params);
    }

    /// Name of the backend this scene was created for.
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub(crate) fn set_backend(&mut self, name: &'static str) {
        self.backend = name;
    }

    /// Settings needed to rebuild this scene, without `link_rotation`.
    pub fn config(&self) -> SceneConfig {
        let features = self
            .features
            .iter()
            .filter(|(name, _)| name.as_str() != LINK_ROTATION)
            .map(|(name, params)| (name.clone(), Value::Object(params.clone())))
            .collect();
        SceneConfig {
            features,
            size: self.size,
            translation: self.translation,
            rotation: self.rotation,
            zoom: self.zoom,
            pixel_scale: self.pixel_scale,
        }
    }

    /// Take over `other`'s `link_rotation` feature and targets, if any.
    pub(crate) fn inherit_rotation_link(&mut self, other: &Scene) {
        if let Some(params) = other.features.get(LINK_ROTATION) {
            self.features.insert(LINK_ROTATION.to_string(), params.clone());
            self.rotation_targets = other.rotation_targets.clone();
        }
    }

    // Features

    /// Enable `name`, storing `auto_value` under `"value"` on top of
    /// `parameters`. Re-enabling replaces the previous parameters.
    pub fn enable(
        &mut self,
        name: &str,
        auto_value: Option<Value>,
        parameters: FeatureConfig,
    ) -> Result<(), SceneError> {
        if name == LINK_ROTATION {
            return Err(link_rotation_needs_handles());
        }
        let params = feature::parameters(name, auto_value, parameters)?;
        tracing::debug!(feature = name, ?params, "enabling feature");
        self.features.insert(name.to_string(), params);
        Ok(())
    }

    /// Enable `name` with a single value.
    pub fn enable_value(&mut self, name: &str, value: impl Into<Value>) -> Result<(), SceneError> {
        self.enable(name, Some(value.into()), FeatureConfig::new())
    }

    /// Disable `name`. With `strict`, disabling a feature that is not
    /// enabled is an error.
    ///
    /// Disabling `link_rotation` detaches every target; each keeps the
    /// rotation it last received.
    pub fn disable(&mut self, name: &str, strict: bool) -> Result<(), SceneError> {
        if self.features.remove(name).is_none() {
            if strict {
                return Err(SceneError::FeatureNotEnabled(name.to_string()));
            }
            return Ok(());
        }
        if name == LINK_ROTATION {
            self.rotation_targets.clear();
        }
        tracing::debug!(feature = name, "disabled feature");
        Ok(())
    }

    pub fn get_feature_config(&self, name: &str) -> Option<&FeatureConfig> {
        self.features.get(name)
    }

    pub fn enabled_features(&self) -> BTreeSet<&str> {
        self.features.keys().map(String::as_str).collect()
    }

    /// Make every scene in `targets` follow this scene's rotation.
    ///
    /// Replaces any earlier targets and immediately pushes the current
    /// rotation. Targets are held weakly; dropped ones are skipped. A target
    /// that is currently borrowed, such as the handle holding this scene,
    /// does not receive the rotation.
    pub fn link_rotation(&mut self, targets: &[SceneHandle]) {
        self.rotation_targets = targets.iter().map(Rc::downgrade).collect();
        let mut params = FeatureConfig::new();
        params.insert("targets".to_string(), json!(targets.len()));
        self.features.insert(LINK_ROTATION.to_string(), params);
        tracing::debug!(targets = targets.len(), "linked rotation");
        self.push_rotation_to_targets();
    }

    fn push_rotation_to_targets(&self) {
        if !self.features.contains_key(LINK_ROTATION) {
            return;
        }
        for target in self.rotation_targets.iter().filter_map(Weak::upgrade) {
            let Ok(mut target) = target.try_borrow_mut() else {
                continue;
            };
            if !target.rotation.abs_diff_eq(self.rotation, ROTATION_EPSILON) {
                target.set_rotation(self.rotation);
            }
        }
    }

    // View state

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Viewport size in pixels.
    pub fn size_pixels(&self) -> Vec2 {
        self.size * self.pixel_scale
    }

    pub fn set_size_pixels(&mut self, size_pixels: Vec2) {
        self.size = size_pixels / self.pixel_scale;
    }

    pub fn pixel_scale(&self) -> f32 {
        self.pixel_scale
    }

    pub fn set_pixel_scale(&mut self, pixel_scale: f32) {
        self.pixel_scale = pixel_scale;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Set the translation of the scene and of every primitive in it.
    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        for primitive in &mut self.primitives {
            primitive.set_translation(translation);
        }
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Set the rotation of the scene and of every primitive in it, then
    /// forward it to `link_rotation` targets.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        for primitive in &mut self.primitives {
            primitive.set_rotation(rotation);
        }
        self.push_rotation_to_targets();
    }

    // Primitives

    /// Append `primitive`, giving it the scene's translation and rotation.
    pub fn add_primitive(&mut self, primitive: impl Into<Shape>) -> ShapeId {
        let mut primitive = primitive.into();
        primitive.set_translation(self.translation);
        primitive.set_rotation(self.rotation);
        let id = primitive.id();
        tracing::debug!(%id, kind = %primitive.kind(), len = primitive.len(), "added primitive");
        self.primitives.push(primitive);
        id
    }

    /// Remove the primitive with `id`. With `strict`, a missing primitive
    /// is an error; otherwise `Ok(None)`.
    pub fn remove_primitive(&mut self, id: ShapeId, strict: bool) -> Result<Option<Shape>, SceneError> {
        match self.primitives.iter().position(|p| p.id() == id) {
            Some(index) => {
                let removed = self.primitives.remove(index);
                tracing::debug!(%id, kind = %removed.kind(), "removed primitive");
                Ok(Some(removed))
            }
            None if strict => Err(SceneError::PrimitiveNotFound(id)),
            None => Ok(None),
        }
    }

    pub fn primitives(&self) -> &[Shape] {
        &self.primitives
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.primitives.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.primitives.get_mut(index)
    }

    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        self.primitives.iter().find(|p| p.id() == id)
    }

    pub fn find_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.primitives.iter_mut().find(|p| p.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.find(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.primitives.iter()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn link_rotation_needs_handles() -> SceneError {
    SceneError::InvalidFeature {
        name: LINK_ROTATION.to_string(),
        reason: "targets must be given as scene handles via Scene::link_rotation".to_string(),
    }
}
