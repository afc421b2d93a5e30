use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tableau_attr::{ArrayData, AttributeArray};
use tableau_common::quat_to_rxyz;
use tableau_scene::{FeatureConfig, Scene};
use tableau_shapes::Shape;

/// An attribute value as nested lists following the array's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nested {
    U32(u32),
    F32(f32),
    List(Vec<Nested>),
}

impl From<&AttributeArray> for Nested {
    fn from(array: &AttributeArray) -> Self {
        match array.data() {
            ArrayData::F32(v) => nest(array.shape(), v, Nested::F32),
            ArrayData::U32(v) => nest(array.shape(), v, Nested::U32),
        }
    }
}

fn nest<T: Copy>(shape: &[usize], data: &[T], leaf: fn(T) -> Nested) -> Nested {
    match shape.split_first() {
        None => data.first().map_or(Nested::List(Vec::new()), |&x| leaf(x)),
        Some((&n, rest)) => {
            let stride: usize = rest.iter().product();
            Nested::List(
                (0..n)
                    .map(|i| nest(rest, &data[i * stride..(i + 1) * stride], leaf))
                    .collect(),
            )
        }
    }
}

/// One primitive: its class name, attributes, and scene transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveDocument {
    pub id: String,
    pub class: String,
    pub attributes: BTreeMap<String, Nested>,
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
}

impl PrimitiveDocument {
    /// Describe `shape`, keeping only attributes accepted by `include`.
    pub(crate) fn from_shape(shape: &Shape, include: impl Fn(&str) -> bool) -> Self {
        let attributes = shape
            .attributes()
            .into_iter()
            .filter(|(name, _)| include(name))
            .map(|(name, value)| (name.to_string(), Nested::from(&value)))
            .collect();
        Self {
            id: shape.id().0.to_string(),
            class: shape.kind().name().to_string(),
            attributes,
            translation: shape.translation().to_array(),
            rotation: quat_to_rxyz(shape.rotation()),
        }
    }
}

/// A whole scene. Rotations are real part first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub size: [f32; 2],
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
    pub zoom: f32,
    pub pixel_scale: f32,
    pub features: BTreeMap<String, FeatureConfig>,
    pub primitives: Vec<PrimitiveDocument>,
}

impl SceneDocument {
    pub(crate) fn header(scene: &Scene) -> Self {
        let features = scene
            .enabled_features()
            .into_iter()
            .filter_map(|name| {
                scene
                    .get_feature_config(name)
                    .map(|params| (name.to_string(), params.clone()))
            })
            .collect();
        Self {
            size: scene.size().to_array(),
            translation: scene.translation().to_array(),
            rotation: quat_to_rxyz(scene.rotation()),
            zoom: scene.zoom(),
            pixel_scale: scene.pixel_scale(),
            features,
            primitives: Vec::new(),
        }
    }
}
