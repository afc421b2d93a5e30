use std::path::Path;

use tableau_scene::{Backend, CopyFn, Renderer, Scene};
use tableau_shapes::{PrimitiveKind, Shape};

use crate::{JsonError, PrimitiveDocument, SceneDocument};

/// Primitive kinds a JSON consumer is expected to draw.
pub const SUPPORTED_KINDS: [PrimitiveKind; 10] = [
    PrimitiveKind::Arrows2D,
    PrimitiveKind::Disks,
    PrimitiveKind::Polygons,
    PrimitiveKind::Spheropolygons,
    PrimitiveKind::Lines,
    PrimitiveKind::Spheres,
    PrimitiveKind::SpherePoints,
    PrimitiveKind::Mesh,
    PrimitiveKind::ConvexPolyhedra,
    PrimitiveKind::ConvexSpheropolyhedra,
];

/// Writes scenes as JSON documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonBackend {
    /// Indent the output.
    pub pretty: bool,
}

impl JsonBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Every attribute of every primitive. Dirty marks are left alone.
    pub fn document(&self, scene: &Scene) -> SceneDocument {
        let mut document = SceneDocument::header(scene);
        document.primitives = scene
            .iter()
            .map(|shape| PrimitiveDocument::from_shape(shape, |_| true))
            .collect();
        document
    }

    /// Only the attributes changed since the last update, clearing their
    /// dirty marks. Every primitive is listed so consumers can match ids.
    pub fn changes(&self, scene: &Scene) -> SceneDocument {
        let mut document = SceneDocument::header(scene);
        document.primitives = scene
            .iter()
            .map(|shape| {
                let dirty = shape.take_dirty();
                PrimitiveDocument::from_shape(shape, |name| dirty.contains(name))
            })
            .collect();
        tracing::trace!(primitives = document.primitives.len(), "collected changed attributes");
        document
    }

    pub fn to_string(&self, document: &SceneDocument) -> Result<String, JsonError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(document)?
        } else {
            serde_json::to_string(document)?
        };
        Ok(text)
    }

    /// Serialized [`JsonBackend::changes`].
    pub fn render_changes(&self, scene: &Scene) -> Result<String, JsonError> {
        self.to_string(&self.changes(scene))
    }

    /// Write the full document for `scene` to `path`.
    pub fn save(&self, scene: &Scene, path: impl AsRef<Path>) -> Result<(), JsonError> {
        let path = path.as_ref();
        std::fs::write(path, self.render(scene)?)?;
        tracing::debug!(path = %path.display(), primitives = scene.len(), "saved scene");
        Ok(())
    }
}

impl Backend for JsonBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    fn primitive(&self, kind: PrimitiveKind) -> Option<CopyFn> {
        SUPPORTED_KINDS
            .contains(&kind)
            .then_some(Shape::copy as CopyFn)
    }
}

impl Renderer for JsonBackend {
    type Output = Result<String, JsonError>;

    fn render(&self, scene: &Scene) -> Self::Output {
        self.to_string(&self.document(scene))
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;
    use serde_json::{Value, json};
    use tableau_attr::AttributeArray;
    use tableau_scene::{Compatibility, SceneConfig, SceneError, SceneOverrides};
    use tableau_shapes::{BoxFrame, Disks, Mesh};

    use super::*;

    fn sample_scene() -> Scene {
        let disks = Disks::from_attributes([
            ("positions", AttributeArray::from(vec![[0.0f32, 0.0], [2.0, 1.0]])),
            ("colors", AttributeArray::from(vec![[1.0f32, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]])),
        ])
        .unwrap();
        let mut mesh = Mesh::from_attributes([("vertices", vec![[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])])
            .unwrap();
        mesh.set_indices(vec![[0u32, 1, 2]]).unwrap();
        Scene::with_primitives(
            SceneConfig::default().with_zoom(1.5).with_feature("ambient_light", 0.4),
            [disks.into_shape(), mesh.into_shape(), BoxFrame::new().into_shape()],
        )
        .unwrap()
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn convert_drops_unsupported_kinds() {
        let backend = JsonBackend::new();
        let scene = sample_scene()
            .convert(&backend, Compatibility::Ignore, SceneOverrides::default())
            .unwrap();
        assert_eq!(scene.backend(), "json");
        assert_eq!(scene.len(), 2);

        let err = sample_scene()
            .convert(&backend, Compatibility::Error, SceneOverrides::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnsupportedPrimitive { kind: PrimitiveKind::Box, .. }
        ));
    }

    #[test]
    fn full_document_layout() {
        let backend = JsonBackend::new();
        let mut scene = sample_scene()
            .convert(&backend, Compatibility::Ignore, SceneOverrides::default())
            .unwrap();
        scene.set_rotation(Quat::from_xyzw(0.0, 0.0, 1.0, 0.0));

        let doc = parse(&backend.render(&scene).unwrap());
        assert_eq!(doc["size"], json!([40.0, 30.0]));
        assert_eq!(doc["zoom"], json!(1.5));
        assert_eq!(doc["pixel_scale"], json!(20.0));
        assert_eq!(doc["rotation"], json!([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(doc["features"]["ambient_light"]["value"], json!(0.4));
        assert!(doc["features"]["directional_light"].is_object());

        let disks = &doc["primitives"][0];
        assert_eq!(disks["class"], "Disks");
        assert_eq!(disks["attributes"]["positions"], json!([[0.0, 0.0], [2.0, 1.0]]));
        assert_eq!(disks["attributes"]["radii"], json!([0.5]));
        assert_eq!(disks["attributes"]["outline"], json!(0.0));
        assert_eq!(disks["translation"], json!([0.0, 0.0, -50.0]));
        assert_eq!(disks["rotation"], json!([0.0, 0.0, 0.0, 1.0]));

        let mesh = &doc["primitives"][1];
        assert_eq!(mesh["class"], "Mesh");
        assert_eq!(mesh["attributes"]["indices"], json!([[0, 1, 2]]));
    }

    #[test]
    fn rendering_keeps_dirty_marks() {
        let backend = JsonBackend::new();
        let scene = sample_scene();
        backend.render(&scene).unwrap();
        assert!(!scene.get(0).unwrap().dirty_attributes().is_empty());
    }

    #[test]
    fn changes_emit_only_dirty_attributes() {
        let backend = JsonBackend::new();
        let mut scene = sample_scene()
            .convert(&backend, Compatibility::Ignore, SceneOverrides::default())
            .unwrap();

        let first = parse(&backend.render_changes(&scene).unwrap());
        assert_eq!(first["primitives"][0]["attributes"].as_object().unwrap().len(), 4);

        let second = parse(&backend.render_changes(&scene).unwrap());
        assert!(second["primitives"][0]["attributes"].as_object().unwrap().is_empty());
        assert_eq!(second["primitives"][0]["id"], first["primitives"][0]["id"]);

        scene.get_mut(0).unwrap().set("outline", 0.25f32).unwrap();
        let third = parse(&backend.render_changes(&scene).unwrap());
        assert_eq!(third["primitives"][0]["attributes"], json!({"outline": 0.25}));
        assert!(third["primitives"][1]["attributes"].as_object().unwrap().is_empty());
    }

    #[test]
    fn pretty_output_is_indented() {
        let scene = Scene::default();
        assert!(!JsonBackend::new().render(&scene).unwrap().contains('\n'));
        assert!(JsonBackend::pretty().render(&scene).unwrap().contains("\n  \"size\""));
    }

    #[test]
    fn save_writes_document() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scene.json");
        let backend = JsonBackend::pretty();
        let scene = sample_scene();
        backend.save(&scene, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let doc: SceneDocument = serde_json::from_str(&written).unwrap();
        assert_eq!(doc, backend.document(&scene));
        assert_eq!(doc.primitives.len(), 3);
    }

    #[test]
    fn save_to_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("scene.json");
        let err = JsonBackend::new().save(&Scene::default(), path).unwrap_err();
        assert!(matches!(err, JsonError::Io(_)));
    }
}
