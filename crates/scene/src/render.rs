use tableau_common::quat_to_rxyz;

use crate::Scene;

/// Backend-agnostic rendering interface.
///
/// A renderer reads a scene and produces output. Renderers that upload
/// incrementally consume dirty sets through their own entry points; plain
/// `render` leaves them untouched.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Human-readable summary of a scene, for the CLI, logs, and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let mut out = String::new();
        let size = scene.size();
        let pixels = scene.size_pixels();
        let t = scene.translation();
        let [r, x, y, z] = quat_to_rxyz(scene.rotation());

        out.push_str(&format!("=== Scene (backend={}) ===\n", scene.backend()));
        out.push_str(&format!(
            "Viewport: size=({:.1}, {:.1}) pixels=({:.0}, {:.0}) zoom={:.2}\n",
            size.x,
            size.y,
            pixels.x,
            pixels.y,
            scene.zoom()
        ));
        out.push_str(&format!(
            "Camera: translation=({:.2}, {:.2}, {:.2}) rotation=({:.3}, {:.3}, {:.3}, {:.3})\n",
            t.x, t.y, t.z, r, x, y, z
        ));
        let features: Vec<&str> = scene.enabled_features().into_iter().collect();
        out.push_str(&format!("Features: {}\n", features.join(", ")));
        out.push_str(&format!("Primitives: {}\n", scene.len()));

        for primitive in scene {
            let dirty = primitive.dirty_attributes();
            let dirty_bytes: usize = dirty
                .iter()
                .filter_map(|name| primitive.get(name).map(|value| value.as_bytes().len()))
                .sum();
            out.push_str(&format!(
                "  [{}] {} len={} dirty={} ({} bytes)\n",
                primitive.id(),
                primitive.kind(),
                primitive.len(),
                dirty.len(),
                dirty_bytes
            ));
        }

        out
    }
}
