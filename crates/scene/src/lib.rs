//! Scenes: ordered primitives plus global view state and named features.
//!
//! # Invariants
//! - Every primitive in a scene carries the scene's translation and
//!   rotation; setting either on the scene updates all of them.
//! - Rotation changes flow one way along `link_rotation`, from a scene to
//!   its targets.
//! - Conversion never mutates the source scene.

mod backend;
mod config;
mod coords;
mod error;
mod feature;
mod render;
mod scene;

pub use backend::{
    BLENDER, BUILTIN_BACKENDS, Backend, CORE, Compatibility, CopyFn, FRESNEL, MATPLOTLIB, POVRAY,
    PYTHREEJS, SupportTable, VISPY, ZDOG, backend_by_name,
};
pub use config::{SceneConfig, SceneOverrides};
pub use coords::{CoordinateSpace, Coords};
pub use error::SceneError;
pub use feature::{
    DIRECTIONAL_LIGHT, FeatureConfig, LINK_ROTATION, default_directional_lights,
};
pub use render::{DebugTextRenderer, Renderer};
pub use scene::{Scene, SceneHandle};

pub fn crate_info() -> &'static str {
    "tableau-scene v0.1.0"
}
