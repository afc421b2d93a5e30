use std::fmt;
use std::str::FromStr;

use tableau_attr::AttributeError;
use tableau_shapes::{PrimitiveKind, Shape};

use crate::{Scene, SceneConfig, SceneError, SceneOverrides};

/// Builds a backend's equivalent of a primitive.
pub type CopyFn = fn(&Shape) -> Result<Shape, AttributeError>;

/// A rendering target that scenes can be converted to.
pub trait Backend {
    fn name(&self) -> &'static str;

    /// How this backend copies primitives of `kind`, or `None` when it
    /// cannot draw them.
    fn primitive(&self, kind: PrimitiveKind) -> Option<CopyFn>;

    fn supports(&self, kind: PrimitiveKind) -> bool {
        self.primitive(kind).is_some()
    }

    /// An empty scene for this backend.
    fn create_scene(&self, config: SceneConfig) -> Result<Scene, SceneError> {
        let mut scene = Scene::new(config)?;
        scene.set_backend(self.name());
        Ok(scene)
    }
}

/// A backend described only by the primitive kinds it can draw. Supported
/// primitives are copied unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportTable {
    pub name: &'static str,
    pub kinds: &'static [PrimitiveKind],
}

impl SupportTable {
    pub const fn new(name: &'static str, kinds: &'static [PrimitiveKind]) -> Self {
        Self { name, kinds }
    }
}

impl Backend for SupportTable {
    fn name(&self) -> &'static str {
        self.name
    }

    fn primitive(&self, kind: PrimitiveKind) -> Option<CopyFn> {
        self.kinds.contains(&kind).then_some(Shape::copy as CopyFn)
    }
}

use PrimitiveKind as K;

/// Supports every primitive kind.
pub const CORE: SupportTable = SupportTable::new("core", &PrimitiveKind::ALL);

pub const MATPLOTLIB: SupportTable = SupportTable::new(
    "matplotlib",
    &[
        K::Arrows2D,
        K::Box,
        K::ConvexPolyhedra,
        K::Disks,
        K::DiskUnions,
        K::Lines,
        K::Polygons,
        K::SpherePoints,
        K::Spheres,
        K::Spheropolygons,
    ],
);

pub const VISPY: SupportTable = SupportTable::new(
    "vispy",
    &[
        K::Arrows2D,
        K::Disks,
        K::DiskUnions,
        K::Ellipsoids,
        K::Polygons,
        K::Spheropolygons,
        K::Voronoi,
        K::Lines,
        K::Spheres,
        K::SpherePoints,
        K::SphereUnions,
        K::Mesh,
        K::ConvexPolyhedra,
        K::ConvexSpheropolyhedra,
    ],
);

pub const FRESNEL: SupportTable = SupportTable::new(
    "fresnel",
    &[K::Disks, K::Polygons, K::Lines, K::Spheres, K::ConvexPolyhedra],
);

pub const POVRAY: SupportTable = SupportTable::new(
    "povray",
    &[
        K::Box,
        K::ConvexPolyhedra,
        K::ConvexSpheropolyhedra,
        K::Ellipsoids,
        K::Lines,
        K::Mesh,
        K::Spheres,
        K::SphereUnions,
    ],
);

pub const PYTHREEJS: SupportTable = SupportTable::new(
    "pythreejs",
    &[
        K::ConvexPolyhedra,
        K::ConvexSpheropolyhedra,
        K::Ellipsoids,
        K::Lines,
        K::Mesh,
        K::Spheres,
    ],
);

pub const ZDOG: SupportTable = SupportTable::new(
    "zdog",
    &[
        K::Arrows2D,
        K::Box,
        K::ConvexPolyhedra,
        K::ConvexSpheropolyhedra,
        K::Disks,
        K::Lines,
        K::Polygons,
        K::Spheres,
        K::Spheropolygons,
    ],
);

pub const BLENDER: SupportTable =
    SupportTable::new("blender", &[K::ConvexPolyhedra, K::Spheres]);

pub const BUILTIN_BACKENDS: [SupportTable; 8] =
    [CORE, MATPLOTLIB, VISPY, FRESNEL, POVRAY, PYTHREEJS, ZDOG, BLENDER];

pub fn backend_by_name(name: &str) -> Result<SupportTable, SceneError> {
    BUILTIN_BACKENDS
        .into_iter()
        .find(|backend| backend.name == name)
        .ok_or_else(|| SceneError::UnknownBackend(name.to_string()))
}

/// What [`Scene::convert`] does with a primitive the backend can't draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compatibility {
    /// Skip it and log a warning.
    #[default]
    Warn,
    /// Skip it silently.
    Ignore,
    /// Fail the conversion.
    Error,
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warn => "warn",
            Self::Ignore => "ignore",
            Self::Error => "error",
        })
    }
}

impl FromStr for Compatibility {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warn" => Ok(Self::Warn),
            "ignore" => Ok(Self::Ignore),
            "error" => Ok(Self::Error),
            other => Err(SceneError::UnknownCompatibility(other.to_string())),
        }
    }
}

impl Scene {
    /// A new scene for `backend` holding copies of this scene's primitives.
    ///
    /// The new scene starts from this scene's settings with `overrides`
    /// applied, and keeps its `link_rotation` targets. Primitives the
    /// backend can't draw are handled according to `compatibility`.
    pub fn convert(
        &self,
        backend: &dyn Backend,
        compatibility: Compatibility,
        overrides: SceneOverrides,
    ) -> Result<Scene, SceneError> {
        let mut scene = backend.create_scene(overrides.apply(self.config()))?;
        scene.inherit_rotation_link(self);

        for primitive in self {
            let kind = primitive.kind();
            let Some(copy) = backend.primitive(kind) else {
                match compatibility {
                    Compatibility::Warn => {
                        tracing::warn!("Incompatible primitive {} for backend {}", kind, backend.name())
                    }
                    Compatibility::Ignore => {}
                    Compatibility::Error => {
                        return Err(SceneError::UnsupportedPrimitive {
                            kind,
                            backend: backend.name().to_string(),
                        });
                    }
                }
                continue;
            };
            scene.add_primitive(copy(primitive)?);
        }
        tracing::debug!(
            from = self.backend(),
            to = backend.name(),
            primitives = scene.len(),
            "converted scene"
        );
        Ok(scene)
    }
}
