use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tableau_attr::{AttributeError, AttributeSpec, Schema};

use crate::primitives::{
    Arrows2D, BoxFrame, ConvexPolyhedra, ConvexSpheropolyhedra, DiskUnions, Disks, Ellipsoids,
    Lines, Mesh, PatchySpheres, Polygons, SpherePoints, SphereUnions, Spheres, Spheropolygons,
    Voronoi,
};
use crate::{Shape, ShapeError};

/// The geometric primitive kinds a scene can hold.
///
/// Variants are declared in [`PrimitiveKind::ALL`] order; the schema table
/// is indexed by discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Arrows2D,
    Box,
    ConvexPolyhedra,
    ConvexSpheropolyhedra,
    DiskUnions,
    Disks,
    Ellipsoids,
    Lines,
    Mesh,
    PatchySpheres,
    Polygons,
    SpherePoints,
    SphereUnions,
    Spheres,
    Spheropolygons,
    Voronoi,
}

static SCHEMAS: LazyLock<Vec<Schema>> =
    LazyLock::new(|| PrimitiveKind::ALL.iter().map(|k| k.build_schema()).collect());

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 16] = [
        Self::Arrows2D,
        Self::Box,
        Self::ConvexPolyhedra,
        Self::ConvexSpheropolyhedra,
        Self::DiskUnions,
        Self::Disks,
        Self::Ellipsoids,
        Self::Lines,
        Self::Mesh,
        Self::PatchySpheres,
        Self::Polygons,
        Self::SpherePoints,
        Self::SphereUnions,
        Self::Spheres,
        Self::Spheropolygons,
        Self::Voronoi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Arrows2D => "Arrows2D",
            Self::Box => "Box",
            Self::ConvexPolyhedra => "ConvexPolyhedra",
            Self::ConvexSpheropolyhedra => "ConvexSpheropolyhedra",
            Self::DiskUnions => "DiskUnions",
            Self::Disks => "Disks",
            Self::Ellipsoids => "Ellipsoids",
            Self::Lines => "Lines",
            Self::Mesh => "Mesh",
            Self::PatchySpheres => "PatchySpheres",
            Self::Polygons => "Polygons",
            Self::SpherePoints => "SpherePoints",
            Self::SphereUnions => "SphereUnions",
            Self::Spheres => "Spheres",
            Self::Spheropolygons => "Spheropolygons",
            Self::Voronoi => "Voronoi",
        }
    }

    /// The kind whose attribute list this kind's list starts with.
    pub fn parent(self) -> Option<PrimitiveKind> {
        match self {
            Self::Arrows2D | Self::Spheropolygons => Some(Self::Polygons),
            Self::Box => Some(Self::Lines),
            Self::PatchySpheres => Some(Self::Spheres),
            _ => None,
        }
    }

    pub fn own_attributes(self) -> &'static [AttributeSpec] {
        match self {
            Self::Arrows2D => Arrows2D::OWN_ATTRIBUTES,
            Self::Box => BoxFrame::OWN_ATTRIBUTES,
            Self::ConvexPolyhedra => ConvexPolyhedra::OWN_ATTRIBUTES,
            Self::ConvexSpheropolyhedra => ConvexSpheropolyhedra::OWN_ATTRIBUTES,
            Self::DiskUnions => DiskUnions::OWN_ATTRIBUTES,
            Self::Disks => Disks::OWN_ATTRIBUTES,
            Self::Ellipsoids => Ellipsoids::OWN_ATTRIBUTES,
            Self::Lines => Lines::OWN_ATTRIBUTES,
            Self::Mesh => Mesh::OWN_ATTRIBUTES,
            Self::PatchySpheres => PatchySpheres::OWN_ATTRIBUTES,
            Self::Polygons => Polygons::OWN_ATTRIBUTES,
            Self::SpherePoints => SpherePoints::OWN_ATTRIBUTES,
            Self::SphereUnions => SphereUnions::OWN_ATTRIBUTES,
            Self::Spheres => Spheres::OWN_ATTRIBUTES,
            Self::Spheropolygons => Spheropolygons::OWN_ATTRIBUTES,
            Self::Voronoi => Voronoi::OWN_ATTRIBUTES,
        }
    }

    /// One-paragraph description, the body of [`PrimitiveKind::documentation`].
    pub fn summary(self) -> &'static str {
        match self {
            Self::Arrows2D => {
                "A collection of 2D arrows. Each arrow has an independent position, \
                 orientation, color, and magnitude."
            }
            Self::Box => "A triclinic box frame centered at the origin.",
            Self::ConvexPolyhedra => {
                "A collection of identically-shaped convex polyhedra. Each shape can \
                 have its own position, orientation, and color."
            }
            Self::ConvexSpheropolyhedra => {
                "A collection of identically-shaped convex spheropolyhedra. The \
                 rounding radius is shared over all shapes."
            }
            Self::DiskUnions => {
                "A collection of identical disk-union bodies in 2D, each disk with \
                 its own radius and color."
            }
            Self::Disks => {
                "A collection of disks in 2D. Each disk can have a different color \
                 and diameter."
            }
            Self::Ellipsoids => {
                "A collection of ellipsoids with identical dimensions. Each shape can \
                 have its own position, orientation, and color."
            }
            Self::Lines => {
                "A collection of line segments. Each segment can have a different \
                 color and width."
            }
            Self::Mesh => {
                "A 3D triangle mesh, optionally replicated with a set of positions \
                 and orientations."
            }
            Self::PatchySpheres => {
                "A collection of patchy spheres in 3D. Patches are given by plane \
                 equations for a sphere of diameter 2."
            }
            Self::Polygons => {
                "A collection of polygons sharing one vertex template. Vertices are \
                 given in counterclockwise order."
            }
            Self::SpherePoints => "A collection of points, useful for illustrating 3D density maps.",
            Self::SphereUnions => {
                "A collection of identical sphere-union bodies in 3D that can be \
                 rigidly rotated and translated."
            }
            Self::Spheres => {
                "A collection of spheres in 3D. Each sphere can have a different \
                 color and diameter."
            }
            Self::Spheropolygons => {
                "A collection of rounded polygons sharing one vertex template and \
                 rounding radius."
            }
            Self::Voronoi => "A Voronoi diagram of a set of 2D points.",
        }
    }

    pub fn schema(self) -> &'static Schema {
        &SCHEMAS[self as usize]
    }

    /// The summary followed by the generated attribute list.
    pub fn documentation(self) -> String {
        self.schema().document(self.summary())
    }

    fn build_schema(self) -> Schema {
        let base = self.parent().map(PrimitiveKind::build_schema);
        Schema::declare(self.name(), base.as_ref(), self.own_attributes())
    }

    /// Fill computed attributes of a freshly defaulted shape.
    pub(crate) fn initialize(self, shape: &mut Shape) -> Result<(), AttributeError> {
        match self {
            Self::Arrows2D => Arrows2D::initialize(shape),
            Self::Box => BoxFrame::initialize(shape),
            _ => Ok(()),
        }
    }

    /// Run the kind's reaction to `name` having been stored.
    pub(crate) fn after_set(self, shape: &mut Shape, name: &str) -> Result<(), AttributeError> {
        match self {
            Self::Box => BoxFrame::after_set(shape, name),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ShapeError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableau_attr::ATTRIBUTE_DOC_HEADER;

    #[test]
    fn all_is_in_discriminant_order() {
        for (i, kind) in PrimitiveKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, i);
            assert_eq!(kind.schema().kind(), kind.name());
        }
    }

    #[test]
    fn names_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(kind.name().parse::<PrimitiveKind>().unwrap(), kind);
        }
        assert_eq!(
            "Cubes".parse::<PrimitiveKind>(),
            Err(ShapeError::UnknownKind("Cubes".into()))
        );
    }

    #[test]
    fn child_schemas_start_with_parent_attributes() {
        for kind in PrimitiveKind::ALL {
            let Some(parent) = kind.parent() else { continue };
            let inherited: Vec<_> = kind.schema().names().take(parent.schema().len()).collect();
            assert_eq!(inherited, parent.schema().names().collect::<Vec<_>>());
        }
        let names: Vec<_> = PrimitiveKind::Box.schema().names().collect();
        assert_eq!(
            names,
            [
                "start_points", "end_points", "widths", "colors", "Lx", "Ly", "Lz", "xy", "xz",
                "yz", "width", "color"
            ]
        );
    }

    #[test]
    fn schemas_have_unique_names() {
        for kind in PrimitiveKind::ALL {
            let base = kind.parent().map_or(0, |p| p.schema().len());
            let expected = base + kind.own_attributes().len();
            assert_eq!(kind.schema().len(), expected, "{kind}");
        }
    }

    #[test]
    fn documentation_lists_every_attribute() {
        let doc = PrimitiveKind::Disks.documentation();
        assert!(doc.starts_with("A collection of disks in 2D."));
        assert_eq!(doc.matches(ATTRIBUTE_DOC_HEADER).count(), 1);
        for name in ["positions", "colors", "radii", "outline"] {
            assert!(doc.contains(&format!("* `{name}`")), "{name} missing");
        }
    }
}
