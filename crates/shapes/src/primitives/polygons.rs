use tableau_attr::{AttributeArray, AttributeError};

use super::{z_angles, z_rotations};
use crate::Shape;

primitive! {
    /// A collection of polygons sharing one vertex template. Each shape
    /// can have a different orientation and color. Vertices are given in
    /// counterclockwise order.
    pub struct Polygons(Polygons) {
        positions / set_positions = "positions" {
            f32, [0.0, 0.0], rank 2, per_entity, "Position of each particle"
        }
        orientations / set_orientations = "orientations" {
            f32, [1.0, 0.0, 0.0, 0.0], rank 2, per_entity, "Orientation quaternion of each particle"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, per_entity, "Color, RGBA, [0, 1] for each particle"
        }
        vertices / set_vertices = "vertices" {
            f32, [0.0, 0.0], rank 2, shared,
            "Vertices in local coordinates for the shape, to be replicated for each particle (CCW order)"
        }
        outline / set_outline = "outline" {
            f32, 0.0, rank 0, shared, "Outline width for all particles"
        }
    }
}

impl Polygons {
    /// Orientation of each particle, in radians.
    pub fn angles(&self) -> Vec<f32> {
        z_angles(&self.orientations())
    }

    pub fn set_angles(&mut self, angles: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        self.set_orientations(z_rotations(&angles.into()))
    }
}

primitive! {
    /// A collection of rounded polygons sharing one vertex template and
    /// one rounding radius.
    pub struct Spheropolygons(Spheropolygons)
    extends [
        positions / set_positions = "positions",
        orientations / set_orientations = "orientations",
        colors / set_colors = "colors",
        vertices / set_vertices = "vertices",
        outline / set_outline = "outline",
    ]
    {
        radius / set_radius = "radius" {
            f32, 0.0, rank 0, shared, "Rounding radius for shapes"
        }
    }
}

impl Spheropolygons {
    pub fn angles(&self) -> Vec<f32> {
        z_angles(&self.orientations())
    }

    pub fn set_angles(&mut self, angles: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        self.set_orientations(z_rotations(&angles.into()))
    }
}

primitive! {
    /// A collection of 2D arrows.
    ///
    /// The default vertex template is an arrow centered at (0, 0) pointing
    /// along +x with length 1. Each arrow's magnitude is the norm of its
    /// orientation quaternion.
    pub struct Arrows2D(Arrows2D)
    extends [
        positions / set_positions = "positions",
        orientations / set_orientations = "orientations",
        colors / set_colors = "colors",
        vertices / set_vertices = "vertices",
        outline / set_outline = "outline",
    ]
    {}
}

const SHAFT_THICKNESS: f32 = 0.14;
/// Distance from the base of the head to the tip.
const HEAD_LENGTH: f32 = 0.35;
/// Wingspan from tip to tip of the head.
const HEAD_WIDTH: f32 = 0.45;
/// How far the wingtips are pulled back past the base of the head.
const HEAD_EDGE_EXCESS: f32 = 0.03;

impl Arrows2D {
    pub fn default_vertices() -> Vec<[f32; 2]> {
        let neck = 0.5 - HEAD_LENGTH + HEAD_EDGE_EXCESS;
        vec![
            [0.5, 0.0],
            [0.5 - HEAD_LENGTH, 0.5 * HEAD_WIDTH],
            [neck, 0.5 * SHAFT_THICKNESS],
            [-0.5, 0.5 * SHAFT_THICKNESS],
            [-0.5, -0.5 * SHAFT_THICKNESS],
            [neck, -0.5 * SHAFT_THICKNESS],
            [0.5 - HEAD_LENGTH, -0.5 * HEAD_WIDTH],
        ]
    }

    pub(crate) fn initialize(shape: &mut Shape) -> Result<(), AttributeError> {
        shape.set("vertices", Self::default_vertices())
    }

    pub fn angles(&self) -> Vec<f32> {
        z_angles(&self.orientations())
    }

    /// Replace every orientation with a unit rotation by `angles`. This
    /// resets magnitudes to 1.
    pub fn set_angles(&mut self, angles: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        self.set_orientations(z_rotations(&angles.into()))
    }

    /// Size scale of each arrow.
    pub fn magnitudes(&self) -> Vec<f32> {
        self.orientations()
            .rows::<4>()
            .unwrap_or_default()
            .iter()
            .map(|q| q.iter().map(|c| c * c).sum::<f32>().sqrt())
            .collect()
    }

    /// Rescale each orientation quaternion so its norm equals the given
    /// magnitude. A single value applies to every arrow.
    pub fn set_magnitudes(&mut self, value: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        let magnitudes = value.into().to_f32_vec();
        let quats = self.orientations().rows::<4>().unwrap_or_default();
        let n = match (magnitudes.len(), quats.len()) {
            (m, q) if m == q || q == 1 => m,
            (1, q) => q,
            (m, q) => {
                return Err(AttributeError::InvalidValue(format!(
                    "{m} magnitudes given for {q} orientations"
                )));
            }
        };
        let scaled: Vec<[f32; 4]> = (0..n)
            .map(|i| {
                let q = quats[i.min(quats.len() - 1)];
                let m = magnitudes[i.min(magnitudes.len() - 1)];
                let norm = q.iter().map(|c| c * c).sum::<f32>().sqrt();
                q.map(|c| c * m.sqrt() / norm)
            })
            .collect();
        self.set_orientations(scaled)
    }
}
