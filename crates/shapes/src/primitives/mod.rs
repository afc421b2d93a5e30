//! The primitive catalogue: one typed wrapper per [`PrimitiveKind`](crate::PrimitiveKind).

mod lines;
mod particles;
mod polygons;
mod polyhedra;
mod unions;

pub use lines::{BoxFrame, Lines};
pub use particles::{Disks, Ellipsoids, PatchySpheres, SpherePoints, Spheres, Voronoi};
pub use polygons::{Arrows2D, Polygons, Spheropolygons};
pub use polyhedra::{ConvexPolyhedra, ConvexSpheropolyhedra, Mesh};
pub use unions::{DiskUnions, SphereUnions};

use tableau_attr::AttributeArray;

/// In-plane rotation angle, in radians, of each `[r, x, y, z]` quaternion.
fn z_angles(orientations: &AttributeArray) -> Vec<f32> {
    orientations
        .rows::<4>()
        .unwrap_or_default()
        .iter()
        .map(|q| 2.0 * q[3].atan2(q[0]))
        .collect()
}

/// Quaternions rotating about the z axis by each of `angles`.
fn z_rotations(angles: &AttributeArray) -> Vec<[f32; 4]> {
    angles
        .to_f32_vec()
        .into_iter()
        .map(|theta| {
            let (sin, cos) = (0.5 * theta).sin_cos();
            [cos, 0.0, 0.0, sin]
        })
        .collect()
}
