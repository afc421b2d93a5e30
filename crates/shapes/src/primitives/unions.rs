use tableau_attr::{AttributeArray, AttributeError};

use super::{z_angles, z_rotations};

primitive! {
    /// A collection of identical disk-union bodies in 2D.
    ///
    /// Every body is made of the same disks, each with its own radius and
    /// color; bodies differ only by position and orientation.
    pub struct DiskUnions(DiskUnions) {
        positions / set_positions = "positions" {
            f32, [0.0, 0.0], rank 2, per_entity, "Position of each particle"
        }
        orientations / set_orientations = "orientations" {
            f32, [1.0, 0.0, 0.0, 0.0], rank 2, per_entity, "Orientation quaternion of each particle"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, shared, "Color, RGBA, [0, 1] for each disk in the union"
        }
        points / set_points = "points" {
            f32, [0.0, 0.0], rank 2, shared,
            "Positions in local coordinates for the disks in the union, to be replicated for each particle"
        }
        radii / set_radii = "radii" {
            f32, 0.5, rank 1, shared, "Radius of each disk in the union"
        }
        outline / set_outline = "outline" {
            f32, 0.0, rank 0, shared, "Outline width for all particles"
        }
    }
}

impl DiskUnions {
    pub fn angles(&self) -> Vec<f32> {
        z_angles(&self.orientations())
    }

    pub fn set_angles(&mut self, angles: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        self.set_orientations(z_rotations(&angles.into()))
    }

    pub fn diameters(&self) -> AttributeArray {
        self.radii().map(|r| 2.0 * r)
    }

    pub fn set_diameters(&mut self, value: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        self.set_radii(value.into().map(|d| 0.5 * d))
    }
}

primitive! {
    /// A collection of identical sphere-union bodies in 3D that can be
    /// rigidly rotated and translated.
    pub struct SphereUnions(SphereUnions) {
        positions / set_positions = "positions" {
            f32, [0.0, 0.0, 0.0], rank 2, per_entity, "Position of each particle"
        }
        orientations / set_orientations = "orientations" {
            f32, [1.0, 0.0, 0.0, 0.0], rank 2, per_entity, "Orientation quaternion of each particle"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, shared, "Color, RGBA, [0, 1] for each sphere in the union"
        }
        points / set_points = "points" {
            f32, [0.0, 0.0, 0.0], rank 2, shared,
            "Positions in local coordinates for the spheres in the union, to be replicated for each particle"
        }
        radii / set_radii = "radii" {
            f32, 0.5, rank 1, per_entity, "Radius of each sphere in the union"
        }
    }
}

impl SphereUnions {
    pub fn diameters(&self) -> AttributeArray {
        self.radii().map(|r| 2.0 * r)
    }

    pub fn set_diameters(&mut self, value: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        self.set_radii(value.into().map(|d| 0.5 * d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_members_do_not_count_as_entities() {
        let unions = DiskUnions::from_attributes([
            ("positions", AttributeArray::from(vec![[0.0f32, 0.0], [3.0, 0.0]])),
            ("points", AttributeArray::from(vec![[-0.5f32, 0.0], [0.5, 0.0], [0.0, 1.0]])),
            ("radii", AttributeArray::from(vec![0.5f32, 0.5, 0.25])),
        ])
        .unwrap();
        assert_eq!(unions.len(), 2);

        let first = unions.select(0usize).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first.points().outer_len(), 3);
        assert_eq!(first.diameters().as_f32(), Some(&[1.0f32, 1.0, 0.5][..]));
    }

    #[test]
    fn disk_union_angles() {
        let mut unions = DiskUnions::new();
        unions.set_angles(0.5f32).unwrap();
        assert_eq!(unions.orientations().shape(), &[1, 4]);
        assert!((unions.angles()[0] - 0.5).abs() < 1e-6);
    }
}
