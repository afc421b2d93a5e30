use tableau_attr::{AttributeArray, AttributeError};

primitive! {
    /// A collection of spheres in 3D. Each sphere can have a different
    /// color and diameter.
    pub struct Spheres(Spheres) {
        positions / set_positions = "positions" {
            f32, [0.0, 0.0, 0.0], rank 2, per_entity, "Position of each particle"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, per_entity, "Color, RGBA, [0, 1] for each particle"
        }
        radii / set_radii = "radii" {
            f32, 0.5, rank 1, per_entity, "Radius of each particle"
        }
    }
}

impl Spheres {
    pub fn diameters(&self) -> AttributeArray {
        self.radii().map(|r| 2.0 * r)
    }

    pub fn set_diameters(&mut self, value: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        self.set_radii(value.into().map(|d| 0.5 * d))
    }
}

primitive! {
    /// A collection of disks in 2D. Each disk can have a different color
    /// and diameter.
    pub struct Disks(Disks) {
        positions / set_positions = "positions" {
            f32, [0.0, 0.0], rank 2, per_entity, "Position of each particle"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, per_entity, "Color, RGBA, [0, 1] for each particle"
        }
        radii / set_radii = "radii" {
            f32, 0.5, rank 1, per_entity, "Radius of each particle"
        }
        outline / set_outline = "outline" {
            f32, 0.0, rank 0, shared, "Outline width for all particles"
        }
    }
}

impl Disks {
    pub fn diameters(&self) -> AttributeArray {
        self.radii().map(|r| 2.0 * r)
    }

    pub fn set_diameters(&mut self, value: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        self.set_radii(value.into().map(|d| 0.5 * d))
    }
}

primitive! {
    /// A collection of ellipsoids with identical dimensions.
    pub struct Ellipsoids(Ellipsoids) {
        positions / set_positions = "positions" {
            f32, [0.0, 0.0, 0.0], rank 2, per_entity, "Position of each particle"
        }
        orientations / set_orientations = "orientations" {
            f32, [1.0, 0.0, 0.0, 0.0], rank 2, per_entity, "Orientation quaternion of each particle"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, per_entity, "Color, RGBA, [0, 1] for each particle"
        }
        a / set_a = "a" { f32, 0.5, rank 0, shared, "Radius in the x-direction" }
        b / set_b = "b" { f32, 0.5, rank 0, shared, "Radius in the y-direction" }
        c / set_c = "c" { f32, 0.5, rank 0, shared, "Radius in the z-direction" }
    }
}

primitive! {
    /// A collection of points, useful for illustrating 3D density maps.
    pub struct SpherePoints(SpherePoints) {
        points / set_points = "points" {
            f32, [1.0, 0.0, 0.0], rank 2, per_entity, "Points to be rendered"
        }
        blur / set_blur = "blur" {
            f32, 3.0, rank 0, shared, "Blurring factor dictating the size of each point"
        }
        intensity / set_intensity = "intensity" {
            f32, 1e3, rank 0, shared,
            "Scaling factor dictating the magnitude of the color value of each point"
        }
        on_surface / set_on_surface = "on_surface" {
            u32, 1.0, rank 0, shared,
            "True if the points should always be projected onto the surface of a sphere"
        }
    }
}

primitive! {
    /// A collection of patchy spheres in 3D.
    ///
    /// Patches are given by plane equations `(x, y, z, w)` for a sphere of
    /// diameter 2, and every shape is scaled by its own diameter.
    pub struct PatchySpheres(PatchySpheres)
    extends [
        positions / set_positions = "positions",
        colors / set_colors = "colors",
        radii / set_radii = "radii",
    ]
    {
        orientations / set_orientations = "orientations" {
            f32, [1.0, 0.0, 0.0, 0.0], rank 2, per_entity, "Orientation of each particle"
        }
        patch_planes / set_patch_planes = "patch_planes" {
            f32, [0.0, 0.0, 0.0, 0.0], rank 2, shared,
            "Plane equations (x, y, z, w) for patches, specified for a sphere of diameter 2"
        }
        patch_colors / set_patch_colors = "patch_colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, shared, "Colors (RGBA) for each patch"
        }
        shape_color_fraction / set_shape_color_fraction = "shape_color_fraction" {
            f32, 0.0, rank 0, shared,
            "Fraction of a patch's color that should be assigned based on colors"
        }
    }
}

/// Non-finite rows (degenerate planes) collapse to this unit/angle value.
const DEGENERATE_PATCH: [f32; 4] = [1.0, 0.0, 0.0, 0.0];

impl PatchySpheres {
    pub fn diameters(&self) -> AttributeArray {
        self.radii().map(|r| 2.0 * r)
    }

    pub fn set_diameters(&mut self, value: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        self.set_radii(value.into().map(|d| 0.5 * d))
    }

    /// Patch directions as unit vectors plus the angle each patch sweeps,
    /// `(x, y, z, theta)` per patch.
    pub fn patch_unit_angles(&self) -> Vec<[f32; 4]> {
        self.patch_planes()
            .rows::<4>()
            .unwrap_or_default()
            .into_iter()
            .map(|[x, y, z, h]| {
                let length = (x * x + y * y + z * z).sqrt();
                let row = [x / length, y / length, z / length, 2.0 * (h / length).acos()];
                finite_or_degenerate(row)
            })
            .collect()
    }

    pub fn set_patch_unit_angles(&mut self, value: &[[f32; 4]]) -> Result<(), AttributeError> {
        let planes: Vec<[f32; 4]> = value
            .iter()
            .map(|&[x, y, z, theta]| {
                let length = (x * x + y * y + z * z).sqrt();
                finite_or_degenerate([x / length, y / length, z / length, (0.5 * theta).cos()])
            })
            .collect();
        self.set_patch_planes(planes)
    }
}

fn finite_or_degenerate(row: [f32; 4]) -> [f32; 4] {
    if row.iter().all(|v| v.is_finite()) {
        row
    } else {
        DEGENERATE_PATCH
    }
}

primitive! {
    /// A Voronoi diagram of a set of 2D points.
    pub struct Voronoi(Voronoi) {
        positions / set_positions = "positions" {
            f32, [0.0, 0.0], rank 2, per_entity, "Position of each point"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, per_entity, "Color, RGBA, [0, 1] for each point"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PrimitiveKind, Shape};

    #[test]
    fn diameters_follow_radii() {
        let mut spheres = Spheres::from_attributes([("radii", vec![0.5f32, 1.0])]).unwrap();
        assert_eq!(spheres.diameters().as_f32(), Some(&[1.0f32, 2.0][..]));

        spheres.set_diameters(vec![4.0f32, 6.0, 8.0]).unwrap();
        assert_eq!(spheres.radii().as_f32(), Some(&[2.0f32, 3.0, 4.0][..]));
        assert_eq!(spheres.len(), 3);
    }

    #[test]
    fn scalar_diameter_broadcasts() {
        let mut disks = Disks::new();
        disks.set_diameters(3.0f32).unwrap();
        assert_eq!(disks.radii().shape(), &[1]);
        assert_eq!(disks.radii().first_f32(), Some(1.5));
    }

    #[test]
    fn disks_container_behaviour() {
        let disks = Disks::from_attributes([
            ("positions", AttributeArray::from(vec![[0.0f32, 0.0], [1.0, 1.0], [2.0, 2.0]])),
            ("colors", AttributeArray::from(vec![[1.0f32, 0.0, 0.0, 1.0]; 3])),
        ])
        .unwrap();
        assert_eq!(disks.len(), 3);
        assert_eq!(disks.select(1usize).unwrap().len(), 1);
        assert_eq!(
            disks.select(tableau_attr::Selection::reversed()).unwrap().positions().rows::<2>(),
            Some(vec![[2.0, 2.0], [1.0, 1.0], [0.0, 0.0]])
        );
        assert_eq!(disks.select([true, false, true]).unwrap().len(), 2);
    }

    #[test]
    fn sphere_points_store_flag_as_integer() {
        let points = SpherePoints::new();
        assert_eq!(points.on_surface().as_u32(), Some(&[1u32][..]));
        assert_eq!(points.intensity().first_f32(), Some(1000.0));
    }

    #[test]
    fn patchy_spheres_extend_spheres() {
        let names: Vec<_> = PrimitiveKind::PatchySpheres.schema().names().collect();
        assert_eq!(&names[..3], ["positions", "colors", "radii"]);
        assert_eq!(PatchySpheres::new().radii().first_f32(), Some(0.5));
    }

    #[test]
    fn patch_unit_angles_round_trip() {
        let mut patchy = PatchySpheres::new();
        let half_pi = std::f32::consts::FRAC_PI_2;
        patchy
            .set_patch_unit_angles(&[[0.0, 0.0, 2.0, half_pi], [0.0, 0.0, 0.0, 1.0]])
            .unwrap();

        let planes = patchy.patch_planes().rows::<4>().unwrap();
        assert_eq!(planes[0], [0.0, 0.0, 1.0, planes[0][3]]);
        assert!((planes[0][3] - (0.25 * std::f32::consts::PI).cos()).abs() < 1e-6);
        // a zero-length direction cannot be normalized
        assert_eq!(planes[1], DEGENERATE_PATCH);

        let angles = patchy.patch_unit_angles();
        assert!((angles[0][3] - half_pi).abs() < 1e-5);
        assert_eq!(angles[1], [1.0, 0.0, 0.0, angles[1][3]]);
        assert!((angles[1][3] - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn wrapper_conversions_check_kind() {
        let shape: Shape = Voronoi::new().into();
        assert!(Voronoi::try_from(shape).is_ok());
        let err = Voronoi::try_from(Shape::new(PrimitiveKind::Disks)).unwrap_err();
        assert!(matches!(err, crate::ShapeError::KindMismatch { .. }));
    }
}
