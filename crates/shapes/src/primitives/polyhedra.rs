primitive! {
    /// A collection of identically-shaped convex polyhedra. Each shape can
    /// have its own position, orientation, and color.
    pub struct ConvexPolyhedra(ConvexPolyhedra) {
        positions / set_positions = "positions" {
            f32, [0.0, 0.0, 0.0], rank 2, per_entity, "Position of each particle"
        }
        orientations / set_orientations = "orientations" {
            f32, [1.0, 0.0, 0.0, 0.0], rank 2, per_entity, "Orientation quaternion of each particle"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, per_entity, "Color, RGBA, [0, 1] for each particle"
        }
        vertices / set_vertices = "vertices" {
            f32, [0.0, 0.0, 0.0], rank 2, shared,
            "Vertices in local coordinates for the shape, to be replicated for each particle"
        }
        outline / set_outline = "outline" {
            f32, 0.0, rank 0, shared, "Outline width for all shapes"
        }
    }
}

primitive! {
    /// A collection of identically-shaped convex spheropolyhedra. The
    /// rounding radius is shared over all shapes.
    pub struct ConvexSpheropolyhedra(ConvexSpheropolyhedra) {
        positions / set_positions = "positions" {
            f32, [0.0, 0.0, 0.0], rank 2, per_entity, "Position of each particle"
        }
        orientations / set_orientations = "orientations" {
            f32, [1.0, 0.0, 0.0, 0.0], rank 2, per_entity, "Orientation quaternion of each particle"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, per_entity, "Color, RGBA, [0, 1] for each particle"
        }
        vertices / set_vertices = "vertices" {
            f32, [0.0, 0.0, 0.0], rank 2, shared,
            "Vertices in local coordinates for the interior (non-rounded) shape, to be replicated for each particle"
        }
        radius / set_radius = "radius" {
            f32, 1.0, rank 0, shared, "Rounding radius to be applied to all shapes"
        }
    }
}

primitive! {
    /// A 3D triangle mesh.
    ///
    /// Colors are per vertex. The mesh is replicated once per entry of
    /// `positions`/`orientations`; `shape_colors` tints each replica.
    pub struct Mesh(Mesh) {
        vertices / set_vertices = "vertices" {
            f32, [0.0, 0.0, 0.0], rank 2, shared,
            "Vertex array specifying coordinates of the mesh nodes"
        }
        indices / set_indices = "indices" {
            u32, [0.0, 0.0, 0.0], rank 2, shared,
            "Indices of the vertex array specifying individual triangles (Nx3)"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, shared, "Color, RGBA, [0, 1] for each vertex"
        }
        positions / set_positions = "positions" {
            f32, [0.0, 0.0, 0.0], rank 2, per_entity,
            "Central positions for each mesh to be replicated"
        }
        orientations / set_orientations = "orientations" {
            f32, [1.0, 0.0, 0.0, 0.0], rank 2, per_entity,
            "Orientations for each mesh to be replicated"
        }
        shape_colors / set_shape_colors = "shape_colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, per_entity,
            "Color, RGBA, [0, 1] for each replica (shape) of the mesh"
        }
        shape_color_fraction / set_shape_color_fraction = "shape_color_fraction" {
            f32, 0.0, rank 0, shared,
            "Fraction of a vertex's color that should be assigned based on shape_colors"
        }
    }
}
