use tableau_attr::{AttributeArray, AttributeError};

use crate::Shape;

primitive! {
    /// A collection of line segments. Each segment can have a different
    /// color and width.
    pub struct Lines(Lines) {
        start_points / set_start_points = "start_points" {
            f32, [0.0, 0.0, 0.0], rank 2, per_entity, "Beginning coordinate for each line segment"
        }
        end_points / set_end_points = "end_points" {
            f32, [0.0, 0.0, 0.0], rank 2, per_entity, "Ending coordinate for each line segment"
        }
        widths / set_widths = "widths" {
            f32, 0.1, rank 1, per_entity, "Width of each line segment"
        }
        colors / set_colors = "colors" {
            f32, [0.5, 0.5, 0.5, 1.0], rank 2, per_entity, "Color, RGBA, [0, 1] for each line segment"
        }
    }
}

primitive! {
    /// A triclinic box frame centered at the origin.
    ///
    /// The frame is given by three lattice vector lengths and three tilt
    /// factors. Changing any of them recomputes the twelve edge segments;
    /// `width` and `color` apply to every edge.
    pub struct BoxFrame(Box)
    extends [
        start_points / set_start_points = "start_points",
        end_points / set_end_points = "end_points",
        widths / set_widths = "widths",
        colors / set_colors = "colors",
    ]
    {
        lx / set_lx = "Lx" { f32, 1.0, rank 0, shared, "Length of first box vector" }
        ly / set_ly = "Ly" { f32, 1.0, rank 0, shared, "Length of second box vector" }
        lz / set_lz = "Lz" { f32, 1.0, rank 0, shared, "Length of third box vector" }
        xy / set_xy = "xy" {
            f32, 0.0, rank 0, shared, "Tilt factor between the first and second box vectors"
        }
        xz / set_xz = "xz" {
            f32, 0.0, rank 0, shared, "Tilt factor between the first and third box vectors"
        }
        yz / set_yz = "yz" {
            f32, 0.0, rank 0, shared, "Tilt factor between the second and third box vectors"
        }
        _ / set_width = "width" {
            f32, 0.01, rank 0, shared, "Width of box line segments"
        }
        _ / set_color = "color" {
            f32, [0.0, 0.0, 0.0, 1.0], rank 1, shared, "Color, RGBA, [0, 1] for the box line segments"
        }
    }
}

const EDGE_COUNT: usize = 12;

/// Fractional coordinates of the eight box corners.
const CORNERS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Corner indices of each edge, as (start, end).
const EDGES: [(usize, usize); EDGE_COUNT] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (1, 4),
    (1, 5),
    (2, 4),
    (2, 6),
    (3, 5),
    (3, 6),
    (4, 7),
    (5, 7),
    (6, 7),
];

const GEOMETRY: [&str; 6] = ["Lx", "Ly", "Lz", "xy", "xz", "yz"];

impl BoxFrame {
    /// Build a box from `[Lx, Ly]`, `[Lx, Ly, Lz]`, or
    /// `[Lx, Ly, Lz, xy, xz, yz]`. Missing values are zero.
    pub fn from_lengths(lengths: &[f32], width: f32, color: [f32; 4]) -> Result<Self, AttributeError> {
        if !matches!(lengths.len(), 2 | 3 | 6) {
            return Err(AttributeError::InvalidValue(format!(
                "box needs 2, 3, or 6 values, got {}",
                lengths.len()
            )));
        }
        let mut params = [0.0; 6];
        params[..lengths.len()].copy_from_slice(lengths);

        let mut attributes: Vec<(&str, AttributeArray)> = GEOMETRY
            .iter()
            .zip(params)
            .map(|(&name, value)| (name, AttributeArray::scalar(value)))
            .collect();
        attributes.push(("width", AttributeArray::scalar(width)));
        attributes.push(("color", AttributeArray::from(color)));
        Self::from_attributes(attributes)
    }

    /// Width of the first edge.
    pub fn width(&self) -> Option<f32> {
        self.widths().first_f32()
    }

    /// Color of the first edge.
    pub fn color(&self) -> Option<[f32; 4]> {
        self.colors().rows::<4>().and_then(|rows| rows.first().copied())
    }

    /// Columns are the three box vectors.
    pub fn matrix(&self) -> [[f32; 3]; 3] {
        box_matrix(self.as_shape())
    }

    pub(crate) fn initialize(shape: &mut Shape) -> Result<(), AttributeError> {
        update_edges(shape)?;
        spread_width(shape)?;
        spread_color(shape)
    }

    pub(crate) fn after_set(shape: &mut Shape, name: &str) -> Result<(), AttributeError> {
        match name {
            "width" => spread_width(shape),
            "color" => spread_color(shape),
            _ if GEOMETRY.contains(&name) => update_edges(shape),
            _ => Ok(()),
        }
    }
}

fn scalar(shape: &Shape, name: &str) -> f32 {
    shape.declared(name).first_f32().unwrap_or(0.0)
}

fn box_matrix(shape: &Shape) -> [[f32; 3]; 3] {
    let [lx, ly, lz, xy, xz, yz] = GEOMETRY.map(|name| scalar(shape, name));
    [
        [lx, xy * ly, xz * lz],
        [0.0, ly, yz * lz],
        [0.0, 0.0, lz],
    ]
}

fn update_edges(shape: &mut Shape) -> Result<(), AttributeError> {
    let matrix = box_matrix(shape);
    let corners = CORNERS.map(|fraction| {
        let centered = fraction.map(|f| f - 0.5);
        matrix.map(|row| row.iter().zip(centered).map(|(m, f)| m * f).sum::<f32>())
    });
    let starts: Vec<[f32; 3]> = EDGES.iter().map(|&(a, _)| corners[a]).collect();
    let ends: Vec<[f32; 3]> = EDGES.iter().map(|&(_, b)| corners[b]).collect();
    shape.set("start_points", starts)?;
    shape.set("end_points", ends)
}

fn spread_width(shape: &mut Shape) -> Result<(), AttributeError> {
    let width = scalar(shape, "width");
    shape.set("widths", vec![width; EDGE_COUNT])
}

fn spread_color(shape: &mut Shape) -> Result<(), AttributeError> {
    let color = shape.declared("color").to_f32_vec();
    shape.set("colors", AttributeArray::repeat_row(&color, EDGE_COUNT))
}
