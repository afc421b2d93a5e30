use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{Scene, SceneError};

/// A 2D coordinate system a scene can convert between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Pixels with the origin at the top left and y growing downward.
    PixelsGui,
    /// Pixels with the origin at the bottom left and y growing upward.
    Pixels,
    /// Normalized device coordinates, (-1, -1) to (1, 1) at the viewport
    /// corners.
    Ndc,
    /// World coordinates after zoom and translation.
    Scene,
}

impl CoordinateSpace {
    pub const ALL: [CoordinateSpace; 4] = [Self::PixelsGui, Self::Pixels, Self::Ndc, Self::Scene];

    pub fn name(self) -> &'static str {
        match self {
            Self::PixelsGui => "pixels_gui",
            Self::Pixels => "pixels",
            Self::Ndc => "ndc",
            Self::Scene => "scene",
        }
    }
}

impl fmt::Display for CoordinateSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoordinateSpace {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|space| space.name() == s)
            .ok_or_else(|| SceneError::UnknownCoordinateSpace(s.to_string()))
    }
}

/// One coordinate or a batch of them. Transforms preserve the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Coords {
    Point(Vec2),
    Batch(Vec<Vec2>),
}

impl Coords {
    fn map(self, f: impl Fn(Vec2) -> Vec2) -> Self {
        match self {
            Self::Point(p) => Self::Point(f(p)),
            Self::Batch(points) => Self::Batch(points.into_iter().map(f).collect()),
        }
    }

    pub fn points(&self) -> &[Vec2] {
        match self {
            Self::Point(p) => std::slice::from_ref(p),
            Self::Batch(points) => points,
        }
    }
}

impl From<Vec2> for Coords {
    fn from(p: Vec2) -> Self {
        Self::Point(p)
    }
}

impl From<[f32; 2]> for Coords {
    fn from(p: [f32; 2]) -> Self {
        Self::Point(Vec2::from(p))
    }
}

impl From<Vec<Vec2>> for Coords {
    fn from(points: Vec<Vec2>) -> Self {
        Self::Batch(points)
    }
}

impl From<Vec<[f32; 2]>> for Coords {
    fn from(points: Vec<[f32; 2]>) -> Self {
        Self::Batch(points.into_iter().map(Vec2::from).collect())
    }
}

impl Scene {
    /// Convert `coords` from `source` to `dest` through scene coordinates.
    pub fn transform(
        &self,
        coords: impl Into<Coords>,
        source: CoordinateSpace,
        dest: CoordinateSpace,
    ) -> Coords {
        coords
            .into()
            .map(|c| self.project(self.unproject(c, source), dest))
    }

    /// [`Scene::transform`] with coordinate spaces given by name.
    pub fn transform_named(
        &self,
        coords: impl Into<Coords>,
        source: &str,
        dest: &str,
    ) -> Result<Coords, SceneError> {
        Ok(self.transform(coords, source.parse()?, dest.parse()?))
    }

    fn ndc_scale(&self) -> Vec2 {
        0.5 / self.zoom() * self.size()
    }

    fn half_size_pixels(&self) -> Vec2 {
        0.5 * self.size() * self.pixel_scale()
    }

    fn unproject(&self, mut c: Vec2, source: CoordinateSpace) -> Vec2 {
        let shift = self.translation().truncate();
        match source {
            CoordinateSpace::PixelsGui | CoordinateSpace::Pixels => {
                c -= self.half_size_pixels();
                if source == CoordinateSpace::PixelsGui {
                    c.y = -c.y;
                }
                c / (self.zoom() * self.pixel_scale()) - shift
            }
            CoordinateSpace::Ndc => c * self.ndc_scale() - shift,
            CoordinateSpace::Scene => c,
        }
    }

    fn project(&self, c: Vec2, dest: CoordinateSpace) -> Vec2 {
        let shifted = c + self.translation().truncate();
        match dest {
            CoordinateSpace::PixelsGui | CoordinateSpace::Pixels => {
                let mut p = shifted * (self.zoom() * self.pixel_scale());
                if dest == CoordinateSpace::PixelsGui {
                    p.y = -p.y;
                }
                p + self.half_size_pixels()
            }
            CoordinateSpace::Ndc => shifted / self.ndc_scale(),
            CoordinateSpace::Scene => c,
        }
    }
}
