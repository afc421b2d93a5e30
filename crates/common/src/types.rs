use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a shape instance.
///
/// Copies, links, and slices of a shape are new instances and get new ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.8}", &self.0.to_string()[..8])
    }
}

/// Scene-controlled transform carried by every primitive.
///
/// A scene pushes its own translation and rotation onto each primitive it
/// holds; backends read them back when placing geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for SceneTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Build a quaternion from `[r, x, y, z]` components. No normalization.
pub fn quat_from_rxyz(q: [f32; 4]) -> Quat {
    Quat::from_xyzw(q[1], q[2], q[3], q[0])
}

/// Components of `q` in `[r, x, y, z]` order.
pub fn quat_to_rxyz(q: Quat) -> [f32; 4] {
    [q.w, q.x, q.y, q.z]
}
