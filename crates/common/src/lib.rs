//! Shared types used by every tableau crate.
//!
//! Quaternions cross public API boundaries real-part-first (`[r, x, y, z]`)
//! and are stored as [`glam::Quat`] internally.

mod types;

pub use types::{SceneTransform, ShapeId, quat_from_rxyz, quat_to_rxyz};

pub fn crate_info() -> &'static str {
    "tableau-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
