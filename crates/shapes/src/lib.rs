//! Shapes: collections of geometric entities described by typed attributes.
//!
//! A [`Shape`] pairs a [`PrimitiveKind`] with an attribute store validated
//! against that kind's schema. Typed wrappers (`Spheres`, `Polygons`, ...)
//! add named accessors and derived properties on top of the same store.
//!
//! # Invariants
//! - A shape's store always holds a validated value for every attribute of
//!   its kind's schema.
//! - `len()` is the smallest outer dimension above 1 among per-entity
//!   attributes, or 1 when every per-entity attribute is broadcast.
//! - Linked shapes share one store; copies never do.

#[macro_use]
mod macros;

mod error;
mod kind;
mod primitives;
mod shape;

pub use error::ShapeError;
pub use kind::PrimitiveKind;
pub use primitives::{
    Arrows2D, BoxFrame, ConvexPolyhedra, ConvexSpheropolyhedra, DiskUnions, Disks, Ellipsoids,
    Lines, Mesh, PatchySpheres, Polygons, SpherePoints, SphereUnions, Spheres, Spheropolygons,
    Voronoi,
};
pub use shape::Shape;

pub fn crate_info() -> &'static str {
    "tableau-shapes v0.1.0"
}
