//! JSON backend: describes a scene as a JSON document suitable for another
//! renderer, such as a web viewer, to draw.
//!
//! # Invariants
//! - A full document lists every attribute of every primitive.
//! - An update document lists only attributes changed since the previous
//!   update and consumes their dirty marks.
//! - Attribute arrays keep their shape as nested lists.

mod backend;
mod document;
mod error;

pub use backend::{JsonBackend, SUPPORTED_KINDS};
pub use document::{Nested, PrimitiveDocument, SceneDocument};
pub use error::JsonError;

pub fn crate_info() -> &'static str {
    "tableau-json v0.1.0"
}
