//! Attribute data model: the shape/type contract for every named attribute
//! of every primitive kind.
//!
//! # Invariants
//! - A stored value always has exactly `rank` axes (rank 0: a true scalar)
//!   and its trailing axes equal the attribute's element shape.
//! - A failed assignment leaves the previous value in place.
//! - Every successful assignment marks the attribute dirty.

mod array;
mod error;
mod select;
mod spec;
mod store;

pub use array::{ArrayData, AttributeArray, ElementType};
pub use error::{AttributeError, SelectionError};
pub use select::Selection;
pub use spec::{ATTRIBUTE_DOC_HEADER, AttributeSpec, DefaultValue, Schema};
pub use store::{AttributeStore, DirtySet};

pub fn crate_info() -> &'static str {
    "tableau-attr v0.1.0"
}
