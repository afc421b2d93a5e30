/// Errors raised when assigning or declaring attributes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttributeError {
    #[error("non-scalar value given for scalar attribute `{name}` (shape {shape:?})")]
    NonScalar { name: String, shape: Vec<usize> },
    #[error(
        "invalid shape for attribute `{name}`: {shape:?} (expected {rank} axes ending in {expected:?})"
    )]
    ShapeMismatch {
        name: String,
        shape: Vec<usize>,
        expected: Vec<usize>,
        rank: usize,
    },
    #[error("`{kind}` has no attribute named `{name}`")]
    UnknownAttribute { kind: String, name: String },
    #[error("attribute `{name}` declared twice in `{kind}`")]
    DuplicateAttribute { kind: String, name: String },
    #[error("array of shape {shape:?} needs {expected} elements, got {actual}")]
    DataLength {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Errors raised when resolving an entity selection against an array.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: isize, len: usize },
    #[error("boolean mask of length {mask} does not match length {len}")]
    MaskLength { mask: usize, len: usize },
    #[error("slice step cannot be zero")]
    ZeroStep,
}
