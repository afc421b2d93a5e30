use tableau_attr::AttributeError;

use crate::PrimitiveKind;

/// Errors raised when naming or converting between primitive kinds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("unknown primitive kind `{0}`")]
    UnknownKind(String),
    #[error("expected a `{expected}` shape, got `{actual}`")]
    KindMismatch {
        expected: PrimitiveKind,
        actual: PrimitiveKind,
    },
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}
