use tableau_attr::AttributeError;
use tableau_common::ShapeId;
use tableau_shapes::PrimitiveKind;

/// Errors raised by scene operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("feature `{0}` is not enabled")]
    FeatureNotEnabled(String),
    #[error("invalid parameters for feature `{name}`: {reason}")]
    InvalidFeature { name: String, reason: String },
    #[error("primitive {0} is not in the scene")]
    PrimitiveNotFound(ShapeId),
    #[error("unknown coordinate system `{0}`")]
    UnknownCoordinateSpace(String),
    #[error("incompatible primitive {kind} for backend {backend}")]
    UnsupportedPrimitive { kind: PrimitiveKind, backend: String },
    #[error("unknown backend `{0}`")]
    UnknownBackend(String),
    #[error("unknown compatibility policy `{0}` (expected warn, ignore, or error)")]
    UnknownCompatibility(String),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}
