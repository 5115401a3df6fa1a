use thiserror::Error;

/// Failures while assembling or querying the geometry batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("shape `{name}` has an index {index} that does not fit in 16 bits")]
    IndexOverflow { name: String, index: u32 },

    #[error("shape `{0}` was added to the batch twice")]
    DuplicateShape(String),

    #[error("no shape named `{0}` in the geometry batch")]
    UnknownShape(String),
}

/// Failures while defining or resolving materials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterialError {
    #[error("material `{0}` is already defined")]
    Duplicate(String),

    #[error("no material named `{0}`")]
    Unknown(String),
}

/// Any failure raised while building a scene.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Material(#[from] MaterialError),
}
