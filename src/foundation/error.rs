/// Convenience result type used across ogmaker.
pub type OgResult<T> = Result<T, OgError>;

/// Top-level error taxonomy used by the rendering APIs.
///
/// Avatar problems are reported as [`OgError::Asset`] internally and downgraded to a placeholder,
/// so they never fail a render.
#[derive(thiserror::Error, Debug)]
pub enum OgError {
    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid or unloadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Avatar or font asset could not be fetched or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Painting a draw plan failed.
    #[error("render error: {0}")]
    Render(String),

    /// Serializing the painted surface failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OgError {
    /// Build an [`OgError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OgError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`OgError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build an [`OgError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`OgError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`OgError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
