/// Crate-wide result alias.
pub type CtaResult<T> = Result<T, CtaError>;

/// Errors produced while configuring, evaluating or rendering the overlay.
#[derive(thiserror::Error, Debug)]
pub enum CtaError {
    /// Invalid structural input (sizes, ranges, asset paths).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid interpolation or spring parameters.
    #[error("animation error: {0}")]
    Animation(String),

    /// Missing or placeholder configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Failure to fetch or parse composition metadata.
    #[error("metadata error: {0}")]
    Metadata(String),

    /// Runtime failure while rendering or encoding.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CtaError {
    /// Build a [`CtaError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CtaError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`CtaError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CtaError::Metadata`].
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Build a [`CtaError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`CtaError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
