/// Convenience result type used across inkfolio.
pub type InkfolioResult<T> = Result<T, InkfolioError>;

/// Top-level error taxonomy for the theming and intro layers.
///
/// Animation code never returns these from per-frame paths; they only show up at
/// construction time (bad palette, bad timeline, unreadable config).
#[derive(thiserror::Error, Debug)]
pub enum InkfolioError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed color data (hex strings, palettes).
    #[error("color error: {0}")]
    Color(String),

    /// Inconsistent intro timeline tables.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Persistent key/value storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InkfolioError {
    /// Build an [`InkfolioError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`InkfolioError::Color`] value.
    pub fn color(msg: impl Into<String>) -> Self {
        Self::Color(msg.into())
    }

    /// Build an [`InkfolioError::Timeline`] value.
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build an [`InkfolioError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build an [`InkfolioError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for InkfolioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
