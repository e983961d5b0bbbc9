//! Error types for graph summarization.
//!
//! Two failure classes exist: invalid layer specifications caught at
//! construction, and incompatible matrix shapes caught at the multiply
//! boundary. Nothing is retried and no partial summaries are returned.

use thiserror::Error;

/// Result type alias for graph summarization operations.
pub type Result<T> = std::result::Result<T, GsnError>;

/// Error type for graph summarization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GsnError {
    /// Invalid dimension or layer specification.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Incompatible matrix dimensions.
    #[error("shape mismatch in {op}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Operation that detected the mismatch.
        op: &'static str,
        /// Expected shape.
        expected: String,
        /// Actual shape.
        actual: String,
    },
}

impl GsnError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        GsnError::Configuration(msg.into())
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(
        op: &'static str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        GsnError::ShapeMismatch {
            op,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Check if this error comes from an invalid construction-time setting.
    #[inline]
    pub fn is_config_error(&self) -> bool {
        matches!(self, GsnError::Configuration(_))
    }
}
