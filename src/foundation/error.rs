/// Convenience result type used across the crate.
pub type PosterResult<T> = Result<T, PosterError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// No drawing surface of the requested size could be obtained.
    #[error("context creation error: {0}")]
    ContextCreation(String),

    /// Degenerate geometry, e.g. a source image with zero width or height.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// A resource (image source or deferred QR payload) failed to load or decode.
    #[error("load error for '{reference}': {reason}")]
    Load {
        /// The source reference (URL, path, inline payload prefix, or QR key) that failed.
        reference: String,
        /// Human readable failure description.
        reason: String,
    },

    /// Invalid user-provided data (canvas size, pixel ratio, documents).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::ContextCreation`] value.
    pub fn context_creation(msg: impl Into<String>) -> Self {
        Self::ContextCreation(msg.into())
    }

    /// Build a [`PosterError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`PosterError::Load`] value.
    pub fn load(reference: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Load {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`PosterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Return `true` for [`PosterError::Load`].
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
