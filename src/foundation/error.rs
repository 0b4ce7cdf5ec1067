/// Convenience result type used across shotframe.
pub type ShotframeResult<T> = Result<T, ShotframeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Out-of-range parameters have no variant: control inputs are clamped to their bounds before
/// they reach the layout engine.
#[derive(thiserror::Error, Debug)]
pub enum ShotframeError {
    /// Invalid user-provided data (malformed gradient, zero-sized image, bad CLI input).
    #[error("validation error: {0}")]
    Validation(String),

    /// Uploaded bytes could not be interpreted as a raster image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Capturing the composition failed; no image was produced.
    #[error("export error: {context}")]
    Export {
        /// What the exporter was doing when it failed.
        context: String,
        /// Underlying cause (unreadable wallpaper, backend failure, timeout).
        #[source]
        cause: anyhow::Error,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShotframeError {
    /// Build a [`ShotframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShotframeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ShotframeError::Export`] value wrapping `cause`.
    pub fn export(context: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self::Export {
            context: context.into(),
            cause: cause.into(),
        }
    }

    /// Re-tag any error as an export failure, keeping it as the cause.
    pub(crate) fn into_export(self, context: impl Into<String>) -> Self {
        match self {
            Self::Export { .. } => self,
            other => Self::export(context, anyhow::Error::new(other)),
        }
    }

    /// `true` for errors raised while capturing a composition.
    pub fn is_export(&self) -> bool {
        matches!(self, Self::Export { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
