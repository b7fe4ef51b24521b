/// Result alias used across the crate.
pub type BannerResult<T> = Result<T, BannerError>;

/// Closed set of failure kinds for one banner invocation.
///
/// Everything except [`BannerError::FontUnavailable`] is fatal: the pipeline either returns a
/// complete canvas or exactly one of these.
#[derive(thiserror::Error, Debug)]
pub enum BannerError {
    /// Input bytes could not be parsed as a color image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Input decoded to a degenerate raster.
    #[error("unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions {
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },

    /// Named typeface could not be loaded. Non-fatal; triggers the builtin fallback.
    #[error("font unavailable: '{name}': {reason}")]
    FontUnavailable {
        /// Logical font name that was requested.
        name: String,
        /// Why the provider could not serve it.
        reason: String,
    },

    /// Output raster could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration or buffer-shape violation.
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    /// Collaborator failure that does not fit another kind.
    Other(#[from] anyhow::Error),
}

impl BannerError {
    /// Build a [`BannerError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BannerError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`BannerError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BannerError::FontUnavailable`].
    pub fn font_unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FontUnavailable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// `false` only for kinds the pipeline recovers from.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::FontUnavailable { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
