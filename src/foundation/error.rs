/// Convenience result type used across floodgif.
pub type FloodResult<T> = Result<T, FloodError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum FloodError {
    /// Invalid configuration or inconsistent inputs (e.g. mismatched grid shapes).
    #[error("validation error: {0}")]
    Validation(String),

    /// The elevation raster could not be opened or decoded.
    #[error("raster error: {0}")]
    Raster(String),

    /// The river vector layer could not be opened or parsed.
    #[error("vector error: {0}")]
    Vector(String),

    /// No elevation cell falls under the river geometry, so no baseline can be derived.
    #[error("river geometry does not cover any raster cell")]
    NoRiverCells,

    /// Errors while drawing or reading back a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding or writing the animation.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FloodError {
    /// Build a [`FloodError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FloodError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build a [`FloodError::Vector`] value.
    pub fn vector(msg: impl Into<String>) -> Self {
        Self::Vector(msg.into())
    }

    /// Build a [`FloodError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FloodError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
