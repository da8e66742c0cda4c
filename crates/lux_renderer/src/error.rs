//! Errors raised while configuring or driving the renderer.

use std::path::PathBuf;

use lux_core::SceneError;
use thiserror::Error;

/// Errors produced by the renderer.
///
/// Only setup and input problems end up here. A path that misses, is
/// absorbed or produces a non-finite value is a zero-radiance sample, not an
/// error.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid render config {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
