//! Render configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Render configuration.
///
/// Every field has a default, so a JSON document only needs to name the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel traced in each frame
    pub samples_per_frame: u32,
    /// Hard cap on path segments, including the primary ray
    pub max_bounces: u32,
    /// Russian roulette may end a path once it has more vertices than this
    pub russian_roulette_depth: u32,
    /// Lower clamp on the Russian roulette survival probability
    pub min_survival_probability: f32,
    /// Offset applied to spawned ray origins along the geometric normal
    pub ray_epsilon: f32,
    /// Seed for the per-pixel sequence index scramble
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_frame: 1,
            max_bounces: 8,
            russian_roulette_depth: 3,
            min_survival_probability: 0.05,
            ray_epsilon: 1e-3,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded render config from {}", path.display());
        Ok(config)
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> RenderResult<()> {
        if self.samples_per_frame == 0 {
            return Err(invalid("samples_per_frame", "must be at least 1"));
        }
        if self.max_bounces == 0 {
            return Err(invalid("max_bounces", "must be at least 1"));
        }
        let p = self.min_survival_probability;
        if !(p > 0.0 && p <= 1.0) {
            return Err(invalid("min_survival_probability", format!("{p} is outside (0, 1]")));
        }
        let eps = self.ray_epsilon;
        if !(eps.is_finite() && eps >= 0.0) {
            return Err(invalid("ray_epsilon", format!("{eps} is not a non-negative finite value")));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> RenderError {
    RenderError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}
