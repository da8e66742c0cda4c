// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Largest `f32` strictly below one. Sample values are clamped to this so that
/// `[0, 1)` draws never round up to 1.0.
pub const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON / 2.0;
