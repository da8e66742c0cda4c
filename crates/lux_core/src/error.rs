//! Errors raised while building or validating a scene.

use thiserror::Error;

/// Errors produced by scene construction.
///
/// These are input-validation failures. Path-level outcomes during rendering
/// (misses, absorption) are never reported through this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Raw material type bits that do not name a supported combination.
    #[error("invalid material type bits {bits:#06b}: expected one type, or dielectric plus one other type")]
    InvalidMaterialType { bits: u32 },

    /// A material parameter outside its valid range.
    #[error("invalid material {field}: {value}")]
    InvalidMaterial { field: &'static str, value: f32 },

    /// A cube transform that is singular or not finite.
    #[error("cube transform is degenerate (determinant {determinant})")]
    DegenerateTransform { determinant: f32 },

    /// A parallel buffer whose length breaks the scene layout invariant.
    #[error("scene buffer '{buffer}' has {actual} entries, expected {expected}")]
    BufferMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A vertex referencing a material slot that does not exist.
    #[error("vertex {vertex} references material {material}, but only {count} materials exist")]
    MaterialOutOfRange {
        vertex: usize,
        material: u32,
        count: usize,
    },
}
