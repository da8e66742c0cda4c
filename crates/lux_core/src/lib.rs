//! Lux Core - scene model for the lux path tracer.
//!
//! This crate provides:
//!
//! - **Scene buffers**: flat, parallel vertex/normal/color/mask/material arrays
//!   cross-referenced by index (`Scene`)
//! - **Materials**: `Material` parameters and the validated `MaterialType` tag
//! - **Masks**: triangle, ray and cube-face bit-flags
//! - **View data**: `Camera`, `AreaLight` and the per-frame `Uniforms` snapshot
//! - **Presets**: a Cornell box built entirely from `Scene::create_cube`
//!
//! # Example
//!
//! ```
//! use lux_core::{FaceMask, Material, Scene, TriangleMask};
//! use lux_math::{Mat4, Vec3};
//!
//! let mut scene = Scene::new();
//! scene
//!     .create_cube(
//!         FaceMask::ALL,
//!         &Mat4::IDENTITY,
//!         false,
//!         TriangleMask::GEOMETRY,
//!         Material::lambertian(Vec3::splat(0.5)),
//!     )
//!     .unwrap();
//! assert_eq!(scene.triangle_count(), 12);
//! ```

pub mod error;
pub mod mask;
pub mod material;
pub mod presets;
pub mod scene;
pub mod view;

// Re-export commonly used types
pub use error::SceneError;
pub use mask::{FaceMask, RayMask, TriangleMask};
pub use material::{Material, MaterialFlags, MaterialType, OpaqueType};
pub use scene::Scene;
pub use presets::SceneSetup;
pub use view::{AreaLight, Camera, Uniforms};

/// Color type alias (linear RGB)
pub type Color = lux_math::Vec3;
