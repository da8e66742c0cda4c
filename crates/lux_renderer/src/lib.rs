//! Lux progressive path tracer.
//!
//! A Monte Carlo path tracer over the flat triangle buffers of
//! [`lux_core::Scene`]. Paths draw their randomness from a low-discrepancy
//! [`SequenceGenerator`], sample the area light at every diffuse vertex
//! (next-event estimation), and are cut short by Russian roulette. Frames
//! accumulate progressively in an [`AccumulationBuffer`] until the view
//! changes.
//!
//! Ray queries go through the [`IntersectionOracle`] trait;
//! [`TriangleBvh`] is the CPU implementation.
//!
//! ```no_run
//! use lux_core::presets::cornell_box;
//! use lux_renderer::{ProgressiveRenderer, RenderConfig, TriangleBvh};
//!
//! let setup = cornell_box(1.0)?;
//! let bvh = TriangleBvh::build(&setup.scene);
//! let mut renderer = ProgressiveRenderer::new(256, 256, RenderConfig::default())?;
//! for _ in 0..16 {
//!     renderer.render_frame(&setup.scene, &bvh, setup.camera, setup.light)?;
//! }
//! renderer.accumulation().to_image().save("cornell.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod accumulation;
mod bvh;
mod config;
mod error;
mod integrator;
mod material;
mod oracle;
mod renderer;
mod sequence;
mod triangle;

pub use accumulation::{blend, AccumulationBuffer};
pub use bvh::TriangleBvh;
pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use integrator::{russian_roulette, sample_light, Integrator, LightSample};
pub use material::{near_zero, reflect, reflectance, refract, scatter, Lobe, Scatter};
pub use oracle::{Hit, IntersectionOracle};
pub use renderer::{pixel_offsets, ProgressiveRenderer};
pub use sequence::{point_in_unit_sphere, radical_inverse, unit_vector, SequenceGenerator, HALTON_DIMENSIONS};
pub use triangle::intersect_triangle;

/// Re-export common types from lux_core and lux_math
pub use lux_core::{Color, Scene};
pub use lux_math::{Ray, Vec2, Vec3};
