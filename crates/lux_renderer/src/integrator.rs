//! Path integrator with next-event estimation and Russian roulette.
//!
//! Each call to [`Integrator::sample`] traces one camera path and returns its
//! radiance estimate. The loop per path segment is:
//!
//! 1. Intersect with the current ray mask. A miss ends the path.
//! 2. A light triangle ends the path. Its front side adds
//!    `light.color * throughput` unless the shadow ray already counted it.
//! 3. The material scatters the path or absorbs it.
//! 4. Diffuse lobes sample the area light through a shadow ray.
//! 5. Throughput takes the attenuation, then Russian roulette may end the path.
//!
//! Shadow rays pass through glass, so a diffuse vertex's shadow ray accounts
//! for the light seen from it directly and through any glass in between.
//! After such a vertex a light hit adds nothing until a reflection changes
//! where the path can reach the light from. Diffuse continuation rays also use
//! the secondary mask, which cannot see light-only geometry. Glossy and
//! specular continuations use the primary mask and pick up the light by
//! hitting it.

use std::f32::consts::FRAC_1_PI;

use lux_core::{AreaLight, Color, RayMask, Scene, TriangleMask, Uniforms};
use lux_math::{Ray, Vec2, Vec3};

use crate::config::RenderConfig;
use crate::material::{scatter, Lobe};
use crate::oracle::IntersectionOracle;
use crate::sequence::SequenceGenerator;

/// A point sampled on the area light, seen from a surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit direction from the surface point towards the light sample.
    pub direction: Vec3,
    pub distance: f32,
    /// `color * cos_surface * cos_light * area / distance^2`
    pub weight: Color,
}

/// Sample the area light from `point` with unit surface normal `normal`.
///
/// `u` in `[0, 1)^2` selects the point on the light. Returns `None` when the
/// sample lies behind the surface, on the light's back side, or coincides
/// with `point`.
pub fn sample_light(light: &AreaLight, point: Vec3, normal: Vec3, u: Vec2) -> Option<LightSample> {
    let light_point = light.point_at(u * 2.0 - Vec2::ONE);
    let to_light = light_point - point;
    let distance_squared = to_light.length_squared();
    if !(distance_squared > 0.0 && distance_squared.is_finite()) {
        return None;
    }

    let distance = distance_squared.sqrt();
    let direction = to_light / distance;

    let cos_surface = normal.dot(direction);
    let cos_light = -direction.dot(light.forward.normalize_or_zero());
    if cos_surface <= 0.0 || cos_light <= 0.0 {
        return None;
    }

    Some(LightSample {
        direction,
        distance,
        weight: light.color * (cos_surface * cos_light * light.area() / distance_squared),
    })
}

/// Russian roulette on `throughput` with uniform draw `u`.
///
/// Survival probability is the largest throughput channel clamped to
/// `[min_survival, 1]`. Returns the reweighted throughput on survival.
#[inline]
pub fn russian_roulette(throughput: Color, u: f32, min_survival: f32) -> Option<Color> {
    let survival = throughput.max_element().clamp(min_survival, 1.0);
    if u >= survival {
        None
    } else {
        Some(throughput / survival)
    }
}

/// Traces camera paths through a scene.
pub struct Integrator<'a, O: IntersectionOracle + ?Sized> {
    scene: &'a Scene,
    oracle: &'a O,
    config: &'a RenderConfig,
}

impl<'a, O: IntersectionOracle + ?Sized> Integrator<'a, O> {
    pub fn new(scene: &'a Scene, oracle: &'a O, config: &'a RenderConfig) -> Self {
        Self { scene, oracle, config }
    }

    /// Camera ray through pixel `(x, y)`, jittered within the pixel.
    ///
    /// Row 0 is the top of the image. Consumes two dimensions.
    pub fn primary_ray(&self, uniforms: &Uniforms, x: u32, y: u32, rng: &mut SequenceGenerator) -> Ray {
        let jitter = Vec2::new(rng.scalar_in(-0.5, 0.5), rng.scalar_in(-0.5, 0.5));
        let pixel = Vec2::new(x as f32, y as f32) + Vec2::splat(0.5) + jitter;
        let size = Vec2::new(uniforms.width as f32, uniforms.height as f32);

        let mut uv = pixel / size * 2.0 - Vec2::ONE;
        uv.y = -uv.y;

        let camera = &uniforms.camera;
        Ray::new(camera.position, camera.direction(uv).normalize())
    }

    /// Whether Russian roulette runs after the path's `depth`-th vertex.
    #[inline]
    fn roulette_applies(&self, depth: u32) -> bool {
        depth > self.config.russian_roulette_depth
    }

    /// Radiance estimate of one path through pixel `(x, y)`.
    ///
    /// Always returns a finite, non-negative color; a path that produces a
    /// non-finite value contributes zero.
    pub fn sample(&self, uniforms: &Uniforms, x: u32, y: u32, rng: &mut SequenceGenerator) -> Color {
        let epsilon = self.config.ray_epsilon;
        let light = &uniforms.light;

        let mut ray = self.primary_ray(uniforms, x, y, rng);
        let mut mask = RayMask::PRIMARY;
        let mut throughput = Color::ONE;
        let mut radiance = Color::ZERO;
        // The last diffuse vertex's shadow ray covers light reached from here
        let mut light_sampled = false;

        for bounce in 0..self.config.max_bounces {
            let Some(hit) = self.oracle.intersect(&ray, mask, f32::INFINITY) else {
                break;
            };
            let primitive = hit.primitive as usize;

            if self.scene.triangle_mask(primitive).contains(TriangleMask::LIGHT) {
                if !light_sampled && ray.direction.dot(light.forward) < 0.0 {
                    radiance += light.color * throughput;
                }
                break;
            }

            let point = ray.at(hit.distance);
            let [v0, v1, v2] = self.scene.triangle(primitive);
            let geometric_normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
            let shading_normal = self.scene.interpolate_normal(primitive, hit.barycentric);

            // Drawn before scattering so the light sample keeps fixed dimensions
            let light_u = rng.vector2();

            let Some(scattered) = scatter(self.scene.material(primitive), ray.direction, shading_normal, rng) else {
                break;
            };

            if scattered.lobe == Lobe::Diffuse {
                let facing_normal = if ray.direction.dot(shading_normal) > 0.0 {
                    -shading_normal
                } else {
                    shading_normal
                };

                if let Some(sample) = sample_light(light, point, facing_normal, light_u) {
                    let shadow = Ray::spawn(point, geometric_normal, sample.direction, epsilon);
                    if !self.oracle.occluded(&shadow, RayMask::SHADOW, sample.distance - epsilon) {
                        radiance += throughput * scattered.attenuation * FRAC_1_PI * sample.weight;
                    }
                }
            }

            throughput *= scattered.attenuation;
            ray = Ray::spawn(point, geometric_normal, scattered.direction, epsilon);
            mask = match scattered.lobe {
                Lobe::Diffuse => RayMask::SECONDARY,
                Lobe::Glossy | Lobe::Specular | Lobe::Transmission => RayMask::PRIMARY,
            };
            light_sampled = match scattered.lobe {
                Lobe::Diffuse => true,
                Lobe::Transmission => light_sampled,
                Lobe::Glossy | Lobe::Specular => false,
            };

            if self.roulette_applies(bounce + 1) {
                match russian_roulette(throughput, rng.scalar(), self.config.min_survival_probability) {
                    Some(survived) => throughput = survived,
                    None => break,
                }
            }
        }

        if radiance.is_finite() {
            radiance.max(Color::ZERO)
        } else {
            Color::ZERO
        }
    }
}
