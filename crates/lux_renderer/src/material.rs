//! Surface scattering.
//!
//! `scatter` maps an incoming direction, a surface normal and a material to
//! the next path direction and its attenuation, or `None` when the path is
//! absorbed. The material type is dispatched with a `match`: the set of
//! materials is small and closed.

use lux_core::{Color, Material, MaterialType, OpaqueType};
use lux_math::Vec3;

use crate::sequence::{point_in_unit_sphere, unit_vector, SequenceGenerator};

/// Kind of lobe a scatter event sampled.
///
/// Only diffuse lobes can be evaluated for an arbitrary direction, so only
/// they receive next-event estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lobe {
    Diffuse,
    Glossy,
    /// Perfect reflection, off a mirror or a dielectric.
    Specular,
    /// Refraction through a dielectric boundary.
    Transmission,
}

/// Result of a successful scatter event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Unit direction of the continuation ray.
    pub direction: Vec3,
    pub attenuation: Color,
    pub lobe: Lobe,
}

/// Scatter a ray travelling along `incoming` off a surface with normal
/// `normal`.
///
/// `normal` is the surface's stored normal and may face either way; opaque
/// lobes flip it towards the incoming ray, while the dielectric lobe uses its
/// orientation to tell whether the ray enters or leaves the medium.
///
/// Returns `None` when the path is absorbed, including when the result is not
/// finite.
pub fn scatter(
    material: &Material,
    incoming: Vec3,
    normal: Vec3,
    rng: &mut SequenceGenerator,
) -> Option<Scatter> {
    let incoming = incoming.normalize();

    let result = match material.kind {
        MaterialType::Lambertian => Some(lambertian(material, incoming, normal, rng)),
        MaterialType::Metallic => metallic(material, incoming, normal, rng),
        MaterialType::Mirror => Some(mirror(material, incoming, normal)),
        MaterialType::Dielectric => Some(dielectric(material, incoming, normal, rng)),
        MaterialType::Transparent(base) => {
            if rng.scalar() < material.transparency {
                Some(dielectric(material, incoming, normal, rng))
            } else {
                match base {
                    OpaqueType::Lambertian => Some(lambertian(material, incoming, normal, rng)),
                    OpaqueType::Metallic => metallic(material, incoming, normal, rng),
                    OpaqueType::Mirror => Some(mirror(material, incoming, normal)),
                }
            }
        }
    }?;

    if result.direction.is_finite() && result.attenuation.is_finite() {
        Some(result)
    } else {
        None
    }
}

/// Normal flipped to face against `incoming`.
#[inline]
fn facing(incoming: Vec3, normal: Vec3) -> Vec3 {
    if incoming.dot(normal) > 0.0 {
        -normal
    } else {
        normal
    }
}

fn lambertian(material: &Material, incoming: Vec3, normal: Vec3, rng: &mut SequenceGenerator) -> Scatter {
    let normal = facing(incoming, normal);
    let direction = normal + unit_vector(rng);

    // Catch degenerate scatter direction
    let direction = if near_zero(direction) {
        normal
    } else {
        direction.normalize()
    };

    Scatter {
        direction,
        attenuation: material.albedo,
        lobe: Lobe::Diffuse,
    }
}

fn metallic(material: &Material, incoming: Vec3, normal: Vec3, rng: &mut SequenceGenerator) -> Option<Scatter> {
    let normal = facing(incoming, normal);
    let reflected = reflect(incoming, normal);
    let direction = (reflected + material.roughness * point_in_unit_sphere(rng)).normalize();

    // Fuzz pushed the reflection below the surface
    if direction.dot(normal) <= 0.0 {
        return None;
    }

    Some(Scatter {
        direction,
        attenuation: material.albedo,
        lobe: Lobe::Glossy,
    })
}

fn mirror(material: &Material, incoming: Vec3, normal: Vec3) -> Scatter {
    Scatter {
        direction: reflect(incoming, facing(incoming, normal)),
        attenuation: material.albedo,
        lobe: Lobe::Specular,
    }
}

fn dielectric(material: &Material, incoming: Vec3, normal: Vec3, rng: &mut SequenceGenerator) -> Scatter {
    let entering = incoming.dot(normal) < 0.0;
    let (normal, refraction_ratio) = if entering {
        (normal, 1.0 / material.refractive_index)
    } else {
        (-normal, material.refractive_index)
    };

    let cos_theta = (-incoming).dot(normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    // Check for total internal reflection
    let cannot_refract = refraction_ratio * sin_theta > 1.0;

    let (direction, lobe) = if cannot_refract || rng.scalar() < reflectance(cos_theta, refraction_ratio) {
        (reflect(incoming, normal), Lobe::Specular)
    } else {
        (refract(incoming, normal, refraction_ratio), Lobe::Transmission)
    };

    Scatter {
        direction,
        attenuation: Color::ONE,
        lobe,
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// True if the vector is close to zero in all dimensions.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    const S: f32 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with unit normal `n` facing it.
///
/// The perpendicular and parallel parts are built separately; without total
/// internal reflection their sum has unit length.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
#[inline]
pub fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
