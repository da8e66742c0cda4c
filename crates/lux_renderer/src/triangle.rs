//! Ray-triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm.

use lux_math::{Interval, Ray, Vec2, Vec3};

/// Intersect `ray` with triangle `v`.
///
/// Returns the ray parameter and the barycentric weights of `v[1]` and `v[2]`
/// when the hit lies inside `ray_t`. Both faces are hit.
#[inline]
pub fn intersect_triangle(ray: &Ray, v: &[Vec3; 3], ray_t: Interval) -> Option<(f32, Vec2)> {
    let edge1 = v[1] - v[0];
    let edge2 = v[2] - v[0];

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < 1e-8 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v[0];
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let w = f * ray.direction.dot(q);

    if w < 0.0 || u + w > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    if !ray_t.surrounds(t) {
        return None;
    }

    Some((t, Vec2::new(u, w)))
}
