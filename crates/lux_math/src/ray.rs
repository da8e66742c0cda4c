use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be normalized, but every ray the
/// integrator produces carries a unit direction so that hit distances are
/// world-space lengths.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Spawn a ray leaving a surface point.
    ///
    /// The origin is pushed off the surface by `epsilon` along the geometric
    /// normal, on the side the new direction travels into, so the new ray does
    /// not immediately re-hit the surface it left.
    pub fn spawn(point: Vec3, normal: Vec3, direction: Vec3, epsilon: f32) -> Self {
        let side = if direction.dot(normal) >= 0.0 { 1.0 } else { -1.0 };
        Self {
            origin: point + normal * (epsilon * side),
            direction,
        }
    }

    /// Point at distance `t` along a unit-direction ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
