//! Ray-scene intersection interface.
//!
//! The integrator never walks geometry itself. It asks an oracle for the
//! closest hit of a ray against the triangles its mask can see, or whether
//! anything it can see lies before a distance. [`crate::TriangleBvh`] is the
//! CPU implementation; hardware backends plug in behind the same trait.

use lux_core::RayMask;
use lux_math::{Ray, Vec2};

/// Closest intersection reported by an oracle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the (unit) ray direction.
    pub distance: f32,
    /// Index of the triangle that was hit.
    pub primitive: u32,
    /// Weights of the triangle's second and third vertices.
    pub barycentric: Vec2,
}

/// Answers intersection queries against a fixed triangle set.
///
/// Implementations must only report triangles whose mask shares a bit with
/// the query's ray mask, and only at distances in `(0, max_distance)`.
pub trait IntersectionOracle: Send + Sync {
    /// Closest visible hit along `ray`, if any.
    fn intersect(&self, ray: &Ray, mask: RayMask, max_distance: f32) -> Option<Hit>;

    /// Whether any visible triangle lies along `ray` before `max_distance`.
    ///
    /// The default forwards to [`intersect`](Self::intersect); implementations
    /// can stop at the first hit instead.
    fn occluded(&self, ray: &Ray, mask: RayMask, max_distance: f32) -> bool {
        self.intersect(ray, mask, max_distance).is_some()
    }
}
