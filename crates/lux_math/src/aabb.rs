use crate::{Interval, Ray, Vec3};

/// Smallest extent kept on any axis, so axis-aligned triangles still have a
/// box with volume.
const MIN_EXTENT: f32 = 1e-4;

/// Axis-aligned bounding box used by the triangle BVH.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Contains nothing; the identity for [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Box spanned by two corner points, padded to a minimum extent.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        let pad = (Vec3::splat(MIN_EXTENT) - (max - min)).max(Vec3::ZERO) * 0.5;
        Self {
            min: min - pad,
            max: max + pad,
        }
    }

    /// Bounding box of a triangle.
    pub fn from_triangle(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2))
    }

    /// Smallest box enclosing both.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Slab test: whether `ray` enters the box within `ray_t`.
    ///
    /// A ray parallel to a slab with its origin on the slab plane yields a
    /// NaN bound, which [`Interval::intersect`] ignores.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;

        let slabs = (0..3).fold(ray_t, |span, axis| {
            let slab = if inv[axis] < 0.0 {
                Interval::new(t1[axis], t0[axis])
            } else {
                Interval::new(t0[axis], t1[axis])
            };
            span.intersect(&slab)
        });
        !slabs.is_empty()
    }

    /// Index (0=X, 1=Y, 2=Z) of the axis with the largest extent.
    pub fn longest_axis(&self) -> usize {
        let size = self.max - self.min;
        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_triangle_pads_flat_axis() {
        let aabb = Aabb::from_triangle(Vec3::ZERO, Vec3::X, Vec3::Z);
        assert!(aabb.max.y - aabb.min.y >= MIN_EXTENT * 0.99);
        assert_eq!(aabb.max.x, 1.0);
        assert_eq!(aabb.min.z, 0.0);
    }

    #[test]
    fn test_surrounding() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::splat(5.0));
        let b = Aabb::from_points(Vec3::splat(3.0), Vec3::splat(10.0));
        let both = Aabb::surrounding(&a, &b);

        assert_eq!(both.min, Vec3::ZERO);
        assert_eq!(both.max, Vec3::splat(10.0));
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &a), a);
    }

    #[test]
    fn test_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::ONE);
        let search = Interval::new(0.0, 100.0);

        assert!(aabb.hit(&Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), search));
        // Pointing away
        assert!(!aabb.hit(&Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z), search));
        // Passing beside
        assert!(!aabb.hit(&Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z), search));
        // Box beyond the search range
        assert!(!aabb.hit(&Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), Interval::new(0.0, 3.0)));
        // Origin inside
        assert!(aabb.hit(&Ray::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 0.9).normalize()), search));
    }

    #[test]
    fn test_longest_axis_and_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(aabb.longest_axis(), 1);
        assert_eq!(aabb.centroid(), Vec3::new(0.5, 5.0, 0.5));
    }
}
