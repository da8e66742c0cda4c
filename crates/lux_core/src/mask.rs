//! Bit-flag masks shared between the scene builder, the integrator and the
//! intersection oracle.

use bitflags::bitflags;

bitflags! {
    /// Per-triangle visibility class.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TriangleMask: u32 {
        /// Opaque scene geometry. Occludes shadow rays.
        const GEOMETRY = 1 << 0;
        /// Emissive geometry of the area light.
        const LIGHT = 1 << 1;
        /// Refractive geometry. Visible to camera and bounce rays, ignored by
        /// shadow rays.
        const GLASS = 1 << 2;
    }
}

bitflags! {
    /// Which triangle classes a ray can hit.
    ///
    /// A triangle is visible to a ray when `triangle_mask & ray_mask` is
    /// non-empty.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RayMask: u32 {
        const PRIMARY = TriangleMask::GEOMETRY.bits()
            | TriangleMask::LIGHT.bits()
            | TriangleMask::GLASS.bits();
        const SECONDARY = TriangleMask::GEOMETRY.bits() | TriangleMask::GLASS.bits();
        const SHADOW = TriangleMask::GEOMETRY.bits();
    }
}

impl RayMask {
    /// Whether a triangle with `mask` is visible to this ray.
    #[inline]
    pub fn sees(self, mask: TriangleMask) -> bool {
        self.bits() & mask.bits() != 0
    }
}

bitflags! {
    /// Faces of the unit cube appended by `Scene::create_cube`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FaceMask: u32 {
        const NEGATIVE_X = 1 << 0;
        const POSITIVE_X = 1 << 1;
        const NEGATIVE_Y = 1 << 2;
        const POSITIVE_Y = 1 << 3;
        const NEGATIVE_Z = 1 << 4;
        const POSITIVE_Z = 1 << 5;
        const ALL = (1 << 6) - 1;
    }
}

impl FaceMask {
    pub const NONE: FaceMask = FaceMask::empty();
}
