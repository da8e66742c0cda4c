//! Camera, area light and the per-frame uniform snapshot.

use lux_math::{Vec2, Vec3};

use crate::Color;

/// Pinhole camera described by its position and a scaled basis.
///
/// `right` and `up` are not unit vectors: their lengths are the half-width and
/// half-height of the image plane at unit distance along `forward`, so a
/// normalized image coordinate `(u, v)` in `[-1, 1]^2` maps to the direction
/// `u * right + v * up + forward`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl Camera {
    /// Build a camera looking from `position` at `target`.
    ///
    /// - `vfov`: vertical field of view in degrees
    /// - `aspect`: image width divided by image height
    pub fn look_at(position: Vec3, target: Vec3, world_up: Vec3, vfov: f32, aspect: f32) -> Self {
        let forward = (target - position).normalize();
        let right = forward.cross(world_up).normalize();
        let up = right.cross(forward);

        let half_height = (vfov.to_radians() / 2.0).tan();
        let half_width = half_height * aspect;

        Self {
            position,
            right: right * half_width,
            up: up * half_height,
            forward,
        }
    }

    /// Unnormalized direction through image-plane coordinate `uv` in `[-1, 1]^2`.
    #[inline]
    pub fn direction(&self, uv: Vec2) -> Vec3 {
        uv.x * self.right + uv.y * self.up + self.forward
    }
}

/// Rectangular emitter.
///
/// The rectangle is centered at `position` and spans `±right` and `±up`, so
/// the lengths of those vectors are its half-extents. It emits towards
/// `forward`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaLight {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub color: Color,
}

impl AreaLight {
    /// Surface area of the emitting rectangle.
    pub fn area(&self) -> f32 {
        4.0 * self.right.length() * self.up.length()
    }

    /// Point on the rectangle for `uv` in `[-1, 1]^2`.
    #[inline]
    pub fn point_at(&self, uv: Vec2) -> Vec3 {
        self.position + self.right * uv.x + self.up * uv.y
    }
}

/// Immutable per-frame snapshot handed to the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub width: u32,
    pub height: u32,
    /// Frames accumulated so far. Zero after any camera or scene change.
    pub frame_index: u32,
    pub camera: Camera,
    pub light: AreaLight,
}
