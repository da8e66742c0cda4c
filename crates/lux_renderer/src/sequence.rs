//! Low-discrepancy sample sequence.
//!
//! Samples come from the Halton sequence: dimension `d` of sample `i` is the
//! radical inverse of `i` in the `d`-th prime base. Every independent random
//! decision along a path must take the next dimension; reusing a dimension
//! correlates the decisions.
//!
//! Halton points lose their stratification in high prime bases, so only the
//! first [`HALTON_DIMENSIONS`] dimensions are Halton. Deeper dimensions are
//! padded with a stateless integer hash of `(i, d)`, which keeps the generator
//! deterministic while avoiding the correlation of large-base digit reversal.

use lux_math::{Vec2, Vec3, ONE_MINUS_EPSILON};

/// Prime bases for the Halton dimensions.
const PRIMES: [u32; 32] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131,
];

/// Number of leading dimensions drawn from the Halton sequence.
pub const HALTON_DIMENSIONS: u32 = PRIMES.len() as u32;

/// Attempts before rejection sampling gives up and returns its last candidate.
const MAX_REJECTION_ATTEMPTS: u32 = 64;

/// Radical inverse of `i` in the `base_index`-th prime base.
///
/// Returns a value in `[0, 1)`.
pub fn radical_inverse(base_index: usize, mut i: u32) -> f32 {
    let base = PRIMES[base_index];
    let inv_base = 1.0 / base as f64;
    let mut factor = 1.0f64;
    let mut result = 0.0f64;

    while i > 0 {
        factor *= inv_base;
        result += factor * (i % base) as f64;
        i /= base;
    }

    (result as f32).min(ONE_MINUS_EPSILON)
}

/// PCG output permutation, used to pad dimensions past the Halton table.
#[inline]
fn pcg_hash(x: u32) -> u32 {
    let state = x.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Value of sample `index` in dimension `dimension`.
#[inline]
fn sample(index: u32, dimension: u32) -> f32 {
    if dimension < HALTON_DIMENSIONS {
        radical_inverse(dimension as usize, index)
    } else {
        let bits = pcg_hash(index ^ pcg_hash(dimension));
        // Top 24 bits map exactly onto the f32 mantissa.
        (bits >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }
}

/// Per-sample random number generator.
///
/// Created for one (pixel, sample) pair and passed by `&mut` to everything
/// that needs randomness. Holds no global state: two generators built with
/// the same `(index, dimension)` and driven by the same call sequence return
/// the same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceGenerator {
    index: u32,
    dimension: u32,
}

impl SequenceGenerator {
    /// Create a generator for sample `index`, starting at `dimension`.
    pub fn new(index: u32, dimension: u32) -> Self {
        Self { index, dimension }
    }

    /// Sample index this generator draws from.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Next dimension to be consumed.
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Draw a value in `[0, 1)` and advance to the next dimension.
    #[inline]
    pub fn scalar(&mut self) -> f32 {
        let value = sample(self.index, self.dimension);
        self.dimension = self.dimension.wrapping_add(1);
        value
    }

    /// Draw a value in `[min, max)`.
    #[inline]
    pub fn scalar_in(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.scalar()
    }

    /// Two independent draws in `[0, 1)`.
    #[inline]
    pub fn vector2(&mut self) -> Vec2 {
        let x = self.scalar();
        let y = self.scalar();
        Vec2::new(x, y)
    }

    /// Three independent draws in `[0, 1)`.
    #[inline]
    pub fn vector3(&mut self) -> Vec3 {
        let x = self.scalar();
        let y = self.scalar();
        let z = self.scalar();
        Vec3::new(x, y, z)
    }

    /// Three independent draws in `[min, max)`.
    #[inline]
    pub fn vector3_in(&mut self, min: f32, max: f32) -> Vec3 {
        let x = self.scalar_in(min, max);
        let y = self.scalar_in(min, max);
        let z = self.scalar_in(min, max);
        Vec3::new(x, y, z)
    }
}

/// Random point strictly inside the unit sphere, by rejection sampling.
///
/// Gives up after a bounded number of attempts and returns the last
/// candidate, which may then lie outside the sphere.
pub fn point_in_unit_sphere(rng: &mut SequenceGenerator) -> Vec3 {
    let mut candidate = rng.vector3_in(-1.0, 1.0);
    for _ in 1..MAX_REJECTION_ATTEMPTS {
        if candidate.length_squared() < 1.0 {
            return candidate;
        }
        candidate = rng.vector3_in(-1.0, 1.0);
    }
    candidate
}

/// Random direction on the unit sphere.
///
/// Returns zero only in the degenerate case where the sphere sample is the
/// origin itself.
pub fn unit_vector(rng: &mut SequenceGenerator) -> Vec3 {
    point_in_unit_sphere(rng).normalize_or_zero()
}
