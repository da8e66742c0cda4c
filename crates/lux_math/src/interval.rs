/// A range along one axis, or along a ray.
///
/// Ray searches treat the bounds as open: a hit at exactly `min` or `max` is
/// rejected, see [`Interval::surrounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Contains nothing.
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// True when no value lies strictly between the bounds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max <= self.min
    }

    /// Whether `x` lies strictly inside `(min, max)`.
    #[inline]
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same lower bound, new upper bound. Used to shrink a ray search after
    /// a closer hit.
    #[inline]
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }

    /// Overlap of two intervals.
    #[inline]
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval::new(self.min.max(other.min), self.max.min(other.max))
    }
}
