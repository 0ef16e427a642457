/// Closed parameter range `[min, max]`, empty when `min > max`.
///
/// Ray parameter ranges and the per-axis extents of an [`Aabb`](crate::Aabb).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Identity of [`Interval::union`].
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Smallest interval holding both.
    pub fn union(self, other: Interval) -> Interval {
        Interval::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Overlap of both. A NaN bound on `other` leaves `self` unchanged on
    /// that side.
    #[inline]
    pub fn intersect(self, other: Interval) -> Interval {
        Interval::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Grow symmetrically to at least `min_size` wide.
    pub fn padded(self, min_size: f32) -> Interval {
        let missing = min_size - self.size();
        if missing <= 0.0 {
            return self;
        }
        Interval::new(self.min - 0.5 * missing, self.max + 0.5 * missing)
    }
}
