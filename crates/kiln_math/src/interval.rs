/// A closed range `[min, max]` of ray distances or coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create an interval from its bounds.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Distances in front of a ray origin up to `max`.
    pub fn forward(max: f64) -> Self {
        Self::new(0.0, max)
    }

    /// Length of the interval (`max - min`).
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Inclusive membership test.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Clamp `x` into the interval.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Widen by `delta` in total, half on each end.
    pub fn expand(&self, delta: f64) -> Interval {
        let half = delta / 2.0;
        Interval::new(self.min - half, self.max + half)
    }

    /// Whether `other` lies entirely inside this interval.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Smallest interval covering both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}
