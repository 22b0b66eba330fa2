/// A closed range of floats along one axis (or along a ray).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns the midpoint of the interval.
    pub fn midpoint(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if the two closed intervals share at least one point.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Splits the interval at its midpoint into (lower, upper) halves.
    pub fn halves(&self) -> (Interval, Interval) {
        let mid = self.midpoint();
        (Interval::new(self.min, mid), Interval::new(mid, self.max))
    }

    /// Grows the interval by `amount` on each side.
    pub fn expand(&self, amount: f32) -> Interval {
        Interval::new(self.min - amount, self.max + amount)
    }
}
