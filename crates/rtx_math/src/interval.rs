/// A closed range `[min, max]` along one axis.
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

    /// Midpoint of the interval.
    pub fn center(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// True when the two intervals are close enough to share at least one point.
    ///
    /// Compares the distance between the centers with the sum of half-extents,
    /// so touching intervals count as overlapping.
    pub fn overlaps(&self, other: &Interval) -> bool {
        let reach = self.size() * 0.5 + other.size() * 0.5;
        (self.center() - other.center()).abs() <= reach
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size_and_center() {
        let interval = Interval::new(2.0, 7.0);
        assert_eq!(interval.size(), 5.0);
        assert_eq!(interval.center(), 4.5);
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        // Outside bounds
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_overlaps() {
        let a = Interval::new(0.0, 10.0);
        assert!(a.overlaps(&Interval::new(5.0, 15.0)));
        assert!(a.overlaps(&Interval::new(10.0, 12.0)));
        assert!(a.overlaps(&Interval::new(2.0, 3.0)));
        assert!(!a.overlaps(&Interval::new(10.5, 12.0)));
        assert!(!a.overlaps(&Interval::new(-3.0, -1.0)));
    }

    #[test]
    fn test_interval_expand() {
        let expanded = Interval::new(0.0, 10.0).expand(4.0);

        // Expanded by 2.0 on each side (4.0 / 2)
        assert_eq!(expanded.min, -2.0);
        assert_eq!(expanded.max, 12.0);
    }

    #[test]
    fn test_interval_empty() {
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(!Interval::EMPTY.overlaps(&Interval::new(-1.0, 1.0)));

        let grown = Interval::surrounding(&Interval::EMPTY, &Interval::new(1.0, 2.0));
        assert_eq!(grown, Interval::new(1.0, 2.0));
    }
}
