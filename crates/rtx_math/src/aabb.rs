use crate::{Interval, Point3, Ray};

/// Direction components smaller than this are treated as parallel to a slab.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Axis-Aligned Bounding Box for the spatial index.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals, taken as-is.
    pub const fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points in any order.
    ///
    /// Axes thinner than a hair are padded so the box never has zero volume.
    pub fn from_points(a: Point3, b: Point3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    fn axis_interval_mut(&mut self, n: usize) -> &mut Interval {
        match n {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Point3 {
        Point3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Point3 {
        Point3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Point3 {
        Point3::new(self.x.center(), self.y.center(), self.z.center())
    }

    /// True when the boxes overlap (or touch) along every axis.
    ///
    /// Symmetric: `a.overlaps(&b) == b.overlaps(&a)`.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.axis_interval(axis).overlaps(&other.axis_interval(axis)))
    }

    /// Cut the box with the plane `axis = value`.
    ///
    /// Returns the lower and upper halves; they share the boundary plane.
    pub fn split(&self, value: f32, axis: usize) -> (Aabb, Aabb) {
        let mut lower = *self;
        let mut upper = *self;
        lower.axis_interval_mut(axis).max = value;
        upper.axis_interval_mut(axis).min = value;
        (lower, upper)
    }

    /// Test if a ray (from its origin forward) passes through this box.
    ///
    /// Uses the slab method. An axis the ray runs parallel to is skipped when the
    /// origin lies inside that slab and rejects the box otherwise.
    pub fn hit(&self, ray: &Ray) -> bool {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::MAX;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];

            if direction.abs() < PARALLEL_EPSILON {
                if !slab.contains(origin) {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (slab.min - origin) * inv;
            let mut t1 = (slab.max - origin) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    /// Contains nothing; the identity for [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cube(min: f32, max: f32) -> Aabb {
        Aabb::from_points(Point3::splat(min), Point3::splat(max))
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Point3::new(10.0, 0.0, 10.0), Point3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min(), Point3::ORIGIN);
        assert_eq!(aabb.max(), Point3::splat(10.0));
    }

    #[test]
    fn test_aabb_pads_flat_axes() {
        let flat = Aabb::from_points(Point3::ORIGIN, Point3::new(1.0, 1.0, 0.0));
        assert!(flat.z.size() > 0.0);
    }

    #[test]
    fn test_aabb_surrounding() {
        let surrounding = Aabb::surrounding(&cube(0.0, 5.0), &cube(3.0, 10.0));

        assert_eq!(surrounding.x.min, 0.0);
        assert_eq!(surrounding.x.max, 10.0);
    }

    #[test]
    fn test_aabb_centroid() {
        assert_eq!(cube(0.0, 10.0).centroid(), Point3::splat(5.0));
    }

    #[test]
    fn test_aabb_overlaps() {
        let a = cube(0.0, 10.0);
        assert!(a.overlaps(&cube(5.0, 15.0)));
        assert!(a.overlaps(&cube(2.0, 3.0)));
        assert!(!a.overlaps(&cube(11.0, 15.0)));

        // Overlapping on two axes only is not enough
        let side = Aabb::from_points(Point3::new(0.0, 0.0, 20.0), Point3::new(10.0, 10.0, 30.0));
        assert!(!a.overlaps(&side));
    }

    #[test]
    fn test_aabb_overlap_symmetry() {
        let mut rng = StdRng::seed_from_u64(3);
        let random_box = |rng: &mut StdRng| {
            let a = Point3::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
            let b = a + Vec3::new(rng.gen_range(0.0..30.0), rng.gen_range(0.0..30.0), rng.gen_range(0.0..30.0));
            Aabb::from_points(a, b)
        };

        for _ in 0..500 {
            let a = random_box(&mut rng);
            let b = random_box(&mut rng);
            assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }

    #[test]
    fn test_aabb_split() {
        let aabb = cube(0.0, 10.0);
        let (lower, upper) = aabb.split(4.0, 1);

        assert_eq!(lower.y, Interval::new(0.0, 4.0));
        assert_eq!(upper.y, Interval::new(4.0, 10.0));
        assert_eq!(lower.x, aabb.x);
        assert_eq!(upper.z, aabb.z);

        // Splitting is pure
        assert_eq!(aabb, cube(0.0, 10.0));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = cube(-1.0, 1.0);

        // Ray pointing at center
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&ray));

        // Ray pointing away
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), -Vec3::Z);
        assert!(!aabb.hit(&ray));

        // Ray missing the box
        let ray = Ray::new(Point3::new(10.0, 0.0, 0.0), Vec3::Z);
        assert!(!aabb.hit(&ray));

        // Ray starting inside
        let ray = Ray::new(Point3::ORIGIN, Vec3::new(0.3, 0.4, 0.5).normalize());
        assert!(aabb.hit(&ray));
    }

    #[test]
    fn test_aabb_hit_parallel_axis() {
        let aabb = cube(-1.0, 1.0);

        // Parallel to the x slab, origin inside it
        let inside = Ray::new(Point3::new(0.5, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&inside));

        // Parallel to the x slab, origin outside it
        let outside = Ray::new(Point3::new(1.5, 0.0, -5.0), Vec3::Z);
        assert!(!aabb.hit(&outside));
    }
}
