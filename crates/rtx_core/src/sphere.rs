//! Sphere primitive.

use rtx_math::{Aabb, Point3, Ray, Vec3, VecExt, EPSILON};

/// A solid sphere; usable as a closed refractive volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Point3,
    radius: f32,
    radius_sq: f32,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Point3, radius: f32) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            radius_sq: radius * radius,
            bbox,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Distance along the unit-direction `ray` to the sphere surface.
    ///
    /// From outside (`in_medium == false`) this is the entry point, and spheres
    /// behind the origin are rejected. From inside it is the exit point.
    pub fn intersect(&self, ray: &Ray, in_medium: bool) -> Option<f32> {
        let to_center = self.center - ray.origin;
        let projection = ray.direction.dot(to_center);

        if !in_medium && projection < 0.0 {
            return None;
        }

        // Squared distance between the center and the ray's line
        let offset_sq = to_center.length_squared() - projection * projection;
        if offset_sq >= self.radius_sq {
            return None;
        }

        let half_chord = (self.radius_sq - offset_sq).sqrt();
        let t = if in_medium {
            projection + half_chord
        } else {
            projection - half_chord
        };

        (t > EPSILON).then_some(t)
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal_at(&self, point: Point3) -> Vec3 {
        (point - self.center).unit()
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere() -> Sphere {
        Sphere::new(Point3::new(400.0, 350.0, 1400.0), 200.0)
    }

    #[test]
    fn test_sphere_hit_distance() {
        let s = sphere();
        let d = 125.0;
        let surface = Point3::new(400.0, 350.0, 1200.0);
        let ray = Ray::new(surface - Vec3::Z * d, Vec3::Z);

        let t = s.intersect(&ray, false).unwrap();
        assert!((t - d).abs() < 1e-2, "t = {t}");
    }

    #[test]
    fn test_sphere_miss() {
        let s = sphere();

        // Aimed away from the sphere
        let ray = Ray::new(Point3::new(400.0, 350.0, 1000.0), -Vec3::Z);
        assert!(s.intersect(&ray, false).is_none());

        // Passing beside it
        let ray = Ray::new(Point3::new(700.0, 350.0, 0.0), Vec3::Z);
        assert!(s.intersect(&ray, false).is_none());
    }

    #[test]
    fn test_sphere_exit_from_inside() {
        let s = sphere();
        let entry = Point3::new(400.0, 350.0, 1200.0);
        let ray = Ray::new(entry, Vec3::Z);

        // The near root is the entry point itself, so only the far root remains
        let t = s.intersect(&ray, true).unwrap();
        assert!((t - 400.0).abs() < 1e-2, "t = {t}");
    }

    #[test]
    fn test_sphere_normal() {
        let s = sphere();
        let n = s.normal_at(Point3::new(400.0, 550.0, 1400.0));
        assert!((n - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_sphere_bbox() {
        let s = Sphere::new(Point3::ORIGIN, 2.0);
        assert_eq!(s.bounding_box().min(), Point3::splat(-2.0));
        assert_eq!(s.bounding_box().max(), Point3::splat(2.0));
    }
}
