//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use rtx_math::{Aabb, Point3, Ray, Vec3, VecExt, EPSILON};

/// Relative tolerance on the Möller-Trumbore determinant.
const DETERMINANT_EPSILON: f32 = 1e-6;

/// A single flat triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices
    v0: Point3,
    v1: Point3,
    v2: Point3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Bounding box, padded by one unit on every side
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The face normal follows the winding `(v1 - v0) x (v2 - v0)`.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).unit();

        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);

        // An axis-aligned triangle would otherwise give the index a flat box
        let bbox = Aabb::from_points(min - Vec3::ONE, max + Vec3::ONE);

        Self {
            v0,
            v1,
            v2,
            normal,
            bbox,
        }
    }

    /// Möller-Trumbore ray-triangle intersection.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to the triangle, or the triangle is degenerate
        if a.abs() < DETERMINANT_EPSILON * edge1.length() * edge2.length() {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);

        // Check if intersection is outside triangle (u parameter)
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);

        // Check if intersection is outside triangle (v parameter)
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        (t > EPSILON).then_some(t)
    }

    /// Face normal; the same everywhere on the triangle.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
