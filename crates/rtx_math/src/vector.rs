//! Direction helpers layered on top of `glam::Vec3`.

use glam::Vec3;
use std::f32::consts::PI;

/// Geometric tolerance used across the renderer (scene units).
pub const EPSILON: f32 = 0.001;

/// Padding added to a length before dividing by it in [`VecExt::unit`].
const NORMALIZE_PADDING: f32 = 1e-6;

/// Extra operations on direction vectors.
pub trait VecExt {
    /// Unit vector in the same direction.
    ///
    /// A zero vector maps to `(1, 0, 0)` instead of NaN, and the length is padded
    /// by a tiny epsilon so a degenerate reflection can't reproduce itself exactly.
    fn unit(self) -> Vec3;

    /// Angle between two directions in radians, in `[0, PI]`.
    fn angle_to(self, rhs: Vec3) -> f32;

    /// Mirror `self` about the plane with unit normal `normal`: `I - 2(I.N)N`.
    fn reflect_about(self, normal: Vec3) -> Vec3;

    /// Rotate `self` around the unit `axis` by `angle` radians (Rodrigues).
    fn rotate_about(self, axis: Vec3, angle: f32) -> Vec3;
}

impl VecExt for Vec3 {
    fn unit(self) -> Vec3 {
        let len = self.length();
        if len == 0.0 {
            return Vec3::X;
        }
        self / (len + NORMALIZE_PADDING)
    }

    fn angle_to(self, rhs: Vec3) -> f32 {
        let cos = self.unit().dot(rhs.unit());

        // acos is undefined just outside [-1, 1], which rounding can produce
        if (cos.abs() - 1.0).abs() < EPSILON * 10.0 {
            return if cos > 0.0 { 0.0 } else { PI };
        }

        cos.acos()
    }

    fn reflect_about(self, normal: Vec3) -> Vec3 {
        self - normal * 2.0 * self.dot(normal)
    }

    fn rotate_about(self, axis: Vec3, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        self * cos + axis.cross(self) * sin + axis * axis.dot(self) * (1.0 - cos)
    }
}

/// Snell refraction of the unit `incident` through a surface whose unit
/// `normal` faces the incoming ray.
///
/// `eta` is the ratio of refractive indices (from / to). Returns `None` on total
/// internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = -incident.dot(normal);
    let cos_t2 = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if cos_t2 <= 0.0 {
        return None;
    }

    Some((incident * eta + normal * (eta * cos_i - cos_t2.sqrt())).unit())
}
