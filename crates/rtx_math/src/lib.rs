//! RTX math - value types shared by the scene and the tracer.
//!
//! Directions are plain `glam::Vec3`; locations get their own [`Point3`] type so
//! two positions can't be added by accident. Colors reuse `Vec3` as an unbounded
//! RGB triple in the 0-255 display scale.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod color;
mod interval;
mod point;
mod ray;
mod vector;

pub use aabb::Aabb;
pub use color::{pack_rgb, unpack_rgb, Color};
pub use interval::Interval;
pub use point::Point3;
pub use ray::Ray;
pub use vector::{refract, VecExt, EPSILON};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_vec(rng: &mut StdRng) -> Vec3 {
        Vec3::new(
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
        )
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn test_vector_algebra_laws() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = random_vec(&mut rng);
            let b = random_vec(&mut rng);
            let c = random_vec(&mut rng);

            assert!(close(a + b, b + a));
            assert!(close((a + b) + c, a + (b + c)));
            assert!((a.dot(b) - b.dot(a)).abs() < 1e-3);
            assert!(close(a.cross(b), -b.cross(a)));
            assert!((a.unit().length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_point_vec_duality() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let p = Point3::from(random_vec(&mut rng));
            let q = Point3::from(random_vec(&mut rng));
            let v = p - q;
            assert!(close((q + v).to_vec3(), p.to_vec3()));
        }
    }
}
