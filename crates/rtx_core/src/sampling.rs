//! Random direction helpers for Monte-Carlo estimation.

use rand::{Rng, RngCore};
use rtx_math::{Vec3, VecExt};
use std::f32::consts::PI;

/// Uniform `f32` in `[0, 1)` from any rng.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}

/// Two unit vectors that complete `w` (unit) to a right-handed orthonormal basis.
pub fn orthonormal_basis(w: Vec3) -> (Vec3, Vec3) {
    let helper = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
    let u = helper.cross(w).unit();
    let v = w.cross(u);
    (u, v)
}

/// Direction inside the cone around unit `axis` with `cos(half angle) = cos_max`.
///
/// `u1` and `u2` in `[0, 1)` pick the sample; uniform inputs give directions
/// uniformly distributed over the cone's solid angle.
pub fn sample_cone(axis: Vec3, cos_max: f32, u1: f32, u2: f32) -> Vec3 {
    let cos_theta = 1.0 - u1 * (1.0 - cos_max);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * u2;

    let (u, v) = orthonormal_basis(axis);
    (u * (sin_theta * phi.cos()) + v * (sin_theta * phi.sin()) + axis * cos_theta).unit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_gen_f32_matches_rng_stream() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        for _ in 0..16 {
            assert_eq!(gen_f32(&mut a), b.gen::<f32>());
        }
    }

    #[test]
    fn test_orthonormal_basis() {
        for w in [Vec3::X, Vec3::Y, Vec3::new(1.0, 2.0, -3.0).normalize()] {
            let (u, v) = orthonormal_basis(w);
            assert!(u.dot(w).abs() < 1e-4);
            assert!(v.dot(w).abs() < 1e-4);
            assert!(u.dot(v).abs() < 1e-4);
            assert!((u.length() - 1.0).abs() < 1e-4);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sample_cone_stays_inside() {
        let mut rng = StdRng::seed_from_u64(5);
        let axis = Vec3::new(0.0, 1.0, 1.0).normalize();
        let cos_max = 20.0_f32.to_radians().cos();

        for _ in 0..500 {
            let d = sample_cone(axis, cos_max, gen_f32(&mut rng), gen_f32(&mut rng));
            assert!(d.dot(axis) >= cos_max - 1e-4);
        }
    }
}
