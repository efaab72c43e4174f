//! Light sources.
//!
//! Point-like emitters ([`DotLight`], [`SpotLight`]) only illuminate. Wrapping one
//! in a [`SphereLight`] gives it a body: rays can hit it, and shading samples
//! points on its visible cap instead of a single position.

use crate::sampling::{gen_f32, sample_cone};
use rand::RngCore;
use rtx_math::{Aabb, Color, Point3, Ray, Vec3, VecExt, EPSILON};

/// Handle to a light stored in a [`Scene`](crate::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(pub(crate) usize);

impl LightId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Emission profile of a point-like light.
pub trait Emitter {
    fn position(&self) -> Point3;

    /// Radiance seen when looking straight at the light.
    fn emission(&self) -> Color;

    /// Light reaching a surface with unit `normal` along the unit `to_light`
    /// (surface towards light) from `distance` away.
    ///
    /// Zero when the surface faces away from the light.
    fn strength_towards(&self, to_light: Vec3, distance: f32, normal: Vec3) -> Color;
}

/// Isotropic point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotLight {
    position: Point3,
    color: Color,
    strength: f32,
    attenuation: f32,
}

impl DotLight {
    pub fn new(position: Point3, color: Color, strength: f32) -> Self {
        Self {
            position,
            color,
            strength,
            attenuation: 0.0,
        }
    }

    /// Quadratic distance falloff `1 / (1 + k d^2)`; zero keeps the intensity constant.
    pub fn with_attenuation(mut self, k: f32) -> Self {
        self.attenuation = k.max(0.0);
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl Emitter for DotLight {
    fn position(&self) -> Point3 {
        self.position
    }

    fn emission(&self) -> Color {
        self.color * self.strength
    }

    fn strength_towards(&self, to_light: Vec3, distance: f32, normal: Vec3) -> Color {
        if normal.dot(to_light) <= 0.0 {
            return Color::ZERO;
        }

        let falloff = 1.0 / (1.0 + self.attenuation * distance * distance);
        self.emission() * falloff
    }
}

/// A point light that shines along `direction`, fading towards the sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    dot: DotLight,
    direction: Vec3,
    decay: f32,
}

impl SpotLight {
    /// Intensity off the axis falls off as `cos^(1 / decay)`, so a larger
    /// `decay` gives a wider beam.
    pub fn new(position: Point3, color: Color, strength: f32, direction: Vec3, decay: f32) -> Self {
        Self {
            dot: DotLight::new(position, color, strength),
            direction: direction.unit(),
            decay: decay.max(EPSILON),
        }
    }

    pub fn with_attenuation(mut self, k: f32) -> Self {
        self.dot = self.dot.with_attenuation(k);
        self
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }
}

impl Emitter for SpotLight {
    fn position(&self) -> Point3 {
        self.dot.position
    }

    fn emission(&self) -> Color {
        self.dot.emission()
    }

    fn strength_towards(&self, to_light: Vec3, distance: f32, normal: Vec3) -> Color {
        let cos = (-to_light).dot(self.direction);
        if cos <= 0.0 {
            return Color::ZERO;
        }

        self.dot.strength_towards(to_light, distance, normal) * cos.powf(1.0 / self.decay)
    }
}

/// One direction towards a light, as seen from a shading point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit direction from the shading point towards the light.
    pub direction: Vec3,
    /// Distance to the sampled point on the light.
    pub distance: f32,
    /// Weight that turns the sample into an estimate of the whole light.
    pub ratio: f32,
}

/// A spherical body around a point-like emitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereLight<E> {
    emitter: E,
    radius: f32,
    radius_sq: f32,
}

impl<E: Emitter> SphereLight<E> {
    pub fn new(emitter: E, radius: f32) -> Self {
        let radius = radius.max(EPSILON);
        Self {
            emitter,
            radius,
            radius_sq: radius * radius,
        }
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Distance along `ray` to the front of the light body.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let to_center = self.emitter.position() - ray.origin;
        let projection = ray.direction.dot(to_center);
        let offset_sq = to_center.length_squared() - projection * projection;
        if offset_sq >= self.radius_sq {
            return None;
        }

        let half_chord = (self.radius_sq - offset_sq).sqrt();
        let near = projection - half_chord;
        if near > EPSILON {
            return Some(near);
        }

        // Origin inside the body
        let far = projection + half_chord;
        (far > EPSILON).then_some(far)
    }

    /// Cosine of the half-angle of the cone the body fills, seen from `from`.
    fn cos_max(&self, from: Point3) -> f32 {
        let dist_sq = (self.emitter.position() - from).length_squared();
        let sin_sq = (self.radius_sq / dist_sq.max(f32::MIN_POSITIVE)).min(1.0);
        (1.0 - sin_sq).sqrt()
    }

    /// Solid angle of the visible cap over pi.
    ///
    /// For a Lambertian receiver this is the exact weight of one uniformly
    /// distributed cone sample; it shrinks like `(r / d)^2` with distance.
    pub fn sample_ratio(&self, from: Point3) -> f32 {
        2.0 * (1.0 - self.cos_max(from))
    }

    /// Direction towards a uniformly chosen point of the visible cap.
    ///
    /// `stratum` out of `strata` restricts the polar angle to one band, so a set
    /// of samples covers the cap evenly.
    pub fn sample(&self, from: Point3, stratum: usize, strata: usize, rng: &mut dyn RngCore) -> LightSample {
        let to_center = self.emitter.position() - from;
        let axis = to_center.unit();
        let cos_max = self.cos_max(from);

        let strata = strata.max(1);
        let u1 = (stratum.min(strata - 1) as f32 + gen_f32(rng)) / strata as f32;
        let direction = sample_cone(axis, cos_max, u1, gen_f32(rng));

        let distance = self
            .intersect(&Ray::new(from, direction))
            .unwrap_or_else(|| (to_center.length() - self.radius).max(0.0));

        LightSample {
            direction,
            distance,
            ratio: self.sample_ratio(from),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        let c = self.emitter.position();
        Aabb::from_points(c - r, c + r)
    }
}

/// Every kind of light the tracer understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Dot(DotLight),
    Spot(SpotLight),
    SphereDot(SphereLight<DotLight>),
    SphereSpot(SphereLight<SpotLight>),
}

impl Light {
    pub fn dot(position: Point3, color: Color, strength: f32) -> Self {
        Light::Dot(DotLight::new(position, color, strength))
    }

    pub fn spot(position: Point3, color: Color, strength: f32, direction: Vec3, decay: f32) -> Self {
        Light::Spot(SpotLight::new(position, color, strength, direction, decay))
    }

    pub fn sphere_dot(center: Point3, radius: f32, color: Color, strength: f32) -> Self {
        Light::SphereDot(SphereLight::new(DotLight::new(center, color, strength), radius))
    }

    pub fn sphere_spot(
        center: Point3,
        radius: f32,
        color: Color,
        strength: f32,
        direction: Vec3,
        decay: f32,
    ) -> Self {
        Light::SphereSpot(SphereLight::new(
            SpotLight::new(center, color, strength, direction, decay),
            radius,
        ))
    }

    fn emitter(&self) -> &dyn Emitter {
        match self {
            Light::Dot(l) => l,
            Light::Spot(l) => l,
            Light::SphereDot(l) => l.emitter(),
            Light::SphereSpot(l) => l.emitter(),
        }
    }

    pub fn position(&self) -> Point3 {
        self.emitter().position()
    }

    pub fn emission(&self) -> Color {
        self.emitter().emission()
    }

    pub fn strength_towards(&self, to_light: Vec3, distance: f32, normal: Vec3) -> Color {
        self.emitter().strength_towards(to_light, distance, normal)
    }

    /// Whether the light has a body that rays can hit.
    pub fn is_volumetric(&self) -> bool {
        matches!(self, Light::SphereDot(_) | Light::SphereSpot(_))
    }

    /// Distance along `ray` to the light body; point lights are never hit.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match self {
            Light::Dot(_) | Light::Spot(_) => None,
            Light::SphereDot(l) => l.intersect(ray),
            Light::SphereSpot(l) => l.intersect(ray),
        }
    }

    /// How many samples shading should take when `requested` are configured.
    pub fn sample_count(&self, requested: u32) -> u32 {
        if self.is_volumetric() {
            requested.max(1)
        } else {
            1
        }
    }

    /// Direction from `from` towards the light; point lights ignore the stratum.
    pub fn sample(&self, from: Point3, stratum: usize, strata: usize, rng: &mut dyn RngCore) -> LightSample {
        match self {
            Light::SphereDot(l) => l.sample(from, stratum, strata, rng),
            Light::SphereSpot(l) => l.sample(from, stratum, strata, rng),
            Light::Dot(_) | Light::Spot(_) => {
                let to_light = self.position() - from;
                LightSample {
                    direction: to_light.unit(),
                    distance: to_light.length(),
                    ratio: 1.0,
                }
            }
        }
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        match self {
            Light::Dot(_) | Light::Spot(_) => None,
            Light::SphereDot(l) => Some(l.bounding_box()),
            Light::SphereSpot(l) => Some(l.bounding_box()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WHITE: Color = Color::splat(255.0);

    #[test]
    fn test_dot_light_is_isotropic() {
        let light = DotLight::new(Point3::new(0.0, 10.0, 0.0), WHITE, 0.5);
        let a = light.strength_towards(Vec3::Y, 10.0, Vec3::Y);
        let b = light.strength_towards(Vec3::new(1.0, 1.0, 0.0).unit(), 14.0, Vec3::Y);
        assert_eq!(a, b);
        assert_eq!(a, Color::splat(127.5));
    }

    #[test]
    fn test_dot_light_behind_surface() {
        let light = DotLight::new(Point3::new(0.0, -10.0, 0.0), WHITE, 1.0);
        assert_eq!(light.strength_towards(-Vec3::Y, 10.0, Vec3::Y), Color::ZERO);
    }

    #[test]
    fn test_dot_light_attenuation() {
        let light = DotLight::new(Point3::ORIGIN, WHITE, 1.0).with_attenuation(0.01);
        let near = light.strength_towards(Vec3::Y, 1.0, Vec3::Y);
        let far = light.strength_towards(Vec3::Y, 10.0, Vec3::Y);
        assert!(far.x < near.x);
        assert!((far.x - 127.5).abs() < 1e-3);
    }

    #[test]
    fn test_spot_light_cone() {
        // Shining straight down
        let spot = SpotLight::new(Point3::new(0.0, 10.0, 0.0), WHITE, 1.0, -Vec3::Y, 1.0);

        let on_axis = spot.strength_towards(Vec3::Y, 10.0, Vec3::Y);
        let off_axis = spot.strength_towards(Vec3::new(1.0, 1.0, 0.0).unit(), 14.0, Vec3::Y);
        let behind = spot.strength_towards(-Vec3::Y, 10.0, -Vec3::Y);

        assert_eq!(on_axis, WHITE);
        assert!(off_axis.x > 0.0 && off_axis.x < on_axis.x);
        assert_eq!(behind, Color::ZERO);
    }

    #[test]
    fn test_spot_light_decay_widens_beam() {
        let narrow = SpotLight::new(Point3::ORIGIN, WHITE, 1.0, -Vec3::Y, 0.5);
        let wide = SpotLight::new(Point3::ORIGIN, WHITE, 1.0, -Vec3::Y, 4.0);
        let to_light = Vec3::new(0.5, 1.0, 0.0).unit();

        let w = wide.strength_towards(to_light, 1.0, Vec3::Y).x;
        let n = narrow.strength_towards(to_light, 1.0, Vec3::Y).x;
        assert!(w > n);
    }

    #[test]
    fn test_sphere_light_is_visible() {
        let light = Light::sphere_dot(Point3::new(0.0, 0.0, 100.0), 10.0, WHITE, 1.0);
        let ray = Ray::new(Point3::ORIGIN, Vec3::Z);
        let t = light.intersect(&ray).unwrap();
        assert!((t - 90.0).abs() < 1e-3);

        let miss = Ray::new(Point3::ORIGIN, Vec3::X);
        assert!(light.intersect(&miss).is_none());
        assert!(Light::dot(Point3::new(0.0, 0.0, 100.0), WHITE, 1.0).intersect(&ray).is_none());
    }

    #[test]
    fn test_sphere_light_samples_hit_the_body() {
        let light = SphereLight::new(DotLight::new(Point3::new(0.0, 50.0, 0.0), WHITE, 1.0), 5.0);
        let from = Point3::ORIGIN;
        let mut rng = StdRng::seed_from_u64(9);

        for i in 0..64 {
            let s = light.sample(from, i % 8, 8, &mut rng);
            let hit = light.intersect(&Ray::new(from, s.direction));
            assert!(hit.is_some(), "sample {i} missed the light");
            assert!(s.distance >= 45.0 - 1e-2 && s.distance <= 50.0);
        }
    }

    #[test]
    fn test_sphere_spot_light() {
        // Hangs at y = 50 and shines straight down
        let light = Light::sphere_spot(Point3::new(0.0, 50.0, 0.0), 5.0, WHITE, 1.0, -Vec3::Y, 1.0);
        assert!(light.is_volumetric());
        assert_eq!(light.sample_count(4), 4);
        assert_eq!(light.emission(), WHITE);
        assert!(light.bounding_box().is_some_and(|b| b.max().y >= 55.0 && b.min().y <= 45.0));

        let up = Ray::new(Point3::ORIGIN, Vec3::Y);
        assert!((light.intersect(&up).unwrap() - 45.0).abs() < 1e-3);
        assert!(light.intersect(&Ray::new(Point3::ORIGIN, -Vec3::Y)).is_none());

        let mut rng = StdRng::seed_from_u64(4);
        for stratum in 0..4 {
            let s = light.sample(Point3::ORIGIN, stratum, 4, &mut rng);
            assert!(light.intersect(&Ray::new(Point3::ORIGIN, s.direction)).is_some());
            assert!((s.ratio - 2.0 * (1.0 - (1.0f32 - 0.01).sqrt())).abs() < 1e-4);
        }

        // Brightest under the light, dimmer to the side, dark above it
        let below = light.strength_towards(Vec3::Y, 50.0, Vec3::Y);
        let aside = light.strength_towards(Vec3::new(1.0, 1.0, 0.0).unit(), 70.0, Vec3::Y);
        let above = light.strength_towards(-Vec3::Y, 50.0, -Vec3::Y);
        assert_eq!(below, WHITE);
        assert!(aside.x > 0.0 && aside.x < below.x);
        assert_eq!(above, Color::ZERO);
    }

    #[test]
    fn test_sample_ratio_shrinks_with_distance() {
        let light = SphereLight::new(DotLight::new(Point3::ORIGIN, WHITE, 1.0), 1.0);
        let near = light.sample_ratio(Point3::new(0.0, 0.0, 2.0));
        let far = light.sample_ratio(Point3::new(0.0, 0.0, 20.0));

        assert!(far < near);
        // (r / d)^2 for small caps
        assert!((far - 0.0025).abs() < 1e-4);
    }

    #[test]
    fn test_point_light_sample_is_exact() {
        let light = Light::dot(Point3::new(3.0, 4.0, 0.0), WHITE, 1.0);
        let mut rng = StdRng::seed_from_u64(0);
        let s = light.sample(Point3::ORIGIN, 0, 1, &mut rng);

        assert!((s.distance - 5.0).abs() < 1e-4);
        assert_eq!(s.ratio, 1.0);
        assert_eq!(light.sample_count(16), 1);
    }
}
