//! The recursive ray caster.
//!
//! [`Tracer::cast`] is a pure function of the ray, the scene and the random
//! stream: it returns the color seen along the ray and never writes through
//! an output parameter, so each term can be checked on its own.

use crate::TraceConfig;
use rand::RngCore;
use rtx_core::sampling::{gen_f32, sample_cone};
use rtx_core::{Intersection, Light, ObjectId, Refraction, SceneView};
use rtx_math::{Color, Point3, Ray, Vec3, VecExt, EPSILON};
use std::f32::consts::FRAC_PI_2;

/// Diffuse factors at or below this take the mirror path at the primary bounce.
const DIFFUSE_THRESHOLD: f32 = 0.01;

/// Occlusion between a shading point and a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shadow {
    /// Nothing in the way.
    Unshadowed,
    /// Only the surface the ray is travelling inside is in the way.
    SelfShadowed,
    /// Another object is in the way.
    Blocked,
}

/// Traces rays through one built scene with one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'a> {
    scene: SceneView<'a>,
    config: &'a TraceConfig,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: SceneView<'a>, config: &'a TraceConfig) -> Self {
        Self { scene, config }
    }

    /// Color seen from the camera along a primary ray.
    pub fn primary(&self, ray: &Ray, rng: &mut dyn RngCore) -> Color {
        self.cast(ray, None, false, self.config.max_depth, rng)
    }

    /// Color arriving along `ray`.
    ///
    /// `emitter` is the surface the ray leaves from; it can only be hit again
    /// from inside (`in_medium`). `depth` counts the remaining bounces.
    pub fn cast(
        &self,
        ray: &Ray,
        emitter: Option<ObjectId>,
        in_medium: bool,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        if depth == 0 {
            return Color::ZERO;
        }

        let hit = self.nearest_object(ray, emitter, in_medium);
        let mut color = Color::ZERO;

        // A light body in front of the hit glows on top of it
        if let Some((distance, light)) = self.nearest_light(ray) {
            if hit.map_or(true, |h| distance < h.distance) {
                color += light.emission();
            }
        }

        color
            + match hit {
                Some(hit) => self.shade(ray, &hit, in_medium, depth, rng),
                None if depth == self.config.max_depth => self.config.background,
                None => Color::ZERO,
            }
    }

    /// Nearest object along `ray`.
    pub fn nearest_object(
        &self,
        ray: &Ray,
        emitter: Option<ObjectId>,
        in_medium: bool,
    ) -> Option<Intersection<'a>> {
        let mut candidates = Vec::new();
        self.scene.objects_along(ray, &mut candidates);

        let mut nearest: Option<(f32, ObjectId)> = None;
        for id in candidates {
            let own_surface = Some(id) == emitter;
            if own_surface && !in_medium {
                continue;
            }

            let Some(t) = self.scene.object(id).intersect(ray, own_surface) else {
                continue;
            };
            if nearest.map_or(true, |(best, _)| t < best) {
                nearest = Some((t, id));
            }
        }

        nearest.map(|(distance, id)| Intersection {
            point: ray.at(distance),
            distance,
            id,
            object: self.scene.object(id),
        })
    }

    /// Nearest light body along `ray`.
    fn nearest_light(&self, ray: &Ray) -> Option<(f32, &'a Light)> {
        let mut candidates = Vec::new();
        self.scene.volumetric_lights_along(ray, &mut candidates);

        candidates
            .into_iter()
            .filter_map(|id| {
                let light = self.scene.light(id);
                light.intersect(ray).map(|t| (t, light))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    fn shade(
        &self,
        ray: &Ray,
        hit: &Intersection<'a>,
        in_medium: bool,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let object = hit.object;
        let point = hit.point;
        let mut color = Color::ZERO;
        let mut total_reflection = false;

        let transmittance = object.transmittance_at(point);
        if transmittance.max_element() > EPSILON {
            match object.refract(point, ray.direction, in_medium) {
                Refraction::Transmitted(direction) => {
                    let refracted = Ray::new(point, direction);
                    color += self.cast(&refracted, Some(hit.id), !in_medium, depth - 1, rng) * transmittance;
                }
                Refraction::TotalInternalReflection => total_reflection = true,
            }
        }

        // Normal on the side the ray arrived from
        let mut normal = object.normal_at(point);
        if normal.dot(ray.direction) > 0.0 {
            normal = -normal;
        }

        let reflected = object.reflect(point, ray.direction);
        let diffuse = object.diffuse();
        let primary = depth == self.config.max_depth;

        let mut lit = if primary && diffuse > DIFFUSE_THRESHOLD && self.config.diffuse_samples > 0 {
            self.diffuse_bounce(point, reflected, normal, hit.id, in_medium, diffuse, depth, rng)
        } else if diffuse < 1.0 {
            let mirror = Ray::new(point, reflected);
            self.cast(&mirror, Some(hit.id), in_medium, depth - 1, rng) * (1.0 - diffuse)
        } else {
            Color::ZERO
        };
        lit += self.direct_light(point, normal, reflected, hit, in_medium, rng);

        let ratio = if total_reflection {
            object.combined_ratio()
        } else {
            object.reflectance_at(point)
        };
        color + lit * ratio
    }

    /// Monte-Carlo estimate of light scattered around the mirror direction.
    ///
    /// Samples fill a cone around `reflected` whose half-angle is
    /// `diffuse * PI / 2`; samples that dip below the surface are mirrored back
    /// above it.
    #[allow(clippy::too_many_arguments)]
    fn diffuse_bounce(
        &self,
        point: Point3,
        reflected: Vec3,
        normal: Vec3,
        id: ObjectId,
        in_medium: bool,
        diffuse: f32,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let samples = self.config.diffuse_samples;
        let cos_max = (diffuse * FRAC_PI_2).cos();

        let mut sum = Color::ZERO;
        for i in 0..samples {
            let u1 = (i as f32 + gen_f32(rng)) / samples as f32;
            let mut direction = sample_cone(reflected, cos_max, u1, gen_f32(rng));
            if direction.dot(normal) < 0.0 {
                direction = direction.reflect_about(normal);
            }
            sum += self.cast(&Ray::new(point, direction), Some(id), in_medium, depth - 1, rng);
        }
        sum / samples as f32
    }

    /// Light reaching `point` straight from every light source, plus ambient.
    ///
    /// Each light contributes a Lambert term weighted by the diffuse factor and
    /// a Phong lobe around `reflected` weighted by the rest.
    fn direct_light(
        &self,
        point: Point3,
        normal: Vec3,
        reflected: Vec3,
        hit: &Intersection<'a>,
        in_medium: bool,
        rng: &mut dyn RngCore,
    ) -> Color {
        let diffuse = hit.object.diffuse();
        let mut total = self.config.ambient * diffuse;

        for (_, light) in self.scene.lights() {
            let count = light.sample_count(self.config.light_samples);
            let mut sum = Color::ZERO;

            for stratum in 0..count {
                let sample = light.sample(point, stratum as usize, count as usize, rng);
                let lambert = normal.dot(sample.direction);
                if lambert <= 0.0 {
                    continue;
                }

                let visibility = match self.shadow(point, &sample.direction, sample.distance, hit.id, in_medium) {
                    Shadow::Blocked => continue,
                    Shadow::Unshadowed => Color::ONE,
                    Shadow::SelfShadowed => hit.object.transmittance_at(point),
                };

                let strength = light.strength_towards(sample.direction, sample.distance, normal);
                let specular = reflected.dot(sample.direction).max(0.0).powf(self.config.shininess);
                let weight = lambert * diffuse + specular * (1.0 - diffuse);
                sum += strength * visibility * (weight * sample.ratio);
            }

            total += sum / count as f32;
        }

        total
    }

    /// Occlusion of the segment from `point` along `direction` up to `distance`.
    ///
    /// The surface `emitter` only counts when the point is inside it, and then
    /// only as a self-shadow.
    pub fn shadow(
        &self,
        point: Point3,
        direction: &Vec3,
        distance: f32,
        emitter: ObjectId,
        in_medium: bool,
    ) -> Shadow {
        let ray = Ray::new(point, *direction);
        let mut candidates = Vec::new();
        self.scene.objects_along(&ray, &mut candidates);

        let mut shadow = Shadow::Unshadowed;
        for id in candidates {
            let object = self.scene.object(id);
            if id == emitter {
                if in_medium && object.intersect(&ray, true).is_some_and(|t| t < distance) {
                    shadow = Shadow::SelfShadowed;
                }
                continue;
            }

            if object.intersect(&ray, false).is_some_and(|t| t < distance) {
                return Shadow::Blocked;
            }
        }

        shadow
    }
}
