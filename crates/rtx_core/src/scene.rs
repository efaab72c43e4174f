//! Scene storage and its spatial index.
//!
//! A [`Scene`] owns every object and light by value and hands out index
//! handles. [`Scene::build`] indexes the bounded objects and the volumetric
//! lights in two k-d trees; tracing only ever sees the scene through a
//! [`SceneView`], which can't exist until the index does.

use crate::kd_tree::KdTree;
use crate::light::{Light, LightId};
use crate::object::{Object, ObjectId};
use rtx_math::Ray;
use thiserror::Error;

/// Leaf capacity of the object index.
pub const OBJECT_SPLIT_THRESHOLD: usize = 5;

/// Leaf capacity of the volumetric light index.
pub const LIGHT_SPLIT_THRESHOLD: usize = 2;

/// Errors from using a scene before it is ready.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene index is not built, call Scene::build() before tracing")]
    NotBuilt,
}

#[derive(Debug)]
struct SceneIndex {
    objects: KdTree<ObjectId>,
    lights: KdTree<LightId>,
}

/// Objects and lights to be rendered.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<Object>,
    /// Objects without a bounding box, tested against every ray.
    unbounded: Vec<ObjectId>,
    lights: Vec<Light>,
    index: Option<SceneIndex>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: Object) -> ObjectId {
        self.invalidate();
        let id = ObjectId(self.objects.len());
        if object.bounding_box().is_none() {
            self.unbounded.push(id);
        }
        self.objects.push(object);
        id
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.invalidate();
        let id = LightId(self.lights.len());
        self.lights.push(light);
        id
    }

    fn invalidate(&mut self) {
        if self.index.take().is_some() {
            log::warn!("Scene modified after build, index dropped until the next build()");
        }
    }

    /// Build the object and light indices.
    pub fn build(&mut self) {
        let objects = KdTree::build(
            self.objects
                .iter()
                .enumerate()
                .filter_map(|(i, o)| o.bounding_box().map(|b| (b, ObjectId(i)))),
            OBJECT_SPLIT_THRESHOLD,
        );
        let lights = KdTree::build(
            self.lights
                .iter()
                .enumerate()
                .filter_map(|(i, l)| l.bounding_box().map(|b| (b, LightId(i)))),
            LIGHT_SPLIT_THRESHOLD,
        );

        log::info!(
            "Built scene index: {} objects ({} unbounded), {} lights ({} volumetric)",
            self.objects.len(),
            self.unbounded.len(),
            self.lights.len(),
            lights.len()
        );
        log::debug!(
            "Object tree: depth {}, {} leaves; light tree: depth {}, {} leaves",
            objects.depth(),
            objects.leaf_count(),
            lights.depth(),
            lights.leaf_count()
        );

        self.index = Some(SceneIndex { objects, lights });
    }

    pub fn is_built(&self) -> bool {
        self.index.is_some()
    }

    /// Read-only access for tracing.
    pub fn view(&self) -> Result<SceneView<'_>, SceneError> {
        let index = self.index.as_ref().ok_or(SceneError::NotBuilt)?;
        Ok(SceneView { scene: self, index })
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}

/// A built scene, shared by every render thread.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    scene: &'a Scene,
    index: &'a SceneIndex,
}

impl<'a> SceneView<'a> {
    /// Replace `found` with the objects `ray` may hit: indexed candidates
    /// first, then every unbounded object.
    pub fn objects_along(&self, ray: &Ray, found: &mut Vec<ObjectId>) {
        self.index.objects.ray_query(ray, found);
        found.extend_from_slice(&self.scene.unbounded);
    }

    /// Replace `found` with the volumetric lights `ray` may hit.
    pub fn volumetric_lights_along(&self, ray: &Ray, found: &mut Vec<LightId>) {
        self.index.lights.ray_query(ray, found);
    }

    pub fn object(&self, id: ObjectId) -> &'a Object {
        &self.scene.objects[id.0]
    }

    pub fn light(&self, id: LightId) -> &'a Light {
        &self.scene.lights[id.0]
    }

    /// Every light, point and volumetric.
    pub fn lights(&self) -> impl Iterator<Item = (LightId, &'a Light)> + 'a {
        self.scene
            .lights
            .iter()
            .enumerate()
            .map(|(i, l)| (LightId(i), l))
    }

    pub fn object_count(&self) -> usize {
        self.scene.objects.len()
    }

    pub fn light_count(&self) -> usize {
        self.scene.lights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use rtx_math::{Color, Point3, Vec3};

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        for i in 0..12 {
            let center = Point3::new(i as f32 * 100.0, 0.0, 500.0);
            scene.add_object(Object::sphere(center, 40.0, Material::default()));
        }
        scene.add_object(Object::plane(Vec3::Y, Point3::new(0.0, -100.0, 0.0), Material::default()));
        scene.add_light(Light::dot(Point3::new(0.0, 500.0, 0.0), Color::splat(255.0), 0.5));
        scene.add_light(Light::sphere_dot(Point3::new(300.0, 300.0, 500.0), 20.0, Color::splat(255.0), 1.0));
        scene
    }

    #[test]
    fn test_view_requires_build() {
        let mut scene = sample_scene();
        assert_eq!(scene.view().unwrap_err(), SceneError::NotBuilt);

        scene.build();
        assert!(scene.view().is_ok());

        // Adding invalidates the index
        scene.add_object(Object::sphere(Point3::ORIGIN, 1.0, Material::default()));
        assert!(!scene.is_built());
        assert!(scene.view().is_err());
    }

    #[test]
    fn test_unbounded_objects_always_reported() {
        let mut scene = sample_scene();
        scene.build();
        let view = scene.view().unwrap();

        // Straight up, away from every sphere
        let mut found = Vec::new();
        view.objects_along(&Ray::new(Point3::new(50.0, 0.0, 0.0), Vec3::Y), &mut found);
        assert_eq!(found, vec![ObjectId(12)]);
    }

    #[test]
    fn test_objects_along_finds_hit_sphere() {
        let mut scene = sample_scene();
        scene.build();
        let view = scene.view().unwrap();

        let ray = Ray::new(Point3::new(300.0, 0.0, 0.0), Vec3::Z);
        let mut found = Vec::new();
        view.objects_along(&ray, &mut found);
        assert!(found.contains(&ObjectId(3)));

        let nearest = found
            .iter()
            .filter_map(|&id| view.object(id).intersect(&ray, false).map(|t| (t, id)))
            .min_by(|a, b| a.0.total_cmp(&b.0));
        assert_eq!(nearest.map(|(_, id)| id), Some(ObjectId(3)));
    }

    #[test]
    fn test_only_volumetric_lights_indexed() {
        let mut scene = sample_scene();
        scene.build();
        let view = scene.view().unwrap();

        let mut found = Vec::new();
        let towards_sphere_light = Ray::new(Point3::new(300.0, 0.0, 500.0), Vec3::Y);
        view.volumetric_lights_along(&towards_sphere_light, &mut found);
        assert_eq!(found, vec![LightId(1)]);

        let towards_dot_light = Ray::new(Point3::ORIGIN, Vec3::Y);
        view.volumetric_lights_along(&towards_dot_light, &mut found);
        assert!(found.is_empty());

        assert_eq!(view.lights().count(), 2);
    }

    #[test]
    fn test_empty_scene() {
        let mut scene = Scene::new();
        scene.build();
        let view = scene.view().unwrap();

        let mut objects = Vec::new();
        let mut lights = Vec::new();
        let ray = Ray::new(Point3::ORIGIN, Vec3::Z);
        view.objects_along(&ray, &mut objects);
        view.volumetric_lights_along(&ray, &mut lights);
        assert!(objects.is_empty() && lights.is_empty());
    }
}
