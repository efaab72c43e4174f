//! Renderable surfaces: a closed set of shapes paired with a material.

use crate::material::Material;
use crate::plane::{CheesePlane, Plane};
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use rtx_math::{refract, Aabb, Color, Point3, Ray, Vec3, VecExt};

/// Handle to an object stored in a [`Scene`](crate::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Geometry of an [`Object`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    CheesePlane(CheesePlane),
    Triangle(Triangle),
}

/// Outcome of bending a ray through a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Refraction {
    /// The transmitted direction (unit length).
    Transmitted(Vec3),
    /// No transmitted ray exists; all energy reflects.
    TotalInternalReflection,
}

/// A nearest-hit result. Built per query and never stored.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    pub point: Point3,
    pub distance: f32,
    pub id: ObjectId,
    pub object: &'a Object,
}

/// A shape with its surface response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Object {
    shape: Shape,
    material: Material,
}

impl Object {
    pub fn new(shape: Shape, material: Material) -> Self {
        Self { shape, material }
    }

    pub fn sphere(center: Point3, radius: f32, material: Material) -> Self {
        Self::new(Shape::Sphere(Sphere::new(center, radius)), material)
    }

    pub fn plane(normal: Vec3, point: Point3, material: Material) -> Self {
        Self::new(Shape::Plane(Plane::new(normal, point)), material)
    }

    /// Checkered plane; the material's reflectance is replaced by the pattern.
    pub fn cheese_plane(plane: CheesePlane, material: Material) -> Self {
        Self::new(Shape::CheesePlane(plane), material)
    }

    pub fn triangle(v0: Point3, v1: Point3, v2: Point3, material: Material) -> Self {
        Self::new(Shape::Triangle(Triangle::new(v0, v1, v2)), material)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Distance along the unit-direction `ray` to this surface.
    ///
    /// `in_medium` picks the exit point of a closed volume the ray is inside of;
    /// flat shapes ignore it.
    pub fn intersect(&self, ray: &Ray, in_medium: bool) -> Option<f32> {
        match &self.shape {
            Shape::Sphere(s) => s.intersect(ray, in_medium),
            Shape::Plane(p) => p.intersect(ray),
            Shape::CheesePlane(c) => c.plane().intersect(ray),
            Shape::Triangle(t) => t.intersect(ray),
        }
    }

    /// Outward unit normal at `point`.
    pub fn normal_at(&self, point: Point3) -> Vec3 {
        match &self.shape {
            Shape::Sphere(s) => s.normal_at(point),
            Shape::Plane(p) => p.normal(),
            Shape::CheesePlane(c) => c.plane().normal(),
            Shape::Triangle(t) => t.normal(),
        }
    }

    /// Mirror direction of `direction` at `point`.
    pub fn reflect(&self, point: Point3, direction: Vec3) -> Vec3 {
        direction.reflect_about(self.normal_at(point)).unit()
    }

    /// Refract `direction` at `point`.
    ///
    /// Entering (`in_medium == false`) bends by `1 / eta`, leaving by `eta`. For a
    /// sphere the normal is flipped inwards when leaving; flat shapes orient it
    /// against the ray.
    pub fn refract(&self, point: Point3, direction: Vec3, in_medium: bool) -> Refraction {
        let eta = if in_medium {
            self.material.eta()
        } else {
            1.0 / self.material.eta()
        };

        let outward = self.normal_at(point);
        let normal = match &self.shape {
            Shape::Sphere(_) if in_medium => -outward,
            Shape::Sphere(_) => outward,
            _ if outward.dot(direction) > 0.0 => -outward,
            _ => outward,
        };

        match refract(direction, normal, eta) {
            Some(transmitted) => Refraction::Transmitted(transmitted),
            None => Refraction::TotalInternalReflection,
        }
    }

    /// Reflectance at `point`; only checkered planes vary across the surface.
    pub fn reflectance_at(&self, point: Point3) -> Color {
        match &self.shape {
            Shape::CheesePlane(c) => c.pattern_at(point),
            _ => self.material.reflectance(),
        }
    }

    pub fn transmittance_at(&self, _point: Point3) -> Color {
        self.material.transmittance()
    }

    pub fn combined_ratio(&self) -> Color {
        self.material.combined_ratio()
    }

    pub fn diffuse(&self) -> f32 {
        self.material.diffuse()
    }

    pub fn eta(&self) -> f32 {
        self.material.eta()
    }

    /// Bounds for the spatial index; `None` for unbounded planes.
    pub fn bounding_box(&self) -> Option<Aabb> {
        match &self.shape {
            Shape::Sphere(s) => Some(s.bounding_box()),
            Shape::Triangle(t) => Some(t.bounding_box()),
            Shape::Plane(_) | Shape::CheesePlane(_) => None,
        }
    }
}
