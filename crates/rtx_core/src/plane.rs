//! Infinite planes, plain and checkered.
//!
//! Planes have no bounding box; the scene keeps them out of the spatial index
//! and tests them against every ray.

use crate::sampling::orthonormal_basis;
use rtx_math::{Color, Point3, Ray, Vec3, VecExt, EPSILON};

/// The origin is nudged this far along the ray before testing, so a ray leaving
/// the plane doesn't hit it again straight away.
const SELF_HIT_OFFSET: f32 = EPSILON * 5.0;

/// Edge length of a checkerboard cell, in scene units.
pub const DEFAULT_CELL_SIZE: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec3,
    point: Point3,
}

impl Plane {
    /// Plane through `point` facing `normal` (normalized here).
    pub fn new(normal: Vec3, point: Point3) -> Self {
        Self {
            normal: normal.unit(),
            point,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn point(&self) -> Point3 {
        self.point
    }

    /// Distance along `ray` to the plane; `None` when (nearly) parallel or behind.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < EPSILON {
            return None;
        }

        let start = ray.origin + ray.direction * SELF_HIT_OFFSET;
        let t = self.normal.dot(self.point - start) / denom;
        if t < 0.0 {
            return None;
        }

        Some(t + SELF_HIT_OFFSET)
    }
}

/// A plane whose reflectance alternates between two colors in square cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheesePlane {
    plane: Plane,
    base1: Vec3,
    base2: Vec3,
    cell_size: f32,
    colors: [Color; 2],
}

impl CheesePlane {
    /// Black and light-grey cells of [`DEFAULT_CELL_SIZE`].
    pub fn new(normal: Vec3, point: Point3) -> Self {
        let plane = Plane::new(normal, point);
        let (base1, base2) = orthonormal_basis(plane.normal);

        Self {
            plane,
            base1,
            base2,
            cell_size: DEFAULT_CELL_SIZE,
            colors: [Color::ZERO, Color::splat(0.9)],
        }
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        if cell_size > 0.0 {
            self.cell_size = cell_size;
        }
        self
    }

    pub fn with_colors(mut self, even: Color, odd: Color) -> Self {
        self.colors = [even, odd];
        self
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Color of the cell that contains `point` (assumed to lie on the plane).
    pub fn pattern_at(&self, point: Point3) -> Color {
        let offset = point - self.plane.point;
        let a = (offset.dot(self.base1) / self.cell_size).floor() as i64;
        let b = (offset.dot(self.base2) / self.cell_size).floor() as i64;

        self.colors[(a + b).rem_euclid(2) as usize]
    }
}
