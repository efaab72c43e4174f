//! RTX core - what a scene is made of.
//!
//! Geometry, materials and lights are closed enums dispatched with `match`.
//! The [`Scene`] owns them and indexes them with two k-d trees for the tracer.

mod kd_tree;
mod light;
mod material;
mod object;
mod plane;
pub mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use kd_tree::KdTree;
pub use light::{DotLight, Emitter, Light, LightId, LightSample, SphereLight, SpotLight};
pub use material::Material;
pub use object::{Intersection, Object, ObjectId, Refraction, Shape};
pub use plane::{CheesePlane, Plane};
pub use scene::{Scene, SceneError, SceneView, LIGHT_SPLIT_THRESHOLD, OBJECT_SPLIT_THRESHOLD};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the math types scenes are described with
pub use rtx_math::{Color, Point3, Ray, Vec3};
