//! Closed set of geometry kinds a scene can hold.

use crate::{AccelerationConfig, Culling, Intersectable, Intersection, Material, Mesh, Sphere, Triangle};
use lumen_math::{Aabb, Ray};
use std::sync::Arc;

/// Any object that can be placed in a scene.
pub enum SceneObject {
    Sphere(Sphere),
    Triangle(Triangle),
    Mesh(Mesh),
}

impl SceneObject {
    /// Bring world-space geometry up to date and configure nested
    /// acceleration for this render.
    pub fn prepare(&mut self, config: &AccelerationConfig) {
        match self {
            SceneObject::Mesh(mesh) => {
                mesh.set_acceleration(
                    config.use_bsp.then_some(config.mesh_bsp),
                    config.use_bounding_boxes,
                );
                mesh.apply_transform();
            }
            other => other.apply_transform(),
        }
    }

    pub fn material(&self) -> &Arc<dyn Material> {
        match self {
            SceneObject::Sphere(sphere) => sphere.material(),
            SceneObject::Triangle(triangle) => triangle.material(),
            SceneObject::Mesh(mesh) => mesh.material(),
        }
    }

    /// Short kind name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            SceneObject::Sphere(_) => "sphere",
            SceneObject::Triangle(_) => "triangle",
            SceneObject::Mesh(_) => "mesh",
        }
    }
}

impl Intersectable for SceneObject {
    fn bounding_box(&self) -> Aabb {
        match self {
            SceneObject::Sphere(sphere) => sphere.bounding_box(),
            SceneObject::Triangle(triangle) => triangle.bounding_box(),
            SceneObject::Mesh(mesh) => mesh.bounding_box(),
        }
    }

    fn apply_transform(&mut self) {
        match self {
            SceneObject::Sphere(sphere) => sphere.apply_transform(),
            SceneObject::Triangle(triangle) => triangle.apply_transform(),
            SceneObject::Mesh(mesh) => mesh.apply_transform(),
        }
    }

    fn intersect(&self, ray: &Ray, culling: Culling) -> Option<Intersection<'_>> {
        match self {
            SceneObject::Sphere(sphere) => sphere.intersect(ray, culling),
            SceneObject::Triangle(triangle) => triangle.intersect(ray, culling),
            SceneObject::Mesh(mesh) => mesh.intersect(ray, culling),
        }
    }
}

impl From<Sphere> for SceneObject {
    fn from(sphere: Sphere) -> Self {
        SceneObject::Sphere(sphere)
    }
}

impl From<Triangle> for SceneObject {
    fn from(triangle: Triangle) -> Self {
        SceneObject::Triangle(triangle)
    }
}

impl From<Mesh> for SceneObject {
    fn from(mesh: Mesh) -> Self {
        SceneObject::Mesh(mesh)
    }
}
