//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{Culling, Intersectable, Intersection, Material};
use lumen_math::{Aabb, Ray, Transform, Vec3};
use std::sync::Arc;

/// Below this |det| the ray is treated as parallel to the triangle.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Hits closer than this ray parameter are ignored (self-intersection).
const MIN_HIT_T: f64 = 1e-9;

/// A triangle primitive.
///
/// Winding is counter-clockwise: the front face is the one whose normal
/// `(v1 - v0) x (v2 - v0)` points towards the viewer.
pub struct Triangle {
    /// Vertices in local space
    local: [Vec3; 3],
    transform: Transform,
    material: Arc<dyn Material>,
    /// World-space vertices (set by `apply_transform`)
    vertices: [Vec3; 3],
    /// World-space unit face normal
    normal: Vec3,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        let mut triangle = Self {
            local: [v0, v1, v2],
            transform: Transform::IDENTITY,
            material,
            vertices: [v0, v1, v2],
            normal: Vec3::ZERO,
            bbox: Aabb::EMPTY,
        };
        triangle.apply_transform();
        triangle
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.apply_transform();
        self
    }

    /// World-space vertices.
    pub fn vertices(&self) -> [Vec3; 3] {
        self.vertices
    }

    /// World-space unit face normal (zero for degenerate triangles).
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn material(&self) -> &Arc<dyn Material> {
        &self.material
    }

    /// Replace the shared material; used by meshes to hand theirs down.
    pub fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }
}

impl Intersectable for Triangle {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn apply_transform(&mut self) {
        let [v0, v1, v2] = self.local.map(|v| self.transform.apply_point(v));
        self.vertices = [v0, v1, v2];
        self.normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        self.bbox = Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));
    }

    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn intersect(&self, ray: &Ray, culling: Culling) -> Option<Intersection<'_>> {
        let [v0, v1, v2] = self.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle (or the triangle is degenerate)
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        // The sign of the determinant tells which face the ray meets
        // before any barycentric work.
        let front_face = a > 0.0;
        if !culling.accepts(front_face) {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t < MIN_HIT_T {
            return None;
        }

        Some(Intersection::new(
            ray,
            ray.at(t),
            self.normal,
            self.material.as_ref(),
        ))
    }
}
