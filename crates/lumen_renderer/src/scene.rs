//! Scene container, closest-hit resolution and the recursive raycaster.

use crate::intersection::resolve_closest;
use crate::{BspParams, BspTree, Color, Culling, Intersectable, Intersection, Light, SceneObject};
use lumen_math::{Aabb, Ray, Vec3Ext};
use std::time::Instant;

/// Distance a reflected ray's origin is pushed off the surface so it does
/// not re-hit the surface it leaves.
pub const REFLECTION_BIAS: f64 = 1e-6;

/// Runtime switches for the acceleration structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelerationConfig {
    /// Reject objects by their bounding box before the exact test
    pub use_bounding_boxes: bool,
    /// Index scene objects and mesh triangles with BSP trees
    pub use_bsp: bool,
    /// Limits for the scene-level tree
    pub scene_bsp: BspParams,
    /// Limits for each mesh's triangle tree
    pub mesh_bsp: BspParams,
}

impl Default for AccelerationConfig {
    fn default() -> Self {
        Self {
            use_bounding_boxes: true,
            use_bsp: true,
            scene_bsp: BspParams::SCENE,
            mesh_bsp: BspParams::MESH,
        }
    }
}

/// Everything a render reads: objects, lights and the spatial index.
///
/// The scene is mutated only while being assembled and by `prepare`.
/// Rendering borrows it immutably from every worker at once.
#[derive(Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
    bsp: BspTree,
    /// Ambient light applied to every material's ambient term
    pub global_ambient: Color,
    /// Color returned by rays that hit nothing
    pub background: Color,
    pub acceleration: AccelerationConfig,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object. Takes effect at the next `prepare`.
    pub fn add(&mut self, object: impl Into<SceneObject>) {
        self.objects.push(object.into());
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The scene-level index; empty before `prepare` or when disabled.
    pub fn bsp(&self) -> &BspTree {
        &self.bsp
    }

    /// Box enclosing every object.
    pub fn bounding_box(&self) -> Aabb {
        self.objects.iter().fold(Aabb::EMPTY, |mut acc, object| {
            acc.subsume(&object.bounding_box());
            acc
        })
    }

    /// Bring every object into world space and rebuild the indices.
    ///
    /// Must run before rendering, and again after any object or transform
    /// change.
    pub fn prepare(&mut self) {
        let start = Instant::now();

        let config = self.acceleration;
        for object in &mut self.objects {
            object.prepare(&config);
        }

        if config.use_bsp {
            let boxes: Vec<Aabb> = self.objects.iter().map(|o| o.bounding_box()).collect();
            self.bsp.build(&boxes, config.scene_bsp);
        } else {
            self.bsp = BspTree::new();
        }

        log::info!(
            "Scene prepared: {} objects, {} lights, BSP {} nodes / {} leaves / depth {}",
            self.objects.len(),
            self.lights.len(),
            self.bsp.node_count(),
            self.bsp.leaf_count(),
            self.bsp.depth()
        );
        log::debug!("Scene prepare took {:.2?}", start.elapsed());
    }

    /// Closest hit along `ray` among all objects, under `culling`.
    ///
    /// Candidates come from the BSP index. If it yields none, or is not
    /// built, every object is tested.
    pub fn closest_intersection(&self, ray: &Ray, culling: Culling) -> Option<Intersection<'_>> {
        let index = (!self.bsp.is_empty()).then_some(&self.bsp);
        resolve_closest(
            &self.objects,
            index,
            ray,
            culling,
            self.acceleration.use_bounding_boxes,
            true,
        )
    }

    /// Color seen along `ray`, following mirror reflections.
    ///
    /// `camera_ray` is the primary ray the path started from; its origin is
    /// the viewer position used for shading. Reflections stop once
    /// `bounce_count` reaches `max_bounces`.
    pub fn raycast(&self, ray: &Ray, camera_ray: &Ray, bounce_count: u32, max_bounces: u32) -> Color {
        let Some(mut hit) = self.closest_intersection(ray, Culling::Front) else {
            return self.background;
        };

        hit.view = (camera_ray.origin() - hit.position).normalize_or_zero();

        let material = hit.material;
        let mut color = material.shade(ray, camera_ray, &hit, self);

        let reflection = material.reflection();
        if bounce_count < max_bounces && reflection > 0.0 {
            let direction = ray.direction().reflect_about(hit.normal).normalize_or_zero();
            let origin = hit.position + direction * REFLECTION_BIAS;
            let reflected = Ray::new(origin, direction);

            color += self.raycast(&reflected, camera_ray, bounce_count + 1, max_bounces) * reflection;
        }

        color
    }
}
