//! Triangle mesh with its own BSP index.

use crate::intersection::resolve_closest;
use crate::{BspParams, BspTree, Culling, Intersectable, Intersection, Material, Triangle};
use lumen_math::{Aabb, Ray, Transform, Vec3};
use std::sync::Arc;

/// A collection of triangles that behaves as one scene object.
///
/// The mesh hands its transform and material down to every triangle when
/// transformed, and indexes the world-space triangles with a nested BSP
/// tree. Without an index it tests every triangle.
pub struct Mesh {
    triangles: Vec<Triangle>,
    transform: Transform,
    material: Arc<dyn Material>,
    bbox: Aabb,
    index: Option<BspTree>,
    index_params: Option<BspParams>,
    use_bounding_boxes: bool,
}

impl Mesh {
    /// Create a mesh from local-space triangle vertex triples.
    ///
    /// World-space triangles are ready for brute-force tests right away.
    /// The index (`BspParams::MESH` by default) is built on the first
    /// `apply_transform`, which `Scene::prepare` calls.
    pub fn new(faces: Vec<[Vec3; 3]>, material: Arc<dyn Material>) -> Self {
        let triangles = faces
            .into_iter()
            .map(|[a, b, c]| Triangle::new(a, b, c, Arc::clone(&material)))
            .collect();

        let mut mesh = Self {
            triangles,
            transform: Transform::IDENTITY,
            material,
            bbox: Aabb::EMPTY,
            index: None,
            index_params: Some(BspParams::MESH),
            use_bounding_boxes: true,
        };
        mesh.update_triangles();
        mesh
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.update_triangles();
        self
    }

    /// Choose how the mesh accelerates its triangle tests and rebuild the
    /// index accordingly. `None` disables the index.
    pub fn configure_acceleration(&mut self, index_params: Option<BspParams>, use_bounding_boxes: bool) {
        self.set_acceleration(index_params, use_bounding_boxes);
        self.rebuild_index();
    }

    /// Like `configure_acceleration` but defers the rebuild to the next
    /// `apply_transform`.
    pub fn set_acceleration(&mut self, index_params: Option<BspParams>, use_bounding_boxes: bool) {
        self.index_params = index_params;
        self.use_bounding_boxes = use_bounding_boxes;
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The nested triangle index, if one is configured.
    pub fn index(&self) -> Option<&BspTree> {
        self.index.as_ref()
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn material(&self) -> &Arc<dyn Material> {
        &self.material
    }

    /// Push material and transform down and refold the mesh bounds. Any
    /// existing index is dropped since it no longer matches.
    fn update_triangles(&mut self) {
        let mut bbox = Aabb::EMPTY;
        for triangle in &mut self.triangles {
            triangle.set_material(Arc::clone(&self.material));
            triangle.set_transform(self.transform);
            triangle.apply_transform();
            bbox.subsume(&triangle.bounding_box());
        }
        self.bbox = bbox;
        self.index = None;
    }

    fn rebuild_index(&mut self) {
        self.index = self.index_params.map(|params| {
            let boxes: Vec<Aabb> = self.triangles.iter().map(|t| t.bounding_box()).collect();
            BspTree::from_boxes(&boxes, params)
        });
    }
}

impl Intersectable for Mesh {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn apply_transform(&mut self) {
        self.update_triangles();
        self.rebuild_index();

        log::debug!(
            "Mesh transformed: {} triangles, index {}",
            self.triangles.len(),
            if self.index.is_some() { "on" } else { "off" }
        );
    }

    fn intersect(&self, ray: &Ray, culling: Culling) -> Option<Intersection<'_>> {
        // Whole-mesh rejection before any per-triangle work
        if !self.bbox.intersects(ray) {
            return None;
        }

        resolve_closest(
            &self.triangles,
            self.index.as_ref(),
            ray,
            culling,
            self.use_bounding_boxes,
            false,
        )
    }
}
