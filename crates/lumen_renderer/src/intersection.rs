//! Intersection record, culling policy and the shared closest-hit resolver.

use crate::{BspTree, Material};
use lumen_math::{Aabb, Ray, Vec3};

/// Which side of a surface a hit may be on to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Culling {
    /// Only hits on the side facing the ray origin (primary, shadow and
    /// reflection rays).
    #[default]
    Front,
    /// Only hits on the side facing away from the ray origin.
    Back,
    /// Accept both sides.
    Off,
}

impl Culling {
    /// Whether a hit on the given side passes this policy.
    #[inline]
    pub fn accepts(self, front_face: bool) -> bool {
        match self {
            Culling::Front => front_face,
            Culling::Back => !front_face,
            Culling::Off => true,
        }
    }
}

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct Intersection<'a> {
    /// Point of intersection
    pub position: Vec3,
    /// Unit surface normal, always pointing against the incoming ray
    pub normal: Vec3,
    /// Material of the object that was hit
    pub material: &'a dyn Material,
    /// Squared distance from the ray origin to `position`
    pub distance_squared: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Unit vector from the hit towards the camera; filled in by the
    /// raycaster once the hit is resolved, zero until then
    pub view: Vec3,
}

impl<'a> Intersection<'a> {
    /// Build a hit record at `position` on a surface with the given outward
    /// normal.
    pub fn new(ray: &Ray, position: Vec3, outward_normal: Vec3, material: &'a dyn Material) -> Self {
        let mut hit = Self {
            position,
            normal: Vec3::ZERO,
            material,
            distance_squared: (position - ray.origin()).length_squared(),
            front_face: false,
            view: Vec3::ZERO,
        };
        hit.set_face_normal(ray, outward_normal);
        hit
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }

    /// Distance from the ray origin. Costs a square root; comparisons should
    /// use `distance_squared`.
    pub fn distance(&self) -> f64 {
        self.distance_squared.sqrt()
    }
}

/// Capability set shared by everything that can sit in a scene.
pub trait Intersectable: Send + Sync {
    /// World-space bounding box. Valid after `apply_transform`.
    fn bounding_box(&self) -> Aabb;

    /// Recompute world-space geometry and bounds from the local transform.
    fn apply_transform(&mut self);

    /// Exact intersection test under the given culling policy.
    fn intersect(&self, ray: &Ray, culling: Culling) -> Option<Intersection<'_>>;
}

/// Running minimum over candidate hits, keyed on squared distance.
///
/// All candidates share one ray origin and distances are non-negative, so
/// ordering by squared distance matches ordering by distance.
pub(crate) struct ClosestHit<'a> {
    best: Option<Intersection<'a>>,
}

impl<'a> ClosestHit<'a> {
    pub(crate) fn new() -> Self {
        Self { best: None }
    }

    /// Test one object, keeping its hit if it is the nearest so far.
    pub(crate) fn test<T: Intersectable>(
        &mut self,
        object: &'a T,
        ray: &Ray,
        culling: Culling,
        use_bounding_boxes: bool,
    ) {
        if use_bounding_boxes && !object.bounding_box().intersects(ray) {
            return;
        }
        if let Some(hit) = object.intersect(ray, culling) {
            self.offer(hit);
        }
    }

    pub(crate) fn offer(&mut self, hit: Intersection<'a>) {
        let closer = match &self.best {
            Some(best) => hit.distance_squared < best.distance_squared,
            None => true,
        };
        if closer {
            self.best = Some(hit);
        }
    }

    pub(crate) fn into_inner(self) -> Option<Intersection<'a>> {
        self.best
    }
}

/// Find the closest hit among `objects`.
///
/// With an index, only its candidates get the exact test. When the index
/// yields no candidates the full list is scanned if `scan_all_when_empty`
/// is set; without an index the full list is always scanned.
pub(crate) fn resolve_closest<'a, T: Intersectable>(
    objects: &'a [T],
    index: Option<&BspTree>,
    ray: &Ray,
    culling: Culling,
    use_bounding_boxes: bool,
    scan_all_when_empty: bool,
) -> Option<Intersection<'a>> {
    let mut closest = ClosestHit::new();

    let scan_all = match index {
        Some(tree) => {
            let found = tree.visit_candidates(ray, |i| {
                closest.test(&objects[i], ray, culling, use_bounding_boxes)
            });
            found == 0 && scan_all_when_empty
        }
        None => true,
    };

    if scan_all {
        for object in objects {
            closest.test(object, ray, culling, use_bounding_boxes);
        }
    }

    closest.into_inner()
}
