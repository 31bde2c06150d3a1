//! Sphere primitive for ray tracing.

use crate::{Culling, Intersectable, Intersection, Material};
use lumen_math::{Aabb, Ray, Transform, Vec3, Vec3Ext};
use std::sync::Arc;

/// A sphere centered at the origin of its local space.
///
/// The world-space center is the local origin under `transform`; scaling
/// does not change the radius.
pub struct Sphere {
    radius: f64,
    transform: Transform,
    material: Arc<dyn Material>,
    center: Vec3,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere at the origin.
    pub fn new(radius: f64, material: Arc<dyn Material>) -> Self {
        let mut sphere = Self {
            radius: radius.max(0.0),
            transform: Transform::IDENTITY,
            material,
            center: Vec3::ZERO,
            bbox: Aabb::EMPTY,
        };
        sphere.apply_transform();
        sphere
    }

    /// Create a sphere translated to `center`.
    pub fn at(center: Vec3, radius: f64, material: Arc<dyn Material>) -> Self {
        Self::new(radius, material).with_transform(Transform::from_translation(center))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.apply_transform();
        self
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn material(&self) -> &Arc<dyn Material> {
        &self.material
    }
}

impl Intersectable for Sphere {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn apply_transform(&mut self) {
        self.center = self.transform.apply_point(Vec3::ZERO);
        let rvec = Vec3::splat(self.radius);
        self.bbox = Aabb::from_points(self.center - rvec, self.center + rvec);
    }

    /// Geometric test: project the origin-to-center vector onto the ray and
    /// compare the closest approach with the radius before taking the one
    /// square root needed for the hit point.
    fn intersect(&self, ray: &Ray, culling: Culling) -> Option<Intersection<'_>> {
        let direction = ray.direction();
        let dir_len_sq = direction.length_squared();
        if dir_len_sq == 0.0 {
            return None;
        }

        // A zero radius has no surface normal
        let radius_sq = self.radius * self.radius;
        if radius_sq == 0.0 {
            return None;
        }

        let oc = self.center - ray.origin();
        let origin_inside = oc.length_squared() < radius_sq;

        // Sphere entirely behind the ray origin
        let projection = oc.dot(direction);
        if projection <= 0.0 && !origin_inside {
            return None;
        }

        // Closest approach of the ray line to the center
        let closest = ray.origin() + oc.project_on(direction);
        let miss_distance_sq = (closest - self.center).length_squared();
        if miss_distance_sq > radius_sq {
            return None;
        }

        // Distances along the unit direction
        let dir_len = dir_len_sq.sqrt();
        let along = projection / dir_len;
        let half_chord = (radius_sq - miss_distance_sq).sqrt();
        let entry = along - half_chord;
        let exit = along + half_chord;

        let distance = match culling {
            Culling::Front if entry >= 0.0 => entry,
            Culling::Back if exit >= 0.0 => exit,
            Culling::Off if entry >= 0.0 => entry,
            Culling::Off if exit >= 0.0 => exit,
            _ => return None,
        };

        let position = ray.origin() + direction * (distance / dir_len);
        let outward_normal = (position - self.center).normalize_or_zero();
        if outward_normal == Vec3::ZERO {
            return None;
        }
        let hit = Intersection::new(ray, position, outward_normal, self.material.as_ref());

        culling.accepts(hit.front_face).then_some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, PhongMaterial};

    fn unit_sphere() -> Sphere {
        Sphere::new(1.0, Arc::new(PhongMaterial::new(Color::ONE)))
    }

    #[test]
    fn test_sphere_hit_through_center() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        let hit = sphere.intersect(&ray, Culling::Front).unwrap();
        assert!((hit.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
        assert!((hit.normal - Vec3::NEG_Z).length() < 1e-12);
        assert!(hit.front_face);
        assert!((hit.distance_squared - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_sphere_non_unit_direction() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 7.5));

        let hit = sphere.intersect(&ray, Culling::Front).unwrap();
        assert!((hit.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = unit_sphere();

        // Passes beside the sphere
        let ray = Ray::new(Vec3::new(1.5, 0.0, -5.0), Vec3::Z);
        assert!(sphere.intersect(&ray, Culling::Off).is_none());

        // Sphere behind the origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z);
        assert!(sphere.intersect(&ray, Culling::Off).is_none());

        // Degenerate direction
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO);
        assert!(sphere.intersect(&ray, Culling::Off).is_none());
    }

    #[test]
    fn test_sphere_culling_from_outside() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        let back = sphere.intersect(&ray, Culling::Back).unwrap();
        assert!((back.position - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
        assert!(!back.front_face);
        // Normal still faces the incoming ray
        assert!((back.normal - Vec3::NEG_Z).length() < 1e-12);

        let off = sphere.intersect(&ray, Culling::Off).unwrap();
        assert!((off.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_sphere_culling_from_inside() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert!(sphere.intersect(&ray, Culling::Front).is_none());

        let back = sphere.intersect(&ray, Culling::Back).unwrap();
        assert!((back.position - Vec3::X).length() < 1e-12);

        let off = sphere.intersect(&ray, Culling::Off).unwrap();
        assert!((off.position - Vec3::X).length() < 1e-12);
    }

    #[test]
    fn test_zero_radius_sphere_never_hit() {
        let material: Arc<dyn Material> = Arc::new(PhongMaterial::new(Color::ONE));
        let point = Sphere::at(Vec3::new(0.0, 0.0, 2.0), 0.0, material);

        // Aimed straight through the center and starting on it
        let through = Ray::new(Vec3::ZERO, Vec3::Z);
        let from_center = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::X);
        for culling in [Culling::Front, Culling::Back, Culling::Off] {
            assert!(point.intersect(&through, culling).is_none());
            assert!(point.intersect(&from_center, culling).is_none());
        }
    }

    #[test]
    fn test_sphere_normals_are_unit() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.3, -0.2, -5.0), Vec3::new(0.0, 0.1, 1.0));
        for culling in [Culling::Front, Culling::Back, Culling::Off] {
            let hit = sphere.intersect(&ray, culling).unwrap();
            assert!((hit.normal.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sphere_transform() {
        let sphere = unit_sphere().with_transform(Transform::from_translation(Vec3::new(0.0, 3.0, 0.0)));
        assert_eq!(sphere.center(), Vec3::new(0.0, 3.0, 0.0));
        assert!(sphere.bounding_box().contains(Vec3::new(0.0, 3.9, 0.0)));
        assert!(!sphere.bounding_box().contains(Vec3::ZERO));

        let ray = Ray::new(Vec3::new(0.0, 3.0, -5.0), Vec3::Z);
        let hit = sphere.intersect(&ray, Culling::Front).unwrap();
        assert!((hit.position - Vec3::new(0.0, 3.0, -1.0)).length() < 1e-12);
    }
}
